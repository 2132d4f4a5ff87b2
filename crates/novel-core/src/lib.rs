#![warn(missing_docs)]
//! Novel Core - Headless Kernel for Annotated Japanese Novel Text
//!
//! # Overview
//!
//! `novel-core` keeps line-indexed projections of a live-edited document consistent with the
//! source text, and understands the small annotation notation used in Japanese web novels
//! (ruby glosses and emphasis dots). It does not own an editor or a renderer: hosts hand it
//! range-replacement patches and line texts, and receive derived state back.
//!
//! # Core Features
//!
//! - **Line-Patch Merging**: applies ordered range-replacement patches to any `Vec<Line<T>>`
//!   in place, delegating the lifecycle of per-line data to create/update/remove callbacks
//! - **Annotation Grammar**: one shared recognizer for `｜base《ruby》`, `漢字《ruby》` and
//!   `《《dots》》`, rendered as plain text, HTML, or ruby-only text
//! - **Character Counting**: per-line cached counts with O(1) totals and range queries that
//!   never re-scan interior lines
//! - **Annotation Edits**: validated single-line insertions for ruby and emphasis dots
//! - **Formatting**: paragraph indentation with full-width spaces
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Commands (edit / format / copy / notify)   │  ← Host-facing actions
//! ├─────────────────────────────────────────────┤
//! │  Projections (CounterState, preview lines)  │  ← Derived per-line state
//! ├─────────────────────────────────────────────┤
//! │  Line-Patch Merge                           │  ← Incremental sync
//! ├─────────────────────────────────────────────┤
//! │  Annotation Grammar                         │  ← Ruby / emphasis dots
//! ├─────────────────────────────────────────────┤
//! │  Positions & Ranges                         │  ← (line, character)
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use novel_core::{CharacterCounter, CounterState, Patch, TextPosition, TextRange};
//!
//! let counter = CharacterCounter;
//! let mut state = CounterState::from_lines(&counter, ["｜吾輩《わがはい》は猫である。"]);
//! assert_eq!(state.current(), 8);
//!
//! let at = TextPosition::new(0, 15);
//! state
//!     .update(&counter, &[Patch::new(TextRange::new(at, at), "\n名前はまだ無い。")])
//!     .unwrap();
//! assert_eq!(state.current(), 16);
//! assert_eq!(state.line_count(), 2);
//! ```
//!
//! # Module Description
//!
//! - [`position`] - `(line, character)` coordinates, ranges and selections
//! - [`merge`] - in-place line-patch merge algorithm
//! - [`annotation`] - ruby / emphasis-dots grammar and its renderers
//! - [`counter`] - character counter projection
//! - [`document`] - document identity and the host document capability
//! - [`edit`] - single-line annotation insertions
//! - [`format`] - indentation formatting
//! - [`copy`] - convert-and-copy commands with clipboard verification
//! - [`notification`] - notification ids, display settings and delivery
//!
//! # Coordinates
//!
//! All `character` values are offsets in Unicode scalar values (`char`) within a line. Hosts
//! speaking UTF-16 (LSP, webviews) convert at their boundary.

pub mod annotation;
pub mod copy;
pub mod counter;
pub mod document;
pub mod edit;
pub mod format;
pub mod merge;
pub mod notification;
pub mod position;
mod text;

pub use annotation::{
    Segment, escape_html, is_all_han, line_to_html, lines_to_html, scan, to_plain, to_ruby_only,
};
pub use copy::{Clipboard, CopyError, CopyFormat, copy_as_html, copy_as_ruby_only, copy_document};
pub use counter::{CharacterCounter, Counter, CounterManager, CounterState, format_count};
pub use document::{
    DocumentId, EditorId, InMemoryDocument, MARKDOWN_LANGUAGE_ID, NOVEL_LANGUAGE_ID, TextDocument,
};
pub use edit::{
    AnnotationEdit, AnnotationKind, EditError, InsertRubyConfiguration, LineEditor,
    VerticalBarInsert, VerticalBarKind, apply_annotation_edit, insert_dots, insert_ruby,
    validate_single_line,
};
pub use format::{Indentation, format_document, format_line};
pub use merge::{Line, LineCallbacks, MergeError, Patch, merge};
pub use notification::{
    NotificationChoice, NotificationDisplay, NotificationHost, NotificationId, NotificationLevel,
    NotificationOutcome, NotificationService, NotificationSettings,
};
pub use position::{TextPosition, TextRange, TextSelection};
pub use text::split_lines;
