#![warn(missing_docs)]
//! Novel Preview - Live Preview Synchronization
//!
//! # Overview
//!
//! `novel-preview` keeps rendered previews of annotated novel documents in sync with the
//! editor. It has two halves that only share the wire [`protocol`]:
//!
//! - the host side ([`PreviewManager`]) turns editor events into [`HostMessage`]s, tracks
//!   which preview belongs to which document, editor and URI ([`PreviewStore`]), and answers
//!   [`PreviewMessage`]s;
//! - the preview side ([`PreviewView`]) applies those messages to its line elements through
//!   the same line-patch merge the host uses for its own projections.
//!
//! ```text
//! editor events ─► PreviewManager ──HostMessage──► PreviewView ─► line elements
//!                        ▲                              │
//!                        └────────PreviewMessage────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use novel_preview::{HostMessage, PreviewMessage, PreviewView};
//! use novel_core::{Patch, TextPosition};
//!
//! let mut view = PreviewView::default();
//! assert_eq!(view.take_messages(), vec![PreviewMessage::RequestReload]);
//!
//! let reload = r#"{"kind":"reload","document":{"uri":"file:///a.txt","lines":[""]},
//!     "configuration":{"orientation":"vertical","style":{"styles":[],"sheets":[]}}}"#;
//! view.receive_json(reload).unwrap();
//!
//! view.handle_message(HostMessage::Patch {
//!     patches: vec![Patch::insert(TextPosition::new(0, 0), "漢字《かんじ》")],
//! });
//! assert_eq!(
//!     view.html(),
//!     r#"<div class="preview-container preview-vertical"><p><ruby>漢字<rt>かんじ</rt></ruby></p></div>"#
//! );
//! ```
//!
//! # Module Description
//!
//! - [`protocol`] - host ↔ preview messages and their JSON form
//! - [`configuration`] - preview settings and style assembly
//! - [`store`] - the preview registry
//! - [`manager`] - host-side event handling and commands
//! - [`view`] - preview-side line view
//! - [`uri`] - URI helpers

pub mod configuration;
pub mod error;
pub mod manager;
pub mod protocol;
pub mod store;
pub mod uri;
pub mod view;

pub use configuration::{
    CustomStyleConfiguration, Orientation, PreviewConfiguration, PreviewLayoutConfiguration,
    PreviewStyleConfiguration, SheetResolver, SheetSource,
};
pub use error::PreviewError;
pub use manager::{
    EditorSnapshot, FileRename, PreviewContext, PreviewContextKey, PreviewHost, PreviewManager,
    PreviewPanel, PreviewSlot, ViewColumn,
};
pub use protocol::{
    DocumentSnapshot, EditorState, HostMessage, PreviewMessage, PreviewState, PreviewStyle,
    ProtocolError, Reload, ReloadConfiguration,
};
pub use store::{PreviewEntry, PreviewId, PreviewStore};
pub use view::{DefaultRenderer, HeadElement, LineElement, LineRenderer, PreviewView};
