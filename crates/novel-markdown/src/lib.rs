#![warn(missing_docs)]
//! `novel-markdown` - ruby and emphasis dots inside markdown.
//!
//! A [`markdown_it`] plugin. The [`AnnotationScanner`] inline rule turns `｜base《ruby》`,
//! `漢字《ruby》` and `《《dots》》` into [`Ruby`] and [`Dots`] nodes, while the rest of the
//! paragraph goes through the regular CommonMark inline rules.
//!
//! ```rust
//! let md = &mut markdown_it::MarkdownIt::new();
//! markdown_it::plugins::cmark::add(md);
//! novel_markdown::add(md);
//! assert_eq!(
//!     md.parse("*猫*の名前《なまえ》").render(),
//!     "<p><em>猫</em>の<ruby>名前<rt>なまえ</rt></ruby></p>\n"
//! );
//! ```

pub mod annotation;
pub mod configuration;

pub use annotation::{AnnotationScanner, DOTS_CLASS_NAME, Dots, Ruby, SkipAnnotation};
pub use configuration::{MarkdownConfiguration, add};
