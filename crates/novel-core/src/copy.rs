//! Convert-and-copy commands.
//!
//! The converted text is written to the clipboard and read back; a clipboard that does not
//! return exactly what was written is reported instead of assumed to have worked.

use crate::annotation::{lines_to_html, to_ruby_only};
use crate::document::TextDocument;
use crate::notification::NotificationId;
use thiserror::Error;
use tracing::debug;

/// System clipboard access.
pub trait Clipboard {
    /// Clipboard failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Replace the clipboard content.
    fn write_text(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Read the clipboard content.
    fn read_text(&mut self) -> Result<String, Self::Error>;
}

/// Conversion applied before copying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CopyFormat {
    /// `<p>` paragraphs with ruby and emphasis markup.
    Html,
    /// Emphasis dots rewritten as ruby.
    RubyOnly,
}

impl CopyFormat {
    /// Convert a whole document text.
    pub fn convert(self, text: &str) -> String {
        match self {
            CopyFormat::Html => lines_to_html(text),
            CopyFormat::RubyOnly => to_ruby_only(text),
        }
    }

    /// Notification shown after a successful copy.
    pub fn notification_id(self) -> NotificationId {
        match self {
            CopyFormat::Html => NotificationId::InfoCopyAsHtml,
            CopyFormat::RubyOnly => NotificationId::InfoCopyAsRubyOnly,
        }
    }
}

/// A failed copy.
#[derive(Debug, Error)]
pub enum CopyError {
    /// Only novel documents can be copied.
    #[error("cannot copy a `{language_id}` document")]
    InvalidLanguage {
        /// The document's language id.
        language_id: String,
    },
    /// The clipboard holds something else than what was written.
    #[error("the clipboard content does not match the copied text")]
    Mismatch,
    /// Clipboard access failed.
    #[error("clipboard access failed: {0}")]
    Clipboard(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl CopyError {
    /// Notification reporting this error.
    pub fn notification_id(&self) -> NotificationId {
        match self {
            CopyError::InvalidLanguage { .. } => NotificationId::ErrorInvalidLanguageId,
            CopyError::Mismatch | CopyError::Clipboard(_) => NotificationId::ErrorCopyClipboard,
        }
    }
}

fn clipboard_error<E: std::error::Error + Send + Sync + 'static>(err: E) -> CopyError {
    CopyError::Clipboard(Box::new(err))
}

/// Convert `document` and copy it to `clipboard`, verifying the round trip.
///
/// Returns the notification to show on success.
pub fn copy_document<D, C>(
    document: &D,
    format: CopyFormat,
    clipboard: &mut C,
) -> Result<NotificationId, CopyError>
where
    D: TextDocument + ?Sized,
    C: Clipboard + ?Sized,
{
    if !document.is_novel() {
        return Err(CopyError::InvalidLanguage {
            language_id: document.language_id().to_string(),
        });
    }

    let text = format.convert(&document.text());
    clipboard.write_text(&text).map_err(clipboard_error)?;
    let copied = clipboard.read_text().map_err(clipboard_error)?;

    if copied != text {
        debug!(?format, written = text.len(), read = copied.len(), "clipboard mismatch");
        return Err(CopyError::Mismatch);
    }

    Ok(format.notification_id())
}

/// [`copy_document`] as HTML.
pub fn copy_as_html<D, C>(document: &D, clipboard: &mut C) -> Result<NotificationId, CopyError>
where
    D: TextDocument + ?Sized,
    C: Clipboard + ?Sized,
{
    copy_document(document, CopyFormat::Html, clipboard)
}

/// [`copy_document`] as ruby-only text.
pub fn copy_as_ruby_only<D, C>(
    document: &D,
    clipboard: &mut C,
) -> Result<NotificationId, CopyError>
where
    D: TextDocument + ?Sized,
    C: Clipboard + ?Sized,
{
    copy_document(document, CopyFormat::RubyOnly, clipboard)
}
