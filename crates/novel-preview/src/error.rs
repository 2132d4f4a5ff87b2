//! Error types for preview management.

use crate::protocol::ProtocolError;
use crate::store::PreviewId;
use novel_core::{DocumentId, EditorId, NotificationId};
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced by [`PreviewManager`](crate::PreviewManager) and
/// [`PreviewStore`](crate::PreviewStore).
pub enum PreviewError {
    #[error("preview {} not found", .0.get())]
    /// The preview id is unknown (already closed).
    UnknownPreview(PreviewId),

    #[error("document {} is not open", .0.get())]
    /// The host does not know the document.
    UnknownDocument(DocumentId),

    #[error("editor {} is not open", .0.get())]
    /// The host does not know the editor.
    UnknownEditor(EditorId),

    #[error("document {uri} has language '{language_id}', not a novel")]
    /// Previews are only available for novel documents.
    InvalidLanguage {
        /// Document URI.
        uri: String,
        /// Its language id.
        language_id: String,
    },

    #[error("document {} already has a preview", .0.get())]
    /// A document can be previewed by at most one preview.
    DocumentAlreadyPreviewed(DocumentId),

    #[error("uri {0} already has a preview")]
    /// A URI can be previewed by at most one preview.
    UriAlreadyPreviewed(String),

    #[error("failed to open {uri}: {message}")]
    /// The host failed to open a document.
    OpenFailed {
        /// Requested URI.
        uri: String,
        /// Host error message.
        message: String,
    },

    #[error(transparent)]
    /// A message could not be encoded or decoded.
    Protocol(#[from] ProtocolError),
}

impl PreviewError {
    /// Notification to show the user, if the error is user-facing.
    pub fn notification_id(&self) -> Option<NotificationId> {
        match self {
            Self::InvalidLanguage { .. } => Some(NotificationId::ErrorInvalidLanguageId),
            _ => None,
        }
    }
}
