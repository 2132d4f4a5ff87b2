//! Messages exchanged between the host and a preview.
//!
//! Both directions are JSON objects discriminated by a `kind` field:
//!
//! ```text
//! host → preview   uriChange | orientationChange | styleChange | reload | patch
//!                  | selectionChange | visibleRangesChange
//! preview → host   requestReload | requestRevealEditor
//! ```
//!
//! Positions are `{line, character}` objects as produced by `novel-core`.

use crate::configuration::Orientation;
use novel_core::{Patch, TextRange, TextSelection};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while encoding or decoding protocol messages.
pub enum ProtocolError {
    #[error("invalid preview message: {0}")]
    /// The JSON is malformed or does not describe a known message.
    Json(#[from] serde_json::Error),
}

/// Styles injected into the preview document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewStyle {
    /// CSS texts, one `<style>` element each.
    pub styles: Vec<String>,
    /// Style sheet URIs, one `<link rel="stylesheet">` element each.
    pub sheets: Vec<String>,
}

/// State a preview persists so the host can restore it after a restart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PreviewState {
    /// URI of the previewed document.
    pub uri: String,
}

/// Full document content of a reload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    /// Document URI.
    pub uri: String,
    /// Line texts without line breaks.
    pub lines: Vec<String>,
}

/// Editor state of a reload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    /// Current selection.
    pub selection: TextSelection,
    /// Visible ranges, top first.
    pub visible_ranges: Vec<TextRange>,
}

/// Configuration of a reload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReloadConfiguration {
    /// Layout direction.
    pub orientation: Orientation,
    /// Injected styles.
    pub style: PreviewStyle,
}

/// Payload of [`HostMessage::Reload`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reload {
    /// Document content.
    pub document: DocumentSnapshot,
    /// Editor state, absent when no editor is attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<EditorState>,
    /// Layout and style.
    pub configuration: ReloadConfiguration,
}

/// Host → preview messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum HostMessage {
    /// The document was renamed.
    UriChange {
        /// New URI.
        uri: String,
    },
    /// The layout direction changed.
    OrientationChange {
        /// New direction.
        orientation: Orientation,
    },
    /// The injected styles changed.
    StyleChange(PreviewStyle),
    /// Replace everything with a full snapshot.
    Reload(Reload),
    /// Apply content patches, in order.
    Patch {
        /// Patches of one change event.
        patches: Vec<Patch>,
    },
    /// The editor selection changed; `None` when the editor was detached.
    SelectionChange {
        /// New selection.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        selection: Option<TextSelection>,
    },
    /// The editor scrolled.
    VisibleRangesChange {
        /// Visible ranges, top first.
        #[serde(rename = "visibleRanges")]
        visible_ranges: Vec<TextRange>,
    },
}

/// Preview → host messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PreviewMessage {
    /// Ask for a [`HostMessage::Reload`].
    RequestReload,
    /// Ask the host to scroll the editor to `range`.
    RequestRevealEditor {
        /// Range to reveal.
        range: TextRange,
    },
}

impl HostMessage {
    /// Wire name of the message kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UriChange { .. } => "uriChange",
            Self::OrientationChange { .. } => "orientationChange",
            Self::StyleChange(_) => "styleChange",
            Self::Reload(_) => "reload",
            Self::Patch { .. } => "patch",
            Self::SelectionChange { .. } => "selectionChange",
            Self::VisibleRangesChange { .. } => "visibleRangesChange",
        }
    }

    /// Encode as JSON.
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON.
    pub fn from_json(json: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl PreviewMessage {
    /// Wire name of the message kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RequestReload => "requestReload",
            Self::RequestRevealEditor { .. } => "requestRevealEditor",
        }
    }

    /// Encode as JSON.
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON.
    pub fn from_json(json: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(json)?)
    }
}
