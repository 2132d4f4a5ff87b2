//! Single-line annotation insertions ("insert ruby", "insert emphasis dots").
//!
//! An edit wraps the selected text of one line: something is inserted before the selection
//! (possibly nothing) and something after it, and the cursor lands inside the new brackets.

use crate::annotation::{
    CHAR_FULLWIDTH_VERTICAL_BAR, CHAR_HALFWIDTH_VERTICAL_BAR, find_special_character, is_all_han,
};
use crate::document::{MARKDOWN_LANGUAGE_ID, NOVEL_LANGUAGE_ID, TextDocument};
use crate::merge::Patch;
use crate::notification::NotificationId;
use crate::position::{TextPosition, TextRange, TextSelection};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// When the ruby command inserts a vertical bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerticalBarInsert {
    /// Only when the selection is not an implicit-ruby Han run.
    #[default]
    Default,
    /// Always.
    Always,
}

/// Which vertical bar the ruby command inserts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerticalBarKind {
    /// `｜`
    #[default]
    Full,
    /// `|`
    Half,
}

impl VerticalBarKind {
    /// The bar character.
    pub fn as_char(self) -> char {
        match self {
            VerticalBarKind::Full => CHAR_FULLWIDTH_VERTICAL_BAR,
            VerticalBarKind::Half => CHAR_HALFWIDTH_VERTICAL_BAR,
        }
    }
}

/// Settings of the "insert ruby" command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InsertRubyConfiguration {
    /// When to insert a bar.
    pub vertical_bar_insert: VerticalBarInsert,
    /// Which bar to insert.
    pub vertical_bar_kind: VerticalBarKind,
}

/// Which annotation to insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    /// Ruby brackets (and maybe a bar).
    Ruby,
    /// Emphasis dots brackets.
    Dots,
}

/// An edit that can not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// The document is neither a novel nor markdown.
    #[error("annotations are not supported for language `{language_id}`")]
    InvalidLanguage {
        /// The document's language id.
        language_id: String,
    },
    /// The selection contains a line break.
    #[error("the selection spans several lines")]
    NotSingleLine,
    /// The selection contains a reserved annotation character.
    #[error("the selection contains the reserved character {character:?}")]
    ContainsSpecialCharacter {
        /// The first reserved character found.
        character: char,
    },
    /// The host rejected the edit.
    #[error("the editor rejected the edit")]
    ApplyFailed,
}

impl EditError {
    /// Notification reporting this error.
    pub fn notification_id(&self) -> NotificationId {
        match self {
            EditError::InvalidLanguage { .. } => NotificationId::ErrorInvalidLanguageId,
            EditError::NotSingleLine => NotificationId::ErrorEditNotSingleLine,
            EditError::ContainsSpecialCharacter { .. } => {
                NotificationId::ErrorEditContainSpecialCharacter
            }
            EditError::ApplyFailed => NotificationId::ErrorEditOther,
        }
    }
}

/// Text to insert around a selection, and where the cursor goes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationEdit {
    /// Inserted at the selection start.
    pub before: String,
    /// Inserted at the selection end.
    pub after: String,
    /// Cursor offset from the original selection end, in characters.
    pub cursor_delta: usize,
}

impl AnnotationEdit {
    /// Patches for a single-line `selection`, in application order.
    ///
    /// The end insertion comes first so the start position stays valid.
    pub fn patches(&self, selection: TextRange) -> Vec<Patch> {
        let mut patches = vec![Patch::insert(selection.end, self.after.clone())];
        if !self.before.is_empty() {
            patches.push(Patch::insert(selection.start, self.before.clone()));
        }
        patches
    }

    /// Cursor position after the edit.
    pub fn cursor(&self, selection: TextRange) -> TextPosition {
        selection.end.translate(self.cursor_delta)
    }
}

/// Reject text that spans lines or contains reserved annotation characters.
///
/// The first offending character decides the error.
pub fn validate_single_line(text: &str) -> Result<(), EditError> {
    match find_special_character(text) {
        None => Ok(()),
        Some('\r' | '\n') => Err(EditError::NotSingleLine),
        Some(character) => Err(EditError::ContainsSpecialCharacter { character }),
    }
}

fn ends_with_han(text: &str) -> bool {
    let mut buf = [0u8; 4];
    text.chars()
        .next_back()
        .is_some_and(|ch| is_all_han(ch.encode_utf8(&mut buf)))
}

/// Ruby insertion for `selected`, where `prefix` is the line text before the selection.
///
/// A Han-only selection not preceded by Han gets implicit ruby (`《》` only) unless the
/// configuration always asks for a bar.
pub fn insert_ruby(
    prefix: &str,
    selected: &str,
    config: &InsertRubyConfiguration,
) -> Result<AnnotationEdit, EditError> {
    validate_single_line(selected)?;

    if config.vertical_bar_insert != VerticalBarInsert::Always
        && is_all_han(selected)
        && !ends_with_han(prefix)
    {
        return Ok(AnnotationEdit {
            before: String::new(),
            after: "《》".to_string(),
            cursor_delta: 1,
        });
    }

    Ok(AnnotationEdit {
        before: config.vertical_bar_kind.as_char().to_string(),
        after: "《》".to_string(),
        cursor_delta: 2,
    })
}

/// Emphasis dots insertion for `selected`.
pub fn insert_dots(selected: &str) -> Result<AnnotationEdit, EditError> {
    validate_single_line(selected)?;

    Ok(AnnotationEdit {
        before: "《《".to_string(),
        after: "》》".to_string(),
        cursor_delta: if selected.is_empty() { 2 } else { 4 },
    })
}

/// A host editor: a document view with a selection that accepts patches.
pub trait LineEditor {
    /// The edited document.
    fn document(&self) -> &dyn TextDocument;

    /// The primary selection.
    fn selection(&self) -> TextSelection;

    /// Apply `patches` as one edit; returns `false` if the host refused.
    fn apply(&mut self, patches: &[Patch]) -> bool;

    /// Replace the selection.
    fn set_selection(&mut self, selection: TextSelection);
}

/// Insert an annotation around the editor's selection and place the cursor inside it.
///
/// Nothing is changed when an error is returned, except for [`EditError::ApplyFailed`], which
/// leaves the document in whatever state the host reports.
pub fn apply_annotation_edit<E: LineEditor + ?Sized>(
    editor: &mut E,
    kind: AnnotationKind,
    config: &InsertRubyConfiguration,
) -> Result<TextPosition, EditError> {
    let document = editor.document();
    let language_id = document.language_id();
    if language_id != NOVEL_LANGUAGE_ID && language_id != MARKDOWN_LANGUAGE_ID {
        return Err(EditError::InvalidLanguage {
            language_id: language_id.to_string(),
        });
    }

    let selection = editor.selection();
    let range = selection.range();
    let selected = document.text_in_range(range);
    let prefix = document.text_in_range(TextRange::new(
        TextPosition::new(range.start.line, 0),
        range.start,
    ));

    let edit = match kind {
        AnnotationKind::Ruby => insert_ruby(&prefix, &selected, config)?,
        AnnotationKind::Dots => insert_dots(&selected)?,
    };

    if !editor.apply(&edit.patches(range)) {
        return Err(EditError::ApplyFailed);
    }

    let cursor = edit.cursor(range);
    editor.set_selection(TextSelection::caret(cursor));
    debug!(?kind, line = cursor.line, character = cursor.character, "inserted annotation");

    Ok(cursor)
}
