//! Paragraph indentation formatting.

use crate::annotation::CHAR_FULLWIDTH_SPACE;
use crate::document::TextDocument;
use crate::edit::EditError;
use crate::merge::Patch;
use crate::position::{TextPosition, TextRange, TextSelection};
use regex::Regex;
use std::sync::LazyLock;

static SPACE_AND_CHAR_AT_LINE_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\p{Zs}*)(?:(\p{P})|[^\p{P}])").expect("valid indentation regex")
});

static SPACE_AT_LINE_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\p{Zs}+)").expect("valid leading space regex"));

/// Formatting style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indentation {
    /// Indent paragraphs with one full-width space, except lines starting with punctuation.
    With,
    /// Remove leading spaces.
    Without,
}

/// The patch formatting line `line` (whose text is `text`), if it needs one.
///
/// Empty lines are left alone.
pub fn format_line(line: usize, text: &str, indentation: Indentation) -> Option<Patch> {
    let leading = |chars: usize| {
        TextRange::new(TextPosition::new(line, 0), TextPosition::new(line, chars))
    };

    match indentation {
        Indentation::With => {
            let caps = SPACE_AND_CHAR_AT_LINE_START.captures(text)?;
            let space = caps.get(1).map_or("", |m| m.as_str());
            let spaces = space.chars().count();

            if caps.get(2).is_some() {
                return (spaces > 0).then(|| Patch::delete(leading(spaces)));
            }

            let indent = CHAR_FULLWIDTH_SPACE.to_string();
            if space == indent {
                return None;
            }
            Some(Patch::new(leading(spaces), indent))
        }
        Indentation::Without => {
            let caps = SPACE_AT_LINE_START.captures(text)?;
            let spaces = caps.get(1).map_or(0, |m| m.as_str().chars().count());
            Some(Patch::delete(leading(spaces)))
        }
    }
}

/// Patches formatting the selected lines, or every line when the selection is empty.
///
/// Only novel documents can be formatted. Every patch stays on its own line and keeps the line
/// count, so the batch applies in any order.
pub fn format_document<D: TextDocument + ?Sized>(
    document: &D,
    selection: &TextSelection,
    indentation: Indentation,
) -> Result<Vec<Patch>, EditError> {
    if !document.is_novel() {
        return Err(EditError::InvalidLanguage {
            language_id: document.language_id().to_string(),
        });
    }

    let (first, last) = if selection.is_empty() {
        (0, document.line_count().saturating_sub(1))
    } else {
        (selection.start.line, selection.end.line)
    };

    Ok((first..=last)
        .filter_map(|index| {
            let text = document.line(index)?;
            format_line(index, text, indentation)
        })
        .collect())
}
