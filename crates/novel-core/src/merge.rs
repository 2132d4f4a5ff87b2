//! In-place line-patch merging.
//!
//! A host document is mirrored as a `Vec<Line<T>>`: the text of every line plus arbitrary
//! derived data (`T`), e.g. a character count or a rendered element. [`merge`] applies a batch
//! of range-replacement [`Patch`]es to that array without re-scanning untouched lines, and
//! reports every line it creates, updates or removes through [`LineCallbacks`], so the derived
//! data stays in lockstep with the text.
//!
//! # Sequencing
//!
//! Patches inside one batch are applied **in order**, and every patch is expressed in the
//! coordinates of the array left behind by the patches before it (not the original array).
//! Producing patches in that composed order is the caller's job; no re-indexing happens here.

use crate::position::{TextPosition, TextRange};
use crate::text::{char_prefix, char_suffix, split_lines};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

/// Replace the text spanned by `range` with `text`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Patch {
    /// Range to replace, in the coordinates of the array this patch is applied to.
    pub range: TextRange,
    /// Replacement text (may contain `\n` / `\r\n`).
    pub text: String,
}

impl Patch {
    /// Create a patch.
    pub fn new(range: TextRange, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    /// Insert `text` at `position`.
    pub fn insert(position: TextPosition, text: impl Into<String>) -> Self {
        Self::new(TextRange::empty(position), text)
    }

    /// Delete `range`.
    pub fn delete(range: TextRange) -> Self {
        Self::new(range, String::new())
    }
}

/// A line's text together with its derived data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<T> {
    /// Current text of the line (without line break).
    pub text: String,
    /// Derived data owned by the line.
    pub data: T,
}

impl<T> Line<T> {
    /// Create a line record.
    pub fn new(text: impl Into<String>, data: T) -> Self {
        Self {
            text: text.into(),
            data,
        }
    }
}

/// Lifecycle hooks for the derived data of a line array.
///
/// For every patch, [`merge`] first calls [`update`](Self::update) on the lines that survive,
/// then either [`remove`](Self::remove) or [`create`](Self::create) for the surplus, each in
/// ascending index order.
pub trait LineCallbacks<T> {
    /// Build data for a new line inserted at `index`.
    fn create(&mut self, new_text: &str, index: usize) -> T;

    /// Refresh `data` in place for a line whose text changes from `old_text` to `new_text`.
    fn update(&mut self, new_text: &str, data: &mut T, old_text: &str, index: usize);

    /// Release the data of a line removed from `index` (pre-removal coordinates).
    fn remove(&mut self, data: T, old_text: &str, index: usize);
}

/// A patch that cannot be applied to the current line array.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    /// The patch range starts after it ends.
    #[error("patch #{patch} starts after it ends: {start:?} > {end:?}")]
    InvertedRange {
        /// Index of the patch within its batch.
        patch: usize,
        /// Range start.
        start: TextPosition,
        /// Range end.
        end: TextPosition,
    },
    /// The patch addresses a line past the end of the array.
    #[error("patch #{patch} addresses line {line}, but only {line_count} lines exist")]
    LineOutOfRange {
        /// Index of the patch within its batch.
        patch: usize,
        /// The offending line.
        line: usize,
        /// Number of lines at the time the patch was applied.
        line_count: usize,
    },
}

/// Apply `patches` to `lines` in place.
///
/// Each patch is checked before it touches the array; on error, the patches before it stay
/// applied and the rest of the batch is skipped. Character offsets past the end of a line are
/// clamped to the line end.
pub fn merge<T, C>(
    lines: &mut Vec<Line<T>>,
    patches: &[Patch],
    on: &mut C,
) -> Result<(), MergeError>
where
    C: LineCallbacks<T> + ?Sized,
{
    if patches.is_empty() {
        return Ok(());
    }

    let before = lines.len();

    for (patch_index, patch) in patches.iter().enumerate() {
        let TextRange { start, end } = patch.range;

        if start > end {
            return Err(MergeError::InvertedRange {
                patch: patch_index,
                start,
                end,
            });
        }

        if end.line >= lines.len() {
            return Err(MergeError::LineOutOfRange {
                patch: patch_index,
                line: end.line,
                line_count: lines.len(),
            });
        }

        let mut new_texts = split_lines(&patch.text);
        let prefix = char_prefix(&lines[start.line].text, start.character);
        new_texts[0].insert_str(0, prefix);
        let suffix = char_suffix(&lines[end.line].text, end.character);
        if let Some(last) = new_texts.last_mut() {
            last.push_str(suffix);
        }

        let old_len = end.line - start.line + 1;
        let new_len = new_texts.len();
        let overlap = new_len.min(old_len);
        let mut new_texts = new_texts.into_iter();

        for (offset, new_text) in new_texts.by_ref().take(overlap).enumerate() {
            let index = start.line + offset;
            let line = &mut lines[index];
            on.update(&new_text, &mut line.data, &line.text, index);
            line.text = new_text;
        }

        let delta_start = start.line + overlap;

        if new_len < old_len {
            let removed: Vec<Line<T>> = lines
                .drain(delta_start..delta_start + (old_len - new_len))
                .collect();
            for (offset, line) in removed.into_iter().enumerate() {
                on.remove(line.data, &line.text, delta_start + offset);
            }
        } else if new_len > old_len {
            let created: Vec<Line<T>> = new_texts
                .enumerate()
                .map(|(offset, text)| {
                    let data = on.create(&text, delta_start + offset);
                    Line { text, data }
                })
                .collect();
            lines.splice(delta_start..delta_start, created);
        }
    }

    trace!(
        patches = patches.len(),
        lines_before = before,
        lines_after = lines.len(),
        "merged patch batch"
    );

    Ok(())
}
