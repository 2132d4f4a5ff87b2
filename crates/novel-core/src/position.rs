//! `(line, character)` coordinates.
//!
//! Positions are 0-based and ordered lexicographically on `(line, character)`. `character` is
//! counted in Unicode scalar values (`char`) within the line. Hosts that address lines in UTF-16
//! code units convert before building patches: `𠮷` is one character here and two units there.

use serde::{Deserialize, Serialize};

/// A position inside a line-based text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct TextPosition {
    /// Line index (0-based).
    pub line: usize,
    /// Character offset within the line (0-based, in `char`s).
    pub character: usize,
}

impl TextPosition {
    /// Create a new position.
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }

    /// Same line, `delta` characters further right.
    pub fn translate(self, delta: usize) -> Self {
        Self::new(self.line, self.character.saturating_add(delta))
    }
}

/// A range between two positions (`start <= end`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextRange {
    /// Start position (inclusive).
    pub start: TextPosition,
    /// End position (exclusive).
    pub end: TextPosition,
}

impl TextRange {
    /// Create a range; the endpoints are reordered if given backwards.
    pub fn new(start: TextPosition, end: TextPosition) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// An empty range at `position`.
    pub fn empty(position: TextPosition) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// Returns `true` if `start == end`.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if both endpoints are on the same line.
    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }

    /// Returns `true` if `self` encloses `other` (equal ranges contain each other).
    pub fn contains(&self, other: &TextRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns `true` if `position` lies in `start..=end`.
    pub fn contains_position(&self, position: TextPosition) -> bool {
        self.start <= position && position <= self.end
    }

    /// Half-open overlap test: touching endpoints do not overlap.
    pub fn overlaps(&self, other: &TextRange) -> bool {
        other.start < self.end && self.start < other.end
    }
}

/// A selection: a range plus the cursor (`active`) and the selection origin (`anchor`).
///
/// `active` equals either `start` or `end` depending on the selection direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextSelection {
    /// Range start (inclusive).
    pub start: TextPosition,
    /// Range end (exclusive).
    pub end: TextPosition,
    /// Cursor position.
    pub active: TextPosition,
    /// Position where the selection started.
    pub anchor: TextPosition,
}

impl TextSelection {
    /// Create a selection from its anchor and cursor.
    pub fn new(anchor: TextPosition, active: TextPosition) -> Self {
        let TextRange { start, end } = TextRange::new(anchor, active);
        Self {
            start,
            end,
            active,
            anchor,
        }
    }

    /// A collapsed selection (a caret) at `position`.
    pub fn caret(position: TextPosition) -> Self {
        Self::new(position, position)
    }

    /// The selected range.
    pub fn range(&self) -> TextRange {
        TextRange {
            start: self.start,
            end: self.end,
        }
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if the cursor is before the anchor.
    pub fn is_reversed(&self) -> bool {
        self.active < self.anchor
    }
}
