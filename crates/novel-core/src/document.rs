//! Document identity and the host document capability.

use crate::merge::{Line, LineCallbacks, MergeError, Patch, merge};
use crate::position::TextRange;
use crate::text::{char_prefix, char_slice, char_suffix, split_lines};

/// Language id of annotated novel documents.
pub const NOVEL_LANGUAGE_ID: &str = "japanese-novel";

/// Language id of markdown documents.
pub const MARKDOWN_LANGUAGE_ID: &str = "markdown";

/// Opaque, host-assigned identifier of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(u64);

impl DocumentId {
    /// Wrap a host id.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying numeric id.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Opaque, host-assigned identifier of an editor (a view onto a document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EditorId(u64);

impl EditorId {
    /// Wrap a host id.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying numeric id.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Read access to a line-based document owned by the host.
pub trait TextDocument {
    /// Document id.
    fn id(&self) -> DocumentId;

    /// Current URI.
    fn uri(&self) -> &str;

    /// Language id (e.g. [`NOVEL_LANGUAGE_ID`]).
    fn language_id(&self) -> &str;

    /// Number of lines (at least 1).
    fn line_count(&self) -> usize;

    /// Text of line `index` without its line break.
    fn line(&self, index: usize) -> Option<&str>;

    /// Iterate over all lines.
    fn lines(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new((0..self.line_count()).filter_map(move |index| self.line(index)))
    }

    /// Full text, lines joined with `\n`.
    fn text(&self) -> String {
        self.lines().collect::<Vec<_>>().join("\n")
    }

    /// Text inside `range`, lines joined with `\n`. Out-of-range positions are clamped.
    fn text_in_range(&self, range: TextRange) -> String {
        let TextRange { start, end } = range;
        if start.line == end.line {
            return self
                .line(start.line)
                .map(|line| char_slice(line, start.character, end.character).to_string())
                .unwrap_or_default();
        }

        let mut out = String::new();
        if let Some(first) = self.line(start.line) {
            out.push_str(char_suffix(first, start.character));
        }
        for index in start.line + 1..end.line.min(self.line_count()) {
            out.push('\n');
            out.push_str(self.line(index).unwrap_or_default());
        }
        if let Some(last) = self.line(end.line) {
            out.push('\n');
            out.push_str(char_prefix(last, end.character));
        }
        out
    }

    /// Returns `true` for annotated novel documents.
    fn is_novel(&self) -> bool {
        self.language_id() == NOVEL_LANGUAGE_ID
    }
}

struct Untracked;

impl LineCallbacks<()> for Untracked {
    fn create(&mut self, _new_text: &str, _index: usize) {}
    fn update(&mut self, _new_text: &str, _data: &mut (), _old_text: &str, _index: usize) {}
    fn remove(&mut self, _data: (), _old_text: &str, _index: usize) {}
}

/// A document held entirely in memory.
///
/// Useful as a host stand-in and for tests; edits go through the same [`merge`] as every
/// other projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryDocument {
    id: DocumentId,
    uri: String,
    language_id: String,
    lines: Vec<Line<()>>,
}

impl InMemoryDocument {
    /// Create a document from its full text.
    pub fn new(
        id: DocumentId,
        uri: impl Into<String>,
        language_id: impl Into<String>,
        text: &str,
    ) -> Self {
        Self {
            id,
            uri: uri.into(),
            language_id: language_id.into(),
            lines: split_lines(text)
                .into_iter()
                .map(|line| Line::new(line, ()))
                .collect(),
        }
    }

    /// Create a novel document.
    pub fn novel(id: DocumentId, uri: impl Into<String>, text: &str) -> Self {
        Self::new(id, uri, NOVEL_LANGUAGE_ID, text)
    }

    /// Apply a patch batch.
    pub fn apply(&mut self, patches: &[Patch]) -> Result<(), MergeError> {
        merge(&mut self.lines, patches, &mut Untracked)
    }

    /// Change the URI (rename).
    pub fn set_uri(&mut self, uri: impl Into<String>) {
        self.uri = uri.into();
    }

    /// Change the language id.
    pub fn set_language_id(&mut self, language_id: impl Into<String>) {
        self.language_id = language_id.into();
    }
}

impl TextDocument for InMemoryDocument {
    fn id(&self) -> DocumentId {
        self.id
    }

    fn uri(&self) -> &str {
        &self.uri
    }

    fn language_id(&self) -> &str {
        &self.language_id
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(|line| line.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::TextPosition;

    #[test]
    fn test_text_in_range_spans_lines() {
        let doc = InMemoryDocument::novel(DocumentId::new(1), "file:///a.txt", "abc\ndef\nghi");
        let range = TextRange::new(TextPosition::new(0, 1), TextPosition::new(2, 2));
        assert_eq!(doc.text_in_range(range), "bc\ndef\ngh");
        let single = TextRange::new(TextPosition::new(1, 1), TextPosition::new(1, 9));
        assert_eq!(doc.text_in_range(single), "ef");
    }

    #[test]
    fn test_apply_inserts_lines() {
        let mut doc = InMemoryDocument::novel(DocumentId::new(1), "file:///a.txt", "ab");
        doc.apply(&[Patch::insert(TextPosition::new(0, 1), "x\ny")])
            .unwrap();
        assert_eq!(doc.text(), "ax\nyb");
        assert_eq!(doc.line_count(), 2);
    }
}
