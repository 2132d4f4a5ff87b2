//! Character counter projection.
//!
//! [`CounterState`] mirrors a document as `Vec<Line<usize>>` (each line's text plus its
//! cached count) and keeps a running total, so [`CounterState::current`] is O(1) and
//! [`CounterState::current_in_range`] only re-counts the two boundary lines of a range.

use crate::annotation::to_plain;
use crate::document::{DocumentId, TextDocument};
use crate::merge::{Line, LineCallbacks, MergeError, Patch, merge};
use crate::position::{TextRange, TextSelection};
use crate::text::{char_prefix, char_slice, char_suffix};
use std::collections::HashMap;
use tracing::debug;

/// Counts the characters of a single line.
pub trait Counter {
    /// Count `text`.
    fn count(&self, text: &str) -> usize;
}

/// Counts the Unicode scalar values of the plain text, ignoring whitespace.
///
/// Annotation markup and ruby text are not counted; base text and emphasized text are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharacterCounter;

impl Counter for CharacterCounter {
    fn count(&self, text: &str) -> usize {
        to_plain(text).chars().filter(|ch| !ch.is_whitespace()).count()
    }
}

/// Cached per-line counts of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterState {
    count: usize,
    lines: Vec<Line<usize>>,
}

struct Counting<'a, C: ?Sized> {
    counter: &'a C,
    count: usize,
}

impl<C: Counter + ?Sized> LineCallbacks<usize> for Counting<'_, C> {
    fn create(&mut self, new_text: &str, _index: usize) -> usize {
        let data = self.counter.count(new_text);
        self.count += data;
        data
    }

    fn update(&mut self, new_text: &str, data: &mut usize, _old_text: &str, _index: usize) {
        self.count -= *data;
        *data = self.counter.count(new_text);
        self.count += *data;
    }

    fn remove(&mut self, data: usize, _old_text: &str, _index: usize) {
        self.count -= data;
    }
}

impl CounterState {
    /// Count every line once.
    pub fn from_lines<C, I, S>(counter: &C, lines: I) -> Self
    where
        C: Counter + ?Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut count = 0;
        let lines = lines
            .into_iter()
            .map(|text| {
                let text = text.into();
                let data = counter.count(&text);
                count += data;
                Line::new(text, data)
            })
            .collect();
        Self { count, lines }
    }

    /// Count every line of `document`.
    pub fn from_document<C, D>(counter: &C, document: &D) -> Self
    where
        C: Counter + ?Sized,
        D: TextDocument + ?Sized,
    {
        Self::from_lines(counter, document.lines())
    }

    /// Total count of the document.
    pub fn current(&self) -> usize {
        self.count
    }

    /// Count of the text inside `range`.
    ///
    /// Interior lines of a multi-line range use their cached counts. Lines past the end of
    /// the document count as empty.
    pub fn current_in_range<C: Counter + ?Sized>(&self, counter: &C, range: TextRange) -> usize {
        let TextRange { start, end } = range;
        let text_of = |line: usize| self.lines.get(line).map_or("", |line| line.text.as_str());

        if range.is_single_line() {
            return counter.count(char_slice(
                text_of(start.line),
                start.character,
                end.character,
            ));
        }

        let first = counter.count(char_suffix(text_of(start.line), start.character));
        let interior: usize = self
            .lines
            .iter()
            .take(end.line)
            .skip(start.line + 1)
            .map(|line| line.data)
            .sum();
        let last = counter.count(char_prefix(text_of(end.line), end.character));

        first + interior + last
    }

    /// Apply a patch batch, keeping the total current.
    pub fn update<C: Counter + ?Sized>(
        &mut self,
        counter: &C,
        patches: &[Patch],
    ) -> Result<(), MergeError> {
        let mut counting = Counting {
            counter,
            count: self.count,
        };
        let result = merge(&mut self.lines, patches, &mut counting);
        self.count = counting.count;
        result
    }

    /// Drop all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.count = 0;
    }

    /// Number of tracked lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Status bar text for a count (`"1 char"`, `"12 chars"`).
pub fn format_count(count: usize) -> String {
    if count > 1 {
        format!("{count} chars")
    } else {
        format!("{count} char")
    }
}

/// One [`CounterState`] per open novel document.
#[derive(Debug, Default)]
pub struct CounterManager<C = CharacterCounter> {
    counter: C,
    states: HashMap<DocumentId, CounterState>,
}

impl<C: Counter> CounterManager<C> {
    /// Create an empty manager.
    pub fn new(counter: C) -> Self {
        Self {
            counter,
            states: HashMap::new(),
        }
    }

    /// The counter in use.
    pub fn counter(&self) -> &C {
        &self.counter
    }

    /// State for `document`, counted on first access.
    pub fn state_for<D: TextDocument + ?Sized>(&mut self, document: &D) -> &CounterState {
        let counter = &self.counter;
        self.states
            .entry(document.id())
            .or_insert_with(|| CounterState::from_document(counter, document))
    }

    /// Returns `true` if `id` is tracked.
    pub fn is_tracking(&self, id: DocumentId) -> bool {
        self.states.contains_key(&id)
    }

    /// Apply a document change event. Untracked documents are ignored.
    ///
    /// When the patches do not fit the cached lines the state is dropped and recounted on next
    /// access.
    pub fn did_change_document(
        &mut self,
        id: DocumentId,
        patches: &[Patch],
    ) -> Result<(), MergeError> {
        let Some(state) = self.states.get_mut(&id) else {
            return Ok(());
        };

        if let Err(err) = state.update(&self.counter, patches) {
            debug!(document = id.get(), %err, "dropping out-of-sync counter state");
            self.states.remove(&id);
            return Err(err);
        }

        Ok(())
    }

    /// Forget `id`.
    pub fn did_close_document(&mut self, id: DocumentId) {
        if let Some(mut state) = self.states.remove(&id) {
            state.clear();
        }
    }

    /// Status bar text for `document`, or `None` when the counter should be hidden.
    ///
    /// The first selection decides: an empty (or missing) selection shows the document total,
    /// a non-empty one shows the count inside it.
    pub fn status_text<D: TextDocument + ?Sized>(
        &mut self,
        document: &D,
        selections: &[TextSelection],
    ) -> Option<String> {
        if !document.is_novel() {
            return None;
        }

        let counter = &self.counter;
        let state = self
            .states
            .entry(document.id())
            .or_insert_with(|| CounterState::from_document(counter, document));

        let count = match selections.first() {
            Some(selection) if !selection.is_empty() => {
                state.current_in_range(counter, selection.range())
            }
            _ => state.current(),
        };

        Some(format_count(count))
    }
}
