//! The preview registry.
//!
//! [`PreviewStore`] is a single relation table `(preview, document, editor?, uri)` with three
//! indices. Every mutation goes through this module, which keeps the indices consistent with
//! the table and enforces that a document, an editor and a URI each belong to at most one
//! preview.

use crate::error::PreviewError;
use novel_core::{DocumentId, EditorId};
use std::collections::{BTreeMap, HashMap};

/// Opaque identifier of a preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PreviewId(u64);

impl PreviewId {
    /// Get the underlying numeric id.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// One row of the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewEntry<T> {
    /// Previewed document.
    pub document: DocumentId,
    /// Attached editor, if any.
    pub editor: Option<EditorId>,
    /// Current URI of the document.
    pub uri: String,
    /// Per-preview state owned by the caller.
    pub value: T,
}

/// Registry of open previews, indexed by document, editor and URI.
#[derive(Debug, Clone)]
pub struct PreviewStore<T> {
    next_id: u64,
    entries: BTreeMap<PreviewId, PreviewEntry<T>>,
    by_document: HashMap<DocumentId, PreviewId>,
    by_editor: HashMap<EditorId, PreviewId>,
    by_uri: HashMap<String, PreviewId>,
}

impl<T> Default for PreviewStore<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            entries: BTreeMap::new(),
            by_document: HashMap::new(),
            by_editor: HashMap::new(),
            by_uri: HashMap::new(),
        }
    }
}

impl<T> PreviewStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of previews.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no previews.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register a preview of `document` at `uri`, optionally attached to `editor`.
    ///
    /// An editor attached to another preview is moved to the new one.
    pub fn insert(
        &mut self,
        document: DocumentId,
        uri: impl Into<String>,
        editor: Option<EditorId>,
        value: T,
    ) -> Result<PreviewId, PreviewError> {
        let uri = uri.into();
        if self.by_document.contains_key(&document) {
            return Err(PreviewError::DocumentAlreadyPreviewed(document));
        }
        if self.by_uri.contains_key(&uri) {
            return Err(PreviewError::UriAlreadyPreviewed(uri));
        }

        let id = PreviewId(self.next_id);
        self.next_id += 1;

        self.by_document.insert(document, id);
        self.by_uri.insert(uri.clone(), id);
        self.entries.insert(
            id,
            PreviewEntry {
                document,
                editor: None,
                uri,
                value,
            },
        );

        if let Some(editor) = editor {
            self.set_editor(id, editor)?;
        }

        Ok(id)
    }

    /// Unregister a preview, returning its row.
    pub fn remove(&mut self, id: PreviewId) -> Option<PreviewEntry<T>> {
        let entry = self.entries.remove(&id)?;
        self.by_document.remove(&entry.document);
        self.by_uri.remove(&entry.uri);
        if let Some(editor) = entry.editor {
            self.by_editor.remove(&editor);
        }
        Some(entry)
    }

    /// Look up a preview.
    pub fn get(&self, id: PreviewId) -> Option<&PreviewEntry<T>> {
        self.entries.get(&id)
    }

    /// Look up a preview mutably. Only the caller's value can be changed this way.
    pub fn value_mut(&mut self, id: PreviewId) -> Option<&mut T> {
        self.entries.get_mut(&id).map(|entry| &mut entry.value)
    }

    /// Returns `true` if `id` is registered.
    pub fn contains(&self, id: PreviewId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Preview of `document`.
    pub fn by_document(&self, document: DocumentId) -> Option<PreviewId> {
        self.by_document.get(&document).copied()
    }

    /// Preview attached to `editor`.
    pub fn by_editor(&self, editor: EditorId) -> Option<PreviewId> {
        self.by_editor.get(&editor).copied()
    }

    /// Preview of the document at `uri`.
    pub fn by_uri(&self, uri: &str) -> Option<PreviewId> {
        self.by_uri.get(uri).copied()
    }

    /// Returns `true` if `editor` is attached to some preview.
    pub fn has_editor(&self, editor: EditorId) -> bool {
        self.by_editor.contains_key(&editor)
    }

    /// All preview ids, oldest first.
    pub fn ids(&self) -> Vec<PreviewId> {
        self.entries.keys().copied().collect()
    }

    /// Iterate over `(id, row)` pairs, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = (PreviewId, &PreviewEntry<T>)> {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }

    /// Iterate over `(uri, id)` pairs.
    pub fn uris(&self) -> impl Iterator<Item = (&str, PreviewId)> {
        self.by_uri.iter().map(|(uri, id)| (uri.as_str(), *id))
    }

    /// Change the URI of a preview (the document was renamed).
    pub fn set_uri(&mut self, id: PreviewId, uri: impl Into<String>) -> Result<(), PreviewError> {
        let uri = uri.into();
        if let Some(owner) = self.by_uri.get(&uri)
            && *owner != id
        {
            return Err(PreviewError::UriAlreadyPreviewed(uri));
        }

        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(PreviewError::UnknownPreview(id))?;
        self.by_uri.remove(&entry.uri);
        self.by_uri.insert(uri.clone(), id);
        entry.uri = uri;
        Ok(())
    }

    /// Attach `editor` to a preview, detaching it from any other preview and replacing the
    /// preview's previous editor. Returns the preview the editor was taken from.
    pub fn set_editor(
        &mut self,
        id: PreviewId,
        editor: EditorId,
    ) -> Result<Option<PreviewId>, PreviewError> {
        if !self.entries.contains_key(&id) {
            return Err(PreviewError::UnknownPreview(id));
        }

        let previous_owner = self.by_editor.insert(editor, id).filter(|owner| *owner != id);
        if let Some(owner) = previous_owner
            && let Some(entry) = self.entries.get_mut(&owner)
        {
            entry.editor = None;
        }

        if let Some(entry) = self.entries.get_mut(&id)
            && let Some(old) = entry.editor.replace(editor)
            && old != editor
        {
            self.by_editor.remove(&old);
        }

        Ok(previous_owner)
    }

    /// Detach the editor of a preview, returning it.
    pub fn clear_editor(&mut self, id: PreviewId) -> Option<EditorId> {
        let editor = self.entries.get_mut(&id)?.editor.take()?;
        self.by_editor.remove(&editor);
        Some(editor)
    }
}
