//! Host-side preview management.
//!
//! [`PreviewManager`] reacts to host events (document edits, renames, editor focus and
//! visibility, configuration changes, panel state) and keeps every open preview in sync by
//! posting [`HostMessage`]s to its panel. The host itself is never stored: each event handler
//! borrows it through the [`PreviewHost`] capability.
//!
//! A preview is bound to one document for its whole life and to at most one editor at a time.
//! Only an attached preview follows selection and scrolling.

use crate::configuration::{PreviewConfiguration, SheetResolver};
use crate::error::PreviewError;
use crate::protocol::{
    DocumentSnapshot, EditorState, HostMessage, PreviewMessage, PreviewState, Reload,
    ReloadConfiguration,
};
use crate::store::{PreviewEntry, PreviewId, PreviewStore};
use crate::uri::{rebase_uri, uri_path};
use crate::view::CONTAINER_CLASS;
use novel_core::{
    DocumentId, EditorId, Patch, TextDocument, TextRange, TextSelection, escape_html,
};
use serde_json::{Value, json};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Title prefix of preview panels.
pub const PREVIEW_TITLE: &str = "Preview";

/// Where a panel or document is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewColumn {
    /// The active column.
    Active,
    /// The column next to the active one.
    Beside,
    /// A numbered column (1-based).
    Index(u32),
}

/// What the manager needs to know about a host editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSnapshot {
    /// Editor id.
    pub id: EditorId,
    /// Document shown in the editor.
    pub document: DocumentId,
    /// Current selection.
    pub selection: TextSelection,
    /// Visible ranges, top first.
    pub visible_ranges: Vec<TextRange>,
    /// Column the editor is shown in.
    pub view_column: Option<ViewColumn>,
}

/// A file or folder rename reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRename {
    /// URI before the rename.
    pub old_uri: String,
    /// URI after the rename.
    pub new_uri: String,
}

impl FileRename {
    /// Create a rename record.
    pub fn new(old_uri: impl Into<String>, new_uri: impl Into<String>) -> Self {
        Self {
            old_uri: old_uri.into(),
            new_uri: new_uri.into(),
        }
    }
}

/// Context keys the host exposes to its command enablement rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreviewContextKey {
    /// Whether a preview is focused.
    HasActive,
    /// Path of the focused preview's document.
    ActivePath,
    /// Paths of the documents of all visible previews.
    VisiblePaths,
}

impl PreviewContextKey {
    /// Key name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HasActive => "japanese-novel.preview.hasActive",
            Self::ActivePath => "japanese-novel.preview.activePath",
            Self::VisiblePaths => "japanese-novel.preview.visiblePaths",
        }
    }
}

/// Current values of the [`PreviewContextKey`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewContext {
    /// Whether a preview is focused.
    pub has_active: bool,
    /// Path of the focused preview's document, empty if none.
    pub active_path: String,
    /// Paths of the documents of all visible previews, in the order they became visible.
    pub visible_paths: Vec<String>,
}

/// A preview panel (webview) owned by the manager.
pub trait PreviewPanel {
    /// Post a message to the preview; `false` if it could not be delivered.
    fn post_message(&mut self, message: &HostMessage) -> bool;

    /// Set the panel title.
    fn set_title(&mut self, title: &str);

    /// Replace the panel's HTML.
    fn set_html(&mut self, html: &str);

    /// Bring the panel to front.
    fn reveal(&mut self, column: Option<ViewColumn>);

    /// Close the panel.
    fn dispose(&mut self);

    /// Whether the panel has focus.
    fn is_active(&self) -> bool;

    /// Whether the panel is visible.
    fn is_visible(&self) -> bool;
}

/// Editor host capabilities used by the manager.
pub trait PreviewHost: SheetResolver {
    /// Panel type created by this host.
    type Panel: PreviewPanel;

    /// Open a new, empty preview panel.
    fn create_panel(&mut self, column: ViewColumn) -> Self::Panel;

    /// An open document.
    fn document(&self, id: DocumentId) -> Option<&dyn TextDocument>;

    /// Open (load) the document at `uri`.
    fn open_document(&mut self, uri: &str) -> Result<DocumentId, PreviewError>;

    /// An open editor.
    fn editor(&self, id: EditorId) -> Option<EditorSnapshot>;

    /// The focused editor.
    fn active_editor(&self) -> Option<EditorId>;

    /// All visible editors.
    fn visible_editors(&self) -> Vec<EditorId>;

    /// Scroll `editor` so that `range` is visible.
    fn reveal_range(&mut self, editor: EditorId, range: TextRange);

    /// Show `document` in an editor.
    fn show_document(&mut self, document: DocumentId, column: Option<ViewColumn>);

    /// URI of the preview script loaded by the panel HTML.
    fn script_uri(&self) -> String;

    /// Update a context value.
    fn set_context(&mut self, key: PreviewContextKey, value: Value);

    /// Path of `uri` as shown in titles, relative to the workspace when possible.
    fn relative_path(&self, uri: &str) -> String {
        uri_path(uri)
    }
}

/// Per-preview state kept in the store.
#[derive(Debug)]
pub struct PreviewSlot<P> {
    panel: P,
    active: bool,
    visible: bool,
    skip_visible_ranges: bool,
    selected_line: Option<usize>,
}

impl<P: PreviewPanel> PreviewSlot<P> {
    /// The preview's panel.
    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// Whether the panel has focus.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the panel is visible.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    fn post(&mut self, id: PreviewId, message: HostMessage) {
        if !self.panel.post_message(&message) {
            warn!(preview = id.get(), kind = message.kind(), "preview message not delivered");
        }
    }
}

fn loading_page(script_uri: &str) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>",
            r#"<html lang="en">"#,
            "<head>",
            r#"<meta charset="utf-8">"#,
            r#"<meta name="viewport" content="width=device-width,initial-scale=1.0">"#,
            "<title>{title}</title>",
            r#"<script defer src="{src}"></script>"#,
            "</head>",
            "<body>",
            r#"<div class="{container}"><p>Loading preview...</p></div>"#,
            "</body>",
            "</html>",
        ),
        title = PREVIEW_TITLE,
        src = escape_html(script_uri),
        container = CONTAINER_CLASS,
    )
}

fn title<H: PreviewHost + ?Sized>(host: &H, uri: &str) -> String {
    format!("{PREVIEW_TITLE} {}", host.relative_path(uri))
}

fn ensure_novel<H: PreviewHost + ?Sized>(host: &H, id: DocumentId) -> Result<(), PreviewError> {
    let document = host.document(id).ok_or(PreviewError::UnknownDocument(id))?;
    if document.is_novel() {
        return Ok(());
    }
    Err(PreviewError::InvalidLanguage {
        uri: document.uri().to_string(),
        language_id: document.language_id().to_string(),
    })
}

fn is_novel<H: PreviewHost + ?Sized>(host: &H, id: DocumentId) -> bool {
    host.document(id).is_some_and(|document| document.is_novel())
}

/// The active editor if it shows `uri`, else the first visible editor that does.
fn find_editor_by_uri<H: PreviewHost + ?Sized>(host: &H, uri: &str) -> Option<EditorSnapshot> {
    let shows_uri = |snapshot: &EditorSnapshot| {
        host.document(snapshot.document)
            .is_some_and(|document| document.uri() == uri)
    };

    host.active_editor()
        .into_iter()
        .chain(host.visible_editors())
        .filter_map(|id| host.editor(id))
        .find(|snapshot| shows_uri(snapshot))
}

/// Keeps previews in sync with their documents and editors.
#[derive(Debug)]
pub struct PreviewManager<P> {
    configuration: PreviewConfiguration,
    store: PreviewStore<PreviewSlot<P>>,
    active_preview: Option<PreviewId>,
    visible_previews: Vec<PreviewId>,
    context: PreviewContext,
}

impl<P: PreviewPanel> PreviewManager<P> {
    /// Create a manager with no previews.
    pub fn new(configuration: PreviewConfiguration) -> Self {
        Self {
            configuration,
            store: PreviewStore::new(),
            active_preview: None,
            visible_previews: Vec::new(),
            context: PreviewContext::default(),
        }
    }

    /// Publish the initial context values.
    pub fn activate<H: PreviewHost<Panel = P>>(&mut self, host: &mut H) {
        self.context = PreviewContext::default();
        host.set_context(PreviewContextKey::HasActive, json!(false));
        host.set_context(PreviewContextKey::ActivePath, json!(""));
        host.set_context(PreviewContextKey::VisiblePaths, json!([]));
    }

    /// Close every preview.
    pub fn deactivate<H: PreviewHost<Panel = P>>(&mut self, host: &mut H) {
        for id in self.store.ids() {
            if let Some(mut panel) = self.teardown(host, id) {
                panel.dispose();
            }
        }
    }

    /// Current configuration.
    pub fn configuration(&self) -> &PreviewConfiguration {
        &self.configuration
    }

    /// The registry.
    pub fn store(&self) -> &PreviewStore<PreviewSlot<P>> {
        &self.store
    }

    /// Current context values.
    pub fn context(&self) -> &PreviewContext {
        &self.context
    }

    /// The focused preview.
    pub fn active_preview(&self) -> Option<PreviewId> {
        self.active_preview
    }

    /// Visible previews, in the order they became visible.
    pub fn visible_previews(&self) -> &[PreviewId] {
        &self.visible_previews
    }

    fn entry(&self, id: PreviewId) -> Result<&PreviewEntry<PreviewSlot<P>>, PreviewError> {
        self.store.get(id).ok_or(PreviewError::UnknownPreview(id))
    }

    fn slot_mut(&mut self, id: PreviewId) -> Result<&mut PreviewSlot<P>, PreviewError> {
        self.store
            .value_mut(id)
            .ok_or(PreviewError::UnknownPreview(id))
    }

    // Lifecycle

    fn create<H: PreviewHost<Panel = P>>(
        &mut self,
        host: &mut H,
        document: DocumentId,
        editor: Option<EditorId>,
        mut panel: P,
    ) -> Result<PreviewId, PreviewError> {
        let uri = host
            .document(document)
            .ok_or(PreviewError::UnknownDocument(document))?
            .uri()
            .to_string();

        panel.set_title(&title(&*host, &uri));
        panel.set_html(&loading_page(&host.script_uri()));

        let (active, visible) = (panel.is_active(), panel.is_visible());
        let slot = PreviewSlot {
            panel,
            active: false,
            visible: false,
            skip_visible_ranges: false,
            selected_line: None,
        };
        let id = self.store.insert(document, uri.as_str(), editor, slot)?;
        debug!(preview = id.get(), document = document.get(), %uri, "created preview");

        self.set_active(host, id, active);
        self.set_visible(host, id, visible);
        Ok(id)
    }

    /// Remove a preview from the registry, returning its panel.
    fn teardown<H: PreviewHost<Panel = P>>(&mut self, host: &mut H, id: PreviewId) -> Option<P> {
        self.visible_previews.retain(|visible| *visible != id);
        if self.active_preview == Some(id) {
            self.active_preview = None;
        }
        let entry = self.store.remove(id)?;
        self.refresh_context(host);
        debug!(preview = id.get(), uri = %entry.uri, "closed preview");
        Some(entry.value.panel)
    }

    /// The user closed a panel.
    pub fn did_dispose_panel<H: PreviewHost<Panel = P>>(&mut self, host: &mut H, id: PreviewId) {
        self.teardown(host, id);
    }

    /// A panel gained or lost focus or visibility.
    pub fn did_change_view_state<H: PreviewHost<Panel = P>>(
        &mut self,
        host: &mut H,
        id: PreviewId,
        active: bool,
        visible: bool,
    ) {
        let Some(slot) = self.store.get(id).map(|entry| &entry.value) else {
            return;
        };
        let (was_active, was_visible) = (slot.active, slot.visible);
        if active != was_active {
            self.set_active(host, id, active);
        }
        if visible != was_visible {
            self.set_visible(host, id, visible);
        }
    }

    fn set_active<H: PreviewHost<Panel = P>>(&mut self, host: &mut H, id: PreviewId, value: bool) {
        let Some(slot) = self.store.value_mut(id) else {
            return;
        };
        slot.active = value;
        if value {
            self.active_preview = Some(id);
        } else if self.active_preview == Some(id) {
            self.active_preview = None;
        }
        self.refresh_context(host);
    }

    fn set_visible<H: PreviewHost<Panel = P>>(&mut self, host: &mut H, id: PreviewId, value: bool) {
        let Some(slot) = self.store.value_mut(id) else {
            return;
        };
        slot.visible = value;
        self.visible_previews.retain(|visible| *visible != id);
        if value {
            self.visible_previews.push(id);
        }
        self.refresh_context(host);
    }

    fn refresh_context<H: PreviewHost<Panel = P>>(&mut self, host: &mut H) {
        let path = |id: PreviewId| self.store.get(id).map(|entry| uri_path(&entry.uri));
        let active_path = self.active_preview.and_then(path);
        let next = PreviewContext {
            has_active: active_path.is_some(),
            active_path: active_path.unwrap_or_default(),
            visible_paths: self.visible_previews.iter().filter_map(|id| path(*id)).collect(),
        };

        if next.has_active != self.context.has_active {
            host.set_context(PreviewContextKey::HasActive, json!(next.has_active));
        }
        if next.active_path != self.context.active_path {
            host.set_context(PreviewContextKey::ActivePath, json!(next.active_path));
        }
        if next.visible_paths != self.context.visible_paths {
            host.set_context(PreviewContextKey::VisiblePaths, json!(next.visible_paths));
        }
        self.context = next;
    }

    // Editor binding

    fn attach(&mut self, id: PreviewId, snapshot: &EditorSnapshot) -> Result<(), PreviewError> {
        if let Some(previous) = self.store.set_editor(id, snapshot.id)?
            && let Some(slot) = self.store.value_mut(previous)
        {
            slot.selected_line = None;
            slot.post(previous, HostMessage::SelectionChange { selection: None });
        }

        debug!(preview = id.get(), editor = snapshot.id.get(), "attached editor");
        let slot = self.slot_mut(id)?;
        slot.selected_line = Some(snapshot.selection.active.line);
        slot.post(
            id,
            HostMessage::SelectionChange {
                selection: Some(snapshot.selection),
            },
        );
        self.update_visible_ranges(id, &snapshot.visible_ranges);
        Ok(())
    }

    fn detach(&mut self, id: PreviewId) {
        let Some(editor) = self.store.clear_editor(id) else {
            return;
        };
        debug!(preview = id.get(), editor = editor.get(), "detached editor");
        if let Some(slot) = self.store.value_mut(id) {
            slot.selected_line = None;
            slot.post(id, HostMessage::SelectionChange { selection: None });
        }
    }

    fn update_visible_ranges(&mut self, id: PreviewId, ranges: &[TextRange]) {
        let Some(slot) = self.store.value_mut(id) else {
            return;
        };
        if slot.skip_visible_ranges {
            slot.skip_visible_ranges = false;
            return;
        }
        slot.post(
            id,
            HostMessage::VisibleRangesChange {
                visible_ranges: ranges.to_vec(),
            },
        );
    }

    /// The focused editor changed. A preview of its document without an editor picks it up.
    pub fn did_change_active_editor<H: PreviewHost<Panel = P>>(
        &mut self,
        host: &mut H,
        editor: Option<EditorId>,
    ) -> Result<(), PreviewError> {
        let Some(snapshot) = editor.and_then(|editor| host.editor(editor)) else {
            return Ok(());
        };
        if !is_novel(&*host, snapshot.document) || self.store.has_editor(snapshot.id) {
            return Ok(());
        }
        match self.store.by_document(snapshot.document) {
            Some(id) => self.attach(id, &snapshot),
            None => Ok(()),
        }
    }

    /// The set of visible editors changed.
    ///
    /// Every preview whose document is shown in a visible editor is attached to one of them,
    /// keeping its current editor when that one is still visible. Previews whose editor is no
    /// longer visible (or no longer shows a novel) are detached.
    pub fn did_change_visible_editors<H: PreviewHost<Panel = P>>(
        &mut self,
        host: &mut H,
        editors: &[EditorId],
    ) -> Result<(), PreviewError> {
        let mut settled = HashSet::new();

        for &editor in editors {
            let Some(snapshot) = host.editor(editor) else {
                continue;
            };

            if !is_novel(&*host, snapshot.document) {
                if let Some(id) = self.store.by_editor(editor) {
                    self.detach(id);
                }
                continue;
            }

            let Some(id) = self.store.by_document(snapshot.document) else {
                continue;
            };
            if !settled.insert(id) {
                continue;
            }

            let current = self.entry(id)?.editor;
            let keeps_current = current.is_some_and(|current| {
                editors.contains(&current)
                    && host
                        .editor(current)
                        .is_some_and(|other| other.document == snapshot.document)
            });
            if current != Some(editor) && !keeps_current {
                self.attach(id, &snapshot)?;
            }
        }

        let stale: Vec<PreviewId> = self
            .store
            .iter()
            .filter(|(_, entry)| entry.editor.is_some_and(|editor| !editors.contains(&editor)))
            .map(|(id, _)| id)
            .collect();
        for id in stale {
            self.detach(id);
        }
        Ok(())
    }

    /// The selection of `editor` changed.
    pub fn did_change_selection(&mut self, editor: EditorId, selection: TextSelection) {
        let Some(id) = self.store.by_editor(editor) else {
            return;
        };
        let Some(slot) = self.store.value_mut(id) else {
            return;
        };
        let line = selection.active.line;
        if slot.selected_line == Some(line) {
            return;
        }
        slot.selected_line = Some(line);
        slot.post(
            id,
            HostMessage::SelectionChange {
                selection: Some(selection),
            },
        );
    }

    /// `editor` scrolled.
    pub fn did_change_visible_ranges(&mut self, editor: EditorId, ranges: &[TextRange]) {
        if let Some(id) = self.store.by_editor(editor) {
            self.update_visible_ranges(id, ranges);
        }
    }

    // Documents

    /// `document` was edited; `patches` are the change event's content changes, in order.
    pub fn did_change_document(&mut self, document: &dyn TextDocument, patches: &[Patch]) {
        if !document.is_novel() || patches.is_empty() {
            return;
        }
        let Some(id) = self.store.by_document(document.id()) else {
            return;
        };
        if let Some(slot) = self.store.value_mut(id) {
            slot.post(
                id,
                HostMessage::Patch {
                    patches: patches.to_vec(),
                },
            );
        }
    }

    /// `document` was closed; its preview closes too.
    pub fn did_close_document<H: PreviewHost<Panel = P>>(
        &mut self,
        host: &mut H,
        document: DocumentId,
    ) {
        let Some(id) = self.store.by_document(document) else {
            return;
        };
        if let Some(mut panel) = self.teardown(host, id) {
            panel.dispose();
        }
    }

    /// Files or folders were renamed.
    ///
    /// A previewed file is rebound to its new URI; for a folder, every previewed document
    /// inside it is.
    pub fn did_rename_files<H: PreviewHost<Panel = P>>(
        &mut self,
        host: &mut H,
        renames: &[FileRename],
    ) -> Result<(), PreviewError> {
        for rename in renames {
            if let Some(id) = self.store.by_uri(&rename.old_uri) {
                self.rename(host, id, rename.new_uri.clone())?;
                continue;
            }

            let moved: Vec<(PreviewId, String)> = self
                .store
                .uris()
                .filter_map(|(uri, id)| {
                    rebase_uri(uri, &rename.old_uri, &rename.new_uri).map(|uri| (id, uri))
                })
                .collect();
            for (id, uri) in moved {
                self.rename(host, id, uri)?;
            }
        }
        self.refresh_context(host);
        Ok(())
    }

    fn rename<H: PreviewHost<Panel = P>>(
        &mut self,
        host: &mut H,
        id: PreviewId,
        uri: String,
    ) -> Result<(), PreviewError> {
        self.store.set_uri(id, uri.as_str())?;
        debug!(preview = id.get(), %uri, "renamed preview document");
        let title = title(&*host, &uri);
        let slot = self.slot_mut(id)?;
        slot.panel.set_title(&title);
        slot.post(id, HostMessage::UriChange { uri });
        Ok(())
    }

    // Configuration

    /// The `preview` settings changed. Previews are only told about values that differ.
    pub fn did_change_configuration<H: PreviewHost<Panel = P>>(
        &mut self,
        host: &mut H,
        configuration: PreviewConfiguration,
    ) {
        let PreviewConfiguration { layout, style } = configuration;

        if layout != self.configuration.layout {
            debug!(orientation = %layout.orientation, "preview orientation changed");
            let orientation = layout.orientation;
            self.configuration.layout = layout;
            for id in self.store.ids() {
                if let Some(slot) = self.store.value_mut(id) {
                    slot.post(id, HostMessage::OrientationChange { orientation });
                }
            }
        }

        if style != self.configuration.style {
            debug!("preview style changed");
            self.configuration.style = style;
            for id in self.store.ids() {
                let Some(uri) = self.store.get(id).map(|entry| entry.uri.clone()) else {
                    continue;
                };
                let style = self.configuration.style.build_style(&*host, &uri);
                let message = HostMessage::StyleChange(style);
                if let Some(slot) = self.store.value_mut(id) {
                    slot.post(id, message);
                }
            }
        }
    }

    // Preview messages

    /// Handle a message posted by a preview.
    pub fn did_receive_message<H: PreviewHost<Panel = P>>(
        &mut self,
        host: &mut H,
        id: PreviewId,
        message: PreviewMessage,
    ) -> Result<(), PreviewError> {
        match message {
            PreviewMessage::RequestReload => self.reload(host, id),
            PreviewMessage::RequestRevealEditor { range } => {
                let Some(editor) = self.entry(id)?.editor else {
                    return Ok(());
                };
                self.slot_mut(id)?.skip_visible_ranges = true;
                host.reveal_range(editor, range);
                Ok(())
            }
        }
    }

    /// Decode and handle a JSON message posted by a preview.
    pub fn did_receive_json<H: PreviewHost<Panel = P>>(
        &mut self,
        host: &mut H,
        id: PreviewId,
        json: &str,
    ) -> Result<(), PreviewError> {
        let message = PreviewMessage::from_json(json).inspect_err(|err| {
            warn!(preview = id.get(), %err, "dropping invalid preview message");
        })?;
        self.did_receive_message(host, id, message)
    }

    /// Send a full snapshot to a preview.
    pub fn reload<H: PreviewHost<Panel = P>>(
        &mut self,
        host: &mut H,
        id: PreviewId,
    ) -> Result<(), PreviewError> {
        let entry = self.entry(id)?;
        let document = host
            .document(entry.document)
            .ok_or(PreviewError::UnknownDocument(entry.document))?;
        let lines = document.lines().map(str::to_string).collect();
        let editor = entry
            .editor
            .and_then(|editor| host.editor(editor))
            .map(|snapshot| EditorState {
                selection: snapshot.selection,
                visible_ranges: snapshot.visible_ranges,
            });
        let reload = Reload {
            document: DocumentSnapshot {
                uri: entry.uri.clone(),
                lines,
            },
            editor,
            configuration: ReloadConfiguration {
                orientation: self.configuration.layout.orientation,
                style: self.configuration.style.build_style(&*host, &entry.uri),
            },
        };

        let slot = self.slot_mut(id)?;
        slot.selected_line = reload
            .editor
            .as_ref()
            .map(|editor| editor.selection.active.line);
        slot.post(id, HostMessage::Reload(reload));
        Ok(())
    }

    // Commands

    /// Open (or reveal) the preview of the document at `uri`.
    ///
    /// A new panel opens beside the editor when the document is in the focused editor, in the
    /// active column otherwise.
    pub fn open<H: PreviewHost<Panel = P>>(
        &mut self,
        host: &mut H,
        uri: &str,
    ) -> Result<PreviewId, PreviewError> {
        if let Some(id) = self.store.by_uri(uri) {
            self.slot_mut(id)?.panel.reveal(None);
            return Ok(id);
        }

        let editor = find_editor_by_uri(&*host, uri);
        let document = match &editor {
            Some(snapshot) => snapshot.document,
            None => host.open_document(uri)?,
        };
        ensure_novel(&*host, document)?;

        if let Some(id) = self.store.by_document(document) {
            self.slot_mut(id)?.panel.reveal(None);
            if let Some(snapshot) = &editor
                && self.entry(id)?.editor != Some(snapshot.id)
            {
                self.attach(id, snapshot)?;
            }
            return Ok(id);
        }

        let focused = editor
            .as_ref()
            .is_some_and(|snapshot| host.active_editor() == Some(snapshot.id));
        let column = if focused {
            ViewColumn::Beside
        } else {
            ViewColumn::Active
        };
        let panel = host.create_panel(column);
        self.create(host, document, editor.map(|snapshot| snapshot.id), panel)
    }

    /// Open (or reveal) the preview of `editor`'s document beside it.
    pub fn open_to_side<H: PreviewHost<Panel = P>>(
        &mut self,
        host: &mut H,
        editor: EditorId,
    ) -> Result<PreviewId, PreviewError> {
        let snapshot = host.editor(editor).ok_or(PreviewError::UnknownEditor(editor))?;
        ensure_novel(&*host, snapshot.document)?;

        if let Some(id) = self.store.by_document(snapshot.document) {
            self.slot_mut(id)?.panel.reveal(Some(ViewColumn::Beside));
            if self.entry(id)?.editor != Some(editor) {
                self.attach(id, &snapshot)?;
            }
            return Ok(id);
        }

        let panel = host.create_panel(ViewColumn::Beside);
        self.create(host, snapshot.document, Some(editor), panel)
    }

    /// Rebuild a preview from a panel restored by the host with its persisted state.
    pub fn restore<H: PreviewHost<Panel = P>>(
        &mut self,
        host: &mut H,
        panel: P,
        state: PreviewState,
    ) -> Result<PreviewId, PreviewError> {
        let editor = find_editor_by_uri(&*host, &state.uri);
        let document = match &editor {
            Some(snapshot) => snapshot.document,
            None => host.open_document(&state.uri)?,
        };
        ensure_novel(&*host, document)?;
        self.create(host, document, editor.map(|snapshot| snapshot.id), panel)
    }

    /// Show the focused preview's document, in its editor's column if attached.
    pub fn open_source<H: PreviewHost<Panel = P>>(&mut self, host: &mut H) -> Option<DocumentId> {
        let entry = self.store.get(self.active_preview?)?;
        let column = entry
            .editor
            .and_then(|editor| host.editor(editor))
            .and_then(|snapshot| snapshot.view_column);
        let document = entry.document;
        host.show_document(document, column);
        Some(document)
    }
}
