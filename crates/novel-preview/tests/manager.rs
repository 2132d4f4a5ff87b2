use novel_core::{
    DocumentId, EditorId, InMemoryDocument, NotificationId, Patch, TextDocument, TextPosition,
    TextRange, TextSelection,
};
use novel_preview::{
    DocumentSnapshot, EditorSnapshot, EditorState, FileRename, HostMessage, Orientation,
    PreviewConfiguration, PreviewContext, PreviewContextKey, PreviewError, PreviewHost,
    PreviewId, PreviewManager, PreviewMessage, PreviewPanel, PreviewState, PreviewStyle, Reload,
    ReloadConfiguration, SheetResolver, ViewColumn,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

const DEFAULT_SHEET: &str = "webview://ext/media/preview.css";

#[derive(Debug, Default)]
struct PanelRecord {
    column: Option<ViewColumn>,
    title: String,
    html: String,
    messages: Vec<HostMessage>,
    reveals: Vec<Option<ViewColumn>>,
    disposed: bool,
}

#[derive(Debug)]
struct MockPanel {
    record: Rc<RefCell<PanelRecord>>,
    active: bool,
    visible: bool,
}

impl PreviewPanel for MockPanel {
    fn post_message(&mut self, message: &HostMessage) -> bool {
        self.record.borrow_mut().messages.push(message.clone());
        true
    }

    fn set_title(&mut self, title: &str) {
        self.record.borrow_mut().title = title.to_string();
    }

    fn set_html(&mut self, html: &str) {
        self.record.borrow_mut().html = html.to_string();
    }

    fn reveal(&mut self, column: Option<ViewColumn>) {
        self.record.borrow_mut().reveals.push(column);
    }

    fn dispose(&mut self) {
        self.record.borrow_mut().disposed = true;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

struct MockHost {
    documents: Vec<InMemoryDocument>,
    editors: Vec<EditorSnapshot>,
    active_editor: Option<EditorId>,
    visible_editors: Vec<EditorId>,
    panels: Vec<Rc<RefCell<PanelRecord>>>,
    panel_active: bool,
    context: HashMap<String, Value>,
    revealed: Vec<(EditorId, TextRange)>,
    shown: Vec<(DocumentId, Option<ViewColumn>)>,
}

fn pos(line: usize, character: usize) -> TextPosition {
    TextPosition::new(line, character)
}

fn doc(id: u64) -> DocumentId {
    DocumentId::new(id)
}

fn editor(id: u64) -> EditorId {
    EditorId::new(id)
}

impl MockHost {
    /// `a.txt` (1) is shown in the focused editor 10, `notes.md` (2) is not a novel and
    /// `b.txt` (3) is open without an editor.
    fn new() -> Self {
        let mut host = Self {
            documents: vec![
                InMemoryDocument::novel(doc(1), "file:///ws/a.txt", "一行目\n二行目\n三行目"),
                InMemoryDocument::new(doc(2), "file:///ws/notes.md", "markdown", "# notes"),
                InMemoryDocument::novel(doc(3), "file:///ws/b.txt", "b"),
            ],
            editors: Vec::new(),
            active_editor: None,
            visible_editors: Vec::new(),
            panels: Vec::new(),
            panel_active: true,
            context: HashMap::new(),
            revealed: Vec::new(),
            shown: Vec::new(),
        };
        host.add_editor(10, 1, pos(1, 0));
        host.active_editor = Some(editor(10));
        host
    }

    fn add_document(&mut self, id: u64, uri: &str) {
        self.documents.push(InMemoryDocument::novel(doc(id), uri, "text"));
    }

    fn add_editor(&mut self, id: u64, document: u64, cursor: TextPosition) {
        self.editors.push(EditorSnapshot {
            id: editor(id),
            document: doc(document),
            selection: TextSelection::caret(cursor),
            visible_ranges: vec![TextRange::new(pos(0, 0), pos(2, 0))],
            view_column: Some(ViewColumn::Index(1)),
        });
        self.visible_editors.push(editor(id));
    }

    fn panel(&self, index: usize) -> Ref<'_, PanelRecord> {
        self.panels[index].borrow()
    }

    fn messages(&self, index: usize) -> Vec<HostMessage> {
        self.panel(index).messages.clone()
    }
}

impl SheetResolver for MockHost {
    fn default_sheet(&self) -> String {
        DEFAULT_SHEET.to_string()
    }

    fn preview_uri(&self, uri: &str) -> Option<String> {
        uri.strip_prefix("file://")
            .map(|path| format!("webview://{path}"))
    }

    fn workspace_folder(&self, _document_uri: &str) -> Option<String> {
        Some("file:///ws".to_string())
    }
}

impl PreviewHost for MockHost {
    type Panel = MockPanel;

    fn create_panel(&mut self, column: ViewColumn) -> MockPanel {
        let record = Rc::new(RefCell::new(PanelRecord {
            column: Some(column),
            ..Default::default()
        }));
        self.panels.push(record.clone());
        MockPanel {
            record,
            active: self.panel_active,
            visible: true,
        }
    }

    fn document(&self, id: DocumentId) -> Option<&dyn TextDocument> {
        self.documents
            .iter()
            .find(|document| document.id() == id)
            .map(|document| document as &dyn TextDocument)
    }

    fn open_document(&mut self, uri: &str) -> Result<DocumentId, PreviewError> {
        self.documents
            .iter()
            .find(|document| document.uri() == uri)
            .map(|document| document.id())
            .ok_or_else(|| PreviewError::OpenFailed {
                uri: uri.to_string(),
                message: "file not found".to_string(),
            })
    }

    fn editor(&self, id: EditorId) -> Option<EditorSnapshot> {
        self.editors.iter().find(|editor| editor.id == id).cloned()
    }

    fn active_editor(&self) -> Option<EditorId> {
        self.active_editor
    }

    fn visible_editors(&self) -> Vec<EditorId> {
        self.visible_editors.clone()
    }

    fn reveal_range(&mut self, editor: EditorId, range: TextRange) {
        self.revealed.push((editor, range));
    }

    fn show_document(&mut self, document: DocumentId, column: Option<ViewColumn>) {
        self.shown.push((document, column));
    }

    fn script_uri(&self) -> String {
        "webview://ext/media/preview.js".to_string()
    }

    fn set_context(&mut self, key: PreviewContextKey, value: Value) {
        self.context.insert(key.as_str().to_string(), value);
    }

    fn relative_path(&self, uri: &str) -> String {
        uri.strip_prefix("file:///ws/").unwrap_or(uri).to_string()
    }
}

fn setup() -> (MockHost, PreviewManager<MockPanel>) {
    let mut host = MockHost::new();
    let mut manager = PreviewManager::new(PreviewConfiguration::default());
    manager.activate(&mut host);
    (host, manager)
}

fn open_a(host: &mut MockHost, manager: &mut PreviewManager<MockPanel>) -> PreviewId {
    manager.open(host, "file:///ws/a.txt").unwrap()
}

#[test]
fn test_activate_publishes_initial_context() {
    let (host, manager) = setup();
    assert_eq!(manager.context(), &PreviewContext::default());
    assert_eq!(host.context["japanese-novel.preview.hasActive"], json!(false));
    assert_eq!(host.context["japanese-novel.preview.activePath"], json!(""));
    assert_eq!(host.context["japanese-novel.preview.visiblePaths"], json!([]));
}

#[test]
fn test_open_beside_focused_editor() {
    let (mut host, mut manager) = setup();
    let id = open_a(&mut host, &mut manager);

    assert_eq!(host.panels.len(), 1);
    {
        let panel = host.panel(0);
        assert_eq!(panel.column, Some(ViewColumn::Beside));
        assert_eq!(panel.title, "Preview a.txt");
        assert!(panel.html.contains("Loading preview..."));
        assert!(panel.html.contains(r#"src="webview://ext/media/preview.js""#));
        assert!(panel.messages.is_empty());
    }

    let entry = manager.store().get(id).unwrap();
    assert_eq!(entry.document, doc(1));
    assert_eq!(entry.editor, Some(editor(10)));
    assert_eq!(entry.uri, "file:///ws/a.txt");

    assert_eq!(manager.active_preview(), Some(id));
    assert_eq!(
        manager.context(),
        &PreviewContext {
            has_active: true,
            active_path: "/ws/a.txt".to_string(),
            visible_paths: vec!["/ws/a.txt".to_string()],
        }
    );
    assert_eq!(host.context["japanese-novel.preview.hasActive"], json!(true));
    assert_eq!(host.context["japanese-novel.preview.activePath"], json!("/ws/a.txt"));
    assert_eq!(host.context["japanese-novel.preview.visiblePaths"], json!(["/ws/a.txt"]));
}

#[test]
fn test_open_twice_reveals_existing_preview() {
    let (mut host, mut manager) = setup();
    let first = open_a(&mut host, &mut manager);
    let second = open_a(&mut host, &mut manager);

    assert_eq!(first, second);
    assert_eq!(host.panels.len(), 1);
    assert_eq!(host.panel(0).reveals, vec![None]);
    assert_eq!(manager.store().len(), 1);
}

#[test]
fn test_open_without_editor_uses_active_column() {
    let (mut host, mut manager) = setup();
    let id = manager.open(&mut host, "file:///ws/b.txt").unwrap();

    assert_eq!(host.panel(0).column, Some(ViewColumn::Active));
    assert_eq!(host.panel(0).title, "Preview b.txt");
    assert_eq!(manager.store().get(id).unwrap().editor, None);
}

#[test]
fn test_open_in_unfocused_editor_uses_active_column() {
    let (mut host, mut manager) = setup();
    host.add_editor(11, 3, pos(0, 0));
    let id = manager.open(&mut host, "file:///ws/b.txt").unwrap();

    assert_eq!(host.panel(0).column, Some(ViewColumn::Active));
    assert_eq!(manager.store().get(id).unwrap().editor, Some(editor(11)));
}

#[test]
fn test_open_rejects_non_novel_documents() {
    let (mut host, mut manager) = setup();

    let err = manager.open(&mut host, "file:///ws/notes.md").unwrap_err();
    assert!(matches!(
        &err,
        PreviewError::InvalidLanguage { language_id, .. } if language_id == "markdown"
    ));
    assert_eq!(err.notification_id(), Some(NotificationId::ErrorInvalidLanguageId));

    let err = manager.open(&mut host, "file:///ws/missing.txt").unwrap_err();
    assert!(matches!(err, PreviewError::OpenFailed { .. }));
    assert_eq!(err.notification_id(), None);

    assert!(host.panels.is_empty());
    assert!(manager.store().is_empty());
}

#[test]
fn test_open_to_side() {
    let (mut host, mut manager) = setup();
    let id = manager.open_to_side(&mut host, editor(10)).unwrap();
    assert_eq!(host.panel(0).column, Some(ViewColumn::Beside));
    assert_eq!(manager.store().get(id).unwrap().editor, Some(editor(10)));

    assert_eq!(manager.open_to_side(&mut host, editor(10)).unwrap(), id);
    assert_eq!(host.panel(0).reveals, vec![Some(ViewColumn::Beside)]);

    assert!(matches!(
        manager.open_to_side(&mut host, editor(99)),
        Err(PreviewError::UnknownEditor(_))
    ));
}

#[test]
fn test_reload_sends_full_snapshot() {
    let (mut host, mut manager) = setup();
    let id = open_a(&mut host, &mut manager);

    manager
        .did_receive_json(&mut host, id, r#"{"kind":"requestReload"}"#)
        .unwrap();

    assert_eq!(
        host.messages(0),
        vec![HostMessage::Reload(Reload {
            document: DocumentSnapshot {
                uri: "file:///ws/a.txt".to_string(),
                lines: vec![
                    "一行目".to_string(),
                    "二行目".to_string(),
                    "三行目".to_string(),
                ],
            },
            editor: Some(EditorState {
                selection: TextSelection::caret(pos(1, 0)),
                visible_ranges: vec![TextRange::new(pos(0, 0), pos(2, 0))],
            }),
            configuration: ReloadConfiguration {
                orientation: Orientation::Horizontal,
                style: PreviewStyle {
                    styles: vec![],
                    sheets: vec![DEFAULT_SHEET.to_string()],
                },
            },
        })]
    );

    // The reloaded selection line counts as already sent.
    manager.did_change_selection(editor(10), TextSelection::caret(pos(1, 2)));
    assert_eq!(host.messages(0).len(), 1);
}

#[test]
fn test_invalid_preview_json_is_an_error() {
    let (mut host, mut manager) = setup();
    let id = open_a(&mut host, &mut manager);

    let err = manager.did_receive_json(&mut host, id, "garbage").unwrap_err();
    assert!(matches!(err, PreviewError::Protocol(_)));
    assert!(host.messages(0).is_empty());
}

#[test]
fn test_document_changes_are_forwarded() {
    let (mut host, mut manager) = setup();
    open_a(&mut host, &mut manager);

    let patches = vec![Patch::insert(pos(0, 0), "「")];
    manager.did_change_document(host.document(doc(1)).unwrap(), &patches);
    manager.did_change_document(host.document(doc(1)).unwrap(), &[]);
    manager.did_change_document(host.document(doc(2)).unwrap(), &patches);
    manager.did_change_document(host.document(doc(3)).unwrap(), &patches);

    assert_eq!(host.messages(0), vec![HostMessage::Patch { patches }]);
}

#[test]
fn test_selection_on_same_line_is_suppressed() {
    let (mut host, mut manager) = setup();
    open_a(&mut host, &mut manager);

    manager.did_change_selection(editor(10), TextSelection::caret(pos(1, 2)));
    manager.did_change_selection(editor(10), TextSelection::caret(pos(1, 5)));
    manager.did_change_selection(editor(10), TextSelection::new(pos(0, 0), pos(2, 0)));
    manager.did_change_selection(editor(11), TextSelection::caret(pos(0, 0)));

    assert_eq!(
        host.messages(0),
        vec![
            HostMessage::SelectionChange {
                selection: Some(TextSelection::caret(pos(1, 2))),
            },
            HostMessage::SelectionChange {
                selection: Some(TextSelection::new(pos(0, 0), pos(2, 0))),
            },
        ]
    );
}

#[test]
fn test_reveal_editor_skips_one_visible_ranges_update() {
    let (mut host, mut manager) = setup();
    let id = open_a(&mut host, &mut manager);
    let range = TextRange::new(pos(2, 0), pos(2, 3));

    manager
        .did_receive_message(&mut host, id, PreviewMessage::RequestRevealEditor { range })
        .unwrap();
    assert_eq!(host.revealed, vec![(editor(10), range)]);

    let ranges = vec![TextRange::new(pos(1, 0), pos(2, 3))];
    manager.did_change_visible_ranges(editor(10), &ranges);
    assert!(host.messages(0).is_empty());

    manager.did_change_visible_ranges(editor(10), &ranges);
    assert_eq!(
        host.messages(0),
        vec![HostMessage::VisibleRangesChange {
            visible_ranges: ranges,
        }]
    );
}

#[test]
fn test_reveal_without_editor_is_ignored() {
    let (mut host, mut manager) = setup();
    let id = manager.open(&mut host, "file:///ws/b.txt").unwrap();

    manager
        .did_receive_message(
            &mut host,
            id,
            PreviewMessage::RequestRevealEditor {
                range: TextRange::empty(pos(0, 0)),
            },
        )
        .unwrap();
    assert!(host.revealed.is_empty());
}

#[test]
fn test_rename_file() {
    let (mut host, mut manager) = setup();
    let id = open_a(&mut host, &mut manager);

    manager
        .did_rename_files(
            &mut host,
            &[FileRename::new("file:///ws/a.txt", "file:///ws/c.txt")],
        )
        .unwrap();

    assert_eq!(manager.store().by_uri("file:///ws/c.txt"), Some(id));
    assert_eq!(manager.store().by_uri("file:///ws/a.txt"), None);
    assert_eq!(host.panel(0).title, "Preview c.txt");
    assert_eq!(
        host.messages(0),
        vec![HostMessage::UriChange {
            uri: "file:///ws/c.txt".to_string(),
        }]
    );
    assert_eq!(manager.context().active_path, "/ws/c.txt");
    assert_eq!(host.context["japanese-novel.preview.activePath"], json!("/ws/c.txt"));
}

#[test]
fn test_rename_folder_moves_contained_previews() {
    let (mut host, mut manager) = setup();
    host.add_document(4, "file:///ws/novel/1.txt");
    host.add_document(5, "file:///ws/novel/sub/2.txt");
    host.add_document(6, "file:///ws/novelist.txt");
    let first = manager.open(&mut host, "file:///ws/novel/1.txt").unwrap();
    let second = manager.open(&mut host, "file:///ws/novel/sub/2.txt").unwrap();
    let other = manager.open(&mut host, "file:///ws/novelist.txt").unwrap();

    manager
        .did_rename_files(
            &mut host,
            &[FileRename::new("file:///ws/novel", "file:///ws/book")],
        )
        .unwrap();

    assert_eq!(manager.store().by_uri("file:///ws/book/1.txt"), Some(first));
    assert_eq!(manager.store().by_uri("file:///ws/book/sub/2.txt"), Some(second));
    assert_eq!(manager.store().by_uri("file:///ws/novelist.txt"), Some(other));
    assert_eq!(host.panel(1).title, "Preview book/sub/2.txt");
    assert_eq!(
        host.messages(1),
        vec![HostMessage::UriChange {
            uri: "file:///ws/book/sub/2.txt".to_string(),
        }]
    );
    assert!(host.messages(2).is_empty());
}

#[test]
fn test_configuration_changes_are_diffed() {
    let (mut host, mut manager) = setup();
    open_a(&mut host, &mut manager);
    manager.open(&mut host, "file:///ws/b.txt").unwrap();

    manager.did_change_configuration(&mut host, PreviewConfiguration::default());
    assert!(host.messages(0).is_empty());

    let mut configuration = PreviewConfiguration::default();
    configuration.layout.orientation = Orientation::Vertical;
    manager.did_change_configuration(&mut host, configuration.clone());
    for index in 0..2 {
        assert_eq!(
            host.messages(index),
            vec![HostMessage::OrientationChange {
                orientation: Orientation::Vertical,
            }]
        );
    }

    configuration.style.font_size = "14px".to_string();
    manager.did_change_configuration(&mut host, configuration.clone());
    let style = HostMessage::StyleChange(PreviewStyle {
        styles: vec![":root{--preview-font-size: 14px}".to_string()],
        sheets: vec![DEFAULT_SHEET.to_string()],
    });
    for index in 0..2 {
        assert_eq!(host.messages(index).len(), 2);
        assert_eq!(host.messages(index)[1], style);
    }
    assert_eq!(manager.configuration(), &configuration);
}

#[test]
fn test_visible_editors_detach_and_attach() {
    let (mut host, mut manager) = setup();
    let id = open_a(&mut host, &mut manager);

    manager.did_change_visible_editors(&mut host, &[]).unwrap();
    assert_eq!(manager.store().get(id).unwrap().editor, None);
    assert_eq!(
        host.messages(0),
        vec![HostMessage::SelectionChange { selection: None }]
    );

    host.add_editor(11, 1, pos(2, 1));
    manager.did_change_visible_editors(&mut host, &[editor(11)]).unwrap();
    assert_eq!(manager.store().get(id).unwrap().editor, Some(editor(11)));
    assert_eq!(
        host.messages(0)[1..],
        [
            HostMessage::SelectionChange {
                selection: Some(TextSelection::caret(pos(2, 1))),
            },
            HostMessage::VisibleRangesChange {
                visible_ranges: vec![TextRange::new(pos(0, 0), pos(2, 0))],
            },
        ]
    );

    // Both editors show the document: the current one is kept.
    manager
        .did_change_visible_editors(&mut host, &[editor(10), editor(11)])
        .unwrap();
    assert_eq!(manager.store().get(id).unwrap().editor, Some(editor(11)));
    assert_eq!(host.messages(0).len(), 3);
}

#[test]
fn test_editor_switching_to_other_language_detaches() {
    let (mut host, mut manager) = setup();
    let id = open_a(&mut host, &mut manager);

    host.editors[0].document = doc(2);
    manager.did_change_visible_editors(&mut host, &[editor(10)]).unwrap();

    assert_eq!(manager.store().get(id).unwrap().editor, None);
    assert_eq!(
        host.messages(0),
        vec![HostMessage::SelectionChange { selection: None }]
    );
}

#[test]
fn test_editor_moving_to_another_previewed_document() {
    let (mut host, mut manager) = setup();
    let a = open_a(&mut host, &mut manager);
    let b = manager.open(&mut host, "file:///ws/b.txt").unwrap();

    host.editors[0].document = doc(3);
    manager.did_change_visible_editors(&mut host, &[editor(10)]).unwrap();

    assert_eq!(manager.store().get(a).unwrap().editor, None);
    assert_eq!(manager.store().get(b).unwrap().editor, Some(editor(10)));
    assert_eq!(
        host.messages(0),
        vec![HostMessage::SelectionChange { selection: None }]
    );
    assert_eq!(host.messages(1).len(), 2);
}

#[test]
fn test_active_editor_attaches_to_detached_preview() {
    let (mut host, mut manager) = setup();
    let id = manager.open(&mut host, "file:///ws/b.txt").unwrap();

    manager.did_change_active_editor(&mut host, None).unwrap();
    assert!(host.messages(0).is_empty());

    host.add_editor(12, 3, pos(0, 1));
    manager
        .did_change_active_editor(&mut host, Some(editor(12)))
        .unwrap();

    assert_eq!(manager.store().get(id).unwrap().editor, Some(editor(12)));
    assert_eq!(
        host.messages(0)[0],
        HostMessage::SelectionChange {
            selection: Some(TextSelection::caret(pos(0, 1))),
        }
    );
    assert_eq!(host.messages(0).len(), 2);
}

#[test]
fn test_close_document_disposes_panel() {
    let (mut host, mut manager) = setup();
    open_a(&mut host, &mut manager);

    manager.did_close_document(&mut host, doc(3));
    assert_eq!(manager.store().len(), 1);

    manager.did_close_document(&mut host, doc(1));
    assert!(manager.store().is_empty());
    assert!(host.panel(0).disposed);
    assert_eq!(manager.active_preview(), None);
    assert_eq!(host.context["japanese-novel.preview.hasActive"], json!(false));
    assert_eq!(host.context["japanese-novel.preview.visiblePaths"], json!([]));
}

#[test]
fn test_disposed_panel_is_forgotten() {
    let (mut host, mut manager) = setup();
    let id = open_a(&mut host, &mut manager);

    manager.did_dispose_panel(&mut host, id);
    assert!(manager.store().is_empty());
    assert!(!host.panel(0).disposed);
    assert!(manager.store().by_editor(editor(10)).is_none());
    assert!(matches!(
        manager.reload(&mut host, id),
        Err(PreviewError::UnknownPreview(_))
    ));
}

#[test]
fn test_view_state_updates_context() {
    let (mut host, mut manager) = setup();
    host.panel_active = false;
    let a = open_a(&mut host, &mut manager);
    let b = manager.open(&mut host, "file:///ws/b.txt").unwrap();

    assert_eq!(manager.active_preview(), None);
    assert_eq!(manager.visible_previews(), &[a, b]);

    manager.did_change_view_state(&mut host, b, true, true);
    manager.did_change_view_state(&mut host, a, false, false);

    assert_eq!(
        manager.context(),
        &PreviewContext {
            has_active: true,
            active_path: "/ws/b.txt".to_string(),
            visible_paths: vec!["/ws/b.txt".to_string()],
        }
    );
    assert_eq!(host.context["japanese-novel.preview.visiblePaths"], json!(["/ws/b.txt"]));
    assert!(manager.store().get(b).unwrap().value.is_active());
    assert!(!manager.store().get(a).unwrap().value.is_visible());
}

#[test]
fn test_open_source_shows_document_in_editor_column() {
    let (mut host, mut manager) = setup();
    assert_eq!(manager.open_source(&mut host), None);

    open_a(&mut host, &mut manager);
    assert_eq!(manager.open_source(&mut host), Some(doc(1)));
    assert_eq!(host.shown, vec![(doc(1), Some(ViewColumn::Index(1)))]);
}

#[test]
fn test_restore_rebinds_panel() {
    let (mut host, mut manager) = setup();
    let panel = host.create_panel(ViewColumn::Index(2));

    let id = manager
        .restore(
            &mut host,
            panel,
            PreviewState {
                uri: "file:///ws/a.txt".to_string(),
            },
        )
        .unwrap();

    assert_eq!(host.panels.len(), 1);
    assert_eq!(host.panel(0).title, "Preview a.txt");
    assert_eq!(manager.store().get(id).unwrap().editor, Some(editor(10)));

    let panel = host.create_panel(ViewColumn::Index(2));
    let err = manager
        .restore(
            &mut host,
            panel,
            PreviewState {
                uri: "file:///ws/notes.md".to_string(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, PreviewError::InvalidLanguage { .. }));
    assert_eq!(manager.store().len(), 1);
}

#[test]
fn test_deactivate_closes_everything() {
    let (mut host, mut manager) = setup();
    open_a(&mut host, &mut manager);
    manager.open(&mut host, "file:///ws/b.txt").unwrap();

    manager.deactivate(&mut host);
    assert!(manager.store().is_empty());
    assert!(host.panel(0).disposed);
    assert!(host.panel(1).disposed);
    assert!(manager.visible_previews().is_empty());
}
