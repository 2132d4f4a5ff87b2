//! Preview-side view.
//!
//! [`PreviewView`] is the state of the preview document itself: one rendered element per
//! source line, kept in lockstep with the host through [`merge`], plus the injected styles,
//! the orientation, the highlighted line and the scroll target. Rendering is delegated to a
//! [`LineRenderer`]; [`DefaultRenderer`] renders each line with the annotation HTML target.
//!
//! The view never talks to a transport directly. Messages for the host are queued and taken
//! with [`PreviewView::take_messages`]; scrolling is requested and collected once per
//! animation frame with [`PreviewView::animation_frame`].

use crate::configuration::Orientation;
use crate::protocol::{
    HostMessage, PreviewMessage, PreviewState, PreviewStyle, ProtocolError, Reload,
};
use novel_core::{
    Line, LineCallbacks, Patch, TextPosition, TextRange, TextSelection, escape_html, line_to_html,
    merge,
};
use std::fmt;
use std::mem;
use tracing::{trace, warn};

/// Class of the element holding the lines.
pub const CONTAINER_CLASS: &str = "preview-container";
/// Class of the highlighted line.
pub const SELECTED_CLASS: &str = "preview-selected";
/// Container class for [`Orientation::Horizontal`].
pub const HORIZONTAL_CLASS: &str = "preview-horizontal";
/// Container class for [`Orientation::Vertical`].
pub const VERTICAL_CLASS: &str = "preview-vertical";

/// Number of container resizes after a reload before the scroll position is corrected.
pub const RELOAD_RESIZE_COUNT: usize = 2;

/// Renders line elements.
pub trait LineRenderer {
    /// Rendered line.
    type Element;

    /// Render a new line.
    fn create(&mut self, text: &str) -> Self::Element;

    /// Re-render `element` for `text`.
    fn update(&mut self, text: &str, element: &mut Self::Element);

    /// Release a removed line.
    fn remove(&mut self, element: Self::Element);

    /// Highlight a line.
    fn selection_add(&mut self, element: &mut Self::Element);

    /// Remove the highlight from a line.
    fn selection_remove(&mut self, element: &mut Self::Element);
}

/// A `<p>` line element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineElement {
    /// Inner HTML.
    pub html: String,
    /// Whether the line is highlighted.
    pub selected: bool,
}

impl LineElement {
    /// Outer HTML.
    pub fn to_html(&self) -> String {
        if self.selected {
            format!(r#"<p class="{SELECTED_CLASS}">{}</p>"#, self.html)
        } else {
            format!("<p>{}</p>", self.html)
        }
    }
}

/// Renders lines with [`line_to_html`]; empty lines get a `<br>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRenderer;

impl DefaultRenderer {
    fn render(text: &str) -> String {
        let html = line_to_html(text);
        if html.is_empty() {
            "<br>".to_string()
        } else {
            html
        }
    }
}

impl LineRenderer for DefaultRenderer {
    type Element = LineElement;

    fn create(&mut self, text: &str) -> LineElement {
        LineElement {
            html: Self::render(text),
            selected: false,
        }
    }

    fn update(&mut self, text: &str, element: &mut LineElement) {
        element.html = Self::render(text);
    }

    fn remove(&mut self, _element: LineElement) {}

    fn selection_add(&mut self, element: &mut LineElement) {
        element.selected = true;
    }

    fn selection_remove(&mut self, element: &mut LineElement) {
        element.selected = false;
    }
}

/// An element injected into the preview's `<head>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadElement {
    /// `<style>` with CSS text.
    Style(String),
    /// `<link rel="stylesheet">` with a URI.
    Sheet(String),
}

impl HeadElement {
    /// Outer HTML.
    pub fn to_html(&self) -> String {
        match self {
            Self::Style(css) => format!("<style>{css}</style>"),
            Self::Sheet(href) => {
                format!(r#"<link rel="stylesheet" href="{}">"#, escape_html(href))
            }
        }
    }
}

/// Merge callbacks that render lines and track where the highlighted line moves.
struct Rendering<'a, R> {
    renderer: &'a mut R,
    highlighted: Option<usize>,
    removed_before: usize,
    created_before: usize,
    highlighted_removed: bool,
}

impl<'a, R> Rendering<'a, R> {
    fn new(renderer: &'a mut R, highlighted: Option<usize>) -> Self {
        Self {
            renderer,
            highlighted,
            removed_before: 0,
            created_before: 0,
            highlighted_removed: false,
        }
    }

    /// Index of the highlighted line after the patch.
    fn finish(self) -> Option<usize> {
        if self.highlighted_removed {
            return None;
        }
        self.highlighted
            .map(|index| index - self.removed_before + self.created_before)
    }
}

impl<R: LineRenderer> LineCallbacks<R::Element> for Rendering<'_, R> {
    fn create(&mut self, new_text: &str, index: usize) -> R::Element {
        if let Some(highlighted) = self.highlighted
            && index <= highlighted + self.created_before
        {
            self.created_before += 1;
        }
        self.renderer.create(new_text)
    }

    fn update(&mut self, new_text: &str, data: &mut R::Element, _old_text: &str, _index: usize) {
        self.renderer.update(new_text, data);
    }

    fn remove(&mut self, data: R::Element, _old_text: &str, index: usize) {
        match self.highlighted {
            Some(highlighted) if index == highlighted => self.highlighted_removed = true,
            Some(highlighted) if index < highlighted => self.removed_before += 1,
            _ => {}
        }
        self.renderer.remove(data);
    }
}

/// The preview document.
pub struct PreviewView<R: LineRenderer> {
    renderer: R,
    lines: Vec<Line<R::Element>>,
    outbox: Vec<PreviewMessage>,
    state: Option<PreviewState>,
    orientation: Option<Orientation>,
    head: Vec<HeadElement>,
    selection: Option<TextSelection>,
    selection_line: Option<usize>,
    highlighted: Option<usize>,
    visible_ranges: Vec<TextRange>,
    resizes_to_observe: usize,
    scroll_pending: bool,
}

impl<R: LineRenderer> fmt::Debug for PreviewView<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewView")
            .field("line_count", &self.lines.len())
            .field("state", &self.state)
            .field("orientation", &self.orientation)
            .field("highlighted", &self.highlighted)
            .field("pending_messages", &self.outbox.len())
            .finish()
    }
}

impl Default for PreviewView<DefaultRenderer> {
    fn default() -> Self {
        Self::new(DefaultRenderer)
    }
}

impl<R: LineRenderer> PreviewView<R> {
    /// Create an empty view. A reload request is queued right away.
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            lines: Vec::new(),
            outbox: vec![PreviewMessage::RequestReload],
            state: None,
            orientation: None,
            head: Vec::new(),
            selection: None,
            selection_line: None,
            highlighted: None,
            visible_ranges: Vec::new(),
            resizes_to_observe: 0,
            scroll_pending: false,
        }
    }

    /// Rendered lines.
    pub fn lines(&self) -> &[Line<R::Element>] {
        &self.lines
    }

    /// The renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Persisted state, once the document URI is known.
    pub fn state(&self) -> Option<&PreviewState> {
        self.state.as_ref()
    }

    /// Current orientation, once configured.
    pub fn orientation(&self) -> Option<Orientation> {
        self.orientation
    }

    /// Injected head elements, in document order.
    pub fn head(&self) -> &[HeadElement] {
        &self.head
    }

    /// Index of the highlighted line.
    pub fn highlighted_line(&self) -> Option<usize> {
        self.highlighted
    }

    /// Take the messages queued for the host.
    pub fn take_messages(&mut self) -> Vec<PreviewMessage> {
        mem::take(&mut self.outbox)
    }

    /// Classes of the line container.
    pub fn container_classes(&self) -> String {
        match self.orientation {
            Some(Orientation::Horizontal) => format!("{CONTAINER_CLASS} {HORIZONTAL_CLASS}"),
            Some(Orientation::Vertical) => format!("{CONTAINER_CLASS} {VERTICAL_CLASS}"),
            None => CONTAINER_CLASS.to_string(),
        }
    }

    // Messages

    /// Decode and handle a JSON message from the host.
    pub fn receive_json(&mut self, json: &str) -> Result<(), ProtocolError> {
        let message = HostMessage::from_json(json).inspect_err(|err| {
            warn!(%err, "dropping invalid host message");
        })?;
        self.handle_message(message);
        Ok(())
    }

    /// Handle a message from the host.
    pub fn handle_message(&mut self, message: HostMessage) {
        trace!(kind = message.kind(), "host message");
        match message {
            HostMessage::UriChange { uri } => self.state = Some(PreviewState { uri }),
            HostMessage::OrientationChange { orientation } => {
                self.update_orientation(orientation);
                self.request_scroll();
            }
            HostMessage::StyleChange(style) => {
                self.update_style(&style);
                self.request_scroll();
            }
            HostMessage::Reload(reload) => self.reload(reload),
            HostMessage::Patch { patches } => self.apply_patches(&patches),
            HostMessage::SelectionChange { selection } => {
                self.update_selection(selection);
                self.request_scroll();
            }
            HostMessage::VisibleRangesChange { visible_ranges } => {
                self.visible_ranges = visible_ranges;
                self.request_scroll();
            }
        }
    }

    fn reload(&mut self, reload: Reload) {
        let Reload {
            document,
            editor,
            configuration,
        } = reload;

        self.state = Some(PreviewState { uri: document.uri });
        self.resizes_to_observe = RELOAD_RESIZE_COUNT;

        for line in self.lines.drain(..) {
            self.renderer.remove(line.data);
        }
        self.highlighted = None;
        self.selection_line = None;

        self.update_orientation(configuration.orientation);
        self.update_style(&configuration.style);

        for text in document.lines {
            let data = self.renderer.create(&text);
            self.lines.push(Line::new(text, data));
        }

        match editor {
            Some(editor) => {
                self.update_selection(Some(editor.selection));
                self.visible_ranges = editor.visible_ranges;
            }
            None => {
                self.update_selection(None);
                self.visible_ranges.clear();
            }
        }

        self.request_scroll();
    }

    /// Apply one patch message. On a patch that does not fit the lines, the rest of the
    /// message is dropped and a reload is requested.
    fn apply_patches(&mut self, patches: &[Patch]) {
        for patch in patches {
            let mut rendering = Rendering::new(&mut self.renderer, self.highlighted);
            let result = merge(&mut self.lines, std::slice::from_ref(patch), &mut rendering);
            self.highlighted = rendering.finish();
            if self.highlighted.is_none() {
                self.selection_line = None;
            }

            if let Err(err) = result {
                warn!(%err, "preview out of sync, requesting reload");
                self.outbox.push(PreviewMessage::RequestReload);
                return;
            }
        }
    }

    fn update_orientation(&mut self, orientation: Orientation) {
        self.orientation = Some(orientation);
    }

    /// Keep head elements that are still wanted, drop the rest, then append new styles and
    /// new sheets.
    fn update_style(&mut self, style: &PreviewStyle) {
        self.head.retain(|element| match element {
            HeadElement::Style(css) => style.styles.contains(css),
            HeadElement::Sheet(href) => style.sheets.contains(href),
        });

        let wanted = style
            .styles
            .iter()
            .cloned()
            .map(HeadElement::Style)
            .chain(style.sheets.iter().cloned().map(HeadElement::Sheet));
        for element in wanted {
            if !self.head.contains(&element) {
                self.head.push(element);
            }
        }
    }

    /// Move the highlight to the selection's active line. Nothing happens while the active
    /// line stays the same.
    fn update_selection(&mut self, selection: Option<TextSelection>) {
        self.selection = selection;
        let line = selection.map(|selection| selection.active.line);
        if self.selection_line == line && self.highlighted.is_some() == line.is_some() {
            return;
        }

        if let Some(index) = self.highlighted.take()
            && let Some(previous) = self.lines.get_mut(index)
        {
            self.renderer.selection_remove(&mut previous.data);
        }

        self.selection_line = line;
        if let Some(index) = line
            && let Some(current) = self.lines.get_mut(index)
        {
            self.renderer.selection_add(&mut current.data);
            self.highlighted = Some(index);
        }
    }

    // Interaction

    /// A line was clicked: ask the host to reveal the whole line in the editor.
    pub fn click_line(&mut self, index: usize) {
        let Some(line) = self.lines.get(index) else {
            return;
        };
        let range = TextRange::new(
            TextPosition::new(index, 0),
            TextPosition::new(index, line.text.chars().count()),
        );
        self.outbox.push(PreviewMessage::RequestRevealEditor { range });
    }

    // Scrolling

    fn request_scroll(&mut self) {
        self.scroll_pending = true;
    }

    /// Whether a scroll update waits for the next animation frame.
    pub fn scroll_pending(&self) -> bool {
        self.scroll_pending
    }

    /// The line to scroll into view: the selection's active line when the selection overlaps
    /// the first visible range, else the start of that range, clamped to the last line.
    pub fn scroll_target(&self) -> Option<usize> {
        let last = self.lines.len().checked_sub(1)?;
        let visible = self.visible_ranges.first();

        let line = match (self.selection, visible) {
            (None, None) => return None,
            (Some(selection), Some(visible)) if selection.range().overlaps(visible) => {
                selection.active.line
            }
            (Some(selection), None) => selection.active.line,
            (_, Some(visible)) => visible.start.line,
        };
        Some(line.min(last))
    }

    /// Run the scroll update requested since the last frame, if any.
    pub fn animation_frame(&mut self) -> Option<usize> {
        if !mem::take(&mut self.scroll_pending) {
            return None;
        }
        self.scroll_target()
    }

    /// The line container was resized. After the resizes expected following a reload, the
    /// scroll position is corrected once.
    pub fn did_resize(&mut self) -> Option<usize> {
        if self.resizes_to_observe == 0 {
            return None;
        }
        self.resizes_to_observe -= 1;
        if self.resizes_to_observe > 0 {
            return None;
        }
        self.scroll_target()
    }
}

impl PreviewView<DefaultRenderer> {
    /// HTML of the line container.
    pub fn html(&self) -> String {
        let mut out = format!(r#"<div class="{}">"#, self.container_classes());
        for line in &self.lines {
            out.push_str(&line.data.to_html());
        }
        out.push_str("</div>");
        out
    }

    /// HTML of the injected head elements.
    pub fn head_html(&self) -> String {
        self.head.iter().map(HeadElement::to_html).collect()
    }
}
