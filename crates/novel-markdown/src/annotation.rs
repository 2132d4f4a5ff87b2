//! The annotation inline rule.
//!
//! At the current position it searches the rest of the inline source for the first ruby or
//! emphasis dots annotation. The text before the match goes back through the inline parser
//! with [`SkipAnnotation`] set, so other inline markup inside it is still recognized; then the
//! annotation itself becomes a [`Ruby`] or [`Dots`] node.
//!
//! Base and ruby text must not contain markdown punctuation (`` ` * _ [ ] ( ) ``), so an
//! annotation never swallows the delimiters of other inline markup.

use markdown_it::parser::extset::InlineRootExt;
use markdown_it::parser::inline::{InlineRule, InlineState};
use markdown_it::{Node, NodeValue, Renderer};
use novel_core::annotation::{CHAR_FULLWIDTH_VERTICAL_BAR, CHAR_HALFWIDTH_VERTICAL_BAR};
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::trace;

/// Class attribute of the emphasis dots wrapper.
pub const DOTS_CLASS_NAME: &str = "japanese-novel-dots";

static ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?:[|｜](?P<base>[^|｜《》\n\r`*_\[\]()]+)《(?P<ruby>[^《》\n\r`*_\[\]()]*)》)",
        r"|(?:(?P<han>[\p{Han}〆ヶ]+)《(?P<han_ruby>[^《》\n\r`*_\[\]()]*)》)",
        r"|(?:《《(?P<dots>[^\n\r`*_\[\]()]*?)》》)",
    ))
    .expect("valid markdown annotation regex")
});

fn is_bar(ch: char) -> bool {
    ch == CHAR_FULLWIDTH_VERTICAL_BAR || ch == CHAR_HALFWIDTH_VERTICAL_BAR
}

/// First annotation in `input`. Emphasis dots directly after a bar are skipped; the start of
/// `input` counts as a line start.
fn find_annotation(input: &str) -> Option<Captures<'_>> {
    let mut start = 0;
    while let Some(caps) = ANNOTATION.captures_at(input, start) {
        let whole = caps.get(0)?;
        let after_bar = input[..whole.start()].chars().next_back().is_some_and(is_bar);
        if caps.name("dots").is_some() && after_bar {
            start = whole.start() + input[whole.start()..].chars().next()?.len_utf8();
            continue;
        }
        return Some(caps);
    }
    None
}

/// Ruby text over a base: `<ruby>base<rt>ruby</rt></ruby>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ruby {
    /// Annotated text.
    pub base: String,
    /// Reading shown above or beside the base. May be empty.
    pub ruby: String,
}

impl NodeValue for Ruby {
    fn render(&self, node: &Node, fmt: &mut dyn Renderer) {
        fmt.open("ruby", &node.attrs);
        fmt.text(&self.base);
        fmt.open("rt", &[]);
        fmt.text(&self.ruby);
        fmt.close("rt");
        fmt.close("ruby");
    }
}

/// Emphasis dots: one `span` per character inside a classed `em`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dots {
    /// Emphasized text.
    pub text: String,
}

impl NodeValue for Dots {
    fn render(&self, node: &Node, fmt: &mut dyn Renderer) {
        let mut attrs = node.attrs.clone();
        attrs.push(("class", DOTS_CLASS_NAME.to_string()));
        fmt.open("em", &attrs);
        let mut buf = [0u8; 4];
        for ch in self.text.chars() {
            fmt.open("span", &[]);
            fmt.text(ch.encode_utf8(&mut buf));
            fmt.close("span");
        }
        fmt.close("em");
    }
}

/// Set in the inline extension state while the text before an annotation is parsed.
#[derive(Debug, Default)]
pub struct SkipAnnotation;

impl InlineRootExt for SkipAnnotation {}

fn annotation_node(caps: &Captures<'_>) -> Node {
    let text = |name: &str| caps.name(name).map_or("", |m| m.as_str()).to_string();
    if caps.name("base").is_some() {
        Node::new(Ruby {
            base: text("base"),
            ruby: text("ruby"),
        })
    } else if caps.name("han").is_some() {
        Node::new(Ruby {
            base: text("han"),
            ruby: text("han_ruby"),
        })
    } else {
        Node::new(Dots { text: text("dots") })
    }
}

/// Inline rule producing [`Ruby`] and [`Dots`] nodes.
pub struct AnnotationScanner;

impl InlineRule for AnnotationScanner {
    // Base text starts at any Han character, so the rule has no single marker.
    const MARKER: char = '\0';

    fn check(state: &mut InlineState) -> Option<usize> {
        if state.inline_ext.get::<SkipAnnotation>().is_some() {
            return None;
        }
        let caps = find_annotation(&state.src[state.pos..state.pos_max])?;
        let whole = caps.get(0)?;
        (whole.start() == 0).then_some(whole.len())
    }

    fn run(state: &mut InlineState) -> Option<(Node, usize)> {
        if state.inline_ext.get::<SkipAnnotation>().is_some() {
            return None;
        }

        let start = state.pos;
        let (node, prefix_end, len) = {
            let caps = find_annotation(&state.src[start..state.pos_max])?;
            let whole = caps.get(0)?;
            (annotation_node(&caps), start + whole.start(), whole.len())
        };

        if prefix_end > start {
            let md = state.md;
            let pos_max = state.pos_max;
            state.pos_max = prefix_end;
            state.inline_ext.insert(SkipAnnotation);
            md.inline.tokenize(state);
            state.inline_ext.remove::<SkipAnnotation>();
            state.pos_max = pos_max;
            state.pos = prefix_end;
        }

        trace!(at = prefix_end, len, "annotation");
        Some((node, len))
    }
}
