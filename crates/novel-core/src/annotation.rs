//! Ruby and emphasis-dots annotations.
//!
//! Three notations are recognized inside a single line:
//!
//! | notation | meaning |
//! |----------|---------|
//! | `｜base《ruby》` / `|base《ruby》` | explicit ruby over `base` |
//! | `漢字《ruby》` | implicit ruby over the trailing run of Han characters (plus `〆`, `ヶ`) |
//! | `《《text》》` | emphasis dots over every character of `text` |
//!
//! Matching is leftmost-first and non-overlapping; at one position, explicit ruby wins over
//! implicit ruby, which wins over emphasis dots. Emphasis dots must not directly follow a
//! vertical bar: the character before `《《` is consumed as part of the match (or the match
//! starts a line), so two emphasis annotations written back to back only match the first.
//! Anything that does not match is literal text; malformed input never fails.
//!
//! All three renderers ([`to_plain`], [`line_to_html`], [`to_ruby_only`]) share the
//! same recognizer ([`scan`]).

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Full-width vertical bar, the default explicit-ruby delimiter.
pub const CHAR_FULLWIDTH_VERTICAL_BAR: char = '｜';

/// Half-width vertical bar.
pub const CHAR_HALFWIDTH_VERTICAL_BAR: char = '|';

/// Full-width (ideographic) space.
pub const CHAR_FULLWIDTH_SPACE: char = '\u{3000}';

/// Ruby text used for each character when emphasis dots are rewritten as ruby.
pub const CHAR_DOT_RUBY: char = '・';

/// Characters that cannot appear inside a single-line annotation edit.
pub const SPECIAL_CHARACTERS: [char; 6] = ['\r', '\n', '|', '｜', '《', '》'];

static ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?m)",
        r"(?:[|｜](?P<base>[^|｜《》\n\r]+)《(?P<ruby>[^《》\n\r]*)》)",
        r"|(?:(?P<han>[\p{Han}〆ヶ]+)《(?P<han_ruby>[^《》\n\r]*)》)",
        r"|(?:(?P<prefix>^|[^|｜])《《(?P<dots>[^\n\r]*?)》》)",
    ))
    .expect("valid annotation regex")
});

static DOTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(?P<prefix>^|[^|｜])《《(?P<dots>[^\n\r]*?)》》").expect("valid dots regex")
});

static ALL_HAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{Han}〆ヶ]+$").expect("valid han regex"));

/// A piece of annotated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text.
    Text(&'a str),
    /// Ruby `ruby` over `base` (explicit or implicit).
    Ruby {
        /// Base text.
        base: &'a str,
        /// Ruby text (may be empty).
        ruby: &'a str,
    },
    /// Emphasis dots over every character of the content (may be empty).
    Dots(&'a str),
}

/// Split `text` into literal and annotation segments.
///
/// Concatenating the source spans of the returned segments reproduces `text`. Adjacent
/// literal spans are not merged.
pub fn scan(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in ANNOTATION.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };

        if whole.start() > last {
            segments.push(Segment::Text(&text[last..whole.start()]));
        }

        let segment = annotation_segment(&caps, &mut segments);
        segments.push(segment);
        last = whole.end();
    }

    if last < text.len() {
        segments.push(Segment::Text(&text[last..]));
    }

    segments
}

fn annotation_segment<'a>(caps: &Captures<'a>, segments: &mut Vec<Segment<'a>>) -> Segment<'a> {
    if let Some(base) = caps.name("base") {
        return Segment::Ruby {
            base: base.as_str(),
            ruby: caps.name("ruby").map_or("", |m| m.as_str()),
        };
    }

    if let Some(base) = caps.name("han") {
        return Segment::Ruby {
            base: base.as_str(),
            ruby: caps.name("han_ruby").map_or("", |m| m.as_str()),
        };
    }

    if let Some(prefix) = caps.name("prefix")
        && !prefix.is_empty()
    {
        segments.push(Segment::Text(prefix.as_str()));
    }

    Segment::Dots(caps.name("dots").map_or("", |m| m.as_str()))
}

/// Strip annotations down to their base text.
///
/// Ruby text and all delimiters are removed; base characters and emphasized characters are
/// kept. The result contains no annotation syntax, so applying `to_plain` again is a no-op.
pub fn to_plain(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for segment in scan(text) {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Ruby { base, .. } => out.push_str(base),
            Segment::Dots(content) => out.push_str(content),
        }
    }
    out
}

/// Escape `& < > " '` for inclusion in HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render a single annotated line as inline HTML.
///
/// Ruby becomes `<ruby>BASE<rt>RUBY</rt></ruby>`, emphasis dots become
/// `<em><span>C1</span><span>C2</span>…</em>`. All text is escaped. An empty line renders as
/// an empty string.
pub fn line_to_html(line: &str) -> String {
    let mut out = String::with_capacity(line.len() * 2);
    for segment in scan(line) {
        match segment {
            Segment::Text(text) => out.push_str(&escape_html(text)),
            Segment::Ruby { base, ruby } => {
                out.push_str("<ruby>");
                out.push_str(&escape_html(base));
                out.push_str("<rt>");
                out.push_str(&escape_html(ruby));
                out.push_str("</rt></ruby>");
            }
            Segment::Dots(content) => {
                out.push_str("<em>");
                let mut buf = [0u8; 4];
                for ch in content.chars() {
                    out.push_str("<span>");
                    out.push_str(&escape_html(ch.encode_utf8(&mut buf)));
                    out.push_str("</span>");
                }
                out.push_str("</em>");
            }
        }
    }
    out
}

/// Render annotated text as HTML paragraphs, one `<p>` per line (`<p><br></p>` when empty).
pub fn lines_to_html(text: &str) -> String {
    crate::text::split_lines(text)
        .iter()
        .map(|line| {
            let html = line_to_html(line);
            if html.is_empty() {
                "<p><br></p>".to_string()
            } else {
                format!("<p>{html}</p>")
            }
        })
        .collect()
}

/// Rewrite emphasis dots as per-character ruby (`《《ab》》` → `｜a《・》｜b《・》`).
///
/// Ruby annotations are left untouched, so the result only uses ruby notation.
pub fn to_ruby_only(text: &str) -> String {
    DOTS.replace_all(text, |caps: &Captures<'_>| {
        let mut out = caps.name("prefix").map_or("", |m| m.as_str()).to_string();
        for ch in caps.name("dots").map_or("", |m| m.as_str()).chars() {
            out.push(CHAR_FULLWIDTH_VERTICAL_BAR);
            out.push(ch);
            out.push('《');
            out.push(CHAR_DOT_RUBY);
            out.push('》');
        }
        out
    })
    .into_owned()
}

/// Returns `true` if `text` is non-empty and consists only of Han characters, `〆` or `ヶ`.
pub fn is_all_han(text: &str) -> bool {
    ALL_HAN.is_match(text)
}

/// Returns the first reserved annotation character in `text`, if any.
pub fn find_special_character(text: &str) -> Option<char> {
    text.chars().find(|ch| SPECIAL_CHARACTERS.contains(ch))
}
