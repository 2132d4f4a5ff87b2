use novel_core::{
    DocumentId, EditError, InMemoryDocument, Indentation, TextDocument, TextPosition,
    TextSelection, format_document, format_line,
};
use pretty_assertions::assert_eq;

fn formatted(text: &str, selection: TextSelection, indentation: Indentation) -> String {
    let mut document = InMemoryDocument::novel(DocumentId::new(1), "file:///a.txt", text);
    let patches = format_document(&document, &selection, indentation).unwrap();
    document.apply(&patches).unwrap();
    document.text()
}

#[test]
fn test_with_indentation() {
    let text = "本文\n 半角\n\u{3000}\u{3000}全角\n「台詞」\n  「台詞」\n";
    let caret = TextSelection::caret(TextPosition::new(0, 0));

    assert_eq!(
        formatted(text, caret, Indentation::With),
        "\u{3000}本文\n\u{3000}半角\n\u{3000}全角\n「台詞」\n「台詞」\n"
    );
}

#[test]
fn test_without_indentation() {
    let text = "\u{3000}本文\n  「台詞」\n地の文";
    let caret = TextSelection::caret(TextPosition::new(2, 1));

    assert_eq!(
        formatted(text, caret, Indentation::Without),
        "本文\n「台詞」\n地の文"
    );
}

#[test]
fn test_selection_limits_lines() {
    let text = "一\n二\n三\n四";
    let selection = TextSelection::new(TextPosition::new(1, 0), TextPosition::new(2, 1));

    assert_eq!(
        formatted(text, selection, Indentation::With),
        "一\n\u{3000}二\n\u{3000}三\n四"
    );
}

#[test]
fn test_punctuation_start_only_drops_spaces() {
    assert_eq!(format_line(0, "「台詞」", Indentation::With), None);
    let patch = format_line(3, "\u{3000}…続く", Indentation::With).unwrap();
    assert_eq!(patch.range.start, TextPosition::new(3, 0));
    assert_eq!(patch.range.end, TextPosition::new(3, 1));
    assert_eq!(patch.text, "");
}

#[test]
fn test_only_novel_documents() {
    let document = InMemoryDocument::new(DocumentId::new(1), "file:///a.md", "markdown", " a");
    let err = format_document(
        &document,
        &TextSelection::caret(TextPosition::new(0, 0)),
        Indentation::Without,
    )
    .unwrap_err();

    assert!(matches!(err, EditError::InvalidLanguage { .. }));
    assert_eq!(document.text(), " a");
}
