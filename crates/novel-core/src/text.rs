/// Split `text` into lines on `\r?\n`.
///
/// `N` line breaks always yield `N + 1` lines, so `""` is one empty line. A `\r` that is not
/// followed by `\n` stays part of the line.
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    let last = lines.len() - 1;
    for line in &mut lines[..last] {
        if line.ends_with('\r') {
            line.pop();
        }
    }
    lines
}

/// Byte offset of the `char_index`-th character, clamped to the end of `text`.
pub(crate) fn char_to_byte(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// The first `chars` characters of `text` (all of it if shorter).
pub(crate) fn char_prefix(text: &str, chars: usize) -> &str {
    &text[..char_to_byte(text, chars)]
}

/// `text` without its first `chars` characters (empty if shorter).
pub(crate) fn char_suffix(text: &str, chars: usize) -> &str {
    &text[char_to_byte(text, chars)..]
}

/// Characters `start..end` of `text`, clamped like `String.prototype.slice`.
pub(crate) fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let start_byte = char_to_byte(text, start);
    let end_byte = char_to_byte(text, end.max(start));
    &text[start_byte..end_byte]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_crlf_and_trailing() {
        assert_eq!(split_lines(""), vec![""]);
        assert_eq!(split_lines("a\r\nb\n"), vec!["a", "b", ""]);
        assert_eq!(split_lines("a\rb"), vec!["a\rb"]);
    }

    #[test]
    fn test_char_slicing_clamps() {
        let text = "漢字abc";
        assert_eq!(char_prefix(text, 2), "漢字");
        assert_eq!(char_suffix(text, 2), "abc");
        assert_eq!(char_slice(text, 1, 3), "字a");
        assert_eq!(char_slice(text, 4, 99), "c");
        assert_eq!(char_prefix(text, 99), text);
        assert_eq!(char_suffix(text, 99), "");
    }
}
