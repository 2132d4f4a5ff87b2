use novel_core::{Line, LineCallbacks, MergeError, Patch, TextPosition, TextRange, merge};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ropey::Rope;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Create(String, usize),
    Update(String, String, usize),
    Remove(String, usize),
}

/// Records every callback; line data is the line's character count.
#[derive(Default)]
struct Recorder {
    events: Vec<Event>,
}

impl LineCallbacks<usize> for Recorder {
    fn create(&mut self, new_text: &str, index: usize) -> usize {
        self.events.push(Event::Create(new_text.to_string(), index));
        new_text.chars().count()
    }

    fn update(&mut self, new_text: &str, data: &mut usize, old_text: &str, index: usize) {
        self.events.push(Event::Update(
            old_text.to_string(),
            new_text.to_string(),
            index,
        ));
        *data = new_text.chars().count();
    }

    fn remove(&mut self, _data: usize, old_text: &str, index: usize) {
        self.events.push(Event::Remove(old_text.to_string(), index));
    }
}

fn lines(texts: &[&str]) -> Vec<Line<usize>> {
    texts
        .iter()
        .map(|text| Line::new(*text, text.chars().count()))
        .collect()
}

fn texts(lines: &[Line<usize>]) -> Vec<&str> {
    lines.iter().map(|line| line.text.as_str()).collect()
}

fn range(sl: usize, sc: usize, el: usize, ec: usize) -> TextRange {
    TextRange::new(TextPosition::new(sl, sc), TextPosition::new(el, ec))
}

#[test]
fn test_insert_line_break_into_empty_line() {
    let mut array = lines(&[""]);
    let mut recorder = Recorder::default();

    merge(
        &mut array,
        &[Patch::new(range(0, 0, 0, 0), "AB\nCD")],
        &mut recorder,
    )
    .unwrap();

    assert_eq!(texts(&array), vec!["AB", "CD"]);
    assert_eq!(
        recorder.events,
        vec![
            Event::Update("".to_string(), "AB".to_string(), 0),
            Event::Create("CD".to_string(), 1),
        ]
    );
}

#[test]
fn test_empty_batch_invokes_nothing() {
    let mut array = lines(&["a", "b"]);
    let mut recorder = Recorder::default();

    merge(&mut array, &[], &mut recorder).unwrap();

    assert_eq!(texts(&array), vec!["a", "b"]);
    assert!(recorder.events.is_empty());
}

#[test]
fn test_join_lines_removes_in_ascending_order() {
    let mut array = lines(&["first", "second", "third", "fourth"]);
    let mut recorder = Recorder::default();

    merge(
        &mut array,
        &[Patch::new(range(0, 2, 3, 3), "-")],
        &mut recorder,
    )
    .unwrap();

    assert_eq!(texts(&array), vec!["fi-rth"]);
    assert_eq!(
        recorder.events,
        vec![
            Event::Update("first".to_string(), "fi-rth".to_string(), 0),
            Event::Remove("second".to_string(), 1),
            Event::Remove("third".to_string(), 2),
            Event::Remove("fourth".to_string(), 3),
        ]
    );
    assert_eq!(array[0].data, 6);
}

#[test]
fn test_replace_keeps_boundary_text() {
    let mut array = lines(&["吾輩は猫である。", "名前はまだ無い。"]);
    let mut recorder = Recorder::default();

    merge(
        &mut array,
        &[Patch::new(range(0, 3, 1, 2), "犬\n\n")],
        &mut recorder,
    )
    .unwrap();

    assert_eq!(texts(&array), vec!["吾輩は犬", "", "はまだ無い。"]);
    assert_eq!(
        recorder.events,
        vec![
            Event::Update("吾輩は猫である。".to_string(), "吾輩は犬".to_string(), 0),
            Event::Update("名前はまだ無い。".to_string(), "".to_string(), 1),
            Event::Create("はまだ無い。".to_string(), 2),
        ]
    );
}

#[test]
fn test_crlf_in_replacement_splits_lines() {
    let mut array = lines(&["ab"]);
    merge(
        &mut array,
        &[Patch::insert(TextPosition::new(0, 1), "x\r\ny")],
        &mut Recorder::default(),
    )
    .unwrap();

    assert_eq!(texts(&array), vec!["ax", "yb"]);
}

#[test]
fn test_batch_positions_follow_previous_patches() {
    let mut array = lines(&["abc"]);

    // The second patch addresses line 1, which only exists after the first one.
    merge(
        &mut array,
        &[
            Patch::insert(TextPosition::new(0, 3), "\ndef"),
            Patch::insert(TextPosition::new(1, 3), "!"),
        ],
        &mut Recorder::default(),
    )
    .unwrap();

    assert_eq!(texts(&array), vec!["abc", "def!"]);
}

#[test]
fn test_out_of_range_patch_stops_batch() {
    let mut array = lines(&["a"]);
    let mut recorder = Recorder::default();

    let err = merge(
        &mut array,
        &[
            Patch::insert(TextPosition::new(0, 1), "b"),
            Patch::insert(TextPosition::new(3, 0), "c"),
            Patch::insert(TextPosition::new(0, 0), "d"),
        ],
        &mut recorder,
    )
    .unwrap_err();

    assert_eq!(
        err,
        MergeError::LineOutOfRange {
            patch: 1,
            line: 3,
            line_count: 1,
        }
    );
    assert_eq!(texts(&array), vec!["ab"]);
}

#[test]
fn test_inverted_range_is_rejected() {
    let mut array = lines(&["abc"]);
    let inverted = Patch {
        range: TextRange {
            start: TextPosition::new(0, 2),
            end: TextPosition::new(0, 1),
        },
        text: String::new(),
    };

    let err = merge(&mut array, &[inverted], &mut Recorder::default()).unwrap_err();

    assert!(matches!(err, MergeError::InvertedRange { patch: 0, .. }));
    assert_eq!(texts(&array), vec!["abc"]);
}

#[test]
fn test_character_past_line_end_is_clamped() {
    let mut array = lines(&["ab", "cd"]);
    merge(
        &mut array,
        &[Patch::new(range(0, 10, 1, 0), "+")],
        &mut Recorder::default(),
    )
    .unwrap();

    assert_eq!(texts(&array), vec!["ab+cd"]);
}

#[test]
fn test_characters_are_unicode_scalars() {
    // 𠮷 is one scalar but two UTF-16 code units.
    let mut array = lines(&["𠮷野家", "𠮷"]);
    merge(
        &mut array,
        &[
            Patch::insert(TextPosition::new(0, 1), "《よし》"),
            Patch::new(range(1, 1, 1, 1), "田"),
        ],
        &mut Recorder::default(),
    )
    .unwrap();

    assert_eq!(texts(&array), vec!["𠮷《よし》野家", "𠮷田"]);
    assert_eq!(array[0].data, 7);
}

fn line_len(rope: &Rope, line: usize) -> usize {
    let slice = rope.line(line);
    let len = slice.len_chars();
    if len > 0 && slice.char(len - 1) == '\n' {
        len - 1
    } else {
        len
    }
}

fn random_text(rng: &mut StdRng) -> String {
    const PIECES: [&str; 8] = ["a", "猫", "👋", "\n", "｜漢《かん》", "《《点》》", "  ", "xyz"];
    let pieces = rng.gen_range(0..5);
    (0..pieces)
        .map(|_| PIECES[rng.gen_range(0..PIECES.len())])
        .collect()
}

#[test]
fn test_merge_matches_whole_text_reference() {
    let mut rng = StdRng::seed_from_u64(0x6e6f76656c);

    for _ in 0..200 {
        let initial = "吾輩は猫である。\n名前はまだ無い。\n\nどこで生れたか";
        let mut array: Vec<Line<usize>> = initial
            .split('\n')
            .map(|text| Line::new(text, text.chars().count()))
            .collect();
        let mut reference = Rope::from_str(initial);
        let mut recorder = Recorder::default();

        let batch_len = rng.gen_range(1..6);
        let mut batch = Vec::with_capacity(batch_len);

        for _ in 0..batch_len {
            let line_count = reference.len_lines();
            let start_line = rng.gen_range(0..line_count);
            let end_line = rng.gen_range(start_line..line_count.min(start_line + 3));
            let start_char = rng.gen_range(0..=line_len(&reference, start_line));
            let end_char = if end_line == start_line {
                rng.gen_range(start_char..=line_len(&reference, end_line))
            } else {
                rng.gen_range(0..=line_len(&reference, end_line))
            };
            let text = random_text(&mut rng);

            let from = reference.line_to_char(start_line) + start_char;
            let to = reference.line_to_char(end_line) + end_char;
            reference.remove(from..to);
            reference.insert(from, &text);

            batch.push(Patch::new(range(start_line, start_char, end_line, end_char), text));
        }

        merge(&mut array, &batch, &mut recorder).unwrap();

        assert_eq!(texts(&array).join("\n"), reference.to_string());
        for line in &array {
            assert_eq!(line.data, line.text.chars().count());
        }
    }
}
