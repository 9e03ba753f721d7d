//! Round-trip tests for operation extraction over a corpus of edits.

use ghost_edit::diff::{DiffOperation, DiffText, apply_operation, extract_operation};
use ghost_edit::text::{CURSOR_MARKER, strip_cursor_marker};

/// `▲` stands for the cursor marker in the fixtures below.
fn marked(text: &str) -> String {
    text.replace('▲', CURSOR_MARKER)
}

const CORPUS: &[(&str, &str)] = &[
    ("def hello▲():", "def hello_world▲():"),
    ("print▲(\"hello\")", "print(▲\"hello\")"),
    ("let mut value = 1;▲", "let value = 1;▲"),
    ("fn main() {\n    printl▲\n}", "fn main() {\n    println!(\"▲\");\n}"),
    ("a b c d e▲", "a x c y e▲"),
    ("", "hello▲"),
    ("goodbye▲", ""),
    ("héllo wörld▲", "héllo wörld!▲"),
    ("日本語▲のテキスト", "日本語の▲テキスト"),
    ("if x {\n  a();\n}\n▲", "if x {\n  a();\n  b();\n}\n▲"),
    ("one\ntwo\nthree▲", "one\n2\nthree▲"),
    ("same▲", "same▲"),
    ("tab\tsep▲", "tab    sep▲"),
    ("🦀 crab▲", "🦀 crabs▲"),
];

#[test]
fn applying_the_operation_reproduces_the_new_text() {
    for (old, new) in CORPUS {
        let diff = DiffText::new(marked(old), marked(new));
        let operation = extract_operation(&diff);

        let (old_text, _) = strip_cursor_marker(&diff.old_text);
        let (new_text, _) = strip_cursor_marker(&diff.new_text);

        assert_eq!(
            apply_operation(&old_text, &operation),
            new_text,
            "round trip failed for {old:?} -> {new:?} with {operation:?}"
        );
        assert_eq!(
            operation.is_edit(),
            old_text != new_text,
            "edit classification mismatch for {old:?} -> {new:?}"
        );
    }
}

#[test]
fn comparing_a_text_with_itself_is_none() {
    for (_, new) in CORPUS {
        let text = marked(new);
        assert_eq!(
            extract_operation(&DiffText::new(text.clone(), text)),
            DiffOperation::None
        );
    }
}

#[test]
fn extraction_is_deterministic() {
    for (old, new) in CORPUS {
        let diff = DiffText::new(marked(old), marked(new));
        assert_eq!(extract_operation(&diff), extract_operation(&diff));
    }
}

#[test]
fn positions_are_character_offsets() {
    let operation = extract_operation(&DiffText::new(
        marked("héllo wörld▲"),
        marked("héllo wörld!▲"),
    ));
    assert_eq!(
        operation,
        DiffOperation::Add {
            position: 11,
            text: "!".to_string(),
        }
    );
}

#[test]
fn cursor_move_across_multibyte_text() {
    let operation = extract_operation(&DiffText::new(
        marked("日本語▲のテキスト"),
        marked("日本語の▲テキスト"),
    ));
    assert_eq!(operation, DiffOperation::Cursor { position: 4 });
}
