//! Integration tests for the diff module public API.

use stagecraft::diff::{diff_lines, render_unified, DiffKind, DiffStats};

fn old_side(lines: &[stagecraft::diff::DiffLine]) -> Vec<&str> {
    lines
        .iter()
        .filter(|l| l.kind != DiffKind::Added)
        .map(|l| l.text.as_str())
        .collect()
}

fn new_side(lines: &[stagecraft::diff::DiffLine]) -> Vec<&str> {
    lines
        .iter()
        .filter(|l| l.kind != DiffKind::Removed)
        .map(|l| l.text.as_str())
        .collect()
}

#[test]
fn single_line_substitution() {
    let diff = diff_lines("a\nb\nc", "a\nx\nc");
    let pairs: Vec<_> = diff.iter().map(|l| (l.kind, l.text.as_str())).collect();
    assert_eq!(
        pairs,
        vec![
            (DiffKind::Same, "a"),
            (DiffKind::Removed, "b"),
            (DiffKind::Added, "x"),
            (DiffKind::Same, "c"),
        ]
    );
}

#[test]
fn both_sides_are_reconstructed() {
    let old = "Headline\n\nBody one\nBody two\nSign-off";
    let new = "New headline\n\nBody one\nBody three\nBody two\nSign-off\nP.S.";
    let diff = diff_lines(old, new);

    assert_eq!(old_side(&diff), old.split('\n').collect::<Vec<_>>());
    assert_eq!(new_side(&diff), new.split('\n').collect::<Vec<_>>());
}

#[test]
fn identical_inputs_are_all_same() {
    let text = "one\ntwo\nthree";
    let diff = diff_lines(text, text);
    assert!(diff.iter().all(|l| l.kind == DiffKind::Same));
    assert!(!DiffStats::from_lines(&diff).has_changes());
}

#[test]
fn stats_and_rendering_agree() {
    let diff = diff_lines("keep\ndrop", "keep\nadd\nadd again");
    let stats = DiffStats::from_lines(&diff);
    assert_eq!(stats.summary(), "+2 -1");

    let rendered = render_unified(&diff);
    assert_eq!(rendered.lines().filter(|l| l.starts_with("+ ")).count(), 2);
    assert_eq!(rendered.lines().filter(|l| l.starts_with("- ")).count(), 1);
}
