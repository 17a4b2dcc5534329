use std::time::Duration;

use diffpatch::commonality::{half_match, prefix, suffix};
use diffpatch::{
    levenshtein_distance, source_text, target_text, Config, Diff, Difference, DifferenceEngine,
    EditType, LineMap,
};
use pretty_assertions::assert_eq;

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

#[test]
fn test_inserted_word() {
    // Offsets in the source map onto the target past the insertion
    let diffs = Diff::new("The cat sat.", "The big cat sat.").compare();

    assert_eq!(source_text(&diffs), "The cat sat.");
    assert_eq!(target_text(&diffs), "The big cat sat.");
    assert_eq!(Diff::x_index(&diffs, 4), 8);
    assert_eq!(Diff::x_index(&diffs, 0), 0);
}

#[test]
fn test_half_match_of_long_middle() {
    let source = chars("1234567890123456789012345");
    let target = chars("abc56789012345678901234xyz");

    let middle = half_match(&source, &target).expect("shared middle");
    assert!(middle.commonality.chars().count() * 2 >= target.len());
    assert_eq!(
        format!("{}{}{}", middle.source_prefix, middle.commonality, middle.source_suffix),
        "1234567890123456789012345"
    );
    assert_eq!(
        format!("{}{}{}", middle.target_prefix, middle.commonality, middle.target_suffix),
        "abc56789012345678901234xyz"
    );
}

#[test]
fn test_common_prefix_and_suffix() {
    assert_eq!(prefix(&chars("abc"), &chars("xyz")), 0);
    assert_eq!(prefix(&chars("1234abcdef"), &chars("1234xyz")), 4);
    assert_eq!(prefix(&chars("1234"), &chars("1234xyz")), 4);
    assert_eq!(suffix(&chars("abcdef1234"), &chars("xyz1234")), 4);
    assert_eq!(suffix(&chars("1234"), &chars("xyz1234")), 4);
}

#[test]
fn test_identical_texts() {
    let diffs = Diff::new("same text", "same text").compare();
    assert_eq!(diffs, vec![Difference::equal("same text")]);
}

#[test]
fn test_real_edits_reconstruct() {
    let cases = [
        ("Apples are a fruit.", "Bananas are also fruit."),
        ("ax\t", "\u{0680}x\u{0000}"),
        ("1ayb2", "abxab"),
        ("abcy", "xaxcxabc"),
        (
            "ABCDa=bcd=efghijklmnopqrsEFGHIJKLMNOefg",
            "a-bcd-efghijklmnopqrs",
        ),
        ("a [[Pennsylvania]] and [[New", " and [[Pennsylvania]]"),
    ];
    for (source, target) in cases {
        let diffs = Diff::new(source, target).compare();
        assert_eq!(source_text(&diffs), source, "{source:?} -> {target:?}");
        assert_eq!(target_text(&diffs), target, "{source:?} -> {target:?}");
    }
}

#[test]
fn test_timeout_still_reconstructs() {
    let mut source = String::from(
        "`Twas brillig, and the slithy toves\nDid gyre and gimble in the wabe:\n\
         All mimsy were the borogoves,\nAnd the mome raths outgrabe.\n",
    );
    let mut target = String::from(
        "I am the very model of a modern major general,\nI've information vegetable, animal, and mineral,\n\
         I know the kings of England, and I quote the fights historical,\n\
         From Marathon to Waterloo, in order categorical.\n",
    );
    for _ in 0..6 {
        source = source.repeat(2);
        target = target.repeat(2);
    }

    let config = Config::default().timeout(Duration::from_nanos(1));
    let diffs = Diff::with_config(&source, &target, config).compare();
    assert_eq!(source_text(&diffs), source);
    assert_eq!(target_text(&diffs), target);
}

#[test]
fn test_line_mode_agrees_on_content() {
    let source = "1234567890\n".repeat(13);
    let target = "abcdefghij\n".repeat(13);
    let config = Config::default().timeout(Duration::ZERO);

    let by_lines = Diff::with_config(&source, &target, config).compare();
    let by_chars = Diff::with_config(&source, &target, config)
        .check_lines(false)
        .compare();
    assert_eq!(by_lines, by_chars);

    let source = "1234567890\n".repeat(13);
    let target = "abcdefghij\n1234567890\n".repeat(6) + "1234567890\n";
    let by_lines = Diff::with_config(&source, &target, config).compare();
    assert_eq!(source_text(&by_lines), source);
    assert_eq!(target_text(&by_lines), target);
}

#[test]
fn test_engine_without_shortcuts() {
    let engine = DifferenceEngine::new(Config::default());
    let diffs = engine
        .generate(&chars("abcdxyz"), &chars("xyzabcd"))
        .expect("a path exists");
    assert_eq!(source_text(&diffs), "abcdxyz");
    assert_eq!(target_text(&diffs), "xyzabcd");
    assert!(diffs.iter().any(|d| d.edit_type == EditType::Equal));

    // A single shared char is enough to be kept.
    let diffs = engine
        .generate(&chars("cb"), &chars("abaac"))
        .expect("a path exists");
    assert_eq!(source_text(&diffs), "cb");
    assert_eq!(target_text(&diffs), "abaac");
    assert!(diffs.iter().any(|d| d.edit_type == EditType::Equal));
    assert_ne!(
        Diff::new("cb", "abaac").compare(),
        vec![Difference::delete("cb"), Difference::insert("abaac")]
    );
}

#[test]
fn test_line_map_round_trip() {
    let source = chars("alpha\nbeta\nalpha\n");
    let target = chars("beta\nalpha\nbeta\n");
    let map = LineMap::new(&source, &target);
    assert_eq!(map.line_count(), 2);
    assert_eq!(map.source_map().len(), 3);
    assert_eq!(map.target_map().len(), 3);

    let encoded: String = map.source_map().iter().collect();
    let mut diffs = vec![Difference::equal(encoded)];
    map.restore(&mut diffs);
    assert_eq!(diffs, vec![Difference::equal("alpha\nbeta\nalpha\n")]);
}

#[test]
fn test_levenshtein_of_diff_matches_distance() {
    let cases = [
        ("kitten", "sitting"),
        ("The cat sat.", "The big cat sat."),
        ("abc", ""),
        ("", "xyz"),
    ];
    for (source, target) in cases {
        let diffs = Diff::new(source, target).compare();
        assert!(Diff::levenshtein(&diffs) >= levenshtein_distance(source, target));
    }
    let diffs = Diff::new("abc", "").compare();
    assert_eq!(Diff::levenshtein(&diffs), 3);
}

#[test]
fn test_pretty_html_snapshot() {
    let mut diffs = Diff::new("a <b> & c\n", "a <i> & c\n").compare();
    Diff::assign_indices(&mut diffs);
    insta::assert_snapshot!(
        Diff::pretty_html(&diffs),
        @r###"<SPAN TITLE="i=0">a &lt;</SPAN><DEL STYLE="background:#FFE6E6;" TITLE="i=3">b</DEL><INS STYLE="background:#E6FFE6;" TITLE="i=3">i</INS><SPAN TITLE="i=4">&gt; &amp; c&para;<BR></SPAN>"###
    );
}
