use std::collections::BTreeMap;
use std::io::Cursor;

use proptest::prelude::*;
use pwsmith_core::{CondensedPattern, Pattern, Stream, classify, scan_corpus};

fn scan(input: &[u8]) -> (pwsmith_core::ScanSummary, BTreeMap<Stream, Vec<String>>) {
    let mut streams = BTreeMap::new();
    let summary = scan_corpus(Cursor::new(input.to_vec()), &mut streams).expect("scan corpus");
    (summary, streams)
}

fn stream<'a>(streams: &'a BTreeMap<Stream, Vec<String>>, stream: Stream) -> Vec<&'a str> {
    streams
        .get(&stream)
        .map(|values| values.iter().map(String::as_str).collect())
        .unwrap_or_default()
}

#[test]
fn worked_example_streams() {
    let (summary, streams) = scan(b"love1982!\nrose2021!\nLove55\n");

    assert_eq!(summary.valid, 3);
    assert_eq!(summary.skipped, 0);
    assert_eq!(
        stream(&streams, Stream::Pattern),
        vec!["AAAA1111$", "AAAA1111$", "AAAA11"]
    );
    assert_eq!(stream(&streams, Stream::Condensed), vec!["A1$", "A1$", "A1"]);
    assert_eq!(stream(&streams, Stream::Letters), vec!["love", "rose", "Love"]);
    assert_eq!(stream(&streams, Stream::Digits), vec!["1982", "2021", "55"]);
    assert_eq!(stream(&streams, Stream::Specials), vec!["!", "!"]);
}

#[test]
fn invalid_records_are_skipped_without_stopping_the_scan() {
    let mut input = b"abc1\n".to_vec();
    input.extend_from_slice(&[b'x', 0xff, b'1', b'\n']);
    input.extend_from_slice(b"zz9\n");

    let (summary, streams) = scan(&input);

    assert_eq!(summary.lines, 3);
    assert_eq!(summary.valid, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(stream(&streams, Stream::Letters), vec!["abc", "zz"]);
}

#[test]
fn crlf_and_empty_lines_are_handled() {
    let (summary, streams) = scan(b"ab\r\n\r\n\ncd!");

    assert_eq!(summary.lines, 4);
    assert_eq!(summary.valid, 2);
    assert_eq!(summary.empty, 2);
    assert_eq!(stream(&streams, Stream::Pattern), vec!["AA", "AA$"]);
}

#[test]
fn records_without_a_class_contribute_no_runs_for_it() {
    let (_, streams) = scan(b"123456\n");
    assert!(stream(&streams, Stream::Letters).is_empty());
    assert!(stream(&streams, Stream::Specials).is_empty());
    assert_eq!(stream(&streams, Stream::Digits), vec!["123456"]);
}

proptest! {
    #[test]
    fn condensed_patterns_never_repeat_adjacent_tags(record in "[ -~]{0,40}") {
        let result = classify(record.as_bytes()).expect("printable ascii is valid");
        let classes = result.condensed.classes();
        prop_assert!(classes.windows(2).all(|pair| pair[0] != pair[1]));
    }

    #[test]
    fn condensing_is_idempotent(record in "[ -~]{0,40}") {
        let result = classify(record.as_bytes()).expect("printable ascii is valid");
        let reparsed: Pattern = result.pattern.to_string().parse().expect("pattern parses");
        prop_assert_eq!(reparsed.condense(), result.condensed.clone());
        prop_assert_eq!(reparsed.condense(), reparsed.condense());
        let condensed: CondensedPattern = result.condensed.to_string().parse().expect("condensed parses");
        prop_assert_eq!(condensed, result.condensed);
    }

    #[test]
    fn pattern_length_matches_record(record in "[\\x00-\\x7f]{0,40}") {
        let result = classify(record.as_bytes()).expect("7-bit record is valid");
        prop_assert_eq!(result.pattern.len(), record.len());
    }

    #[test]
    fn letter_and_digit_runs_reassemble_their_characters(record in "[ -~]{0,40}") {
        let result = classify(record.as_bytes()).expect("printable ascii is valid");
        let letters: String = record.chars().filter(char::is_ascii_alphabetic).collect();
        let digits: String = record.chars().filter(char::is_ascii_digit).collect();
        prop_assert_eq!(result.letter_runs.concat(), letters);
        prop_assert_eq!(result.digit_runs.concat(), digits);
    }
}
