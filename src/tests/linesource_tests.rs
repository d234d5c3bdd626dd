// src/tests/linesource_tests.rs

//! tests for `linesource.rs`

#![allow(non_snake_case)]

use crate::common::{FPath, SourceError};
use crate::data::datetime::{DateTimeL, Duration};
use crate::data::range::Options;
use crate::readers::linesource::{LineSource, LineSourceStatus};
use crate::tests::common::{
    dt_utc,
    generate_lines,
    input_sequential,
    linesource,
    options,
    FORMAT_ISO,
    NOW_2024,
};

use ::test_case::test_case;

/// Drain `linesource`, returning each emitted line.
fn drain(linesource: &mut LineSource) -> Result<Vec<String>, SourceError> {
    let mut lines: Vec<String> = Vec::new();
    linesource.advance()?;
    while let Some(linedata) = linesource.take_current() {
        lines.push(String::from_utf8_lossy(linedata.as_bytes()).to_string());
        linesource.advance()?;
    }

    Ok(lines)
}

fn options_min(
    from_min: u32,
    to_min: u32,
) -> Options {
    options(dt_utc(2024, 1, 1, 0, from_min, 0), dt_utc(2024, 1, 1, 0, to_min, 0), false, false)
}

const DATA_5: &str = "\
2024-01-01 00:01:00 one
2024-01-01 00:02:00 two
2024-01-01 00:03:00 three
2024-01-01 00:04:00 four
2024-01-01 00:05:00 five
";

#[test_case(0, 10, &["one", "two", "three", "four", "five"]; "all")]
#[test_case(2, 4, &["two", "three"]; "middle")]
#[test_case(2, 3, &["two"]; "one line")]
#[test_case(3, 3, &[]; "empty range")]
#[test_case(5, 6, &["five"]; "last")]
#[test_case(6, 9, &[]; "after all")]
#[test_case(0, 1, &[]; "before all")]
fn test_linesource_range(
    from_min: u32,
    to_min: u32,
    expect: &[&str],
) {
    for use_seek in [true, false] {
        let mut ls = linesource(DATA_5, &FORMAT_ISO, options_min(from_min, to_min), use_seek);
        let lines = drain(&mut ls).unwrap();
        let lines: Vec<&str> = lines
            .iter()
            .map(|line| &line[20..])
            .collect();
        assert_eq!(lines, expect, "use_seek {}", use_seek);
        assert!(ls.status().is_done(), "status {:?}", ls.status());
        assert!(ls.current().is_none());
    }
}

#[test]
fn test_linesource_seek_matches_no_seek() {
    let data: String = generate_lines(dt_utc(2024, 1, 1, 0, 0, 0), Duration::seconds(3), 5000);
    let from: DateTimeL = dt_utc(2024, 1, 1, 1, 0, 1);
    let to: DateTimeL = dt_utc(2024, 1, 1, 2, 0, 0);
    let mut ls_seek = linesource(&data, &FORMAT_ISO, options(from, to, false, false), true);
    let mut ls_noseek = linesource(&data, &FORMAT_ISO, options(from, to, false, false), false);
    let lines_seek = drain(&mut ls_seek).unwrap();
    let lines_noseek = drain(&mut ls_noseek).unwrap();
    assert_eq!(lines_seek.len(), 1199);
    assert_eq!(lines_seek, lines_noseek);
    assert!(lines_seek[0].starts_with("2024-01-01 01:00:03"), "{:?}", lines_seek[0]);
    // the seek skipped most lines before `from`
    assert!(
        ls_seek.count_lines_read() < ls_noseek.count_lines_read(),
        "seek read {} lines, no seek read {} lines",
        ls_seek.count_lines_read(),
        ls_noseek.count_lines_read(),
    );
}

#[test]
fn test_linesource_out_of_range() {
    let mut ls = linesource(DATA_5, &FORMAT_ISO, options_min(7, 9), true);
    assert_eq!(ls.status(), LineSourceStatus::OutOfRange);
    ls.advance().unwrap();
    assert_eq!(ls.status(), LineSourceStatus::OutOfRange);
    assert!(ls.current().is_none());
    assert_eq!(ls.count_lines_read(), 0);
}

#[test]
fn test_linesource_exhausted_at_to() {
    let mut ls = linesource(DATA_5, &FORMAT_ISO, options_min(1, 3), false);
    ls.advance().unwrap();
    assert_eq!(ls.status(), LineSourceStatus::InRange);
    ls.advance().unwrap();
    assert_eq!(ls.status(), LineSourceStatus::InRange);
    ls.advance().unwrap();
    assert_eq!(ls.status(), LineSourceStatus::Exhausted);
    // the line at `to` was read, nothing after it
    assert_eq!(ls.count_lines_read(), 3);
    ls.advance().unwrap();
    assert_eq!(ls.count_lines_read(), 3);
}

#[test]
fn test_linesource_exhausted_at_eof() {
    let mut ls = linesource(DATA_5, &FORMAT_ISO, options_min(4, 30), false);
    assert_eq!(drain(&mut ls).unwrap().len(), 2);
    assert_eq!(ls.status(), LineSourceStatus::Exhausted);
}

#[test]
fn test_linesource_empty() {
    let mut ls = linesource("", &FORMAT_ISO, options_min(0, 30), false);
    assert!(drain(&mut ls).unwrap().is_empty());
    assert_eq!(ls.status(), LineSourceStatus::Exhausted);
}

const DATA_DATELESS: &str = "\
2024-01-01 00:01:00 one
2024-01-01 00:02:00 two
  detail of two
2024-01-01 00:03:00 three
";

#[test]
fn test_linesource_dateless_abort() {
    let mut ls = linesource(DATA_DATELESS, &FORMAT_ISO, options_min(0, 10), false);
    ls.advance().unwrap();
    ls.advance().unwrap();
    assert_eq!(ls.current().unwrap().as_bytes(), b"2024-01-01 00:02:00 two");
    match ls.advance() {
        Err(SourceError::Dateless { path, line }) => {
            assert_eq!(path, FPath::from("test"));
            assert_eq!(line, b"  detail of two".to_vec());
        }
        ret => panic!("expected Err(Dateless), got {:?}", ret),
    }
    assert_eq!(ls.status(), LineSourceStatus::Fatal);
    assert!(ls.current().is_none());
}

#[test]
fn test_linesource_dateless_abort_while_seeking() {
    let mut ls = linesource(DATA_DATELESS, &FORMAT_ISO, options_min(3, 10), false);
    assert!(matches!(ls.advance(), Err(SourceError::Dateless { .. })));
    assert_eq!(ls.status(), LineSourceStatus::Fatal);
}

#[test]
fn test_linesource_dateless_after_range_not_read() {
    // the dateless line follows the line at `to`, it is never read
    let mut ls = linesource(DATA_DATELESS, &FORMAT_ISO, options_min(1, 2), false);
    assert_eq!(drain(&mut ls).unwrap(), vec!["2024-01-01 00:01:00 one"]);
    assert_eq!(ls.status(), LineSourceStatus::Exhausted);
}

#[test]
fn test_linesource_dateless_skip() {
    let mut ls = linesource(
        DATA_DATELESS,
        &FORMAT_ISO,
        options(dt_utc(2024, 1, 1, 0, 0, 0), dt_utc(2024, 1, 1, 0, 10, 0), true, false),
        false,
    );
    assert_eq!(
        drain(&mut ls).unwrap(),
        vec![
            "2024-01-01 00:01:00 one",
            "2024-01-01 00:02:00 two",
            "2024-01-01 00:03:00 three",
        ]
    );
}

#[test]
fn test_linesource_multiline() {
    let mut ls = linesource(
        DATA_DATELESS,
        &FORMAT_ISO,
        options(dt_utc(2024, 1, 1, 0, 2, 0), dt_utc(2024, 1, 1, 0, 10, 0), false, true),
        false,
    );
    ls.advance().unwrap();
    let two = ls.take_current().unwrap();
    assert!(!two.is_continuation());
    ls.advance().unwrap();
    let detail = ls.take_current().unwrap();
    assert!(detail.is_continuation());
    assert_eq!(detail.as_bytes(), b"  detail of two");
    assert_eq!(detail.dt(), two.dt());
    ls.advance().unwrap();
    assert_eq!(ls.current().unwrap().as_bytes(), b"2024-01-01 00:03:00 three");
}

#[test]
fn test_linesource_multiline_dateless_while_seeking() {
    // a dateless line before any in-range line is not a continuation, it
    // is passed over
    let data = "  orphan\n2024-01-01 00:01:00 one\n  detail of one\n";
    let mut ls = linesource(data, &FORMAT_ISO, options(*NOW_2024 - Duration::days(365), *NOW_2024, false, true), false);
    assert_eq!(
        drain(&mut ls).unwrap(),
        vec!["2024-01-01 00:01:00 one", "  detail of one"]
    );
    assert_eq!(ls.count_lines_read(), 3);
}

#[test]
fn test_linesource_before_range_dropped_in_stream() {
    // out-of-order input; a line before `from` after in-range lines is dropped
    let data = "\
2024-01-01 00:02:00 two
2024-01-01 00:01:00 one
2024-01-01 00:03:00 three
2024-01-01 00:09:00 nine
";
    let mut ls = linesource(data, &FORMAT_ISO, options_min(2, 5), false);
    assert_eq!(
        drain(&mut ls).unwrap(),
        vec!["2024-01-01 00:02:00 two", "2024-01-01 00:03:00 three"]
    );
}

#[test]
fn test_linesource_sequential() {
    let mut ls = LineSource::from_input(
        FPath::from("-"),
        input_sequential(DATA_5.as_bytes()),
        FORMAT_ISO.clone(),
        options_min(3, 5),
        *NOW_2024,
        true,
    )
    .unwrap();
    assert_eq!(
        drain(&mut ls).unwrap(),
        vec!["2024-01-01 00:03:00 three", "2024-01-01 00:04:00 four"]
    );
    assert_eq!(ls.path(), "-");
}

#[test]
fn test_linesource_crlf() {
    let data = "2024-01-01 00:01:00 one\r\n2024-01-01 00:02:00 two\r\n";
    let mut ls = linesource(data, &FORMAT_ISO, options_min(0, 10), true);
    assert_eq!(
        drain(&mut ls).unwrap(),
        vec!["2024-01-01 00:01:00 one", "2024-01-01 00:02:00 two"]
    );
}
