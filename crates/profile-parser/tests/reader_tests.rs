//! Integration tests for reading whole profile files.

use profile_parser::{ParseError, ProfileReader};
use test_utils::{
    linear_profile, profile_file_text, profile_record_text, profile_record_with_count, profiles,
};

// ============================================================================
// Well-formed files
// ============================================================================

#[test]
fn test_reference_record() {
    let mut reader = ProfileReader::new(profiles::REFERENCE_RECORD);
    let raw = reader.next().unwrap().unwrap();
    assert!(reader.next().is_none());

    assert_eq!(raw.line, 1);
    assert_eq!(raw.header.latitude, 10.2);
    assert_eq!(raw.header.longitude, 140.7);
    assert_eq!(raw.header.layer_count, 3);

    let record = raw.parse_samples().unwrap();
    assert_eq!(record.pressure, vec![0.0, 500.0, 1000.0]);
    assert_eq!(record.salinity, profiles::REFERENCE_SALINITY.to_vec());
    assert_eq!(record.temperature, profiles::REFERENCE_TEMPERATURE.to_vec());
    assert_eq!(record.pressure_range(), Some((0.0, 1000.0)));
}

#[test]
fn test_many_records_in_order() {
    let records: Vec<String> = (0..20)
        .map(|i| {
            profile_record_text(
                "2020-03-01",
                -10.0 + i as f64,
                150.0,
                &linear_profile(3 + i % 4, 1500.0),
            )
        })
        .collect();
    let text = profile_file_text(&records);

    let parsed: Vec<_> = ProfileReader::new(&text)
        .map(|r| r.expect("well-formed record"))
        .collect();

    assert_eq!(parsed.len(), 20);
    for (i, raw) in parsed.iter().enumerate() {
        assert_eq!(raw.header.latitude, -10.0 + i as f64);
        assert_eq!(raw.header.layer_count, 3 + i % 4);
        assert_eq!(raw.parse_samples().unwrap().len(), 3 + i % 4);
    }
}

#[test]
fn test_zero_layer_record() {
    let text = profile_file_text(&[
        profile_record_text("2020-01-15", 0.0, 0.0, &[]),
        profile_record_text("2020-01-16", 1.0, 1.0, &linear_profile(2, 10.0)),
    ]);

    let parsed: Vec<_> = ProfileReader::new(&text).collect();
    assert_eq!(parsed.len(), 2);
    let empty = parsed[0].as_ref().unwrap().parse_samples().unwrap();
    assert!(empty.is_empty());
    assert_eq!(empty.pressure_range(), None);
}

#[test]
fn test_blank_lines_between_records() {
    let text = format!(
        "\n\n{}\n{}\n\n",
        profiles::REFERENCE_RECORD,
        profiles::REFERENCE_RECORD
    );
    let lines: Vec<usize> = ProfileReader::new(&text)
        .map(|r| r.unwrap().line)
        .collect();
    assert_eq!(lines, vec![3, 10]);
}

#[test]
fn test_crlf_line_endings() {
    let text = profiles::REFERENCE_RECORD.replace('\n', "\r\n");
    let record = ProfileReader::new(&text)
        .next()
        .unwrap()
        .unwrap()
        .parse_samples()
        .unwrap();
    assert_eq!(record.temperature, vec![20.0, 10.0, 4.0]);
}

// ============================================================================
// Per-record errors
// ============================================================================

#[test]
fn test_malformed_header_skips_to_next_record() {
    let text = format!(
        "2020-01-15 north 140.7 3\npr sa te\n1 2 3\n4 5 6\n7 8 9\n**\n{}",
        profiles::REFERENCE_RECORD
    );
    let results: Vec<_> = ProfileReader::new(&text).collect();

    assert_eq!(results.len(), 2);
    let err = results[0].as_ref().unwrap_err();
    assert!(matches!(err, ParseError::MalformedHeader { line: 1, .. }));
    assert!(!err.is_fatal());
    assert_eq!(results[1].as_ref().unwrap().line, 7);
}

#[test]
fn test_malformed_data_line_is_per_record() {
    let text = format!(
        "2020-01-15 10.0 140.0 2\npr sa te\n5.0 35.0\n10.0 34.9 19.0\n**\n{}",
        profiles::REFERENCE_RECORD
    );
    let raws: Vec<_> = ProfileReader::new(&text).map(|r| r.unwrap()).collect();
    assert_eq!(raws.len(), 2);

    let err = raws[0].parse_samples().unwrap_err();
    assert!(matches!(err, ParseError::MalformedRecord { line: 3, .. }));
    assert!(!err.is_fatal());
    assert!(raws[1].parse_samples().is_ok());
}

// ============================================================================
// Per-file fatal errors
// ============================================================================

#[test]
fn test_layer_count_exceeds_data_lines() {
    let text = format!("{}{}", profiles::SHORT_RECORD, profiles::REFERENCE_RECORD);
    let results: Vec<_> = ProfileReader::new(&text).collect();

    // The reader gives up on the file after the framing error
    assert_eq!(results.len(), 1);
    let err = results[0].as_ref().unwrap_err();
    assert!(err.is_fatal());
    assert!(matches!(err, ParseError::Desynchronized { line: 7, .. }));
}

#[test]
fn test_layer_count_below_data_lines() {
    let text = profile_record_with_count("2020-01-15", 1.0, 2.0, 2, &linear_profile(3, 100.0));
    let results: Vec<_> = ProfileReader::new(&text).collect();
    assert_eq!(results.len(), 1);
    assert!(matches!(
        results[0],
        Err(ParseError::Desynchronized { line: 5, .. })
    ));
}

#[test]
fn test_truncated_inside_data() {
    let text = "2020-01-15 10.2 140.7 3\npr sa te\n0.0 35.0 20.0\n";
    let results: Vec<_> = ProfileReader::new(text).collect();
    assert_eq!(results.len(), 1);
    assert!(matches!(results[0], Err(ParseError::Truncated { line: 3, .. })));
}

#[test]
fn test_huge_layer_count_is_truncated() {
    let text = "2020-01-15 10.2 140.7 2305843009213693952\npr sa te\n0.0 35.0 20.0\n";
    let results: Vec<_> = ProfileReader::new(text).collect();
    assert!(matches!(results[..], [Err(ParseError::Truncated { line: 3, .. })]));
}

#[test]
fn test_huge_layer_count_before_separator() {
    let text = "2020-01-15 10.2 140.7 2305843009213693952\npr sa te\n0.0 35.0 20.0\n**\n";
    let results: Vec<_> = ProfileReader::new(text).collect();
    assert_eq!(results.len(), 1);
    let err = results[0].as_ref().unwrap_err();
    assert!(err.is_fatal());
    assert!(matches!(err, ParseError::Desynchronized { line: 4, .. }));
}

#[test]
fn test_missing_trailing_separator() {
    let text = profiles::REFERENCE_RECORD.trim_end().trim_end_matches("**");
    let results: Vec<_> = ProfileReader::new(text).collect();
    assert!(matches!(results[..], [Err(ParseError::Truncated { .. })]));
}

#[test]
fn test_header_only_is_truncated() {
    let results: Vec<_> = ProfileReader::new("2020-01-15 10.2 140.7 3\n").collect();
    assert!(matches!(results[..], [Err(ParseError::Truncated { line: 1, .. })]));
}

#[test]
fn test_separator_in_place_of_label() {
    let results: Vec<_> = ProfileReader::new("2020-01-15 10.2 140.7 0\n**\n").collect();
    assert!(matches!(
        results[..],
        [Err(ParseError::Desynchronized { line: 2, .. })]
    ));
}

#[test]
fn test_records_before_fatal_error_are_yielded() {
    let text = format!("{}{}", profiles::REFERENCE_RECORD, profiles::SHORT_RECORD);
    let results: Vec<_> = ProfileReader::new(&text).collect();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(results[1].as_ref().unwrap_err().is_fatal());
}
