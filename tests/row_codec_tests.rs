//! Row Codec Tests
//!
//! These tests verify:
//! - Byte layout of encoded rows
//! - Full decode round-trips, including empty names and values
//! - Filtered decode: subset selection, stored order, early stop
//! - Corruption and missing-field errors

use dstates_bench::row::{
    decode_row, decode_row_filtered, encode_row, encoded_len, Field, LEN_PREFIX_SIZE,
};
use dstates_bench::DbError;

// =============================================================================
// Helper Functions
// =============================================================================

fn sample_row(count: usize) -> Vec<Field> {
    (0..count)
        .map(|i| Field::new(format!("field{}", i), format!("value-{}", i * 7)))
        .collect()
}

fn names(list: &[&str]) -> Vec<Vec<u8>> {
    list.iter().map(|n| n.as_bytes().to_vec()).collect()
}

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_encode_layout() {
    let row = vec![Field::new("ab", "xyz")];
    let encoded = encode_row(&row).unwrap();

    let mut expected = Vec::new();
    expected.extend_from_slice(&2u32.to_le_bytes());
    expected.extend_from_slice(b"ab");
    expected.extend_from_slice(&3u32.to_le_bytes());
    expected.extend_from_slice(b"xyz");

    assert_eq!(encoded, expected);
}

#[test]
fn test_encode_empty_row() {
    let encoded = encode_row(&[]).unwrap();
    assert!(encoded.is_empty());
    assert_eq!(decode_row(&encoded).unwrap(), Vec::<Field>::new());
}

#[test]
fn test_encoded_len_matches_output() {
    let row = sample_row(10);
    let encoded = encode_row(&row).unwrap();

    assert_eq!(encoded.len(), encoded_len(&row));
    let payload: usize = row.iter().map(|f| f.name.len() + f.value.len()).sum();
    assert_eq!(encoded.len(), payload + 2 * LEN_PREFIX_SIZE * row.len());
}

// =============================================================================
// Full Decode Tests
// =============================================================================

#[test]
fn test_round_trip_preserves_order() {
    let row = vec![
        Field::new("zeta", "1"),
        Field::new("alpha", "2"),
        Field::new("mid", "3"),
    ];
    let decoded = decode_row(&encode_row(&row).unwrap()).unwrap();
    assert_eq!(decoded, row);
}

#[test]
fn test_round_trip_empty_names_and_values() {
    let row = vec![Field::new("", ""), Field::new("name", ""), Field::new("", "value")];
    let decoded = decode_row(&encode_row(&row).unwrap()).unwrap();
    assert_eq!(decoded, row);
}

#[test]
fn test_round_trip_binary_values() {
    let value: Vec<u8> = (0..=255u8).collect();
    let row = vec![Field::new(vec![0u8, 255, 1], value.clone()), Field::new("f", value)];
    let decoded = decode_row(&encode_row(&row).unwrap()).unwrap();
    assert_eq!(decoded, row);
}

#[test]
fn test_round_trip_large_value() {
    let row = vec![Field::new("big", vec![b'x'; 1024 * 1024])];
    let decoded = decode_row(&encode_row(&row).unwrap()).unwrap();
    assert_eq!(decoded, row);
}

#[test]
fn test_decode_truncated_length_prefix() {
    let mut encoded = encode_row(&sample_row(2)).unwrap();
    encoded.extend_from_slice(&[1, 0]);

    match decode_row(&encoded) {
        Err(DbError::CorruptRow { offset, .. }) => assert_eq!(offset, encoded.len() - 2),
        other => panic!("Expected CorruptRow, got {:?}", other),
    }
}

#[test]
fn test_decode_truncated_value() {
    let encoded = encode_row(&[Field::new("name", "value")]).unwrap();
    let truncated = &encoded[..encoded.len() - 1];

    assert!(matches!(decode_row(truncated), Err(DbError::CorruptRow { .. })));
}

#[test]
fn test_decode_name_without_value() {
    let encoded = encode_row(&[Field::new("name", "value")]).unwrap();
    // Cut right after the name record
    let truncated = &encoded[..LEN_PREFIX_SIZE + 4];

    assert!(matches!(decode_row(truncated), Err(DbError::CorruptRow { .. })));
}

#[test]
fn test_decode_length_overruns_buffer() {
    let mut encoded = Vec::new();
    encoded.extend_from_slice(&u32::MAX.to_le_bytes());
    encoded.extend_from_slice(b"short");

    assert!(matches!(decode_row(&encoded), Err(DbError::CorruptRow { .. })));
}

// =============================================================================
// Filtered Decode Tests
// =============================================================================

#[test]
fn test_filtered_subset() {
    let row = sample_row(10);
    let encoded = encode_row(&row).unwrap();

    let decoded = decode_row_filtered(&encoded, &names(&["field2", "field5", "field9"])).unwrap();

    assert_eq!(decoded, vec![row[2].clone(), row[5].clone(), row[9].clone()]);
}

#[test]
fn test_filtered_single_field() {
    let row = sample_row(5);
    let encoded = encode_row(&row).unwrap();

    let decoded = decode_row_filtered(&encoded, &["field0"]).unwrap();
    assert_eq!(decoded, vec![row[0].clone()]);
}

#[test]
fn test_filtered_all_fields_equals_full_decode() {
    let row = sample_row(6);
    let encoded = encode_row(&row).unwrap();
    let all: Vec<Vec<u8>> = row.iter().map(|f| f.name.clone()).collect();

    assert_eq!(decode_row_filtered(&encoded, &all).unwrap(), row);
}

#[test]
fn test_filtered_out_of_order_request_returns_stored_order() {
    let row = sample_row(6);
    let encoded = encode_row(&row).unwrap();

    let decoded = decode_row_filtered(&encoded, &names(&["field4", "field1"])).unwrap();

    assert_eq!(decoded, vec![row[1].clone(), row[4].clone()]);
}

#[test]
fn test_filtered_duplicate_names_count_once() {
    let row = sample_row(3);
    let encoded = encode_row(&row).unwrap();

    let decoded = decode_row_filtered(&encoded, &names(&["field1", "field1"])).unwrap();
    assert_eq!(decoded, vec![row[1].clone()]);
}

#[test]
fn test_filtered_empty_request() {
    let encoded = encode_row(&sample_row(3)).unwrap();
    let decoded = decode_row_filtered::<Vec<u8>>(&encoded, &[]).unwrap();
    assert!(decoded.is_empty());
}

#[test]
fn test_filtered_missing_field() {
    let encoded = encode_row(&sample_row(3)).unwrap();

    match decode_row_filtered(&encoded, &names(&["field1", "nope", "other"])) {
        Err(DbError::MissingFields(missing)) => {
            assert_eq!(missing, vec!["nope".to_string(), "other".to_string()]);
        }
        other => panic!("Expected MissingFields, got {:?}", other),
    }
}

#[test]
fn test_filtered_stops_after_last_match() {
    let row = sample_row(3);
    let mut encoded = encode_row(&row).unwrap();
    // Garbage after the matched field is never read
    encoded.extend_from_slice(&[0xff, 0xff]);

    let decoded = decode_row_filtered(&encoded, &["field2"]).unwrap();
    assert_eq!(decoded, vec![row[2].clone()]);
}

#[test]
fn test_filtered_corruption_before_match() {
    let mut encoded = encode_row(&sample_row(2)).unwrap();
    encoded.extend_from_slice(&[9, 0, 0]);

    assert!(matches!(
        decode_row_filtered(&encoded, &["missing"]),
        Err(DbError::CorruptRow { .. })
    ));
}
