//! Value coercion helpers for reply documents
//!
//! Servers are loose about numeric types: the same count may arrive as
//! Int32, Int64 or Double depending on version and path. These helpers
//! normalize what the result variants read.

use bson::{Bson, Document};

use super::fields;

/// Read a non-negative count, treating absent or non-numeric values as 0.
pub fn read_count(doc: &Document, key: &str) -> u64 {
    doc.get(key).and_then(bson_to_u64).unwrap_or(0)
}

/// Read an optional count, distinguishing absence from zero.
pub fn read_optional_count(doc: &Document, key: &str) -> Option<u64> {
    doc.get(key).and_then(bson_to_u64)
}

/// Read an i32 field stored as any integral numeric type.
pub fn read_i32(doc: &Document, key: &str) -> Option<i32> {
    match doc.get(key)? {
        Bson::Int32(v) => Some(*v),
        Bson::Int64(v) => i32::try_from(*v).ok(),
        Bson::Double(v) => double_to_i64(*v).and_then(|v| i32::try_from(v).ok()),
        _ => None,
    }
}

/// Read an i64 field stored as any integral numeric type.
pub fn read_i64(doc: &Document, key: &str) -> Option<i64> {
    match doc.get(key)? {
        Bson::Int32(v) => Some(i64::from(*v)),
        Bson::Int64(v) => Some(*v),
        Bson::Double(v) => double_to_i64(*v),
        _ => None,
    }
}

/// Read the batch-local `index` of a write error entry.
pub fn read_index(doc: &Document) -> Option<usize> {
    read_i64(doc, fields::INDEX).and_then(|v| usize::try_from(v).ok())
}

/// Encode an index the way the server would, as Int32 when it fits.
pub fn index_to_bson(index: usize) -> Bson {
    match i32::try_from(index) {
        Ok(v) => Bson::Int32(v),
        Err(_) => Bson::Int64(index as i64),
    }
}

/// Whether a field is present and truthy.
///
/// Absent fields, `null` and `false` are falsy; every other value,
/// including `0` and empty strings, is truthy.
pub fn is_truthy(doc: &Document, key: &str) -> bool {
    !matches!(doc.get(key), None | Some(Bson::Null) | Some(Bson::Boolean(false)))
}

/// Whether a field holds something other than null or an empty array.
pub fn is_non_empty(doc: &Document, key: &str) -> bool {
    match doc.get(key) {
        None | Some(Bson::Null) => false,
        Some(Bson::Array(items)) => !items.is_empty(),
        Some(_) => true,
    }
}

/// Whether a numeric value equals 1, as servers report `ok`.
pub fn is_one(value: &Bson) -> bool {
    match value {
        Bson::Int32(v) => *v == 1,
        Bson::Int64(v) => *v == 1,
        Bson::Double(v) => *v == 1.0,
        Bson::Boolean(v) => *v,
        _ => false,
    }
}

/// Integral doubles within i64 range; NaN, infinities and fractions are rejected.
fn double_to_i64(value: f64) -> Option<i64> {
    // 2^63, the first double past i64::MAX
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if value.fract() == 0.0 && (-LIMIT..LIMIT).contains(&value) {
        Some(value as i64)
    } else {
        None
    }
}

fn bson_to_u64(value: &Bson) -> Option<u64> {
    match value {
        Bson::Int32(v) => u64::try_from(*v).ok(),
        Bson::Int64(v) => u64::try_from(*v).ok(),
        Bson::Double(v) => double_to_i64(*v).and_then(|v| u64::try_from(v).ok()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_read_count_numeric_types() {
        let doc = doc! { "a": 3_i32, "b": 4_i64, "c": 5.0, "d": "six", "e": -1 };
        assert_eq!(read_count(&doc, "a"), 3);
        assert_eq!(read_count(&doc, "b"), 4);
        assert_eq!(read_count(&doc, "c"), 5);
        assert_eq!(read_count(&doc, "d"), 0);
        assert_eq!(read_count(&doc, "e"), 0);
        assert_eq!(read_count(&doc, "missing"), 0);
    }

    #[test]
    fn test_out_of_range_doubles_are_rejected() {
        let doc = doc! { "code": 3e9, "id": 1e19, "n": 1e300, "nan": f64::NAN, "neg": -2.0 };
        assert_eq!(read_i32(&doc, "code"), None);
        assert_eq!(read_i64(&doc, "code"), Some(3_000_000_000));
        assert_eq!(read_i64(&doc, "id"), None);
        assert_eq!(read_count(&doc, "n"), 0);
        assert_eq!(read_i64(&doc, "nan"), None);
        assert_eq!(read_i32(&doc, "neg"), Some(-2));
        assert_eq!(read_count(&doc, "neg"), 0);
    }

    #[test]
    fn test_optional_count() {
        let doc = doc! { "nModified": 0 };
        assert_eq!(read_optional_count(&doc, "nModified"), Some(0));
        assert_eq!(read_optional_count(&doc, "n"), None);
    }

    #[test]
    fn test_truthiness() {
        let doc = doc! {
            "t": true,
            "f": false,
            "z": 0,
            "null": Bson::Null,
            "empty": "",
        };
        assert!(is_truthy(&doc, "t"));
        assert!(!is_truthy(&doc, "f"));
        assert!(is_truthy(&doc, "z"));
        assert!(!is_truthy(&doc, "null"));
        assert!(is_truthy(&doc, "empty"));
        assert!(!is_truthy(&doc, "missing"));
    }

    #[test]
    fn test_non_empty() {
        let doc = doc! {
            "none": [],
            "some": [{ "index": 0, "_id": 1 }],
            "null": Bson::Null,
        };
        assert!(!is_non_empty(&doc, "none"));
        assert!(is_non_empty(&doc, "some"));
        assert!(!is_non_empty(&doc, "null"));
        assert!(!is_non_empty(&doc, "missing"));
    }

    #[test]
    fn test_read_index() {
        assert_eq!(read_index(&doc! { "index": 2 }), Some(2));
        assert_eq!(read_index(&doc! { "index": 2_i64 }), Some(2));
        assert_eq!(read_index(&doc! { "index": -1 }), None);
        assert_eq!(read_index(&doc! { "index": "2" }), None);
        assert_eq!(read_index(&doc! {}), None);
    }

    #[test]
    fn test_index_to_bson() {
        assert_eq!(index_to_bson(7), Bson::Int32(7));
        assert_eq!(
            index_to_bson(i32::MAX as usize + 1),
            Bson::Int64(i32::MAX as i64 + 1)
        );
    }

    #[test]
    fn test_is_one() {
        assert!(is_one(&Bson::Int32(1)));
        assert!(is_one(&Bson::Double(1.0)));
        assert!(!is_one(&Bson::Int32(0)));
        assert!(!is_one(&Bson::String("1".to_string())));
    }
}
