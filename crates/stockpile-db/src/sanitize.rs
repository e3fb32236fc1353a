//! # Sanitizer
//!
//! Turns store values into plain data that can leave the store layer:
//! every `Value::Timestamp` becomes its ISO-8601 string, arrays are mapped
//! element-wise and maps are rebuilt key by key.
//!
//! ```text
//! Value::Map {                         Value::Map {
//!   "date": Timestamp(2026-03-01…),  ──►  "date": "2026-03-01T10:00:00.000Z",
//!   "items": [ Map {…}, … ],               "items": [ Map {…}, … ],
//! }                                    }
//! ```
//!
//! Sanitizing is idempotent: the output contains no timestamps, so a second
//! pass returns it unchanged.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::value::{Fields, Value};

/// Renders a timestamp the way browsers do (`Date.prototype.toISOString`):
/// UTC, millisecond precision, `Z` suffix.
pub fn to_iso_string(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Recursively replaces timestamps with ISO-8601 strings.
pub fn sanitize(value: &Value) -> Value {
    match value {
        Value::Timestamp(ts) => Value::String(to_iso_string(ts)),
        Value::Array(items) => Value::Array(items.iter().map(sanitize).collect()),
        Value::Map(fields) => Value::Map(sanitize_fields(fields)),
        other => other.clone(),
    }
}

/// Sanitizes every field of a document or nested map.
pub fn sanitize_fields(fields: &Fields) -> Fields {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), sanitize(value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Value {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        let mut line = Fields::new();
        line.insert("productId".into(), Value::from("P1"));
        line.insert("countedAt".into(), Value::Timestamp(ts));

        let mut root = Fields::new();
        root.insert("date".into(), Value::Timestamp(ts));
        root.insert("items".into(), Value::Array(vec![Value::Map(line)]));
        root.insert("total".into(), Value::Integer(5000));
        root.insert("note".into(), Value::Null);
        Value::Map(root)
    }

    #[test]
    fn test_timestamps_become_iso_strings() {
        let clean = sanitize(&sample());
        let fields = clean.as_map().unwrap();

        assert_eq!(fields["date"], Value::from("2026-03-01T10:00:00.000Z"));
        let line = fields["items"].as_array().unwrap()[0].as_map().unwrap();
        assert_eq!(line["countedAt"], Value::from("2026-03-01T10:00:00.000Z"));
        assert_eq!(line["productId"], Value::from("P1"));
        assert_eq!(fields["total"], Value::Integer(5000));
        assert!(fields["note"].is_null());
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let once = sanitize(&sample());
        let twice = sanitize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_scalars_pass_through() {
        assert_eq!(sanitize(&Value::Double(1.5)), Value::Double(1.5));
        assert_eq!(sanitize(&Value::from("x")), Value::from("x"));
        assert_eq!(sanitize(&Value::Bool(true)), Value::Bool(true));
    }

    #[test]
    fn test_iso_string_keeps_milliseconds() {
        let ts = Utc.timestamp_millis_opt(1_767_225_600_123).unwrap();
        assert_eq!(to_iso_string(&ts), "2026-01-01T00:00:00.123Z");
    }
}
