//! # Document Values
//!
//! The tagged value model every document field is made of.
//!
//! ## Why a Tagged Timestamp?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  JSON has no date type. The store keeps timestamps distinguishable     │
//! │  from ordinary strings by tagging them in the stored body:             │
//! │                                                                         │
//! │    stored:   {"createdAt": {"$timestamp": "2026-03-01T10:00:00Z"}}     │
//! │    decoded:  Value::Timestamp(2026-03-01T10:00:00Z)                    │
//! │    sanitized for clients: "2026-03-01T10:00:00.000Z"                   │
//! │                                                                         │
//! │  Downstream code matches on Value::Timestamp; it never has to guess    │
//! │  whether a string or object "looks like" a date.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde_json::{Map, Number};
use std::collections::BTreeMap;
use thiserror::Error;

/// Key used to tag timestamps in the stored JSON body.
pub const TIMESTAMP_TAG: &str = "$timestamp";

/// Field map of a document or nested map value.
pub type Fields = BTreeMap<String, Value>;

/// A single document field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    Array(Vec<Value>),
    Map(Fields),
}

/// Reasons a value cannot be written or read back.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WireError {
    /// NaN and infinities have no JSON representation.
    #[error("number is not finite")]
    NonFiniteNumber,

    /// A `$timestamp` tag whose payload is not RFC 3339.
    #[error("invalid timestamp '{0}'")]
    BadTimestamp(String),

    /// A map key that collides with the timestamp tag.
    #[error("field name '{0}' is reserved")]
    ReservedKey(String),
}

impl Value {
    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of the value; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Double(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Fields> {
        match self {
            Value::Map(fields) => Some(fields),
            _ => None,
        }
    }

    // -------------------------------------------------------------------------
    // Wire Codec (stored JSON body)
    // -------------------------------------------------------------------------

    /// Encodes the value into the stored JSON form, tagging timestamps.
    pub fn to_wire(&self) -> Result<serde_json::Value, WireError> {
        Ok(match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Integer(n) => serde_json::Value::Number((*n).into()),
            Value::Double(n) => {
                serde_json::Value::Number(Number::from_f64(*n).ok_or(WireError::NonFiniteNumber)?)
            }
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Timestamp(ts) => {
                let mut tagged = Map::new();
                tagged.insert(
                    TIMESTAMP_TAG.to_string(),
                    serde_json::Value::String(ts.to_rfc3339()),
                );
                serde_json::Value::Object(tagged)
            }
            Value::Array(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(Value::to_wire)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Value::Map(fields) => serde_json::Value::Object(fields_to_wire(fields)?),
        })
    }

    /// Decodes a stored JSON body, turning `$timestamp` tags back into
    /// `Value::Timestamp`.
    pub fn from_wire(json: serde_json::Value) -> Result<Value, WireError> {
        Ok(match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => number_to_value(&n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(Value::from_wire)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            serde_json::Value::Object(map) => {
                if let Some(raw) = timestamp_tag(&map) {
                    let ts = DateTime::parse_from_rfc3339(raw)
                        .map_err(|_| WireError::BadTimestamp(raw.to_string()))?;
                    Value::Timestamp(ts.with_timezone(&Utc))
                } else {
                    Value::Map(fields_from_wire(map)?)
                }
            }
        })
    }
}

fn number_to_value(n: &Number) -> Value {
    match n.as_i64() {
        Some(i) => Value::Integer(i),
        None => Value::Double(n.as_f64().unwrap_or(0.0)),
    }
}

/// A map is a timestamp tag only if `$timestamp` is its sole key.
fn timestamp_tag(map: &Map<String, serde_json::Value>) -> Option<&str> {
    if map.len() != 1 {
        return None;
    }
    map.get(TIMESTAMP_TAG).and_then(serde_json::Value::as_str)
}

/// Encodes a field map into a JSON object.
///
/// `$timestamp` is reserved at every level so stored maps never read back as
/// timestamps.
pub fn fields_to_wire(fields: &Fields) -> Result<Map<String, serde_json::Value>, WireError> {
    let mut map = Map::new();
    for (key, value) in fields {
        if key == TIMESTAMP_TAG {
            return Err(WireError::ReservedKey(key.clone()));
        }
        map.insert(key.clone(), value.to_wire()?);
    }
    Ok(map)
}

/// Decodes a JSON object into a field map.
pub fn fields_from_wire(map: Map<String, serde_json::Value>) -> Result<Fields, WireError> {
    map.into_iter()
        .map(|(key, value)| Ok((key, Value::from_wire(value)?)))
        .collect()
}

// =============================================================================
// Plain JSON interop
// =============================================================================

/// Plain JSON has no timestamps; nothing is tag-decoded here.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => number_to_value(&n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

/// Client-facing JSON. Timestamps render as ISO-8601 strings; non-finite
/// doubles render as `null`.
impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Integer(n) => serde_json::Value::Number(n.into()),
            Value::Double(n) => Number::from_f64(n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s),
            Value::Timestamp(ts) => {
                serde_json::Value::String(crate::sanitize::to_iso_string(&ts))
            }
            Value::Array(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Map(fields) => serde_json::Value::Object(
                fields
                    .into_iter()
                    .map(|(key, value)| (key, value.into()))
                    .collect(),
            ),
        }
    }
}

// =============================================================================
// Conversions into Value
// =============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Double(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(ts: DateTime<Utc>) -> Self {
        Value::Timestamp(ts)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Fields> for Value {
    fn from(fields: Fields) -> Self {
        Value::Map(fields)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_timestamp_is_tagged_on_the_wire() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        let wire = Value::Timestamp(ts).to_wire().unwrap();

        assert_eq!(wire, json!({ "$timestamp": "2026-03-01T10:00:00+00:00" }));
        assert_eq!(Value::from_wire(wire).unwrap(), Value::Timestamp(ts));
    }

    #[test]
    fn test_nested_values_decode() {
        let wire = json!({
            "name": "Cola",
            "stock": 12.5,
            "priceCents": 199,
            "tags": ["drink", { "$timestamp": "2026-03-01T10:00:00Z" }],
            "meta": { "$timestamp": "2026-03-01T10:00:00Z", "by": "user-1" }
        });

        let value = Value::from_wire(wire).unwrap();
        let fields = value.as_map().unwrap();

        assert_eq!(fields["stock"], Value::Double(12.5));
        assert_eq!(fields["priceCents"], Value::Integer(199));
        assert!(fields["tags"].as_array().unwrap()[1].as_timestamp().is_some());
        // Two keys: an ordinary map, not a timestamp tag
        assert!(fields["meta"].as_map().is_some());
    }

    #[test]
    fn test_non_finite_double_cannot_be_stored() {
        assert_eq!(
            Value::Double(f64::NAN).to_wire(),
            Err(WireError::NonFiniteNumber)
        );
    }

    #[test]
    fn test_timestamp_tag_is_reserved_as_field_name() {
        let mut spoof = Fields::new();
        spoof.insert(TIMESTAMP_TAG.to_string(), Value::from("yesterday"));

        assert_eq!(
            Value::Map(spoof.clone()).to_wire(),
            Err(WireError::ReservedKey("$timestamp".to_string()))
        );

        let mut outer = Fields::new();
        outer.insert("meta".to_string(), Value::Map(spoof));
        assert!(fields_to_wire(&outer).is_err());
    }

    #[test]
    fn test_bad_timestamp_tag() {
        let err = Value::from_wire(json!({ "$timestamp": "yesterday" })).unwrap_err();
        assert_eq!(err, WireError::BadTimestamp("yesterday".to_string()));
    }

    #[test]
    fn test_integral_double_stays_double() {
        let wire = Value::Double(5.0).to_wire().unwrap();
        assert_eq!(Value::from_wire(wire).unwrap(), Value::Double(5.0));
    }
}
