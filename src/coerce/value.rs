//! Bound Value Module
//!
//! The tagged domain the coercion engine produces for statement binding and
//! consumes for result delivery.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, SecondsFormat};
use serde::{Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

// == Value Kind ==
/// Semantic kind of a bound value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Raw,
    Time,
    Date,
    Timestamp,
    Uuid,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Raw => "raw",
            ValueKind::Time => "time",
            ValueKind::Date => "date",
            ValueKind::Timestamp => "timestamp",
            ValueKind::Uuid => "uuid",
        };
        f.write_str(name)
    }
}

// == Bound Value ==
/// A statement parameter or result value after optimistic coercion.
///
/// `Raw` holds the wire value untouched: strings no recognizer accepted as
/// well as numbers, booleans, null and structured JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    Raw(Value),
    Time(NaiveTime),
    Date(NaiveDate),
    Timestamp(DateTime<FixedOffset>),
    Uuid(Uuid),
}

impl BoundValue {
    /// Semantic kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            BoundValue::Raw(_) => ValueKind::Raw,
            BoundValue::Time(_) => ValueKind::Time,
            BoundValue::Date(_) => ValueKind::Date,
            BoundValue::Timestamp(_) => ValueKind::Timestamp,
            BoundValue::Uuid(_) => ValueKind::Uuid,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, BoundValue::Raw(_))
    }

    /// Whether this is a raw JSON null.
    pub fn is_null(&self) -> bool {
        matches!(self, BoundValue::Raw(Value::Null))
    }

    /// Canonical text of a typed value; `None` for `Raw`.
    ///
    /// - time: `HH:MM:SS`
    /// - date: `YYYY-MM-DD`
    /// - timestamp: RFC 3339 with 0, 3, 6 or 9 fraction digits, `Z` for UTC
    /// - uuid: lower-case hyphenated
    pub fn canonical(&self) -> Option<String> {
        match self {
            BoundValue::Raw(_) => None,
            BoundValue::Time(t) => Some(t.format("%H:%M:%S").to_string()),
            BoundValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            BoundValue::Timestamp(ts) => Some(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            BoundValue::Uuid(u) => Some(u.hyphenated().to_string()),
        }
    }

    /// Wire representation: canonical text for typed values, the original
    /// value for `Raw`.
    pub fn to_wire(&self) -> Value {
        match self {
            BoundValue::Raw(value) => value.clone(),
            typed => Value::String(typed.canonical().unwrap_or_default()),
        }
    }

    /// Consumes the value, returning its wire representation.
    pub fn into_wire(self) -> Value {
        match self {
            BoundValue::Raw(value) => value,
            typed => typed.to_wire(),
        }
    }
}

impl Serialize for BoundValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BoundValue::Raw(value) => value.serialize(serializer),
            typed => serializer.serialize_str(&typed.canonical().unwrap_or_default()),
        }
    }
}

impl From<Value> for BoundValue {
    fn from(value: Value) -> Self {
        BoundValue::Raw(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_and_display() {
        assert_eq!(BoundValue::Raw(json!(1)).kind(), ValueKind::Raw);
        assert_eq!(ValueKind::Timestamp.to_string(), "timestamp");
        assert_eq!(serde_json::to_value(ValueKind::Uuid).unwrap(), json!("uuid"));
    }

    #[test]
    fn test_canonical_forms() {
        let time = NaiveTime::from_hms_opt(16, 0, 1).unwrap();
        assert_eq!(BoundValue::Time(time).canonical().unwrap(), "16:00:01");

        let date = NaiveDate::from_ymd_opt(2016, 3, 16).unwrap();
        assert_eq!(BoundValue::Date(date).canonical().unwrap(), "2016-03-16");

        let ts = DateTime::parse_from_rfc3339("2016-03-16T15:00:00.123Z").unwrap();
        assert_eq!(BoundValue::Timestamp(ts).canonical().unwrap(), "2016-03-16T15:00:00.123Z");

        let ts = DateTime::parse_from_rfc3339("2016-03-16T16:00:00+01:00").unwrap();
        assert_eq!(BoundValue::Timestamp(ts).canonical().unwrap(), "2016-03-16T16:00:00+01:00");
    }

    #[test]
    fn test_raw_wire_is_identity() {
        for value in [json!(null), json!(42), json!(true), json!("plain"), json!({"a": [1, 2]})] {
            assert_eq!(BoundValue::Raw(value.clone()).to_wire(), value);
        }
    }

    #[test]
    fn test_serialize_as_wire_value() {
        let uuid = Uuid::parse_str("f47ac10b-58cc-4372-a567-0e02b2c3d479").unwrap();
        let json = serde_json::to_value(vec![BoundValue::Uuid(uuid), BoundValue::Raw(json!(7))]).unwrap();
        assert_eq!(json, json!(["f47ac10b-58cc-4372-a567-0e02b2c3d479", 7]));
    }

    #[test]
    fn test_null_detection() {
        assert!(BoundValue::Raw(Value::Null).is_null());
        assert!(BoundValue::Raw(json!("")).is_raw());
        assert!(!BoundValue::Raw(json!("")).is_null());
    }
}
