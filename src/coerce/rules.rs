//! Recognizer Rules
//!
//! Each recognizer tests one candidate type. A cheap shape check runs first,
//! then a strict parse, then a canonical check: the parsed value must format
//! back to exactly the input, otherwise the string is not a match.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike};
use regex::Regex;
use tracing::trace;
use uuid::Uuid;

use crate::coerce::{BoundValue, ValueKind};
use crate::config::CastConfig;

static TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}:[0-9]{2}:[0-9]{2}$").expect("time pattern"));
static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date pattern"));
static TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}(\.[0-9]{3}|\.[0-9]{6}|\.[0-9]{9})?(Z|[+-][0-9]{2}:[0-9]{2})$")
        .expect("timestamp pattern")
});
static UUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("uuid pattern")
});

// == Recognizer ==
/// A single coercion rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recognizer {
    Time,
    Date,
    Timestamp,
    Uuid,
}

impl Recognizer {
    /// Rules in the order they are tried; the first match wins.
    pub const PRIORITY: [Recognizer; 4] = [
        Recognizer::Time,
        Recognizer::Date,
        Recognizer::Timestamp,
        Recognizer::Uuid,
    ];

    /// Kind of value this rule produces.
    pub fn kind(self) -> ValueKind {
        match self {
            Recognizer::Time => ValueKind::Time,
            Recognizer::Date => ValueKind::Date,
            Recognizer::Timestamp => ValueKind::Timestamp,
            Recognizer::Uuid => ValueKind::Uuid,
        }
    }

    /// Whether the config switches this rule on.
    pub fn is_enabled(self, config: &CastConfig) -> bool {
        match self {
            Recognizer::Time => config.cast_time,
            Recognizer::Date => config.cast_date,
            Recognizer::Timestamp => config.cast_datetime,
            Recognizer::Uuid => config.cast_uuid,
        }
    }

    fn shape(self) -> &'static Regex {
        match self {
            Recognizer::Time => &*TIME,
            Recognizer::Date => &*DATE,
            Recognizer::Timestamp => &*TIMESTAMP,
            Recognizer::Uuid => &*UUID,
        }
    }

    fn parse(self, raw: &str) -> Option<BoundValue> {
        match self {
            Recognizer::Time => NaiveTime::parse_from_str(raw, "%H:%M:%S")
                .ok()
                .filter(|t| !is_leap_second(t.nanosecond()))
                .map(BoundValue::Time),
            Recognizer::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(BoundValue::Date),
            Recognizer::Timestamp => DateTime::parse_from_rfc3339(raw)
                .ok()
                .filter(|ts| !is_leap_second(ts.nanosecond()))
                .map(BoundValue::Timestamp),
            Recognizer::Uuid => Uuid::try_parse(raw).ok().map(BoundValue::Uuid),
        }
    }

    /// Tries this rule against a string. Never fails: a non-match is `None`.
    pub fn recognize(self, raw: &str) -> Option<BoundValue> {
        if !self.shape().is_match(raw) {
            return None;
        }

        let Some(value) = self.parse(raw) else {
            trace!(kind = %self.kind(), raw, "shape matched but value is invalid");
            return None;
        };

        if value.canonical().as_deref() != Some(raw) {
            trace!(kind = %self.kind(), raw, "value is not in canonical form");
            return None;
        }

        Some(value)
    }
}

/// chrono encodes a leap second as a nanosecond field of one second or more.
fn is_leap_second(nanos: u32) -> bool {
    nanos >= 1_000_000_000
}
