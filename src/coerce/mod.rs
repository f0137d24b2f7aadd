//! Coercion Module
//!
//! Optimistic promotion of wire strings into precise values before statement
//! binding, and the inverse mapping for result delivery.
//!
//! Both directions are pure functions: no shared state, safe to call from any
//! number of threads. A string no enabled recognizer accepts stays `Raw`;
//! coercion never fails.

mod params;
mod rules;
mod value;


use serde_json::Value;

use crate::config::CastConfig;

// Re-export public types
pub use params::{bind_callable, bind_params, CallableParam, OutType, SqlType};
pub use rules::Recognizer;
pub use value::{BoundValue, ValueKind};

// == Optimistic Cast ==
/// Coerces a wire value. Non-strings pass through as `Raw`.
pub fn optimistic_cast(raw: Value, config: &CastConfig) -> BoundValue {
    match raw {
        Value::String(s) => match recognize(&s, config) {
            Some(value) => value,
            None => BoundValue::Raw(Value::String(s)),
        },
        other => BoundValue::Raw(other),
    }
}

/// Coerces a string, trying the enabled recognizers in priority order.
pub fn optimistic_cast_str(raw: &str, config: &CastConfig) -> BoundValue {
    recognize(raw, config).unwrap_or_else(|| BoundValue::Raw(Value::String(raw.to_owned())))
}

fn recognize(raw: &str, config: &CastConfig) -> Option<BoundValue> {
    Recognizer::PRIORITY
        .iter()
        .filter(|rule| rule.is_enabled(config))
        .find_map(|rule| rule.recognize(raw))
}

// == Convert ==
/// Maps a bound value back to its wire form.
///
/// Typed values become their canonical string; `Raw` is returned unchanged.
pub fn convert_sql_value(value: &BoundValue) -> Value {
    value.to_wire()
}
