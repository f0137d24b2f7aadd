//! Integration Tests for Value Coercion
//!
//! Exercises the public coercion surface the way a host binds parameters and
//! decodes results.

use serde_json::{json, Value};
use sql_bridge::coerce::{bind_callable, bind_params, CallableParam, OutType, SqlType};
use sql_bridge::{convert_sql_value, optimistic_cast, optimistic_cast_str, BoundValue, CastConfig, ValueKind};

const UUID: &str = "f47ac10b-58cc-4372-a567-0e02b2c3d479";

#[test]
fn test_round_trip_of_each_kind() {
    let config = CastConfig::from_json(&json!({"castUUID": true})).unwrap();

    for (s, kind) in [
        ("16:00:00", ValueKind::Time),
        ("2016-03-16", ValueKind::Date),
        ("2016-03-16T16:00:00Z", ValueKind::Timestamp),
        (UUID, ValueKind::Uuid),
    ] {
        let cast = optimistic_cast_str(s, &config);
        assert_eq!(cast.kind(), kind, "{s}");
        assert_eq!(convert_sql_value(&cast), json!(s));
    }
}

#[test]
fn test_graceful_degradation() {
    let config = CastConfig::default();

    for s in ["2016-03-16T16:00:00", "24:00:00", "2016-00-00"] {
        assert_eq!(optimistic_cast(json!(s), &config), BoundValue::Raw(json!(s)));
    }
}

#[test]
fn test_uuid_config_gating() {
    let enabled = CastConfig::from_json(&json!({"castUUID": true})).unwrap();
    let disabled = CastConfig::from_json(&json!({"castUUID": false})).unwrap();

    assert_eq!(optimistic_cast_str(UUID, &enabled).kind(), ValueKind::Uuid);
    assert_eq!(optimistic_cast_str(UUID, &disabled), BoundValue::Raw(json!(UUID)));
}

#[test]
fn test_toggles_from_host_config() {
    let config = CastConfig::from_json(&json!({
        "url": "jdbc:h2:mem:test",
        "castTime": false,
        "castDate": false,
        "castDatetime": false,
    }))
    .unwrap();

    for s in ["16:00:00", "2016-03-16", "2016-03-16T16:00:00Z"] {
        assert!(optimistic_cast_str(s, &config).is_raw());
    }
}

#[test]
fn test_prepared_statement_binding() {
    let params: Vec<Value> = serde_json::from_str(
        r#"["2016-03-16T16:00:00Z", 10, null, "f47ac10b-58cc-4372-a567-0e02b2c3d479", "joe"]"#,
    )
    .unwrap();

    let bound = bind_params(&params, &CastConfig::default().with_uuid(true));
    let kinds: Vec<ValueKind> = bound.iter().map(BoundValue::kind).collect();
    assert_eq!(
        kinds,
        vec![ValueKind::Timestamp, ValueKind::Raw, ValueKind::Raw, ValueKind::Uuid, ValueKind::Raw]
    );

    // Results decode back to exactly what the caller sent.
    let decoded: Vec<Value> = bound.iter().map(convert_sql_value).collect();
    assert_eq!(decoded, params);
}

#[test]
fn test_callable_statement_binding() {
    let ins = [json!("2016-03-16"), json!(null)];
    let outs = [json!(null), json!("TIMESTAMP"), json!(-10)];

    let bound = bind_callable(&ins, &outs, &CastConfig::default()).unwrap();
    assert_eq!(bound.len(), 3);
    assert!(matches!(&bound[0], CallableParam::In(v) if v.kind() == ValueKind::Date));
    assert_eq!(bound[1], CallableParam::Out(OutType::Standard(SqlType::Timestamp)));
    assert_eq!(bound[2], CallableParam::Out(OutType::Vendor(-10)));
}

#[test]
fn test_bound_values_serialize_as_wire_values() {
    let bound = bind_params(&[json!("16:00:00"), json!(3.5)], &CastConfig::default());
    assert_eq!(serde_json::to_value(&bound).unwrap(), json!(["16:00:00", 3.5]));
}
