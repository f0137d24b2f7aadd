//! Statement Parameter Binding
//!
//! Turns the positional JSON parameter lists a host receives into bound
//! values, including the IN/OUT layout of callable statements.

use serde_json::Value;
use tracing::debug;

use crate::coerce::{optimistic_cast, BoundValue};
use crate::config::CastConfig;
use crate::error::{BridgeError, Result};

// == SQL Types ==
/// Standard JDBC type identifiers usable for OUT parameter registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Bit,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Float,
    Real,
    Double,
    Numeric,
    Decimal,
    Char,
    Varchar,
    LongVarchar,
    Date,
    Time,
    Timestamp,
    Binary,
    VarBinary,
    LongVarBinary,
    Null,
    Other,
    JavaObject,
    Distinct,
    Struct,
    Array,
    Blob,
    Clob,
    Ref,
    DataLink,
    Boolean,
    RowId,
    NChar,
    NVarchar,
    LongNVarchar,
    NClob,
    SqlXml,
    RefCursor,
    TimeWithTimezone,
    TimestampWithTimezone,
}

impl SqlType {
    /// Every standard type.
    pub const ALL: [SqlType; 39] = [
        SqlType::Bit,
        SqlType::TinyInt,
        SqlType::SmallInt,
        SqlType::Integer,
        SqlType::BigInt,
        SqlType::Float,
        SqlType::Real,
        SqlType::Double,
        SqlType::Numeric,
        SqlType::Decimal,
        SqlType::Char,
        SqlType::Varchar,
        SqlType::LongVarchar,
        SqlType::Date,
        SqlType::Time,
        SqlType::Timestamp,
        SqlType::Binary,
        SqlType::VarBinary,
        SqlType::LongVarBinary,
        SqlType::Null,
        SqlType::Other,
        SqlType::JavaObject,
        SqlType::Distinct,
        SqlType::Struct,
        SqlType::Array,
        SqlType::Blob,
        SqlType::Clob,
        SqlType::Ref,
        SqlType::DataLink,
        SqlType::Boolean,
        SqlType::RowId,
        SqlType::NChar,
        SqlType::NVarchar,
        SqlType::LongNVarchar,
        SqlType::NClob,
        SqlType::SqlXml,
        SqlType::RefCursor,
        SqlType::TimeWithTimezone,
        SqlType::TimestampWithTimezone,
    ];

    /// Looks a type up by its JDBC name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }

    /// JDBC name of the type.
    pub fn name(self) -> &'static str {
        match self {
            SqlType::Bit => "BIT",
            SqlType::TinyInt => "TINYINT",
            SqlType::SmallInt => "SMALLINT",
            SqlType::Integer => "INTEGER",
            SqlType::BigInt => "BIGINT",
            SqlType::Float => "FLOAT",
            SqlType::Real => "REAL",
            SqlType::Double => "DOUBLE",
            SqlType::Numeric => "NUMERIC",
            SqlType::Decimal => "DECIMAL",
            SqlType::Char => "CHAR",
            SqlType::Varchar => "VARCHAR",
            SqlType::LongVarchar => "LONGVARCHAR",
            SqlType::Date => "DATE",
            SqlType::Time => "TIME",
            SqlType::Timestamp => "TIMESTAMP",
            SqlType::Binary => "BINARY",
            SqlType::VarBinary => "VARBINARY",
            SqlType::LongVarBinary => "LONGVARBINARY",
            SqlType::Null => "NULL",
            SqlType::Other => "OTHER",
            SqlType::JavaObject => "JAVA_OBJECT",
            SqlType::Distinct => "DISTINCT",
            SqlType::Struct => "STRUCT",
            SqlType::Array => "ARRAY",
            SqlType::Blob => "BLOB",
            SqlType::Clob => "CLOB",
            SqlType::Ref => "REF",
            SqlType::DataLink => "DATALINK",
            SqlType::Boolean => "BOOLEAN",
            SqlType::RowId => "ROWID",
            SqlType::NChar => "NCHAR",
            SqlType::NVarchar => "NVARCHAR",
            SqlType::LongNVarchar => "LONGNVARCHAR",
            SqlType::NClob => "NCLOB",
            SqlType::SqlXml => "SQLXML",
            SqlType::RefCursor => "REF_CURSOR",
            SqlType::TimeWithTimezone => "TIME_WITH_TIMEZONE",
            SqlType::TimestampWithTimezone => "TIMESTAMP_WITH_TIMEZONE",
        }
    }

    /// Vendor type number as defined by `java.sql.Types`.
    pub fn vendor_code(self) -> i32 {
        match self {
            SqlType::Bit => -7,
            SqlType::TinyInt => -6,
            SqlType::SmallInt => 5,
            SqlType::Integer => 4,
            SqlType::BigInt => -5,
            SqlType::Float => 6,
            SqlType::Real => 7,
            SqlType::Double => 8,
            SqlType::Numeric => 2,
            SqlType::Decimal => 3,
            SqlType::Char => 1,
            SqlType::Varchar => 12,
            SqlType::LongVarchar => -1,
            SqlType::Date => 91,
            SqlType::Time => 92,
            SqlType::Timestamp => 93,
            SqlType::Binary => -2,
            SqlType::VarBinary => -3,
            SqlType::LongVarBinary => -4,
            SqlType::Null => 0,
            SqlType::Other => 1111,
            SqlType::JavaObject => 2000,
            SqlType::Distinct => 2001,
            SqlType::Struct => 2002,
            SqlType::Array => 2003,
            SqlType::Blob => 2004,
            SqlType::Clob => 2005,
            SqlType::Ref => 2006,
            SqlType::DataLink => 70,
            SqlType::Boolean => 16,
            SqlType::RowId => -8,
            SqlType::NChar => -15,
            SqlType::NVarchar => -9,
            SqlType::LongNVarchar => -16,
            SqlType::NClob => 2011,
            SqlType::SqlXml => 2009,
            SqlType::RefCursor => 2012,
            SqlType::TimeWithTimezone => 2013,
            SqlType::TimestampWithTimezone => 2014,
        }
    }
}

// == Out Types ==
/// Type an OUT parameter is registered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutType {
    /// A standard type given by name
    Standard(SqlType),
    /// A driver-specific type number passed through unchanged
    Vendor(i32),
}

impl OutType {
    /// Type number handed to the driver.
    pub fn code(self) -> i32 {
        match self {
            OutType::Standard(t) => t.vendor_code(),
            OutType::Vendor(code) => code,
        }
    }

    /// Reads an OUT declaration; `None` when the slot declares nothing.
    fn parse(value: &Value) -> Result<Option<Self>> {
        match value {
            Value::String(name) => SqlType::from_name(name)
                .map(|t| Some(OutType::Standard(t)))
                .ok_or_else(|| BridgeError::InvalidArgument(format!("unknown SQL type: {name}"))),
            Value::Number(n) => n
                .as_i64()
                .and_then(|code| i32::try_from(code).ok())
                .map(|code| Some(OutType::Vendor(code)))
                .ok_or_else(|| BridgeError::InvalidArgument(format!("invalid vendor type code: {n}"))),
            _ => Ok(None),
        }
    }
}

// == Callable Parameters ==
/// One positional parameter of a callable statement.
#[derive(Debug, Clone, PartialEq)]
pub enum CallableParam {
    In(BoundValue),
    Out(OutType),
    InOut(BoundValue, OutType),
    /// Neither side supplied a value: bound as SQL NULL
    Null,
}

/// Coerces every positional parameter of a prepared statement.
///
/// JSON `null` stays `Raw(Null)`; the host binds it as SQL NULL.
pub fn bind_params(params: &[Value], config: &CastConfig) -> Vec<BoundValue> {
    let bound: Vec<BoundValue> = params
        .iter()
        .map(|value| optimistic_cast(value.clone(), config))
        .collect();
    debug!(count = bound.len(), "statement parameters bound");
    bound
}

/// Lays out the parameters of a callable statement.
///
/// Position `i` takes its IN value from `ins[i]` and its OUT type from
/// `outs[i]`; either list may be shorter than the other. A null IN value
/// counts as absent. OUT types are JDBC names or numeric vendor codes.
pub fn bind_callable(ins: &[Value], outs: &[Value], config: &CastConfig) -> Result<Vec<CallableParam>> {
    let count = ins.len().max(outs.len());
    let mut bound = Vec::with_capacity(count);

    for i in 0..count {
        let input = ins
            .get(i)
            .filter(|v| !v.is_null())
            .map(|v| optimistic_cast(v.clone(), config));
        let output = match outs.get(i) {
            Some(value) => OutType::parse(value)?,
            None => None,
        };

        bound.push(match (input, output) {
            (Some(value), Some(out)) => CallableParam::InOut(value, out),
            (Some(value), None) => CallableParam::In(value),
            (None, Some(out)) => CallableParam::Out(out),
            (None, None) => CallableParam::Null,
        });
    }

    debug!(count, "callable parameters bound");
    Ok(bound)
}
