//! Typed scalar values
//!
//! The set of variants is closed. Every reader in the crate matches on it
//! exhaustively, so an unhandled field type cannot reach the evaluator.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use uuid::Uuid;

use super::schema::FieldKind;

/// A single typed field value
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    /// UTF-8 text
    String(String),
    /// Floating point number
    Number(f64),
    /// Fixed-point decimal
    Decimal(Decimal),
    /// Globally unique identifier
    Guid(Uuid),
    /// Instant in UTC
    DateTime(DateTime<Utc>),
    /// Calendar date
    Date(NaiveDate),
    /// Time of day
    Time(NaiveTime),
    /// Boolean
    Boolean(bool),
    /// Explicit absence of a value
    Null,
}

impl ScalarValue {
    /// Returns the kind of this value, or `None` for `Null`
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            ScalarValue::String(_) => Some(FieldKind::String),
            ScalarValue::Number(_) => Some(FieldKind::Number),
            ScalarValue::Decimal(_) => Some(FieldKind::Decimal),
            ScalarValue::Guid(_) => Some(FieldKind::Guid),
            ScalarValue::DateTime(_) => Some(FieldKind::DateTime),
            ScalarValue::Date(_) => Some(FieldKind::Date),
            ScalarValue::Time(_) => Some(FieldKind::Time),
            ScalarValue::Boolean(_) => Some(FieldKind::Boolean),
            ScalarValue::Null => None,
        }
    }

    /// Returns the kind name used in error messages
    pub fn type_name(&self) -> &'static str {
        self.kind().map_or("null", |k| k.type_name())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of number and decimal values
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScalarValue::Number(n) => Some(*n),
            ScalarValue::Decimal(d) => d.to_f64(),
            _ => None,
        }
    }

    /// Converts to the JSON primitive used in item responses.
    ///
    /// Integral numbers are emitted as JSON integers, dates and times in
    /// ISO 8601 form.
    pub fn to_json(&self) -> Value {
        match self {
            ScalarValue::String(s) => Value::String(s.clone()),
            ScalarValue::Number(n) => number_to_json(*n),
            ScalarValue::Decimal(d) => {
                if d.fract().is_zero() {
                    if let Some(i) = d.to_i64() {
                        return Value::from(i);
                    }
                }
                d.to_f64().map_or(Value::Null, number_to_json)
            }
            ScalarValue::Guid(g) => Value::String(g.to_string()),
            ScalarValue::DateTime(dt) => {
                Value::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            ScalarValue::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
            ScalarValue::Time(t) => Value::String(t.format("%H:%M:%S%.f").to_string()),
            ScalarValue::Boolean(b) => Value::Bool(*b),
            ScalarValue::Null => Value::Null,
        }
    }

    /// Reads a JSON value as the given field kind.
    ///
    /// Returns `None` when the JSON value cannot represent that kind.
    /// JSON `null` is accepted for every kind.
    pub fn from_json(kind: FieldKind, value: &Value) -> Option<Self> {
        if value.is_null() {
            return Some(ScalarValue::Null);
        }

        match kind {
            FieldKind::String => value.as_str().map(|s| ScalarValue::String(s.to_string())),
            FieldKind::Number => value.as_f64().map(ScalarValue::Number),
            FieldKind::Decimal => match value {
                Value::Number(n) => n
                    .as_i64()
                    .map(Decimal::from)
                    .or_else(|| n.as_f64().and_then(|f| Decimal::try_from(f).ok()))
                    .map(ScalarValue::Decimal),
                Value::String(s) => s.parse::<Decimal>().ok().map(ScalarValue::Decimal),
                _ => None,
            },
            FieldKind::Guid => value
                .as_str()
                .and_then(|s| Uuid::parse_str(s).ok())
                .map(ScalarValue::Guid),
            FieldKind::DateTime => value
                .as_str()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| ScalarValue::DateTime(dt.with_timezone(&Utc))),
            FieldKind::Date => value
                .as_str()
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
                .map(ScalarValue::Date),
            FieldKind::Time => value
                .as_str()
                .and_then(|s| NaiveTime::parse_from_str(s, "%H:%M:%S%.f").ok())
                .map(ScalarValue::Time),
            FieldKind::Boolean => value.as_bool().map(ScalarValue::Boolean),
        }
    }
}

fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        return Value::from(n as i64);
    }
    serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::String(s) => write!(f, "{}", s),
            ScalarValue::Null => write!(f, "null"),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        ScalarValue::String(s.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(s: String) -> Self {
        ScalarValue::String(s)
    }
}

impl From<f64> for ScalarValue {
    fn from(n: f64) -> Self {
        ScalarValue::Number(n)
    }
}

impl From<i32> for ScalarValue {
    fn from(n: i32) -> Self {
        ScalarValue::Number(f64::from(n))
    }
}

impl From<bool> for ScalarValue {
    fn from(b: bool) -> Self {
        ScalarValue::Boolean(b)
    }
}

impl From<Decimal> for ScalarValue {
    fn from(d: Decimal) -> Self {
        ScalarValue::Decimal(d)
    }
}

impl From<Uuid> for ScalarValue {
    fn from(g: Uuid) -> Self {
        ScalarValue::Guid(g)
    }
}

impl From<DateTime<Utc>> for ScalarValue {
    fn from(dt: DateTime<Utc>) -> Self {
        ScalarValue::DateTime(dt)
    }
}

impl From<NaiveDate> for ScalarValue {
    fn from(d: NaiveDate) -> Self {
        ScalarValue::Date(d)
    }
}

impl From<NaiveTime> for ScalarValue {
    fn from(t: NaiveTime) -> Self {
        ScalarValue::Time(t)
    }
}
