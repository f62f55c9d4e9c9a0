use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use uuid::Uuid;

/// A normalized query argument, ready to be bound to a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    /// Only produced for unsigned values above `i64::MAX`.
    UInt(u64),
    Float(f64),
    String(String),
    Time(DateTime<FixedOffset>),
    Uuid(Uuid),
    List(Vec<Value>),
    /// JSON that has no closer representation (objects, null).
    Json(serde_json::Value),
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            other => Value::Json(other),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self { Value::Bool(value) }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self { Value::Int(value) }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self { Value::Int(value as i64) }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self { Value::Float(value) }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self { Value::String(value.to_owned()) }
}

impl From<String> for Value {
    fn from(value: String) -> Self { Value::String(value) }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(value: DateTime<FixedOffset>) -> Self { Value::Time(value) }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self { Value::Uuid(value) }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self { Value::List(values.into_iter().map(Into::into).collect()) }
}
