//! Runtime values and records.
//!
//! Records are flat field-name → value maps. They come from JSON objects or
//! from any `Serialize` type, which is how a caller's own structs are turned
//! into something the evaluator can inspect.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::RecordError;
use crate::schema::FieldType;

/// Runtime value of a record field or an evaluated sub-expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Decimal(Decimal),
    Text(String),
}

impl Value {
    /// Returns a human-readable type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Decimal(_) => "Decimal",
            Value::Text(_) => "Text",
        }
    }

    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(FieldType::Bool),
            Value::Int(_) => Some(FieldType::Int),
            Value::Decimal(_) => Some(FieldType::Decimal),
            Value::Text(_) => Some(FieldType::Text),
        }
    }

    /// Convert a scalar JSON value. Arrays and objects are rejected.
    pub fn from_json(v: &serde_json::Value) -> Result<Value, String> {
        match v {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    return Ok(Value::Int(i));
                }
                let s = n.to_string();
                Decimal::from_str(&s)
                    .or_else(|_| Decimal::from_scientific(&s))
                    .map(Value::Decimal)
                    .map_err(|e| format!("number {} out of range: {}", s, e))
            }
            serde_json::Value::String(s) => Ok(Value::Text(s.clone())),
            serde_json::Value::Array(_) => Err("arrays are not supported".to_string()),
            serde_json::Value::Object(_) => Err("nested objects are not supported".to_string()),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::json!(i),
            Value::Decimal(d) => serde_json::Value::String(d.to_string()),
            Value::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

/// Decimals serialize as exact strings (`"0.10"`), never through `f64`.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Decimal(d) => Serialize::serialize(d, serializer),
            Value::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Value::from_json(&raw).map_err(serde::de::Error::custom)
    }
}

/// One record under evaluation. Missing fields read as `Null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(pub BTreeMap<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: Value) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    pub fn get(&self, field: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.0.get(field).unwrap_or(&NULL)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn from_json(v: &serde_json::Value) -> Result<Record, RecordError> {
        let obj = match v {
            serde_json::Value::Object(obj) => obj,
            other => {
                return Err(RecordError::NotAnObject {
                    got: json_kind(other),
                })
            }
        };
        let mut record = Record::new();
        for (field, raw) in obj {
            let value =
                Value::from_json(raw).map_err(|message| RecordError::UnsupportedValue {
                    field: field.clone(),
                    message,
                })?;
            record.insert(field.clone(), value);
        }
        Ok(record)
    }

    /// Build a record from any serializable struct.
    pub fn from_serialize<T: Serialize>(item: &T) -> Result<Record, RecordError> {
        let v = serde_json::to_value(item).map_err(|e| RecordError::Serialize(e.to_string()))?;
        Record::from_json(&v)
    }
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
