//! Catalog rows as they arrive from the fetched JSON document.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{Result, SkyError};

/// One catalog row. Numeric fields accept numbers or numeric strings; a
/// value that is missing or does not parse becomes NaN and is caught later
/// by the finiteness checks in placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarRecord {
    #[serde(default, deserialize_with = "lenient_name")]
    pub name: String,
    #[serde(rename = "RA", default = "nan", deserialize_with = "lenient_f64")]
    pub ra: f64,
    #[serde(rename = "DE", default = "nan", deserialize_with = "lenient_f64")]
    pub de: f64,
    #[serde(rename = "mag", default = "nan", deserialize_with = "lenient_f64")]
    pub magnitude: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub size: f64,
    #[serde(rename = "bv", default = "nan", deserialize_with = "lenient_f64")]
    pub color_index: f64,
}

impl StarRecord {
    pub fn from_value(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(SkyError::malformed(
                value.to_string(),
                "record is not an object",
            ));
        }
        StarRecord::deserialize(value).map_err(|err| SkyError::malformed("?", err.to_string()))
    }
}

/// The fetched document: either `{"stars": [...]}` or a bare array.
#[derive(Debug, Clone, Default)]
pub struct RawCatalog {
    rows: Vec<Value>,
}

impl RawCatalog {
    pub fn from_json(text: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(text)?;
        Self::from_value(document)
    }

    pub fn from_value(document: Value) -> Result<Self> {
        let rows = match document {
            Value::Array(rows) => rows,
            Value::Object(mut map) => match map.remove("stars") {
                Some(Value::Array(rows)) => rows,
                _ => return Err(SkyError::MissingStarList),
            },
            _ => return Err(SkyError::MissingStarList),
        };
        Ok(Self { rows })
    }

    pub fn from_records(records: &[StarRecord]) -> Self {
        let rows = records
            .iter()
            .map(|record| serde_json::to_value(record).unwrap_or(Value::Null))
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn nan() -> f64 {
    f64::NAN
}

fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(number) => number.as_f64().unwrap_or(f64::NAN),
        Value::String(text) => text.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    })
}

fn lenient_name<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}
