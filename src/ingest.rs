//! Conversion of the data-fetch payload into [`Series`].
//!
//! The fetch collaborator answers a dimension request with entries shaped like
//! `{ id, key, values: [{ time, <property>: value }, ...] }` plus the request's
//! `timeType` and `dimensions`. This module turns those into typed series for one
//! chart type.
//!
//! ### Notes
//! - Ids arrive as numbers or strings; both are normalized to strings. Entries that are
//!   not objects or lack a usable id are skipped (logged); a `data` field that is not an
//!   array reads as an empty dataset.
//! - A `values` field that is not an array makes the series empty (logged), so the rest
//!   of the dataset still renders.
//! - Points without a usable x or without the value property are skipped.
//!
//! Typical usage:
//! ```
//! # use grapher_rs::{ChartType, DataPayload};
//! let payload = DataPayload::from_json_str(
//!     r#"{"data":[{"id":1,"key":"France","values":[{"time":2000,"y":5}]}]}"#,
//! )?;
//! let series = payload.to_series(ChartType::Line);
//! assert_eq!(series[0].values[0].x, 2000.0);
//! # Ok::<(), grapher_rs::Error>(())
//! ```

use crate::config::ChartType;
use crate::error::Result;
use crate::models::{Datum, Dimension, Series, TimePoint, TimeValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Raw entry from the data-fetch collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct RawSeries {
    pub id: String,
    pub key: String,
    /// Kept untyped: its shape is checked per entry, not for the whole payload.
    pub values: Value,
}

impl RawSeries {
    /// Salvage one `data` entry. Entries that are not objects or have no usable id are
    /// dropped (logged); everything else is checked later, point by point.
    pub fn from_value(entry: &Value) -> Option<Self> {
        let Some(obj) = entry.as_object() else {
            log::warn!("skipping data entry: expected an object, got {}", kind_of(entry));
            return None;
        };
        let id = match obj.get("id").and_then(string_or_number) {
            Some(id) => id,
            None => {
                log::warn!(
                    "skipping data entry {:?}: id is missing or not a string/number",
                    obj.get("key").and_then(string_or_number).unwrap_or_default()
                );
                return None;
            }
        };
        Some(Self {
            key: obj.get("key").and_then(string_or_number).unwrap_or_default(),
            values: obj.get("values").cloned().unwrap_or(Value::Null),
            id,
        })
    }
}

/// Response of the data-fetch collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataPayload {
    #[serde(default, deserialize_with = "de_data_lenient")]
    pub data: Vec<RawSeries>,
    #[serde(rename = "timeType", default)]
    pub time_type: Option<String>,
    #[serde(default)]
    pub dimensions: Vec<Dimension>,
}

fn string_or_number(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Entries of a `data` list; anything that is not an array reads as no data.
fn raw_series_list(v: &Value) -> Vec<RawSeries> {
    match v {
        Value::Array(entries) => entries.iter().filter_map(RawSeries::from_value).collect(),
        Value::Null => Vec::new(),
        other => {
            log::warn!("data is not an array ({}); treating as empty", kind_of(other));
            Vec::new()
        }
    }
}

/// Serde helper: one malformed entry never rejects the whole payload.
fn de_data_lenient<'de, D>(deserializer: D) -> std::result::Result<Vec<RawSeries>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(raw_series_list(&Value::deserialize(deserializer)?))
}

impl DataPayload {
    /// Parse a payload; a bare top-level array is taken as the `data` list.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let v: Value = serde_json::from_str(s)?;
        if v.is_array() {
            return Ok(Self {
                data: raw_series_list(&v),
                ..Self::default()
            });
        }
        Ok(serde_json::from_value(v)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Typed series for `chart_type`, in payload order.
    pub fn to_series(&self, chart_type: ChartType) -> Vec<Series> {
        self.data
            .iter()
            .map(|raw| Series::new(raw.id.clone(), raw.key.clone(), parse_values(raw, chart_type)))
            .collect()
    }
}

/// Properties holding the plotted value, in lookup order.
fn value_properties(chart_type: ChartType) -> &'static [&'static str] {
    match chart_type {
        ChartType::Map => &["map", "y"],
        _ => &["y"],
    }
}

fn parse_values(raw: &RawSeries, chart_type: ChartType) -> Vec<TimePoint> {
    let entries = match &raw.values {
        Value::Array(entries) => entries,
        Value::Null => return Vec::new(),
        other => {
            log::warn!(
                "series {:?}: values is not an array ({}); treating as empty",
                raw.id,
                kind_of(other)
            );
            return Vec::new();
        }
    };

    let mut skipped = 0usize;
    let points: Vec<TimePoint> = entries
        .iter()
        .filter_map(|entry| {
            let p = parse_point(entry, chart_type);
            if p.is_none() {
                skipped += 1;
            }
            p
        })
        .collect();
    if skipped > 0 {
        log::debug!("series {:?}: skipped {} unusable point(s)", raw.id, skipped);
    }
    points
}

fn parse_point(entry: &Value, chart_type: ChartType) -> Option<TimePoint> {
    let obj = entry.as_object()?;
    let time = match obj.get("time")? {
        Value::Number(n) => TimeValue::Number(n.as_f64()?),
        Value::String(s) => TimeValue::Text(s.clone()),
        _ => return None,
    };
    let x = match chart_type {
        ChartType::Scatter => number_of(obj.get("x")?)?,
        _ => time.as_f64()?,
    };
    let y = value_properties(chart_type)
        .iter()
        .find_map(|prop| obj.get(*prop))
        .and_then(datum_of)?;
    Some(TimePoint {
        time,
        x,
        y,
        color: None,
        fake: false,
        key: None,
        series_id: None,
    })
}

fn number_of(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
}

fn datum_of(v: &Value) -> Option<Datum> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Datum::Number(n),
            _ => Datum::Text(s.clone()),
        }),
        other => number_of(other).map(Datum::Number),
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
