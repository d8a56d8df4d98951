//! Chart configuration as exposed by the configuration store.
//!
//! The store serializes loosely (chart types as `"1"`..`"6"`, axis bounds as `""` when
//! unset, numbers as strings); the deserializers here normalize all of that into typed
//! values once, so the pipeline never compares strings.

use crate::error::{Error, Result};
use crate::models::{DimensionProperty, de_opt_i64_from_string_or_number};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Chart types supported by the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartType {
    #[default]
    Line,
    Scatter,
    StackedArea,
    MultiBarVertical,
    MultiBarHorizontal,
    DiscreteBar,
    Map,
}

impl ChartType {
    pub const ALL: [ChartType; 7] = [
        ChartType::Line,
        ChartType::Scatter,
        ChartType::StackedArea,
        ChartType::MultiBarVertical,
        ChartType::MultiBarHorizontal,
        ChartType::DiscreteBar,
        ChartType::Map,
    ];

    /// Code used by the configuration store.
    pub fn code(&self) -> &'static str {
        match self {
            ChartType::Line => "1",
            ChartType::Scatter => "2",
            ChartType::StackedArea => "3",
            ChartType::MultiBarVertical => "4",
            ChartType::MultiBarHorizontal => "5",
            ChartType::DiscreteBar => "6",
            ChartType::Map => "map",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChartType::Line => "line",
            ChartType::Scatter => "scatter",
            ChartType::StackedArea => "stacked-area",
            ChartType::MultiBarVertical => "multi-bar-vertical",
            ChartType::MultiBarHorizontal => "multi-bar-horizontal",
            ChartType::DiscreteBar => "discrete-bar",
            ChartType::Map => "map",
        }
    }

    pub fn is_multi_bar(&self) -> bool {
        matches!(
            self,
            ChartType::MultiBarVertical | ChartType::MultiBarHorizontal
        )
    }

    /// Bar charts place time (or entities) on an ordinal axis.
    pub fn has_ordinal_x(&self) -> bool {
        self.is_multi_bar() || matches!(self, ChartType::DiscreteBar)
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChartType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        ChartType::ALL
            .into_iter()
            .find(|t| t.code() == wanted || t.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownChartType(wanted.to_string()))
    }
}

impl Serialize for ChartType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ChartType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        use serde::de::{self, Visitor};
        struct ChartTypeVisitor;

        impl<'de> Visitor<'de> for ChartTypeVisitor {
            type Value = ChartType;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a chart type code (\"1\"..\"6\", \"map\") or name")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
                v.to_string().parse().map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
                v.to_string().parse().map_err(E::custom)
            }

            fn visit_str<E: de::Error>(self, s: &str) -> std::result::Result<Self::Value, E> {
                s.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(ChartTypeVisitor)
    }
}

/// Y-axis scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisScale {
    #[default]
    Linear,
    Log,
}

/// Per-axis settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AxisConfig {
    #[serde(deserialize_with = "de_opt_f64_lenient")]
    pub min: Option<f64>,
    #[serde(deserialize_with = "de_opt_f64_lenient")]
    pub max: Option<f64>,
    pub scale: AxisScale,
    /// Decimal places for tick labels.
    #[serde(deserialize_with = "de_opt_u32_lenient")]
    pub format: Option<u32>,
    pub prefix: String,
    pub suffix: String,
    pub label: String,
    #[serde(deserialize_with = "de_opt_f64_lenient")]
    pub label_distance: Option<f64>,
}

/// Inclusive `[from, to]` time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub from: i64,
    pub to: i64,
}

impl TimeWindow {
    /// Bounds given in reverse order are swapped.
    pub fn new(a: i64, b: i64) -> Self {
        Self {
            from: a.min(b),
            to: a.max(b),
        }
    }

    #[inline]
    pub fn contains(&self, t: i64) -> bool {
        self.from <= t && t <= self.to
    }
}

/// An entity picked in the form, optionally with a user-chosen color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedEntity {
    #[serde(deserialize_with = "de_i64_required")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "de_opt_color")]
    pub color: Option<String>,
}

/// Read-only snapshot of the chart configuration for one render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    pub chart_type: ChartType,
    pub selected_entities: Vec<SelectedEntity>,
    #[serde(deserialize_with = "de_time_window")]
    pub time_window: Option<TimeWindow>,
    pub x_axis: AxisConfig,
    pub y_axis: AxisConfig,
    pub group_by_variables: bool,
    pub hide_legend: bool,
    pub dimensions: Vec<crate::models::Dimension>,
}

impl ChartConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn selected_entity_ids(&self) -> HashSet<i64> {
        self.selected_entities.iter().map(|e| e.id).collect()
    }

    /// Entities with an explicit user-chosen color.
    pub fn entity_colors(&self) -> HashMap<i64, String> {
        self.selected_entities
            .iter()
            .filter_map(|e| e.color.clone().map(|c| (e.id, c)))
            .collect()
    }

    pub fn has_dimension(&self, property: DimensionProperty) -> bool {
        self.dimensions.iter().any(|d| d.property == property)
    }
}

/// Serde helper: optional `f64` from a number or numeric string; `""`, `null` and
/// non-numeric strings read as unset.
fn de_opt_f64_lenient<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct OptF64Visitor;

    impl<'de> Visitor<'de> for OptF64Visitor {
        type Value = Option<f64>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "a number, a numeric string, or null")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Self::Value, E> {
            Ok(v.is_finite().then_some(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
            Ok(Some(v as f64))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
            Ok(Some(v as f64))
        }

        fn visit_str<E: de::Error>(self, s: &str) -> std::result::Result<Self::Value, E> {
            Ok(s.trim().parse::<f64>().ok().filter(|v| v.is_finite()))
        }

        fn visit_bool<E: de::Error>(self, _: bool) -> std::result::Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(OptF64Visitor)
}

fn de_opt_u32_lenient<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let v = de_opt_f64_lenient(deserializer)?;
    Ok(v.filter(|v| *v >= 0.0 && *v <= u32::MAX as f64)
        .map(|v| v.trunc() as u32))
}

fn de_i64_required<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    de_opt_i64_from_string_or_number(deserializer)?
        .ok_or_else(|| serde::de::Error::custom("expected an integer entity id"))
}

fn de_opt_color<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

/// A window is set only when given as a two-element array of integers; anything else
/// means the window is dynamic.
fn de_time_window<'de, D>(deserializer: D) -> std::result::Result<Option<TimeWindow>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    let bound = |v: &serde_json::Value| -> Option<i64> {
        match v {
            serde_json::Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    };
    Ok(match raw.as_array().map(Vec::as_slice) {
        Some([a, b]) => match (bound(a), bound(b)) {
            (Some(a), Some(b)) => Some(TimeWindow::new(a, b)),
            _ => None,
        },
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_type_accepts_codes_and_names() {
        assert_eq!("4".parse::<ChartType>().unwrap(), ChartType::MultiBarVertical);
        assert_eq!("map".parse::<ChartType>().unwrap(), ChartType::Map);
        assert_eq!("Stacked-Area".parse::<ChartType>().unwrap(), ChartType::StackedArea);
        assert!("7".parse::<ChartType>().is_err());
        for t in ChartType::ALL {
            assert_eq!(t.code().parse::<ChartType>().unwrap(), t);
        }
    }

    #[test]
    fn time_window_requires_two_integers() {
        let c: ChartConfig = serde_json::from_str(r#"{"timeWindow":[2010,"2000"]}"#).unwrap();
        assert_eq!(c.time_window, Some(TimeWindow { from: 2000, to: 2010 }));
        let c: ChartConfig = serde_json::from_str(r#"{"timeWindow":[2010]}"#).unwrap();
        assert_eq!(c.time_window, None);
        let c: ChartConfig = serde_json::from_str(r#"{"timeWindow":null}"#).unwrap();
        assert_eq!(c.time_window, None);
    }
}
