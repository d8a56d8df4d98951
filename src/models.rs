use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator used by composite series ids (`"<entity>-<variable index>"`).
pub const ENTITY_ID_SEPARATOR: char = '-';

/// Time coordinate as delivered by the data source: usually a year, sometimes a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeValue {
    Number(f64),
    Text(String),
}

impl TimeValue {
    /// Integer reading of the time, used for time-window clamping.
    ///
    /// Strings are read by their leading integer (`"2001"` and `"2001-06-01"` both give 2001).
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            TimeValue::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            TimeValue::Number(_) => None,
            TimeValue::Text(s) => parse_int_prefix(s),
        }
    }

    /// Numeric reading of the time, used as the x coordinate of time-based charts.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TimeValue::Number(n) if n.is_finite() => Some(*n),
            TimeValue::Number(_) => None,
            TimeValue::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            TimeValue::Number(n) => write!(f, "{n}"),
            TimeValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i32> for TimeValue {
    fn from(v: i32) -> Self {
        TimeValue::Number(v as f64)
    }
}

impl From<f64> for TimeValue {
    fn from(v: f64) -> Self {
        TimeValue::Number(v)
    }
}

impl From<&str> for TimeValue {
    fn from(v: &str) -> Self {
        TimeValue::Text(v.to_string())
    }
}

/// A y value. Numeric in practice; non-numeric source values are passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Datum {
    Number(f64),
    Text(String),
}

impl Datum {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Datum::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }
}

impl Default for Datum {
    fn default() -> Self {
        Datum::Number(0.0)
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Number(n) => write!(f, "{n}"),
            Datum::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Datum {
    fn from(v: f64) -> Self {
        Datum::Number(v)
    }
}

/// One observation of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub time: TimeValue,
    pub x: f64,
    pub y: Datum,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Synthesized gap-fill point: rendered, never exported.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fake: bool,
    /// Key of the owning series; set on synthesized and flattened points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Id of the owning series; set on flattened points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_id: Option<String>,
}

impl TimePoint {
    pub fn new(time: impl Into<TimeValue>, x: f64, y: f64) -> Self {
        Self {
            time: time.into(),
            x,
            y: Datum::Number(y),
            color: None,
            fake: false,
            key: None,
            series_id: None,
        }
    }

    /// Zero-valued placeholder at `x`, owned by the series `key`.
    pub fn filler(x: f64, key: &str) -> Self {
        Self {
            time: TimeValue::Number(x),
            x,
            y: Datum::Number(0.0),
            color: None,
            fake: true,
            key: Some(key.to_string()),
            series_id: None,
        }
    }

    #[inline]
    pub fn y_value(&self) -> Option<f64> {
        self.y.as_f64()
    }
}

/// One entity's (or entity-variable pair's) time-ordered values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub id: String,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Anything that is not an array of points deserializes as empty.
    #[serde(default, deserialize_with = "de_values_lenient")]
    pub values: Vec<TimePoint>,
}

impl Series {
    pub fn new(id: impl Into<String>, key: impl Into<String>, values: Vec<TimePoint>) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            color: None,
            values,
        }
    }

    pub fn entity_id(&self) -> Option<EntityId> {
        EntityId::parse(&self.id)
    }
}

fn de_values_lenient<'de, D>(deserializer: D) -> Result<Vec<TimePoint>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    match raw {
        serde_json::Value::Array(_) => match serde_json::from_value::<Vec<TimePoint>>(raw) {
            Ok(values) => Ok(values),
            Err(e) => {
                log::warn!("treating series as empty: malformed values ({e})");
                Ok(Vec::new())
            }
        },
        serde_json::Value::Null => Ok(Vec::new()),
        other => {
            log::warn!("treating series as empty: values is not an array ({other})");
            Ok(Vec::new())
        }
    }
}

/// Entity identity parsed from a series id.
///
/// `"7"` is entity 7; `"7-1"` is entity 7, variable index 1. Ids whose first segment
/// is not an integer have no entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId {
    pub entity: i64,
    pub variant: Option<u32>,
}

impl EntityId {
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split(ENTITY_ID_SEPARATOR);
        let entity = parts.next()?.trim().parse::<i64>().ok()?;
        let variant = parts.next().and_then(|v| v.trim().parse::<u32>().ok());
        Some(Self { entity, variant })
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.variant {
            Some(v) => write!(f, "{}{}{}", self.entity, ENTITY_ID_SEPARATOR, v),
            None => write!(f, "{}", self.entity),
        }
    }
}

/// Role a variable plays in a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionProperty {
    X,
    Y,
    Size,
    Shape,
    Color,
    Map,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for DimensionProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DimensionProperty::X => "x",
            DimensionProperty::Y => "y",
            DimensionProperty::Size => "size",
            DimensionProperty::Shape => "shape",
            DimensionProperty::Color => "color",
            DimensionProperty::Map => "map",
            DimensionProperty::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// A variable bound to a chart property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    #[serde(default)]
    pub name: String,
    pub property: DimensionProperty,
    #[serde(
        rename = "variableId",
        default,
        deserialize_with = "de_opt_i64_from_string_or_number"
    )]
    pub variable_id: Option<i64>,
}

/// Serde helper: parse an optional `i64` from a JSON number or a numeric string.
/// Empty and non-numeric strings read as `None`.
pub(crate) fn de_opt_i64_from_string_or_number<'de, D>(
    deserializer: D,
) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct OptI64Visitor;

    impl<'de> Visitor<'de> for OptI64Visitor {
        type Value = Option<i64>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "an integer, a string holding an integer, or null")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(i64::try_from(v).ok())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok((v.is_finite() && v.fract() == 0.0).then_some(v as i64))
        }

        fn visit_str<E: de::Error>(self, s: &str) -> Result<Self::Value, E> {
            Ok(s.trim().parse::<i64>().ok())
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(OptI64Visitor)
}

/// Leading-integer parse: optional sign followed by digits, anything after is ignored.
pub(crate) fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let digits_end = rest
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    rest[..digits_end].parse::<i64>().ok().map(|v| v * sign)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_prefix_reads_leading_digits() {
        assert_eq!(parse_int_prefix("2001"), Some(2001));
        assert_eq!(parse_int_prefix(" 2001-06-01"), Some(2001));
        assert_eq!(parse_int_prefix("-45BC"), Some(-45));
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix(""), None);
    }

    #[test]
    fn entity_id_parses_composite_keys() {
        assert_eq!(
            EntityId::parse("7-2"),
            Some(EntityId {
                entity: 7,
                variant: Some(2)
            })
        );
        assert_eq!(EntityId::parse("13").map(|e| e.entity), Some(13));
        assert_eq!(EntityId::parse("world"), None);
        assert_eq!(EntityId::parse("-3"), None);
        assert_eq!(EntityId::parse("7-2").unwrap().to_string(), "7-2");
    }

    #[test]
    fn time_value_display_drops_integral_fraction() {
        assert_eq!(TimeValue::Number(2000.0).to_string(), "2000");
        assert_eq!(TimeValue::Number(2000.5).to_string(), "2000.5");
        assert_eq!(TimeValue::from("1990s").to_string(), "1990s");
    }

    #[test]
    fn series_with_non_array_values_is_empty() {
        let s: Series =
            serde_json::from_str(r#"{"id":"1","key":"France","values":"oops"}"#).unwrap();
        assert!(s.values.is_empty());
        let s: Series = serde_json::from_str(r#"{"id":"1","key":"France"}"#).unwrap();
        assert!(s.values.is_empty());
    }
}
