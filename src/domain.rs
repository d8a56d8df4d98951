//! Axis domains.

use crate::config::{AxisConfig, AxisScale, ChartConfig, ChartType};
use crate::models::{Series, TimePoint};
use serde::{Deserialize, Serialize};

/// Inclusive numeric range an axis must cover.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Min/max over finite values; `None` when there are none.
    pub fn of<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<Extent>, v| match acc {
                None => Some(Extent::new(v, v)),
                Some(e) => Some(Extent::new(e.min.min(v), e.max.max(v))),
            })
    }
}

/// What the x axis spans.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum XDomain {
    /// Numeric axis (line, scatter, stacked area, map).
    Continuous { extent: Option<Extent> },
    /// Ordinal time axis of multi-bar charts: the full sorted time list.
    Times { times: Vec<f64> },
    /// Ordinal entity axis of discrete-bar charts.
    Categories { labels: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Domains {
    pub x: XDomain,
    pub y: Option<Extent>,
    pub y_scale: AxisScale,
    /// Explicit bounds were applied: the renderer must force the domain instead of auto-fitting.
    pub clamped: bool,
}

/// Display style of a stacked-area chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackedAreaStyle {
    #[default]
    Stack,
    Stream,
    /// 100%-stacked.
    Expand,
}

/// Resolve x/y domains for `points`, the visible points of every series.
pub fn resolve(points: &[TimePoint], config: &ChartConfig, chart_type: ChartType) -> Domains {
    let mut clamped = false;

    let x = match chart_type {
        ChartType::MultiBarVertical | ChartType::MultiBarHorizontal => {
            let mut times: Vec<f64> = points.iter().map(|p| p.x).filter(|x| x.is_finite()).collect();
            times.sort_by(f64::total_cmp);
            times.dedup_by(|a, b| a == b);
            XDomain::Times { times }
        }
        ChartType::DiscreteBar => XDomain::Categories {
            labels: points
                .iter()
                .map(|p| p.key.clone().unwrap_or_else(|| p.time.to_string()))
                .collect(),
        },
        _ => {
            let extent = Extent::of(points.iter().map(|p| p.x));
            XDomain::Continuous {
                extent: apply_bounds(extent, &config.x_axis, &mut clamped),
            }
        }
    };

    let data_y = Extent::of(points.iter().filter_map(TimePoint::y_value));
    // Log axes cannot reach 0.
    let floored = if chart_type == ChartType::StackedArea || config.y_axis.scale == AxisScale::Log {
        data_y
    } else {
        data_y.map(zero_floor)
    };
    let y = apply_bounds(floored, &config.y_axis, &mut clamped);

    Domains {
        x,
        y,
        y_scale: config.y_axis.scale,
        clamped,
    }
}

/// [`resolve`] over every point of `series`.
pub fn resolve_series(series: &[Series], config: &ChartConfig, chart_type: ChartType) -> Domains {
    let points: Vec<TimePoint> = series.iter().flat_map(|s| s.values.iter().cloned()).collect();
    resolve(&points, config, chart_type)
}

/// Zero baseline: `[0, max]`, or `[min, 0]` when no value is above zero.
fn zero_floor(e: Extent) -> Extent {
    if e.max > 0.0 {
        Extent::new(0.0, e.max)
    } else {
        Extent::new(e.min, 0.0)
    }
}

fn apply_bounds(extent: Option<Extent>, axis: &AxisConfig, clamped: &mut bool) -> Option<Extent> {
    if axis.min.is_some() || axis.max.is_some() {
        *clamped = true;
    }
    match (extent, axis.min, axis.max) {
        (Some(e), min, max) => Some(Extent::new(min.unwrap_or(e.min), max.unwrap_or(e.max))),
        (None, Some(min), Some(max)) => Some(Extent::new(min, max)),
        (None, _, _) => None,
    }
}

/// Domain the renderer must force after a first render pass, if any.
///
/// A 100%-stacked area always spans `[0, 1]`, so a configured y max has to be replaced
/// once the renderer has switched to that style.
pub fn post_render_correction(
    y_axis: &AxisConfig,
    chart_type: ChartType,
    style: StackedAreaStyle,
) -> Option<Extent> {
    (chart_type == ChartType::StackedArea
        && style == StackedAreaStyle::Expand
        && y_axis.max.is_some())
    .then_some(Extent::new(0.0, 1.0))
}
