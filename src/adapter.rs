//! Chart-type dispatch: one [`ChartTypeAdapter`] per [`ChartType`] variant turns the
//! selected, colored series into the exact shape its renderer consumes.
//!
//! ### Pipeline
//! `filter_series` → `assign_colors` → adapter `shape` (gap fill or discrete-bar collapse)
//! → domain resolution → adapter `extras`.
//!
//! [`adapt`] is a pure function of `(series, config, viewport)` except for the
//! [`ColorCache`], which is the only state carried between calls. It never panics and
//! never returns an error: a configuration that lacks a required dimension yields
//! [`AdaptOutcome::Invalid`] and the caller renders an empty state.

use serde::Serialize;

use crate::colors::{ColorCache, assign_colors};
use crate::config::{AxisConfig, ChartConfig, ChartType};
use crate::domain::{self, Domains, Extent, StackedAreaStyle};
use crate::error::InvalidConfiguration;
use crate::filter::{collapse_to_first_points, filter_series};
use crate::format::{format_tick, tick_values};
use crate::gapfill;
use crate::legend::LegendEntry;
use crate::models::{Datum, DimensionProperty, Series, TimeValue};

/// Viewport width at which scatter bubbles use their base size range.
pub const REFERENCE_VIEWPORT_WIDTH: f64 = 1100.0;
pub const MIN_POINT_SIZE: f64 = 100.0;
pub const MAX_POINT_SIZE: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: REFERENCE_VIEWPORT_WIDTH,
            height: 660.0,
        }
    }
}

/// Bubble area range for scatter points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizeRange {
    pub min: f64,
    pub max: f64,
}

/// Scales the base range by `max(1, width / 1100)²`; narrower viewports keep the base range.
pub fn scatter_size_range(viewport_width: f64) -> SizeRange {
    let ratio = if viewport_width.is_finite() {
        (viewport_width / REFERENCE_VIEWPORT_WIDTH).max(1.0)
    } else {
        1.0
    };
    let factor = ratio * ratio;
    SizeRange {
        min: MIN_POINT_SIZE * factor,
        max: MAX_POINT_SIZE * factor,
    }
}

/// Value an entity shows on a map: its latest real observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapValue {
    pub series_id: String,
    pub entity_id: Option<i64>,
    pub key: String,
    pub time: TimeValue,
    pub value: Datum,
    pub color: Option<String>,
}

/// Chart-type-specific precomputation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChartExtras {
    None,
    Scatter { size_range: SizeRange },
    Map { values: Vec<MapValue> },
}

/// Everything a chart renderer needs for one render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderableChartModel {
    pub chart_type: ChartType,
    pub series: Vec<Series>,
    pub domains: Domains,
    pub extras: ChartExtras,
    pub x_axis: AxisConfig,
    pub y_axis: AxisConfig,
    pub show_legend: bool,
}

impl RenderableChartModel {
    /// Legend items in render order: one per series, or one per bar for discrete-bar
    /// charts. Empty when the legend is hidden.
    pub fn legend_entries(&self) -> Vec<LegendEntry> {
        if !self.show_legend {
            return Vec::new();
        }
        if self.chart_type == ChartType::DiscreteBar {
            return self
                .series
                .iter()
                .flat_map(|s| s.values.iter())
                .map(|p| {
                    let label = p.key.clone().unwrap_or_else(|| p.time.to_string());
                    LegendEntry {
                        id: p.series_id.clone().unwrap_or_else(|| label.clone()),
                        label,
                        color: p.color.clone().unwrap_or_default(),
                    }
                })
                .collect();
        }
        self.series
            .iter()
            .map(|s| LegendEntry {
                id: s.id.clone(),
                label: s.key.clone(),
                color: s.color.clone().unwrap_or_default(),
            })
            .collect()
    }

    /// Y domain to force once the renderer reports its stacked-area `style`.
    pub fn post_render_correction(&self, style: StackedAreaStyle) -> Option<Extent> {
        domain::post_render_correction(&self.y_axis, self.chart_type, style)
    }

    /// Formatted labels for `ticks + 1` evenly spaced y values; empty without a y domain.
    pub fn y_tick_labels(&self, ticks: usize, locale_tag: &str) -> Vec<String> {
        match self.domains.y {
            Some(extent) => tick_values(extent, ticks)
                .into_iter()
                .map(|v| format_tick(v, &self.y_axis, locale_tag))
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Result of one adaptation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AdaptOutcome {
    Ready(RenderableChartModel),
    /// Render nothing; show the empty state.
    Invalid(InvalidConfiguration),
}

impl AdaptOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, AdaptOutcome::Ready(_))
    }

    pub fn into_model(self) -> Option<RenderableChartModel> {
        match self {
            AdaptOutcome::Ready(model) => Some(model),
            AdaptOutcome::Invalid(_) => None,
        }
    }
}

/// Per-chart-type shaping.
pub trait ChartTypeAdapter {
    fn chart_type(&self) -> ChartType;

    /// Dimensions the configuration must bind before anything is rendered.
    fn required_dimensions(&self) -> &'static [DimensionProperty] {
        &[DimensionProperty::Y]
    }

    /// Rearrange the filtered, colored series for this chart's geometry.
    fn shape(&self, series: Vec<Series>) -> Vec<Series> {
        series
    }

    fn extras(&self, _series: &[Series], _viewport: &Viewport) -> ChartExtras {
        ChartExtras::None
    }
}

pub struct LineAdapter;

impl ChartTypeAdapter for LineAdapter {
    fn chart_type(&self) -> ChartType {
        ChartType::Line
    }
}

pub struct ScatterAdapter;

impl ChartTypeAdapter for ScatterAdapter {
    fn chart_type(&self) -> ChartType {
        ChartType::Scatter
    }

    fn required_dimensions(&self) -> &'static [DimensionProperty] {
        &[DimensionProperty::X, DimensionProperty::Y]
    }

    fn extras(&self, _series: &[Series], viewport: &Viewport) -> ChartExtras {
        ChartExtras::Scatter {
            size_range: scatter_size_range(viewport.width),
        }
    }
}

pub struct StackedAreaAdapter;

impl ChartTypeAdapter for StackedAreaAdapter {
    fn chart_type(&self) -> ChartType {
        ChartType::StackedArea
    }

    fn shape(&self, series: Vec<Series>) -> Vec<Series> {
        gapfill::fill_stacked_area(series)
    }
}

pub struct MultiBarAdapter {
    pub horizontal: bool,
}

impl ChartTypeAdapter for MultiBarAdapter {
    fn chart_type(&self) -> ChartType {
        if self.horizontal {
            ChartType::MultiBarHorizontal
        } else {
            ChartType::MultiBarVertical
        }
    }

    fn shape(&self, series: Vec<Series>) -> Vec<Series> {
        gapfill::fill_multi_bar(series)
    }
}

pub struct DiscreteBarAdapter;

impl ChartTypeAdapter for DiscreteBarAdapter {
    fn chart_type(&self) -> ChartType {
        ChartType::DiscreteBar
    }

    fn shape(&self, series: Vec<Series>) -> Vec<Series> {
        vec![collapse_to_first_points(&series)]
    }
}

pub struct MapAdapter;

impl ChartTypeAdapter for MapAdapter {
    fn chart_type(&self) -> ChartType {
        ChartType::Map
    }

    fn extras(&self, series: &[Series], _viewport: &Viewport) -> ChartExtras {
        let values = series
            .iter()
            .filter_map(|s| {
                let latest = s
                    .values
                    .iter()
                    .filter(|p| !p.fake && p.x.is_finite())
                    .max_by(|a, b| a.x.total_cmp(&b.x))?;
                Some(MapValue {
                    series_id: s.id.clone(),
                    entity_id: s.entity_id().map(|id| id.entity),
                    key: s.key.clone(),
                    time: latest.time.clone(),
                    value: latest.y.clone(),
                    color: s.color.clone(),
                })
            })
            .collect();
        ChartExtras::Map { values }
    }
}

pub fn adapter_for(chart_type: ChartType) -> &'static dyn ChartTypeAdapter {
    match chart_type {
        ChartType::Line => &LineAdapter,
        ChartType::Scatter => &ScatterAdapter,
        ChartType::StackedArea => &StackedAreaAdapter,
        ChartType::MultiBarVertical => &MultiBarAdapter { horizontal: false },
        ChartType::MultiBarHorizontal => &MultiBarAdapter { horizontal: true },
        ChartType::DiscreteBar => &DiscreteBarAdapter,
        ChartType::Map => &MapAdapter,
    }
}

/// Dimensions `config` lacks for its chart type, in the adapter's order.
pub fn missing_dimensions(config: &ChartConfig) -> Vec<DimensionProperty> {
    adapter_for(config.chart_type)
        .required_dimensions()
        .iter()
        .copied()
        .filter(|p| !config.has_dimension(*p))
        .collect()
}

/// Build the renderable model for `series` under `config`.
pub fn adapt(
    series: &[Series],
    config: &ChartConfig,
    viewport: &Viewport,
    cache: &mut ColorCache,
) -> AdaptOutcome {
    let chart_type = config.chart_type;
    let missing = missing_dimensions(config);
    if !missing.is_empty() {
        log::debug!("adapt: {chart_type} chart lacks {missing:?}; rendering empty state");
        return AdaptOutcome::Invalid(InvalidConfiguration {
            chart_type,
            missing,
        });
    }

    let adapter = adapter_for(chart_type);
    let mut selected = filter_series(series, config);
    assign_colors(&mut selected, &config.entity_colors(), cache);
    let shaped = adapter.shape(selected);
    let domains = domain::resolve_series(&shaped, config, chart_type);
    let extras = adapter.extras(&shaped, viewport);

    log::debug!(
        "adapt: {chart_type} -> {} series, clamped={}",
        shaped.len(),
        domains.clamped
    );
    AdaptOutcome::Ready(RenderableChartModel {
        chart_type,
        series: shaped,
        domains,
        extras,
        x_axis: config.x_axis.clone(),
        y_axis: config.y_axis.clone(),
        show_legend: !config.hide_legend,
    })
}
