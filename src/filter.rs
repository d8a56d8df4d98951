//! Entity and time-window selection.
//!
//! Filtering never touches the input: every call returns freshly cloned series, so a
//! render pass owns its data exclusively.

use crate::config::{ChartConfig, ChartType, TimeWindow};
use crate::models::Series;

/// Key (and id) of the single series a discrete-bar chart renders.
pub const DISCRETE_SERIES_KEY: &str = "variable";

/// Select series and clamp their values per `config`.
///
/// Discrete-bar charts additionally collapse to one series holding the first point of
/// every selected series.
pub fn filter(series: &[Series], config: &ChartConfig) -> Vec<Series> {
    let selected = filter_series(series, config);
    if config.chart_type == ChartType::DiscreteBar {
        vec![collapse_to_first_points(&selected)]
    } else {
        selected
    }
}

/// Entity selection, time-window clamp and legend ordering, without the discrete-bar
/// collapse.
pub fn filter_series(series: &[Series], config: &ChartConfig) -> Vec<Series> {
    let selected = config.selected_entity_ids();
    let pass_all = config.group_by_variables || selected.is_empty();

    let mut out: Vec<Series> = series
        .iter()
        .filter(|s| {
            pass_all
                || s
                    .entity_id()
                    .is_some_and(|id| selected.contains(&id.entity))
        })
        .map(|s| match config.time_window {
            Some(window) => clamp_to_window(s, window),
            None => s.clone(),
        })
        .collect();

    if !config.hide_legend {
        out.sort_by(|a, b| a.key.cmp(&b.key));
    }

    log::debug!(
        "filter: kept {} of {} series (window: {:?})",
        out.len(),
        series.len(),
        config.time_window
    );
    out
}

/// Copy of `series` holding only points whose integer time lies in `window`.
pub fn clamp_to_window(series: &Series, window: TimeWindow) -> Series {
    Series {
        id: series.id.clone(),
        key: series.key.clone(),
        color: series.color.clone(),
        values: series
            .values
            .iter()
            .filter(|p| p.time.as_integer().is_some_and(|t| window.contains(t)))
            .cloned()
            .collect(),
    }
}

/// One series made of the first point of each input series.
///
/// Each point keeps its owner's key and id and, if the owner already has one, its color.
/// Series without points contribute nothing.
pub fn collapse_to_first_points(series: &[Series]) -> Series {
    let values = series
        .iter()
        .filter_map(|s| {
            let mut p = s.values.first()?.clone();
            p.key = Some(s.key.clone());
            p.series_id = Some(s.id.clone());
            if p.color.is_none() {
                p.color = s.color.clone();
            }
            Some(p)
        })
        .collect();
    Series::new(DISCRETE_SERIES_KEY, DISCRETE_SERIES_KEY, values)
}
