//! Gap filling for charts whose geometry needs aligned series.
//!
//! Multi-bar charts treat time as an ordinal axis, so every series needs a bar slot at
//! every observed time. Stacked areas need a value wherever the base series has one.
//! Inserted points are zero-valued and flagged `fake`; exports drop them.

use crate::config::ChartType;
use crate::models::{Datum, Series, TimePoint};

pub fn fill(series: Vec<Series>, chart_type: ChartType) -> Vec<Series> {
    match chart_type {
        ChartType::MultiBarVertical | ChartType::MultiBarHorizontal => fill_multi_bar(series),
        ChartType::StackedArea => fill_stacked_area(series),
        _ => series,
    }
}

/// Sorted, deduplicated union of every series' `x`.
pub fn all_times(series: &[Series]) -> Vec<f64> {
    let mut times: Vec<f64> = series
        .iter()
        .flat_map(|s| s.values.iter().map(|p| p.x))
        .filter(|x| x.is_finite())
        .collect();
    times.sort_by(f64::total_cmp);
    times.dedup_by(|a, b| a == b);
    times
}

/// After this, every series has exactly one point per entry of [`all_times`], in order.
pub fn fill_multi_bar(mut series: Vec<Series>) -> Vec<Series> {
    let times = all_times(&series);

    for s in series.iter_mut() {
        let mut existing = std::mem::take(&mut s.values);
        existing.sort_by(|a, b| a.x.total_cmp(&b.x));
        let before = existing.len();

        let mut iter = existing.into_iter().peekable();
        let mut values = Vec::with_capacity(times.len());
        let mut inserted = 0usize;
        for &t in &times {
            // Duplicates of an earlier time and non-finite x fall behind `t` here.
            while iter.next_if(|p| p.x < t || p.x.is_nan()).is_some() {}
            match iter.next_if(|p| p.x == t) {
                Some(p) => values.push(p),
                None => {
                    values.push(TimePoint::filler(t, &s.key));
                    inserted += 1;
                }
            }
        }

        let kept = values.len() - inserted;
        if kept < before {
            log::debug!(
                "gapfill: series {:?} dropped {} duplicate/unplaceable point(s)",
                s.id,
                before - kept
            );
        }
        s.values = values;
    }

    series
}

/// Backfill entirely empty series from the base (first) series, zeroed.
///
/// Partially populated series are left as they are.
pub fn fill_stacked_area(mut series: Vec<Series>) -> Vec<Series> {
    let base = match series.first() {
        Some(first) if !first.values.is_empty() => first.values.clone(),
        Some(_) => {
            log::debug!("gapfill: base series is empty; nothing to backfill from");
            return series;
        }
        None => return series,
    };

    for s in series.iter_mut().skip(1).filter(|s| s.values.is_empty()) {
        s.values = base
            .iter()
            .map(|p| TimePoint {
                time: p.time.clone(),
                x: p.x,
                y: Datum::Number(0.0),
                color: None,
                fake: true,
                key: Some(s.key.clone()),
                series_id: None,
            })
            .collect();
    }

    series
}
