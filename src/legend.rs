//! Legend packing: variable-width label chips laid out column-major into rows that fit
//! the available width.
//!
//! The layout is recomputed from scratch on every resize and on every change of the item
//! set; it is never patched incrementally.

use serde::{Deserialize, Serialize};

use crate::text::{TextMeasurer, measure_or_estimate};

/// Vertical offset of the first row.
pub const FIRST_ROW_OFFSET: f64 = 5.0;
/// Horizontal space added to every measured label (swatch + gap).
pub const DEFAULT_PADDING: f64 = 28.0;
pub const DEFAULT_ROW_HEIGHT: f64 = 20.0;
pub const DEFAULT_FONT_PX: f64 = 12.0;

/// One legend item before layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub id: String,
    pub label: String,
    pub color: String,
}

/// A placed legend item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendLayoutItem {
    pub id: String,
    pub label: String,
    pub color: String,
    pub x: f64,
    pub y: f64,
    /// Measured label width plus padding.
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendLayout {
    pub items: Vec<LegendLayoutItem>,
    pub total_height: f64,
    pub series_per_row: usize,
    pub column_widths: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendMargins {
    pub top: f64,
    pub bottom: f64,
}

impl Default for LegendMargins {
    fn default() -> Self {
        Self { top: 5.0, bottom: 5.0 }
    }
}

pub struct LegendPacker<'m> {
    measurer: &'m dyn TextMeasurer,
    font_px: f64,
    margins: LegendMargins,
}

impl<'m> LegendPacker<'m> {
    pub fn new(measurer: &'m dyn TextMeasurer) -> Self {
        Self {
            measurer,
            font_px: DEFAULT_FONT_PX,
            margins: LegendMargins::default(),
        }
    }

    pub fn with_font_px(mut self, font_px: f64) -> Self {
        self.font_px = font_px;
        self
    }

    pub fn with_margins(mut self, margins: LegendMargins) -> Self {
        self.margins = margins;
        self
    }

    pub fn pack(
        &self,
        items: &[LegendEntry],
        available_width: f64,
        padding: f64,
        row_height: f64,
    ) -> LegendLayout {
        let widths: Vec<f64> = items
            .iter()
            .map(|it| measure_or_estimate(self.measurer, &it.label, self.font_px) + padding)
            .collect();

        let (series_per_row, column_widths) = pack_columns(&widths, available_width);

        let mut x_offsets = Vec::with_capacity(series_per_row);
        let mut cur_x = 0.0;
        for w in column_widths.iter().take(series_per_row) {
            x_offsets.push(cur_x);
            cur_x += w;
        }

        let placed = items
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (it, w))| LegendLayoutItem {
                id: it.id.clone(),
                label: it.label.clone(),
                color: it.color.clone(),
                x: x_offsets.get(i % series_per_row).copied().unwrap_or(0.0),
                y: FIRST_ROW_OFFSET + (i / series_per_row) as f64 * row_height,
                width: *w,
            })
            .collect();

        let rows = items.len().div_ceil(series_per_row);
        LegendLayout {
            items: placed,
            total_height: self.margins.top + self.margins.bottom + rows as f64 * row_height,
            series_per_row,
            column_widths,
        }
    }
}

/// Column count and column widths for item widths `widths`.
///
/// Greedily takes items into the first row while the running width is below
/// `available_width`, then backs off one column at a time (recomputing each column as
/// the widest item assigned to it) until the row fits or only one column is left.
pub fn pack_columns(widths: &[f64], available_width: f64) -> (usize, Vec<f64>) {
    let mut series_per_row = 0usize;
    let mut legend_width = 0.0;
    let mut column_widths: Vec<f64> = Vec::new();

    while legend_width < available_width && series_per_row < widths.len() {
        column_widths.push(widths[series_per_row]);
        legend_width += widths[series_per_row];
        series_per_row += 1;
    }
    if series_per_row == 0 {
        series_per_row = 1;
    }

    while legend_width > available_width && series_per_row > 1 {
        series_per_row -= 1;
        column_widths = vec![0.0; series_per_row];
        for (k, w) in widths.iter().enumerate() {
            let col = &mut column_widths[k % series_per_row];
            if *w > *col {
                *col = *w;
            }
        }
        legend_width = column_widths.iter().sum();
    }

    log::debug!(
        "legend: {} item(s) -> {} column(s), width {:.1}/{:.1}",
        widths.len(),
        series_per_row,
        legend_width,
        available_width
    );
    (series_per_row, column_widths)
}
