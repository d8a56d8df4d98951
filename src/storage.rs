//! Tabular export of adapted series. Gap-fill points never reach a table.

use crate::error::Result;
use crate::models::Series;
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// One exported observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub series_id: String,
    pub entity_id: Option<i64>,
    pub key: String,
    pub time: String,
    pub x: f64,
    pub value: String,
}

/// Rows for every real point of `series`, in series order.
pub fn table_rows(series: &[Series]) -> Vec<TableRow> {
    series
        .iter()
        .flat_map(|s| {
            let entity_id = s.entity_id().map(|id| id.entity);
            s.values.iter().filter(|p| !p.fake).map(move |p| TableRow {
                series_id: s.id.clone(),
                entity_id,
                key: p.key.clone().unwrap_or_else(|| s.key.clone()),
                time: p.time.to_string(),
                x: p.x,
                value: p.y.to_string(),
            })
        })
        .collect()
}

/// Prefix text cells that spreadsheets would evaluate as formulas with `'`.
/// Numbers (including negative ones) are written unchanged.
fn sanitize_cell(cell: &str) -> std::borrow::Cow<'_, str> {
    let risky = cell.starts_with(['=', '+', '-', '@', '\t', '\r']);
    if risky && cell.trim().parse::<f64>().is_err() {
        format!("'{cell}").into()
    } else {
        cell.into()
    }
}

/// Save rows as CSV with header.
pub fn save_csv<P: AsRef<Path>>(rows: &[TableRow], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("series_id", "entity_id", "key", "time", "x", "value"))?;
    for r in rows {
        wtr.serialize((
            sanitize_cell(&r.series_id),
            r.entity_id,
            sanitize_cell(&r.key),
            sanitize_cell(&r.time),
            r.x,
            sanitize_cell(&r.value),
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save rows as a pretty JSON array.
pub fn save_json<P: AsRef<Path>>(rows: &[TableRow], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(rows)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formulas_are_quoted_numbers_are_not() {
        assert_eq!(sanitize_cell("=SUM(A1)"), "'=SUM(A1)");
        assert_eq!(sanitize_cell("@foo"), "'@foo");
        assert_eq!(sanitize_cell("-12.5"), "-12.5");
        assert_eq!(sanitize_cell("France"), "France");
    }
}
