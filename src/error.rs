use crate::config::ChartType;
use crate::models::DimensionProperty;
use serde::Serialize;

/// Errors raised at the crate's file and JSON boundaries.
///
/// The render pipeline itself never returns these; it degrades to smaller output instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown chart type: {0}")]
    UnknownChartType(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// The configuration lacks a dimension its chart type needs; the caller shows an empty state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{chart_type} chart is missing required dimension(s): {}", join_properties(.missing))]
pub struct InvalidConfiguration {
    pub chart_type: ChartType,
    pub missing: Vec<DimensionProperty>,
}

fn join_properties(props: &[DimensionProperty]) -> String {
    props
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
