//! grapher_rs
//!
//! Data adaptation and legend layout for an interactive chart-authoring tool. Takes the
//! series a data-fetch collaborator returns plus the current chart configuration, and
//! produces exactly what a chart renderer draws. Pairs with the `grapher` CLI.
//!
//! ### Features
//! - Select entities and clamp series to a time window
//! - Stable per-entity colors, with brighter variants for an entity's extra variables
//! - Zero-valued gap filling for multi-bar and stacked-area charts
//! - Axis domains with a zero floor and forced bounds
//! - Per-chart-type adaptation with an explicit invalid-configuration result
//! - Greedy legend packing into columns that fit the available width
//! - Tabular export (CSV/JSON) that leaves synthesized points out
//!
//! ### Example
//! ```
//! use grapher_rs::{AdaptOutcome, ChartConfig, ColorCache, Series, TimePoint, Viewport};
//!
//! let config = ChartConfig::from_json_str(
//!     r#"{"chartType":"4","dimensions":[{"property":"y","variableId":1}]}"#,
//! )?;
//! let series = vec![
//!     Series::new("1", "France", vec![TimePoint::new(2000, 2000.0, 5.0), TimePoint::new(2001, 2001.0, 6.0)]),
//!     Series::new("2", "Spain", vec![TimePoint::new(2000, 2000.0, 3.0)]),
//! ];
//! let mut cache = ColorCache::seeded(7);
//! let outcome = grapher_rs::adapt(&series, &config, &Viewport::default(), &mut cache);
//! let model = outcome.into_model().expect("y dimension is bound");
//! assert!(model.series.iter().all(|s| s.values.len() == 2));
//! # Ok::<(), grapher_rs::Error>(())
//! ```

pub mod adapter;
pub mod colors;
pub mod config;
pub mod domain;
pub mod error;
pub mod filter;
pub mod format;
pub mod gapfill;
pub mod ingest;
pub mod legend;
pub mod models;
pub mod storage;
pub mod text;

pub use adapter::{AdaptOutcome, ChartExtras, ChartTypeAdapter, RenderableChartModel, Viewport, adapt};
pub use colors::ColorCache;
pub use config::{AxisConfig, ChartConfig, ChartType, TimeWindow};
pub use error::{Error, InvalidConfiguration, Result};
pub use ingest::DataPayload;
pub use legend::{LegendEntry, LegendLayout, LegendPacker};
pub use models::{Datum, EntityId, Series, TimePoint, TimeValue};
pub use text::{ApproximateMeasurer, TextMeasurer};
