//! Productivity (STD) reports for painting and scaffolding work orders.
//!
//! Raw spreadsheet rows are resolved onto canonical records, grouped by work
//! order and turned into hours-per-output ratios. The core (`resolver`,
//! `normalize`, `aggregate`, `metrics`, `pipeline`) is pure and infallible;
//! `loader`, `reports` and `output` sit around it.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod reports;
pub mod resolver;
pub mod types;
pub mod util;

pub use error::{ReportError, Result};
pub use pipeline::{run, PipelineOutput, SourceFormats, SourceRows};
pub use types::{GlobalAggregate, MetricResult, RawRow, WorkOrderKey};
