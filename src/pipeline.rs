// End-to-end core run: raw rows -> canonical records -> per-OS totals ->
// ratios. Pure over its inputs; loading and rendering happen elsewhere.
use crate::aggregate::{aggregate, sum_by, WorkOrderTotals};
use crate::metrics::{aggregate_results, compute_global, compute_metrics};
use crate::normalize::{normalize_hours, normalize_painting, normalize_scaffold};
use crate::types::{
    CanonicalRecord, Domain, GlobalAggregate, HourLogRecord, MetricResult, PaintingRecord, RawRow,
    WorkOrderKey,
};
use crate::util::{saturate, NumberFormat};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Scaffold crews are planned in 8 h shifts.
pub const SHIFT_HOURS: f64 = 8.0;

pub const UNKNOWN_MONTH: &str = "unknown";

/// Bucket for paint entries with a blank colour cell.
pub const UNSPECIFIED_COLOR: &str = "(unspecified)";

/// Already-materialized rows per source. A missing source is an empty vec.
#[derive(Debug, Clone, Default)]
pub struct SourceRows {
    pub painting: Vec<RawRow>,
    pub scaffolding: Vec<RawRow>,
    pub painting_hours: Vec<RawRow>,
    pub scaffold_hours: Vec<RawRow>,
}

/// Decimal convention per source file.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceFormats {
    pub painting: NumberFormat,
    pub scaffolding: NumberFormat,
    pub painting_hours: NumberFormat,
    pub scaffold_hours: NumberFormat,
}

impl SourceFormats {
    pub fn uniform(format: NumberFormat) -> Self {
        Self {
            painting: format,
            scaffolding: format,
            painting_hours: format,
            scaffold_hours: format,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DomainReport {
    pub domain: Domain,
    pub records: usize,
    pub hour_records: usize,
    pub totals: WorkOrderTotals,
    /// Key order; see `metrics::sort_for_presentation` for display order.
    pub results: Vec<MetricResult>,
    pub aggregate: GlobalAggregate,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub painting: DomainReport,
    pub scaffolding: DomainReport,
    pub global: GlobalAggregate,
    pub liters_by_work_order: BTreeMap<WorkOrderKey, f64>,
    pub area_by_month: BTreeMap<String, f64>,
    pub liters_by_month: BTreeMap<String, f64>,
    pub liters_by_color: BTreeMap<String, f64>,
    pub scaffold_planned_hours: f64,
    /// Records of any source that landed in the unassigned bucket.
    pub unassigned_records: usize,
}

/// Records of any kind whose work-order cell was blank.
pub fn count_unassigned(records: &[CanonicalRecord]) -> usize {
    records
        .iter()
        .filter(|r| WorkOrderKey::from_id(r.work_order()).is_unassigned())
        .count()
}

fn domain_report(
    domain: Domain,
    records: usize,
    output: BTreeMap<WorkOrderKey, f64>,
    hour_log: &[HourLogRecord],
) -> DomainReport {
    let hours = aggregate(hour_log, |r| r.work_order.as_str(), |r| r.hours);
    let results = compute_metrics(&output, &hours);
    for r in results.iter().filter(|r| r.ratio.is_none()) {
        debug!(domain = domain.label(), work_order = %r.work_order, hours = r.hours, "no output, ratio undefined");
    }
    let aggregate = aggregate_results(&results);
    DomainReport {
        domain,
        records,
        hour_records: hour_log.len(),
        totals: WorkOrderTotals::join(&output, &hours),
        results,
        aggregate,
    }
}

pub fn run(sources: &SourceRows, formats: &SourceFormats) -> PipelineOutput {
    let painting = normalize_painting(&sources.painting, formats.painting);
    let scaffolding = normalize_scaffold(&sources.scaffolding, formats.scaffolding);
    let painting_hours = normalize_hours(&sources.painting_hours, formats.painting_hours);
    let scaffold_hours = normalize_hours(&sources.scaffold_hours, formats.scaffold_hours);

    let all_records: Vec<CanonicalRecord> = painting
        .iter()
        .cloned()
        .map(CanonicalRecord::Painting)
        .chain(scaffolding.iter().cloned().map(CanonicalRecord::Scaffold))
        .chain(painting_hours.iter().cloned().map(CanonicalRecord::HourLog))
        .chain(scaffold_hours.iter().cloned().map(CanonicalRecord::HourLog))
        .collect();
    let unassigned_records = count_unassigned(&all_records);
    if unassigned_records > 0 {
        debug!(unassigned_records, "records without a work order grouped under the sentinel");
    }

    let area = aggregate(&painting, |r| r.work_order.as_str(), |r| r.area_m2);
    let linear = aggregate(&scaffolding, |r| r.work_order.as_str(), |r| r.linear_m);

    let painting_report = domain_report(Domain::Painting, painting.len(), area, &painting_hours);
    let scaffold_report =
        domain_report(Domain::Scaffolding, scaffolding.len(), linear, &scaffold_hours);
    let global = compute_global(&painting_report.results, &scaffold_report.results);

    let liters_by_work_order = aggregate(&painting, |r| r.work_order.as_str(), |r| r.liters);
    let month_of = |r: &PaintingRecord| r.month().unwrap_or_else(|| UNKNOWN_MONTH.to_string());
    let area_by_month = sum_by(&painting, month_of, |r| r.area_m2);
    let liters_by_month = sum_by(&painting, month_of, |r| r.liters);
    let liters_by_color = sum_by(
        &painting,
        |r| match r.paint_color.trim() {
            "" => UNSPECIFIED_COLOR.to_string(),
            color => color.to_string(),
        },
        |r| r.liters,
    );
    // Crew × shift can overflow on absurd crew counts; clamp like every other total.
    let scaffold_planned_hours = scaffolding
        .iter()
        .map(|r| saturate(r.crew_size * SHIFT_HOURS))
        .fold(0.0, |acc, h| saturate(acc + h));

    info!(
        painting = painting_report.records,
        scaffolding = scaffold_report.records,
        painting_hours = painting_report.hour_records,
        scaffold_hours = scaffold_report.hour_records,
        work_orders = painting_report.results.len() + scaffold_report.results.len(),
        "pipeline run complete"
    );

    PipelineOutput {
        painting: painting_report,
        scaffolding: scaffold_report,
        global,
        liters_by_work_order,
        area_by_month,
        liters_by_month,
        liters_by_color,
        scaffold_planned_hours,
        unassigned_records,
    }
}
