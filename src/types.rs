// Data model shared by the core pipeline and the reporting layer.
//
// Canonical records are plain owned structs built once per run from raw rows;
// nothing here is mutated after normalization.
use crate::util::parse_month;
use serde::{Serialize, Serializer};
use std::fmt;
use tabled::Tabled;

/// One spreadsheet row: column label -> cell text, in header order.
///
/// Labels are kept exactly as the source wrote them (accents, casing, stray
/// punctuation). Duplicate labels are allowed; exact lookup returns the first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    fields: Vec<(String, String)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Grouping key for work orders.
///
/// `Unassigned` is the single bucket for every record whose work-order cell
/// was blank or missing. It orders after every assigned id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WorkOrderKey {
    Assigned(String),
    Unassigned,
}

impl WorkOrderKey {
    pub const UNASSIGNED_LABEL: &'static str = "(unassigned)";

    /// Blank or whitespace-only ids map to `Unassigned`.
    pub fn from_id(id: &str) -> Self {
        let id = id.trim();
        if id.is_empty() {
            WorkOrderKey::Unassigned
        } else {
            WorkOrderKey::Assigned(id.to_string())
        }
    }

    pub fn is_unassigned(&self) -> bool {
        matches!(self, WorkOrderKey::Unassigned)
    }
}

impl fmt::Display for WorkOrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkOrderKey::Assigned(id) => f.write_str(id),
            WorkOrderKey::Unassigned => f.write_str(Self::UNASSIGNED_LABEL),
        }
    }
}

impl Serialize for WorkOrderKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Output domain of a work order. Painting output is area, scaffolding
/// output is installed linear length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Painting,
    Scaffolding,
}

impl Domain {
    pub fn unit(&self) -> &'static str {
        match self {
            Domain::Painting => "HH/m²",
            Domain::Scaffolding => "HH/ml",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Domain::Painting => "Painting",
            Domain::Scaffolding => "Scaffolding",
        }
    }
}

/// Paint consumption log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintingRecord {
    pub work_order: String,
    pub area_m2: f64,
    pub liters: f64,
    pub reference: String,
    pub description: String,
    pub paint_color: String,
    pub date: String,
    pub applicator: String,
}

/// Scaffold assembly log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaffoldRecord {
    pub work_order: String,
    pub linear_m: f64,
    pub crew_size: f64,
    pub crew: String,
    pub supervisor: String,
    pub date: String,
}

/// Access-control derived hour log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct HourLogRecord {
    pub work_order: String,
    pub hours: f64,
    pub worker: String,
    pub role: String,
    pub date: String,
}

impl PaintingRecord {
    pub fn month(&self) -> Option<String> {
        parse_month(&self.date)
    }
}

/// Any canonical record, tagged by source kind.
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalRecord {
    Painting(PaintingRecord),
    Scaffold(ScaffoldRecord),
    HourLog(HourLogRecord),
}

impl CanonicalRecord {
    pub fn work_order(&self) -> &str {
        match self {
            CanonicalRecord::Painting(r) => &r.work_order,
            CanonicalRecord::Scaffold(r) => &r.work_order,
            CanonicalRecord::HourLog(r) => &r.work_order,
        }
    }
}

/// Efficiency of one work order. `ratio` is `None` when output is zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricResult {
    pub work_order: WorkOrderKey,
    pub output_quantity: f64,
    pub hours: f64,
    pub ratio: Option<f64>,
}

/// Totals across both domains and every work order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalAggregate {
    pub total_hours: f64,
    pub total_output: f64,
    pub global_ratio: Option<f64>,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MetricRow {
    #[serde(rename = "WorkOrder")]
    #[tabled(rename = "WorkOrder")]
    pub work_order: String,
    #[serde(rename = "Output")]
    #[tabled(rename = "Output")]
    pub output: String,
    #[serde(rename = "Hours")]
    #[tabled(rename = "Hours")]
    pub hours: String,
    #[serde(rename = "STD")]
    #[tabled(rename = "STD")]
    pub std: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct LitersRow {
    #[serde(rename = "WorkOrder")]
    #[tabled(rename = "WorkOrder")]
    pub work_order: String,
    #[serde(rename = "Liters")]
    #[tabled(rename = "Liters")]
    pub liters: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MonthlyPaintRow {
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month: String,
    #[serde(rename = "AreaM2")]
    #[tabled(rename = "AreaM2")]
    pub area_m2: String,
    #[serde(rename = "Liters")]
    #[tabled(rename = "Liters")]
    pub liters: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct PaintColorRow {
    #[serde(rename = "Color")]
    #[tabled(rename = "Color")]
    pub color: String,
    #[serde(rename = "Liters")]
    #[tabled(rename = "Liters")]
    pub liters: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryStats {
    pub painting_records: usize,
    pub scaffold_records: usize,
    pub hour_records: usize,
    pub unassigned_records: usize,
    pub painting_work_orders: usize,
    pub scaffold_work_orders: usize,
    pub total_hours: f64,
    pub total_output: f64,
    pub global_ratio: Option<f64>,
    pub painting_ratio: Option<f64>,
    pub scaffold_ratio: Option<f64>,
    /// Unweighted mean of the defined per-work-order ratios. Reported for
    /// comparison with older dashboards; `global_ratio` is the headline.
    pub mean_work_order_ratio: Option<f64>,
    pub total_liters: f64,
    pub scaffold_planned_hours: f64,
    pub scaffold_realized_pct: Option<f64>,
}
