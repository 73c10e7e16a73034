// Tabular and JSON projections of a pipeline run.
use crate::metrics::{mean_ratio, ratio, sort_for_presentation};
use crate::pipeline::{DomainReport, PipelineOutput};
use crate::types::{LitersRow, MetricRow, MonthlyPaintRow, PaintColorRow, SummaryStats};
use crate::util::{format_number, format_ratio, saturate};

const QTY_DECIMALS: usize = 2;
const STD_DECIMALS: usize = 4;

/// Per-work-order STD rows, worst (highest) ratio first.
pub fn metric_rows(report: &DomainReport) -> Vec<MetricRow> {
    let mut results = report.results.clone();
    sort_for_presentation(&mut results);
    results
        .into_iter()
        .map(|r| MetricRow {
            work_order: r.work_order.to_string(),
            output: format_number(r.output_quantity, QTY_DECIMALS),
            hours: format_number(r.hours, QTY_DECIMALS),
            std: format_ratio(r.ratio, STD_DECIMALS),
        })
        .collect()
}

/// Paint volume per work order, largest first.
pub fn liters_rows(out: &PipelineOutput) -> Vec<LitersRow> {
    let mut entries: Vec<_> = out.liters_by_work_order.iter().collect();
    entries.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));
    entries
        .into_iter()
        .map(|(k, v)| LitersRow {
            work_order: k.to_string(),
            liters: format_number(*v, QTY_DECIMALS),
        })
        .collect()
}

/// Painted area and paint used per month, chronological, undated last.
pub fn monthly_paint_rows(out: &PipelineOutput) -> Vec<MonthlyPaintRow> {
    out.area_by_month
        .iter()
        .map(|(month, area)| MonthlyPaintRow {
            month: month.clone(),
            area_m2: format_number(*area, QTY_DECIMALS),
            liters: format_number(
                out.liters_by_month.get(month).copied().unwrap_or(0.0),
                QTY_DECIMALS,
            ),
        })
        .collect()
}

/// Paint volume per colour, largest first.
pub fn color_rows(out: &PipelineOutput) -> Vec<PaintColorRow> {
    let mut entries: Vec<_> = out.liters_by_color.iter().collect();
    entries.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));
    entries
        .into_iter()
        .map(|(color, liters)| PaintColorRow {
            color: color.clone(),
            liters: format_number(*liters, QTY_DECIMALS),
        })
        .collect()
}

pub fn generate_summary(out: &PipelineOutput) -> SummaryStats {
    let scaffold_hours = out.scaffolding.aggregate.total_hours;
    SummaryStats {
        painting_records: out.painting.records,
        scaffold_records: out.scaffolding.records,
        hour_records: out.painting.hour_records + out.scaffolding.hour_records,
        unassigned_records: out.unassigned_records,
        painting_work_orders: out.painting.results.len(),
        scaffold_work_orders: out.scaffolding.results.len(),
        total_hours: out.global.total_hours,
        total_output: out.global.total_output,
        global_ratio: out.global.global_ratio,
        painting_ratio: out.painting.aggregate.global_ratio,
        scaffold_ratio: out.scaffolding.aggregate.global_ratio,
        mean_work_order_ratio: mean_ratio(
            out.painting.results.iter().chain(&out.scaffolding.results),
        ),
        total_liters: out
            .liters_by_work_order
            .values()
            .fold(0.0, |acc, v| saturate(acc + v)),
        scaffold_planned_hours: out.scaffold_planned_hours,
        scaffold_realized_pct: ratio(scaffold_hours, out.scaffold_planned_hours)
            .map(|r| r * 100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{run, SourceFormats, SourceRows};
    use crate::types::RawRow;

    fn rows(data: &[&[(&str, &str)]]) -> Vec<RawRow> {
        data.iter().map(|r| r.iter().copied().collect()).collect()
    }

    fn sample() -> PipelineOutput {
        let sources = SourceRows {
            painting: rows(&[
                &[("OS", "OS1"), ("M²", "100"), ("Litros", "10"), ("Cor", "Branco"), ("Data", "02/05/2024")],
                &[("OS", "OS2"), ("M²", "0"), ("Litros", "25"), ("Cor", ""), ("Data", "")],
                &[("OS", "OS3"), ("M²", "10"), ("Litros", "1"), ("Cor", "Branco"), ("Data", "09/04/2024")],
            ]),
            scaffolding: rows(&[&[("OS", "OS9"), ("ML", "20"), ("Qtd Montadores", "2")]]),
            painting_hours: rows(&[
                &[("OS", "OS1"), ("Horas", "20")],
                &[("OS", "OS2"), ("Horas", "3")],
                &[("OS", "OS3"), ("Horas", "8")],
            ]),
            scaffold_hours: rows(&[&[("OS", "OS9"), ("Horas", "12")]]),
        };
        run(&sources, &SourceFormats::default())
    }

    #[test]
    fn metric_rows_sorted_with_undefined_last() {
        let got = metric_rows(&sample().painting);
        let ids: Vec<&str> = got.iter().map(|r| r.work_order.as_str()).collect();
        assert_eq!(ids, vec!["OS3", "OS1", "OS2"]);
        assert_eq!(got[0].std, "0.8000");
        assert_eq!(got[1].std, "0.2000");
        assert_eq!(got[2].std, "n/a");
        assert_eq!(got[2].hours, "3.00");
    }

    #[test]
    fn liters_and_months() {
        let out = sample();
        let liters = liters_rows(&out);
        assert_eq!(liters[0].work_order, "OS2");
        assert_eq!(liters[0].liters, "25.00");
        let monthly = monthly_paint_rows(&out);
        let months: Vec<&str> = monthly.iter().map(|r| r.month.as_str()).collect();
        assert_eq!(months, vec!["2024-04", "2024-05", "unknown"]);
        assert_eq!(monthly[1].area_m2, "100.00");
        assert_eq!(monthly[1].liters, "10.00");
        assert_eq!(monthly[2].liters, "25.00");
    }

    #[test]
    fn colors_largest_first() {
        let colors = color_rows(&sample());
        let got: Vec<(&str, &str)> = colors
            .iter()
            .map(|r| (r.color.as_str(), r.liters.as_str()))
            .collect();
        assert_eq!(got, vec![("(unspecified)", "25.00"), ("Branco", "11.00")]);
    }

    #[test]
    fn summary_figures() {
        let s = generate_summary(&sample());
        assert_eq!(s.painting_records, 3);
        assert_eq!(s.hour_records, 4);
        assert_eq!(s.total_hours, 43.0);
        assert_eq!(s.total_output, 130.0);
        assert!((s.global_ratio.unwrap() - 43.0 / 130.0).abs() < 1e-9);
        assert!((s.painting_ratio.unwrap() - 31.0 / 110.0).abs() < 1e-9);
        assert!((s.scaffold_ratio.unwrap() - 0.6).abs() < 1e-9);
        assert!((s.mean_work_order_ratio.unwrap() - (0.2 + 0.8 + 0.6) / 3.0).abs() < 1e-9);
        assert_eq!(s.total_liters, 36.0);
        assert_eq!(s.scaffold_planned_hours, 16.0);
        assert!((s.scaffold_realized_pct.unwrap() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn summary_json_keeps_null_ratios() {
        let s = generate_summary(&run(&SourceRows::default(), &SourceFormats::default()));
        let v = serde_json::to_value(&s).unwrap();
        assert!(v["global_ratio"].is_null());
        assert!(v["scaffold_realized_pct"].is_null());
        assert_eq!(v["total_hours"], 0.0);
    }
}
