// Efficiency ratios (STD = hours per unit of output).
//
// Painting output (m²) and scaffolding output (linear m) are summed together
// in the global aggregate. This treats "hours per unit of output" as one
// uniform figure across domains; it is a reporting simplification, not a
// claim that a square metre and a linear metre are equivalent.
use crate::types::{GlobalAggregate, MetricResult, WorkOrderKey};
use crate::util::{mean, saturate};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// `hours / output`, or `None` when there is no output to divide by.
///
/// A tiny output under huge hours saturates at `f64::MAX`; the ratio is
/// never infinite.
pub fn ratio(hours: f64, output: f64) -> Option<f64> {
    debug_assert!(
        hours.is_finite() && hours >= 0.0,
        "hours must be a non-negative finite value, got {hours}"
    );
    debug_assert!(
        output.is_finite() && output >= 0.0,
        "output must be a non-negative finite value, got {output}"
    );
    if output > 0.0 {
        Some(saturate(hours / output))
    } else {
        None
    }
}

/// One result per work order in either mapping, in key order.
pub fn compute_metrics(
    output_totals: &BTreeMap<WorkOrderKey, f64>,
    hour_totals: &BTreeMap<WorkOrderKey, f64>,
) -> Vec<MetricResult> {
    let mut keys: Vec<&WorkOrderKey> = output_totals.keys().chain(hour_totals.keys()).collect();
    keys.sort();
    keys.dedup();
    keys.into_iter()
        .map(|k| {
            let output_quantity = output_totals.get(k).copied().unwrap_or(0.0);
            let hours = hour_totals.get(k).copied().unwrap_or(0.0);
            MetricResult {
                work_order: k.clone(),
                output_quantity,
                hours,
                ratio: ratio(hours, output_quantity),
            }
        })
        .collect()
}

/// Weighted totals over any number of result sets.
pub fn aggregate_results<'a, I>(results: I) -> GlobalAggregate
where
    I: IntoIterator<Item = &'a MetricResult>,
{
    let (total_hours, total_output) = results
        .into_iter()
        .fold((0.0, 0.0), |(h, o), r| {
            (saturate(h + r.hours), saturate(o + r.output_quantity))
        });
    GlobalAggregate {
        total_hours,
        total_output,
        global_ratio: ratio(total_hours, total_output),
    }
}

/// Cross-domain weighted aggregate: total hours / total output.
pub fn compute_global(painting: &[MetricResult], scaffolding: &[MetricResult]) -> GlobalAggregate {
    aggregate_results(painting.iter().chain(scaffolding))
}

/// Unweighted mean of the defined per-work-order ratios.
///
/// Not interchangeable with the weighted global ratio: a small work order
/// with an extreme rate moves this figure as much as a large one.
pub fn mean_ratio<'a, I>(results: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a MetricResult>,
{
    let ratios: Vec<f64> = results.into_iter().filter_map(|r| r.ratio).collect();
    mean(&ratios)
}

/// Presentation order: highest ratio first, undefined ratios last, ties by
/// work order ascending.
pub fn presentation_order(a: &MetricResult, b: &MetricResult) -> Ordering {
    match (a.ratio, b.ratio) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.work_order.cmp(&b.work_order))
}

pub fn sort_for_presentation(results: &mut [MetricResult]) {
    results.sort_by(presentation_order);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(id: &str) -> WorkOrderKey {
        WorkOrderKey::from_id(id)
    }

    fn result(id: &str, ratio: Option<f64>) -> MetricResult {
        MetricResult {
            work_order: key(id),
            output_quantity: 1.0,
            hours: ratio.unwrap_or(0.0),
            ratio,
        }
    }

    #[test]
    fn missing_hours_give_zero_ratio_not_null() {
        let output = BTreeMap::from([(key("OS1"), 30.0)]);
        let got = compute_metrics(&output, &BTreeMap::new());
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].hours, 0.0);
        assert_eq!(got[0].ratio, Some(0.0));
    }

    #[test]
    fn zero_output_gives_null_ratio() {
        let hours = BTreeMap::from([(key("OS9"), 12.0)]);
        let got = compute_metrics(&BTreeMap::new(), &hours);
        assert_eq!(got[0].output_quantity, 0.0);
        assert_eq!(got[0].hours, 12.0);
        assert_eq!(got[0].ratio, None);
    }

    #[test]
    fn union_of_keys_in_key_order() {
        let output = BTreeMap::from([(key("B"), 10.0), (WorkOrderKey::Unassigned, 4.0)]);
        let hours = BTreeMap::from([(key("A"), 1.0), (key("B"), 5.0)]);
        let got = compute_metrics(&output, &hours);
        let ids: Vec<String> = got.iter().map(|r| r.work_order.to_string()).collect();
        assert_eq!(ids, vec!["A", "B", "(unassigned)"]);
        assert_eq!(got[1].ratio, Some(0.5));
        assert_eq!(got[2].ratio, Some(0.0));
    }

    #[test]
    fn extreme_values_never_produce_infinity() {
        assert_eq!(ratio(1e308, 1e-10), Some(f64::MAX));
        let big = |id: &str| MetricResult {
            work_order: key(id),
            output_quantity: f64::MAX,
            hours: f64::MAX,
            ratio: Some(1.0),
        };
        let g = compute_global(&[big("P")], &[big("S")]);
        assert_eq!(g.total_output, f64::MAX);
        assert_eq!(g.total_hours, f64::MAX);
        assert_eq!(g.global_ratio, Some(1.0));
    }

    #[test]
    fn global_of_nothing_is_undefined() {
        let g = compute_global(&[], &[]);
        assert_eq!(g.total_hours, 0.0);
        assert_eq!(g.total_output, 0.0);
        assert_eq!(g.global_ratio, None);
    }

    #[test]
    fn global_is_weighted_not_averaged() {
        let painting = vec![MetricResult {
            work_order: key("P"),
            output_quantity: 100.0,
            hours: 10.0,
            ratio: Some(0.1),
        }];
        let scaffolding = vec![MetricResult {
            work_order: key("S"),
            output_quantity: 1.0,
            hours: 1.0,
            ratio: Some(1.0),
        }];
        let g = compute_global(&painting, &scaffolding);
        assert_eq!(g.total_hours, 11.0);
        assert_eq!(g.total_output, 101.0);
        assert!((g.global_ratio.unwrap() - 11.0 / 101.0).abs() < 1e-9);
        let m = mean_ratio(painting.iter().chain(&scaffolding)).unwrap();
        assert!((m - 0.55).abs() < 1e-9);
    }

    #[test]
    fn mean_ratio_skips_undefined() {
        let rs = vec![result("A", Some(0.2)), result("B", None), result("C", Some(0.4))];
        assert!((mean_ratio(&rs).unwrap() - 0.3).abs() < 1e-9);
        assert_eq!(mean_ratio(&[result("B", None)]), None);
    }

    #[test]
    fn presentation_sort() {
        let mut rs = vec![result("A", Some(0.5)), result("B", None), result("C", Some(0.8))];
        sort_for_presentation(&mut rs);
        let ids: Vec<String> = rs.iter().map(|r| r.work_order.to_string()).collect();
        assert_eq!(ids, vec!["C", "A", "B"]);
    }

    #[test]
    fn presentation_sort_ties_by_work_order() {
        let mut rs = vec![
            result("Z", None),
            result("B", Some(0.5)),
            result("A", Some(0.5)),
            result("", None),
            result("M", None),
        ];
        sort_for_presentation(&mut rs);
        let ids: Vec<String> = rs.iter().map(|r| r.work_order.to_string()).collect();
        assert_eq!(ids, vec!["A", "B", "M", "Z", "(unassigned)"]);
    }
}
