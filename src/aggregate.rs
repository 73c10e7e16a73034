// Grouping and summation of canonical records per work order.
use crate::types::WorkOrderKey;
use crate::util::saturate;
use std::collections::BTreeMap;

/// Sum `value_fn` over `records`, grouped by `key_fn`.
///
/// Values are summed per group in sorted order, so the result does not
/// depend on the order the records arrive in. Group sums saturate at
/// `f64::MAX` rather than overflowing to infinity.
pub fn sum_by<R, K, F, V>(records: &[R], key_fn: F, value_fn: V) -> BTreeMap<K, f64>
where
    K: Ord,
    F: Fn(&R) -> K,
    V: Fn(&R) -> f64,
{
    records
        .iter()
        .fold(BTreeMap::<K, Vec<f64>>::new(), |mut groups, r| {
            groups.entry(key_fn(r)).or_default().push(value_fn(r));
            groups
        })
        .into_iter()
        .map(|(k, mut values)| {
            values.sort_by(f64::total_cmp);
            (k, saturate(values.iter().sum::<f64>()))
        })
        .collect()
}

/// Sum per work order. Blank ids all land in [`WorkOrderKey::Unassigned`].
pub fn aggregate<R, F, V>(records: &[R], key_fn: F, value_fn: V) -> BTreeMap<WorkOrderKey, f64>
where
    F: Fn(&R) -> &str,
    V: Fn(&R) -> f64,
{
    sum_by(records, |r| WorkOrderKey::from_id(key_fn(r)), value_fn)
}

/// Output and hours per work order for one domain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkOrderTotals {
    entries: BTreeMap<WorkOrderKey, (f64, f64)>,
}

impl WorkOrderTotals {
    /// Union of both key sets; the side a work order is missing from is 0.
    pub fn join(output: &BTreeMap<WorkOrderKey, f64>, hours: &BTreeMap<WorkOrderKey, f64>) -> Self {
        let mut entries: BTreeMap<WorkOrderKey, (f64, f64)> = output
            .iter()
            .map(|(k, v)| (k.clone(), (*v, 0.0)))
            .collect();
        for (k, h) in hours {
            entries.entry(k.clone()).or_insert((0.0, 0.0)).1 = *h;
        }
        Self { entries }
    }

    /// `(work order, (output, hours))` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&WorkOrderKey, (f64, f64))> {
        self.entries.iter().map(|(k, v)| (k, *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
