use std::collections::BTreeMap;

use field_resolver::{resolve, resolve_text, value_as_f64, RawRecord};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Group label for rows where the grouping field did not resolve
pub const UNKNOWN_GROUP: &str = "Unknown";

/// Sum and row count for one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTotal {
    pub key: String,
    pub total: f64,
    pub count: usize,
}

/// Group items by a derived key.
pub fn group_by<T, K, F>(items: &[T], key: F) -> BTreeMap<K, Vec<&T>>
where
    K: Ord + std::hash::Hash + Eq,
    F: Fn(&T) -> K,
{
    items
        .iter()
        .into_group_map_by(|item| key(item))
        .into_iter()
        .collect()
}

/// Group rows by the value of an alias-resolved field.
pub fn group_records_by<'a>(rows: &'a [RawRecord], group_aliases: &[&str]) -> BTreeMap<String, Vec<&'a RawRecord>> {
    group_by(rows, |row| group_key(row, group_aliases))
}

/// Per-group sums of an alias-resolved numeric field.
///
/// Values that are missing or not numeric add zero but still count the row.
pub fn sum_by_group(rows: &[RawRecord], group_aliases: &[&str], sum_aliases: &[&str]) -> BTreeMap<String, GroupTotal> {
    let mut totals: BTreeMap<String, GroupTotal> = BTreeMap::new();
    for row in rows {
        let key = group_key(row, group_aliases);
        let value = resolve(row, sum_aliases).and_then(value_as_f64).unwrap_or(0.0);
        let entry = totals.entry(key.clone()).or_insert_with(|| GroupTotal {
            key,
            total: 0.0,
            count: 0,
        });
        entry.total += value;
        entry.count += 1;
    }
    totals
}

/// The `n` groups with the largest sums, largest first; equal sums order by
/// key.
pub fn top_n_by_sum(rows: &[RawRecord], group_aliases: &[&str], sum_aliases: &[&str], n: usize) -> Vec<GroupTotal> {
    sum_by_group(rows, group_aliases, sum_aliases)
        .into_values()
        .sorted_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.key.cmp(&b.key)))
        .take(n)
        .collect()
}

/// Arithmetic mean; `0` for no values.
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = values.len() as f64;
    values.iter().sum::<f64>() / count
}

fn group_key(row: &RawRecord, group_aliases: &[&str]) -> String {
    resolve_text(row, group_aliases).unwrap_or_else(|| UNKNOWN_GROUP.to_string())
}
