//! Row shapes shared by aggregate (`GROUP BY`) queries.

use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::FromRow;

/// `(key, count)` pair from a `GROUP BY` aggregate.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CountByKey {
    pub key: String,
    pub count: i64,
}

/// Fold grouped counts into a map, relabelling each key with `label`.
/// Keys that relabel to the same string are summed.
pub fn counts_to_map<F>(rows: Vec<CountByKey>, label: F) -> BTreeMap<String, i64>
where
    F: Fn(&str) -> String,
{
    let mut map = BTreeMap::new();
    for row in rows {
        *map.entry(label(&row.key)).or_insert(0) += row.count;
    }
    map
}
