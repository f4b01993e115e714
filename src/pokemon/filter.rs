//! Filter and index projections used by the search UI.

use super::columns::CreatureColumns;
use super::CreatureSet;
use crate::error::{ConvertError, Result};
use crate::merge::merge;
use crate::normalize::{ensure_float, ensure_int, ensure_list};
use crate::overrides::OverrideTable;
use crate::table::Row;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Index number -> creature names sharing it, in record order.
pub type IndexOrder = IndexMap<i64, Vec<String>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
    #[serde(rename = "SR", skip_serializing_if = "Option::is_none")]
    pub sr: Option<f64>,
    #[serde(rename = "MIN LVL FD", skip_serializing_if = "Option::is_none")]
    pub min_level: Option<i64>,
}

impl FilterEntry {
    pub fn from_row(row: &Row, columns: &CreatureColumns) -> Self {
        Self {
            index: ensure_int(row.cell(columns.index)),
            types: ensure_list(row.cell(columns.types), '/'),
            sr: ensure_float(row.cell(columns.sr)),
            min_level: ensure_int(row.cell(columns.min_level)),
        }
    }
}

/// Build `filter_data.json` and `index_order.json` for the valid creatures.
///
/// Creatures with no index number get a filter entry but no index bucket.
pub fn collect_filter_data(
    creatures: &CreatureSet,
    columns: &CreatureColumns,
    overrides: &OverrideTable,
) -> Result<(IndexMap<String, Value>, IndexOrder)> {
    let mut filter = IndexMap::new();
    let mut index_order = IndexOrder::new();

    for creature in creatures.valid() {
        let entry = FilterEntry::from_row(&creature.row, columns);

        if let Some(index) = entry.index {
            index_order.entry(index).or_default().push(creature.name.clone());
        }

        let mut value = serde_json::to_value(&entry).map_err(|source| ConvertError::Serialize {
            name: creature.name.clone(),
            source,
        })?;
        if let (Value::Object(map), Some(overlay)) = (&mut value, overrides.get(&creature.name)) {
            merge(map, overlay);
        }

        filter.insert(creature.name.clone(), value);
    }

    Ok((filter, index_order))
}
