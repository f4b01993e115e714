//! Evolution chains.

use super::columns::CreatureColumns;
use super::CreatureSet;
use crate::error::{ConvertError, Result};
use crate::extraction::evolution_triggers;
use crate::merge::merge;
use crate::normalize::ensure_int;
use crate::overrides::OverrideTable;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// Derived evolution data of one creature.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvolveEntry {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub into: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_stage: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_stages: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(rename = "move", skip_serializing_if = "Option::is_none")]
    pub move_name: Option<String>,
}

impl EvolveEntry {
    /// Single-stage, no trigger and no target: nothing worth writing.
    pub fn is_trivial(&self) -> bool {
        self.current_stage == Some(1)
            && self.total_stages == Some(1)
            && self.into.is_empty()
            && self.points.is_none()
            && self.level.is_none()
            && self.move_name.is_none()
    }
}

/// Every valid creature other than `name` whose name appears space-delimited
/// in `text`, in record order.
///
/// Overlapping names all match; `"Mr. Mime"` in the text also matches a
/// creature called `"Mime"` when one exists.
pub fn evolution_targets(creatures: &CreatureSet, name: &str, text: &str) -> Vec<String> {
    creatures
        .valid()
        .filter(|other| other.name != name)
        .filter(|other| text.contains(&format!(" {} ", other.name)))
        .map(|other| other.name.clone())
        .collect()
}

/// Build the evolution entry of one creature from its row.
pub fn evolve_entry(creatures: &CreatureSet, name: &str, current_stage: &str, total_stages: &str, text: &str) -> EvolveEntry {
    let triggers = evolution_triggers(text);

    EvolveEntry {
        into: evolution_targets(creatures, name, text),
        current_stage: ensure_int(current_stage),
        total_stages: ensure_int(total_stages),
        points: triggers.points,
        level: triggers.level,
        move_name: triggers.move_name,
    }
}

/// Build `evolve.json`: creature name -> evolution entry, for every valid
/// creature with a non-trivial entry or an evolve override.
///
/// # Errors
/// Only fails if an entry can't be turned into JSON.
pub fn collect_evolve_data(
    creatures: &CreatureSet,
    columns: &CreatureColumns,
    overrides: &OverrideTable,
) -> Result<IndexMap<String, Value>> {
    let mut evolve = IndexMap::new();

    for creature in creatures.valid() {
        let entry = evolve_entry(
            creatures,
            &creature.name,
            creature.row.cell(columns.current_stage),
            creature.row.cell(columns.total_stages),
            creature.row.cell(columns.evolution_text),
        );

        let mut data = if entry.is_trivial() {
            None
        } else {
            Some(entry_map(&creature.name, &entry)?)
        };

        if let Some(overlay) = overrides.get(&creature.name) {
            merge(data.get_or_insert_with(Map::new), overlay);
        }

        if let Some(data) = data {
            evolve.insert(creature.name.clone(), Value::Object(data));
        }
    }

    tracing::debug!("Built {} evolution entries", evolve.len());
    Ok(evolve)
}

fn entry_map(name: &str, entry: &EvolveEntry) -> Result<Map<String, Value>> {
    match serde_json::to_value(entry) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Ok(Map::new()),
        Err(source) => Err(ConvertError::Serialize {
            name: name.to_string(),
            source,
        }),
    }
}
