//! Creature sheet conversion.
//!
//! Every row becomes a [`Creature`] stored in a [`CreatureSet`] keyed by the
//! row's species name. Variant, evolution and filter data are resolved
//! afterwards by looking names up in that set.

pub mod columns;
pub mod evolve;
pub mod filter;
pub mod record;
pub mod variants;

pub use columns::{default_header, CreatureColumns};
pub use evolve::{collect_evolve_data, EvolveEntry};
pub use filter::{collect_filter_data, FilterEntry, IndexOrder};
pub use record::CreatureRecord;
pub use variants::{collect_variant_data, VariantData, VariantEntry, VariantMap};

use crate::error::{ConvertError, Result};
use crate::normalize::clean_dict;
use crate::overrides::{OverrideStore, OverrideTable};
use crate::serialization::JsonWriter;
use crate::table::{read_table, Header, Row};
use indexmap::IndexMap;
use serde_json::Value;
use std::path::Path;

/// Output folder for per-creature files, below the output root.
pub const POKEMON_DIR: &str = "pokemon";

/// One creature and the row it was built from.
#[derive(Debug, Clone)]
pub struct Creature {
    /// Current name. Differs from the set key once a variant group renames it.
    pub name: String,
    pub row: Row,
    pub record: CreatureRecord,
    /// False for non-default variants, which are left out of every output
    pub valid: bool,
    pub variant_data: Option<VariantData>,
}

impl Creature {
    /// Build a creature from a row, applying its override.
    ///
    /// Returns `None` for rows without a name.
    pub fn from_row(row: Row, columns: &CreatureColumns, overrides: &OverrideTable) -> Result<Option<Self>> {
        let name = record::species_name(row.cell(columns.name));
        if name.trim().is_empty() {
            return Ok(None);
        }

        let mut record = CreatureRecord::from_row(&name, &row, columns);
        if let Some(overlay) = overrides.get(&name) {
            record.apply_override(&name, overlay)?;
        }
        record.cleanup();

        Ok(Some(Self {
            name,
            row,
            record,
            valid: true,
            variant_data: None,
        }))
    }

    /// The JSON written to the creature's own file.
    pub fn to_output_value(&self) -> Result<Value> {
        let mut map = self.record.to_map(&self.name)?;

        if let Some(variant_data) = &self.variant_data {
            let value = serde_json::to_value(variant_data).map_err(|source| ConvertError::Serialize {
                name: self.name.clone(),
                source,
            })?;
            map.insert("variant_data".to_string(), value);
        }

        Ok(clean_dict(&Value::Object(map)))
    }
}

/// Creatures keyed by species name, in sheet order.
#[derive(Debug, Clone, Default)]
pub struct CreatureSet {
    creatures: IndexMap<String, Creature>,
}

impl CreatureSet {
    /// Add a creature under its current name. A creature already stored
    /// under that name is replaced in place.
    pub fn insert(&mut self, creature: Creature) -> Option<Creature> {
        self.creatures.insert(creature.name.clone(), creature)
    }

    pub fn get(&self, key: &str) -> Option<&Creature> {
        self.creatures.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Creature> {
        self.creatures.get_mut(key)
    }

    /// Creatures that appear in the outputs.
    pub fn valid(&self) -> impl Iterator<Item = &Creature> {
        self.creatures.values().filter(|creature| creature.valid)
    }

    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }
}

/// Build every creature of the sheet.
pub fn build_creatures(rows: Vec<Row>, columns: &CreatureColumns, overrides: &OverrideTable) -> Result<CreatureSet> {
    let mut set = CreatureSet::default();

    for (line, row) in rows.into_iter().enumerate() {
        match Creature::from_row(row, columns, overrides)? {
            Some(creature) => {
                if set.insert(creature).is_some() {
                    tracing::debug!("Row {} replaces an earlier row of the same name", line + 2);
                }
            }
            None => tracing::debug!("Skipping row {} without a name", line + 2),
        }
    }

    Ok(set)
}

/// Everything the creature sheet produces.
#[derive(Debug, Clone)]
pub struct CreatureOutput {
    /// Current name -> per-creature JSON, valid creatures only
    pub records: IndexMap<String, Value>,
    pub evolve: IndexMap<String, Value>,
    pub filter: IndexMap<String, Value>,
    pub index_order: IndexOrder,
    /// Present when variant resolution ran
    pub variant_map: Option<VariantMap>,
}

/// Run the whole creature pipeline over already-read rows.
///
/// # Arguments
/// * `rows` - Data rows of the sheet, header line excluded
/// * `header` - Column layout of the rows
/// * `overrides` - Hand-authored data sets
/// * `variants` - Whether to collapse variant groups
///
/// # Errors
/// Fails on a missing column, an override that doesn't fit the record
/// shape, or a broken variant group.
pub fn transform(rows: Vec<Row>, header: &Header, overrides: &OverrideStore, variants: bool) -> Result<CreatureOutput> {
    let columns = CreatureColumns::resolve(header)?;
    let mut creatures = build_creatures(rows, &columns, &overrides.creatures)?;

    let variant_map = if variants {
        Some(collect_variant_data(&mut creatures, &overrides.variant_groups)?)
    } else {
        None
    };

    let mut records = IndexMap::new();
    for creature in creatures.valid() {
        records.insert(creature.name.clone(), creature.to_output_value()?);
    }

    let evolve = collect_evolve_data(&creatures, &columns, &overrides.evolve)?;
    let (filter, index_order) = collect_filter_data(&creatures, &columns, &overrides.filter)?;

    Ok(CreatureOutput {
        records,
        evolve,
        filter,
        index_order,
        variant_map,
    })
}

/// Convert the creature sheet at `path` and write its outputs.
///
/// The sheet's own header line is ignored in favour of the canonical
/// creature header. Returns the number of creature files written.
pub fn convert_pdata(path: &Path, overrides: &OverrideStore, writer: &JsonWriter, variants: bool) -> Result<usize> {
    let table = read_table(path)?;
    tracing::debug!("Read {} creature rows from {}", table.rows.len(), path.display());

    let output = transform(table.rows, &default_header(), overrides, variants)?;

    for (name, value) in &output.records {
        writer.write_record(POKEMON_DIR, name, value)?;
    }

    if let Some(variant_map) = &output.variant_map {
        writer.write_aggregate("variant_map.json", variant_map)?;
    }
    writer.write_aggregate("evolve.json", &output.evolve)?;
    writer.write_aggregate("filter_data.json", &output.filter)?;
    writer.write_aggregate("index_order.json", &output.index_order)?;

    Ok(output.records.len())
}
