//! Hand-authored override data.
//!
//! The `assets/extra` folder holds one JSON object per data set, keyed by
//! record name. The [`OverrideStore`] loads all of them once at start-up and
//! is passed by reference to every stage that needs it.

use crate::error::{ConvertError, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

/// Override entries of one data set, keyed by record name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct OverrideTable {
    entries: IndexMap<String, Map<String, Value>>,
}

impl OverrideTable {
    pub fn get(&self, name: &str) -> Option<&Map<String, Value>> {
        self.entries.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: Map<String, Value>) {
        self.entries.insert(name.into(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Definition of a variant group from `variants.json`.
///
/// ```json
/// "Rotom": {
///   "create_mode": "choice",
///   "permanent": false,
///   "variants": [
///     {"name": "Rotom", "variant_name": "normal", "default": true},
///     {"name": "Rotom (Heat)", "variant_name": "heat", "species_display": "Heat Rotom"}
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VariantGroupDef {
    pub create_mode: String,
    pub permanent: bool,
    pub variants: Vec<VariantMemberDef>,
    #[serde(default)]
    pub sprite_suffix: Option<String>,
}

/// One member of a variant group.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VariantMemberDef {
    /// Name of the member's row in the creature sheet
    pub name: String,
    pub variant_name: String,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub species_display: Option<String>,
    #[serde(default)]
    pub original_name: Option<String>,
}

impl VariantMemberDef {
    /// Display name, falling back to the row name.
    pub fn display(&self) -> &str {
        self.species_display.as_deref().unwrap_or(&self.name)
    }

    /// Original species name, falling back to the row name.
    pub fn original(&self) -> &str {
        self.original_name.as_deref().unwrap_or(&self.name)
    }
}

/// All override data sets.
#[derive(Debug, Clone, Default)]
pub struct OverrideStore {
    pub creatures: OverrideTable,
    pub evolve: OverrideTable,
    pub filter: OverrideTable,
    pub moves: OverrideTable,
    pub abilities: OverrideTable,
    pub variant_groups: IndexMap<String, VariantGroupDef>,
}

impl OverrideStore {
    /// Load every data set from `<assets>/extra`.
    ///
    /// A missing file is an empty data set. Invalid JSON, a non-object
    /// entry or a malformed variant group is an error.
    pub fn load(assets: &Path) -> Result<Self> {
        let extra = assets.join("extra");

        Ok(Self {
            creatures: load_table(&extra, "pokemon")?,
            evolve: load_table(&extra, "evolve")?,
            filter: load_table(&extra, "filter_data")?,
            moves: load_table(&extra, "moves")?,
            abilities: load_table(&extra, "abilities")?,
            variant_groups: load_variant_groups(&extra)?,
        })
    }
}

fn read_json(dir: &Path, name: &str) -> Result<Option<Value>> {
    let path = dir.join(name).with_extension("json");
    if !path.exists() {
        tracing::warn!("Override file {} not found, using no overrides", path.display());
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|source| ConvertError::AssetIo {
        path: path.clone(),
        source,
    })?;
    let value = serde_json::from_str(&contents)
        .map_err(|source| ConvertError::OverrideFile { path, source })?;

    Ok(Some(value))
}

fn load_table(dir: &Path, name: &str) -> Result<OverrideTable> {
    let Some(value) = read_json(dir, name)? else {
        return Ok(OverrideTable::default());
    };

    let table: OverrideTable = serde_json::from_value(value).map_err(|source| ConvertError::OverrideFile {
        path: dir.join(name).with_extension("json"),
        source,
    })?;
    tracing::debug!("Loaded {} {} overrides", table.len(), name);

    Ok(table)
}

fn load_variant_groups(dir: &Path) -> Result<IndexMap<String, VariantGroupDef>> {
    let Some(value) = read_json(dir, "variants")? else {
        return Ok(IndexMap::new());
    };

    let raw: IndexMap<String, Value> = serde_json::from_value(value).map_err(|source| ConvertError::OverrideFile {
        path: dir.join("variants.json"),
        source,
    })?;

    raw.into_iter()
        .map(|(group, definition)| {
            let parsed = parse_variant_group(&group, definition)?;
            Ok((group, parsed))
        })
        .collect()
}

/// Validate and parse one variant group definition.
pub fn parse_variant_group(group: &str, definition: Value) -> Result<VariantGroupDef> {
    serde_json::from_value(definition).map_err(|e| ConvertError::MalformedVariantGroup {
        group: group.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_variant_group() {
        let group = parse_variant_group(
            "Rotom",
            json!({
                "create_mode": "choice",
                "permanent": false,
                "sprite_suffix": "-form",
                "variants": [
                    {"name": "Rotom", "variant_name": "normal", "default": true},
                    {"name": "Rotom (Heat)", "variant_name": "heat", "species_display": "Heat Rotom"}
                ]
            }),
        )
        .unwrap();

        assert_eq!(group.create_mode, "choice");
        assert!(!group.permanent);
        assert_eq!(group.sprite_suffix.as_deref(), Some("-form"));
        assert!(group.variants[0].default);
        assert_eq!(group.variants[1].display(), "Heat Rotom");
        assert_eq!(group.variants[1].original(), "Rotom (Heat)");
    }

    #[test]
    fn test_malformed_variant_groups() {
        let cases = [
            json!({"permanent": true, "variants": []}),
            json!({"create_mode": 3, "permanent": true, "variants": []}),
            json!({"create_mode": "choice", "permanent": "yes", "variants": []}),
            json!({"create_mode": "choice", "permanent": true, "variants": {}}),
            json!({"create_mode": "choice", "permanent": true, "variants": [{"name": "Rotom"}]}),
        ];

        for case in cases {
            let err = parse_variant_group("Rotom", case).unwrap_err();
            assert!(matches!(err, ConvertError::MalformedVariantGroup { ref group, .. } if group == "Rotom"));
        }
    }

    #[test]
    fn test_load_store() {
        let dir = TempDir::new().unwrap();
        let extra = dir.path().join("extra");
        fs::create_dir_all(&extra).unwrap();
        fs::write(extra.join("pokemon.json"), r#"{"Pikachu": {"SR": 2.0}}"#).unwrap();
        fs::write(extra.join("evolve.json"), r#"{"Eevee": {"into": ["Vaporeon"]}}"#).unwrap();

        let store = OverrideStore::load(dir.path()).unwrap();

        assert_eq!(store.creatures.get("Pikachu").unwrap()["SR"], json!(2.0));
        assert_eq!(store.evolve.len(), 1);
        assert!(store.filter.is_empty());
        assert!(store.variant_groups.is_empty());
    }

    #[test]
    fn test_load_rejects_non_object_entry() {
        let dir = TempDir::new().unwrap();
        let extra = dir.path().join("extra");
        fs::create_dir_all(&extra).unwrap();
        fs::write(extra.join("moves.json"), r#"{"Tackle": 5}"#).unwrap();

        let err = OverrideStore::load(dir.path()).unwrap_err();
        assert!(matches!(err, ConvertError::OverrideFile { .. }));
    }
}
