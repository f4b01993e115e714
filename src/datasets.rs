//! Keyed sheets: moves, items and abilities.
//!
//! These sheets are converted generically. The file's own header names the
//! fields, the first column is the record key, and every cell is read as a
//! string. Integral-looking cells stay strings.

use crate::error::Result;
use crate::merge::merge;
use crate::normalize::{clean_dict, ensure_string};
use crate::overrides::OverrideTable;
use crate::serialization::JsonWriter;
use crate::table::{read_table, Table};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::path::Path;

/// Output folder for per-move files, below the output root.
pub const MOVES_DIR: &str = "moves";

/// Records of one keyed sheet, in sheet order.
pub type KeyedRecords = IndexMap<String, Value>;

/// Build one record per row keyed by the first cell.
///
/// Rows with an empty key are skipped. A repeated key replaces the earlier
/// record in place. Blank-named columns are ignored.
pub fn keyed_records(table: &Table, overrides: Option<&OverrideTable>) -> KeyedRecords {
    let mut records = KeyedRecords::new();

    for row in &table.rows {
        let Some(key) = ensure_string(row.cell(0)) else {
            tracing::debug!("Skipping row without a key");
            continue;
        };

        let mut record: Map<String, Value> = table
            .header
            .names()
            .iter()
            .enumerate()
            .filter(|(_, field)| !field.trim().is_empty())
            .filter_map(|(column, field)| {
                ensure_string(row.cell(column)).map(|value| (field.clone(), Value::String(value)))
            })
            .collect();

        if let Some(overlay) = overrides.and_then(|overrides| overrides.get(&key)) {
            merge(&mut record, overlay);
        }

        records.insert(key, clean_dict(&Value::Object(record)));
    }

    records
}

/// Convert the moves sheet into one file per move.
pub fn convert_mdata(path: &Path, overrides: &OverrideTable, writer: &JsonWriter) -> Result<usize> {
    let records = read_keyed(path, Some(overrides))?;
    for (name, record) in &records {
        writer.write_record(MOVES_DIR, name, record)?;
    }
    Ok(records.len())
}

/// Convert the items sheet into `items.json`.
pub fn convert_idata(path: &Path, writer: &JsonWriter) -> Result<usize> {
    let records = read_keyed(path, None)?;
    writer.write_aggregate("items.json", &records)?;
    Ok(records.len())
}

/// Convert the abilities sheet into `abilities.json`.
pub fn convert_tdata(path: &Path, overrides: &OverrideTable, writer: &JsonWriter) -> Result<usize> {
    let records = read_keyed(path, Some(overrides))?;
    writer.write_aggregate("abilities.json", &records)?;
    Ok(records.len())
}

fn read_keyed(path: &Path, overrides: Option<&OverrideTable>) -> Result<KeyedRecords> {
    let table = read_table(path)?;
    tracing::debug!("Read {} rows from {}", table.rows.len(), path.display());
    Ok(keyed_records(&table, overrides))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::read_table_from;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn table(csv: &str) -> Table {
        read_table_from(csv.as_bytes(), Path::new("test.csv")).unwrap()
    }

    #[test]
    fn test_keyed_records() {
        let table = table(
            "Name,Type,Power,,Notes\n\
             Tackle,Normal,40,x,None\n\
             ,Normal,10,,\n\
             Ember,Fire,\"40\",,\"Burns\"\n",
        );

        let records = keyed_records(&table, None);

        assert_eq!(records.len(), 2);
        assert_eq!(
            records["Tackle"],
            json!({"Name": "Tackle", "Type": "Normal", "Power": "40"})
        );
        assert_eq!(records["Ember"]["Notes"], json!("Burns"));
        assert_eq!(records.keys().collect::<Vec<_>>(), vec!["Tackle", "Ember"]);
    }

    #[test]
    fn test_keyed_records_override() {
        let table = table("Name,Type,Power\nSurf,Water,90\n");
        let mut overrides = OverrideTable::default();
        overrides.insert(
            "Surf",
            json!({"Power": "95", "Type": null, "Range": "Line"}).as_object().unwrap().clone(),
        );

        let records = keyed_records(&table, Some(&overrides));
        assert_eq!(
            records["Surf"],
            json!({"Name": "Surf", "Power": "95", "Range": "Line"})
        );
    }

    #[test]
    fn test_convert_mdata_writes_one_file_per_move() {
        let dir = TempDir::new().unwrap();
        let csv = dir.path().join("MDATA.csv");
        fs::write(&csv, "Name,Type\nTackle,Normal\nFlabébé Dance,Fairy\n").unwrap();
        let writer = JsonWriter::new(dir.path().join("out"));

        let count = convert_mdata(&csv, &OverrideTable::default(), &writer).unwrap();

        assert_eq!(count, 2);
        assert!(dir.path().join("out/moves/Tackle.json").exists());
        assert!(dir.path().join("out/moves/Flabebe Dance.json").exists());
    }

    #[test]
    fn test_convert_idata_aggregate() {
        let dir = TempDir::new().unwrap();
        let csv = dir.path().join("IDATA.csv");
        fs::write(&csv, "Item,Cost\nPotion,200\nEther,\n").unwrap();
        let writer = JsonWriter::new(dir.path());

        convert_idata(&csv, &writer).unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(dir.path().join("items.json")).unwrap()).unwrap();
        assert_eq!(
            written,
            json!({"Potion": {"Item": "Potion", "Cost": "200"}, "Ether": {"Item": "Ether"}})
        );
    }

    #[test]
    fn test_missing_sheet_is_dataset_scoped() {
        let dir = TempDir::new().unwrap();
        let writer = JsonWriter::new(dir.path());

        let err = convert_tdata(&dir.path().join("TDATA.csv"), &OverrideTable::default(), &writer).unwrap_err();
        assert!(err.is_dataset_scoped());
    }
}
