//! JSON output.
//!
//! Files are pretty-printed with two-space indentation and keep non-ASCII
//! characters as they are. Object keys of [`serde_json::Value`] are sorted;
//! aggregate files built from `IndexMap`s keep insertion order.

use crate::error::{ConvertError, Result};
use serde::Serialize;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Turn a display name into a file stem.
///
/// Gender symbols become `-f`/`-m` suffixes and line breaks become spaces.
/// Colons are dropped, and accented letters lose their combining marks
/// after canonical decomposition.
///
/// # Example
///
/// ```
/// use pokedata::serialization::clean_file_name;
///
/// assert_eq!(clean_file_name("Nidoran ♀"), "Nidoran-f");
/// assert_eq!(clean_file_name("Flabébé"), "Flabebe");
/// assert_eq!(clean_file_name("Type: Null"), "Type Null");
/// ```
pub fn clean_file_name(name: &str) -> String {
    let name = name
        .replace(" ♀", "-f")
        .replace(" ♂", "-m")
        .replace("\r\n", " ")
        .replace('\n', " ")
        .replace(':', "");

    name.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Writes JSON files below an output root.
#[derive(Debug, Clone)]
pub struct JsonWriter {
    root: PathBuf,
}

impl JsonWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `<root>/<file_name>`, creating the root if needed.
    pub fn write_aggregate<T: Serialize>(&self, file_name: &str, value: &T) -> Result<PathBuf> {
        let path = self.root.join(file_name);
        write_json_pretty(&path, value)?;
        Ok(path)
    }

    /// Write `<root>/<dir>/<clean name>.json` for a single record.
    pub fn write_record<T: Serialize>(&self, dir: &str, name: &str, value: &T) -> Result<PathBuf> {
        let path = self
            .root
            .join(dir)
            .join(format!("{}.json", clean_file_name(name)));
        write_json_pretty(&path, value)?;
        Ok(path)
    }
}

/// Serialize `value` as pretty JSON into `path`, creating parent folders.
pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let io_error = |source| ConvertError::OutputIo {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }

    let file = fs::File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| ConvertError::Serialize {
        name: path.display().to_string(),
        source,
    })?;
    writer.flush().map_err(io_error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_clean_file_name() {
        assert_eq!(clean_file_name("Nidoran ♂"), "Nidoran-m");
        assert_eq!(clean_file_name("Mr.\nMime"), "Mr. Mime");
        assert_eq!(clean_file_name("Type: Null"), "Type Null");
        assert_eq!(clean_file_name("Pokémon"), "Pokemon");
        assert_eq!(clean_file_name("Bulbasaur"), "Bulbasaur");
        assert_eq!(clean_file_name("Ōkami"), "Okami");
        assert_eq!(clean_file_name("Ýveltal"), "Yveltal");
        assert_eq!(clean_file_name("Şahin Ćelik"), "Sahin Celik");
        assert!(clean_file_name("Flabébé Ōkami Ýveltal").is_ascii());
    }

    #[test]
    fn test_write_record_sorted_keys_unescaped() {
        let dir = TempDir::new().unwrap();
        let writer = JsonWriter::new(dir.path());

        let path = writer
            .write_record("pokemon", "Flabébé", &json!({"size": "Tiny", "Abilities": ["Flower Veil"], "name": "Flabébé"}))
            .unwrap();

        assert_eq!(path, dir.path().join("pokemon").join("Flabebe.json"));
        let written = fs::read_to_string(path).unwrap();
        assert!(written.contains("Flabébé"));
        let abilities = written.find("\"Abilities\"").unwrap();
        let size = written.find("\"size\"").unwrap();
        assert!(abilities < size);
        assert!(written.contains("\n  \"Abilities\": [\n    \"Flower Veil\"\n  ],"));
    }

    #[test]
    fn test_write_aggregate_keeps_insertion_order() {
        let dir = TempDir::new().unwrap();
        let writer = JsonWriter::new(dir.path().join("nested"));

        let mut order: IndexMap<String, Vec<String>> = IndexMap::new();
        order.insert("Zubat".to_string(), vec![]);
        order.insert("Abra".to_string(), vec![]);
        writer.write_aggregate("order.json", &order).unwrap();

        let written = fs::read_to_string(dir.path().join("nested").join("order.json")).unwrap();
        assert!(written.find("Zubat").unwrap() < written.find("Abra").unwrap());
    }
}
