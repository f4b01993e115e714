//! Error type shared by every conversion stage.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while converting the data sheets.
///
/// Most variants abort the whole run. Input read failures only abort the
/// dataset being converted, see [`ConvertError::is_dataset_scoped`].
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Could not find data folder {0}")]
    DataFolderMissing(PathBuf),

    #[error("Failed to read {path}: {source}")]
    InputIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write {path}: {source}")]
    OutputIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read asset {path}: {source}")]
    AssetIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load config file {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("Invalid override data in {path}: {source}")]
    OverrideFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Override for '{name}' does not fit the record shape: {source}")]
    OverrideShape {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Header is missing required column '{0}'")]
    MissingColumn(String),

    #[error("Variant for species {group} is malformed: {reason}")]
    MalformedVariantGroup { group: String, reason: String },

    #[error("When searching for variants, could not find pokemon of species {name} (group {group})")]
    VariantNotFound { group: String, name: String },

    #[error("Cannot add more than 1 default variant (group {group}, species {name})")]
    DuplicateDefaultVariant { group: String, name: String },

    #[error("Must add a default variant before adding additional variants (group {group})")]
    MissingDefaultVariant { group: String },

    #[error("Failed to serialize '{name}': {source}")]
    Serialize {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ConvertError {
    /// Whether this error only invalidates the dataset being converted.
    ///
    /// Unreadable or unparseable input files abort their own sheet; the
    /// remaining sheets are still converted.
    pub fn is_dataset_scoped(&self) -> bool {
        matches!(self, Self::InputIo { .. } | Self::Csv { .. })
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_scoped_errors() {
        let io = ConvertError::InputIo {
            path: PathBuf::from("PDATA.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(io.is_dataset_scoped());

        let duplicate = ConvertError::DuplicateDefaultVariant {
            group: "Rotom".to_string(),
            name: "Rotom (Heat)".to_string(),
        };
        assert!(!duplicate.is_dataset_scoped());
        assert!(duplicate.to_string().contains("Cannot add more than 1 default variant"));
    }
}
