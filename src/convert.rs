//! Conversion driver: finds the known sheets in a data folder and runs the
//! matching pipeline for each.

use crate::config::ConverterConfig;
use crate::datasets::{convert_idata, convert_mdata, convert_tdata};
use crate::error::{ConvertError, Result};
use crate::overrides::OverrideStore;
use crate::pokemon::convert_pdata;
use crate::serialization::JsonWriter;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// The sheets the converter knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataSheet {
    Items,
    Moves,
    Pokemon,
    Abilities,
}

impl DataSheet {
    /// Sheet for a downloaded file name, e.g. `PDATA.csv`.
    pub fn from_file_name(name: &str) -> Option<Self> {
        match name {
            "IDATA.csv" => Some(Self::Items),
            "MDATA.csv" => Some(Self::Moves),
            "PDATA.csv" => Some(Self::Pokemon),
            "TDATA.csv" => Some(Self::Abilities),
            _ => None,
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Items => "IDATA.csv",
            Self::Moves => "MDATA.csv",
            Self::Pokemon => "PDATA.csv",
            Self::Abilities => "TDATA.csv",
        }
    }
}

impl fmt::Display for DataSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Items => "items",
            Self::Moves => "moves",
            Self::Pokemon => "pokemon",
            Self::Abilities => "abilities",
        };
        write!(f, "{}", name)
    }
}

/// Result of one sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetOutcome {
    /// Number of records written
    Converted(usize),
    /// The sheet could not be read; nothing was written for it
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetReport {
    pub sheet: DataSheet,
    pub path: PathBuf,
    pub outcome: DatasetOutcome,
}

/// What a run converted, sheet by sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionSummary {
    pub reports: Vec<DatasetReport>,
}

impl ConversionSummary {
    pub fn has_failures(&self) -> bool {
        self.reports
            .iter()
            .any(|report| matches!(report.outcome, DatasetOutcome::Failed(_)))
    }

    /// Outcome of `sheet`, if the run saw it.
    pub fn outcome(&self, sheet: DataSheet) -> Option<&DatasetOutcome> {
        self.reports
            .iter()
            .find(|report| report.sheet == sheet)
            .map(|report| &report.outcome)
    }
}

/// Convert one sheet.
pub fn convert_sheet(
    sheet: DataSheet,
    path: &Path,
    config: &ConverterConfig,
    overrides: &OverrideStore,
    writer: &JsonWriter,
) -> Result<usize> {
    match sheet {
        DataSheet::Items => convert_idata(path, writer),
        DataSheet::Moves => convert_mdata(path, &overrides.moves, writer),
        DataSheet::Pokemon => convert_pdata(path, overrides, writer, config.variants),
        DataSheet::Abilities => convert_tdata(path, &overrides.abilities, writer),
    }
}

/// Convert every known sheet found in `folder`.
///
/// Files are visited in name order and unknown files are ignored. A sheet
/// that can't be read is logged and recorded in the summary; any other
/// error stops the run.
///
/// # Errors
/// [`ConvertError::DataFolderMissing`] when `folder` doesn't exist, or the
/// first fatal error of a sheet.
pub fn convert_all(folder: &Path, config: &ConverterConfig, overrides: &OverrideStore) -> Result<ConversionSummary> {
    if !folder.is_dir() {
        return Err(ConvertError::DataFolderMissing(folder.to_path_buf()));
    }

    let list_error = |source| ConvertError::InputIo {
        path: folder.to_path_buf(),
        source,
    };
    let mut paths = fs::read_dir(folder)
        .map_err(list_error)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(list_error)?;
    paths.sort();

    let writer = JsonWriter::new(&config.paths.output);
    let mut summary = ConversionSummary::default();

    for path in paths {
        let Some(sheet) = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(DataSheet::from_file_name)
        else {
            tracing::debug!("Ignoring {}", path.display());
            continue;
        };

        tracing::info!("Converting {} from {}", sheet, path.display());
        let outcome = match convert_sheet(sheet, &path, config, overrides, &writer) {
            Ok(count) => {
                tracing::info!("Finished {}: {} records", sheet, count);
                DatasetOutcome::Converted(count)
            }
            Err(e) if e.is_dataset_scoped() => {
                tracing::error!("Skipping {}: {}", sheet, e);
                DatasetOutcome::Failed(e.to_string())
            }
            Err(e) => return Err(e),
        };

        summary.reports.push(DatasetReport {
            sheet,
            path,
            outcome,
        });
    }

    Ok(summary)
}
