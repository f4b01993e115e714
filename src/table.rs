//! CSV sheet reading.
//!
//! Sheets are comma-delimited, double-quote quoted UTF-8 files whose first
//! line is a header. Rows are kept as plain cell vectors and addressed by
//! column position through a [`Header`].

use crate::error::{ConvertError, Result};
use std::path::Path;

/// Ordered column names of a sheet.
///
/// Names may be blank or repeated; lookups return the first match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    names: Vec<String>,
}

impl Header {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Position of the first column called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|column| column == name)
    }

    /// Like [`Header::position`], but a missing column is an error.
    pub fn require(&self, name: &str) -> Result<usize> {
        self.position(name)
            .ok_or_else(|| ConvertError::MissingColumn(name.to_string()))
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One line of a sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<String>,
}

impl Row {
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
        }
    }

    /// Cell at `column`, or `""` past the end of a short row.
    pub fn cell(&self, column: usize) -> &str {
        self.cells.get(column).map_or("", String::as_str)
    }

    /// True when every cell is blank.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|cell| cell.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A sheet read fully into memory.
#[derive(Debug, Clone)]
pub struct Table {
    /// The file's own header line
    pub header: Header,
    /// Data rows, blank rows removed
    pub rows: Vec<Row>,
}

/// Read a sheet from disk.
///
/// # Errors
/// Returns [`ConvertError::InputIo`] when the file cannot be opened and
/// [`ConvertError::Csv`] when a record is malformed.
pub fn read_table(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).map_err(|source| ConvertError::InputIo {
        path: path.to_path_buf(),
        source,
    })?;
    read_table_from(file, path)
}

/// Read a sheet from any reader. `path` is only used in error messages.
pub fn read_table_from<R: std::io::Read>(reader: R, path: &Path) -> Result<Table> {
    let csv_error = |source| ConvertError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .quote(b'"')
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let header = Header::new(reader.headers().map_err(csv_error)?.iter());

    let mut rows = Vec::new();
    for record in reader.records() {
        let row = Row::new(record.map_err(csv_error)?.iter());
        if !row.is_blank() {
            rows.push(row);
        }
    }

    Ok(Table { header, rows })
}
