//! # pokedata: spreadsheet to JSON converter
//!
//! Converts the downloaded sheets of a tabletop creature-collection game
//! into the JSON files its companion app reads.
//!
//! ## Features
//!
//! - **Row normalization**: placeholder and empty cells become absent fields
//! - **Text extraction**: move lists and evolution conditions parsed from free text
//! - **Override merging**: hand-authored JSON deep-merged over derived records
//! - **Relationship resolution**: variant groups, evolution chains, filter and index data
//!
//! ## Example
//!
//! ```rust,no_run
//! use pokedata::{convert_all, ConverterConfig, OverrideStore};
//!
//! let config = ConverterConfig::default();
//! let overrides = OverrideStore::load(&config.paths.assets)?;
//! let summary = convert_all(&config.paths.data, &config, &overrides)?;
//! assert!(!summary.has_failures());
//! # Ok::<(), pokedata::ConvertError>(())
//! ```

// Leaf helpers
pub mod error;
pub mod normalize;
pub mod extraction;
pub mod merge;

// Inputs
pub mod table;
pub mod overrides;
pub mod config;

// Pipelines
pub mod pokemon;
pub mod datasets;
pub mod convert;

// Output
pub mod serialization;

// Re-export key types
pub use error::{ConvertError, Result};
pub use config::ConverterConfig;
pub use overrides::{OverrideStore, OverrideTable};
pub use convert::{convert_all, ConversionSummary, DataSheet, DatasetOutcome};
pub use serialization::JsonWriter;
