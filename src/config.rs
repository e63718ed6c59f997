// In: src/config.rs

//! The single source of truth for reader configuration.
//!
//! `ReaderConfig` is created once at the application boundary (the CLI, or an
//! embedding request layer), typically from a JSON file, and then handed to the
//! `RowService`. Every field has a serde default so a partial file is valid.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::RowsError;
use crate::transposer::DEFAULT_ROW_LIMIT;

/// How a materialized row sequence is rendered to text.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputEncoding {
    /// **Default:** a single indented JSON array.
    #[default]
    PrettyJson,
    /// A single JSON array without whitespace.
    CompactJson,
    /// One JSON object per line.
    JsonLines,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ReaderConfig {
    /// Row cap applied when a request does not carry one.
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Directory that request filenames are resolved against.
    #[serde(default = "default_data_root")]
    pub data_root: PathBuf,

    /// If true, untyped byte-array columns are decoded as UTF-8 strings.
    #[serde(default = "default_true")]
    pub treat_byte_array_as_string: bool,

    /// Rows per Arrow batch while decoding a row group. Must be non-zero.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default)]
    pub output: OutputEncoding,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            data_root: default_data_root(),
            treat_byte_array_as_string: true,
            batch_size: default_batch_size(),
            output: OutputEncoding::default(),
        }
    }
}

impl ReaderConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(text: &str) -> Result<Self, RowsError> {
        let config: ReaderConfig = serde_json::from_str(text)
            .map_err(|e| RowsError::Config(format!("invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RowsError> {
        let text = fs::read_to_string(path.as_ref()).map_err(|e| {
            RowsError::Config(format!("cannot read '{}': {}", path.as_ref().display(), e))
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), RowsError> {
        if self.batch_size == 0 {
            return Err(RowsError::Config("batch_size must be greater than zero".into()));
        }
        Ok(())
    }
}

fn default_limit() -> usize {
    DEFAULT_ROW_LIMIT
}

fn default_data_root() -> PathBuf {
    PathBuf::from("static_files")
}

/// Helper for `serde` to default a boolean field to true.
fn default_true() -> bool {
    true
}

fn default_batch_size() -> usize {
    8192
}
