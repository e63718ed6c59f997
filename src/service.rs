// In: src/service.rs

//! The request-facing facade: filename and optional limit in, rows or JSON out.
//!
//! Data flow for one request:
//!
//!   filename --StorageLocator--> path --decoder::open_path--> ColumnarDecoder
//!       --SegmentIter + transposer::materialize--> Vec<RowRecord> --encoder--> text
//!
//! Transport concerns (routing, status codes) stay with the caller; `RowsError::kind`
//! gives it what it needs to pick a response.

use std::path::Path;
use std::time::Instant;

use crate::config::ReaderConfig;
use crate::decoder::{self, ColumnarDecoder, DecodeOptions, SegmentIter};
use crate::encoder;
use crate::error::RowsError;
use crate::locator::StorageLocator;
use crate::transposer::{self, DEFAULT_ROW_LIMIT};
use crate::types::{RowRecord, Schema};

/// Materializes at most `limit` rows (default 1000) from an already opened decoder.
pub fn rows_from_decoder(
    decoder: &mut dyn ColumnarDecoder,
    limit: Option<usize>,
) -> Result<Vec<RowRecord>, RowsError> {
    let schema = decoder.schema().clone();
    let limit = limit.unwrap_or(DEFAULT_ROW_LIMIT);
    transposer::materialize(&schema, SegmentIter::new(decoder, limit), limit)
}

#[derive(Debug, Clone)]
pub struct RowService {
    config: ReaderConfig,
    locator: StorageLocator,
}

impl RowService {
    pub fn new(config: ReaderConfig) -> Self {
        let locator = StorageLocator::new(config.data_root.clone());
        Self { config, locator }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    fn open(&self, filename: &str) -> Result<Box<dyn ColumnarDecoder>, RowsError> {
        let path = self.locator.resolve(filename)?;
        self.open_path(&path)
    }

    /// Opens a file by path, bypassing the locator.
    pub fn open_path(&self, path: &Path) -> Result<Box<dyn ColumnarDecoder>, RowsError> {
        decoder::open_path(path, DecodeOptions::from(&self.config))
    }

    /// Reports the schema of `filename` without decoding any segment.
    pub fn read_schema(&self, filename: &str) -> Result<Schema, RowsError> {
        Ok(self.open(filename)?.schema().clone())
    }

    /// Reads up to `limit` rows (or the configured default) from `filename`.
    pub fn read_rows(
        &self,
        filename: &str,
        limit: Option<usize>,
    ) -> Result<Vec<RowRecord>, RowsError> {
        let start = Instant::now();
        let mut decoder = self.open(filename)?;
        let limit = limit.unwrap_or(self.config.default_limit);
        let rows = rows_from_decoder(decoder.as_mut(), Some(limit))?;
        log::info!(
            "read {} rows (limit {}) from '{}' in {:.2?}",
            rows.len(),
            limit,
            filename,
            start.elapsed()
        );
        Ok(rows)
    }

    /// Reads rows from `filename` and renders them with the configured encoding.
    pub fn read_json(&self, filename: &str, limit: Option<usize>) -> Result<String, RowsError> {
        let rows = self.read_rows(filename, limit)?;
        encoder::encode_rows(&rows, self.config.output)
    }
}
