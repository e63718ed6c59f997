//! This file is the root of the `parquet_rows` crate.
//!
//! `parquet_rows` reads column-major, row-group partitioned files (Parquet, Arrow
//! IPC) and materializes a bounded sequence of row-oriented records ready for a
//! JSON encoder. Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of the library.
//! 2.  Re-exporting the handful of types a caller needs.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
mod observability; // Make macros available throughout the crate

pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod locator;
pub mod segment;
pub mod service;
pub mod transposer;
pub mod types;

#[doc(hidden)]
pub use log as __log;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use config::{OutputEncoding, ReaderConfig};
pub use decoder::{ColumnarDecoder, DecodeOptions, IpcFileDecoder, ParquetDecoder, SegmentIter};
pub use error::{ErrorKind, RowsError};
pub use segment::Segment;
pub use service::RowService;
pub use transposer::{materialize, RowStream, DEFAULT_ROW_LIMIT};
pub use types::{CellValue, FieldDef, FieldType, RowRecord, Schema};
