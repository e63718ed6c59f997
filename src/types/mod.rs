//! This module defines the core, strongly-typed data representations used
//! throughout the materializer.
//!
//! It includes the canonical `FieldType` enum, the `Schema` a decoder reports,
//! the per-cell `CellValue` tagged union and the `RowRecord` handed to encoders.

pub mod field_type;
pub mod record;
pub mod schema;
pub mod value;

// Re-export the main types for easier access.
pub use field_type::FieldType;
pub use record::RowRecord;
pub use schema::{FieldDef, Schema};
pub use value::CellValue;
