//! This module defines the canonical, type-safe representation of the column
//! types a segment may carry.

use std::fmt;
use std::sync::Arc;

use arrow_schema::{DataType as ArrowDataType, TimeUnit};
use serde::{Deserialize, Serialize};

/// The declared type of a schema field.
///
/// This is a closed set: decoders translate their physical/logical types into one
/// of these variants up front, and anything else is rejected before any row is
/// materialized. Integer and float widths are kept distinct so a downstream
/// encoder never sees an implicit widening.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Null,
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Utf8,
    Binary,
    /// Days since the Unix epoch.
    Date32,
    /// Ticks of `TimeUnit` since the Unix epoch, with an optional zone name.
    Timestamp(TimeUnit, Option<Arc<str>>),
    /// 128-bit fixed-point decimal: precision, scale.
    Decimal128(u8, i8),
}

impl FieldType {
    /// Converts an Arrow `DataType` into a `FieldType`.
    ///
    /// Returns `None` for types the materializer cannot flatten into a scalar cell
    /// (lists, structs, maps, ...); callers attach the field name to the error.
    /// Dictionary columns are unpacked by the decoders before they get here.
    pub fn from_arrow_type(arrow_type: &ArrowDataType) -> Option<Self> {
        let field_type = match arrow_type {
            ArrowDataType::Null => Self::Null,
            ArrowDataType::Boolean => Self::Boolean,
            ArrowDataType::Int8 => Self::Int8,
            ArrowDataType::Int16 => Self::Int16,
            ArrowDataType::Int32 => Self::Int32,
            ArrowDataType::Int64 => Self::Int64,
            ArrowDataType::UInt8 => Self::UInt8,
            ArrowDataType::UInt16 => Self::UInt16,
            ArrowDataType::UInt32 => Self::UInt32,
            ArrowDataType::UInt64 => Self::UInt64,
            ArrowDataType::Float32 => Self::Float32,
            ArrowDataType::Float64 => Self::Float64,
            ArrowDataType::Utf8 | ArrowDataType::LargeUtf8 => Self::Utf8,
            ArrowDataType::Binary | ArrowDataType::LargeBinary => Self::Binary,
            ArrowDataType::Date32 => Self::Date32,
            ArrowDataType::Timestamp(unit, tz) => Self::Timestamp(*unit, tz.clone()),
            ArrowDataType::Decimal128(precision, scale) => Self::Decimal128(*precision, *scale),
            _ => return None,
        };
        Some(field_type)
    }

    /// Converts a `FieldType` back into its canonical Arrow `DataType`.
    pub fn to_arrow_type(&self) -> ArrowDataType {
        match self {
            Self::Null => ArrowDataType::Null,
            Self::Boolean => ArrowDataType::Boolean,
            Self::Int8 => ArrowDataType::Int8,
            Self::Int16 => ArrowDataType::Int16,
            Self::Int32 => ArrowDataType::Int32,
            Self::Int64 => ArrowDataType::Int64,
            Self::UInt8 => ArrowDataType::UInt8,
            Self::UInt16 => ArrowDataType::UInt16,
            Self::UInt32 => ArrowDataType::UInt32,
            Self::UInt64 => ArrowDataType::UInt64,
            Self::Float32 => ArrowDataType::Float32,
            Self::Float64 => ArrowDataType::Float64,
            Self::Utf8 => ArrowDataType::Utf8,
            Self::Binary => ArrowDataType::Binary,
            Self::Date32 => ArrowDataType::Date32,
            Self::Timestamp(unit, tz) => ArrowDataType::Timestamp(*unit, tz.clone()),
            Self::Decimal128(precision, scale) => ArrowDataType::Decimal128(*precision, *scale),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timestamp(unit, Some(tz)) => write!(f, "Timestamp({:?}, {})", unit, tz),
            Self::Timestamp(unit, None) => write!(f, "Timestamp({:?})", unit),
            other => write!(f, "{:?}", other),
        }
    }
}
