//! The per-cell tagged value carried by a [`RowRecord`](super::RowRecord).

use std::sync::Arc;

use arrow::datatypes::{Decimal128Type, DecimalType};
use arrow_schema::TimeUnit;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use super::FieldType;

/// Days between 0001-01-01 (CE day 1) and the Unix epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// A single scalar taken from one column at one row index.
///
/// Every non-null variant corresponds to exactly one [`FieldType`]; `Null` is
/// used both for null slots inside a column and for columns a segment omits.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Boolean(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Utf8(String),
    Binary(Vec<u8>),
    Date32(i32),
    Timestamp {
        unit: TimeUnit,
        value: i64,
        tz: Option<Arc<str>>,
    },
    /// Unscaled integer; the represented number is `value * 10^-scale`.
    Decimal {
        value: i128,
        precision: u8,
        scale: i8,
    },
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// The type tag of this value, or `None` for `Null`.
    pub fn field_type(&self) -> Option<FieldType> {
        let field_type = match self {
            CellValue::Null => return None,
            CellValue::Boolean(_) => FieldType::Boolean,
            CellValue::Int8(_) => FieldType::Int8,
            CellValue::Int16(_) => FieldType::Int16,
            CellValue::Int32(_) => FieldType::Int32,
            CellValue::Int64(_) => FieldType::Int64,
            CellValue::UInt8(_) => FieldType::UInt8,
            CellValue::UInt16(_) => FieldType::UInt16,
            CellValue::UInt32(_) => FieldType::UInt32,
            CellValue::UInt64(_) => FieldType::UInt64,
            CellValue::Float32(_) => FieldType::Float32,
            CellValue::Float64(_) => FieldType::Float64,
            CellValue::Utf8(_) => FieldType::Utf8,
            CellValue::Binary(_) => FieldType::Binary,
            CellValue::Date32(_) => FieldType::Date32,
            CellValue::Timestamp { unit, tz, .. } => FieldType::Timestamp(*unit, tz.clone()),
            CellValue::Decimal {
                precision, scale, ..
            } => FieldType::Decimal128(*precision, *scale),
        };
        Some(field_type)
    }
}

fn date_from_days(days: i32) -> Option<NaiveDate> {
    days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
}

fn instant_from_ticks(unit: TimeUnit, value: i64) -> Option<DateTime<Utc>> {
    match unit {
        TimeUnit::Second => DateTime::from_timestamp(value, 0),
        TimeUnit::Millisecond => DateTime::from_timestamp_millis(value),
        TimeUnit::Microsecond => DateTime::from_timestamp_micros(value),
        TimeUnit::Nanosecond => Some(DateTime::from_timestamp_nanos(value)),
    }
}

/// JSON rendering: primitives stay primitives, dates and timestamps become
/// ISO-8601 text (timestamps always normalized to UTC), binary becomes an array
/// of byte values. Values chrono cannot represent fall back to the raw integer.
/// Decimals are written as exact text so no precision is lost to `f64`.
impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Null => serializer.serialize_unit(),
            CellValue::Boolean(v) => serializer.serialize_bool(*v),
            CellValue::Int8(v) => serializer.serialize_i8(*v),
            CellValue::Int16(v) => serializer.serialize_i16(*v),
            CellValue::Int32(v) => serializer.serialize_i32(*v),
            CellValue::Int64(v) => serializer.serialize_i64(*v),
            CellValue::UInt8(v) => serializer.serialize_u8(*v),
            CellValue::UInt16(v) => serializer.serialize_u16(*v),
            CellValue::UInt32(v) => serializer.serialize_u32(*v),
            CellValue::UInt64(v) => serializer.serialize_u64(*v),
            CellValue::Float32(v) => serializer.serialize_f32(*v),
            CellValue::Float64(v) => serializer.serialize_f64(*v),
            CellValue::Utf8(v) => serializer.serialize_str(v),
            CellValue::Binary(v) => v.serialize(serializer),
            CellValue::Date32(days) => match date_from_days(*days) {
                Some(date) => serializer.collect_str(&date.format("%Y-%m-%d")),
                None => serializer.serialize_i32(*days),
            },
            CellValue::Timestamp { unit, value, .. } => match instant_from_ticks(*unit, *value) {
                Some(instant) => {
                    serializer.serialize_str(&instant.to_rfc3339_opts(SecondsFormat::AutoSi, true))
                }
                None => serializer.serialize_i64(*value),
            },
            CellValue::Decimal {
                value,
                precision,
                scale,
            } => serializer.serialize_str(&Decimal128Type::format_decimal(*value, *precision, *scale)),
        }
    }
}
