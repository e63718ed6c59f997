//! Reads a single typed cell out of an Arrow array.

use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Decimal128Type, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type,
    TimeUnit, TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
    TimestampSecondType, UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};

use crate::types::CellValue;

/// Returns the value at `row`, tagged with the array's own type.
///
/// Null slots yield `CellValue::Null`. Returns `None` only for array types that
/// have no `CellValue` counterpart; segments are validated against the schema
/// before any cell is read, so callers treat `None` as a malformed segment.
pub(crate) fn read_cell(array: &dyn Array, row: usize) -> Option<CellValue> {
    if matches!(array.data_type(), DataType::Null) || array.is_null(row) {
        return Some(CellValue::Null);
    }
    let value = match array.data_type() {
        DataType::Boolean => CellValue::Boolean(array.as_boolean().value(row)),
        DataType::Int8 => CellValue::Int8(array.as_primitive::<Int8Type>().value(row)),
        DataType::Int16 => CellValue::Int16(array.as_primitive::<Int16Type>().value(row)),
        DataType::Int32 => CellValue::Int32(array.as_primitive::<Int32Type>().value(row)),
        DataType::Int64 => CellValue::Int64(array.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => CellValue::UInt8(array.as_primitive::<UInt8Type>().value(row)),
        DataType::UInt16 => CellValue::UInt16(array.as_primitive::<UInt16Type>().value(row)),
        DataType::UInt32 => CellValue::UInt32(array.as_primitive::<UInt32Type>().value(row)),
        DataType::UInt64 => CellValue::UInt64(array.as_primitive::<UInt64Type>().value(row)),
        DataType::Float32 => CellValue::Float32(array.as_primitive::<Float32Type>().value(row)),
        DataType::Float64 => CellValue::Float64(array.as_primitive::<Float64Type>().value(row)),
        DataType::Utf8 => CellValue::Utf8(array.as_string::<i32>().value(row).to_owned()),
        DataType::LargeUtf8 => CellValue::Utf8(array.as_string::<i64>().value(row).to_owned()),
        DataType::Binary => CellValue::Binary(array.as_binary::<i32>().value(row).to_vec()),
        DataType::LargeBinary => CellValue::Binary(array.as_binary::<i64>().value(row).to_vec()),
        DataType::Date32 => CellValue::Date32(array.as_primitive::<Date32Type>().value(row)),
        DataType::Timestamp(unit, tz) => {
            let value = match unit {
                TimeUnit::Second => array.as_primitive::<TimestampSecondType>().value(row),
                TimeUnit::Millisecond => array.as_primitive::<TimestampMillisecondType>().value(row),
                TimeUnit::Microsecond => array.as_primitive::<TimestampMicrosecondType>().value(row),
                TimeUnit::Nanosecond => array.as_primitive::<TimestampNanosecondType>().value(row),
            };
            CellValue::Timestamp {
                unit: *unit,
                value,
                tz: tz.clone(),
            }
        }
        DataType::Decimal128(precision, scale) => CellValue::Decimal {
            value: array.as_primitive::<Decimal128Type>().value(row),
            precision: *precision,
            scale: *scale,
        },
        _ => return None,
    };
    Some(value)
}
