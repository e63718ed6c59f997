// In: src/decoder/mod.rs

//! File decoders: the upstream side of the transposer.
//!
//! A decoder reads a file's schema eagerly and its segments (row groups, record
//! batches) only on demand. [`SegmentIter`] adapts any decoder into the lazy
//! segment sequence `transposer::materialize` consumes, so a segment is decoded
//! only when the transposer still has budget for it.

use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Schema as ArrowSchema};

use crate::config::ReaderConfig;
use crate::error::RowsError;
use crate::segment::Segment;
use crate::types::Schema;

pub mod ipc_file;
pub mod parquet_file;

pub use self::ipc_file::IpcFileDecoder;
pub use self::parquet_file::ParquetDecoder;

/// **CONTRACT:** the operations the transposer needs from a columnar file.
pub trait ColumnarDecoder {
    /// The file's schema, available without decoding any segment.
    fn schema(&self) -> &Schema;
    /// Number of physical segments in the file.
    fn segment_count(&self) -> usize;
    /// Decodes segment `index` (0-based, physical order).
    fn open_segment(&mut self, index: usize) -> Result<Segment, RowsError>;

    /// Decodes at most the first `max_rows` rows of segment `index`.
    ///
    /// Decoders that cannot stop early return the whole segment; the transposer
    /// never takes more rows than its budget either way.
    fn open_segment_head(&mut self, index: usize, _max_rows: usize) -> Result<Segment, RowsError> {
        self.open_segment(index)
    }
}

/// Decoder settings shared by every file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Report Binary/LargeBinary columns as strings.
    pub treat_byte_array_as_string: bool,
    /// Rows per Arrow batch while decoding a row group.
    pub batch_size: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            treat_byte_array_as_string: true,
            batch_size: 8192,
        }
    }
}

impl From<&ReaderConfig> for DecodeOptions {
    fn from(config: &ReaderConfig) -> Self {
        Self {
            treat_byte_array_as_string: config.treat_byte_array_as_string,
            batch_size: config.batch_size,
        }
    }
}

/// The supported file layouts, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Parquet,
    ArrowIpc,
}

impl FileFormat {
    /// `.arrow`, `.ipc` and `.feather` are Arrow IPC files; anything else is read as Parquet.
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("arrow") | Some("ipc") | Some("feather") => FileFormat::ArrowIpc,
            _ => FileFormat::Parquet,
        }
    }
}

/// Opens `path` with the decoder matching its extension.
pub fn open_path(
    path: &Path,
    options: DecodeOptions,
) -> Result<Box<dyn ColumnarDecoder>, RowsError> {
    let decoder: Box<dyn ColumnarDecoder> = match FileFormat::from_path(path) {
        FileFormat::Parquet => Box::new(ParquetDecoder::open(path, options)?),
        FileFormat::ArrowIpc => Box::new(IpcFileDecoder::open(path, options)?),
    };
    Ok(decoder)
}

/// Pulls segments from a decoder one at a time, in physical order.
///
/// The iterator mirrors the transposer's row budget: each segment is requested
/// with only the rows still wanted, so the segment that crosses the limit is
/// decoded no further than the limit.
pub struct SegmentIter<'d> {
    decoder: &'d mut dyn ColumnarDecoder,
    next_index: usize,
    count: usize,
    row_budget: usize,
}

impl<'d> SegmentIter<'d> {
    pub fn new(decoder: &'d mut dyn ColumnarDecoder, row_budget: usize) -> Self {
        let count = decoder.segment_count();
        Self {
            decoder,
            next_index: 0,
            count,
            row_budget,
        }
    }
}

impl Iterator for SegmentIter<'_> {
    type Item = Result<Segment, RowsError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_index >= self.count {
            return None;
        }
        let index = self.next_index;
        self.next_index += 1;
        log::debug!(
            "decoding segment {} of {} (up to {} rows)",
            index + 1,
            self.count,
            self.row_budget
        );
        let segment = self.decoder.open_segment_head(index, self.row_budget);
        if let Ok(segment) = &segment {
            // A malformed segment is reported by the transposer, which stops there.
            let rows = segment.row_count().unwrap_or(0);
            self.row_budget = self.row_budget.saturating_sub(rows);
        }
        Some(segment)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.count - self.next_index;
        (left, Some(left))
    }
}

//==================================================================================
// Column normalization shared by the decoders
//==================================================================================

/// The type a column is handed to the transposer as, if it differs from the file's:
/// dictionaries are unpacked to their value type and, when requested, byte arrays
/// become strings.
fn normalized_type(data_type: &DataType, options: &DecodeOptions) -> Option<DataType> {
    let value_type = match data_type {
        DataType::Dictionary(_, value_type) => value_type.as_ref(),
        other => other,
    };
    let target = match value_type {
        DataType::Binary if options.treat_byte_array_as_string => DataType::Utf8,
        DataType::LargeBinary if options.treat_byte_array_as_string => DataType::LargeUtf8,
        other => other.clone(),
    };
    (&target != data_type).then_some(target)
}

/// The schema a decoder reports, with every field relabelled to its normalized type.
pub(crate) fn reported_schema(
    arrow_schema: &ArrowSchema,
    options: &DecodeOptions,
) -> Result<Schema, RowsError> {
    let fields: Vec<Field> = arrow_schema
        .fields()
        .iter()
        .map(|field| match normalized_type(field.data_type(), options) {
            Some(target) => field.as_ref().clone().with_data_type(target),
            None => field.as_ref().clone(),
        })
        .collect();
    Schema::from_arrow(&ArrowSchema::new(fields))
}

/// Casts a column to its normalized type; columns already in shape pass through.
/// Invalid UTF-8 slots in cast byte arrays become null.
pub(crate) fn normalize_column(
    column: &ArrayRef,
    options: &DecodeOptions,
) -> Result<ArrayRef, RowsError> {
    match normalized_type(column.data_type(), options) {
        Some(target) => Ok(cast(column.as_ref(), &target)?),
        None => Ok(Arc::clone(column)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldType;
    use arrow::array::{Array, AsArray, BinaryArray, DictionaryArray};
    use arrow::datatypes::Int32Type;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(FileFormat::from_path(Path::new("a.parquet")), FileFormat::Parquet);
        assert_eq!(FileFormat::from_path(Path::new("a.ARROW")), FileFormat::ArrowIpc);
        assert_eq!(FileFormat::from_path(Path::new("a.feather")), FileFormat::ArrowIpc);
        assert_eq!(FileFormat::from_path(Path::new("noext")), FileFormat::Parquet);
    }

    #[test]
    fn test_reported_schema_relabels_binary() {
        let arrow_schema = ArrowSchema::new(vec![Field::new("payload", DataType::Binary, true)]);

        let as_text = reported_schema(&arrow_schema, &DecodeOptions::default()).unwrap();
        assert_eq!(as_text.fields()[0].field_type, FieldType::Utf8);

        let raw = DecodeOptions {
            treat_byte_array_as_string: false,
            ..DecodeOptions::default()
        };
        let as_bytes = reported_schema(&arrow_schema, &raw).unwrap();
        assert_eq!(as_bytes.fields()[0].field_type, FieldType::Binary);
    }

    #[test]
    fn test_normalize_column_casts_bytes() {
        let column: ArrayRef = Arc::new(BinaryArray::from(vec![&b"hi"[..]]));
        let normalized = normalize_column(&column, &DecodeOptions::default()).unwrap();
        assert_eq!(normalized.data_type(), &DataType::Utf8);
        assert_eq!(normalized.len(), 1);
    }

    #[test]
    fn test_dictionary_strings_are_unpacked() {
        // 1. Arrange
        let dictionary_type = DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8));
        let arrow_schema = ArrowSchema::new(vec![Field::new("colour", dictionary_type, true)]);
        let column: DictionaryArray<Int32Type> = vec!["red", "blue", "red"].into_iter().collect();
        let column: ArrayRef = Arc::new(column);

        // 2. Act
        let schema = reported_schema(&arrow_schema, &DecodeOptions::default()).unwrap();
        let normalized = normalize_column(&column, &DecodeOptions::default()).unwrap();

        // 3. Assert
        assert_eq!(schema.fields()[0].field_type, FieldType::Utf8);
        assert_eq!(normalized.data_type(), &DataType::Utf8);
        let values = normalized.as_string::<i32>();
        assert_eq!(values.value(0), "red");
        assert_eq!(values.value(2), "red");
    }

    #[test]
    fn test_dictionary_of_bytes_follows_string_option() {
        let dictionary_type =
            DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Binary));
        let raw = DecodeOptions {
            treat_byte_array_as_string: false,
            ..DecodeOptions::default()
        };
        assert_eq!(
            normalized_type(&dictionary_type, &DecodeOptions::default()),
            Some(DataType::Utf8)
        );
        assert_eq!(normalized_type(&dictionary_type, &raw), Some(DataType::Binary));
        assert_eq!(normalized_type(&DataType::Int64, &raw), None);
    }
}
