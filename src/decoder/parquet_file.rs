// In: src/decoder/parquet_file.rs

//! Row-group-at-a-time Parquet decoding.
//!
//! The footer is parsed once when the decoder is opened. Each `open_segment`
//! call then builds a reader restricted to a single row group, so row groups
//! past the transposer's budget are never read from storage. `open_segment_head`
//! additionally caps the reader, so the row group that crosses the budget stops
//! decoding once the wanted rows are out.

use std::fs::File;
use std::path::Path;

use arrow::compute::concat_batches;
use arrow::record_batch::{RecordBatch, RecordBatchReader};
use bytes::Bytes;
use parquet::arrow::arrow_reader::{
    ArrowReaderMetadata, ArrowReaderOptions, ParquetRecordBatchReader,
    ParquetRecordBatchReaderBuilder,
};
use parquet::file::reader::ChunkReader;

use super::{normalize_column, reported_schema, ColumnarDecoder, DecodeOptions};
use crate::error::RowsError;
use crate::segment::Segment;
use crate::types::Schema;

/// Where the Parquet bytes live.
enum ParquetInput {
    File(File),
    Memory(Bytes),
}

pub struct ParquetDecoder {
    input: ParquetInput,
    metadata: ArrowReaderMetadata,
    schema: Schema,
    options: DecodeOptions,
}

impl ParquetDecoder {
    /// Opens a Parquet file and parses its footer.
    pub fn open(path: impl AsRef<Path>, options: DecodeOptions) -> Result<Self, RowsError> {
        let file = File::open(path.as_ref())?;
        let decoder = Self::from_input(ParquetInput::File(file), options)?;
        log::info!(
            "opened parquet file '{}': {} row groups, {} rows",
            path.as_ref().display(),
            decoder.segment_count(),
            decoder.total_rows()
        );
        Ok(decoder)
    }

    /// Decodes a Parquet file already held in memory.
    pub fn from_bytes(bytes: impl Into<Bytes>, options: DecodeOptions) -> Result<Self, RowsError> {
        Self::from_input(ParquetInput::Memory(bytes.into()), options)
    }

    fn from_input(input: ParquetInput, options: DecodeOptions) -> Result<Self, RowsError> {
        if options.batch_size == 0 {
            return Err(RowsError::Config("batch_size must be greater than zero".into()));
        }
        let metadata = match &input {
            ParquetInput::File(file) => ArrowReaderMetadata::load(file, ArrowReaderOptions::new())?,
            ParquetInput::Memory(bytes) => {
                ArrowReaderMetadata::load(bytes, ArrowReaderOptions::new())?
            }
        };
        let schema = reported_schema(metadata.schema(), &options)?;
        Ok(Self {
            input,
            metadata,
            schema,
            options,
        })
    }

    /// Rows stored in row group `index`, read from the footer.
    pub fn row_group_rows(&self, index: usize) -> Option<usize> {
        let parquet_metadata = self.metadata.metadata();
        (index < parquet_metadata.num_row_groups())
            .then(|| parquet_metadata.row_group(index).num_rows() as usize)
    }

    /// Total rows across all row groups, read from the footer.
    pub fn total_rows(&self) -> usize {
        self.metadata
            .metadata()
            .row_groups()
            .iter()
            .map(|rg| rg.num_rows() as usize)
            .sum()
    }

    fn row_group_reader<T: ChunkReader + 'static>(
        &self,
        input: T,
        index: usize,
        limit: Option<usize>,
    ) -> Result<ParquetRecordBatchReader, RowsError> {
        let mut builder = ParquetRecordBatchReaderBuilder::new_with_metadata(input, self.metadata.clone())
            .with_row_groups(vec![index])
            .with_batch_size(self.options.batch_size);
        if let Some(limit) = limit {
            builder = builder.with_limit(limit);
        }
        Ok(builder.build()?)
    }

    fn read_row_group(&self, index: usize, limit: Option<usize>) -> Result<RecordBatch, RowsError> {
        let reader = match &self.input {
            ParquetInput::File(file) => self.row_group_reader(file.try_clone()?, index, limit)?,
            ParquetInput::Memory(bytes) => self.row_group_reader(bytes.clone(), index, limit)?,
        };
        let arrow_schema = reader.schema();
        let batches = reader.collect::<Result<Vec<_>, _>>()?;
        Ok(concat_batches(&arrow_schema, &batches)?)
    }

    fn decode_segment(&self, index: usize, max_rows: Option<usize>) -> Result<Segment, RowsError> {
        let count = self.segment_count();
        let stored = self
            .row_group_rows(index)
            .ok_or(RowsError::SegmentOutOfRange { index, count })?;
        // Only cap the reader when the cap actually cuts the row group short.
        let limit = max_rows.filter(|&rows| rows < stored);
        let batch = self.read_row_group(index, limit)?;
        log_metric!(
            "event" = "row_group_decoded",
            "row_group" = index,
            "rows" = batch.num_rows(),
            "stored" = stored
        );

        let mut segment = Segment::new(index);
        for (field, column) in batch.schema().fields().iter().zip(batch.columns()) {
            segment = segment.with_column(field.name().clone(), normalize_column(column, &self.options)?);
        }
        Ok(segment)
    }
}

impl ColumnarDecoder for ParquetDecoder {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn segment_count(&self) -> usize {
        self.metadata.metadata().num_row_groups()
    }

    fn open_segment(&mut self, index: usize) -> Result<Segment, RowsError> {
        self.decode_segment(index, None)
    }

    fn open_segment_head(&mut self, index: usize, max_rows: usize) -> Result<Segment, RowsError> {
        self.decode_segment(index, Some(max_rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldType;
    use arrow::array::{
        Array, ArrayRef, BinaryArray, Decimal128Array, DictionaryArray, Int64Array, StringArray,
    };
    use arrow::datatypes::Int32Type;
    use arrow::datatypes::{DataType, Field, Schema as ArrowSchema};
    use parquet::arrow::ArrowWriter;
    use parquet::file::properties::WriterProperties;
    use std::sync::Arc;

    /// Writes `ids`/`names` into an in-memory Parquet file with the given row-group size.
    fn write_parquet(ids: Vec<i64>, names: Vec<&str>, row_group_size: usize) -> Vec<u8> {
        let schema = Arc::new(ArrowSchema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("name", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(ids)) as ArrayRef,
                Arc::new(StringArray::from(names)) as ArrayRef,
            ],
        )
        .unwrap();

        let props = WriterProperties::builder()
            .set_max_row_group_size(row_group_size)
            .build();
        let mut buffer = Vec::new();
        let mut writer = ArrowWriter::try_new(&mut buffer, schema, Some(props)).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        buffer
    }

    #[test]
    fn test_row_groups_become_segments() {
        let bytes = write_parquet(vec![1, 2, 3, 4, 5], vec!["a", "b", "c", "d", "e"], 2);
        let mut decoder = ParquetDecoder::from_bytes(bytes, DecodeOptions::default()).unwrap();

        assert_eq!(decoder.segment_count(), 3);
        assert_eq!(decoder.total_rows(), 5);
        assert_eq!(decoder.row_group_rows(2), Some(1));
        assert_eq!(decoder.row_group_rows(3), None);

        let schema = decoder.schema().clone();
        let middle = decoder.open_segment(1).unwrap();
        assert_eq!(middle.index(), 1);
        assert_eq!(middle.validate(&schema).unwrap(), 2);

        let ids = middle.column("id").unwrap();
        let ids = ids.as_any().downcast_ref::<Int64Array>().unwrap();
        assert_eq!(ids.values().to_vec(), vec![3, 4]);
    }

    #[test]
    fn test_segment_head_stops_at_max_rows() {
        // 1. Arrange: a single row group of 5 rows.
        let bytes = write_parquet(vec![1, 2, 3, 4, 5], vec!["a", "b", "c", "d", "e"], 10);
        let mut decoder = ParquetDecoder::from_bytes(bytes, DecodeOptions::default()).unwrap();
        let schema = decoder.schema().clone();

        // 2. Act
        let head = decoder.open_segment_head(0, 2).unwrap();
        let whole = decoder.open_segment_head(0, 50).unwrap();

        // 3. Assert
        assert_eq!(head.validate(&schema).unwrap(), 2);
        let ids = head.column("id").unwrap();
        let ids = ids.as_any().downcast_ref::<Int64Array>().unwrap();
        assert_eq!(ids.values().to_vec(), vec![1, 2]);
        assert_eq!(whole.validate(&schema).unwrap(), 5);
    }

    #[test]
    fn test_decimal_and_dictionary_columns_round_trip() {
        // 1. Arrange
        let dictionary_type =
            DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8));
        let schema = Arc::new(ArrowSchema::new(vec![
            Field::new("price", DataType::Decimal128(10, 2), false),
            Field::new("cat", dictionary_type, false),
        ]));
        let prices = Decimal128Array::from(vec![12345, -5])
            .with_precision_and_scale(10, 2)
            .unwrap();
        let cats: DictionaryArray<Int32Type> = vec!["toys", "books"].into_iter().collect();
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(prices) as ArrayRef, Arc::new(cats) as ArrayRef],
        )
        .unwrap();
        let mut buffer = Vec::new();
        let mut writer = ArrowWriter::try_new(&mut buffer, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        // 2. Act
        let mut decoder = ParquetDecoder::from_bytes(buffer, DecodeOptions::default()).unwrap();
        let reported = decoder.schema().clone();
        let segment = decoder.open_segment(0).unwrap();

        // 3. Assert
        assert_eq!(reported.fields()[0].field_type, FieldType::Decimal128(10, 2));
        assert_eq!(reported.fields()[1].field_type, FieldType::Utf8);
        assert_eq!(segment.validate(&reported).unwrap(), 2);
        assert_eq!(segment.column("cat").unwrap().data_type(), &DataType::Utf8);
    }

    #[test]
    fn test_out_of_range_segment() {
        let bytes = write_parquet(vec![1], vec!["a"], 10);
        let mut decoder = ParquetDecoder::from_bytes(bytes, DecodeOptions::default()).unwrap();

        let err = decoder.open_segment(1).unwrap_err();
        assert!(matches!(err, RowsError::SegmentOutOfRange { index: 1, count: 1 }));
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let result = ParquetDecoder::from_bytes(b"definitely not parquet".to_vec(), DecodeOptions::default());
        let err = result.err().unwrap();
        assert_eq!(err.kind(), crate::error::ErrorKind::Decode);
    }

    #[test]
    fn test_byte_arrays_follow_option() {
        let schema = Arc::new(ArrowSchema::new(vec![Field::new("blob", DataType::Binary, false)]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(BinaryArray::from(vec![&b"xyz"[..]])) as ArrayRef],
        )
        .unwrap();
        let mut buffer = Vec::new();
        let mut writer = ArrowWriter::try_new(&mut buffer, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let as_text = ParquetDecoder::from_bytes(buffer.clone(), DecodeOptions::default()).unwrap();
        assert_eq!(as_text.schema().fields()[0].field_type, FieldType::Utf8);

        let options = DecodeOptions {
            treat_byte_array_as_string: false,
            ..DecodeOptions::default()
        };
        let mut as_bytes = ParquetDecoder::from_bytes(buffer, options).unwrap();
        assert_eq!(as_bytes.schema().fields()[0].field_type, FieldType::Binary);
        let segment = as_bytes.open_segment(0).unwrap();
        assert_eq!(segment.column("blob").unwrap().data_type(), &DataType::Binary);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let bytes = write_parquet(vec![1], vec!["a"], 10);
        let options = DecodeOptions {
            batch_size: 0,
            ..DecodeOptions::default()
        };
        let result = ParquetDecoder::from_bytes(bytes, options);
        assert!(matches!(result, Err(RowsError::Config(_))));
    }
}
