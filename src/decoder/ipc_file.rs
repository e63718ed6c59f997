// In: src/decoder/ipc_file.rs

//! Arrow IPC file decoding: each record batch in the file is one segment.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use arrow::ipc::reader::FileReader;

use super::{normalize_column, reported_schema, ColumnarDecoder, DecodeOptions};
use crate::error::RowsError;
use crate::segment::Segment;
use crate::types::Schema;

pub struct IpcFileDecoder<R: Read + Seek> {
    reader: FileReader<R>,
    schema: Schema,
    options: DecodeOptions,
}

impl IpcFileDecoder<BufReader<File>> {
    /// Opens an Arrow IPC file and reads its footer.
    pub fn open(path: impl AsRef<Path>, options: DecodeOptions) -> Result<Self, RowsError> {
        let file = File::open(path.as_ref())?;
        let decoder = Self::new(BufReader::new(file), options)?;
        log::info!(
            "opened arrow ipc file '{}': {} record batches",
            path.as_ref().display(),
            decoder.segment_count()
        );
        Ok(decoder)
    }
}

impl<R: Read + Seek> IpcFileDecoder<R> {
    pub fn new(source: R, options: DecodeOptions) -> Result<Self, RowsError> {
        let reader = FileReader::try_new(source, None)?;
        let schema = reported_schema(&reader.schema(), &options)?;
        Ok(Self {
            reader,
            schema,
            options,
        })
    }
}

impl<R: Read + Seek> ColumnarDecoder for IpcFileDecoder<R> {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn segment_count(&self) -> usize {
        self.reader.num_batches()
    }

    fn open_segment(&mut self, index: usize) -> Result<Segment, RowsError> {
        self.decode_batch(index, None)
    }

    /// The batch is decoded whole; the head is a zero-copy slice of it, so only
    /// the kept rows go through column normalization.
    fn open_segment_head(&mut self, index: usize, max_rows: usize) -> Result<Segment, RowsError> {
        self.decode_batch(index, Some(max_rows))
    }
}

impl<R: Read + Seek> IpcFileDecoder<R> {
    fn decode_batch(&mut self, index: usize, max_rows: Option<usize>) -> Result<Segment, RowsError> {
        let count = self.segment_count();
        if index >= count {
            return Err(RowsError::SegmentOutOfRange { index, count });
        }
        self.reader.set_index(index)?;
        let mut batch = self
            .reader
            .next()
            .ok_or(RowsError::SegmentOutOfRange { index, count })??;
        if let Some(max_rows) = max_rows.filter(|&rows| rows < batch.num_rows()) {
            batch = batch.slice(0, max_rows);
        }

        let mut segment = Segment::new(index);
        for (field, column) in batch.schema().fields().iter().zip(batch.columns()) {
            segment = segment.with_column(field.name().clone(), normalize_column(column, &self.options)?);
        }
        Ok(segment)
    }
}
