// In: src/transposer/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Transposer
// ====================================================================================
//
// The transposer turns column-major segments into row-major records under one row
// budget shared across every segment of a call.
//
//   [Segment source] --next()--> Segment --validate--> row count
//         ^                                              |
//         |                             take = min(row count, remaining budget)
//         |                                              |
//         `------- pulled again only while budget > 0 <--+--> RowRecord x take
//
// Segments are pulled one at a time, in physical order, and only when the previous
// one has been fully drained. Once the budget hits zero the source is never asked
// for another segment, so row groups that cannot contribute are never decoded.
//
// Error policy:
//   * `RowStream` (lazy) yields every row produced before a failure, then the error,
//     then ends.
//   * `materialize` (eager) collects the stream; any error fails the whole call and
//     the rows produced so far are dropped.
// ====================================================================================

mod cell;

use arrow::array::{Array, ArrayRef};

use crate::error::RowsError;
use crate::segment::Segment;
use crate::types::{CellValue, RowRecord, Schema};

/// Row cap applied when the caller does not supply one.
pub const DEFAULT_ROW_LIMIT: usize = 1000;

/// Materializes at most `row_limit` rows from `segments`, in segment order then
/// in-segment index order.
///
/// A `row_limit` of zero returns an empty vector without pulling a single segment.
///
/// # Errors
/// The first error raised by the source (passed through unchanged) or by segment
/// validation (`MalformedSegment`). No partial result is returned on error.
pub fn materialize<I>(
    schema: &Schema,
    segments: I,
    row_limit: usize,
) -> Result<Vec<RowRecord>, RowsError>
where
    I: IntoIterator<Item = Result<Segment, RowsError>>,
{
    RowStream::new(schema, segments, row_limit).collect()
}

/// The segment currently being drained, with its columns aligned to schema order.
struct ActiveSegment {
    index: usize,
    columns: Vec<Option<ArrayRef>>,
    next_row: usize,
    end_row: usize,
}

/// A lazy, pull-based sequence of row records.
///
/// Dropping the stream (or simply not pulling from it) between segments aborts
/// the materialization; no further segment is requested from the source.
pub struct RowStream<'a, I> {
    schema: &'a Schema,
    segments: I,
    remaining: usize,
    active: Option<ActiveSegment>,
    finished: bool,
    rows_emitted: usize,
    segments_opened: usize,
}

impl<'a, I> RowStream<'a, I>
where
    I: Iterator<Item = Result<Segment, RowsError>>,
{
    pub fn new<S>(schema: &'a Schema, segments: S, row_limit: usize) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        Self {
            schema,
            segments: segments.into_iter(),
            remaining: row_limit,
            active: None,
            finished: false,
            rows_emitted: 0,
            segments_opened: 0,
        }
    }

    /// Rows of budget not yet claimed by an opened segment.
    pub fn remaining_budget(&self) -> usize {
        self.remaining
    }

    pub fn rows_emitted(&self) -> usize {
        self.rows_emitted
    }

    pub fn segments_opened(&self) -> usize {
        self.segments_opened
    }

    fn open(&mut self, segment: Segment) -> Result<(), RowsError> {
        let row_count = segment.validate(self.schema)?;
        let take = row_count.min(self.remaining);
        self.remaining -= take;
        self.segments_opened += 1;

        log::debug!(
            "segment {} opened: {} rows, taking {}, {} left in budget",
            segment.index(),
            row_count,
            take,
            self.remaining
        );
        log_metric!(
            "event" = "segment_opened",
            "segment" = segment.index(),
            "rows" = row_count,
            "taken" = take
        );

        let columns = self
            .schema
            .fields()
            .iter()
            .map(|field| segment.column(&field.name).cloned())
            .collect();
        self.active = Some(ActiveSegment {
            index: segment.index(),
            columns,
            next_row: 0,
            end_row: take,
        });
        Ok(())
    }

    fn finish(&mut self) {
        if !self.finished {
            self.finished = true;
            self.active = None;
            log::debug!(
                "materialization finished: {} rows from {} segments",
                self.rows_emitted,
                self.segments_opened
            );
        }
    }
}

/// Builds one record: every schema field, in order, with omitted columns as `Null`.
fn build_row(schema: &Schema, active: &ActiveSegment, row: usize) -> Result<RowRecord, RowsError> {
    let mut record = RowRecord::with_capacity(schema.len());
    for (field, column) in schema.fields().iter().zip(&active.columns) {
        let value = match column {
            Some(array) => cell::read_cell(array.as_ref(), row).ok_or_else(|| {
                RowsError::malformed(
                    active.index,
                    format!("column '{}' holds unreadable type {}", field.name, array.data_type()),
                )
            })?,
            None => CellValue::Null,
        };
        record.push(field.name.clone(), value);
    }
    Ok(record)
}

impl<'a, I> Iterator for RowStream<'a, I>
where
    I: Iterator<Item = Result<Segment, RowsError>>,
{
    type Item = Result<RowRecord, RowsError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(active) = self.active.as_mut() {
                if active.next_row < active.end_row {
                    let row = active.next_row;
                    active.next_row += 1;
                    let result = build_row(self.schema, active, row);
                    match result {
                        Ok(_) => self.rows_emitted += 1,
                        Err(_) => self.finish(),
                    }
                    return Some(result);
                }
                self.active = None;
            }

            if self.finished {
                return None;
            }
            if self.remaining == 0 {
                // Budget exhausted: the next segment must not even be opened.
                self.finish();
                return None;
            }

            match self.segments.next() {
                None => {
                    self.finish();
                    return None;
                }
                Some(Err(err)) => {
                    log::warn!("segment source failed after {} rows: {}", self.rows_emitted, err);
                    self.finish();
                    return Some(Err(err));
                }
                Some(Ok(segment)) => {
                    if let Err(err) = self.open(segment) {
                        log::warn!("rejecting segment: {}", err);
                        self.finish();
                        return Some(Err(err));
                    }
                }
            }
        }
    }
}
