// In: src/segment.rs

//! A `Segment` is one physically contiguous row group: a set of equally long,
//! already-decoded column arrays keyed by field name.
//!
//! Segments are the unit the transposer pulls from a source. A segment may omit
//! schema fields (schema evolution across row groups); it may not disagree with
//! itself about its row count, carry a column whose type contradicts the schema,
//! or carry a column the schema does not know.

use std::collections::HashMap;

use arrow::array::{Array, ArrayRef};
use arrow::record_batch::RecordBatch;

use crate::error::RowsError;
use crate::types::{FieldType, Schema};

#[derive(Debug, Clone)]
pub struct Segment {
    index: usize,
    columns: HashMap<String, ArrayRef>,
}

impl Segment {
    /// Creates an empty segment at physical position `index`.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            columns: HashMap::new(),
        }
    }

    /// Adds (or replaces) the column for `name`.
    pub fn with_column(mut self, name: impl Into<String>, array: ArrayRef) -> Self {
        self.columns.insert(name.into(), array);
        self
    }

    /// Splits a `RecordBatch` into a segment, one column per batch field.
    pub fn from_record_batch(index: usize, batch: &RecordBatch) -> Self {
        let columns = batch
            .schema()
            .fields()
            .iter()
            .zip(batch.columns())
            .map(|(field, array)| (field.name().clone(), array.clone()))
            .collect();
        Self { index, columns }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn column(&self, name: &str) -> Option<&ArrayRef> {
        self.columns.get(name)
    }

    /// Returns the shared length of all present columns (0 for a segment with no columns).
    ///
    /// # Errors
    /// `MalformedSegment` if any two columns disagree in length.
    pub fn row_count(&self) -> Result<usize, RowsError> {
        let mut expected: Option<(&str, usize)> = None;
        // Sorted so the reported pair is deterministic.
        let mut names: Vec<&String> = self.columns.keys().collect();
        names.sort();
        for name in names {
            let len = self.columns[name].len();
            match expected {
                None => expected = Some((name.as_str(), len)),
                Some((first, first_len)) if first_len != len => {
                    return Err(RowsError::malformed(
                        self.index,
                        format!(
                            "column '{}' has {} rows but column '{}' has {}",
                            name, len, first, first_len
                        ),
                    ));
                }
                Some(_) => {}
            }
        }
        Ok(expected.map_or(0, |(_, len)| len))
    }

    /// Checks every present column against `schema` and returns the row count.
    ///
    /// # Errors
    /// `MalformedSegment` on a length disagreement, an unknown column, or a column
    /// whose Arrow type does not map to the field's declared type.
    pub fn validate(&self, schema: &Schema) -> Result<usize, RowsError> {
        let row_count = self.row_count()?;
        for (name, array) in &self.columns {
            let field = schema.field(name).ok_or_else(|| {
                RowsError::malformed(self.index, format!("column '{}' is not in the schema", name))
            })?;
            let actual = FieldType::from_arrow_type(array.data_type());
            if actual.as_ref() != Some(&field.field_type) {
                return Err(RowsError::malformed(
                    self.index,
                    format!(
                        "column '{}' is declared {} but holds {}",
                        name,
                        field.field_type,
                        array.data_type()
                    ),
                ));
            }
        }
        Ok(row_count)
    }
}

/// Wraps already-materialized batches as a segment source, in batch order.
pub fn segments_from_batches(
    batches: impl IntoIterator<Item = RecordBatch>,
) -> impl Iterator<Item = Result<Segment, RowsError>> {
    batches
        .into_iter()
        .enumerate()
        .map(|(index, batch)| Ok(Segment::from_record_batch(index, &batch)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldDef;
    use arrow::array::{Int32Array, Int64Array, StringArray};
    use std::sync::Arc;

    fn id_name_schema() -> Schema {
        Schema::try_new(vec![
            FieldDef::new("id", FieldType::Int64),
            FieldDef::new("name", FieldType::Utf8),
        ])
        .unwrap()
    }

    #[test]
    fn test_row_count_agrees() {
        let segment = Segment::new(0)
            .with_column("id", Arc::new(Int64Array::from(vec![1, 2, 3])))
            .with_column("name", Arc::new(StringArray::from(vec!["a", "b", "c"])));
        assert_eq!(segment.row_count().unwrap(), 3);
        assert_eq!(segment.validate(&id_name_schema()).unwrap(), 3);
    }

    #[test]
    fn test_empty_segment_has_zero_rows() {
        assert_eq!(Segment::new(4).row_count().unwrap(), 0);
    }

    #[test]
    fn test_length_mismatch_is_malformed() {
        let segment = Segment::new(1)
            .with_column("id", Arc::new(Int64Array::from(vec![1, 2, 3])))
            .with_column("name", Arc::new(StringArray::from(vec!["a", "b"])));
        let err = segment.row_count().unwrap_err();
        assert!(matches!(err, RowsError::MalformedSegment { segment_index: 1, .. }));
    }

    #[test]
    fn test_declared_type_mismatch_is_malformed() {
        // Int32 where the schema promises Int64: no silent widening.
        let segment = Segment::new(0).with_column("id", Arc::new(Int32Array::from(vec![1])));
        let err = segment.validate(&id_name_schema()).unwrap_err();
        assert!(err.to_string().contains("declared Int64"));
    }

    #[test]
    fn test_batches_become_indexed_segments() {
        let batch = |ids: Vec<i64>| {
            RecordBatch::try_from_iter(vec![("id", Arc::new(Int64Array::from(ids)) as ArrayRef)])
                .unwrap()
        };

        let segments: Vec<Segment> = segments_from_batches(vec![batch(vec![1, 2]), batch(vec![3])])
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].index(), 1);
        assert_eq!(segments[0].validate(&id_name_schema()).unwrap(), 2);
        assert_eq!(segments[1].row_count().unwrap(), 1);
    }

    #[test]
    fn test_unknown_column_is_malformed() {
        let segment = Segment::new(0).with_column("extra", Arc::new(Int64Array::from(vec![1])));
        assert!(matches!(
            segment.validate(&id_name_schema()),
            Err(RowsError::MalformedSegment { .. })
        ));
    }
}
