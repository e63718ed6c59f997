//! A single row-oriented record produced by the transposer.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::CellValue;

/// One output row: field names paired with their values, in schema order.
///
/// Serializes as a JSON object whose keys follow the schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct RowRecord {
    entries: Vec<(String, CellValue)>,
}

impl RowRecord {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: String, value: CellValue) {
        self.entries.push((name, value));
    }

    /// Returns the value of `name`, or `None` if the schema has no such field.
    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.entries
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, CellValue)> for RowRecord {
    fn from_iter<T: IntoIterator<Item = (String, CellValue)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Serialize for RowRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
