//! The ordered field list a decoder reports for a file.

use std::collections::HashSet;

use arrow::datatypes::Schema as ArrowSchema;
use serde::{Deserialize, Serialize};

use super::FieldType;
use crate::error::RowsError;

/// A single named, typed column of a [`Schema`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub field_type: FieldType,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// An ordered sequence of uniquely named fields. Immutable once constructed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldDef>,
}

impl Schema {
    /// Builds a schema, rejecting duplicate field names.
    pub fn try_new(fields: Vec<FieldDef>) -> Result<Self, RowsError> {
        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(RowsError::InvalidRequest(format!(
                    "duplicate field name '{}' in schema",
                    field.name
                )));
            }
        }
        Ok(Self { fields })
    }

    /// Translates an Arrow schema, failing on the first field whose type has no
    /// scalar `FieldType` counterpart.
    pub fn from_arrow(schema: &ArrowSchema) -> Result<Self, RowsError> {
        let fields = schema
            .fields()
            .iter()
            .map(|field| {
                FieldType::from_arrow_type(field.data_type())
                    .map(|field_type| FieldDef::new(field.name().clone(), field_type))
                    .ok_or_else(|| RowsError::UnsupportedType {
                        field: field.name().clone(),
                        data_type: field.data_type().to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::try_new(fields)
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}
