//! Field access over typed and open-ended records.
//!
//! Tables, derivations, and choropleths never look fields up by raw string
//! on typed data. Each typed dataset names its columns with a field enum
//! and implements [`Record`] by matching on it. The handful of endpoints
//! that return untyped maps are read into [`Row`], whose field type is the
//! key string.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::PresentationError;
use crate::value::Value;

/// A row of a dataset that can be read field by field.
pub trait Record {
    /// Identifies one field of the record.
    type Field: Clone + PartialEq + fmt::Debug + fmt::Display;

    /// Returns the value of `field`.
    ///
    /// `None` means the field is not part of this record's shape at all;
    /// `Some(Value::Null)` means the field exists but was not reported.
    fn get(&self, field: &Self::Field) -> Option<Value>;

    /// Returns the value of `field`, treating an absent field as null.
    fn value(&self, field: &Self::Field) -> Value {
        self.get(field).unwrap_or(Value::Null)
    }

    /// Returns the numeric value of `field`, or `None` when it is absent,
    /// null, or not a number.
    fn number(&self, field: &Self::Field) -> Option<f64> {
        self.get(field).and_then(|v| v.as_number())
    }
}

impl<R: Record> Record for &R {
    type Field = R::Field;

    fn get(&self, field: &Self::Field) -> Option<Value> {
        (*self).get(field)
    }
}

/// An open-ended record: a map from field name to scalar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(BTreeMap<String, Value>);

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Sets `field` to `value`, returning the row for chaining.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Sets `field` to `value`.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    /// Iterates over the fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Record for Row {
    type Field = String;

    fn get(&self, field: &String) -> Option<Value> {
        self.0.get(field).cloned()
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Checks that every field in `fields` is present on at least one record.
///
/// An empty record set is always valid: it renders as "no data" rather than
/// failing.
///
/// # Errors
///
/// Returns [`PresentationError::UnknownField`] for the first field that no
/// record carries.
pub fn validate_fields<R: Record>(
    records: &[R],
    fields: &[R::Field],
) -> Result<(), PresentationError> {
    if records.is_empty() {
        return Ok(());
    }
    for field in fields {
        if records.iter().all(|r| r.get(field).is_none()) {
            return Err(PresentationError::UnknownField {
                field: field.to_string(),
            });
        }
    }
    Ok(())
}
