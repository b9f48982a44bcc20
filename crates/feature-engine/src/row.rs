//! Feature Row

use crate::schema::FeatureSchema;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// A single cell of a feature row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    /// Integers: year and one-hot indicators
    Int(i64),
    /// Continuous measurements
    Float(f64),
    /// Raw text passed through to the model (country)
    Text(String),
}

impl FeatureValue {
    /// Numeric view of the value; `None` for text
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Int(v) => Some(*v as f64),
            FeatureValue::Float(v) => Some(*v),
            FeatureValue::Text(_) => None,
        }
    }

    /// Text view of the value; `None` for numbers
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Int(v) => write!(f, "{v}"),
            FeatureValue::Float(v) => write!(f, "{v}"),
            FeatureValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for FeatureValue {
    fn from(v: i64) -> Self {
        FeatureValue::Int(v)
    }
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        FeatureValue::Float(v)
    }
}

impl From<&str> for FeatureValue {
    fn from(v: &str) -> Self {
        FeatureValue::Text(v.to_string())
    }
}

/// One model input row, laid out exactly as its schema
#[derive(Debug, Clone)]
pub struct FeatureRow {
    schema: Arc<FeatureSchema>,
    values: Vec<FeatureValue>,
}

impl FeatureRow {
    pub(crate) fn new(schema: Arc<FeatureSchema>, values: Vec<FeatureValue>) -> Self {
        debug_assert_eq!(schema.len(), values.len());
        Self { schema, values }
    }

    /// Schema this row was assembled against
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Value of a column by name
    pub fn column(&self, name: &str) -> Option<&FeatureValue> {
        self.schema.position(name).map(|idx| &self.values[idx])
    }

    /// `(column, value)` pairs in schema order
    pub fn columns(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.schema
            .columns()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Values in schema order
    pub fn values(&self) -> &[FeatureValue] {
        &self.values
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for an assembled row
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Dense `f32` encoding for tensor-based models.
    ///
    /// Text cells become their index in the column's category vocabulary.
    /// Labels outside the vocabulary, or text columns without one, become
    /// NaN, which tree ensembles route as a missing value.
    pub fn encode_f32(&self) -> Vec<f32> {
        self.values
            .iter()
            .enumerate()
            .map(|(idx, value)| match value {
                FeatureValue::Int(v) => *v as f32,
                FeatureValue::Float(v) => *v as f32,
                FeatureValue::Text(label) => self
                    .schema
                    .category_code(idx, label)
                    .map(|code| code as f32)
                    .unwrap_or(f32::NAN),
            })
            .collect()
    }
}

impl PartialEq for FeatureRow {
    fn eq(&self, other: &Self) -> bool {
        self.schema.columns() == other.schema.columns() && self.values == other.values
    }
}

/// Serializes as a JSON object whose keys follow schema order
impl Serialize for FeatureRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (column, value) in self.columns() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
