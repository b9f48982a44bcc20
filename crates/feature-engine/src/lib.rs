//! Feature Engineering Engine
//!
//! Turns user inputs into a single feature row whose columns match, in name
//! and order, the schema the yield model was trained with.

mod assembler;
mod input;
mod row;
mod schema;

pub use assembler::FeatureAssembler;
pub use input::YieldInput;
pub use row::{FeatureRow, FeatureValue};
pub use schema::{
    ColumnKind, FeatureSchema, SchemaWarning, AREA_COLUMN, CROP_PREFIX, PESTICIDES_COLUMN,
    RAINFALL_COLUMN, TEMPERATURE_COLUMN, YEAR_COLUMN,
};

use thiserror::Error;

/// Errors while loading a schema or assembling a row
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("Failed to read schema artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed schema artifact: {0}")]
    Malformed(String),
    #[error("Schema has no columns")]
    EmptySchema,
    #[error("Duplicate schema column: {0}")]
    DuplicateColumn(String),
    #[error("Category vocabulary given for column not in schema: {0}")]
    UnknownCategoryColumn(String),
    #[error("Unknown crop '{crop}', expected one of: {}", .available.join(", "))]
    UnknownCrop { crop: String, available: Vec<String> },
}
