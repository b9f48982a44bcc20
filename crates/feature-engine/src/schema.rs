//! Feature Schema
//!
//! The ordered column list the model was trained with, plus the lookups
//! derived from it once at load time.

use crate::FeatureError;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use tracing::{info, warn};

/// Column holding the harvest year
pub const YEAR_COLUMN: &str = "Year";
/// Column holding average rainfall (mm/year)
pub const RAINFALL_COLUMN: &str = "average_rain_fall_mm_per_year";
/// Column holding pesticide usage (tonnes)
pub const PESTICIDES_COLUMN: &str = "pesticides_tonnes";
/// Column holding average temperature (°C)
pub const TEMPERATURE_COLUMN: &str = "avg_temp";
/// Column holding the raw country name
pub const AREA_COLUMN: &str = "Area";
/// Prefix of one-hot crop indicator columns
pub const CROP_PREFIX: &str = "Item_";

const AREA_ONE_HOT_PREFIX: &str = "Area_";

/// Role a schema column plays during assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Year,
    Rainfall,
    Pesticides,
    Temperature,
    Area,
    /// One-hot crop indicator
    Crop,
    /// Anything else; always zero-filled
    Other,
}

impl ColumnKind {
    fn classify(column: &str) -> Self {
        match column {
            YEAR_COLUMN => ColumnKind::Year,
            RAINFALL_COLUMN => ColumnKind::Rainfall,
            PESTICIDES_COLUMN => ColumnKind::Pesticides,
            TEMPERATURE_COLUMN => ColumnKind::Temperature,
            AREA_COLUMN => ColumnKind::Area,
            _ => match column.strip_prefix(CROP_PREFIX) {
                Some(crop) if !crop.is_empty() => ColumnKind::Crop,
                _ => ColumnKind::Other,
            },
        }
    }
}

/// Schema inconsistency that does not prevent predictions but degrades them
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaWarning {
    /// Schema one-hot encodes countries, but the country input is only ever
    /// written to the raw `Area` column
    AreaOneHotColumns(Vec<String>),
    /// No raw `Area` column; the country input is dropped
    MissingAreaColumn,
    /// A scalar input has no column and is dropped
    MissingScalarColumn(&'static str),
    /// No crop indicators; every prediction will fail
    NoCropColumns,
    /// Columns that are always zero-filled
    UnmappedColumns(Vec<String>),
}

impl fmt::Display for SchemaWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaWarning::AreaOneHotColumns(columns) => write!(
                f,
                "schema contains {} country one-hot column(s) ({}) that are never set; \
                 predictions for any country are computed as if all were 0",
                columns.len(),
                preview(columns)
            ),
            SchemaWarning::MissingAreaColumn => {
                write!(f, "schema has no '{AREA_COLUMN}' column; the country input is ignored")
            }
            SchemaWarning::MissingScalarColumn(column) => {
                write!(f, "schema has no '{column}' column; that input is ignored")
            }
            SchemaWarning::NoCropColumns => {
                write!(f, "schema has no '{CROP_PREFIX}*' crop columns; no crop can be predicted")
            }
            SchemaWarning::UnmappedColumns(columns) => write!(
                f,
                "{} column(s) are not fed by any input and are always 0: {}",
                columns.len(),
                preview(columns)
            ),
        }
    }
}

fn preview(columns: &[String]) -> String {
    const SHOWN: usize = 5;
    if columns.len() <= SHOWN {
        columns.join(", ")
    } else {
        format!("{}, ... (+{} more)", columns[..SHOWN].join(", "), columns.len() - SHOWN)
    }
}

/// Labels of a text column, in the order the model encodes them
#[derive(Debug, Clone)]
struct Vocabulary {
    labels: Vec<String>,
    codes: HashMap<String, usize>,
}

impl Vocabulary {
    fn new(labels: Vec<String>) -> Self {
        let mut codes = HashMap::with_capacity(labels.len());
        for (code, label) in labels.iter().enumerate() {
            codes.entry(label.clone()).or_insert(code);
        }
        Self { labels, codes }
    }
}

/// On-disk schema artifact: either a bare column list or a described one
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SchemaArtifact {
    Columns(Vec<String>),
    Described {
        columns: Vec<String>,
        #[serde(default)]
        categories: HashMap<String, Vec<String>>,
    },
}

/// Ordered feature columns expected by the model
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    columns: Vec<String>,
    kinds: Vec<ColumnKind>,
    /// Column name -> position
    positions: HashMap<String, usize>,
    /// Crop names in schema order
    crops: Vec<String>,
    /// Crop name -> column position
    crop_index: HashMap<String, usize>,
    /// Column position -> category vocabulary
    vocabularies: HashMap<usize, Vocabulary>,
}

impl FeatureSchema {
    /// Build a schema from an ordered column list
    pub fn new<I, S>(columns: I) -> Result<Self, FeatureError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_categories(columns, HashMap::new())
    }

    /// Build a schema with category vocabularies for its text columns
    pub fn with_categories<I, S>(
        columns: I,
        categories: HashMap<String, Vec<String>>,
    ) -> Result<Self, FeatureError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(FeatureError::EmptySchema);
        }

        let mut positions = HashMap::with_capacity(columns.len());
        for (idx, column) in columns.iter().enumerate() {
            if positions.insert(column.clone(), idx).is_some() {
                return Err(FeatureError::DuplicateColumn(column.clone()));
            }
        }

        let kinds: Vec<ColumnKind> = columns.iter().map(|c| ColumnKind::classify(c)).collect();

        let mut crops = Vec::new();
        let mut crop_index = HashMap::new();
        for (idx, (column, kind)) in columns.iter().zip(&kinds).enumerate() {
            if *kind == ColumnKind::Crop {
                let crop = &column[CROP_PREFIX.len()..];
                crops.push(crop.to_string());
                crop_index.insert(crop.to_string(), idx);
            }
        }

        let mut vocabularies = HashMap::with_capacity(categories.len());
        for (column, labels) in categories {
            let idx = *positions
                .get(&column)
                .ok_or(FeatureError::UnknownCategoryColumn(column))?;
            vocabularies.insert(idx, Vocabulary::new(labels));
        }

        Ok(Self {
            columns,
            kinds,
            positions,
            crops,
            crop_index,
            vocabularies,
        })
    }

    /// Parse a JSON schema artifact
    pub fn from_json_str(json: &str) -> Result<Self, FeatureError> {
        let artifact: SchemaArtifact =
            serde_json::from_str(json).map_err(|e| FeatureError::Malformed(e.to_string()))?;

        match artifact {
            SchemaArtifact::Columns(columns) => Self::new(columns),
            SchemaArtifact::Described {
                columns,
                categories,
            } => Self::with_categories(columns, categories),
        }
    }

    /// Load a JSON schema artifact from disk and log any lint warnings
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FeatureError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| FeatureError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let schema = Self::from_json_str(&json)?;

        info!(
            "Loaded feature schema from {}: {} columns, {} crops",
            path.display(),
            schema.len(),
            schema.crops.len()
        );
        for warning in schema.lint() {
            warn!("Schema drift: {}", warning);
        }

        Ok(schema)
    }

    /// Column names in model order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Column roles, parallel to `columns()`
    pub fn kinds(&self) -> &[ColumnKind] {
        &self.kinds
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always false for a constructed schema
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a column by name
    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }

    /// Crop names derivable from the `Item_*` columns, in schema order
    pub fn crops(&self) -> &[String] {
        &self.crops
    }

    /// Column position of a crop's indicator
    pub fn crop_position(&self, crop: &str) -> Option<usize> {
        self.crop_index.get(crop).copied()
    }

    /// Labels of a text column's vocabulary, if the artifact carried one
    pub fn categories(&self, column: &str) -> Option<&[String]> {
        let idx = self.position(column)?;
        self.vocabularies.get(&idx).map(|v| v.labels.as_slice())
    }

    /// Numeric code of a label in the vocabulary of the column at `idx`
    pub fn category_code(&self, idx: usize, label: &str) -> Option<usize> {
        self.vocabularies.get(&idx)?.codes.get(label).copied()
    }

    /// Report inconsistencies between the schema and the inputs that feed it
    pub fn lint(&self) -> Vec<SchemaWarning> {
        let mut warnings = Vec::new();

        let area_one_hot: Vec<String> = self
            .columns
            .iter()
            .filter(|c| c.starts_with(AREA_ONE_HOT_PREFIX))
            .cloned()
            .collect();
        if !area_one_hot.is_empty() {
            warnings.push(SchemaWarning::AreaOneHotColumns(area_one_hot));
        }

        let present: HashSet<ColumnKind> = self.kinds.iter().copied().collect();
        if !present.contains(&ColumnKind::Area) {
            warnings.push(SchemaWarning::MissingAreaColumn);
        }
        for (kind, column) in [
            (ColumnKind::Year, YEAR_COLUMN),
            (ColumnKind::Rainfall, RAINFALL_COLUMN),
            (ColumnKind::Pesticides, PESTICIDES_COLUMN),
            (ColumnKind::Temperature, TEMPERATURE_COLUMN),
        ] {
            if !present.contains(&kind) {
                warnings.push(SchemaWarning::MissingScalarColumn(column));
            }
        }
        if self.crops.is_empty() {
            warnings.push(SchemaWarning::NoCropColumns);
        }

        // Country one-hots are already reported above
        let unmapped: Vec<String> = self
            .columns
            .iter()
            .zip(&self.kinds)
            .filter(|(c, k)| **k == ColumnKind::Other && !c.starts_with(AREA_ONE_HOT_PREFIX))
            .map(|(c, _)| c.clone())
            .collect();
        if !unmapped.is_empty() {
            warnings.push(SchemaWarning::UnmappedColumns(unmapped));
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_columns() -> Vec<&'static str> {
        vec![
            "Year",
            "average_rain_fall_mm_per_year",
            "pesticides_tonnes",
            "avg_temp",
            "Area",
            "Item_Maize",
            "Item_Rice",
        ]
    }

    #[test]
    fn test_crops_derived_in_schema_order() {
        let schema = FeatureSchema::new(reference_columns()).unwrap();
        assert_eq!(schema.crops(), &["Maize".to_string(), "Rice".to_string()]);
        assert_eq!(schema.crop_position("Rice"), Some(6));
        assert_eq!(schema.crop_position("Wheat"), None);
        assert_eq!(schema.kinds()[4], ColumnKind::Area);
    }

    #[test]
    fn test_position_lookup() {
        let schema = FeatureSchema::new(reference_columns()).unwrap();
        assert_eq!(schema.position("Year"), Some(0));
        assert_eq!(schema.position("Item_Rice"), Some(6));
        assert_eq!(schema.position("Item_Wheat"), None);
    }

    #[test]
    fn test_clean_schema_has_no_warnings() {
        let schema = FeatureSchema::new(reference_columns()).unwrap();
        assert!(schema.lint().is_empty());
    }

    #[test]
    fn test_empty_and_duplicate_rejected() {
        assert!(matches!(
            FeatureSchema::new(Vec::<String>::new()),
            Err(FeatureError::EmptySchema)
        ));
        assert!(matches!(
            FeatureSchema::new(["Year", "Item_Rice", "Year"]),
            Err(FeatureError::DuplicateColumn(c)) if c == "Year"
        ));
    }

    #[test]
    fn test_bare_prefix_is_not_a_crop() {
        let schema = FeatureSchema::new(["Year", "Item_", "Item_Rice"]).unwrap();
        assert_eq!(schema.crops(), &["Rice".to_string()]);
        assert_eq!(schema.kinds()[1], ColumnKind::Other);
    }

    #[test]
    fn test_area_one_hot_columns_are_reported() {
        let mut columns = reference_columns();
        columns.extend(["Area_Bangladesh", "Area_India"]);
        let schema = FeatureSchema::new(columns).unwrap();

        let warnings = schema.lint();
        assert_eq!(
            warnings,
            vec![SchemaWarning::AreaOneHotColumns(vec![
                "Area_Bangladesh".to_string(),
                "Area_India".to_string()
            ])]
        );
        assert!(warnings[0].to_string().contains("never set"));
    }

    #[test]
    fn test_missing_inputs_and_drift_reported() {
        let schema = FeatureSchema::new(["Year", "avg_temp", "soil_ph"]).unwrap();
        let warnings = schema.lint();

        assert!(warnings.contains(&SchemaWarning::MissingAreaColumn));
        assert!(warnings.contains(&SchemaWarning::MissingScalarColumn(RAINFALL_COLUMN)));
        assert!(warnings.contains(&SchemaWarning::MissingScalarColumn(PESTICIDES_COLUMN)));
        assert!(warnings.contains(&SchemaWarning::NoCropColumns));
        assert!(warnings.contains(&SchemaWarning::UnmappedColumns(vec!["soil_ph".to_string()])));
    }

    #[test]
    fn test_json_bare_list() {
        let schema = FeatureSchema::from_json_str(r#"["Year", "Area", "Item_Rice"]"#).unwrap();
        assert_eq!(schema.len(), 3);
        assert_eq!(schema.categories("Area"), None);
    }

    #[test]
    fn test_json_with_categories() {
        let json = r#"{
            "columns": ["Year", "Area", "Item_Rice"],
            "categories": {"Area": ["Albania", "Bangladesh"]}
        }"#;
        let schema = FeatureSchema::from_json_str(json).unwrap();
        assert_eq!(
            schema.categories("Area"),
            Some(&["Albania".to_string(), "Bangladesh".to_string()][..])
        );
        assert_eq!(schema.category_code(1, "Bangladesh"), Some(1));
        assert_eq!(schema.category_code(1, "Chad"), None);
    }

    #[test]
    fn test_json_rejects_unknown_category_column() {
        let json = r#"{"columns": ["Year"], "categories": {"Area": ["Chad"]}}"#;
        assert!(matches!(
            FeatureSchema::from_json_str(json),
            Err(FeatureError::UnknownCategoryColumn(c)) if c == "Area"
        ));
    }

    #[test]
    fn test_json_malformed() {
        assert!(matches!(
            FeatureSchema::from_json_str(r#"{"cols": 3}"#),
            Err(FeatureError::Malformed(_))
        ));
    }

    #[test]
    fn test_load_from_disk() {
        let path = std::env::temp_dir().join(format!(
            "feature-engine-schema-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"["Year", "Area", "Item_Maize"]"#).unwrap();

        let schema = FeatureSchema::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(schema.crops(), &["Maize".to_string()]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = FeatureSchema::load("/nonexistent/model_features.json").unwrap_err();
        assert!(matches!(err, FeatureError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/model_features.json"));
    }
}
