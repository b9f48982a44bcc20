//! Feature Row Assembly

use crate::input::YieldInput;
use crate::row::{FeatureRow, FeatureValue};
use crate::schema::{ColumnKind, FeatureSchema};
use crate::FeatureError;
use std::sync::Arc;
use tracing::debug;

/// Builds model input rows against a fixed schema
#[derive(Debug, Clone)]
pub struct FeatureAssembler {
    schema: Arc<FeatureSchema>,
}

impl FeatureAssembler {
    /// Create an assembler for the given schema
    pub fn new(schema: Arc<FeatureSchema>) -> Self {
        Self { schema }
    }

    /// Schema rows are assembled against
    pub fn schema(&self) -> &Arc<FeatureSchema> {
        &self.schema
    }

    /// Crops this assembler accepts
    pub fn crops(&self) -> &[String] {
        self.schema.crops()
    }

    /// Assemble one row in schema order.
    ///
    /// Scalars land in their named columns, the requested crop's indicator is
    /// set to 1 and every other crop indicator to 0. Columns no input feeds
    /// are zero-filled, and inputs with no column are dropped.
    pub fn assemble(&self, input: &YieldInput) -> Result<FeatureRow, FeatureError> {
        let crop_position =
            self.schema
                .crop_position(&input.crop)
                .ok_or_else(|| FeatureError::UnknownCrop {
                    crop: input.crop.clone(),
                    available: self.schema.crops().to_vec(),
                })?;

        let values = self
            .schema
            .kinds()
            .iter()
            .enumerate()
            .map(|(idx, kind)| match kind {
                ColumnKind::Year => FeatureValue::Int(i64::from(input.year)),
                ColumnKind::Rainfall => FeatureValue::Float(input.rainfall),
                ColumnKind::Pesticides => FeatureValue::Float(input.pesticides),
                ColumnKind::Temperature => FeatureValue::Float(input.temperature),
                ColumnKind::Area => FeatureValue::Text(input.area.clone()),
                ColumnKind::Crop => FeatureValue::Int(i64::from(idx == crop_position)),
                ColumnKind::Other => FeatureValue::Int(0),
            })
            .collect();

        debug!(
            "Assembled feature row: crop={}, area={}, year={}, columns={}",
            input.crop,
            input.area,
            input.year,
            self.schema.len()
        );

        Ok(FeatureRow::new(Arc::clone(&self.schema), values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{PESTICIDES_COLUMN, RAINFALL_COLUMN, TEMPERATURE_COLUMN, YEAR_COLUMN};
    use proptest::prelude::*;
    use proptest::sample::Index;
    use std::collections::{HashMap, HashSet};

    fn reference_assembler() -> FeatureAssembler {
        let schema = FeatureSchema::new([
            "Year",
            "average_rain_fall_mm_per_year",
            "pesticides_tonnes",
            "avg_temp",
            "Area",
            "Item_Maize",
            "Item_Rice",
        ])
        .unwrap();
        FeatureAssembler::new(Arc::new(schema))
    }

    #[test]
    fn test_reference_scenario() {
        let assembler = reference_assembler();
        let input = YieldInput {
            year: 2025,
            rainfall: 2000.0,
            temperature: 25.0,
            pesticides: 450.0,
            area: "Bangladesh".to_string(),
            crop: "Rice".to_string(),
        };

        let row = assembler.assemble(&input).unwrap();
        let expected: Vec<(&str, FeatureValue)> = vec![
            ("Year", 2025i64.into()),
            ("average_rain_fall_mm_per_year", 2000.0.into()),
            ("pesticides_tonnes", 450.0.into()),
            ("avg_temp", 25.0.into()),
            ("Area", "Bangladesh".into()),
            ("Item_Maize", 0i64.into()),
            ("Item_Rice", 1i64.into()),
        ];
        let actual: Vec<(&str, FeatureValue)> =
            row.columns().map(|(c, v)| (c, v.clone())).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_row_serializes_in_schema_order() {
        let row = reference_assembler()
            .assemble(&YieldInput::for_crop("Maize"))
            .unwrap();
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(
            json,
            r#"{"Year":2025,"average_rain_fall_mm_per_year":2000.0,"pesticides_tonnes":450.0,"avg_temp":25.0,"Area":"Bangladesh","Item_Maize":1,"Item_Rice":0}"#
        );
    }

    #[test]
    fn test_unknown_crop_fails() {
        let err = reference_assembler()
            .assemble(&YieldInput::for_crop("Cassava"))
            .unwrap_err();
        match err {
            FeatureError::UnknownCrop { crop, available } => {
                assert_eq!(crop, "Cassava");
                assert_eq!(available, vec!["Maize".to_string(), "Rice".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_crop_match_is_exact() {
        let assembler = reference_assembler();
        assert!(assembler.assemble(&YieldInput::for_crop("rice")).is_err());
        assert!(assembler.assemble(&YieldInput::for_crop("Item_Rice")).is_err());
        assert!(assembler.assemble(&YieldInput::for_crop("")).is_err());
    }

    #[test]
    fn test_unfed_columns_zero_filled_and_area_one_hot_untouched() {
        let schema = FeatureSchema::new([
            "Area_Bangladesh",
            "Year",
            "Item_Wheat",
            "soil_ph",
            "Item_Potatoes",
        ])
        .unwrap();
        let assembler = FeatureAssembler::new(Arc::new(schema));
        let row = assembler.assemble(&YieldInput::for_crop("Potatoes")).unwrap();

        assert_eq!(row.len(), 5);
        assert_eq!(row.column("Area_Bangladesh"), Some(&FeatureValue::Int(0)));
        assert_eq!(row.column("soil_ph"), Some(&FeatureValue::Int(0)));
        assert_eq!(row.column("Item_Wheat"), Some(&FeatureValue::Int(0)));
        assert_eq!(row.column("Item_Potatoes"), Some(&FeatureValue::Int(1)));
        // Area has no column, so it is dropped
        assert_eq!(row.column("Area"), None);
    }

    #[test]
    fn test_encode_uses_vocabulary() {
        let mut categories = HashMap::new();
        categories.insert(
            "Area".to_string(),
            vec!["Albania".to_string(), "Bangladesh".to_string()],
        );
        let schema =
            FeatureSchema::with_categories(["Year", "Area", "Item_Rice"], categories).unwrap();
        let assembler = FeatureAssembler::new(Arc::new(schema));

        let encoded = assembler
            .assemble(&YieldInput::for_crop("Rice"))
            .unwrap()
            .encode_f32();
        assert_eq!(encoded, vec![2025.0, 1.0, 1.0]);

        let unknown = YieldInput {
            area: "Atlantis".to_string(),
            ..YieldInput::for_crop("Rice")
        };
        let encoded = assembler.assemble(&unknown).unwrap().encode_f32();
        assert!(encoded[1].is_nan());
    }

    fn schema_strategy() -> impl Strategy<Value = (Vec<String>, Vec<String>)> {
        (
            prop::collection::hash_set("[A-Z][a-z]{2,8}", 1..6),
            prop::collection::hash_set("x_[a-z]{3,6}", 0..4),
            any::<bool>(),
        )
            .prop_flat_map(|(crops, extras, with_area)| {
                let crops: Vec<String> = crops.into_iter().collect();
                let mut columns: Vec<String> = [
                    YEAR_COLUMN,
                    RAINFALL_COLUMN,
                    PESTICIDES_COLUMN,
                    TEMPERATURE_COLUMN,
                ]
                .iter()
                .map(|c| c.to_string())
                .collect();
                if with_area {
                    columns.push("Area".to_string());
                }
                columns.extend(crops.iter().map(|c| format!("Item_{c}")));
                columns.extend(extras);
                (Just(columns).prop_shuffle(), Just(crops))
            })
    }

    fn input_strategy() -> impl Strategy<Value = YieldInput> {
        (
            1960i32..=2035,
            0.0f64..5000.0,
            -10.0f64..45.0,
            0.0f64..400_000.0,
            "[A-Za-z ]{0,20}",
        )
            .prop_map(|(year, rainfall, temperature, pesticides, area)| YieldInput {
                year,
                rainfall,
                temperature,
                pesticides,
                area,
                crop: String::new(),
            })
    }

    proptest! {
        #[test]
        fn prop_row_matches_schema_exactly(
            (columns, crops) in schema_strategy(),
            pick in any::<Index>(),
            input in input_strategy(),
        ) {
            let schema = Arc::new(FeatureSchema::new(columns.clone()).unwrap());
            let assembler = FeatureAssembler::new(schema);
            let input = YieldInput { crop: pick.get(&crops).clone(), ..input };

            let row = assembler.assemble(&input).unwrap();
            let row_columns: Vec<&str> = row.columns().map(|(c, _)| c).collect();

            prop_assert_eq!(&row_columns, &columns);
            let unique: HashSet<&str> = row_columns.iter().copied().collect();
            prop_assert_eq!(unique.len(), columns.len());
        }

        #[test]
        fn prop_exactly_one_crop_indicator_set(
            (columns, crops) in schema_strategy(),
            pick in any::<Index>(),
            input in input_strategy(),
        ) {
            let assembler = FeatureAssembler::new(Arc::new(FeatureSchema::new(columns).unwrap()));
            let chosen = pick.get(&crops).clone();
            let row = assembler.assemble(&YieldInput { crop: chosen.clone(), ..input }).unwrap();

            for crop in &crops {
                let expected = i64::from(*crop == chosen);
                prop_assert_eq!(
                    row.column(&format!("Item_{crop}")),
                    Some(&FeatureValue::Int(expected))
                );
            }
        }

        #[test]
        fn prop_assembly_is_idempotent(
            (columns, crops) in schema_strategy(),
            pick in any::<Index>(),
            input in input_strategy(),
        ) {
            let assembler = FeatureAssembler::new(Arc::new(FeatureSchema::new(columns).unwrap()));
            let input = YieldInput { crop: pick.get(&crops).clone(), ..input };

            prop_assert_eq!(assembler.assemble(&input).unwrap(), assembler.assemble(&input).unwrap());
        }
    }
}
