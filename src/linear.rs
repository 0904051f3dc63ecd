use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{bail, Context};
use serde::Deserialize;

use crate::error::PredictError;
use crate::models::{FeatureRecord, COLUMNS};
use crate::predictor::Predictor;

/// A trained linear regression re-exported as plain numbers.
///
/// The artifact carries the intercept, one coefficient per numeric
/// column, and one coefficient per observed level of each categorical
/// column (the one-hot encoding folded into a lookup table). A level the
/// model never saw during training has no coefficient and is an
/// inference error, matching how the training pipeline treats unknown
/// categories.
#[derive(Debug, Deserialize)]
pub struct LinearModel {
    columns: Vec<String>,
    intercept: f64,
    numeric: BTreeMap<String, f64>,
    categorical: BTreeMap<String, BTreeMap<String, f64>>,
}

impl LinearModel {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader(reader: impl std::io::Read) -> anyhow::Result<Self> {
        let model: LinearModel =
            serde_json::from_reader(reader).context("parsing linear model artifact")?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.columns != COLUMNS {
            bail!(
                "artifact column order {:?} does not match expected {:?}",
                self.columns,
                COLUMNS
            );
        }
        for col in ["year", "km_driven"] {
            if !self.numeric.contains_key(col) {
                bail!("artifact is missing a coefficient for {col}");
            }
        }
        for col in ["fuel", "company"] {
            if !self.categorical.contains_key(col) {
                bail!("artifact is missing the {col} coefficient table");
            }
        }
        Ok(())
    }

    fn level_weight(&self, column: &str, level: &str) -> Result<f64, PredictError> {
        self.categorical[column]
            .get(level)
            .copied()
            .ok_or_else(|| PredictError::Inference(format!("unknown {column} value: {level}")))
    }
}

impl Predictor for LinearModel {
    fn predict(&self, record: &FeatureRecord) -> Result<f64, PredictError> {
        let mut value = self.intercept;
        value += self.numeric["year"] * record.year as f64;
        value += self.numeric["km_driven"] * record.km_driven as f64;
        value += self.level_weight("fuel", &record.fuel)?;
        value += self.level_weight("company", &record.company)?;
        Ok(value)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    pub const TINY_ARTIFACT: &str = r#"{
        "columns": ["year", "km_driven", "fuel", "company"],
        "intercept": 100000.0,
        "numeric": {"year": 250.0, "km_driven": -0.5},
        "categorical": {
            "fuel": {"Petrol": 1000.0, "Diesel": 3000.0},
            "company": {"Maruti": 2000.0, "Hyundai": 2500.0}
        }
    }"#;

    fn model() -> LinearModel {
        LinearModel::from_reader(TINY_ARTIFACT.as_bytes()).unwrap()
    }

    fn record() -> FeatureRecord {
        FeatureRecord {
            year: 2015,
            km_driven: 45000,
            fuel: "Petrol".to_string(),
            company: "Maruti".to_string(),
        }
    }

    #[test]
    fn prediction_is_the_weighted_sum() {
        let expected = 100000.0 + 250.0 * 2015.0 - 0.5 * 45000.0 + 1000.0 + 2000.0;
        assert_eq!(model().predict(&record()).unwrap(), expected);
    }

    #[test]
    fn prediction_is_deterministic() {
        let model = model();
        let first = model.predict(&record()).unwrap();
        let second = model.predict(&record()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_fuel_is_an_inference_error() {
        let mut record = record();
        record.fuel = "Steam".to_string();
        let err = model().predict(&record).unwrap_err();
        assert!(err.to_string().contains("Steam"));
    }

    #[test]
    fn unknown_company_is_an_inference_error() {
        let mut record = record();
        record.company = "Tucker".to_string();
        assert!(model().predict(&record).is_err());
    }

    #[test]
    fn wrong_column_order_fails_to_load() {
        let artifact = r#"{
            "columns": ["km_driven", "year", "fuel", "company"],
            "intercept": 0.0,
            "numeric": {"year": 1.0, "km_driven": 1.0},
            "categorical": {"fuel": {}, "company": {}}
        }"#;
        assert!(LinearModel::from_reader(artifact.as_bytes()).is_err());
    }

    #[test]
    fn missing_coefficient_table_fails_to_load() {
        let artifact = r#"{
            "columns": ["year", "km_driven", "fuel", "company"],
            "intercept": 0.0,
            "numeric": {"year": 1.0, "km_driven": 1.0},
            "categorical": {"fuel": {}}
        }"#;
        assert!(LinearModel::from_reader(artifact.as_bytes()).is_err());
    }
}
