use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{bail, Context};
use serde::Deserialize;
use tract_onnx::prelude::*;

use crate::error::PredictError;
use crate::models::{FeatureRecord, COLUMNS};
use crate::predictor::Predictor;

type RunnablePlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Sidecar metadata for an ONNX re-export of the trained pipeline.
///
/// The graph takes a single `[1, N]` f32 tensor, so the sidecar records
/// how the feature record maps onto it: the two numeric columns first,
/// then one-hot slots for each fuel level, then one per company level,
/// in the listed order. Lives next to the graph as `<stem>.meta.json`.
#[derive(Debug, Deserialize)]
pub struct OnnxMeta {
    columns: Vec<String>,
    fuel_levels: Vec<String>,
    company_levels: Vec<String>,
}

impl OnnxMeta {
    fn validate(&self) -> anyhow::Result<()> {
        if self.columns != COLUMNS {
            bail!(
                "sidecar column order {:?} does not match expected {:?}",
                self.columns,
                COLUMNS
            );
        }
        if self.fuel_levels.is_empty() || self.company_levels.is_empty() {
            bail!("sidecar categorical vocabularies must not be empty");
        }
        Ok(())
    }

    fn input_width(&self) -> usize {
        2 + self.fuel_levels.len() + self.company_levels.len()
    }

    fn encode(&self, record: &FeatureRecord) -> Result<Vec<f32>, PredictError> {
        let mut values = vec![0.0f32; self.input_width()];
        values[0] = record.year as f32;
        values[1] = record.km_driven as f32;

        let fuel = one_hot_slot(&self.fuel_levels, "fuel", &record.fuel)?;
        values[2 + fuel] = 1.0;
        let company = one_hot_slot(&self.company_levels, "company", &record.company)?;
        values[2 + self.fuel_levels.len() + company] = 1.0;

        Ok(values)
    }
}

fn one_hot_slot(levels: &[String], column: &str, level: &str) -> Result<usize, PredictError> {
    levels
        .iter()
        .position(|l| l == level)
        .ok_or_else(|| PredictError::Inference(format!("unknown {column} value: {level}")))
}

#[derive(Debug)]
pub struct OnnxModel {
    plan: RunnablePlan,
    meta: OnnxMeta,
}

impl OnnxModel {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let meta_path = path.with_extension("meta.json");
        let meta: OnnxMeta = serde_json::from_reader(BufReader::new(
            File::open(&meta_path)
                .with_context(|| format!("opening sidecar {}", meta_path.display()))?,
        ))
        .context("parsing sidecar metadata")?;
        meta.validate()?;

        let plan = tract_onnx::onnx()
            .model_for_path(path)?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1usize, meta.input_width())),
            )?
            .into_optimized()?
            .into_runnable()?;

        Ok(OnnxModel { plan, meta })
    }
}

impl Predictor for OnnxModel {
    fn predict(&self, record: &FeatureRecord) -> Result<f64, PredictError> {
        let values = self.meta.encode(record)?;
        let tensor = Tensor::from_shape(&[1, values.len()], &values)
            .map_err(|e| PredictError::Inference(e.to_string()))?;
        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| PredictError::Inference(e.to_string()))?;
        let view = outputs[0]
            .to_array_view::<f32>()
            .map_err(|e| PredictError::Inference(e.to_string()))?;
        let value = view
            .iter()
            .next()
            .ok_or_else(|| PredictError::Inference("model produced no output".to_string()))?;
        Ok(f64::from(*value))
    }
}
