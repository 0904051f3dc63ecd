use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use log::info;

use crate::error::PredictError;
use crate::linear::LinearModel;
use crate::models::FeatureRecord;
use crate::onnx::OnnxModel;

/// The one capability the service needs from a model: accept a single
/// feature record, return a scalar price estimate.
pub trait Predictor: Send + Sync + std::fmt::Debug {
    fn predict(&self, record: &FeatureRecord) -> Result<f64, PredictError>;
}

/// Loads the model artifact, dispatching on file extension.
///
/// `.json` is a linear model re-export (coefficients as plain numbers),
/// `.onnx` is an ONNX graph with a sidecar metadata file describing its
/// categorical encoding. Any failure here is fatal to start-up.
pub fn load_model(path: &Path) -> anyhow::Result<Arc<dyn Predictor>> {
    let model: Arc<dyn Predictor> = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Arc::new(
            LinearModel::load(path)
                .with_context(|| format!("loading linear model from {}", path.display()))?,
        ),
        Some("onnx") => Arc::new(
            OnnxModel::load(path)
                .with_context(|| format!("loading ONNX model from {}", path.display()))?,
        ),
        _ => bail!("unsupported model artifact format: {}", path.display()),
    };
    info!("model artifact loaded from {}", path.display());
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_model(Path::new("car_price_model_final.pkl")).unwrap_err();
        assert!(err.to_string().contains("unsupported"));
    }

    #[test]
    fn missing_artifact_is_an_error() {
        assert!(load_model(Path::new("no_such_model.json")).is_err());
    }

    #[test]
    fn json_artifact_loads_through_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(crate::linear::tests::TINY_ARTIFACT.as_bytes())
            .unwrap();

        let model = load_model(&path).unwrap();
        let record = FeatureRecord {
            year: 2015,
            km_driven: 45000,
            fuel: "Petrol".to_string(),
            company: "Maruti".to_string(),
        };
        assert!(model.predict(&record).is_ok());
    }
}
