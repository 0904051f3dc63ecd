use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::PredictError;

/// Column order the model was trained on. Feature records are always
/// presented to the predictor in exactly this order.
pub const COLUMNS: [&str; 4] = ["year", "km_driven", "fuel", "company"];

/// One row of model input.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub year: i64,
    pub km_driven: i64,
    pub fuel: String,
    pub company: String,
}

impl FeatureRecord {
    /// Validates a request body and assembles the feature record.
    ///
    /// `year` and `km_driven` must be JSON integers; `fuel` and `company`
    /// must be strings. Values are otherwise passed through untouched, so
    /// an out-of-vocabulary fuel or company surfaces later as an
    /// inference error.
    pub fn from_json(body: &Value) -> Result<Self, PredictError> {
        let obj = body
            .as_object()
            .ok_or(PredictError::BadBody("request body must be a JSON object"))?;

        let year = require(obj, "year")?
            .as_i64()
            .ok_or(PredictError::InvalidType {
                field: "year",
                expected: "an integer",
            })?;
        let km_driven = require(obj, "km_driven")?
            .as_i64()
            .ok_or(PredictError::InvalidType {
                field: "km_driven",
                expected: "an integer",
            })?;
        let fuel = require(obj, "fuel")?
            .as_str()
            .ok_or(PredictError::InvalidType {
                field: "fuel",
                expected: "a string",
            })?
            .to_string();
        let company = require(obj, "company")?
            .as_str()
            .ok_or(PredictError::InvalidType {
                field: "company",
                expected: "a string",
            })?
            .to_string();

        Ok(FeatureRecord {
            year,
            km_driven,
            fuel,
            company,
        })
    }
}

fn require<'a>(
    obj: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Value, PredictError> {
    obj.get(field).ok_or(PredictError::MissingField(field))
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub prediction: f64,
}
