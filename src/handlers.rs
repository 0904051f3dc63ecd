use actix_web::{web, HttpResponse, Responder};
use log::{debug, warn};
use serde_json::{json, Value};

use crate::error::PredictError;
use crate::models::{FeatureRecord, PredictionResponse};
use crate::predictor::Predictor;

/// Liveness probe. Body kept verbatim for drop-in compatibility with
/// existing clients of the service this replaces.
pub async fn home() -> impl Responder {
    HttpResponse::Ok().body("Hello, Flask!")
}

pub async fn predict(
    model: web::Data<dyn Predictor>,
    body: web::Json<Value>,
) -> Result<HttpResponse, PredictError> {
    let record = FeatureRecord::from_json(&body).map_err(|e| {
        warn!("rejected request: {e}");
        e
    })?;

    let prediction = model.predict(&record).map_err(|e| {
        warn!("prediction failed for {record:?}: {e}");
        e
    })?;
    debug!("prediction for {record:?}: {prediction}");

    Ok(HttpResponse::Ok().json(PredictionResponse { prediction }))
}

/// Registers the service's two routes.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home))
        .service(web::resource("/predict").route(web::post().to(predict)));
}

/// JSON extractor config that reports unparseable bodies in the same
/// `{"error": ...}` shape as every other failure, with status 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        actix_web::error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(json!({ "error": message })),
        )
        .into()
    })
}
