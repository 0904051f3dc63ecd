use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Anything that can go wrong while answering a `/predict` request.
///
/// Every variant is reported to the caller as HTTP 400 with
/// `{"error": "<message>"}`; client input errors and model errors are
/// deliberately not distinguished on the wire.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("{field} must be {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("{0}")]
    BadBody(&'static str),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ResponseError for PredictError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::BadRequest().json(ErrorBody {
            error: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_maps_to_400() {
        let errors = [
            PredictError::MissingField("year"),
            PredictError::InvalidType {
                field: "km_driven",
                expected: "an integer",
            },
            PredictError::Inference("unknown fuel value: Steam".to_string()),
            PredictError::BadBody("request body must be a JSON object"),
        ];
        for err in errors {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn messages_name_the_offending_field() {
        assert!(PredictError::MissingField("year").to_string().contains("year"));
        let err = PredictError::InvalidType {
            field: "km_driven",
            expected: "an integer",
        };
        assert_eq!(err.to_string(), "km_driven must be an integer");
    }
}
