pub mod config;
pub mod error;
pub mod handlers;
pub mod linear;
pub mod models;
pub mod onnx;
pub mod predictor;
