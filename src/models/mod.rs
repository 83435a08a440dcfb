//! Model handles and inference

pub mod inference;
pub mod linear;
pub mod loader;
pub mod onnx;
pub mod regressor;

pub use inference::AgePredictor;
pub use linear::LinearRegressor;
pub use loader::ModelLoader;
pub use onnx::OnnxRegressor;
pub use regressor::Regressor;
