//! Short-horizon price forecast service.
//!
//! Wraps a pre-trained sequence model behind an HTTP surface: input series
//! are scaled with a pre-fitted min-max transform, reshaped into the fixed
//! look-back window the model expects, pushed through the forward pass, and
//! inverse-scaled on the way out. Multi-day forecasts are produced by
//! autoregressive rollout over the one-step model.

pub mod error;
pub mod handlers;
pub mod model;
pub mod preprocess;
pub mod rollout;
pub mod scaler;
pub mod server;
pub mod state;
pub mod tensor;
