//! One-step prediction and autoregressive multi-step rollout.
//!
//! An N-day forecast from a one-step model re-feeds its own output: predict
//! one step, inverse-scale it, append it to the window, drop the oldest
//! observation, repeat. Each step's error compounds into the next step's
//! input; that accuracy degradation is a property of the method, not a
//! bug. The window lives in a fixed-size ring so there is no
//! append-then-slice aliasing.

use std::collections::VecDeque;

use thiserror::Error;

use crate::{
    model::{ModelError, SequenceModel},
    preprocess::{PreprocessError, make_inference_window},
    scaler::MinMaxScaler,
};

/// Failure anywhere along the predict path.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Predicts the next step from a series of raw (unscaled) closes.
///
/// Returns the model's output for the single window, inverse-scaled back to
/// price space.
pub fn predict_next(
    model: &dyn SequenceModel,
    scaler: &MinMaxScaler,
    closes: &[f64],
) -> Result<Vec<f64>, ForecastError> {
    let window = make_inference_window(closes, scaler, model.look_back())?;
    let raw = model.predict(&window)?;
    Ok(scaler.inverse(&raw))
}

/// Rolls the one-step model forward `steps` times.
///
/// Returns one prediction vector per step, oldest first.
pub fn forecast_rollout(
    model: &dyn SequenceModel,
    scaler: &MinMaxScaler,
    closes: &[f64],
    steps: usize,
) -> Result<Vec<Vec<f64>>, ForecastError> {
    let mut window: VecDeque<f64> = closes.iter().copied().collect();
    let mut predictions = Vec::with_capacity(steps);

    for _ in 0..steps {
        let series: Vec<f64> = window.iter().copied().collect();
        let step = predict_next(model, scaler, &series)?;

        // Slide the ring: every predicted value enters, an equally old
        // observation leaves, so the window length is invariant.
        for &value in &step {
            window.push_back(value);
            window.pop_front();
        }
        predictions.push(step);
    }

    Ok(predictions)
}
