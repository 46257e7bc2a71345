//! Pre-trained sequence model artifact.
//!
//! The model is an external collaborator: trained offline, loaded read-only
//! at startup, forward pass only. [`SequenceModel`] is the seam the HTTP
//! layer talks to; [`LinearModel`] is the concrete artifact format, a
//! single-output linear readout over the flattened scaled window.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::tensor::Tensor;

/// Errors loading or running a model artifact.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model artifact unreadable: {0}")]
    Io(#[from] std::io::Error),

    #[error("model artifact malformed: {0}")]
    Parse(#[from] serde_json::Error),

    /// The artifact parsed but its own dimensions disagree.
    #[error("model artifact invalid: {0}")]
    Artifact(String),

    /// The input tensor does not match the window the model was trained on.
    #[error("input shape mismatch: expected {expected:?}, got {actual:?}")]
    Shape {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
}

/// A loaded sequence model: fixed look-back in, one scaled value out per
/// window. Implementations must be safe for concurrent read-only use.
pub trait SequenceModel: Send + Sync {
    /// Number of past observations one window holds.
    fn look_back(&self) -> usize;

    /// Forward pass over a `(windows, look_back, 1)` tensor; returns one
    /// scaled prediction per window.
    fn predict(&self, input: &Tensor) -> Result<Vec<f64>, ModelError>;
}

/// Linear readout artifact: `y = w · window + b` in scaled space.
#[derive(Debug, Deserialize)]
pub struct LinearModel {
    look_back: usize,
    weights: Vec<f64>,
    bias: f64,
}

impl LinearModel {
    /// Loads and validates a JSON artifact
    /// (`{"look_back": .., "weights": [..], "bias": ..}`).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let raw = std::fs::read_to_string(path)?;
        let model: Self = serde_json::from_str(&raw)?;

        if model.look_back == 0 {
            return Err(ModelError::Artifact("look_back must be positive".into()));
        }
        if model.weights.len() != model.look_back {
            return Err(ModelError::Artifact(format!(
                "weight vector has {} entries for a look_back of {}",
                model.weights.len(),
                model.look_back
            )));
        }
        Ok(model)
    }

    #[cfg(test)]
    pub fn from_parts(look_back: usize, weights: Vec<f64>, bias: f64) -> Self {
        Self {
            look_back,
            weights,
            bias,
        }
    }
}

impl SequenceModel for LinearModel {
    fn look_back(&self) -> usize {
        self.look_back
    }

    fn predict(&self, input: &Tensor) -> Result<Vec<f64>, ModelError> {
        let shape = input.shape();
        let well_formed = shape.len() == 3 && shape[1] == self.look_back && shape[2] == 1;
        if !well_formed {
            let batch = shape.first().copied().unwrap_or(1);
            return Err(ModelError::Shape {
                expected: vec![batch, self.look_back, 1],
                actual: shape.to_vec(),
            });
        }

        let batch = shape[0];
        let mut out = Vec::with_capacity(batch);
        for w in 0..batch {
            let window = input.slab(w);
            let dot: f64 = window
                .iter()
                .zip(&self.weights)
                .map(|(x, w)| x * w)
                .sum();
            out.push(dot + self.bias);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A "persistence" model that just echoes the newest observation.
    fn last_value_model(look_back: usize) -> LinearModel {
        let mut weights = vec![0.0; look_back];
        weights[look_back - 1] = 1.0;
        LinearModel::from_parts(look_back, weights, 0.0)
    }

    #[test]
    fn predicts_one_value_per_window() {
        let model = last_value_model(3);
        let input = Tensor::from_data(&[2, 3, 1], vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6]).unwrap();

        let out = model.predict(&input).unwrap();
        assert_eq!(out, vec![0.3, 0.6]);
    }

    #[test]
    fn wrong_look_back_is_a_shape_error() {
        let model = last_value_model(3);
        let input = Tensor::from_data(&[1, 4, 1], vec![0.1; 4]).unwrap();

        let err = model.predict(&input).unwrap_err();
        match err {
            ModelError::Shape { expected, actual } => {
                assert_eq!(expected, vec![1, 3, 1]);
                assert_eq!(actual, vec![1, 4, 1]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_rejects_inconsistent_artifacts() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            r#"{"look_back": 3, "weights": [0.0, 1.0], "bias": 0.0}"#,
        )
        .unwrap();

        let err = LinearModel::load(file.path()).unwrap_err();
        assert!(matches!(err, ModelError::Artifact(_)));
    }

    #[test]
    fn load_accepts_a_valid_artifact() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            r#"{"look_back": 2, "weights": [0.5, 0.5], "bias": 0.1}"#,
        )
        .unwrap();

        let model = LinearModel::load(file.path()).unwrap();
        assert_eq!(model.look_back(), 2);

        let input = Tensor::from_data(&[1, 2, 1], vec![0.2, 0.4]).unwrap();
        let out = model.predict(&input).unwrap();
        assert!((out[0] - 0.4).abs() < 1e-12);
    }
}
