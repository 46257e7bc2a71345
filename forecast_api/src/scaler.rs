//! Pre-fitted min-max scaler artifact.
//!
//! The scaler is external state: fitted once offline, loaded read-only at
//! startup, and only ever applied or inverted here. It is never re-fitted.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading or validating a scaler artifact.
#[derive(Debug, Error)]
pub enum ScalerError {
    #[error("scaler artifact unreadable: {0}")]
    Io(#[from] std::io::Error),

    #[error("scaler artifact malformed: {0}")]
    Parse(#[from] serde_json::Error),

    /// A fitted range with `data_max <= data_min` cannot be inverted.
    #[error("degenerate scaler range: data_min {data_min} >= data_max {data_max}")]
    DegenerateRange { data_min: f64, data_max: f64 },
}

/// Min-max scaler mapping the fitted range onto `[0, 1]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxScaler {
    data_min: f64,
    data_max: f64,
}

impl MinMaxScaler {
    pub fn new(data_min: f64, data_max: f64) -> Result<Self, ScalerError> {
        if data_max <= data_min {
            return Err(ScalerError::DegenerateRange { data_min, data_max });
        }
        Ok(Self { data_min, data_max })
    }

    /// Loads and validates a JSON artifact (`{"data_min": .., "data_max": ..}`).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScalerError> {
        let raw = std::fs::read_to_string(path)?;
        let scaler: Self = serde_json::from_str(&raw)?;
        Self::new(scaler.data_min, scaler.data_max)
    }

    fn range(&self) -> f64 {
        self.data_max - self.data_min
    }

    /// Forward transform of one value into the fitted `[0, 1]` range.
    pub fn transform_value(&self, x: f64) -> f64 {
        (x - self.data_min) / self.range()
    }

    /// Inverse transform of one value back to the original scale.
    pub fn inverse_value(&self, x: f64) -> f64 {
        x * self.range() + self.data_min
    }

    /// Forward transform of a whole series.
    pub fn transform(&self, series: &[f64]) -> Vec<f64> {
        series.iter().map(|&x| self.transform_value(x)).collect()
    }

    /// Inverse transform of a whole series.
    pub fn inverse(&self, series: &[f64]) -> Vec<f64> {
        series.iter().map(|&x| self.inverse_value(x)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_is_identity_within_tolerance() {
        let scaler = MinMaxScaler::new(100.0, 500.0).unwrap();
        for &x in &[100.0, 137.25, 251.3, 499.99, 500.0] {
            let back = scaler.inverse_value(scaler.transform_value(x));
            assert!((back - x).abs() < 1e-9, "round trip drifted for {x}: {back}");
        }
    }

    #[test]
    fn transform_maps_fitted_bounds_to_unit_interval() {
        let scaler = MinMaxScaler::new(100.0, 500.0).unwrap();
        assert_eq!(scaler.transform_value(100.0), 0.0);
        assert_eq!(scaler.transform_value(500.0), 1.0);
    }

    #[test]
    fn degenerate_range_is_rejected() {
        let err = MinMaxScaler::new(5.0, 5.0).unwrap_err();
        assert!(matches!(err, ScalerError::DegenerateRange { .. }));
    }

    #[test]
    fn load_reads_a_json_artifact() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), r#"{"data_min": 100.0, "data_max": 500.0}"#).unwrap();

        let scaler = MinMaxScaler::load(file.path()).unwrap();
        assert_eq!(scaler.transform_value(300.0), 0.5);
    }
}
