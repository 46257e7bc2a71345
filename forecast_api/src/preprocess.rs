//! Windowed-sequence preprocessing.
//!
//! Turns a flat series of closing prices into the fixed-shape input the
//! sequence model expects: scale with the pre-fitted transform, then slice
//! into `(windows, look_back, 1)` tensors. Length requirements are checked
//! up front so a short series fails with a named error instead of dying
//! inside array indexing.

use thiserror::Error;

use crate::{
    scaler::MinMaxScaler,
    tensor::{ShapeError, Tensor},
};

/// Preprocessing failure.
#[derive(Debug, Error)]
pub enum PreprocessError {
    /// The input series is shorter than the window the model needs.
    #[error("not enough data: need at least {required} values, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// A reshape produced inconsistent dimensions.
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// Builds the single inference window for a one-step forecast.
///
/// Requires `series.len() >= look_back`; the scaled **last** `look_back`
/// values become the window. Output shape is `(1, look_back, 1)`.
pub fn make_inference_window(
    series: &[f64],
    scaler: &MinMaxScaler,
    look_back: usize,
) -> Result<Tensor, PreprocessError> {
    if series.len() < look_back {
        return Err(PreprocessError::InsufficientData {
            required: look_back,
            actual: series.len(),
        });
    }

    let scaled = scaler.transform(series);
    let window = scaled[scaled.len() - look_back..].to_vec();
    Ok(Tensor::from_data(&[1, look_back, 1], window)?)
}

/// Builds the batch of sliding windows for the multi-step variant.
///
/// Requires `series.len() >= look_back + horizon`; yields every window that
/// has a supervised target, shape `(len - look_back - horizon, look_back, 1)`.
pub fn make_inference_windows(
    series: &[f64],
    scaler: &MinMaxScaler,
    look_back: usize,
    horizon: usize,
) -> Result<Tensor, PreprocessError> {
    let required = look_back + horizon;
    if series.len() < required {
        return Err(PreprocessError::InsufficientData {
            required,
            actual: series.len(),
        });
    }

    let scaled = scaler.transform(series);
    let (windows, _targets) = make_training_pairs(&scaled, look_back, horizon)?;
    Ok(windows)
}

/// Slices an already-scaled series into supervised `(X, y)` pairs.
///
/// For `i` in `0 .. len - look_back - horizon` the window is
/// `series[i .. i + look_back]` and the target is
/// `series[i + look_back + horizon - 1]`: the value exactly `horizon`
/// steps past the end of the window, i.e. the *last* day of the horizon.
/// This indexing is what the model was trained against and must not drift.
///
/// A series too short for a single pair yields zero pairs, never an error:
/// the pair count is exactly `max(0, len - look_back - horizon)`.
pub fn make_training_pairs(
    scaled: &[f64],
    look_back: usize,
    horizon: usize,
) -> Result<(Tensor, Vec<f64>), ShapeError> {
    let count = scaled.len().saturating_sub(look_back + horizon);

    let mut windows = Vec::with_capacity(count * look_back);
    let mut targets = Vec::with_capacity(count);
    for i in 0..count {
        windows.extend_from_slice(&scaled[i..i + look_back]);
        targets.push(scaled[i + look_back + horizon - 1]);
    }

    let x = Tensor::from_data(&[count, look_back, 1], windows)?;
    Ok((x, targets))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scaler() -> MinMaxScaler {
        MinMaxScaler::new(0.0, 100.0).unwrap()
    }

    fn series(len: usize) -> Vec<f64> {
        (0..len).map(|i| i as f64).collect()
    }

    #[test]
    fn window_shape_law_holds_at_exact_length() {
        let t = make_inference_window(&series(21), &scaler(), 21).unwrap();
        assert_eq!(t.shape(), &[1, 21, 1]);
    }

    #[test]
    fn window_shape_law_holds_for_longer_series() {
        let t = make_inference_window(&series(60), &scaler(), 21).unwrap();
        assert_eq!(t.shape(), &[1, 21, 1]);
        // The window is the scaled tail, not the head.
        assert_eq!(t.data()[20], 0.59);
        assert_eq!(t.data()[0], 0.39);
    }

    #[test]
    fn twenty_points_for_a_21_look_back_is_insufficient() {
        let err = make_inference_window(&series(20), &scaler(), 21).unwrap_err();
        match err {
            PreprocessError::InsufficientData { required, actual } => {
                assert_eq!(required, 21);
                assert_eq!(actual, 20);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn horizon_variant_needs_look_back_plus_horizon_points() {
        let err = make_inference_windows(&series(27), &scaler(), 21, 7).unwrap_err();
        assert!(matches!(
            err,
            PreprocessError::InsufficientData {
                required: 28,
                actual: 27
            }
        ));

        let t = make_inference_windows(&series(30), &scaler(), 21, 7).unwrap();
        assert_eq!(t.shape(), &[2, 21, 1]);
    }

    #[test]
    fn training_pair_count_law() {
        for (len, look_back, horizon) in [(100, 21, 7), (30, 21, 7), (28, 21, 7), (10, 21, 7)] {
            let (x, y) = make_training_pairs(&series(len), look_back, horizon).unwrap();
            let expected = len.saturating_sub(look_back + horizon);
            assert_eq!(x.shape(), &[expected, look_back, 1], "len={len}");
            assert_eq!(y.len(), expected, "len={len}");
        }
    }

    #[test]
    fn training_target_is_the_last_day_of_the_horizon() {
        let data = series(40);
        let (x, y) = make_training_pairs(&data, 21, 7).unwrap();

        // First window covers indices 0..21; its target sits at 0+21+7-1 = 27.
        assert_eq!(x.slab(0), &data[0..21]);
        assert_eq!(y[0], data[27]);

        // Last window starts at 11 (count = 40-21-7 = 12); target at 38.
        assert_eq!(x.slab(11), &data[11..32]);
        assert_eq!(y[11], data[38]);
    }
}
