//! Minimal tensor type for the model's fixed-shape inputs.
//!
//! Forecast inputs are always three-dimensional, `(windows, look_back, 1)`
//! with a single feature channel, so this stays a thin shape-checked
//! wrapper over a flat row-major buffer rather than a general array type.

use thiserror::Error;

/// A buffer whose length disagrees with the requested dimensions.
#[derive(Debug, Error)]
#[error(
    "shape mismatch: expected {expected:?} ({expected_len} elements), got {actual_len} elements"
)]
pub struct ShapeError {
    /// The dimensions the caller asked for.
    pub expected: Vec<usize>,
    /// Element count those dimensions imply.
    pub expected_len: usize,
    /// Element count actually supplied.
    pub actual_len: usize,
}

/// A multi-dimensional array in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Vec<usize>,
    data: Vec<f64>,
}

impl Tensor {
    /// Creates a tensor with the given shape and data.
    ///
    /// Fails with [`ShapeError`] when the data length does not match the
    /// shape's element count.
    pub fn from_data(shape: &[usize], data: Vec<f64>) -> Result<Self, ShapeError> {
        let expected_len: usize = shape.iter().product();
        if data.len() != expected_len {
            return Err(ShapeError {
                expected: shape.to_vec(),
                expected_len,
                actual_len: data.len(),
            });
        }
        Ok(Self {
            shape: shape.to_vec(),
            data,
        })
    }

    /// Returns the shape of the tensor.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the total number of elements.
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Returns a reference to the underlying row-major data.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Returns the flattened `index`-th slab along the first dimension.
    ///
    /// For a `(windows, look_back, 1)` tensor this is one look-back window.
    pub fn slab(&self, index: usize) -> &[f64] {
        let slab_len: usize = self.shape[1..].iter().product();
        &self.data[index * slab_len..(index + 1) * slab_len]
    }
}
