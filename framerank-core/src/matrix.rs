// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Row-major feature matrix view
//!
//! The engine never owns feature data. Callers hand it a flat buffer of
//! `rows * dim` floats for the duration of one selection call, and
//! [`FeatureMatrix`] exposes zero-copy row access over it.

use crate::error::{Result, SelectError};

/// Immutable, non-owning view over a row-major `rows x dim` f32 buffer.
///
/// Row `i` occupies `data[i * dim .. (i + 1) * dim]`. The view borrows the
/// caller's buffer, so the data cannot change for the lifetime of the view.
#[derive(Debug, Clone, Copy)]
pub struct FeatureMatrix<'a> {
    data: &'a [f32],
    rows: usize,
    dim: usize,
}

impl<'a> FeatureMatrix<'a> {
    /// Create a view, validating that the buffer holds exactly `rows * dim` floats.
    pub fn new(data: &'a [f32], rows: usize, dim: usize) -> Result<Self> {
        let expected = rows.checked_mul(dim);
        if expected != Some(data.len()) {
            return Err(SelectError::InvalidInput(format!(
                "feature buffer has {} floats, expected {} rows x {} columns",
                data.len(),
                rows,
                dim
            )));
        }
        Ok(Self { data, rows, dim })
    }

    /// Number of candidate rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Feature dimension shared by every row.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Borrow row `i` without copying.
    ///
    /// # Panics
    /// Panics if `i >= rows()`.
    #[inline]
    pub fn row(&self, i: usize) -> &'a [f32] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    /// The underlying flat buffer.
    #[inline]
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_access() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mat = FeatureMatrix::new(&data, 2, 3).unwrap();
        assert_eq!(mat.rows(), 2);
        assert_eq!(mat.dim(), 3);
        assert_eq!(mat.row(0), &[1.0, 2.0, 3.0]);
        assert_eq!(mat.row(1), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_length_validation() {
        let data = vec![1.0; 7];
        assert!(matches!(
            FeatureMatrix::new(&data, 2, 3),
            Err(SelectError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_empty_matrix() {
        let mat = FeatureMatrix::new(&[], 0, 32).unwrap();
        assert_eq!(mat.rows(), 0);
        assert_eq!(mat.dim(), 32);
    }

    #[test]
    fn test_overflow_rejected() {
        // rows * dim overflows usize; must be an error, not a panic
        assert!(FeatureMatrix::new(&[], usize::MAX, 2).is_err());
    }
}
