//! Dense row-major `f64` matrix for layer weights.

use serde::{Deserialize, Serialize};

use super::BipolarVector;
use crate::{Error, Result};

/// Dense `rows × cols` matrix, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self { rows, cols, data: vec![0.0; rows * cols] }
    }

    /// The `0 × 0` matrix. Used for a side with no linked neighbor.
    pub fn empty() -> Self {
        Self::zeros(0, 0)
    }

    /// Build from nested rows. Every row must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let n_rows = rows.len();
        let mut data = Vec::with_capacity(n_rows * cols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(Error::Shape {
                    context: format!("row {i} of matrix"),
                    expected: (n_rows, cols),
                    got: (n_rows, row.len()),
                });
            }
            data.extend(row);
        }
        Ok(Self { rows: n_rows, cols, data })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn get(&self, r: usize, c: usize) -> f64 {
        self.data[r * self.cols + c]
    }

    #[inline]
    pub fn set(&mut self, r: usize, c: usize, value: f64) {
        self.data[r * self.cols + c] = value;
    }

    pub fn row(&self, r: usize) -> &[f64] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    /// Overwrite row `r` with a bipolar vector.
    pub fn set_row(&mut self, r: usize, v: &BipolarVector) {
        debug_assert_eq!(v.dim(), self.cols);
        for (dst, c) in self.data[r * self.cols..(r + 1) * self.cols].iter_mut().zip(v.iter()) {
            *dst = c as f64;
        }
    }

    /// Overwrite column `c` with a bipolar vector.
    pub fn set_column(&mut self, c: usize, v: &BipolarVector) {
        debug_assert_eq!(v.dim(), self.rows);
        for (r, value) in v.iter().enumerate() {
            self.set(r, c, value as f64);
        }
    }

    /// Accumulate `scale · v vᵀ`.
    pub fn add_outer(&mut self, v: &BipolarVector, scale: f64) {
        debug_assert_eq!(self.shape(), (v.dim(), v.dim()));
        let s = v.as_slice();
        for (r, &a) in s.iter().enumerate() {
            let row = &mut self.data[r * self.cols..(r + 1) * self.cols];
            for (dst, &b) in row.iter_mut().zip(s) {
                *dst += scale * (a as f64) * (b as f64);
            }
        }
    }

    pub fn zero_diagonal(&mut self) {
        for i in 0..self.rows.min(self.cols) {
            self.set(i, i, 0.0);
        }
    }

    /// `M · v` for a bipolar `v` of length `cols`.
    pub fn mul_bipolar(&self, v: &BipolarVector) -> Vec<f64> {
        debug_assert_eq!(v.dim(), self.cols);
        (0..self.rows)
            .map(|r| {
                self.row(r)
                    .iter()
                    .zip(v.iter())
                    .map(|(&w, c)| w * c as f64)
                    .sum()
            })
            .collect()
    }

    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|&w| w == 0.0)
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|w| w.is_finite())
    }

    pub fn is_symmetric(&self) -> bool {
        self.rows == self.cols
            && (0..self.rows).all(|r| (r + 1..self.cols).all(|c| self.get(r, c) == self.get(c, r)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ragged_rows_are_rejected() {
        let err = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, Error::Shape { .. }));
    }

    #[test]
    fn multiply_by_bipolar() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![0.5, -0.5, 0.0]]).unwrap();
        let v = BipolarVector::new(vec![1, -1, 1]).unwrap();
        assert_eq!(m.mul_bipolar(&v), vec![2.0, 1.0]);
    }

    #[test]
    fn outer_product_with_zeroed_diagonal_is_symmetric() {
        let v = BipolarVector::new(vec![1, -1, -1, 1]).unwrap();
        let mut m = Matrix::zeros(4, 4);
        m.add_outer(&v, 1.0);
        m.zero_diagonal();
        assert!(m.is_symmetric());
        assert_eq!(m.get(0, 1), -1.0);
        assert_eq!(m.get(0, 3), 1.0);
        assert_eq!(m.get(2, 2), 0.0);
    }

    #[test]
    fn set_row_and_column() {
        let v = BipolarVector::new(vec![1, -1]).unwrap();
        let mut m = Matrix::zeros(2, 2);
        m.set_row(0, &v);
        assert_eq!(m.row(0), &[1.0, -1.0]);
        m.set_column(1, &v);
        assert_eq!(m.get(0, 1), 1.0);
        assert_eq!(m.get(1, 1), -1.0);
    }
}
