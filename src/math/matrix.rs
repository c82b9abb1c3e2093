use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::activation::activation::{sigmoid, sigmoid_grad, softmax_into};
use crate::math::error::MatrixError;

/// Dense row-major matrix of `f64`.
///
/// Element `(r, c)` lives at `values[cols * r + c]` and
/// `values.len() == rows * cols` holds after every operation. `Clone` gives
/// an independent copy; nothing is shared between matrices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl Matrix {
    /// Empty 0x0 matrix.
    pub fn new() -> Matrix {
        Matrix::default()
    }

    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            values: vec![0.0; rows * cols],
        }
    }

    pub fn from_vec(rows: usize, cols: usize, values: Vec<f64>) -> Result<Matrix, MatrixError> {
        if values.len() != rows * cols {
            return Err(MatrixError::LengthMismatch { rows, cols, len: values.len() });
        }
        Ok(Matrix { rows, cols, values })
    }

    /// Builds a matrix from nested rows. All rows must have the same length.
    pub fn from_rows(data: &[Vec<f64>]) -> Result<Matrix, MatrixError> {
        let rows = data.len();
        let cols = data.first().map_or(0, |r| r.len());
        let mut values = Vec::with_capacity(rows * cols);
        for row in data {
            if row.len() != cols {
                return Err(MatrixError::ShapeMismatch {
                    op: "from_rows",
                    left: (1, cols),
                    right: (1, row.len()),
                });
            }
            values.extend_from_slice(row);
        }
        Ok(Matrix { rows, cols, values })
    }

    /// Samples every element from N(0, std_dev) using the caller's generator.
    pub fn random_normal<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        std_dev: f64,
        rng: &mut R,
    ) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        res.fill_normal(std_dev, rng);
        res
    }

    /// Overwrites every element with a sample from N(0, std_dev).
    pub fn fill_normal<R: Rng + ?Sized>(&mut self, std_dev: f64, rng: &mut R) {
        match Normal::new(0.0, std_dev) {
            Ok(dist) => {
                for v in self.values.iter_mut() {
                    *v = dist.sample(rng);
                }
            }
            // Negative or NaN std.
            Err(_) => self.values.iter_mut().for_each(|v| *v = 0.0),
        }
    }

    /// Reshapes to `rows x cols` zeros, discarding previous content.
    pub fn make(&mut self, rows: usize, cols: usize) {
        self.rows = rows;
        self.cols = cols;
        self.values.clear();
        self.values.resize(rows * cols, 0.0);
    }

    /// Reshapes to `rows x cols` and copies `values` in row-major order.
    pub fn make_from(&mut self, rows: usize, cols: usize, values: &[f64]) -> Result<(), MatrixError> {
        if values.len() != rows * cols {
            return Err(MatrixError::LengthMismatch { rows, cols, len: values.len() });
        }
        self.rows = rows;
        self.cols = cols;
        self.values.clear();
        self.values.extend_from_slice(values);
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.values
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }

    /// Panics if `(r, c)` is out of bounds.
    pub fn at(&self, r: usize, c: usize) -> f64 {
        assert!(r < self.rows && c < self.cols, "index ({}, {}) out of bounds", r, c);
        self.values[self.cols * r + c]
    }

    /// Panics if `(r, c)` is out of bounds.
    pub fn at_mut(&mut self, r: usize, c: usize) -> &mut f64 {
        assert!(r < self.rows && c < self.cols, "index ({}, {}) out of bounds", r, c);
        &mut self.values[self.cols * r + c]
    }

    pub fn row(&self, r: usize) -> &[f64] {
        &self.values[self.cols * r..self.cols * (r + 1)]
    }

    /// Column index of the largest value in row `r`.
    ///
    /// Uses a strictly-greater scan, so ties go to the lowest index.
    pub fn argmax_row(&self, r: usize) -> usize {
        let row = self.row(r);
        let mut best = 0;
        for (j, &v) in row.iter().enumerate().skip(1) {
            if v > row[best] {
                best = j;
            }
        }
        best
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for r in 0..self.rows {
            for c in 0..self.cols {
                res.values[self.rows * c + r] = self.values[self.cols * r + c];
            }
        }

        res
    }

    /// Matrix product `self · other`.
    pub fn dot(&self, other: &Matrix) -> Result<Matrix, MatrixError> {
        if self.cols != other.rows {
            return Err(MatrixError::IncompatibleDot {
                left: self.shape(),
                right: other.shape(),
            });
        }

        let n = self.cols;
        let mut res = Matrix::zeros(self.rows, other.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..n {
                    sum += self.values[n * i + k] * other.values[other.cols * k + j];
                }

                res.values[res.cols * i + j] = sum;
            }
        }

        Ok(res)
    }

    pub fn add(&self, other: &Matrix) -> Result<Matrix, MatrixError> {
        self.zip_with(other, "add", |a, b| a + b)
    }

    pub fn sub(&self, other: &Matrix) -> Result<Matrix, MatrixError> {
        self.zip_with(other, "sub", |a, b| a - b)
    }

    /// Elementwise (Hadamard) product.
    pub fn mul(&self, other: &Matrix) -> Result<Matrix, MatrixError> {
        self.zip_with(other, "mul", |a, b| a * b)
    }

    pub fn scale(&self, t: f64) -> Matrix {
        self.map(|x| x * t)
    }

    /// Elementwise division by a scalar; `t == 0` yields inf/NaN.
    pub fn div(&self, t: f64) -> Matrix {
        self.map(|x| x / t)
    }

    /// Adds the `1 x cols` row `bias` to every row of `self`.
    pub fn add_row_broadcast(&self, bias: &Matrix) -> Result<Matrix, MatrixError> {
        if bias.rows != 1 || bias.cols != self.cols {
            return Err(MatrixError::ShapeMismatch {
                op: "add_row_broadcast",
                left: self.shape(),
                right: bias.shape(),
            });
        }
        let mut res = self.clone();
        if self.cols > 0 {
            for row in res.values.chunks_exact_mut(self.cols) {
                for (v, b) in row.iter_mut().zip(bias.values.iter()) {
                    *v += *b;
                }
            }
        }
        Ok(res)
    }

    /// Column-wise sum, `1 x cols`.
    pub fn sum(&self) -> Matrix {
        let mut res = Matrix::zeros(1, self.cols);
        if self.cols > 0 {
            for row in self.values.chunks_exact(self.cols) {
                for (acc, v) in res.values.iter_mut().zip(row.iter()) {
                    *acc += *v;
                }
            }
        }
        res
    }

    pub fn sigmoid(&self) -> Matrix {
        self.map(sigmoid)
    }

    /// `sigmoid(v) * (1 - sigmoid(v))` for each pre-activation `v`.
    pub fn sigmoid_grad(&self) -> Matrix {
        self.map(sigmoid_grad)
    }

    /// Row-wise softmax.
    pub fn softmax(&self) -> Matrix {
        let mut res = Matrix::zeros(self.rows, self.cols);
        if self.cols > 0 {
            for (src, dst) in self
                .values
                .chunks_exact(self.cols)
                .zip(res.values.chunks_exact_mut(self.cols))
            {
                softmax_into(src, dst);
            }
        }
        res
    }

    /// Appends the rows of `other` below `self`.
    ///
    /// An empty 0x0 receiver adopts `other`'s column count first. On a column
    /// mismatch `self` is left untouched.
    pub fn add_rows(&mut self, other: &Matrix) -> Result<(), MatrixError> {
        if self.rows == 0 && self.cols == 0 {
            self.make(0, other.cols);
        }
        if self.cols != other.cols {
            return Err(MatrixError::ShapeMismatch {
                op: "add_rows",
                left: self.shape(),
                right: other.shape(),
            });
        }
        self.rows += other.rows;
        self.values.extend_from_slice(&other.values);
        Ok(())
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            values: self.values.iter().map(|&x| functor(x)).collect(),
        }
    }

    fn zip_with<F>(&self, other: &Matrix, op: &'static str, f: F) -> Result<Matrix, MatrixError>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.shape() != other.shape() {
            return Err(MatrixError::ShapeMismatch {
                op,
                left: self.shape(),
                right: other.shape(),
            });
        }
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            values: self
                .values
                .iter()
                .zip(other.values.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }
}
