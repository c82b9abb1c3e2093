pub mod mnist;

pub use mnist::DataSet;

use crate::math::{error::MatrixError, matrix::Matrix};

/// A labelled sample source the training loop draws batches from.
pub trait Samples {
    /// Number of samples.
    fn size(&self) -> usize;

    /// Sample `index` as a `1 x features` row, or `None` past the end.
    fn image_to_matrix(&self, index: usize) -> Option<Matrix>;

    /// Target for sample `index` as a `1 x classes` one-hot row.
    fn label_to_matrix(&self, index: usize) -> Matrix;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Stacks the selected samples into `(inputs, targets)` batches with
    /// `add_rows`. Indices past the end are skipped.
    fn batch(&self, indices: &[usize]) -> Result<(Matrix, Matrix), MatrixError> {
        let mut x_batch = Matrix::new();
        let mut t_batch = Matrix::new();
        for &idx in indices {
            if let Some(x) = self.image_to_matrix(idx) {
                x_batch.add_rows(&x)?;
                t_batch.add_rows(&self.label_to_matrix(idx))?;
            }
        }
        Ok((x_batch, t_batch))
    }

    /// The whole source as one batch.
    fn all(&self) -> Result<(Matrix, Matrix), MatrixError> {
        let indices: Vec<usize> = (0..self.size()).collect();
        self.batch(&indices)
    }
}

/// In-memory samples, one row per entry. Handy for synthetic data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemorySamples {
    pub inputs: Vec<Matrix>,
    pub targets: Vec<Matrix>,
}

impl InMemorySamples {
    /// Builds a source from parallel input / target rows.
    pub fn from_rows(inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<InMemorySamples, MatrixError> {
        let to_rows = |rows: &[Vec<f64>]| -> Result<Vec<Matrix>, MatrixError> {
            rows.iter()
                .map(|r| Matrix::from_vec(1, r.len(), r.clone()))
                .collect()
        };
        Ok(InMemorySamples {
            inputs: to_rows(inputs)?,
            targets: to_rows(targets)?,
        })
    }
}

impl Samples for InMemorySamples {
    fn size(&self) -> usize {
        self.inputs.len().min(self.targets.len())
    }

    fn image_to_matrix(&self, index: usize) -> Option<Matrix> {
        if index < self.size() {
            self.inputs.get(index).cloned()
        } else {
            None
        }
    }

    fn label_to_matrix(&self, index: usize) -> Matrix {
        self.targets.get(index).cloned().unwrap_or_default()
    }
}
