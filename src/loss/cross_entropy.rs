use crate::math::{error::MatrixError, matrix::Matrix};

/// Categorical cross-entropy loss for use with a softmax output.
pub struct CrossEntropyLoss;

/// Small epsilon added inside log() to prevent log(0) = -inf.
const EPS: f64 = 1e-12;

impl CrossEntropyLoss {
    /// Scalar cross-entropy of one sample:
    ///   L = -sum(expected[i] * log(predicted[i] + eps))
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        predicted.iter().zip(expected.iter())
            .map(|(p, e)| -e * (p + EPS).ln())
            .sum()
    }

    /// Mean cross-entropy over the rows of a batch.
    ///
    /// `predicted` holds softmax probabilities, `expected` one-hot targets of
    /// the same shape. An empty batch has zero loss.
    pub fn batch_loss(predicted: &Matrix, expected: &Matrix) -> Result<f64, MatrixError> {
        if predicted.shape() != expected.shape() {
            return Err(MatrixError::ShapeMismatch {
                op: "cross_entropy",
                left: predicted.shape(),
                right: expected.shape(),
            });
        }
        let n = predicted.rows();
        if n == 0 {
            return Ok(0.0);
        }
        let total: f64 = (0..n)
            .map(|r| CrossEntropyLoss::loss(predicted.row(r), expected.row(r)))
            .sum();
        Ok(total / n as f64)
    }

    /// Gradient of softmax + cross-entropy w.r.t. the pre-softmax logits,
    /// averaged over the batch: `(predicted - expected) / rows`.
    pub fn batch_derivative(predicted: &Matrix, expected: &Matrix) -> Result<Matrix, MatrixError> {
        Ok(predicted.sub(expected)?.div(predicted.rows() as f64))
    }
}
