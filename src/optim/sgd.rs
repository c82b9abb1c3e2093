use crate::{layers::dense::Layer, math::{error::MatrixError, matrix::Matrix}};

/// Plain gradient descent with a fixed learning rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one SGD update to a layer given its pre-computed gradients.
    pub fn step(
        &self,
        layer: &mut Layer,
        weights_grad: &Matrix,
        biases_grad: &Matrix,
    ) -> Result<(), MatrixError> {
        layer.apply_gradients(weights_grad, biases_grad, self.learning_rate)
    }
}
