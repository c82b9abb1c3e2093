use rand::Rng;

use crate::math::{error::MatrixError, matrix::Matrix};
use crate::network::serialized::SerializedNetwork;

/// A fully-connected layer: `weight` is `input x output`, `bias` is `1 x output`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layer {
    pub weight: Matrix,
    pub bias: Matrix,
}

impl Layer {
    pub fn new(input: usize, output: usize) -> Layer {
        let mut layer = Layer::default();
        layer.reset(input, output);
        layer
    }

    /// Zero-fills `weight` to `input x output` and `bias` to `1 x output`.
    pub fn reset(&mut self, input: usize, output: usize) {
        self.weight.make(input, output);
        self.bias.make(1, output);
    }

    /// Draws every weight from N(0, std_dev). The bias is left as is.
    pub fn randomize<R: Rng + ?Sized>(&mut self, std_dev: f64, rng: &mut R) {
        self.weight.fill_normal(std_dev, rng);
    }

    pub fn input_size(&self) -> usize {
        self.weight.rows()
    }

    pub fn output_size(&self) -> usize {
        self.weight.cols()
    }

    /// `x · weight + bias`, with the bias added to every row of the batch.
    pub fn affine(&self, x: &Matrix) -> Result<Matrix, MatrixError> {
        x.dot(&self.weight)?.add_row_broadcast(&self.bias)
    }

    /// Applies pre-computed gradients scaled by lr: `W -= lr * dW`, `b -= lr * db`.
    pub fn apply_gradients(
        &mut self,
        weights_grad: &Matrix,
        biases_grad: &Matrix,
        lr: f64,
    ) -> Result<(), MatrixError> {
        let weight = self.weight.sub(&weights_grad.scale(lr))?;
        let bias = self.bias.sub(&biases_grad.scale(lr))?;
        self.weight = weight;
        self.bias = bias;
        Ok(())
    }

    /// Replaces this layer's parameters with the named entries of `network`.
    ///
    /// Fails when either entry is missing, has a non-positive dimension, holds
    /// a value count other than `rows * cols`, or when the bias is not a
    /// `1 x output` row matching the weight. The reason is also written to
    /// stderr. The layer is untouched on error.
    pub fn load(
        &mut self,
        network: &SerializedNetwork,
        weight_key: &str,
        bias_key: &str,
    ) -> Result<(), String> {
        let (weight, bias) = read_entries(network, weight_key, bias_key).map_err(|e| {
            eprintln!("failed to load layer ({}, {}): {}", weight_key, bias_key, e);
            e
        })?;
        self.weight = weight;
        self.bias = bias;
        Ok(())
    }
}

fn read_entries(
    network: &SerializedNetwork,
    weight_key: &str,
    bias_key: &str,
) -> Result<(Matrix, Matrix), String> {
    let weight = network
        .get(weight_key)
        .ok_or_else(|| format!("missing weight entry '{}'", weight_key))?
        .to_matrix(weight_key)?;
    let bias = network
        .get(bias_key)
        .ok_or_else(|| format!("missing bias entry '{}'", bias_key))?
        .to_matrix(bias_key)?;

    if bias.rows() != 1 || bias.cols() != weight.cols() {
        return Err(format!(
            "bias '{}' is {}x{}, expected 1x{} to match weight '{}'",
            bias_key,
            bias.rows(),
            bias.cols(),
            weight.cols(),
            weight_key
        ));
    }

    Ok((weight, bias))
}
