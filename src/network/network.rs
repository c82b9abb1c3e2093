use rand::Rng;

use crate::layers::dense::Layer;
use crate::loss::cross_entropy::CrossEntropyLoss;
use crate::math::{error::MatrixError, matrix::Matrix};
use crate::network::gradients::Gradients;
use crate::network::serialized::SerializedNetwork;
use crate::optim::sgd::Sgd;

/// Sigmoid hidden layer followed by a softmax output layer.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoLayerNet {
    pub layer1: Layer,
    pub layer2: Layer,
}

/// Intermediate values of a forward pass kept for backprop.
struct ForwardCache {
    a1: Matrix,
    z1: Matrix,
    y: Matrix,
}

impl TwoLayerNet {
    /// Builds a network with all weights and biases set to zero.
    pub fn new(input: usize, hidden: usize, output: usize) -> TwoLayerNet {
        TwoLayerNet {
            layer1: Layer::new(input, hidden),
            layer2: Layer::new(hidden, output),
        }
    }

    /// Builds a network whose weights are drawn from N(0, std_dev).
    /// Biases stay zero.
    pub fn with_random_weights<R: Rng + ?Sized>(
        input: usize,
        hidden: usize,
        output: usize,
        std_dev: f64,
        rng: &mut R,
    ) -> TwoLayerNet {
        let mut net = TwoLayerNet::new(input, hidden, output);
        net.layer2.randomize(std_dev, rng);
        net.layer1.randomize(std_dev, rng);
        net
    }

    pub fn input_size(&self) -> usize {
        self.layer1.input_size()
    }

    pub fn hidden_size(&self) -> usize {
        self.layer1.output_size()
    }

    pub fn output_size(&self) -> usize {
        self.layer2.output_size()
    }

    fn forward(&self, x: &Matrix) -> Result<ForwardCache, MatrixError> {
        let a1 = self.layer1.affine(x)?;
        let z1 = a1.sigmoid();
        let y = self.layer2.affine(&z1)?.softmax();
        Ok(ForwardCache { a1, z1, y })
    }

    /// Class probabilities for each row of `x`.
    pub fn predict(&self, x: &Matrix) -> Result<Matrix, MatrixError> {
        Ok(self.forward(x)?.y)
    }

    /// Fraction of rows whose predicted argmax equals the target argmax.
    ///
    /// Only the first `min(x.rows, t.rows)` rows are compared.
    pub fn accuracy(&self, x: &Matrix, t: &Matrix) -> Result<f64, MatrixError> {
        let rows = x.rows().min(t.rows());
        if rows == 0 {
            return Ok(0.0);
        }
        let y = self.predict(x)?;
        if y.cols() != t.cols() {
            return Err(MatrixError::ShapeMismatch {
                op: "accuracy",
                left: y.shape(),
                right: t.shape(),
            });
        }
        let correct = (0..rows)
            .filter(|&r| y.argmax_row(r) == t.argmax_row(r))
            .count();
        Ok(correct as f64 / rows as f64)
    }

    /// Mean cross-entropy of `predict(x)` against the one-hot targets `t`.
    pub fn loss(&self, x: &Matrix, t: &Matrix) -> Result<f64, MatrixError> {
        CrossEntropyLoss::batch_loss(&self.predict(x)?, t)
    }

    /// Backpropagation of the softmax + cross-entropy loss for one batch.
    pub fn gradient(&self, x: &Matrix, t: &Matrix) -> Result<Gradients, MatrixError> {
        let ForwardCache { a1, z1, y } = self.forward(x)?;

        // Combined softmax + cross-entropy gradient, averaged over the batch.
        let dy = CrossEntropyLoss::batch_derivative(&y, t)?;

        let w2 = z1.transpose().dot(&dy)?;
        let b2 = dy.sum();

        let dz1 = dy.dot(&self.layer2.weight.transpose())?;
        let da1 = a1.sigmoid_grad().mul(&dz1)?;

        let w1 = x.transpose().dot(&da1)?;
        let b1 = da1.sum();

        Ok(Gradients { w1, b1, w2, b2 })
    }

    /// Applies one gradient-descent step to both layers.
    pub fn apply_gradients(&mut self, grads: &Gradients, optimizer: &Sgd) -> Result<(), MatrixError> {
        optimizer.step(&mut self.layer1, &grads.w1, &grads.b1)?;
        optimizer.step(&mut self.layer2, &grads.w2, &grads.b2)
    }

    /// Dumps the parameters under the keys `w1`, `b1`, `w2`, `b2`.
    pub fn to_serialized(&self) -> SerializedNetwork {
        let mut out = SerializedNetwork::new();
        out.insert("w1", &self.layer1.weight);
        out.insert("b1", &self.layer1.bias);
        out.insert("w2", &self.layer2.weight);
        out.insert("b2", &self.layer2.bias);
        out
    }

    /// Rebuilds a network from a dump written by `to_serialized`.
    ///
    /// Each layer is validated by `Layer::load`; the hidden widths of the two
    /// layers must also agree.
    pub fn from_serialized(network: &SerializedNetwork) -> Result<TwoLayerNet, String> {
        let mut layer1 = Layer::default();
        let mut layer2 = Layer::default();
        layer1.load(network, "w1", "b1")?;
        layer2.load(network, "w2", "b2")?;
        if layer1.output_size() != layer2.input_size() {
            return Err(format!(
                "layer widths disagree: w1 has {} outputs, w2 expects {} inputs",
                layer1.output_size(),
                layer2.input_size()
            ));
        }
        Ok(TwoLayerNet { layer1, layer2 })
    }
}
