pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod data;
pub mod train;

// Convenience re-exports
pub use math::{error::MatrixError, matrix::Matrix};
pub use layers::dense::Layer;
pub use network::{gradients::Gradients, network::TwoLayerNet, serialized::SerializedNetwork};
pub use loss::cross_entropy::CrossEntropyLoss;
pub use optim::sgd::Sgd;
pub use data::{mnist::DataSet, InMemorySamples, Samples};
pub use train::{evaluate, train_loop, TrainConfig};
