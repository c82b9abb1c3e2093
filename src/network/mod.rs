pub mod gradients;
pub mod network;
pub mod serialized;

pub use gradients::Gradients;
pub use network::TwoLayerNet;
pub use serialized::{SerializedNetwork, TensorEntry};
