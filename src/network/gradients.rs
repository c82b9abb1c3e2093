use crate::math::matrix::Matrix;

/// Parameter gradients produced by one backward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub w1: Matrix,
    pub b1: Matrix,
    pub w2: Matrix,
    pub b2: Matrix,
}

impl Gradients {
    pub const KEYS: [&'static str; 4] = ["w1", "b1", "w2", "b2"];

    /// Looks a gradient up by parameter name.
    pub fn get(&self, name: &str) -> Option<&Matrix> {
        match name {
            "w1" => Some(&self.w1),
            "b1" => Some(&self.b1),
            "w2" => Some(&self.w2),
            "b2" => Some(&self.b2),
            _ => None,
        }
    }

    /// `(name, gradient)` pairs in `KEYS` order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Matrix)> {
        [
            ("w1", &self.w1),
            ("b1", &self.b1),
            ("w2", &self.w2),
            ("b2", &self.b2),
        ]
        .into_iter()
    }
}
