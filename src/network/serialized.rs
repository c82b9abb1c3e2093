use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::math::matrix::Matrix;

/// One named tensor in a weight dump.
///
/// Dimensions are signed so that malformed dumps (zero or negative sizes)
/// survive deserialization and are rejected by `Layer::load` with a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorEntry {
    pub rows: i64,
    pub cols: i64,
    pub values: Vec<f64>,
}

impl TensorEntry {
    pub fn from_matrix(m: &Matrix) -> TensorEntry {
        TensorEntry {
            rows: m.rows() as i64,
            cols: m.cols() as i64,
            values: m.as_slice().to_vec(),
        }
    }

    /// Validates the entry and converts it into a `Matrix`.
    pub fn to_matrix(&self, name: &str) -> Result<Matrix, String> {
        if self.rows <= 0 || self.cols <= 0 {
            return Err(format!(
                "entry '{}' has non-positive dimensions {}x{}",
                name, self.rows, self.cols
            ));
        }
        let (rows, cols) = (self.rows as usize, self.cols as usize);
        if rows.checked_mul(cols) != Some(self.values.len()) {
            return Err(format!(
                "entry '{}' declares {}x{} but holds {} values",
                name, rows, cols, self.values.len()
            ));
        }
        Matrix::from_vec(rows, cols, self.values.clone()).map_err(|e| e.to_string())
    }
}

/// A dump of named weight and bias tensors, keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SerializedNetwork {
    pub entries: BTreeMap<String, TensorEntry>,
}

impl SerializedNetwork {
    pub fn new() -> SerializedNetwork {
        SerializedNetwork::default()
    }

    pub fn insert(&mut self, name: &str, m: &Matrix) {
        self.entries.insert(name.to_owned(), TensorEntry::from_matrix(m));
    }

    pub fn get(&self, name: &str) -> Option<&TensorEntry> {
        self.entries.get(name)
    }

    /// Serializes the dump to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Deserializes a dump previously written by `save_json`.
    pub fn load_json(path: &str) -> std::io::Result<SerializedNetwork> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
