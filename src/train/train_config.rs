use std::sync::mpsc;
use std::sync::{atomic::AtomicBool, Arc};

use serde::{Deserialize, Serialize};

use crate::train::iteration_stats::IterationStats;
use crate::train::sampler::SamplingStrategy;

/// Configuration for a training run.
///
/// Every field has a default, so a JSON config only needs to name the values
/// it overrides:
///
/// ```json
/// { "iterations": 2000, "learning_rate": 0.5, "seed": 42 }
/// ```
///
/// # Fields
/// - `iterations`     — number of gradient-descent steps
/// - `batch_size`     — samples drawn per step
/// - `learning_rate`  — step size applied to every gradient
/// - `hidden_size`    — width of the sigmoid hidden layer
/// - `init_std`       — standard deviation of the Gaussian weight init
/// - `report_every`   — emit an `IterationStats` every this many steps (0 disables)
/// - `seed`           — RNG seed; `None` seeds from OS entropy
/// - `sampling`       — how batch indices are drawn
/// - `train_*`, `test_*` — IDX file paths
/// - `model_out`      — if set, the trained network is written here as JSON
/// - `model_in`       — if set, training is skipped and this dump is evaluated
/// - `progress_tx`    — optional channel receiving each `IterationStats`;
///                      the loop stops once the receiver is dropped
/// - `stop_flag`      — optional flag; when set the loop stops after the
///                      current iteration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub iterations: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub hidden_size: usize,
    pub init_std: f64,
    pub report_every: usize,
    pub seed: Option<u64>,
    pub sampling: SamplingStrategy,
    pub train_labels: String,
    pub train_images: String,
    pub test_labels: String,
    pub test_images: String,
    pub model_out: Option<String>,
    pub model_in: Option<String>,
    #[serde(skip)]
    pub progress_tx: Option<mpsc::Sender<IterationStats>>,
    #[serde(skip)]
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            iterations: 10_000,
            batch_size: 100,
            learning_rate: 0.1,
            hidden_size: 50,
            init_std: 0.1,
            report_every: 100,
            seed: None,
            sampling: SamplingStrategy::Uniform,
            train_labels: "train-labels-idx1-ubyte".to_owned(),
            train_images: "train-images-idx3-ubyte".to_owned(),
            test_labels: "t10k-labels-idx1-ubyte".to_owned(),
            test_images: "t10k-images-idx3-ubyte".to_owned(),
            model_out: None,
            model_in: None,
            progress_tx: None,
            stop_flag: None,
        }
    }
}

impl TrainConfig {
    /// Creates a config with the given core hyperparameters and defaults elsewhere.
    pub fn new(iterations: usize, batch_size: usize, learning_rate: f64) -> Self {
        TrainConfig {
            iterations,
            batch_size,
            learning_rate,
            ..TrainConfig::default()
        }
    }

    /// Deserializes a `TrainConfig` from a JSON file. Missing fields take
    /// their default values.
    pub fn load_json(path: &str) -> std::io::Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
