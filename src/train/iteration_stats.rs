use serde::{Deserialize, Serialize};

/// Progress snapshot emitted by `train_loop` every `report_every` iterations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationStats {
    /// 1-based iteration number.
    pub iteration: usize,
    pub total_iterations: usize,
    /// Accuracy on the batch just trained on, as a fraction in [0, 1].
    pub batch_accuracy: f64,
    /// Mean cross-entropy on that batch after the update.
    pub batch_loss: f64,
    /// Wall-clock time since the loop started, in milliseconds.
    pub elapsed_ms: u64,
}
