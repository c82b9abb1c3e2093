use std::sync::atomic::Ordering;
use std::time::Instant;

use rand::Rng;

use crate::data::Samples;
use crate::math::error::MatrixError;
use crate::network::network::TwoLayerNet;
use crate::optim::sgd::Sgd;
use crate::train::iteration_stats::IterationStats;
use crate::train::sampler::BatchSampler;
use crate::train::train_config::TrainConfig;

/// Outcome of a `train_loop` run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainSummary {
    /// Iterations actually completed; lower than requested after an early stop.
    pub iterations_run: usize,
    /// Last emitted progress snapshot, if any.
    pub last_stats: Option<IterationStats>,
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Runs `config.iterations` steps of mini-batch gradient descent on `network`.
///
/// Each step draws `config.batch_size` indices from `train_set`, stacks them
/// into a batch, computes the gradients and applies `W -= lr * dW` to every
/// parameter. Every `config.report_every` steps the accuracy and loss on the
/// batch just used are printed and, when configured, sent on
/// `config.progress_tx`.
///
/// # Early termination
/// The loop stops between iterations if `config.stop_flag` is set or the
/// `progress_tx` receiver has been dropped.
pub fn train_loop<S, R>(
    network: &mut TwoLayerNet,
    train_set: &S,
    config: &TrainConfig,
    rng: &mut R,
) -> Result<TrainSummary, MatrixError>
where
    S: Samples + ?Sized,
    R: Rng + ?Sized,
{
    let optimizer = Sgd::new(config.learning_rate);
    let mut sampler = BatchSampler::new(config.sampling);
    let t_start = Instant::now();

    let mut summary = TrainSummary { iterations_run: 0, last_stats: None };

    for i in 0..config.iterations {
        if stop_requested(config) {
            break;
        }

        let indices = sampler.next_batch(train_set.size(), config.batch_size, rng);
        let (x_batch, t_batch) = train_set.batch(&indices)?;

        let grads = network.gradient(&x_batch, &t_batch)?;
        network.apply_gradients(&grads, &optimizer)?;
        summary.iterations_run = i + 1;

        if config.report_every > 0 && (i + 1) % config.report_every == 0 {
            let stats = IterationStats {
                iteration: i + 1,
                total_iterations: config.iterations,
                batch_accuracy: network.accuracy(&x_batch, &t_batch)?,
                batch_loss: network.loss(&x_batch, &t_batch)?,
                elapsed_ms: t_start.elapsed().as_millis() as u64,
            };
            println!("[train {}] {:.6}", stats.iteration, stats.batch_accuracy);

            summary.last_stats = Some(stats.clone());
            if let Some(ref tx) = config.progress_tx {
                // If the receiver has been dropped, stop training.
                if tx.send(stats).is_err() {
                    break;
                }
            }
        }
    }

    Ok(summary)
}

/// Accuracy of `network` over every sample of `set`, in a single batch.
pub fn evaluate<S>(network: &TwoLayerNet, set: &S) -> Result<f64, MatrixError>
where
    S: Samples + ?Sized,
{
    let (x, t) = set.all()?;
    network.accuracy(&x, &t)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .map_or(false, |flag| flag.load(Ordering::Relaxed))
}
