use rand::Rng;
use serde::{Deserialize, Serialize};

/// How `BatchSampler` picks sample indices.
///
/// - `Uniform`        — independent uniform draws with replacement.
/// - `CumulativeWalk` — `k = (k + r) mod n` with `r` a fresh random `u32`;
///   each index depends on the previous one, so draws are not uniform over
///   a run. Kept for reproducing older training trajectories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingStrategy {
    #[default]
    Uniform,
    CumulativeWalk,
}

/// Draws mini-batch indices; carries the walk position across batches.
#[derive(Debug, Clone)]
pub struct BatchSampler {
    strategy: SamplingStrategy,
    cursor: u64,
}

impl BatchSampler {
    pub fn new(strategy: SamplingStrategy) -> BatchSampler {
        BatchSampler { strategy, cursor: 0 }
    }

    pub fn strategy(&self) -> SamplingStrategy {
        self.strategy
    }

    /// Returns `batch_size` indices in `0..n`. Empty when `n == 0`.
    pub fn next_batch<R: Rng + ?Sized>(
        &mut self,
        n: usize,
        batch_size: usize,
        rng: &mut R,
    ) -> Vec<usize> {
        if n == 0 {
            return Vec::new();
        }
        (0..batch_size).map(|_| self.next_index(n, rng)).collect()
    }

    fn next_index<R: Rng + ?Sized>(&mut self, n: usize, rng: &mut R) -> usize {
        match self.strategy {
            SamplingStrategy::Uniform => rng.gen_range(0..n),
            SamplingStrategy::CumulativeWalk => {
                self.cursor = (self.cursor + rng.gen::<u32>() as u64) % n as u64;
                self.cursor as usize
            }
        }
    }
}
