pub mod iteration_stats;
pub mod loop_fn;
pub mod sampler;
pub mod train_config;

pub use iteration_stats::IterationStats;
pub use loop_fn::{evaluate, train_loop, TrainSummary};
pub use sampler::{BatchSampler, SamplingStrategy};
pub use train_config::TrainConfig;
