//! Trains the two-layer MNIST classifier and reports held-out accuracy.
//!
//! Usage:
//!   twolayer-nn [config.json]
//!
//! Without a config file every hyperparameter takes its default and the four
//! MNIST IDX files are read from the working directory.

use anyhow::{anyhow, Context, Result};
use rand::{rngs::StdRng, SeedableRng};

use twolayer_nn::{
    data::mnist::N_CLASSES, evaluate, train_loop, DataSet, Samples, SerializedNetwork,
    TrainConfig, TwoLayerNet,
};

fn load_dataset(labels: &str, images: &str) -> Result<DataSet> {
    DataSet::load(labels, images)
        .map_err(|e| anyhow!("failed to load mnist images and labels: {}", e))
}

fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => TrainConfig::load_json(&path)
            .with_context(|| format!("cannot read config '{}'", path))?,
        None => TrainConfig::default(),
    };

    let t10k = load_dataset(&config.test_labels, &config.test_images)?;

    // Inference only: evaluate a previously saved network.
    if let Some(ref path) = config.model_in {
        let dump = SerializedNetwork::load_json(path)
            .with_context(|| format!("cannot read model '{}'", path))?;
        let net = TwoLayerNet::from_serialized(&dump)
            .map_err(|e| anyhow!("invalid model '{}': {}", path, e))?;
        let acc = evaluate(&net, &t10k)?;
        println!("[t10k] {:.6}", acc);
        return Ok(());
    }

    let train = load_dataset(&config.train_labels, &config.train_images)?;
    if train.is_empty() {
        return Err(anyhow!("training set is empty"));
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (rows, cols) = train.image_dims();
    let mut net = TwoLayerNet::with_random_weights(
        rows * cols,
        config.hidden_size,
        N_CLASSES,
        config.init_std,
        &mut rng,
    );

    train_loop(&mut net, &train, &config, &mut rng)?;

    let acc = evaluate(&net, &t10k)?;
    println!("[t10k] {:.6}", acc);

    if let Some(ref path) = config.model_out {
        net.to_serialized()
            .save_json(path)
            .with_context(|| format!("cannot write model '{}'", path))?;
        println!("model saved to {}", path);
    }

    Ok(())
}
