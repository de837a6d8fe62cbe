use std::path::PathBuf;

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, RunConfig};
use crate::data::dataset::LabeledImages;
use crate::error::Error;
use crate::eval::evaluate::{evaluate, EvalSummary};
use crate::network::trainable::Trainable;
use crate::train::loop_fn::train_loop;
use crate::train::window_report::TrainSummary;

/// The four IDX files of an MNIST-style dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    pub train_images: PathBuf,
    pub train_labels: PathBuf,
    pub test_images: PathBuf,
    pub test_labels: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub training: TrainSummary,
    pub evaluation: EvalSummary,
}

/// Builds the network, trains it on the training pair, then scores it on
/// the test pair.
///
/// The training tensors are dropped before the test files are opened.
pub fn run(paths: &DatasetPaths, config: &RunConfig) -> Result<RunSummary, Error> {
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut network = config.network.build(&mut rng)?;
    info!(
        "network: {} inputs -> {} outputs over {} stages (seed {})",
        network.input_len(),
        network.output_len(),
        network.stages().len(),
        config.seed
    );

    let training = {
        let train = LabeledImages::load(
            &paths.train_images,
            &paths.train_labels,
            config.decode_mode,
            config.classes,
        )?;
        info!("loaded {} training records of {} values", train.len(), train.input_len());
        check_shapes(&network, &train)?;
        let train_config = config.train_config();
        if train_config.total_iterations(train.len()).is_none() {
            return Err(ConfigError::Invalid(format!(
                "{} epochs over {} records overflows the iteration count",
                config.epochs,
                train.len()
            ))
            .into());
        }
        train_loop(&mut network, &train, &config.optimizer(), &train_config, &mut rng)
    };

    let test = LabeledImages::load(
        &paths.test_images,
        &paths.test_labels,
        config.decode_mode,
        config.classes,
    )?;
    info!("loaded {} test records", test.len());
    check_shapes(&network, &test)?;
    let evaluation = evaluate(&mut network, &test);

    Ok(RunSummary { training, evaluation })
}

fn check_shapes<M: Trainable + ?Sized>(model: &M, data: &LabeledImages) -> Result<(), Error> {
    if model.input_len() != data.input_len() || model.output_len() != data.classes() {
        return Err(Error::ShapeMismatch {
            network_inputs: model.input_len(),
            network_outputs: model.output_len(),
            record_len: data.input_len(),
            classes: data.classes(),
        });
    }
    Ok(())
}
