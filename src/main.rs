use std::env;
use std::process::ExitCode;

use log::{error, info};

use idxnet::error::EXIT_CONFIG;
use idxnet::{run, DatasetPaths, RunConfig};

const USAGE: &str = "usage: idxnet <train-images> <train-labels> <test-images> <test-labels> [config.json]";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    if !(4..=5).contains(&args.len()) {
        eprintln!("{}", USAGE);
        return ExitCode::from(EXIT_CONFIG);
    }

    let config = match args.get(4) {
        Some(path) => match RunConfig::load_json(path) {
            Ok(config) => config,
            Err(e) => {
                error!("{}", e);
                return ExitCode::from(EXIT_CONFIG);
            }
        },
        None => RunConfig::default(),
    };

    let paths = DatasetPaths {
        train_images: args[0].clone().into(),
        train_labels: args[1].clone().into(),
        test_images: args[2].clone().into(),
        test_labels: args[3].clone().into(),
    };

    match run(&paths, &config) {
        Ok(summary) => {
            info!(
                "done: {}/{} correct ({:.2}%)",
                summary.evaluation.correct,
                summary.evaluation.total,
                summary.evaluation.accuracy() * 100.0
            );
            match serde_json::to_string_pretty(&summary) {
                Ok(json) => println!("{}", json),
                Err(e) => error!("cannot serialize run summary: {}", e),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
