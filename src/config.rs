use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::idx::decoder::DecodeMode;
use crate::network::spec::NetworkSpec;
use crate::optim::sgd::Sgd;
use crate::train::train_config::{
    TrainConfig, DEFAULT_BATCH_SIZE, DEFAULT_EPOCHS, DEFAULT_REPORT_INTERVAL,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Every knob of a train-then-evaluate run.
///
/// Missing JSON fields fall back to the reference values: seed 0, 10 epochs,
/// batch size 32, learning rate 0.1, a report every 1000 iterations, strict
/// decoding, 10 classes and the MNIST network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Seeds the single generator used for weight init and sampling.
    pub seed: u64,
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub report_interval: usize,
    /// `lenient` accepts truncated IDX payloads and zero-fills them.
    pub decode_mode: DecodeMode,
    pub classes: usize,
    pub network: NetworkSpec,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            seed: 0,
            epochs: DEFAULT_EPOCHS,
            batch_size: DEFAULT_BATCH_SIZE,
            learning_rate: 0.1,
            report_interval: DEFAULT_REPORT_INTERVAL,
            decode_mode: DecodeMode::Strict,
            classes: 10,
            network: NetworkSpec::mnist(),
        }
    }
}

impl RunConfig {
    /// Deserializes and validates a `RunConfig` from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<RunConfig, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: RunConfig = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            ConfigError::Json {
                path: path.to_path_buf(),
                source,
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        writer.flush().map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid("batch_size must be at least 1".into()));
        }
        if self.report_interval == 0 {
            return Err(ConfigError::Invalid("report_interval must be at least 1".into()));
        }
        if !self.learning_rate.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "learning_rate must be finite, got {}",
                self.learning_rate
            )));
        }
        if self.classes == 0 {
            return Err(ConfigError::Invalid("classes must be at least 1".into()));
        }
        Ok(())
    }

    pub fn train_config(&self) -> TrainConfig {
        TrainConfig {
            report_interval: self.report_interval,
            ..TrainConfig::new(self.epochs, self.batch_size)
        }
    }

    pub fn optimizer(&self) -> Sgd {
        Sgd::new(self.learning_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_reference_values() {
        let c = RunConfig::default();
        assert_eq!((c.epochs, c.batch_size, c.report_interval), (10, 32, 1000));
        assert_eq!(c.learning_rate, 0.1);
        assert_eq!(c.decode_mode, DecodeMode::Strict);
        assert_eq!(c.network, NetworkSpec::mnist());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "seed": 7, "epochs": 1, "decode_mode": "lenient" }}"#).unwrap();
        let c = RunConfig::load_json(file.path()).unwrap();
        assert_eq!(c.seed, 7);
        assert_eq!(c.epochs, 1);
        assert_eq!(c.decode_mode, DecodeMode::Lenient);
        assert_eq!(c.batch_size, 32);
        assert_eq!(c.network, NetworkSpec::mnist());
    }

    #[test]
    fn save_then_load_is_identity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        let c = RunConfig { seed: 99, learning_rate: 0.05, ..RunConfig::default() };
        c.save_json(&path).unwrap();
        assert_eq!(RunConfig::load_json(&path).unwrap(), c);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn write_failure_on_flush_is_reported() {
        // /dev/full accepts the open but fails every write with ENOSPC;
        // the whole document fits in the buffer, so the error surfaces on flush.
        match RunConfig::default().save_json("/dev/full") {
            Err(ConfigError::Io { path, .. }) => assert_eq!(path, Path::new("/dev/full")),
            other => panic!("expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn zero_batch_size_is_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "batch_size": 0 }}"#).unwrap();
        assert!(matches!(RunConfig::load_json(file.path()), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_json_names_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        match RunConfig::load_json(file.path()) {
            Err(ConfigError::Json { path, .. }) => assert_eq!(path, file.path()),
            other => panic!("expected Json error, got {:?}", other),
        }
    }

    #[test]
    fn train_config_carries_cadence() {
        let c = RunConfig { report_interval: 50, batch_size: 8, epochs: 2, ..RunConfig::default() };
        let t = c.train_config();
        assert_eq!((t.epochs, t.batch_size, t.report_interval), (2, 8, 50));
        assert!(t.progress_tx.is_none());
        assert_eq!(c.optimizer().learning_rate, 0.1);
    }
}
