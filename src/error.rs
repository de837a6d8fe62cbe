use thiserror::Error;

use crate::config::ConfigError;
use crate::data::dataset::LoadError;
use crate::network::error::NetworkError;

/// Exit code for any file-open, decode or dataset-pairing failure.
pub const EXIT_DATA: u8 = 111;
/// Exit code for usage and configuration problems.
pub const EXIT_CONFIG: u8 = 2;

/// Everything `run` can fail with.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("network maps {network_inputs} inputs to {network_outputs} outputs, but records hold {record_len} values over {classes} classes")]
    ShapeMismatch {
        network_inputs: usize,
        network_outputs: usize,
        record_len: usize,
        classes: usize,
    },
}

impl Error {
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Load(_) => EXIT_DATA,
            Error::Network(_) | Error::Config(_) | Error::ShapeMismatch { .. } => EXIT_CONFIG,
        }
    }
}
