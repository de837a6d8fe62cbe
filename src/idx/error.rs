use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A malformed IDX header. Decoding stops at the first violation.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("IDX header too short: expected 4 bytes, got {0}")]
    ShortHeader(usize),

    #[error("IDX element type 0x{0:02X} is not supported (only 0x08, unsigned byte)")]
    UnsupportedType(u8),

    #[error("IDX header declares zero dimensions")]
    ZeroDimensions,

    #[error("IDX shape truncated: header declares {declared} dimensions, only {read} present")]
    TruncatedShape { declared: usize, read: usize },

    #[error("IDX shape {0:?} describes more bytes than fit in memory")]
    ShapeOverflow(Vec<u32>),

    #[error("IDX payload holds {actual} bytes but shape {shape:?} needs {expected}")]
    PayloadLength {
        shape: Vec<u32>,
        expected: usize,
        actual: usize,
    },
}

/// Everything that can go wrong turning a byte source into an `IdxTensor`.
#[derive(Debug, Error)]
pub enum IdxError {
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Only produced in `DecodeMode::Strict`.
    #[error("IDX payload truncated: expected {expected} bytes, read {actual}")]
    TruncatedPayload { expected: usize, actual: usize },

    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error while reading IDX data: {0}")]
    Io(#[from] io::Error),
}
