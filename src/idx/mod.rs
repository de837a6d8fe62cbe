pub mod decoder;
pub mod encoder;
pub mod error;
pub mod tensor;

pub use decoder::{decode, read_idx_file, DecodeMode};
pub use encoder::{encode, to_bytes};
pub use error::{FormatError, IdxError};
pub use tensor::IdxTensor;
