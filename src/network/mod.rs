pub mod error;
pub mod network;
pub mod spec;
pub mod trainable;

pub use error::NetworkError;
pub use network::Network;
pub use spec::{LayerSpec, NetworkSpec};
pub use trainable::Trainable;
