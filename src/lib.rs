pub mod idx;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod data;
pub mod train;
pub mod eval;
pub mod config;
pub mod error;
pub mod run;

// Convenience re-exports
pub use idx::{decode, read_idx_file, DecodeMode, FormatError, IdxError, IdxTensor};
pub use activation::activation::ActivationFunction;
pub use layers::{ConvStage, DenseStage, Stage, StageShape};
pub use network::{LayerSpec, Network, NetworkSpec, Trainable};
pub use optim::sgd::Sgd;
pub use data::dataset::{LabeledImages, SampleBuffers};
pub use train::{train_loop, TrainConfig, TrainSummary, WindowReport};
pub use eval::{argmax, evaluate, EvalSummary};
pub use config::RunConfig;
pub use error::Error;
pub use run::{run, DatasetPaths, RunSummary};
