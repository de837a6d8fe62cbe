pub mod dataset;

pub use dataset::{DatasetError, LabeledImages, LoadError, SampleBuffers};
