use std::path::Path;

use thiserror::Error;

use crate::idx::decoder::{read_idx_file, DecodeMode};
use crate::idx::error::IdxError;
use crate::idx::tensor::IdxTensor;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("image tensor must be rank 3 (count × rows × cols), got rank {0}")]
    ImageRank(usize),

    #[error("label tensor must be rank 1, got rank {0}")]
    LabelRank(usize),

    #[error("image file holds {images} records but label file holds {labels}")]
    CountMismatch { images: usize, labels: usize },

    #[error("label {label} at index {index} is out of range for {classes} classes")]
    LabelOutOfRange { index: usize, label: u8, classes: usize },
}

/// Either half of a dataset failing to load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Idx(#[from] IdxError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// An image tensor paired with its label tensor.
///
/// Both tensors are read-only; training and evaluation borrow them.
#[derive(Debug, Clone)]
pub struct LabeledImages {
    images: IdxTensor,
    labels: IdxTensor,
    classes: usize,
}

impl LabeledImages {
    /// Pairs `images` (`[n, rows, cols]`) with `labels` (`[n]`), checking
    /// that every label is below `classes`.
    pub fn new(images: IdxTensor, labels: IdxTensor, classes: usize) -> Result<LabeledImages, DatasetError> {
        if images.rank() != 3 {
            return Err(DatasetError::ImageRank(images.rank()));
        }
        if labels.rank() != 1 {
            return Err(DatasetError::LabelRank(labels.rank()));
        }
        if images.record_count() != labels.record_count() {
            return Err(DatasetError::CountMismatch {
                images: images.record_count(),
                labels: labels.record_count(),
            });
        }
        if let Some((index, &label)) = labels
            .payload()
            .iter()
            .enumerate()
            .find(|&(_, &l)| l as usize >= classes)
        {
            return Err(DatasetError::LabelOutOfRange { index, label, classes });
        }
        Ok(LabeledImages { images, labels, classes })
    }

    /// Reads and pairs an IDX3 image file with an IDX1 label file.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        images_path: P,
        labels_path: Q,
        mode: DecodeMode,
        classes: usize,
    ) -> Result<LabeledImages, LoadError> {
        let images = read_idx_file(images_path, mode)?;
        let labels = read_idx_file(labels_path, mode)?;
        Ok(LabeledImages::new(images, labels, classes)?)
    }

    pub fn len(&self) -> usize {
        self.images.record_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values per image (`rows * cols`).
    pub fn input_len(&self) -> usize {
        self.images.record_len()
    }

    pub fn classes(&self) -> usize {
        self.classes
    }

    pub fn images(&self) -> &IdxTensor {
        &self.images
    }

    pub fn labels(&self) -> &IdxTensor {
        &self.labels
    }

    pub fn label(&self, index: usize) -> usize {
        self.labels.scalar(index) as usize
    }

    /// Copies record `index` into `buffers.raw`, normalises it into
    /// `buffers.input` (each byte / 255) and returns its label.
    pub fn load_sample(&self, index: usize, buffers: &mut SampleBuffers) -> usize {
        self.images.record_into(index, &mut buffers.raw);
        for (x, &px) in buffers.input.iter_mut().zip(buffers.raw.iter()) {
            *x = px as f64 / 255.0;
        }
        self.label(index)
    }
}

/// Per-run scratch space for one sample, allocated once and reused on
/// every iteration.
#[derive(Debug, Clone)]
pub struct SampleBuffers {
    pub raw: Vec<u8>,
    pub input: Vec<f64>,
    pub output: Vec<f64>,
    pub target: Vec<f64>,
}

impl SampleBuffers {
    pub fn new(input_len: usize, output_len: usize) -> SampleBuffers {
        SampleBuffers {
            raw: vec![0; input_len],
            input: vec![0.0; input_len],
            output: vec![0.0; output_len],
            target: vec![0.0; output_len],
        }
    }

    /// Rewrites `target` as the one-hot encoding of `label`.
    pub fn set_one_hot(&mut self, label: usize) {
        self.target.fill(0.0);
        self.target[label] = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> LabeledImages {
        let images = IdxTensor::new(vec![2, 1, 2], vec![0, 255, 51, 102]).unwrap();
        let labels = IdxTensor::new(vec![2], vec![1, 0]).unwrap();
        LabeledImages::new(images, labels, 2).unwrap()
    }

    #[test]
    fn load_sample_normalises_and_returns_label() {
        let data = tiny();
        let mut buf = SampleBuffers::new(data.input_len(), 2);
        assert_eq!(data.load_sample(0, &mut buf), 1);
        assert_eq!(buf.input, vec![0.0, 1.0]);
        assert_eq!(data.load_sample(1, &mut buf), 0);
        assert_eq!(buf.input, vec![0.2, 0.4]);
        assert_eq!(buf.raw, vec![51, 102]);
    }

    #[test]
    fn one_hot_clears_previous_label() {
        let mut buf = SampleBuffers::new(1, 4);
        buf.set_one_hot(3);
        buf.set_one_hot(1);
        assert_eq!(buf.target, vec![0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn swapped_tensors_are_rejected() {
        let images = IdxTensor::new(vec![2, 1, 1], vec![0, 0]).unwrap();
        let labels = IdxTensor::new(vec![2], vec![0, 0]).unwrap();
        assert!(matches!(
            LabeledImages::new(labels.clone(), images.clone(), 10),
            Err(DatasetError::ImageRank(1))
        ));
        let flat = IdxTensor::new(vec![2, 1], vec![0, 0]).unwrap();
        assert!(matches!(
            LabeledImages::new(images, flat, 10),
            Err(DatasetError::LabelRank(2))
        ));
    }

    #[test]
    fn count_mismatch_is_rejected() {
        let images = IdxTensor::new(vec![3, 1, 1], vec![0; 3]).unwrap();
        let labels = IdxTensor::new(vec![2], vec![0, 0]).unwrap();
        assert!(matches!(
            LabeledImages::new(images, labels, 10),
            Err(DatasetError::CountMismatch { images: 3, labels: 2 })
        ));
    }

    #[test]
    fn out_of_range_label_is_rejected() {
        let images = IdxTensor::new(vec![2, 1, 1], vec![0; 2]).unwrap();
        let labels = IdxTensor::new(vec![2], vec![9, 10]).unwrap();
        assert!(matches!(
            LabeledImages::new(images, labels, 10),
            Err(DatasetError::LabelOutOfRange { index: 1, label: 10, classes: 10 })
        ));
    }
}
