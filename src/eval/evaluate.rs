use log::{debug, info};
use serde::{Serialize, Deserialize};

use crate::data::dataset::{LabeledImages, SampleBuffers};
use crate::network::trainable::Trainable;

/// Result of one pass over a held-out set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalSummary {
    pub total: usize,
    pub correct: usize,
}

impl EvalSummary {
    /// Fraction in `[0, 1]`; `0.0` for an empty set.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64
    }
}

/// Scores `model` on every record of `data`, in index order.
///
/// # Panics
/// Panics if the model's widths do not match the dataset.
pub fn evaluate<M: Trainable + ?Sized>(model: &mut M, data: &LabeledImages) -> EvalSummary {
    assert_eq!(model.input_len(), data.input_len(), "model/record input width mismatch");
    assert_eq!(model.output_len(), data.classes(), "model output width must equal class count");

    let mut buffers = SampleBuffers::new(data.input_len(), model.output_len());
    let mut summary = EvalSummary { total: data.len(), correct: 0 };

    for i in 0..data.len() {
        let label = data.load_sample(i, &mut buffers);
        model.set_inputs(&buffers.input);
        model.get_outputs(&mut buffers.output);
        if argmax(&buffers.output) == label {
            summary.correct += 1;
        }
        if i % 1000 == 0 {
            debug!("evaluated {}/{}", i, data.len());
        }
    }

    info!(
        "ntests={}, ncorrect={}, accuracy={:.4}",
        summary.total,
        summary.correct,
        summary.accuracy()
    );
    summary
}

/// Index of the largest value, scanning left to right with a strict `<`.
/// Ties keep the earliest index. Any comparison against NaN is false, so a
/// NaN in the lead is never replaced. Returns 0 for an empty slice.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if values[best] < v {
            best = i;
        }
    }
    best
}
