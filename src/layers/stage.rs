use serde::{Serialize, Deserialize};

/// Spatial layout of a stage's output: `depth` feature maps of
/// `height × width`. Fully-connected stages are `width × 1 × 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageShape {
    pub depth: usize,
    pub height: usize,
    pub width: usize,
}

impl StageShape {
    pub fn new(depth: usize, height: usize, width: usize) -> StageShape {
        StageShape { depth, height, width }
    }

    pub fn flat(len: usize) -> StageShape {
        StageShape { depth: len, height: 1, width: 1 }
    }

    pub fn len(&self) -> usize {
        self.depth * self.height * self.width
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One transformation stage of a `Network`.
///
/// A stage never holds a reference to its neighbours; the network hands it
/// the upstream outputs on every call.
pub trait Stage: std::fmt::Debug {
    fn shape(&self) -> StageShape;

    fn len(&self) -> usize {
        self.shape().len()
    }

    /// Computes this stage's outputs from the upstream outputs.
    fn forward(&mut self, inputs: &[f64]);

    fn outputs(&self) -> &[f64];

    /// Back-propagates `errors` (dL/dy for this stage's outputs).
    ///
    /// Accumulates parameter updates internally and overwrites
    /// `upstream_errors` with dL/dy for the upstream stage. `inputs` must be
    /// the same slice passed to the preceding `forward`.
    fn backward(&mut self, inputs: &[f64], errors: &[f64], upstream_errors: &mut [f64]);

    /// Subtracts `rate × accumulated update` from every parameter, then clears
    /// the accumulators.
    fn apply_updates(&mut self, rate: f64);
}
