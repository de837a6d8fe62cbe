use rand::Rng;

use crate::activation::activation::ActivationFunction;
use crate::layers::stage::{Stage, StageShape};
use crate::math::init::scaled_normal;
use crate::network::error::NetworkError;

/// Where a convolution reads from and writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvGeometry {
    pub input: StageShape,
    pub output: StageShape,
    pub kernel: usize,
    pub padding: usize,
    pub stride: usize,
}

impl ConvGeometry {
    /// Output extent along one axis: `(n + 2·padding − kernel) / stride + 1`.
    /// `None` when the kernel does not fit or stride is zero.
    fn extent(&self, n: usize) -> Option<usize> {
        if self.stride == 0 || self.kernel == 0 || n + 2 * self.padding < self.kernel {
            return None;
        }
        Some((n + 2 * self.padding - self.kernel) / self.stride + 1)
    }

    /// Checks that the declared output matches what the kernel produces.
    pub fn validate(&self, index: usize) -> Result<(), NetworkError> {
        if self.output.is_empty() || self.input.is_empty() {
            return Err(NetworkError::ZeroSized { index });
        }
        let expected_height = self.extent(self.input.height).unwrap_or(0);
        let expected_width = self.extent(self.input.width).unwrap_or(0);
        if expected_height != self.output.height || expected_width != self.output.width {
            return Err(NetworkError::ConvGeometry {
                index,
                input: self.input,
                kernel: self.kernel,
                padding: self.padding,
                stride: self.stride,
                expected_height,
                expected_width,
                declared_height: self.output.height,
                declared_width: self.output.width,
            });
        }
        Ok(())
    }

    fn weight_count(&self) -> usize {
        self.output.depth * self.input.depth * self.kernel * self.kernel
    }

    /// Calls `f(input_index, weight_index)` for every in-bounds kernel tap
    /// feeding output cell `(z, y, x)`. Taps that land in the zero padding
    /// are skipped.
    fn taps<F: FnMut(usize, usize)>(&self, z: usize, y: usize, x: usize, mut f: F) {
        let (ih, iw) = (self.input.height as isize, self.input.width as isize);
        let y0 = (y * self.stride) as isize - self.padding as isize;
        let x0 = (x * self.stride) as isize - self.padding as isize;
        let k = self.kernel;
        for c in 0..self.input.depth {
            for ky in 0..k {
                let py = y0 + ky as isize;
                if py < 0 || py >= ih {
                    continue;
                }
                for kx in 0..k {
                    let px = x0 + kx as isize;
                    if px < 0 || px >= iw {
                        continue;
                    }
                    let input_index = (c * ih as usize + py as usize) * iw as usize + px as usize;
                    let weight_index = ((z * self.input.depth + c) * k + ky) * k + kx;
                    f(input_index, weight_index);
                }
            }
        }
    }
}

/// Strided 2-D convolution with zero padding followed by ReLU.
#[derive(Debug, Clone)]
pub struct ConvStage {
    geometry: ConvGeometry,
    outputs: Vec<f64>,
    gradients: Vec<f64>,
    weights: Vec<f64>,
    biases: Vec<f64>,
    weight_updates: Vec<f64>,
    bias_updates: Vec<f64>,
}

impl ConvStage {
    /// Kernels ~ N(0, init_scale²), one zero bias per output map.
    ///
    /// `index` is only used to label a geometry error.
    pub fn new<R: Rng + ?Sized>(
        index: usize,
        geometry: ConvGeometry,
        init_scale: f64,
        rng: &mut R,
    ) -> Result<ConvStage, NetworkError> {
        geometry.validate(index)?;
        let n_weights = geometry.weight_count();
        let n_out = geometry.output.len();
        Ok(ConvStage {
            geometry,
            outputs: vec![0.0; n_out],
            gradients: vec![0.0; n_out],
            weights: scaled_normal(n_weights, init_scale, rng),
            biases: vec![0.0; geometry.output.depth],
            weight_updates: vec![0.0; n_weights],
            bias_updates: vec![0.0; geometry.output.depth],
        })
    }

    pub fn geometry(&self) -> ConvGeometry {
        self.geometry
    }

    #[cfg(test)]
    fn weights_mut(&mut self) -> &mut [f64] {
        &mut self.weights
    }
}

impl Stage for ConvStage {
    fn shape(&self) -> StageShape {
        self.geometry.output
    }

    fn forward(&mut self, inputs: &[f64]) {
        let geo = self.geometry;
        debug_assert_eq!(inputs.len(), geo.input.len());
        let mut o = 0;
        for z in 0..geo.output.depth {
            for y in 0..geo.output.height {
                for x in 0..geo.output.width {
                    let mut net = self.biases[z];
                    geo.taps(z, y, x, |i, w| net += inputs[i] * self.weights[w]);
                    self.outputs[o] = net;
                    o += 1;
                }
            }
        }
        ActivationFunction::ReLU.apply(&mut self.outputs, &mut self.gradients);
    }

    fn outputs(&self) -> &[f64] {
        &self.outputs
    }

    fn backward(&mut self, inputs: &[f64], errors: &[f64], upstream_errors: &mut [f64]) {
        let geo = self.geometry;
        upstream_errors.fill(0.0);
        let mut o = 0;
        for z in 0..geo.output.depth {
            for y in 0..geo.output.height {
                for x in 0..geo.output.width {
                    let dnet = errors[o] * self.gradients[o];
                    o += 1;
                    if dnet == 0.0 {
                        continue;
                    }
                    let weights = &self.weights;
                    let weight_updates = &mut self.weight_updates;
                    geo.taps(z, y, x, |i, w| {
                        upstream_errors[i] += weights[w] * dnet;
                        weight_updates[w] += dnet * inputs[i];
                    });
                    self.bias_updates[z] += dnet;
                }
            }
        }
    }

    fn apply_updates(&mut self, rate: f64) {
        for (w, u) in self.weights.iter_mut().zip(self.weight_updates.iter_mut()) {
            *w -= rate * *u;
            *u = 0.0;
        }
        for (b, u) in self.biases.iter_mut().zip(self.bias_updates.iter_mut()) {
            *b -= rate * *u;
            *u = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn geometry(input: StageShape, output: StageShape, kernel: usize, padding: usize, stride: usize) -> ConvGeometry {
        ConvGeometry { input, output, kernel, padding, stride }
    }

    #[test]
    fn mnist_geometry_is_accepted() {
        let g = geometry(StageShape::new(1, 28, 28), StageShape::new(16, 14, 14), 3, 1, 2);
        assert!(g.validate(0).is_ok());
        let g = geometry(StageShape::new(16, 14, 14), StageShape::new(32, 7, 7), 3, 1, 2);
        assert!(g.validate(1).is_ok());
    }

    #[test]
    fn mismatched_geometry_is_rejected() {
        let g = geometry(StageShape::new(1, 28, 28), StageShape::new(16, 13, 14), 3, 1, 2);
        match g.validate(3) {
            Err(NetworkError::ConvGeometry { index, expected_height, expected_width, .. }) => {
                assert_eq!((index, expected_height, expected_width), (3, 14, 14));
            }
            other => panic!("expected ConvGeometry, got {:?}", other),
        }
    }

    #[test]
    fn kernel_larger_than_padded_input_is_rejected() {
        let g = geometry(StageShape::new(1, 2, 2), StageShape::new(1, 1, 1), 5, 0, 1);
        assert!(matches!(g.validate(0), Err(NetworkError::ConvGeometry { .. })));
    }

    #[test]
    fn identity_kernel_copies_positive_inputs() {
        let g = geometry(StageShape::new(1, 2, 2), StageShape::new(1, 2, 2), 3, 1, 1);
        let mut stage = ConvStage::new(0, g, 0.0, &mut StdRng::seed_from_u64(0)).unwrap();
        // Centre tap only.
        stage.weights_mut()[4] = 1.0;
        stage.forward(&[1.0, -2.0, 3.0, 4.0]);
        assert_eq!(stage.outputs(), &[1.0, 0.0, 3.0, 4.0]);
    }

    #[test]
    fn stride_two_samples_every_other_cell() {
        let g = geometry(StageShape::new(1, 4, 4), StageShape::new(1, 2, 2), 1, 0, 2);
        let mut stage = ConvStage::new(0, g, 0.0, &mut StdRng::seed_from_u64(0)).unwrap();
        stage.weights_mut()[0] = 1.0;
        let inputs: Vec<f64> = (1..=16).map(f64::from).collect();
        stage.forward(&inputs);
        assert_eq!(stage.outputs(), &[1.0, 3.0, 9.0, 11.0]);
    }

    #[test]
    fn backward_routes_error_to_tapped_inputs_only() {
        let g = geometry(StageShape::new(1, 2, 2), StageShape::new(1, 2, 2), 3, 1, 1);
        let mut stage = ConvStage::new(0, g, 0.0, &mut StdRng::seed_from_u64(0)).unwrap();
        stage.weights_mut()[4] = 2.0;
        let inputs = [1.0, 1.0, 1.0, -1.0];
        stage.forward(&inputs);
        let mut upstream = [9.0; 4];
        stage.backward(&inputs, &[1.0, 0.0, 0.0, 1.0], &mut upstream);
        // Cell 3 was clamped by ReLU, so its error does not flow back.
        assert_eq!(upstream, [2.0, 0.0, 0.0, 0.0]);
    }
}
