use rand::Rng;

use crate::activation::activation::ActivationFunction;
use crate::layers::stage::{Stage, StageShape};
use crate::math::init::scaled_normal;

/// Fully-connected stage: `y = act(W·x + b)`.
///
/// `weights` is row-major by output, i.e. `weights[i * input_size + j]`
/// connects input `j` to output `i`.
#[derive(Debug, Clone)]
pub struct DenseStage {
    input_size: usize,
    outputs: Vec<f64>,
    gradients: Vec<f64>,  // dy/dnet from the last forward pass
    weights: Vec<f64>,
    biases: Vec<f64>,
    weight_updates: Vec<f64>,
    bias_updates: Vec<f64>,
    activator: ActivationFunction,
}

impl DenseStage {
    /// Weights ~ N(0, init_scale²), biases zero.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        size: usize,
        activation: ActivationFunction,
        init_scale: f64,
        rng: &mut R,
    ) -> DenseStage {
        let weights = scaled_normal(input_size * size, init_scale, rng);
        DenseStage::with_weights(input_size, weights, vec![0.0; size], activation)
    }

    /// # Panics
    /// Panics if `weights.len() != input_size * biases.len()`.
    pub fn with_weights(
        input_size: usize,
        weights: Vec<f64>,
        biases: Vec<f64>,
        activation: ActivationFunction,
    ) -> DenseStage {
        let size = biases.len();
        assert_eq!(weights.len(), input_size * size, "dense weights must be {}×{}", size, input_size);
        DenseStage {
            input_size,
            outputs: vec![0.0; size],
            gradients: vec![0.0; size],
            weight_updates: vec![0.0; weights.len()],
            bias_updates: vec![0.0; size],
            weights,
            biases,
            activator: activation,
        }
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activator
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn biases(&self) -> &[f64] {
        &self.biases
    }
}

impl Stage for DenseStage {
    fn shape(&self) -> StageShape {
        StageShape::flat(self.outputs.len())
    }

    fn forward(&mut self, inputs: &[f64]) {
        debug_assert_eq!(inputs.len(), self.input_size);
        for (i, out) in self.outputs.iter_mut().enumerate() {
            let row = &self.weights[i * self.input_size..(i + 1) * self.input_size];
            *out = self.biases[i] + row.iter().zip(inputs).map(|(w, x)| w * x).sum::<f64>();
        }
        self.activator.apply(&mut self.outputs, &mut self.gradients);
    }

    fn outputs(&self) -> &[f64] {
        &self.outputs
    }

    fn backward(&mut self, inputs: &[f64], errors: &[f64], upstream_errors: &mut [f64]) {
        upstream_errors.fill(0.0);
        for i in 0..self.outputs.len() {
            let dnet = errors[i] * self.gradients[i];
            let offset = i * self.input_size;
            for j in 0..self.input_size {
                upstream_errors[j] += self.weights[offset + j] * dnet;
                self.weight_updates[offset + j] += dnet * inputs[j];
            }
            self.bias_updates[i] += dnet;
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
    use approx::assert_relative_eq;

    #[test]
    fn forward_is_affine_then_activation() {
        let mut stage = DenseStage::with_weights(
            2,
            vec![1.0, 2.0, -1.0, 0.5],
            vec![0.5, 0.0],
            ActivationFunction::ReLU,
        );
        stage.forward(&[1.0, 1.0]);
        assert_eq!(stage.outputs(), &[3.5, 0.0]);
    }

    #[test]
    fn backward_then_update_follows_tanh_gradient() {
        let mut stage = DenseStage::with_weights(1, vec![0.5], vec![0.0], ActivationFunction::Tanh);
        let x = [2.0];
        stage.forward(&x);
        let y = 1.0f64.tanh();
        assert_relative_eq!(stage.outputs()[0], y);

        // Target 0, so the error is y itself.
        let dnet = y * (1.0 - y * y);
        let mut upstream = [123.0];
        stage.backward(&x, &[y], &mut upstream);
        assert_relative_eq!(upstream[0], 0.5 * dnet);

        stage.apply_updates(1.0);
        assert_relative_eq!(stage.weights()[0], 0.5 - dnet * 2.0);
        assert_relative_eq!(stage.biases()[0], -dnet);
    }

    #[test]
    fn updates_accumulate_until_applied() {
        let mut stage = DenseStage::with_weights(1, vec![1.0], vec![0.0], ActivationFunction::ReLU);
        let mut upstream = [0.0];
        for _ in 0..3 {
            stage.forward(&[1.0]);
            stage.backward(&[1.0], &[1.0], &mut upstream);
        }
        assert_eq!(stage.weights(), &[1.0]);
        stage.apply_updates(0.1);
        assert_relative_eq!(stage.weights()[0], 1.0 - 0.3);

        // Accumulators were cleared.
        stage.apply_updates(0.1);
        assert_relative_eq!(stage.weights()[0], 0.7);
    }
}
