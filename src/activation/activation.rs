use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    ReLU,
    #[default]
    Tanh,
    /// Vector-valued; only meaningful on the output stage, paired with the
    /// `outputs - target` error that `Network::learn_from_target` seeds.
    Softmax,
}

impl ActivationFunction {
    /// Activates `values` (pre-activations on entry) in place and writes the
    /// local derivative dy/dnet for every element into `gradients`.
    ///
    /// The derivatives are expressed in terms of the activated output `y`,
    /// so stages never need to keep the pre-activation around.
    pub fn apply(&self, values: &mut [f64], gradients: &mut [f64]) {
        debug_assert_eq!(values.len(), gradients.len());
        match self {
            ActivationFunction::ReLU => {
                for (v, g) in values.iter_mut().zip(gradients.iter_mut()) {
                    if *v > 0.0 {
                        *g = 1.0;
                    } else {
                        *v = 0.0;
                        *g = 0.0;
                    }
                }
            }
            ActivationFunction::Tanh => {
                for (v, g) in values.iter_mut().zip(gradients.iter_mut()) {
                    let y = v.tanh();
                    *v = y;
                    *g = 1.0 - y * y;
                }
            }
            ActivationFunction::Softmax => {
                // Shift by the max to keep exp() finite.
                let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                let mut total = 0.0;
                for v in values.iter_mut() {
                    *v = (*v - max).exp();
                    total += *v;
                }
                for v in values.iter_mut() {
                    *v /= total;
                }
                // The combined softmax + squared-error gradient is taken as
                // `y - t` directly; the Jacobian is not applied a second time.
                gradients.fill(1.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn relu_clamps_and_gates() {
        let mut v = [-1.0, 0.0, 2.5];
        let mut g = [9.0; 3];
        ActivationFunction::ReLU.apply(&mut v, &mut g);
        assert_eq!(v, [0.0, 0.0, 2.5]);
        assert_eq!(g, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn tanh_gradient_is_one_minus_square() {
        let mut v = [0.5];
        let mut g = [0.0];
        ActivationFunction::Tanh.apply(&mut v, &mut g);
        assert_relative_eq!(v[0], 0.5f64.tanh());
        assert_relative_eq!(g[0], 1.0 - 0.5f64.tanh().powi(2));
    }

    #[test]
    fn softmax_is_a_distribution() {
        let mut v = [1000.0, 1001.0, 999.0];
        let mut g = [0.0; 3];
        ActivationFunction::Softmax.apply(&mut v, &mut g);
        assert_relative_eq!(v.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert!(v[1] > v[0] && v[0] > v[2]);
        assert_eq!(g, [1.0; 3]);
    }

    #[test]
    fn default_hidden_activation_is_tanh() {
        assert_eq!(ActivationFunction::default(), ActivationFunction::Tanh);
        let parsed: ActivationFunction = serde_json::from_str("\"softmax\"").unwrap();
        assert_eq!(parsed, ActivationFunction::Softmax);
    }
}
