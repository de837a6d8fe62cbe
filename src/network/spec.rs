use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::layers::conv::{ConvGeometry, ConvStage};
use crate::layers::dense::DenseStage;
use crate::layers::stage::{Stage, StageShape};
use crate::network::error::NetworkError;
use crate::network::network::Network;

fn default_init_scale() -> f64 {
    0.1
}

/// One stage after the input, in pipeline order.
///
/// Fields:
/// - `depth`, `height`, `width` — output feature maps of a conv stage; the
///   spatial extents must match what `kernel`/`padding`/`stride` produce
/// - `width` of a full stage — number of outputs
/// - `init_scale` — standard deviation of the initial weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerSpec {
    Conv {
        depth: usize,
        height: usize,
        width: usize,
        kernel: usize,
        padding: usize,
        stride: usize,
        #[serde(default = "default_init_scale")]
        init_scale: f64,
    },
    Full {
        width: usize,
        #[serde(default)]
        activation: ActivationFunction,
        #[serde(default = "default_init_scale")]
        init_scale: f64,
    },
}

/// A serializable description of a network: the input shape plus the
/// ordered stages that follow it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub input: StageShape,
    pub layers: Vec<LayerSpec>,
}

impl NetworkSpec {
    /// 1×28×28 → conv 16×14×14 → conv 32×7×7 → 200 → 50 → 10 (softmax).
    pub fn mnist() -> NetworkSpec {
        NetworkSpec {
            input: StageShape::new(1, 28, 28),
            layers: vec![
                LayerSpec::Conv { depth: 16, height: 14, width: 14, kernel: 3, padding: 1, stride: 2, init_scale: 0.1 },
                LayerSpec::Conv { depth: 32, height: 7, width: 7, kernel: 3, padding: 1, stride: 2, init_scale: 0.1 },
                LayerSpec::Full { width: 200, activation: ActivationFunction::Tanh, init_scale: 0.1 },
                LayerSpec::Full { width: 50, activation: ActivationFunction::Tanh, init_scale: 0.1 },
                LayerSpec::Full { width: 10, activation: ActivationFunction::Softmax, init_scale: 0.1 },
            ],
        }
    }

    /// Instantiates the network, drawing initial weights from `rng` in
    /// stage order.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network, NetworkError> {
        let mut upstream = self.input;
        let mut stages: Vec<Box<dyn Stage>> = Vec::with_capacity(self.layers.len());

        for (i, layer) in self.layers.iter().enumerate() {
            // Index 0 is the input stage.
            let index = i + 1;
            let stage: Box<dyn Stage> = match *layer {
                LayerSpec::Conv { depth, height, width, kernel, padding, stride, init_scale } => {
                    let geometry = ConvGeometry {
                        input: upstream,
                        output: StageShape::new(depth, height, width),
                        kernel,
                        padding,
                        stride,
                    };
                    Box::new(ConvStage::new(index, geometry, init_scale, rng)?)
                }
                LayerSpec::Full { width, activation, init_scale } => {
                    if width == 0 || upstream.is_empty() {
                        return Err(NetworkError::ZeroSized { index });
                    }
                    Box::new(DenseStage::new(upstream.len(), width, activation, init_scale, rng))
                }
            };
            upstream = stage.shape();
            stages.push(stage);
        }

        Network::new(self.input, stages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::trainable::Trainable;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn mnist_spec_builds_784_to_10() {
        let net = NetworkSpec::mnist().build(&mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(net.input_len(), 784);
        assert_eq!(net.output_len(), 10);
        assert_eq!(net.stages().len(), 5);
        assert_eq!(net.stages()[1].shape(), StageShape::new(32, 7, 7));
    }

    #[test]
    fn same_seed_builds_identical_networks() {
        let spec = NetworkSpec {
            input: StageShape::new(1, 3, 3),
            layers: vec![
                LayerSpec::Conv { depth: 2, height: 3, width: 3, kernel: 3, padding: 1, stride: 1, init_scale: 0.1 },
                LayerSpec::Full { width: 4, activation: ActivationFunction::Softmax, init_scale: 0.1 },
            ],
        };
        let x: Vec<f64> = (0..9).map(|v| v as f64 / 9.0).collect();
        let mut a = spec.build(&mut StdRng::seed_from_u64(11)).unwrap();
        let mut b = spec.build(&mut StdRng::seed_from_u64(11)).unwrap();
        assert_eq!(a.forward(&x), b.forward(&x));
    }

    #[test]
    fn conv_geometry_error_names_the_stage() {
        let mut spec = NetworkSpec::mnist();
        spec.layers[1] = LayerSpec::Conv { depth: 32, height: 8, width: 7, kernel: 3, padding: 1, stride: 2, init_scale: 0.1 };
        let err = spec.build(&mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, NetworkError::ConvGeometry { index: 2, .. }), "{:?}", err);
    }

    #[test]
    fn zero_width_full_stage_is_rejected() {
        let spec = NetworkSpec {
            input: StageShape::new(1, 2, 2),
            layers: vec![LayerSpec::Full { width: 0, activation: ActivationFunction::Tanh, init_scale: 0.1 }],
        };
        assert!(matches!(
            spec.build(&mut StdRng::seed_from_u64(0)),
            Err(NetworkError::ZeroSized { index: 1 })
        ));
    }

    #[test]
    fn json_fills_in_defaults() {
        let json = r#"{
            "input": { "depth": 1, "height": 2, "width": 2 },
            "layers": [
                { "type": "full", "width": 3 },
                { "type": "full", "width": 2, "activation": "softmax", "init_scale": 0.5 }
            ]
        }"#;
        let spec: NetworkSpec = serde_json::from_str(json).unwrap();
        assert_eq!(
            spec.layers[0],
            LayerSpec::Full { width: 3, activation: ActivationFunction::Tanh, init_scale: 0.1 }
        );
        assert_eq!(
            spec.layers[1],
            LayerSpec::Full { width: 2, activation: ActivationFunction::Softmax, init_scale: 0.5 }
        );
    }
}
