use crate::layers::input::InputStage;
use crate::layers::stage::{Stage, StageShape};
use crate::loss::mse::MseLoss;
use crate::network::error::NetworkError;
use crate::network::trainable::Trainable;

/// An input stage followed by a chain of transformation stages.
#[derive(Debug)]
pub struct Network {
    input: InputStage,
    stages: Vec<Box<dyn Stage>>,
    // errors[i] is dL/dy for stages[i]; input_errors is dL/dx for the input.
    errors: Vec<Vec<f64>>,
    input_errors: Vec<f64>,
    error_total: f64,
}

impl Network {
    /// Builds a network, checking that every stage is non-empty.
    pub fn new(input: StageShape, stages: Vec<Box<dyn Stage>>) -> Result<Network, NetworkError> {
        if stages.is_empty() {
            return Err(NetworkError::Empty);
        }
        if input.is_empty() {
            return Err(NetworkError::ZeroSized { index: 0 });
        }
        if let Some(index) = stages.iter().position(|s| s.len() == 0) {
            return Err(NetworkError::ZeroSized { index: index + 1 });
        }
        let errors = stages.iter().map(|s| vec![0.0; s.len()]).collect();
        Ok(Network {
            input: InputStage::new(input),
            stages,
            errors,
            input_errors: vec![0.0; input.len()],
            error_total: 0.0,
        })
    }

    pub fn input_shape(&self) -> StageShape {
        self.input.shape()
    }

    pub fn stages(&self) -> &[Box<dyn Stage>] {
        &self.stages
    }

    /// Runs one input through the network and returns the output slice.
    pub fn forward(&mut self, inputs: &[f64]) -> &[f64] {
        self.set_inputs(inputs);
        self.last().outputs()
    }

    fn last(&self) -> &dyn Stage {
        // `new` guarantees at least one stage.
        self.stages[self.stages.len() - 1].as_ref()
    }
}

impl Trainable for Network {
    fn input_len(&self) -> usize {
        self.input.shape().len()
    }

    fn output_len(&self) -> usize {
        self.last().len()
    }

    fn set_inputs(&mut self, inputs: &[f64]) {
        self.input.set(inputs);
        for i in 0..self.stages.len() {
            let (done, rest) = self.stages.split_at_mut(i);
            let upstream = match done.last() {
                Some(prev) => prev.outputs(),
                None => self.input.values(),
            };
            rest[0].forward(upstream);
        }
    }

    fn get_outputs(&self, outputs: &mut [f64]) {
        let last = self.last().outputs();
        outputs[..last.len()].copy_from_slice(last);
    }

    fn learn_from_target(&mut self, target: &[f64]) {
        let n = self.stages.len();
        self.error_total = MseLoss::errors_into(
            self.stages[n - 1].outputs(),
            target,
            &mut self.errors[n - 1],
        );

        for i in (0..n).rev() {
            let (stages_done, stages_rest) = self.stages.split_at_mut(i);
            let (errors_done, errors_rest) = self.errors.split_at_mut(i);
            let inputs = match stages_done.last() {
                Some(prev) => prev.outputs(),
                None => self.input.values(),
            };
            let upstream_errors = match errors_done.last_mut() {
                Some(e) => e.as_mut_slice(),
                None => self.input_errors.as_mut_slice(),
            };
            stages_rest[0].backward(inputs, &errors_rest[0], upstream_errors);
        }
    }

    fn error_total(&self) -> f64 {
        self.error_total
    }

    fn apply_updates(&mut self, rate: f64) {
        for stage in self.stages.iter_mut().rev() {
            stage.apply_updates(rate);
        }
    }
}
