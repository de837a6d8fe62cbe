use crate::layers::stage::StageShape;

/// Head of a network. Holds the most recent input vector so downstream
/// stages can read it during the backward pass.
#[derive(Debug, Clone)]
pub struct InputStage {
    shape: StageShape,
    values: Vec<f64>,
}

impl InputStage {
    pub fn new(shape: StageShape) -> InputStage {
        InputStage {
            shape,
            values: vec![0.0; shape.len()],
        }
    }

    pub fn shape(&self) -> StageShape {
        self.shape
    }

    /// # Panics
    /// Panics if `inputs` is not exactly `shape().len()` long.
    pub fn set(&mut self, inputs: &[f64]) {
        assert_eq!(
            inputs.len(),
            self.values.len(),
            "input vector has {} values, input stage expects {}",
            inputs.len(),
            self.values.len()
        );
        self.values.copy_from_slice(inputs);
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}
