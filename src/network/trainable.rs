/// The capability set the training and evaluation drivers need from a model.
///
/// Calls are strictly sequential. Resources are released on `Drop`.
pub trait Trainable {
    /// Width of the vector `set_inputs` expects.
    fn input_len(&self) -> usize;

    /// Width of the vector `get_outputs` fills; also the one-hot target width.
    fn output_len(&self) -> usize;

    /// Loads an input vector and runs inference with the current parameters.
    fn set_inputs(&mut self, inputs: &[f64]);

    /// Copies the outputs of the last inference into `outputs`.
    fn get_outputs(&self, outputs: &mut [f64]);

    /// Back-propagates the difference between the last outputs and `target`,
    /// accumulating parameter updates without applying them.
    fn learn_from_target(&mut self, target: &[f64]);

    /// Scalar error recorded by the last `learn_from_target`.
    fn error_total(&self) -> f64;

    /// Applies the accumulated updates scaled by `rate` and clears them.
    fn apply_updates(&mut self, rate: f64);
}
