use crate::network::trainable::Trainable;

/// Plain minibatch SGD: accumulated updates are applied once per batch,
/// scaled by `learning_rate / batch_size`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// The per-parameter rate handed to `Trainable::apply_updates`.
    pub fn scaled_rate(&self, batch_size: usize) -> f64 {
        self.learning_rate / batch_size as f64
    }

    /// Applies the model's accumulated updates for one minibatch.
    pub fn step<M: Trainable + ?Sized>(&self, model: &mut M, batch_size: usize) {
        model.apply_updates(self.scaled_rate(batch_size));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_rate_is_divided_by_batch() {
        let sgd = Sgd::new(0.1);
        assert_eq!(sgd.scaled_rate(1), 0.1);
        assert_eq!(sgd.scaled_rate(32), 0.1 / 32.0);
    }
}
