pub struct MseLoss;

impl MseLoss {
    /// Writes the per-output error `predicted - expected` into `errors` and
    /// returns the scalar loss mean(errors²).
    pub fn errors_into(predicted: &[f64], expected: &[f64], errors: &mut [f64]) -> f64 {
        assert_eq!(predicted.len(), expected.len(), "prediction/target width mismatch");
        assert_eq!(predicted.len(), errors.len(), "error buffer width mismatch");
        if predicted.is_empty() {
            return 0.0;
        }
        let mut total = 0.0;
        for ((e, p), y) in errors.iter_mut().zip(predicted).zip(expected) {
            *e = p - y;
            total += *e * *e;
        }
        total / predicted.len() as f64
    }
}
