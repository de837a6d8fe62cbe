use serde::{Serialize, Deserialize};

/// One periodic error summary emitted by `train_loop`.
///
/// The loop sends one of these every `report_interval` iterations,
/// starting with iteration 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowReport {
    /// 0-based iteration that triggered the report.
    pub iteration: usize,
    /// Error accumulated since the previous report, divided by the full
    /// window length. The first report therefore covers a single sample.
    pub mean_error: f64,
}

/// What a finished `train_loop` call hands back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainSummary {
    /// Total iterations run: `epochs × record count`.
    pub iterations: usize,
    pub reports: Vec<WindowReport>,
}
