use std::sync::mpsc;

use crate::train::window_report::WindowReport;

pub const DEFAULT_EPOCHS: usize = 10;
pub const DEFAULT_BATCH_SIZE: usize = 32;
pub const DEFAULT_REPORT_INTERVAL: usize = 1000;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`          — the iteration budget is `epochs × record count`;
///                       samples are drawn with replacement, so an "epoch"
///                       is a budget unit rather than a full pass
/// - `batch_size`      — updates are applied whenever `i % batch_size == 0`
/// - `report_interval` — a `WindowReport` is emitted whenever
///                       `i % report_interval == 0`
/// - `progress_tx`     — optional channel sender receiving every report.
///                       A dropped receiver is ignored; the run always
///                       finishes its budget.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub report_interval: usize,
    pub progress_tx: Option<mpsc::Sender<WindowReport>>,
}

impl TrainConfig {
    /// Creates a `TrainConfig` with the default report interval and no
    /// progress channel.
    pub fn new(epochs: usize, batch_size: usize) -> Self {
        TrainConfig {
            epochs,
            batch_size,
            report_interval: DEFAULT_REPORT_INTERVAL,
            progress_tx: None,
        }
    }

    /// `epochs × records`, or `None` if that does not fit in `usize`.
    pub fn total_iterations(&self, records: usize) -> Option<usize> {
        self.epochs.checked_mul(records)
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig::new(DEFAULT_EPOCHS, DEFAULT_BATCH_SIZE)
    }
}
