use log::{info, trace};
use rand::Rng;

use crate::data::dataset::{LabeledImages, SampleBuffers};
use crate::network::trainable::Trainable;
use crate::optim::sgd::Sgd;
use crate::train::train_config::TrainConfig;
use crate::train::window_report::{TrainSummary, WindowReport};

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `model` on `data` for `config.epochs × data.len()` iterations.
///
/// Every iteration draws one record uniformly at random (with replacement)
/// from `rng`, feeds its normalised pixels forward, reads the outputs, then
/// learns from the one-hot target and adds the model's error to a running
/// total. Accumulated updates are applied through `optimizer` whenever
/// `i % batch_size == 0`, and a `WindowReport` is emitted whenever
/// `i % report_interval == 0`. Iteration 0 triggers both.
///
/// # Arguments
/// - `model`     — exclusively borrowed for the whole run
/// - `data`      — training images and labels
/// - `optimizer` — carries the learning rate; each update uses `lr / batch_size`
/// - `config`    — cadence constants and an optional progress channel
/// - `rng`       — the only source of randomness; a fixed seed reproduces
///                 the sample sequence and every report exactly
///
/// # Panics
/// Panics if `batch_size` or `report_interval` is zero, if
/// `epochs × data.len()` overflows `usize`, or if the model's input/output
/// widths do not match the dataset's record width and class count.
pub fn train_loop<M, R>(
    model: &mut M,
    data: &LabeledImages,
    optimizer: &Sgd,
    config: &TrainConfig,
    rng: &mut R,
) -> TrainSummary
where
    M: Trainable + ?Sized,
    R: Rng + ?Sized,
{
    assert!(config.batch_size > 0, "batch_size must be at least 1");
    assert!(config.report_interval > 0, "report_interval must be at least 1");
    assert_eq!(
        model.input_len(),
        data.input_len(),
        "model expects {} inputs but records hold {} values",
        model.input_len(),
        data.input_len()
    );
    assert_eq!(
        model.output_len(),
        data.classes(),
        "model produces {} outputs but the dataset has {} classes",
        model.output_len(),
        data.classes()
    );

    let records = data.len();
    let total = match config.total_iterations(records) {
        Some(total) => total,
        None => panic!(
            "iteration budget overflows: {} epochs × {} records",
            config.epochs, records
        ),
    };
    let window = config.report_interval as f64;
    info!(
        "training: {} iterations ({} epochs × {} records), batch size {}, learning rate {}",
        total, config.epochs, records, config.batch_size, optimizer.learning_rate
    );

    let mut buffers = SampleBuffers::new(data.input_len(), model.output_len());
    let mut reports = Vec::new();
    let mut running_error = 0.0;

    for i in 0..total {
        let index = rng.gen_range(0..records);
        let label = data.load_sample(index, &mut buffers);

        // Outputs are read before the label is applied.
        model.set_inputs(&buffers.input);
        model.get_outputs(&mut buffers.output);
        trace!("i={} index={} label={} outputs={:?}", i, index, label, buffers.output);

        buffers.set_one_hot(label);
        model.learn_from_target(&buffers.target);
        running_error += model.error_total();

        if i % config.batch_size == 0 {
            optimizer.step(model, config.batch_size);
        }

        if i % config.report_interval == 0 {
            let report = WindowReport { iteration: i, mean_error: running_error / window };
            info!("i={}, error={:.4}", report.iteration, report.mean_error);
            if let Some(ref tx) = config.progress_tx {
                // A dropped receiver must not cut the run short.
                let _ = tx.send(report.clone());
            }
            reports.push(report);
            running_error = 0.0;
        }
    }

    TrainSummary { iterations: total, reports }
}
