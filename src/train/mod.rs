pub mod loop_fn;
pub mod train_config;
pub mod window_report;

pub use loop_fn::train_loop;
pub use train_config::TrainConfig;
pub use window_report::{TrainSummary, WindowReport};
