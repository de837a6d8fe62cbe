pub mod conv;
pub mod dense;
pub mod input;
pub mod stage;

pub use conv::{ConvGeometry, ConvStage};
pub use dense::DenseStage;
pub use input::InputStage;
pub use stage::{Stage, StageShape};
