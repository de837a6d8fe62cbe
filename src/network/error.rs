use thiserror::Error;

use crate::layers::stage::StageShape;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("network has no stages after the input")]
    Empty,

    #[error("stage {index} has a zero-sized dimension")]
    ZeroSized { index: usize },

    #[error(
        "conv stage {index}: kernel {kernel}, padding {padding}, stride {stride} over {input:?} \
         yields {expected_height}×{expected_width}, but {declared_height}×{declared_width} was declared"
    )]
    ConvGeometry {
        index: usize,
        input: StageShape,
        kernel: usize,
        padding: usize,
        stride: usize,
        expected_height: usize,
        expected_width: usize,
        declared_height: usize,
        declared_width: usize,
    },
}
