//! Small candle networks for the weight-backed estimators.
//!
//! Both nets take a `[1, 3, S, S]` batch in [0, 1]. Weights are loaded from
//! safetensors with the tensor names produced by `VarBuilder` paths below.

mod blocks;
mod landmark_net;
mod segmentation_net;

pub use blocks::ConvBlock;
pub use landmark_net::{LandmarkNet, NetLandmarkEstimator};
pub use segmentation_net::{NetSegmenter, SegmentationNet};

use {
    crate::{InferError, error::validate_frame},
    base::Tensor,
    candle_core::{Device, Tensor as CanTensor},
};

/// Side length the nets run at.
pub const NET_INPUT: usize = 256;

/// HWC [0, 1] frame -> NCHW batch of one, resized to `NET_INPUT`.
pub(crate) fn preprocess(frame: &Tensor<f32>, device: &Device) -> Result<CanTensor, InferError> {
    let (h, w) = validate_frame(frame)?;
    let tensor = CanTensor::from_vec(frame.data.clone(), (h, w, 3), device)?;
    let tensor = tensor.permute((2, 0, 1))?.unsqueeze(0)?;
    let tensor = if h != NET_INPUT || w != NET_INPUT {
        tensor.upsample_nearest2d(NET_INPUT, NET_INPUT)?
    } else {
        tensor
    };
    Ok(tensor.contiguous()?)
}
