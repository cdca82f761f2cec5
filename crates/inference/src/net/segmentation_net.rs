use {
    super::{ConvBlock, NET_INPUT, preprocess},
    crate::{
        InferError,
        error::validate_frame,
        segment::{RegionSegmenter, present},
    },
    base::Tensor,
    candle_core::{DType, Device, Module, Tensor as CanTensor},
    candle_nn::{Conv2d, Conv2dConfig, VarBuilder, conv2d},
    std::path::Path,
};

/// Per-pixel foreground probability at `NET_INPUT` resolution.
#[derive(Debug)]
pub struct SegmentationNet {
    stem: ConvBlock,
    head: Conv2d,
}

impl SegmentationNet {
    pub fn load(vb: VarBuilder) -> candle_core::Result<Self> {
        let stem = ConvBlock::same(vb.pp("stem"), 3, 8, 1)?;
        let head = conv2d(8, 1, 1, Conv2dConfig::default(), vb.pp("head"))?;
        Ok(Self { stem, head })
    }
}

impl Module for SegmentationNet {
    fn forward(&self, xs: &CanTensor) -> candle_core::Result<CanTensor> {
        candle_nn::ops::sigmoid(&xs.apply(&self.stem)?.apply(&self.head)?)
    }
}

/// `RegionSegmenter` running a `SegmentationNet`; the mask is resized back
/// to the frame size.
#[derive(Debug)]
pub struct NetSegmenter {
    model: SegmentationNet,
    device: Device,
}

impl NetSegmenter {
    pub(crate) fn new(model_path: impl AsRef<Path>, device: Device) -> Result<Self, InferError> {
        let path = model_path.as_ref();
        if !path.exists() {
            return Err(InferError::Io(format!(
                "segmentation model not found: {}",
                path.display()
            )));
        }
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[path], DType::F32, &device)? };
        Ok(Self::from_model(SegmentationNet::load(vb)?, device))
    }

    pub fn from_model(model: SegmentationNet, device: Device) -> Self {
        Self { model, device }
    }
}

impl RegionSegmenter for NetSegmenter {
    fn segment(&self, frame: &Tensor<f32>) -> Result<Option<Tensor<f32>>, InferError> {
        let (h, w) = validate_frame(frame)?;
        let input = preprocess(frame, &self.device)?;
        let output = self.model.forward(&input)?;
        let output = if h != NET_INPUT || w != NET_INPUT {
            output.upsample_nearest2d(h, w)?
        } else {
            output
        };
        let data = output.flatten_all()?.to_vec1::<f32>()?;
        Ok(present(Tensor::new(vec![h, w], data)?))
    }

    fn name(&self) -> &'static str {
        "segmentation-net"
    }
}
