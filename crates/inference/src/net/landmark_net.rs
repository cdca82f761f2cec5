use {
    super::{ConvBlock, preprocess},
    crate::{
        InferError,
        landmark::{COCO_KEYPOINT_COUNT, Landmark, LandmarkEstimator, collect_confident},
    },
    base::Tensor,
    candle_core::{DType, Device, Module, Tensor as CanTensor},
    candle_nn::{Linear, VarBuilder, linear},
    std::path::Path,
};

/// Regresses `(x, y, confidence)` for each COCO keypoint.
#[derive(Debug)]
pub struct LandmarkNet {
    stem: ConvBlock,
    down1: ConvBlock,
    down2: ConvBlock,
    head: Linear,
}

impl LandmarkNet {
    pub fn load(vb: VarBuilder) -> candle_core::Result<Self> {
        let stem = ConvBlock::same(vb.pp("stem"), 3, 8, 2)?;
        let down1 = ConvBlock::same(vb.pp("down1"), 8, 16, 2)?;
        let down2 = ConvBlock::same(vb.pp("down2"), 16, 32, 2)?;
        let head = linear(32, COCO_KEYPOINT_COUNT * 3, vb.pp("head"))?;
        Ok(Self {
            stem,
            down1,
            down2,
            head,
        })
    }
}

impl Module for LandmarkNet {
    fn forward(&self, xs: &CanTensor) -> candle_core::Result<CanTensor> {
        let features = xs
            .apply(&self.stem)?
            .apply(&self.down1)?
            .apply(&self.down2)?
            .mean((2, 3))?;
        candle_nn::ops::sigmoid(&features.apply(&self.head)?)
    }
}

/// `LandmarkEstimator` running a `LandmarkNet`.
#[derive(Debug)]
pub struct NetLandmarkEstimator {
    model: LandmarkNet,
    device: Device,
}

impl NetLandmarkEstimator {
    pub(crate) fn new(model_path: impl AsRef<Path>, device: Device) -> Result<Self, InferError> {
        let path = model_path.as_ref();
        if !path.exists() {
            return Err(InferError::Io(format!(
                "landmark model not found: {}",
                path.display()
            )));
        }
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[path], DType::F32, &device)? };
        Ok(Self::from_model(LandmarkNet::load(vb)?, device))
    }

    pub fn from_model(model: LandmarkNet, device: Device) -> Self {
        Self { model, device }
    }
}

impl LandmarkEstimator for NetLandmarkEstimator {
    fn estimate(&self, frame: &Tensor<f32>) -> Result<Vec<Landmark>, InferError> {
        let input = preprocess(frame, &self.device)?;
        let output = self.model.forward(&input)?.flatten_all()?.to_vec1::<f32>()?;
        if output.len() != COCO_KEYPOINT_COUNT * 3 {
            return Err(InferError::Shape(format!(
                "landmark head produced {} values",
                output.len()
            )));
        }
        Ok(collect_confident(
            output.chunks_exact(3).map(|kp| (kp[0], kp[1], kp[2])),
        ))
    }

    fn name(&self) -> &'static str {
        "landmark-net"
    }
}

#[cfg(test)]
mod tests {
    use {super::*, candle_nn::VarMap};

    #[test]
    fn test_forward_shape() {
        let device = Device::Cpu;
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let model = LandmarkNet::load(vb).unwrap();
        let input = CanTensor::zeros((1, 3, 64, 64), DType::F32, &device).unwrap();
        let output = model.forward(&input).unwrap();
        assert_eq!(output.dims(), &[1, 51]);
    }

    #[test]
    fn test_estimator_respects_threshold() {
        let device = Device::Cpu;
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let estimator = NetLandmarkEstimator::from_model(LandmarkNet::load(vb).unwrap(), device);
        let frame = Tensor::new(vec![32, 32, 3], vec![0.5; 32 * 32 * 3]).unwrap();
        let landmarks = estimator.estimate(&frame).unwrap();
        assert!(landmarks.len() <= 17);
        assert!(landmarks.iter().all(|l| l.confidence > 0.5));
    }
}
