use {
    crate::{
        error::InferError,
        net::{NetLandmarkEstimator, NetSegmenter},
        silhouette::{SilhouetteEstimator, SilhouetteSegmenter},
    },
    candle_core::Device,
    std::path::Path,
};

/// Entry point for the estimation backends; owns the compute device.
#[derive(Debug)]
pub struct Inference {
    device: Device,
}

impl Inference {
    pub fn cpu() -> Result<Self, InferError> {
        log::info!("Inference device: CPU");
        Ok(Self {
            device: Device::Cpu,
        })
    }

    #[cfg(feature = "cuda")]
    pub fn cuda(ordinal: usize) -> Result<Self, InferError> {
        let device = Device::new_cuda(ordinal)?;
        if device.is_cuda() {
            log::info!("Inference device: CUDA (ordinal {})", ordinal);
        } else {
            log::warn!(
                "Inference device: requested CUDA ordinal {} but device reports non-CUDA",
                ordinal
            );
        }
        Ok(Self { device })
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn use_landmark_net(
        &self,
        model_path: impl AsRef<Path>,
    ) -> Result<NetLandmarkEstimator, InferError> {
        NetLandmarkEstimator::new(model_path, self.device.clone())
    }

    pub fn use_segmentation_net(
        &self,
        model_path: impl AsRef<Path>,
    ) -> Result<NetSegmenter, InferError> {
        NetSegmenter::new(model_path, self.device.clone())
    }

    /// Weight-free landmark estimator, usable when no model is configured.
    pub fn use_silhouette_estimator(&self) -> SilhouetteEstimator {
        SilhouetteEstimator
    }

    pub fn use_silhouette_segmenter(&self) -> SilhouetteSegmenter {
        SilhouetteSegmenter
    }
}
