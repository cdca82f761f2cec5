use {crate::InferError, base::Tensor};

/// Mask values above this count as foreground.
pub const FOREGROUND_THRESHOLD: f32 = 0.5;

/// Dense foreground (body) segmentation.
///
/// Returns an `[H, W]` mask with values in [0, 1], or `None` when no pixel is
/// foreground. The pipeline only uses the mask's presence as a confidence
/// signal; it never drives compositing.
pub trait RegionSegmenter: Send + Sync {
    fn segment(&self, frame: &Tensor<f32>) -> Result<Option<Tensor<f32>>, InferError>;

    fn name(&self) -> &'static str;
}

/// `Some(mask)` if any value is foreground, otherwise `None`.
pub fn present(mask: Tensor<f32>) -> Option<Tensor<f32>> {
    if mask.data.iter().any(|&v| v > FOREGROUND_THRESHOLD) {
        Some(mask)
    } else {
        None
    }
}
