use {crate::InferError, base::Tensor};

/// Number of keypoints in COCO pose format
pub const COCO_KEYPOINT_COUNT: usize = 17;

/// Landmarks at or below this confidence are omitted from estimator output.
pub const CONFIDENCE_THRESHOLD: f32 = 0.5;

/// COCO keypoint indices for human pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeypointIndex {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl KeypointIndex {
    pub const ALL: [KeypointIndex; COCO_KEYPOINT_COUNT] = [
        KeypointIndex::Nose,
        KeypointIndex::LeftEye,
        KeypointIndex::RightEye,
        KeypointIndex::LeftEar,
        KeypointIndex::RightEar,
        KeypointIndex::LeftShoulder,
        KeypointIndex::RightShoulder,
        KeypointIndex::LeftElbow,
        KeypointIndex::RightElbow,
        KeypointIndex::LeftWrist,
        KeypointIndex::RightWrist,
        KeypointIndex::LeftHip,
        KeypointIndex::RightHip,
        KeypointIndex::LeftKnee,
        KeypointIndex::RightKnee,
        KeypointIndex::LeftAnkle,
        KeypointIndex::RightAnkle,
    ];
}

impl From<KeypointIndex> for usize {
    fn from(index: KeypointIndex) -> usize {
        index as usize
    }
}

impl TryFrom<usize> for KeypointIndex {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        KeypointIndex::ALL.get(value).copied().ok_or_else(|| {
            format!(
                "Invalid keypoint index: {}. Must be in range 0-{}.",
                value,
                COCO_KEYPOINT_COUNT - 1
            )
        })
    }
}

/// A detected body keypoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub keypoint: KeypointIndex,
    /// Position normalized to [0, 1] of the frame the estimator saw.
    pub x: f32,
    pub y: f32,
    /// Confidence in [0, 1].
    pub confidence: f32,
}

/// Sparse body keypoint estimation.
///
/// Implementations take a `[H, W, 3]` tensor with values in [0, 1] and return
/// at most 17 landmarks in keypoint index order, omitting every point with
/// confidence at or below `CONFIDENCE_THRESHOLD`. An image without a body
/// yields an empty vector, not an error.
pub trait LandmarkEstimator: Send + Sync {
    fn estimate(&self, frame: &Tensor<f32>) -> Result<Vec<Landmark>, InferError>;

    /// Short backend name for logging.
    fn name(&self) -> &'static str;
}

/// Turn per-keypoint `(x, y, confidence)` triples into the estimator output
/// contract: index order preserved, weak points dropped.
pub fn collect_confident(raw: impl IntoIterator<Item = (f32, f32, f32)>) -> Vec<Landmark> {
    KeypointIndex::ALL
        .iter()
        .zip(raw)
        .filter(|(_, (_, _, confidence))| *confidence > CONFIDENCE_THRESHOLD)
        .map(|(&keypoint, (x, y, confidence))| Landmark {
            keypoint,
            x: x.clamp(0.0, 1.0),
            y: y.clamp(0.0, 1.0),
            confidence: confidence.clamp(0.0, 1.0),
        })
        .collect()
}

/// Find a keypoint in an estimator output.
pub fn find(landmarks: &[Landmark], keypoint: KeypointIndex) -> Option<&Landmark> {
    landmarks.iter().find(|l| l.keypoint == keypoint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_from_roundtrip() {
        for (i, kp) in KeypointIndex::ALL.iter().enumerate() {
            assert_eq!(usize::from(*kp), i);
            assert_eq!(KeypointIndex::try_from(i), Ok(*kp));
        }
        assert!(KeypointIndex::try_from(17).is_err());
    }

    #[test]
    fn test_collect_drops_at_threshold() {
        let raw = vec![(0.1, 0.1, 0.9), (0.2, 0.2, 0.5), (0.3, 0.3, 0.51)];
        let landmarks = collect_confident(raw);
        assert_eq!(landmarks.len(), 2);
        assert_eq!(landmarks[0].keypoint, KeypointIndex::Nose);
        assert_eq!(landmarks[1].keypoint, KeypointIndex::RightEye);
    }

    #[test]
    fn test_collect_caps_at_seventeen() {
        let raw = vec![(0.5, 0.5, 1.0); 20];
        assert_eq!(collect_confident(raw).len(), COCO_KEYPOINT_COUNT);
    }
}
