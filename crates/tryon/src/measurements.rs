//! Coarse body measurements from landmark geometry.
//!
//! The ratios below are anthropometric rules of thumb, not calibrated
//! measurements. Anything that cannot be derived falls back to
//! `BodyMeasurements::DEFAULT` field by field.

use {
    crate::BodyMeasurements,
    base::Vec2,
    inference::{KeypointIndex, Landmark, landmark::find},
};

/// Below this many landmarks the whole default set is returned.
pub const MIN_LANDMARKS: usize = 5;

pub const CM_PER_PIXEL: f32 = 0.1;

const CHEST_PER_SHOULDER: f32 = 2.5;
const WAIST_PER_CHEST: f32 = 0.85;
const HIPS_PER_WAIST: f32 = 1.1;

/// Segmentation mask contribution to detection confidence.
const MASK_PRESENT: f32 = 0.8;
const MASK_ABSENT: f32 = 0.3;

/// Derive measurements from landmarks normalized to an image of
/// `width` x `height` pixels.
pub fn compute(landmarks: &[Landmark], width: usize, height: usize) -> BodyMeasurements {
    let default = BodyMeasurements::DEFAULT;
    if landmarks.len() < MIN_LANDMARKS {
        return default;
    }

    let scale = Vec2::new(width as f32, height as f32);
    let pixel = |keypoint| find(landmarks, keypoint).map(|l| Vec2::new(l.x, l.y) * scale);
    let positive = |value: Option<f32>, fallback: f32| match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => fallback,
    };

    let left_shoulder = pixel(KeypointIndex::LeftShoulder);
    let right_shoulder = pixel(KeypointIndex::RightShoulder);
    let shoulder_width = match (left_shoulder, right_shoulder) {
        (Some(l), Some(r)) => Some(l.distance_to(r) * CM_PER_PIXEL),
        _ => None,
    };

    // torso chain: all derived from the shoulder span or all default
    let (shoulders, chest, waist, hips) = match shoulder_width {
        Some(w) if w.is_finite() && w > 0.0 => {
            let chest = w * CHEST_PER_SHOULDER;
            let waist = chest * WAIST_PER_CHEST;
            (w, chest, waist, waist * HIPS_PER_WAIST)
        }
        _ => (default.shoulders, default.chest, default.waist, default.hips),
    };

    let nose = pixel(KeypointIndex::Nose);
    let lowest_ankle = [KeypointIndex::LeftAnkle, KeypointIndex::RightAnkle]
        .into_iter()
        .filter_map(pixel)
        .map(|p| p.y)
        .reduce(f32::max);
    let body_height = match (nose, lowest_ankle) {
        (Some(n), Some(a)) => Some((a - n.y) * CM_PER_PIXEL),
        _ => None,
    };

    let arm = |shoulder: Option<Vec2<f32>>, wrist| match (shoulder, pixel(wrist)) {
        (Some(s), Some(w)) => Some(s.distance_to(w) * CM_PER_PIXEL),
        _ => None,
    };
    let arm_length = arm(left_shoulder, KeypointIndex::LeftWrist)
        .filter(|v| *v > 0.0)
        .or_else(|| arm(right_shoulder, KeypointIndex::RightWrist));

    BodyMeasurements {
        shoulders,
        chest,
        waist,
        hips,
        height: positive(body_height, default.height),
        arm_length: positive(arm_length, default.arm_length),
    }
}

/// Blend of mean landmark confidence and whether a body mask was found.
pub fn detection_confidence(landmarks: &[Landmark], mask_present: bool) -> f32 {
    let mean = if landmarks.is_empty() {
        0.0
    } else {
        landmarks.iter().map(|l| l.confidence).sum::<f32>() / landmarks.len() as f32
    };
    let mask = if mask_present { MASK_PRESENT } else { MASK_ABSENT };
    ((mean + mask) / 2.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lm(keypoint: KeypointIndex, x: f32, y: f32) -> Landmark {
        Landmark {
            keypoint,
            x,
            y,
            confidence: 0.9,
        }
    }

    fn standing() -> Vec<Landmark> {
        vec![
            lm(KeypointIndex::Nose, 0.5, 0.1),
            lm(KeypointIndex::LeftShoulder, 0.7, 0.2),
            lm(KeypointIndex::RightShoulder, 0.3, 0.2),
            lm(KeypointIndex::LeftWrist, 0.8, 0.5),
            lm(KeypointIndex::LeftHip, 0.6, 0.5),
            lm(KeypointIndex::LeftAnkle, 0.58, 0.9),
            lm(KeypointIndex::RightAnkle, 0.42, 0.95),
        ]
    }

    #[test]
    fn test_too_few_landmarks_is_default() {
        let few = &standing()[..4];
        assert_eq!(compute(few, 1000, 1000), BodyMeasurements::DEFAULT);
        assert_eq!(compute(&[], 1000, 1000), BodyMeasurements::DEFAULT);
    }

    #[test]
    fn test_torso_chain_ratios() {
        let m = compute(&standing(), 1000, 2000);
        // 0.4 * 1000 px = 400 px = 40 cm
        assert!((m.shoulders - 40.0).abs() < 1e-3);
        assert!((m.chest - 100.0).abs() < 1e-3);
        assert!((m.waist - 85.0).abs() < 1e-3);
        assert!((m.hips - 93.5).abs() < 1e-3);
    }

    #[test]
    fn test_height_uses_lowest_ankle() {
        let m = compute(&standing(), 1000, 2000);
        // (0.95 - 0.1) * 2000 px * 0.1
        assert!((m.height - 170.0).abs() < 1e-2);
    }

    #[test]
    fn test_arm_falls_back_to_right_side() {
        let mut landmarks: Vec<Landmark> = standing()
            .into_iter()
            .filter(|l| l.keypoint != KeypointIndex::LeftWrist)
            .collect();
        landmarks.insert(4, lm(KeypointIndex::RightWrist, 0.3, 0.5));
        let m = compute(&landmarks, 1000, 1000);
        assert!((m.arm_length - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_missing_shoulder_defaults_torso_only() {
        let landmarks: Vec<Landmark> = standing()
            .into_iter()
            .filter(|l| l.keypoint != KeypointIndex::RightShoulder)
            .collect();
        let m = compute(&landmarks, 1000, 2000);
        let d = BodyMeasurements::DEFAULT;
        assert_eq!(
            (m.shoulders, m.chest, m.waist, m.hips),
            (d.shoulders, d.chest, d.waist, d.hips)
        );
        assert!((m.height - 170.0).abs() < 1e-2);
    }

    #[test]
    fn test_inverted_height_falls_back() {
        let mut landmarks = standing();
        landmarks[0].y = 0.99;
        let m = compute(&landmarks, 1000, 1000);
        assert_eq!(m.height, BodyMeasurements::DEFAULT.height);
    }

    #[test]
    fn test_detection_confidence() {
        assert_eq!(detection_confidence(&[], false), 0.15);
        let landmarks = standing();
        assert!((detection_confidence(&landmarks, true) - 0.85).abs() < 1e-6);
    }
}
