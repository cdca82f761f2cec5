//! Placement, fit scoring, fabric physics and styling notes.

use {
    crate::{BodyMeasurements, FabricPhysics, GarmentCategory, SizeBucket},
    base::{Rect, Vec2},
    inference::Landmark,
};

/// Fit score when the category has no size chart.
pub const NEUTRAL_FIT: f32 = 0.5;

pub const GENERIC_NOTES: [&str; 2] = [
    "Pair this piece with neutral accessories to keep the look cohesive.",
    "Check the care label to keep the fit consistent after washing.",
];

const SIZE_UP: &str = "Consider sizing up: your chest is above the usual range for size S.";
const SIZE_DOWN: &str = "Consider sizing down: your chest is below the usual range for size L.";
const ATHLETIC: &str = "Your athletic build suits structured shoulders and tapered cuts.";
const BALANCE: &str = "A-line and wrap silhouettes will balance your proportions.";

/// Where the garment lands on the subject, in subject pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Placement {
    // Corners are rounded, not the size, so a rect inside the image stays inside.
    fn from_rect(rect: Rect<f32>) -> Self {
        let (x, y) = (rect.origin.x.round() as usize, rect.origin.y.round() as usize);
        let max = rect.max();
        let (max_x, max_y) = (max.x.round() as usize, max.y.round() as usize);
        Self {
            x,
            y,
            width: max_x.saturating_sub(x),
            height: max_y.saturating_sub(y),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Overlay width and height as multiples of the landmark box, and the top
/// edge as a fraction of the box height below its top.
fn anchor_factors(category: GarmentCategory) -> (f32, f32, f32) {
    match category {
        GarmentCategory::Top => (1.3, 0.45, 0.15),
        GarmentCategory::Bottom => (1.1, 0.5, 0.5),
        GarmentCategory::Dress => (1.3, 0.75, 0.15),
        GarmentCategory::Shoes => (1.0, 0.12, 0.88),
        GarmentCategory::Accessories => (0.6, 0.2, 0.0),
    }
}

/// `(x, y, width, height)` as fractions of the image, used without landmarks.
pub fn fallback_fractions(category: GarmentCategory) -> (f32, f32, f32, f32) {
    match category {
        GarmentCategory::Top => (0.20, 0.15, 0.60, 0.50),
        GarmentCategory::Bottom => (0.25, 0.45, 0.50, 0.45),
        GarmentCategory::Dress => (0.20, 0.15, 0.60, 0.75),
        GarmentCategory::Shoes => (0.30, 0.85, 0.40, 0.15),
        GarmentCategory::Accessories => (0.35, 0.05, 0.30, 0.20),
    }
}

/// Position the garment. Two or more landmarks (normalized to the subject)
/// anchor it to the body box; otherwise the category's fixed region is used.
pub fn placement(
    landmarks: &[Landmark],
    category: GarmentCategory,
    width: usize,
    height: usize,
) -> Placement {
    let dims = Vec2::new(width as f32, height as f32);
    let image = Rect::new(Vec2::zero(), dims);

    let anchor = if landmarks.len() >= 2 {
        Rect::bounding(landmarks.iter().map(|l| Vec2::new(l.x, l.y) * dims))
            .filter(|r| r.size.x >= 1.0 && r.size.y >= 1.0)
    } else {
        None
    };

    let rect = match anchor {
        Some(anchor) => {
            let (wf, hf, top) = anchor_factors(category);
            let size = anchor.size * Vec2::new(wf, hf);
            let origin = Vec2::new(
                anchor.center().x - size.x / 2.0,
                anchor.origin.y + anchor.size.y * top,
            );
            Rect::new(origin, size)
        }
        None => {
            let (x, y, w, h) = fallback_fractions(category);
            Rect::new(Vec2::new(x, y) * dims, Vec2::new(w, h) * dims)
        }
    };

    Placement::from_rect(rect.clamp_to(image))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Shoulders,
    Chest,
    Waist,
    Hips,
}

impl Dimension {
    fn of(&self, m: &BodyMeasurements) -> f32 {
        match self {
            Dimension::Shoulders => m.shoulders,
            Dimension::Chest => m.chest,
            Dimension::Waist => m.waist,
            Dimension::Hips => m.hips,
        }
    }
}

/// Target body dimensions (cm) for a garment of `size` in `category`.
pub fn size_chart(category: GarmentCategory, size: SizeBucket) -> Vec<(Dimension, f32)> {
    use Dimension::*;
    let i = size as usize;
    let chest = [80.0, 86.0, 92.0, 100.0, 108.0][i];
    let shoulders = [36.0, 38.0, 41.0, 44.0, 47.0][i];
    let waist = [62.0, 68.0, 74.0, 82.0, 90.0][i];
    let hips = [86.0, 92.0, 98.0, 104.0, 110.0][i];
    match category {
        GarmentCategory::Top => vec![(Chest, chest), (Shoulders, shoulders)],
        GarmentCategory::Bottom => vec![(Waist, waist), (Hips, hips)],
        GarmentCategory::Dress => vec![(Chest, chest), (Waist, waist), (Hips, hips)],
        GarmentCategory::Shoes | GarmentCategory::Accessories => Vec::new(),
    }
}

/// Mean per-dimension closeness to the size chart, in [0, 1].
pub fn fit_score(m: &BodyMeasurements, category: GarmentCategory, size: SizeBucket) -> f32 {
    let chart = size_chart(category, size);
    if chart.is_empty() {
        return NEUTRAL_FIT;
    }
    let total: f32 = chart
        .iter()
        .map(|(dim, target)| (1.0 - (dim.of(m) - target).abs() / target).max(0.0))
        .sum();
    (total / chart.len() as f32).clamp(0.0, 1.0)
}

/// Mean absolute deviation of the feature vector from neutral gray.
pub fn texture_variance(features: &[f32]) -> f32 {
    if features.is_empty() {
        return 0.0;
    }
    features.iter().map(|f| (f - 0.5).abs()).sum::<f32>() / features.len() as f32
}

pub fn physics_prior(category: GarmentCategory) -> FabricPhysics {
    let (drape, stretch, wrinkle, shine, breath) = match category {
        GarmentCategory::Top => (0.7, 0.3, 0.4, 0.2, 0.8),
        GarmentCategory::Bottom => (0.5, 0.4, 0.3, 0.1, 0.6),
        GarmentCategory::Dress => (0.9, 0.2, 0.5, 0.3, 0.7),
        GarmentCategory::Shoes => (0.1, 0.1, 0.1, 0.6, 0.3),
        GarmentCategory::Accessories => (0.3, 0.1, 0.2, 0.7, 0.5),
    };
    FabricPhysics {
        drape_coefficient: drape,
        stretch_factor: stretch,
        wrinkle_intensity: wrinkle,
        shine_factor: shine,
        breathability: breath,
    }
}

/// The category prior perturbed by texture variance `v`. Busier textures
/// drape, wrinkle and shine more, and stretch and breathe less.
pub fn fabric_physics(category: GarmentCategory, v: f32) -> FabricPhysics {
    let p = physics_prior(category);
    let unit = |x: f32| x.clamp(0.0, 1.0);
    FabricPhysics {
        drape_coefficient: unit(p.drape_coefficient * (1.0 + 0.2 * v)),
        stretch_factor: unit(p.stretch_factor * (1.0 - 0.1 * v)),
        wrinkle_intensity: unit(p.wrinkle_intensity * (1.0 + 0.5 * v)),
        shine_factor: unit(p.shine_factor * (1.0 + 0.3 * v)),
        breathability: unit(p.breathability * (1.0 - 0.2 * v)),
    }
}

pub fn texture_quality(v: f32) -> f32 {
    (0.5 + 0.5 * v).clamp(0.3, 1.0)
}

/// Fit dominates; detection is a small correction.
pub fn confidence(fit: f32, detection: f32) -> f32 {
    (0.9 * fit + 0.1 * detection).clamp(0.0, 1.0)
}

/// Rule-based styling notes. Order is part of the result contract; the two
/// generic notes always come last.
pub fn recommendations(m: &BodyMeasurements, size: SizeBucket) -> Vec<String> {
    let mut notes = Vec::new();
    if size == SizeBucket::S && m.chest > 90.0 {
        notes.push(SIZE_UP);
    }
    if size == SizeBucket::L && m.chest < 85.0 {
        notes.push(SIZE_DOWN);
    }
    if m.chest > m.hips {
        notes.push(ATHLETIC);
    }
    if m.hips > m.chest {
        notes.push(BALANCE);
    }
    notes.extend(GENERIC_NOTES);
    notes.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use {super::*, inference::KeypointIndex};

    fn lm(keypoint: KeypointIndex, x: f32, y: f32) -> Landmark {
        Landmark {
            keypoint,
            x,
            y,
            confidence: 0.9,
        }
    }

    #[test]
    fn test_fallback_top_with_one_landmark() {
        let landmarks = [lm(KeypointIndex::Nose, 0.5, 0.1)];
        let p = placement(&landmarks, GarmentCategory::Top, 1000, 800);
        assert_eq!(
            p,
            Placement {
                x: 200,
                y: 120,
                width: 600,
                height: 400
            }
        );
    }

    #[test]
    fn test_fallback_stays_inside_image() {
        for category in GarmentCategory::ALL {
            let p = placement(&[], category, 333, 517);
            assert!(p.x + p.width <= 333);
            assert!(p.y + p.height <= 517);
            assert!(!p.is_empty());
        }
    }

    #[test]
    fn test_anchored_top_is_centered() {
        let landmarks = [
            lm(KeypointIndex::LeftShoulder, 0.6, 0.2),
            lm(KeypointIndex::RightShoulder, 0.4, 0.2),
            lm(KeypointIndex::LeftHip, 0.6, 0.6),
        ];
        let p = placement(&landmarks, GarmentCategory::Top, 1000, 1000);
        // anchor 200x400 at (400, 200); overlay 260x180 at (370, 260)
        assert_eq!(
            p,
            Placement {
                x: 370,
                y: 260,
                width: 260,
                height: 180
            }
        );
    }

    #[test]
    fn test_anchored_overflow_is_clamped() {
        let landmarks = [
            lm(KeypointIndex::LeftShoulder, 0.99, 0.1),
            lm(KeypointIndex::RightShoulder, 0.01, 0.9),
        ];
        let p = placement(&landmarks, GarmentCategory::Dress, 100, 100);
        assert!(p.x + p.width <= 100);
        assert!(p.y + p.height <= 100);
    }

    #[test]
    fn test_half_pixel_overflow_stays_inside() {
        let landmarks = [
            lm(KeypointIndex::LeftShoulder, 0.95, 0.2),
            lm(KeypointIndex::RightShoulder, 0.15, 0.6),
        ];
        let p = placement(&landmarks, GarmentCategory::Top, 50, 50);
        assert!(p.x <= 2);
        assert_eq!(p.x + p.width, 50);
        assert!(p.y + p.height <= 50);
    }

    #[test]
    fn test_degenerate_anchor_uses_fallback() {
        let landmarks = [
            lm(KeypointIndex::LeftShoulder, 0.5, 0.2),
            lm(KeypointIndex::RightShoulder, 0.5, 0.2),
        ];
        let p = placement(&landmarks, GarmentCategory::Shoes, 100, 100);
        assert_eq!(
            p,
            Placement {
                x: 30,
                y: 85,
                width: 40,
                height: 15
            }
        );
    }

    #[test]
    fn test_exact_chart_match_scores_one() {
        let mut m = BodyMeasurements::DEFAULT;
        m.chest = 92.0;
        m.shoulders = 41.0;
        assert_eq!(fit_score(&m, GarmentCategory::Top, SizeBucket::M), 1.0);
    }

    #[test]
    fn test_unsized_categories_are_neutral() {
        let m = BodyMeasurements::DEFAULT;
        assert_eq!(fit_score(&m, GarmentCategory::Shoes, SizeBucket::XL), NEUTRAL_FIT);
        assert_eq!(
            fit_score(&m, GarmentCategory::Accessories, SizeBucket::XS),
            NEUTRAL_FIT
        );
    }

    #[test]
    fn test_fit_score_floors_at_zero() {
        let mut m = BodyMeasurements::DEFAULT;
        m.waist = 500.0;
        m.hips = 500.0;
        assert_eq!(fit_score(&m, GarmentCategory::Bottom, SizeBucket::XS), 0.0);
    }

    #[test]
    fn test_zero_variance_reproduces_prior() {
        let features = vec![0.5; 256];
        let v = texture_variance(&features);
        assert_eq!(v, 0.0);
        assert_eq!(texture_quality(v), 0.5);
        for category in GarmentCategory::ALL {
            assert_eq!(fabric_physics(category, v), physics_prior(category));
        }
    }

    #[test]
    fn test_variance_perturbs_direction() {
        let prior = physics_prior(GarmentCategory::Top);
        let p = fabric_physics(GarmentCategory::Top, 0.5);
        assert!(p.drape_coefficient > prior.drape_coefficient);
        assert!(p.wrinkle_intensity > prior.wrinkle_intensity);
        assert!(p.shine_factor > prior.shine_factor);
        assert!(p.stretch_factor < prior.stretch_factor);
        assert!(p.breathability < prior.breathability);
    }

    #[test]
    fn test_physics_stays_in_unit_range() {
        let p = fabric_physics(GarmentCategory::Dress, 0.5);
        assert!(p.drape_coefficient <= 1.0);
    }

    #[test]
    fn test_confidence_bound() {
        for (fit, det) in [(0.0, 1.0), (1.0, 0.0), (0.3, 0.9), (1.0, 1.0)] {
            let c = confidence(fit, det);
            assert!((0.0..=1.0).contains(&c));
            assert!(c <= f32::max(fit, det) + 1e-6);
        }
    }

    #[test]
    fn test_recommendation_order() {
        let mut m = BodyMeasurements::DEFAULT;
        m.chest = 95.0;
        m.hips = 90.0;
        let notes = recommendations(&m, SizeBucket::S);
        assert_eq!(notes.len(), 4);
        assert_eq!(notes[0], SIZE_UP);
        assert_eq!(notes[1], ATHLETIC);
        assert_eq!(&notes[2..], &GENERIC_NOTES);
    }

    #[test]
    fn test_generic_notes_always_last() {
        for size in [SizeBucket::XS, SizeBucket::L, SizeBucket::XL] {
            let notes = recommendations(&BodyMeasurements::DEFAULT, size);
            assert!(notes.len() >= 2);
            assert_eq!(&notes[notes.len() - 2..], &GENERIC_NOTES);
        }
        let notes = recommendations(&BodyMeasurements::DEFAULT, SizeBucket::L);
        assert_eq!(notes[0], BALANCE);
    }
}
