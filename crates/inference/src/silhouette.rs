//! Heuristic body estimation from foreground/background contrast.
//!
//! Works without model weights: the background color is taken from the frame
//! border, every pixel's distance from it gives a soft foreground mask, and
//! the mask's bounding box carries a canonical standing-pose template. A
//! keypoint's confidence is the foreground support around its template
//! position, so points that land off the body fall below threshold.

use {
    crate::{
        InferError,
        error::validate_frame,
        landmark::{Landmark, LandmarkEstimator, collect_confident},
        segment::{FOREGROUND_THRESHOLD, RegionSegmenter},
    },
    base::{Rect, Tensor, Vec2},
};

/// Color distance (normalized to [0, 1]) at which a pixel is fully foreground.
const SOFT_RANGE: f32 = 0.30;

/// Frames whose foreground covers less than this share have no body.
const MIN_COVERAGE: f32 = 0.02;

/// Canonical (u, v) position of each keypoint inside the body box, in
/// keypoint index order. The subject faces the camera, so its left side is
/// on the image right.
const TEMPLATE: [(f32, f32); 17] = [
    (0.50, 0.08),
    (0.53, 0.06),
    (0.47, 0.06),
    (0.56, 0.07),
    (0.44, 0.07),
    (0.70, 0.20),
    (0.30, 0.20),
    (0.76, 0.36),
    (0.24, 0.36),
    (0.80, 0.50),
    (0.20, 0.50),
    (0.62, 0.52),
    (0.38, 0.52),
    (0.60, 0.74),
    (0.40, 0.74),
    (0.58, 0.95),
    (0.42, 0.95),
];

/// Soft foreground analysis of one frame.
#[derive(Debug)]
pub struct Silhouette {
    width: usize,
    height: usize,
    soft: Vec<f32>,
    /// Pixel-space bounding box of the hard foreground.
    bounds: Rect<f32>,
}

impl Silhouette {
    /// Analyze an `[H, W, 3]` frame in [0, 1]. `None` if nothing stands out
    /// from the background.
    pub fn analyze(frame: &Tensor<f32>) -> Result<Option<Self>, InferError> {
        let (height, width) = validate_frame(frame)?;
        let background = border_mean(frame, width, height);

        let norm = 3f32.sqrt();
        let mut soft = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let dr = frame.at3(y, x, 0) - background[0];
                let dg = frame.at3(y, x, 1) - background[1];
                let db = frame.at3(y, x, 2) - background[2];
                let dist = (dr * dr + dg * dg + db * db).sqrt() / norm;
                soft.push((dist / SOFT_RANGE).clamp(0.0, 1.0));
            }
        }

        let mut count = 0usize;
        let mut min = Vec2::new(f32::MAX, f32::MAX);
        let mut max = Vec2::new(f32::MIN, f32::MIN);
        for (i, &v) in soft.iter().enumerate() {
            if v > FOREGROUND_THRESHOLD {
                count += 1;
                let p = Vec2::new((i % width) as f32, (i / width) as f32);
                min = min.min(p);
                max = max.max(p + Vec2::new(1.0, 1.0));
            }
        }

        if (count as f32) < MIN_COVERAGE * (width * height) as f32 {
            return Ok(None);
        }

        Ok(Some(Self {
            width,
            height,
            soft,
            bounds: Rect::from_min_max(min, max),
        }))
    }

    pub fn bounds(&self) -> Rect<f32> {
        self.bounds
    }

    /// Share of foreground pixels in a square window around `center`.
    fn support(&self, center: Vec2<f32>, radius: usize) -> f32 {
        let cx = center.x.clamp(0.0, (self.width - 1) as f32) as usize;
        let cy = center.y.clamp(0.0, (self.height - 1) as f32) as usize;
        let x0 = cx.saturating_sub(radius);
        let y0 = cy.saturating_sub(radius);
        let x1 = (cx + radius).min(self.width - 1);
        let y1 = (cy + radius).min(self.height - 1);
        let mut hits = 0usize;
        let mut total = 0usize;
        for y in y0..=y1 {
            for x in x0..=x1 {
                total += 1;
                if self.soft[y * self.width + x] > FOREGROUND_THRESHOLD {
                    hits += 1;
                }
            }
        }
        hits as f32 / total as f32
    }

    /// Place the template in the body box and score every keypoint.
    pub fn keypoints(&self) -> Vec<(f32, f32, f32)> {
        let size = self.bounds.size;
        let radius = ((size.x.min(size.y) / 20.0) as usize).max(2);
        TEMPLATE
            .iter()
            .map(|&(u, v)| {
                let p = self.bounds.origin + size * Vec2::new(u, v);
                let confidence = self.support(p, radius);
                (
                    p.x / self.width as f32,
                    p.y / self.height as f32,
                    confidence,
                )
            })
            .collect()
    }

    pub fn into_mask(self) -> Result<Tensor<f32>, InferError> {
        Ok(Tensor::new(vec![self.height, self.width], self.soft)?)
    }
}

fn border_mean(frame: &Tensor<f32>, width: usize, height: usize) -> [f32; 3] {
    let mut sum = [0f32; 3];
    let mut count = 0usize;
    let mut add = |y: usize, x: usize| {
        for (c, s) in sum.iter_mut().enumerate() {
            *s += frame.at3(y, x, c);
        }
        count += 1;
    };
    for x in 0..width {
        add(0, x);
        if height > 1 {
            add(height - 1, x);
        }
    }
    for y in 1..height.saturating_sub(1) {
        add(y, 0);
        if width > 1 {
            add(y, width - 1);
        }
    }
    let n = count.max(1) as f32;
    [sum[0] / n, sum[1] / n, sum[2] / n]
}

/// Landmark estimator backed by `Silhouette`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilhouetteEstimator;

impl LandmarkEstimator for SilhouetteEstimator {
    fn estimate(&self, frame: &Tensor<f32>) -> Result<Vec<Landmark>, InferError> {
        match Silhouette::analyze(frame)? {
            Some(silhouette) => Ok(collect_confident(silhouette.keypoints())),
            None => Ok(Vec::new()),
        }
    }

    fn name(&self) -> &'static str {
        "silhouette"
    }
}

/// Region segmenter backed by `Silhouette`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilhouetteSegmenter;

impl RegionSegmenter for SilhouetteSegmenter {
    fn segment(&self, frame: &Tensor<f32>) -> Result<Option<Tensor<f32>>, InferError> {
        match Silhouette::analyze(frame)? {
            Some(silhouette) => Ok(Some(silhouette.into_mask()?)),
            None => Ok(None),
        }
    }

    fn name(&self) -> &'static str {
        "silhouette"
    }
}
