use {
    crate::{GarmentCategory, SizeBucket, TryOnError},
    image::{Image, ResizeMode},
};

/// Side of the square canvas garments are normalized onto.
pub const CANVAS: usize = 512;

/// Side of the feature grid; the feature vector has `GRID * GRID` values.
pub const GRID: usize = 16;

/// Value transparent canvas cells contribute to the feature vector.
const NEUTRAL: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct ProcessedGarment {
    pub category: GarmentCategory,
    /// `CANVAS` x `CANVAS` RGBA with transparent padding.
    pub normalized: Image,
    /// Coarse luminance signal in [0, 1], row-major over the grid.
    pub features: Vec<f32>,
    pub size: SizeBucket,
}

/// Decode a garment photo, normalize it and extract its feature signal.
pub fn process(bytes: &[u8], category: GarmentCategory) -> Result<ProcessedGarment, TryOnError> {
    let decoded = image::decode(bytes)?;
    let normalized = image::resize(&decoded, CANVAS, CANVAS, ResizeMode::Contain)
        .map_err(|e| TryOnError::ProcessingFailure(format!("garment normalization: {e}")))?;
    let features = features(&normalized)?;
    let size = size_bucket(&features);
    Ok(ProcessedGarment {
        category,
        normalized,
        features,
        size,
    })
}

/// Stretch the image onto the feature grid; each cell is its luminance
/// composited over neutral gray by alpha.
pub fn features(image: &Image) -> Result<Vec<f32>, TryOnError> {
    let grid = image::resize(image, GRID, GRID, ResizeMode::Stretch)
        .and_then(|small| small.to_rgba8())
        .map_err(|e| TryOnError::ProcessingFailure(format!("garment features: {e}")))?;
    Ok(grid
        .data
        .chunks_exact(4)
        .map(|px| {
            let [r, g, b, a] = [px[0], px[1], px[2], px[3]].map(|v| v as f32 / 255.0);
            let luma = 0.299 * r + 0.587 * g + 0.114 * b;
            (luma * a + NEUTRAL * (1.0 - a)).clamp(0.0, 1.0)
        })
        .collect())
}

/// Threshold the mean feature into five bands. A stand-in for a trained
/// sizing model.
pub fn size_bucket(features: &[f32]) -> SizeBucket {
    let mean = if features.is_empty() {
        NEUTRAL
    } else {
        features.iter().sum::<f32>() / features.len() as f32
    };
    match mean {
        m if m < 0.2 => SizeBucket::XS,
        m if m < 0.4 => SizeBucket::S,
        m if m < 0.6 => SizeBucket::M,
        m if m < 0.8 => SizeBucket::L,
        _ => SizeBucket::XL,
    }
}
