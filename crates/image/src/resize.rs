use {
    crate::{Image, ImageError},
    base::{Tensor, Vec2},
    crates_image::{RgbaImage, imageops::FilterType},
};

const FILTER: FilterType = FilterType::Triangle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    /// Scale to fill the target, center-cropping the overflow.
    Cover,
    /// Scale to fit inside the target, padding with transparent pixels.
    Contain,
    /// Scale each axis independently.
    Stretch,
}

/// How a source frame maps into a resized frame:
/// `dst_px = src_px * scale + pad`. Pad is negative where cover mode cropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub scale: Vec2<f32>,
    pub pad: Vec2<f32>,
    pub source: Vec2<f32>,
    pub target: Vec2<f32>,
}

impl Letterbox {
    /// Map a point normalized to the resized frame back to a point normalized
    /// to the source frame.
    pub fn to_source(&self, point: Vec2<f32>) -> Vec2<f32> {
        let dst_px = point * self.target;
        Vec2::new(
            (dst_px.x - self.pad.x) / self.scale.x / self.source.x,
            (dst_px.y - self.pad.y) / self.scale.y / self.source.y,
        )
    }
}

impl ResizeMode {
    pub fn frame(&self, src_w: usize, src_h: usize, dst_w: usize, dst_h: usize) -> Letterbox {
        let source = Vec2::new(src_w as f32, src_h as f32);
        let target = Vec2::new(dst_w as f32, dst_h as f32);
        let sx = target.x / source.x;
        let sy = target.y / source.y;
        let scale = match self {
            ResizeMode::Cover => Vec2::new(sx.max(sy), sx.max(sy)),
            ResizeMode::Contain => Vec2::new(sx.min(sy), sx.min(sy)),
            ResizeMode::Stretch => Vec2::new(sx, sy),
        };
        let pad = (target - source * scale) / 2.0;
        Letterbox {
            scale,
            pad,
            source,
            target,
        }
    }
}

/// Resize into a new buffer. The input is never touched.
///
/// `Contain` always yields 4-channel u8 output so padding can be transparent.
pub fn resize(image: &Image, width: usize, height: usize, mode: ResizeMode) -> Result<Image, ImageError> {
    if width == 0 || height == 0 {
        return Err(ImageError::Encode(format!(
            "target size must be non-zero, got {width}x{height}"
        )));
    }
    if image.width() == 0 || image.height() == 0 {
        return Err(ImageError::Decode("source image is empty".to_string()));
    }
    let (w, h) = (width as u32, height as u32);
    let source = image.to_dynamic()?;
    match mode {
        ResizeMode::Cover => Image::from_dynamic(source.resize_to_fill(w, h, FILTER)),
        ResizeMode::Stretch => Image::from_dynamic(source.resize_exact(w, h, FILTER)),
        ResizeMode::Contain => {
            let fitted = source.resize(w, h, FILTER).to_rgba8();
            let mut canvas = RgbaImage::new(w, h);
            let offset_x = (w - fitted.width()) / 2;
            let offset_y = (h - fitted.height()) / 2;
            crates_image::imageops::overlay(&mut canvas, &fitted, offset_x as i64, offset_y as i64);
            Image::from_dynamic(canvas.into())
        }
    }
}

/// Produce the `[size, size, 3]` RGB tensor in [0, 1] that the inference
/// backends consume, plus the mapping back to the source frame.
pub fn to_model_tensor(image: &Image, size: usize) -> Result<(Tensor<f32>, Letterbox), ImageError> {
    let letterbox = ResizeMode::Cover.frame(image.width(), image.height(), size, size);
    let resized = resize(image, size, size, ResizeMode::Cover)?;
    let rgb = resized.to_dynamic()?.to_rgb8();
    let data: Vec<f32> = rgb.into_raw().into_iter().map(|v| v as f32 / 255.0).collect();
    Ok((Tensor::new(vec![size, size, 3], data)?, letterbox))
}
