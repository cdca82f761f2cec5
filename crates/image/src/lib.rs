//! Image codec adapter for the try-on pipeline.
//!
//! Wraps the `image` crate: transfer-encoded payloads in, `Image` tensors for
//! processing, PNG/JPEG (or a PNG data URL) back out.
//!
//! All decoded images use HWC layout: `[height, width, channels]`.

pub mod error;
pub mod image;
pub mod payload;
pub mod resize;

pub use error::ImageError;
pub use image::Image;
pub use payload::{decode_payload, encode_payload, to_data_url};
pub use resize::{Letterbox, ResizeMode, resize, to_model_tensor};

use crates_image::{ExtendedColorType, ImageEncoder};

/// Decodes an image from raw bytes. The format is auto-detected and the
/// original pixel precision (u8, u16, or f32) is preserved.
///
/// # Errors
///
/// Returns `ImageError::Decode` if the data is invalid or the format is unsupported.
/// Returns `ImageError::Tensor` if tensor construction fails.
pub fn decode(data: &[u8]) -> Result<Image, ImageError> {
    Image::from_dynamic(crates_image::load_from_memory(data)?)
}

/// Async `decode`; the CPU-bound work runs on tokio's blocking thread pool.
pub async fn decode_image(data: &[u8]) -> Result<Image, ImageError> {
    let owned = data.to_vec();
    tokio::task::spawn_blocking(move || decode(&owned)).await?
}

/// Encodes an image as PNG. Everything is converted to 8-bit RGBA first.
pub fn encode_png(image: &Image) -> Result<Vec<u8>, ImageError> {
    let rgba = image.to_rgba8()?;
    let mut buffer = Vec::new();
    crates_image::codecs::png::PngEncoder::new(&mut buffer)
        .write_image(
            &rgba.data,
            image.width() as u32,
            image.height() as u32,
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| ImageError::Encode(e.to_string()))?;
    Ok(buffer)
}

fn encode_jpeg_inner(image: &Image, quality: u8) -> Result<Vec<u8>, ImageError> {
    let rgb = image.to_dynamic()?.to_rgb8();
    let mut buffer = Vec::new();
    crates_image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|e| ImageError::Encode(e.to_string()))?;
    Ok(buffer)
}

/// Encodes an image as JPEG bytes.
///
/// The `quality` parameter controls JPEG compression (1-100, higher = better quality).
/// Alpha is dropped and wider sample types are converted to u8 before encoding.
///
/// The CPU-bound encoding work runs on tokio's blocking thread pool.
pub async fn encode_jpeg(image: Image, quality: u8) -> Result<Vec<u8>, ImageError> {
    tokio::task::spawn_blocking(move || encode_jpeg_inner(&image, quality)).await?
}
