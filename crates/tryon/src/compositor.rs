use {
    crate::{TryOnError, fitting::Placement},
    image::{Image, ResizeMode},
};

/// Overlay blend of one channel in [0, 1]: multiply in the shadows, screen in
/// the highlights, chosen by the base value.
pub fn overlay(base: f32, top: f32) -> f32 {
    if base < 0.5 {
        2.0 * base * top
    } else {
        1.0 - 2.0 * (1.0 - base) * (1.0 - top)
    }
}

/// Blend `garment` onto `subject` inside `placement`, weighted by the
/// garment's alpha. Returns a new RGBA image the size of the subject.
pub fn composite(subject: &Image, garment: &Image, placement: Placement) -> Result<Image, TryOnError> {
    let fail = |e: image::ImageError| TryOnError::ProcessingFailure(format!("compositing: {e}"));
    let base = subject.to_rgba8().map_err(fail)?;
    let (width, height) = (subject.width(), subject.height());
    let mut out = base.data;

    if placement.is_empty() || placement.x >= width || placement.y >= height {
        return Image::from_rgba8(width, height, out).map_err(fail);
    }

    let layer = image::resize(garment, placement.width, placement.height, ResizeMode::Stretch)
        .and_then(|resized| resized.to_rgba8())
        .map_err(fail)?;

    let cols = placement.width.min(width - placement.x);
    let rows = placement.height.min(height - placement.y);
    for gy in 0..rows {
        for gx in 0..cols {
            let src = (gy * placement.width + gx) * 4;
            let alpha = layer.data[src + 3] as f32 / 255.0;
            if alpha == 0.0 {
                continue;
            }
            let dst = ((placement.y + gy) * width + placement.x + gx) * 4;
            for c in 0..3 {
                let b = out[dst + c] as f32 / 255.0;
                let g = layer.data[src + c] as f32 / 255.0;
                let blended = b + (overlay(b, g) - b) * alpha;
                out[dst + c] = (blended.clamp(0.0, 1.0) * 255.0).round() as u8;
            }
        }
    }

    Image::from_rgba8(width, height, out).map_err(fail)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: usize, height: usize, rgba: [u8; 4]) -> Image {
        let data = rgba.iter().copied().cycle().take(width * height * 4).collect();
        Image::from_rgba8(width, height, data).unwrap()
    }

    #[test]
    fn test_overlay_formula() {
        assert_eq!(overlay(0.25, 0.5), 0.25);
        assert_eq!(overlay(0.0, 1.0), 0.0);
        assert_eq!(overlay(1.0, 0.0), 1.0);
        assert!((overlay(0.75, 0.5) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_only_placement_is_touched() {
        let subject = solid(20, 20, [64, 64, 64, 255]);
        let garment = solid(4, 4, [255, 255, 255, 255]);
        let placement = Placement {
            x: 5,
            y: 5,
            width: 10,
            height: 10,
        };
        let out = composite(&subject, &garment, placement).unwrap();
        assert_eq!(out.shape(), &[20, 20, 4]);
        let t = out.to_rgba8().unwrap();
        assert_eq!(t.at3(0, 0, 0), 64);
        assert_eq!(t.at3(19, 19, 0), 64);
        // 2 * 0.251 * 1.0 -> 128
        assert_eq!(t.at3(10, 10, 0), 128);
    }

    #[test]
    fn test_transparent_garment_leaves_subject() {
        let subject = solid(10, 10, [200, 100, 50, 255]);
        let garment = solid(4, 4, [0, 0, 0, 0]);
        let placement = Placement {
            x: 0,
            y: 0,
            width: 10,
            height: 10,
        };
        let out = composite(&subject, &garment, placement).unwrap();
        assert_eq!(out, subject);
    }

    #[test]
    fn test_empty_placement_is_noop() {
        let subject = solid(8, 8, [10, 20, 30, 255]);
        let garment = solid(2, 2, [255, 0, 0, 255]);
        let placement = Placement {
            x: 2,
            y: 2,
            width: 0,
            height: 3,
        };
        assert_eq!(composite(&subject, &garment, placement).unwrap(), subject);
    }
}
