use {
    crate::ImageError,
    base::Tensor,
    crates_image::{DynamicImage, ImageBuffer, Luma, LumaA, Rgb, Rgba},
};

/// Decoded pixels in HWC layout, keeping the source precision.
#[derive(Debug, Clone, PartialEq)]
pub enum Image {
    U8(Tensor<u8>),
    U16(Tensor<u16>),
    F32(Tensor<f32>),
}

impl Image {
    pub fn shape(&self) -> &[usize] {
        match self {
            Image::U8(t) => &t.shape,
            Image::U16(t) => &t.shape,
            Image::F32(t) => &t.shape,
        }
    }

    pub fn height(&self) -> usize {
        self.shape()[0]
    }

    pub fn width(&self) -> usize {
        self.shape()[1]
    }

    pub fn channels(&self) -> usize {
        self.shape()[2]
    }

    /// Wrap an 8-bit RGBA buffer of `width * height * 4` bytes.
    pub fn from_rgba8(width: usize, height: usize, data: Vec<u8>) -> Result<Self, ImageError> {
        Ok(Image::U8(Tensor::new(vec![height, width, 4], data)?))
    }

    pub(crate) fn from_dynamic(img: DynamicImage) -> Result<Self, ImageError> {
        fn tensor<T>(w: u32, h: u32, channels: usize, data: Vec<T>) -> Result<Tensor<T>, ImageError> {
            Ok(Tensor::new(vec![h as usize, w as usize, channels], data)?)
        }

        let (w, h) = (img.width(), img.height());
        match img {
            DynamicImage::ImageLuma8(buf) => Ok(Image::U8(tensor(w, h, 1, buf.into_raw())?)),
            DynamicImage::ImageLumaA8(buf) => Ok(Image::U8(tensor(w, h, 2, buf.into_raw())?)),
            DynamicImage::ImageRgb8(buf) => Ok(Image::U8(tensor(w, h, 3, buf.into_raw())?)),
            DynamicImage::ImageRgba8(buf) => Ok(Image::U8(tensor(w, h, 4, buf.into_raw())?)),
            DynamicImage::ImageLuma16(buf) => Ok(Image::U16(tensor(w, h, 1, buf.into_raw())?)),
            DynamicImage::ImageLumaA16(buf) => Ok(Image::U16(tensor(w, h, 2, buf.into_raw())?)),
            DynamicImage::ImageRgb16(buf) => Ok(Image::U16(tensor(w, h, 3, buf.into_raw())?)),
            DynamicImage::ImageRgba16(buf) => Ok(Image::U16(tensor(w, h, 4, buf.into_raw())?)),
            DynamicImage::ImageRgb32F(buf) => Ok(Image::F32(tensor(w, h, 3, buf.into_raw())?)),
            DynamicImage::ImageRgba32F(buf) => Ok(Image::F32(tensor(w, h, 4, buf.into_raw())?)),
            other => {
                let rgba = other.to_rgba8();
                Ok(Image::U8(tensor(w, h, 4, rgba.into_raw())?))
            }
        }
    }

    pub(crate) fn to_dynamic(&self) -> Result<DynamicImage, ImageError> {
        let (w, h) = (self.width() as u32, self.height() as u32);
        let mismatch = || ImageError::Encode(format!("buffer does not match shape {:?}", self.shape()));
        let image = match (self, self.channels()) {
            (Image::U8(t), 1) => DynamicImage::ImageLuma8(
                ImageBuffer::<Luma<u8>, _>::from_raw(w, h, t.data.clone()).ok_or_else(mismatch)?,
            ),
            (Image::U8(t), 2) => DynamicImage::ImageLumaA8(
                ImageBuffer::<LumaA<u8>, _>::from_raw(w, h, t.data.clone()).ok_or_else(mismatch)?,
            ),
            (Image::U8(t), 3) => DynamicImage::ImageRgb8(
                ImageBuffer::<Rgb<u8>, _>::from_raw(w, h, t.data.clone()).ok_or_else(mismatch)?,
            ),
            (Image::U8(t), 4) => DynamicImage::ImageRgba8(
                ImageBuffer::<Rgba<u8>, _>::from_raw(w, h, t.data.clone()).ok_or_else(mismatch)?,
            ),
            (Image::U16(t), 1) => DynamicImage::ImageLuma16(
                ImageBuffer::<Luma<u16>, _>::from_raw(w, h, t.data.clone()).ok_or_else(mismatch)?,
            ),
            (Image::U16(t), 2) => DynamicImage::ImageLumaA16(
                ImageBuffer::<LumaA<u16>, _>::from_raw(w, h, t.data.clone()).ok_or_else(mismatch)?,
            ),
            (Image::U16(t), 3) => DynamicImage::ImageRgb16(
                ImageBuffer::<Rgb<u16>, _>::from_raw(w, h, t.data.clone()).ok_or_else(mismatch)?,
            ),
            (Image::U16(t), 4) => DynamicImage::ImageRgba16(
                ImageBuffer::<Rgba<u16>, _>::from_raw(w, h, t.data.clone()).ok_or_else(mismatch)?,
            ),
            (Image::F32(t), 3) => DynamicImage::ImageRgb32F(
                ImageBuffer::<Rgb<f32>, _>::from_raw(w, h, t.data.clone()).ok_or_else(mismatch)?,
            ),
            (Image::F32(t), 4) => DynamicImage::ImageRgba32F(
                ImageBuffer::<Rgba<f32>, _>::from_raw(w, h, t.data.clone()).ok_or_else(mismatch)?,
            ),
            (_, channels) => {
                return Err(ImageError::Encode(format!(
                    "unsupported channel count: {channels}"
                )));
            }
        };
        Ok(image)
    }

    /// Convert to 8-bit RGBA, the layout the compositor works in.
    pub fn to_rgba8(&self) -> Result<Tensor<u8>, ImageError> {
        if let Image::U8(t) = self {
            if t.shape[2] == 4 {
                return Ok(t.clone());
            }
        }
        let rgba = self.to_dynamic()?.to_rgba8();
        let (w, h) = rgba.dimensions();
        Ok(Tensor::new(vec![h as usize, w as usize, 4], rgba.into_raw())?)
    }
}
