use base::Tensor;
use image::{Image, ImageError, ResizeMode, resize};

#[test]
fn test_accessors() {
    let image = Image::U16(Tensor::new(vec![3, 5, 1], vec![0u16; 15]).unwrap());
    assert_eq!(image.height(), 3);
    assert_eq!(image.width(), 5);
    assert_eq!(image.channels(), 1);
}

#[test]
fn test_from_rgba8_validates_length() {
    let result = Image::from_rgba8(2, 2, vec![0; 15]);
    assert!(matches!(result, Err(ImageError::Tensor(_))));
}

#[test]
fn test_gray_to_rgba8() {
    let image = Image::U8(Tensor::new(vec![1, 2, 1], vec![10, 200]).unwrap());
    let rgba = image.to_rgba8().unwrap();
    assert_eq!(rgba.shape, vec![1, 2, 4]);
    assert_eq!(rgba.data, vec![10, 10, 10, 255, 200, 200, 200, 255]);
}

#[test]
fn test_float_to_rgba8() {
    let image = Image::F32(Tensor::new(vec![1, 1, 3], vec![1.0, 0.0, 0.5]).unwrap());
    let rgba = image.to_rgba8().unwrap();
    assert_eq!(rgba.data[0], 255);
    assert_eq!(rgba.data[1], 0);
    assert_eq!(rgba.data[3], 255);
}

#[test]
fn test_unsupported_channel_count() {
    let image = Image::F32(Tensor::new(vec![1, 1, 2], vec![0.0, 1.0]).unwrap());
    assert!(matches!(image.to_rgba8(), Err(ImageError::Encode(_))));
}

#[test]
fn test_stretch_and_cover_dimensions() {
    let image = Image::from_rgba8(10, 20, vec![128; 10 * 20 * 4]).unwrap();
    let stretched = resize(&image, 7, 3, ResizeMode::Stretch).unwrap();
    assert_eq!((stretched.width(), stretched.height()), (7, 3));
    let cover = resize(&image, 8, 8, ResizeMode::Cover).unwrap();
    assert_eq!((cover.width(), cover.height()), (8, 8));
}
