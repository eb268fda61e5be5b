//! Test images.

use ocs_palette::models::{Image, PixelBuffer, PixelFormat, Rect};

/// Name of the single layer in fixture images.
pub const LAYER_NAME: &str = "Background";

/// The 2x1 image from the documentation: one bright pixel, one gray pixel.
pub fn two_pixel_image() -> Image {
    let buffer =
        PixelBuffer::from_samples(2, 1, PixelFormat::Rgb, vec![10, 250, 120, 99, 99, 99]).unwrap();
    Image::from_buffer(LAYER_NAME, buffer)
}

/// A smooth gradient with many distinct colors.
pub fn gradient(width: u32, height: u32) -> PixelBuffer {
    let mut buffer = PixelBuffer::new(width, height, PixelFormat::Rgb);
    for y in 0..height {
        for x in 0..width {
            buffer.pixel_mut(x, y).unwrap().copy_from_slice(&[
                (x * 255 / width) as u8,
                (y * 255 / height) as u8,
                ((x + y) * 127 / (width + height)) as u8,
            ]);
        }
    }
    buffer
}

/// Gradient with a checkerboard of alpha values, some fully transparent.
pub fn gradient_rgba(width: u32, height: u32) -> PixelBuffer {
    let rgb = gradient(width, height);
    let mut buffer = PixelBuffer::new(width, height, PixelFormat::Rgba);
    for y in 0..height {
        for x in 0..width {
            let src = rgb.pixel(x, y).unwrap().to_vec();
            let alpha = if (x + y) % 2 == 0 { 255 } else { (x * 7 + y) as u8 % 200 };
            buffer
                .pixel_mut(x, y)
                .unwrap()
                .copy_from_slice(&[src[0], src[1], src[2], alpha]);
        }
    }
    buffer
}

/// A single-layer gradient image with an active selection.
pub fn gradient_image(width: u32, height: u32) -> Image {
    let mut image = Image::from_buffer(LAYER_NAME, gradient(width, height));
    image.set_selection(Some(Rect::new(1, 1, 2, 2)));
    image
}
