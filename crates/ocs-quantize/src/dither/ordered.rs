//! Positioned (ordered) dithering with a Bayer threshold matrix.
//!
//! Each pixel is offset by a threshold taken from a tiled 8x8 Bayer matrix
//! and then mapped to its nearest palette color. No error is carried between
//! pixels, so the result is independent of scan order.

use crate::palette::{Palette, Rgb};

use super::Dither;

/// 8x8 Bayer index matrix (values 0..64).
pub const BAYER_8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Positioned dithering.
///
/// The threshold offset is `((m + 0.5) / 64 - 0.5) * spread`, where `m` is the
/// Bayer entry and `spread` the palette's typical color step, so the pattern
/// amplitude adapts to how coarse the palette is.
#[derive(Debug, Clone, Copy, Default)]
pub struct Positioned;

impl Dither for Positioned {
    fn dither(&self, image: &[Rgb], width: usize, height: usize, palette: &Palette) -> Vec<u8> {
        let spread = palette.spread();
        let mut output = vec![0u8; width * height];

        for y in 0..height {
            for x in 0..width {
                let idx = y * width + x;
                let threshold = (BAYER_8[y % 8][x % 8] as f32 + 0.5) / 64.0 - 0.5;
                let offset = threshold * spread;
                let source = image[idx];
                let pixel = [
                    source[0] as f32 + offset,
                    source[1] as f32 + offset,
                    source[2] as f32 + offset,
                ];
                output[idx] = palette.find_nearest(pixel) as u8;
            }
        }

        output
    }
}
