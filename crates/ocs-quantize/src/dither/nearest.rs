//! Plain nearest-color remapping.

use crate::palette::{Palette, Rgb};

use super::Dither;

/// Maps each pixel to its nearest palette color, with no dithering.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nearest;

impl Dither for Nearest {
    fn dither(&self, image: &[Rgb], width: usize, height: usize, palette: &Palette) -> Vec<u8> {
        image
            .iter()
            .take(width * height)
            .map(|&c| match palette.index_of(c) {
                Some(idx) => idx as u8,
                None => palette.find_nearest([c[0] as f32, c[1] as f32, c[2] as f32]) as u8,
            })
            .collect()
    }
}
