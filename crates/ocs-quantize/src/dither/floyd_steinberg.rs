//! Floyd-Steinberg error diffusion, normal and reduced-bleed variants.

use crate::palette::{Palette, Rgb};

use super::{dither_with_kernel, Dither, DitherOptions, FLOYD_STEINBERG};

/// Fraction of error diffused by the reduced-bleed variant.
const REDUCED_BLEED_SCALE: f32 = 0.75;

/// Per-channel error clamp of the reduced-bleed variant, in 8-bit units.
const REDUCED_BLEED_CLAMP: f32 = 48.0;

/// Floyd-Steinberg error diffusion dithering.
///
/// ```text
///        X   7
///    3   5   1
/// ```
///
/// Weights: 7/16 right, 3/16 bottom-left, 5/16 bottom, 1/16 bottom-right.
/// Rows are scanned serpentine.
pub struct FloydSteinberg;

impl Dither for FloydSteinberg {
    fn dither(&self, image: &[Rgb], width: usize, height: usize, palette: &Palette) -> Vec<u8> {
        dither_with_kernel(
            image,
            width,
            height,
            palette,
            &FLOYD_STEINBERG,
            &DitherOptions::new(),
        )
    }
}

/// Floyd-Steinberg with reduced color bleeding.
///
/// Same kernel as [`FloydSteinberg`], but only 3/4 of each pixel's error is
/// diffused and the accumulated error is clamped to ±48 per channel. Large
/// errors next to hard edges no longer smear color into neighboring flat
/// regions.
pub struct FloydSteinbergReducedBleed;

impl Dither for FloydSteinbergReducedBleed {
    fn dither(&self, image: &[Rgb], width: usize, height: usize, palette: &Palette) -> Vec<u8> {
        let options = DitherOptions::new()
            .error_scale(REDUCED_BLEED_SCALE)
            .error_clamp(REDUCED_BLEED_CLAMP);
        dither_with_kernel(image, width, height, palette, &FLOYD_STEINBERG, &options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bw_palette() -> Palette {
        Palette::new(&[[0, 0, 0], [255, 255, 255]]).unwrap()
    }

    #[test]
    fn test_mid_gray_mixes_black_and_white() {
        let palette = bw_palette();
        let image = vec![[128, 128, 128]; 16];

        let result = FloydSteinberg.dither(&image, 4, 4, &palette);

        let white = result.iter().filter(|&&i| i == 1).count();
        assert!(white > 0 && white < 16);
    }

    #[test]
    fn test_average_brightness_preserved() {
        let palette = bw_palette();
        let (width, height) = (16, 16);
        let image = vec![[77, 77, 77]; width * height];

        let result = FloydSteinberg.dither(&image, width, height, &palette);

        let white_ratio =
            result.iter().filter(|&&i| i == 1).count() as f32 / (width * height) as f32;
        assert!(
            (white_ratio - 77.0 / 255.0).abs() < 0.1,
            "white ratio {white_ratio}"
        );
    }

    #[test]
    fn test_reduced_bleed_produces_fewer_minority_pixels_in_dark_flat_area() {
        let palette = bw_palette();
        let (width, height) = (16, 16);
        let image = vec![[40, 40, 40]; width * height];

        let normal = FloydSteinberg.dither(&image, width, height, &palette);
        let reduced = FloydSteinbergReducedBleed.dither(&image, width, height, &palette);

        let count = |v: &[u8]| v.iter().filter(|&&i| i == 1).count();
        assert!(count(&reduced) <= count(&normal));
    }

    #[test]
    fn test_exact_black_and_white() {
        let palette = bw_palette();
        let black = vec![[0, 0, 0]; 4];
        let white = vec![[255, 255, 255]; 4];

        assert!(FloydSteinberg
            .dither(&black, 2, 2, &palette)
            .iter()
            .all(|&i| i == 0));
        assert!(FloydSteinbergReducedBleed
            .dither(&white, 2, 2, &palette)
            .iter()
            .all(|&i| i == 1));
    }
}
