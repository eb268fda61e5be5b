//! Palette struct with nearest-color matching.

use std::collections::HashSet;

use super::error::PaletteError;

/// An 8-bit RGB triple.
pub type Rgb = [u8; 3];

/// Largest palette an indexed image can address with `u8` indices.
pub const MAX_PALETTE_SIZE: usize = 256;

/// A color palette for indexed images.
///
/// Entries are unique 8-bit RGB colors. Matching uses squared Euclidean
/// distance in RGB, which is what classic indexed conversion does; no color
/// space conversion is involved.
///
/// # Example
///
/// ```
/// use ocs_quantize::Palette;
///
/// let palette = Palette::new(&[[0, 0, 0], [255, 255, 255]]).unwrap();
///
/// assert_eq!(palette.len(), 2);
/// assert_eq!(palette.find_nearest([200.0, 190.0, 210.0]), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// Create a new palette from a list of colors.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::EmptyPalette`] if `colors` is empty
    /// - [`PaletteError::TooManyColors`] if more than 256 colors are given
    /// - [`PaletteError::DuplicateColor`] if a color repeats
    pub fn new(colors: &[Rgb]) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }
        if colors.len() > MAX_PALETTE_SIZE {
            return Err(PaletteError::TooManyColors {
                count: colors.len(),
                max: MAX_PALETTE_SIZE,
            });
        }

        let mut seen = HashSet::new();
        for (i, color) in colors.iter().enumerate() {
            if !seen.insert(*color) {
                return Err(PaletteError::DuplicateColor { index: i });
            }
        }

        Ok(Self {
            colors: colors.to_vec(),
        })
    }

    /// Number of palette entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; construction rejects empty palettes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// The color at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[inline]
    pub fn color(&self, index: usize) -> Rgb {
        self.colors[index]
    }

    /// All palette colors in index order.
    #[inline]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Index of an exact byte-level match, if any.
    pub fn index_of(&self, color: Rgb) -> Option<usize> {
        self.colors.iter().position(|&c| c == color)
    }

    /// Find the nearest palette entry to a (possibly out of range) pixel.
    ///
    /// The pixel is given as floats so that error diffusion can pass values
    /// carrying accumulated error without clamping first. Ties resolve to the
    /// lowest index.
    pub fn find_nearest(&self, pixel: [f32; 3]) -> usize {
        let mut best_idx = 0;
        let mut best_dist = f32::INFINITY;

        for (i, color) in self.colors.iter().enumerate() {
            let dr = pixel[0] - color[0] as f32;
            let dg = pixel[1] - color[1] as f32;
            let db = pixel[2] - color[2] as f32;
            let dist = dr * dr + dg * dg + db * db;
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }

        best_idx
    }

    /// Typical distance between neighboring palette colors, per channel.
    ///
    /// Approximates the palette as a uniform grid with `cbrt(len)` levels per
    /// channel. Ordered dithering scales its threshold offsets by this value.
    pub fn spread(&self) -> f32 {
        let levels = (self.colors.len() as f32).cbrt().max(1.0);
        if levels <= 1.0 {
            255.0
        } else {
            255.0 / (levels - 1.0).max(1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_palette_rejected() {
        assert_eq!(Palette::new(&[]), Err(PaletteError::EmptyPalette));
    }

    #[test]
    fn test_duplicate_rejected() {
        let result = Palette::new(&[[1, 2, 3], [4, 5, 6], [1, 2, 3]]);
        assert_eq!(result, Err(PaletteError::DuplicateColor { index: 2 }));
    }

    #[test]
    fn test_too_many_colors_rejected() {
        let colors: Vec<Rgb> = (0..257u32)
            .map(|i| [(i % 256) as u8, (i / 256) as u8, 0])
            .collect();
        assert_eq!(
            Palette::new(&colors),
            Err(PaletteError::TooManyColors { count: 257, max: 256 })
        );
    }

    #[test]
    fn test_find_nearest_exact() {
        let palette = Palette::new(&[[0, 0, 0], [255, 0, 0], [0, 255, 0]]).unwrap();
        assert_eq!(palette.find_nearest([255.0, 0.0, 0.0]), 1);
        assert_eq!(palette.find_nearest([10.0, 240.0, 5.0]), 2);
    }

    #[test]
    fn test_find_nearest_out_of_range_values() {
        let palette = Palette::new(&[[0, 0, 0], [255, 255, 255]]).unwrap();
        assert_eq!(palette.find_nearest([-40.0, -40.0, -40.0]), 0);
        assert_eq!(palette.find_nearest([300.0, 300.0, 300.0]), 1);
    }

    #[test]
    fn test_find_nearest_tie_prefers_lowest_index() {
        let palette = Palette::new(&[[0, 0, 0], [100, 100, 100]]).unwrap();
        assert_eq!(palette.find_nearest([50.0, 50.0, 50.0]), 0);
    }

    #[test]
    fn test_index_of() {
        let palette = Palette::new(&[[0, 0, 0], [16, 32, 48]]).unwrap();
        assert_eq!(palette.index_of([16, 32, 48]), Some(1));
        assert_eq!(palette.index_of([16, 32, 49]), None);
    }

    #[test]
    fn test_spread_shrinks_with_size() {
        let two = Palette::new(&[[0, 0, 0], [255, 255, 255]]).unwrap();
        let colors: Vec<Rgb> = (0..27u8).map(|i| [i * 9, i, 0]).collect();
        let many = Palette::new(&colors).unwrap();
        assert!(many.spread() < two.spread());
        assert!((many.spread() - 127.5).abs() < 1e-3);
    }
}
