//! Quantizer builder, the primary entry point for the crate.
//!
//! [`Quantizer`] couples a color budget with a remapping algorithm.

use crate::api::QuantizeError;
use crate::dither::DitherAlgorithm;
use crate::output::IndexedImage;
use crate::palette::{histogram, median_cut, Palette, Rgb, MAX_PALETTE_SIZE};

/// High-level palette reduction builder.
///
/// - [`new()`](Self::new) takes the color budget; it is validated when a
///   palette is built
/// - [`algorithm()`](Self::algorithm) consumes and returns `self`
/// - [`build_palette()`](Self::build_palette) and [`remap()`](Self::remap)
///   take `&self`, so one quantizer serves several images
///
/// # Example
///
/// ```
/// use ocs_quantize::{DitherAlgorithm, Quantizer};
///
/// let pixels = vec![[16, 16, 16], [240, 240, 240], [16, 16, 16], [240, 240, 240]];
/// let indexed = Quantizer::new(32)
///     .algorithm(DitherAlgorithm::FloydSteinberg)
///     .quantize(&pixels, 2, 2)
///     .unwrap();
///
/// assert_eq!(indexed.palette().len(), 2);
/// assert_eq!(indexed.to_rgb()[..3], [16, 16, 16]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantizer {
    max_colors: usize,
    algorithm: DitherAlgorithm,
}

impl Quantizer {
    /// Create a quantizer with a budget of `max_colors` palette entries.
    pub fn new(max_colors: usize) -> Self {
        Self {
            max_colors,
            algorithm: DitherAlgorithm::default(),
        }
    }

    /// Select the remapping algorithm.
    pub fn algorithm(mut self, algorithm: DitherAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    #[inline]
    pub fn max_colors(&self) -> usize {
        self.max_colors
    }

    #[inline]
    pub fn selected_algorithm(&self) -> DitherAlgorithm {
        self.algorithm
    }

    /// Choose at most `max_colors` colors representing `pixels`.
    ///
    /// # Errors
    ///
    /// - [`QuantizeError::InvalidColorBudget`] if the budget is outside 2..=256
    /// - [`QuantizeError::NoPixels`] if `pixels` is empty
    pub fn build_palette(&self, pixels: &[Rgb]) -> Result<Palette, QuantizeError> {
        if !(2..=MAX_PALETTE_SIZE).contains(&self.max_colors) {
            return Err(QuantizeError::InvalidColorBudget {
                requested: self.max_colors,
            });
        }
        if pixels.is_empty() {
            return Err(QuantizeError::NoPixels);
        }

        let colors = median_cut(histogram(pixels), self.max_colors);
        Ok(Palette::new(&colors)?)
    }

    /// Remap `pixels` onto `palette` with the selected algorithm.
    ///
    /// # Errors
    ///
    /// [`QuantizeError::DimensionMismatch`] if `pixels.len() != width * height`.
    pub fn remap(
        &self,
        pixels: &[Rgb],
        width: usize,
        height: usize,
        palette: &Palette,
    ) -> Result<IndexedImage, QuantizeError> {
        let expected = width * height;
        if pixels.len() != expected {
            return Err(QuantizeError::DimensionMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        let indices = self.algorithm.apply(pixels, width, height, palette);
        Ok(IndexedImage::new(indices, width, height, palette.clone()))
    }

    /// Build a palette from `pixels` and remap them onto it.
    pub fn quantize(
        &self,
        pixels: &[Rgb],
        width: usize,
        height: usize,
    ) -> Result<IndexedImage, QuantizeError> {
        let palette = self.build_palette(pixels)?;
        self.remap(pixels, width, height, &palette)
    }
}
