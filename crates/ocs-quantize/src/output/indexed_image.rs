//! IndexedImage: palette indices plus the palette they refer to.

use crate::palette::{Palette, Rgb};

/// The output of a quantization pass.
///
/// Stores one `u8` palette index per pixel in row-major order, the image
/// dimensions, and the palette. RGB output is computed on demand.
///
/// # Example
///
/// ```
/// use ocs_quantize::{IndexedImage, Palette};
///
/// let palette = Palette::new(&[[0, 0, 0], [255, 255, 255]]).unwrap();
/// let image = IndexedImage::new(vec![0, 1, 1, 0], 2, 2, palette);
///
/// assert_eq!(image.indices(), &[0, 1, 1, 0]);
/// assert_eq!(image.to_rgb().len(), 2 * 2 * 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    indices: Vec<u8>,
    width: usize,
    height: usize,
    palette: Palette,
}

impl IndexedImage {
    /// Create a new `IndexedImage`.
    ///
    /// # Panics (debug only)
    ///
    /// Debug-asserts that `indices.len() == width * height`.
    pub fn new(indices: Vec<u8>, width: usize, height: usize, palette: Palette) -> Self {
        debug_assert_eq!(
            indices.len(),
            width * height,
            "indices length ({}) must match width * height ({}x{})",
            indices.len(),
            width,
            height,
        );
        Self {
            indices,
            width,
            height,
            palette,
        }
    }

    /// Palette indices in row-major order.
    #[inline]
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Consume the image, returning its indices and palette.
    pub fn into_parts(self) -> (Vec<u8>, Palette) {
        (self.indices, self.palette)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Color of the pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.indices[y * self.width + x] as usize;
        Some(self.palette.color(idx))
    }

    /// Expand to interleaved RGB bytes, `width * height * 3` long.
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.indices.len() * 3);
        for &idx in &self.indices {
            rgb.extend_from_slice(&self.palette.color(idx as usize));
        }
        rgb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image() -> IndexedImage {
        let palette = Palette::new(&[[0, 0, 0], [16, 32, 48]]).unwrap();
        IndexedImage::new(vec![1, 0, 0, 1], 2, 2, palette)
    }

    #[test]
    fn test_to_rgb() {
        assert_eq!(
            test_image().to_rgb(),
            vec![16, 32, 48, 0, 0, 0, 0, 0, 0, 16, 32, 48]
        );
    }

    #[test]
    fn test_pixel_bounds() {
        let image = test_image();
        assert_eq!(image.pixel(1, 1), Some([16, 32, 48]));
        assert_eq!(image.pixel(2, 0), None);
        assert_eq!(image.pixel(0, 2), None);
    }

    #[test]
    fn test_into_parts() {
        let (indices, palette) = test_image().into_parts();
        assert_eq!(indices, vec![1, 0, 0, 1]);
        assert_eq!(palette.len(), 2);
    }
}
