//! Remapping pixels onto a palette, with or without dithering.
//!
//! All algorithms implement the [`Dither`] trait and produce one palette
//! index per pixel in row-major order. [`DitherAlgorithm`] is the closed set
//! of strategies exposed to callers.

mod floyd_steinberg;
mod kernel;
mod nearest;
mod options;
mod ordered;

pub use floyd_steinberg::{FloydSteinberg, FloydSteinbergReducedBleed};
pub use kernel::{Kernel, FLOYD_STEINBERG};
pub use nearest::Nearest;
pub use options::DitherOptions;
pub use ordered::{Positioned, BAYER_8};

use crate::palette::{Palette, Rgb};

/// Dither algorithm selection.
///
/// The four options of the classic indexed-conversion dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DitherAlgorithm {
    /// No dithering: every pixel maps to its nearest palette color.
    #[default]
    None,

    /// Floyd-Steinberg error diffusion with full propagation.
    FloydSteinberg,

    /// Floyd-Steinberg with reduced color bleeding.
    ///
    /// Diffuses 3/4 of the error and clamps it per channel, so flat areas
    /// next to strong edges stay flat.
    FloydSteinbergReducedBleed,

    /// Positioned (ordered) dithering with an 8x8 Bayer matrix.
    Positioned,
}

impl DitherAlgorithm {
    /// Remap `image` onto `palette` with this algorithm.
    pub fn apply(self, image: &[Rgb], width: usize, height: usize, palette: &Palette) -> Vec<u8> {
        match self {
            DitherAlgorithm::None => Nearest.dither(image, width, height, palette),
            DitherAlgorithm::FloydSteinberg => {
                FloydSteinberg.dither(image, width, height, palette)
            }
            DitherAlgorithm::FloydSteinbergReducedBleed => {
                FloydSteinbergReducedBleed.dither(image, width, height, palette)
            }
            DitherAlgorithm::Positioned => Positioned.dither(image, width, height, palette),
        }
    }
}

/// Trait for palette remapping algorithms.
pub trait Dither {
    /// Remap an image to palette indices.
    ///
    /// `image` holds `width * height` pixels in row-major order. The returned
    /// vector has the same length; each index is in `0..palette.len()`.
    fn dither(&self, image: &[Rgb], width: usize, height: usize, palette: &Palette) -> Vec<u8>;
}

/// Error buffer for efficient error diffusion.
///
/// Keeps only the rows the kernel can reach (`max_dy + 1`), rotating them as
/// the scan advances instead of allocating a full-image error plane.
#[derive(Debug)]
pub struct ErrorBuffer {
    /// rows[0] is the current row, rows[1] the next, and so on.
    rows: Vec<Vec<[f32; 3]>>,
    width: usize,
}

impl ErrorBuffer {
    /// Create a buffer for `width` pixels and `row_depth` rows.
    pub fn new(width: usize, row_depth: usize) -> Self {
        Self {
            rows: (0..row_depth).map(|_| vec![[0.0; 3]; width]).collect(),
            width,
        }
    }

    /// Accumulated error for pixel `x` of the current row.
    #[inline]
    pub fn get_accumulated(&self, x: usize) -> [f32; 3] {
        self.rows[0][x]
    }

    /// Add error to a future pixel. Out-of-bounds targets are ignored.
    #[inline]
    pub fn add_error(&mut self, x: usize, row_offset: usize, error: [f32; 3]) {
        if x < self.width && row_offset < self.rows.len() {
            for c in 0..3 {
                self.rows[row_offset][x][c] += error[c];
            }
        }
    }

    /// Advance to the next row, recycling the finished one as a zeroed row.
    pub fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0.0; 3]);
        }
    }
}

/// Error diffusion loop shared by the Floyd-Steinberg variants.
pub(crate) fn dither_with_kernel(
    image: &[Rgb],
    width: usize,
    height: usize,
    palette: &Palette,
    kernel: &Kernel,
    options: &DitherOptions,
) -> Vec<u8> {
    let mut output = vec![0u8; width * height];
    let mut error_buf = ErrorBuffer::new(width, kernel.max_dy + 1);
    let divisor = kernel.divisor as f32;
    let limit = options.error_clamp;

    for y in 0..height {
        let reverse = options.serpentine && y % 2 == 1;

        let x_range: Box<dyn Iterator<Item = usize>> = if reverse {
            Box::new((0..width).rev())
        } else {
            Box::new(0..width)
        };

        for x in x_range {
            let idx = y * width + x;
            let source = image[idx];
            let accumulated = error_buf.get_accumulated(x);

            let pixel = [
                source[0] as f32 + accumulated[0].clamp(-limit, limit),
                source[1] as f32 + accumulated[1].clamp(-limit, limit),
                source[2] as f32 + accumulated[2].clamp(-limit, limit),
            ];

            let nearest = palette.find_nearest(pixel);
            output[idx] = nearest as u8;

            let chosen = palette.color(nearest);
            let error = [
                (pixel[0] - chosen[0] as f32) * options.error_scale,
                (pixel[1] - chosen[1] as f32) * options.error_scale,
                (pixel[2] - chosen[2] as f32) * options.error_scale,
            ];

            for &(dx, dy, weight) in kernel.entries {
                let effective_dx = if reverse { -dx } else { dx };
                let nx = x as i32 + effective_dx;
                if nx < 0 || nx as usize >= width || y + dy as usize >= height {
                    continue;
                }
                let w = weight as f32 / divisor;
                error_buf.add_error(
                    nx as usize,
                    dy as usize,
                    [error[0] * w, error[1] * w, error[2] * w],
                );
            }
        }

        error_buf.advance_row();
    }

    output
}
