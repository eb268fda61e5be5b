#![allow(clippy::needless_range_loop, clippy::module_inception)]

//! ocs-quantize: palette selection and dithered remapping for small color budgets
//!
//! This crate reduces 8-bit RGB pixels to an indexed image with at most
//! `max_colors` palette entries. It is the indexed-conversion engine behind
//! `ocs-palette`, but it has no knowledge of layers, undo or files.
//!
//! # Quick Start
//!
//! The [`Quantizer`] builder is the primary entry point:
//!
//! ```
//! use ocs_quantize::{DitherAlgorithm, Quantizer};
//!
//! let pixels = vec![[0, 0, 0], [255, 255, 255], [128, 128, 128], [250, 250, 250]];
//! let quantizer = Quantizer::new(2).algorithm(DitherAlgorithm::FloydSteinberg);
//!
//! let palette = quantizer.build_palette(&pixels).unwrap();
//! let indexed = quantizer.remap(&pixels, 2, 2, &palette).unwrap();
//!
//! assert_eq!(indexed.palette().len(), 2);
//! assert_eq!(indexed.indices().len(), 4);
//! ```
//!
//! # Palette Selection
//!
//! [`median_cut`] splits a weighted RGB histogram along its widest channel at
//! the weighted median until the color budget is reached, then averages each
//! box. When the image already has no more distinct colors than the budget,
//! the exact color set is kept, so an image that was reduced once reduces to
//! itself again.
//!
//! # Dithering Algorithms
//!
//! Four remapping strategies are available via [`DitherAlgorithm`], matching
//! the classic indexed-conversion dialog:
//!
//! - None: nearest palette color per pixel
//! - Floyd-Steinberg (normal): full 7/3/5/1 error diffusion
//! - Floyd-Steinberg (reduced color bleeding): 3/4 of the error, clamped
//! - Positioned: 8x8 Bayer ordered dithering

pub mod api;
pub mod dither;
pub mod output;
pub mod palette;

pub use api::{QuantizeError, Quantizer};
pub use dither::{DitherAlgorithm, DitherOptions};
pub use output::IndexedImage;
pub use palette::{median_cut, Palette, PaletteError, Rgb};
