//! Palette types and palette selection
//!
//! This module provides the [`Palette`] type, the median cut selector that
//! builds one from pixel data, and the validation error type.

mod error;
mod median_cut;
mod palette;

pub use error::PaletteError;
pub use median_cut::{histogram, median_cut};
pub use palette::{Palette, Rgb, MAX_PALETTE_SIZE};
