//! ocs-palette - Amiga OCS palette reduction
//!
//! Reduces an image layer to a bitplane color budget with 4 bits per RGB
//! channel: quantize with a chosen dither, snap every channel to a multiple
//! of 16, then quantize again without dithering.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
