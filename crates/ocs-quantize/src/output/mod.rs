//! Output types for the quantizer.
//!
//! [`IndexedImage`] stores palette indices with dimension metadata and an
//! owned [`Palette`](crate::palette::Palette).

mod indexed_image;

pub use indexed_image::IndexedImage;
