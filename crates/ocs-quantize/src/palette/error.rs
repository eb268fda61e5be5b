//! Error types for palette operations

use std::fmt;

/// Error type for palette validation.
///
/// Returned when a palette is constructed from an invalid color list or a
/// palette is requested for an unsupported color budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    /// No colors provided in palette
    EmptyPalette,
    /// More colors than an indexed image can address
    TooManyColors {
        /// Number of colors provided
        count: usize,
        /// Largest supported palette
        max: usize,
    },
    /// Duplicate color found at the specified index
    DuplicateColor {
        /// Index where the duplicate was found
        index: usize,
    },
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteError::EmptyPalette => {
                write!(f, "palette cannot be empty")
            }
            PaletteError::TooManyColors { count, max } => {
                write!(f, "palette has {} colors, at most {} are supported", count, max)
            }
            PaletteError::DuplicateColor { index } => {
                write!(f, "duplicate color found at index {}", index)
            }
        }
    }
}

impl std::error::Error for PaletteError {}
