//! Unified error type for the ocs-quantize public API.

use crate::palette::{PaletteError, MAX_PALETTE_SIZE};
use std::fmt;

/// Unified error type for the ocs-quantize public API.
///
/// # Example
///
/// ```
/// use ocs_quantize::{QuantizeError, Quantizer};
///
/// let err = Quantizer::new(1).build_palette(&[[0, 0, 0]]).unwrap_err();
/// assert!(matches!(err, QuantizeError::InvalidColorBudget { requested: 1 }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantizeError {
    /// Color budget outside 2..=256
    InvalidColorBudget {
        /// The requested budget
        requested: usize,
    },
    /// No pixels were supplied to build a palette from
    NoPixels,
    /// Pixel slice length does not match the stated dimensions
    DimensionMismatch {
        /// Expected pixel count (`width * height`)
        expected: usize,
        /// Actual pixel count
        actual: usize,
    },
    /// Palette validation error
    Palette(PaletteError),
}

impl fmt::Display for QuantizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantizeError::InvalidColorBudget { requested } => write!(
                f,
                "color budget {} is outside 2..={}",
                requested, MAX_PALETTE_SIZE
            ),
            QuantizeError::NoPixels => write!(f, "no pixels to build a palette from"),
            QuantizeError::DimensionMismatch { expected, actual } => write!(
                f,
                "expected {} pixels, got {}",
                expected, actual
            ),
            QuantizeError::Palette(err) => write!(f, "palette error: {}", err),
        }
    }
}

impl std::error::Error for QuantizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QuantizeError::Palette(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PaletteError> for QuantizeError {
    fn from(err: PaletteError) -> Self {
        QuantizeError::Palette(err)
    }
}
