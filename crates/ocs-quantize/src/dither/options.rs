//! Dithering options and configuration.

/// Configuration options for error diffusion dithering.
///
/// # Defaults
///
/// - Serpentine scanning: enabled
/// - Error scale: 1.0 (full propagation)
/// - Error clamp: unbounded
///
/// # Example
///
/// ```
/// use ocs_quantize::DitherOptions;
///
/// let options = DitherOptions::new()
///     .serpentine(false)
///     .error_scale(0.75)
///     .error_clamp(48.0);
/// assert!(!options.serpentine);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DitherOptions {
    /// Enable serpentine scanning (alternating row direction).
    ///
    /// Odd rows are processed right-to-left with the kernel mirrored, which
    /// removes the diagonal "worm" artifacts of one-directional scans.
    pub serpentine: bool,

    /// Fraction of the quantization error that is diffused (0.0..=1.0).
    pub error_scale: f32,

    /// Maximum diffused error magnitude per channel, in 8-bit units.
    ///
    /// Accumulated error is clamped to `[-error_clamp, error_clamp]` before it
    /// is added to a pixel. Limits color bleeding across flat areas.
    pub error_clamp: f32,
}

impl Default for DitherOptions {
    fn default() -> Self {
        Self {
            serpentine: true,
            error_scale: 1.0,
            error_clamp: f32::INFINITY,
        }
    }
}

impl DitherOptions {
    /// Create new dither options with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set serpentine scanning mode.
    #[inline]
    pub fn serpentine(mut self, enabled: bool) -> Self {
        self.serpentine = enabled;
        self
    }

    /// Set the diffused error fraction. Values are clamped to 0.0..=1.0.
    #[inline]
    pub fn error_scale(mut self, scale: f32) -> Self {
        self.error_scale = scale.clamp(0.0, 1.0);
        self
    }

    /// Set the per-channel error clamp.
    #[inline]
    pub fn error_clamp(mut self, clamp: f32) -> Self {
        self.error_clamp = clamp.abs();
        self
    }
}
