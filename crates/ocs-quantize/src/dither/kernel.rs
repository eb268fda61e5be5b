//! Error diffusion kernel definitions.

/// An error diffusion kernel.
///
/// Each entry is `(dx, dy, weight)`; a neighbor receives
/// `error * weight / divisor`. `max_dy` is how many rows ahead the kernel
/// reaches, which sizes the error buffer (`max_dy + 1` rows).
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    /// (dx, dy, weight) entries. `dx` is flipped on serpentine reverse rows.
    pub entries: &'static [(i32, i32, u8)],

    /// Total divisor for normalizing weights.
    pub divisor: u8,

    /// Maximum dy value in entries.
    pub max_dy: usize,
}

impl Kernel {
    /// Sum of all weights; equals `divisor` for full propagation.
    pub fn total_weight(&self) -> u32 {
        self.entries.iter().map(|&(_, _, w)| w as u32).sum()
    }
}

/// Floyd-Steinberg dithering kernel.
///
/// Distributes error to 4 neighbors with 100% total propagation (16/16).
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
        (1, 0, 7),  // right
        (-1, 1, 3), // bottom-left
        (0, 1, 5),  // bottom
        (1, 1, 1),  // bottom-right
    ],
    divisor: 16,
    max_dy: 1,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floyd_steinberg_full_propagation() {
        assert_eq!(FLOYD_STEINBERG.total_weight(), FLOYD_STEINBERG.divisor as u32);
    }

    #[test]
    fn test_max_dy_matches_entries() {
        let max = FLOYD_STEINBERG
            .entries
            .iter()
            .map(|&(_, dy, _)| dy as usize)
            .max()
            .unwrap();
        assert_eq!(max, FLOYD_STEINBERG.max_dy);
    }
}
