use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Dithering used by the first palette reduction.
///
/// Passed opaquely to the quantizer. Also accepted as the numeric indices of
/// the classic conversion dialog (0 = none .. 3 = positioned).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DitherMode {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "floyd-steinberg")]
    FloydSteinbergNormal,
    #[serde(rename = "floyd-steinberg-reduced-bleed")]
    FloydSteinbergReducedBleed,
    #[serde(rename = "positioned")]
    Positioned,
}

impl DitherMode {
    pub const ALL: [DitherMode; 4] = [
        DitherMode::None,
        DitherMode::FloydSteinbergNormal,
        DitherMode::FloydSteinbergReducedBleed,
        DitherMode::Positioned,
    ];

    pub fn from_index(index: u8) -> Result<Self, PipelineError> {
        Self::ALL.get(index as usize).copied().ok_or_else(|| {
            PipelineError::InvalidParameter(format!("dither index {index} is not in 0..=3"))
        })
    }

    pub fn index(self) -> u8 {
        match self {
            DitherMode::None => 0,
            DitherMode::FloydSteinbergNormal => 1,
            DitherMode::FloydSteinbergReducedBleed => 2,
            DitherMode::Positioned => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DitherMode::None => "none",
            DitherMode::FloydSteinbergNormal => "floyd-steinberg",
            DitherMode::FloydSteinbergReducedBleed => "floyd-steinberg-reduced-bleed",
            DitherMode::Positioned => "positioned",
        }
    }
}

impl fmt::Display for DitherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DitherMode {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(index) = s.parse::<u8>() {
            return Self::from_index(index);
        }
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| PipelineError::InvalidParameter(format!("unknown dither mode: {s}")))
    }
}

/// Number of bitplanes, 1..=5. The color budget is `2^bitplanes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Bitplanes(u8);

impl Bitplanes {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(planes: u8) -> Result<Self, PipelineError> {
        if (Self::MIN..=Self::MAX).contains(&planes) {
            Ok(Self(planes))
        } else {
            Err(PipelineError::InvalidParameter(format!(
                "bitplanes must be {}..={}, got {planes}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Color budget for this many bitplanes.
    #[inline]
    pub fn num_colors(self) -> usize {
        1 << self.0
    }
}

impl Default for Bitplanes {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

impl TryFrom<u8> for Bitplanes {
    type Error = PipelineError;

    fn try_from(planes: u8) -> Result<Self, Self::Error> {
        Self::new(planes)
    }
}

impl From<Bitplanes> for u8 {
    fn from(planes: Bitplanes) -> Self {
        planes.0
    }
}

impl fmt::Display for Bitplanes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which columns the channel requantizer visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgePolicy {
    /// Columns `0..width - 1`; the rightmost column stays zero.
    #[default]
    SkipLastColumn,
    /// Every column.
    FullWidth,
}

impl EdgePolicy {
    /// Number of columns processed for an image `width` pixels wide.
    pub fn processed_columns(self, width: u32) -> u32 {
        match self {
            EdgePolicy::SkipLastColumn => width.saturating_sub(1),
            EdgePolicy::FullWidth => width,
        }
    }
}

pub const DEFAULT_LAYER_PREFIX: &str = "render ";

/// Parameters of one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineParams {
    pub dither: DitherMode,
    pub bitplanes: Bitplanes,
    pub edge_policy: EdgePolicy,
    pub layer_prefix: String,
}

impl PipelineParams {
    pub fn new(dither: DitherMode, bitplanes: Bitplanes) -> Self {
        Self {
            dither,
            bitplanes,
            ..Default::default()
        }
    }

    pub fn with_edge_policy(mut self, edge_policy: EdgePolicy) -> Self {
        self.edge_policy = edge_policy;
        self
    }

    pub fn with_layer_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.layer_prefix = prefix.into();
        self
    }

    #[inline]
    pub fn num_colors(&self) -> usize {
        self.bitplanes.num_colors()
    }
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            dither: DitherMode::default(),
            bitplanes: Bitplanes::default(),
            edge_policy: EdgePolicy::default(),
            layer_prefix: DEFAULT_LAYER_PREFIX.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dither_from_index() {
        assert_eq!(DitherMode::from_index(0).unwrap(), DitherMode::None);
        assert_eq!(
            DitherMode::from_index(1).unwrap(),
            DitherMode::FloydSteinbergNormal
        );
        assert_eq!(
            DitherMode::from_index(2).unwrap(),
            DitherMode::FloydSteinbergReducedBleed
        );
        assert_eq!(DitherMode::from_index(3).unwrap(), DitherMode::Positioned);
        assert!(DitherMode::from_index(4).is_err());
    }

    #[test]
    fn test_dither_from_str() {
        assert_eq!(
            "floyd-steinberg".parse::<DitherMode>().unwrap(),
            DitherMode::FloydSteinbergNormal
        );
        assert_eq!(
            "Positioned".parse::<DitherMode>().unwrap(),
            DitherMode::Positioned
        );
        assert_eq!(
            "2".parse::<DitherMode>().unwrap(),
            DitherMode::FloydSteinbergReducedBleed
        );
        assert!("atkinson".parse::<DitherMode>().is_err());
    }

    #[test]
    fn test_dither_index_round_trip() {
        for mode in DitherMode::ALL {
            assert_eq!(DitherMode::from_index(mode.index()).unwrap(), mode);
            assert_eq!(mode.to_string().parse::<DitherMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_bitplanes_range() {
        assert!(Bitplanes::new(0).is_err());
        assert!(Bitplanes::new(6).is_err());
        assert_eq!(Bitplanes::new(1).unwrap().num_colors(), 2);
        assert_eq!(Bitplanes::new(4).unwrap().num_colors(), 16);
        assert_eq!(Bitplanes::default().num_colors(), 32);
    }

    #[test]
    fn test_bitplanes_deserialize_validates() {
        let planes: Bitplanes = serde_yaml::from_str("3").unwrap();
        assert_eq!(planes.get(), 3);
        assert!(serde_yaml::from_str::<Bitplanes>("9").is_err());
    }

    #[test]
    fn test_processed_columns() {
        assert_eq!(EdgePolicy::SkipLastColumn.processed_columns(10), 9);
        assert_eq!(EdgePolicy::SkipLastColumn.processed_columns(1), 0);
        assert_eq!(EdgePolicy::FullWidth.processed_columns(10), 10);
    }

    #[test]
    fn test_default_params() {
        let params = PipelineParams::default();
        assert_eq!(params.dither, DitherMode::None);
        assert_eq!(params.num_colors(), 32);
        assert_eq!(params.edge_policy, EdgePolicy::SkipLastColumn);
        assert_eq!(params.layer_prefix, "render ");
    }
}
