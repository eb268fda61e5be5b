use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::models::{ColorMode, LayerId};

/// Pipeline step a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Prepare,
    BeginUndo,
    Reduce,
    ExpandColor,
    ReadRegion,
    Requantize,
    ReplaceLayer,
    ClearSelection,
    FinalReduce,
    EndUndo,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Prepare => "prepare",
            Stage::BeginUndo => "begin undo group",
            Stage::Reduce => "reduce to palette",
            Stage::ExpandColor => "convert to full color",
            Stage::ReadRegion => "read layer region",
            Stage::Requantize => "requantize channels",
            Stage::ReplaceLayer => "replace layer",
            Stage::ClearSelection => "clear selection",
            Stage::FinalReduce => "final reduce to palette",
            Stage::EndUndo => "end undo group",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Buffer of {actual} samples does not match {width}x{height} with {channels} channels")]
    FormatMismatch {
        width: u32,
        height: u32,
        channels: usize,
        actual: usize,
    },

    #[error("Unsupported channel count: {0}")]
    UnsupportedChannelCount(usize),

    #[error("{stage} failed: {source}")]
    HostOperationFailed {
        stage: Stage,
        #[source]
        source: HostError,
    },

    #[error("Cancelled during {stage}")]
    Cancelled { stage: Stage },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl PipelineError {
    /// Wrap a collaborator failure with the stage it happened in.
    pub fn host(stage: Stage) -> impl FnOnce(HostError) -> PipelineError {
        move |source| PipelineError::HostOperationFailed { stage, source }
    }

    /// The stage a failure is tagged with, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::HostOperationFailed { stage, .. } | PipelineError::Cancelled { stage } => {
                Some(*stage)
            }
            PipelineError::InvalidDimensions { .. }
            | PipelineError::FormatMismatch { .. }
            | PipelineError::UnsupportedChannelCount(_) => Some(Stage::Requantize),
            PipelineError::InvalidParameter(_) => None,
        }
    }
}

/// Failures reported by the host image and its collaborators.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Layer not found: {0}")]
    LayerNotFound(LayerId),

    #[error("Image is in {actual} mode, expected {expected}")]
    WrongColorMode {
        expected: ColorMode,
        actual: ColorMode,
    },

    #[error("Region {actual_width}x{actual_height} does not fit layer {layer} ({width}x{height})")]
    RegionMismatch {
        layer: LayerId,
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("Layer {0} has no pending region to commit")]
    NothingToCommit(LayerId),

    #[error("Cannot remove the last layer of an image")]
    LastLayer,

    #[error("No undo group is open")]
    NoOpenUndoGroup,

    #[error("Quantizer error: {0}")]
    Quantize(#[from] ocs_quantize::QuantizeError),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Error)]
pub enum ImageIoError {
    #[error("PNG decode error: {0}")]
    Decode(String),

    #[error("PNG encode error: {0}")]
    Encode(String),

    #[error("Unsupported PNG color type: {0}")]
    UnsupportedColorType(String),

    #[error("Image has no layers")]
    NoLayers,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}
