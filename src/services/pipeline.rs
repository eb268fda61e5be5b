use serde::Serialize;

use super::host::{LayerStack, ModeConverter, Quantizer, SelectionService, TransactionService};
use super::layer_replace::replace_layer;
use super::progress::ProgressSink;
use super::undo::UndoGroup;
use crate::error::{PipelineError, Stage};
use crate::models::{Bitplanes, DitherMode, LayerId, PipelineParams};
use crate::rendering::requantize_buffer;

/// Label of the undo step recorded by one pipeline run.
pub const UNDO_LABEL: &str = "Palette Amiga OCS";

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    pub source_layer: LayerId,
    pub derived_layer: LayerId,
    pub derived_name: String,
    pub dither: DitherMode,
    pub bitplanes: Bitplanes,
    pub colors: usize,
    pub processed_columns: u32,
}

/// Reduces a layer to an OCS-style palette: quantize with the chosen
/// dither, requantize every channel to 16 levels, quantize again without
/// dithering. The whole run is one undo step.
pub struct OcsPipeline<Q> {
    quantizer: Q,
    params: PipelineParams,
}

impl<Q> OcsPipeline<Q> {
    pub fn new(quantizer: Q, params: PipelineParams) -> Self {
        Self { quantizer, params }
    }

    pub fn into_quantizer(self) -> Q {
        self.quantizer
    }

    /// Run the pipeline on layer `layer` of `image`.
    ///
    /// On error the undo group is aborted and `image` is back in the state
    /// it had before the call.
    pub fn run<I, P>(
        &mut self,
        image: &mut I,
        layer: LayerId,
        progress: &mut P,
    ) -> Result<PipelineReport, PipelineError>
    where
        I: LayerStack + SelectionService + TransactionService + ?Sized,
        Q: Quantizer<I> + ModeConverter<I>,
        P: ProgressSink + ?Sized,
    {
        let host = PipelineError::host;
        let colors = self.params.num_colors();

        let source = image.layer(layer).map_err(host(Stage::Prepare))?;
        progress.start(&format!("Processing {}...", source.name));
        tracing::info!(
            layer = %source.name,
            dither = %self.params.dither,
            bitplanes = %self.params.bitplanes,
            colors,
            "Starting palette reduction"
        );

        let mut group = UndoGroup::begin(image, UNDO_LABEL).map_err(host(Stage::BeginUndo))?;

        tracing::debug!(stage = %Stage::Reduce, "Stage start");
        self.quantizer
            .reduce_to_palette(&mut *group, self.params.dither, colors)
            .map_err(host(Stage::Reduce))?;

        tracing::debug!(stage = %Stage::ExpandColor, "Stage start");
        self.quantizer
            .to_full_color(&mut *group)
            .map_err(host(Stage::ExpandColor))?;

        tracing::debug!(stage = %Stage::Requantize, "Stage start");
        let buffer = group.read_region(layer).map_err(host(Stage::ReadRegion))?;
        let processed_columns = self.params.edge_policy.processed_columns(buffer.width());
        let requantized = requantize_buffer(&buffer, self.params.edge_policy, progress)?;

        tracing::debug!(stage = %Stage::ReplaceLayer, "Stage start");
        let derived = replace_layer(&mut *group, layer, requantized, &self.params.layer_prefix)?;

        group
            .clear_selection()
            .map_err(host(Stage::ClearSelection))?;

        tracing::debug!(stage = %Stage::FinalReduce, "Stage start");
        self.quantizer
            .reduce_to_palette(&mut *group, DitherMode::None, colors)
            .map_err(host(Stage::FinalReduce))?;

        group.commit().map_err(host(Stage::EndUndo))?;

        tracing::info!(
            layer = %derived.name,
            colors,
            processed_columns,
            "Palette reduction complete"
        );
        Ok(PipelineReport {
            source_layer: layer,
            derived_layer: derived.id,
            derived_name: derived.name,
            dither: self.params.dither,
            bitplanes: self.params.bitplanes,
            colors,
            processed_columns,
        })
    }
}
