//! Contracts between the palette pipeline and the image it works on.
//!
//! The pipeline is generic over the host image type `I`. The in-memory
//! [`Image`](crate::models::Image) implements the stack, selection and
//! transaction traits; [`PaletteQuantizer`](super::PaletteQuantizer)
//! implements the quantizer and mode converter for it.

use crate::error::HostError;
use crate::models::{DitherMode, LayerId, LayerInfo, NewLayer, PixelBuffer};

/// Indexed color reduction.
pub trait Quantizer<I: ?Sized> {
    /// Reduce `image` to at most `max_colors` colors and switch it to
    /// indexed mode. Must accept every [`DitherMode`] and budgets up to 32.
    fn reduce_to_palette(
        &mut self,
        image: &mut I,
        dither: DitherMode,
        max_colors: usize,
    ) -> Result<(), HostError>;
}

/// Conversion from indexed back to full per-channel color.
pub trait ModeConverter<I: ?Sized> {
    fn to_full_color(&mut self, image: &mut I) -> Result<(), HostError>;
}

pub trait SelectionService {
    fn clear_selection(&mut self) -> Result<(), HostError>;
}

/// Undo grouping. Everything between begin and end is one undo step;
/// abort restores the state captured at begin.
pub trait TransactionService {
    fn begin_undo_group(&mut self, label: &str) -> Result<(), HostError>;
    fn end_undo_group(&mut self) -> Result<(), HostError>;
    fn abort_undo_group(&mut self) -> Result<(), HostError>;
}

/// Ordered layers, index 0 on top.
pub trait LayerStack {
    fn layer(&self, id: LayerId) -> Result<LayerInfo, HostError>;

    /// Copy of the full direct-color content of a layer.
    fn read_region(&self, id: LayerId) -> Result<PixelBuffer, HostError>;

    /// Insert a zero-filled layer at `position` and return its id.
    fn insert_layer(&mut self, layer: NewLayer, position: usize) -> Result<LayerId, HostError>;

    /// Stage `buffer` as the layer's pending shadow content.
    fn write_region(&mut self, id: LayerId, buffer: PixelBuffer) -> Result<(), HostError>;

    /// Flush the shadow into the layer and record damage over its extent.
    fn commit(&mut self, id: LayerId) -> Result<(), HostError>;

    fn remove_layer(&mut self, id: LayerId) -> Result<(), HostError>;
}
