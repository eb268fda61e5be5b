//! Host wrapper that fails on demand, and a quantizer that records calls.

use ocs_palette::error::HostError;
use ocs_palette::models::{DitherMode, Image, LayerId, LayerInfo, NewLayer, PixelBuffer};
use ocs_palette::services::{
    LayerStack, ModeConverter, PaletteQuantizer, Quantizer, SelectionService, TransactionService,
};

/// Host operation that [`FlakyHost`] refuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    InsertLayer,
    WriteRegion,
    Commit,
    RemoveLayer,
    ClearSelection,
    EndUndo,
}

/// An [`Image`] whose operations fail at a chosen point.
pub struct FlakyHost {
    pub image: Image,
    pub fail: Option<FailPoint>,
}

impl FlakyHost {
    pub fn new(image: Image, fail: FailPoint) -> Self {
        Self {
            image,
            fail: Some(fail),
        }
    }

    fn check(&self, point: FailPoint) -> Result<(), HostError> {
        if self.fail == Some(point) {
            Err(HostError::Internal(format!("injected failure at {point:?}")))
        } else {
            Ok(())
        }
    }
}

impl LayerStack for FlakyHost {
    fn layer(&self, id: LayerId) -> Result<LayerInfo, HostError> {
        self.image.layer(id)
    }

    fn read_region(&self, id: LayerId) -> Result<PixelBuffer, HostError> {
        self.image.read_region(id)
    }

    fn insert_layer(&mut self, layer: NewLayer, position: usize) -> Result<LayerId, HostError> {
        self.check(FailPoint::InsertLayer)?;
        self.image.insert_layer(layer, position)
    }

    fn write_region(&mut self, id: LayerId, buffer: PixelBuffer) -> Result<(), HostError> {
        self.check(FailPoint::WriteRegion)?;
        self.image.write_region(id, buffer)
    }

    fn commit(&mut self, id: LayerId) -> Result<(), HostError> {
        self.check(FailPoint::Commit)?;
        self.image.commit(id)
    }

    fn remove_layer(&mut self, id: LayerId) -> Result<(), HostError> {
        self.check(FailPoint::RemoveLayer)?;
        self.image.remove_layer(id)
    }
}

impl SelectionService for FlakyHost {
    fn clear_selection(&mut self) -> Result<(), HostError> {
        self.check(FailPoint::ClearSelection)?;
        self.image.clear_selection()
    }
}

impl TransactionService for FlakyHost {
    fn begin_undo_group(&mut self, label: &str) -> Result<(), HostError> {
        self.image.begin_undo_group(label)
    }

    fn end_undo_group(&mut self) -> Result<(), HostError> {
        self.check(FailPoint::EndUndo)?;
        self.image.end_undo_group()
    }

    fn abort_undo_group(&mut self) -> Result<(), HostError> {
        self.image.abort_undo_group()
    }
}

/// Wraps [`PaletteQuantizer`], recording every reduction request.
///
/// With `fail_on_call` set, that reduction (0-based) fails after the
/// earlier ones went through.
#[derive(Debug, Default)]
pub struct RecordingQuantizer {
    inner: PaletteQuantizer,
    pub calls: Vec<(DitherMode, usize)>,
    pub expansions: usize,
    pub fail_on_call: Option<usize>,
}

impl RecordingQuantizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(call: usize) -> Self {
        Self {
            fail_on_call: Some(call),
            ..Self::default()
        }
    }

    fn record(&mut self, dither: DitherMode, max_colors: usize) -> Result<(), HostError> {
        let call = self.calls.len();
        self.calls.push((dither, max_colors));
        if self.fail_on_call == Some(call) {
            return Err(HostError::Internal(format!("injected quantizer failure on call {call}")));
        }
        Ok(())
    }
}

impl Quantizer<Image> for RecordingQuantizer {
    fn reduce_to_palette(
        &mut self,
        image: &mut Image,
        dither: DitherMode,
        max_colors: usize,
    ) -> Result<(), HostError> {
        self.record(dither, max_colors)?;
        self.inner.reduce_to_palette(image, dither, max_colors)
    }
}

impl ModeConverter<Image> for RecordingQuantizer {
    fn to_full_color(&mut self, image: &mut Image) -> Result<(), HostError> {
        self.expansions += 1;
        self.inner.to_full_color(image)
    }
}

impl Quantizer<FlakyHost> for RecordingQuantizer {
    fn reduce_to_palette(
        &mut self,
        host: &mut FlakyHost,
        dither: DitherMode,
        max_colors: usize,
    ) -> Result<(), HostError> {
        Quantizer::<Image>::reduce_to_palette(self, &mut host.image, dither, max_colors)
    }
}

impl ModeConverter<FlakyHost> for RecordingQuantizer {
    fn to_full_color(&mut self, host: &mut FlakyHost) -> Result<(), HostError> {
        ModeConverter::<Image>::to_full_color(self, &mut host.image)
    }
}
