use std::fmt;

use ocs_quantize::Palette;
use serde::Serialize;

use super::history::History;
use super::layer::{Layer, LayerContent, LayerId, LayerInfo, NewLayer};
use super::pixel_buffer::PixelBuffer;
use crate::error::HostError;
use crate::services::host::{LayerStack, SelectionService, TransactionService};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorMode {
    FullColor,
    Indexed,
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorMode::FullColor => f.write_str("full color"),
            ColorMode::Indexed => f.write_str("indexed"),
        }
    }
}

/// Axis-aligned rectangle in layer or canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Everything an undo step restores.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ImageState {
    mode: ColorMode,
    palette: Option<Palette>,
    layers: Vec<Layer>,
    next_id: u32,
    selection: Option<Rect>,
}

/// In-memory image: a layer stack with color mode, selection and undo
/// history.
#[derive(Debug, Clone)]
pub struct Image {
    width: u32,
    height: u32,
    state: ImageState,
    damage: Vec<Rect>,
    history: History<ImageState>,
}

impl Image {
    /// Empty full-color canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            state: ImageState {
                mode: ColorMode::FullColor,
                palette: None,
                layers: Vec::new(),
                next_id: 1,
                selection: None,
            },
            damage: Vec::new(),
            history: History::new(),
        }
    }

    /// Canvas the size of `buffer` with `buffer` as its only layer.
    pub fn from_buffer(name: impl Into<String>, buffer: PixelBuffer) -> Self {
        let mut image = Self::new(buffer.width(), buffer.height());
        let id = image.allocate_id();
        image.state.layers.push(Layer::from_buffer(id, name, buffer));
        image
    }

    /// Append a direct-color layer below the existing ones.
    pub fn add_layer(
        &mut self,
        name: impl Into<String>,
        buffer: PixelBuffer,
    ) -> Result<LayerId, HostError> {
        self.require_mode(ColorMode::FullColor)?;
        let id = self.allocate_id();
        self.state.layers.push(Layer::from_buffer(id, name, buffer));
        Ok(id)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn color_mode(&self) -> ColorMode {
        self.state.mode
    }

    /// Palette while the image is indexed.
    pub fn palette(&self) -> Option<&Palette> {
        self.state.palette.as_ref()
    }

    /// Layers, top first.
    pub fn layers(&self) -> &[Layer] {
        &self.state.layers
    }

    pub fn layer_ids(&self) -> Vec<LayerId> {
        self.state.layers.iter().map(|l| l.id).collect()
    }

    pub fn find_layer(&self, id: LayerId) -> Option<&Layer> {
        self.state.layers.iter().find(|l| l.id == id)
    }

    pub fn top_layer(&self) -> Option<&Layer> {
        self.state.layers.first()
    }

    pub fn selection(&self) -> Option<Rect> {
        self.state.selection
    }

    pub fn set_selection(&mut self, selection: Option<Rect>) {
        self.state.selection = selection;
    }

    /// Damage recorded by commits since the last call.
    pub fn take_damage(&mut self) -> Vec<Rect> {
        std::mem::take(&mut self.damage)
    }

    /// Restore the state before the most recent undo step. Returns false
    /// when there is nothing to undo.
    pub fn undo(&mut self) -> Result<bool, HostError> {
        match self.history.undo()? {
            Some(state) => {
                self.restore(state);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn redo(&mut self) -> Result<bool, HostError> {
        match self.history.redo()? {
            Some(state) => {
                self.restore(state);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn undo_count(&self) -> usize {
        self.history.undo_count()
    }

    pub fn redo_count(&self) -> usize {
        self.history.redo_count()
    }

    pub fn history_labels(&self) -> Vec<&str> {
        self.history.labels()
    }

    pub(crate) fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.state.layers
    }

    /// Switch color mode. The palette is kept only in indexed mode.
    pub(crate) fn set_color_mode(&mut self, mode: ColorMode, palette: Option<Palette>) {
        self.state.mode = mode;
        self.state.palette = match mode {
            ColorMode::Indexed => palette,
            ColorMode::FullColor => None,
        };
    }

    fn require_mode(&self, expected: ColorMode) -> Result<(), HostError> {
        if self.state.mode == expected {
            Ok(())
        } else {
            Err(HostError::WrongColorMode {
                expected,
                actual: self.state.mode,
            })
        }
    }

    fn allocate_id(&mut self) -> LayerId {
        let id = LayerId(self.state.next_id);
        self.state.next_id += 1;
        id
    }

    fn position(&self, id: LayerId) -> Result<usize, HostError> {
        self.state
            .layers
            .iter()
            .position(|l| l.id == id)
            .ok_or(HostError::LayerNotFound(id))
    }

    fn restore(&mut self, state: ImageState) {
        self.state = state;
        self.damage.push(Rect::new(0, 0, self.width, self.height));
    }
}

impl LayerStack for Image {
    fn layer(&self, id: LayerId) -> Result<LayerInfo, HostError> {
        self.find_layer(id)
            .map(Layer::info)
            .ok_or(HostError::LayerNotFound(id))
    }

    fn read_region(&self, id: LayerId) -> Result<PixelBuffer, HostError> {
        let layer = self.find_layer(id).ok_or(HostError::LayerNotFound(id))?;
        layer.buffer().cloned().ok_or(HostError::WrongColorMode {
            expected: ColorMode::FullColor,
            actual: self.state.mode,
        })
    }

    fn insert_layer(&mut self, layer: NewLayer, position: usize) -> Result<LayerId, HostError> {
        let pixels = layer.width as usize * layer.height as usize;
        let content = match self.state.mode {
            ColorMode::FullColor => {
                LayerContent::Direct(PixelBuffer::new(layer.width, layer.height, layer.format))
            }
            ColorMode::Indexed => LayerContent::Indexed {
                indices: vec![0; pixels],
                alpha: layer.format.has_alpha().then(|| vec![0; pixels]),
            },
        };

        let id = self.allocate_id();
        let position = position.min(self.state.layers.len());
        self.state
            .layers
            .insert(position, Layer::with_content(id, layer, content));
        tracing::debug!(layer = %id, position, "Inserted layer");
        Ok(id)
    }

    fn write_region(&mut self, id: LayerId, buffer: PixelBuffer) -> Result<(), HostError> {
        self.require_mode(ColorMode::FullColor)?;
        let idx = self.position(id)?;
        let layer = &mut self.state.layers[idx];

        if buffer.width() != layer.width()
            || buffer.height() != layer.height()
            || buffer.format() != layer.format()
        {
            return Err(HostError::RegionMismatch {
                layer: id,
                width: layer.width(),
                height: layer.height(),
                actual_width: buffer.width(),
                actual_height: buffer.height(),
            });
        }

        layer.set_shadow(buffer);
        Ok(())
    }

    fn commit(&mut self, id: LayerId) -> Result<(), HostError> {
        let idx = self.position(id)?;
        let layer = &mut self.state.layers[idx];
        let shadow = layer.take_shadow().ok_or(HostError::NothingToCommit(id))?;
        layer.set_content(LayerContent::Direct(shadow));

        let damage = Rect::new(0, 0, layer.width(), layer.height());
        self.damage.push(damage);
        tracing::debug!(layer = %id, width = damage.width, height = damage.height, "Committed region");
        Ok(())
    }

    fn remove_layer(&mut self, id: LayerId) -> Result<(), HostError> {
        let idx = self.position(id)?;
        if self.state.layers.len() == 1 {
            return Err(HostError::LastLayer);
        }
        self.state.layers.remove(idx);
        tracing::debug!(layer = %id, "Removed layer");
        Ok(())
    }
}

impl SelectionService for Image {
    fn clear_selection(&mut self) -> Result<(), HostError> {
        self.state.selection = None;
        Ok(())
    }
}

impl TransactionService for Image {
    fn begin_undo_group(&mut self, label: &str) -> Result<(), HostError> {
        self.history.begin(label, &self.state);
        Ok(())
    }

    fn end_undo_group(&mut self) -> Result<(), HostError> {
        self.history.end(&self.state)
    }

    fn abort_undo_group(&mut self) -> Result<(), HostError> {
        let before = self.history.abort()?;
        self.restore(before);
        Ok(())
    }
}
