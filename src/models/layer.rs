use std::fmt;

use serde::{Deserialize, Serialize};

use super::pixel_buffer::{PixelBuffer, PixelFormat};

/// Layer identifier, unique within one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub u32);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a layer blends with the layers below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompositeMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Addition,
    Difference,
}

/// Pixel data of a layer.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerContent {
    /// Full per-channel color.
    Direct(PixelBuffer),
    /// One palette index per pixel; RGBA layers keep their alpha plane.
    Indexed {
        indices: Vec<u8>,
        alpha: Option<Vec<u8>>,
    },
}

/// Layer properties without pixel data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerInfo {
    pub id: LayerId,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    /// 0.0..=100.0
    pub opacity: f32,
    pub mode: CompositeMode,
    pub visible: bool,
    pub offset: (i32, i32),
}

/// Properties for a layer about to be inserted into a stack.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLayer {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub opacity: f32,
    pub mode: CompositeMode,
    pub visible: bool,
    pub offset: (i32, i32),
}

impl NewLayer {
    /// Visible, fully opaque layer at the canvas origin.
    pub fn new(name: impl Into<String>, width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            format,
            opacity: 100.0,
            mode: CompositeMode::Normal,
            visible: true,
            offset: (0, 0),
        }
    }

    /// Same geometry and appearance as `source`, under a new name.
    pub fn derived_from(source: &LayerInfo, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            width: source.width,
            height: source.height,
            format: source.format,
            opacity: source.opacity,
            mode: source.mode,
            visible: source.visible,
            offset: source.offset,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub opacity: f32,
    pub mode: CompositeMode,
    pub visible: bool,
    pub offset: (i32, i32),
    width: u32,
    height: u32,
    format: PixelFormat,
    content: LayerContent,
    shadow: Option<PixelBuffer>,
}

impl Layer {
    /// Layer holding `buffer` as direct color content.
    pub fn from_buffer(id: LayerId, name: impl Into<String>, buffer: PixelBuffer) -> Self {
        let props = NewLayer::new(name, buffer.width(), buffer.height(), buffer.format());
        Self::with_content(id, props, LayerContent::Direct(buffer))
    }

    /// Layer described by `props` with the given content.
    pub(crate) fn with_content(id: LayerId, props: NewLayer, content: LayerContent) -> Self {
        Self {
            id,
            name: props.name,
            opacity: props.opacity,
            mode: props.mode,
            visible: props.visible,
            offset: props.offset,
            width: props.width,
            height: props.height,
            format: props.format,
            content,
            shadow: None,
        }
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
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    #[inline]
    pub fn content(&self) -> &LayerContent {
        &self.content
    }

    /// Direct color buffer, `None` while the layer is indexed.
    pub fn buffer(&self) -> Option<&PixelBuffer> {
        match &self.content {
            LayerContent::Direct(buffer) => Some(buffer),
            LayerContent::Indexed { .. } => None,
        }
    }

    pub fn has_pending_shadow(&self) -> bool {
        self.shadow.is_some()
    }

    pub fn info(&self) -> LayerInfo {
        LayerInfo {
            id: self.id,
            name: self.name.clone(),
            width: self.width,
            height: self.height,
            format: self.format,
            opacity: self.opacity,
            mode: self.mode,
            visible: self.visible,
            offset: self.offset,
        }
    }

    pub(crate) fn set_content(&mut self, content: LayerContent) {
        self.content = content;
    }

    pub(crate) fn set_shadow(&mut self, buffer: PixelBuffer) {
        self.shadow = Some(buffer);
    }

    pub(crate) fn take_shadow(&mut self) -> Option<PixelBuffer> {
        self.shadow.take()
    }
}
