pub mod config;
pub mod history;
pub mod image;
pub mod layer;
pub mod params;
pub mod pixel_buffer;

pub use config::{AppConfig, CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE};
pub use history::History;
pub use image::{ColorMode, Image, Rect};
pub use layer::{CompositeMode, Layer, LayerContent, LayerId, LayerInfo, NewLayer};
pub use params::{Bitplanes, DitherMode, EdgePolicy, PipelineParams, DEFAULT_LAYER_PREFIX};
pub use pixel_buffer::{PixelBuffer, PixelFormat};
