use ocs_quantize::{DitherAlgorithm, Palette, Quantizer as PaletteBuilder, Rgb};

use super::host::{ModeConverter, Quantizer};
use crate::error::HostError;
use crate::models::{ColorMode, DitherMode, Image, Layer, LayerContent, PixelBuffer};

impl From<DitherMode> for DitherAlgorithm {
    fn from(mode: DitherMode) -> Self {
        match mode {
            DitherMode::None => DitherAlgorithm::None,
            DitherMode::FloydSteinbergNormal => DitherAlgorithm::FloydSteinberg,
            DitherMode::FloydSteinbergReducedBleed => DitherAlgorithm::FloydSteinbergReducedBleed,
            DitherMode::Positioned => DitherAlgorithm::Positioned,
        }
    }
}

/// Indexed conversion for [`Image`], backed by `ocs-quantize`.
///
/// One palette is shared by all layers. Fully transparent pixels do not
/// contribute to the palette; alpha itself is carried through unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct PaletteQuantizer;

impl PaletteQuantizer {
    pub fn new() -> Self {
        Self
    }
}

impl Quantizer<Image> for PaletteQuantizer {
    fn reduce_to_palette(
        &mut self,
        image: &mut Image,
        dither: DitherMode,
        max_colors: usize,
    ) -> Result<(), HostError> {
        if image.color_mode() == ColorMode::Indexed {
            self.to_full_color(image)?;
        }

        let builder = PaletteBuilder::new(max_colors).algorithm(dither.into());
        let samples: Vec<Rgb> = image
            .layers()
            .iter()
            .filter_map(Layer::buffer)
            .flat_map(visible_colors)
            .collect();

        let palette = if samples.is_empty() {
            // Nothing opaque to sample; validate the budget and fall back to black.
            builder.build_palette(&[[0, 0, 0]])?
        } else {
            builder.build_palette(&samples)?
        };

        for layer in image.layers_mut() {
            let Some(buffer) = layer.buffer() else {
                continue;
            };
            let (width, height) = (buffer.width() as usize, buffer.height() as usize);
            let alpha = buffer.alpha();
            let indexed = builder.remap(&buffer.rgb_pixels(), width, height, &palette)?;
            let (indices, _) = indexed.into_parts();
            layer.set_content(LayerContent::Indexed { indices, alpha });
        }

        tracing::debug!(
            dither = %dither,
            max_colors,
            colors = palette.len(),
            "Reduced image to palette"
        );
        image.set_color_mode(ColorMode::Indexed, Some(palette));
        Ok(())
    }
}

impl ModeConverter<Image> for PaletteQuantizer {
    fn to_full_color(&mut self, image: &mut Image) -> Result<(), HostError> {
        if image.color_mode() == ColorMode::FullColor {
            return Ok(());
        }
        let palette = image.palette().cloned().ok_or_else(|| {
            HostError::Internal("indexed image has no palette".to_string())
        })?;

        for layer in image.layers_mut() {
            let (width, height) = (layer.width(), layer.height());
            let LayerContent::Indexed { indices, alpha } = layer.content() else {
                continue;
            };
            let buffer = expand(&palette, indices, alpha.as_deref(), width, height)?;
            layer.set_content(LayerContent::Direct(buffer));
        }

        image.set_color_mode(ColorMode::FullColor, None);
        tracing::debug!("Converted image to full color");
        Ok(())
    }
}

/// Colors of pixels that are not fully transparent.
fn visible_colors(buffer: &PixelBuffer) -> Vec<Rgb> {
    match buffer.alpha() {
        Some(alpha) => buffer
            .rgb_pixels()
            .into_iter()
            .zip(alpha)
            .filter(|&(_, a)| a > 0)
            .map(|(c, _)| c)
            .collect(),
        None => buffer.rgb_pixels(),
    }
}

fn expand(
    palette: &Palette,
    indices: &[u8],
    alpha: Option<&[u8]>,
    width: u32,
    height: u32,
) -> Result<PixelBuffer, HostError> {
    let colors: Vec<Rgb> = indices
        .iter()
        .map(|&i| {
            palette
                .colors()
                .get(i as usize)
                .copied()
                .ok_or_else(|| HostError::Internal(format!("palette index {i} out of range")))
        })
        .collect::<Result<_, _>>()?;

    PixelBuffer::from_rgb(width, height, &colors, alpha)
        .map_err(|e| HostError::Internal(e.to_string()))
}
