//! PNG reading and writing for [`Image`].
//!
//! Indexed images without alpha are written as palette PNGs, packed to the
//! smallest bit depth that holds the palette. Everything else is written as
//! 8-bit RGB or RGBA.

use std::io::Cursor;
use std::path::Path;

use ocs_quantize::Palette;

use crate::error::ImageIoError;
use crate::models::{ColorMode, Image, Layer, LayerContent, PixelBuffer, PixelFormat};

/// Decode PNG bytes into a single-layer full-color image.
///
/// Grayscale, palette and 16-bit inputs are expanded to 8-bit RGB(A).
pub fn decode_png(data: &[u8], layer_name: &str) -> Result<Image, ImageIoError> {
    let mut decoder = png::Decoder::new(Cursor::new(data));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| ImageIoError::Decode(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| ImageIoError::Decode(e.to_string()))?;
    buf.truncate(info.buffer_size());

    let (format, samples) = match info.color_type {
        png::ColorType::Rgb => (PixelFormat::Rgb, buf),
        png::ColorType::Rgba => (PixelFormat::Rgba, buf),
        png::ColorType::Grayscale => (
            PixelFormat::Rgb,
            buf.iter().flat_map(|&v| [v, v, v]).collect(),
        ),
        png::ColorType::GrayscaleAlpha => (
            PixelFormat::Rgba,
            buf.chunks_exact(2)
                .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
                .collect(),
        ),
        other => return Err(ImageIoError::UnsupportedColorType(format!("{other:?}"))),
    };

    let buffer = PixelBuffer::from_samples(info.width, info.height, format, samples)
        .map_err(|e| ImageIoError::Decode(e.to_string()))?;
    tracing::debug!(
        width = info.width,
        height = info.height,
        format = ?format,
        "Decoded PNG"
    );
    Ok(Image::from_buffer(layer_name, buffer))
}

/// Read a PNG file; the layer is named after the file stem.
pub fn read_png(path: &Path) -> Result<Image, ImageIoError> {
    let data = std::fs::read(path)?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Background".to_string());
    decode_png(&data, &name)
}

/// Encode the top layer of `image`.
///
/// With `optimize` set the result is re-compressed with oxipng; if that
/// fails the plain encoding is returned.
pub fn encode_png(image: &Image, optimize: bool) -> Result<Vec<u8>, ImageIoError> {
    let layer = image.top_layer().ok_or(ImageIoError::NoLayers)?;
    if layer.width() == 0 || layer.height() == 0 {
        return Err(ImageIoError::Encode(format!(
            "cannot encode an empty {}x{} layer",
            layer.width(),
            layer.height()
        )));
    }
    if image.layers().len() > 1 {
        tracing::debug!(
            layers = image.layers().len(),
            "Writing top layer only"
        );
    }

    let png_bytes = match (layer.content(), image.color_mode(), image.palette()) {
        (LayerContent::Indexed { indices, alpha: None }, ColorMode::Indexed, Some(palette)) => {
            encode_indexed(layer, indices, palette)?
        }
        (LayerContent::Indexed { indices, alpha }, _, Some(palette)) => {
            let buffer = expand_indexed(layer, indices, alpha.as_deref(), palette)?;
            encode_direct(&buffer)?
        }
        (LayerContent::Direct(buffer), _, _) => encode_direct(buffer)?,
        (LayerContent::Indexed { .. }, _, None) => {
            return Err(ImageIoError::Encode(
                "indexed layer without a palette".to_string(),
            ))
        }
    };

    if !optimize {
        return Ok(png_bytes);
    }

    // Re-compress with oxipng (zopfli + adaptive filter selection)
    match oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    ) {
        Ok(optimized) => Ok(optimized),
        Err(e) => {
            tracing::warn!(%e, "PNG optimization failed, writing unoptimized");
            Ok(png_bytes)
        }
    }
}

pub fn write_png(image: &Image, path: &Path, optimize: bool) -> Result<(), ImageIoError> {
    let bytes = encode_png(image, optimize)?;
    std::fs::write(path, &bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "Wrote PNG");
    Ok(())
}

fn encode_indexed(layer: &Layer, indices: &[u8], palette: &Palette) -> Result<Vec<u8>, ImageIoError> {
    let bits = palette_bit_depth(palette.len());
    let plte: Vec<u8> = palette.colors().iter().flatten().copied().collect();
    let packed = if bits == 8 {
        indices.to_vec()
    } else {
        pack_nbits(indices, layer.width(), bits)
    };
    let depth = match bits {
        1 => png::BitDepth::One,
        2 => png::BitDepth::Two,
        4 => png::BitDepth::Four,
        _ => png::BitDepth::Eight,
    };
    encode(
        layer.width(),
        layer.height(),
        png::ColorType::Indexed,
        depth,
        Some(plte.as_slice()),
        &packed,
    )
}

fn encode_direct(buffer: &PixelBuffer) -> Result<Vec<u8>, ImageIoError> {
    let color_type = match buffer.format() {
        PixelFormat::Rgb => png::ColorType::Rgb,
        PixelFormat::Rgba => png::ColorType::Rgba,
    };
    encode(
        buffer.width(),
        buffer.height(),
        color_type,
        png::BitDepth::Eight,
        None,
        buffer.samples(),
    )
}

fn expand_indexed(
    layer: &Layer,
    indices: &[u8],
    alpha: Option<&[u8]>,
    palette: &Palette,
) -> Result<PixelBuffer, ImageIoError> {
    let colors: Vec<_> = indices
        .iter()
        .map(|&i| {
            palette.colors().get(i as usize).copied().ok_or_else(|| {
                ImageIoError::Encode(format!(
                    "palette index {i} out of range for {} colors",
                    palette.len()
                ))
            })
        })
        .collect::<Result<_, _>>()?;
    PixelBuffer::from_rgb(layer.width(), layer.height(), &colors, alpha)
        .map_err(|e| ImageIoError::Encode(e.to_string()))
}

fn encode(
    width: u32,
    height: u32,
    color_type: png::ColorType,
    bit_depth: png::BitDepth,
    plte: Option<&[u8]>,
    data: &[u8],
) -> Result<Vec<u8>, ImageIoError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(color_type);
        encoder.set_depth(bit_depth);
        encoder.set_compression(png::Compression::Fast);
        if let Some(plte) = plte {
            encoder.set_palette(plte);
        }
        let mut writer = encoder
            .write_header()
            .map_err(|e| ImageIoError::Encode(e.to_string()))?;
        writer
            .write_image_data(data)
            .map_err(|e| ImageIoError::Encode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Smallest PNG palette bit depth addressing `colors` entries.
fn palette_bit_depth(colors: usize) -> u8 {
    match colors {
        0..=2 => 1,
        3..=4 => 2,
        5..=16 => 4,
        _ => 8,
    }
}

/// Pack pixel values into N-bit PNG row data (1, 2, or 4 bits per pixel).
fn pack_nbits(indices: &[u8], width: u32, bits: u8) -> Vec<u8> {
    let pixels_per_byte = 8 / bits as usize;
    let bytes_per_row = (width as usize).div_ceil(pixels_per_byte);
    let height = indices.len() / width as usize;
    let mask = (1u8 << bits) - 1;
    let mut packed = Vec::with_capacity(bytes_per_row * height);

    for row in indices.chunks(width as usize) {
        let mut byte = 0u8;
        for (i, &idx) in row.iter().enumerate() {
            let shift = (8 - bits) - (i % pixels_per_byte) as u8 * bits;
            byte |= (idx & mask) << shift;

            if (i % pixels_per_byte) == pixels_per_byte - 1 || i == row.len() - 1 {
                packed.push(byte);
                byte = 0;
            }
        }
    }

    packed
}
