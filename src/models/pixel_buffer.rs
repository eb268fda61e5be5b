use ocs_quantize::Rgb;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Sample layout of one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub fn from_channels(channels: usize) -> Result<Self, PipelineError> {
        match channels {
            3 => Ok(PixelFormat::Rgb),
            4 => Ok(PixelFormat::Rgba),
            n => Err(PipelineError::UnsupportedChannelCount(n)),
        }
    }

    /// Samples per pixel.
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }

    pub fn has_alpha(self) -> bool {
        self == PixelFormat::Rgba
    }
}

/// Row-major interleaved 8-bit samples.
///
/// Pixel `(x, y)` starts at sample `(x + width * y) * channels`. The sample
/// vector always holds exactly `width * height * channels` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    samples: Vec<u8>,
}

impl PixelBuffer {
    /// Zero-filled buffer.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let len = width as usize * height as usize * format.channels();
        Self {
            width,
            height,
            format,
            samples: vec![0; len],
        }
    }

    pub fn from_samples(
        width: u32,
        height: u32,
        format: PixelFormat,
        samples: Vec<u8>,
    ) -> Result<Self, PipelineError> {
        let expected = width as usize * height as usize * format.channels();
        if samples.len() != expected {
            return Err(PipelineError::FormatMismatch {
                width,
                height,
                channels: format.channels(),
                actual: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            samples,
        })
    }

    /// Build a buffer from RGB colors and optional per-pixel alpha.
    pub fn from_rgb(
        width: u32,
        height: u32,
        colors: &[Rgb],
        alpha: Option<&[u8]>,
    ) -> Result<Self, PipelineError> {
        let format = if alpha.is_some() {
            PixelFormat::Rgba
        } else {
            PixelFormat::Rgb
        };
        let mut samples = Vec::with_capacity(colors.len() * format.channels());
        match alpha {
            Some(alpha) => {
                if alpha.len() != colors.len() {
                    return Err(PipelineError::FormatMismatch {
                        width,
                        height,
                        channels: 4,
                        actual: alpha.len() * 4,
                    });
                }
                for (color, &a) in colors.iter().zip(alpha) {
                    samples.extend_from_slice(color);
                    samples.push(a);
                }
            }
            None => colors.iter().for_each(|c| samples.extend_from_slice(c)),
        }
        Self::from_samples(width, height, format, samples)
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
    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    #[inline]
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((x as usize + self.width as usize * y as usize) * self.channels())
    }

    /// Samples of pixel `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        let start = self.offset(x, y)?;
        self.samples.get(start..start + self.channels())
    }

    pub fn pixel_mut(&mut self, x: u32, y: u32) -> Option<&mut [u8]> {
        let start = self.offset(x, y)?;
        let channels = self.channels();
        self.samples.get_mut(start..start + channels)
    }

    /// Color part of every pixel in row-major order.
    pub fn rgb_pixels(&self) -> Vec<Rgb> {
        self.samples
            .chunks_exact(self.channels())
            .map(|px| [px[0], px[1], px[2]])
            .collect()
    }

    /// Alpha plane for RGBA buffers.
    pub fn alpha(&self) -> Option<Vec<u8>> {
        self.format
            .has_alpha()
            .then(|| self.samples.chunks_exact(4).map(|px| px[3]).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let buffer = PixelBuffer::new(3, 2, PixelFormat::Rgba);
        assert_eq!(buffer.samples().len(), 24);
        assert!(buffer.samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn test_from_samples_rejects_wrong_length() {
        let err = PixelBuffer::from_samples(2, 2, PixelFormat::Rgb, vec![0; 11]).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::FormatMismatch {
                channels: 3,
                actual: 11,
                ..
            }
        ));
    }

    #[test]
    fn test_pixel_addressing() {
        let samples = (0..18).collect();
        let buffer = PixelBuffer::from_samples(3, 2, PixelFormat::Rgb, samples).unwrap();

        assert_eq!(buffer.pixel(0, 0), Some(&[0, 1, 2][..]));
        assert_eq!(buffer.pixel(2, 0), Some(&[6, 7, 8][..]));
        assert_eq!(buffer.pixel(1, 1), Some(&[12, 13, 14][..]));
        assert_eq!(buffer.pixel(3, 0), None);
        assert_eq!(buffer.pixel(0, 2), None);
    }

    #[test]
    fn test_pixel_mut() {
        let mut buffer = PixelBuffer::new(2, 2, PixelFormat::Rgba);
        buffer
            .pixel_mut(1, 1)
            .unwrap()
            .copy_from_slice(&[1, 2, 3, 4]);
        assert_eq!(&buffer.samples()[12..], &[1, 2, 3, 4]);
        assert!(buffer.pixel_mut(2, 1).is_none());
    }

    #[test]
    fn test_from_channels() {
        assert_eq!(PixelFormat::from_channels(3).unwrap(), PixelFormat::Rgb);
        assert_eq!(PixelFormat::from_channels(4).unwrap(), PixelFormat::Rgba);
        assert!(matches!(
            PixelFormat::from_channels(2),
            Err(PipelineError::UnsupportedChannelCount(2))
        ));
    }

    #[test]
    fn test_rgb_and_alpha_planes() {
        let buffer =
            PixelBuffer::from_rgb(2, 1, &[[1, 2, 3], [4, 5, 6]], Some(&[7, 8])).unwrap();
        assert_eq!(buffer.samples(), &[1, 2, 3, 7, 4, 5, 6, 8]);
        assert_eq!(buffer.rgb_pixels(), vec![[1, 2, 3], [4, 5, 6]]);
        assert_eq!(buffer.alpha(), Some(vec![7, 8]));

        let opaque = PixelBuffer::from_rgb(1, 1, &[[9, 9, 9]], None).unwrap();
        assert_eq!(opaque.format(), PixelFormat::Rgb);
        assert_eq!(opaque.alpha(), None);
    }
}
