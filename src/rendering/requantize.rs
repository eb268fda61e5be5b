//! Channel requantization to 16 levels per channel.
//!
//! Every color sample is rounded to the nearest multiple of 16 and clamped to
//! 255, which maps 8-bit channels onto the 4-bit-per-gun range of the OCS
//! palette registers. Alpha is copied unchanged.

use crate::error::{PipelineError, Stage};
use crate::models::{EdgePolicy, PixelBuffer, PixelFormat};
use crate::services::progress::ProgressSink;

/// Round one channel value to the nearest multiple of 16, clamped to 255.
///
/// ```
/// use ocs_palette::rendering::requantize_channel;
///
/// assert_eq!(requantize_channel(7), 0);
/// assert_eq!(requantize_channel(8), 16);
/// assert_eq!(requantize_channel(247), 240);
/// assert_eq!(requantize_channel(248), 255);
/// ```
#[inline]
pub const fn requantize_channel(v: u8) -> u8 {
    let q = (v as u16 + 8) / 16 * 16;
    if q > 255 {
        255
    } else {
        q as u8
    }
}

/// Requantize raw interleaved samples into a fresh zero-filled buffer.
///
/// Iterates column-major (`x` outer, `y` inner). Columns outside the edge
/// policy keep their zero fill. Progress is reported as `x / width` at most
/// once per percentage point and finally as 1.0; cancellation is checked at
/// each report.
pub fn requantize_samples<P: ProgressSink + ?Sized>(
    samples: &[u8],
    width: u32,
    height: u32,
    channels: usize,
    policy: EdgePolicy,
    progress: &mut P,
) -> Result<Vec<u8>, PipelineError> {
    if width == 0 || height == 0 {
        return Err(PipelineError::InvalidDimensions { width, height });
    }
    let format = PixelFormat::from_channels(channels)?;
    let stride = format.channels();
    let expected = width as usize * height as usize * stride;
    if samples.len() != expected {
        return Err(PipelineError::FormatMismatch {
            width,
            height,
            channels,
            actual: samples.len(),
        });
    }

    let mut out = vec![0u8; expected];
    let columns = policy.processed_columns(width);
    let mut last_percent = None;

    for x in 0..columns {
        let percent = (x as u64 * 100 / width as u64) as u32;
        if last_percent != Some(percent) {
            last_percent = Some(percent);
            progress.report(x as f64 / width as f64);
            if progress.is_cancelled() {
                return Err(PipelineError::Cancelled {
                    stage: Stage::Requantize,
                });
            }
        }

        for y in 0..height {
            let i = (x as usize + width as usize * y as usize) * stride;
            let src = &samples[i..i + stride];
            let dst = &mut out[i..i + stride];
            for c in 0..3 {
                dst[c] = requantize_channel(src[c]);
            }
            if stride == 4 {
                dst[3] = src[3];
            }
        }
    }

    progress.report(1.0);
    Ok(out)
}

/// Requantize a [`PixelBuffer`] into a new buffer of the same shape.
pub fn requantize_buffer<P: ProgressSink + ?Sized>(
    source: &PixelBuffer,
    policy: EdgePolicy,
    progress: &mut P,
) -> Result<PixelBuffer, PipelineError> {
    let samples = requantize_samples(
        source.samples(),
        source.width(),
        source.height(),
        source.channels(),
        policy,
        progress,
    )?;
    PixelBuffer::from_samples(source.width(), source.height(), source.format(), samples)
}
