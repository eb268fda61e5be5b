//! Channel requantization through the public API.

mod common;

use common::fixtures;
use ocs_palette::error::PipelineError;
use ocs_palette::models::{EdgePolicy, PixelBuffer, PixelFormat};
use ocs_palette::rendering::{requantize_buffer, requantize_channel, requantize_samples};
use ocs_palette::services::{CancelToken, Cancellable, NoProgress, TracingProgress};
use pretty_assertions::assert_eq;

#[test]
fn test_documented_example() {
    let out = requantize_samples(
        &[10, 250, 120, 99, 99, 99],
        2,
        1,
        3,
        EdgePolicy::SkipLastColumn,
        &mut NoProgress,
    )
    .unwrap();
    assert_eq!(out, vec![16, 255, 128, 0, 0, 0]);
}

#[test]
fn test_matches_channel_function() {
    let source = fixtures::gradient_rgba(17, 9);
    let out = requantize_buffer(&source, EdgePolicy::FullWidth, &mut TracingProgress::new())
        .unwrap();

    for y in 0..9 {
        for x in 0..17 {
            let src = source.pixel(x, y).unwrap();
            let expected = [
                requantize_channel(src[0]),
                requantize_channel(src[1]),
                requantize_channel(src[2]),
                src[3],
            ];
            assert_eq!(out.pixel(x, y).unwrap(), &expected[..], "pixel ({x}, {y})");
        }
    }
    common::assert_ocs_channels(&out);
}

#[test]
fn test_idempotent_on_buffers() {
    let source = fixtures::gradient(12, 12);
    let once = requantize_buffer(&source, EdgePolicy::FullWidth, &mut NoProgress).unwrap();
    let twice = requantize_buffer(&once, EdgePolicy::FullWidth, &mut NoProgress).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_one_pixel_image() {
    let source = PixelBuffer::from_samples(1, 1, PixelFormat::Rgba, vec![200, 100, 50, 9]).unwrap();

    let skipped = requantize_buffer(&source, EdgePolicy::SkipLastColumn, &mut NoProgress).unwrap();
    assert_eq!(skipped.samples(), &[0, 0, 0, 0]);

    let full = requantize_buffer(&source, EdgePolicy::FullWidth, &mut NoProgress).unwrap();
    assert_eq!(full.samples(), &[208, 96, 48, 9]);
}

#[test]
fn test_cancelled_before_first_column() {
    let token = CancelToken::new();
    let mut progress = Cancellable::new(NoProgress, token.clone());
    token.cancel();

    let err = requantize_buffer(&fixtures::gradient(4, 4), EdgePolicy::FullWidth, &mut progress)
        .unwrap_err();
    assert!(matches!(err, PipelineError::Cancelled { .. }));
    assert!(err.to_string().starts_with("Cancelled"), "{err}");
}
