//! Assertion helpers for tests.

use ocs_palette::models::{ColorMode, Image, LayerId, PixelBuffer, Rect};
use ocs_palette::services::LayerStack;
use pretty_assertions::assert_eq;

/// Everything a pipeline run may touch, captured for later comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub layers: Vec<LayerId>,
    pub names: Vec<String>,
    pub mode: ColorMode,
    pub selection: Option<Rect>,
    pub content: Vec<PixelBuffer>,
    pub undo_count: usize,
}

impl Snapshot {
    pub fn of(image: &Image) -> Self {
        Self {
            layers: image.layer_ids(),
            names: image.layers().iter().map(|l| l.name.clone()).collect(),
            mode: image.color_mode(),
            selection: image.selection(),
            content: image
                .layer_ids()
                .into_iter()
                .filter_map(|id| image.read_region(id).ok())
                .collect(),
            undo_count: image.undo_count(),
        }
    }
}

/// Assert the image is exactly as captured in `before`.
pub fn assert_unchanged(image: &Image, before: &Snapshot) {
    assert_eq!(&Snapshot::of(image), before, "image was modified");
}

/// Assert every color channel is a multiple of 16 or 255.
pub fn assert_ocs_channels(buffer: &PixelBuffer) {
    for (i, px) in buffer.samples().chunks(buffer.channels()).enumerate() {
        for &c in &px[..3] {
            assert!(
                c % 16 == 0 || c == 255,
                "pixel {i} has channel {c}, not on the 16-level grid"
            );
        }
    }
}

/// Assert the image is indexed with no more than `max` colors.
pub fn assert_indexed_within(image: &Image, max: usize) {
    assert_eq!(image.color_mode(), ColorMode::Indexed);
    let colors = image.palette().map(|p| p.len()).unwrap_or(0);
    assert!(
        (1..=max).contains(&colors),
        "expected 1..={max} palette entries, got {colors}"
    );
}
