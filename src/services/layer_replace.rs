use super::host::LayerStack;
use crate::error::{PipelineError, Stage};
use crate::models::{LayerId, LayerInfo, NewLayer, PixelBuffer};

/// Replace `source` with a new layer holding `buffer`.
///
/// The new layer copies the source's geometry and appearance, is named
/// `prefix + source name` and goes on top of the stack. The source is
/// removed only after the new content is committed, so a failure at any
/// earlier step leaves it in place.
pub fn replace_layer<S: LayerStack + ?Sized>(
    stack: &mut S,
    source: LayerId,
    buffer: PixelBuffer,
    prefix: &str,
) -> Result<LayerInfo, PipelineError> {
    let host = PipelineError::host;

    let info = stack.layer(source).map_err(host(Stage::ReplaceLayer))?;
    let name = format!("{prefix}{}", info.name);

    let derived = stack
        .insert_layer(NewLayer::derived_from(&info, name), 0)
        .map_err(host(Stage::ReplaceLayer))?;
    stack
        .write_region(derived, buffer)
        .map_err(host(Stage::ReplaceLayer))?;
    stack.commit(derived).map_err(host(Stage::ReplaceLayer))?;
    stack
        .remove_layer(source)
        .map_err(host(Stage::ReplaceLayer))?;

    let derived = stack.layer(derived).map_err(host(Stage::ReplaceLayer))?;
    tracing::debug!(
        source = %source,
        derived = %derived.id,
        name = %derived.name,
        "Replaced layer"
    );
    Ok(derived)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompositeMode, Image, PixelFormat, Rect};

    #[test]
    fn test_replace_single_layer() {
        let source = PixelBuffer::new(3, 2, PixelFormat::Rgba);
        let mut image = Image::from_buffer("Background", source);
        let source_id = image.layer_ids()[0];
        let replacement =
            PixelBuffer::from_samples(3, 2, PixelFormat::Rgba, vec![16; 24]).unwrap();

        let derived = replace_layer(&mut image, source_id, replacement.clone(), "render ")
            .unwrap();

        assert_eq!(derived.name, "render Background");
        assert_eq!(image.layer_ids(), vec![derived.id]);
        assert_eq!(image.layers()[0].buffer(), Some(&replacement));
        assert_eq!(image.take_damage(), vec![Rect::new(0, 0, 3, 2)]);
    }

    #[test]
    fn test_appearance_copied() {
        let mut image = Image::from_buffer("base", PixelBuffer::new(2, 2, PixelFormat::Rgb));
        let source_id = image.layer_ids()[0];
        {
            let layer = &mut image.layers_mut()[0];
            layer.opacity = 40.0;
            layer.mode = CompositeMode::Multiply;
            layer.visible = false;
            layer.offset = (5, -2);
        }

        let derived = replace_layer(
            &mut image,
            source_id,
            PixelBuffer::new(2, 2, PixelFormat::Rgb),
            "ocs ",
        )
        .unwrap();

        assert_eq!(derived.name, "ocs base");
        assert_eq!(derived.opacity, 40.0);
        assert_eq!(derived.mode, CompositeMode::Multiply);
        assert!(!derived.visible);
        assert_eq!(derived.offset, (5, -2));
    }

    #[test]
    fn test_wrong_size_keeps_source() {
        let mut image = Image::from_buffer("base", PixelBuffer::new(2, 2, PixelFormat::Rgb));
        let source_id = image.layer_ids()[0];

        let err = replace_layer(
            &mut image,
            source_id,
            PixelBuffer::new(3, 2, PixelFormat::Rgb),
            "render ",
        )
        .unwrap_err();

        assert_eq!(err.stage(), Some(Stage::ReplaceLayer));
        assert!(image.find_layer(source_id).is_some());
    }

    #[test]
    fn test_missing_source() {
        let mut image = Image::from_buffer("base", PixelBuffer::new(1, 1, PixelFormat::Rgb));
        let err = replace_layer(
            &mut image,
            LayerId(99),
            PixelBuffer::new(1, 1, PixelFormat::Rgb),
            "render ",
        )
        .unwrap_err();
        assert!(err.to_string().contains("Layer not found: #99"));
        assert_eq!(image.layers().len(), 1);
    }
}
