//! Core recognition types.
//!
//! Backends emit words in native pixel space; everything public leaves this
//! module in resolution-independent fractional coordinates. The FFI layer
//! converts these types to C-compatible structs.

/// Axis-aligned rectangle in native pixel space, origin at the top-left of
/// the image.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Bounding box in fractional image coordinates.
///
/// Each field is the pixel value divided by the image width or height, so
/// consumers can scale to any display size without knowing the source
/// resolution. `(x, y)` is the top-left corner; values lie in `[0.0, 1.0]`
/// up to the platform engine's own rounding.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Rescale a native pixel rectangle against the image dimensions.
    ///
    /// Both dimensions must be positive; the pipeline rejects zero-area
    /// images before any rectangle reaches this point.
    pub fn from_pixels(rect: PixelRect, image_width: f64, image_height: f64) -> Self {
        debug_assert!(image_width > 0.0 && image_height > 0.0);
        Self {
            x: f64::from(rect.x) / image_width,
            y: f64::from(rect.y) / image_height,
            width: f64::from(rect.width) / image_width,
            height: f64::from(rect.height) / image_height,
        }
    }
}

/// One recognized word with its normalized location.
///
/// Blocks are ordered exactly as the platform engine emitted them, walking
/// each line in reading order and each word within its line.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub text: String,
    pub bbox: BoundingBox,
}

/// A word as reported by the platform engine, still in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedWord {
    pub text: String,
    pub rect: PixelRect,
}

/// A line of words in the engine's reading order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedLine {
    pub text: String,
    pub words: Vec<RecognizedWord>,
}

/// Flatten engine lines into per-word text blocks.
///
/// Preserves the line-then-word emission order and normalizes every
/// rectangle against the image dimensions.
pub fn flatten_lines(
    lines: Vec<RecognizedLine>,
    image_width: f64,
    image_height: f64,
) -> Vec<TextBlock> {
    let word_count: usize = lines.iter().map(|line| line.words.len()).sum();
    let mut blocks = Vec::with_capacity(word_count);

    for line in lines {
        for word in line.words {
            blocks.push(TextBlock {
                text: word.text,
                bbox: BoundingBox::from_pixels(word.rect, image_width, image_height),
            });
        }
    }

    blocks
}
