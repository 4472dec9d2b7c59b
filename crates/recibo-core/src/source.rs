//! Collaborator traits at the document input boundary.
//!
//! The core never reaches for ambient global state: callers construct the
//! text source and OCR engine once, share them read-only, and inject them
//! into the pipeline. Construction, reuse and teardown belong to the
//! caller.

use image::DynamicImage;

use crate::error::SourceError;

/// Digital text layer of a document.
pub trait TextSource {
    /// Extract raw text from document bytes.
    ///
    /// An empty string means the layer yielded nothing; callers decide
    /// whether to fall back to OCR.
    fn extract_text(&self, data: &[u8]) -> Result<String, SourceError>;
}

/// Renders document pages to images for the OCR path.
pub trait PageRenderer {
    /// One image per page at the requested resolution.
    fn render_pages(&self, data: &[u8], dpi: u32) -> Result<Vec<DynamicImage>, SourceError>;
}

/// A recognized text fragment with position and confidence metadata.
#[derive(Debug, Clone)]
pub struct TextFragment {
    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub confidence: f32,

    /// Axis-aligned bounding box (x1, y1, x2, y2) in image pixels.
    pub bbox: [f32; 4],
}

impl TextFragment {
    /// Get the center point of the bounding box.
    pub fn center(&self) -> (f32, f32) {
        (
            (self.bbox[0] + self.bbox[2]) / 2.0,
            (self.bbox[1] + self.bbox[3]) / 2.0,
        )
    }
}

/// Optical character recognition over a single page image.
pub trait OcrEngine {
    /// Recognize text fragments in an image.
    fn recognize(&self, image: &DynamicImage) -> Result<Vec<TextFragment>, SourceError>;
}

/// Concatenate fragments in reading order (top-to-bottom, left-to-right).
///
/// Fragments are grouped into row bands by approximate vertical position so
/// text the engine emitted out of order lands back on one line.
pub fn assemble_reading_order(mut fragments: Vec<TextFragment>) -> String {
    fragments.sort_by(|a, b| {
        // Group by approximate vertical position (within 20 pixels).
        let row_a = (a.bbox[1] / 20.0) as i32;
        let row_b = (b.bbox[1] / 20.0) as i32;

        if row_a != row_b {
            row_a.cmp(&row_b)
        } else {
            a.bbox[0]
                .partial_cmp(&b.bbox[0])
                .unwrap_or(std::cmp::Ordering::Equal)
        }
    });

    fragments
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
