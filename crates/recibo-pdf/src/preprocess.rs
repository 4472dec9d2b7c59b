//! Image enhancement ahead of OCR.

use image::DynamicImage;
use tracing::debug;

/// 3x3 sharpening kernel.
const SHARPEN_KERNEL: [f32; 9] = [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];

/// Contrast boost applied after grayscale conversion.
const CONTRAST_BOOST: f32 = 100.0;

/// Prepare a rendered page for OCR: grayscale, contrast boost, sharpen.
///
/// Receipt scans arrive low-contrast; the boost-then-sharpen pass makes
/// label glyphs separable before recognition.
pub fn enhance_for_ocr(image: &DynamicImage) -> DynamicImage {
    let (width, height) = (image.width(), image.height());
    debug!("enhancing {}x{} page image for OCR", width, height);

    let gray = image.grayscale();
    let boosted = gray.adjust_contrast(CONTRAST_BOOST);
    boosted.filter3x3(&SHARPEN_KERNEL)
}
