//! PDF text and image extraction using lopdf and pdf-extract.

use image::{DynamicImage, ImageBuffer, Rgba};
use lopdf::{Document, Object};
use tracing::{debug, trace};

use recibo_core::error::SourceError;
use recibo_core::source::{PageRenderer, TextSource};

/// Type of PDF content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfType {
    /// Contains extractable text.
    Text,
    /// Contains only images (scanned receipt).
    Image,
    /// Contains both text and images.
    Hybrid,
    /// Empty or unreadable.
    Empty,
}

/// PDF content extractor.
///
/// Stateless: every call loads the document from the given bytes, so one
/// instance can be shared read-only across concurrent extractions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Load a document, decrypting empty-password encryption in place.
    ///
    /// Returns the document together with bytes suitable for pdf-extract
    /// (re-saved when decryption rewrote the object streams).
    fn load(&self, data: &[u8]) -> Result<(Document, Vec<u8>), SourceError> {
        let mut doc =
            Document::load_mem(data).map_err(|e| SourceError::Parse(e.to_string()))?;

        let raw_data = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(SourceError::Encrypted);
            }
            debug!("decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| SourceError::Parse(format!("failed to save decrypted PDF: {e}")))?;
            decrypted
        } else {
            data.to_vec()
        };

        if doc.get_pages().is_empty() {
            return Err(SourceError::NoPages);
        }

        Ok((doc, raw_data))
    }

    /// Number of pages, zero when the document does not parse.
    pub fn page_count(&self, data: &[u8]) -> u32 {
        self.load(data)
            .map(|(doc, _)| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    /// Decide whether the document carries a usable text layer, images to
    /// OCR, or both.
    pub fn analyze(&self, data: &[u8]) -> PdfType {
        let (doc, raw_data) = match self.load(data) {
            Ok(loaded) => loaded,
            Err(_) => return PdfType::Empty,
        };

        let text_len = pdf_extract::extract_text_from_mem(&raw_data)
            .map(|t| t.trim().len())
            .unwrap_or(0);
        let has_text = text_len > 50;
        let has_images = !document_images(&doc).is_empty();

        let pdf_type = match (has_text, has_images) {
            (true, false) => PdfType::Text,
            (false, true) => PdfType::Image,
            (true, true) => PdfType::Hybrid,
            (false, false) => PdfType::Empty,
        };

        debug!(
            "PDF analysis: {} chars text, images={} -> {:?}",
            text_len, has_images, pdf_type
        );
        pdf_type
    }
}

impl TextSource for PdfExtractor {
    fn extract_text(&self, data: &[u8]) -> Result<String, SourceError> {
        let (_, raw_data) = self.load(data)?;

        pdf_extract::extract_text_from_mem(&raw_data)
            .map_err(|e| SourceError::TextExtraction(e.to_string()))
    }
}

impl PageRenderer for PdfExtractor {
    /// Surface the embedded page images in document order.
    ///
    /// Scanned receipts store each rendered page as one full-page image
    /// object; no rasterizer runs here, so `_dpi` is the caller's request
    /// only and the images come back at their stored resolution.
    fn render_pages(&self, data: &[u8], _dpi: u32) -> Result<Vec<DynamicImage>, SourceError> {
        let (doc, _) = self.load(data)?;

        let images = document_images(&doc);
        if images.is_empty() {
            return Err(SourceError::Render("no page images found in PDF".to_string()));
        }

        debug!("extracted {} page images", images.len());
        Ok(images)
    }
}

/// Collect every decodable image object in the document.
fn document_images(doc: &Document) -> Vec<DynamicImage> {
    let mut images = Vec::new();

    for (_, object) in doc.objects.iter() {
        if let Some(img) = try_extract_image_from_object(doc, object) {
            images.push(img);
        }
    }

    images
}

fn try_extract_image_from_object(doc: &Document, obj: &Object) -> Option<DynamicImage> {
    let Object::Stream(stream) = obj else {
        return None;
    };
    let dict = &stream.dict;

    // Only image XObjects.
    let subtype = dict.get(b"Subtype").ok()?;
    if subtype.as_name().ok()? != b"Image" {
        return None;
    }

    let width = dict.get(b"Width").ok()?.as_i64().ok()? as u32;
    let height = dict.get(b"Height").ok()?.as_i64().ok()? as u32;

    trace!("found image object: {}x{}", width, height);

    let data = match stream.decompressed_content() {
        Ok(d) => d,
        Err(_) => stream.content.clone(),
    };

    if let Ok(filter) = dict.get(b"Filter") {
        let filter_name = match filter {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(arr) if !arr.is_empty() => arr.first().and_then(|o| o.as_name().ok()),
            _ => None,
        };

        match filter_name {
            Some(b"DCTDecode") => {
                // JPEG data - the raw stream content is the compressed image.
                trace!("decoding JPEG image");
                return image::load_from_memory_with_format(
                    &stream.content,
                    image::ImageFormat::Jpeg,
                )
                .ok();
            }
            Some(b"JPXDecode") | Some(b"CCITTFaxDecode") | Some(b"JBIG2Decode") => {
                trace!("unsupported image filter");
                return None;
            }
            _ => {}
        }
    }

    let color_space = dict
        .get(b"ColorSpace")
        .ok()
        .and_then(|o| match o {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()),
            Object::Reference(r) => doc.get_object(*r).ok().and_then(|o| o.as_name().ok()),
            _ => None,
        })
        .unwrap_or(b"DeviceRGB");

    let bits = dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .unwrap_or(8) as u8;

    create_image_from_raw(&data, width, height, color_space, bits)
}

fn create_image_from_raw(
    data: &[u8],
    width: u32,
    height: u32,
    color_space: &[u8],
    bits_per_component: u8,
) -> Option<DynamicImage> {
    if bits_per_component != 8 {
        trace!("unsupported bits per component: {}", bits_per_component);
        return None;
    }

    let expected_rgb = (width * height * 3) as usize;
    let expected_gray = (width * height) as usize;

    if color_space == b"DeviceRGB" || color_space == b"RGB" {
        if data.len() >= expected_rgb {
            let mut rgba_data = Vec::with_capacity((width * height * 4) as usize);
            for chunk in data[..expected_rgb].chunks(3) {
                if chunk.len() == 3 {
                    rgba_data.extend_from_slice(chunk);
                    rgba_data.push(255);
                }
            }
            return ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, rgba_data)
                .map(DynamicImage::ImageRgba8);
        }
    } else if color_space == b"DeviceGray" || color_space == b"G" {
        if data.len() >= expected_gray {
            let mut rgba_data = Vec::with_capacity((width * height * 4) as usize);
            for &gray in data[..expected_gray].iter() {
                rgba_data.extend_from_slice(&[gray, gray, gray, 255]);
            }
            return ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, rgba_data)
                .map(DynamicImage::ImageRgba8);
        }
    }

    trace!(
        "could not decode image: data_len={}, expected_rgb={}, expected_gray={}",
        data.len(),
        expected_rgb,
        expected_gray
    );
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_invalid_bytes_are_not_a_pdf() {
        let extractor = PdfExtractor::new();
        assert!(extractor.load(b"not a pdf").is_err());
        assert_eq!(extractor.page_count(b"not a pdf"), 0);
        assert_eq!(extractor.analyze(b"not a pdf"), PdfType::Empty);
    }

    #[test]
    fn test_extract_text_propagates_parse_error() {
        let extractor = PdfExtractor::new();
        let result = extractor.extract_text(b"");
        assert!(matches!(result, Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_raw_rgb_image_roundtrip() {
        let data = vec![10u8; 2 * 2 * 3];
        let img = create_image_from_raw(&data, 2, 2, b"DeviceRGB", 8).unwrap();
        assert_eq!(img.width(), 2);
        assert_eq!(img.height(), 2);
    }

    #[test]
    fn test_raw_gray_image_roundtrip() {
        let data = vec![128u8; 4 * 4];
        let img = create_image_from_raw(&data, 4, 4, b"DeviceGray", 8).unwrap();
        assert_eq!(img.width(), 4);
        assert_eq!(img.height(), 4);
    }

    #[test]
    fn test_unsupported_bit_depth_rejected() {
        let data = vec![0u8; 16];
        assert!(create_image_from_raw(&data, 2, 2, b"DeviceRGB", 1).is_none());
    }
}
