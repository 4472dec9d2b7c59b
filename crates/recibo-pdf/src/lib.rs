//! PDF document source for bill extraction.
//!
//! Implements the `recibo-core` collaborator traits over lopdf and
//! pdf-extract: embedded text for digital receipts, page images for the
//! OCR path of scanned ones.

mod extractor;
pub mod preprocess;

pub use extractor::{PdfExtractor, PdfType};
