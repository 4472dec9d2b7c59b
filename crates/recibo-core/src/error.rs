//! Error types for the recibo-core library.

use thiserror::Error;

/// Main error type for the recibo library.
///
/// Field extraction itself never raises: unmatched fields become
/// sentinels and unreadable documents become error records, so the
/// variants here all concern the document input boundary.
#[derive(Error, Debug)]
pub enum ReciboError {
    /// Document source error (text layer, rendering, OCR).
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by document source collaborators.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Failed to open/parse the document.
    #[error("failed to parse document: {0}")]
    Parse(String),

    /// Failed to extract text from the digital layer.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// Failed to render pages to images.
    #[error("failed to render pages: {0}")]
    Render(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// The document is encrypted and cannot be processed.
    #[error("document is encrypted")]
    Encrypted,

    /// The document is empty or has no pages.
    #[error("document has no pages")]
    NoPages,
}

/// Result type for the recibo library.
pub type Result<T> = std::result::Result<T, ReciboError>;
