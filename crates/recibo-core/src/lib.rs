//! Core library for Mexican utility bill extraction.
//!
//! This crate provides:
//! - Text normalization (line-structured and flattened views over noisy OCR text)
//! - Service type classification (CFE electricity, JAPAM water, gas)
//! - Per-service field extraction cascades with ordered fallbacks
//! - OCR value correction and numeric plausibility filtering
//! - Collaborator traits for text sources, page renderers and OCR engines

pub mod classify;
pub mod error;
pub mod extract;
pub mod models;
pub mod normalize;
pub mod source;

pub use classify::{classify_text, ServiceClassifier};
pub use error::{ReciboError, Result, SourceError};
pub use extract::{Cascade, CfeCascade, GasCascade, JapamCascade, ReciboParser};
pub use models::config::ReciboConfig;
pub use models::record::{Fields, ReciboRecord, ServiceType, ERROR_SENTINEL, NOT_EXTRACTED};
pub use normalize::NormalizedText;
pub use source::{assemble_reading_order, OcrEngine, PageRenderer, TextFragment, TextSource};
