//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration for the recibo pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReciboConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,
}

impl Default for ReciboConfig {
    fn default() -> Self {
        Self {
            pdf: PdfConfig::default(),
            extraction: ExtractionConfig::default(),
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// DPI for rendering PDF pages to images on the OCR path.
    pub render_dpi: u32,

    /// Maximum pages to process (0 = unlimited).
    pub max_pages: usize,

    /// Try to extract embedded text before falling back to OCR.
    pub prefer_embedded_text: bool,

    /// Minimum text length to consider the digital layer usable.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            render_dpi: 300,
            max_pages: 10,
            prefer_embedded_text: true,
            min_text_length: 50,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Apply OCR character-confusion corrections to extracted values.
    pub auto_correct: bool,

    /// Lower plausibility bound for the amount due, in whole pesos.
    pub total_min: i64,

    /// Upper plausibility bound for the amount due, in whole pesos.
    pub total_max: i64,

    /// Postal code appended to CFE addresses when no C.P. marker is found.
    pub default_postal_code: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            auto_correct: true,
            total_min: 50,
            total_max: 100_000,
            default_postal_code: "76168".to_string(),
        }
    }
}

impl ReciboConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReciboConfig::default();
        assert_eq!(config.pdf.render_dpi, 300);
        assert_eq!(config.pdf.min_text_length, 50);
        assert!(config.extraction.auto_correct);
        assert_eq!(config.extraction.total_min, 50);
        assert_eq!(config.extraction.total_max, 100_000);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: ReciboConfig =
            serde_json::from_str(r#"{"extraction": {"total_max": 5000}}"#).unwrap();
        assert_eq!(config.extraction.total_max, 5000);
        assert_eq!(config.extraction.total_min, 50);
        assert_eq!(config.pdf.render_dpi, 300);
    }
}
