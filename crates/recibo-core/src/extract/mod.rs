//! Field extraction cascades and the per-document orchestrator.

mod cfe;
mod correct;
mod gas;
mod japam;
pub mod patterns;
pub mod rules;

pub use cfe::CfeCascade;
pub use correct::{
    collapse_whitespace, correct_account_confusions, month_abbrev, normalize_day, pad_day,
    strip_thousands, title_case,
};
pub use gas::GasCascade;
pub use japam::JapamCascade;
pub use rules::{last_in_range, Bounds, CaptureRule, RuleChain};

use tracing::{debug, info};

use crate::classify::ServiceClassifier;
use crate::models::config::ReciboConfig;
use crate::models::record::{Fields, ReciboRecord, ServiceType};
use crate::normalize::NormalizedText;

/// A service-specific extraction cascade.
///
/// Cascades are pure: the same `(ServiceType, RawText)` pair always yields
/// the same fields, and a slot no rule matched simply stays unset.
pub trait Cascade {
    fn service_type(&self) -> ServiceType;

    /// Populate schema slots from normalized text.
    fn run(&self, text: &NormalizedText) -> Fields;
}

/// Extraction orchestrator: normalization, classification, cascade
/// dispatch and sentinel backfill.
pub struct ReciboParser {
    classifier: ServiceClassifier,
    cfe: CfeCascade,
    japam: JapamCascade,
    gas: GasCascade,
}

impl ReciboParser {
    /// Parser with default configuration.
    pub fn new() -> Self {
        Self::with_config(&ReciboConfig::default())
    }

    pub fn with_config(config: &ReciboConfig) -> Self {
        Self {
            classifier: ServiceClassifier::new(),
            cfe: CfeCascade::from_config(&config.extraction),
            japam: JapamCascade::new(),
            gas: GasCascade::new(),
        }
    }

    /// Classify raw text without extracting.
    pub fn classify(&self, raw_text: &str) -> ServiceType {
        self.classifier.classify(&NormalizedText::new(raw_text))
    }

    /// Extract a complete record from raw text.
    ///
    /// `hint` is consulted only when classification over the text itself is
    /// inconclusive (e.g. a service type derived from the filename). Never
    /// panics: an unreadable document comes back as an error record, and
    /// unmatched fields come back as the sentinel.
    pub fn parse(
        &self,
        raw_text: &str,
        archivo: &str,
        hint: Option<ServiceType>,
    ) -> ReciboRecord {
        let text = NormalizedText::new(raw_text);

        if text.is_empty() {
            info!("no usable text for {}", archivo);
            return ReciboRecord::unreadable(
                hint.unwrap_or(ServiceType::Unknown),
                archivo,
                "no text could be extracted from the document",
            );
        }

        let mut service = self.classifier.classify(&text);
        if service == ServiceType::Unknown {
            if let Some(hinted) = hint {
                debug!("classifier inconclusive, using hint {}", hinted);
                service = hinted;
            }
        }

        info!(
            "extracting {} as {} ({} chars of text)",
            archivo,
            service,
            raw_text.len()
        );

        self.run_cascade(service, &text).into_record(service, archivo)
    }

    /// Extract with a fixed service category, bypassing classification.
    ///
    /// The per-service entry point: the record reports exactly the given
    /// category, including `Unknown`.
    pub fn parse_as(
        &self,
        service: ServiceType,
        raw_text: &str,
        archivo: &str,
    ) -> ReciboRecord {
        let text = NormalizedText::new(raw_text);

        if text.is_empty() {
            return ReciboRecord::unreadable(
                service,
                archivo,
                "no text could be extracted from the document",
            );
        }

        self.run_cascade(service, &text).into_record(service, archivo)
    }

    fn run_cascade(&self, service: ServiceType, text: &NormalizedText) -> Fields {
        match service {
            ServiceType::Cfe => self.cfe.run(text),
            ServiceType::Japam => self.japam.run(text),
            ServiceType::Gas => self.gas.run(text),
            // No cascade of its own; the electricity rules are the widest
            // net, and the record still reports the type honestly.
            ServiceType::Unknown => self.cfe.run(text),
        }
    }
}

impl Default for ReciboParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{ERROR_SENTINEL, NOT_EXTRACTED};
    use pretty_assertions::assert_eq;

    const CFE_SAMPLE: &str = concat!(
        "CFE Comisión Federal de Electricidad\n",
        "RFC: CFE370814QI0\n",
        "JUAN PEREZ LOPEZ   TOTAL A PAGAR\n",
        "NO. DE SERVICIO: 012345678901\n",
        "TARIFA: 1C NO. MEDIDOR: 9H2K4\n",
        "Basico 100\n",
        "Excedente 50\n",
        "LIMITE DE PAGO: 10 ENE 24\n",
        "CORTE A PARTIR 15 ENE 24\n",
        "TOTAL A PAGAR: $1,234\n",
        "C.P. 76000\n",
    );

    #[test]
    fn test_parse_cfe_receipt() {
        let parser = ReciboParser::new();
        let record = parser.parse(CFE_SAMPLE, "cfe_enero.pdf", None);

        assert_eq!(record.service_type, ServiceType::Cfe);
        assert_eq!(record.archivo, "cfe_enero.pdf");
        assert_eq!(record.titular, "JUAN PEREZ LOPEZ");
        assert_eq!(record.no_servicio, "012345678901");
        assert_eq!(record.total, "1234");
        assert_eq!(record.consumo, "150");
        assert_eq!(record.fecha_pago, "10 ENE 24");
        assert_eq!(record.fecha_corte, "15 ENE 24");
        assert_eq!(record.error, None);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let parser = ReciboParser::new();
        let first = parser.parse(CFE_SAMPLE, "cfe.pdf", None);
        let second = parser.parse(CFE_SAMPLE, "cfe.pdf", None);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_text_yields_error_record() {
        let parser = ReciboParser::new();
        let record = parser.parse("", "vacio.pdf", None);

        assert_eq!(record.service_type, ServiceType::Unknown);
        assert_eq!(record.titular, ERROR_SENTINEL);
        assert_eq!(record.total, ERROR_SENTINEL);
        assert!(record.error.is_some());
    }

    #[test]
    fn test_unclassifiable_text_reports_unknown_with_sentinels() {
        let parser = ReciboParser::new();
        let record = parser.parse("lorem ipsum dolor sit amet", "raro.pdf", None);

        assert_eq!(record.service_type, ServiceType::Unknown);
        assert_eq!(record.titular, NOT_EXTRACTED);
        assert_eq!(record.direccion, NOT_EXTRACTED);
        assert_eq!(record.total, NOT_EXTRACTED);
        assert_eq!(record.consumo, NOT_EXTRACTED);
        assert_eq!(record.error, None);
    }

    #[test]
    fn test_hint_used_only_when_classifier_is_inconclusive() {
        let parser = ReciboParser::new();

        // Classifier decides; the water hint is ignored.
        let record = parser.parse(CFE_SAMPLE, "x.pdf", Some(ServiceType::Japam));
        assert_eq!(record.service_type, ServiceType::Cfe);

        // Classifier is inconclusive; the hint selects the cascade.
        let record = parser.parse(
            "Titular: ANA GOMEZ\nrecibo sin membrete",
            "recibo.pdf",
            Some(ServiceType::Japam),
        );
        assert_eq!(record.service_type, ServiceType::Japam);
        assert_eq!(record.titular, "ANA GOMEZ");
    }

    #[test]
    fn test_parse_as_fixes_the_category() {
        let parser = ReciboParser::new();

        // Gas cascade forced over electricity text: positional rules find
        // nothing, and the record reports the forced category.
        let record = parser.parse_as(ServiceType::Gas, CFE_SAMPLE, "cfe.pdf");
        assert_eq!(record.service_type, ServiceType::Gas);
        assert_eq!(record.titular, NOT_EXTRACTED);

        let record = parser.parse_as(ServiceType::Unknown, "ruido sin marcas", "x.pdf");
        assert_eq!(record.service_type, ServiceType::Unknown);
        assert_eq!(record.total, NOT_EXTRACTED);
    }

    #[test]
    fn test_random_noise_never_panics() {
        let parser = ReciboParser::new();
        for noise in ["\u{0}\u{1}\u{2}", "$$$$$", "\n\n\n", "ñÑáÁ 😀", "((((("] {
            let record = parser.parse(noise, "noise.pdf", None);
            assert_eq!(record.archivo, "noise.pdf");
        }
    }
}
