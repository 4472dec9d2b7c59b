//! Service type classification from raw bill text.

use tracing::debug;

use crate::models::record::ServiceType;
use crate::normalize::NormalizedText;

/// Unambiguous issuer literals; first category whose literal appears wins.
const STRONG_LITERALS: &[(ServiceType, &[&str])] = &[
    (ServiceType::Cfe, &["CFE", "COMISIÓN FEDERAL DE ELECTRICIDAD"]),
    (ServiceType::Japam, &["JAPAM", "JUNTA DE AGUA"]),
    (ServiceType::Gas, &["ENGIE", "TRACTEBEL"]),
];

const CFE_SECONDARY: &[&str] = &[
    "ELECTRICIDAD",
    "ELECTRICA",
    "KWH",
    "KILOWATT",
    "SUMINISTRO ELÉCTRICO",
];

const JAPAM_SECONDARY: &[&str] = &["AGUA POTABLE", "SERVICIO DE AGUA"];

const GAS_QUALIFIERS: &[&str] = &["NATURAL", "LP", "PROPANO"];

/// Disjoint keyword sets for the count-based tiebreak.
const CFE_KEYWORDS: &[&str] = &["CFE", "ELECTRICIDAD", "KWH", "TARIFA", "MEDIDOR"];
const JAPAM_KEYWORDS: &[&str] = &["JAPAM", "AGUA", "M3", "CAUDAL", "HIDRANTE"];
const GAS_KEYWORDS: &[&str] = &["GAS", "ENGIE", "PROPANO", "BUTANO", "COMBUSTIBLE"];

/// Keyword-driven service classifier.
///
/// Four ordered stages, first decisive signal wins: unambiguous issuer
/// literals over the whole text, broader domain terms in a fixed fallback
/// order, a per-line rescan of the issuer tokens (line noise can defeat the
/// whole-text match), then a keyword-occurrence count where only a strict
/// majority decides. Anything else is `Unknown`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceClassifier;

impl ServiceClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, text: &NormalizedText) -> ServiceType {
        let upper = text.line_view().to_uppercase();

        // Stage 1: strong issuer literals.
        for (service, literals) in STRONG_LITERALS {
            if literals.iter().any(|l| upper.contains(l)) {
                debug!("classified as {} via strong literal", service);
                return *service;
            }
        }

        // Stage 2: secondary domain terms, fixed order.
        if CFE_SECONDARY.iter().any(|t| upper.contains(t)) {
            return ServiceType::Cfe;
        }
        if JAPAM_SECONDARY.iter().any(|t| upper.contains(t))
            || (upper.contains("M3") && upper.contains("AGUA"))
            || (upper.contains("METROS CÚBICOS") && upper.contains("CONSUMO"))
        {
            return ServiceType::Japam;
        }
        if (upper.contains("GAS") && GAS_QUALIFIERS.iter().any(|q| upper.contains(q)))
            || upper.contains("COMBUSTIBLE")
        {
            return ServiceType::Gas;
        }

        // Stage 3: rescan line by line for the issuer tokens.
        for line in text.lines() {
            let line = line.to_uppercase();
            if line.contains("CFE") {
                return ServiceType::Cfe;
            }
            if line.contains("JAPAM") {
                return ServiceType::Japam;
            }
            if line.contains("GAS") {
                return ServiceType::Gas;
            }
        }

        // Stage 4: keyword counts; a tie or all-zero is inconclusive.
        let cfe = count_keywords(&upper, CFE_KEYWORDS);
        let japam = count_keywords(&upper, JAPAM_KEYWORDS);
        let gas = count_keywords(&upper, GAS_KEYWORDS);

        debug!("keyword tiebreak: cfe={} japam={} gas={}", cfe, japam, gas);

        if cfe > japam && cfe > gas {
            ServiceType::Cfe
        } else if japam > cfe && japam > gas {
            ServiceType::Japam
        } else if gas > cfe && gas > japam {
            ServiceType::Gas
        } else {
            ServiceType::Unknown
        }
    }
}

/// Classify raw text directly; see [`ServiceClassifier`].
pub fn classify_text(raw_text: &str) -> ServiceType {
    ServiceClassifier::new().classify(&NormalizedText::new(raw_text))
}

fn count_keywords(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| text.contains(*k)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strong_literal_cfe() {
        assert_eq!(classify_text("Comisión Federal de Electricidad"), ServiceType::Cfe);
        assert_eq!(classify_text("RFC: CFE370814QI0"), ServiceType::Cfe);
    }

    #[test]
    fn test_strong_literal_japam_and_gas() {
        assert_eq!(classify_text("JAPAM Querétaro"), ServiceType::Japam);
        assert_eq!(classify_text("ENGIE México"), ServiceType::Gas);
        assert_eq!(classify_text("Tractebel DGJ"), ServiceType::Gas);
    }

    #[test]
    fn test_secondary_terms() {
        assert_eq!(classify_text("suministro de electricidad"), ServiceType::Cfe);
        assert_eq!(classify_text("servicio de agua potable"), ServiceType::Japam);
        assert_eq!(classify_text("gas natural para su hogar"), ServiceType::Gas);
    }

    #[test]
    fn test_strong_literal_outranks_keyword_majority() {
        // JAPAM literal present, but three electricity keywords.
        let text = "JAPAM\ntarifa kwh medidor";
        assert_eq!(classify_text(text), ServiceType::Japam);
    }

    #[test]
    fn test_line_scan_fallback() {
        // No strong/secondary hit on the flattened text, the issuer token
        // only survives inside one line.
        let text = "recibo de consumo\nsucursal gas\npago en ventanilla";
        assert_eq!(classify_text(text), ServiceType::Gas);
    }

    #[test]
    fn test_keyword_count_tiebreak() {
        let text = "medidor instalado, tarifa registrada";
        assert_eq!(classify_text(text), ServiceType::Cfe);
    }

    #[test]
    fn test_unrecognized_text_is_unknown() {
        assert_eq!(classify_text("estado de cuenta bancario"), ServiceType::Unknown);
        assert_eq!(classify_text(""), ServiceType::Unknown);
        assert_eq!(classify_text("xyzzy 123 qwerty"), ServiceType::Unknown);
    }
}
