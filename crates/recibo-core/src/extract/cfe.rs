//! Electricity (CFE) field extraction cascade.
//!
//! The densest of the three cascades: CFE receipts interleave the holder
//! block, line-item tables and the amount due, and the OCR layer routinely
//! splits or garbles the labels, so almost every field carries fallbacks.

use tracing::debug;

use crate::models::config::ExtractionConfig;
use crate::models::record::{Fields, ServiceType};
use crate::normalize::NormalizedText;

use super::correct::{
    collapse_whitespace, correct_account_confusions, month_abbrev, normalize_day, pad_day,
    strip_thousands,
};
use super::patterns::*;
use super::rules::{last_in_range, Bounds, CaptureRule, RuleChain};
use super::Cascade;

/// Line fragments that end the post-total address window.
const ADDRESS_STOP_WORDS: &[&str] = &["QUERETARO", "QRO", "SERVICIO", "RMU", "PESOS", "MN:"];

pub struct CfeCascade {
    auto_correct: bool,
    total_bounds: Bounds,
    default_postal_code: String,
}

impl CfeCascade {
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            auto_correct: config.auto_correct,
            total_bounds: Bounds::new(config.total_min, config.total_max),
            default_postal_code: config.default_postal_code.clone(),
        }
    }

    fn extract_holder(&self, text: &str) -> Option<String> {
        let rules = [
            CaptureRule::Labeled(&*CFE_HOLDER_ADJACENT),
            CaptureRule::Labeled(&*CFE_HOLDER_LINE),
            CaptureRule::Delimited(&*CFE_HOLDER_DELIMITED),
            CaptureRule::Generic(&*CFE_HOLDER_GENERIC),
        ];

        RuleChain::new(&rules)
            .apply(text)
            .map(|holder| collapse_whitespace(&holder))
    }

    /// Pool every currency-shaped candidate, then take the last plausible
    /// one; amounts inside line-item tables precede the true total.
    fn extract_total(&self, text: &str) -> Option<String> {
        let mut candidates: Vec<String> = CFE_TOTAL_CURRENCY
            .captures_iter(text)
            .map(|caps| caps[1].to_string())
            .collect();
        candidates.extend(
            CFE_TOTAL_WORD
                .captures_iter(text)
                .map(|caps| caps[1].to_string()),
        );

        last_in_range(&candidates, self.total_bounds)
    }

    /// Reassemble the address from the windows around the amount-due
    /// marker, discarding clearly-non-address line shapes.
    fn extract_address(&self, text: &str) -> Option<String> {
        let mut parts: Vec<String> = Vec::new();

        if let Some(caps) = CFE_ADDRESS_BEFORE_TOTAL.captures(text) {
            for line in trimmed_lines(&caps[1]) {
                if line.len() < 3 || is_non_address_line(line) {
                    continue;
                }
                parts.push(line.to_string());
            }
        }

        if let Some(caps) = CFE_ADDRESS_AFTER_TOTAL.captures(text) {
            for line in trimmed_lines(&caps[1]) {
                let upper = line.to_uppercase();
                if ADDRESS_STOP_WORDS.iter().any(|kw| upper.contains(kw)) {
                    break;
                }
                if is_non_address_line(line) {
                    continue;
                }
                parts.push(line.to_string());
            }
        }

        let mut direccion = parts.join(" ");
        if self.auto_correct {
            direccion = restore_street_number(&direccion);
        }
        direccion = RESIDUAL_NUMBER_FRAGMENT
            .replace_all(&direccion, " ")
            .into_owned();
        let direccion = collapse_whitespace(&direccion);

        let postal_code = CFE_POSTAL_CODE.captures(text).map(|caps| caps[1].to_string());
        if direccion.is_empty() && postal_code.is_none() {
            return None;
        }

        let postal_code = postal_code.unwrap_or_else(|| self.default_postal_code.clone());
        Some(if direccion.is_empty() {
            format!("C.P.{postal_code}")
        } else {
            format!("{direccion} C.P.{postal_code}")
        })
    }

    fn extract_service_number(&self, text: &str) -> Option<String> {
        let rules = [
            CaptureRule::Labeled(&*CFE_SERVICE_LABELED),
            CaptureRule::Generic(&*CFE_SERVICE_FALLBACK),
        ];
        RuleChain::new(&rules).apply(text)
    }

    fn extract_tariff(&self, text: &str) -> Option<String> {
        let rules = [
            CaptureRule::Labeled(&*CFE_TARIFF_LABELED),
            CaptureRule::Generic(&*CFE_TARIFF_BARE),
        ];
        RuleChain::new(&rules).apply(text)
    }

    fn extract_account(&self, text: &str) -> Option<String> {
        CFE_ACCOUNT.captures(text).map(|caps| {
            let raw = caps[1].trim();
            if self.auto_correct {
                correct_account_confusions(raw)
            } else {
                raw.chars().filter(|c| !c.is_whitespace()).collect()
            }
        })
    }

    fn extract_meter(&self, text: &str) -> Option<String> {
        let rules = [
            CaptureRule::Labeled(&*CFE_METER_LABELED),
            CaptureRule::Generic(&*CFE_METER_FALLBACK),
        ];
        RuleChain::new(&rules).apply(text)
    }

    fn extract_period(&self, text: &str) -> Option<String> {
        let rules = [
            CaptureRule::Labeled(&*CFE_PERIOD_LABELED),
            CaptureRule::Generic(&*CFE_PERIOD_FALLBACK),
        ];
        RuleChain::new(&rules).apply(text)
    }

    fn extract_due_date(&self, text: &str) -> Option<String> {
        [
            &*CFE_DUE_DATE_LABELED,
            &*CFE_DUE_DATE_COMPACT,
            &*CFE_DUE_DATE_LOOSE,
        ]
        .iter()
        .find_map(|re| re.captures(text))
        .map(|caps| {
            format!(
                "{} {} {}",
                normalize_day(&caps[1]),
                month_abbrev(&caps[2]),
                &caps[3]
            )
        })
    }

    fn extract_cutoff_date(&self, flat: &str) -> Option<String> {
        [&*CFE_CUTOFF_AFTER_MARKER, &*CFE_CUTOFF_LOOSE]
            .iter()
            .find_map(|re| re.captures(flat))
            .map(|caps| {
                format!(
                    "{} {} {}",
                    pad_day(&normalize_day(&caps[1])),
                    month_abbrev(&caps[2]),
                    &caps[3]
                )
            })
    }

    /// Priority order: sum of named consumption blocks, the single
    /// difference value, then the last column of the kWh table row.
    fn extract_consumption(&self, text: &str) -> Option<String> {
        let blocks: Vec<i64> = CFE_CONSUMPTION_BLOCKS
            .captures_iter(text)
            .filter_map(|caps| strip_thousands(&caps[2]).parse::<i64>().ok())
            .collect();
        if !blocks.is_empty() {
            return Some(blocks.iter().sum::<i64>().to_string());
        }

        if let Some(caps) = CFE_CONSUMPTION_DIFFERENCE.captures(text) {
            return Some(caps[1].to_string());
        }

        CFE_CONSUMPTION_TABLE
            .captures(text)
            .map(|caps| caps[1].to_string())
    }

    fn extract_reading_quality(&self, text: &str) -> Option<&'static str> {
        if CFE_READING_ESTIMATED.is_match(text) {
            return Some("Estimada");
        }
        let upper = text.to_uppercase();
        if upper.contains("ESTIMADA") || upper.contains("MEDIDA") {
            Some("Medida")
        } else {
            None
        }
    }
}

impl Default for CfeCascade {
    fn default() -> Self {
        Self::new()
    }
}

impl Cascade for CfeCascade {
    fn service_type(&self) -> ServiceType {
        ServiceType::Cfe
    }

    fn run(&self, text: &NormalizedText) -> Fields {
        let view = text.line_view();
        let mut fields = Fields::default();

        fields.titular = self.extract_holder(view);
        fields.total = self.extract_total(view);
        fields.direccion = self.extract_address(view);
        fields.no_servicio = self.extract_service_number(view);
        fields.tarifa = self.extract_tariff(view);
        fields.cuenta = self.extract_account(view);
        fields.no_medidor = self.extract_meter(view);
        fields.periodo = self.extract_period(view);
        fields.fecha_pago = self.extract_due_date(view);
        fields.fecha_corte = self.extract_cutoff_date(text.flat_view());
        fields.rmu = CFE_RMU.captures(view).map(|caps| caps[1].to_string());

        fields.consumo = self.extract_consumption(view);
        fields.consumo_kwh = fields.consumo.clone();

        let quality = self.extract_reading_quality(view).map(str::to_string);
        fields.calidad = quality.clone();
        fields.tipo_lectura = quality;

        debug!(
            "cfe cascade: titular={} total={} consumo={}",
            fields.titular.is_some(),
            fields.total.is_some(),
            fields.consumo.is_some()
        );

        fields
    }
}

fn trimmed_lines(block: &str) -> impl Iterator<Item = &str> {
    block.lines().map(str::trim).filter(|l| !l.is_empty())
}

/// Currency amounts, bracket-prefixed fragments and bare long numbers are
/// table noise, not address lines.
fn is_non_address_line(line: &str) -> bool {
    line.starts_with('$')
        || line.starts_with('(')
        || GROUPED_THOUSANDS_LINE.is_match(line)
        || BARE_LONG_NUMBER_LINE.is_match(line)
}

/// OCR drops the house number after the MANUFACTURA street literal; put it
/// back when it is missing.
fn restore_street_number(direccion: &str) -> String {
    if direccion.to_uppercase().contains("MANUFACTURA")
        && !CFE_STREET_WITH_NUMBER.is_match(direccion)
    {
        CFE_STREET_LITERAL
            .replace_all(direccion, "${1} 1")
            .into_owned()
    } else {
        direccion.to_string()
    }
}
