//! Common regex patterns for bill field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // ---- CFE (electricity) ----

    // Account holder: the block between the RFC line and the amount-due
    // marker, then three widening fallbacks.
    pub static ref CFE_HOLDER_ADJACENT: Regex = Regex::new(
        r"(?i)RFC:\s*CFE\d+[^\n]*\n([A-Z][A-Z\s]+?)\s+TOTAL A PAGAR"
    ).unwrap();

    pub static ref CFE_HOLDER_LINE: Regex = Regex::new(
        r"(?i)RFC:\s*CFE\d+[^\n]*\n([A-Z][A-Z\s]{5,100}?)\n"
    ).unwrap();

    pub static ref CFE_HOLDER_DELIMITED: Regex = Regex::new(
        r"(?i)RFC:\s*CFE\d+[^\n]*\n([A-Z\s]+?)\s*(?:AV|CALLE|COL|TOTAL|\d)"
    ).unwrap();

    pub static ref CFE_HOLDER_GENERIC: Regex = Regex::new(
        r"(?i)RFC:[^\n]*\n([A-Z][^\n]{10,}?)\n"
    ).unwrap();

    // Amount due: currency-marked and line-leading word-marked candidates
    // are pooled; selection happens in the cascade via last_in_range.
    pub static ref CFE_TOTAL_CURRENCY: Regex = Regex::new(
        r"\$\s*([\d,]+)"
    ).unwrap();

    pub static ref CFE_TOTAL_WORD: Regex = Regex::new(
        r"(?im)^Total\s+([\d,]+(?:\.\d{2})?)"
    ).unwrap();

    // Address windows: between the holder block and the amount-due marker,
    // and between the marker and the postal-code line.
    pub static ref CFE_ADDRESS_BEFORE_TOTAL: Regex = Regex::new(
        r"(?is)RFC:[^\n]+\n[^\n]+\n(.*?)TOTAL A PAGAR"
    ).unwrap();

    pub static ref CFE_ADDRESS_AFTER_TOTAL: Regex = Regex::new(
        r"(?is)TOTAL A PAGAR:[^\n]*\n(.*?)(?:C\.P|G\.P)"
    ).unwrap();

    // Non-address line shapes rejected during address assembly.
    pub static ref GROUPED_THOUSANDS_LINE: Regex = Regex::new(
        r"^\d{1,3},\d{3}$"
    ).unwrap();

    pub static ref BARE_LONG_NUMBER_LINE: Regex = Regex::new(
        r"^\d{4,}$"
    ).unwrap();

    // OCR drops the house number after this street literal.
    pub static ref CFE_STREET_WITH_NUMBER: Regex = Regex::new(
        r"(?i)MANUFACTURA\s+1\s+"
    ).unwrap();

    pub static ref CFE_STREET_LITERAL: Regex = Regex::new(
        r"(?i)(MANUFACTURA)"
    ).unwrap();

    // Residual 3-5 digit table fragments inside an assembled address.
    pub static ref RESIDUAL_NUMBER_FRAGMENT: Regex = Regex::new(
        r"\s+\d{3,5}\s+"
    ).unwrap();

    pub static ref CFE_POSTAL_CODE: Regex = Regex::new(
        r"(?i)(?:C\.P|G\.P)[\.\s]*(\d{5})"
    ).unwrap();

    // Service / account / meter numbers, labeled then broader label.
    pub static ref CFE_SERVICE_LABELED: Regex = Regex::new(
        r"(?i)NO\.\s*DE\s*SERVICIO[:\-\s]+(0\d{11})"
    ).unwrap();

    pub static ref CFE_SERVICE_FALLBACK: Regex = Regex::new(
        r"(?i)SERVICIO[:\-\s]+(0\d{11})"
    ).unwrap();

    pub static ref CFE_TARIFF_LABELED: Regex = Regex::new(
        r"(?i)TARIFA[:\s]*([A-Z0-9]{2,6})(?:\s|NO|\n)"
    ).unwrap();

    pub static ref CFE_TARIFF_BARE: Regex = Regex::new(
        r"(?i)TARIFA([A-Z0-9]{2,6})"
    ).unwrap();

    pub static ref CFE_ACCOUNT: Regex = Regex::new(
        r"(?i)CUENTA[:\s]*([A-Z0-9\s]{10,25})"
    ).unwrap();

    pub static ref CFE_METER_LABELED: Regex = Regex::new(
        r"(?i)NO\.\s*MEDIDOR[:\-;\s]+([A-Z0-9]{4,15})"
    ).unwrap();

    pub static ref CFE_METER_FALLBACK: Regex = Regex::new(
        r"(?i)MEDIDOR[:\-;\s]+([A-Z0-9]{4,15})"
    ).unwrap();

    pub static ref CFE_PERIOD_LABELED: Regex = Regex::new(
        r"(?i)PERIODO\s*FACTURADO[:\s]*(\d{1,2}\s+[A-Z]{3,4}\s+\d{2}\s*[-–]\s*\d{1,2}\s+[A-Z]{3,4}\s+\d{2})"
    ).unwrap();

    pub static ref CFE_PERIOD_FALLBACK: Regex = Regex::new(
        r"(?i)FACTURADO[:\s]*(\d{1,2}\s+[A-Z]+\s+\d{2}[-–]\d{1,2}\s+[A-Z]+\s+\d{2})"
    ).unwrap();

    // Due date: tightly labeled, compact label, then loose label.
    pub static ref CFE_DUE_DATE_LABELED: Regex = Regex::new(
        r"(?i)(?:LIMITE|FECHA\s*LIMITE)\s*(?:DE\s*)?PAGO[:\-\s]*(\d{1,2}[O0]?)[\-\s]+([A-Z]{3,4})[\-\s]+(\d{2})"
    ).unwrap();

    pub static ref CFE_DUE_DATE_COMPACT: Regex = Regex::new(
        r"(?i)LIMITE\s*PAGO[:\-\s]*(\d{1,2}[O0]?)\s+([A-Z]{3,4})\s+(\d{2})"
    ).unwrap();

    pub static ref CFE_DUE_DATE_LOOSE: Regex = Regex::new(
        r"(?i)(?:LIMITE|PAGO)[^\d]*(\d{1,2})\s+([A-Z]{3})\s+(\d{2})"
    ).unwrap();

    // Cutoff date, matched against the flat view: line noise between CORTE
    // and the date defeats line-anchored patterns.
    pub static ref CFE_CUTOFF_AFTER_MARKER: Regex = Regex::new(
        r"(?i)PARTIR[:\-\s]*([O0o]?\d{1,2})\s+([A-Z]{3,4})\s+(\d{2})"
    ).unwrap();

    pub static ref CFE_CUTOFF_LOOSE: Regex = Regex::new(
        r"(?i)CORTE[^\d]*(\d{1,2}[O0o]?)\s+([A-Z]{3,4})\s+(\d{2})"
    ).unwrap();

    // Consumption: named blocks, a single difference value, or the last
    // numeric column of the kWh table row.
    pub static ref CFE_CONSUMPTION_BLOCKS: Regex = Regex::new(
        r"(?i)(Basico|Intermedio|Excedente)\s+([\d,]+)"
    ).unwrap();

    pub static ref CFE_CONSUMPTION_DIFFERENCE: Regex = Regex::new(
        r"(?i)Diferencia[^\d]*(\d+)"
    ).unwrap();

    pub static ref CFE_CONSUMPTION_TABLE: Regex = Regex::new(
        r"(?i)kWh[^\d]+\d+[^\d]+\d+[^\d]+(\d+)"
    ).unwrap();

    pub static ref CFE_READING_ESTIMATED: Regex = Regex::new(
        r"(?i)Estimada\s+X"
    ).unwrap();

    pub static ref CFE_RMU: Regex = Regex::new(
        r"(?i)RMU[:\s]*(\d{5})"
    ).unwrap();

    // ---- JAPAM (water) ----

    pub static ref JAPAM_SERVICE: Regex = Regex::new(
        r"(?i)No\.?\s*Servicio[: ]*([A-Z0-9\-]+)"
    ).unwrap();

    pub static ref JAPAM_HOLDER: Regex = Regex::new(
        r"(?i)Titular[: ]*([^\n]+)"
    ).unwrap();

    pub static ref JAPAM_CONSUMPTION_M3: Regex = Regex::new(
        r"(?i)Consumo[: ]*(\d+)\s*m3"
    ).unwrap();

    pub static ref JAPAM_TOTAL_LABELED: Regex = Regex::new(
        r"(?i)Total[\s$:]*([\d,]+\.?\d*)"
    ).unwrap();

    pub static ref JAPAM_TOTAL_CURRENCY: Regex = Regex::new(
        r"[$\s](\d{1,3}(?:,\d{3})*\.\d{2})"
    ).unwrap();

    // ---- Gas (ENGIE) ----
    // Matched against the uppercased line view.

    pub static ref GAS_HOLDER: Regex = Regex::new(
        r"\n([A-ZÁÉÍÓÚÑ ]{10,50})\n[A-Z ]*(?:CALLE|AVENIDA|PRIMAVERA|UNIVERSIDAD)"
    ).unwrap();

    pub static ref GAS_ADDRESS: Regex = Regex::new(
        r"([A-Z0-9 ,.\-]+\n[A-Z0-9 ,.\-]+\n[A-Z0-9 ,.\-]+)\nC\.P\."
    ).unwrap();

    pub static ref GAS_SERVICE_ACCOUNT_PAIR: Regex = Regex::new(
        r"\b(\d{8,12})\s+(\d{8,12})\b"
    ).unwrap();

    pub static ref GAS_CORRECTED_CONSUMPTION_WINDOW: Regex = Regex::new(
        r"(?s)CONSUMO CORREGIDO(.{0,200})"
    ).unwrap();

    pub static ref GAS_METER_DIGITS: Regex = Regex::new(
        r"\b(\d{7,10})\b"
    ).unwrap();

    pub static ref GAS_PERIOD: Regex = Regex::new(
        r"DE (\d{2}\.\d{2}\.\d{4}) A (\d{2}\.\d{2}\.\d{4})"
    ).unwrap();

    pub static ref GAS_CONSUMPTION_REAL: Regex = Regex::new(
        r"REAL\s*([0-9]+\.[0-9]+)"
    ).unwrap();

    pub static ref GAS_TOTAL: Regex = Regex::new(
        r"MONTO\s*A\s*PAGAR(?:\s*:)?\s*\n?\s*([0-9,]+\.[0-9]+)"
    ).unwrap();
}
