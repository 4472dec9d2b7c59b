//! Gas (ENGIE) field extraction cascade.
//!
//! ENGIE receipts have a rigid block layout, so this cascade leans on
//! positional shapes instead of labels: the holder is the all-caps line
//! before a recognized street token, and service/account numbers travel as
//! one adjacent pair of long digit runs. The whole view is uppercased
//! first; these receipts mix case freely between print runs.

use crate::models::record::{Fields, ServiceType};
use crate::normalize::NormalizedText;

use super::correct::{strip_thousands, title_case};
use super::patterns::{
    GAS_ADDRESS, GAS_CONSUMPTION_REAL, GAS_CORRECTED_CONSUMPTION_WINDOW, GAS_HOLDER,
    GAS_METER_DIGITS, GAS_PERIOD, GAS_SERVICE_ACCOUNT_PAIR, GAS_TOTAL,
};
use super::Cascade;

#[derive(Debug, Clone, Copy, Default)]
pub struct GasCascade;

impl GasCascade {
    pub fn new() -> Self {
        Self
    }
}

impl Cascade for GasCascade {
    fn service_type(&self) -> ServiceType {
        ServiceType::Gas
    }

    fn run(&self, text: &NormalizedText) -> Fields {
        let upper = text.line_view().to_uppercase();
        let mut fields = Fields::default();

        fields.titular = GAS_HOLDER
            .captures(&upper)
            .map(|caps| title_case(caps[1].trim()));

        fields.direccion = GAS_ADDRESS
            .captures(&upper)
            .map(|caps| title_case(&caps[1].replace('\n', " ")));

        if let Some(caps) = GAS_SERVICE_ACCOUNT_PAIR.captures(&upper) {
            fields.no_servicio = Some(caps[1].to_string());
            fields.cuenta = Some(caps[2].to_string());
        }

        // The meter number only lives in the window after the corrected
        // consumption marker; take the last long digit run there.
        fields.no_medidor = GAS_CORRECTED_CONSUMPTION_WINDOW
            .captures(&upper)
            .and_then(|caps| caps.get(1))
            .and_then(|window| {
                GAS_METER_DIGITS
                    .captures_iter(window.as_str())
                    .last()
                    .map(|caps| caps[1].to_string())
            });

        fields.periodo = GAS_PERIOD
            .captures(&upper)
            .map(|caps| format!("{} a {}", &caps[1], &caps[2]));

        let consumo = GAS_CONSUMPTION_REAL
            .captures(&upper)
            .map(|caps| caps[1].to_string());
        fields.consumo_kwh = consumo.clone();
        fields.consumo = consumo;

        fields.total = GAS_TOTAL
            .captures(&upper)
            .map(|caps| strip_thousands(&caps[1]));

        fields.calidad = Some("BÁSICO".to_string());
        fields.tipo_lectura = Some("CORREGIDO".to_string());

        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run_cascade(text: &str) -> Fields {
        GasCascade::new().run(&NormalizedText::new(text))
    }

    #[test]
    fn test_holder_before_street_token() {
        let text = "ENGIE MEXICO\nROBERTO DIAZ MENDOZA\nCALLE PRIMAVERA 23\n";
        let fields = run_cascade(text);
        assert_eq!(fields.titular.as_deref(), Some("Roberto Diaz Mendoza"));
    }

    #[test]
    fn test_address_three_lines_before_postal_code() {
        let text = concat!(
            "ENGIE\n",
            "CALLE PRIMAVERA 23\n",
            "COL. JARDINES\n",
            "QUERETARO, QRO.\n",
            "C.P. 76100\n",
        );
        let fields = run_cascade(text);
        assert_eq!(
            fields.direccion.as_deref(),
            Some("Calle Primavera 23 Col. Jardines Queretaro, Qro.")
        );
    }

    #[test]
    fn test_service_and_account_assigned_positionally() {
        let fields = run_cascade("numeros 123456789 987654321 referencia");
        assert_eq!(fields.no_servicio.as_deref(), Some("123456789"));
        assert_eq!(fields.cuenta.as_deref(), Some("987654321"));
    }

    #[test]
    fn test_meter_taken_from_corrected_consumption_window() {
        let text = "CONSUMO CORREGIDO 12.5 M3 LECTURA 4455667 MEDIDOR 7788990\nOTRO 1234567";
        let fields = run_cascade(text);
        assert_eq!(fields.no_medidor.as_deref(), Some("1234567"));
    }

    #[test]
    fn test_meter_absent_without_marker() {
        let fields = run_cascade("MEDIDOR 7788990");
        assert_eq!(fields.no_medidor, None);
    }

    #[test]
    fn test_period_and_consumption() {
        let text = "PERIODO DE 01.03.2024 A 31.03.2024\nCONSUMO REAL 42.7 M3";
        let fields = run_cascade(text);
        assert_eq!(fields.periodo.as_deref(), Some("01.03.2024 a 31.03.2024"));
        assert_eq!(fields.consumo.as_deref(), Some("42.7"));
        assert_eq!(fields.consumo_kwh.as_deref(), Some("42.7"));
    }

    #[test]
    fn test_total_strips_thousands_separators() {
        let fields = run_cascade("MONTO A PAGAR: 1,245.80");
        assert_eq!(fields.total.as_deref(), Some("1245.80"));
    }

    #[test]
    fn test_fixed_reading_fields() {
        let fields = run_cascade("ENGIE recibo de gas natural");
        assert_eq!(fields.calidad.as_deref(), Some("BÁSICO"));
        assert_eq!(fields.tipo_lectura.as_deref(), Some("CORREGIDO"));
    }
}
