//! Water (JAPAM) field extraction cascade.
//!
//! JAPAM receipts expose a deliberately sparse schema: holder, service
//! number, cubic-meter consumption and total. Everything else stays at the
//! sentinel.

use crate::models::record::{Fields, ServiceType};
use crate::normalize::NormalizedText;

use super::correct::strip_thousands;
use super::patterns::{
    JAPAM_CONSUMPTION_M3, JAPAM_HOLDER, JAPAM_SERVICE, JAPAM_TOTAL_CURRENCY, JAPAM_TOTAL_LABELED,
};
use super::Cascade;

#[derive(Debug, Clone, Copy, Default)]
pub struct JapamCascade;

impl JapamCascade {
    pub fn new() -> Self {
        Self
    }
}

impl Cascade for JapamCascade {
    fn service_type(&self) -> ServiceType {
        ServiceType::Japam
    }

    fn run(&self, text: &NormalizedText) -> Fields {
        let view = text.line_view();
        let mut fields = Fields::default();

        fields.titular = JAPAM_HOLDER
            .captures(view)
            .map(|caps| caps[1].trim().to_string());
        fields.no_servicio = JAPAM_SERVICE.captures(view).map(|caps| caps[1].to_string());

        let consumo = JAPAM_CONSUMPTION_M3
            .captures(view)
            .map(|caps| caps[1].to_string());
        fields.consumo_m3 = consumo.clone();
        fields.consumo_kwh = consumo.clone();
        fields.consumo = consumo;

        fields.total = JAPAM_TOTAL_LABELED
            .captures(view)
            .or_else(|| JAPAM_TOTAL_CURRENCY.captures(view))
            .map(|caps| strip_thousands(&caps[1]));

        fields.calidad = Some("BÁSICO".to_string());
        fields.tipo_lectura = Some("BÁSICO".to_string());

        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::NOT_EXTRACTED;
    use pretty_assertions::assert_eq;

    fn run_cascade(text: &str) -> Fields {
        JapamCascade::new().run(&NormalizedText::new(text))
    }

    #[test]
    fn test_basic_water_receipt() {
        let text = concat!(
            "JAPAM Junta de Agua Potable\n",
            "Titular: ANA GOMEZ RIOS\n",
            "No. Servicio: QRO-00123\n",
            "Consumo: 18 m3\n",
            "Total $ 345.60\n",
        );
        let fields = run_cascade(text);

        assert_eq!(fields.titular.as_deref(), Some("ANA GOMEZ RIOS"));
        assert_eq!(fields.no_servicio.as_deref(), Some("QRO-00123"));
        assert_eq!(fields.consumo.as_deref(), Some("18"));
        assert_eq!(fields.consumo_m3.as_deref(), Some("18"));
        assert_eq!(fields.total.as_deref(), Some("345.60"));
        assert_eq!(fields.calidad.as_deref(), Some("BÁSICO"));
    }

    #[test]
    fn test_total_currency_fallback() {
        let text = "JAPAM\nimporte del periodo $ 1,234.50\n";
        let fields = run_cascade(text);
        assert_eq!(fields.total.as_deref(), Some("1234.50"));
    }

    #[test]
    fn test_unimplemented_slots_backfill_to_sentinel() {
        let record = run_cascade("JAPAM\nTitular: ANA GOMEZ\n")
            .into_record(ServiceType::Japam, "agua.pdf");

        assert_eq!(record.titular, "ANA GOMEZ");
        assert_eq!(record.direccion, NOT_EXTRACTED);
        assert_eq!(record.no_medidor, NOT_EXTRACTED);
        assert_eq!(record.tarifa, NOT_EXTRACTED);
        assert_eq!(record.fecha_pago, NOT_EXTRACTED);
        assert_eq!(record.rmu, NOT_EXTRACTED);
        assert_eq!(record.calidad, "BÁSICO");
    }
}
