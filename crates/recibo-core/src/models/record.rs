//! Output schema for extracted bill data.
//!
//! The schema is fixed and service-independent: every slot is present in
//! serialized output, holding either the extracted value or a sentinel.

use serde::{Deserialize, Serialize};

/// Sentinel for a field no rule matched.
pub const NOT_EXTRACTED: &str = "NO EXTRAIDO";

/// Sentinel filling every field of an unreadable document.
pub const ERROR_SENTINEL: &str = "ERROR";

/// Category of utility bill, determining which cascade applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    /// Electricity (Comisión Federal de Electricidad).
    Cfe,
    /// Water (Junta de Agua Potable y Alcantarillado de Querétaro).
    Japam,
    /// Natural/LP gas (ENGIE).
    Gas,
    /// Could not be determined.
    Unknown,
}

impl ServiceType {
    /// Wire name, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Cfe => "cfe",
            ServiceType::Japam => "japam",
            ServiceType::Gas => "gas",
            ServiceType::Unknown => "unknown",
        }
    }

    /// Out-of-band hint from tokens in the uploaded filename.
    ///
    /// Consulted only when classification over the text itself is
    /// inconclusive.
    pub fn from_filename_hint(filename: &str) -> Option<Self> {
        let upper = filename.to_uppercase();
        if ["CFE", "LUZ", "ELECTRICIDAD"].iter().any(|t| upper.contains(t)) {
            Some(ServiceType::Cfe)
        } else if ["JAPAM", "AGUA"].iter().any(|t| upper.contains(t)) {
            Some(ServiceType::Japam)
        } else if ["GAS", "ENGIE"].iter().any(|t| upper.contains(t)) {
            Some(ServiceType::Gas)
        } else {
            None
        }
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Working set of schema slots populated by a cascade.
///
/// Slots are optional here; [`Fields::into_record`] backfills anything a
/// cascade left unset with [`NOT_EXTRACTED`] so no key is ever absent from
/// the serialized output.
#[derive(Debug, Clone, Default)]
pub struct Fields {
    pub titular: Option<String>,
    pub direccion: Option<String>,
    pub no_servicio: Option<String>,
    pub cuenta: Option<String>,
    pub no_medidor: Option<String>,
    pub periodo: Option<String>,
    pub total: Option<String>,
    pub consumo: Option<String>,
    pub tarifa: Option<String>,
    pub fecha_pago: Option<String>,
    pub fecha_corte: Option<String>,
    pub rmu: Option<String>,
    pub calidad: Option<String>,
    pub tipo_lectura: Option<String>,
    pub consumo_kwh: Option<String>,
    pub consumo_m3: Option<String>,
}

impl Fields {
    /// Finalize the working set into a complete record.
    pub fn into_record(self, service_type: ServiceType, archivo: impl Into<String>) -> ReciboRecord {
        fn fill(slot: Option<String>) -> String {
            slot.unwrap_or_else(|| NOT_EXTRACTED.to_string())
        }

        ReciboRecord {
            service_type,
            archivo: archivo.into(),
            titular: fill(self.titular),
            direccion: fill(self.direccion),
            no_servicio: fill(self.no_servicio),
            cuenta: fill(self.cuenta),
            no_medidor: fill(self.no_medidor),
            periodo: fill(self.periodo),
            total: fill(self.total),
            consumo: fill(self.consumo),
            tarifa: fill(self.tarifa),
            fecha_pago: fill(self.fecha_pago),
            fecha_corte: fill(self.fecha_corte),
            rmu: fill(self.rmu),
            calidad: fill(self.calidad),
            tipo_lectura: fill(self.tipo_lectura),
            consumo_kwh: fill(self.consumo_kwh),
            consumo_m3: fill(self.consumo_m3),
            error: None,
        }
    }
}

/// The extraction result for one document.
///
/// Created fresh per document, never mutated after the orchestrator
/// returns it. Serializes with every schema key present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReciboRecord {
    pub service_type: ServiceType,
    pub archivo: String,
    pub titular: String,
    pub direccion: String,
    pub no_servicio: String,
    pub cuenta: String,
    pub no_medidor: String,
    pub periodo: String,
    pub total: String,
    pub consumo: String,
    pub tarifa: String,
    pub fecha_pago: String,
    pub fecha_corte: String,
    pub rmu: String,
    pub calidad: String,
    pub tipo_lectura: String,
    pub consumo_kwh: String,
    pub consumo_m3: String,

    /// Human-readable cause when the document could not be processed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReciboRecord {
    /// Record for a document no text could be obtained from.
    ///
    /// Every schema field is set to [`ERROR_SENTINEL`], distinct from
    /// [`NOT_EXTRACTED`], and the cause travels in `error`.
    pub fn unreadable(
        service_type: ServiceType,
        archivo: impl Into<String>,
        cause: impl Into<String>,
    ) -> Self {
        fn sentinel() -> String {
            ERROR_SENTINEL.to_string()
        }

        Self {
            service_type,
            archivo: archivo.into(),
            titular: sentinel(),
            direccion: sentinel(),
            no_servicio: sentinel(),
            cuenta: sentinel(),
            no_medidor: sentinel(),
            periodo: sentinel(),
            total: sentinel(),
            consumo: sentinel(),
            tarifa: sentinel(),
            fecha_pago: sentinel(),
            fecha_corte: sentinel(),
            rmu: sentinel(),
            calidad: sentinel(),
            tipo_lectura: sentinel(),
            consumo_kwh: sentinel(),
            consumo_m3: sentinel(),
            error: Some(cause.into()),
        }
    }

    /// Whether any field was actually extracted.
    pub fn any_extracted(&self) -> bool {
        [
            &self.titular,
            &self.direccion,
            &self.no_servicio,
            &self.cuenta,
            &self.no_medidor,
            &self.periodo,
            &self.total,
            &self.consumo,
            &self.tarifa,
            &self.fecha_pago,
            &self.fecha_corte,
            &self.rmu,
            &self.calidad,
            &self.tipo_lectura,
        ]
        .iter()
        .any(|v| v.as_str() != NOT_EXTRACTED && v.as_str() != ERROR_SENTINEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_into_record_backfills_unset_slots() {
        let mut fields = Fields::default();
        fields.titular = Some("JUAN PEREZ LOPEZ".to_string());

        let record = fields.into_record(ServiceType::Cfe, "recibo.pdf");

        assert_eq!(record.titular, "JUAN PEREZ LOPEZ");
        assert_eq!(record.direccion, NOT_EXTRACTED);
        assert_eq!(record.total, NOT_EXTRACTED);
        assert_eq!(record.consumo_m3, NOT_EXTRACTED);
        assert_eq!(record.error, None);
    }

    #[test]
    fn test_serialized_record_contains_every_schema_key() {
        let record = Fields::default().into_record(ServiceType::Unknown, "x.pdf");
        let json = serde_json::to_value(&record).unwrap();
        let object = json.as_object().unwrap();

        for key in [
            "service_type",
            "archivo",
            "titular",
            "direccion",
            "no_servicio",
            "cuenta",
            "no_medidor",
            "periodo",
            "total",
            "consumo",
            "tarifa",
            "fecha_pago",
            "fecha_corte",
            "rmu",
            "calidad",
            "tipo_lectura",
            "consumo_kwh",
            "consumo_m3",
        ] {
            assert!(object.contains_key(key), "missing schema key {key}");
        }

        // The error key only appears on failure records.
        assert!(!object.contains_key("error"));
        assert_eq!(object["service_type"], "unknown");
        assert_eq!(object["titular"], NOT_EXTRACTED);
    }

    #[test]
    fn test_unreadable_record_uses_error_sentinel() {
        let record = ReciboRecord::unreadable(ServiceType::Cfe, "bad.pdf", "no text");

        assert_eq!(record.titular, ERROR_SENTINEL);
        assert_eq!(record.total, ERROR_SENTINEL);
        assert_eq!(record.error.as_deref(), Some("no text"));
        assert!(!record.any_extracted());
    }

    #[test]
    fn test_filename_hint() {
        assert_eq!(
            ServiceType::from_filename_hint("recibo_cfe_enero.pdf"),
            Some(ServiceType::Cfe)
        );
        assert_eq!(
            ServiceType::from_filename_hint("AGUA-2024.pdf"),
            Some(ServiceType::Japam)
        );
        assert_eq!(
            ServiceType::from_filename_hint("engie_marzo.pdf"),
            Some(ServiceType::Gas)
        );
        assert_eq!(ServiceType::from_filename_hint("documento.pdf"), None);
    }
}
