use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One validated bank-transfer claim, as stored by the gateway.
///
/// Column names are the gateway's fixed schema. `fecha` and the timestamps
/// stay raw strings: rows ingested upstream occasionally carry dates this
/// client cannot parse, and those must be excluded at aggregation time rather
/// than rejected at deserialization time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comprobante {
    pub id: Uuid,
    pub user_id: Uuid,
    pub banco_emisor: String,
    pub tipo_comprobante: Option<String>,
    pub numero_comprobante: Option<String>,
    pub numero_referencia: Option<String>,
    pub fecha: String,
    pub hora: Option<String>,
    pub valor_transferencia: f64,
    #[serde(default = "default_moneda")]
    pub moneda: String,
    pub nombre_beneficiario: Option<String>,
    pub cuenta_origen: Option<String>,
    pub cuenta_destino: Option<String>,
    pub estado_transaccion: Option<String>,
    pub notas: Option<String>,
    /// Set by the upstream validation process. Read-only here.
    pub es_valido: bool,
    pub imagen_url: Option<String>,
    pub imagen_nombre: Option<String>,
    pub imagen_path: Option<String>,
    pub imagen_size: Option<i64>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

fn default_moneda() -> String {
    "COP".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Basico,
    Profesional,
    Negocios,
}

impl Plan {
    /// Monthly receipt quota. `None` means unlimited.
    pub fn monthly_quota(self) -> Option<u32> {
        match self {
            Plan::Basico => Some(150),
            Plan::Profesional => Some(600),
            Plan::Negocios => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Plan::Basico => "Básico",
            Plan::Profesional => "Profesional",
            Plan::Negocios => "Negocios",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub nombre_completo: String,
    pub nombre_negocio: String,
    pub cedula: String,
    pub plan: Plan,
    pub onboarding_completed: bool,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// A named collection account the merchant receives payments into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: Uuid,
    pub user_id: Uuid,
    pub nombre: String,
    pub numero_cuenta: String,
    pub titular: String,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_quotas() {
        assert_eq!(Plan::Basico.monthly_quota(), Some(150));
        assert_eq!(Plan::Profesional.monthly_quota(), Some(600));
        assert_eq!(Plan::Negocios.monthly_quota(), None);
    }

    #[test]
    fn test_plan_parses_from_lowercase() {
        let p: Plan = serde_json::from_str("\"negocios\"").unwrap();
        assert_eq!(p, Plan::Negocios);
    }

    #[test]
    fn test_comprobante_deserializes_sparse_row() {
        let row = serde_json::json!({
            "id": "8f5e1f60-17c2-4a0a-9a2d-0a8e5a8f0c01",
            "user_id": "0e1c2b3a-4d5e-6f70-8192-a3b4c5d6e7f8",
            "banco_emisor": "Nequi",
            "tipo_comprobante": null,
            "numero_comprobante": null,
            "numero_referencia": null,
            "fecha": "2024-01-05",
            "hora": null,
            "valor_transferencia": 150000.0,
            "nombre_beneficiario": null,
            "cuenta_origen": null,
            "cuenta_destino": null,
            "estado_transaccion": null,
            "notas": null,
            "es_valido": true,
            "imagen_url": null,
            "imagen_nombre": null,
            "imagen_path": null,
            "imagen_size": null,
            "created_at": "2024-01-05T10:00:00+00:00",
            "updated_at": null
        });
        let c: Comprobante = serde_json::from_value(row).unwrap();
        assert_eq!(c.moneda, "COP"); // defaulted when the column is absent
        assert!(c.es_valido);
        assert!(c.numero_comprobante.is_none());
    }
}
