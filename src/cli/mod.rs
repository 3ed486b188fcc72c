pub mod auth;
pub mod dashboard;
pub mod export;
pub mod profile;
pub mod receipts;
pub mod tour_cmd;
pub mod usage;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::error::{Result, YaquedoError};
use crate::filters::{DateRange, StatusFilter};
use crate::gateway::Gateway;
use crate::settings::{load_settings, Settings};

/// Everything a signed-in command needs: settings, an authenticated gateway
/// client, and the session's user id.
pub(crate) struct Context {
    pub settings: Settings,
    pub gateway: Gateway,
    pub user_id: Uuid,
}

pub(crate) fn signed_in_context() -> Result<Context> {
    let settings = load_settings();
    let session = settings.session.clone().ok_or(YaquedoError::NotSignedIn)?;
    let gateway = Gateway::new(&settings);
    Ok(Context { settings, gateway, user_id: session.user_id })
}

/// Parse a `--status` value. Accepts the English keys and their Spanish
/// spellings.
pub(crate) fn parse_status(raw: &str) -> Result<StatusFilter> {
    match raw.to_lowercase().as_str() {
        "all" | "todos" => Ok(StatusFilter::All),
        "valid" | "validos" | "válidos" => Ok(StatusFilter::Valid),
        "invalid" | "invalidos" | "inválidos" => Ok(StatusFilter::Invalid),
        other => Err(YaquedoError::Validation(format!(
            "Estado desconocido: {other} (usa all, valid o invalid)"
        ))),
    }
}

/// Parse `--from`/`--to` into an inclusive range. `--from` alone means that
/// single day; `--to` alone is rejected before anything else runs.
pub(crate) fn parse_range(
    from: Option<&str>,
    to: Option<&str>,
) -> Result<Option<DateRange>> {
    let parse = |raw: &str| {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            YaquedoError::Validation(format!("Fecha inválida: {raw} (usa YYYY-MM-DD)"))
        })
    };
    match (from, to) {
        (None, None) => Ok(None),
        (Some(f), None) => Ok(Some(DateRange { from: parse(f)?, to: None })),
        (Some(f), Some(t)) => Ok(Some(DateRange {
            from: parse(f)?,
            to: Some(parse(t)?),
        })),
        (None, Some(_)) => Err(YaquedoError::Validation(
            "--to requiere --from".to_string(),
        )),
    }
}

#[derive(Parser)]
#[command(
    name = "yaquedo",
    about = "Ya Quedó: valida los comprobantes de pago de tu negocio."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inicia sesión con tu correo y contraseña.
    Login {
        /// Correo de la cuenta (se pregunta si se omite)
        #[arg(long)]
        email: Option<String>,
    },
    /// Crea una cuenta nueva con los datos del negocio.
    Signup,
    /// Cierra la sesión actual.
    Logout,
    /// Abre el panel interactivo (comando predeterminado).
    Dashboard,
    /// Lista los comprobantes, con filtros opcionales.
    List {
        /// Búsqueda por beneficiario, banco, número o referencia
        #[arg(long)]
        search: Option<String>,
        /// Estado: all, valid o invalid
        #[arg(long)]
        status: Option<String>,
        /// Desde: YYYY-MM-DD
        #[arg(long = "from")]
        from_date: Option<String>,
        /// Hasta: YYYY-MM-DD (si se omite, se usa --from)
        #[arg(long = "to")]
        to_date: Option<String>,
    },
    /// Muestra estadísticas sobre los comprobantes filtrados.
    Stats {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long = "from")]
        from_date: Option<String>,
        #[arg(long = "to")]
        to_date: Option<String>,
    },
    /// Elimina un comprobante por id.
    Delete {
        /// Id del comprobante
        id: String,
    },
    /// Edita las notas de un comprobante.
    Edit {
        /// Id del comprobante
        id: String,
        /// Nuevo texto de las notas
        #[arg(long)]
        notas: String,
    },
    /// Exporta los comprobantes a un archivo XLSX.
    Export {
        #[arg(long = "from")]
        from_date: Option<String>,
        #[arg(long = "to")]
        to_date: Option<String>,
        /// Ruta del archivo de salida
        #[arg(long)]
        output: Option<String>,
    },
    /// Muestra el uso del mes frente a la cuota de tu plan.
    Usage,
    /// Muestra el perfil de la cuenta.
    Profile,
    /// Administra las cuentas de recaudo.
    Accounts {
        #[command(subcommand)]
        command: AccountsCommands,
    },
    /// Reinicia el recorrido de bienvenida en el panel.
    Tour,
}

#[derive(Subcommand)]
pub enum AccountsCommands {
    /// Agrega una cuenta de recaudo.
    Add {
        /// Nombre de la cuenta, p. ej. 'Cuenta principal'
        nombre: String,
        /// Número de la cuenta
        #[arg(long)]
        numero: String,
        /// Titular de la cuenta
        #[arg(long)]
        titular: String,
    },
    /// Lista las cuentas de recaudo.
    List,
    /// Elimina una cuenta de recaudo por id.
    Remove {
        /// Id de la cuenta
        id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_accepts_both_languages() {
        assert_eq!(parse_status("all").unwrap(), StatusFilter::All);
        assert_eq!(parse_status("VALID").unwrap(), StatusFilter::Valid);
        assert_eq!(parse_status("inválidos").unwrap(), StatusFilter::Invalid);
        assert!(parse_status("maybe").is_err());
    }

    #[test]
    fn test_parse_range_from_alone_is_single_day() {
        let r = parse_range(Some("2024-01-05"), None).unwrap().unwrap();
        assert_eq!(r.effective_to(), r.from);
    }

    #[test]
    fn test_parse_range_rejects_to_without_from() {
        assert!(parse_range(None, Some("2024-01-05")).is_err());
    }

    #[test]
    fn test_parse_range_rejects_malformed_dates() {
        assert!(parse_range(Some("05/01/2024"), None).is_err());
        assert!(parse_range(Some("2024-01-05"), Some("ayer")).is_err());
    }
}
