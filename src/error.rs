use thiserror::Error;

#[derive(Error, Debug)]
pub enum YaquedoError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("{0}")]
    Auth(String),

    #[error("Gateway rejected the request ({status}): {message}")]
    Gateway { status: u16, message: String },

    #[error("Tu cuenta está pendiente de activación. Contacta a soporte.")]
    AccessDenied,

    #[error("{0}")]
    Validation(String),

    #[error("No hay una sesión activa. Inicia sesión con `yaquedo login`.")]
    NotSignedIn,

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, YaquedoError>;

/// Map a raw gateway error body to the message shown to the user.
///
/// The gateway reports failures as free text, so this is an explicit
/// pattern-match on known phrases with a generic fallback for anything new.
pub fn user_message(raw: &str) -> String {
    let lower = raw.to_lowercase();
    if lower.contains("invalid login credentials") {
        return "Correo o contraseña incorrectos.".to_string();
    }
    if lower.contains("user already registered") || lower.contains("email_exists") {
        return "Ya existe una cuenta con este correo.".to_string();
    }
    if lower.contains("duplicate key") && lower.contains("cedula") {
        return "Esta cédula ya está registrada.".to_string();
    }
    if lower.contains("email not confirmed") {
        return "Confirma tu correo antes de iniciar sesión.".to_string();
    }
    if lower.contains("password") && lower.contains("at least") {
        return "La contraseña debe tener al menos 6 caracteres.".to_string();
    }
    "Ocurrió un error. Intenta de nuevo.".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_known_auth_failures() {
        assert_eq!(
            user_message("Invalid login credentials"),
            "Correo o contraseña incorrectos."
        );
        assert_eq!(
            user_message("User already registered"),
            "Ya existe una cuenta con este correo."
        );
    }

    #[test]
    fn test_maps_duplicate_cedula() {
        let raw = r#"duplicate key value violates unique constraint "profiles_cedula_key""#;
        assert_eq!(user_message(raw), "Esta cédula ya está registrada.");
    }

    #[test]
    fn test_unknown_text_falls_back_to_generic() {
        assert_eq!(user_message("something brand new"), "Ocurrió un error. Intenta de nuevo.");
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert_eq!(
            user_message("INVALID LOGIN CREDENTIALS"),
            "Correo o contraseña incorrectos."
        );
    }
}
