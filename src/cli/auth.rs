use std::io::Write;

use colored::Colorize;
use zeroize::Zeroize;

use crate::error::{Result, YaquedoError};
use crate::gateway::Gateway;
use crate::models::Plan;
use crate::session::{SessionStore, SignUpFields};
use crate::settings::load_settings;

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

// -- client-side validation: these block the action locally, no request is
// -- made when they fail.

fn validate_email(email: &str) -> Result<()> {
    if email.contains('@') && email.contains('.') && !email.contains(char::is_whitespace) {
        Ok(())
    } else {
        Err(YaquedoError::Validation(format!("Correo inválido: {email}")))
    }
}

fn validate_password(password: &str, confirm: &str) -> Result<()> {
    if password.len() < 6 {
        return Err(YaquedoError::Validation(
            "La contraseña debe tener al menos 6 caracteres.".to_string(),
        ));
    }
    if password != confirm {
        return Err(YaquedoError::Validation(
            "Las contraseñas no coinciden.".to_string(),
        ));
    }
    Ok(())
}

fn validate_cedula(cedula: &str) -> Result<()> {
    if !cedula.is_empty() && cedula.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(YaquedoError::Validation(
            "La cédula debe contener solo dígitos.".to_string(),
        ))
    }
}

fn parse_plan(raw: &str) -> Result<Plan> {
    match raw.to_lowercase().as_str() {
        "basico" | "básico" | "" => Ok(Plan::Basico),
        "profesional" => Ok(Plan::Profesional),
        "negocios" => Ok(Plan::Negocios),
        other => Err(YaquedoError::Validation(format!(
            "Plan desconocido: {other} (usa basico, profesional o negocios)"
        ))),
    }
}

pub async fn login(email: Option<String>) -> Result<()> {
    let settings = load_settings();
    let gateway = Gateway::new(&settings);
    let email = match email {
        Some(e) => e,
        None => prompt("Correo: ")?,
    };
    validate_email(&email)?;
    let mut password = rpassword::prompt_password("Contraseña: ")?;
    let store = SessionStore::new();
    let sub = store.subscribe(Box::new(|state| log::info!("auth state: {state:?}")));
    let outcome = store.sign_in(&gateway, &email, &password).await;
    password.zeroize();
    store.unsubscribe(sub);
    let profile = outcome?;
    println!(
        "{}",
        format!("Hola, {}. Sesión iniciada.", profile.nombre_completo).green()
    );
    if !profile.onboarding_completed {
        println!("Abre `yaquedo dashboard` para comenzar el recorrido de bienvenida.");
    }
    Ok(())
}

pub async fn signup() -> Result<()> {
    let email = prompt("Correo: ")?;
    validate_email(&email)?;
    let nombre_completo = prompt("Nombre completo: ")?;
    let nombre_negocio = prompt("Nombre del negocio: ")?;
    let cedula = prompt("Cédula: ")?;
    validate_cedula(&cedula)?;
    let plan = parse_plan(&prompt("Plan [basico/profesional/negocios]: ")?)?;

    let mut password = rpassword::prompt_password("Contraseña: ")?;
    let mut confirm = rpassword::prompt_password("Confirma la contraseña: ")?;
    let checked = validate_password(&password, &confirm);
    confirm.zeroize();
    if let Err(e) = checked {
        password.zeroize();
        return Err(e);
    }

    let settings = load_settings();
    let gateway = Gateway::new(&settings);
    let store = SessionStore::new();
    let fields = SignUpFields { nombre_completo, nombre_negocio, cedula, plan };
    let outcome = store.sign_up(&gateway, &email, &password, &fields).await;
    password.zeroize();
    outcome?;
    println!(
        "{}",
        "Cuenta creada. Quedará activa cuando el equipo la apruebe.".green()
    );
    Ok(())
}

pub async fn logout() -> Result<()> {
    let settings = load_settings();
    if settings.session.is_none() {
        println!("No había una sesión activa.");
        return Ok(());
    }
    let gateway = Gateway::new(&settings);
    let store = SessionStore::restore(settings.session.as_ref());
    let sub = store.subscribe(Box::new(|state| log::info!("auth state: {state:?}")));
    let outcome = store.sign_out(&gateway).await;
    store.unsubscribe(sub);
    outcome?;
    println!("Sesión cerrada.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ana@example.com").is_ok());
        assert!(validate_email("sin-arroba.com").is_err());
        assert!(validate_email("con espacios@x.co").is_err());
    }

    #[test]
    fn test_validate_password_mismatch_blocks() {
        assert!(validate_password("secreto1", "secreto1").is_ok());
        assert!(validate_password("secreto1", "secreto2").is_err());
        assert!(validate_password("corta", "corta").is_err());
    }

    #[test]
    fn test_validate_cedula_digits_only() {
        assert!(validate_cedula("1032456789").is_ok());
        assert!(validate_cedula("10.324.567").is_err());
        assert!(validate_cedula("").is_err());
    }

    #[test]
    fn test_parse_plan() {
        assert_eq!(parse_plan("basico").unwrap(), Plan::Basico);
        assert_eq!(parse_plan("Básico").unwrap(), Plan::Basico);
        assert_eq!(parse_plan("").unwrap(), Plan::Basico); // default on enter
        assert_eq!(parse_plan("negocios").unwrap(), Plan::Negocios);
        assert!(parse_plan("premium").is_err());
    }
}
