use colored::Colorize;
use comfy_table::{Cell, Table};
use uuid::Uuid;

use crate::cli::signed_in_context;
use crate::error::{user_message, Result, YaquedoError};
use crate::repository::Repository;

pub async fn show() -> Result<()> {
    let ctx = signed_in_context()?;
    let repo = Repository::new(&ctx.gateway, ctx.user_id);
    let profile = repo.fetch_profile().await?;

    println!("{}", "Perfil".yellow().bold());
    println!("  Nombre:   {}", profile.nombre_completo);
    println!("  Negocio:  {}", profile.nombre_negocio);
    println!("  Cédula:   {}", profile.cedula);
    println!("  Plan:     {}", profile.plan.display_name());
    println!(
        "  Estado:   {}",
        if profile.is_active {
            "activa".green()
        } else {
            "pendiente de activación".red()
        }
    );
    Ok(())
}

pub async fn add_account(nombre: &str, numero: &str, titular: &str) -> Result<()> {
    let ctx = signed_in_context()?;
    let repo = Repository::new(&ctx.gateway, ctx.user_id);
    let account = repo
        .add_account(nombre, numero, titular)
        .await
        .map_err(|e| match e {
            YaquedoError::Gateway { message, .. } => YaquedoError::Other(user_message(&message)),
            other => other,
        })?;
    println!("{}", format!("Cuenta agregada: {}", account.nombre).green());
    Ok(())
}

pub async fn list_accounts() -> Result<()> {
    let ctx = signed_in_context()?;
    let repo = Repository::new(&ctx.gateway, ctx.user_id);
    let accounts = repo.fetch_accounts().await?;

    let mut table = Table::new();
    table.set_header(vec!["Id", "Nombre", "Número", "Titular"]);
    for a in &accounts {
        table.add_row(vec![
            Cell::new(a.id),
            Cell::new(&a.nombre),
            Cell::new(&a.numero_cuenta),
            Cell::new(&a.titular),
        ]);
    }
    println!("Cuentas de recaudo\n{table}");
    Ok(())
}

pub async fn remove_account(id: &str) -> Result<()> {
    let id: Uuid = id
        .parse()
        .map_err(|_| YaquedoError::Validation(format!("Id inválido: {id}")))?;
    let ctx = signed_in_context()?;
    let repo = Repository::new(&ctx.gateway, ctx.user_id);
    repo.remove_account(id).await?;
    println!("Cuenta eliminada.");
    Ok(())
}
