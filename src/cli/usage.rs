use colored::Colorize;

use crate::cli::signed_in_context;
use crate::error::Result;
use crate::repository::Repository;
use crate::usage::fetch_usage;

pub async fn run() -> Result<()> {
    let ctx = signed_in_context()?;
    let repo = Repository::new(&ctx.gateway, ctx.user_id);
    let profile = repo.fetch_profile().await?;
    let today = chrono::Local::now().date_naive();
    let report = fetch_usage(&ctx.gateway, ctx.user_id, profile.plan, today).await;

    println!("{}", "Uso del mes".yellow().bold());
    println!("  Plan:          {}", report.plan.display_name());
    match report.quota {
        Some(quota) => {
            println!("  Comprobantes:  {} de {}", report.total, quota);
            println!("  Uso:           {:.0} %", report.pct);
        }
        None => {
            println!("  Comprobantes:  {} (sin límite)", report.total);
        }
    }
    println!("  Válidos:       {}", report.validos.to_string().green());
    println!("  Inválidos:     {}", report.invalidos.to_string().red());
    Ok(())
}
