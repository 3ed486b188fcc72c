use colored::Colorize;
use comfy_table::{Cell, Table};
use uuid::Uuid;

use crate::cli::{parse_range, parse_status, signed_in_context};
use crate::error::{Result, YaquedoError};
use crate::filters::{apply_filters, compute_stats, FilterState, StatusFilter};
use crate::fmt;
use crate::repository::Repository;

fn build_filters(
    search: Option<String>,
    status: Option<String>,
    from_date: Option<String>,
    to_date: Option<String>,
) -> Result<FilterState> {
    Ok(FilterState {
        search: search.unwrap_or_default(),
        status: match status {
            Some(raw) => parse_status(&raw)?,
            None => StatusFilter::All,
        },
        date_range: parse_range(from_date.as_deref(), to_date.as_deref())?,
    })
}

pub async fn list(
    search: Option<String>,
    status: Option<String>,
    from_date: Option<String>,
    to_date: Option<String>,
) -> Result<()> {
    let filters = build_filters(search, status, from_date, to_date)?;
    let ctx = signed_in_context()?;
    let repo = Repository::new(&ctx.gateway, ctx.user_id);
    let all = repo.fetch_receipts().await?;
    let rows = apply_filters(&all, &filters);

    let mut table = Table::new();
    table.set_header(vec![
        "Fecha",
        "Beneficiario",
        "Banco",
        "Valor",
        "Estado",
        "No. comprobante",
        "Referencia",
    ]);
    for r in &rows {
        table.add_row(vec![
            Cell::new(fmt::fecha_display(&r.fecha)),
            Cell::new(r.nombre_beneficiario.as_deref().unwrap_or("N/A")),
            Cell::new(&r.banco_emisor),
            Cell::new(fmt::money(r.valor_transferencia)),
            Cell::new(if r.es_valido { "Válido" } else { "Inválido" }),
            Cell::new(r.numero_comprobante.as_deref().unwrap_or("N/A")),
            Cell::new(r.numero_referencia.as_deref().unwrap_or("N/A")),
        ]);
    }
    println!("{table}");
    println!(
        "{} de {} comprobantes",
        rows.len().to_string().bold(),
        all.len()
    );
    Ok(())
}

pub async fn stats(
    search: Option<String>,
    status: Option<String>,
    from_date: Option<String>,
    to_date: Option<String>,
) -> Result<()> {
    let filters = build_filters(search, status, from_date, to_date)?;
    let ctx = signed_in_context()?;
    let repo = Repository::new(&ctx.gateway, ctx.user_id);
    let all = repo.fetch_receipts().await?;
    let stats = compute_stats(&apply_filters(&all, &filters));

    println!("{}", "Estadísticas".yellow().bold());
    println!("  Comprobantes:   {}", stats.total);
    println!("  Válidos:        {}", stats.validos.to_string().green());
    println!("  Inválidos:      {}", stats.invalidos.to_string().red());
    println!("  Valor validado: {}", fmt::money(stats.valor_total).bold());
    println!("  Banco más usado: {}", stats.banco_mas_usado);
    Ok(())
}

pub async fn edit_notes(id: &str, notas: &str) -> Result<()> {
    let id: Uuid = id
        .parse()
        .map_err(|_| YaquedoError::Validation(format!("Id inválido: {id}")))?;
    let ctx = signed_in_context()?;
    let repo = Repository::new(&ctx.gateway, ctx.user_id);
    let patch = serde_json::json!({ "notas": notas });
    let rows = repo.update_receipt(id, &patch).await?;
    println!("Notas actualizadas. {} comprobantes en total.", rows.len());
    Ok(())
}

pub async fn delete(id: &str) -> Result<()> {
    let id: Uuid = id
        .parse()
        .map_err(|_| YaquedoError::Validation(format!("Id inválido: {id}")))?;
    let ctx = signed_in_context()?;
    let repo = Repository::new(&ctx.gateway, ctx.user_id);
    let remaining = repo.delete_receipt(id).await?;
    println!(
        "Comprobante eliminado. Quedan {} comprobantes.",
        remaining.len()
    );
    Ok(())
}
