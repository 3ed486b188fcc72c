use std::path::PathBuf;

use colored::Colorize;

use crate::cli::{parse_range, signed_in_context};
use crate::error::Result;
use crate::export::{export_xlsx, ExportOptions};
use crate::fmt;
use crate::repository::Repository;

pub async fn run(
    from_date: Option<String>,
    to_date: Option<String>,
    output: Option<String>,
) -> Result<()> {
    // Malformed dates are rejected before any data is fetched.
    let range = parse_range(from_date.as_deref(), to_date.as_deref())?;
    let ctx = signed_in_context()?;
    let repo = Repository::new(&ctx.gateway, ctx.user_id);
    let receipts = repo.fetch_receipts().await?;

    let summary = export_xlsx(
        &receipts,
        &ExportOptions { range, output: output.map(PathBuf::from) },
    )?;
    println!(
        "{}",
        format!(
            "Exportados {} comprobantes ({}) a {}",
            summary.records,
            fmt::money(summary.valor_total),
            summary.path.display()
        )
        .green()
    );
    Ok(())
}
