use std::path::PathBuf;

use chrono::{DateTime, Local};
use rust_xlsxwriter::{Format, Workbook};

use crate::error::Result;
use crate::filters::{apply_filters, DateRange, FilterState};
use crate::fmt;
use crate::models::Comprobante;

pub struct ExportOptions {
    /// Export-specific range, applied on top of whatever list the caller
    /// already filtered — not instead of it.
    pub range: Option<DateRange>,
    pub output: Option<PathBuf>,
}

pub struct ExportSummary {
    pub path: PathBuf,
    pub records: usize,
    pub valor_total: f64,
}

const HEADERS: &[&str] = &[
    "#",
    "Beneficiario",
    "Banco emisor",
    "Fecha",
    "Hora",
    "Valor",
    "Valor (numérico)",
    "No. comprobante",
    "No. referencia",
    "Estado",
    "Moneda",
    "Usuario",
    "Creado",
];

/// One spreadsheet row, already shaped for display. Missing optionals become
/// the literal "N/A", never empty cells.
struct ExportRow {
    ordinal: u32,
    beneficiario: String,
    banco: String,
    fecha: String,
    hora: String,
    valor_formateado: String,
    valor: f64,
    numero: String,
    referencia: String,
    estado: String,
    moneda: String,
    user_id: String,
    creado: String,
}

fn na(field: Option<&str>) -> String {
    match field {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => "N/A".to_string(),
    }
}

fn shape_row(ordinal: u32, r: &Comprobante) -> ExportRow {
    ExportRow {
        ordinal,
        beneficiario: na(r.nombre_beneficiario.as_deref()),
        banco: r.banco_emisor.clone(),
        fecha: fmt::fecha_display(&r.fecha),
        hora: na(r.hora.as_deref()),
        valor_formateado: fmt::money(r.valor_transferencia),
        valor: r.valor_transferencia,
        numero: na(r.numero_comprobante.as_deref()),
        referencia: na(r.numero_referencia.as_deref()),
        estado: if r.es_valido { "Válido" } else { "Inválido" }.to_string(),
        moneda: r.moneda.clone(),
        user_id: r.user_id.to_string(),
        creado: fmt::timestamp_display(&r.created_at),
    }
}

pub fn range_description(range: Option<&DateRange>) -> String {
    match range {
        None => "Todos los registros".to_string(),
        Some(r) => format!(
            "{} - {}",
            r.from.format("%d/%m/%Y"),
            r.effective_to().format("%d/%m/%Y")
        ),
    }
}

pub fn default_filename(now: DateTime<Local>) -> String {
    format!("comprobantes-{}.xlsx", now.format("%Y%m%d-%H%M"))
}

fn build_workbook(
    rows: &[ExportRow],
    valor_total: f64,
    range_desc: &str,
    exported_at: DateTime<Local>,
) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Comprobantes")?;
    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }
    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_number(r, 0, row.ordinal as f64)?;
        sheet.write_string(r, 1, &row.beneficiario)?;
        sheet.write_string(r, 2, &row.banco)?;
        sheet.write_string(r, 3, &row.fecha)?;
        sheet.write_string(r, 4, &row.hora)?;
        sheet.write_string(r, 5, &row.valor_formateado)?;
        sheet.write_number(r, 6, row.valor)?;
        sheet.write_string(r, 7, &row.numero)?;
        sheet.write_string(r, 8, &row.referencia)?;
        sheet.write_string(r, 9, &row.estado)?;
        sheet.write_string(r, 10, &row.moneda)?;
        sheet.write_string(r, 11, &row.user_id)?;
        sheet.write_string(r, 12, &row.creado)?;
    }

    let validos = rows.iter().filter(|r| r.estado == "Válido").count();
    let summary = workbook.add_worksheet();
    summary.set_name("Resumen")?;
    let lines: Vec<(&str, String)> = vec![
        ("Total de comprobantes", rows.len().to_string()),
        ("Válidos", validos.to_string()),
        ("Inválidos", (rows.len() - validos).to_string()),
        ("Valor total válido", fmt::money(valor_total)),
        ("Exportado", exported_at.format("%d/%m/%Y %H:%M").to_string()),
        ("Rango", range_desc.to_string()),
    ];
    for (i, (label, value)) in lines.iter().enumerate() {
        summary.write_string_with_format(i as u32, 0, *label, &bold)?;
        summary.write_string(i as u32, 1, value)?;
    }

    // Built fully in memory; nothing touches disk until the buffer is
    // complete, so a failure here can never leave a partial file behind.
    Ok(workbook.save_to_buffer()?)
}

/// Export the given (already dashboard-filtered) receipts to an XLSX file
/// with a data sheet and a summary sheet.
pub fn export_xlsx(receipts: &[Comprobante], opts: &ExportOptions) -> Result<ExportSummary> {
    let filtered = match opts.range {
        Some(range) => apply_filters(
            receipts,
            &FilterState { date_range: Some(range), ..Default::default() },
        ),
        None => receipts.to_vec(),
    };

    let rows: Vec<ExportRow> = filtered
        .iter()
        .enumerate()
        .map(|(i, r)| shape_row((i + 1) as u32, r))
        .collect();
    let valor_total: f64 = filtered
        .iter()
        .filter(|r| r.es_valido)
        .map(|r| r.valor_transferencia)
        .sum();

    let now = Local::now();
    let desc = range_description(opts.range.as_ref());
    let buffer = build_workbook(&rows, valor_total, &desc, now)?;

    let path = opts
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(default_filename(now)));
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&path, buffer)?;

    Ok(ExportSummary { path, records: rows.len(), valor_total })
}
