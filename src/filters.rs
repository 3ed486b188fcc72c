use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};

use crate::fmt::parse_fecha;
use crate::models::Comprobante;

// ---------------------------------------------------------------------------
// Filter state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Valid,
    Invalid,
}

impl StatusFilter {
    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "Todos",
            StatusFilter::Valid => "Válidos",
            StatusFilter::Invalid => "Inválidos",
        }
    }

    /// Cycle order used by the dashboard status key.
    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Valid,
            StatusFilter::Valid => StatusFilter::Invalid,
            StatusFilter::Invalid => StatusFilter::All,
        }
    }
}

/// Inclusive calendar-day interval. A missing `to` means the single day `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn effective_to(&self) -> NaiveDate {
        self.to.unwrap_or(self.from)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.from && day <= self.effective_to()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub search: String,
    pub status: StatusFilter,
    pub date_range: Option<DateRange>,
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

fn matches_date(receipt: &Comprobante, range: &DateRange) -> bool {
    match parse_fecha(&receipt.fecha) {
        Some(day) => range.contains(day),
        None => {
            // Excluded, but never silently and never fatally.
            log::error!(
                "comprobante {} has unparseable fecha {:?}; excluded from filter",
                receipt.id,
                receipt.fecha
            );
            false
        }
    }
}

fn field_contains(field: Option<&str>, needle: &str) -> bool {
    field.map(|f| f.to_lowercase().contains(needle)).unwrap_or(false)
}

fn matches_search(receipt: &Comprobante, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    field_contains(receipt.nombre_beneficiario.as_deref(), &needle)
        || receipt.banco_emisor.to_lowercase().contains(&needle)
        || field_contains(receipt.numero_comprobante.as_deref(), &needle)
        || field_contains(receipt.numero_referencia.as_deref(), &needle)
}

fn matches_status(receipt: &Comprobante, status: StatusFilter) -> bool {
    match status {
        StatusFilter::All => true,
        StatusFilter::Valid => receipt.es_valido,
        StatusFilter::Invalid => !receipt.es_valido,
    }
}

/// Apply all three predicates (ANDed) to the full list. Pure: the input is
/// never mutated and reapplying the same filters is idempotent.
pub fn apply_filters(receipts: &[Comprobante], filters: &FilterState) -> Vec<Comprobante> {
    let term = filters.search.trim();
    receipts
        .iter()
        .filter(|r| match &filters.date_range {
            Some(range) => matches_date(r, range),
            None => true,
        })
        .filter(|r| matches_search(r, term))
        .filter(|r| matches_status(r, filters.status))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptStats {
    pub total: usize,
    pub validos: usize,
    pub invalidos: usize,
    /// Sum of `valor_transferencia` over valid receipts only.
    pub valor_total: f64,
    /// "N/A" when the list is empty.
    pub banco_mas_usado: String,
}

/// Recompute aggregates over exactly the given list (the dashboard passes the
/// filtered subset, the repository passes the full set).
pub fn compute_stats(receipts: &[Comprobante]) -> ReceiptStats {
    let total = receipts.len();
    let validos = receipts.iter().filter(|r| r.es_valido).count();
    let valor_total: f64 = receipts
        .iter()
        .filter(|r| r.es_valido)
        .map(|r| r.valor_transferencia)
        .sum();

    // Left-to-right reduction; on a tie the first bank to reach the winning
    // count stays the winner.
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut best_bank: Option<&str> = None;
    let mut best_count = 0usize;
    for r in receipts {
        let n = counts.entry(r.banco_emisor.as_str()).or_insert(0);
        *n += 1;
        if *n > best_count {
            best_count = *n;
            best_bank = Some(r.banco_emisor.as_str());
        }
    }

    ReceiptStats {
        total,
        validos,
        invalidos: total - validos,
        valor_total,
        banco_mas_usado: best_bank.unwrap_or("N/A").to_string(),
    }
}

// ---------------------------------------------------------------------------
// Date presets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePreset {
    Today,
    ThisWeek,
    ThisMonth,
    LastMonth,
}

impl DatePreset {
    pub fn label(self) -> &'static str {
        match self {
            DatePreset::Today => "Hoy",
            DatePreset::ThisWeek => "Esta semana",
            DatePreset::ThisMonth => "Este mes",
            DatePreset::LastMonth => "Mes anterior",
        }
    }
}

fn month_bounds(year: i32, month: u32) -> (NaiveDate, NaiveDate) {
    let first = NaiveDate::from_ymd_opt(year, month, 1).expect("valid month start");
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .expect("valid month rollover");
    (first, next - Duration::days(1))
}

/// Resolve a preset to a concrete interval at click time. Weeks start on
/// Monday.
pub fn resolve_preset(preset: DatePreset, today: NaiveDate) -> DateRange {
    match preset {
        DatePreset::Today => DateRange { from: today, to: Some(today) },
        DatePreset::ThisWeek => {
            let from = today - Duration::days(today.weekday().num_days_from_monday() as i64);
            DateRange { from, to: Some(from + Duration::days(6)) }
        }
        DatePreset::ThisMonth => {
            let (from, to) = month_bounds(today.year(), today.month());
            DateRange { from, to: Some(to) }
        }
        DatePreset::LastMonth => {
            let (year, month) = if today.month() == 1 {
                (today.year() - 1, 12)
            } else {
                (today.year(), today.month() - 1)
            };
            let (from, to) = month_bounds(year, month);
            DateRange { from, to: Some(to) }
        }
    }
}

/// Preset clicks toggle: selecting the already-active preset clears the date
/// filter instead of reapplying it.
pub fn toggle_preset(
    current: Option<DateRange>,
    preset: DatePreset,
    today: NaiveDate,
) -> Option<DateRange> {
    let resolved = resolve_preset(preset, today);
    if current == Some(resolved) {
        None
    } else {
        Some(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn comprobante(banco: &str, fecha: &str, valor: f64, es_valido: bool) -> Comprobante {
        Comprobante {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            banco_emisor: banco.to_string(),
            tipo_comprobante: None,
            numero_comprobante: None,
            numero_referencia: None,
            fecha: fecha.to_string(),
            hora: None,
            valor_transferencia: valor,
            moneda: "COP".to_string(),
            nombre_beneficiario: Some("Juan".to_string()),
            cuenta_origen: None,
            cuenta_destino: None,
            estado_transaccion: None,
            notas: None,
            es_valido,
            imagen_url: None,
            imagen_nombre: None,
            imagen_path: None,
            imagen_size: None,
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
            updated_at: None,
        }
    }

    fn sample() -> Vec<Comprobante> {
        vec![
            comprobante("Nequi", "2024-01-05", 1000.0, true),
            comprobante("Bancolombia", "2024-01-10", 2000.0, false),
            comprobante("Nequi", "2024-02-01", 3000.0, true),
        ]
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_filter_is_identity() {
        let list = sample();
        let out = apply_filters(&list, &FilterState::default());
        assert_eq!(out, list);
    }

    #[test]
    fn test_filter_is_subset_and_idempotent() {
        let list = sample();
        let f = FilterState { status: StatusFilter::Valid, ..Default::default() };
        let once = apply_filters(&list, &f);
        assert!(once.iter().all(|r| list.iter().any(|o| o.id == r.id)));
        let twice = apply_filters(&once, &f);
        assert_eq!(once, twice);
        // Input untouched
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_status_valid_scenario() {
        let list = sample();
        let f = FilterState { status: StatusFilter::Valid, ..Default::default() };
        let out = apply_filters(&list, &f);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].fecha, "2024-01-05");
        assert_eq!(out[1].fecha, "2024-02-01");

        let stats = compute_stats(&out);
        assert_eq!(stats.valor_total, 4000.0);
        // Both remaining receipts are Nequi; first-encountered stays the winner.
        assert_eq!(stats.banco_mas_usado, "Nequi");
    }

    #[test]
    fn test_invalid_receipts_contribute_zero_to_total() {
        let stats = compute_stats(&sample());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.validos, 2);
        assert_eq!(stats.invalidos, 1);
        assert_eq!(stats.valor_total, 4000.0); // 2000 from the invalid one excluded
    }

    #[test]
    fn test_stats_on_empty_list() {
        let stats = compute_stats(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.valor_total, 0.0);
        assert_eq!(stats.banco_mas_usado, "N/A");
    }

    #[test]
    fn test_most_used_bank_tie_first_wins() {
        let list = vec![
            comprobante("Davivienda", "2024-01-01", 1.0, true),
            comprobante("BBVA", "2024-01-02", 1.0, true),
            comprobante("BBVA", "2024-01-03", 1.0, true),
            comprobante("Davivienda", "2024-01-04", 1.0, true),
        ];
        // Both end at 2, Davivienda reached every count first.
        assert_eq!(compute_stats(&list).banco_mas_usado, "Davivienda");
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let list = sample();
        let f = FilterState { search: "nequi".to_string(), ..Default::default() };
        let out = apply_filters(&list, &f);
        assert_eq!(out.len(), 2);

        let f = FilterState { search: "NEQUI".to_string(), ..Default::default() };
        assert_eq!(apply_filters(&list, &f).len(), 2);

        let f = FilterState { search: "bbva".to_string(), ..Default::default() };
        assert!(apply_filters(&list, &f).is_empty());
    }

    #[test]
    fn test_search_missing_fields_do_not_match() {
        let mut c = comprobante("Nequi", "2024-01-05", 1000.0, true);
        c.nombre_beneficiario = None;
        let f = FilterState { search: "juan".to_string(), ..Default::default() };
        assert!(apply_filters(&[c], &f).is_empty());
    }

    #[test]
    fn test_search_matches_receipt_and_reference_numbers() {
        let mut c = comprobante("Nequi", "2024-01-05", 1000.0, true);
        c.numero_referencia = Some("REF-777".to_string());
        let f = FilterState { search: "ref-7".to_string(), ..Default::default() };
        assert_eq!(apply_filters(std::slice::from_ref(&c), &f).len(), 1);
    }

    #[test]
    fn test_date_range_inclusive_and_single_day() {
        let list = sample();
        let f = FilterState {
            date_range: Some(DateRange { from: day(2024, 1, 5), to: Some(day(2024, 1, 10)) }),
            ..Default::default()
        };
        assert_eq!(apply_filters(&list, &f).len(), 2);

        // to := from when absent
        let f = FilterState {
            date_range: Some(DateRange { from: day(2024, 1, 10), to: None }),
            ..Default::default()
        };
        let out = apply_filters(&list, &f);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].banco_emisor, "Bancolombia");
    }

    #[test]
    fn test_unparseable_date_excluded_without_panic() {
        let mut list = sample();
        list.push(comprobante("Nequi", "fecha rota", 500.0, true));
        let f = FilterState {
            date_range: Some(DateRange { from: day(2024, 1, 1), to: Some(day(2024, 12, 31)) }),
            ..Default::default()
        };
        let out = apply_filters(&list, &f);
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|r| r.fecha != "fecha rota"));
    }

    #[test]
    fn test_predicates_are_anded() {
        let list = sample();
        let f = FilterState {
            search: "nequi".to_string(),
            status: StatusFilter::Valid,
            date_range: Some(DateRange { from: day(2024, 1, 1), to: Some(day(2024, 1, 31)) }),
        };
        let out = apply_filters(&list, &f);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].fecha, "2024-01-05");
    }

    #[test]
    fn test_preset_today() {
        let today = day(2024, 3, 15);
        let r = resolve_preset(DatePreset::Today, today);
        assert_eq!(r.from, today);
        assert_eq!(r.to, Some(today));
    }

    #[test]
    fn test_preset_week_starts_monday() {
        // 2024-03-15 is a Friday
        let r = resolve_preset(DatePreset::ThisWeek, day(2024, 3, 15));
        assert_eq!(r.from, day(2024, 3, 11));
        assert_eq!(r.to, Some(day(2024, 3, 17)));
    }

    #[test]
    fn test_preset_months() {
        let r = resolve_preset(DatePreset::ThisMonth, day(2024, 3, 15));
        assert_eq!(r.from, day(2024, 3, 1));
        assert_eq!(r.to, Some(day(2024, 3, 31)));

        let r = resolve_preset(DatePreset::LastMonth, day(2024, 3, 15));
        assert_eq!(r.from, day(2024, 2, 1));
        assert_eq!(r.to, Some(day(2024, 2, 29))); // leap year

        let r = resolve_preset(DatePreset::LastMonth, day(2024, 1, 10));
        assert_eq!(r.from, day(2023, 12, 1));
        assert_eq!(r.to, Some(day(2023, 12, 31)));
    }

    #[test]
    fn test_preset_toggle_clears_on_reuse() {
        let today = day(2024, 3, 15);
        let first = toggle_preset(None, DatePreset::ThisMonth, today);
        assert!(first.is_some());
        let second = toggle_preset(first, DatePreset::ThisMonth, today);
        assert_eq!(second, None);
    }

    #[test]
    fn test_preset_switch_replaces_instead_of_clearing() {
        let today = day(2024, 3, 15);
        let month = toggle_preset(None, DatePreset::ThisMonth, today);
        let week = toggle_preset(month, DatePreset::ThisWeek, today);
        assert_eq!(week, Some(resolve_preset(DatePreset::ThisWeek, today)));
    }

    #[test]
    fn test_status_cycle() {
        assert_eq!(StatusFilter::All.next(), StatusFilter::Valid);
        assert_eq!(StatusFilter::Valid.next(), StatusFilter::Invalid);
        assert_eq!(StatusFilter::Invalid.next(), StatusFilter::All);
    }
}
