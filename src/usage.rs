use chrono::{Datelike, Duration, NaiveDate};
use uuid::Uuid;

use crate::gateway::{Filter, Gateway};
use crate::models::Plan;

/// Current-month usage against the plan quota.
///
/// `total` and `validos` come from two independent count queries; under
/// concurrent writes they can observe different snapshots, so the derived
/// `invalidos` may briefly disagree with reality (and can even go negative).
/// That skew is accepted, not corrected.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageReport {
    pub plan: Plan,
    pub total: u64,
    pub validos: u64,
    pub invalidos: i64,
    pub quota: Option<u32>,
    pub pct: f64,
}

/// First and last calendar day of the month containing `today`.
pub fn month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).expect("month start");
    let next = if today.month() == 12 {
        NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
    }
    .expect("month rollover");
    (first, next - Duration::days(1))
}

fn usage_pct(plan: Plan, total: u64) -> f64 {
    match plan.monthly_quota() {
        // Unlimited plans always read as 0 % regardless of volume.
        None => 0.0,
        Some(limit) => (total as f64 / limit as f64).min(1.0) * 100.0,
    }
}

fn build_report(plan: Plan, counts: Option<(u64, u64)>) -> UsageReport {
    // Any query failure degrades to a zeroed display; the cause is only
    // visible on the diagnostic channel.
    let (total, validos) = counts.unwrap_or((0, 0));
    UsageReport {
        plan,
        total,
        validos,
        invalidos: total as i64 - validos as i64,
        quota: plan.monthly_quota(),
        pct: usage_pct(plan, total),
    }
}

/// Count this month's receipts (total and valid) for the user. Never fails:
/// errors reset all counts to zero and are logged, nothing is surfaced.
pub async fn fetch_usage(
    gateway: &Gateway,
    user_id: Uuid,
    plan: Plan,
    today: NaiveDate,
) -> UsageReport {
    let (from, to) = month_bounds(today);
    let month_scope = || {
        vec![
            Filter::Eq("user_id", user_id.to_string()),
            Filter::Gte("fecha", from.format("%Y-%m-%d").to_string()),
            Filter::Lte("fecha", to.format("%Y-%m-%d").to_string()),
        ]
    };

    let total = gateway.count("comprobantes", &month_scope()).await;
    let mut valid_filters = month_scope();
    valid_filters.push(Filter::Eq("es_valido", "true".to_string()));
    let validos = gateway.count("comprobantes", &valid_filters).await;

    let counts = match (total, validos) {
        (Ok(t), Ok(v)) => Some((t, v)),
        (t, v) => {
            if let Err(e) = t {
                log::warn!("usage total count failed: {e}");
            }
            if let Err(e) = v {
                log::warn!("usage valid count failed: {e}");
            }
            None
        }
    };
    build_report(plan, counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(month_bounds(day(2024, 2, 15)), (day(2024, 2, 1), day(2024, 2, 29)));
        assert_eq!(month_bounds(day(2024, 12, 3)), (day(2024, 12, 1), day(2024, 12, 31)));
        assert_eq!(month_bounds(day(2023, 2, 28)), (day(2023, 2, 1), day(2023, 2, 28)));
    }

    #[test]
    fn test_pct_limited_plans() {
        assert_eq!(usage_pct(Plan::Basico, 75), 50.0);
        assert_eq!(usage_pct(Plan::Profesional, 300), 50.0);
        // Capped at 100 even past the quota
        assert_eq!(usage_pct(Plan::Basico, 400), 100.0);
    }

    #[test]
    fn test_pct_unlimited_plan_is_always_zero() {
        assert_eq!(usage_pct(Plan::Negocios, 0), 0.0);
        assert_eq!(usage_pct(Plan::Negocios, 100_000), 0.0);
    }

    #[test]
    fn test_invalid_is_total_minus_valid() {
        let r = build_report(Plan::Basico, Some((10, 7)));
        assert_eq!(r.invalidos, 3);
        // Documented snapshot skew: valid can exceed total between queries.
        let r = build_report(Plan::Basico, Some((5, 7)));
        assert_eq!(r.invalidos, -2);
    }

    #[test]
    fn test_failure_resets_counts_to_zero() {
        let r = build_report(Plan::Profesional, None);
        assert_eq!(r.total, 0);
        assert_eq!(r.validos, 0);
        assert_eq!(r.invalidos, 0);
        assert_eq!(r.pct, 0.0);
    }
}
