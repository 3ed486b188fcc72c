use chrono::{DateTime, NaiveDate};

/// Format an amount as Colombian pesos with es-CO separators: $ 1.234.567,89
pub fn money(val: f64) -> String {
    let negative = val < 0.0;
    let abs = val.abs();
    let cents = format!("{:.2}", abs);
    let parts: Vec<&str> = cents.split('.').collect();
    let int_part = parts[0];
    let dec_part = parts[1];

    let mut with_dots = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_dots.push('.');
        }
        with_dots.push(c);
    }
    let with_dots: String = with_dots.chars().rev().collect();

    if negative {
        format!("-$ {with_dots},{dec_part}")
    } else {
        format!("$ {with_dots},{dec_part}")
    }
}

/// Parse a gateway date value. Accepts a plain `YYYY-MM-DD` or a full
/// timestamp whose first ten characters are the date.
pub fn parse_fecha(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(d);
    }
    if trimmed.len() > 10 {
        return NaiveDate::parse_from_str(&trimmed[..10], "%Y-%m-%d").ok();
    }
    None
}

/// Render a gateway date as dd/MM/yyyy, or "N/A" when it cannot be parsed.
pub fn fecha_display(raw: &str) -> String {
    parse_fecha(raw)
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Render a gateway timestamp as dd/MM/yyyy HH:mm, falling back to the raw
/// string when it is not RFC 3339.
pub fn timestamp_display(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(1234.56), "$ 1.234,56");
        assert_eq!(money(-500.00), "-$ 500,00");
        assert_eq!(money(0.0), "$ 0,00");
        assert_eq!(money(1000000.99), "$ 1.000.000,99");
        assert_eq!(money(150000.0), "$ 150.000,00");
    }

    #[test]
    fn test_parse_fecha_plain_date() {
        assert_eq!(
            parse_fecha("2024-01-05"),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
    }

    #[test]
    fn test_parse_fecha_timestamp_prefix() {
        assert_eq!(
            parse_fecha("2024-02-01T10:30:00+00:00"),
            NaiveDate::from_ymd_opt(2024, 2, 1)
        );
    }

    #[test]
    fn test_parse_fecha_garbage() {
        assert_eq!(parse_fecha("no es una fecha"), None);
        assert_eq!(parse_fecha(""), None);
    }

    #[test]
    fn test_fecha_display() {
        assert_eq!(fecha_display("2024-01-05"), "05/01/2024");
        assert_eq!(fecha_display("garbage"), "N/A");
    }

    #[test]
    fn test_timestamp_display() {
        assert_eq!(
            timestamp_display("2024-01-05T14:30:00+00:00"),
            "05/01/2024 14:30"
        );
        assert_eq!(timestamp_display("not a timestamp"), "not a timestamp");
    }
}
