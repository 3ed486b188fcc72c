use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use crate::fmt::money;

pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::Yellow)
    .add_modifier(Modifier::BOLD);

pub const FOOTER_STYLE: Style = Style::new().fg(Color::DarkGray);

pub const VALID_STYLE: Style = Style::new().fg(Color::Rgb(80, 220, 100));
pub const INVALID_STYLE: Style = Style::new().fg(Color::Red);

pub const SELECTED_STYLE: Style = Style::new()
    .bg(Color::Rgb(40, 40, 60))
    .add_modifier(Modifier::BOLD);

pub const TOUR_STYLE: Style = Style::new()
    .fg(Color::Cyan)
    .add_modifier(Modifier::BOLD);

/// Amount colored by validation state — green for validated receipts, red
/// for rejected ones.
pub fn money_span(amount: f64, es_valido: bool) -> Span<'static> {
    let style = if es_valido { VALID_STYLE } else { INVALID_STYLE };
    Span::styled(money(amount), style)
}

/// Wrap text to a given width. Returns (wrapped_string, line_count).
pub fn wrap_text(text: &str, width: usize) -> (String, u16) {
    if width == 0 {
        return (text.to_string(), 1);
    }
    let wrapped = textwrap::fill(text, width);
    let lines = wrapped.lines().count().max(1) as u16;
    (wrapped, lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text_counts_lines() {
        let (wrapped, lines) = wrap_text("uno dos tres cuatro cinco", 9);
        assert!(lines >= 3);
        assert!(wrapped.lines().all(|l| l.chars().count() <= 9));
    }

    #[test]
    fn test_wrap_text_zero_width_passthrough() {
        let (wrapped, lines) = wrap_text("hola", 0);
        assert_eq!(wrapped, "hola");
        assert_eq!(lines, 1);
    }
}
