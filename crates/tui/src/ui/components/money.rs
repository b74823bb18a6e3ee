use ratatui::{style::Style, text::Span};
use split_engine::parse_amount;

use crate::ui::theme::Theme;

/// Styled span for an amount as typed: negative in red, anything else that
/// parses in green, unparsable text left neutral.
#[must_use]
pub fn styled_amount(text: &str, theme: &Theme) -> Span<'static> {
    let color = match parse_amount(text) {
        Some(amount) if amount.is_negative() => theme.negative,
        Some(_) => theme.positive,
        None => theme.text,
    };
    Span::styled(text.to_string(), Style::default().fg(color))
}
