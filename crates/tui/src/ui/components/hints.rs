use ratatui::{style::Style, text::Span};

use crate::ui::theme::Theme;

/// A keyboard hint consisting of a key and its action.
#[derive(Debug, Clone)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

/// Converts a list of key hints into styled spans for rendering.
pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  │  ", Style::default().fg(theme.border)));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }

    spans
}

pub const LOADING: &[KeyHint] = &[KeyHint::new("r", "retry"), KeyHint::new("q", "close")];

pub const BROWSING: &[KeyHint] = &[
    KeyHint::new("a", "add"),
    KeyHint::new("d", "delete"),
    KeyHint::new("↑↓", "row"),
    KeyHint::new("Tab", "field"),
    KeyHint::new("Enter", "edit"),
    KeyHint::new("←→", "page"),
    KeyHint::new("s", "save"),
    KeyHint::new("x", "dismiss"),
    KeyHint::new("q", "cancel"),
];

pub const EDITING: &[KeyHint] = &[
    KeyHint::new("type", "edit"),
    KeyHint::new("Enter", "done"),
    KeyHint::new("Esc", "done"),
];
