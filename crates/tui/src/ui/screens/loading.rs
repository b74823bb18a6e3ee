use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::{
    app::AppState,
    ui::{
        components::hints::{self, hints_to_spans},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let load_error = state.session.as_ref().and_then(|s| s.load_error());
    let (text, style) = match load_error {
        Some(err) => (err.to_string(), Style::default().fg(theme.error)),
        None => (
            format!("Loading splits for transaction {}...", state.transaction_id),
            Style::default().fg(theme.dim),
        ),
    };

    let block = Block::default()
        .title("Split transaction")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent));
    let content = Paragraph::new(Line::styled(text, style))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(content, layout[0]);

    if load_error.is_some() {
        frame.render_widget(
            Paragraph::new(Line::from(hints_to_spans(hints::LOADING, &theme))),
            layout[1],
        );
    }
}
