use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};
use split_engine::{SessionState, Split, SplitEditor, field_errors, format_currency};

use crate::{
    app::{AppState, Cursor, SplitField},
    ui::{
        components::{
            hints::{self, hints_to_spans},
            money::styled_amount,
        },
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, editor: &SplitEditor) {
    let theme = Theme::default();
    let error = editor.error().map(ToString::to_string);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(if error.is_some() { 3 } else { 0 }),
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_status(frame, layout[0], state, editor, &theme);
    if let Some(error) = error {
        render_error(frame, layout[1], &error, &theme);
    }
    render_original(frame, layout[2], editor, &theme);
    render_table(frame, layout[3], state.cursor, editor, &theme);
    render_diagnostics(frame, layout[4], state, &theme);

    let hints = if state.cursor.editing {
        hints::EDITING
    } else {
        hints::BROWSING
    };
    frame.render_widget(
        Paragraph::new(Line::from(hints_to_spans(hints, &theme))),
        layout[5],
    );
}

fn render_status(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    editor: &SplitEditor,
    theme: &Theme,
) {
    let ledger = editor.ledger();
    let mut line = vec![
        Span::styled("Transaction", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}   ", state.transaction_id)),
        Span::styled("Base", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}   ", format_currency(editor.base_amount()))),
        Span::styled("Splits", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}", ledger.len())),
    ];

    if ledger.page_count() > 1 {
        line.push(Span::raw(format!(
            "   Page {} of {}",
            ledger.current_page(),
            ledger.page_count()
        )));
    }

    let saving = state.saving
        || state
            .session
            .as_ref()
            .is_some_and(|session| session.state() == SessionState::Saving);
    if saving {
        line.push(Span::styled("   Saving...", Style::default().fg(theme.accent)));
    }

    frame.render_widget(Paragraph::new(Line::from(line)), area);
}

fn render_error(frame: &mut Frame<'_>, area: Rect, error: &str, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.error))
        .title("Error");
    let content = Paragraph::new(Span::styled(error.to_string(), Style::default().fg(theme.error)))
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(content, area);
}

fn render_original(frame: &mut Frame<'_>, area: Rect, editor: &SplitEditor, theme: &Theme) {
    let original = editor.original();
    let reconciliation = editor.reconciliation();

    let lines = vec![
        Line::from(vec![
            Span::styled(original.transaction_date.clone(), Style::default().fg(theme.dim)),
            Span::raw("  "),
            Span::raw(original.description.clone()),
            Span::raw("  "),
            Span::styled(
                format!("{} / {}", original.category.name, original.subcategory.name),
                Style::default().fg(theme.dim),
            ),
        ]),
        Line::from(vec![
            Span::styled("Remaining ", Style::default().fg(theme.dim)),
            styled_amount(&reconciliation.displayed_amount, theme),
            Span::styled("   Allocated ", Style::default().fg(theme.dim)),
            Span::raw(reconciliation.split_total.to_string()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title("Original");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_table(
    frame: &mut Frame<'_>,
    area: Rect,
    cursor: Cursor,
    editor: &SplitEditor,
    theme: &Theme,
) {
    let splits = editor.ledger().current_page_splits();

    let header = Row::new(SplitField::ALL.map(|field| {
        Cell::from(Span::styled(
            field.label(),
            Style::default()
                .fg(theme.dim)
                .add_modifier(Modifier::BOLD),
        ))
    }));

    let rows = splits.iter().enumerate().map(|(idx, split)| {
        let selected = idx == cursor.row;
        let cells = SplitField::ALL.map(|field| split_cell(split, field, selected, cursor, theme));
        let row = Row::new(cells);
        if selected {
            row.style(Style::default().bg(theme.selected))
        } else {
            row
        }
    });

    let widths = [
        Constraint::Length(12),
        Constraint::Min(16),
        Constraint::Length(20),
        Constraint::Length(12),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title("Splits");

    if splits.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No splits yet. Press a to add one.",
                Style::default().fg(theme.dim),
            ))
            .block(block),
            area,
        );
        return;
    }

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

fn split_cell(
    split: &Split,
    field: SplitField,
    selected: bool,
    cursor: Cursor,
    theme: &Theme,
) -> Cell<'static> {
    let errors = field_errors(split);
    let (text, invalid) = match field {
        SplitField::Date => (split.transaction_date.clone(), errors.date.is_some()),
        SplitField::Description => (split.description.clone(), errors.description.is_some()),
        SplitField::Subcategory => (split.subcategory.name.clone(), errors.subcategory.is_some()),
        SplitField::Amount => (split.amount.clone(), errors.amount.is_some()),
    };

    let focused = selected && cursor.field == field;
    let mut span = if field == SplitField::Amount && !invalid {
        styled_amount(&text, theme)
    } else {
        Span::styled(text, Style::default().fg(theme.text))
    };
    if invalid {
        span = span.style(Style::default().fg(theme.error));
    }
    if focused {
        span = span.patch_style(Style::default().add_modifier(Modifier::UNDERLINED));
    }

    let marker = if focused && cursor.editing { "▏" } else { "" };
    Cell::from(Line::from(vec![span, Span::raw(marker)]))
}

fn render_diagnostics(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let Some(split) = state.selected_split() else {
        return;
    };
    let errors = field_errors(split);
    let messages: Vec<&str> = [
        errors.date,
        errors.description,
        errors.subcategory,
        errors.amount,
    ]
    .into_iter()
    .flatten()
    .collect();

    if messages.is_empty() {
        return;
    }
    frame.render_widget(
        Paragraph::new(Span::styled(
            messages.join("  "),
            Style::default().fg(theme.error),
        )),
        area,
    );
}
