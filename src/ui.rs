use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus};
use crate::form::{FieldKind, FormField};
use crate::picker::{PickerRow, PickerSession};

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.size();

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(0),    // body
            Constraint::Length(3), // footer
        ])
        .split(area);

    // ── Header ──────────────────────────────────────────────────────────────
    let header = Paragraph::new(Line::from(vec![
        Span::styled("Auto", Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        Span::styled("Metric", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::raw("  ·  Vehicle price estimator"),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_type(BorderType::Plain)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(header, outer[0]);

    // ── Body ─────────────────────────────────────────────────────────────────
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(34)])
        .split(outer[1].inner(Margin { horizontal: 2, vertical: 1 }));

    draw_form(frame, body[0], app);
    draw_price(frame, body[1], app);

    // ── Footer ───────────────────────────────────────────────────────────────
    frame.render_widget(footer(app), outer[2]);

    if let Some(session) = app.picker.session() {
        draw_picker(frame, area, app, session);
    }
}

fn draw_form(frame: &mut Frame, area: Rect, app: &App) {
    let mut items: Vec<ListItem> = FormField::ALL
        .iter()
        .map(|field| {
            let focused = app.focus == Focus::Field(*field);
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<20}", field.label()),
                    Style::default().fg(Color::Gray),
                ),
                field_value(app, *field, focused),
            ]))
        })
        .collect();

    let button_style = if app.is_submitting() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    };
    items.push(ListItem::new(""));
    items.push(ListItem::new(Line::from(Span::styled(
        format!("[ {} ]", app.submit_label()),
        button_style,
    ))));

    // The spacer row sits between the last field and the button.
    let selected = match app.focus {
        Focus::Submit => app.focus.position() + 1,
        Focus::Field(_) => app.focus.position(),
    };
    let mut list_state = ListState::default();
    list_state.select(Some(selected));

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Vehicle Details "),
        )
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut list_state);
}

fn field_value(app: &App, field: FormField, focused: bool) -> Span<'static> {
    let text = app.form.text(field);
    let placeholder = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White);

    match field.kind() {
        FieldKind::Picker { .. } if text.is_empty() => Span::styled("Select… ▾", placeholder),
        FieldKind::Picker { .. } => Span::styled(format!("{text} ▾"), value),
        FieldKind::Number | FieldKind::Date => {
            let cursor = if focused { "_" } else { "" };
            Span::styled(format!("{text}{cursor}"), value)
        }
        FieldKind::Choice(_) if text.is_empty() => Span::styled("‹ - ›", placeholder),
        FieldKind::Choice(_) => Span::styled(format!("‹ {text} ›"), value),
        FieldKind::Checkbox => {
            let mark = if app.form.is_checked(field) { "[x]" } else { "[ ]" };
            Span::styled(mark, value)
        }
    }
}

fn draw_price(frame: &mut Frame, area: Rect, app: &App) {
    let content = match &app.price {
        Some(price) => Line::from(Span::styled(
            price.clone(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        None => Line::from(Span::styled(
            "Fill in the form and choose Get Price",
            Style::default().fg(Color::DarkGray),
        )),
    };

    let panel = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Estimated Price "),
        );
    frame.render_widget(panel, area);
}

fn draw_picker(frame: &mut Frame, area: Rect, app: &App, session: &PickerSession) {
    let popup = centered_rect(50, 60, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Yellow))
        .title(format!(" {} ", session.title));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(inner);

    let search = Paragraph::new(format!("{}_", session.search)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Search "),
    );
    frame.render_widget(search, parts[0]);

    let rows = app.picker.rows();
    let has_items = rows.iter().any(|row| matches!(row, PickerRow::Item(_)));
    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| match row {
            PickerRow::Item(value) => ListItem::new(value.to_string()),
            PickerRow::Placeholder(text) => {
                ListItem::new(Span::styled(*text, Style::default().fg(Color::DarkGray)))
            }
        })
        .collect();

    let mut list_state = ListState::default();
    if has_items {
        list_state.select(Some(session.cursor));
    }

    let list = List::new(items)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, parts[1], &mut list_state);
}

fn footer(app: &App) -> Paragraph<'static> {
    let key = Style::default().fg(Color::Yellow);
    let spans = if app.picker.is_open() {
        vec![
            Span::styled(" type ", key),
            Span::raw("search   "),
            Span::styled(" ↑↓ ", key),
            Span::raw("navigate   "),
            Span::styled(" Enter ", key),
            Span::raw("select   "),
            Span::styled(" Esc ", key),
            Span::raw("close"),
        ]
    } else {
        vec![
            Span::styled(" ↑↓ ", key),
            Span::raw("navigate   "),
            Span::styled(" Enter/Space ", key),
            Span::raw("edit   "),
            Span::styled(" ←→ ", key),
            Span::raw("choose   "),
            Span::styled(" Ctrl+S ", key),
            Span::raw("get price   "),
            Span::styled(" Ctrl+Q ", key),
            Span::raw("quit"),
        ]
    };

    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_type(BorderType::Plain)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
