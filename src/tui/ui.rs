use crate::tui::app::{App, Focus};
use crate::tui::colors;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

const KEY_HINTS: &[(&str, &str)] = &[
    ("Tab", "Switch field"),
    ("Enter", "Search (search field) / new line (payload)"),
    ("Ctrl+S / F5", "Send payload"),
    ("Ctrl+F", "Search"),
    ("Ctrl+V", "Paste from clipboard"),
    ("Ctrl+L", "Clear field"),
    ("Esc", "Clear field, or quit when empty"),
    ("Ctrl+Q", "Quit"),
];

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header: title, menu, search
            Constraint::Min(3),    // Payload text area
            Constraint::Length(1), // Send button + label
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_header(frame, app, chunks[0]);
    draw_payload(frame, app, chunks[1]);
    draw_action_row(frame, app, chunks[2]);
    draw_status_bar(frame, app, chunks[3]);

    if app.show_help {
        draw_help(frame, area);
    }
}

fn field_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(colors::FOCUSED)
    } else {
        Style::default().fg(colors::UNFOCUSED)
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12), // title
            Constraint::Length(13), // broadcast menu button
            Constraint::Min(10),    // search field
        ])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        " \u{26D3} txcast",
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::NONE).padding(ratatui::widgets::Padding::top(1)))
    .style(Style::default().bg(colors::HEADER_BG));
    frame.render_widget(title, columns[0]);

    let menu = Paragraph::new(Line::from(Span::styled(
        " Broadcast ",
        Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().padding(ratatui::widgets::Padding::top(1)))
    .style(Style::default().bg(colors::HEADER_BG));
    frame.render_widget(menu, columns[1]);

    let focused = app.focus == Focus::Search;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(field_border(focused))
        .title(" Search (Enter) ");
    let inner = block.inner(columns[2]);

    // Keep the cursor visible by scrolling long queries horizontally
    let cursor_x = app.search.cursor_column();
    let scroll = cursor_x.saturating_sub(inner.width.saturating_sub(1));
    let search = Paragraph::new(app.search.text.as_str())
        .block(block)
        .scroll((0, scroll))
        .style(Style::default().fg(Color::White));
    frame.render_widget(search, columns[2]);

    if focused && !app.show_help {
        frame.set_cursor_position(Position::new(inner.x + (cursor_x - scroll), inner.y));
    }
}

fn draw_payload(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Payload;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(field_border(focused))
        .title(" Broadcast payload (raw transaction) ");
    let inner = block.inner(area);

    let (rows, (cursor_x, cursor_y)) = app.payload.wrap(inner.width);
    let scroll = cursor_y.saturating_sub(inner.height.saturating_sub(1));

    let lines: Vec<Line> = if app.payload.is_empty() && !focused {
        vec![Line::from(Span::styled(
            "Paste a signed transaction here",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))]
    } else {
        rows.into_iter().map(Line::from).collect()
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll, 0))
        .style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, area);

    if focused && !app.show_help && inner.height > 0 {
        frame.set_cursor_position(Position::new(inner.x + cursor_x, inner.y + cursor_y - scroll));
    }
}

fn draw_action_row(frame: &mut Frame, app: &App, area: Rect) {
    let button_style = if app.session.form.is_broadcasting() {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    } else {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    };

    let tone = app.session.form.tone;
    let line = Line::from(vec![
        Span::styled(" [ Send ] ", button_style),
        Span::raw("   "),
        Span::styled(
            format!("{}{}", colors::tone_icon(tone), app.session.form.label),
            Style::default().fg(colors::tone_color(tone)),
        ),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut left_text = format!(" {} | {}", app.session.endpoint(), app.status_message);
    if app.session.form.is_broadcasting() {
        left_text.push_str(&format!(" | \u{23F3} {} in flight", app.session.form.in_flight()));
    }
    if let Some(at) = app.session.label_updated_at {
        left_text.push_str(&format!(" | updated {}", at.format("%H:%M:%S")));
    }

    let right_text = " F1:Help  Tab:Field  Ctrl+S:Send  Ctrl+Q:Quit ";

    let available_width = area.width as usize;
    let left_len = left_text.chars().count();
    let right_len = right_text.len();

    let status_str = if left_len + right_len < available_width {
        let padding = available_width - left_len - right_len;
        format!("{}{:padding$}{}", left_text, "", right_text, padding = padding)
    } else {
        // Not enough space, just show left text
        format!("{:width$}", left_text, width = available_width)
    };

    let status = Paragraph::new(status_str)
        .style(Style::default().fg(Color::White).bg(colors::BAR_BG));

    frame.render_widget(status, area);
}

/// Helper to create a centered popup area
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn draw_help(frame: &mut Frame, area: Rect) {
    let key_width = KEY_HINTS.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    let text_width = KEY_HINTS
        .iter()
        .map(|(_, d)| d.len())
        .max()
        .unwrap_or(0);

    let width = (key_width + text_width + 6) as u16;
    let height = KEY_HINTS.len() as u16 + 2;
    let popup_area = centered_rect(width, height, area);

    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = KEY_HINTS
        .iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(
                    format!(" {:width$}  ", key, width = key_width),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::styled(*desc, Style::default().fg(Color::White)),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Keys ")
        .title_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));

    frame.render_widget(Paragraph::new(lines).block(block), popup_area);
}
