//! Rendering of the picker stages

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use super::picker::{Picker, Stage, MENU};
use super::PickerMode;

pub fn draw(frame: &mut Frame, picker: &Picker) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(frame.area());

    match picker.stage() {
        Stage::Menu => draw_menu(frame, picker, chunks[0]),
        _ => draw_list(frame, picker, chunks[0]),
    }
    draw_status_bar(frame, picker, chunks[1]);

    if picker.stage() == &Stage::Confirm {
        draw_confirm(frame, picker);
    }
}

fn draw_menu(frame: &mut Frame, picker: &Picker, area: Rect) {
    let items: Vec<ListItem> = MENU.iter().map(|(_, label)| ListItem::new(*label)).collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title("What would you like to do?")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(picker.menu_index()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_list(frame: &mut Frame, picker: &Picker, area: Rect) {
    let deleting = picker.mode() == PickerMode::Delete;

    let items: Vec<ListItem> = picker
        .visible()
        .into_iter()
        .map(|branch| {
            let mut spans = Vec::new();
            if deleting {
                let mark = if picker.is_selected(&branch.name) { "[x] " } else { "[ ] " };
                spans.push(Span::raw(mark));
            }
            spans.push(Span::raw(truncate(&branch.name, area.width.saturating_sub(20) as usize)));
            if let Some(label) = branch.label() {
                spans.push(Span::styled(format!(" ({})", label), Style::default().fg(Color::DarkGray)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = match (picker.mode(), picker.is_dry_run()) {
        (PickerMode::Delete, true) => format!("Select branches to delete (dry run), {} selected", picker.selected_count()),
        (PickerMode::Delete, false) => format!("Select branches to delete, {} selected", picker.selected_count()),
        (PickerMode::Switch, _) => "Select branch to switch to".to_string(),
    };

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(picker.cursor()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_status_bar(frame: &mut Frame, picker: &Picker, area: Rect) {
    let (content, style) = match picker.stage() {
        Stage::Search(buffer) => (format!("Search: {}_", buffer), Style::default().fg(Color::Yellow)),
        _ if picker.status().is_some() => (
            picker.status().unwrap_or_default().to_string(),
            Style::default().fg(Color::Yellow),
        ),
        Stage::Menu => ("[j/k] move [enter] choose [q]uit".to_string(), Style::default()),
        _ => {
            let keys = match picker.mode() {
                PickerMode::Delete => "[space] toggle [a]ll [n]one [/]search [enter] delete [q]uit",
                PickerMode::Switch => "[j/k] move [/]search [enter] switch [q]uit",
            };
            match picker.query() {
                Some(query) => (format!("Filter: {}  {}", query, keys), Style::default()),
                None => (keys.to_string(), Style::default()),
            }
        }
    };

    let paragraph = Paragraph::new(content)
        .style(style)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn draw_confirm(frame: &mut Frame, picker: &Picker) {
    let area = centered(frame.area(), 50, 5);
    let verb = if picker.is_dry_run() { "Preview deleting" } else { "Delete" };
    let count = picker.selected_count();
    let text = format!(
        "{} {} {}? [y/n]",
        verb,
        count,
        if count == 1 { "branch" } else { "branches" }
    );

    let paragraph = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title("Confirm")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Shortens `s` to `max_len` characters with a trailing "..."
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let keep: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", keep)
    }
}
