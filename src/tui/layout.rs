use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::screens::DetailState;
use crate::tui::app::TuiApp;

pub fn render(frame: &mut Frame, app: &TuiApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Main pane
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    match &app.detail {
        Some(detail) => render_detail_pane(frame, detail, chunks[0]),
        None => render_list_pane(frame, app, chunks[0]),
    }
    render_status_bar(frame, app, chunks[1]);
}

fn render_list_pane(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let border_style = Style::default().fg(Color::Cyan);

    let mut rows: Vec<ListItem> = app
        .list
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let content = format!("{:>5}  {}", item.id, item.display_title());
            let style = if i == app.item_index {
                Style::default()
                    .bg(Color::Cyan)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(content).style(style)
        })
        .collect();

    if app.list.is_appending {
        rows.push(ListItem::new("  Loading more...").style(Style::default().fg(Color::DarkGray)));
    } else if app.list.items.is_empty() && !app.list.is_loading {
        rows.push(ListItem::new("  No items").style(Style::default().fg(Color::DarkGray)));
    }

    let title = if app.list.end_reached {
        format!(" Items ({}) ", app.list.items.len())
    } else {
        format!(" Items ({}+) ", app.list.items.len())
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    // Keep the selection on screen.
    let visible = area.height.saturating_sub(2) as usize;
    let offset = (app.item_index + 1).saturating_sub(visible);
    let rows: Vec<ListItem> = rows.into_iter().skip(offset).collect();

    let list = List::new(rows).block(block);
    frame.render_widget(list, area);
}

fn render_detail_pane(frame: &mut Frame, detail: &DetailState, area: Rect) {
    let border_style = Style::default().fg(Color::Cyan);

    let (title, content) = match &detail.item {
        Some(item) => {
            let lines = vec![
                Line::from(Span::styled(
                    item.display_title().to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    format!("Id: {}", item.id),
                    Style::default().fg(Color::Yellow),
                )),
                Line::from(Span::styled(
                    format!("Image: {}", item.image_url),
                    Style::default().fg(Color::Blue),
                )),
            ];
            (format!(" {} ", item.display_title()), Text::from(lines))
        }
        None if detail.is_loading => (
            format!(" Item {} ", detail.id),
            Text::from("Loading..."),
        ),
        None => (
            format!(" Item {} ", detail.id),
            Text::from(Span::styled(
                detail
                    .error_message
                    .clone()
                    .unwrap_or_else(|| "Nothing to show".to_string()),
                Style::default().fg(Color::Red),
            )),
        ),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let status = if let Some(ref msg) = app.status_message {
        msg.clone()
    } else if app.list.is_loading && !app.showing_detail() {
        "Syncing items...".to_string()
    } else if app.showing_detail() {
        "Esc:Back  r:Retry  o:Open image  q:Quit".to_string()
    } else {
        "j/k:Navigate  Enter:Open  r:Retry  R:Refresh  q:Quit".to_string()
    };

    let paragraph =
        Paragraph::new(status).style(Style::default().fg(Color::White).bg(Color::DarkGray));

    frame.render_widget(paragraph, area);
}
