//! UI rendering

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use sift_core::CardKind;

use crate::app::{App, Focus, SidebarItem};
use crate::cards::{card_height, card_lines};

const SIDEBAR_EXPANDED: u16 = 26;
const SIDEBAR_COLLAPSED: u16 = 3;

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &App) {
    let sidebar_width = if app.state.layout.menu_collapsed { SIDEBAR_COLLAPSED } else { SIDEBAR_EXPANDED };

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(sidebar_width), Constraint::Min(10)])
        .split(frame.area());

    render_sidebar(frame, app, main_chunks[0]);

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header: search bar
            Constraint::Min(1),    // Result grid
        ])
        .split(main_chunks[1]);

    render_search_bar(frame, app, right_chunks[0]);
    render_grid(frame, app, right_chunks[1]);

    // Toast floats above everything else
    render_toast(frame, app);
}

fn focus_border(focused: bool) -> Style {
    if focused { Style::default().fg(Color::Yellow) } else { Style::default().fg(Color::DarkGray) }
}

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let layout = &app.state.layout;
    let focused = app.focus == Focus::Sidebar;
    let block = Block::default().borders(Borders::RIGHT).border_style(focus_border(focused));

    if layout.menu_collapsed {
        let toggle = Paragraph::new(Line::from(Span::styled("›", Style::default().fg(Color::Gray)))).block(block);
        frame.render_widget(toggle, area);
        return;
    }

    let active = Style::default().fg(Color::Black).bg(Color::Blue);
    let active_type = Style::default().fg(Color::Black).bg(Color::Green);
    let inactive = Style::default().fg(Color::Gray);

    let mut lines = vec![
        Line::from(Span::styled("‹", Style::default().fg(Color::Gray))),
        Line::from(Span::styled("Layout Options", Style::default().add_modifier(Modifier::BOLD))),
        Line::default(),
    ];

    let items = SidebarItem::all();
    for (idx, item) in items.iter().copied().enumerate() {
        // Blank line between groups
        if idx > 0 && std::mem::discriminant(&item) != std::mem::discriminant(&items[idx - 1]) {
            lines.push(Line::default());
        }

        let (label, style) = match item {
            SidebarItem::Columns(count) => {
                (count.label(), if layout.columns == count { active } else { inactive })
            }
            SidebarItem::SearchType(search_type) => (
                search_type.label().to_string(),
                if layout.search_type == search_type { active_type } else { inactive },
            ),
            SidebarItem::ShowImages => {
                let mark = if layout.show_images { "[x]" } else { "[ ]" };
                (format!("{mark} Show Images"), inactive)
            }
        };

        let cursor = if focused && idx == app.sidebar_index { "▸ " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(cursor, Style::default().fg(Color::Yellow)),
            Span::styled(format!(" {label:<18}"), style),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Search input followed by a search button
fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::SearchBar;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_border(focused))
        .title(" Search ");

    let cursor_style = Style::default().fg(Color::Black).bg(Color::White);
    let text_style = Style::default().fg(Color::White);

    let (before, after) = app.input.text.split_at(app.input.cursor);
    let cursor_char = after.chars().next();
    let after_cursor = cursor_char.map(|c| &after[c.len_utf8()..]).unwrap_or("");

    let mut spans = Vec::new();
    if app.input.text.is_empty() && !focused {
        spans.push(Span::styled("Enter search query", Style::default().fg(Color::DarkGray)));
    } else {
        spans.push(Span::styled(before, text_style));
        if focused {
            match cursor_char {
                Some(c) => spans.push(Span::styled(c.to_string(), cursor_style)),
                None => spans.push(Span::styled(" ", cursor_style)),
            }
        } else if let Some(c) = cursor_char {
            spans.push(Span::styled(c.to_string(), text_style));
        }
        spans.push(Span::styled(after_cursor, text_style));
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(10)])
        .split(block.inner(area));
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);
    frame.render_widget(
        Paragraph::new(Span::styled("[ Search ]", Style::default().fg(Color::Black).bg(Color::Blue))),
        chunks[1],
    );
}

/// Results laid out row by row, `columns_at(width)` cards per row
fn render_grid(frame: &mut Frame, app: &App, area: Rect) {
    let cards = app.state.cards();
    if cards.is_empty() || area.height == 0 {
        return;
    }

    let columns = app.state.layout.grid_class().columns_at(area.width).max(1) as usize;
    let col_constraints = vec![Constraint::Ratio(1, columns as u32); columns];
    let col_width = area.width / columns as u16;

    let mut y = area.y;
    for row in cards.chunks(columns).skip(app.scroll) {
        if y >= area.bottom() {
            break;
        }

        let rendered: Vec<_> = row.iter().map(|card| (card.kind, card_lines(card))).collect();
        let row_height = rendered
            .iter()
            .map(|(_, lines)| card_height(lines, col_width))
            .max()
            .unwrap_or(3)
            .min(area.bottom() - y);

        let row_area = Rect { x: area.x, y, width: area.width, height: row_height };
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(col_constraints.clone())
            .split(row_area);

        for ((kind, lines), cell) in rendered.into_iter().zip(cells.iter()) {
            let border = match kind {
                CardKind::Infobox => Style::default().fg(Color::Cyan),
                _ => Style::default().fg(Color::DarkGray),
            };
            let card = Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).border_style(border))
                .wrap(Wrap { trim: false });
            frame.render_widget(card, *cell);
        }

        y = y.saturating_add(row_height);
    }
}

/// Warning toast in the bottom-right corner
fn render_toast(frame: &mut Frame, app: &App) {
    let Some(message) = app.state.warning_message() else {
        return;
    };

    let screen = frame.area();
    let width = (message.chars().count() as u16 + 4).min(screen.width.saturating_sub(2)).max(8);
    let height = 3.min(screen.height);
    let area = Rect {
        x: screen.right().saturating_sub(width + 1),
        y: screen.bottom().saturating_sub(height + 1),
        width: width.min(screen.width),
        height,
    };

    let toast = Paragraph::new(Span::styled(message, Style::default().fg(Color::Yellow)))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Yellow)))
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, area);
    frame.render_widget(toast, area);
}
