use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, List, ListItem, ListState},
};

use crate::catalog::GENRES;
use crate::theme::Palette;

use super::widgets::titled_block;

/// Centered overlay for multi-selecting genre filters.
pub fn render_genre_picker(
    frame: &mut Frame,
    selected: &[String],
    list_state: &mut ListState,
    palette: &Palette,
    accent: Color,
) {
    let area = frame.area();
    let height = (GENRES.len() as u16 + 2).min(area.height);
    let dialog_area = Rect {
        x: area.width.saturating_sub(30) / 2,
        y: area.height.saturating_sub(height) / 2,
        width: 30.min(area.width),
        height,
    };

    frame.render_widget(Clear, dialog_area);

    let rows: Vec<ListItem> = GENRES
        .iter()
        .map(|genre| {
            let marker = if selected.iter().any(|g| g == genre) {
                Span::styled("[x] ", Style::default().fg(accent))
            } else {
                Span::styled("[ ] ", Style::default().fg(palette.dim))
            };
            ListItem::new(Line::from(vec![
                marker,
                Span::styled(*genre, Style::default().fg(palette.foreground)),
            ]))
        })
        .collect();

    let list = List::new(rows)
        .block(titled_block("Genres", accent))
        .highlight_style(
            Style::default()
                .bg(accent)
                .fg(palette.highlight_fg)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(list, dialog_area, list_state);
}
