use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use crate::favorites::Favorites;
use crate::theme::Palette;

use super::widgets::{titled_block, truncate};

pub fn render_favorites_view(
    frame: &mut Frame,
    area: Rect,
    favorites: &Favorites,
    list_state: &mut ListState,
    palette: &Palette,
    accent: Color,
) {
    let title = format!("Favorites ({})", favorites.len());

    if favorites.is_empty() {
        let empty = Paragraph::new("No favorites yet. Press Ctrl+F on a search result to add one.")
            .block(titled_block(&title, accent))
            .style(Style::default().fg(palette.dim));
        frame.render_widget(empty, area);
        return;
    }

    let title_width = area.width.saturating_sub(24) as usize / 2;

    let rows: Vec<ListItem> = favorites
        .items()
        .iter()
        .map(|anime| {
            let kind = if anime.kind.is_empty() {
                "–".to_string()
            } else {
                anime.kind.clone()
            };

            let line = Line::from(vec![
                Span::styled("♥ ", Style::default().fg(accent)),
                Span::styled(
                    format!("{:<w$}", truncate(&anime.title, title_width), w = title_width),
                    Style::default().fg(palette.foreground),
                ),
                Span::raw(" │ "),
                Span::styled(format!("{:<6}", kind), Style::default().fg(Color::Cyan)),
                Span::raw(" "),
                Span::styled(
                    truncate(&anime.genres.join(", "), title_width),
                    Style::default().fg(palette.dim),
                ),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(rows)
        .block(titled_block(&title, accent))
        .highlight_style(
            Style::default()
                .bg(accent)
                .fg(palette.highlight_fg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, list_state);
}
