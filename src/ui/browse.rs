use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use crate::catalog::Anime;
use crate::favorites::Favorites;
use crate::search::SearchState;
use crate::theme::Palette;

use super::widgets::{titled_block, truncate};

/// Genre tags shown per row before the list gets noisy.
const MAX_ROW_GENRES: usize = 3;

pub fn render_browse_view(
    frame: &mut Frame,
    area: Rect,
    query: &str,
    search: &SearchState,
    list_state: &mut ListState,
    favorites: &Favorites,
    palette: &Palette,
    accent: Color,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    render_search_input(frame, chunks[0], query, search.loading, accent);
    render_filter_bar(frame, chunks[1], search, palette);

    if let Some(message) = &search.error {
        render_error(frame, chunks[2], message, palette);
    } else {
        render_results(frame, chunks[2], search, list_state, favorites, palette, accent);
    }

    render_pagination_bar(frame, chunks[3], search, palette);
}

fn render_search_input(frame: &mut Frame, area: Rect, query: &str, loading: bool, accent: Color) {
    let title = if loading {
        "Search anime (loading...)"
    } else {
        "Search anime"
    };

    let input = Paragraph::new(query).block(titled_block(title, accent));
    frame.render_widget(input, area);

    frame.set_cursor_position((area.x + query.chars().count() as u16 + 1, area.y + 1));
}

fn render_filter_bar(frame: &mut Frame, area: Rect, search: &SearchState, palette: &Palette) {
    let params = &search.params;

    let genre_label = if params.genres.is_empty() {
        "all".to_string()
    } else {
        params.genres.join(",")
    };

    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled("^G", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(":Genres "),
        Span::styled(
            format!("[{}]", truncate(&genre_label, 40)),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  "),
        Span::styled("^S", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(":Sort "),
        Span::styled(
            format!(
                "[{} {}]",
                params.sort_by.as_display(),
                params.sort_order.as_arrow()
            ),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw("  "),
        Span::styled("^X", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(":Clear", Style::default().fg(palette.dim)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_error(frame: &mut Frame, area: Rect, message: &str, palette: &Palette) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Something went wrong",
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(palette.foreground),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press Ctrl+R to try again",
            Style::default().fg(palette.dim),
        )),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_results(
    frame: &mut Frame,
    area: Rect,
    search: &SearchState,
    list_state: &mut ListState,
    favorites: &Favorites,
    palette: &Palette,
    accent: Color,
) {
    let items = &search.page.items;

    if items.is_empty() {
        let message = if search.loading {
            "Loading..."
        } else {
            "No results. Type to search, Ctrl+G to filter by genre."
        };
        let empty = Paragraph::new(message)
            .block(titled_block("Results", accent))
            .style(Style::default().fg(palette.dim));
        frame.render_widget(empty, area);
        return;
    }

    let title_width = area.width.saturating_sub(30) as usize / 2;

    let rows: Vec<ListItem> = items
        .iter()
        .map(|anime| anime_row(anime, favorites, title_width, palette, accent))
        .collect();

    let list = List::new(rows)
        .block(titled_block("Results", accent))
        .highlight_style(
            Style::default()
                .bg(accent)
                .fg(palette.highlight_fg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, list_state);
}

fn anime_row<'a>(
    anime: &'a Anime,
    favorites: &Favorites,
    title_width: usize,
    palette: &Palette,
    accent: Color,
) -> ListItem<'a> {
    let favorite_marker = if favorites.contains(&anime.id) {
        Span::styled("♥ ", Style::default().fg(accent))
    } else {
        Span::raw("  ")
    };

    let rank = if anime.has_ranking {
        Span::styled(
            format!("{:>4}", anime.ranking),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled("   –", Style::default().fg(palette.dim))
    };

    let episodes = match anime.episodes {
        Some(n) if anime.has_episode => {
            Span::styled(format!("{:>4} ep", n), Style::default().fg(Color::Cyan))
        }
        _ => Span::styled("      –", Style::default().fg(palette.dim)),
    };

    let genres = truncate(
        &anime
            .genres
            .iter()
            .take(MAX_ROW_GENRES)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        title_width,
    );

    let line = Line::from(vec![
        favorite_marker,
        rank,
        Span::raw(" │ "),
        episodes,
        Span::raw(" │ "),
        Span::styled(
            format!("{:<w$}", truncate(&anime.title, title_width), w = title_width),
            Style::default().fg(palette.foreground),
        ),
        Span::raw(" "),
        Span::styled(genres, Style::default().fg(palette.dim)),
    ]);

    ListItem::new(line)
}

fn render_pagination_bar(frame: &mut Frame, area: Rect, search: &SearchState, palette: &Palette) {
    let page = &search.page;

    let line = if page.total_results > 0 {
        Line::from(vec![
            Span::raw(" "),
            Span::styled(
                format!("Page {}/{}", page.current_page, page.total_pages),
                Style::default().fg(palette.foreground),
            ),
            Span::styled(
                format!(" · Found {} anime", page.total_results),
                Style::default().fg(palette.dim),
            ),
            Span::styled("  ←/→ to change page", Style::default().fg(palette.dim)),
        ])
    } else {
        Line::from("")
    };

    frame.render_widget(Paragraph::new(line), area);
}
