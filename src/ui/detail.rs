use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::catalog::Anime;
use crate::theme::Palette;

use super::widgets::titled_block;

pub fn render_detail_view(
    frame: &mut Frame,
    area: Rect,
    anime: &Anime,
    is_favorite: bool,
    loading: bool,
    palette: &Palette,
    accent: Color,
) {
    let mut title = anime.title.clone();
    if is_favorite {
        title.push_str(" ♥");
    }
    if loading {
        title.push_str(" (refreshing...)");
    }

    let label = Style::default().fg(palette.dim);
    let value = Style::default().fg(palette.foreground);

    let mut lines = Vec::new();

    if !anime.alternative_titles.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Also known as: ", label),
            Span::styled(anime.alternative_titles.join(" / "), value),
        ]));
    }

    let mut facts = vec![];
    if !anime.kind.is_empty() {
        facts.push(format!("Type: {}", anime.kind));
    }
    if !anime.status.is_empty() {
        facts.push(format!("Status: {}", anime.status));
    }
    if anime.has_episode {
        if let Some(n) = anime.episodes {
            facts.push(format!("Episodes: {}", n));
        }
    }
    if anime.has_ranking {
        facts.push(format!("Rank: #{}", anime.ranking));
    }
    if !facts.is_empty() {
        lines.push(Line::from(Span::styled(facts.join("   "), value)));
    }

    if !anime.genres.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Genres: ", label),
            Span::styled(
                anime.genres.join(", "),
                Style::default().fg(Color::Cyan),
            ),
        ]));
    }

    if !anime.external_link.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Link: ", label),
            Span::styled(
                anime.external_link.clone(),
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::UNDERLINED),
            ),
        ]));
    }

    if let Some(url) = anime.cover_url() {
        lines.push(Line::from(vec![
            Span::styled("Art: ", label),
            Span::styled(url.to_string(), Style::default().fg(Color::Blue)),
        ]));
    }

    lines.push(Line::from(""));

    if anime.synopsis.is_empty() {
        lines.push(Line::from(Span::styled("No synopsis available.", label)));
    } else {
        lines.push(Line::from(Span::styled(anime.synopsis.clone(), value)));
    }

    let paragraph = Paragraph::new(lines)
        .block(titled_block(&title, accent))
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}
