use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, ListState},
};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::catalog::{Anime, AnimePage, CatalogProvider};
use crate::config::Config;
use crate::error::Result;
use crate::favorites::Favorites;
use crate::search::{QUERY_DEBOUNCE, QueryDebounce, SearchState};
use crate::theme::ThemeStore;
use crate::ui::{
    render_browse_view, render_detail_view, render_favorites_view, render_genre_picker, widgets,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    Browse,
    Favorites,
    Detail,
    GenrePicker,
    Help,
}

pub enum AppMessage {
    PageLoaded(u64, Result<AnimePage>),
    DetailLoaded(String, Result<Anime>),
}

pub struct App {
    pub running: bool,
    pub view: View,
    pub previous_view: View,
    pub accent: Color,

    pub search: SearchState,
    pub query_input: String,
    pub debounce: QueryDebounce,
    pub results_state: ListState,

    pub favorites: Favorites,
    pub favorites_state: ListState,

    pub theme: ThemeStore,

    pub detail: Option<Anime>,
    pub detail_loading: bool,

    pub genre_picker_state: ListState,
    pub pending_genres: Vec<String>,

    pub msg_tx: mpsc::UnboundedSender<AppMessage>,
    pub msg_rx: mpsc::UnboundedReceiver<AppMessage>,

    pub provider: Arc<dyn CatalogProvider>,
}

impl App {
    pub fn new(
        config: &Config,
        provider: Arc<dyn CatalogProvider>,
        favorites: Favorites,
        theme: ThemeStore,
    ) -> Self {
        let accent = widgets::parse_accent_color(&config.ui.accent_color);

        let (msg_tx, msg_rx) = mpsc::unbounded_channel();

        Self {
            running: true,
            view: View::Browse,
            previous_view: View::Browse,
            accent,

            search: SearchState::new(),
            query_input: String::new(),
            debounce: QueryDebounce::new(QUERY_DEBOUNCE),
            results_state: ListState::default(),

            favorites,
            favorites_state: ListState::default(),

            theme,

            detail: None,
            detail_loading: false,

            genre_picker_state: ListState::default(),
            pending_genres: Vec::new(),

            msg_tx,
            msg_rx,

            provider,
        }
    }

    pub async fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        // Populate the catalog with the default params right away
        self.start_search();

        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events()?;
            self.fire_debounce();
            self.process_messages();
        }

        Ok(())
    }

    /// Issues the fetch for the current params. Used for every parameter
    /// change and for refresh (which changes nothing first).
    fn start_search(&mut self) {
        let seq = self.search.begin_fetch();
        let params = self.search.params.clone();
        let provider = self.provider.clone();
        let tx = self.msg_tx.clone();

        tokio::spawn(async move {
            let result = provider.search_page(&params).await;
            let _ = tx.send(AppMessage::PageLoaded(seq, result));
        });
    }

    fn fire_debounce(&mut self) {
        if let Some(query) = self.debounce.fire(Instant::now()) {
            self.search.set_query(&query);
            self.start_search();
        }
    }

    fn process_messages(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            match msg {
                AppMessage::PageLoaded(seq, result) => {
                    if let Err(e) = &result {
                        error!(error = %e, "Catalog fetch failed");
                    }
                    self.search.apply(seq, result);
                    if self.search.page.items.is_empty() {
                        self.results_state.select(None);
                    } else {
                        self.results_state.select(Some(0));
                    }
                }
                AppMessage::DetailLoaded(id, result) => {
                    self.detail_loading = false;
                    match result {
                        Ok(anime) => {
                            if self.detail.as_ref().is_some_and(|d| d.id == id) {
                                self.detail = Some(anime);
                            }
                        }
                        Err(e) => error!(error = %e, id = %id, "Detail fetch failed"),
                    }
                }
            }
        }
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match self.view {
                        View::Browse => self.handle_browse_input(key),
                        View::Favorites => self.handle_favorites_input(key),
                        View::Detail => self.handle_detail_input(key),
                        View::GenrePicker => self.handle_genre_picker_input(key),
                        View::Help => self.handle_help_input(key),
                    }
                }
            }
        }
        Ok(())
    }

    fn handle_browse_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }
            KeyCode::Esc => {
                if self.query_input.is_empty() {
                    self.running = false;
                } else {
                    self.query_input.clear();
                    self.debounce.arm(String::new(), Instant::now());
                }
            }
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let field = self.search.params.sort_by.next();
                let order = self.search.params.sort_order;
                self.search.set_sort(field, order);
                self.start_search();
            }
            KeyCode::Char('o') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let field = self.search.params.sort_by;
                let order = self.search.params.sort_order.toggled();
                self.search.set_sort(field, order);
                self.start_search();
            }
            KeyCode::Char('g') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.pending_genres = self.search.params.genres.clone();
                self.genre_picker_state.select(Some(0));
                self.view = View::GenrePicker;
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.start_search();
            }
            KeyCode::Char('x') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.query_input.clear();
                self.debounce.cancel();
                self.search.clear_filters();
                self.start_search();
            }
            KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.theme.toggle();
            }
            KeyCode::Char('f') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.toggle_selected_favorite();
            }
            KeyCode::Char('v') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.favorites_state.select(if self.favorites.is_empty() {
                    None
                } else {
                    Some(0)
                });
                self.view = View::Favorites;
            }
            KeyCode::Left | KeyCode::PageUp => {
                self.go_to_page(self.search.page.current_page.saturating_sub(1));
            }
            KeyCode::Right | KeyCode::PageDown => {
                self.go_to_page(self.search.page.current_page + 1);
            }
            KeyCode::Up => self.move_selection_up(),
            KeyCode::Down | KeyCode::Tab => self.move_selection_down(),
            KeyCode::Enter => self.open_selected_detail(),
            KeyCode::Backspace => {
                self.query_input.pop();
                self.debounce.arm(self.query_input.clone(), Instant::now());
            }
            KeyCode::Char('?') => {
                self.previous_view = self.view;
                self.view = View::Help;
            }
            KeyCode::Char(c) => {
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    self.query_input.push(c);
                    self.debounce.arm(self.query_input.clone(), Instant::now());
                }
            }
            _ => {}
        }
    }

    fn handle_favorites_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.view = View::Browse;
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_selection_up(),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection_down(),
            KeyCode::Enter => {
                if let Some(idx) = self.favorites_state.selected() {
                    if let Some(anime) = self.favorites.get(idx) {
                        self.detail = Some(anime.clone());
                        self.previous_view = View::Favorites;
                        self.view = View::Detail;
                    }
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(idx) = self.favorites_state.selected() {
                    if let Some(anime) = self.favorites.get(idx) {
                        let id = anime.id.clone();
                        if let Err(e) = self.favorites.remove(&id) {
                            error!(error = %e, "Failed to persist favorites");
                        }
                        if self.favorites.is_empty() {
                            self.favorites_state.select(None);
                        } else {
                            self.favorites_state
                                .select(Some(idx.min(self.favorites.len() - 1)));
                        }
                    }
                }
            }
            KeyCode::Char('C') => {
                if let Err(e) = self.favorites.clear() {
                    error!(error = %e, "Failed to persist favorites");
                }
                self.favorites_state.select(None);
            }
            KeyCode::Char('t') => {
                self.theme.toggle();
            }
            KeyCode::Char('?') => {
                self.previous_view = self.view;
                self.view = View::Help;
            }
            _ => {}
        }
    }

    fn handle_detail_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.detail = None;
                self.detail_loading = false;
                self.view = self.previous_view;
            }
            KeyCode::Char('f') => {
                if let Some(anime) = self.detail.clone() {
                    self.toggle_favorite(&anime);
                }
            }
            KeyCode::Char('r') => self.refresh_detail(),
            KeyCode::Char('t') => {
                self.theme.toggle();
            }
            _ => {}
        }
    }

    fn handle_genre_picker_input(&mut self, key: KeyEvent) {
        let genre_count = crate::catalog::GENRES.len();
        match key.code {
            KeyCode::Esc => {
                self.view = View::Browse;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let i = match self.genre_picker_state.selected() {
                    Some(0) | None => genre_count - 1,
                    Some(i) => i - 1,
                };
                self.genre_picker_state.select(Some(i));
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let i = match self.genre_picker_state.selected() {
                    Some(i) => (i + 1) % genre_count,
                    None => 0,
                };
                self.genre_picker_state.select(Some(i));
            }
            KeyCode::Char(' ') => {
                if let Some(idx) = self.genre_picker_state.selected() {
                    let genre = crate::catalog::GENRES[idx].to_string();
                    if let Some(pos) = self.pending_genres.iter().position(|g| *g == genre) {
                        self.pending_genres.remove(pos);
                    } else {
                        self.pending_genres.push(genre);
                    }
                }
            }
            KeyCode::Enter => {
                self.search.set_genres(self.pending_genres.clone());
                self.view = View::Browse;
                self.start_search();
            }
            _ => {}
        }
    }

    fn handle_help_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => {
                self.view = self.previous_view;
            }
            _ => {}
        }
    }

    /// Page navigation with UI-side clamping. The coordinator itself passes
    /// any page through; only key handling stays within known bounds.
    fn go_to_page(&mut self, page: u32) {
        if page < 1
            || page > self.search.page.total_pages
            || page == self.search.page.current_page
        {
            return;
        }
        self.search.go_to_page(page);
        self.start_search();
    }

    fn move_selection_down(&mut self) {
        let (state, len) = match self.view {
            View::Browse => (&mut self.results_state, self.search.page.items.len()),
            View::Favorites => (&mut self.favorites_state, self.favorites.len()),
            _ => return,
        };

        if len == 0 {
            return;
        }

        let next = match state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        state.select(Some(next));
    }

    fn move_selection_up(&mut self) {
        let (state, len) = match self.view {
            View::Browse => (&mut self.results_state, self.search.page.items.len()),
            View::Favorites => (&mut self.favorites_state, self.favorites.len()),
            _ => return,
        };

        if len > 0 {
            let i = match state.selected() {
                Some(0) | None => len - 1,
                Some(i) => i - 1,
            };
            state.select(Some(i));
        }
    }

    fn toggle_selected_favorite(&mut self) {
        if let Some(idx) = self.results_state.selected() {
            if let Some(anime) = self.search.page.items.get(idx) {
                let anime = anime.clone();
                self.toggle_favorite(&anime);
            }
        }
    }

    fn toggle_favorite(&mut self, anime: &Anime) {
        match self.favorites.toggle(anime) {
            Ok(true) => info!(title = %anime.title, "Added favorite"),
            Ok(false) => info!(title = %anime.title, "Removed favorite"),
            Err(e) => error!(error = %e, "Failed to persist favorites"),
        }
    }

    fn open_selected_detail(&mut self) {
        if let Some(idx) = self.results_state.selected() {
            if let Some(anime) = self.search.page.items.get(idx) {
                self.detail = Some(anime.clone());
                self.previous_view = View::Browse;
                self.view = View::Detail;
            }
        }
    }

    /// Re-fetches the open detail entry through the by-id endpoint, picking
    /// up remote changes a stale favorite snapshot would miss.
    fn refresh_detail(&mut self) {
        let Some(id) = self.detail.as_ref().map(|a| a.id.clone()) else {
            return;
        };

        self.detail_loading = true;
        let provider = self.provider.clone();
        let tx = self.msg_tx.clone();

        tokio::spawn(async move {
            let result = provider.fetch_by_id(&id).await;
            let _ = tx.send(AppMessage::DetailLoaded(id, result));
        });
    }

    fn render(&mut self, frame: &mut Frame) {
        let palette = self.theme.palette();

        frame.render_widget(
            Block::default().style(
                Style::default()
                    .bg(palette.background)
                    .fg(palette.foreground),
            ),
            frame.area(),
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(frame.area());

        let main_area = chunks[0];
        let help_area = chunks[1];

        match self.view {
            View::Browse => {
                render_browse_view(
                    frame,
                    main_area,
                    &self.query_input,
                    &self.search,
                    &mut self.results_state,
                    &self.favorites,
                    &palette,
                    self.accent,
                );

                let help = widgets::help_bar(&[
                    ("^G", "genres"),
                    ("^S/^O", "sort"),
                    ("←/→", "page"),
                    ("^F", "favorite"),
                    ("^V", "favorites"),
                    ("?", "help"),
                ]);
                frame.render_widget(help, help_area);
            }
            View::Favorites => {
                render_favorites_view(
                    frame,
                    main_area,
                    &self.favorites,
                    &mut self.favorites_state,
                    &palette,
                    self.accent,
                );

                let help = widgets::help_bar(&[
                    ("Enter", "details"),
                    ("d", "remove"),
                    ("C", "clear all"),
                    ("Esc", "back"),
                ]);
                frame.render_widget(help, help_area);
            }
            View::Detail => {
                if let Some(anime) = &self.detail {
                    render_detail_view(
                        frame,
                        main_area,
                        anime,
                        self.favorites.contains(&anime.id),
                        self.detail_loading,
                        &palette,
                        self.accent,
                    );
                }

                let help = widgets::help_bar(&[
                    ("f", "favorite"),
                    ("r", "refresh"),
                    ("Esc", "back"),
                ]);
                frame.render_widget(help, help_area);
            }
            View::GenrePicker => {
                render_browse_view(
                    frame,
                    main_area,
                    &self.query_input,
                    &self.search,
                    &mut self.results_state,
                    &self.favorites,
                    &palette,
                    self.accent,
                );
                render_genre_picker(
                    frame,
                    &self.pending_genres,
                    &mut self.genre_picker_state,
                    &palette,
                    self.accent,
                );

                let help = widgets::help_bar(&[
                    ("Space", "toggle"),
                    ("Enter", "apply"),
                    ("Esc", "cancel"),
                ]);
                frame.render_widget(help, help_area);
            }
            View::Help => {
                self.render_help(frame);
            }
        }
    }

    fn render_help(&self, frame: &mut Frame) {
        use ratatui::layout::Rect;
        use ratatui::style::{Modifier, Style};
        use ratatui::widgets::{Block, Borders, Clear, Row, Table};

        let area = frame.area();
        let dialog_area = Rect {
            x: area.width.saturating_sub(60) / 2,
            y: area.height.saturating_sub(24) / 2,
            width: 60.min(area.width),
            height: 24.min(area.height),
        };

        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.accent));

        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let rows = vec![
            Row::new(vec!["Browse", "type", "Search (fires after a pause)"]),
            Row::new(vec!["", "↑/↓", "Select result"]),
            Row::new(vec!["", "←/→", "Previous/next page"]),
            Row::new(vec!["", "Enter", "View details"]),
            Row::new(vec!["", "Ctrl+F", "Toggle favorite"]),
            Row::new(vec!["", "Ctrl+V", "Open favorites"]),
            Row::new(vec!["", "Ctrl+G", "Genre filter"]),
            Row::new(vec!["", "Ctrl+S", "Sort field"]),
            Row::new(vec!["", "Ctrl+O", "Sort direction"]),
            Row::new(vec!["", "Ctrl+X", "Clear all filters"]),
            Row::new(vec!["", "Ctrl+R", "Refresh / try again"]),
            Row::new(vec!["", "Ctrl+T", "Toggle theme"]),
            Row::new(vec!["", "Ctrl+Q", "Quit"]),
            Row::new(vec!["Favorites", "d", "Remove"]),
            Row::new(vec!["", "C", "Clear all"]),
            Row::new(vec!["Detail", "f", "Toggle favorite"]),
            Row::new(vec!["", "r", "Re-fetch from remote"]),
        ];

        let table = Table::new(
            rows,
            [
                Constraint::Length(10),
                Constraint::Length(8),
                Constraint::Min(20),
            ],
        )
        .header(
            Row::new(vec!["View", "Key", "Action"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        );

        frame.render_widget(table, inner);
    }
}

pub fn init_terminal() -> io::Result<DefaultTerminal> {
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
    Ok(ratatui::init())
}

pub fn restore_terminal() -> io::Result<()> {
    ratatui::restore();
    Ok(())
}
