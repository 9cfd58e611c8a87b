//! Search state coordination.
//!
//! `SearchState` owns the current search parameters and the fetch lifecycle
//! flags the views read. It performs no I/O itself: the app spawns the
//! provider call and routes the settled result back through [`SearchState::apply`]
//! with the token [`SearchState::begin_fetch`] handed out. Results carrying a
//! superseded token are discarded, so a slow early request can never
//! overwrite a newer page.

use std::time::{Duration, Instant};

use crate::catalog::{AnimePage, SearchParams, SortField, SortOrder};
use crate::error::Result;

/// Quiet period after the last keystroke before a query fetch fires.
pub const QUERY_DEBOUNCE: Duration = Duration::from_millis(500);

pub struct SearchState {
    pub params: SearchParams,
    pub page: AnimePage,
    pub loading: bool,
    pub error: Option<String>,
    last_issued: u64,
}

impl SearchState {
    pub fn new() -> Self {
        Self {
            params: SearchParams::default(),
            page: AnimePage::default(),
            loading: false,
            error: None,
            last_issued: 0,
        }
    }

    /// Free-text query. Empty text clears it. Resets to the first page.
    pub fn set_query(&mut self, text: &str) {
        self.params.query = if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        };
        self.params.page = 1;
    }

    /// Genre filter. An empty set clears it. Resets to the first page.
    pub fn set_genres(&mut self, genres: Vec<String>) {
        self.params.genres = genres;
        self.params.page = 1;
    }

    pub fn set_sort(&mut self, field: SortField, order: SortOrder) {
        self.params.sort_by = field;
        self.params.sort_order = order;
        self.params.page = 1;
    }

    /// Page navigation only. Out-of-range values pass through unvalidated;
    /// the remote decides what page comes back.
    pub fn go_to_page(&mut self, page: u32) {
        self.params.page = page;
    }

    pub fn clear_filters(&mut self) {
        self.params = SearchParams::default();
    }

    /// Marks a fetch in flight and returns its token. Only the most recently
    /// issued token may settle visibly.
    pub fn begin_fetch(&mut self) -> u64 {
        self.last_issued += 1;
        self.loading = true;
        self.error = None;
        self.last_issued
    }

    /// Settles a fetch. Success replaces the page wholesale; failure clears
    /// the items and records a user-facing message. This is the only place
    /// an internal failure becomes user-visible text.
    pub fn apply(&mut self, seq: u64, result: Result<AnimePage>) {
        if seq != self.last_issued {
            return;
        }

        self.loading = false;
        match result {
            Ok(page) => {
                self.page = page;
                self.error = None;
            }
            Err(err) => {
                self.page.items.clear();
                self.error = Some(err.to_string());
            }
        }
    }
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}

/// Cancellable deadline for free-text input. Arming within the window
/// replaces the previous deadline, so only the final value of a typing
/// burst ever fires. Genre, sort, and page changes bypass this entirely.
pub struct QueryDebounce {
    pending: Option<(String, Instant)>,
    window: Duration,
}

impl QueryDebounce {
    pub fn new(window: Duration) -> Self {
        Self {
            pending: None,
            window,
        }
    }

    pub fn arm(&mut self, query: String, now: Instant) {
        self.pending = Some((query, now + self.window));
    }

    /// Returns the armed query once its deadline has elapsed, at most once
    /// per arming.
    pub fn fire(&mut self, now: Instant) -> Option<String> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|(_, deadline)| *deadline <= now);
        if due {
            self.pending.take().map(|(query, _)| query)
        } else {
            None
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Anime;
    use crate::error::Error;

    fn anime(id: &str) -> Anime {
        Anime {
            id: id.to_string(),
            title: id.to_uppercase(),
            ..Default::default()
        }
    }

    fn page(ids: &[&str], current: u32, total_pages: u32, total: u64) -> AnimePage {
        AnimePage {
            items: ids.iter().map(|id| anime(id)).collect(),
            current_page: current,
            total_pages,
            total_results: total,
        }
    }

    fn server_error() -> Error {
        Error::Api {
            status: 500,
            reason: "Internal Server Error".to_string(),
        }
    }

    #[test]
    fn test_defaults() {
        let state = SearchState::new();
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert!(state.page.items.is_empty());
        assert_eq!(state.params, SearchParams::default());
    }

    #[test]
    fn test_param_changes_reset_page() {
        let mut state = SearchState::new();
        state.go_to_page(7);
        state.set_query("bebop");
        assert_eq!(state.params.page, 1);

        state.go_to_page(7);
        state.set_genres(vec!["Action".to_string()]);
        assert_eq!(state.params.page, 1);

        state.go_to_page(7);
        state.set_sort(SortField::Title, SortOrder::Desc);
        assert_eq!(state.params.page, 1);

        state.go_to_page(7);
        assert_eq!(state.params.page, 7);
    }

    #[test]
    fn test_empty_query_clears() {
        let mut state = SearchState::new();
        state.set_query("bebop");
        assert_eq!(state.params.query.as_deref(), Some("bebop"));
        state.set_query("");
        assert_eq!(state.params.query, None);
    }

    #[test]
    fn test_clear_filters_restores_defaults() {
        let mut state = SearchState::new();
        state.set_query("bebop");
        state.set_genres(vec!["Action".to_string()]);
        state.set_sort(SortField::Title, SortOrder::Desc);
        state.go_to_page(4);

        state.clear_filters();
        assert_eq!(state.params, SearchParams::default());
        assert_eq!(state.params.page, 1);
        assert_eq!(state.params.page_size, 12);
    }

    #[test]
    fn test_successful_fetch_settlement() {
        let mut state = SearchState::new();
        state.go_to_page(2);

        let seq = state.begin_fetch();
        assert!(state.loading);
        assert!(state.error.is_none());

        state.apply(seq, Ok(page(&["a", "b"], 2, 5, 50)));
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert_eq!(state.page.items.len(), 2);
        assert_eq!(state.page.current_page, 2);
        assert_eq!(state.page.total_pages, 5);
        assert_eq!(state.page.total_results, 50);
    }

    #[test]
    fn test_failed_fetch_clears_items() {
        let mut state = SearchState::new();
        let seq = state.begin_fetch();
        state.apply(seq, Ok(page(&["a", "b"], 1, 5, 50)));

        let seq = state.begin_fetch();
        state.apply(seq, Err(server_error()));

        assert!(!state.loading);
        assert!(state.page.items.is_empty());
        let msg = state.error.as_deref().unwrap();
        assert!(!msg.is_empty());
        assert!(msg.contains("500"));
    }

    #[test]
    fn test_begin_fetch_clears_previous_error() {
        let mut state = SearchState::new();
        let seq = state.begin_fetch();
        state.apply(seq, Err(server_error()));
        assert!(state.error.is_some());

        state.begin_fetch();
        assert!(state.error.is_none());
        assert!(state.loading);
    }

    #[test]
    fn test_stale_result_discarded() {
        let mut state = SearchState::new();
        let first = state.begin_fetch();
        let second = state.begin_fetch();

        // The slow first request settles after a newer one was issued
        state.apply(first, Ok(page(&["stale"], 1, 1, 1)));
        assert!(state.loading);
        assert!(state.page.items.is_empty());

        state.apply(second, Ok(page(&["fresh"], 2, 5, 50)));
        assert!(!state.loading);
        assert_eq!(state.page.items[0].id, "fresh");
    }

    #[test]
    fn test_stale_result_after_newer_settled() {
        let mut state = SearchState::new();
        let first = state.begin_fetch();
        let second = state.begin_fetch();

        state.apply(second, Ok(page(&["fresh"], 2, 5, 50)));
        state.apply(first, Ok(page(&["stale"], 1, 1, 1)));

        assert_eq!(state.page.items[0].id, "fresh");
        assert_eq!(state.page.current_page, 2);
    }

    #[test]
    fn test_stale_error_does_not_clobber() {
        let mut state = SearchState::new();
        let first = state.begin_fetch();
        let second = state.begin_fetch();

        state.apply(second, Ok(page(&["fresh"], 1, 1, 1)));
        state.apply(first, Err(server_error()));

        assert!(state.error.is_none());
        assert_eq!(state.page.items.len(), 1);
    }

    #[test]
    fn test_debounce_single_fire_with_final_value() {
        let mut debounce = QueryDebounce::new(QUERY_DEBOUNCE);
        let start = Instant::now();

        debounce.arm("c".to_string(), start);
        debounce.arm("co".to_string(), start + Duration::from_millis(200));
        debounce.arm("cow".to_string(), start + Duration::from_millis(400));

        // Not yet quiet for the full window after the last keystroke
        assert_eq!(debounce.fire(start + Duration::from_millis(899)), None);

        let fired = debounce.fire(start + Duration::from_millis(900));
        assert_eq!(fired.as_deref(), Some("cow"));

        // Fires at most once per arming
        assert_eq!(debounce.fire(start + Duration::from_millis(2000)), None);
    }

    #[test]
    fn test_debounce_cancel() {
        let mut debounce = QueryDebounce::new(QUERY_DEBOUNCE);
        let start = Instant::now();

        debounce.arm("query".to_string(), start);
        debounce.cancel();
        assert_eq!(debounce.fire(start + Duration::from_secs(5)), None);
    }
}
