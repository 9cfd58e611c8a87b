use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod animedb;

/// Page size the catalog UI requests. The remote caps result pages anyway,
/// and the grid is laid out for exactly this many entries.
pub const PAGE_SIZE: u32 = 12;

/// Genres the filter picker offers.
pub const GENRES: [&str; 13] = [
    "Action",
    "Adventure",
    "Comedy",
    "Drama",
    "Fantasy",
    "Horror",
    "Mystery",
    "Romance",
    "Sci-Fi",
    "Slice of Life",
    "Sports",
    "Supernatural",
    "Thriller",
];

/// One catalog entry returned by the remote search service.
///
/// `id` is the identity key: result pages and the favorites collection never
/// hold two entries sharing it. Favorited entries are snapshots of this
/// struct, so their display data may drift from the remote over time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Anime {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub alternative_titles: Vec<String>,
    #[serde(default)]
    pub ranking: u32,
    #[serde(default)]
    pub has_ranking: bool,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub episodes: Option<u32>,
    #[serde(default)]
    pub has_episode: bool,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub synopsis: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub external_link: String,
}

impl Anime {
    /// Preferred artwork URL, falling back to the thumbnail.
    pub fn cover_url(&self) -> Option<&str> {
        self.image.as_deref().or(self.thumbnail.as_deref())
    }
}

/// One page of search results plus pagination metadata. Each successful
/// fetch replaces the previous page wholesale; pages are never merged.
#[derive(Debug, Clone)]
pub struct AnimePage {
    pub items: Vec<Anime>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_results: u64,
}

impl Default for AnimePage {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            total_pages: 1,
            total_results: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Ranking,
    Title,
}

impl SortField {
    fn as_query_param(&self) -> &'static str {
        match self {
            SortField::Ranking => "ranking",
            SortField::Title => "title",
        }
    }

    pub fn as_display(&self) -> &'static str {
        match self {
            SortField::Ranking => "Ranking",
            SortField::Title => "Title",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            SortField::Ranking => SortField::Title,
            SortField::Title => SortField::Ranking,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn as_query_param(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn as_arrow(&self) -> &'static str {
        match self {
            SortOrder::Asc => "↑",
            SortOrder::Desc => "↓",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Parameters for one catalog search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub page: u32,
    pub page_size: u32,
    pub query: Option<String>,
    pub genres: Vec<String>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: PAGE_SIZE,
            query: None,
            genres: Vec::new(),
            sort_by: SortField::Ranking,
            sort_order: SortOrder::Asc,
        }
    }
}

impl SearchParams {
    /// Wire query pairs. `page` and `size` are always sent; `search` and
    /// `genres` only when non-empty. Sort keys are always sent since the
    /// params always carry a sort.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("size", self.page_size.to_string()),
        ];

        if let Some(query) = self.query.as_deref().filter(|q| !q.is_empty()) {
            pairs.push(("search", query.to_string()));
        }

        if !self.genres.is_empty() {
            pairs.push(("genres", self.genres.join(",")));
        }

        pairs.push(("sortBy", self.sort_by.as_query_param().to_string()));
        pairs.push(("sortOrder", self.sort_order.as_query_param().to_string()));

        pairs
    }
}

#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn search_page(&self, params: &SearchParams) -> Result<AnimePage>;
    async fn fetch_by_id(&self, id: &str) -> Result<Anime>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair<'a>(pairs: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_query_defaults() {
        let pairs = SearchParams::default().to_query();
        assert_eq!(pair(&pairs, "page"), Some("1"));
        assert_eq!(pair(&pairs, "size"), Some("12"));
        assert_eq!(pair(&pairs, "sortBy"), Some("ranking"));
        assert_eq!(pair(&pairs, "sortOrder"), Some("asc"));
        assert_eq!(pair(&pairs, "search"), None);
        assert_eq!(pair(&pairs, "genres"), None);
    }

    #[test]
    fn test_query_includes_search_and_genres() {
        let params = SearchParams {
            page: 3,
            query: Some("frieren".to_string()),
            genres: vec!["Action".to_string(), "Drama".to_string()],
            sort_by: SortField::Title,
            sort_order: SortOrder::Desc,
            ..Default::default()
        };
        let pairs = params.to_query();
        assert_eq!(pair(&pairs, "page"), Some("3"));
        assert_eq!(pair(&pairs, "search"), Some("frieren"));
        assert_eq!(pair(&pairs, "genres"), Some("Action,Drama"));
        assert_eq!(pair(&pairs, "sortBy"), Some("title"));
        assert_eq!(pair(&pairs, "sortOrder"), Some("desc"));
    }

    #[test]
    fn test_query_omits_empty_search() {
        let params = SearchParams {
            query: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(pair(&params.to_query(), "search"), None);
    }

    #[test]
    fn test_cover_url_fallback() {
        let mut anime = Anime {
            image: Some("full.jpg".to_string()),
            thumbnail: Some("thumb.jpg".to_string()),
            ..Default::default()
        };
        assert_eq!(anime.cover_url(), Some("full.jpg"));

        anime.image = None;
        assert_eq!(anime.cover_url(), Some("thumb.jpg"));

        anime.thumbnail = None;
        assert_eq!(anime.cover_url(), None);
    }
}
