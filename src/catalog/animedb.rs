use reqwest::{Client, header};
use serde::Deserialize;
use tracing::debug;

use crate::catalog::{Anime, AnimePage, CatalogProvider, SearchParams};
use crate::error::{Error, Result};

/// Client for the anime-db catalog API on RapidAPI.
///
/// Stateless between calls; authentication rides on static default headers.
/// No retry and no timeout beyond reqwest defaults.
pub struct AnimeDbClient {
    client: Client,
    host: String,
}

impl AnimeDbClient {
    pub fn new(key: &str, host: &str) -> Self {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "x-rapidapi-key",
            header::HeaderValue::from_str(key).unwrap(),
        );
        headers.insert(
            "x-rapidapi-host",
            header::HeaderValue::from_str(host).unwrap(),
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_default();

        Self {
            client,
            host: host.to_string(),
        }
    }

    fn status_error(status: reqwest::StatusCode) -> Error {
        Error::Api {
            status: status.as_u16(),
            reason: status
                .canonical_reason()
                .unwrap_or("Unknown")
                .to_string(),
        }
    }
}

#[async_trait::async_trait]
impl CatalogProvider for AnimeDbClient {
    async fn search_page(&self, params: &SearchParams) -> Result<AnimePage> {
        let url = format!("https://{}/anime", self.host);

        debug!(url = %url, page = params.page, query = ?params.query, "Fetching catalog page");

        let response = self.client.get(&url).query(&params.to_query()).send().await?;

        if !response.status().is_success() {
            return Err(Self::status_error(response.status()));
        }

        let resp: SearchResponse = response.json().await?;
        let meta = resp.meta.unwrap_or_default();

        Ok(AnimePage {
            items: resp.data.into_iter().map(Anime::from).collect(),
            current_page: meta.page.unwrap_or(1),
            total_pages: meta.total_page.unwrap_or(1),
            total_results: meta.total_data.unwrap_or(0),
        })
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Anime> {
        let url = format!("https://{}/anime/by-id/{}", self.host, id);

        debug!(url = %url, "Fetching anime by id");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(Self::status_error(response.status()));
        }

        let wire: WireAnime = response.json().await?;
        Ok(wire.into())
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<WireAnime>,
    meta: Option<WireMeta>,
}

#[derive(Deserialize, Default)]
struct WireMeta {
    page: Option<u32>,
    #[serde(rename = "totalData")]
    total_data: Option<u64>,
    #[serde(rename = "totalPage")]
    total_page: Option<u32>,
}

#[derive(Deserialize)]
struct WireAnime {
    #[serde(rename = "_id")]
    id: String,
    title: String,
    #[serde(rename = "alternativeTitles", default)]
    alternative_titles: Vec<String>,
    #[serde(default)]
    ranking: u32,
    #[serde(rename = "hasRanking", default)]
    has_ranking: bool,
    #[serde(default)]
    genres: Vec<String>,
    #[serde(default)]
    episodes: Option<u32>,
    #[serde(rename = "hasEpisode", default)]
    has_episode: bool,
    #[serde(default)]
    image: Option<String>,
    #[serde(rename = "thumb", default)]
    thumbnail: Option<String>,
    #[serde(default)]
    synopsis: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(rename = "link", default)]
    external_link: Option<String>,
}

impl From<WireAnime> for Anime {
    fn from(wire: WireAnime) -> Self {
        Anime {
            id: wire.id,
            title: wire.title,
            alternative_titles: wire.alternative_titles,
            ranking: wire.ranking,
            has_ranking: wire.has_ranking,
            genres: wire.genres,
            episodes: wire.episodes,
            has_episode: wire.has_episode,
            // The remote sends empty strings for missing artwork
            image: wire.image.filter(|s| !s.is_empty()),
            thumbnail: wire.thumbnail.filter(|s| !s.is_empty()),
            synopsis: wire.synopsis.unwrap_or_default(),
            status: wire.status.unwrap_or_default(),
            kind: wire.kind.unwrap_or_default(),
            external_link: wire.external_link.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let body = r#"{
            "data": [{
                "_id": "abc123",
                "title": "Cowboy Bebop",
                "alternativeTitles": ["カウボーイビバップ"],
                "ranking": 42,
                "hasRanking": true,
                "genres": ["Action", "Sci-Fi"],
                "episodes": 26,
                "hasEpisode": true,
                "image": "https://cdn.example/full.jpg",
                "thumb": "",
                "synopsis": "Bounty hunters in space.",
                "status": "Finished",
                "type": "TV",
                "link": "https://example/abc123"
            }],
            "meta": { "page": 2, "size": 12, "totalData": 50, "totalPage": 5 }
        }"#;

        let resp: SearchResponse = serde_json::from_str(body).unwrap();
        let meta = resp.meta.unwrap();
        assert_eq!(meta.page, Some(2));
        assert_eq!(meta.total_page, Some(5));
        assert_eq!(meta.total_data, Some(50));

        let anime: Anime = resp.data.into_iter().next().unwrap().into();
        assert_eq!(anime.id, "abc123");
        assert_eq!(anime.genres, vec!["Action", "Sci-Fi"]);
        assert_eq!(anime.episodes, Some(26));
        // Empty thumb string becomes a real absence
        assert_eq!(anime.thumbnail, None);
        assert_eq!(anime.cover_url(), Some("https://cdn.example/full.jpg"));
    }

    #[test]
    fn test_parse_sparse_response() {
        let body = r#"{ "data": [{ "_id": "x", "title": "Unknown Show" }] }"#;

        let resp: SearchResponse = serde_json::from_str(body).unwrap();
        assert!(resp.meta.is_none());

        let anime: Anime = resp.data.into_iter().next().unwrap().into();
        assert_eq!(anime.title, "Unknown Show");
        assert!(!anime.has_ranking);
        assert_eq!(anime.episodes, None);
        assert_eq!(anime.cover_url(), None);
        assert_eq!(anime.synopsis, "");
    }
}
