//! OMDb wire format and the upstream seam the query service talks to.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;

use crate::config::OmdbConfig;
use crate::error::{MovieError, Result};
use crate::http::HttpClient;

/// Marker the upstream uses for any field it has no value for.
pub const NOT_AVAILABLE: &str = "N/A";

/// Results per search page, fixed by the upstream.
pub const OMDB_PAGE_SIZE: u64 = 10;

/// One movie record as returned by search (partial) or title lookup (full).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OmdbRecord {
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
    #[serde(rename = "Type")]
    pub media_type: Option<String>,
    #[serde(rename = "Poster")]
    pub poster: Option<String>,
    #[serde(rename = "Plot")]
    pub plot: Option<String>,
    #[serde(rename = "Released")]
    pub released: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "imdbVotes")]
    pub imdb_votes: Option<String>,
    #[serde(rename = "Runtime")]
    pub runtime: Option<String>,
    #[serde(rename = "Genre")]
    pub genre: Option<String>,
    #[serde(rename = "Actors")]
    pub actors: Option<String>,
    #[serde(rename = "Response")]
    pub response: Option<String>,
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

impl OmdbRecord {
    /// The upstream signals "no results" in-band with `Response: "False"`.
    pub fn is_failure(&self) -> bool {
        self.response.as_deref() == Some("False")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchEnvelope {
    #[serde(rename = "Search", default)]
    pub search: Vec<OmdbRecord>,
    #[serde(rename = "totalResults")]
    pub total_results: Option<String>,
    #[serde(rename = "Response")]
    pub response: Option<String>,
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

impl SearchEnvelope {
    pub fn is_failure(&self) -> bool {
        self.response.as_deref() == Some("False")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub title: String,
    pub page: u32,
    pub year: Option<i32>,
}

impl SearchRequest {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("s", self.title.clone()),
            ("type", "movie".to_string()),
            ("page", self.page.to_string()),
        ];
        if let Some(year) = self.year {
            pairs.push(("y", year.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleRequest {
    pub imdb_id: String,
}

impl TitleRequest {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![("i", self.imdb_id.clone()), ("plot", "full".to_string())]
    }
}

/// Upstream movie metadata source.
///
/// Implementations return the raw envelope; in-band failures
/// (`Response: "False"`) are interpreted by the caller.
#[async_trait]
pub trait OmdbApi: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<SearchEnvelope>;

    async fn title(&self, request: &TitleRequest) -> Result<OmdbRecord>;
}

/// [`OmdbApi`] over HTTP.
pub struct OmdbClient {
    http: HttpClient,
    base_url: Url,
    api_key: String,
}

impl OmdbClient {
    pub fn new(http: HttpClient, config: &OmdbConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(MovieError::MissingApiKey)?;
        let base_url = Url::parse(&config.base_url).map_err(|source| MovieError::InvalidBaseUrl {
            url: config.base_url.clone(),
            source,
        })?;

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    fn url_for(&self, pairs: &[(&'static str, String)]) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("apikey", &self.api_key);
            for (key, value) in pairs {
                query.append_pair(key, value);
            }
        }
        url
    }
}

#[async_trait]
impl OmdbApi for OmdbClient {
    #[instrument(skip(self, request), fields(title = %request.title, page = request.page))]
    async fn search(&self, request: &SearchRequest) -> Result<SearchEnvelope> {
        let url = self.url_for(&request.query_pairs());
        self.http.get_json(&url).await
    }

    #[instrument(skip(self, request), fields(imdb_id = %request.imdb_id))]
    async fn title(&self, request: &TitleRequest) -> Result<OmdbRecord> {
        let url = self.url_for(&request.query_pairs());
        self.http.get_json(&url).await
    }
}
