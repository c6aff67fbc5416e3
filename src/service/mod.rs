use tracing::{debug, error, info, instrument, warn};

use crate::adapter::{self, format_imdb_id};
use crate::error::{MovieError, Result};
use crate::genres;
use crate::models::{MovieDetails, MovieId, SearchPage};
use crate::omdb::{OmdbApi, SearchRequest, TitleRequest, OMDB_PAGE_SIZE};

/// Search terms standing in for a trending feed; page `n` uses entry
/// `(n - 1) % len`.
pub const TRENDING_TERMS: [&str; 10] = [
    "marvel",
    "star wars",
    "harry potter",
    "lord of the rings",
    "jurassic",
    "fast furious",
    "mission impossible",
    "batman",
    "spider-man",
    "avengers",
];

pub fn trending_term(page: u32) -> &'static str {
    let index = (page.max(1) - 1) as usize % TRENDING_TERMS.len();
    TRENDING_TERMS[index]
}

pub struct MovieService<A> {
    api: A,
}

impl<A: OmdbApi> MovieService<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Search movie titles.
    ///
    /// With `genre_id` set the page is filtered client-side, but
    /// `total_results` and `total_pages` still describe the unfiltered
    /// upstream result set.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        query: &str,
        page: u32,
        year: Option<i32>,
        genre_id: Option<u32>,
    ) -> Result<SearchPage> {
        let page = page.max(1);
        let request = SearchRequest {
            title: query.to_string(),
            page,
            year,
        };
        debug!("Searching with parameters: {:?}", request.query_pairs());

        let envelope = self.api.search(&request).await.map_err(|e| {
            error!("Search for '{}' failed: {}", query, e);
            e
        })?;

        if envelope.is_failure() {
            info!(
                "No results for '{}': {}",
                query,
                envelope.error.as_deref().unwrap_or("unknown reason")
            );
            return Ok(SearchPage::empty(page));
        }

        let mut results: Vec<_> = envelope.search.iter().map(adapter::to_movie).collect();
        if let Some(genre_id) = genre_id {
            if genres::aliases(genre_id).is_none() {
                warn!("Genre {} is not in the genre table", genre_id);
            }
            results.retain(|movie| genres::matches(genre_id, movie));
        }

        let total_results = envelope
            .total_results
            .as_deref()
            .and_then(|t| t.trim().parse::<u64>().ok())
            .unwrap_or(0);
        let total_pages = total_results.div_ceil(OMDB_PAGE_SIZE);

        info!(
            "Search '{}' page {}: {} results shown, {} total",
            query,
            page,
            results.len(),
            total_results
        );

        Ok(SearchPage {
            page,
            results,
            total_results,
            total_pages,
        })
    }

    #[instrument(skip(self))]
    pub async fn trending(&self, page: u32) -> Result<SearchPage> {
        let term = trending_term(page);
        info!("Trending page {} uses term '{}'", page, term);
        self.search(term, page, None, None).await
    }

    #[instrument(skip(self))]
    pub async fn details(&self, movie_id: MovieId) -> Result<MovieDetails> {
        let request = TitleRequest {
            imdb_id: format_imdb_id(movie_id),
        };
        info!("Fetching details for {}", request.imdb_id);

        let record = self.api.title(&request).await.map_err(|e| {
            error!("Details for {} failed: {}", request.imdb_id, e);
            e
        })?;

        if record.is_failure() {
            let message = record
                .error
                .unwrap_or_else(|| "Incorrect IMDb ID.".to_string());
            warn!("Upstream has no movie {}: {}", request.imdb_id, message);
            return Err(MovieError::NotFound { message });
        }

        Ok(adapter::to_details(&record))
    }
}
