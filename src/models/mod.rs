use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::adapter::RATING_SCALE;

/// Numeric movie identifier derived from the IMDb id. `0` means unknown.
pub type MovieId = u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    #[serde(rename = "imdbID", skip_serializing_if = "Option::is_none", default)]
    pub imdb_id: Option<String>,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub overview: String,
    pub release_date: String,
    /// Stored on the doubled scale, see [`RATING_SCALE`].
    pub vote_average: f64,
    pub vote_count: u64,
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Minutes, `0` when unknown.
    #[serde(default)]
    pub runtime: u32,
}

impl Movie {
    /// Rating back on the upstream 0-10 scale, `None` when unrated.
    pub fn display_rating(&self) -> Option<f64> {
        if self.vote_average > 0.0 {
            Some(self.vote_average / RATING_SCALE)
        } else {
            None
        }
    }

    pub fn release_year(&self) -> Option<i32> {
        let raw = self.release_date.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%d %b %Y") {
            return Some(chrono::Datelike::year(&date));
        }
        let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.len() == 4 {
            digits.parse().ok()
        } else {
            None
        }
    }

    pub fn runtime_label(&self) -> Option<String> {
        if self.runtime == 0 {
            return None;
        }
        Some(format!("{}h {}m", self.runtime / 60, self.runtime % 60))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u32,
    pub name: String,
    pub character: String,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub movie: Movie,
    pub cast: Vec<CastMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub page: u32,
    pub results: Vec<Movie>,
    pub total_results: u64,
    pub total_pages: u64,
}

impl SearchPage {
    pub fn empty(page: u32) -> Self {
        Self {
            page,
            results: Vec::new(),
            total_results: 0,
            total_pages: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie_with(release_date: &str, vote_average: f64, runtime: u32) -> Movie {
        Movie {
            id: 1,
            imdb_id: None,
            title: "Test".to_string(),
            poster_path: None,
            backdrop_path: None,
            overview: String::new(),
            release_date: release_date.to_string(),
            vote_average,
            vote_count: 0,
            genres: Vec::new(),
            runtime,
        }
    }

    #[test]
    fn release_year_handles_upstream_date_shapes() {
        assert_eq!(movie_with("16 Jul 2010", 0.0, 0).release_year(), Some(2010));
        assert_eq!(movie_with("1999", 0.0, 0).release_year(), Some(1999));
        assert_eq!(movie_with("2010–2012", 0.0, 0).release_year(), Some(2010));
        assert_eq!(movie_with("", 0.0, 0).release_year(), None);
        assert_eq!(movie_with("soon", 0.0, 0).release_year(), None);
    }

    #[test]
    fn display_rating_halves_stored_value() {
        assert_eq!(movie_with("", 17.6, 0).display_rating(), Some(8.8));
        assert_eq!(movie_with("", 0.0, 0).display_rating(), None);
    }

    #[test]
    fn runtime_label_splits_hours_and_minutes() {
        assert_eq!(movie_with("", 0.0, 148).runtime_label().as_deref(), Some("2h 28m"));
        assert_eq!(movie_with("", 0.0, 45).runtime_label().as_deref(), Some("0h 45m"));
        assert_eq!(movie_with("", 0.0, 0).runtime_label(), None);
    }

    #[test]
    fn empty_page_serializes_with_snake_case_totals() {
        let json = serde_json::to_value(SearchPage::empty(1)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"page": 1, "results": [], "total_results": 0, "total_pages": 0})
        );
    }
}
