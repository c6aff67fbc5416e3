//! Shareable search state: query text, page and the year/genre filters.
//!
//! State is rebuilt from its query string alone, so a search can be
//! reproduced from a copied link or command line.

use std::borrow::Cow;

/// Presentation-layer value meaning "no filter".
pub const ALL: &str = "all";

/// Highest page the front-end offers, whatever the upstream reports.
pub const MAX_PAGES: u64 = 500;

const WINDOW: u32 = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseState {
    pub query: String,
    pub page: Option<u32>,
    pub year: Option<i32>,
    pub genre: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    Query(String),
    Page(u32),
    Year(Option<i32>),
    Genre(Option<u32>),
}

impl BrowseState {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn current_page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    /// Next state after `change`. Any change other than a page change
    /// returns to the first page.
    pub fn apply(&self, change: StateChange) -> Self {
        let mut next = self.clone();
        match change {
            StateChange::Query(query) => {
                next.query = query;
                next.page = None;
            }
            StateChange::Page(page) => {
                next.page = (page > 1).then_some(page);
            }
            StateChange::Year(year) => {
                next.year = year;
                next.page = None;
            }
            StateChange::Genre(genre) => {
                next.genre = genre;
                next.page = None;
            }
        }
        next
    }

    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, Cow<'_, str>)> = Vec::new();
        if !self.query.is_empty() {
            pairs.push(("query", urlencoding::encode(&self.query)));
        }
        if let Some(page) = self.page {
            pairs.push(("page", Cow::Owned(page.to_string())));
        }
        if let Some(year) = self.year {
            pairs.push(("year", Cow::Owned(year.to_string())));
        }
        if let Some(genre) = self.genre {
            pairs.push(("genre", Cow::Owned(genre.to_string())));
        }
        pairs
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Parses `query=..&page=..&year=..&genre=..`. Unknown keys and values
    /// that do not parse are ignored.
    pub fn from_query_string(raw: &str) -> Self {
        let mut state = Self::default();
        for pair in raw.trim_start_matches('?').split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let spaced = value.replace('+', " ");
            let Ok(value) = urlencoding::decode(&spaced) else {
                continue;
            };
            match key {
                "query" => state.query = value.into_owned(),
                "page" => state.page = value.parse().ok().filter(|p| *p > 1),
                "year" => state.year = value.parse().ok(),
                "genre" => state.genre = value.parse().ok(),
                _ => {}
            }
        }
        state
    }
}

/// A filter selection as offered to the user, where [`ALL`] clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterChoice<T> {
    All,
    Only(T),
}

impl<T: std::str::FromStr> FilterChoice<T> {
    pub fn parse(raw: &str) -> Result<Self, T::Err> {
        if raw.eq_ignore_ascii_case(ALL) {
            Ok(Self::All)
        } else {
            raw.parse().map(Self::Only)
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::All => None,
            Self::Only(value) => Some(value),
        }
    }
}

/// At most five consecutive page numbers around `current`, shifted inward
/// near either end.
pub fn page_window(current: u32, total_pages: u32) -> Vec<u32> {
    if total_pages == 0 {
        return Vec::new();
    }
    let current = current.clamp(1, total_pages);
    let mut start = current.saturating_sub(2).max(1);
    let end = start.saturating_add(WINDOW - 1).min(total_pages);
    if end - start + 1 < WINDOW {
        start = end.saturating_sub(WINDOW - 1).max(1);
    }
    (start..=end).collect()
}

/// Page count the front-end offers for an upstream-reported total.
pub fn capped_pages(total_pages: u64) -> u32 {
    total_pages.min(MAX_PAGES) as u32
}
