//! Normalizes OMDb records into [`Movie`] values.
//!
//! The adapter never fails: missing, sentinel or malformed fields degrade to
//! `0`, `None` or an empty value.

use crate::models::{CastMember, Genre, Movie, MovieDetails, MovieId};
use crate::omdb::{OmdbRecord, NOT_AVAILABLE};

/// Stored ratings are the upstream 0-10 rating multiplied by this factor;
/// [`Movie::display_rating`] divides it back out. Both sides use this constant
/// and nothing else may rescale ratings.
pub const RATING_SCALE: f64 = 2.0;

const IMDB_PREFIX: &str = "tt";
const IMDB_ID_WIDTH: usize = 7;

/// `tt0000123` -> `123`, with `0` for anything unparseable.
pub fn parse_imdb_id(raw: &str) -> MovieId {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix(IMDB_PREFIX).unwrap_or(trimmed);
    digits.parse().unwrap_or(0)
}

/// `123` -> `tt0000123`.
pub fn format_imdb_id(id: MovieId) -> String {
    format!("{}{:0width$}", IMDB_PREFIX, id, width = IMDB_ID_WIDTH)
}

pub fn to_movie(record: &OmdbRecord) -> Movie {
    let imdb_id = available(&record.imdb_id).map(str::to_string);

    Movie {
        id: imdb_id.as_deref().map(parse_imdb_id).unwrap_or(0),
        imdb_id,
        title: text_or_empty(&record.title),
        poster_path: available(&record.poster).map(str::to_string),
        backdrop_path: None,
        overview: text_or_empty(&record.plot),
        release_date: available(&record.released)
            .or_else(|| available(&record.year))
            .unwrap_or_default()
            .to_string(),
        vote_average: available(&record.imdb_rating)
            .and_then(|r| r.trim().parse::<f64>().ok())
            .map(|r| r * RATING_SCALE)
            .unwrap_or(0.0),
        vote_count: available(&record.imdb_votes)
            .map(parse_vote_count)
            .unwrap_or(0),
        genres: available(&record.genre).map(split_genres).unwrap_or_default(),
        runtime: available(&record.runtime)
            .map(leading_integer)
            .unwrap_or(0),
    }
}

pub fn to_details(record: &OmdbRecord) -> MovieDetails {
    MovieDetails {
        movie: to_movie(record),
        cast: available(&record.actors).map(placeholder_cast).unwrap_or_default(),
    }
}

fn available(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .filter(|value| !value.is_empty() && *value != NOT_AVAILABLE)
}

fn text_or_empty(field: &Option<String>) -> String {
    available(field).unwrap_or_default().to_string()
}

fn parse_vote_count(raw: &str) -> u64 {
    let digits: String = raw.chars().filter(|c| *c != ',').collect();
    digits.trim().parse().unwrap_or(0)
}

fn leading_integer(raw: &str) -> u32 {
    let digits: String = raw
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

// Ids here are positions in this one record, not genre table ids.
fn split_genres(raw: &str) -> Vec<Genre> {
    comma_separated(raw)
        .enumerate()
        .map(|(index, name)| Genre {
            id: index as u32 + 1,
            name: name.to_string(),
        })
        .collect()
}

// The upstream only has a flat actor list, so characters are placeholders.
fn placeholder_cast(raw: &str) -> Vec<CastMember> {
    comma_separated(raw)
        .enumerate()
        .map(|(index, name)| CastMember {
            id: index as u32 + 1,
            name: name.to_string(),
            character: format!("Character {}", index + 1),
            profile_path: None,
        })
        .collect()
}

fn comma_separated(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|piece| !piece.is_empty())
}
