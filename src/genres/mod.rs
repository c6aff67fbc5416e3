//! Hand-maintained genre table used for filter choices and client-side
//! genre matching. The upstream has no genre ids of its own.

use chrono::Datelike;

use crate::models::{Genre, Movie};

pub const EARLIEST_YEAR: i32 = 1900;

const GENRE_TABLE: [(u32, &[&str]); 18] = [
    (28, &["action"]),
    (12, &["adventure"]),
    (16, &["animation"]),
    (35, &["comedy"]),
    (80, &["crime"]),
    (99, &["documentary"]),
    (18, &["drama"]),
    (10751, &["family"]),
    (14, &["fantasy"]),
    (36, &["history"]),
    (27, &["horror"]),
    (10402, &["music"]),
    (9648, &["mystery"]),
    (10749, &["romance"]),
    (878, &["sci-fi", "science fiction"]),
    (53, &["thriller"]),
    (10752, &["war"]),
    (37, &["western"]),
];

/// Lowercase alias names for `genre_id`.
pub fn aliases(genre_id: u32) -> Option<&'static [&'static str]> {
    GENRE_TABLE
        .iter()
        .find(|(id, _)| *id == genre_id)
        .map(|(_, names)| *names)
}

/// Filter choices in table order, labelled by the capitalized first alias.
pub fn all_genres() -> Vec<Genre> {
    GENRE_TABLE
        .iter()
        .map(|(id, names)| Genre {
            id: *id,
            name: capitalize(names[0]),
        })
        .collect()
}

/// Whether any of the movie's genre names is an alias of `genre_id`.
pub fn matches(genre_id: u32, movie: &Movie) -> bool {
    let Some(names) = aliases(genre_id) else {
        return false;
    };
    movie
        .genres
        .iter()
        .any(|genre| names.contains(&genre.name.to_lowercase().as_str()))
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Selectable release years, newest first, down to [`EARLIEST_YEAR`].
pub fn year_range(current_year: i32) -> Vec<i32> {
    (EARLIEST_YEAR..=current_year).rev().collect()
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie_with_genres(names: &[&str]) -> Movie {
        Movie {
            id: 1,
            imdb_id: None,
            title: "Test".to_string(),
            poster_path: None,
            backdrop_path: None,
            overview: String::new(),
            release_date: String::new(),
            vote_average: 0.0,
            vote_count: 0,
            genres: names
                .iter()
                .enumerate()
                .map(|(i, n)| Genre {
                    id: i as u32 + 1,
                    name: n.to_string(),
                })
                .collect(),
            runtime: 0,
        }
    }

    #[test]
    fn table_has_eighteen_unique_ids() {
        let genres = all_genres();
        assert_eq!(genres.len(), 18);
        let mut ids: Vec<_> = genres.iter().map(|g| g.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 18);
    }

    #[test]
    fn display_names_capitalize_first_alias() {
        let genres = all_genres();
        assert_eq!(genres[0], Genre { id: 28, name: "Action".to_string() });
        let sci_fi = genres.iter().find(|g| g.id == 878).unwrap();
        assert_eq!(sci_fi.name, "Sci-fi");
    }

    #[test]
    fn science_fiction_has_two_aliases() {
        assert_eq!(aliases(878), Some(&["sci-fi", "science fiction"][..]));
        assert_eq!(aliases(1), None);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(matches(878, &movie_with_genres(&["Action", "Sci-Fi"])));
        assert!(matches(878, &movie_with_genres(&["Science Fiction"])));
        assert!(matches(28, &movie_with_genres(&["ACTION"])));
        assert!(!matches(35, &movie_with_genres(&["Action", "Sci-Fi"])));
    }

    #[test]
    fn no_genres_or_unknown_id_never_matches() {
        assert!(!matches(28, &movie_with_genres(&[])));
        assert!(!matches(4242, &movie_with_genres(&["Action"])));
    }

    #[test]
    fn year_range_runs_newest_to_1900() {
        let years = year_range(2024);
        assert_eq!(years.first(), Some(&2024));
        assert_eq!(years.last(), Some(&1900));
        assert_eq!(years.len(), 125);
        assert!(year_range(1899).is_empty());
    }
}
