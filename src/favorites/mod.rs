use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{MovieError, Result};
use crate::models::{Movie, MovieId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoritesSort {
    Title,
    Rating,
}

/// Favorited movie snapshots, unique by id, in the order first added.
///
/// Starts empty and lives as long as its owner; [`FavoritesStore::load`] and
/// [`FavoritesStore::save`] are only used when a favorites file is configured.
#[derive(Debug, Clone, Default)]
pub struct FavoritesStore {
    entries: Vec<Movie>,
    index: HashMap<MovieId, usize>,
}

impl FavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_favorite(&self, id: MovieId) -> bool {
        self.index.contains_key(&id)
    }

    /// Inserts the snapshot, replacing any earlier snapshot of the same movie
    /// in place. Movies with the unknown id `0` are not stored; returns
    /// whether the snapshot was kept.
    pub fn add(&mut self, movie: Movie) -> bool {
        if movie.id == 0 {
            warn!("Not favoriting \"{}\": movie has no id", movie.title);
            return false;
        }
        match self.index.get(&movie.id) {
            Some(&position) => {
                debug!("Replacing favorite snapshot for {}", movie.id);
                self.entries[position] = movie;
            }
            None => {
                self.index.insert(movie.id, self.entries.len());
                self.entries.push(movie);
            }
        }
        true
    }

    pub fn remove(&mut self, id: MovieId) {
        let Some(position) = self.index.remove(&id) else {
            return;
        };
        self.entries.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
    }

    /// Adds the movie if absent, removes it otherwise. Returns whether it is
    /// a favorite afterwards.
    pub fn toggle(&mut self, movie: Movie) -> bool {
        if self.is_favorite(movie.id) {
            self.remove(movie.id);
            false
        } else {
            self.add(movie)
        }
    }

    pub fn get(&self, id: MovieId) -> Option<&Movie> {
        self.index.get(&id).map(|&position| &self.entries[position])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Movie> {
        self.entries.iter()
    }

    pub fn sorted(&self, sort: FavoritesSort) -> Vec<&Movie> {
        let mut movies: Vec<&Movie> = self.entries.iter().collect();
        match sort {
            FavoritesSort::Title => {
                movies.sort_by_key(|movie| movie.title.to_lowercase());
            }
            FavoritesSort::Rating => {
                movies.sort_by(|a, b| b.vote_average.total_cmp(&a.vote_average));
            }
        }
        movies
    }

    /// Reads a JSON snapshot list; a missing file is an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No favorites file at {}", path.display());
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path).map_err(|e| favorites_error(path, e))?;
        let movies: Vec<Movie> =
            serde_json::from_str(&content).map_err(|e| favorites_error(path, e))?;

        let mut store = Self::new();
        for movie in movies {
            store.add(movie);
        }
        info!("Loaded {} favorites from {}", store.len(), path.display());
        Ok(store)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(&self.entries).map_err(|e| favorites_error(path, e))?;
        std::fs::write(path, content).map_err(|e| favorites_error(path, e))?;
        debug!("Saved {} favorites to {}", self.len(), path.display());
        Ok(())
    }
}

fn favorites_error(path: &Path, reason: impl std::fmt::Display) -> MovieError {
    MovieError::Favorites {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: MovieId, title: &str, vote_average: f64) -> Movie {
        Movie {
            id,
            imdb_id: None,
            title: title.to_string(),
            poster_path: None,
            backdrop_path: None,
            overview: String::new(),
            release_date: String::new(),
            vote_average,
            vote_count: 0,
            genres: Vec::new(),
            runtime: 0,
        }
    }

    #[test]
    fn starts_empty() {
        let store = FavoritesStore::new();
        assert!(store.is_empty());
        assert!(!store.is_favorite(1));
    }

    #[test]
    fn adding_twice_keeps_one_entry_with_latest_snapshot() {
        let mut store = FavoritesStore::new();
        store.add(movie(7, "Old Title", 10.0));
        store.add(movie(8, "Other", 12.0));
        store.add(movie(7, "New Title", 14.0));

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(7).unwrap().title, "New Title");
        let order: Vec<_> = store.iter().map(|m| m.id).collect();
        assert_eq!(order, [7, 8]);
    }

    #[test]
    fn removing_absent_id_is_a_no_op() {
        let mut store = FavoritesStore::new();
        store.add(movie(1, "A", 0.0));
        store.remove(99);
        assert_eq!(store.len(), 1);
        assert!(store.is_favorite(1));
    }

    #[test]
    fn remove_keeps_remaining_lookups_valid() {
        let mut store = FavoritesStore::new();
        for id in 1..=4 {
            store.add(movie(id, &format!("M{id}"), 0.0));
        }
        store.remove(2);

        assert!(!store.is_favorite(2));
        assert_eq!(store.get(3).unwrap().title, "M3");
        assert_eq!(store.get(4).unwrap().title, "M4");
        let order: Vec<_> = store.iter().map(|m| m.id).collect();
        assert_eq!(order, [1, 3, 4]);
    }

    #[test]
    fn unknown_id_is_never_stored() {
        let mut store = FavoritesStore::new();
        assert!(!store.add(movie(0, "A", 0.0)));
        assert!(!store.add(movie(0, "B", 0.0)));
        assert!(!store.toggle(movie(0, "C", 0.0)));
        assert!(store.is_empty());
        assert!(!store.is_favorite(0));

        let untagged = crate::adapter::to_movie(&crate::omdb::OmdbRecord {
            title: Some("No Id".to_string()),
            ..Default::default()
        });
        assert!(!store.add(untagged));
        assert!(store.is_empty());
    }

    #[test]
    fn toggle_flips_membership() {
        let mut store = FavoritesStore::new();
        assert!(store.toggle(movie(5, "E", 0.0)));
        assert!(store.is_favorite(5));
        assert!(!store.toggle(movie(5, "E", 0.0)));
        assert!(!store.is_favorite(5));
    }

    #[test]
    fn sorts_by_title_and_by_rating() {
        let mut store = FavoritesStore::new();
        store.add(movie(1, "zodiac", 15.4));
        store.add(movie(2, "Alien", 16.9));
        store.add(movie(3, "memento", 16.8));

        let by_title: Vec<_> = store
            .sorted(FavoritesSort::Title)
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(by_title, [2, 3, 1]);

        let by_rating: Vec<_> = store
            .sorted(FavoritesSort::Rating)
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(by_rating, [2, 3, 1]);
    }

    #[test]
    fn save_then_load_restores_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorites.json");

        let mut store = FavoritesStore::new();
        store.add(movie(30, "Third", 1.0));
        store.add(movie(10, "First", 2.0));
        store.save(&path).unwrap();

        let loaded = FavoritesStore::load(&path).unwrap();
        let order: Vec<_> = loaded.iter().map(|m| m.id).collect();
        assert_eq!(order, [30, 10]);
        assert!(loaded.is_favorite(10));
    }

    #[test]
    fn missing_file_loads_empty_and_garbage_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("none.json");
        assert!(FavoritesStore::load(&missing).unwrap().is_empty());

        let garbage = dir.path().join("bad.json");
        std::fs::write(&garbage, "not json").unwrap();
        assert!(matches!(
            FavoritesStore::load(&garbage),
            Err(MovieError::Favorites { .. })
        ));
    }
}
