//! Movie discovery over the OMDb metadata API: title search, a simulated
//! trending feed, detail lookup, a favorites list and shareable filter state.

pub mod adapter;
pub mod browse;
pub mod config;
pub mod error;
pub mod favorites;
pub mod genres;
pub mod http;
pub mod models;
pub mod omdb;
pub mod service;

pub use error::{MovieError, Result};
pub use favorites::{FavoritesSort, FavoritesStore};
pub use models::{CastMember, Genre, Movie, MovieDetails, MovieId, SearchPage};
pub use service::MovieService;
