//! Domain layer for kino.
//!
//! Maps TMDB wire types into domain models and exposes them, together
//! with the local favourites set, through [`MoviesRepository`].

/// DTO-to-domain conversion.
pub mod mapper;
/// Domain entities.
pub mod model;
/// Two-case result wrapper and its reduction.
pub mod outcome;
/// Repository combining the catalog client and the favourites store.
pub mod repository;

pub use model::{Character, Department, Genre, Movie, MovieCredits, People};
pub use outcome::{Outcome, reduce_failures_or_success};
pub use repository::MoviesRepository;
