//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{
    CreditsResponse, GenresResponse, MovieDto, MoviesListResponse, PersonListResponse,
};

/// TMDB API trait.
///
/// Abstracts the catalog calls for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait;
/// implement `TmdbApi` so that callers can hold the futures across
/// `.await` points on a multi-threaded runtime.
/// Each method is a single request/response round trip.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Fetches the movie genre list (`genre/movie/list`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn genres(&self) -> Result<GenresResponse>;

    /// Discovers movies tagged with a genre (`discover/movie?with_genres=`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movies_by_genre(&self, genre_id: &str) -> Result<MoviesListResponse>;

    /// Fetches movie details (`movie/{movie_id}`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_by_id(&self, movie_id: &str) -> Result<MovieDto>;

    /// Fetches cast and crew (`movie/{movie_id}/credits`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn credits(&self, movie_id: &str) -> Result<CreditsResponse>;

    /// Fetches recommendations (`movie/{movie_id}/recommendations`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn recommendations(&self, movie_id: &str) -> Result<MoviesListResponse>;

    /// Searches movies by title (`search/movie`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search_movie(&self, query: &str) -> Result<MoviesListResponse>;

    /// Searches people by name (`search/person`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search_person(&self, query: &str) -> Result<PersonListResponse>;

    /// Discovers movies featuring a person (`discover/movie?with_people=`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movies_by_person(&self, person_id: &str) -> Result<MoviesListResponse>;
}
