//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 endpoints and
//! retrieves genre, movie, credits, and people data.

mod api;
mod client;
mod id;
mod rate_limiter;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{DEFAULT_BASE_URL, IMAGE_URL_PREFIX, TmdbClient, TmdbClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use types::{
    CastDto, CreditsResponse, CrewDto, GenreDto, GenresResponse, MovieDto, MovieListItemDto,
    MoviesListResponse, PersonListItemDto, PersonListResponse, TmdbErrorResponse,
};
