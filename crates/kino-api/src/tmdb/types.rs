//! TMDB API response types.
//!
//! Every field the catalog may omit is an `Option`; identifiers are kept
//! optional as well so that a missing id reaches the mapper, which rejects it.

use serde::Deserialize;

use super::id::{optional_id, optional_id_list};

// --- Genres ---

/// Response from `genre/movie/list` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GenresResponse {
    /// Genre entries.
    pub genres: Vec<GenreDto>,
}

/// Genre entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GenreDto {
    /// Genre ID.
    #[serde(default, deserialize_with = "optional_id")]
    pub id: Option<String>,
    /// Genre name.
    pub name: Option<String>,
}

// --- Movie lists (discover, recommendations, search) ---

/// Paged movie list returned by `discover/movie`, `search/movie`
/// and `movie/{id}/recommendations`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MoviesListResponse {
    /// Current page number.
    pub page: u32,
    /// Movies on this page.
    pub results: Vec<MovieListItemDto>,
    /// Total number of pages.
    pub total_pages: Option<u32>,
    /// Total number of results.
    pub total_results: Option<u32>,
}

/// A movie as it appears inside a list response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MovieListItemDto {
    /// TMDB movie ID.
    #[serde(default, deserialize_with = "optional_id")]
    pub id: Option<String>,
    /// Adult flag.
    pub adult: Option<bool>,
    /// Genre IDs.
    #[serde(default, deserialize_with = "optional_id_list")]
    pub genre_ids: Option<Vec<String>>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Original title.
    pub original_title: Option<String>,
    /// Localized title.
    pub title: Option<String>,
    /// Original language (ISO 639-1).
    pub original_language: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Release date (YYYY-MM-DD, sometimes empty).
    pub release_date: Option<String>,
    /// Vote average (0.0 - 10.0).
    pub vote_average: Option<f64>,
}

// --- Movie details ---

/// Response from `movie/{movie_id}` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MovieDto {
    /// TMDB movie ID.
    #[serde(default, deserialize_with = "optional_id")]
    pub id: Option<String>,
    /// IMDb ID.
    pub imdb_id: Option<String>,
    /// Adult flag.
    pub adult: Option<bool>,
    /// Genres.
    pub genres: Option<Vec<GenreDto>>,
    /// Homepage URL.
    #[serde(rename = "homepage")]
    pub homepage_url: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Original title.
    pub original_title: Option<String>,
    /// Localized title.
    pub title: Option<String>,
    /// Original language (ISO 639-1).
    pub original_language: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Release date (YYYY-MM-DD, sometimes empty).
    pub release_date: Option<String>,
    /// Vote average (0.0 - 10.0).
    pub vote_average: Option<f64>,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
    /// Release status (e.g., "Released").
    pub status: Option<String>,
    /// Tagline.
    pub tagline: Option<String>,
}

// --- Credits ---

/// Response from `movie/{movie_id}/credits` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreditsResponse {
    /// TMDB movie ID.
    #[serde(rename = "id", default, deserialize_with = "optional_id")]
    pub movie_id: Option<String>,
    /// Cast members.
    pub cast: Vec<CastDto>,
    /// Crew members.
    pub crew: Vec<CrewDto>,
}

/// A cast member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CastDto {
    /// TMDB person ID.
    #[serde(default, deserialize_with = "optional_id")]
    pub id: Option<String>,
    /// Department the person is best known for.
    pub known_for_department: Option<String>,
    /// Person name.
    pub name: Option<String>,
    /// Profile image path.
    pub profile_path: Option<String>,
    /// Character played.
    pub character: Option<String>,
}

/// A crew member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CrewDto {
    /// TMDB person ID.
    #[serde(default, deserialize_with = "optional_id")]
    pub id: Option<String>,
    /// Department the person is best known for.
    pub known_for_department: Option<String>,
    /// Person name.
    pub name: Option<String>,
    /// Profile image path.
    pub profile_path: Option<String>,
    /// Job on this movie (e.g., "Producer").
    pub job: Option<String>,
}

// --- People search ---

/// Response from `search/person` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PersonListResponse {
    /// Current page number.
    pub page: u32,
    /// People on this page.
    pub results: Vec<PersonListItemDto>,
    /// Total number of pages.
    pub total_pages: Option<u32>,
    /// Total number of results.
    pub total_results: Option<u32>,
}

/// A single person search result.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PersonListItemDto {
    /// TMDB person ID.
    #[serde(default, deserialize_with = "optional_id")]
    pub id: Option<String>,
    /// Person name.
    pub name: Option<String>,
    /// Profile image path.
    pub profile_path: Option<String>,
    /// Department the person is best known for.
    pub known_for_department: Option<String>,
    /// Movies the person is known for.
    pub known_for: Option<Vec<MovieListItemDto>>,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[serde(default)]
    pub success: bool,
}
