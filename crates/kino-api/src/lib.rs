//! API client library for kino.
//!
//! Provides a typed client for the TMDB v3 movie catalog.

/// TMDB API client.
pub mod tmdb;
