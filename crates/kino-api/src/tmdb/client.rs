//! `TmdbClient` - TMDB API client implementation.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tracing::instrument;
use url::Url;

use super::api::TmdbApi;
use super::rate_limiter::TmdbRateLimiter;
use super::types::{
    CreditsResponse, GenresResponse, MovieDto, MoviesListResponse, PersonListResponse,
    TmdbErrorResponse,
};

/// Default base URL for TMDB API v3.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Prefix turning a TMDB image path (`/abc.jpg`) into an absolute URL.
pub const IMAGE_URL_PREFIX: &str = "https://image.tmdb.org/t/p/original";

/// Default response language.
const DEFAULT_LANGUAGE: &str = "en-US";

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Bearer API token.
    api_token: String,
    /// Response language sent with every request.
    language: String,
    /// Request spacer shared by concurrent calls.
    rate_limiter: TmdbRateLimiter,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    user_agent: Option<String>,
    language: Option<String>,
    min_interval: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            user_agent: None,
            language: None,
            min_interval: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API bearer token (required).
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the response language (default: "en-US").
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the minimum request interval (default: 25ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_token` is not set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_token = self.api_token.context("api_token is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let rate_limiter = self
            .min_interval
            .map_or_else(TmdbRateLimiter::default_interval, TmdbRateLimiter::new);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_token,
            language: self
                .language
                .unwrap_or_else(|| String::from(DEFAULT_LANGUAGE)),
            rate_limiter,
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Returns the response language this client requests.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Sends one GET request with Bearer auth, the configured language,
    /// and the given query params. No retry is attempted.
    #[instrument(skip_all, fields(path = %path))]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        self.rate_limiter.wait().await;

        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        let request = self
            .http_client
            .get(url)
            .bearer_auth(&self.api_token)
            .query(&[("language", self.language.as_str())])
            .query(query)
            .build()
            .with_context(|| format!("failed to build request: {path}"))?;

        tracing::debug!(url = %request.url(), "TMDB API request");

        let result = self.http_client.execute(request).await;
        let response = result.with_context(|| format!("request failed: {path}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                bail!(
                    "TMDB API error (HTTP {}): code={}, message={}",
                    status,
                    error_response.status_code,
                    error_response.status_message,
                );
            }
            bail!("TMDB API error (HTTP {status}): {body}");
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read response body: {path}"))?;
        let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
        raw_result.with_context(|| format!("failed to decode JSON response: {path}"))
    }
}

impl TmdbApi for TmdbClient {
    #[instrument(skip_all)]
    async fn genres(&self) -> Result<GenresResponse> {
        self.get_json("genre/movie/list", &[]).await
    }

    #[instrument(skip_all, fields(genre_id = %genre_id))]
    async fn movies_by_genre(&self, genre_id: &str) -> Result<MoviesListResponse> {
        self.get_json("discover/movie", &[("with_genres", genre_id)])
            .await
    }

    #[instrument(skip_all, fields(movie_id = %movie_id))]
    async fn movie_by_id(&self, movie_id: &str) -> Result<MovieDto> {
        let path = format!("movie/{movie_id}");
        self.get_json(&path, &[]).await
    }

    #[instrument(skip_all, fields(movie_id = %movie_id))]
    async fn credits(&self, movie_id: &str) -> Result<CreditsResponse> {
        let path = format!("movie/{movie_id}/credits");
        self.get_json(&path, &[]).await
    }

    #[instrument(skip_all, fields(movie_id = %movie_id))]
    async fn recommendations(&self, movie_id: &str) -> Result<MoviesListResponse> {
        let path = format!("movie/{movie_id}/recommendations");
        self.get_json(&path, &[]).await
    }

    #[instrument(skip_all)]
    async fn search_movie(&self, query: &str) -> Result<MoviesListResponse> {
        self.get_json("search/movie", &[("query", query)]).await
    }

    #[instrument(skip_all)]
    async fn search_person(&self, query: &str) -> Result<PersonListResponse> {
        self.get_json("search/person", &[("query", query)]).await
    }

    #[instrument(skip_all, fields(person_id = %person_id))]
    async fn movies_by_person(&self, person_id: &str) -> Result<MoviesListResponse> {
        self.get_json("discover/movie", &[("with_people", person_id)])
            .await
    }
}
