//! `MoviesRepository` - joins the TMDB catalog with local favourites.

use anyhow::{Context, Result};
use futures::future::join_all;
use futures::{Stream, StreamExt};
use kino_api::tmdb::TmdbApi;
use kino_db::FavouritesStore;
use tracing::instrument;

use crate::mapper;
use crate::model::{Genre, Movie, MovieCredits, People};
use crate::outcome::{Outcome, reduce_failures_or_success};

/// Wraps a result as an [`Outcome`], logging the failure.
fn capture<T>(operation: &'static str, result: Result<T>) -> Outcome<T> {
    if let Err(err) = &result {
        tracing::warn!(operation, error = %format!("{err:#}"), "repository call failed");
    }
    Outcome::from(result)
}

/// Entry point for everything the presentation layer shows.
///
/// Every method returns an [`Outcome`]; errors never escape as `Err`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct MoviesRepository<A> {
    api: A,
    store: FavouritesStore,
}

impl<A: TmdbApi + Sync> MoviesRepository<A> {
    /// Creates a repository over a catalog client and a shared store handle.
    pub const fn new(api: A, store: FavouritesStore) -> Self {
        Self { api, store }
    }

    /// The favourites store this repository reads from.
    pub const fn store(&self) -> &FavouritesStore {
        &self.store
    }

    /// All movie genres.
    #[instrument(skip_all)]
    pub async fn genres(&self) -> Outcome<Vec<Genre>> {
        let result = async {
            let response = self.api.genres().await?;
            mapper::to_genre_list(&response)
        }
        .await;
        capture("genres", result)
    }

    /// Full details of one movie.
    #[instrument(skip_all, fields(movie_id = %movie_id))]
    pub async fn movie_by_id(&self, movie_id: &str) -> Outcome<Movie> {
        let result = async {
            let dto = self
                .api
                .movie_by_id(movie_id)
                .await
                .with_context(|| format!("failed to fetch movie {movie_id}"))?;
            mapper::to_movie(&dto)
        }
        .await;
        capture("movie_by_id", result)
    }

    /// Movies tagged with a genre.
    #[instrument(skip_all, fields(genre_id = %genre_id))]
    pub async fn movies_by_genre(&self, genre_id: &str) -> Outcome<Vec<Movie>> {
        let result = async {
            let response = self.api.movies_by_genre(genre_id).await?;
            mapper::to_movies_list(&response)
        }
        .await;
        capture("movies_by_genre", result)
    }

    /// Acting cast and producer of a movie.
    #[instrument(skip_all, fields(movie_id = %movie_id))]
    pub async fn credits(&self, movie_id: &str) -> Outcome<MovieCredits> {
        let result = async {
            let response = self.api.credits(movie_id).await?;
            mapper::to_movie_credits(&response)
        }
        .await;
        capture("credits", result)
    }

    /// Recommendations for a movie.
    #[instrument(skip_all, fields(movie_id = %movie_id))]
    pub async fn suggestions(&self, movie_id: &str) -> Outcome<Vec<Movie>> {
        let result = async {
            let response = self.api.recommendations(movie_id).await?;
            mapper::to_movies_list(&response)
        }
        .await;
        capture("suggestions", result)
    }

    /// Movies whose title matches `query`.
    #[instrument(skip_all, fields(query = %query))]
    pub async fn search_movie_by_name(&self, query: &str) -> Outcome<Vec<Movie>> {
        let result = async {
            let response = self.api.search_movie(query).await?;
            mapper::to_movies_list(&response)
        }
        .await;
        capture("search_movie_by_name", result)
    }

    /// People whose name matches `query`.
    #[instrument(skip_all, fields(query = %query))]
    pub async fn search_people_by_name(&self, query: &str) -> Outcome<Vec<People>> {
        let result = async {
            let response = self.api.search_person(query).await?;
            mapper::to_people_list(&response)
        }
        .await;
        capture("search_people_by_name", result)
    }

    /// Movies featuring a person.
    #[instrument(skip_all, fields(actor_id = %actor_id))]
    pub async fn search_movie_by_actor_id(&self, actor_id: &str) -> Outcome<Vec<Movie>> {
        let result = async {
            let response = self.api.movies_by_person(actor_id).await?;
            mapper::to_movies_list(&response)
        }
        .await;
        capture("search_movie_by_actor_id", result)
    }

    /// Flips favourite membership, returning the new state.
    #[instrument(skip_all, fields(movie_id = %movie_id))]
    pub async fn toggle_favourite(&self, movie_id: &str) -> Outcome<bool> {
        capture(
            "toggle_favourite",
            self.store.toggle_favourite(movie_id).await,
        )
    }

    /// Streams whether a movie is a favourite, emitting only on change.
    pub fn is_favourite(&self, movie_id: &str) -> impl Stream<Item = Outcome<bool>> + Send + 'static {
        self.store
            .observe_is_favourite(movie_id)
            .map(|result| capture("is_favourite", result))
    }

    /// Streams the favourite movies with full details.
    ///
    /// Each favourites change fetches every movie concurrently. The
    /// emission keeps store order; if any fetch fails, the first failure
    /// in that order is emitted instead and the stream keeps running.
    /// Changes that arrive during a fetch are coalesced into one refresh.
    pub fn favourites(&self) -> impl Stream<Item = Outcome<Vec<Movie>>> + Send + '_ {
        self.store.observe_favourites().then(move |ids| async move {
            match ids {
                Ok(ids) => {
                    tracing::debug!(count = ids.len(), "refreshing favourite movies");
                    let fetches = ids.iter().map(|id| self.movie_by_id(id));
                    reduce_failures_or_success(join_all(fetches).await)
                }
                Err(err) => capture("favourites", Err(err)),
            }
        })
    }
}
