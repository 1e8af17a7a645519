//! `FavouritesStore` - shared async handle over the favourites table.

use std::future;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use futures::{Stream, StreamExt, stream};
use rusqlite::Connection;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::{IntervalStream, WatchStream};

use crate::connection::{open_db, open_in_memory_db};
use crate::favourites::{self, FavouriteEntry};
use crate::observe::distinct_until_changed;

/// How often observers check the database for writes made by other
/// connections (another `kino` process, for instance).
const EXTERNAL_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Long-lived, cloneable handle to the favourites database.
///
/// Blocking `SQLite` work runs on Tokio's blocking pool. Every write bumps
/// a change counter on a `watch` channel; observers re-query on each bump
/// and drop results equal to the previous one. Observers also poll
/// `PRAGMA data_version`, which moves only when another connection commits.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct FavouritesStore {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    conn: Mutex<Connection>,
    changes: watch::Sender<u64>,
}

impl FavouritesStore {
    /// Opens the on-disk store (see [`open_db`] for the path rules).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(dir: Option<&PathBuf>) -> Result<Self> {
        Ok(Self::from_connection(open_db(dir)?))
    }

    /// Opens a private in-memory store.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub fn in_memory() -> Result<Self> {
        Ok(Self::from_connection(open_in_memory_db()?))
    }

    /// Wraps an already-migrated connection.
    #[must_use]
    pub fn from_connection(conn: Connection) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                conn: Mutex::new(conn),
                changes,
            }),
        }
    }

    /// Runs `f` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let conn = inner
                .conn
                .lock()
                .map_err(|_| anyhow!("favourites connection lock poisoned"))?;
            f(&conn)
        })
        .await
        .context("favourites database task failed")?
    }

    fn notify_changed(&self) {
        self.inner.changes.send_modify(|n| *n = n.wrapping_add(1));
    }

    /// Adds a favourite, refreshing its timestamp if already present.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn add_favourite(&self, movie_id: &str) -> Result<()> {
        let id = String::from(movie_id);
        self.with_conn(move |conn| favourites::add_favourite(conn, &id, Utc::now()))
            .await?;
        self.notify_changed();
        Ok(())
    }

    /// Removes a favourite; removing a non-member is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn remove_favourite(&self, movie_id: &str) -> Result<()> {
        let id = String::from(movie_id);
        let removed = self
            .with_conn(move |conn| favourites::remove_favourite(conn, &id))
            .await?;
        if removed {
            self.notify_changed();
        }
        Ok(())
    }

    /// Flips membership and returns the new state.
    ///
    /// The read and the write happen in one transaction while the
    /// connection lock is held, so concurrent toggles serialize.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub async fn toggle_favourite(&self, movie_id: &str) -> Result<bool> {
        let id = String::from(movie_id);
        let now_favourite = self
            .with_conn(move |conn| favourites::toggle_favourite(conn, &id, Utc::now()))
            .await?;
        self.notify_changed();
        tracing::debug!(movie_id, now_favourite, "favourite toggled");
        Ok(now_favourite)
    }

    /// Returns whether the movie is a favourite.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn is_favourite(&self, movie_id: &str) -> Result<bool> {
        let id = String::from(movie_id);
        self.with_conn(move |conn| favourites::is_favourite(conn, &id))
            .await
    }

    /// Returns favourite movie ids in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn favourites(&self) -> Result<Vec<String>> {
        self.with_conn(favourites::load_favourites).await
    }

    /// Returns favourites with their timestamps in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn favourite_entries(&self) -> Result<Vec<FavouriteEntry>> {
        self.with_conn(favourites::load_favourite_entries).await
    }

    /// Streams membership of one movie: current value first, then each change.
    pub fn observe_is_favourite(
        &self,
        movie_id: &str,
    ) -> impl Stream<Item = Result<bool>> + Send + 'static {
        let store = self.clone();
        let id = String::from(movie_id);
        distinct_until_changed(self.changes().then(move |()| {
            let store = store.clone();
            let id = id.clone();
            async move { store.is_favourite(&id).await }
        }))
    }

    /// Streams the favourite id list: current value first, then each change.
    pub fn observe_favourites(&self) -> impl Stream<Item = Result<Vec<String>>> + Send + 'static {
        let store = self.clone();
        distinct_until_changed(self.changes().then(move |()| {
            let store = store.clone();
            async move { store.favourites().await }
        }))
    }

    /// `SQLite`'s per-connection counter of commits made by other connections.
    async fn data_version(&self) -> Result<i64> {
        self.with_conn(|conn| {
            conn.pragma_query_value(None, "data_version", |row| row.get(0))
                .context("failed to read data_version")
        })
        .await
    }

    /// Raw change ticks. Yields once immediately; pending ticks coalesce.
    ///
    /// Local writes tick through the `watch` channel. Writes committed by
    /// other connections tick when the polled `data_version` moves.
    fn changes(&self) -> impl Stream<Item = ()> + Send + 'static {
        let local = WatchStream::new(self.inner.changes.subscribe()).map(|_| ());
        stream::select(local, self.external_changes(EXTERNAL_POLL_INTERVAL))
    }

    /// Ticks whenever another connection has committed since the last poll.
    ///
    /// The first poll always ticks, so a commit landing between the initial
    /// query and the first poll is not missed.
    fn external_changes(&self, period: Duration) -> impl Stream<Item = ()> + Send + 'static {
        let store = self.clone();
        let mut last: Option<i64> = None;

        stream::once(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            IntervalStream::new(interval)
        })
        .flatten()
        .then(move |_| {
            let store = store.clone();
            async move { store.data_version().await }
        })
        .filter_map(move |version| {
            let tick = match version {
                Ok(current) => {
                    let moved = last != Some(current);
                    last = Some(current);
                    moved.then_some(())
                }
                Err(err) => {
                    tracing::warn!("failed to poll favourites database: {err:#}");
                    None
                }
            };
            future::ready(tick)
        })
    }
}
