//! Favourite CRUD operations.
//!
//! Plain synchronous functions over a borrowed connection. The async,
//! observable surface lives in [`crate::FavouritesStore`].

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};

/// A persisted favourite with its last-updated instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavouriteEntry {
    /// TMDB movie ID.
    pub movie_id: String,
    /// When the favourite was last added or refreshed.
    pub updated_at: DateTime<Utc>,
}

/// Adds a favourite, or refreshes its timestamp when it already exists.
///
/// The row keeps its original `rowid`, so insertion order is preserved.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn add_favourite(conn: &Connection, movie_id: &str, updated_at: DateTime<Utc>) -> Result<()> {
    conn.execute(
        "INSERT INTO favourites (movie_id, updated_at) VALUES (?1, ?2)
         ON CONFLICT(movie_id) DO UPDATE SET updated_at = excluded.updated_at",
        rusqlite::params![movie_id, updated_at.to_rfc3339()],
    )
    .with_context(|| format!("failed to add favourite {movie_id}"))?;
    Ok(())
}

/// Removes a favourite. Returns `true` when a row was deleted.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn remove_favourite(conn: &Connection, movie_id: &str) -> Result<bool> {
    let rows = conn
        .execute(
            "DELETE FROM favourites WHERE movie_id = ?1",
            rusqlite::params![movie_id],
        )
        .with_context(|| format!("failed to remove favourite {movie_id}"))?;
    Ok(rows > 0)
}

/// Returns whether the movie is a favourite.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn is_favourite(conn: &Connection, movie_id: &str) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM favourites WHERE movie_id = ?1",
            rusqlite::params![movie_id],
            |_| Ok(()),
        )
        .optional()
        .with_context(|| format!("failed to query favourite {movie_id}"))?;
    Ok(found.is_some())
}

/// Flips membership inside one transaction and returns the new state.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn toggle_favourite(
    conn: &Connection,
    movie_id: &str,
    updated_at: DateTime<Utc>,
) -> Result<bool> {
    let tx = conn
        .unchecked_transaction()
        .context("failed to begin transaction")?;

    let now_favourite = if is_favourite(&tx, movie_id)? {
        remove_favourite(&tx, movie_id)?;
        false
    } else {
        add_favourite(&tx, movie_id, updated_at)?;
        true
    };

    tx.commit().context("failed to commit favourite toggle")?;
    Ok(now_favourite)
}

/// Loads favourite movie ids in insertion order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn load_favourites(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT movie_id FROM favourites ORDER BY rowid")
        .context("failed to prepare favourites query")?;

    let rows = stmt
        .query_map([], |row| row.get(0))
        .context("failed to query favourites")?;

    rows.collect::<std::result::Result<Vec<String>, _>>()
        .context("failed to read favourites rows")
}

/// Loads favourites with their timestamps in insertion order.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored timestamp
/// is not valid RFC 3339.
pub fn load_favourite_entries(conn: &Connection) -> Result<Vec<FavouriteEntry>> {
    let mut stmt = conn
        .prepare("SELECT movie_id, updated_at FROM favourites ORDER BY rowid")
        .context("failed to prepare favourites query")?;

    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
        .context("failed to query favourites")?;

    let raw = rows
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("failed to read favourites rows")?;

    raw.into_iter()
        .map(|(movie_id, updated_at)| {
            let parsed = DateTime::parse_from_rfc3339(&updated_at).with_context(|| {
                format!("invalid updated_at {updated_at:?} for favourite {movie_id}")
            })?;
            Ok(FavouriteEntry {
                movie_id,
                updated_at: parsed.with_timezone(&Utc),
            })
        })
        .collect()
}
