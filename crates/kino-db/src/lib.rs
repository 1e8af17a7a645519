//! Local favourites store for kino.
//!
//! Uses `rusqlite` (bundled `SQLite`) to persist the set of favourite
//! movie ids, and exposes it both as one-shot queries and as
//! change-observing streams.

mod connection;
/// Favourite CRUD operations.
pub mod favourites;
mod migrations;
/// Stream operators for observable queries.
pub mod observe;
mod store;

#[allow(clippy::module_name_repetitions)]
pub use connection::{open_db, open_in_memory_db};
pub use favourites::FavouriteEntry;
pub use store::FavouritesStore;
