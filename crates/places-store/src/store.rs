use chrono::{TimeDelta, Utc};
use places_core::{places_db_path, Place, RootResolver, StoreConfig};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::{timestamp::StoredTimestamp, Result, StoreError};

const PLACE_COLUMNS: &str = "uri, title, bookmark, gecko_flags, visits, last_visit";

/// History and bookmark store on top of a single SQLite connection
///
/// No primary key, no unique constraint on `uri`, no indexes. Every
/// mutating call is its own statement and commits on return (autocommit).
/// The connection isn't shared across threads; wrap the store in a mutex
/// if you need that (see `shared::get_store`).
pub struct PlaceStore {
    conn: Connection,
    path: Option<PathBuf>,
    max_search_matches: u32,
}

impl PlaceStore {
    /// Open `<activity-root>/data/places.db`, creating `data/` if needed
    pub fn open_in(resolver: &dyn RootResolver, config: &StoreConfig) -> Result<Self> {
        let db_path = places_db_path(resolver)?;

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        Self::open(&db_path, config)
    }

    /// Open (or create) a database file at an explicit path
    pub fn open(db_path: impl AsRef<Path>, config: &StoreConfig) -> Result<Self> {
        let db_path = db_path.as_ref();
        debug!("Opening place store at {:?}", db_path);

        let conn = Connection::open(db_path)?;
        Self::init(conn, Some(db_path.to_path_buf()), config)
    }

    /// Throwaway store that never touches disk
    pub fn open_in_memory(config: &StoreConfig) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn, None, config)
    }

    fn init(conn: Connection, path: Option<PathBuf>, config: &StoreConfig) -> Result<Self> {
        let store = Self {
            conn,
            path,
            max_search_matches: config.max_search_matches,
        };

        // Sweep only stores we've seen before, never a brand new table
        if store.has_places_table()? {
            store.expire_old_places(config.expire_days)?;
        } else {
            store.create_schema()?;
        }

        Ok(store)
    }

    /// Database file backing this store, `None` when in memory
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn has_places_table(&self) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = 'places'",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn create_schema(&self) -> Result<()> {
        info!("Creating places table");
        self.conn.execute(
            "CREATE TABLE places (
                uri         TEXT,
                title       TEXT,
                bookmark    BOOLEAN,
                gecko_flags INTEGER,
                visits      INTEGER,
                last_visit  TIMESTAMP
            )",
            [],
        )?;
        Ok(())
    }

    /// Drop every place whose last visit is strictly older than the window.
    /// A negative window would put the cutoff in the future, so it's refused.
    fn expire_old_places(&self, expire_days: i64) -> Result<usize> {
        let cutoff = Some(expire_days)
            .filter(|days| *days >= 0)
            .and_then(TimeDelta::try_days)
            .and_then(|window| Utc::now().checked_sub_signed(window))
            .ok_or(StoreError::InvalidRetention(expire_days))?;

        let removed = self.conn.execute(
            "DELETE FROM places WHERE last_visit < ?1",
            params![StoredTimestamp(cutoff)],
        )?;

        info!("Expired {} places older than {} days", removed, expire_days);
        Ok(removed)
    }

    /// Places whose uri or title contains `text`, most visited first
    ///
    /// `text` goes into a LIKE pattern as-is, so `%` and `_` act as
    /// wildcards. Matching is ASCII case-insensitive (SQLite's LIKE).
    /// Ties on visits come back in insertion order.
    pub fn search(&self, text: &str) -> Result<Vec<Place>> {
        let pattern = format!("%{}%", text);
        debug!("Searching places for {:?}", pattern);

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM places
             WHERE uri LIKE ?1 OR title LIKE ?1
             ORDER BY visits DESC, rowid
             LIMIT ?2",
            PLACE_COLUMNS
        ))?;

        let places = stmt
            .query_map(params![pattern, self.max_search_matches], place_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!("Search matched {} places", places.len());
        Ok(places)
    }

    /// Insert a new row. Doesn't check for an existing `uri`.
    pub fn add_place(&self, place: &Place) -> Result<()> {
        debug!("Adding place {}", place.uri);

        self.conn.execute(
            "INSERT INTO places VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                place.uri,
                place.title,
                place.bookmark,
                place.gecko_flags,
                place.visits,
                StoredTimestamp(place.last_visit),
            ],
        )?;
        Ok(())
    }

    /// Exact, case-sensitive match on `uri`
    ///
    /// With duplicate rows the oldest one (lowest rowid) wins.
    pub fn lookup_place(&self, uri: &str) -> Result<Option<Place>> {
        let place = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM places WHERE uri = ?1 ORDER BY rowid LIMIT 1",
                    PLACE_COLUMNS
                ),
                params![uri],
                place_from_row,
            )
            .optional()?;

        if place.is_none() {
            debug!("No place stored for {}", uri);
        }

        Ok(place)
    }

    /// Overwrite title, flags, visits, last visit and bookmark on every row
    /// with this `uri`. Touching nothing is fine - it never inserts.
    pub fn update_place(&self, place: &Place) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE places
             SET title = ?1, gecko_flags = ?2, visits = ?3, last_visit = ?4, bookmark = ?5
             WHERE uri = ?6",
            params![
                place.title,
                place.gecko_flags,
                place.visits,
                StoredTimestamp(place.last_visit),
                place.bookmark,
                place.uri,
            ],
        )?;

        debug!("Updated {} rows for {}", updated, place.uri);
        Ok(())
    }
}

fn place_from_row(row: &Row<'_>) -> rusqlite::Result<Place> {
    let last_visit: StoredTimestamp = row.get(5)?;

    Ok(Place {
        uri: row.get(0)?,
        title: row.get(1)?,
        bookmark: row.get(2)?,
        gecko_flags: row.get(3)?,
        visits: row.get(4)?,
        last_visit: last_visit.0,
    })
}
