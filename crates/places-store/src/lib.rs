// SQLite-backed history/bookmark store
// One connection, one table, short-lived statements

pub mod error;
pub mod shared;
pub mod store;
pub mod timestamp;

pub use error::{Result, StoreError};
pub use shared::{get_store, with_store};
pub use store::PlaceStore;
pub use timestamp::{StoredTimestamp, TimestampOutOfRange};
