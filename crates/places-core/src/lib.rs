// Shared types for the places store - no database code lives here
pub mod config;
pub mod error;
pub mod models;
pub mod paths;

pub use config::{Config, StoreConfig, EXPIRE_DAYS, MAX_SEARCH_MATCHES};
pub use error::Error;
pub use models::Place;
pub use paths::{places_db_path, DataDirRoot, FixedRoot, RootResolver};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
