use places_core::Config;
use std::sync::{Mutex, OnceLock};
use tracing::debug;

use crate::{PlaceStore, Result, StoreError};

static STORE: OnceLock<Mutex<PlaceStore>> = OnceLock::new();

/// Held while the shared store is being opened so only one caller runs the sweep
static OPENING: Mutex<()> = Mutex::new(());

/// Process-wide store, opened from the loaded config on first use
///
/// Lives until the process exits. Prefer `PlaceStore::open` and pass the
/// store around when you can; this is for callers that can't.
pub fn get_store() -> Result<&'static Mutex<PlaceStore>> {
    if let Some(store) = STORE.get() {
        return Ok(store);
    }

    let _opening = OPENING.lock().map_err(|_| StoreError::LockPoisoned)?;
    if let Some(store) = STORE.get() {
        return Ok(store);
    }

    let config = Config::load()?;
    let resolver = config.store.resolver();
    let store = PlaceStore::open_in(resolver.as_ref(), &config.store)?;
    debug!("Shared place store opened at {:?}", store.path());

    Ok(STORE.get_or_init(|| Mutex::new(store)))
}

/// Run `f` against the shared store while holding its lock
pub fn with_store<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&PlaceStore) -> Result<T>,
{
    let store = get_store()?.lock().map_err(|_| StoreError::LockPoisoned)?;
    f(&store)
}
