use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One browsing-history / bookmark record
///
/// `uri` is the business key, but nothing enforces uniqueness - look a place
/// up before adding it or you'll end up with duplicate rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub uri: String,
    pub title: Option<String>,
    pub bookmark: bool,
    /// Opaque bitmask owned by whoever embeds the store
    pub gecko_flags: u32,
    pub visits: u32,
    pub last_visit: DateTime<Utc>,
}

impl Place {
    /// Fresh place with defaults: never visited, stamped with the current time
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            title: None,
            bookmark: false,
            gecko_flags: 0,
            visits: 0,
            last_visit: Utc::now(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Bump the visit counter and move `last_visit` to now.
    /// Callers do this before `update_place`.
    pub fn record_visit(&mut self) {
        self.visits = self.visits.saturating_add(1);
        self.last_visit = Utc::now();
    }
}
