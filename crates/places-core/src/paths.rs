use std::path::{Path, PathBuf};

/// Where the embedding application keeps its private files
///
/// The store only ever appends `data/places.db` to whatever this returns.
pub trait RootResolver {
    fn activity_root(&self) -> crate::Result<PathBuf>;
}

/// Platform data directory (XDG on Linux, AppData on Windows) plus an app name
#[derive(Debug, Clone)]
pub struct DataDirRoot {
    app_name: String,
}

impl DataDirRoot {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

impl Default for DataDirRoot {
    fn default() -> Self {
        Self::new("places")
    }
}

impl RootResolver for DataDirRoot {
    fn activity_root(&self) -> crate::Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find data directory".into()))?;
        Ok(data_dir.join(&self.app_name))
    }
}

/// A root handed to us directly - handy for tests and embedders
#[derive(Debug, Clone)]
pub struct FixedRoot(pub PathBuf);

impl FixedRoot {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self(root.as_ref().to_path_buf())
    }
}

impl RootResolver for FixedRoot {
    fn activity_root(&self) -> crate::Result<PathBuf> {
        Ok(self.0.clone())
    }
}

/// `<activity-root>/data/places.db`
pub fn places_db_path(resolver: &dyn RootResolver) -> crate::Result<PathBuf> {
    Ok(resolver.activity_root()?.join("data").join("places.db"))
}
