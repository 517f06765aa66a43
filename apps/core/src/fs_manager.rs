use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable overriding the application root directory.
pub const HOME_ENV: &str = "ASSISTANT_HOME";

/// File name of the default database.
pub const DB_FILENAME: &str = "assistant_data.db";

pub struct PortablePathManager;

impl PortablePathManager {
    /// Application root: `$ASSISTANT_HOME` if set, otherwise the current directory.
    pub fn root_dir() -> PathBuf {
        match std::env::var_os(HOME_ENV) {
            Some(home) if !home.is_empty() => PathBuf::from(home),
            _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Main data directory (./data).
    pub fn data_dir() -> PathBuf {
        Self::root_dir().join("data")
    }

    /// Database directory (./data/db).
    pub fn db_dir() -> PathBuf {
        Self::data_dir().join("db")
    }

    /// Default database file (./data/db/assistant_data.db).
    pub fn default_db_path() -> PathBuf {
        Self::db_dir().join(DB_FILENAME)
    }

    /// Creates the parent directory of `db_path` if it does not exist yet.
    pub fn ensure_parent(db_path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                info!("Creating database directory: {:?}", parent);
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_db_path_follows_home() {
        let dir = tempdir().unwrap();
        temp_env::with_var(HOME_ENV, Some(dir.path()), || {
            assert_eq!(
                PortablePathManager::default_db_path(),
                dir.path().join("data").join("db").join(DB_FILENAME)
            );
        });
    }

    #[test]
    fn test_ensure_parent_creates_directories() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("db").join(DB_FILENAME);
        PortablePathManager::ensure_parent(&db_path).unwrap();
        assert!(db_path.parent().unwrap().is_dir());
    }
}
