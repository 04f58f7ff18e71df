use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::{StorageConfig, StorageMode};

const PROBE_FILE: &str = ".write-probe";

/// Persistence strategy shared by every collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// One `<name>.json` file per collection inside `dir`.
    File { dir: PathBuf },
    /// Process memory only; nothing survives a restart.
    Memory,
}

impl StorageBackend {
    pub fn file(dir: impl Into<PathBuf>) -> Self {
        Self::File { dir: dir.into() }
    }

    /// Pick a backend by probing whether the data directory is writable.
    pub fn detect(config: &StorageConfig) -> Self {
        if config.mode == StorageMode::Memory {
            info!("using in-memory storage (configured)");
            return Self::Memory;
        }

        match probe_writable(&config.data_dir) {
            Ok(()) => {
                info!(data_dir = %config.data_dir.display(), "using file-backed storage");
                Self::file(config.data_dir.clone())
            }
            Err(err) => {
                warn!(
                    data_dir = %config.data_dir.display(),
                    error = %err,
                    "data directory not writable; falling back to in-memory storage"
                );
                Self::Memory
            }
        }
    }

    pub fn is_durable(&self) -> bool {
        matches!(self, Self::File { .. })
    }

    pub(crate) fn collection_path(&self, name: &str) -> Option<PathBuf> {
        match self {
            Self::File { dir } => Some(dir.join(format!("{name}.json"))),
            Self::Memory => None,
        }
    }
}

fn probe_writable(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    let probe = dir.join(PROBE_FILE);
    fs::write(&probe, b"ok")?;
    fs::remove_file(&probe)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dir: PathBuf, mode: StorageMode) -> StorageConfig {
        StorageConfig {
            data_dir: dir,
            mode,
        }
    }

    #[test]
    fn detect_prefers_file_when_directory_is_writable() {
        let temp = tempfile::tempdir().expect("tempdir");
        let data_dir = temp.path().join("data");
        let backend = StorageBackend::detect(&config(data_dir.clone(), StorageMode::Auto));
        assert_eq!(backend, StorageBackend::file(data_dir.clone()));
        assert!(data_dir.is_dir());
        assert!(!data_dir.join(PROBE_FILE).exists());
    }

    #[test]
    fn detect_falls_back_to_memory_when_probe_fails() {
        let temp = tempfile::tempdir().expect("tempdir");
        let blocker = temp.path().join("not-a-dir");
        fs::write(&blocker, b"occupied").expect("write blocker");

        let backend = StorageBackend::detect(&config(blocker.join("data"), StorageMode::File));
        assert_eq!(backend, StorageBackend::Memory);
        assert!(!backend.is_durable());
    }

    #[test]
    fn memory_mode_skips_the_probe() {
        let temp = tempfile::tempdir().expect("tempdir");
        let data_dir = temp.path().join("data");
        let backend = StorageBackend::detect(&config(data_dir.clone(), StorageMode::Memory));
        assert_eq!(backend, StorageBackend::Memory);
        assert!(!data_dir.exists());
    }
}
