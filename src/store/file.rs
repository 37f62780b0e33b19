use super::{Error, UserRecord, UserStore};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, instrument, warn};

/// Users kept as one pretty-printed JSON array on disk.
///
/// Reads never fail: a missing or corrupt file is treated as an empty
/// collection. Writes replace the file in one rename.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Wrap `path` without touching the filesystem.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Wrap `path`, creating its directory and an empty `[]` file if needed.
    ///
    /// # Errors
    /// Returns an error if the directory or the initial file cannot be created.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let store = Self::new(path);

        if let Some(parent) = store.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        if !fs::try_exists(&store.path).await? {
            debug!(path = %store.path.display(), "initializing empty user store");
            store.write_all(&[]).await?;
        }

        Ok(store)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl UserStore for JsonFileStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn read_all(&self) -> Result<Vec<UserRecord>, Error> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("user store unreadable, treating as empty: {err}");
                return Ok(Vec::new());
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(records) => Ok(records),
            Err(err) => {
                warn!("user store unparsable, treating as empty: {err}");
                Ok(Vec::new())
            }
        }
    }

    #[instrument(skip(self, records), fields(path = %self.path.display(), count = records.len()))]
    async fn write_all(&self, records: &[UserRecord]) -> Result<(), Error> {
        let json = serde_json::to_vec_pretty(records)?;
        let temp = self.temp_path();

        fs::write(&temp, &json).await?;
        fs::rename(&temp, &self.path).await?;

        debug!("user store written");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_record;
    use anyhow::Result;

    #[tokio::test]
    async fn open_creates_directory_and_empty_array() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("data").join("users.json");

        let store = JsonFileStore::open(&path).await?;

        assert_eq!(std::fs::read_to_string(&path)?, "[]");
        assert!(store.read_all().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn open_keeps_existing_records() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("users.json");
        JsonFileStore::new(&path)
            .write_all(&[test_record("1", "a@x.com")])
            .await?;

        let store = JsonFileStore::open(&path).await?;

        assert_eq!(store.read_all().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn write_then_read_preserves_order() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = JsonFileStore::open(dir.path().join("users.json")).await?;
        let records = vec![test_record("1", "a@x.com"), test_record("2", "b@x.com")];

        store.write_all(&records).await?;

        let ids: Vec<String> = store
            .read_all()
            .await?
            .into_iter()
            .map(|record| record.id)
            .collect();
        assert_eq!(ids, vec!["1".to_string(), "2".to_string()]);
        assert!(!store.temp_path().exists());
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = JsonFileStore::new(dir.path().join("absent.json"));

        assert!(store.read_all().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_reads_as_empty() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("users.json");
        std::fs::write(&path, b"{ not json")?;

        let store = JsonFileStore::new(&path);

        assert!(store.read_all().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn write_into_missing_directory_fails() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = JsonFileStore::new(dir.path().join("missing").join("users.json"));

        let result = store.write_all(&[test_record("1", "a@x.com")]).await;

        assert!(matches!(result, Err(Error::Io(_))));
        Ok(())
    }

    #[tokio::test]
    async fn find_helpers_scan_records() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = JsonFileStore::open(dir.path().join("users.json")).await?;
        store
            .write_all(&[test_record("1", "a@x.com"), test_record("2", "b@x.com")])
            .await?;

        assert_eq!(
            store.find_by_email("b@x.com").await?.map(|r| r.id),
            Some("2".to_string())
        );
        assert!(store.find_by_id("3").await?.is_none());
        Ok(())
    }
}
