use super::{Error, UserRecord, UserStore};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// In-process store, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    records: RwLock<Vec<UserRecord>>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_records(records: Vec<UserRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn read_all(&self) -> Result<Vec<UserRecord>, Error> {
        Ok(self.records.read().await.clone())
    }

    async fn write_all(&self, records: &[UserRecord]) -> Result<(), Error> {
        *self.records.write().await = records.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_record;

    #[tokio::test]
    async fn write_all_replaces_collection() -> Result<(), Error> {
        let store = MemoryUserStore::with_records(vec![test_record("1", "a@x.com")]);

        store.write_all(&[test_record("2", "b@x.com")]).await?;

        let records = store.read_all().await?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "2");
        assert!(store.find_by_email("a@x.com").await?.is_none());
        Ok(())
    }
}
