use crate::domain::model::{FieldSet, Fields};
use crate::utils::error::Result;
use async_trait::async_trait;

/// The CRUD contract every binding exposes to the benchmark harness.
///
/// Each call is independently fallible; the harness turns the result into a
/// [`Status`](crate::domain::model::Status) with [`report`](crate::core::report).
#[async_trait]
pub trait Db: Send + Sync {
    /// Opens whatever connections the binding needs. Called once before any operation.
    async fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Releases connections opened by `init`.
    async fn cleanup(&mut self) -> Result<()> {
        Ok(())
    }

    async fn read(&self, table: &str, key: &str, fields: Option<&FieldSet>) -> Result<Fields>;

    async fn insert(&self, table: &str, key: &str, values: &Fields) -> Result<()>;

    async fn delete(&self, table: &str, key: &str) -> Result<()>;

    async fn update(&self, table: &str, key: &str, values: &Fields) -> Result<()>;

    /// Returns at most `record_count` records starting at `start_key`, in backend order.
    async fn scan(
        &self,
        table: &str,
        start_key: &str,
        record_count: usize,
        fields: Option<&FieldSet>,
    ) -> Result<Vec<Fields>>;
}

/// Ordered key store used to approximate range scans.
///
/// Keys are ordered by [`key_score`](crate::core::index::key_score), not lexically.
#[async_trait]
pub trait KeyIndex: Send + Sync {
    async fn add(&self, key: &str) -> Result<()>;

    /// Returns `false` when the key was not indexed.
    async fn remove(&self, key: &str) -> Result<bool>;

    /// Up to `limit` keys whose score is at least the score of `start_key`.
    async fn range_from(&self, start_key: &str, limit: usize) -> Result<Vec<String>>;
}
