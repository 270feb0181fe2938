use crate::core::{Db, FieldSet, Fields};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Binding without a backing store: every call succeeds and returns nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDb;

impl NoopDb {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Db for NoopDb {
    async fn read(&self, _table: &str, _key: &str, _fields: Option<&FieldSet>) -> Result<Fields> {
        Ok(Fields::new())
    }

    async fn insert(&self, _table: &str, _key: &str, _values: &Fields) -> Result<()> {
        Ok(())
    }

    async fn delete(&self, _table: &str, _key: &str) -> Result<()> {
        Ok(())
    }

    async fn update(&self, _table: &str, _key: &str, _values: &Fields) -> Result<()> {
        Ok(())
    }

    async fn scan(
        &self,
        _table: &str,
        _start_key: &str,
        _record_count: usize,
        _fields: Option<&FieldSet>,
    ) -> Result<Vec<Fields>> {
        Ok(Vec::new())
    }
}
