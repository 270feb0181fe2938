use crate::config::{IndexBackend, IndexConfig};
use crate::core::KeyIndex;
use crate::utils::error::{BindingError, Result};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

/// Score of a key in the scan index.
///
/// Classic 31-multiplier string hash over UTF-16 code units with 32-bit wrapping,
/// so indexes shared with other clients line up. Scores scatter keys: a scan
/// from `k` walks hash order, which is not the lexical order of the keys.
pub fn key_score(key: &str) -> i32 {
    key.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as i32))
}

#[derive(Default)]
struct Entries {
    ordered: BTreeSet<(i32, String)>,
    scores: HashMap<String, i32>,
}

/// In-process scan index with sorted-set semantics (score order, ties by key bytes).
#[derive(Clone, Default)]
pub struct MemoryIndex {
    entries: Arc<Mutex<Entries>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().map(|entries| entries.scores.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, Entries>> {
        self.entries.lock().map_err(|_| BindingError::IndexError {
            message: "memory index lock poisoned".to_string(),
        })
    }
}

#[async_trait]
impl KeyIndex for MemoryIndex {
    async fn add(&self, key: &str) -> Result<()> {
        let score = key_score(key);
        let mut entries = self.lock()?;
        if let Some(previous) = entries.scores.insert(key.to_string(), score) {
            entries.ordered.remove(&(previous, key.to_string()));
        }
        entries.ordered.insert((score, key.to_string()));
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let mut entries = self.lock()?;
        match entries.scores.remove(key) {
            Some(score) => {
                entries.ordered.remove(&(score, key.to_string()));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn range_from(&self, start_key: &str, limit: usize) -> Result<Vec<String>> {
        let entries = self.lock()?;
        let start = (key_score(start_key), String::new());
        Ok(entries
            .ordered
            .range(start..)
            .take(limit)
            .map(|(_, key)| key.clone())
            .collect())
    }
}

/// 依設定開啟索引連線
pub async fn open_index(config: &IndexConfig) -> Result<Arc<dyn KeyIndex>> {
    match config.backend {
        IndexBackend::Memory => {
            tracing::debug!("Using in-process scan index");
            Ok(Arc::new(MemoryIndex::new()))
        }
        #[cfg(feature = "redis-index")]
        IndexBackend::Redis => {
            let index = crate::adapters::redis_index::RedisIndex::connect(config).await?;
            Ok(Arc::new(index))
        }
        #[cfg(not(feature = "redis-index"))]
        IndexBackend::Redis => Err(BindingError::ConfigError {
            message: "index.backend = \"redis\" needs the `redis-index` feature".to_string(),
        }),
    }
}
