use crate::config::IndexConfig;
use crate::core::index::key_score;
use crate::core::KeyIndex;
use crate::utils::error::{BindingError, Result};
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use url::Url;

/// Scan index kept in a Redis sorted set, scored by [`key_score`].
#[derive(Clone)]
pub struct RedisIndex {
    connection: MultiplexedConnection,
    set_key: String,
}

impl RedisIndex {
    pub async fn connect(config: &IndexConfig) -> Result<Self> {
        let url = connection_url(config)?;
        tracing::debug!("Connecting to scan index at {}:{}", config.host, config.port);

        let client = redis::Client::open(url.as_str()).map_err(index_error)?;
        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(index_error)?;

        tracing::info!(
            "🔗 Scan index connected: {}:{} (set '{}')",
            config.host,
            config.port,
            config.key
        );
        Ok(Self {
            connection,
            set_key: config.key.clone(),
        })
    }
}

fn index_error(err: redis::RedisError) -> BindingError {
    BindingError::IndexError {
        message: err.to_string(),
    }
}

/// `redis://[:password@]host:port/`; the password travels as AUTH.
fn connection_url(config: &IndexConfig) -> Result<Url> {
    let mut url = Url::parse("redis://localhost/")?;
    url.set_host(Some(&config.host))?;
    // redis:// is not a special scheme, so these only fail without a host
    let _ = url.set_port(Some(config.port));
    if let Some(password) = &config.password {
        let _ = url.set_password(Some(password));
    }
    Ok(url)
}

#[async_trait]
impl KeyIndex for RedisIndex {
    async fn add(&self, key: &str) -> Result<()> {
        let mut connection = self.connection.clone();
        let score = f64::from(key_score(key));
        let _: i64 = connection
            .zadd(&self.set_key, key, score)
            .await
            .map_err(index_error)?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let mut connection = self.connection.clone();
        let removed: i64 = connection
            .zrem(&self.set_key, key)
            .await
            .map_err(index_error)?;
        Ok(removed > 0)
    }

    async fn range_from(&self, start_key: &str, limit: usize) -> Result<Vec<String>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let mut connection = self.connection.clone();
        let min = f64::from(key_score(start_key));
        let count = isize::try_from(limit).unwrap_or(isize::MAX);
        let keys: Vec<String> = connection
            .zrangebyscore_limit(&self.set_key, min, "+inf", 0, count)
            .await
            .map_err(index_error)?;
        Ok(keys)
    }
}
