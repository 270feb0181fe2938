use crate::config::{MissingIndexEntry, RequestStyle, RestConfig, ScanMode};
use crate::core::codec::{
    base_params, decode_record, decode_records, json_payload, push_field_filter, push_values,
};
use crate::core::index::open_index;
use crate::core::{Db, FieldSet, Fields, KeyIndex, Operation};
use crate::utils::error::{BindingError, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder};
use std::sync::Arc;
use std::time::Duration;

/// HTTP-backed binding. Endpoints, encodings and scan strategy come from [`RestConfig`].
///
/// When a key index is attached, inserts and deletes keep it in step with the
/// remote service so that `scan` can walk it.
pub struct RestDb {
    config: RestConfig,
    client: Client,
    index: Option<Arc<dyn KeyIndex>>,
}

impl RestDb {
    pub fn new(config: RestConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        Ok(Self {
            config,
            client: builder.build()?,
            index: None,
        })
    }

    /// Attaches an already opened index; `init` will not open another one.
    pub fn with_index(mut self, index: Arc<dyn KeyIndex>) -> Self {
        self.index = Some(index);
        self
    }

    pub fn config(&self) -> &RestConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn attached_index(&self) -> Result<&Arc<dyn KeyIndex>> {
        self.index.as_ref().ok_or_else(|| BindingError::ConfigError {
            message: "scan_mode = \"index\" but no key index is attached; was init() called?"
                .to_string(),
        })
    }

    /// Sends the request and returns the body of a 2xx response.
    async fn send(&self, operation: Operation, url: &str, request: RequestBuilder) -> Result<String> {
        tracing::debug!("📡 {}: {}", operation, url);
        let response = request.header(ACCEPT, "application/json").send().await?;
        let status = response.status();
        tracing::debug!("📡 {}: response status {}", operation, status);

        if !status.is_success() {
            return Err(BindingError::StatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    async fn write(
        &self,
        operation: Operation,
        path: &str,
        style: RequestStyle,
        table: &str,
        key: &str,
        values: Option<&Fields>,
    ) -> Result<()> {
        let url = self.endpoint(path);
        let request = match style {
            RequestStyle::GetQuery | RequestStyle::PostQuery => {
                let mut params = base_params(&self.config.static_params, table, key);
                if let Some(values) = values {
                    push_values(&mut params, values);
                }
                let builder = if style == RequestStyle::GetQuery {
                    self.client.get(&url)
                } else {
                    self.client.post(&url)
                };
                builder.query(&params)
            }
            RequestStyle::PostJson => {
                let empty = Fields::new();
                let payload = json_payload(table, key, values.unwrap_or(&empty));
                self.client
                    .post(&url)
                    .query(&self.config.static_params)
                    .json(&payload)
            }
        };

        // 回應內容不重要，只看狀態碼
        self.send(operation, &url, request).await?;
        Ok(())
    }

    async fn fetch_record(&self, table: &str, key: &str, fields: Option<&FieldSet>) -> Result<Fields> {
        let url = self.endpoint(&self.config.paths.read);
        let mut params = base_params(&self.config.static_params, table, key);
        push_field_filter(&mut params, fields);

        let body = self
            .send(Operation::Read, &url, self.client.get(&url).query(&params))
            .await?;
        decode_record(&body, self.config.response_envelope.as_deref())
    }

    async fn scan_remote(
        &self,
        table: &str,
        start_key: &str,
        record_count: usize,
        fields: Option<&FieldSet>,
    ) -> Result<Vec<Fields>> {
        let url = self.endpoint(&self.config.paths.scan);
        let count = record_count.to_string();
        let mut params = base_params(&self.config.static_params, table, start_key);
        params.push(("recordCount", count.as_str()));
        push_field_filter(&mut params, fields);

        let body = self
            .send(Operation::Scan, &url, self.client.get(&url).query(&params))
            .await?;
        decode_records(&body, self.config.response_envelope.as_deref(), record_count)
    }

    async fn scan_index(
        &self,
        table: &str,
        start_key: &str,
        record_count: usize,
        fields: Option<&FieldSet>,
    ) -> Result<Vec<Fields>> {
        let keys = self.attached_index()?.range_from(start_key, record_count).await?;
        tracing::debug!("🔎 scan from '{}': {} keys in index order", start_key, keys.len());

        let mut records = Vec::with_capacity(keys.len());
        for key in &keys {
            records.push(self.fetch_record(table, key, fields).await?);
        }
        Ok(records)
    }
}

#[async_trait]
impl Db for RestDb {
    async fn init(&mut self) -> Result<()> {
        if self.index.is_none() {
            if let Some(index_config) = &self.config.index {
                self.index = Some(open_index(index_config).await?);
            }
        }

        tracing::info!(
            "REST binding ready: {} (scan: {:?}, index: {})",
            self.config.base_url,
            self.config.scan_mode,
            if self.index.is_some() { "attached" } else { "none" }
        );
        Ok(())
    }

    async fn cleanup(&mut self) -> Result<()> {
        if self.index.take().is_some() {
            tracing::debug!("Released key index connection");
        }
        Ok(())
    }

    async fn read(&self, table: &str, key: &str, fields: Option<&FieldSet>) -> Result<Fields> {
        self.fetch_record(table, key, fields).await
    }

    async fn insert(&self, table: &str, key: &str, values: &Fields) -> Result<()> {
        self.write(
            Operation::Insert,
            &self.config.paths.insert,
            self.config.insert_style,
            table,
            key,
            Some(values),
        )
        .await?;

        if let Some(index) = &self.index {
            index.add(key).await?;
        }
        Ok(())
    }

    async fn delete(&self, table: &str, key: &str) -> Result<()> {
        self.write(
            Operation::Delete,
            &self.config.paths.delete,
            self.config.delete_style,
            table,
            key,
            None,
        )
        .await?;

        if let Some(index) = &self.index {
            if !index.remove(key).await? {
                // 遠端已刪除，但索引中沒有這個 key
                match self.config.missing_index_entry {
                    MissingIndexEntry::Error => {
                        return Err(BindingError::IndexEntryMissing {
                            key: key.to_string(),
                        })
                    }
                    MissingIndexEntry::Ignore => {
                        tracing::warn!("Deleted '{}' had no scan index entry", key)
                    }
                }
            }
        }
        Ok(())
    }

    async fn update(&self, table: &str, key: &str, values: &Fields) -> Result<()> {
        self.write(
            Operation::Update,
            &self.config.paths.update,
            self.config.update_style,
            table,
            key,
            Some(values),
        )
        .await
    }

    async fn scan(
        &self,
        table: &str,
        start_key: &str,
        record_count: usize,
        fields: Option<&FieldSet>,
    ) -> Result<Vec<Fields>> {
        if record_count == 0 {
            return Ok(Vec::new());
        }

        match self.config.scan_mode {
            ScanMode::Remote => self.scan_remote(table, start_key, record_count, fields).await,
            ScanMode::Index => self.scan_index(table, start_key, record_count, fields).await,
        }
    }
}
