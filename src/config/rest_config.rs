use crate::utils::error::{BindingError, Result};
use crate::utils::validation::{
    validate_endpoint_path, validate_non_empty_string, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Built-in endpoint layouts of the remote services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// Log-structured service: `/readLog`, `/insertLog`, ... with everything in the query string.
    #[default]
    LogService,
    /// Single cloud function: JSON inserts, `Message` envelope, scans through the key index.
    Function,
}

/// How a write request carries its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStyle {
    GetQuery,
    PostQuery,
    PostJson,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// One request to the scan endpoint.
    Remote,
    /// Walk the key index, then one read per key.
    Index,
}

/// What `delete` reports when the key had no index entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingIndexEntry {
    #[default]
    Error,
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexBackend {
    #[default]
    Redis,
    Memory,
}

macro_rules! snake_case_from_str {
    ($ty:ty, $field:expr, { $($name:literal => $variant:expr),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = BindingError;

            fn from_str(s: &str) -> Result<Self> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok($variant),)+
                    other => Err(BindingError::InvalidConfigValueError {
                        field: $field.to_string(),
                        value: other.to_string(),
                        reason: format!("Expected one of: {}", [$($name),+].join(", ")),
                    }),
                }
            }
        }
    };
}

snake_case_from_str!(Profile, "rest.profile", {
    "log_service" => Profile::LogService,
    "function" => Profile::Function,
});

snake_case_from_str!(RequestStyle, "rest.style", {
    "get_query" => RequestStyle::GetQuery,
    "post_query" => RequestStyle::PostQuery,
    "post_json" => RequestStyle::PostJson,
});

snake_case_from_str!(ScanMode, "rest.scan_mode", {
    "remote" => ScanMode::Remote,
    "index" => ScanMode::Index,
});

snake_case_from_str!(MissingIndexEntry, "rest.missing_index_entry", {
    "error" => MissingIndexEntry::Error,
    "ignore" => MissingIndexEntry::Ignore,
});

snake_case_from_str!(IndexBackend, "index.backend", {
    "redis" => IndexBackend::Redis,
    "memory" => IndexBackend::Memory,
});

/// Path suffixes appended to the base URL, one per operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointPaths {
    pub read: String,
    pub insert: String,
    pub delete: String,
    pub update: String,
    pub scan: String,
}

/// Connection settings of the key index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub backend: IndexBackend,
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    /// Name of the sorted set holding the keys.
    pub key: String,
}

pub const DEFAULT_INDEX_PORT: u16 = 6379;
pub const DEFAULT_INDEX_KEY: &str = "indices";

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            backend: IndexBackend::Redis,
            host: "localhost".to_string(),
            port: DEFAULT_INDEX_PORT,
            password: None,
            key: DEFAULT_INDEX_KEY.to_string(),
        }
    }
}

impl IndexConfig {
    pub fn memory() -> Self {
        Self {
            backend: IndexBackend::Memory,
            ..Self::default()
        }
    }
}

impl Validate for IndexConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("index.key", &self.key)?;
        if self.backend == IndexBackend::Redis {
            validate_non_empty_string("index.host", &self.host)?;
            validate_range("index.port", self.port, 1, u16::MAX)?;
        }
        Ok(())
    }
}

/// Fully resolved settings of one HTTP-backed binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestConfig {
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
    /// Sent with every request, ahead of `table` and `key`.
    pub static_params: BTreeMap<String, String>,
    pub paths: EndpointPaths,
    pub insert_style: RequestStyle,
    pub update_style: RequestStyle,
    pub delete_style: RequestStyle,
    /// Member wrapping the payload of each response line, if any.
    pub response_envelope: Option<String>,
    pub scan_mode: ScanMode,
    pub index: Option<IndexConfig>,
    pub missing_index_entry: MissingIndexEntry,
}

impl RestConfig {
    pub fn for_profile(profile: Profile, base_url: impl Into<String>) -> Self {
        match profile {
            Profile::LogService => Self::log_service(base_url),
            Profile::Function => Self::function(base_url),
        }
    }

    pub fn log_service(base_url: impl Into<String>) -> Self {
        let static_params = BTreeMap::from([
            ("SvId".to_string(), "primary".to_string()),
            ("type".to_string(), "log".to_string()),
        ]);

        Self {
            base_url: base_url.into(),
            timeout_seconds: None,
            static_params,
            paths: EndpointPaths {
                read: "/readLog".to_string(),
                insert: "/insertLog".to_string(),
                delete: "/deleteLog".to_string(),
                update: "/updateLog".to_string(),
                scan: "/scanLog".to_string(),
            },
            insert_style: RequestStyle::GetQuery,
            update_style: RequestStyle::GetQuery,
            delete_style: RequestStyle::GetQuery,
            response_envelope: None,
            scan_mode: ScanMode::Remote,
            index: None,
            missing_index_entry: MissingIndexEntry::Error,
        }
    }

    pub fn function(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_seconds: None,
            static_params: BTreeMap::new(),
            paths: EndpointPaths {
                read: String::new(),
                insert: "/insert".to_string(),
                delete: "/delete".to_string(),
                update: "/update".to_string(),
                scan: "/scan".to_string(),
            },
            insert_style: RequestStyle::PostJson,
            update_style: RequestStyle::PostQuery,
            delete_style: RequestStyle::GetQuery,
            response_envelope: Some("Message".to_string()),
            scan_mode: ScanMode::Index,
            index: Some(IndexConfig::default()),
            missing_index_entry: MissingIndexEntry::Error,
        }
    }
}

impl Validate for RestConfig {
    fn validate(&self) -> Result<()> {
        validate_url("rest.base_url", &self.base_url)?;

        validate_endpoint_path("rest.paths.read", &self.paths.read)?;
        validate_endpoint_path("rest.paths.insert", &self.paths.insert)?;
        validate_endpoint_path("rest.paths.delete", &self.paths.delete)?;
        validate_endpoint_path("rest.paths.update", &self.paths.update)?;
        validate_endpoint_path("rest.paths.scan", &self.paths.scan)?;

        if let Some(timeout) = self.timeout_seconds {
            validate_range("rest.timeout_seconds", timeout, 1, 3600)?;
        }

        if let Some(envelope) = &self.response_envelope {
            validate_non_empty_string("rest.response_envelope", envelope)?;
        }

        match (&self.index, self.scan_mode) {
            (Some(index), _) => index.validate()?,
            (None, ScanMode::Index) => {
                return Err(BindingError::ConfigValidationError {
                    field: "rest.scan_mode".to_string(),
                    message: "scan_mode = \"index\" requires an [index] section".to_string(),
                })
            }
            (None, ScanMode::Remote) => {}
        }

        Ok(())
    }
}
