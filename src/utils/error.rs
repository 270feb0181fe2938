use thiserror::Error;

#[derive(Error, Debug)]
pub enum BindingError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Remote service answered {status} for {url}")]
    StatusError { url: String, status: u16 },

    #[error("JSON decode error: {0}")]
    DecodeError(#[from] serde_json::Error),

    #[error("Unexpected response: {message}")]
    ResponseError { message: String },

    #[error("Key '{key}' is not present in the scan index")]
    IndexEntryMissing { key: String },

    #[error("Scan index error: {message}")]
    IndexError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

impl BindingError {
    /// 是否為配置類錯誤（與單次操作失敗區分）
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            BindingError::ConfigError { .. }
                | BindingError::MissingConfigError { .. }
                | BindingError::InvalidConfigValueError { .. }
                | BindingError::ConfigValidationError { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, BindingError>;
