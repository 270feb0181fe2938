use crate::utils::error::{BindingError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(BindingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(BindingError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(BindingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// 端點路徑必須為空或以 `/` 開頭，且不能自帶查詢字串
pub fn validate_endpoint_path(field_name: &str, path: &str) -> Result<()> {
    if !path.is_empty() && !path.starts_with('/') {
        return Err(BindingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path must be empty or start with '/'".to_string(),
        });
    }

    if path.contains('?') || path.contains('#') {
        return Err(BindingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot carry a query string or fragment".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BindingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(BindingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("rest.base_url", "https://example.com").is_ok());
        assert!(validate_url("rest.base_url", "http://localhost:8080").is_ok());
        assert!(validate_url("rest.base_url", "").is_err());
        assert!(validate_url("rest.base_url", "invalid-url").is_err());
        assert!(validate_url("rest.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_endpoint_path() {
        assert!(validate_endpoint_path("rest.paths.read", "").is_ok());
        assert!(validate_endpoint_path("rest.paths.read", "/readLog").is_ok());
        assert!(validate_endpoint_path("rest.paths.read", "readLog").is_err());
        assert!(validate_endpoint_path("rest.paths.read", "/readLog?x=1").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("index.port", 6379u32, 1, 65535).is_ok());
        assert!(validate_range("index.port", 0u32, 1, 65535).is_err());
        assert!(validate_range("index.port", 70000u32, 1, 65535).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("index.host", "localhost").is_ok());
        assert!(validate_non_empty_string("index.host", "   ").is_err());
    }
}
