use crate::config::rest_config::{
    IndexConfig, MissingIndexEntry, Profile, RequestStyle, RestConfig, ScanMode,
};
use crate::utils::error::{BindingError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

/// Which binding the factory builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingKind {
    #[default]
    Noop,
    Rest,
}

impl FromStr for BindingKind {
    type Err = BindingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "noop" => Ok(BindingKind::Noop),
            "rest" => Ok(BindingKind::Rest),
            other => Err(BindingError::InvalidConfigValueError {
                field: "binding.kind".to_string(),
                value: other.to_string(),
                reason: "Expected one of: noop, rest".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BindingSection {
    #[serde(default)]
    pub kind: BindingKind,
}

/// `[rest]` as written in the file. Unset values fall back to the profile layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestSection {
    pub profile: Option<Profile>,
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    /// Empty string disables the profile's envelope.
    pub response_envelope: Option<String>,
    pub scan_mode: Option<ScanMode>,
    pub missing_index_entry: Option<MissingIndexEntry>,
    pub insert_style: Option<RequestStyle>,
    pub update_style: Option<RequestStyle>,
    pub delete_style: Option<RequestStyle>,
    /// Replaces the profile's static query parameters when present.
    pub params: Option<BTreeMap<String, String>>,
    pub paths: Option<PathOverrides>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathOverrides {
    pub read: Option<String>,
    pub insert: Option<String>,
    pub delete: Option<String>,
    pub update: Option<String>,
    pub scan: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BindingConfig {
    #[serde(default)]
    pub binding: BindingSection,
    pub rest: Option<RestSection>,
    pub index: Option<IndexConfig>,
}

impl BindingConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BindingError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 只用屬性建立配置（壓測工具 `-p name=value` 的用法）
    pub fn from_properties<'a, I>(properties: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = Self::default();
        config.apply_properties(properties)?;
        Ok(config)
    }

    /// 替換環境變數 (例如 ${REDIS_PASSWORD})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BindingError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 套用屬性覆寫，後出現的值優先
    pub fn apply_properties<'a, I>(&mut self, properties: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (name, value) in properties {
            self.apply_property(name.trim(), value.trim())?;
        }
        Ok(())
    }

    fn apply_property(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "binding" => self.binding.kind = value.parse()?,
            "rest.url" => self.rest_mut().base_url = Some(value.to_string()),
            "rest.profile" => self.rest_mut().profile = Some(value.parse()?),
            "rest.timeout" => {
                let seconds = value
                    .parse::<u64>()
                    .map_err(|e| invalid_property(name, value, e))?;
                self.rest_mut().timeout_seconds = Some(seconds);
            }
            "rest.envelope" => self.rest_mut().response_envelope = Some(value.to_string()),
            "rest.scan_mode" => self.rest_mut().scan_mode = Some(value.parse()?),
            "rest.missing_index_entry" => {
                self.rest_mut().missing_index_entry = Some(value.parse()?)
            }
            "redis.host" => self.index_mut().host = value.to_string(),
            "redis.port" => {
                self.index_mut().port = value
                    .parse::<u16>()
                    .map_err(|e| invalid_property(name, value, e))?;
            }
            "redis.password" => self.index_mut().password = Some(value.to_string()),
            "index.backend" => self.index_mut().backend = value.parse()?,
            "index.key" => self.index_mut().key = value.to_string(),
            _ => tracing::debug!("Ignoring unknown property {}={}", name, value),
        }
        Ok(())
    }

    fn rest_mut(&mut self) -> &mut RestSection {
        self.rest.get_or_insert_with(RestSection::default)
    }

    fn index_mut(&mut self) -> &mut IndexConfig {
        self.index.get_or_insert_with(IndexConfig::default)
    }

    /// 解析出 HTTP binding 的完整設定：先取 profile 預設，再套用覆寫
    pub fn rest_config(&self) -> Result<RestConfig> {
        let section = self.rest.as_ref().ok_or_else(|| BindingError::MissingConfigError {
            field: "rest".to_string(),
        })?;
        let base_url = section
            .base_url
            .as_ref()
            .ok_or_else(|| BindingError::MissingConfigError {
                field: "rest.base_url".to_string(),
            })?;

        let mut config = RestConfig::for_profile(section.profile.unwrap_or_default(), base_url);

        if section.timeout_seconds.is_some() {
            config.timeout_seconds = section.timeout_seconds;
        }
        if let Some(envelope) = &section.response_envelope {
            config.response_envelope = if envelope.is_empty() {
                None
            } else {
                Some(envelope.clone())
            };
        }
        if let Some(scan_mode) = section.scan_mode {
            config.scan_mode = scan_mode;
        }
        if let Some(policy) = section.missing_index_entry {
            config.missing_index_entry = policy;
        }
        if let Some(style) = section.insert_style {
            config.insert_style = style;
        }
        if let Some(style) = section.update_style {
            config.update_style = style;
        }
        if let Some(style) = section.delete_style {
            config.delete_style = style;
        }
        if let Some(params) = &section.params {
            config.static_params = params.clone();
        }
        if let Some(paths) = &section.paths {
            let overrides = [
                (&paths.read, &mut config.paths.read),
                (&paths.insert, &mut config.paths.insert),
                (&paths.delete, &mut config.paths.delete),
                (&paths.update, &mut config.paths.update),
                (&paths.scan, &mut config.paths.scan),
            ];
            for (value, target) in overrides {
                if let Some(value) = value {
                    *target = value.clone();
                }
            }
        }
        if let Some(index) = &self.index {
            config.index = Some(index.clone());
        }

        Ok(config)
    }
}

fn invalid_property(name: &str, value: &str, err: impl std::fmt::Display) -> BindingError {
    BindingError::InvalidConfigValueError {
        field: name.to_string(),
        value: value.to_string(),
        reason: err.to_string(),
    }
}

impl Validate for BindingConfig {
    fn validate(&self) -> Result<()> {
        match self.binding.kind {
            BindingKind::Noop => Ok(()),
            BindingKind::Rest => self.rest_config()?.validate(),
        }
    }
}
