use crate::config::BindingConfig;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "bench-bindings")]
#[command(about = "Run a single benchmark binding operation against a configured backend")]
pub struct CliConfig {
    #[arg(long, help = "TOML file describing the binding")]
    pub config: Option<PathBuf>,

    #[arg(
        short = 'p',
        long = "property",
        value_parser = parse_key_value,
        help = "Property override, e.g. -p rest.url=http://localhost:8080"
    )]
    pub properties: Vec<(String, String)>,

    #[arg(long, default_value = "usertable")]
    pub table: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Read one record
    Read {
        key: String,
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
    },
    /// Insert one record
    Insert {
        key: String,
        #[arg(long = "field", value_parser = parse_key_value)]
        values: Vec<(String, String)>,
    },
    /// Update one record
    Update {
        key: String,
        #[arg(long = "field", value_parser = parse_key_value)]
        values: Vec<(String, String)>,
    },
    /// Delete one record
    Delete { key: String },
    /// Scan `count` records starting at `start_key`
    Scan {
        start_key: String,
        count: usize,
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
    },
}

impl CliConfig {
    /// 先讀 --config 檔案，再套用 -p 覆寫
    pub fn binding_config(&self) -> Result<BindingConfig> {
        let mut config = match &self.config {
            Some(path) => BindingConfig::from_file(path)?,
            None => BindingConfig::default(),
        };

        config.apply_properties(
            self.properties
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        )?;

        Ok(config)
    }
}

fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", s))?;
    if name.trim().is_empty() {
        return Err(format!("empty name in '{}'", s));
    }
    Ok((name.trim().to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BindingKind;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("rest.url=http://h:1/a?b=c").unwrap(),
            ("rest.url".to_string(), "http://h:1/a?b=c".to_string())
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=value").is_err());
    }

    #[test]
    fn test_cli_parsing() {
        let cli = CliConfig::parse_from([
            "bench-bindings",
            "-p",
            "binding=rest",
            "-p",
            "rest.url=http://localhost:8080",
            "insert",
            "user1",
            "--field",
            "field0=hello",
            "--field",
            "field1=world",
        ]);

        let config = cli.binding_config().unwrap();
        assert_eq!(config.binding.kind, BindingKind::Rest);
        match cli.command {
            Command::Insert { key, values } => {
                assert_eq!(key, "user1");
                assert_eq!(values.len(), 2);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_scan_fields_are_comma_separated() {
        let cli = CliConfig::parse_from(["bench-bindings", "scan", "user1", "10", "--fields", "a,b"]);
        match cli.command {
            Command::Scan {
                start_key,
                count,
                fields,
            } => {
                assert_eq!(start_key, "user1");
                assert_eq!(count, 10);
                assert_eq!(fields, vec!["a".to_string(), "b".to_string()]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
