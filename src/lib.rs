pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{BindingConfig, BindingKind, RestConfig};
pub use core::{
    factory::connect, index::MemoryIndex, noop::NoopDb, report, rest::RestDb, Db, FieldSet,
    Fields, KeyIndex, Operation, Status,
};
pub use utils::error::{BindingError, Result};
