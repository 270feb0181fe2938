pub mod binding_config;
#[cfg(feature = "cli")]
pub mod cli;
pub mod rest_config;

pub use binding_config::{BindingConfig, BindingKind};
#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use rest_config::{
    EndpointPaths, IndexBackend, IndexConfig, MissingIndexEntry, Profile, RequestStyle,
    RestConfig, ScanMode,
};
