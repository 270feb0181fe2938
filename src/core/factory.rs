use crate::config::{BindingConfig, BindingKind};
use crate::core::noop::NoopDb;
use crate::core::rest::RestDb;
use crate::core::Db;
use crate::utils::error::Result;
use crate::utils::validation::Validate;

/// Builds the binding selected by `binding.kind` and runs its `init`.
pub async fn connect(config: &BindingConfig) -> Result<Box<dyn Db>> {
    config.validate()?;

    let mut db: Box<dyn Db> = match config.binding.kind {
        BindingKind::Noop => Box::new(NoopDb::new()),
        BindingKind::Rest => Box::new(RestDb::new(config.rest_config()?)?),
    };

    db.init().await?;
    tracing::debug!("Binding {:?} initialised", config.binding.kind);
    Ok(db)
}
