pub mod codec;
pub mod factory;
pub mod index;
pub mod noop;
pub mod rest;

pub use crate::domain::model::{FieldSet, Fields, Operation, Status};
pub use crate::domain::ports::{Db, KeyIndex};
pub use crate::utils::error::Result;

/// Collapses an operation result into the harness status, logging the failure.
pub fn report<T>(operation: Operation, result: &Result<T>) -> Status {
    if let Err(e) = result {
        tracing::error!("❌ {} failed: {}", operation, e);
    }
    Status::from(result)
}
