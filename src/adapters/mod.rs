// Adapters layer: concrete clients for external systems the bindings talk to.

#[cfg(feature = "redis-index")]
pub mod redis_index;
