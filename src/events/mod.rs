//! Event types and observers.
//!
//! Submodules:
//! - [`framecache`] – purge frames from the cache by name, source, texture or usage
pub mod framecache;
