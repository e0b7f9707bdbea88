//! ECS systems.
//!
//! - [`framecache`] – eviction of frames no entity holds any more
pub mod framecache;
