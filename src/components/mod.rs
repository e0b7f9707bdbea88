//! ECS components.
//!
//! - [`framesprite`] – draws a cached frame and keeps it alive while the entity exists
pub mod framesprite;
