//! Sprite frame cache library.
//!
//! Named sprite frames carved out of shared atlas textures, cached by name
//! with alias lookup, per-descriptor source tracking and reference-aware
//! eviction. The cache plugs into a `bevy_ecs` world as a resource.

pub mod components;
pub mod events;
pub mod resources;
pub mod systems;
