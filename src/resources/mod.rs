//! Frame cache resources and the data they are built from.
//!
//! Overview
//! - `aliastable` – alternate names resolving to canonical frame names
//! - `atlastexture` – texture handles, loaders and the path-keyed texture store
//! - `cacheconfig` – INI configuration for descriptor and texture lookup
//! - `descriptor` – descriptor batches (JSON) and the sources that provide them
//! - `error` – error type shared by the cache and its collaborators
//! - `framecache` – the name-keyed frame cache itself
//! - `spriteframe` – frame geometry and the immutable frame type
pub mod aliastable;
pub mod atlastexture;
pub mod cacheconfig;
pub mod descriptor;
pub mod error;
pub mod framecache;
pub mod spriteframe;
