//! Error type shared by the frame cache and its collaborators.
//!
//! Batch-level failures ([`FrameCacheError::SourceUnavailable`],
//! [`FrameCacheError::TextureUnresolved`]) abort a bulk load and are returned
//! to the caller. Per-entry anomalies ([`FrameCacheError::AliasTargetMissing`],
//! [`FrameCacheError::AliasShadowsFrame`], [`FrameCacheError::FrameOutOfBounds`])
//! are logged and skipped while the rest of the batch is applied.
//!
//! Lookup and removal misses are not errors: they surface as `None` or as a
//! silent no-op.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameCacheError {
    /// The descriptor could not be read or decoded.
    #[error("descriptor source '{source_id}' unavailable: {reason}")]
    SourceUnavailable { source_id: String, reason: String },

    /// No backing texture could be determined or loaded.
    #[error("texture for '{source_id}' unresolved: {reason}")]
    TextureUnresolved { source_id: String, reason: String },

    /// An alias names a frame that the declaring batch did not insert.
    #[error("alias '{alias}' targets missing frame '{target}'")]
    AliasTargetMissing { alias: String, target: String },

    /// An alias key collides with a canonical frame name.
    #[error("alias '{alias}' collides with an existing frame name")]
    AliasShadowsFrame { alias: String },

    /// The frame's footprint does not fit inside its texture.
    #[error(
        "frame '{name}' footprint {width}x{height} at ({x}, {y}) exceeds texture {texture_width}x{texture_height}"
    )]
    FrameOutOfBounds {
        name: String,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        texture_width: u32,
        texture_height: u32,
    },

    /// Configuration file could not be read or written.
    #[error("config error: {0}")]
    Config(String),
}

impl FrameCacheError {
    /// Shorthand used by descriptor sources.
    pub fn source_unavailable(source_id: &str, reason: impl ToString) -> Self {
        FrameCacheError::SourceUnavailable {
            source_id: source_id.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Shorthand used by texture resolution.
    pub fn texture_unresolved(source_id: &str, reason: impl ToString) -> Self {
        FrameCacheError::TextureUnresolved {
            source_id: source_id.to_string(),
            reason: reason.to_string(),
        }
    }
}
