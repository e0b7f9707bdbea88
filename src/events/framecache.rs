//! Event and observer to purge entries from the frame cache.
//!
//! Triggering a [`FrameCachePurgeEvent`] runs one of the
//! [`FrameCache`] removal operations, selected by [`PurgeScope`]. This lets
//! scene code, memory-pressure handlers and asset reloaders purge frames
//! without a direct handle on the resource.
//!
//! ```ignore
//! commands.trigger(FrameCachePurgeEvent {
//!     scope: PurgeScope::Source("sheets/level1.json".into()),
//! });
//! ```

use std::sync::Arc;

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::resources::atlastexture::AtlasTexture;
use crate::resources::descriptor::DescriptorBatch;
use crate::resources::framecache::FrameCache;

/// Which entries a purge removes.
#[derive(Debug, Clone)]
pub enum PurgeScope {
    /// Frames no entity or system holds besides the cache.
    Unused,
    /// A single frame name.
    Name(String),
    /// Everything a descriptor source contributed.
    Source(String),
    /// Every name a decoded descriptor declares.
    Batch(Arc<DescriptorBatch>),
    /// Every name the descriptor `source_id` declares, re-read from its source.
    Descriptor(String),
    /// Every frame backed by the texture.
    Texture(Arc<AtlasTexture>),
    /// Whole cache.
    All,
}

#[derive(Event, Debug, Clone)]
pub struct FrameCachePurgeEvent {
    pub scope: PurgeScope,
}

/// Observer that applies a [`FrameCachePurgeEvent`] to the [`FrameCache`].
///
/// Does nothing if the cache resource is absent.
pub fn frame_cache_purge_observer(
    trigger: On<FrameCachePurgeEvent>,
    cache: Option<ResMut<FrameCache>>,
) {
    let Some(mut cache) = cache else {
        return;
    };
    let scope = &trigger.event().scope;
    debug!("FrameCachePurgeEvent {:?}", scope);
    match scope {
        PurgeScope::Unused => {
            cache.remove_unused();
        }
        PurgeScope::Name(name) => {
            cache.remove_by_name(name);
        }
        PurgeScope::Source(source_id) => {
            cache.remove_by_source(source_id);
        }
        PurgeScope::Batch(batch) => {
            cache.remove_batch(batch);
        }
        PurgeScope::Descriptor(source_id) => {
            if let Err(e) = cache.remove_by_descriptor(source_id) {
                warn!("Cannot purge frames of {}: {}", source_id, e);
            }
        }
        PurgeScope::Texture(texture) => {
            cache.remove_by_texture(texture);
        }
        PurgeScope::All => cache.remove_all(),
    }
}
