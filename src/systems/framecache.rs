//! Frame cache maintenance systems.
//!
//! [`evict_unused_frames`] drops cache entries that no entity holds any more.
//! Add it to the schedule that runs after a scene switch has despawned the
//! old scene's entities, so frames only the previous scene used are freed.

use bevy_ecs::prelude::*;

use crate::resources::framecache::FrameCache;

/// Evicts every frame whose only holder is the [`FrameCache`] itself.
///
/// Frames held by [`FrameSprite`](crate::components::framesprite::FrameSprite)
/// components on live entities stay cached.
pub fn evict_unused_frames(cache: Option<ResMut<FrameCache>>) {
    if let Some(mut cache) = cache {
        cache.remove_unused();
    }
}
