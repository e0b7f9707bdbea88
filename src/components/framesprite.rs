//! Sprite component drawing a named frame from the frame cache.
//!
//! A [`FrameSprite`] keeps its own `Arc` to the [`SpriteFrame`] it draws.
//! Entities carrying one are the external holders the
//! [`FrameCache`](crate::resources::framecache::FrameCache) checks before
//! evicting unused frames: as long as the entity exists, its frame survives
//! [`remove_unused`](crate::resources::framecache::FrameCache::remove_unused).
//! Explicit removals (by name, source or texture) only drop the cache's entry;
//! the component keeps drawing the frame it already holds.
//!
//! # Related
//!
//! - [`crate::systems::framecache::evict_unused_frames`] – eviction on scene change
//! - [`crate::events::framecache::FrameCachePurgeEvent`] – explicit purges

use std::sync::Arc;

use bevy_ecs::prelude::Component;

use crate::resources::framecache::FrameCache;
use crate::resources::spriteframe::SpriteFrame;

#[derive(Component, Clone, Debug)]
pub struct FrameSprite {
    /// Name the frame was looked up with (may be an alias).
    pub name: String,
    pub frame: Arc<SpriteFrame>,
    pub flip_h: bool,
    pub flip_v: bool,
}

impl FrameSprite {
    /// Look `name` up in `cache` and hold on to the result.
    pub fn from_cache(cache: &FrameCache, name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        let frame = cache.get_frame(&name)?;
        Some(FrameSprite {
            name,
            frame,
            flip_h: false,
            flip_v: false,
        })
    }

    pub fn with_flip(mut self, flip_h: bool, flip_v: bool) -> Self {
        self.flip_h = flip_h;
        self.flip_v = flip_v;
        self
    }

    /// Size the sprite is drawn at: the untrimmed original size.
    pub fn display_size(&self) -> (f32, f32) {
        let size = self.frame.original_size();
        (size.width, size.height)
    }
}
