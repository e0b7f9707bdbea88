//! Named sprite frame cache.
//!
//! [`FrameCache`] maps frame names to shared [`SpriteFrame`]s. Frames arrive
//! either in bulk from a descriptor (see
//! [`descriptor`](crate::resources::descriptor)) or one at a time via
//! [`FrameCache::add_frame`]. Adding a frame under an existing name replaces
//! the old one.
//!
//! # Source tracking
//!
//! Every bulk load records the descriptor's source id together with the
//! frames and aliases it inserted. Loading a recorded source again is a
//! no-op, and [`FrameCache::remove_by_source`] removes every name the record
//! lists, then forgets the source. [`FrameCache::remove_batch`] and
//! [`FrameCache::remove_by_descriptor`] remove by the names a descriptor
//! declares instead, whether or not it was loaded.
//!
//! # Eviction
//!
//! The cache is not the authority over a frame's lifetime: entities and other
//! systems clone the `Arc` they get from [`FrameCache::get_frame`].
//! [`FrameCache::remove_unused`] drops every entry whose only strong
//! reference is the cache's own. Call it on scene transitions.
//!
//! # Usage
//!
//! ```ignore
//! let mut cache = FrameCache::new(
//!     JsonDescriptorSource::new("assets"),
//!     TextureStore::new(PngHeaderLoader),
//! );
//! cache.load_from_source("sheets/hero.json", None)?;
//! let frame = cache.get_frame("hero_walk_01").unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use log::{debug, info, warn};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::resources::aliastable::AliasTable;
use crate::resources::atlastexture::{AtlasTexture, TextureStore};
use crate::resources::cacheconfig::CacheConfig;
use crate::resources::descriptor::{DescriptorBatch, DescriptorSource, MAX_FORMAT};
use crate::resources::error::FrameCacheError;
use crate::resources::spriteframe::SpriteFrame;

/// Names a loaded source contributed.
#[derive(Debug, Default)]
struct SourceRecord {
    frames: Vec<String>,
    aliases: Vec<String>,
}

/// Outcome of a bulk load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadSummary {
    /// Frames inserted under names that were free.
    pub inserted: usize,
    /// Frames that replaced an existing entry of the same name.
    pub replaced: usize,
    /// Records skipped (malformed, wrong layout, out of bounds).
    pub skipped: usize,
    /// Aliases registered.
    pub aliases: usize,
    /// The source was already loaded; nothing changed.
    pub already_loaded: bool,
}

impl LoadSummary {
    fn already_loaded() -> Self {
        LoadSummary {
            already_loaded: true,
            ..Default::default()
        }
    }
}

/// Cache of named sprite frames with alias lookup and source tracking.
#[derive(Resource)]
pub struct FrameCache {
    frames: FxHashMap<String, Arc<SpriteFrame>>,
    aliases: AliasTable,
    loaded_sources: FxHashMap<String, SourceRecord>,
    source: Box<dyn DescriptorSource>,
    textures: TextureStore,
    texture_extension: String,
    derive_texture_from_source: bool,
}

impl FrameCache {
    /// Create an empty cache reading descriptors from `source` and textures
    /// through `textures`.
    pub fn new(source: impl DescriptorSource + 'static, textures: TextureStore) -> Self {
        let defaults = CacheConfig::new();
        FrameCache {
            frames: FxHashMap::default(),
            aliases: AliasTable::new(),
            loaded_sources: FxHashMap::default(),
            source: Box::new(source),
            textures,
            texture_extension: defaults.texture_extension,
            derive_texture_from_source: defaults.derive_texture_from_source,
        }
    }

    /// Builder method to apply texture naming settings from `config`.
    pub fn with_config(mut self, config: &CacheConfig) -> Self {
        self.texture_extension = config.texture_extension.clone();
        self.derive_texture_from_source = config.derive_texture_from_source;
        self
    }

    /// Load every frame described by `source_id`.
    ///
    /// Uses `texture` when given, otherwise the texture file the descriptor
    /// declares. A source that is already loaded is left untouched.
    pub fn load_from_source(
        &mut self,
        source_id: &str,
        texture: Option<Arc<AtlasTexture>>,
    ) -> Result<LoadSummary, FrameCacheError> {
        if self.is_source_loaded(source_id) {
            debug!("Frame source {} already loaded", source_id);
            return Ok(LoadSummary::already_loaded());
        }
        let batch = self.source.fetch(source_id)?;
        let texture = match texture {
            Some(t) => t,
            None => self.resolve_texture(source_id, &batch)?,
        };
        Ok(self.apply_batch(source_id, &batch, texture))
    }

    /// Like [`load_from_source`](Self::load_from_source) but with an explicit
    /// texture file, ignoring the one declared in the descriptor.
    pub fn load_from_source_with_texture_file(
        &mut self,
        source_id: &str,
        texture_path: impl AsRef<Path>,
    ) -> Result<LoadSummary, FrameCacheError> {
        if self.is_source_loaded(source_id) {
            debug!("Frame source {} already loaded", source_id);
            return Ok(LoadSummary::already_loaded());
        }
        let batch = self.source.fetch(source_id)?;
        let texture = self
            .textures
            .get_or_load(texture_path.as_ref())
            .map_err(|e| FrameCacheError::texture_unresolved(source_id, e))?;
        Ok(self.apply_batch(source_id, &batch, texture))
    }

    /// Load an already decoded batch, recorded under `source_id`.
    pub fn load_batch(
        &mut self,
        source_id: &str,
        batch: &DescriptorBatch,
        texture: Option<Arc<AtlasTexture>>,
    ) -> Result<LoadSummary, FrameCacheError> {
        if self.is_source_loaded(source_id) {
            debug!("Frame source {} already loaded", source_id);
            return Ok(LoadSummary::already_loaded());
        }
        let texture = match texture {
            Some(t) => t,
            None => self.resolve_texture(source_id, batch)?,
        };
        Ok(self.apply_batch(source_id, batch, texture))
    }

    fn resolve_texture(
        &mut self,
        source_id: &str,
        batch: &DescriptorBatch,
    ) -> Result<Arc<AtlasTexture>, FrameCacheError> {
        let path = match batch.metadata.texture_file_name.as_deref() {
            Some(name) => self.source.texture_path(source_id, name),
            None if self.derive_texture_from_source => self
                .source
                .derived_texture_path(source_id, &self.texture_extension),
            None => {
                return Err(FrameCacheError::texture_unresolved(
                    source_id,
                    "descriptor declares no texture file",
                ));
            }
        };
        self.textures
            .get_or_load(&path)
            .map_err(|e| FrameCacheError::texture_unresolved(source_id, e))
    }

    fn apply_batch(
        &mut self,
        source_id: &str,
        batch: &DescriptorBatch,
        texture: Arc<AtlasTexture>,
    ) -> LoadSummary {
        let mut summary = LoadSummary::default();
        let mut record = SourceRecord::default();
        let format = batch.format();

        if format > MAX_FORMAT {
            warn!(
                "Frame source {} has unsupported format {}; no frames loaded",
                source_id, format
            );
            self.loaded_sources.insert(source_id.to_string(), record);
            return summary;
        }

        let mut inserted_names: FxHashSet<&str> = FxHashSet::default();

        for (name, raw) in batch.records() {
            let raw = match raw {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("Malformed frame {} in {}: {}; skipped", name, source_id, e);
                    summary.skipped += 1;
                    continue;
                }
            };
            if !raw.matches_format(format) {
                warn!(
                    "Frame {} in {} does not use the format {} layout; skipped",
                    name, source_id, format
                );
                summary.skipped += 1;
                continue;
            }
            let frame = match SpriteFrame::new(name, raw.to_geometry(), texture.clone()) {
                Ok(f) => Arc::new(f),
                Err(e) => {
                    warn!("Skipping frame in {}: {}", source_id, e);
                    summary.skipped += 1;
                    continue;
                }
            };
            record.frames.push(name.to_string());
            if self.frames.insert(name.to_string(), frame).is_some() {
                summary.replaced += 1;
            } else {
                summary.inserted += 1;
            }
            inserted_names.insert(name);
        }

        for (alias, target) in batch.declared_aliases() {
            if !inserted_names.contains(target.as_str()) {
                warn!(
                    "{}",
                    FrameCacheError::AliasTargetMissing {
                        alias: alias.clone(),
                        target: target.clone(),
                    }
                );
                continue;
            }
            if self.frames.contains_key(&alias) {
                warn!("{}", FrameCacheError::AliasShadowsFrame { alias });
                continue;
            }
            self.aliases.insert(alias.clone(), target);
            record.aliases.push(alias);
            summary.aliases += 1;
        }

        info!(
            "Loaded frame source {}: {} new, {} replaced, {} skipped, {} aliases",
            source_id, summary.inserted, summary.replaced, summary.skipped, summary.aliases
        );
        self.loaded_sources.insert(source_id.to_string(), record);
        summary
    }

    /// Insert or replace a single frame. Not attributed to any source.
    ///
    /// Returns the frame previously stored under `name`.
    pub fn add_frame(
        &mut self,
        frame: Arc<SpriteFrame>,
        name: impl Into<String>,
    ) -> Option<Arc<SpriteFrame>> {
        self.frames.insert(name.into(), frame)
    }

    /// Frame stored under `name`, or under the canonical name `name` aliases.
    pub fn get_frame(&self, name: &str) -> Option<Arc<SpriteFrame>> {
        self.frames
            .get(name)
            .or_else(|| {
                self.aliases
                    .resolve(name)
                    .and_then(|target| self.frames.get(target))
            })
            .cloned()
    }

    /// Remove the entry named `name`. Source records are not touched.
    pub fn remove_by_name(&mut self, name: &str) -> bool {
        let removed = self.frames.remove(name).is_some();
        if removed {
            debug!("Removed frame {}", name);
        }
        removed
    }

    /// Remove every name `source_id` recorded at load time and forget that
    /// it was loaded.
    ///
    /// Names are removed whoever stores them now; names already gone are
    /// skipped. Returns the number of frames removed.
    pub fn remove_by_source(&mut self, source_id: &str) -> usize {
        let Some(record) = self.loaded_sources.remove(source_id) else {
            return 0;
        };
        let removed = record
            .frames
            .iter()
            .filter(|name| self.frames.remove(name.as_str()).is_some())
            .count();
        for alias in &record.aliases {
            self.aliases.remove(alias);
        }
        debug!("Removed {} frames of source {}", removed, source_id);
        removed
    }

    /// Remove every frame and alias a decoded batch names, whether or not it
    /// was ever loaded.
    pub fn remove_batch(&mut self, batch: &DescriptorBatch) -> usize {
        let mut removed = FxHashSet::default();
        for name in batch.frames.keys() {
            if self.frames.remove(name).is_some() {
                removed.insert(name.clone());
            }
        }
        for (alias, _) in batch.declared_aliases() {
            self.aliases.remove(&alias);
        }
        self.retract_emptied_sources(&removed);
        debug!("Removed {} frames named by a descriptor batch", removed.len());
        removed.len()
    }

    /// Fetch the descriptor `source_id` and remove every frame it names,
    /// also when it was never loaded through this cache.
    pub fn remove_by_descriptor(&mut self, source_id: &str) -> Result<usize, FrameCacheError> {
        let batch = self.source.fetch(source_id)?;
        let removed = self.remove_batch(&batch);
        if let Some(record) = self.loaded_sources.remove(source_id) {
            for alias in &record.aliases {
                self.aliases.remove(alias);
            }
        }
        Ok(removed)
    }

    /// Remove every frame backed by `texture`, whichever source loaded it.
    pub fn remove_by_texture(&mut self, texture: &Arc<AtlasTexture>) -> usize {
        let mut removed = FxHashSet::default();
        self.frames.retain(|name, frame| {
            let keep = !frame.uses_texture(texture);
            if !keep {
                removed.insert(name.clone());
            }
            keep
        });
        if self
            .textures
            .get(&texture.path)
            .is_some_and(|stored| Arc::ptr_eq(stored, texture))
        {
            self.textures.remove(&texture.path);
        }
        self.retract_emptied_sources(&removed);
        debug!(
            "Removed {} frames using texture {}",
            removed.len(),
            texture.path.display()
        );
        removed.len()
    }

    /// Remove every frame nothing outside the cache holds on to.
    pub fn remove_unused(&mut self) -> usize {
        let mut removed = FxHashSet::default();
        self.frames.retain(|name, frame| {
            let keep = Arc::strong_count(frame) > 1;
            if !keep {
                removed.insert(name.clone());
            }
            keep
        });
        self.retract_emptied_sources(&removed);
        if !removed.is_empty() {
            info!("Evicted {} unused frames", removed.len());
        }
        removed.len()
    }

    /// Drop all frames, aliases, source records and cached textures.
    pub fn remove_all(&mut self) {
        info!(
            "Clearing frame cache ({} frames, {} sources)",
            self.frames.len(),
            self.loaded_sources.len()
        );
        self.frames.clear();
        self.aliases.clear();
        self.loaded_sources.clear();
        self.textures.clear();
    }

    // Forget sources that lost their last frame in this call, so they can be
    // loaded again. Sources emptied earlier by remove_by_name stay recorded.
    fn retract_emptied_sources(&mut self, removed: &FxHashSet<String>) {
        if removed.is_empty() {
            return;
        }
        let frames = &self.frames;
        let aliases = &mut self.aliases;
        self.loaded_sources.retain(|source_id, record| {
            let touched = record.frames.iter().any(|name| removed.contains(name));
            if !touched || record.frames.iter().any(|name| frames.contains_key(name)) {
                return true;
            }
            for alias in &record.aliases {
                aliases.remove(alias);
            }
            debug!("Frame source {} no longer has live frames", source_id);
            false
        });
    }

    pub fn is_source_loaded(&self, source_id: &str) -> bool {
        self.loaded_sources.contains_key(source_id)
    }

    /// Whether `name` is a canonical frame name (aliases are not considered).
    pub fn contains(&self, name: &str) -> bool {
        self.frames.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    /// Canonical frame names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.frames.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Names of frames backed by `texture`, sorted.
    pub fn frames_for_texture(&self, texture: &Arc<AtlasTexture>) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .frames
            .iter()
            .filter(|(_, f)| f.uses_texture(texture))
            .map(|(n, _)| n.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn textures(&self) -> &TextureStore {
        &self.textures
    }

    pub fn textures_mut(&mut self) -> &mut TextureStore {
        &mut self.textures
    }
}

impl std::fmt::Debug for FrameCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameCache")
            .field("frames", &self.frames.len())
            .field("aliases", &self.aliases.len())
            .field("loaded_sources", &self.loaded_sources.len())
            .field("textures", &self.textures)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::atlastexture::StaticTextureLoader;
    use crate::resources::descriptor::MemoryDescriptorSource;
    use crate::resources::spriteframe::Rect;

    fn batch(json: &str) -> DescriptorBatch {
        DescriptorBatch::from_json(json).unwrap()
    }

    fn hero_batch() -> DescriptorBatch {
        batch(
            r#"{
                "frames": {
                    "walk1": {"textureRect": {"x": 0, "y": 0, "w": 32, "h": 32}},
                    "walk2": {"textureRect": {"x": 32, "y": 0, "w": 32, "h": 32}}
                },
                "metadata": {"textureFileName": "hero.png", "aliases": {"hero": "walk1"}}
            }"#,
        )
    }

    fn cache_with(source: MemoryDescriptorSource) -> FrameCache {
        let loader = StaticTextureLoader::new()
            .with("hero.png", 64, 32)
            .with("items.png", 64, 64);
        FrameCache::new(source, TextureStore::new(loader))
    }

    fn hero_cache() -> FrameCache {
        cache_with(MemoryDescriptorSource::new().with("S1", hero_batch()))
    }

    fn tex(w: u32, h: u32) -> Arc<AtlasTexture> {
        Arc::new(AtlasTexture::new("manual.png", w, h))
    }

    fn frame(t: &Arc<AtlasTexture>, x: f32) -> Arc<SpriteFrame> {
        Arc::new(SpriteFrame::with_rect("f", Rect::new(x, 0.0, 8.0, 8.0), t.clone()).unwrap())
    }

    #[test]
    fn test_load_resolves_declared_texture() {
        let mut cache = hero_cache();
        let summary = cache.load_from_source("S1", None).unwrap();
        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.aliases, 1);
        let walk2 = cache.get_frame("walk2").unwrap();
        assert_eq!(walk2.rect(), Rect::new(32.0, 0.0, 32.0, 32.0));
        assert_eq!(walk2.texture().path, Path::new("hero.png"));
        assert!(cache.is_source_loaded("S1"));
    }

    #[test]
    fn test_load_is_idempotent() {
        let mut cache = hero_cache();
        cache.load_from_source("S1", None).unwrap();
        let first = cache.get_frame("walk1").unwrap();
        let again = cache.load_from_source("S1", None).unwrap();
        assert!(again.already_loaded);
        assert_eq!(cache.names(), vec!["walk1", "walk2"]);
        assert!(Arc::ptr_eq(&first, &cache.get_frame("walk1").unwrap()));
    }

    #[test]
    fn test_missing_source_is_source_unavailable() {
        let mut cache = hero_cache();
        let err = cache.load_from_source("nope", None).unwrap_err();
        assert!(matches!(err, FrameCacheError::SourceUnavailable { .. }));
        assert!(!cache.is_source_loaded("nope"));
    }

    #[test]
    fn test_no_texture_declared_is_texture_unresolved() {
        let b = batch(r#"{"frames": {"a": {"textureRect": {"x": 0, "y": 0, "w": 1, "h": 1}}}}"#);
        let mut cache = cache_with(MemoryDescriptorSource::new().with("S", b));
        let err = cache.load_from_source("S", None).unwrap_err();
        assert!(matches!(err, FrameCacheError::TextureUnresolved { .. }));
        assert!(cache.is_empty());
        assert!(!cache.is_source_loaded("S"));
    }

    #[test]
    fn test_unloadable_texture_is_texture_unresolved() {
        let b = batch(r#"{"frames": {}, "metadata": {"textureFileName": "missing.png"}}"#);
        let mut cache = cache_with(MemoryDescriptorSource::new().with("S", b));
        assert!(matches!(
            cache.load_from_source("S", None),
            Err(FrameCacheError::TextureUnresolved { .. })
        ));
    }

    #[test]
    fn test_derived_texture_name() {
        let b = batch(r#"{"frames": {"a": {"textureRect": {"x": 0, "y": 0, "w": 4, "h": 4}}}}"#);
        let mut cache = cache_with(MemoryDescriptorSource::new().with("hero.json", b));
        assert!(cache.load_from_source("hero.json", None).is_err());

        let mut config = CacheConfig::new();
        config.derive_texture_from_source = true;
        let b = batch(r#"{"frames": {"a": {"textureRect": {"x": 0, "y": 0, "w": 4, "h": 4}}}}"#);
        let mut cache = cache_with(MemoryDescriptorSource::new().with("hero.json", b))
            .with_config(&config);
        cache.load_from_source("hero.json", None).unwrap();
        assert_eq!(
            cache.get_frame("a").unwrap().texture().path,
            Path::new("hero.png")
        );
    }

    #[test]
    fn test_supplied_texture_wins() {
        let mut cache = hero_cache();
        let t = Arc::new(AtlasTexture::new("other.png", 128, 128));
        cache.load_from_source("S1", Some(t.clone())).unwrap();
        assert!(cache.get_frame("walk1").unwrap().uses_texture(&t));
    }

    #[test]
    fn test_explicit_texture_file() {
        let mut cache = hero_cache();
        cache
            .load_from_source_with_texture_file("S1", "items.png")
            .unwrap();
        assert_eq!(
            cache.get_frame("walk1").unwrap().texture().path,
            Path::new("items.png")
        );
    }

    #[test]
    fn test_out_of_bounds_record_skipped() {
        let b = batch(
            r#"{
                "frames": {
                    "ok": {"textureRect": {"x": 0, "y": 0, "w": 32, "h": 32}},
                    "bad": {"textureRect": {"x": 60, "y": 0, "w": 32, "h": 32}}
                },
                "metadata": {"textureFileName": "hero.png"}
            }"#,
        );
        let mut cache = cache_with(MemoryDescriptorSource::new());
        let summary = cache.load_batch("S", &b, None).unwrap();
        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.skipped, 1);
        assert!(cache.contains("ok"));
        assert!(!cache.contains("bad"));
    }

    #[test]
    fn test_layout_mismatch_and_unknown_format() {
        let b = batch(
            r#"{
                "frames": {"a": {"frame": {"x": 0, "y": 0, "w": 4, "h": 4}}},
                "metadata": {"format": 3, "textureFileName": "hero.png"}
            }"#,
        );
        let mut cache = cache_with(MemoryDescriptorSource::new());
        assert_eq!(cache.load_batch("S", &b, None).unwrap().skipped, 1);
        assert!(cache.is_empty());

        let b = batch(
            r#"{
                "frames": {"a": {"textureRect": {"x": 0, "y": 0, "w": 4, "h": 4}}},
                "metadata": {"format": 7, "textureFileName": "hero.png"}
            }"#,
        );
        cache.load_batch("S7", &b, None).unwrap();
        assert!(cache.is_empty());
        assert!(cache.is_source_loaded("S7"));
    }

    #[test]
    fn test_overwrite_on_re_add() {
        let mut cache = hero_cache();
        let t = tex(64, 64);
        let f1 = frame(&t, 0.0);
        let f2 = frame(&t, 8.0);
        assert!(cache.add_frame(f1.clone(), "x").is_none());
        let old = cache.add_frame(f2.clone(), "x").unwrap();
        assert!(Arc::ptr_eq(&old, &f1));
        assert_eq!(cache.len(), 1);
        assert!(Arc::ptr_eq(&cache.get_frame("x").unwrap(), &f2));
    }

    #[test]
    fn test_alias_is_one_hop() {
        let mut cache = hero_cache();
        cache.load_from_source("S1", None).unwrap();
        let walk1 = cache.get_frame("walk1").unwrap();
        assert!(Arc::ptr_eq(&cache.get_frame("hero").unwrap(), &walk1));

        cache.aliases.insert("chain", "hero");
        assert!(cache.get_frame("chain").is_none());
    }

    #[test]
    fn test_alias_to_missing_target_is_skipped() {
        let b = batch(
            r#"{
                "frames": {"a": {"textureRect": {"x": 0, "y": 0, "w": 4, "h": 4}}},
                "metadata": {"textureFileName": "hero.png", "aliases": {"good": "a", "bad": "zzz"}}
            }"#,
        );
        let mut cache = cache_with(MemoryDescriptorSource::new());
        let summary = cache.load_batch("S", &b, None).unwrap();
        assert_eq!(summary.aliases, 1);
        assert!(cache.get_frame("good").is_some());
        assert!(cache.get_frame("bad").is_none());
    }

    #[test]
    fn test_alias_must_not_shadow_frame() {
        let t = tex(64, 64);
        let mut cache = hero_cache();
        cache.add_frame(frame(&t, 0.0), "hero");
        let summary = cache.load_from_source("S1", None).unwrap();
        assert_eq!(summary.aliases, 0);
        assert!(cache.get_frame("hero").unwrap().uses_texture(&t));
    }

    #[test]
    fn test_remove_by_name_is_silent() {
        let mut cache = hero_cache();
        cache.load_from_source("S1", None).unwrap();
        assert!(cache.remove_by_name("walk1"));
        assert!(!cache.remove_by_name("walk1"));
        assert!(!cache.remove_by_name("never"));
        assert!(cache.is_source_loaded("S1"));
        // The source still removes what is left of it.
        assert_eq!(cache.remove_by_source("S1"), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_remove_by_source_is_exact() {
        let other = batch(
            r#"{
                "frames": {"sword": {"textureRect": {"x": 0, "y": 0, "w": 16, "h": 16}}},
                "metadata": {"textureFileName": "items.png"}
            }"#,
        );
        let mut cache =
            cache_with(MemoryDescriptorSource::new().with("S1", hero_batch()).with("S2", other));
        cache.load_from_source("S1", None).unwrap();
        cache.load_from_source("S2", None).unwrap();

        assert_eq!(cache.remove_by_source("S1"), 2);
        assert_eq!(cache.names(), vec!["sword"]);
        assert_eq!(cache.alias_count(), 0);
        assert!(!cache.is_source_loaded("S1"));
        assert_eq!(cache.remove_by_source("S1"), 0);

        let again = cache.load_from_source("S1", None).unwrap();
        assert!(!again.already_loaded);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_remove_by_source_removes_overwritten_names() {
        let mut cache = hero_cache();
        cache.load_from_source("S1", None).unwrap();
        let t = tex(64, 64);
        cache.add_frame(frame(&t, 0.0), "walk2");
        assert_eq!(cache.remove_by_source("S1"), 2);
        assert!(cache.is_empty());
        assert!(cache.get_frame("hero").is_none());
    }

    #[test]
    fn test_remove_batch_without_loading() {
        let mut cache = hero_cache();
        let t = tex(64, 64);
        cache.add_frame(frame(&t, 0.0), "walk1");
        cache.add_frame(frame(&t, 8.0), "other");
        assert_eq!(cache.remove_batch(&hero_batch()), 1);
        assert_eq!(cache.names(), vec!["other"]);
        assert_eq!(cache.remove_batch(&hero_batch()), 0);
    }

    #[test]
    fn test_remove_batch_drops_aliases_and_retracts_source() {
        let mut cache = hero_cache();
        cache.load_from_source("S1", None).unwrap();
        assert_eq!(cache.remove_batch(&hero_batch()), 2);
        assert!(cache.is_empty());
        assert_eq!(cache.alias_count(), 0);
        assert!(!cache.is_source_loaded("S1"));
    }

    #[test]
    fn test_remove_by_descriptor() {
        let mut cache = hero_cache();
        cache.load_from_source("S1", None).unwrap();
        cache.remove_by_name("walk1");
        assert_eq!(cache.remove_by_descriptor("S1").unwrap(), 1);
        assert!(cache.is_empty());
        assert!(!cache.is_source_loaded("S1"));
        assert!(matches!(
            cache.remove_by_descriptor("nope"),
            Err(FrameCacheError::SourceUnavailable { .. })
        ));
    }

    #[test]
    fn test_malformed_record_skipped_during_load() {
        let b = batch(
            r#"{
                "frames": {
                    "ok": {"textureRect": {"x": 0, "y": 0, "w": 8, "h": 8}},
                    "broken": {"textureRect": {"x": 0, "y": 0, "w": 8}}
                },
                "metadata": {"textureFileName": "hero.png"}
            }"#,
        );
        let mut cache = cache_with(MemoryDescriptorSource::new().with("S", b));
        let summary = cache.load_from_source("S", None).unwrap();
        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(cache.names(), vec!["ok"]);
    }

    #[test]
    fn test_remove_unused_keeps_sources_emptied_by_name() {
        let mut cache = hero_cache();
        cache.load_from_source("S1", None).unwrap();
        cache.remove_by_name("walk1");
        cache.remove_by_name("walk2");
        let t = tex(64, 64);
        cache.add_frame(frame(&t, 0.0), "manual");
        assert_eq!(cache.remove_unused(), 1);
        assert!(cache.is_source_loaded("S1"));
        assert!(cache.load_from_source("S1", None).unwrap().already_loaded);
    }

    #[test]
    fn test_remove_by_texture() {
        let mut cache = hero_cache();
        cache.load_from_source("S1", None).unwrap();
        let t = tex(64, 64);
        cache.add_frame(frame(&t, 0.0), "manual");
        let hero_tex = cache.get_frame("walk1").unwrap().texture().clone();

        assert_eq!(cache.frames_for_texture(&hero_tex), vec!["walk1", "walk2"]);
        assert_eq!(cache.remove_by_texture(&hero_tex), 2);
        assert_eq!(cache.names(), vec!["manual"]);
        assert!(cache.textures().get("hero.png").is_none());
        // Every frame of S1 is gone, so it can be loaded again.
        assert!(!cache.is_source_loaded("S1"));
        assert_eq!(cache.get_frame("hero"), None);
    }

    #[test]
    fn test_remove_unused_respects_holders() {
        let mut cache = hero_cache();
        let t = tex(64, 64);
        cache.add_frame(frame(&t, 0.0), "x");
        cache.add_frame(frame(&t, 8.0), "y");
        let held = cache.get_frame("x").unwrap();

        assert_eq!(cache.remove_unused(), 1);
        assert!(cache.contains("x"));
        assert!(!cache.contains("y"));

        drop(held);
        assert_eq!(cache.remove_unused(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_remove_unused_retracts_emptied_sources() {
        let mut cache = hero_cache();
        cache.load_from_source("S1", None).unwrap();
        let held = cache.get_frame("walk1").unwrap();
        cache.remove_unused();
        assert!(cache.is_source_loaded("S1"));
        drop(held);
        cache.remove_unused();
        assert!(!cache.is_source_loaded("S1"));
        assert!(!cache.load_from_source("S1", None).unwrap().already_loaded);
    }

    #[test]
    fn test_remove_all() {
        let mut cache = hero_cache();
        cache.load_from_source("S1", None).unwrap();
        cache.remove_all();
        assert!(cache.is_empty());
        assert_eq!(cache.alias_count(), 0);
        assert!(!cache.is_source_loaded("S1"));
        assert!(cache.textures().is_empty());
        assert_eq!(cache.load_from_source("S1", None).unwrap().inserted, 2);
    }
}
