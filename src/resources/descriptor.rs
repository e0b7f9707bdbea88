//! Frame descriptor batches and where they come from.
//!
//! A descriptor names many frames packed into one atlas image. It is stored
//! as JSON and decoded into a [`DescriptorBatch`]:
//!
//! ```json
//! {
//!   "frames": {
//!     "walk1": { "textureRect": {"x": 0, "y": 0, "w": 32, "h": 32},
//!                "spriteOffset": {"x": 0, "y": 0},
//!                "spriteSourceSize": {"w": 32, "h": 32},
//!                "textureRotated": false,
//!                "aliases": ["hero"] }
//!   },
//!   "metadata": { "format": 3, "textureFileName": "hero.png",
//!                 "aliases": { "idle": "walk1" } }
//! }
//! ```
//!
//! Three record layouts exist, selected by `metadata.format`:
//! - `0`: flat `x`, `y`, `width`, `height`, `offsetX`, `offsetY`,
//!   `originalWidth`, `originalHeight`
//! - `1`, `2`: `frame`, `offset`, `rotated`, `sourceSize`
//! - `3` (default): `textureRect`, `spriteOffset`, `spriteSourceSize`,
//!   `textureRotated`, `spriteTrimmed`, `aliases`
//!
//! Batches are obtained through a [`DescriptorSource`]; the cache only sees
//! the trait so the storage backend stays replaceable.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::resources::error::FrameCacheError;
use crate::resources::spriteframe::{FrameGeometry, Offset, Rect, Size};

/// Format assumed when a descriptor does not declare one.
pub const DEFAULT_FORMAT: u32 = 3;
/// Highest format version understood.
pub const MAX_FORMAT: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct RawRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct RawPoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct RawSize {
    pub w: f32,
    pub h: f32,
}

/// One frame record, in whichever layout the descriptor uses.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawFrame {
    #[serde(rename_all = "camelCase")]
    Packed {
        texture_rect: RawRect,
        #[serde(default)]
        sprite_offset: Option<RawPoint>,
        #[serde(default)]
        sprite_source_size: Option<RawSize>,
        #[serde(default)]
        texture_rotated: bool,
        #[serde(default)]
        sprite_trimmed: Option<bool>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        aliases: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    Classic {
        frame: RawRect,
        #[serde(default)]
        offset: Option<RawPoint>,
        #[serde(default)]
        rotated: bool,
        #[serde(default)]
        source_size: Option<RawSize>,
    },
    #[serde(rename_all = "camelCase")]
    Flat {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        #[serde(default)]
        offset_x: f32,
        #[serde(default)]
        offset_y: f32,
        #[serde(default)]
        original_width: Option<f32>,
        #[serde(default)]
        original_height: Option<f32>,
    },
}

impl RawFrame {
    /// Whether this record's layout belongs to descriptor format `format`.
    pub fn matches_format(&self, format: u32) -> bool {
        match self {
            RawFrame::Flat { .. } => format == 0,
            RawFrame::Classic { .. } => format == 1 || format == 2,
            RawFrame::Packed { .. } => format == 3,
        }
    }

    /// Per-frame alias names (only the packed layout carries them).
    pub fn aliases(&self) -> &[String] {
        match self {
            RawFrame::Packed { aliases, .. } => aliases,
            _ => &[],
        }
    }

    /// Convert the raw fields into frame geometry.
    pub fn to_geometry(&self) -> FrameGeometry {
        match *self {
            RawFrame::Flat {
                x,
                y,
                width,
                height,
                offset_x,
                offset_y,
                original_width,
                original_height,
            } => {
                let rect = Rect::new(x, y, width, height);
                let original = Size::new(
                    original_width.unwrap_or(width),
                    original_height.unwrap_or(height),
                );
                build_geometry(rect, false, None, Offset::new(offset_x, offset_y), original)
            }
            RawFrame::Classic {
                frame,
                offset,
                rotated,
                source_size,
            } => {
                let rect = rect_from(frame);
                let original = source_size.map_or(rect.size(), size_from);
                let offset = offset.map_or_else(Offset::default, offset_from);
                build_geometry(rect, rotated, None, offset, original)
            }
            RawFrame::Packed {
                texture_rect,
                sprite_offset,
                sprite_source_size,
                texture_rotated,
                sprite_trimmed,
                ..
            } => {
                let rect = rect_from(texture_rect);
                let original = sprite_source_size.map_or(rect.size(), size_from);
                build_geometry(
                    rect,
                    texture_rotated,
                    sprite_trimmed,
                    sprite_offset.map_or_else(Offset::default, offset_from),
                    original,
                )
            }
        }
    }
}

fn rect_from(r: RawRect) -> Rect {
    Rect::new(r.x, r.y, r.w, r.h)
}

fn size_from(s: RawSize) -> Size {
    Size::new(s.w, s.h)
}

fn offset_from(p: RawPoint) -> Offset {
    Offset::new(p.x, p.y)
}

fn build_geometry(
    rect: Rect,
    rotated: bool,
    trimmed: Option<bool>,
    offset: Offset,
    original: Size,
) -> FrameGeometry {
    let original_size = original.to_pixels();
    let trimmed = trimmed.unwrap_or(original_size != rect.size() || !offset.is_zero());
    FrameGeometry {
        rect,
        rotated,
        trimmed,
        offset,
        original_size,
    }
}

/// Top-level descriptor metadata.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default)]
    pub format: Option<u32>,
    /// Image file, relative to the descriptor.
    #[serde(default)]
    pub texture_file_name: Option<String>,
    /// Alias name -> canonical frame name.
    #[serde(default)]
    pub aliases: FxHashMap<String, String>,
}

/// Decoded descriptor: named frame records plus metadata.
///
/// Records are kept as raw JSON values and decoded one at a time, so a single
/// malformed record does not reject the whole descriptor.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct DescriptorBatch {
    #[serde(default)]
    pub frames: FxHashMap<String, serde_json::Value>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl DescriptorBatch {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn format(&self) -> u32 {
        self.metadata.format.unwrap_or(DEFAULT_FORMAT)
    }

    /// Add or replace the record for `name`.
    pub fn insert_frame(&mut self, name: impl Into<String>, raw: &RawFrame) {
        let value = serde_json::to_value(raw).unwrap_or(serde_json::Value::Null);
        self.frames.insert(name.into(), value);
    }

    /// Decode the record stored under `name`.
    pub fn frame(&self, name: &str) -> Option<Result<RawFrame, serde_json::Error>> {
        self.frames.get(name).map(RawFrame::deserialize)
    }

    /// Every record decoded on its own, sorted by name.
    pub fn records(&self) -> Vec<(&str, Result<RawFrame, serde_json::Error>)> {
        let mut out: Vec<(&str, Result<RawFrame, serde_json::Error>)> = self
            .frames
            .iter()
            .map(|(name, value)| (name.as_str(), RawFrame::deserialize(value)))
            .collect();
        out.sort_by(|a, b| a.0.cmp(b.0));
        out
    }

    /// Every alias declared by the batch, top-level and per frame, as
    /// `(alias, target)` pairs sorted by alias.
    pub fn declared_aliases(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = self
            .metadata
            .aliases
            .iter()
            .map(|(a, t)| (a.clone(), t.clone()))
            .collect();
        for (name, raw) in self.records() {
            let Ok(raw) = raw else {
                continue;
            };
            out.extend(raw.aliases().iter().map(|a| (a.clone(), name.to_string())));
        }
        out.sort();
        out
    }
}

/// Supplies descriptor batches by source id.
pub trait DescriptorSource: Send + Sync {
    fn fetch(&self, source_id: &str) -> Result<DescriptorBatch, FrameCacheError>;

    /// Path of a texture file named inside the descriptor `source_id`.
    fn texture_path(&self, _source_id: &str, file_name: &str) -> PathBuf {
        PathBuf::from(file_name)
    }

    /// Texture path derived from the descriptor's own name, e.g.
    /// `hero.json` -> `hero.png`.
    fn derived_texture_path(&self, source_id: &str, extension: &str) -> PathBuf {
        Path::new(source_id).with_extension(extension)
    }
}

/// Reads JSON descriptors from disk; source ids are paths relative to `root`.
#[derive(Debug, Clone)]
pub struct JsonDescriptorSource {
    pub root: PathBuf,
}

impl JsonDescriptorSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        JsonDescriptorSource { root: root.into() }
    }

    fn full_path(&self, source_id: &str) -> PathBuf {
        self.root.join(source_id)
    }
}

impl DescriptorSource for JsonDescriptorSource {
    fn fetch(&self, source_id: &str) -> Result<DescriptorBatch, FrameCacheError> {
        let path = self.full_path(source_id);
        let text = std::fs::read_to_string(&path)
            .map_err(|e| FrameCacheError::source_unavailable(source_id, e))?;
        DescriptorBatch::from_json(&text)
            .map_err(|e| FrameCacheError::source_unavailable(source_id, e))
    }

    fn texture_path(&self, source_id: &str, file_name: &str) -> PathBuf {
        let path = self.full_path(source_id);
        match path.parent() {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }

    fn derived_texture_path(&self, source_id: &str, extension: &str) -> PathBuf {
        self.full_path(source_id).with_extension(extension)
    }
}

/// In-memory batches, for pre-parsed descriptors and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryDescriptorSource {
    batches: FxHashMap<String, DescriptorBatch>,
}

impl MemoryDescriptorSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to register a batch under `source_id`.
    pub fn with(mut self, source_id: impl Into<String>, batch: DescriptorBatch) -> Self {
        self.insert(source_id, batch);
        self
    }

    pub fn insert(&mut self, source_id: impl Into<String>, batch: DescriptorBatch) {
        self.batches.insert(source_id.into(), batch);
    }
}

impl DescriptorSource for MemoryDescriptorSource {
    fn fetch(&self, source_id: &str) -> Result<DescriptorBatch, FrameCacheError> {
        self.batches
            .get(source_id)
            .cloned()
            .ok_or_else(|| FrameCacheError::source_unavailable(source_id, "no such descriptor"))
    }
}
