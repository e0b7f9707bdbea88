//! Sprite frame data and the geometry types it is built from.
//!
//! A [`SpriteFrame`] describes one named sub-region of a packed atlas texture:
//! the rectangle inside the texture, whether it was packed rotated by 90°,
//! the trim offset, and the size of the sprite before trimming. Frames are
//! immutable once built and shared as `Arc<SpriteFrame>` between the
//! [`FrameCache`](crate::resources::framecache::FrameCache) and whatever
//! entities are drawing them.

use std::sync::Arc;

use crate::resources::atlastexture::AtlasTexture;
use crate::resources::error::FrameCacheError;

/// Rectangle in texture pixel space (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Size { width, height }
    }

    /// Round to whole pixels and drop the sign.
    pub fn to_pixels(self) -> Self {
        Size::new(self.width.round().abs(), self.height.round().abs())
    }
}

/// Trim offset of the packed rect relative to the untrimmed sprite center.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

impl Offset {
    pub fn new(x: f32, y: f32) -> Self {
        Offset { x, y }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// Raw placement data for a frame, before it is bound to a texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameGeometry {
    /// Rect in texture space, with the unrotated width/height.
    pub rect: Rect,
    /// Packed 90° clockwise; the rect then occupies `height x width` texels.
    pub rotated: bool,
    pub trimmed: bool,
    pub offset: Offset,
    pub original_size: Size,
}

impl FrameGeometry {
    /// Geometry of a frame that was neither trimmed nor rotated.
    pub fn untrimmed(rect: Rect) -> Self {
        FrameGeometry {
            rect,
            rotated: false,
            trimmed: false,
            offset: Offset::default(),
            original_size: rect.size(),
        }
    }

    /// Width/height actually covered in the texture.
    pub fn footprint(&self) -> Size {
        if self.rotated {
            Size::new(self.rect.height, self.rect.width)
        } else {
            self.rect.size()
        }
    }
}

/// A named region of an atlas texture.
///
/// Many frames usually point at the same [`AtlasTexture`]; the texture handle
/// is shared and outlives every frame referencing it.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteFrame {
    geometry: FrameGeometry,
    texture: Arc<AtlasTexture>,
}

impl SpriteFrame {
    /// Bind `geometry` to `texture`, checking that the footprint lies inside it.
    ///
    /// `name` is only used to label the error.
    pub fn new(
        name: &str,
        geometry: FrameGeometry,
        texture: Arc<AtlasTexture>,
    ) -> Result<Self, FrameCacheError> {
        let footprint = geometry.footprint();
        let rect = geometry.rect;
        let fits = rect.x >= 0.0
            && rect.y >= 0.0
            && rect.width >= 0.0
            && rect.height >= 0.0
            && rect.x + footprint.width <= texture.width as f32
            && rect.y + footprint.height <= texture.height as f32;
        if !fits {
            return Err(FrameCacheError::FrameOutOfBounds {
                name: name.to_string(),
                x: rect.x,
                y: rect.y,
                width: footprint.width,
                height: footprint.height,
                texture_width: texture.width,
                texture_height: texture.height,
            });
        }
        Ok(SpriteFrame { geometry, texture })
    }

    /// Frame covering `rect` with no trim and no rotation.
    pub fn with_rect(
        name: &str,
        rect: Rect,
        texture: Arc<AtlasTexture>,
    ) -> Result<Self, FrameCacheError> {
        Self::new(name, FrameGeometry::untrimmed(rect), texture)
    }

    pub fn rect(&self) -> Rect {
        self.geometry.rect
    }

    pub fn rotated(&self) -> bool {
        self.geometry.rotated
    }

    pub fn trimmed(&self) -> bool {
        self.geometry.trimmed
    }

    pub fn offset(&self) -> Offset {
        self.geometry.offset
    }

    pub fn original_size(&self) -> Size {
        self.geometry.original_size
    }

    pub fn geometry(&self) -> &FrameGeometry {
        &self.geometry
    }

    pub fn texture(&self) -> &Arc<AtlasTexture> {
        &self.texture
    }

    /// Identity comparison against a texture handle.
    pub fn uses_texture(&self, texture: &Arc<AtlasTexture>) -> bool {
        Arc::ptr_eq(&self.texture, texture)
    }
}

#[cfg(feature = "raylib")]
mod raylib_conv {
    use super::{Offset, Rect, Size};
    use raylib::prelude::{Rectangle, Vector2};

    impl From<Rect> for Rectangle {
        fn from(r: Rect) -> Self {
            Rectangle::new(r.x, r.y, r.width, r.height)
        }
    }

    impl From<Offset> for Vector2 {
        fn from(o: Offset) -> Self {
            Vector2::new(o.x, o.y)
        }
    }

    impl From<Size> for Vector2 {
        fn from(s: Size) -> Self {
            Vector2::new(s.width, s.height)
        }
    }
}
