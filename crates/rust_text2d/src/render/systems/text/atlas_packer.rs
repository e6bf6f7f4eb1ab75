//! Shelf packer for the glyph atlas
//!
//! Glyph bitmaps are placed left to right along the current row. When a
//! bitmap does not fit in the remaining width the cursor wraps to the start
//! of a new row below the tallest bitmap of the previous one. Space is never
//! reclaimed: once a request fails for lack of height the packer stays full
//! for every later request with a non-zero area.

use crate::foundation::math::Vec2;

/// Pixel rectangle reserved in the atlas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasPlacement {
    /// Left edge in texels
    pub x: u32,
    /// Top edge in texels
    pub y: u32,
    /// Width in texels
    pub width: u32,
    /// Height in texels
    pub height: u32,
}

impl AtlasPlacement {
    /// Whether the placement covers no texels
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Normalized origin and size of this placement for an atlas of the given dimensions
    pub fn uv_rect(&self, atlas_width: u32, atlas_height: u32) -> (Vec2, Vec2) {
        let (w, h) = (atlas_width as f32, atlas_height as f32);
        (
            Vec2::new(self.x as f32 / w, self.y as f32 / h),
            Vec2::new(self.width as f32 / w, self.height as f32 / h),
        )
    }
}

/// Row-based (shelf) allocator over a fixed-size 2D region
#[derive(Debug, Clone)]
pub struct AtlasPacker {
    width: u32,
    height: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    full: bool,
}

impl AtlasPacker {
    /// Create an empty packer for a `width` x `height` region
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cursor_x: 0,
            cursor_y: 0,
            row_height: 0,
            full: false,
        }
    }

    /// Reserve a `width` x `height` rectangle
    ///
    /// Returns `None` when the atlas is full. A request larger than the whole
    /// atlas also returns `None` but leaves the packer untouched. Zero-area
    /// requests always succeed at the current cursor without consuming space.
    pub fn reserve(&mut self, width: u32, height: u32) -> Option<AtlasPlacement> {
        if width == 0 || height == 0 {
            return Some(AtlasPlacement {
                x: self.cursor_x.min(self.width),
                y: self.cursor_y.min(self.height),
                width,
                height,
            });
        }

        if self.full {
            return None;
        }

        if width > self.width || height > self.height {
            log::debug!(
                "Glyph bitmap {}x{} can never fit in a {}x{} atlas",
                width, height, self.width, self.height
            );
            return None;
        }

        if self.cursor_x + width > self.width {
            self.cursor_x = 0;
            self.cursor_y += self.row_height;
            self.row_height = 0;
        }

        if self.cursor_y + height > self.height {
            self.full = true;
            return None;
        }

        let placement = AtlasPlacement {
            x: self.cursor_x,
            y: self.cursor_y,
            width,
            height,
        };

        self.cursor_x += width;
        self.row_height = self.row_height.max(height);

        Some(placement)
    }

    /// Current packing cursor `(x, y)`
    pub fn cursor(&self) -> (u32, u32) {
        (self.cursor_x, self.cursor_y)
    }

    /// Height of the tallest placement in the current row
    pub fn row_height(&self) -> u32 {
        self.row_height
    }

    /// Whether a request has failed for lack of space
    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Atlas dimensions `(width, height)`
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Rows consumed so far, including the current one
    pub fn used_height(&self) -> u32 {
        (self.cursor_y + self.row_height).min(self.height)
    }
}
