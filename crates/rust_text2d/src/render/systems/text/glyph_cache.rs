//! Glyph cache keyed by codepoint
//!
//! Records are append-only: once a codepoint is cached its record is never
//! replaced or evicted. Lookups hand out copies, so growing the backing
//! storage cannot change a record a caller already holds.

use std::collections::HashMap;

use crate::foundation::math::Vec2;

/// Cached placement and metrics of one glyph in the atlas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphInfo {
    /// Cache key
    pub codepoint: u32,

    /// Top-left corner of the glyph in the atlas (normalized 0.0-1.0)
    pub uv_origin: Vec2,
    /// Extent of the glyph in the atlas (normalized 0.0-1.0)
    pub uv_size: Vec2,

    /// Bitmap size in pixels
    pub size: Vec2,

    /// Offset from the pen position to the bitmap's top-left corner
    /// (x to the right, y up from the baseline)
    pub bearing: Vec2,

    /// Horizontal advance for cursor positioning
    pub advance: f32,
}

impl GlyphInfo {
    /// Bottom-right corner of the glyph in the atlas (normalized)
    pub fn uv_max(&self) -> Vec2 {
        self.uv_origin + self.uv_size
    }
}

/// Append-only store of [`GlyphInfo`] records
///
/// Storage is reserved in doubling steps starting from the initial capacity.
#[derive(Debug, Clone)]
pub struct GlyphCache {
    entries: Vec<GlyphInfo>,
    index: HashMap<u32, usize>,
    capacity: usize,
    initial_capacity: usize,
}

impl GlyphCache {
    /// Create an empty cache; nothing is allocated until the first insert
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            capacity: 0,
            initial_capacity: initial_capacity.max(1),
        }
    }

    /// Look up the record for `codepoint`
    pub fn get(&self, codepoint: u32) -> Option<GlyphInfo> {
        self.index.get(&codepoint).map(|&slot| self.entries[slot])
    }

    /// Whether `codepoint` has a record
    pub fn contains(&self, codepoint: u32) -> bool {
        self.index.contains_key(&codepoint)
    }

    /// Store a new record
    ///
    /// If the codepoint is already cached the existing record wins and is returned.
    pub fn insert(&mut self, info: GlyphInfo) -> GlyphInfo {
        if let Some(existing) = self.get(info.codepoint) {
            return existing;
        }

        if self.entries.len() == self.capacity {
            self.grow();
        }

        self.index.insert(info.codepoint, self.entries.len());
        self.entries.push(info);
        info
    }

    fn grow(&mut self) {
        let new_capacity = if self.capacity == 0 {
            self.initial_capacity
        } else {
            self.capacity * 2
        };

        self.entries.reserve_exact(new_capacity - self.entries.len());
        self.index.reserve(new_capacity - self.index.len());
        self.capacity = new_capacity;

        log::trace!("Glyph cache grown to {} entries", new_capacity);
    }

    /// Number of cached glyphs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no glyph has been cached yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of records that fit before the next growth step
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate cached records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &GlyphInfo> {
        self.entries.iter()
    }

    /// Drop every record and release the backing storage
    pub fn clear(&mut self) {
        self.entries = Vec::new();
        self.index = HashMap::new();
        self.capacity = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn info(codepoint: u32, advance: f32) -> GlyphInfo {
        GlyphInfo {
            codepoint,
            uv_origin: Vec2::new(0.0, 0.0),
            uv_size: Vec2::new(0.1, 0.1),
            size: Vec2::new(16.0, 24.0),
            bearing: Vec2::new(1.0, 20.0),
            advance,
        }
    }

    #[test]
    fn test_lookup_after_insert() {
        let mut cache = GlyphCache::new(4);
        assert!(cache.is_empty());
        cache.insert(info(65, 10.0));

        assert!(cache.contains(65));
        assert_eq!(cache.get(65).unwrap().advance, 10.0);
        assert_eq!(cache.get(66), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_first_insert_wins() {
        let mut cache = GlyphCache::new(4);
        cache.insert(info(65, 10.0));
        let kept = cache.insert(info(65, 99.0));

        assert_eq!(kept.advance, 10.0);
        assert_eq!(cache.get(65).unwrap().advance, 10.0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_capacity_doubles_from_initial() {
        let mut cache = GlyphCache::new(128);
        assert_eq!(cache.capacity(), 0);

        cache.insert(info(0, 1.0));
        assert_eq!(cache.capacity(), 128);

        for cp in 1..128 {
            cache.insert(info(cp, 1.0));
        }
        assert_eq!(cache.capacity(), 128);

        cache.insert(info(128, 1.0));
        assert_eq!(cache.capacity(), 256);

        for cp in 129..600 {
            cache.insert(info(cp, 1.0));
        }
        assert_eq!(cache.capacity(), 1024);
    }

    #[test]
    fn test_records_survive_growth() {
        let mut cache = GlyphCache::new(2);
        let first = cache.insert(info(7, 3.5));
        for cp in 100..200 {
            cache.insert(info(cp, cp as f32));
        }
        assert_eq!(cache.get(7), Some(first));
        assert_eq!(cache.get(150).unwrap().advance, 150.0);
    }

    #[test]
    fn test_uv_max() {
        let glyph = GlyphInfo { uv_origin: Vec2::new(0.25, 0.5), ..info(1, 1.0) };
        let uv_max = glyph.uv_max();
        assert_relative_eq!(uv_max.x, 0.35);
        assert_relative_eq!(uv_max.y, 0.6);
    }
}
