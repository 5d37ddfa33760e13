//! Thumbnail cache for the popover grid.
//!
//! Keeps rendered RGBA8 previews keyed by file path under an LRU policy, so
//! reloading a directory never re-renders a file it has already seen.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Rendered RGBA8 thumbnail.
#[derive(Clone, Debug, PartialEq)]
pub struct Thumbnail {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Thumbnail {
    /// Creates a thumbnail from raw RGBA8 pixel data.
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }
}

/// LRU cache of thumbnails keyed by path.
pub struct ThumbnailCache {
    cache: LruCache<PathBuf, Thumbnail>,
}

impl ThumbnailCache {
    /// Creates a new cache with the specified capacity (at least one entry).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
        }
    }

    /// Retrieves a thumbnail without touching the LRU order.
    pub fn get(&self, path: &Path) -> Option<&Thumbnail> {
        self.cache.peek(path)
    }

    /// Stores a thumbnail unless one is already cached for the path.
    ///
    /// Returns true when the entry was inserted.
    pub fn insert(&mut self, path: PathBuf, thumbnail: Thumbnail) -> bool {
        if self.cache.contains(&path) {
            log::debug!("Thumbnail already cached: {}", path.display());
            return false;
        }
        log::debug!(
            "Thumbnail PUT: {} ({}x{})",
            path.display(),
            thumbnail.width,
            thumbnail.height
        );
        self.cache.put(path, thumbnail);
        true
    }

    /// Marks the paths as recently used so the current grid survives eviction.
    pub fn touch<'a>(&mut self, paths: impl IntoIterator<Item = &'a Path>) {
        for path in paths {
            self.cache.promote(path);
        }
    }

    /// Checks if a thumbnail is cached for the path.
    pub fn contains(&self, path: &Path) -> bool {
        self.cache.contains(path)
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thumb(width: u32) -> Thumbnail {
        Thumbnail::new(vec![0; (width * 4) as usize], width, 1)
    }

    #[test]
    fn insert_keeps_first_entry_for_a_path() {
        let mut cache = ThumbnailCache::new(4);
        assert!(cache.insert(PathBuf::from("/a.png"), thumb(1)));
        assert!(!cache.insert(PathBuf::from("/a.png"), thumb(2)));
        assert_eq!(cache.get(Path::new("/a.png")).map(|t| t.width), Some(1));
    }

    #[test]
    fn capacity_evicts_least_recently_used() {
        let mut cache = ThumbnailCache::new(2);
        cache.insert(PathBuf::from("/a.png"), thumb(1));
        cache.insert(PathBuf::from("/b.png"), thumb(1));
        cache.touch([Path::new("/a.png")]);
        cache.insert(PathBuf::from("/c.png"), thumb(1));

        assert!(cache.contains(Path::new("/a.png")));
        assert!(!cache.contains(Path::new("/b.png")));
        assert!(cache.contains(Path::new("/c.png")));
    }

    #[test]
    fn clear_empties_cache() {
        let mut cache = ThumbnailCache::new(0);
        cache.insert(PathBuf::from("/a.png"), thumb(1));
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
