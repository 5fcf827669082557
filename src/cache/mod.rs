//! LRU cache of uploaded GPU geometry.
//!
//! Maps a geometry-generation request to previously uploaded buffers so
//! repeated frames with unchanged inputs skip both the CPU build and the
//! GPU upload. Keys are structured and hashed directly rather than
//! string-concatenated. Eviction releases the underlying GPU resources
//! before removing the entry; a live handle is never leaked.
//!
//! The cache assumes single-threaded use on the thread owning the
//! graphics context and performs no internal locking.

use rustc_hash::FxHashMap;
use web_time::{Duration, Instant};

use crate::lod::QualityLevel;
use crate::options::{ColorMode, RenderStyle};
use crate::structure::StructureSnapshot;

/// Default age window after which unused entries are evicted.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(30);

/// Deterministic fingerprint of one geometry-generation request.
///
/// Atom identity is summarized by count plus first/last serial; the
/// fingerprint must be unique enough in practice — a collision across
/// genuinely different inputs is a design invariant violation, not a
/// runtime-handled case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryKey {
    /// Rendering representation.
    pub style: RenderStyle,
    /// Active color mode.
    pub color_mode: ColorMode,
    /// Selected quality level.
    pub level: QualityLevel,
    /// Number of atoms in the request.
    pub atom_count: usize,
    /// Serial id of the first atom.
    pub first_serial: u32,
    /// Serial id of the last atom.
    pub last_serial: u32,
}

impl GeometryKey {
    /// Fingerprint a snapshot under the given style/mode/level.
    #[must_use]
    pub fn for_snapshot(
        snapshot: &StructureSnapshot,
        style: RenderStyle,
        color_mode: ColorMode,
        level: QualityLevel,
    ) -> Self {
        let atoms = snapshot.atoms();
        Self {
            style,
            color_mode,
            level,
            atom_count: atoms.len(),
            first_serial: atoms.first().map_or(0, |a| a.serial),
            last_serial: atoms.last().map_or(0, |a| a.serial),
        }
    }
}

/// A cached resource that owns GPU buffers which must be explicitly
/// released before the handle is dropped from the cache.
pub trait BufferRelease {
    /// Release the underlying GPU resources. Called exactly once per
    /// entry, immediately before removal.
    fn release(&mut self);
}

struct CacheEntry<B> {
    buffers: B,
    last_used: Instant,
}

/// LRU-by-age cache of uploaded geometry, keyed by [`GeometryKey`].
pub struct BufferCache<B: BufferRelease> {
    entries: FxHashMap<GeometryKey, CacheEntry<B>>,
    max_age: Duration,
}

impl<B: BufferRelease> Default for BufferCache<B> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_AGE)
    }
}

impl<B: BufferRelease> BufferCache<B> {
    /// Cache evicting entries unused for longer than `max_age`.
    #[must_use]
    pub fn new(max_age: Duration) -> Self {
        Self {
            entries: FxHashMap::default(),
            max_age,
        }
    }

    /// Look up a cached handle, refreshing its last-used timestamp on a
    /// hit.
    pub fn get(&mut self, key: &GeometryKey) -> Option<&B> {
        self.entries.get_mut(key).map(|entry| {
            entry.last_used = Instant::now();
            &entry.buffers
        })
    }

    /// Store a handle. If the key is already present, the old handle's
    /// resources are released first.
    pub fn put(&mut self, key: GeometryKey, buffers: B) {
        if let Some(mut old) = self.entries.insert(
            key,
            CacheEntry {
                buffers,
                last_used: Instant::now(),
            },
        ) {
            log::debug!("cache: replacing entry {key:?}");
            old.buffers.release();
        }
    }

    /// Evict entries unused for longer than the age window, releasing
    /// their GPU resources exactly once each.
    pub fn cleanup(&mut self) {
        let max_age = self.max_age;
        let before = self.entries.len();
        self.entries.retain(|key, entry| {
            if entry.last_used.elapsed() > max_age {
                log::debug!("cache: evicting stale entry {key:?}");
                entry.buffers.release();
                false
            } else {
                true
            }
        });
        let evicted = before - self.entries.len();
        if evicted > 0 {
            log::debug!("cache: evicted {evicted} stale entries");
        }
    }

    /// Evict everything. Called on context loss or renderer teardown.
    pub fn clear_all(&mut self) {
        for (_, mut entry) in self.entries.drain() {
            entry.buffers.release();
        }
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<B: BufferRelease> Drop for BufferCache<B> {
    fn drop(&mut self) {
        self.clear_all();
    }
}
