//! Derived-position cache for per-point geometry.
//!
//! Projecting a point's geodetic anchor into scene coordinates happens once
//! per point, not once per frame. The cache is an explicit object owned by
//! the pass engine and cleared at every pass start, so stale entries from a
//! previous pass never leak into a new one.

use std::collections::HashMap;

use serde::Serialize;

/// A position in the renderer's local scene frame, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenePosition {
    pub east: f64,
    pub north: f64,
    pub up: f64,
}

impl ScenePosition {
    /// The position offset by a displacement vector.
    pub fn offset(&self, east: f64, north: f64, up: f64) -> ScenePosition {
        ScenePosition { east: self.east + east, north: self.north + north, up: self.up + up }
    }
}

/// Memo of projected scene positions, keyed by entity identity.
#[derive(Debug, Default)]
pub struct PositionCache {
    entries: HashMap<String, ScenePosition>,
}

impl PositionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached position for `id`, computing and storing it on the
    /// first request. The computation is pure, so recomputing after a clear
    /// is always safe.
    pub fn get_or_compute(
        &mut self,
        id: &str,
        compute: impl FnOnce() -> ScenePosition,
    ) -> ScenePosition {
        if let Some(position) = self.entries.get(id) {
            return *position;
        }
        let position = compute();
        self.entries.insert(id.to_string(), position);
        position
    }

    /// Drop every entry. Called at the start of each pass.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_once_per_key() {
        let mut cache = PositionCache::new();
        let mut calls = 0;

        for _ in 0..3 {
            let position = cache.get_or_compute("P-1", || {
                calls += 1;
                ScenePosition { east: 1.0, north: 2.0, up: 3.0 }
            });
            assert_eq!(position.east, 1.0);
        }

        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_forces_recomputation() {
        let mut cache = PositionCache::new();
        let mut calls = 0;
        let mut compute = || {
            calls += 1;
            ScenePosition { east: 0.0, north: 0.0, up: 0.0 }
        };

        cache.get_or_compute("P-1", &mut compute);
        cache.clear();
        assert!(cache.is_empty());
        cache.get_or_compute("P-1", &mut compute);

        assert_eq!(calls, 2);
    }

    #[test]
    fn keys_are_independent() {
        let mut cache = PositionCache::new();
        cache.get_or_compute("a", || ScenePosition { east: 1.0, north: 0.0, up: 0.0 });
        cache.get_or_compute("b", || ScenePosition { east: 2.0, north: 0.0, up: 0.0 });

        let a = cache.get_or_compute("a", || unreachable!());
        assert_eq!(a.east, 1.0);
        assert_eq!(cache.len(), 2);
    }
}
