//! Render-budget admission control.
//!
//! Observation counts are unbounded, so without a cap the number of emitted
//! primitives would scale linearly with history depth. The admission
//! controller is the pipeline's only backpressure mechanism: a per-category
//! emission limit, enforced between two `reset` calls, with an allow-list
//! for entities the user has explicitly focused.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

/// Category of an emitted render primitive.
///
/// Which categories exist is fixed here; what their budget is comes from an
/// externally supplied limit table ([`AdmissionController::new`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderCategory {
    /// One frame per observation in a point's time stack.
    TimeStack,
    /// One marker per monitoring point.
    PointMarker,
}

struct CategoryBudget {
    limit: usize,
    count: AtomicUsize,
}

/// Per-category emission caps with an allow-list bypass.
///
/// Counters are atomic: if point processing is ever parallelized, the
/// counters are the only shared state that needs synchronization. Exceeding
/// a limit is a normal, silent outcome; nothing here errors.
pub struct AdmissionController {
    categories: BTreeMap<RenderCategory, CategoryBudget>,
    allow_list: BTreeSet<String>,
}

impl AdmissionController {
    /// Build a controller from an externally supplied limit table.
    pub fn new(limits: impl IntoIterator<Item = (RenderCategory, usize)>) -> Self {
        let categories = limits
            .into_iter()
            .map(|(category, limit)| {
                (category, CategoryBudget { limit, count: AtomicUsize::new(0) })
            })
            .collect();
        Self { categories, allow_list: BTreeSet::new() }
    }

    /// Whether the category's budget is exhausted for this entity.
    ///
    /// Allow-listed entities always pass. Does not count anything; callers
    /// that go on to emit must call [`AdmissionController::increment`].
    /// A category missing from the limit table is treated as exhausted.
    pub fn is_limit_reached(&self, category: RenderCategory, entity_id: &str) -> bool {
        if self.allow_list.contains(entity_id) {
            return false;
        }
        match self.categories.get(&category) {
            Some(budget) => budget.count.load(Ordering::Relaxed) >= budget.limit,
            None => true,
        }
    }

    /// Count one emission. Saturates at the limit; never an error.
    pub fn increment(&self, category: RenderCategory) {
        if let Some(budget) = self.categories.get(&category) {
            let _ = budget.count.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |count| {
                if count < budget.limit {
                    Some(count + 1)
                } else {
                    None
                }
            });
        }
    }

    /// Current count for a category.
    pub fn count(&self, category: RenderCategory) -> usize {
        self.categories
            .get(&category)
            .map_or(0, |budget| budget.count.load(Ordering::Relaxed))
    }

    /// Zero all counts. Called exactly once at the start of each pass.
    /// Allow-list entries persist until explicitly cleared.
    pub fn reset(&self) {
        for budget in self.categories.values() {
            budget.count.store(0, Ordering::Relaxed);
        }
    }

    /// Let an entity bypass the caps (user explicitly focused it).
    pub fn add_to_allow_list(&mut self, entity_id: impl Into<String>) {
        self.allow_list.insert(entity_id.into());
    }

    pub fn clear_allow_list(&mut self) {
        self.allow_list.clear();
    }
}

impl std::fmt::Debug for AdmissionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (category, budget) in &self.categories {
            map.entry(
                category,
                &format!("{}/{}", budget.count.load(Ordering::Relaxed), budget.limit),
            );
        }
        map.finish()
    }
}
