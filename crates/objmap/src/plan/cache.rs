// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Concurrent cache of compiled plans.
//!
//! Plans are keyed by `(source, destination)` and tagged with the
//! configuration generation they were compiled under. Lookups are lock-free
//! reads on a dashmap; a generation change empties the cache on the next
//! access, and a plan compiled under an older generation is never stored.

use super::MappingPlan;
use crate::types::TypeName;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Cache hit/miss statistics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Plan cache keyed by type pair.
#[derive(Debug, Default)]
pub struct PlanCache {
    plans: DashMap<(TypeName, TypeName), Arc<MappingPlan>>,
    generation: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl PlanCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached plan for the pair, valid under `generation`.
    pub fn get(
        &self,
        source: &TypeName,
        dest: &TypeName,
        generation: u64,
    ) -> Option<Arc<MappingPlan>> {
        self.sync(generation);
        let hit = self
            .plans
            .get(&(source.clone(), dest.clone()))
            .map(|entry| Arc::clone(entry.value()))
            .filter(|plan| plan.generation() == generation);

        match hit {
            Some(plan) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(plan)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a plan compiled under `current`. Returns false (and stores
    /// nothing) when the plan predates the current generation.
    pub fn publish(&self, plan: &Arc<MappingPlan>, current: u64) -> bool {
        if plan.generation() != current {
            log::debug!(
                "[plan] {} -> {} compiled under gen {}, now {}: not cached",
                plan.source(),
                plan.dest(),
                plan.generation(),
                current
            );
            return false;
        }
        self.sync(current);
        self.plans.insert(
            (plan.source().clone(), plan.dest().clone()),
            Arc::clone(plan),
        );
        true
    }

    /// Drop every plan.
    pub fn clear(&self) {
        self.plans.clear();
    }

    /// Number of cached plans.
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    /// True when no plan is cached.
    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.plans.len(),
        }
    }

    fn sync(&self, generation: u64) {
        let seen = self.generation.fetch_max(generation, Ordering::AcqRel);
        if seen < generation {
            self.plans.clear();
            log::trace!("[plan] cache invalidated (gen {} -> {})", seen, generation);
        }
    }
}
