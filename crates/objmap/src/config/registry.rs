// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Concurrent store of mapping configurations keyed by exact type pair.

use super::MappingConfig;
use crate::types::{TypeName, TypeRegistry};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

type PairKey = (TypeName, TypeName);

/// Registry of [`MappingConfig`]s.
///
/// Every change bumps a generation counter; compiled plans remember the
/// generation they were built under so stale plans are never published.
#[derive(Debug, Default)]
pub struct ConfigRegistry {
    configs: DashMap<PairKey, Arc<MappingConfig>>,
    sequence: AtomicU64,
    generation: AtomicU64,
}

impl ConfigRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create (or replace) the config for an exact pair. Last write wins.
    pub fn declare(&self, source: &TypeName, dest: &TypeName) -> Arc<MappingConfig> {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let config = Arc::new(MappingConfig::new(source.clone(), dest.clone(), sequence));
        let replaced = self
            .configs
            .insert((source.clone(), dest.clone()), Arc::clone(&config))
            .is_some();
        log::debug!(
            "[config] declared {} -> {}{}",
            source,
            dest,
            if replaced { " (replaced)" } else { "" }
        );
        self.bump();
        config
    }

    /// Apply a change to an existing config; false if the pair is not declared.
    pub fn update<F>(&self, source: &TypeName, dest: &TypeName, f: F) -> bool
    where
        F: FnOnce(&mut MappingConfig),
    {
        let updated = match self.configs.get_mut(&(source.clone(), dest.clone())) {
            Some(mut entry) => {
                f(Arc::make_mut(entry.value_mut()));
                true
            }
            None => false,
        };
        if updated {
            self.bump();
        }
        updated
    }

    /// Config of the exact pair.
    pub fn exact(&self, source: &TypeName, dest: &TypeName) -> Option<Arc<MappingConfig>> {
        self.configs
            .get(&(source.clone(), dest.clone()))
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Configs with the same source whose destination is a proper ancestor
    /// of `dest`, in declaration order. These contribute after-mapping
    /// callbacks.
    pub fn base_configs(
        &self,
        source: &TypeName,
        dest: &TypeName,
        types: &TypeRegistry,
    ) -> Vec<Arc<MappingConfig>> {
        let mut found: Vec<Arc<MappingConfig>> = self
            .configs
            .iter()
            .filter(|entry| {
                let (src, dst) = entry.key();
                src == source && dst != dest && types.is_assignable_from(dst, dest)
            })
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        found.sort_by_key(|c| c.sequence());
        found
    }

    /// Configs whose source is `source` or one of its ancestors and whose
    /// destination is a proper ancestor of `dest`. These contribute
    /// fallback overrides. Ordered by nearest source first, then
    /// declaration order.
    pub fn inherited_configs(
        &self,
        source: &TypeName,
        dest: &TypeName,
        types: &TypeRegistry,
    ) -> Vec<Arc<MappingConfig>> {
        let mut sources = vec![source.clone()];
        sources.extend(types.ancestors(source).unwrap_or_default());

        let mut found: Vec<(usize, Arc<MappingConfig>)> = self
            .configs
            .iter()
            .filter_map(|entry| {
                let (src, dst) = entry.key();
                if dst == dest || !types.is_assignable_from(dst, dest) {
                    return None;
                }
                let distance = sources.iter().position(|s| s == src)?;
                Some((distance, Arc::clone(entry.value())))
            })
            .collect();
        found.sort_by_key(|(distance, c)| (*distance, c.sequence()));
        found.into_iter().map(|(_, c)| c).collect()
    }

    /// Current configuration generation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Mark configuration state as changed.
    pub fn bump(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Remove every config.
    pub fn clear(&self) {
        self.configs.clear();
        log::debug!("[config] registry cleared");
        self.bump();
    }

    /// Number of declared pairs.
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// True when nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}
