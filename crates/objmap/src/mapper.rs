// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Mapper facade.
//!
//! A [`Mapper`] owns the type registry, the configuration registry and the
//! plan cache. Every operation takes `&self`, so one mapper can be shared
//! across threads.

use crate::config::{ConfigBuilder, ConfigRegistry};
use crate::error::{MapError, Result};
use crate::plan::{self, CacheStats, Executor, MappingPlan, PlanCache};
use crate::settings::MapperSettings;
use crate::typed::MapValue;
use crate::types::{TypeDescriptor, TypeName, TypeRegistry};
use crate::value::Value;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Object graph mapper.
///
/// ```rust
/// use objmap::{Mapper, Value};
/// use objmap::types::ObjectBuilder;
///
/// let mapper = Mapper::new();
/// mapper.register(ObjectBuilder::new("Point").field("X", "i32").field("Y", "i32").build())?;
/// mapper.register(ObjectBuilder::new("PointDto").field("X", "i64").field("Y", "string").build())?;
///
/// let point = mapper.types().instantiate("Point")?;
/// point.set("X", 3i32)?;
/// point.set("Y", 4i32)?;
///
/// let dto = mapper.map(&Value::Object(point), "PointDto")?;
/// let dto = dto.as_object().expect("object");
/// assert_eq!(dto.get("X")?, Value::I64(3));
/// assert_eq!(dto.get("Y")?, Value::from("4"));
/// # Ok::<(), objmap::MapError>(())
/// ```
pub struct Mapper {
    types: TypeRegistry,
    configs: ConfigRegistry,
    cache: PlanCache,
    settings: MapperSettings,
    max_depth: AtomicUsize,
    /// Registry version the cached plans were compiled against.
    types_version: AtomicU64,
}

impl Mapper {
    /// Mapper with default settings.
    pub fn new() -> Self {
        Self::with_settings(MapperSettings::default())
    }

    /// Mapper with explicit settings.
    pub fn with_settings(settings: MapperSettings) -> Self {
        log::debug!(
            "[mapper] created (default depth {}, plan cache {})",
            settings.default_max_depth,
            if settings.cache_plans { "on" } else { "off" }
        );
        let types = TypeRegistry::new();
        Self {
            types_version: AtomicU64::new(types.version()),
            types,
            configs: ConfigRegistry::new(),
            cache: PlanCache::new(),
            max_depth: AtomicUsize::new(settings.default_max_depth),
            settings,
        }
    }

    /// Settings the mapper was created with.
    pub fn settings(&self) -> &MapperSettings {
        &self.settings
    }

    /// Type registry.
    ///
    /// Types registered here directly, or lazily by derived types, are
    /// picked up by the next `compile`, which drops plans built against the
    /// previous registry version.
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Register (or replace) a type. Cached plans are invalidated.
    pub fn register(&self, descriptor: TypeDescriptor) -> Result<TypeName> {
        let name = self.types.register(descriptor)?;
        self.sync_types();
        Ok(name)
    }

    /// Declare the configuration of a pair, replacing any previous one.
    pub fn configure(
        &self,
        source: impl Into<TypeName>,
        dest: impl Into<TypeName>,
    ) -> Result<ConfigBuilder<'_>> {
        ConfigBuilder::declare(&self.types, &self.configs, source.into(), dest.into())
    }

    /// Compiled plan for a pair, from the cache when possible.
    pub fn compile(&self, source: &TypeName, dest: &TypeName) -> Result<Arc<MappingPlan>> {
        self.sync_types();
        let generation = self.configs.generation();
        if self.settings.cache_plans {
            if let Some(plan) = self.cache.get(source, dest, generation) {
                return Ok(plan);
            }
        }

        let plan = plan::compile(
            &self.types,
            &self.configs,
            source,
            dest,
            self.default_max_depth(),
        )?;
        if self.settings.cache_plans && plan.generation() == generation {
            self.cache.publish(&plan, self.configs.generation());
        }
        Ok(plan)
    }

    /// Run a plan against a source instance.
    pub fn execute(&self, plan: &MappingPlan, source: &Value) -> Result<Value> {
        Executor::new(&self.types).execute(plan, source)
    }

    /// Map an instance, using its runtime type as the source type.
    pub fn map(&self, source: &Value, dest: impl Into<TypeName>) -> Result<Value> {
        let dest = dest.into();
        match source {
            Value::Null => Ok(Value::Null),
            Value::Object(object) => {
                let plan = self.compile(&object.type_name(), &dest)?;
                self.execute(&plan, source)
            }
            other => Err(MapError::TypeMismatch {
                expected: "object instance".to_string(),
                got: other.type_label(),
            }),
        }
    }

    /// Map an instance as the given source type.
    pub fn map_as(
        &self,
        source: &Value,
        source_type: impl Into<TypeName>,
        dest: impl Into<TypeName>,
    ) -> Result<Value> {
        let plan = self.compile(&source_type.into(), &dest.into())?;
        self.execute(&plan, source)
    }

    /// Map every element of a collection. `Null` yields an empty vector;
    /// order is preserved and `Null` elements stay `Null`.
    pub fn map_collection(&self, source: &Value, dest: impl Into<TypeName>) -> Result<Vec<Value>> {
        let dest = dest.into();
        let collection = match source {
            Value::Null => return Ok(Vec::new()),
            Value::Collection(c) => c,
            other => {
                return Err(MapError::TypeMismatch {
                    expected: "collection".to_string(),
                    got: other.type_label(),
                })
            }
        };

        let declared = self
            .types
            .element_type(&collection.type_name())
            .filter(|e| self.types.get(e).is_ok_and(|d| d.is_object()));
        collection
            .items()
            .iter()
            .map(|item| match (&declared, item) {
                (_, Value::Null) => Ok(Value::Null),
                (Some(source_type), _) => self.map_as(item, source_type.clone(), dest.clone()),
                (None, _) => self.map(item, dest.clone()),
            })
            .collect()
    }

    /// Map a typed value into another typed value.
    pub fn map_typed<A: MapValue, B: MapValue>(&self, source: &A) -> Result<B> {
        let source_type = A::type_name(&self.types)?;
        let dest_type = B::type_name(&self.types)?;
        let value = source.to_value(&self.types)?;
        let mapped = self.map_as(&value, source_type, dest_type)?;
        B::from_value(&mapped, &self.types)
    }

    /// Map a slice of typed values, preserving order.
    pub fn map_typed_collection<A: MapValue, B: MapValue>(&self, sources: &[A]) -> Result<Vec<B>> {
        sources.iter().map(|s| self.map_typed(s)).collect()
    }

    /// Convert a typed value into a dynamic one, registering its schema.
    pub fn to_value<T: MapValue>(&self, value: &T) -> Result<Value> {
        value.to_value(&self.types)
    }

    /// Rebuild a typed value from a dynamic one.
    pub fn from_value<T: MapValue>(&self, value: &Value) -> Result<T> {
        T::from_value(value, &self.types)
    }

    /// Drop every configuration and cached plan and restore the default
    /// depth from the settings. Registered types are kept.
    pub fn reset_all(&self) {
        self.configs.clear();
        self.max_depth
            .store(self.settings.default_max_depth, Ordering::Release);
        self.invalidate();
        log::debug!("[mapper] reset");
    }

    /// Depth limit for pairs without `set_depth`.
    pub fn default_max_depth(&self) -> usize {
        self.max_depth.load(Ordering::Acquire)
    }

    /// Change the default depth limit. Cached plans are invalidated.
    pub fn set_default_max_depth(&self, depth: usize) {
        self.max_depth.store(depth, Ordering::Release);
        self.invalidate();
        log::debug!("[mapper] default max depth {}", depth);
    }

    /// Number of cached plans.
    pub fn cached_plan_count(&self) -> usize {
        self.cache.len()
    }

    /// Plan cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn sync_types(&self) {
        let current = self.types.version();
        let seen = self.types_version.swap(current, Ordering::AcqRel);
        if seen != current {
            log::debug!("[mapper] type registry changed ({} -> {})", seen, current);
            self.invalidate();
        }
    }

    fn invalidate(&self) {
        self.configs.bump();
        self.cache.clear();
    }
}

impl Default for Mapper {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Mapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mapper")
            .field("types", &self.types.len())
            .field("configs", &self.configs.len())
            .field("cached_plans", &self.cache.len())
            .field("default_max_depth", &self.default_max_depth())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ObjectBuilder;

    fn mapper() -> Mapper {
        let mapper = Mapper::new();
        mapper
            .register(ObjectBuilder::new("Item").field("Id", "i32").build())
            .expect("Item");
        mapper
            .register(ObjectBuilder::new("ItemDto").field("Id", "string").build())
            .expect("ItemDto");
        mapper
    }

    fn item(mapper: &Mapper, id: i32) -> Value {
        let object = mapper.types().instantiate("Item").expect("instantiate");
        object.set("Id", id).expect("id");
        Value::Object(object)
    }

    #[test]
    fn test_compile_is_cached() {
        let mapper = mapper();
        let (src, dst) = (TypeName::new("Item"), TypeName::new("ItemDto"));
        let first = mapper.compile(&src, &dst).expect("first");
        let second = mapper.compile(&src, &dst).expect("second");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(mapper.cached_plan_count(), 1);

        mapper.configure("Item", "ItemDto").expect("configure");
        let third = mapper.compile(&src, &dst).expect("third");
        assert!(!Arc::ptr_eq(&first, &third));
    }

    #[test]
    fn test_map_and_collection() {
        let mapper = mapper();
        assert_eq!(mapper.map(&Value::Null, "ItemDto").expect("null"), Value::Null);
        assert!(mapper.map(&Value::I32(1), "ItemDto").is_err());

        let list = mapper.types().list_of(&"Item".into());
        let source = Value::Collection(crate::value::CollectionRef::new(
            list,
            vec![item(&mapper, 2), Value::Null, item(&mapper, 1)],
        ));
        let mapped = mapper.map_collection(&source, "ItemDto").expect("collection");
        let ids: Vec<Value> = mapped
            .iter()
            .map(|v| match v {
                Value::Object(o) => o.get("Id").expect("id"),
                other => other.clone(),
            })
            .collect();
        assert_eq!(ids, vec![Value::from("2"), Value::Null, Value::from("1")]);
        assert!(mapper
            .map_collection(&Value::Null, "ItemDto")
            .expect("null")
            .is_empty());
    }

    #[test]
    fn test_default_depth_and_reset() {
        let mapper = Mapper::with_settings(MapperSettings {
            default_max_depth: 4,
            cache_plans: true,
        });
        assert_eq!(mapper.default_max_depth(), 4);
        mapper.set_default_max_depth(2);
        assert_eq!(mapper.default_max_depth(), 2);
        mapper.reset_all();
        assert_eq!(mapper.default_max_depth(), 4);
        assert_eq!(mapper.cached_plan_count(), 0);
    }

    #[test]
    fn test_cache_disabled() {
        let mapper = Mapper::with_settings(MapperSettings {
            cache_plans: false,
            ..MapperSettings::default()
        });
        mapper
            .register(ObjectBuilder::new("A").field("X", "i32").build())
            .expect("A");
        let (a, b) = (TypeName::new("A"), TypeName::new("A"));
        let first = mapper.compile(&a, &b).expect("first");
        let second = mapper.compile(&a, &b).expect("second");
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(mapper.cached_plan_count(), 0);
    }
}
