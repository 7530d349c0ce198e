// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Concurrent store of type descriptors.
//!
//! Every type the mapper can see lives here under its [`TypeName`]. The
//! builtin primitives, `string` and `object` are registered on construction;
//! nullable wrappers and collection types are registered on demand the first
//! time something asks for them. Flattened object layouts are derived from
//! the descriptors lazily and cached until the next registration.
//!
//! Derived object types register lazily on first use, possibly from several
//! threads at once. Only the registering thread ever sees the provisional
//! descriptor of a type under construction; other threads wait for the
//! finished one.

use super::{
    CollectionShape, ObjectDescriptor, ObjectLayout, PrimitiveKind, TypeDescriptor, TypeKind,
    TypeName,
};
use crate::error::{MapError, Result};
use dashmap::{DashMap, DashSet};
use parking_lot::ReentrantMutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Builtin name of the text type.
pub const STRING: &str = "string";
/// Builtin name of the universal reference type.
pub const OBJECT: &str = "object";

/// Registry of type descriptors keyed by name.
pub struct TypeRegistry {
    types: DashMap<TypeName, Arc<TypeDescriptor>>,
    pub(super) layouts: DashMap<TypeName, Arc<ObjectLayout>>,
    /// Bumped by every insert or replacement.
    version: AtomicU64,
    /// Names whose descriptor is still provisional.
    pending: DashSet<TypeName>,
    registering: ReentrantMutex<()>,
}

impl TypeRegistry {
    /// Create a registry holding the builtin types.
    pub fn new() -> Self {
        let registry = Self {
            types: DashMap::new(),
            layouts: DashMap::new(),
            version: AtomicU64::new(0),
            pending: DashSet::new(),
            registering: ReentrantMutex::new(()),
        };
        for kind in PrimitiveKind::ALL {
            registry.insert(TypeDescriptor::primitive(kind));
        }
        registry.insert(TypeDescriptor::new(STRING, TypeKind::String));
        registry.insert(TypeDescriptor::new(OBJECT, TypeKind::Any));
        registry
    }

    /// Register (or replace) a descriptor.
    ///
    /// Builtin names cannot be redefined, nullable wrappers must wrap a
    /// registered value type and enums need an integral underlying kind.
    pub fn register(&self, descriptor: TypeDescriptor) -> Result<TypeName> {
        if let Some(existing) = self.types.get(&descriptor.name) {
            if is_builtin(&existing) && existing.kind != descriptor.kind {
                return Err(MapError::TypeMismatch {
                    expected: format!("builtin {}", existing.name),
                    got: format!("redefinition of {}", descriptor.name),
                });
            }
        }

        match &descriptor.kind {
            TypeKind::Nullable(inner) => {
                let inner_desc = self.get(inner)?;
                if !inner_desc.is_value_type() {
                    return Err(MapError::TypeMismatch {
                        expected: "value type".to_string(),
                        got: inner.to_string(),
                    });
                }
            }
            TypeKind::Enum(e) if !e.underlying.is_integral() => {
                return Err(MapError::TypeMismatch {
                    expected: "integral enum underlying type".to_string(),
                    got: e.underlying.type_name().to_string(),
                });
            }
            _ => {}
        }

        let name = descriptor.name.clone();
        log::debug!("[types] registered {}", name);
        self.insert(descriptor);
        Ok(name)
    }

    /// Register an object type once; `build` runs only when the name is new.
    ///
    /// A provisional empty descriptor is inserted first so that `build` can
    /// refer to the type being defined (self-referential fields). The
    /// registration lock is reentrant: nested derived types register on the
    /// same thread, while other threads block until the type is complete.
    pub fn ensure_object<F>(&self, name: &TypeName, build: F) -> Result<TypeName>
    where
        F: FnOnce(&TypeRegistry) -> Result<TypeDescriptor>,
    {
        // `pending` is set before the provisional insert and cleared after
        // the final one.
        if self.types.contains_key(name) && !self.pending.contains(name) {
            return Ok(name.clone());
        }

        let _guard = self.registering.lock();
        if self.types.contains_key(name) {
            // Complete, or provisional on this thread (recursive field).
            return Ok(name.clone());
        }

        self.pending.insert(name.clone());
        self.insert(TypeDescriptor::new(
            name.clone(),
            TypeKind::Object(ObjectDescriptor::new(Vec::new())),
        ));

        let result = build(self).and_then(|descriptor| self.register(descriptor));
        if result.is_err() {
            self.types.remove(name);
            self.bump();
        }
        self.pending.remove(name);
        result
    }

    /// Registry version, bumped whenever a descriptor is added or replaced.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    /// Look up a descriptor.
    pub fn get(&self, name: &str) -> Result<Arc<TypeDescriptor>> {
        self.types
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| MapError::UnknownType(TypeName::new(name)))
    }

    /// Check whether a type is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Number of registered types (builtins included).
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Always false: builtins are registered on construction.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Nullable wrapper of a value type, registered on demand.
    ///
    /// Wrapping an already nullable type returns it unchanged.
    pub fn nullable_of(&self, inner: &TypeName) -> Result<TypeName> {
        let inner_desc = self.get(inner)?;
        if matches!(inner_desc.kind, TypeKind::Nullable(_)) {
            return Ok(inner.clone());
        }
        if !inner_desc.is_value_type() {
            return Err(MapError::TypeMismatch {
                expected: "value type".to_string(),
                got: inner.to_string(),
            });
        }
        Ok(self.insert_derived(TypeDescriptor::nullable(inner)))
    }

    /// Array of `element`, registered on demand.
    pub fn array_of(&self, element: &TypeName) -> TypeName {
        self.insert_derived(TypeDescriptor::collection(CollectionShape::Array, element))
    }

    /// List of `element`, registered on demand.
    pub fn list_of(&self, element: &TypeName) -> TypeName {
        self.insert_derived(TypeDescriptor::collection(CollectionShape::List, element))
    }

    /// Read-only sequence of `element`, registered on demand.
    pub fn sequence_of(&self, element: &TypeName) -> TypeName {
        self.insert_derived(TypeDescriptor::collection(
            CollectionShape::Sequence,
            element,
        ))
    }

    /// Set of `element`, registered on demand.
    pub fn set_of(&self, element: &TypeName) -> TypeName {
        self.insert_derived(TypeDescriptor::collection(CollectionShape::Set, element))
    }

    fn insert(&self, descriptor: TypeDescriptor) {
        self.types
            .insert(descriptor.name.clone(), Arc::new(descriptor));
        self.bump();
    }

    /// Subtypes flatten their bases, so any change can affect any layout.
    /// The version moves before the clear; `layout` relies on that order.
    fn bump(&self) {
        self.version.fetch_add(1, Ordering::SeqCst);
        self.layouts.clear();
    }

    fn insert_derived(&self, descriptor: TypeDescriptor) -> TypeName {
        let name = descriptor.name.clone();
        self.types
            .entry(name.clone())
            .or_insert_with(|| Arc::new(descriptor));
        name
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.types.len())
            .field("layouts", &self.layouts.len())
            .finish()
    }
}

fn is_builtin(desc: &TypeDescriptor) -> bool {
    matches!(
        desc.kind,
        TypeKind::Primitive(_) | TypeKind::String | TypeKind::Any
    )
}
