// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared object and collection instances.

use super::Value;
use crate::error::{MapError, Result};
use crate::types::{ObjectLayout, TypeName};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::fmt;
use std::sync::Arc;

/// Object instance: one value per layout slot.
#[derive(Debug, Clone)]
pub struct Object {
    layout: Arc<ObjectLayout>,
    values: Vec<Value>,
}

impl Object {
    pub(crate) fn from_parts(layout: Arc<ObjectLayout>, values: Vec<Value>) -> Self {
        debug_assert_eq!(layout.len(), values.len());
        Self { layout, values }
    }

    /// Layout of the instance's runtime type.
    pub fn layout(&self) -> &Arc<ObjectLayout> {
        &self.layout
    }

    /// Runtime type.
    pub fn type_name(&self) -> &TypeName {
        self.layout.type_name()
    }

    /// Field values in slot order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Get field value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.layout.slot(name).map(|i| &self.values[i])
    }

    /// Set field value by name.
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        let slot = self
            .layout
            .slot(name)
            .ok_or_else(|| MapError::FieldNotFound {
                type_name: self.layout.type_name().clone(),
                field: name.to_string(),
            })?;
        self.values[slot] = value;
        Ok(())
    }

    pub(crate) fn set_slot(&mut self, index: usize, value: Value) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }

    /// Slot lookup with a name fallback for instances of a subtype, whose
    /// layout may order fields differently.
    pub fn get_slot(&self, index: usize, name: &str) -> Option<&Value> {
        match self.layout.fields().get(index) {
            Some(field) if field.name == name => self.values.get(index),
            _ => self.get(name),
        }
    }
}

/// Shared handle to an object instance.
///
/// Clones share the instance. Graphs that reference themselves through
/// handles are never freed; callers that build cycles own that trade.
#[derive(Clone)]
pub struct ObjectRef(Arc<RwLock<Object>>);

impl ObjectRef {
    /// Wrap an object.
    pub fn new(object: Object) -> Self {
        Self(Arc::new(RwLock::new(object)))
    }

    /// Runtime type.
    pub fn type_name(&self) -> TypeName {
        self.0.read().type_name().clone()
    }

    /// Layout of the runtime type.
    pub fn layout(&self) -> Arc<ObjectLayout> {
        Arc::clone(self.0.read().layout())
    }

    /// Get field value by name.
    pub fn get(&self, name: &str) -> Result<Value> {
        let object = self.0.read();
        object
            .get(name)
            .cloned()
            .ok_or_else(|| MapError::FieldNotFound {
                type_name: object.type_name().clone(),
                field: name.to_string(),
            })
    }

    /// Set field value by name.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.0.write().set(name, value.into())
    }

    /// Copy of a field value by slot, falling back to the name.
    pub fn get_slot(&self, index: usize, name: &str) -> Option<Value> {
        self.0.read().get_slot(index, name).cloned()
    }

    /// Copy of all field values in slot order.
    pub fn snapshot(&self) -> Vec<Value> {
        self.0.read().values().to_vec()
    }

    /// Lock for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, Object> {
        self.0.read()
    }

    /// Lock for writing.
    pub fn write(&self) -> RwLockWriteGuard<'_, Object> {
        self.0.write()
    }

    /// Reference identity.
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Fields are not printed: graphs may be cyclic.
        write!(f, "ObjectRef({}@{:#x})", self.type_name(), self.addr())
    }
}

/// Collection instance.
#[derive(Debug, Clone)]
pub struct Collection {
    type_name: TypeName,
    items: Vec<Value>,
}

impl Collection {
    /// Collection type.
    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    /// Elements in order.
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Mutable access to the elements.
    pub fn items_mut(&mut self) -> &mut Vec<Value> {
        &mut self.items
    }
}

/// Shared handle to a collection instance.
#[derive(Clone)]
pub struct CollectionRef(Arc<RwLock<Collection>>);

impl CollectionRef {
    /// Create a collection of the given type.
    pub fn new(type_name: TypeName, items: Vec<Value>) -> Self {
        Self(Arc::new(RwLock::new(Collection { type_name, items })))
    }

    /// Collection type.
    pub fn type_name(&self) -> TypeName {
        self.0.read().type_name.clone()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.0.read().items.len()
    }

    /// True when there are no elements.
    pub fn is_empty(&self) -> bool {
        self.0.read().items.is_empty()
    }

    /// Copy of the elements.
    pub fn items(&self) -> Vec<Value> {
        self.0.read().items.clone()
    }

    /// Copy of one element.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.read().items.get(index).cloned()
    }

    /// Append an element.
    pub fn push(&self, value: impl Into<Value>) {
        self.0.write().items.push(value.into());
    }

    /// Lock for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, Collection> {
        self.0.read()
    }

    /// Lock for writing.
    pub fn write(&self) -> RwLockWriteGuard<'_, Collection> {
        self.0.write()
    }

    /// Reference identity.
    pub fn ptr_eq(&self, other: &CollectionRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl PartialEq for CollectionRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for CollectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.0.read();
        write!(f, "CollectionRef({}; {} items)", inner.type_name, inner.items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ObjectBuilder, TypeRegistry};

    fn point(types: &TypeRegistry) -> ObjectRef {
        types
            .register(
                ObjectBuilder::new("Point")
                    .field("X", "i32")
                    .field("Y", "i32")
                    .build(),
            )
            .expect("Point");
        types.instantiate("Point").expect("instance")
    }

    #[test]
    fn test_object_get_set() {
        let types = TypeRegistry::new();
        let p = point(&types);
        p.set("X", 3i32).expect("set X");
        assert_eq!(p.get("X").expect("X"), Value::I32(3));
        assert!(matches!(
            p.set("Z", 1i32),
            Err(MapError::FieldNotFound { .. })
        ));
    }

    #[test]
    fn test_get_slot_falls_back_to_name() {
        let types = TypeRegistry::new();
        let p = point(&types);
        p.set("Y", 9i32).expect("set Y");
        assert_eq!(p.get_slot(1, "Y"), Some(Value::I32(9)));
        assert_eq!(p.get_slot(0, "Y"), Some(Value::I32(9)));
        assert_eq!(p.get_slot(7, "Nope"), None);
    }

    #[test]
    fn test_clone_shares_instance() {
        let types = TypeRegistry::new();
        let p = point(&types);
        let alias = p.clone();
        alias.set("X", 11i32).expect("set");
        assert_eq!(p.get("X").expect("X"), Value::I32(11));
        assert!(p.ptr_eq(&alias));
        assert_ne!(p, types.instantiate("Point").expect("fresh"));
    }

    #[test]
    fn test_cyclic_graph_deep_eq_terminates() {
        let types = TypeRegistry::new();
        types
            .register(ObjectBuilder::new("Node").field("Next", "Node").build())
            .expect("Node");
        let a = types.instantiate("Node").expect("a");
        a.set("Next", a.clone()).expect("self link");
        let b = types.instantiate("Node").expect("b");
        b.set("Next", b.clone()).expect("self link");

        assert!(Value::Object(a.clone()).deep_eq(&Value::Object(b)));
        assert!(format!("{:?}", a).starts_with("ObjectRef(Node@"));
    }

    #[test]
    fn test_collection_ops() {
        let list = CollectionRef::new(TypeName::new("List<i32>"), vec![Value::I32(1)]);
        list.push(2i32);
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(1), Some(Value::I32(2)));
        assert_eq!(list.items(), vec![Value::I32(1), Value::I32(2)]);
    }
}
