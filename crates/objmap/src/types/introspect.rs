// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type introspection: mappable fields, ancestry, classification and
//! default construction.

use super::registry::OBJECT;
use super::{
    CollectionShape, FieldDefault, FieldDescriptor, TypeDescriptor, TypeKind, TypeName,
    TypeRegistry,
};
use crate::error::{MapError, Result};
use crate::value::{CollectionRef, EnumValue, Object, ObjectRef, Value};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

/// Value category of a field type, driving conversion selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Primitive value type.
    Value,
    /// Optional value type.
    Nullable,
    /// Enumeration.
    Enum,
    /// Text.
    String,
    /// Array, list, sequence or set.
    Collection,
    /// Class or interface.
    Object,
    /// `object`.
    Any,
}

/// How a freshly constructed object fills one slot.
#[derive(Debug, Clone)]
pub(crate) enum FieldInit {
    Value(Value),
    EmptyCollection(TypeName),
}

/// Flattened field table of an object type.
///
/// Slot indices are positions in [`fields`](Self::fields); objects store
/// their values in the same order.
#[derive(Debug)]
pub struct ObjectLayout {
    type_name: TypeName,
    fields: Vec<FieldDescriptor>,
    inits: Vec<FieldInit>,
    index: HashMap<String, usize>,
}

impl ObjectLayout {
    pub(crate) fn new(
        type_name: TypeName,
        fields: Vec<FieldDescriptor>,
        inits: Vec<FieldInit>,
    ) -> Self {
        let index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect();
        Self {
            type_name,
            fields,
            inits,
            index,
        }
    }

    /// Object type this layout describes.
    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    /// Fields in slot order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Slot of a field.
    pub fn slot(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Field descriptor by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.slot(name).map(|i| &self.fields[i])
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True for objects without fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Create a default-valued instance.
    pub fn instantiate(self: &Arc<Self>) -> ObjectRef {
        let values = self
            .inits
            .iter()
            .map(|init| match init {
                FieldInit::Value(v) => v.clone(),
                FieldInit::EmptyCollection(type_name) => {
                    Value::Collection(CollectionRef::new(type_name.clone(), Vec::new()))
                }
            })
            .collect();
        ObjectRef::new(Object::from_parts(Arc::clone(self), values))
    }
}

impl TypeRegistry {
    /// Mappable fields of an object type.
    ///
    /// Classes flatten their base chain, root first; a redeclared field
    /// replaces the inherited entry in place. Interfaces walk their inherited
    /// interfaces breadth first and put newly discovered members ahead of
    /// the ones already collected.
    pub fn fields(&self, name: &str) -> Result<Vec<FieldDescriptor>> {
        let desc = self.get(name)?;
        let object = desc.as_object().ok_or_else(|| MapError::TypeMismatch {
            expected: "object type".to_string(),
            got: name.to_string(),
        })?;

        if object.is_interface {
            return self.interface_fields(&desc.name);
        }

        let mut fields: Vec<FieldDescriptor> = Vec::new();
        for class in self.class_chain(&desc.name)?.iter().rev() {
            let Some(object) = class.as_object() else {
                continue;
            };
            for field in &object.fields {
                match fields.iter_mut().find(|f| f.name == field.name) {
                    Some(existing) => *existing = field.clone(),
                    None => fields.push(field.clone()),
                }
            }
        }
        Ok(fields)
    }

    fn interface_fields(&self, name: &TypeName) -> Result<Vec<FieldDescriptor>> {
        let mut fields: Vec<FieldDescriptor> = Vec::new();
        let mut considered = vec![name.clone()];
        let mut queue = VecDeque::from([name.clone()]);

        while let Some(current) = queue.pop_front() {
            let desc = self.get(&current)?;
            let Some(object) = desc.as_object() else {
                continue;
            };
            for parent in &object.interfaces {
                if !considered.contains(parent) {
                    considered.push(parent.clone());
                    queue.push_back(parent.clone());
                }
            }
            let mut discovered: Vec<FieldDescriptor> = object
                .fields
                .iter()
                .filter(|f| !fields.iter().any(|known| known.name == f.name))
                .cloned()
                .collect();
            discovered.append(&mut fields);
            fields = discovered;
        }
        Ok(fields)
    }

    /// The type itself followed by its base classes, nearest first.
    fn class_chain(&self, name: &TypeName) -> Result<Vec<Arc<TypeDescriptor>>> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(name.clone());

        while let Some(type_name) = current {
            if !seen.insert(type_name.clone()) {
                return Err(MapError::TypeMismatch {
                    expected: "acyclic base chain".to_string(),
                    got: format!("{} inherits itself", type_name),
                });
            }
            let desc = self.get(&type_name)?;
            current = desc.as_object().and_then(|o| o.base.clone());
            chain.push(desc);
        }
        Ok(chain)
    }

    /// Base classes (nearest first) then the interface closure, breadth
    /// first. The type itself is excluded; non-object types have none.
    pub fn ancestors(&self, name: &str) -> Result<Vec<TypeName>> {
        let desc = self.get(name)?;
        if !desc.is_object() {
            return Ok(Vec::new());
        }

        let chain = self.class_chain(&desc.name)?;
        let mut result: Vec<TypeName> = chain.iter().skip(1).map(|d| d.name.clone()).collect();

        let mut queue: VecDeque<TypeName> = VecDeque::new();
        for class in &chain {
            if let Some(object) = class.as_object() {
                queue.extend(object.interfaces.iter().cloned());
            }
        }
        while let Some(interface) = queue.pop_front() {
            if interface == desc.name || result.contains(&interface) {
                continue;
            }
            if let Some(object) = self.get(&interface)?.as_object() {
                queue.extend(object.interfaces.iter().cloned());
            }
            result.push(interface);
        }
        Ok(result)
    }

    /// True when a value of type `ty` can be used where `ancestor` is expected.
    pub fn is_assignable_from(&self, ancestor: &str, ty: &str) -> bool {
        if ancestor == ty || ancestor == OBJECT {
            return true;
        }
        self.ancestors(ty)
            .map(|a| a.iter().any(|t| t == ancestor))
            .unwrap_or(false)
    }

    /// Classify a type for conversion selection.
    pub fn classify(&self, name: &str) -> Result<FieldKind> {
        let desc = self.get(name)?;
        Ok(match desc.kind {
            TypeKind::Primitive(_) => FieldKind::Value,
            TypeKind::Nullable(_) => FieldKind::Nullable,
            TypeKind::Enum(_) => FieldKind::Enum,
            TypeKind::String => FieldKind::String,
            TypeKind::Collection(_) => FieldKind::Collection,
            TypeKind::Object(_) => FieldKind::Object,
            TypeKind::Any => FieldKind::Any,
        })
    }

    /// Element type of a collection type.
    pub fn element_type(&self, name: &str) -> Option<TypeName> {
        self.get(name)
            .ok()
            .and_then(|d| d.as_collection().map(|c| c.element.clone()))
    }

    /// Check if a type is a collection.
    pub fn is_collection_type(&self, name: &str) -> bool {
        self.get(name)
            .map(|d| d.as_collection().is_some())
            .unwrap_or(false)
    }

    /// Check if a type is an enum.
    pub fn is_enum_type(&self, name: &str) -> bool {
        self.get(name)
            .map(|d| d.as_enum().is_some())
            .unwrap_or(false)
    }

    /// Unwrap a nullable wrapper to its inner type; other types map to themselves.
    pub fn underlying_value_type(&self, name: &TypeName) -> TypeName {
        match self.get(name).map(|d| d.kind.clone()) {
            Ok(TypeKind::Nullable(inner)) => inner,
            _ => name.clone(),
        }
    }

    /// Check if a type is a value type (primitive, enum or nullable).
    pub fn is_value_type(&self, name: &str) -> bool {
        self.get(name).map(|d| d.is_value_type()).unwrap_or(false)
    }

    /// Check if a type is a class with a parameterless constructor.
    pub fn is_constructible(&self, name: &str) -> bool {
        self.get(name)
            .map(|d| d.as_object().is_some_and(|o| o.constructible && !o.is_interface))
            .unwrap_or(false)
    }

    /// Flattened layout of an object type (cached).
    pub fn layout(&self, name: &str) -> Result<Arc<ObjectLayout>> {
        if let Some(hit) = self.layouts.get(name) {
            return Ok(Arc::clone(hit.value()));
        }

        let version = self.version();
        let desc = self.get(name)?;
        let fields = self.fields(&desc.name)?;
        let inits = fields
            .iter()
            .map(|f| self.field_init(f))
            .collect::<Result<Vec<_>>>()?;
        let layout = Arc::new(ObjectLayout::new(desc.name.clone(), fields, inits));

        // A registration racing with the build either clears the cache after
        // this insert or has already moved the version, in which case the
        // entry is withdrawn.
        self.layouts
            .insert(desc.name.clone(), Arc::clone(&layout));
        if self.version() != version {
            self.layouts
                .remove_if(&desc.name, |_, cached| Arc::ptr_eq(cached, &layout));
            log::trace!("[types] {} changed while building its layout", desc.name);
        }
        Ok(layout)
    }

    /// Default-construct an instance of a class.
    pub fn instantiate(&self, name: &str) -> Result<ObjectRef> {
        let desc = self.get(name)?;
        match desc.as_object() {
            Some(o) if o.is_interface => Err(MapError::construction(
                &desc.name,
                "interfaces cannot be instantiated",
            )),
            Some(o) if !o.constructible => Err(MapError::construction(
                &desc.name,
                "no parameterless constructor",
            )),
            Some(_) => Ok(self.layout(name)?.instantiate()),
            None => Err(MapError::construction(&desc.name, "not an object type")),
        }
    }

    /// Default value of a type: zero for value types, `Null` otherwise.
    pub fn zero_value(&self, name: &str) -> Result<Value> {
        let desc = self.get(name)?;
        Ok(match &desc.kind {
            TypeKind::Primitive(kind) => Value::zero(*kind),
            TypeKind::Enum(e) => Value::Enum(EnumValue::new(desc.name.clone(), e, 0)),
            _ => Value::Null,
        })
    }

    fn field_init(&self, field: &FieldDescriptor) -> Result<FieldInit> {
        let desc = self.get(&field.type_name)?;
        Ok(match (&field.default, &desc.kind) {
            (FieldDefault::Value(v), _) => FieldInit::Value(v.clone()),
            (FieldDefault::EmptyString, _) | (FieldDefault::EmptyCollection, TypeKind::String) => {
                FieldInit::Value(Value::from(""))
            }
            (FieldDefault::EmptyCollection, TypeKind::Collection(c)) => {
                let materialized = match c.shape {
                    CollectionShape::Sequence => self.array_of(&c.element),
                    _ => desc.name.clone(),
                };
                FieldInit::EmptyCollection(materialized)
            }
            _ => FieldInit::Value(self.zero_value(&field.type_name)?),
        })
    }

    /// Check that a value can be stored where `name` is expected.
    pub fn conforms(&self, value: &Value, name: &str) -> bool {
        let Ok(desc) = self.get(name) else {
            return false;
        };
        match (&desc.kind, value) {
            (TypeKind::Any, _) => true,
            (TypeKind::Nullable(_), Value::Null) => true,
            (TypeKind::Nullable(inner), v) => self.conforms(v, inner),
            (TypeKind::Primitive(_) | TypeKind::Enum(_), Value::Null) => false,
            (_, Value::Null) => true,
            (TypeKind::Primitive(kind), v) => v.primitive_kind() == Some(*kind),
            (TypeKind::String, Value::String(_)) => true,
            (TypeKind::Enum(_), Value::Enum(e)) => e.type_name == desc.name,
            (TypeKind::Object(_), Value::Object(obj)) => {
                self.is_assignable_from(&desc.name, obj.type_name().as_str())
            }
            (TypeKind::Collection(target), Value::Collection(coll)) => {
                let actual = coll.type_name();
                if actual == desc.name {
                    return true;
                }
                // Any array or list satisfies a sequence of the same element.
                target.shape == CollectionShape::Sequence
                    && self
                        .element_type(&actual)
                        .is_some_and(|e| self.is_assignable_from(&target.element, &e))
            }
            _ => false,
        }
    }
}
