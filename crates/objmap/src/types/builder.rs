// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for object and enum descriptors.

use super::{
    EnumDescriptor, EnumVariant, FieldDefault, FieldDescriptor, ObjectDescriptor, PrimitiveKind,
    TypeDescriptor, TypeKind, TypeName,
};

/// Builder for class and interface descriptors.
#[derive(Debug)]
pub struct ObjectBuilder {
    name: TypeName,
    object: ObjectDescriptor,
}

impl ObjectBuilder {
    /// Create a new builder for a constructible class.
    pub fn new(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            object: ObjectDescriptor::new(Vec::new()),
        }
    }

    /// Add a read/write field.
    pub fn field(self, name: impl Into<String>, type_name: impl Into<TypeName>) -> Self {
        self.push(FieldDescriptor::new(name, type_name))
    }

    /// Add a get-only field.
    pub fn readonly_field(self, name: impl Into<String>, type_name: impl Into<TypeName>) -> Self {
        self.push(FieldDescriptor::new(name, type_name).read_only())
    }

    /// Add a set-only field.
    pub fn writeonly_field(self, name: impl Into<String>, type_name: impl Into<TypeName>) -> Self {
        self.push(FieldDescriptor::new(name, type_name).write_only())
    }

    /// Add a field with an explicit default-construction value.
    pub fn field_with_default(
        self,
        name: impl Into<String>,
        type_name: impl Into<TypeName>,
        default: FieldDefault,
    ) -> Self {
        self.push(FieldDescriptor::new(name, type_name).with_default(default))
    }

    /// Add a collection or string field that the constructor initializes empty.
    pub fn initialized_field(self, name: impl Into<String>, type_name: impl Into<TypeName>) -> Self {
        self.field_with_default(name, type_name, FieldDefault::EmptyCollection)
    }

    /// Add a prepared field descriptor.
    pub fn field_descriptor(self, field: FieldDescriptor) -> Self {
        self.push(field)
    }

    /// Set the base class.
    pub fn base(mut self, base: impl Into<TypeName>) -> Self {
        self.object.base = Some(base.into());
        self
    }

    /// Add an implemented interface (inherited interface for interfaces).
    pub fn implements(mut self, interface: impl Into<TypeName>) -> Self {
        self.object.interfaces.push(interface.into());
        self
    }

    /// Mark the type as an interface (never constructible).
    pub fn interface(mut self) -> Self {
        self.object.is_interface = true;
        self.object.constructible = false;
        self
    }

    /// Mark the type as lacking a parameterless constructor.
    pub fn not_constructible(mut self) -> Self {
        self.object.constructible = false;
        self
    }

    /// Build the TypeDescriptor.
    pub fn build(mut self) -> TypeDescriptor {
        for field in &mut self.object.fields {
            field.declaring_type = Some(self.name.clone());
        }
        TypeDescriptor::new(self.name, TypeKind::Object(self.object))
    }

    fn push(mut self, field: FieldDescriptor) -> Self {
        // Redeclaring a name replaces the earlier declaration.
        if let Some(existing) = self.object.fields.iter_mut().find(|f| f.name == field.name) {
            *existing = field;
        } else {
            self.object.fields.push(field);
        }
        self
    }
}

/// Builder for enum types.
#[derive(Debug)]
pub struct EnumBuilder {
    name: TypeName,
    variants: Vec<EnumVariant>,
    underlying: PrimitiveKind,
    next_value: i64,
}

impl EnumBuilder {
    /// Create a new enum builder.
    pub fn new(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            variants: Vec::new(),
            underlying: PrimitiveKind::I32,
            next_value: 0,
        }
    }

    /// Add a variant with auto-incremented value.
    pub fn variant(mut self, name: impl Into<String>) -> Self {
        let value = self.next_value;
        self.variants.push(EnumVariant::new(name, value));
        self.next_value = value.wrapping_add(1);
        self
    }

    /// Add a variant with explicit value.
    pub fn variant_value(mut self, name: impl Into<String>, value: i64) -> Self {
        self.variants.push(EnumVariant::new(name, value));
        self.next_value = value.wrapping_add(1);
        self
    }

    /// Set underlying integral type.
    pub fn underlying(mut self, kind: PrimitiveKind) -> Self {
        self.underlying = kind;
        self
    }

    /// Build the enum TypeDescriptor.
    pub fn build(self) -> TypeDescriptor {
        let desc = EnumDescriptor::new(self.variants).with_underlying(self.underlying);
        TypeDescriptor::new(self.name, TypeKind::Enum(desc))
    }
}
