// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for runtime type information.

use crate::value::Value;
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Interned type name, unique inside a [`TypeRegistry`](super::TypeRegistry).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeName(Arc<str>);

impl TypeName {
    /// Create a type name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// Name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the nullable wrapper around `inner`.
    pub fn nullable_of(inner: &TypeName) -> Self {
        Self::new(format!("{}?", inner))
    }

    /// Name of the array type with element `element`.
    pub fn array_of(element: &TypeName) -> Self {
        Self::new(format!("{}[]", element))
    }

    /// Name of the list type with element `element`.
    pub fn list_of(element: &TypeName) -> Self {
        Self::new(format!("List<{}>", element))
    }

    /// Name of the read-only sequence type with element `element`.
    pub fn sequence_of(element: &TypeName) -> Self {
        Self::new(format!("IEnumerable<{}>", element))
    }

    /// Name of the set type with element `element`.
    pub fn set_of(element: &TypeName) -> Self {
        Self::new(format!("Set<{}>", element))
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl Deref for TypeName {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TypeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeName {
    fn from(v: &str) -> Self {
        Self::new(v)
    }
}

impl From<String> for TypeName {
    fn from(v: String) -> Self {
        Self(Arc::from(v))
    }
}

impl From<&TypeName> for TypeName {
    fn from(v: &TypeName) -> Self {
        v.clone()
    }
}

impl PartialEq<str> for TypeName {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for TypeName {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// Primitive (value type) kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Char,
    DateTime,
    TimeSpan,
    Guid,
}

impl PrimitiveKind {
    /// Every primitive kind, in registration order.
    pub const ALL: [PrimitiveKind; 15] = [
        Self::Bool,
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::U8,
        Self::U16,
        Self::U32,
        Self::U64,
        Self::F32,
        Self::F64,
        Self::Char,
        Self::DateTime,
        Self::TimeSpan,
        Self::Guid,
    ];

    /// Builtin type name of this primitive.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Char => "char",
            Self::DateTime => "datetime",
            Self::TimeSpan => "timespan",
            Self::Guid => "guid",
        }
    }

    /// Integer kinds (usable as enum underlying types).
    pub fn is_integral(self) -> bool {
        matches!(
            self,
            Self::I8
                | Self::I16
                | Self::I32
                | Self::I64
                | Self::U8
                | Self::U16
                | Self::U32
                | Self::U64
        )
    }

    /// Floating point kinds.
    pub fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Integer or floating point.
    pub fn is_numeric(self) -> bool {
        self.is_integral() || self.is_float()
    }

    /// Inclusive value range of an integral kind.
    pub fn integral_range(self) -> Option<(i128, i128)> {
        match self {
            Self::I8 => Some((i8::MIN.into(), i8::MAX.into())),
            Self::I16 => Some((i16::MIN.into(), i16::MAX.into())),
            Self::I32 => Some((i32::MIN.into(), i32::MAX.into())),
            Self::I64 => Some((i64::MIN.into(), i64::MAX.into())),
            Self::U8 => Some((0, u8::MAX.into())),
            Self::U16 => Some((0, u16::MAX.into())),
            Self::U32 => Some((0, u32::MAX.into())),
            Self::U64 => Some((0, u64::MAX.into())),
            _ => None,
        }
    }
}

/// Shape a collection type materializes as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionShape {
    /// Fixed-length array.
    Array,
    /// Ordered growable list.
    List,
    /// Read-only ordered sequence (any producer satisfies it).
    Sequence,
    /// Unordered set of distinct elements.
    Set,
}

/// Collection type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionDescriptor {
    /// Shape of the collection.
    pub shape: CollectionShape,
    /// Element type.
    pub element: TypeName,
}

impl CollectionDescriptor {
    /// Create collection descriptor.
    pub fn new(shape: CollectionShape, element: TypeName) -> Self {
        Self { shape, element }
    }
}

/// Enumeration type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDescriptor {
    /// Enum variants.
    pub variants: Vec<EnumVariant>,
    /// Underlying integral type (default i32).
    pub underlying: PrimitiveKind,
}

impl EnumDescriptor {
    /// Create enum descriptor.
    pub fn new(variants: Vec<EnumVariant>) -> Self {
        Self {
            variants,
            underlying: PrimitiveKind::I32,
        }
    }

    /// Create with specific underlying type.
    pub fn with_underlying(mut self, underlying: PrimitiveKind) -> Self {
        self.underlying = underlying;
        self
    }

    /// Get variant by exact name.
    pub fn variant(&self, name: &str) -> Option<&EnumVariant> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// Get variant by name, ignoring ASCII case.
    pub fn variant_ignore_case(&self, name: &str) -> Option<&EnumVariant> {
        self.variants
            .iter()
            .find(|v| v.name.eq_ignore_ascii_case(name))
    }

    /// Get variant by value.
    pub fn variant_by_value(&self, value: i64) -> Option<&EnumVariant> {
        self.variants.iter().find(|v| v.value == value)
    }
}

/// Enum variant.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumVariant {
    /// Variant name.
    pub name: String,
    /// Variant value.
    pub value: i64,
}

impl EnumVariant {
    /// Create enum variant.
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Value a freshly constructed object holds in a field.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldDefault {
    /// Type default: zero, `false`, enum value 0, `Null` for reference types.
    #[default]
    Zero,
    /// Constructor allocates an empty collection of the field type.
    EmptyCollection,
    /// Constructor assigns the empty string.
    EmptyString,
    /// Constant value.
    Value(Value),
}

/// Field descriptor for object members.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field name (unique per type).
    pub name: String,
    /// Declared field type.
    pub type_name: TypeName,
    /// Type that declares the field (set by the object builder).
    pub declaring_type: Option<TypeName>,
    /// Field has a getter.
    pub readable: bool,
    /// Field has a setter.
    pub writable: bool,
    /// Value after default construction.
    pub default: FieldDefault,
}

impl FieldDescriptor {
    /// Create a read/write field descriptor.
    pub fn new(name: impl Into<String>, type_name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            declaring_type: None,
            readable: true,
            writable: true,
            default: FieldDefault::Zero,
        }
    }

    /// Mark as get-only.
    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    /// Mark as set-only.
    pub fn write_only(mut self) -> Self {
        self.readable = false;
        self
    }

    /// Set the default-construction value.
    pub fn with_default(mut self, default: FieldDefault) -> Self {
        self.default = default;
        self
    }

    /// Set the declaring type.
    pub fn declared_by(mut self, owner: &TypeName) -> Self {
        self.declaring_type = Some(owner.clone());
        self
    }
}

/// Object (class or interface) descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDescriptor {
    /// Fields declared by this type (not inherited ones).
    pub fields: Vec<FieldDescriptor>,
    /// Base class.
    pub base: Option<TypeName>,
    /// Directly implemented (or, for interfaces, inherited) interfaces.
    pub interfaces: Vec<TypeName>,
    /// Interface types are never constructible.
    pub is_interface: bool,
    /// Has a parameterless constructor.
    pub constructible: bool,
}

impl ObjectDescriptor {
    /// Constructible class with the given fields.
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self {
            fields,
            base: None,
            interfaces: Vec::new(),
            is_interface: false,
            constructible: true,
        }
    }

    /// Get declared field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Type kind enumeration.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// Primitive value type.
    Primitive(PrimitiveKind),
    /// Text (reference type).
    String,
    /// Enumeration (value type).
    Enum(EnumDescriptor),
    /// Optional wrapper around a value type.
    Nullable(TypeName),
    /// Array, list, sequence or set.
    Collection(CollectionDescriptor),
    /// Class or interface with named fields.
    Object(ObjectDescriptor),
    /// Universal reference type.
    Any,
}

/// A complete type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// Type name.
    pub name: TypeName,
    /// Type kind.
    pub kind: TypeKind,
}

impl TypeDescriptor {
    /// Create a new type descriptor.
    pub fn new(name: impl Into<TypeName>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Create a primitive type descriptor under its builtin name.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::new(kind.type_name(), TypeKind::Primitive(kind))
    }

    /// Create the nullable wrapper descriptor for `inner`.
    pub fn nullable(inner: &TypeName) -> Self {
        Self::new(
            TypeName::nullable_of(inner),
            TypeKind::Nullable(inner.clone()),
        )
    }

    /// Create a collection descriptor with the conventional name for its shape.
    pub fn collection(shape: CollectionShape, element: &TypeName) -> Self {
        let name = match shape {
            CollectionShape::Array => TypeName::array_of(element),
            CollectionShape::List => TypeName::list_of(element),
            CollectionShape::Sequence => TypeName::sequence_of(element),
            CollectionShape::Set => TypeName::set_of(element),
        };
        Self::new(
            name,
            TypeKind::Collection(CollectionDescriptor::new(shape, element.clone())),
        )
    }

    /// Check if this is an object (class or interface) type.
    pub fn is_object(&self) -> bool {
        matches!(self.kind, TypeKind::Object(_))
    }

    /// Object descriptor, if this is an object type.
    pub fn as_object(&self) -> Option<&ObjectDescriptor> {
        match &self.kind {
            TypeKind::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Enum descriptor, if this is an enum type.
    pub fn as_enum(&self) -> Option<&EnumDescriptor> {
        match &self.kind {
            TypeKind::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Collection descriptor, if this is a collection type.
    pub fn as_collection(&self) -> Option<&CollectionDescriptor> {
        match &self.kind {
            TypeKind::Collection(c) => Some(c),
            _ => None,
        }
    }

    /// Primitive kind, if this is a primitive type.
    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self.kind {
            TypeKind::Primitive(p) => Some(p),
            _ => None,
        }
    }

    /// Value types are copied, never shared or deep-mapped.
    pub fn is_value_type(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Primitive(_) | TypeKind::Enum(_) | TypeKind::Nullable(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_name_derived_names() {
        let address = TypeName::new("Address");
        assert_eq!(TypeName::array_of(&address), "Address[]");
        assert_eq!(TypeName::list_of(&address), "List<Address>");
        assert_eq!(TypeName::sequence_of(&address), "IEnumerable<Address>");
        assert_eq!(TypeName::nullable_of(&TypeName::new("i32")), "i32?");
    }

    #[test]
    fn test_primitive_ranges() {
        assert_eq!(PrimitiveKind::U8.integral_range(), Some((0, 255)));
        assert_eq!(
            PrimitiveKind::I16.integral_range(),
            Some((i128::from(i16::MIN), i128::from(i16::MAX)))
        );
        assert!(PrimitiveKind::F64.integral_range().is_none());
        assert!(PrimitiveKind::F32.is_numeric());
        assert!(!PrimitiveKind::Char.is_numeric());
    }

    #[test]
    fn test_enum_descriptor_lookup() {
        let departments = EnumDescriptor::new(vec![
            EnumVariant::new("Finance", 0),
            EnumVariant::new("IT", 1),
            EnumVariant::new("Sales", 2),
        ]);

        assert_eq!(departments.variant("IT").map(|v| v.value), Some(1));
        assert!(departments.variant("it").is_none());
        assert_eq!(
            departments.variant_ignore_case("sAlEs").map(|v| v.value),
            Some(2)
        );
        assert_eq!(
            departments.variant_by_value(0).map(|v| v.name.as_str()),
            Some("Finance")
        );
    }

    #[test]
    fn test_value_type_classification() {
        let i32_type = TypeDescriptor::primitive(PrimitiveKind::I32);
        assert!(i32_type.is_value_type());
        assert!(TypeDescriptor::nullable(&i32_type.name).is_value_type());
        assert!(!TypeDescriptor::new("string", TypeKind::String).is_value_type());
        assert!(!TypeDescriptor::collection(CollectionShape::List, &i32_type.name).is_value_type());
    }
}
