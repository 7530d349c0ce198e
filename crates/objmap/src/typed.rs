// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bridge between Rust values and dynamic [`Value`]s.
//!
//! [`MapValue`] is implemented here for scalars, text, `Option`, `Box` and
//! `Vec`; `#[derive(Mappable)]` implements it for user structs and enums.
//! Typed values are trees: converting one always allocates fresh objects.

use crate::error::{MapError, Result};
use crate::types::{PrimitiveKind, TypeName, TypeRegistry, STRING};
use crate::value::{CollectionRef, Value};
use chrono::{NaiveDateTime, TimeDelta};
use uuid::Uuid;

/// A Rust type with a registered schema and a [`Value`] representation.
pub trait MapValue: Sized {
    /// Registered type name, registering the schema on first use.
    fn type_name(types: &TypeRegistry) -> Result<TypeName>;

    /// Convert into a dynamic value.
    fn to_value(&self, types: &TypeRegistry) -> Result<Value>;

    /// Rebuild from a dynamic value.
    fn from_value(value: &Value, types: &TypeRegistry) -> Result<Self>;
}

pub(crate) fn mismatch(expected: impl Into<String>, value: &Value) -> MapError {
    MapError::TypeMismatch {
        expected: expected.into(),
        got: value.type_label(),
    }
}

macro_rules! impl_map_value_scalar {
    ($($ty:ty => $variant:ident, $kind:ident;)*) => {
        $(
            impl MapValue for $ty {
                fn type_name(_types: &TypeRegistry) -> Result<TypeName> {
                    Ok(TypeName::new(PrimitiveKind::$kind.type_name()))
                }

                fn to_value(&self, _types: &TypeRegistry) -> Result<Value> {
                    Ok(Value::$variant(*self))
                }

                fn from_value(value: &Value, _types: &TypeRegistry) -> Result<Self> {
                    match value {
                        Value::$variant(v) => Ok(*v),
                        other => Err(mismatch(PrimitiveKind::$kind.type_name(), other)),
                    }
                }
            }
        )*
    };
}

impl_map_value_scalar! {
    bool => Bool, Bool;
    i8 => I8, I8;
    i16 => I16, I16;
    i32 => I32, I32;
    i64 => I64, I64;
    u8 => U8, U8;
    u16 => U16, U16;
    u32 => U32, U32;
    u64 => U64, U64;
    f32 => F32, F32;
    f64 => F64, F64;
    char => Char, Char;
    NaiveDateTime => DateTime, DateTime;
    TimeDelta => TimeSpan, TimeSpan;
    Uuid => Guid, Guid;
}

/// `Null` reads back as the empty string.
impl MapValue for String {
    fn type_name(_types: &TypeRegistry) -> Result<TypeName> {
        Ok(TypeName::new(STRING))
    }

    fn to_value(&self, _types: &TypeRegistry) -> Result<Value> {
        Ok(Value::from(self.as_str()))
    }

    fn from_value(value: &Value, _types: &TypeRegistry) -> Result<Self> {
        match value {
            Value::Null => Ok(String::new()),
            Value::String(s) => Ok(s.to_string()),
            other => Err(mismatch(STRING, other)),
        }
    }
}

/// Nullable wrapper for value types, plain nullability for the rest.
impl<T: MapValue> MapValue for Option<T> {
    fn type_name(types: &TypeRegistry) -> Result<TypeName> {
        let inner = T::type_name(types)?;
        if types.is_value_type(&inner) {
            types.nullable_of(&inner)
        } else {
            Ok(inner)
        }
    }

    fn to_value(&self, types: &TypeRegistry) -> Result<Value> {
        match self {
            Some(v) => v.to_value(types),
            None => Ok(Value::Null),
        }
    }

    fn from_value(value: &Value, types: &TypeRegistry) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other, types).map(Some),
        }
    }
}

impl<T: MapValue> MapValue for Box<T> {
    fn type_name(types: &TypeRegistry) -> Result<TypeName> {
        T::type_name(types)
    }

    fn to_value(&self, types: &TypeRegistry) -> Result<Value> {
        (**self).to_value(types)
    }

    fn from_value(value: &Value, types: &TypeRegistry) -> Result<Self> {
        T::from_value(value, types).map(Box::new)
    }
}

/// List-shaped collection. `Null` reads back as an empty vector.
impl<T: MapValue> MapValue for Vec<T> {
    fn type_name(types: &TypeRegistry) -> Result<TypeName> {
        let element = T::type_name(types)?;
        Ok(types.list_of(&element))
    }

    fn to_value(&self, types: &TypeRegistry) -> Result<Value> {
        let type_name = Self::type_name(types)?;
        let items = self
            .iter()
            .map(|item| item.to_value(types))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::Collection(CollectionRef::new(type_name, items)))
    }

    fn from_value(value: &Value, types: &TypeRegistry) -> Result<Self> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::Collection(c) => c
                .read()
                .items()
                .iter()
                .map(|item| T::from_value(item, types))
                .collect(),
            other => Err(mismatch("collection", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_bridge() {
        let types = TypeRegistry::new();
        assert_eq!(i32::type_name(&types).expect("name"), "i32");
        assert_eq!(42i32.to_value(&types).expect("value"), Value::I32(42));
        assert_eq!(u8::from_value(&Value::U8(7), &types).expect("u8"), 7);
        assert!(i32::from_value(&Value::I64(1), &types).is_err());
        assert!(bool::from_value(&Value::Null, &types).is_err());
    }

    #[test]
    fn test_string_and_option() {
        let types = TypeRegistry::new();
        assert_eq!(String::from_value(&Value::Null, &types).expect("null"), "");
        assert_eq!(
            Option::<i32>::type_name(&types).expect("nullable"),
            "i32?"
        );
        assert_eq!(Option::<String>::type_name(&types).expect("string"), "string");
        assert_eq!(None::<i32>.to_value(&types).expect("none"), Value::Null);
        assert_eq!(
            Option::<i32>::from_value(&Value::I32(3), &types).expect("some"),
            Some(3)
        );
    }

    #[test]
    fn test_vec_bridge() {
        let types = TypeRegistry::new();
        let value = vec![1i64, 2, 3].to_value(&types).expect("vec");
        let collection = value.as_collection().expect("collection");
        assert_eq!(collection.type_name(), "List<i64>");
        assert_eq!(
            Vec::<i64>::from_value(&value, &types).expect("back"),
            vec![1, 2, 3]
        );
        assert!(Vec::<i64>::from_value(&Value::Null, &types)
            .expect("null")
            .is_empty());
    }
}
