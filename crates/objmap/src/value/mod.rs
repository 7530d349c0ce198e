// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic instance representation.
//!
//! A [`Value`] is either a value-type scalar, text, or a shared handle to an
//! object or collection. Cloning a handle copies the reference, never the
//! referenced instance, so graphs (including cyclic ones) keep their
//! identity when values move between fields.

mod convert;
mod object;

pub(crate) use convert::{coerce_nullable, convert, enum_from_integral, enum_from_string, stringify};
pub use convert::{parse_datetime, ConvertTarget};
pub use object::{Collection, CollectionRef, Object, ObjectRef};

use crate::types::{EnumDescriptor, PrimitiveKind, TypeName};
use chrono::{NaiveDateTime, TimeDelta};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Enum instance: the numeric value plus the member name when it is defined.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    /// Enum type.
    pub type_name: TypeName,
    /// Numeric value (not validated against the members).
    pub value: i64,
    /// Member name, `None` for undefined values.
    pub name: Option<Arc<str>>,
}

impl EnumValue {
    /// Create an enum value, resolving the member name from the descriptor.
    pub fn new(type_name: TypeName, descriptor: &EnumDescriptor, value: i64) -> Self {
        let name = descriptor
            .variant_by_value(value)
            .map(|v| Arc::from(v.name.as_str()));
        Self {
            type_name,
            value,
            name,
        }
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.value),
        }
    }
}

/// A dynamic value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    // Special
    Null,

    // Primitives
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Char(char),
    DateTime(NaiveDateTime),
    TimeSpan(TimeDelta),
    Guid(Uuid),

    // Reference and named types
    String(Arc<str>),
    Enum(EnumValue),
    Object(ObjectRef),
    Collection(CollectionRef),
}

impl Value {
    /// Default value of a primitive kind.
    pub fn zero(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Bool => Self::Bool(false),
            PrimitiveKind::I8 => Self::I8(0),
            PrimitiveKind::I16 => Self::I16(0),
            PrimitiveKind::I32 => Self::I32(0),
            PrimitiveKind::I64 => Self::I64(0),
            PrimitiveKind::U8 => Self::U8(0),
            PrimitiveKind::U16 => Self::U16(0),
            PrimitiveKind::U32 => Self::U32(0),
            PrimitiveKind::U64 => Self::U64(0),
            PrimitiveKind::F32 => Self::F32(0.0),
            PrimitiveKind::F64 => Self::F64(0.0),
            PrimitiveKind::Char => Self::Char('\0'),
            PrimitiveKind::DateTime => Self::DateTime(NaiveDateTime::default()),
            PrimitiveKind::TimeSpan => Self::TimeSpan(TimeDelta::zero()),
            PrimitiveKind::Guid => Self::Guid(Uuid::nil()),
        }
    }

    /// Check if value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Primitive kind of a primitive value.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        Some(match self {
            Self::Bool(_) => PrimitiveKind::Bool,
            Self::I8(_) => PrimitiveKind::I8,
            Self::I16(_) => PrimitiveKind::I16,
            Self::I32(_) => PrimitiveKind::I32,
            Self::I64(_) => PrimitiveKind::I64,
            Self::U8(_) => PrimitiveKind::U8,
            Self::U16(_) => PrimitiveKind::U16,
            Self::U32(_) => PrimitiveKind::U32,
            Self::U64(_) => PrimitiveKind::U64,
            Self::F32(_) => PrimitiveKind::F32,
            Self::F64(_) => PrimitiveKind::F64,
            Self::Char(_) => PrimitiveKind::Char,
            Self::DateTime(_) => PrimitiveKind::DateTime,
            Self::TimeSpan(_) => PrimitiveKind::TimeSpan,
            Self::Guid(_) => PrimitiveKind::Guid,
            _ => return None,
        })
    }

    /// Runtime type of the value; `None` for `Null`.
    pub fn runtime_type(&self) -> Option<TypeName> {
        match self {
            Self::Null => None,
            Self::String(_) => Some(TypeName::new(crate::types::STRING)),
            Self::Enum(e) => Some(e.type_name.clone()),
            Self::Object(o) => Some(o.type_name()),
            Self::Collection(c) => Some(c.type_name()),
            other => other
                .primitive_kind()
                .map(|k| TypeName::new(k.type_name())),
        }
    }

    /// Short description used in error messages.
    pub fn type_label(&self) -> String {
        self.runtime_type()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "null".to_string())
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Integral value of any integer width.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Self::I8(v) => Some((*v).into()),
            Self::I16(v) => Some((*v).into()),
            Self::I32(v) => Some((*v).into()),
            Self::I64(v) => Some((*v).into()),
            Self::U8(v) => Some((*v).into()),
            Self::U16(v) => Some((*v).into()),
            Self::U32(v) => Some((*v).into()),
            Self::U64(v) => Some((*v).into()),
            _ => None,
        }
    }

    /// Integral value as i64, when it fits.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_i128().and_then(|v| i64::try_from(v).ok())
    }

    /// Numeric value as f64 (integers and floats).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F32(v) => Some((*v).into()),
            Self::F64(v) => Some(*v),
            other => other.as_i128().map(|v| v as f64),
        }
    }

    /// Try to get as string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(&**s),
            _ => None,
        }
    }

    /// Try to get as enum value.
    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            Self::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Try to get as object handle.
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Try to get as collection handle.
    pub fn as_collection(&self) -> Option<&CollectionRef> {
        match self {
            Self::Collection(c) => Some(c),
            _ => None,
        }
    }

    /// Structural equality that follows object and collection handles.
    ///
    /// Cyclic graphs are compared once per pair of handles.
    pub fn deep_eq(&self, other: &Value) -> bool {
        let mut visited = HashSet::new();
        deep_eq_inner(self, other, &mut visited)
    }
}

fn deep_eq_inner(a: &Value, b: &Value, visited: &mut HashSet<(usize, usize)>) -> bool {
    match (a, b) {
        (Value::Object(x), Value::Object(y)) => {
            if !visited.insert((x.addr(), y.addr())) {
                return true;
            }
            let (xs, ys) = (x.snapshot(), y.snapshot());
            x.type_name() == y.type_name()
                && xs.len() == ys.len()
                && xs
                    .iter()
                    .zip(ys.iter())
                    .all(|(l, r)| deep_eq_inner(l, r, visited))
        }
        (Value::Collection(x), Value::Collection(y)) => {
            if !visited.insert((x.addr(), y.addr())) {
                return true;
            }
            let (xs, ys) = (x.items(), y.items());
            xs.len() == ys.len()
                && xs
                    .iter()
                    .zip(ys.iter())
                    .all(|(l, r)| deep_eq_inner(l, r, visited))
        }
        _ => a == b,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(v) => write!(f, "{}", v),
            Self::I8(v) => write!(f, "{}", v),
            Self::I16(v) => write!(f, "{}", v),
            Self::I32(v) => write!(f, "{}", v),
            Self::I64(v) => write!(f, "{}", v),
            Self::U8(v) => write!(f, "{}", v),
            Self::U16(v) => write!(f, "{}", v),
            Self::U32(v) => write!(f, "{}", v),
            Self::U64(v) => write!(f, "{}", v),
            Self::F32(v) => write!(f, "{}", v),
            Self::F64(v) => write!(f, "{}", v),
            Self::Char(v) => write!(f, "{}", v),
            Self::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
            Self::TimeSpan(v) => fmt_timespan(v, f),
            Self::Guid(v) => write!(f, "{}", v.hyphenated()),
            Self::String(s) => f.write_str(s),
            Self::Enum(e) => write!(f, "{}", e),
            Self::Object(o) => write!(f, "{}", o.type_name()),
            Self::Collection(c) => write!(f, "{}", c.type_name()),
        }
    }
}

/// `[-][d.]hh:mm:ss[.fffffff]`
fn fmt_timespan(span: &TimeDelta, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if *span < TimeDelta::zero() {
        f.write_str("-")?;
    }
    let abs = span.abs();
    let total = abs.num_seconds();
    let days = total / 86_400;
    if days > 0 {
        write!(f, "{}.", days)?;
    }
    write!(
        f,
        "{:02}:{:02}:{:02}",
        (total % 86_400) / 3_600,
        (total % 3_600) / 60,
        total % 60
    )?;
    let ticks = abs.subsec_nanos() / 100;
    if ticks > 0 {
        write!(f, ".{:07}", ticks)?;
    }
    Ok(())
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    char => Char,
    NaiveDateTime => DateTime,
    TimeDelta => TimeSpan,
    Uuid => Guid,
    Arc<str> => String,
    EnumValue => Enum,
    ObjectRef => Object,
    CollectionRef => Collection,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(Arc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(Arc::from(v))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EnumVariant;

    #[test]
    fn test_display_scalars() {
        assert_eq!(Value::I32(42).to_string(), "42");
        assert_eq!(Value::F64(2.5).to_string(), "2.5");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::from("abc").to_string(), "abc");
    }

    #[test]
    fn test_display_timespan() {
        let span = TimeDelta::hours(26) + TimeDelta::minutes(3) + TimeDelta::seconds(4);
        assert_eq!(Value::TimeSpan(span).to_string(), "1.02:03:04");
        assert_eq!(Value::TimeSpan(TimeDelta::minutes(-90)).to_string(), "-01:30:00");
        assert_eq!(
            Value::TimeSpan(TimeDelta::milliseconds(1500)).to_string(),
            "00:00:01.5000000"
        );
    }

    #[test]
    fn test_enum_value_display() {
        let desc = EnumDescriptor::new(vec![
            EnumVariant::new("Finance", 0),
            EnumVariant::new("IT", 1),
        ]);
        let it = EnumValue::new(TypeName::new("Departments"), &desc, 1);
        assert_eq!(Value::Enum(it).to_string(), "IT");
        let undefined = EnumValue::new(TypeName::new("Departments"), &desc, 7);
        assert_eq!(undefined.name, None);
        assert_eq!(Value::Enum(undefined).to_string(), "7");
    }

    #[test]
    fn test_runtime_type() {
        assert_eq!(Value::U16(1).runtime_type(), Some(TypeName::new("u16")));
        assert_eq!(Value::from("x").runtime_type(), Some(TypeName::new("string")));
        assert_eq!(Value::Null.runtime_type(), None);
        assert_eq!(Value::Null.type_label(), "null");
    }

    #[test]
    fn test_numeric_accessors() {
        assert_eq!(Value::U64(u64::MAX).as_i128(), Some(i128::from(u64::MAX)));
        assert_eq!(Value::U64(u64::MAX).as_i64(), None);
        assert_eq!(Value::I8(-3).as_f64(), Some(-3.0));
        assert_eq!(Value::from(Some(5i32)), Value::I32(5));
        assert_eq!(Value::from(None::<i32>), Value::Null);
    }
}
