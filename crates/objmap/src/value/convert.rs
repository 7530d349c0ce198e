// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Execution-time value conversions.
//!
//! Conversions between primitives are checked: integer narrowing fails on
//! overflow, floats round half to even when converted to integers, and text
//! is parsed after trimming. Enum targets never validate the numeric value.

use super::{EnumValue, Value};
use crate::error::{MapError, Result};
use crate::types::{EnumDescriptor, PrimitiveKind, TypeDescriptor, TypeKind, TypeName, TypeRegistry};
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;
use uuid::Uuid;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

const NULL_INTO_VALUE_TYPE: &str = "null cannot be assigned to a non-nullable value type";

/// Resolved destination of a generic conversion.
#[derive(Debug, Clone)]
pub struct ConvertTarget {
    pub(crate) type_name: TypeName,
    pub(crate) nullable: bool,
    pub(crate) kind: TargetKind,
}

#[derive(Debug, Clone)]
pub(crate) enum TargetKind {
    Primitive(PrimitiveKind),
    String,
    Enum(Arc<TypeDescriptor>),
    Any,
    Unsupported,
}

impl ConvertTarget {
    /// Resolve the conversion target for a declared destination type.
    pub(crate) fn resolve(types: &TypeRegistry, type_name: &TypeName) -> Result<Self> {
        let desc = types.get(type_name)?;
        let wrapped = match &desc.kind {
            TypeKind::Nullable(inner) => Some(inner.clone()),
            _ => None,
        };
        let (nullable, inner) = match wrapped {
            Some(inner) => (true, types.get(&inner)?),
            None => (false, desc),
        };
        let kind = match &inner.kind {
            TypeKind::Primitive(k) => TargetKind::Primitive(*k),
            TypeKind::String => TargetKind::String,
            TypeKind::Enum(_) => TargetKind::Enum(Arc::clone(&inner)),
            TypeKind::Any => TargetKind::Any,
            _ => TargetKind::Unsupported,
        };
        Ok(Self {
            type_name: type_name.clone(),
            nullable,
            kind,
        })
    }

    /// Declared destination type.
    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }
}

/// Generic conversion to a primitive, text, enum or `object` target.
pub(crate) fn convert(value: &Value, target: &ConvertTarget) -> Result<Value> {
    if value.is_null() {
        return match target.kind {
            _ if target.nullable => Ok(Value::Null),
            TargetKind::String | TargetKind::Any => Ok(Value::Null),
            _ => Err(MapError::conversion(
                "null",
                &target.type_name,
                NULL_INTO_VALUE_TYPE,
            )),
        };
    }

    match &target.kind {
        TargetKind::Any => Ok(value.clone()),
        TargetKind::String => Ok(stringify(value, false)),
        TargetKind::Enum(desc) => match (value, desc.as_enum()) {
            (Value::String(_), Some(e)) => enum_from_string(value, &desc.name, e),
            (_, Some(e)) => enum_from_integral(value, &desc.name, e),
            (_, None) => Err(MapError::UnknownType(desc.name.clone())),
        },
        TargetKind::Primitive(kind) => to_primitive(value, *kind)
            .map_err(|reason| MapError::conversion(value.type_label(), &target.type_name, reason)),
        TargetKind::Unsupported => Err(MapError::conversion(
            value.type_label(),
            &target.type_name,
            "no value conversion to a non-primitive type",
        )),
    }
}

/// Pass a value between a value type and its nullable wrapper.
pub(crate) fn coerce_nullable(value: &Value, target: &TypeName, nullable: bool) -> Result<Value> {
    if value.is_null() && !nullable {
        return Err(MapError::conversion("null", target, NULL_INTO_VALUE_TYPE));
    }
    Ok(value.clone())
}

/// Textual representation.
///
/// A `Null` from a reference source stays `Null`; from a nullable value
/// source it renders as the empty string.
pub(crate) fn stringify(value: &Value, value_source: bool) -> Value {
    match value {
        Value::Null if !value_source => Value::Null,
        Value::String(s) => Value::String(Arc::clone(s)),
        other => Value::from(other.to_string()),
    }
}

/// Parse an enum member from text: name (any case), number, or a
/// comma-separated list of either, combined with bitwise OR. `Null` and
/// empty text give value 0.
pub(crate) fn enum_from_string(
    value: &Value,
    type_name: &TypeName,
    desc: &EnumDescriptor,
) -> Result<Value> {
    let text = match value {
        Value::Null => "",
        Value::String(s) => s.trim(),
        other => {
            return Err(MapError::conversion(
                other.type_label(),
                type_name,
                "expected text",
            ))
        }
    };
    if text.is_empty() {
        return Ok(Value::Enum(EnumValue::new(type_name.clone(), desc, 0)));
    }

    let mut combined = 0i64;
    for part in text.split(',') {
        let part = part.trim();
        let member = match desc.variant_ignore_case(part) {
            Some(variant) => variant.value,
            None => part.parse::<i64>().map_err(|_| {
                MapError::conversion(
                    "string",
                    type_name,
                    format!("'{}' is not a member of {}", part, type_name),
                )
            })?,
        };
        combined |= member;
    }
    Ok(Value::Enum(EnumValue::new(type_name.clone(), desc, combined)))
}

/// Reinterpret an integral, enum, bool or char value as an enum value.
pub(crate) fn enum_from_integral(
    value: &Value,
    type_name: &TypeName,
    desc: &EnumDescriptor,
) -> Result<Value> {
    let raw = match value {
        Value::Null => {
            return Err(MapError::conversion("null", type_name, NULL_INTO_VALUE_TYPE));
        }
        Value::Enum(e) => e.value,
        Value::Bool(b) => i64::from(*b),
        Value::Char(c) => i64::from(u32::from(*c)),
        other => match other.as_i128() {
            // Wide unsigned values keep their bit pattern.
            Some(v) => v as i64,
            None => {
                return Err(MapError::conversion(
                    other.type_label(),
                    type_name,
                    "not an integral value",
                ))
            }
        },
    };
    Ok(Value::Enum(EnumValue::new(type_name.clone(), desc, raw)))
}

/// Parse a date-time in one of the accepted layouts.
///
/// Accepted: `2016-12-25 17:00:00`, `2016-12-25T17:00:00` (both with
/// optional fraction), `12/25/2016 5:00 PM`, and the date-only forms
/// `2016-12-25` and `12/25/2016`.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn to_primitive(value: &Value, kind: PrimitiveKind) -> std::result::Result<Value, String> {
    match kind {
        PrimitiveKind::I8 => integral_of(value).and_then(|n| narrow(n, kind, i8::try_from, Value::I8)),
        PrimitiveKind::I16 => {
            integral_of(value).and_then(|n| narrow(n, kind, i16::try_from, Value::I16))
        }
        PrimitiveKind::I32 => {
            integral_of(value).and_then(|n| narrow(n, kind, i32::try_from, Value::I32))
        }
        PrimitiveKind::I64 => {
            integral_of(value).and_then(|n| narrow(n, kind, i64::try_from, Value::I64))
        }
        PrimitiveKind::U8 => integral_of(value).and_then(|n| narrow(n, kind, u8::try_from, Value::U8)),
        PrimitiveKind::U16 => {
            integral_of(value).and_then(|n| narrow(n, kind, u16::try_from, Value::U16))
        }
        PrimitiveKind::U32 => {
            integral_of(value).and_then(|n| narrow(n, kind, u32::try_from, Value::U32))
        }
        PrimitiveKind::U64 => {
            integral_of(value).and_then(|n| narrow(n, kind, u64::try_from, Value::U64))
        }
        PrimitiveKind::F32 => float_of(value).map(|f| Value::F32(f as f32)),
        PrimitiveKind::F64 => float_of(value).map(Value::F64),
        PrimitiveKind::Bool => bool_of(value).map(Value::Bool),
        PrimitiveKind::Char => char_of(value).map(Value::Char),
        PrimitiveKind::DateTime => match value {
            Value::DateTime(d) => Ok(Value::DateTime(*d)),
            Value::String(s) => parse_datetime(s)
                .map(Value::DateTime)
                .ok_or_else(|| format!("'{}' is not a recognized date-time", s)),
            _ => Err(unsupported(value)),
        },
        PrimitiveKind::TimeSpan => match value {
            Value::TimeSpan(t) => Ok(Value::TimeSpan(*t)),
            _ => Err(unsupported(value)),
        },
        PrimitiveKind::Guid => match value {
            Value::Guid(g) => Ok(Value::Guid(*g)),
            Value::String(s) => Uuid::parse_str(s.trim())
                .map(Value::Guid)
                .map_err(|e| e.to_string()),
            _ => Err(unsupported(value)),
        },
    }
}

fn narrow<T, E>(
    n: i128,
    kind: PrimitiveKind,
    try_from: fn(i128) -> std::result::Result<T, E>,
    wrap: fn(T) -> Value,
) -> std::result::Result<Value, String> {
    try_from(n)
        .map(wrap)
        .map_err(|_| format!("{} is out of range for {}", n, kind.type_name()))
}

fn integral_of(value: &Value) -> std::result::Result<i128, String> {
    if let Some(n) = value.as_i128() {
        return Ok(n);
    }
    match value {
        Value::F32(_) | Value::F64(_) => {
            let f = value.as_f64().unwrap_or(f64::NAN);
            if !f.is_finite() {
                return Err(format!("{} has no integral value", f));
            }
            // Saturating cast; the caller's range check rejects the extremes.
            Ok(f.round_ties_even() as i128)
        }
        Value::Bool(b) => Ok(i128::from(*b)),
        Value::Char(c) => Ok(i128::from(u32::from(*c))),
        Value::Enum(e) => Ok(i128::from(e.value)),
        Value::String(s) => s
            .trim()
            .parse::<i128>()
            .map_err(|_| format!("'{}' is not an integer", s)),
        _ => Err(unsupported(value)),
    }
}

fn float_of(value: &Value) -> std::result::Result<f64, String> {
    if let Some(f) = value.as_f64() {
        return Ok(f);
    }
    match value {
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Enum(e) => Ok(e.value as f64),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("'{}' is not a number", s)),
        _ => Err(unsupported(value)),
    }
}

fn bool_of(value: &Value) -> std::result::Result<bool, String> {
    if let Some(f) = value.as_f64() {
        return Ok(f != 0.0);
    }
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => {
            let s = s.trim();
            if s.eq_ignore_ascii_case("true") {
                Ok(true)
            } else if s.eq_ignore_ascii_case("false") {
                Ok(false)
            } else {
                Err(format!("'{}' is not a boolean", s))
            }
        }
        _ => Err(unsupported(value)),
    }
}

fn char_of(value: &Value) -> std::result::Result<char, String> {
    if let Some(n) = value.as_i128() {
        return u32::try_from(n)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| format!("{} is not a valid char", n));
    }
    match value {
        Value::Char(c) => Ok(*c),
        Value::String(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(format!("'{}' is not a single character", s)),
            }
        }
        _ => Err(unsupported(value)),
    }
}

fn unsupported(value: &Value) -> String {
    format!("unsupported source value of type {}", value.type_label())
}
