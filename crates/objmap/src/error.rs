// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error type shared by every objmap operation.
//!
//! Configuration errors surface when a mapping is declared, construction and
//! shape errors when a plan is compiled, conversion errors while a plan runs.
//! None of them is recoverable for the type pair involved: the whole `map`
//! call fails and no partially populated object is returned.

use crate::types::TypeName;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MapError>;

/// Mapping errors.
#[derive(Debug, Error)]
pub enum MapError {
    /// A field selector or configured type pair is invalid.
    #[error("invalid configuration for {source_type} -> {dest_type}: {reason}")]
    Configuration {
        source_type: TypeName,
        dest_type: TypeName,
        reason: String,
    },

    /// A destination (nested or element) type cannot be default-constructed.
    #[error("cannot construct {type_name}: {reason}")]
    Construction { type_name: TypeName, reason: String },

    /// A value could not be converted at execution time.
    #[error("cannot convert {from} to {to}: {reason}")]
    ConversionFailed {
        from: String,
        to: TypeName,
        reason: String,
    },

    /// The required collection shape cannot be determined or produced.
    #[error("collection shape error for {type_name}: {reason}")]
    Shape { type_name: TypeName, reason: String },

    /// A referenced type is not registered.
    #[error("unknown type: {0}")]
    UnknownType(TypeName),

    /// Dynamic field access on an object that does not declare the field.
    #[error("field not found: {type_name}.{field}")]
    FieldNotFound { type_name: TypeName, field: String },

    /// A value does not conform to the type it is used as.
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    /// Failure reported by a user override or after-mapping callback.
    #[error("callback failed: {0}")]
    Callback(String),
}

impl MapError {
    pub(crate) fn configuration(
        source_type: &TypeName,
        dest_type: &TypeName,
        reason: impl Into<String>,
    ) -> Self {
        Self::Configuration {
            source_type: source_type.clone(),
            dest_type: dest_type.clone(),
            reason: reason.into(),
        }
    }

    pub(crate) fn construction(type_name: &TypeName, reason: impl Into<String>) -> Self {
        Self::Construction {
            type_name: type_name.clone(),
            reason: reason.into(),
        }
    }

    pub(crate) fn conversion(
        from: impl Into<String>,
        to: &TypeName,
        reason: impl Into<String>,
    ) -> Self {
        Self::ConversionFailed {
            from: from.into(),
            to: to.clone(),
            reason: reason.into(),
        }
    }

    pub(crate) fn shape(type_name: &TypeName, reason: impl Into<String>) -> Self {
        Self::Shape {
            type_name: type_name.clone(),
            reason: reason.into(),
        }
    }

    /// True for errors raised while compiling a plan (never cached).
    pub fn is_compile_error(&self) -> bool {
        matches!(
            self,
            Self::Construction { .. } | Self::Shape { .. } | Self::UnknownType(_)
        )
    }
}
