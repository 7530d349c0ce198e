// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Process-wide mapper.
//!
//! The free functions delegate to one lazily created [`Mapper`] with default
//! settings. Tests that touch it should call [`reset_all`] first.

use crate::config::ConfigBuilder;
use crate::error::Result;
use crate::mapper::Mapper;
use crate::types::{TypeDescriptor, TypeName};
use crate::value::Value;
use std::sync::OnceLock;

static GLOBAL_MAPPER: OnceLock<Mapper> = OnceLock::new();

/// Global mapper (created on first use).
pub fn global() -> &'static Mapper {
    GLOBAL_MAPPER.get_or_init(|| {
        log::debug!("[mapper] global instance initialized");
        Mapper::new()
    })
}

/// Register a type with the global mapper.
pub fn register(descriptor: TypeDescriptor) -> Result<TypeName> {
    global().register(descriptor)
}

/// Declare a pair configuration on the global mapper.
pub fn configure(
    source: impl Into<TypeName>,
    dest: impl Into<TypeName>,
) -> Result<ConfigBuilder<'static>> {
    global().configure(source, dest)
}

/// Map an instance with the global mapper.
pub fn map(source: &Value, dest: impl Into<TypeName>) -> Result<Value> {
    global().map(source, dest)
}

/// Map an instance as the given source type with the global mapper.
pub fn map_as(
    source: &Value,
    source_type: impl Into<TypeName>,
    dest: impl Into<TypeName>,
) -> Result<Value> {
    global().map_as(source, source_type, dest)
}

/// Map a collection with the global mapper.
pub fn map_collection(source: &Value, dest: impl Into<TypeName>) -> Result<Vec<Value>> {
    global().map_collection(source, dest)
}

/// Reset configurations, cached plans and the default depth.
pub fn reset_all() {
    global().reset_all();
}

/// Change the global default depth limit.
pub fn set_default_max_depth(depth: usize) {
    global().set_default_max_depth(depth);
}
