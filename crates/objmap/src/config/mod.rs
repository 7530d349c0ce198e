// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per type-pair mapping configuration.
//!
//! A [`MappingConfig`] records, for one exact (source, destination) pair,
//! the destination fields to ignore, per-field override functions,
//! after-mapping callbacks and an optional depth limit. Configs live in a
//! [`ConfigRegistry`] and are declared through a [`ConfigBuilder`].

mod builder;
mod registry;

pub use builder::ConfigBuilder;
pub use registry::ConfigRegistry;

use crate::error::Result;
use crate::types::TypeName;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Computes a destination field value from the source instance.
pub type OverrideFn = Arc<dyn Fn(&Value) -> Result<Value> + Send + Sync>;

/// Runs after all field assignments with `(source, destination)`.
pub type AfterMappingFn = Arc<dyn Fn(&Value, &Value) -> Result<()> + Send + Sync>;

/// Dotted member chain relative to a destination type, e.g. `Address.City`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Split a selector into segments; `None` if any segment is empty.
    pub fn parse(selector: &str) -> Option<Self> {
        let segments: Vec<String> = selector.split('.').map(str::to_string).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return None;
        }
        Some(Self(segments))
    }

    /// Path segments.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// First segment.
    pub fn head(&self) -> &str {
        &self.0[0]
    }

    /// True for a direct member.
    pub fn is_direct(&self) -> bool {
        self.0.len() == 1
    }

    /// The path below the first segment, if any.
    pub fn tail(&self) -> Option<FieldPath> {
        (self.0.len() > 1).then(|| Self(self.0[1..].to_vec()))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// Mapping declarations for one exact (source, destination) pair.
#[derive(Clone)]
pub struct MappingConfig {
    source: TypeName,
    dest: TypeName,
    sequence: u64,
    ignores: Vec<FieldPath>,
    overrides: Vec<(String, OverrideFn)>,
    after_mapping: Vec<AfterMappingFn>,
    max_depth: Option<usize>,
}

impl MappingConfig {
    pub(crate) fn new(source: TypeName, dest: TypeName, sequence: u64) -> Self {
        Self {
            source,
            dest,
            sequence,
            ignores: Vec::new(),
            overrides: Vec::new(),
            after_mapping: Vec::new(),
            max_depth: None,
        }
    }

    /// Source type.
    pub fn source(&self) -> &TypeName {
        &self.source
    }

    /// Destination type.
    pub fn dest(&self) -> &TypeName {
        &self.dest
    }

    /// Declaration order across the registry.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Depth limit set for this pair.
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// All ignore selectors, direct and scoped.
    pub fn ignores(&self) -> &[FieldPath] {
        &self.ignores
    }

    /// True if the destination field itself is ignored.
    pub fn is_ignored(&self, field: &str) -> bool {
        self.ignores
            .iter()
            .any(|p| p.is_direct() && p.head() == field)
    }

    /// Ignores that apply below `field`, relative to the field's type.
    pub fn scoped_ignores(&self, field: &str) -> Vec<FieldPath> {
        self.ignores
            .iter()
            .filter(|p| p.head() == field)
            .filter_map(FieldPath::tail)
            .collect()
    }

    /// Override declared for a destination field.
    pub fn override_for(&self, field: &str) -> Option<&OverrideFn> {
        self.overrides
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, f)| f)
    }

    /// True if an override is declared for the field.
    pub fn has_override(&self, field: &str) -> bool {
        self.override_for(field).is_some()
    }

    /// After-mapping callbacks in registration order.
    pub fn after_mapping(&self) -> &[AfterMappingFn] {
        &self.after_mapping
    }

    pub(crate) fn add_ignore(&mut self, path: FieldPath) {
        if !self.ignores.contains(&path) {
            self.ignores.push(path);
        }
    }

    pub(crate) fn set_override(&mut self, field: String, f: OverrideFn) {
        match self.overrides.iter_mut().find(|(name, _)| *name == field) {
            Some(existing) => existing.1 = f,
            None => self.overrides.push((field, f)),
        }
    }

    pub(crate) fn add_after_mapping(&mut self, f: AfterMappingFn) {
        self.after_mapping.push(f);
    }

    pub(crate) fn set_max_depth(&mut self, depth: usize) {
        self.max_depth = Some(depth);
    }
}

impl fmt::Debug for MappingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let overrides: Vec<&str> = self.overrides.iter().map(|(n, _)| n.as_str()).collect();
        f.debug_struct("MappingConfig")
            .field("source", &self.source)
            .field("dest", &self.dest)
            .field("sequence", &self.sequence)
            .field("ignores", &self.ignores)
            .field("overrides", &overrides)
            .field("after_mapping", &self.after_mapping.len())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_path_parse() {
        let p = FieldPath::parse("Address.City").expect("valid");
        assert_eq!(p.segments(), ["Address", "City"]);
        assert_eq!(p.head(), "Address");
        assert_eq!(p.tail().map(|t| t.to_string()), Some("City".to_string()));
        assert!(FieldPath::parse("").is_none());
        assert!(FieldPath::parse("Address.").is_none());
        assert!(FieldPath::parse(".City").is_none());
        assert!(FieldPath::parse("Name").expect("direct").is_direct());
    }

    #[test]
    fn test_ignores_direct_and_scoped() {
        let mut config = MappingConfig::new("Customer".into(), "CustomerDTO".into(), 1);
        config.add_ignore(FieldPath::parse("Name").expect("path"));
        config.add_ignore(FieldPath::parse("Address.City").expect("path"));
        config.add_ignore(FieldPath::parse("Address.City").expect("path"));

        assert!(config.is_ignored("Name"));
        assert!(!config.is_ignored("Address"));
        assert_eq!(config.ignores().len(), 2);
        let scoped = config.scoped_ignores("Address");
        assert_eq!(scoped, vec![FieldPath::parse("City").expect("path")]);
        assert!(config.scoped_ignores("Name").is_empty());
    }

    #[test]
    fn test_override_replaced_by_redeclaration() {
        let mut config = MappingConfig::new("A".into(), "B".into(), 1);
        config.set_override(
            "X".to_string(),
            Arc::new(|_: &Value| -> Result<Value> { Ok(Value::I32(1)) }),
        );
        config.set_override(
            "X".to_string(),
            Arc::new(|_: &Value| -> Result<Value> { Ok(Value::I32(2)) }),
        );
        let f = config.override_for("X").expect("override");
        assert_eq!(f(&Value::Null).expect("call"), Value::I32(2));
        assert!(!config.has_override("Y"));
        assert!(format!("{:?}", config).contains("\"X\""));
    }
}
