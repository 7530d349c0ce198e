// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent declaration of a type-pair configuration.

use super::{ConfigRegistry, FieldPath, MappingConfig};
use crate::error::{MapError, Result};
use crate::types::{TypeKind, TypeName, TypeRegistry};
use crate::value::Value;
use std::sync::Arc;

/// Builder returned by `configure(source, dest)`.
///
/// Every selector is validated against the destination schema when it is
/// declared, so a typo fails here rather than at the first `map`.
///
/// ```rust
/// use objmap::{Mapper, Value};
/// use objmap::types::ObjectBuilder;
///
/// let mapper = Mapper::new();
/// mapper.register(ObjectBuilder::new("Person").field("Name", "string").field("Surname", "string").build())?;
/// mapper.register(ObjectBuilder::new("PersonDto").field("FullName", "string").field("Name", "string").build())?;
///
/// mapper
///     .configure("Person", "PersonDto")?
///     .ignore("Name")?
///     .map_property("FullName", |src: &Value| {
///         let src = src.as_object().ok_or_else(|| objmap::MapError::Callback("no source".into()))?;
///         Ok(Value::from(format!("{} {}", src.get("Name")?, src.get("Surname")?)))
///     })?;
/// # Ok::<(), objmap::MapError>(())
/// ```
pub struct ConfigBuilder<'a> {
    types: &'a TypeRegistry,
    configs: &'a ConfigRegistry,
    source: TypeName,
    dest: TypeName,
}

impl<'a> ConfigBuilder<'a> {
    /// Declare (or re-declare) the pair; both types must be registered objects.
    pub(crate) fn declare(
        types: &'a TypeRegistry,
        configs: &'a ConfigRegistry,
        source: TypeName,
        dest: TypeName,
    ) -> Result<Self> {
        for name in [&source, &dest] {
            match types.get(name) {
                Ok(desc) if desc.is_object() => {}
                Ok(_) => {
                    return Err(MapError::configuration(
                        &source,
                        &dest,
                        format!("{} is not an object type", name),
                    ))
                }
                Err(_) => {
                    return Err(MapError::configuration(
                        &source,
                        &dest,
                        format!("{} is not registered", name),
                    ))
                }
            }
        }
        configs.declare(&source, &dest);
        Ok(Self {
            types,
            configs,
            source,
            dest,
        })
    }

    /// Configured source type.
    pub fn source(&self) -> &TypeName {
        &self.source
    }

    /// Configured destination type.
    pub fn dest(&self) -> &TypeName {
        &self.dest
    }

    /// Leave a destination field at its default value.
    ///
    /// A dotted selector (`"Address.City"`) ignores the member of the nested
    /// object, or of each collection element, reached through the path.
    pub fn ignore(self, selector: &str) -> Result<Self> {
        let path = self.resolve(selector)?;
        log::debug!("[config] {} -> {}: ignore {}", self.source, self.dest, path);
        self.apply(|c| c.add_ignore(path))?;
        Ok(self)
    }

    /// Compute a destination field from the source instance instead of the
    /// same-named source field. Only direct members can be overridden.
    pub fn map_property<F>(self, field: &str, f: F) -> Result<Self>
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        let path = self.resolve(field)?;
        if !path.is_direct() {
            return Err(self.error(format!("'{}' is not a direct member", field)));
        }
        let writable = self
            .types
            .layout(&self.dest)
            .ok()
            .and_then(|layout| layout.field(field).map(|f| f.writable))
            .unwrap_or(false);
        if !writable {
            return Err(self.error(format!("'{}' is read-only on {}", field, self.dest)));
        }

        log::debug!("[config] {} -> {}: override {}", self.source, self.dest, field);
        let field = field.to_string();
        self.apply(move |c| c.set_override(field, Arc::new(f)))?;
        Ok(self)
    }

    /// Run a callback with `(source, destination)` after every top-level
    /// mapping of this pair.
    pub fn after_mapping<F>(self, f: F) -> Result<Self>
    where
        F: Fn(&Value, &Value) -> Result<()> + Send + Sync + 'static,
    {
        self.apply(move |c| c.add_after_mapping(Arc::new(f)))?;
        Ok(self)
    }

    /// Limit nested-object expansion when this pair is mapped at top level.
    pub fn set_depth(self, depth: usize) -> Result<Self> {
        log::debug!("[config] {} -> {}: depth {}", self.source, self.dest, depth);
        self.apply(move |c| c.set_max_depth(depth))?;
        Ok(self)
    }

    fn apply<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut MappingConfig),
    {
        if self.configs.update(&self.source, &self.dest, f) {
            Ok(())
        } else {
            Err(self.error("pair is no longer declared (registry was reset)"))
        }
    }

    fn resolve(&self, selector: &str) -> Result<FieldPath> {
        let path = FieldPath::parse(selector)
            .ok_or_else(|| self.error(format!("invalid field selector '{}'", selector)))?;

        let segments = path.segments();
        let mut current = self.dest.clone();
        for (i, segment) in segments.iter().enumerate() {
            let layout = self
                .types
                .layout(&current)
                .map_err(|e| self.error(e.to_string()))?;
            let field = layout.field(segment).ok_or_else(|| {
                self.error(format!("'{}' is not a member of {}", segment, current))
            })?;
            if i + 1 < segments.len() {
                current = self.member_object(&field.type_name).ok_or_else(|| {
                    self.error(format!(
                        "'{}' passes through non-object member '{}'",
                        selector, segment
                    ))
                })?;
            }
        }
        Ok(path)
    }

    /// Object type reached through a member: the member's own type or the
    /// element type of a collection member.
    fn member_object(&self, type_name: &TypeName) -> Option<TypeName> {
        let desc = self.types.get(type_name).ok()?;
        let target = match &desc.kind {
            TypeKind::Object(_) => desc.name.clone(),
            TypeKind::Collection(c) => c.element.clone(),
            _ => return None,
        };
        self.types
            .get(&target)
            .ok()
            .filter(|d| d.is_object())
            .map(|d| d.name.clone())
    }

    fn error(&self, reason: impl Into<String>) -> MapError {
        MapError::configuration(&self.source, &self.dest, reason)
    }
}

impl std::fmt::Debug for ConfigBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigBuilder")
            .field("source", &self.source)
            .field("dest", &self.dest)
            .finish()
    }
}
