// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Plan compiler.
//!
//! Walks the destination layout field by field, resolves each field against
//! the pair's configuration and picks a [`Conversion`] for the same-named
//! source field. Nested pairs are compiled recursively; the nesting depth is
//! threaded through the calls, so concurrent compilations never share it.
//! A level deeper than the stop depth yields an object without assignments,
//! which cuts cyclic graphs after a fixed number of levels.

use super::collection::compile_collection;
use super::{Conversion, EnumTarget, FieldAssignment, FieldSlot, MappingPlan, ValueSource};
use crate::config::{ConfigRegistry, FieldPath, MappingConfig, OverrideFn};
use crate::error::{MapError, Result};
use crate::types::{TypeDescriptor, TypeKind, TypeName, TypeRegistry};
use crate::value::ConvertTarget;
use std::collections::HashMap;
use std::sync::Arc;

type MemoKey = (TypeName, TypeName, usize);

/// Compile the plan for a top-level (source, destination) pair.
///
/// The stop depth is the pair's `set_depth` value, else `default_depth`.
/// After-mapping callbacks come from the exact config first, then from the
/// configs of the same source and an ancestor destination.
pub(crate) fn compile(
    types: &TypeRegistry,
    configs: &ConfigRegistry,
    source: &TypeName,
    dest: &TypeName,
    default_depth: usize,
) -> Result<Arc<MappingPlan>> {
    let generation = configs.generation();
    let exact = configs.exact(source, dest);
    let stop_depth = exact
        .as_ref()
        .and_then(|c| c.max_depth())
        .unwrap_or(default_depth);

    let mut compiler = Compiler {
        types,
        configs,
        generation,
        stop_depth,
        memo: HashMap::new(),
    };
    let mut plan = compiler.compile_object(source, dest, 0, &[])?;

    if let Some(config) = &exact {
        plan.after_mapping.extend(config.after_mapping().iter().cloned());
    }
    for config in configs.base_configs(source, dest, types) {
        plan.after_mapping
            .extend(config.after_mapping().iter().cloned());
    }

    log::debug!(
        "[plan] compiled {} -> {} ({} assignments, {} nested plans, stop depth {}, gen {})",
        source,
        dest,
        plan.assignments.len(),
        compiler.memo.len(),
        stop_depth,
        generation
    );
    Ok(Arc::new(plan))
}

pub(super) struct Compiler<'a> {
    pub(super) types: &'a TypeRegistry,
    configs: &'a ConfigRegistry,
    generation: u64,
    stop_depth: usize,
    memo: HashMap<MemoKey, Arc<MappingPlan>>,
}

impl Compiler<'_> {
    /// Plan for one object level. `depth` is the nesting depth of the caller;
    /// `scoped` holds ignore paths relative to `dest` inherited from the
    /// enclosing pair.
    fn compile_object(
        &mut self,
        source: &TypeName,
        dest: &TypeName,
        depth: usize,
        scoped: &[FieldPath],
    ) -> Result<MappingPlan> {
        if !self.types.is_constructible(dest) {
            return Err(MapError::construction(
                dest,
                "destination needs a parameterless constructor",
            ));
        }
        let layout = self.types.layout(dest)?;
        let level = depth + 1;

        let mut plan = MappingPlan {
            source: source.clone(),
            dest: dest.clone(),
            layout: Arc::clone(&layout),
            assignments: Vec::new(),
            after_mapping: Vec::new(),
            generation: self.generation,
            stop_depth: self.stop_depth,
        };

        if level > self.stop_depth {
            log::trace!(
                "[plan] {} -> {}: depth {} beyond {}, default instance",
                source,
                dest,
                level,
                self.stop_depth
            );
            return Ok(plan);
        }

        let source_layout = match self.types.get(source)?.kind {
            TypeKind::Object(_) => Some(self.types.layout(source)?),
            _ => None,
        };
        let exact = self.configs.exact(source, dest);
        let inherited = self.configs.inherited_configs(source, dest, self.types);

        for (index, field) in layout.fields().iter().enumerate() {
            if !field.writable {
                continue;
            }
            let ignored = exact.as_ref().is_some_and(|c| c.is_ignored(&field.name))
                || scoped
                    .iter()
                    .any(|p| p.is_direct() && p.head() == field.name);
            if ignored {
                log::trace!("[plan] {} -> {}: {} ignored", source, dest, field.name);
                continue;
            }

            let target = FieldSlot::new(index, &field.name);
            if let Some(f) = find_override(exact.as_deref(), &inherited, &field.name) {
                log::trace!("[plan] {} -> {}: {} overridden", source, dest, field.name);
                plan.assignments.push(FieldAssignment {
                    target,
                    source: ValueSource::CustomOverride(f),
                });
                continue;
            }

            let Some(source_layout) = &source_layout else {
                continue;
            };
            let Some(source_slot) = source_layout.slot(&field.name) else {
                continue;
            };
            let source_field = &source_layout.fields()[source_slot];
            if !source_field.readable {
                continue;
            }

            let mut child_scoped: Vec<FieldPath> = scoped
                .iter()
                .filter(|p| p.head() == field.name)
                .filter_map(FieldPath::tail)
                .collect();
            if let Some(config) = &exact {
                child_scoped.extend(config.scoped_ignores(&field.name));
            }

            let conversion = self.field_conversion(
                &source_field.type_name,
                &field.type_name,
                field.declaring_type.as_ref(),
                level,
                &child_scoped,
            )?;
            if !child_scoped.is_empty()
                && !matches!(
                    conversion,
                    Conversion::NestedObject(_) | Conversion::Collection(_)
                )
            {
                log::warn!(
                    "[plan] {} -> {}: nested ignores under {} have no effect ({})",
                    source,
                    dest,
                    field.name,
                    conversion.kind()
                );
            }
            log::trace!(
                "[plan] {} -> {}: {} via {}",
                source,
                dest,
                field.name,
                conversion.kind()
            );
            plan.assignments.push(FieldAssignment {
                target,
                source: ValueSource::Field {
                    slot: FieldSlot::new(source_slot, &source_field.name),
                    conversion,
                },
            });
        }
        Ok(plan)
    }

    /// Select the conversion between a source and a destination field type.
    ///
    /// `declaring` is the type that declares the destination field; `None`
    /// for collection elements.
    pub(super) fn field_conversion(
        &mut self,
        source: &TypeName,
        dest: &TypeName,
        declaring: Option<&TypeName>,
        depth: usize,
        scoped: &[FieldPath],
    ) -> Result<Conversion> {
        let source_desc = self.types.get(source)?;
        let dest_desc = self.types.get(dest)?;

        if source == dest {
            let shallow = dest_desc.is_value_type()
                || declaring == Some(dest)
                || !dest_desc.is_object()
                || !self.types.is_constructible(dest);
            if shallow {
                return Ok(Conversion::DirectCopy);
            }
            return self
                .nested_plan(source, dest, depth, scoped)
                .map(Conversion::NestedObject);
        }

        if matches!(dest_desc.kind, TypeKind::Any) {
            return Ok(Conversion::DirectCopy);
        }

        let unwrapped = self.types.underlying_value_type(dest);
        if self.types.underlying_value_type(source) == unwrapped
            && self.types.is_value_type(&unwrapped)
        {
            return Ok(Conversion::NumericCoerce {
                target: dest.clone(),
                nullable: matches!(dest_desc.kind, TypeKind::Nullable(_)),
            });
        }

        match &dest_desc.kind {
            TypeKind::String => {
                return Ok(Conversion::Stringify {
                    value_source: source_desc.is_value_type(),
                })
            }
            TypeKind::Collection(target) => {
                return compile_collection(self, &source_desc, &dest_desc, target, depth, scoped)
                    .map(Conversion::Collection)
            }
            TypeKind::Enum(e) => {
                let target = EnumTarget {
                    type_name: dest_desc.name.clone(),
                    descriptor: e.clone(),
                };
                match &source_desc.kind {
                    TypeKind::String => return Ok(Conversion::EnumFromString(target)),
                    TypeKind::Enum(_) => return Ok(Conversion::EnumFromIntegral(target)),
                    TypeKind::Primitive(k) if k.is_integral() => {
                        return Ok(Conversion::EnumFromIntegral(target))
                    }
                    _ => {}
                }
            }
            _ => {}
        }

        if self.is_convertible(&source_desc) {
            return ConvertTarget::resolve(self.types, dest).map(Conversion::Convert);
        }

        self.nested_plan(source, dest, depth, scoped)
            .map(Conversion::NestedObject)
    }

    /// Nested plan, shared between fields of the same pair and depth unless
    /// scoped ignores make it specific to one field.
    fn nested_plan(
        &mut self,
        source: &TypeName,
        dest: &TypeName,
        depth: usize,
        scoped: &[FieldPath],
    ) -> Result<Arc<MappingPlan>> {
        if !scoped.is_empty() {
            return self.compile_object(source, dest, depth, scoped).map(Arc::new);
        }
        let key = (source.clone(), dest.clone(), depth);
        if let Some(plan) = self.memo.get(&key) {
            return Ok(Arc::clone(plan));
        }
        let plan = Arc::new(self.compile_object(source, dest, depth, &[])?);
        self.memo.insert(key, Arc::clone(&plan));
        Ok(plan)
    }

    /// Sources with a generic value conversion: primitives, text, enums and
    /// their nullable wrappers.
    fn is_convertible(&self, desc: &TypeDescriptor) -> bool {
        match &desc.kind {
            TypeKind::Primitive(_) | TypeKind::String | TypeKind::Enum(_) => true,
            TypeKind::Nullable(inner) => self.types.is_value_type(inner),
            _ => false,
        }
    }
}

/// Exact override first, then the first inherited one.
fn find_override(
    exact: Option<&MappingConfig>,
    inherited: &[Arc<MappingConfig>],
    field: &str,
) -> Option<OverrideFn> {
    exact
        .and_then(|c| c.override_for(field))
        .or_else(|| inherited.iter().find_map(|c| c.override_for(field)))
        .cloned()
}
