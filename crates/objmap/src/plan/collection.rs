// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Collection adapter: element-wise mapping between collection shapes.

use super::compiler::Compiler;
use super::executor::Executor;
use super::CollectionPlan;
use crate::config::FieldPath;
use crate::error::{MapError, Result};
use crate::types::{CollectionDescriptor, CollectionShape, TypeDescriptor};
use crate::value::{CollectionRef, Value};

/// Compile the element conversion and the produced shape.
///
/// Arrays and lists keep their own type; sequences materialize as arrays of
/// the destination element. Sets have no ordered shape to produce.
pub(super) fn compile_collection(
    compiler: &mut Compiler<'_>,
    source: &TypeDescriptor,
    dest: &TypeDescriptor,
    target: &CollectionDescriptor,
    depth: usize,
    scoped: &[FieldPath],
) -> Result<CollectionPlan> {
    let source_element = source
        .as_collection()
        .map(|c| c.element.clone())
        .ok_or_else(|| {
            MapError::shape(
                &dest.name,
                format!("source type {} has no element type", source.name),
            )
        })?;

    let materialize_as = match target.shape {
        CollectionShape::Array | CollectionShape::List => dest.name.clone(),
        CollectionShape::Sequence => compiler.types.array_of(&target.element),
        CollectionShape::Set => {
            return Err(MapError::shape(
                &dest.name,
                "set-shaped destinations cannot be produced",
            ))
        }
    };

    let element =
        compiler.field_conversion(&source_element, &target.element, None, depth, scoped)?;
    Ok(CollectionPlan {
        element: Box::new(element),
        materialize_as,
    })
}

/// Map every element of a source collection into a new collection.
pub(super) fn execute(
    executor: &Executor<'_>,
    plan: &CollectionPlan,
    value: &Value,
) -> Result<Value> {
    let source = match value {
        Value::Null => return Ok(Value::Null),
        Value::Collection(c) => c,
        other => {
            return Err(MapError::conversion(
                other.type_label(),
                &plan.materialize_as,
                "source value is not a collection",
            ))
        }
    };

    // Buffer the source first; element plans may read the same collection.
    let items = source.items();
    let mut mapped = Vec::with_capacity(items.len());
    for item in &items {
        mapped.push(executor.apply(&plan.element, item)?);
    }
    Ok(Value::Collection(CollectionRef::new(
        plan.materialize_as.clone(),
        mapped,
    )))
}
