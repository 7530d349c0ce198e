// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Mapping plans.
//!
//! A [`MappingPlan`] is the compiled, immutable description of how to build
//! a destination object from a source object: one [`FieldAssignment`] per
//! populated destination field, plus the after-mapping callbacks of the
//! top-level pair. Plans are built by the compiler, memoized by the
//! [`PlanCache`] and interpreted by the executor.

mod cache;
mod collection;
mod compiler;
mod executor;

pub use cache::{CacheStats, PlanCache};
pub(crate) use compiler::compile;
pub(crate) use executor::Executor;

use crate::config::{AfterMappingFn, OverrideFn};
use crate::types::{EnumDescriptor, ObjectLayout, TypeName};
use crate::value::ConvertTarget;
use std::fmt;
use std::sync::Arc;

/// Position of a field in an object layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSlot {
    /// Slot index in the layout the plan was compiled against.
    pub index: usize,
    /// Field name, used when an instance of a subtype has another layout.
    pub name: Arc<str>,
}

impl FieldSlot {
    pub(crate) fn new(index: usize, name: &str) -> Self {
        Self {
            index,
            name: Arc::from(name),
        }
    }
}

/// Enum type resolved at compile time.
#[derive(Debug, Clone)]
pub struct EnumTarget {
    /// Enum type name.
    pub type_name: TypeName,
    /// Enum members.
    pub descriptor: EnumDescriptor,
}

/// Element-wise conversion of a collection field.
#[derive(Debug, Clone)]
pub struct CollectionPlan {
    /// Conversion applied to each element.
    pub element: Box<Conversion>,
    /// Collection type of the produced instance.
    pub materialize_as: TypeName,
}

/// How a source field value becomes a destination field value.
#[derive(Clone)]
pub enum Conversion {
    /// Reference or value copy.
    DirectCopy,
    /// Wrap into or unwrap from a nullable of the same value type.
    NumericCoerce { target: TypeName, nullable: bool },
    /// Checked primitive conversion.
    Convert(ConvertTarget),
    /// Textual representation.
    Stringify { value_source: bool },
    /// Parse an enum member from text.
    EnumFromString(EnumTarget),
    /// Reinterpret an integral value as an enum value.
    EnumFromIntegral(EnumTarget),
    /// Build a new object with a sub-plan; `Null` stays `Null`.
    NestedObject(Arc<MappingPlan>),
    /// Build a new collection element by element; `Null` stays `Null`.
    Collection(CollectionPlan),
}

impl Conversion {
    /// Short name of the conversion kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DirectCopy => "DirectCopy",
            Self::NumericCoerce { .. } => "NumericCoerce",
            Self::Convert(_) => "Convert",
            Self::Stringify { .. } => "Stringify",
            Self::EnumFromString(_) => "EnumFromString",
            Self::EnumFromIntegral(_) => "EnumFromIntegral",
            Self::NestedObject(_) => "NestedObject",
            Self::Collection(_) => "Collection",
        }
    }
}

impl fmt::Debug for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NestedObject(plan) => write!(
                f,
                "NestedObject({} -> {}, {} assignments)",
                plan.source,
                plan.dest,
                plan.assignments.len()
            ),
            Self::Collection(c) => write!(f, "Collection({:?} as {})", c.element, c.materialize_as),
            Self::Convert(t) => write!(f, "Convert({})", t.type_name()),
            Self::EnumFromString(e) | Self::EnumFromIntegral(e) => {
                write!(f, "{}({})", self.kind(), e.type_name)
            }
            other => f.write_str(other.kind()),
        }
    }
}

/// Where a destination value comes from.
#[derive(Clone)]
pub enum ValueSource {
    /// A source field, converted.
    Field {
        slot: FieldSlot,
        conversion: Conversion,
    },
    /// A user override evaluated against the whole source instance.
    CustomOverride(OverrideFn),
}

impl fmt::Debug for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field { slot, conversion } => f
                .debug_struct("Field")
                .field("slot", slot)
                .field("conversion", conversion)
                .finish(),
            Self::CustomOverride(_) => f.write_str("CustomOverride"),
        }
    }
}

/// One destination field population step.
#[derive(Debug, Clone)]
pub struct FieldAssignment {
    /// Destination slot.
    pub target: FieldSlot,
    /// Value origin.
    pub source: ValueSource,
}

/// Compiled plan for one (source, destination) pair.
pub struct MappingPlan {
    source: TypeName,
    dest: TypeName,
    layout: Arc<ObjectLayout>,
    assignments: Vec<FieldAssignment>,
    after_mapping: Vec<AfterMappingFn>,
    generation: u64,
    stop_depth: usize,
}

impl MappingPlan {
    /// Source type.
    pub fn source(&self) -> &TypeName {
        &self.source
    }

    /// Destination type.
    pub fn dest(&self) -> &TypeName {
        &self.dest
    }

    /// Layout of the destination type.
    pub fn layout(&self) -> &Arc<ObjectLayout> {
        &self.layout
    }

    /// Field assignments in destination field order.
    pub fn assignments(&self) -> &[FieldAssignment] {
        &self.assignments
    }

    /// Assignment for a destination field.
    pub fn assignment(&self, field: &str) -> Option<&FieldAssignment> {
        self.assignments.iter().find(|a| &*a.target.name == field)
    }

    /// Number of after-mapping callbacks bound to this plan.
    pub fn after_mapping_count(&self) -> usize {
        self.after_mapping.len()
    }

    /// Configuration generation the plan was compiled under.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Depth limit in force when the plan was compiled.
    pub fn stop_depth(&self) -> usize {
        self.stop_depth
    }
}

impl fmt::Debug for MappingPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingPlan")
            .field("source", &self.source)
            .field("dest", &self.dest)
            .field("assignments", &self.assignments)
            .field("after_mapping", &self.after_mapping.len())
            .field("generation", &self.generation)
            .field("stop_depth", &self.stop_depth)
            .finish()
    }
}
