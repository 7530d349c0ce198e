// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Plan executor.

use super::{collection, Conversion, MappingPlan, ValueSource};
use crate::error::{MapError, Result};
use crate::types::TypeRegistry;
use crate::value::{coerce_nullable, convert, enum_from_integral, enum_from_string, stringify, Value};

/// Interprets compiled plans against source instances.
///
/// Plans are immutable, so one executor may run any number of them from any
/// thread; only the produced instances are written to.
pub(crate) struct Executor<'a> {
    types: &'a TypeRegistry,
}

impl<'a> Executor<'a> {
    pub(crate) fn new(types: &'a TypeRegistry) -> Self {
        Self { types }
    }

    /// Map a top-level instance: `Null` maps to `Null`, otherwise the source
    /// must be an object of the plan's source type (or a subtype). The
    /// plan's after-mapping callbacks run once the instance is complete.
    pub(crate) fn execute(&self, plan: &MappingPlan, source: &Value) -> Result<Value> {
        let object = match source {
            Value::Null => return Ok(Value::Null),
            Value::Object(object) => object,
            other => {
                return Err(MapError::TypeMismatch {
                    expected: plan.source.to_string(),
                    got: other.type_label(),
                })
            }
        };
        let runtime = object.type_name();
        if !self.types.is_assignable_from(&plan.source, &runtime) {
            return Err(MapError::TypeMismatch {
                expected: plan.source.to_string(),
                got: runtime.to_string(),
            });
        }

        let dest = self.build(plan, source)?;
        for callback in &plan.after_mapping {
            callback(source, &dest)?;
        }
        Ok(dest)
    }

    /// Construct and populate one destination instance.
    fn build(&self, plan: &MappingPlan, source: &Value) -> Result<Value> {
        let object = source.as_object();
        let mut values = Vec::with_capacity(plan.assignments.len());

        for assignment in &plan.assignments {
            let value = match &assignment.source {
                ValueSource::Field { slot, conversion } => {
                    let raw = object
                        .and_then(|o| o.get_slot(slot.index, &slot.name))
                        .unwrap_or(Value::Null);
                    self.apply(conversion, &raw)?
                }
                ValueSource::CustomOverride(f) => {
                    let value = f(source)?;
                    let field = &plan.layout.fields()[assignment.target.index];
                    if !self.types.conforms(&value, &field.type_name) {
                        return Err(MapError::TypeMismatch {
                            expected: format!("{} for {}.{}", field.type_name, plan.dest, field.name),
                            got: value.type_label(),
                        });
                    }
                    value
                }
            };
            values.push((assignment.target.index, value));
        }

        let instance = plan.layout.instantiate();
        {
            let mut dest = instance.write();
            for (index, value) in values {
                dest.set_slot(index, value);
            }
        }
        Ok(Value::Object(instance))
    }

    /// Apply one field conversion.
    pub(super) fn apply(&self, conversion: &Conversion, value: &Value) -> Result<Value> {
        match conversion {
            Conversion::DirectCopy => Ok(value.clone()),
            Conversion::NumericCoerce { target, nullable } => {
                coerce_nullable(value, target, *nullable)
            }
            Conversion::Convert(target) => convert(value, target),
            Conversion::Stringify { value_source } => Ok(stringify(value, *value_source)),
            Conversion::EnumFromString(e) => enum_from_string(value, &e.type_name, &e.descriptor),
            Conversion::EnumFromIntegral(e) => {
                enum_from_integral(value, &e.type_name, &e.descriptor)
            }
            Conversion::NestedObject(plan) => match value {
                Value::Null => Ok(Value::Null),
                other => self.build(plan, other),
            },
            Conversion::Collection(plan) => collection::execute(self, plan, value),
        }
    }
}
