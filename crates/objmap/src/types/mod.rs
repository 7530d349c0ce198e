// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type model.
//!
//! Types are described explicitly instead of discovered by reflection:
//! a [`TypeRegistry`] holds one [`TypeDescriptor`] per [`TypeName`] and
//! answers the introspection queries the plan compiler needs (flattened
//! fields, ancestry, classification, default construction).
//!
//! # Example
//!
//! ```rust
//! use objmap::types::{ObjectBuilder, TypeRegistry};
//!
//! let types = TypeRegistry::new();
//! let addresses = types.list_of(&"Address".into());
//! types.register(ObjectBuilder::new("Address").field("City", "string").build())?;
//! types.register(
//!     ObjectBuilder::new("Customer")
//!         .field("Id", "i32")
//!         .field("Name", "string")
//!         .initialized_field("Addresses", addresses)
//!         .build(),
//! )?;
//!
//! let names: Vec<_> = types.fields("Customer")?.into_iter().map(|f| f.name).collect();
//! assert_eq!(names, ["Id", "Name", "Addresses"]);
//! # Ok::<(), objmap::MapError>(())
//! ```

mod builder;
mod descriptor;
mod introspect;
mod registry;

pub use builder::{EnumBuilder, ObjectBuilder};
pub use descriptor::{
    CollectionDescriptor, CollectionShape, EnumDescriptor, EnumVariant, FieldDefault,
    FieldDescriptor, ObjectDescriptor, PrimitiveKind, TypeDescriptor, TypeKind, TypeName,
};
pub use introspect::{FieldKind, ObjectLayout};
pub use registry::{TypeRegistry, OBJECT, STRING};
