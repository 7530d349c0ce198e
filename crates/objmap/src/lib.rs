// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # objmap - convention-based object graph mapper
//!
//! Copies data from instances of one type into new instances of another,
//! matching fields by name and converting values between compatible types.
//! Per type-pair configuration can ignore fields, override them with
//! functions of the source, attach after-mapping callbacks and limit how
//! deep nested graphs are expanded.
//!
//! ## Quick Start
//!
//! ```rust
//! use objmap::{Mapper, Mappable};
//!
//! #[derive(Mappable)]
//! struct Address {
//!     city: String,
//! }
//!
//! #[derive(Mappable)]
//! struct Customer {
//!     id: i32,
//!     name: String,
//!     address: Option<Address>,
//! }
//!
//! #[derive(Debug, Mappable)]
//! struct CustomerDto {
//!     id: String,
//!     name: String,
//!     #[objmap(skip)]
//!     notes: String,
//! }
//!
//! let mapper = Mapper::new();
//! let customer = Customer {
//!     id: 7,
//!     name: "Ada".into(),
//!     address: Some(Address { city: "istanbul".into() }),
//! };
//! let dto: CustomerDto = mapper.map_typed(&customer)?;
//! assert_eq!(dto.id, "7");
//! assert_eq!(dto.name, "Ada");
//! assert!(dto.notes.is_empty());
//! # Ok::<(), objmap::MapError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +-------------------------------------------------------------+
//! |  Mapper facade / global()         typed bridge (MapValue)   |
//! +-------------------------------------------------------------+
//! |  ConfigRegistry  ->  plan compiler  ->  PlanCache           |
//! |                          |                                  |
//! |                      executor  ->  collection adapter       |
//! +-------------------------------------------------------------+
//! |  TypeRegistry (descriptors, layouts)   Value (instances)    |
//! +-------------------------------------------------------------+
//! ```
//!
//! ## Modules Overview
//!
//! - [`types`] - type descriptors and the registry answering introspection
//! - [`value`] - dynamic instances
//! - [`config`] - per type-pair configuration
//! - [`plan`] - compiled plans and their cache

// Allow the derive macro to work inside this crate's tests
extern crate self as objmap;

/// Per type-pair mapping configuration.
pub mod config;
/// Error type.
pub mod error;
/// Process-wide mapper and free functions.
pub mod global;
/// Mapper facade.
pub mod mapper;
/// Compiled mapping plans.
pub mod plan;
/// Settings (programmatic and TOML).
pub mod settings;
/// Typed bridge between Rust values and dynamic values.
pub mod typed;
/// Runtime type model.
pub mod types;
/// Dynamic instances.
pub mod value;

pub use config::{ConfigBuilder, FieldPath, MappingConfig};
pub use error::{MapError, Result};
pub use global::{
    configure, global, map, map_as, map_collection, register, reset_all, set_default_max_depth,
};
pub use mapper::Mapper;
pub use plan::{CacheStats, MappingPlan};
pub use settings::{MapperSettings, SettingsError, DEFAULT_MAX_DEPTH};
pub use typed::MapValue;
pub use types::{TypeName, TypeRegistry};
pub use value::{CollectionRef, EnumValue, ObjectRef, Value};

/// `#[derive(Mappable)]`: implements [`MapValue`] and registers the schema.
#[cfg(feature = "derive")]
pub use objmap_codegen::Mappable;
