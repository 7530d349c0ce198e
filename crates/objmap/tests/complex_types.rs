// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::missing_panics_doc)] // Tests/examples panic on failure
#![allow(clippy::too_many_lines)] // Example/test code
#![allow(clippy::float_cmp)] // Test assertions with constants

//! Nested object and collection tests
//!
//! Customer -> CustomerDTO (nested objects, arrays, lists), Foo -> Foo
//! (self-typed fields) and Foo -> FooDto (self-typed graphs through
//! collections), plus the compile-time failures for unsupported shapes.

mod common;

use chrono::NaiveDate;
use common::*;
use objmap::types::ObjectBuilder;
use objmap::{MapError, Mapper, TypeName, Value};

fn mapper() -> Mapper {
    init_logging();
    let mapper = Mapper::new();
    register_customer_types(&mapper);
    register_foo_types(&mapper);
    mapper
}

fn register_foo_types(mapper: &Mapper) {
    let types = mapper.types();
    let foo = TypeName::new("Foo");
    let dto = TypeName::new("FooDto");
    let null_int = types.nullable_of(&"i32".into()).expect("i32?");

    let foo_desc = ObjectBuilder::new("Foo")
        .field("Name", "string")
        .field("Int32", "i32")
        .field("Int64", "i64")
        .field("NullInt", null_int.clone())
        .field("Floatn", "f32")
        .field("Doublen", "f64")
        .field("DateTime", "datetime")
        .field("Foo1", "Foo")
        .field("Foos", types.sequence_of(&foo))
        .field("FooArr", types.array_of(&foo))
        .field("IntArr", types.array_of(&"i32".into()))
        .field("Ints", types.sequence_of(&"i32".into()))
        .build();
    let dto_desc = ObjectBuilder::new("FooDto")
        .field("Name", "string")
        .field("Int32", "i64")
        .field("Int64", "string")
        .field("NullInt", null_int)
        .field("Doublen", "f64")
        .field("Foo1", "FooDto")
        .field("Foos", types.list_of(&dto))
        .field("FooArr", types.sequence_of(&dto))
        .field("IntArr", types.list_of(&"i64".into()))
        .field("Ints", types.array_of(&"i32".into()))
        .build();
    mapper.register(foo_desc).expect("Foo");
    mapper.register(dto_desc).expect("FooDto");
}

fn foo(mapper: &Mapper, name: &str, children: Vec<Value>) -> Value {
    let types = mapper.types();
    let foo = TypeName::new("Foo");
    let when = NaiveDate::from_ymd_opt(2016, 12, 25)
        .and_then(|d| d.and_hms_opt(17, 0, 0))
        .expect("date");
    let ints: Vec<Value> = [1, 2, 3].into_iter().map(Value::I32).collect();
    obj(&object(
        mapper,
        "Foo",
        &[
            ("Name", Value::from(name)),
            ("Int32", Value::I32(12)),
            ("Int64", Value::I64(23)),
            ("NullInt", Value::I32(16)),
            ("Floatn", Value::F32(4.3)),
            ("Doublen", Value::F64(2.3)),
            ("DateTime", Value::DateTime(when)),
            ("Foos", collection(&types.list_of(&foo), children.clone())),
            ("FooArr", collection(&types.array_of(&foo), children)),
            ("IntArr", collection(&types.array_of(&"i32".into()), ints.clone())),
            ("Ints", collection(&types.list_of(&"i32".into()), ints)),
        ],
    ))
}

fn foo_graph(mapper: &Mapper) -> Value {
    let leaves = vec![foo(mapper, "leaf1", vec![]), foo(mapper, "leaf2", vec![])];
    let root = foo(mapper, "root", leaves);
    let inner = foo(mapper, "inner", vec![]);
    root.as_object()
        .expect("root")
        .set("Foo1", inner)
        .expect("Foo1");
    root
}

#[test]
fn test_customer_to_dto() {
    let mapper = mapper();
    let source = customer(&mapper);
    let dto = mapper.map(&source, "CustomerDTO").expect("map");

    assert_eq!(field(&dto, "Id"), Value::I32(1));
    assert_eq!(field(&dto, "Name"), Value::from("Eduardo"));

    // Same-typed nested objects are deep copied.
    let (src_address, dto_address) = (field(&source, "Address"), field(&dto, "Address"));
    assert!(same_address(&src_address, &dto_address));
    assert!(src_address.deep_eq(&dto_address));
    assert!(!src_address
        .as_object()
        .expect("address")
        .ptr_eq(dto_address.as_object().expect("address")));

    let home = field(&dto, "HomeAddress");
    assert_eq!(home.as_object().expect("home").type_name(), "AddressDTO");
    assert!(same_address(&field(&source, "HomeAddress"), &home));

    for name in ["Addresses", "WorkAddresses"] {
        let (src, mapped) = (items(&field(&source, name)), items(&field(&dto, name)));
        assert_eq!(src.len(), mapped.len());
        for (a, b) in src.iter().zip(&mapped) {
            assert!(same_address(a, b), "{}", name);
        }
    }
    assert_eq!(
        field(&dto, "Addresses").as_collection().expect("array").type_name(),
        "AddressDTO[]"
    );
    assert_eq!(
        field(&dto, "WorkAddresses")
            .as_collection()
            .expect("list")
            .type_name(),
        "List<AddressDTO>"
    );
}

#[test]
fn test_null_nested_values_stay_null() {
    let mapper = mapper();
    let source = customer(&mapper);
    let object = source.as_object().expect("customer");
    for name in ["Address", "HomeAddress", "Addresses", "WorkAddresses"] {
        object.set(name, Value::Null).expect("clear");
    }

    let dto = mapper.map(&source, "CustomerDTO").expect("map");
    for name in ["Address", "HomeAddress", "Addresses", "WorkAddresses"] {
        assert_eq!(field(&dto, name), Value::Null, "{}", name);
    }
}

#[test]
fn test_null_elements_stay_null() {
    let mapper = mapper();
    let source = customer(&mapper);
    let addresses = mapper.types().array_of(&"Address".into());
    source
        .as_object()
        .expect("customer")
        .set(
            "Addresses",
            collection(&addresses, vec![Value::Null, address(&mapper, 9, "x", "y")]),
        )
        .expect("addresses");

    let dto = mapper.map(&source, "CustomerDTO").expect("map");
    let mapped = items(&field(&dto, "Addresses"));
    assert_eq!(mapped[0], Value::Null);
    assert_eq!(field(&mapped[1], "Id"), Value::I32(9));
}

#[test]
fn test_foo_to_foo_copies_self_typed_fields_by_reference() {
    let mapper = mapper();
    let source = foo_graph(&mapper);
    let copy = mapper.map(&source, "Foo").expect("map");

    assert!(!copy
        .as_object()
        .expect("copy")
        .ptr_eq(source.as_object().expect("source")));
    assert!(source.deep_eq(&copy));
    assert!(field(&copy, "Foo1")
        .as_object()
        .expect("Foo1")
        .ptr_eq(field(&source, "Foo1").as_object().expect("Foo1")));
    assert!(field(&copy, "Foos")
        .as_collection()
        .expect("Foos")
        .ptr_eq(field(&source, "Foos").as_collection().expect("Foos")));
}

#[test]
fn test_foo_to_dto_through_collections() {
    let mapper = mapper();
    let source = foo_graph(&mapper);
    let dto = mapper.map(&source, "FooDto").expect("map");

    assert_eq!(field(&dto, "Name"), Value::from("root"));
    assert_eq!(field(&dto, "Int32"), Value::I64(12));
    assert_eq!(field(&dto, "Int64"), Value::from("23"));
    assert_eq!(field(&dto, "NullInt"), Value::I32(16));
    assert_eq!(field(&dto, "Doublen"), Value::F64(2.3));
    assert_eq!(field(&field(&dto, "Foo1"), "Name"), Value::from("inner"));

    let foos = field(&dto, "Foos");
    assert_eq!(foos.as_collection().expect("Foos").type_name(), "List<FooDto>");
    let names: Vec<Value> = items(&foos).iter().map(|f| field(f, "Name")).collect();
    assert_eq!(names, [Value::from("leaf1"), Value::from("leaf2")]);

    // Sequence destinations materialize as arrays.
    let arr = field(&dto, "FooArr");
    assert_eq!(arr.as_collection().expect("FooArr").type_name(), "FooDto[]");
    assert_eq!(items(&arr).len(), 2);

    assert_eq!(
        items(&field(&dto, "IntArr")),
        [Value::I64(1), Value::I64(2), Value::I64(3)]
    );
    let ints = field(&dto, "Ints");
    assert_eq!(ints.as_collection().expect("Ints").type_name(), "i32[]");
    assert_eq!(items(&ints), [Value::I32(1), Value::I32(2), Value::I32(3)]);
}

#[test]
fn test_subtype_instance_maps_through_base_plan() {
    let mapper = mapper();
    mapper
        .register(
            ObjectBuilder::new("VipCustomer")
                .base("Customer")
                .field("Tier", "i32")
                .build(),
        )
        .expect("VipCustomer");
    let vip = object(
        &mapper,
        "VipCustomer",
        &[("Id", Value::I32(5)), ("Name", Value::from("Grace"))],
    );

    let dto = mapper
        .map_as(&obj(&vip), "Customer", "CustomerDTO")
        .expect("map_as");
    assert_eq!(field(&dto, "Id"), Value::I32(5));
    assert_eq!(field(&dto, "Name"), Value::from("Grace"));

    let plain = customer(&mapper);
    let err = mapper
        .map_as(&plain, "VipCustomer", "CustomerDTO")
        .expect_err("base instance for subtype plan");
    assert!(matches!(err, MapError::TypeMismatch { .. }));
}

#[test]
fn test_unsupported_shapes_fail_to_compile() {
    let mapper = mapper();
    let types = mapper.types();
    let set = types.set_of(&"AddressDTO".into());
    mapper
        .register(
            ObjectBuilder::new("AddressBook")
                .field("Addresses", set)
                .build(),
        )
        .expect("AddressBook");
    mapper
        .register(
            ObjectBuilder::new("IAddress")
                .field("City", "string")
                .interface()
                .build(),
        )
        .expect("IAddress");
    mapper
        .register(
            ObjectBuilder::new("AddressHolder")
                .field("Address", "IAddress")
                .build(),
        )
        .expect("AddressHolder");
    mapper
        .register(
            ObjectBuilder::new("Scalar")
                .field("Address", "i32")
                .build(),
        )
        .expect("Scalar");

    let source = customer(&mapper);
    let err = mapper.map(&source, "AddressBook").expect_err("set shape");
    assert!(matches!(err, MapError::Shape { .. }));

    let err = mapper.map(&source, "AddressHolder").expect_err("interface");
    assert!(matches!(err, MapError::Construction { .. }));

    // An object has no value conversion; it is treated as a nested plan.
    let err = mapper.map(&source, "Scalar").expect_err("object into i32");
    assert!(matches!(err, MapError::Construction { .. }));

    let err = mapper.map(&source, "IAddress").expect_err("interface dest");
    assert!(matches!(err, MapError::Construction { .. }));
    assert_eq!(mapper.cached_plan_count(), 0);
}

#[test]
fn test_non_object_sources_are_rejected() {
    let mapper = mapper();
    assert_eq!(
        mapper.map(&Value::Null, "CustomerDTO").expect("null"),
        Value::Null
    );
    let err = mapper
        .map(&Value::from("text"), "CustomerDTO")
        .expect_err("text source");
    assert!(matches!(err, MapError::TypeMismatch { .. }));
}
