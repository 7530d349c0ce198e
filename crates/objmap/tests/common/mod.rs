// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared fixtures for integration tests.

#![allow(dead_code)]

use objmap::types::{EnumBuilder, ObjectBuilder};
use objmap::{CollectionRef, Mapper, ObjectRef, TypeName, Value};

/// Route `log` output through env_logger when `RUST_LOG` is set.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Create an instance and set the given fields.
pub fn object(mapper: &Mapper, type_name: &str, fields: &[(&str, Value)]) -> ObjectRef {
    let object = mapper
        .types()
        .instantiate(type_name)
        .expect("instantiate fixture");
    for (name, value) in fields {
        object.set(name, value.clone()).expect("set fixture field");
    }
    object
}

/// Wrap an instance.
pub fn obj(object: &ObjectRef) -> Value {
    Value::Object(object.clone())
}

/// Collection value of the given type.
pub fn collection(type_name: &TypeName, items: Vec<Value>) -> Value {
    Value::Collection(CollectionRef::new(type_name.clone(), items))
}

/// Field of a mapped object.
pub fn field(value: &Value, name: &str) -> Value {
    value
        .as_object()
        .expect("object value")
        .get(name)
        .expect("field exists")
}

/// Items of a collection value.
pub fn items(value: &Value) -> Vec<Value> {
    value.as_collection().expect("collection value").items()
}

// ---- Customer / Address graph -----------------------------------------------

pub fn register_customer_types(mapper: &Mapper) {
    let types = mapper.types();
    let addresses = types.array_of(&"Address".into());
    let work_addresses = types.list_of(&"Address".into());
    let address_dtos = types.array_of(&"AddressDTO".into());
    let work_address_dtos = types.list_of(&"AddressDTO".into());
    let credit = types.nullable_of(&"f64".into()).expect("f64?");

    for desc in [
        ObjectBuilder::new("Address")
            .field("Id", "i32")
            .field("Street", "string")
            .field("City", "string")
            .field("Country", "string")
            .build(),
        ObjectBuilder::new("AddressDTO")
            .field("Id", "i32")
            .field("City", "string")
            .field("Country", "string")
            .build(),
        ObjectBuilder::new("Customer")
            .field("Id", "i32")
            .field("Name", "string")
            .field("Surname", "string")
            .field("Credit", credit)
            .field("Address", "Address")
            .field("HomeAddress", "Address")
            .field("Addresses", addresses)
            .field("WorkAddresses", work_addresses)
            .build(),
        ObjectBuilder::new("CustomerDTO")
            .field("Id", "i32")
            .field("Name", "string")
            .field("FullName", "string")
            .field("Address", "Address")
            .field("HomeAddress", "AddressDTO")
            .field("Addresses", address_dtos)
            .field("WorkAddresses", work_address_dtos)
            .field("AddressCity", "string")
            .build(),
    ] {
        mapper.register(desc).expect("register customer fixture");
    }
}

pub fn address(mapper: &Mapper, id: i32, street: &str, city: &str) -> Value {
    obj(&object(
        mapper,
        "Address",
        &[
            ("Id", Value::I32(id)),
            ("Street", Value::from(street)),
            ("City", Value::from(city)),
            ("Country", Value::from("turkey")),
        ],
    ))
}

pub fn customer(mapper: &Mapper) -> Value {
    let types = mapper.types();
    let addresses = collection(
        &types.array_of(&"Address".into()),
        vec![
            address(mapper, 3, "istiklal cad.", "istanbul"),
            address(mapper, 4, "konak", "izmir"),
        ],
    );
    let work_addresses = collection(
        &types.list_of(&"Address".into()),
        vec![
            address(mapper, 5, "istiklal cad.", "istanbul"),
            address(mapper, 6, "konak", "izmir"),
        ],
    );
    obj(&object(
        mapper,
        "Customer",
        &[
            ("Id", Value::I32(1)),
            ("Name", Value::from("Eduardo")),
            ("Surname", Value::from("Najera")),
            ("Credit", Value::F64(234.7)),
            ("Address", address(mapper, 1, "istiklal cad.", "istanbul")),
            ("HomeAddress", address(mapper, 2, "istiklal cad.", "istanbul")),
            ("Addresses", addresses),
            ("WorkAddresses", work_addresses),
        ],
    ))
}

/// Field-wise equality of an Address and an Address or AddressDTO.
pub fn same_address(a: &Value, b: &Value) -> bool {
    ["Id", "City", "Country"]
        .iter()
        .all(|name| field(a, name) == field(b, name))
}

// ---- Parent / Child graph ---------------------------------------------------

pub fn register_parent_types(mapper: &Mapper) {
    let types = mapper.types();
    let children = types.list_of(&"Child".into());
    let dto_children = types.list_of(&"DtoChild".into());
    for desc in [
        ObjectBuilder::new("Parent")
            .field("Id", "i32")
            .field("Name", "string")
            .initialized_field("Children", children)
            .build(),
        ObjectBuilder::new("Child")
            .field("Id", "i32")
            .field("Name", "string")
            .field("Parent", "Parent")
            .build(),
        ObjectBuilder::new("DtoParent")
            .field("Id", "i32")
            .field("Name", "string")
            .initialized_field("Children", dto_children)
            .build(),
        ObjectBuilder::new("DtoChild")
            .field("Id", "i32")
            .field("Name", "string")
            .field("Parent", "DtoParent")
            .build(),
    ] {
        mapper.register(desc).expect("register parent fixture");
    }
}

fn add_child(parent: &ObjectRef, child: &ObjectRef) {
    child
        .set("Parent", Value::Object(parent.clone()))
        .expect("set parent");
    match parent.get("Children").expect("children") {
        Value::Collection(children) => children.push(Value::Object(child.clone())),
        other => panic!("unexpected children value {:?}", other),
    }
}

/// A parent with two children pointing back at it (a cyclic graph).
pub fn parent(mapper: &Mapper, id: i32) -> ObjectRef {
    let parent = object(
        mapper,
        "Parent",
        &[("Id", Value::I32(id + 2)), ("Name", Value::from("Parent0"))],
    );
    for n in [id, id + 1] {
        let child = object(
            mapper,
            "Child",
            &[("Id", Value::I32(n)), ("Name", Value::from(format!("Child{}", n)))],
        );
        add_child(&parent, &child);
    }
    parent
}

/// An acyclic parent/child graph of exactly `depth` levels.
pub fn graph(mapper: &Mapper, depth: usize) -> ObjectRef {
    let root = parent(mapper, 0);
    shape_depth(mapper, &root, depth);
    root
}

fn shape_depth(mapper: &Mapper, parent_ref: &ObjectRef, depth: usize) {
    let children = items(&parent_ref.get("Children").expect("children"));
    match depth {
        0 => {
            if let Value::Collection(c) = parent_ref.get("Children").expect("children") {
                c.write().items_mut().clear();
            }
        }
        1 => {
            for child in &children {
                child
                    .as_object()
                    .expect("child")
                    .set("Parent", Value::Null)
                    .expect("clear parent");
            }
        }
        _ => {
            let id = parent_ref
                .get("Id")
                .expect("id")
                .as_i64()
                .expect("integer id") as i32;
            let next = parent(mapper, id + 1);
            shape_depth(mapper, &next, depth - 2);
            children[0]
                .as_object()
                .expect("child")
                .set("Parent", Value::Object(next))
                .expect("set parent");
            children[1]
                .as_object()
                .expect("child")
                .set("Parent", Value::Null)
                .expect("clear parent");
        }
    }
}

/// Depth of a parent: deepest child depth plus one, zero without children.
pub fn parent_depth(parent: &Value) -> usize {
    items(&field(parent, "Children"))
        .iter()
        .map(child_depth)
        .max()
        .map_or(0, |d| d + 1)
}

/// Depth of a child: its parent's depth plus one, zero without a parent.
pub fn child_depth(child: &Value) -> usize {
    match field(child, "Parent") {
        Value::Null => 0,
        parent => parent_depth(&parent) + 1,
    }
}

/// Ids and names of a parent and its children match.
pub fn same_parent(parent: &Value, dto: &Value) -> bool {
    let head = ["Id", "Name"]
        .iter()
        .all(|name| field(parent, name) == field(dto, name));
    let source_children = items(&field(parent, "Children"));
    let dto_children = items(&field(dto, "Children"));
    head && source_children.len() == dto_children.len()
        && source_children.iter().zip(&dto_children).all(|(c, d)| {
            ["Id", "Name"]
                .iter()
                .all(|name| field(c, name) == field(d, name))
        })
}

// ---- Employees and departments ----------------------------------------------

pub fn register_employee_types(mapper: &Mapper) {
    for desc in [
        EnumBuilder::new("Departments")
            .variant_value("Finance", 0)
            .variant_value("IT", 1)
            .variant_value("Sales", 2)
            .build(),
        ObjectBuilder::new("Employee")
            .field("Id", "guid")
            .field("Name", "string")
            .field("Surname", "string")
            .field("Department", "i32")
            .build(),
        ObjectBuilder::new("EmployeeWithStringEnum")
            .field("Id", "guid")
            .field("Name", "string")
            .field("Department", "string")
            .build(),
        ObjectBuilder::new("EmployeeDTO")
            .field("Id", "guid")
            .field("Name", "string")
            .field("Department", "Departments")
            .build(),
    ] {
        mapper.register(desc).expect("register employee fixture");
    }
}

/// Numeric value of an enum field.
pub fn enum_value(value: &Value) -> i64 {
    value.as_enum().expect("enum value").value
}
