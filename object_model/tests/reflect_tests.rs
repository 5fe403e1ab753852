// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![cfg(feature = "reflect")]

use ecmascript_object_model::ecmascript::{
    abstract_operations::operations_on_objects::{
        call_function, create_list_from_array_like, define_property_or_throw, get, set,
    },
    builtins::{
        create_array_from_list, create_reflect_object, ordinary_object_create_with_intrinsics,
    },
    execution::{Agent, ExceptionType, JsResult, Options},
    types::{Object, PropertyDescriptor, PropertyKey, Value},
};

fn reflect_call(
    agent: &mut Agent,
    reflect: Object,
    name: &str,
    arguments: &[Value],
) -> JsResult<Value> {
    let key = PropertyKey::from_str(agent, name);
    let Value::Object(function) = get(agent, reflect, key)? else {
        panic!("Reflect.{name} is not an object");
    };
    call_function(agent, function, Value::Undefined, arguments)
}

#[test]
fn define_property_reports_failure_as_false() {
    let mut agent = Agent::new(Options::default());
    let reflect = create_reflect_object(&mut agent);
    let target = ordinary_object_create_with_intrinsics(&mut agent);
    let key = PropertyKey::from_str(&mut agent, "x");
    define_property_or_throw(
        &mut agent,
        target,
        key,
        PropertyDescriptor::new_frozen_data_descriptor(1),
    )
    .unwrap();

    let attributes = ordinary_object_create_with_intrinsics(&mut agent);
    let value_key = PropertyKey::from_str(&mut agent, "value");
    set(&mut agent, attributes, value_key, 2.into(), true).unwrap();
    let name = Value::from_str(&mut agent, "x");
    let result = reflect_call(
        &mut agent,
        reflect,
        "defineProperty",
        &[target.into(), name, attributes.into()],
    )
    .unwrap();
    assert_eq!(result, Value::Boolean(false));

    let result = reflect_call(&mut agent, reflect, "deleteProperty", &[target.into(), name]);
    assert_eq!(result.unwrap(), Value::Boolean(false));
}

#[test]
fn own_keys_returns_an_array() {
    let mut agent = Agent::new(Options::default());
    let reflect = create_reflect_object(&mut agent);
    let target = ordinary_object_create_with_intrinsics(&mut agent);
    let b = PropertyKey::from_str(&mut agent, "b");
    set(&mut agent, target, b, 1.into(), true).unwrap();
    set(&mut agent, target, PropertyKey::Integer(1), 1.into(), true).unwrap();

    let keys = reflect_call(&mut agent, reflect, "ownKeys", &[target.into()]).unwrap();
    let keys = create_list_from_array_like(&mut agent, keys).unwrap();
    let expected = [Value::from_str(&mut agent, "1"), Value::from_str(&mut agent, "b")];
    assert_eq!(keys, expected);
}

#[test]
fn non_object_targets_throw() {
    let mut agent = Agent::new(Options::default());
    let reflect = create_reflect_object(&mut agent);
    for name in ["getPrototypeOf", "isExtensible", "ownKeys", "preventExtensions"] {
        let error = reflect_call(&mut agent, reflect, name, &[1.into()]).unwrap_err();
        assert_eq!(error.exception_type(&agent), Some(ExceptionType::TypeError));
    }
}

#[test]
fn apply_spreads_the_argument_list() {
    let mut agent = Agent::new(Options::default());
    let reflect = create_reflect_object(&mut agent);
    let has_key = PropertyKey::from_str(&mut agent, "has");
    let Value::Object(has) = get(&mut agent, reflect, has_key).unwrap() else {
        panic!("Reflect.has is not an object");
    };
    let target = ordinary_object_create_with_intrinsics(&mut agent);
    let key = PropertyKey::from_str(&mut agent, "present");
    set(&mut agent, target, key, 1.into(), true).unwrap();
    let present = Value::from_str(&mut agent, "present");
    let arguments = create_array_from_list(&mut agent, &[target.into(), present]);

    let result = reflect_call(
        &mut agent,
        reflect,
        "apply",
        &[has.into(), Value::Undefined, arguments.into()],
    )
    .unwrap();
    assert_eq!(result, Value::Boolean(true));
    let error = reflect_call(&mut agent, reflect, "construct", &[has.into(), arguments.into()])
        .unwrap_err();
    assert_eq!(error.exception_type(&agent), Some(ExceptionType::TypeError));
}
