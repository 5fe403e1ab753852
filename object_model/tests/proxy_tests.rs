// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::{cell::RefCell, rc::Rc};

use ecmascript_object_model::ecmascript::{
    abstract_operations::{
        operations_on_objects::{
            call_function, construct, create_data_property_or_throw, define_property_or_throw,
            get, has_property, prevent_extensions, set,
        },
        testing_and_comparison::{is_array, is_callable, is_constructor},
    },
    builtins::{
        ArgumentsList, Behaviour, BuiltinFunctionArgs, Proxy, ProxyTrapConfig, array_create,
        create_array_from_list, create_builtin_function, new_native_proxy,
        ordinary_object_create_with_intrinsics, proxy_create, proxy_revocable,
    },
    execution::{Agent, ExceptionType, JsResult, Options},
    types::{
        BUILTIN_STRING_MEMORY, InternalMethods, Object, PropertyDescriptor, PropertyKey, Value,
    },
};

fn frozen_target(agent: &mut Agent, key: PropertyKey) -> Object {
    let target = ordinary_object_create_with_intrinsics(agent);
    define_property_or_throw(
        agent,
        target,
        key,
        PropertyDescriptor::new_frozen_data_descriptor(1),
    )
    .unwrap();
    target
}

#[test]
fn has_trap_cannot_hide_non_configurable_property() {
    let mut agent = Agent::new(Options::default());
    let x = PropertyKey::from_str(&mut agent, "x");
    let target = frozen_target(&mut agent, x);
    prevent_extensions(&mut agent, target, true).unwrap();
    let proxy = new_native_proxy(
        &mut agent,
        target,
        ProxyTrapConfig {
            has: Some(Rc::new(|_: &mut Agent, _: Object, _: PropertyKey| Ok(false))),
            ..Default::default()
        },
    )
    .unwrap();

    let error = has_property(&mut agent, proxy, x).unwrap_err();
    assert_eq!(error.exception_type(&agent), Some(ExceptionType::TypeError));
    // Unknown keys may be hidden.
    let y = PropertyKey::from_str(&mut agent, "y");
    assert!(!has_property(&mut agent, proxy, y).unwrap());
}

#[test]
fn get_trap_must_report_frozen_values() {
    let mut agent = Agent::new(Options::default());
    let x = PropertyKey::from_str(&mut agent, "x");
    let y = PropertyKey::from_str(&mut agent, "y");
    let target = frozen_target(&mut agent, x);
    let proxy = new_native_proxy(
        &mut agent,
        target,
        ProxyTrapConfig {
            get: Some(Rc::new(
                |_: &mut Agent, _: Object, _: PropertyKey, _: Value| Ok(Value::from(2)),
            )),
            ..Default::default()
        },
    )
    .unwrap();
    let error = get(&mut agent, proxy, x).unwrap_err();
    assert_eq!(error.exception_type(&agent), Some(ExceptionType::TypeError));
    assert_eq!(get(&mut agent, proxy, y).unwrap(), Value::from(2));
}

#[test]
fn traps_observe_every_operation() {
    let mut agent = Agent::new(Options::default());
    let target = ordinary_object_create_with_intrinsics(&mut agent);
    let log = Rc::new(RefCell::new(Vec::<&'static str>::new()));
    let get_log = log.clone();
    let set_log = log.clone();
    let keys_log = log.clone();
    let proxy = new_native_proxy(
        &mut agent,
        target,
        ProxyTrapConfig {
            get: Some(Rc::new(
                move |agent: &mut Agent, target: Object, key: PropertyKey, receiver: Value| {
                    get_log.borrow_mut().push("get");
                    target.internal_get(agent, key, receiver)
                },
            )),
            set: Some(Rc::new(
                move |agent: &mut Agent,
                      target: Object,
                      key: PropertyKey,
                      value: Value,
                      _: Value| {
                    set_log.borrow_mut().push("set");
                    set(agent, target, key, value, false)
                },
            )),
            own_keys: Some(Rc::new(move |agent: &mut Agent, target: Object| {
                keys_log.borrow_mut().push("ownKeys");
                target.internal_own_property_keys(agent)
            })),
            ..Default::default()
        },
    )
    .unwrap();

    let key = PropertyKey::from_str(&mut agent, "v");
    assert!(set(&mut agent, proxy, key, 5.into(), true).unwrap());
    assert_eq!(get(&mut agent, proxy, key).unwrap(), Value::from(5));
    assert_eq!(
        proxy.internal_own_property_keys(&mut agent).unwrap(),
        vec![key]
    );
    assert_eq!(get(&mut agent, target, key).unwrap(), Value::from(5));
    assert_eq!(*log.borrow(), ["set", "get", "ownKeys"]);
}

fn duplicate_keys(agent: &mut Agent, _: Value, _: ArgumentsList) -> JsResult<Value> {
    let a = Value::from_str(agent, "a");
    Ok(create_array_from_list(agent, &[a, a]).into())
}

#[test]
fn own_keys_trap_rejects_duplicates() {
    let mut agent = Agent::new(Options::default());
    let target = ordinary_object_create_with_intrinsics(&mut agent);
    let handler = ordinary_object_create_with_intrinsics(&mut agent);
    let trap = create_builtin_function(
        &mut agent,
        Behaviour::Regular(duplicate_keys),
        BuiltinFunctionArgs::new(1, "ownKeys"),
    );
    create_data_property_or_throw(
        &mut agent,
        handler,
        PropertyKey::String(BUILTIN_STRING_MEMORY.ownKeys),
        trap.into(),
    )
    .unwrap();
    let proxy = proxy_create(&mut agent, target.into(), handler.into()).unwrap();
    let error = proxy.internal_own_property_keys(&mut agent).unwrap_err();
    assert_eq!(error.exception_type(&agent), Some(ExceptionType::TypeError));
}

#[test]
fn handler_trap_that_is_not_callable_throws() {
    let mut agent = Agent::new(Options::default());
    let target = ordinary_object_create_with_intrinsics(&mut agent);
    let handler = ordinary_object_create_with_intrinsics(&mut agent);
    create_data_property_or_throw(
        &mut agent,
        handler,
        PropertyKey::String(BUILTIN_STRING_MEMORY.get),
        1.into(),
    )
    .unwrap();
    let proxy = proxy_create(&mut agent, target.into(), handler.into()).unwrap();
    let key = PropertyKey::from_str(&mut agent, "anything");
    let error = get(&mut agent, proxy, key).unwrap_err();
    assert_eq!(error.exception_type(&agent), Some(ExceptionType::TypeError));
}

#[test]
fn revocation_through_result_object() {
    let mut agent = Agent::new(Options::default());
    let target = array_create(&mut agent, 0, None).unwrap();
    let handler = ordinary_object_create_with_intrinsics(&mut agent);
    let result = proxy_revocable(&mut agent, target.into(), handler.into()).unwrap();
    let Value::Object(proxy) = get(
        &mut agent,
        result,
        PropertyKey::String(BUILTIN_STRING_MEMORY.proxy),
    )
    .unwrap() else {
        panic!("proxy property is not an object");
    };
    let Value::Object(revoke) = get(
        &mut agent,
        result,
        PropertyKey::String(BUILTIN_STRING_MEMORY.revoke),
    )
    .unwrap() else {
        panic!("revoke property is not an object");
    };

    assert!(is_array(&mut agent, proxy.into()).unwrap());
    let proxy_handle = Proxy::from_object(&agent, proxy).unwrap();
    assert_eq!(proxy_handle.target(&agent), Some(target.into()));

    call_function(&mut agent, revoke, Value::Undefined, &[]).unwrap();
    assert!(proxy_handle.is_revoked(&agent));
    let error = is_array(&mut agent, proxy.into()).unwrap_err();
    assert_eq!(error.exception_type(&agent), Some(ExceptionType::TypeError));
    let key = PropertyKey::from_str(&mut agent, "x");
    assert!(get(&mut agent, proxy, key).is_err());
    // The target is unaffected.
    assert!(set(&mut agent, target.into(), key, 1.into(), true).unwrap());
}

fn double(_: &mut Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
    match arguments.get(0) {
        Value::Number(n) => Ok((n * 2.0).into()),
        _ => Ok(Value::Undefined),
    }
}

#[test]
fn callable_target_makes_callable_proxy() {
    let mut agent = Agent::new(Options::default());
    let function = create_builtin_function(
        &mut agent,
        Behaviour::Regular(double),
        BuiltinFunctionArgs::new(1, "double"),
    );
    let plain = ordinary_object_create_with_intrinsics(&mut agent);
    let handler = ordinary_object_create_with_intrinsics(&mut agent);

    let callable = proxy_create(&mut agent, function.into(), handler.into()).unwrap();
    let not_callable = proxy_create(&mut agent, plain.into(), handler.into()).unwrap();
    assert_eq!(is_callable(&agent, callable.into()), Some(callable));
    assert_eq!(is_callable(&agent, not_callable.into()), None);
    assert_eq!(is_constructor(&agent, callable.into()), None);

    let result = call_function(&mut agent, callable, Value::Undefined, &[21.into()]).unwrap();
    assert_eq!(result, Value::from(42));
    assert!(call_function(&mut agent, not_callable, Value::Undefined, &[]).is_err());
    assert!(construct(&mut agent, callable, &[], None).is_err());
}

#[test]
fn apply_trap_sees_the_arguments() {
    let mut agent = Agent::new(Options::default());
    let function = create_builtin_function(
        &mut agent,
        Behaviour::Regular(double),
        BuiltinFunctionArgs::new(1, "double"),
    );
    let proxy = new_native_proxy(
        &mut agent,
        function,
        ProxyTrapConfig {
            apply: Some(Rc::new(
                |agent: &mut Agent, target: Object, this: Value, arguments: &[Value]| {
                    let doubled = call_function(agent, target, this, arguments)?;
                    call_function(agent, target, this, &[doubled])
                },
            )),
            ..Default::default()
        },
    )
    .unwrap();
    let result = call_function(&mut agent, proxy, Value::Undefined, &[5.into()]).unwrap();
    assert_eq!(result, Value::from(20));
}

#[test]
fn own_keys_trap_must_report_non_configurable_keys() {
    let mut agent = Agent::new(Options::default());
    let x = PropertyKey::from_str(&mut agent, "x");
    let target = frozen_target(&mut agent, x);
    let proxy = new_native_proxy(
        &mut agent,
        target,
        ProxyTrapConfig {
            own_keys: Some(Rc::new(|_: &mut Agent, _: Object| Ok(vec![]))),
            ..Default::default()
        },
    )
    .unwrap();

    let error = proxy.internal_own_property_keys(&mut agent).unwrap_err();
    assert_eq!(error.exception_type(&agent), Some(ExceptionType::TypeError));
}

#[test]
fn own_keys_trap_cannot_add_keys_to_non_extensible_target() {
    let mut agent = Agent::new(Options::default());
    let x = PropertyKey::from_str(&mut agent, "x");
    let y = PropertyKey::from_str(&mut agent, "y");
    let target = frozen_target(&mut agent, x);
    prevent_extensions(&mut agent, target, true).unwrap();
    let proxy = new_native_proxy(
        &mut agent,
        target,
        ProxyTrapConfig {
            own_keys: Some(Rc::new(move |_: &mut Agent, _: Object| Ok(vec![x, y]))),
            ..Default::default()
        },
    )
    .unwrap();

    let error = proxy.internal_own_property_keys(&mut agent).unwrap_err();
    assert_eq!(error.exception_type(&agent), Some(ExceptionType::TypeError));
}

fn accepting_define_proxy(agent: &mut Agent, target: Object) -> Object {
    new_native_proxy(
        agent,
        target,
        ProxyTrapConfig {
            define_property: Some(Rc::new(
                |_: &mut Agent, _: Object, _: PropertyKey, _: PropertyDescriptor| Ok(true),
            )),
            ..Default::default()
        },
    )
    .unwrap()
}

#[test]
fn define_property_trap_cannot_claim_to_change_frozen_value() {
    let mut agent = Agent::new(Options::default());
    let x = PropertyKey::from_str(&mut agent, "x");
    let target = frozen_target(&mut agent, x);
    let proxy = accepting_define_proxy(&mut agent, target);

    let error = proxy
        .internal_define_own_property(&mut agent, x, PropertyDescriptor::new_data_descriptor(2))
        .unwrap_err();
    assert_eq!(error.exception_type(&agent), Some(ExceptionType::TypeError));
    assert_eq!(get(&mut agent, target, x).unwrap(), Value::from(1));
}

#[test]
fn define_property_trap_cannot_invent_non_configurable_key() {
    let mut agent = Agent::new(Options::default());
    let x = PropertyKey::from_str(&mut agent, "x");
    let z = PropertyKey::from_str(&mut agent, "z");
    let target = frozen_target(&mut agent, x);
    let proxy = accepting_define_proxy(&mut agent, target);

    let error = define_property_or_throw(
        &mut agent,
        proxy,
        z,
        PropertyDescriptor::new_frozen_data_descriptor(3),
    )
    .unwrap_err();
    assert_eq!(error.exception_type(&agent), Some(ExceptionType::TypeError));
    assert!(!has_property(&mut agent, target, z).unwrap());
    // A configurable definition may be reported without reaching the target.
    assert!(
        proxy
            .internal_define_own_property(&mut agent, z, PropertyDescriptor::new_data_descriptor(3))
            .unwrap()
    );
}

#[test]
fn delete_property_trap_cannot_remove_non_configurable_key() {
    let mut agent = Agent::new(Options::default());
    let x = PropertyKey::from_str(&mut agent, "x");
    let target = frozen_target(&mut agent, x);
    let proxy = new_native_proxy(
        &mut agent,
        target,
        ProxyTrapConfig {
            delete_property: Some(Rc::new(|_: &mut Agent, _: Object, _: PropertyKey| Ok(true))),
            ..Default::default()
        },
    )
    .unwrap();

    let error = proxy.internal_delete(&mut agent, x).unwrap_err();
    assert_eq!(error.exception_type(&agent), Some(ExceptionType::TypeError));
    assert!(has_property(&mut agent, target, x).unwrap());
}

#[test]
fn get_own_property_descriptor_trap_cannot_misreport_frozen_property() {
    let mut agent = Agent::new(Options::default());
    let x = PropertyKey::from_str(&mut agent, "x");
    let target = frozen_target(&mut agent, x);
    let hiding = new_native_proxy(
        &mut agent,
        target,
        ProxyTrapConfig {
            get_own_property_descriptor: Some(Rc::new(
                |_: &mut Agent, _: Object, _: PropertyKey| Ok(None),
            )),
            ..Default::default()
        },
    )
    .unwrap();
    let error = hiding.internal_get_own_property(&mut agent, x).unwrap_err();
    assert_eq!(error.exception_type(&agent), Some(ExceptionType::TypeError));

    let loosening = new_native_proxy(
        &mut agent,
        target,
        ProxyTrapConfig {
            get_own_property_descriptor: Some(Rc::new(
                |_: &mut Agent, _: Object, _: PropertyKey| {
                    Ok(Some(PropertyDescriptor::new_data_descriptor(1)))
                },
            )),
            ..Default::default()
        },
    )
    .unwrap();
    let error = loosening.internal_get_own_property(&mut agent, x).unwrap_err();
    assert_eq!(error.exception_type(&agent), Some(ExceptionType::TypeError));
}
