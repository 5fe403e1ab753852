// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use ecmascript_object_model::ecmascript::{
    abstract_operations::operations_on_objects::{
        define_property_or_throw, delete_property, get, get_prototype_of, own_keys, set,
        set_prototype_of,
    },
    builtins::{ForInIterator, ordinary_object_create_with_intrinsics, ordinary_object_create_with_prototype},
    execution::{Agent, ExceptionType, Options},
    types::{InternalMethods, PropertyDescriptor, PropertyKey, Symbol, Value},
};

#[test]
fn partial_descriptors_are_completed_with_defaults() {
    let mut agent = Agent::new(Options::default());
    let object = ordinary_object_create_with_intrinsics(&mut agent);
    let key = PropertyKey::from_str(&mut agent, "a");
    define_property_or_throw(
        &mut agent,
        object,
        key,
        PropertyDescriptor {
            value: Some(1.into()),
            ..Default::default()
        },
    )
    .unwrap();
    let desc = object
        .internal_get_own_property(&mut agent, key)
        .unwrap()
        .unwrap();
    assert_eq!(
        desc,
        PropertyDescriptor {
            value: Some(1.into()),
            writable: Some(false),
            enumerable: Some(false),
            configurable: Some(false),
            ..Default::default()
        }
    );

    let accessor_key = PropertyKey::from_str(&mut agent, "b");
    define_property_or_throw(
        &mut agent,
        object,
        accessor_key,
        PropertyDescriptor {
            get: Some(None),
            enumerable: Some(true),
            ..Default::default()
        },
    )
    .unwrap();
    let desc = object
        .internal_get_own_property(&mut agent, accessor_key)
        .unwrap()
        .unwrap();
    assert!(desc.is_accessor_descriptor());
    assert_eq!(desc.get, Some(None));
    assert_eq!(desc.set, Some(None));
    assert_eq!(desc.configurable, Some(false));
    assert_eq!(get(&mut agent, object, accessor_key).unwrap(), Value::Undefined);
}

#[test]
fn frozen_property_cannot_change() {
    let mut agent = Agent::new(Options::default());
    let object = ordinary_object_create_with_intrinsics(&mut agent);
    let key = PropertyKey::from_str(&mut agent, "x");
    define_property_or_throw(
        &mut agent,
        object,
        key,
        PropertyDescriptor::new_frozen_data_descriptor(1),
    )
    .unwrap();

    // Redefinition with the same value is allowed.
    assert!(
        object
            .internal_define_own_property(&mut agent, key, PropertyDescriptor::new_frozen_data_descriptor(1))
            .unwrap()
    );
    assert!(
        !object
            .internal_define_own_property(
                &mut agent,
                key,
                PropertyDescriptor {
                    value: Some(2.into()),
                    ..Default::default()
                }
            )
            .unwrap()
    );
    assert!(
        !object
            .internal_define_own_property(
                &mut agent,
                key,
                PropertyDescriptor {
                    enumerable: Some(true),
                    ..Default::default()
                }
            )
            .unwrap()
    );
    assert!(!set(&mut agent, object, key, 2.into(), false).unwrap());
    let error = set(&mut agent, object, key, 2.into(), true).unwrap_err();
    assert_eq!(error.exception_type(&agent), Some(ExceptionType::TypeError));
    assert!(!delete_property(&mut agent, object, key, false).unwrap());
    assert!(delete_property(&mut agent, object, key, true).is_err());
    assert_eq!(get(&mut agent, object, key).unwrap(), Value::from(1));
}

#[test]
fn prototype_cycles_are_rejected() {
    let mut agent = Agent::new(Options::default());
    let a = ordinary_object_create_with_prototype(&mut agent, None);
    let b = ordinary_object_create_with_prototype(&mut agent, Some(a));
    let c = ordinary_object_create_with_prototype(&mut agent, Some(b));

    assert!(!set_prototype_of(&mut agent, a, Some(c), false).unwrap());
    let error = set_prototype_of(&mut agent, a, Some(c), true).unwrap_err();
    assert_eq!(error.exception_type(&agent), Some(ExceptionType::TypeError));
    assert_eq!(
        error.message(&agent).as_deref(),
        Some("Cyclic __proto__ value")
    );
    assert_eq!(get_prototype_of(&mut agent, a).unwrap(), None);
    assert!(!set_prototype_of(&mut agent, a, Some(a), false).unwrap());
    // Setting the current prototype again is always allowed.
    assert!(set_prototype_of(&mut agent, c, Some(b), false).unwrap());
}

#[test]
fn non_extensible_objects_keep_their_prototype() {
    let mut agent = Agent::new(Options::default());
    let object = ordinary_object_create_with_intrinsics(&mut agent);
    let other = ordinary_object_create_with_prototype(&mut agent, None);
    assert!(object.internal_prevent_extensions(&mut agent).unwrap());
    assert!(!object.internal_is_extensible(&mut agent).unwrap());
    let error = set_prototype_of(&mut agent, object, Some(other), true).unwrap_err();
    assert_eq!(error.exception_type(&agent), Some(ExceptionType::TypeError));
    let key = PropertyKey::from_str(&mut agent, "fresh");
    assert!(!set(&mut agent, object, key, 1.into(), false).unwrap());
    assert_eq!(
        object.internal_get_own_property(&mut agent, key).unwrap(),
        None
    );
}

#[test]
fn own_keys_follow_enumeration_order() {
    let mut agent = Agent::new(Options::default());
    let object = ordinary_object_create_with_intrinsics(&mut agent);
    let s1 = Symbol::new(Some("s1"));
    let s2 = Symbol::new(Some("s2"));
    let insertion_order = [
        PropertyKey::Symbol(s2),
        PropertyKey::from_str(&mut agent, "4294967294"),
        PropertyKey::from_str(&mut agent, "2"),
        PropertyKey::from_str(&mut agent, "1"),
        PropertyKey::from_str(&mut agent, "0"),
        PropertyKey::from_str(&mut agent, "02"),
        PropertyKey::from_str(&mut agent, "4294967295"),
        PropertyKey::from_str(&mut agent, "01"),
        PropertyKey::from_str(&mut agent, "00"),
        PropertyKey::Symbol(s1),
    ];
    for key in insertion_order {
        set(&mut agent, object, key, Value::Null, true).unwrap();
    }
    let expected = vec![
        PropertyKey::Integer(0),
        PropertyKey::Integer(1),
        PropertyKey::Integer(2),
        PropertyKey::Integer(4294967294),
        PropertyKey::from_str(&mut agent, "02"),
        PropertyKey::from_str(&mut agent, "4294967295"),
        PropertyKey::from_str(&mut agent, "01"),
        PropertyKey::from_str(&mut agent, "00"),
        PropertyKey::Symbol(s2),
        PropertyKey::Symbol(s1),
    ];
    assert_eq!(object.internal_own_property_keys(&mut agent).unwrap(), expected);

    // Re-assigning keeps the original position; delete and re-add moves the
    // key to the end.
    let key_02 = PropertyKey::from_str(&mut agent, "02");
    set(&mut agent, object, key_02, 1.into(), true).unwrap();
    assert_eq!(object.internal_own_property_keys(&mut agent).unwrap(), expected);
    delete_property(&mut agent, object, key_02, true).unwrap();
    set(&mut agent, object, key_02, 1.into(), true).unwrap();
    let keys = own_keys(&mut agent, object, false).unwrap();
    assert_eq!(keys.last(), Some(&key_02));
}

#[test]
fn inherited_values_are_shadowed_on_write() {
    let mut agent = Agent::new(Options::default());
    let parent = ordinary_object_create_with_intrinsics(&mut agent);
    let child = ordinary_object_create_with_prototype(&mut agent, Some(parent));
    let key = PropertyKey::from_str(&mut agent, "shared");
    set(&mut agent, parent, key, 1.into(), true).unwrap();
    assert_eq!(get(&mut agent, child, key).unwrap(), Value::from(1));
    set(&mut agent, child, key, 2.into(), true).unwrap();
    assert_eq!(get(&mut agent, child, key).unwrap(), Value::from(2));
    assert_eq!(get(&mut agent, parent, key).unwrap(), Value::from(1));

    // A read-only inherited property blocks the write on the child.
    let locked = PropertyKey::from_str(&mut agent, "locked");
    define_property_or_throw(
        &mut agent,
        parent,
        locked,
        PropertyDescriptor::new_frozen_data_descriptor(1),
    )
    .unwrap();
    assert!(!set(&mut agent, child, locked, 2.into(), false).unwrap());
    assert_eq!(
        child.internal_get_own_property(&mut agent, locked).unwrap(),
        None
    );
}

#[test]
fn for_in_skips_shadowed_and_non_enumerable_keys() {
    let mut agent = Agent::new(Options::default());
    let parent = ordinary_object_create_with_intrinsics(&mut agent);
    let child = ordinary_object_create_with_prototype(&mut agent, Some(parent));
    let a = PropertyKey::from_str(&mut agent, "a");
    let b = PropertyKey::from_str(&mut agent, "b");
    let c = PropertyKey::from_str(&mut agent, "c");
    set(&mut agent, parent, a, 1.into(), true).unwrap();
    set(&mut agent, parent, b, 1.into(), true).unwrap();
    define_property_or_throw(
        &mut agent,
        child,
        a,
        PropertyDescriptor {
            value: Some(2.into()),
            enumerable: Some(false),
            ..Default::default()
        },
    )
    .unwrap();
    set(&mut agent, child, c, 1.into(), true).unwrap();
    set(&mut agent, child, PropertyKey::Symbol(Symbol::new(None)), 1.into(), true).unwrap();

    let keys = ForInIterator::new(child).collect_keys(&mut agent).unwrap();
    assert_eq!(keys, vec![c, b]);
}
