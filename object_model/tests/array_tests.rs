// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use ecmascript_object_model::ecmascript::{
    abstract_operations::{
        operations_on_objects::{
            create_data_property_or_throw, define_property_or_throw, delete_property, get,
            has_property, length_of_array_like, set,
        },
        testing_and_comparison::is_array,
    },
    builtins::{Array, array_create, create_array_from_list},
    execution::{Agent, ExceptionType, Options},
    types::{BUILTIN_STRING_MEMORY, InternalMethods, Object, PropertyDescriptor, PropertyKey, Value},
};

fn length_key() -> PropertyKey {
    PropertyKey::String(BUILTIN_STRING_MEMORY.length)
}

fn new_array(agent: &mut Agent) -> Object {
    array_create(agent, 0, None).unwrap().into()
}

fn is_sparse(agent: &Agent, object: Object) -> bool {
    Array::from_object(agent, object).unwrap().is_sparse(agent)
}

#[test]
fn shrinking_stops_at_non_configurable_element() {
    let mut agent = Agent::new(Options::default());
    let values = [1.into(), 2.into(), 3.into(), 4.into()];
    let array: Object = create_array_from_list(&mut agent, &values).into();
    define_property_or_throw(
        &mut agent,
        array,
        PropertyKey::Integer(2),
        PropertyDescriptor {
            value: Some(42.into()),
            writable: Some(false),
            configurable: Some(false),
            ..Default::default()
        },
    )
    .unwrap();

    assert!(!set(&mut agent, array, length_key(), 0.into(), false).unwrap());
    assert_eq!(length_of_array_like(&mut agent, array).unwrap(), 3);
    assert_eq!(
        get(&mut agent, array, PropertyKey::Integer(2)).unwrap(),
        Value::from(42)
    );
    assert!(!has_property(&mut agent, array, PropertyKey::Integer(3)).unwrap());

    let error = set(&mut agent, array, length_key(), 0.into(), true).unwrap_err();
    assert_eq!(error.exception_type(&agent), Some(ExceptionType::TypeError));
    assert_eq!(length_of_array_like(&mut agent, array).unwrap(), 3);
}

#[test]
fn writing_past_length_extends_it() {
    let mut agent = Agent::new(Options::default());
    let array = new_array(&mut agent);
    set(&mut agent, array, PropertyKey::Integer(5), 1.into(), true).unwrap();
    assert_eq!(length_of_array_like(&mut agent, array).unwrap(), 6);
    assert!(!has_property(&mut agent, array, PropertyKey::Integer(0)).unwrap());
    assert_eq!(
        get(&mut agent, array, PropertyKey::Integer(0)).unwrap(),
        Value::Undefined
    );
    assert!(is_array(&mut agent, array.into()).unwrap());
}

#[test]
fn invalid_lengths_throw_range_errors() {
    let mut agent = Agent::new(Options::default());
    let array = new_array(&mut agent);
    let error = set(&mut agent, array, length_key(), 1.5.into(), true).unwrap_err();
    assert_eq!(error.exception_type(&agent), Some(ExceptionType::RangeError));
    let error = set(&mut agent, array, length_key(), (-1).into(), true).unwrap_err();
    assert_eq!(error.exception_type(&agent), Some(ExceptionType::RangeError));
    assert!(array_create(&mut agent, 1 << 32, None).is_err());
}

#[test]
fn non_writable_length_blocks_growth() {
    let mut agent = Agent::new(Options::default());
    let values = [1.into(), 2.into()];
    let array: Object = create_array_from_list(&mut agent, &values).into();
    define_property_or_throw(
        &mut agent,
        array,
        length_key(),
        PropertyDescriptor {
            writable: Some(false),
            ..Default::default()
        },
    )
    .unwrap();
    assert!(!set(&mut agent, array, PropertyKey::Integer(2), 3.into(), false).unwrap());
    assert!(!set(&mut agent, array, length_key(), 5.into(), false).unwrap());
    // Existing elements stay writable.
    assert!(set(&mut agent, array, PropertyKey::Integer(0), 7.into(), false).unwrap());
    assert_eq!(length_of_array_like(&mut agent, array).unwrap(), 2);
}

#[test]
fn non_writable_length_failures_name_the_length() {
    let mut agent = Agent::new(Options::default());
    let values = [1.into(), 2.into()];
    let array: Object = create_array_from_list(&mut agent, &values).into();
    define_property_or_throw(
        &mut agent,
        array,
        length_key(),
        PropertyDescriptor {
            writable: Some(false),
            ..Default::default()
        },
    )
    .unwrap();

    let error =
        create_data_property_or_throw(&mut agent, array, PropertyKey::Integer(2), 3.into())
            .unwrap_err();
    assert_eq!(error.exception_type(&agent), Some(ExceptionType::TypeError));
    assert_eq!(
        error.message(&agent).as_deref(),
        Some("Cannot add property 2, array length 2 is not writable")
    );
    let error = set(&mut agent, array, PropertyKey::Integer(7), 3.into(), true).unwrap_err();
    assert_eq!(
        error.message(&agent).as_deref(),
        Some("Cannot add property 7, array length 2 is not writable")
    );
    // Indexes below the length keep the usual messages.
    define_property_or_throw(
        &mut agent,
        array,
        PropertyKey::Integer(0),
        PropertyDescriptor::new_frozen_data_descriptor(1),
    )
    .unwrap();
    let error =
        create_data_property_or_throw(&mut agent, array, PropertyKey::Integer(0), 3.into())
            .unwrap_err();
    assert_eq!(
        error.message(&agent).as_deref(),
        Some("Cannot redefine property: 0")
    );
}

#[test]
fn distant_write_switches_to_sparse_and_back() {
    let mut agent = Agent::new(Options::default());
    let array = new_array(&mut agent);
    set(&mut agent, array, PropertyKey::Integer(20470), 1.into(), true).unwrap();
    assert!(is_sparse(&agent, array));
    assert_eq!(length_of_array_like(&mut agent, array).unwrap(), 20471);

    for index in 17911..20470 {
        set(&mut agent, array, PropertyKey::Integer(index), index.into(), true).unwrap();
    }
    assert!(!is_sparse(&agent, array));
    assert_eq!(length_of_array_like(&mut agent, array).unwrap(), 20471);
    assert_eq!(
        get(&mut agent, array, PropertyKey::Integer(0)).unwrap(),
        Value::Undefined
    );
    assert_eq!(
        get(&mut agent, array, PropertyKey::Integer(17910)).unwrap(),
        Value::Undefined
    );
    assert_eq!(
        get(&mut agent, array, PropertyKey::Integer(17911)).unwrap(),
        Value::from(17911)
    );
    assert_eq!(
        get(&mut agent, array, PropertyKey::Integer(20470)).unwrap(),
        Value::from(1)
    );
}

#[test]
fn descending_fill_densifies_at_the_same_point() {
    let mut agent = Agent::new(Options::default());
    let array = new_array(&mut agent);
    set(&mut agent, array, PropertyKey::Integer(20470), 1.into(), true).unwrap();
    for index in (17912..20470).rev() {
        set(&mut agent, array, PropertyKey::Integer(index), index.into(), true).unwrap();
    }
    assert!(is_sparse(&agent, array));
    set(&mut agent, array, PropertyKey::Integer(17911), 0.into(), true).unwrap();
    assert!(!is_sparse(&agent, array));
}

/// Runs the same sequence of writes against an array and returns its
/// observable state.
fn scripted_writes(agent: &mut Agent) -> (Vec<PropertyKey>, Vec<Value>) {
    let array = new_array(agent);
    for index in [3, 9000, 1, 50000, 49999, 2, 0] {
        set(agent, array, PropertyKey::Integer(index), index.into(), true).unwrap();
    }
    let key = PropertyKey::from_str(agent, "label");
    let mixed = Value::from_str(agent, "mixed");
    set(agent, array, key, mixed, true).unwrap();
    define_property_or_throw(
        agent,
        array,
        PropertyKey::Integer(7),
        PropertyDescriptor {
            get: Some(None),
            configurable: Some(true),
            ..Default::default()
        },
    )
    .unwrap();
    delete_property(agent, array, PropertyKey::Integer(9000), true).unwrap();
    set(agent, array, length_key(), 40000.into(), true).unwrap();

    let keys = array.internal_own_property_keys(agent).unwrap();
    let values = keys
        .iter()
        .map(|key| get(agent, array, *key).unwrap())
        .collect();
    (keys, values)
}

#[test]
fn storage_switching_is_unobservable() {
    let mut switching = Agent::new(Options::default());
    let mut dense_only = Agent::new(Options {
        disable_array_switching: true,
        ..Default::default()
    });
    let (switching_keys, switching_values) = scripted_writes(&mut switching);
    let (dense_keys, dense_values) = scripted_writes(&mut dense_only);

    let display = |agent: &Agent, keys: &[PropertyKey]| {
        keys.iter()
            .map(|key| key.as_display(agent))
            .collect::<Vec<_>>()
    };
    assert_eq!(
        display(&switching, &switching_keys),
        display(&dense_only, &dense_keys)
    );
    assert_eq!(
        display(&switching, &switching_keys),
        ["0", "1", "2", "3", "7", "length", "label"]
    );
    assert_eq!(switching_values.len(), dense_values.len());
    for (a, b) in switching_values.iter().zip(dense_values.iter()) {
        match (a, b) {
            (Value::String(a), Value::String(b)) => assert_eq!(
                a.to_string_lossy(&switching),
                b.to_string_lossy(&dense_only)
            ),
            (a, b) => assert_eq!(a, b),
        }
    }
}
