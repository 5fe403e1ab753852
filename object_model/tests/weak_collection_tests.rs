// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![cfg(feature = "weak-refs")]

use ecmascript_object_model::ecmascript::{
    abstract_operations::operations_on_objects::{get, set},
    builtins::{
        ordinary_object_create_with_intrinsics,
        weak_collection::{WeakCollection, WeakCollectionKind},
    },
    execution::{Agent, ExceptionType, Options},
    types::{PropertyKey, Value},
};

#[test]
fn finalized_keys_leave_every_collection() {
    let mut agent = Agent::new(Options::default());
    let map = WeakCollection::create(&mut agent, WeakCollectionKind::Map);
    let set_collection = WeakCollection::create(&mut agent, WeakCollectionKind::Set);
    let key = ordinary_object_create_with_intrinsics(&mut agent);
    let survivor = ordinary_object_create_with_intrinsics(&mut agent);
    map.set(&mut agent, key.into(), 1.into()).unwrap();
    map.set(&mut agent, survivor.into(), 2.into()).unwrap();
    set_collection.add(&mut agent, key.into()).unwrap();
    assert_eq!(agent.weak_registry_len(key), 2);

    let own = PropertyKey::from_str(&mut agent, "own");
    set(&mut agent, key, own, 3.into(), true).unwrap();

    agent.finalize_object(key);
    assert!(!map.has(&agent, key.into()));
    assert!(!set_collection.has(&agent, key.into()));
    assert_eq!(map.get(&agent, survivor.into()), Value::from(2));
    assert_eq!(map.len(&agent), 1);
    // Own properties are untouched by cleanup.
    assert_eq!(get(&mut agent, key, own).unwrap(), Value::from(3));
}

#[test]
fn deleting_an_entry_unregisters_the_key() {
    let mut agent = Agent::new(Options::default());
    let map = WeakCollection::create(&mut agent, WeakCollectionKind::Map);
    let key = ordinary_object_create_with_intrinsics(&mut agent);
    map.set(&mut agent, key.into(), 1.into()).unwrap();
    map.set(&mut agent, key.into(), 2.into()).unwrap();
    assert_eq!(map.get(&agent, key.into()), Value::from(2));
    assert_eq!(agent.weak_registry_len(key), 1);
    assert!(map.delete(&mut agent, key.into()));
    assert!(!map.delete(&mut agent, key.into()));
    assert_eq!(agent.weak_registry_len(key), 0);
}

#[test]
fn primitives_cannot_be_held_weakly() {
    let mut agent = Agent::new(Options::default());
    let map = WeakCollection::create(&mut agent, WeakCollectionKind::Map);
    let set_collection = WeakCollection::create(&mut agent, WeakCollectionKind::Set);
    let error = map.set(&mut agent, 1.into(), 1.into()).unwrap_err();
    assert_eq!(error.exception_type(&agent), Some(ExceptionType::TypeError));
    assert!(set_collection.add(&mut agent, Value::Null).is_err());
    assert_eq!(map.get(&agent, 1.into()), Value::Undefined);
    assert!(!map.has(&agent, Value::Undefined));
    assert_eq!(set_collection.kind(&agent), WeakCollectionKind::Set);
}

#[test]
fn queued_cleanup_runs_on_drain() {
    let mut agent = Agent::new(Options::default());
    let map = WeakCollection::create(&mut agent, WeakCollectionKind::Map);
    let first = ordinary_object_create_with_intrinsics(&mut agent);
    let second = ordinary_object_create_with_intrinsics(&mut agent);
    map.set(&mut agent, first.into(), 1.into()).unwrap();
    map.set(&mut agent, second.into(), 2.into()).unwrap();

    let queue = agent.weak_cleanup_queue();
    queue.schedule(first);
    queue.schedule(first);
    assert_eq!(map.len(&agent), 2);
    assert_eq!(agent.run_weak_cleanup(), 2);
    assert_eq!(map.len(&agent), 1);
    assert!(map.has(&agent, second.into()));
}
