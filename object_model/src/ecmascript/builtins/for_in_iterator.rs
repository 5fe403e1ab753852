// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [14.7.5.10 For-In Iterator Objects](https://tc39.es/ecma262/#sec-for-in-iterator-objects)

use std::collections::VecDeque;

use ahash::AHashSet;

use crate::ecmascript::{
    execution::{Agent, JsResult},
    types::{InternalMethods, Object, PropertyKey},
};

/// Enumerates the enumerable string keys of an object and its prototype
/// chain.
///
/// Each object's keys are snapshotted when the iterator reaches it. Keys
/// deleted afterwards are skipped, keys added afterwards are not visited,
/// and a key is never produced twice even if it is shadowed further up the
/// chain. Arrays switching storage mid-iteration do not affect the snapshot.
#[derive(Debug)]
pub struct ForInIterator {
    /// \[\[Object]]
    object: Option<Object>,
    /// \[\[ObjectWasVisited]]
    object_was_visited: bool,
    /// \[\[VisitedKeys]]
    visited_keys: AHashSet<PropertyKey>,
    /// \[\[RemainingKeys]]
    remaining_keys: VecDeque<PropertyKey>,
}

impl ForInIterator {
    /// ### [14.7.5.10.1 CreateForInIterator ( object )](https://tc39.es/ecma262/#sec-createforiniterator)
    pub fn new(object: Object) -> Self {
        Self {
            object: Some(object),
            object_was_visited: false,
            visited_keys: AHashSet::new(),
            remaining_keys: VecDeque::new(),
        }
    }

    /// ### [14.7.5.10.2.1 %ForInIteratorPrototype%.next ( )](https://tc39.es/ecma262/#sec-%foriniteratorprototype%.next)
    pub fn next(&mut self, agent: &mut Agent) -> JsResult<Option<PropertyKey>> {
        // 5. Repeat,
        loop {
            let Some(object) = self.object else {
                return Ok(None);
            };
            // a. If O.[[ObjectWasVisited]] is false, then
            if !self.object_was_visited {
                // i. Let keys be ? object.[[OwnPropertyKeys]]().
                let keys = object.internal_own_property_keys(agent)?;
                // ii. For each element key of keys, do
                // 1. If key is a String, then
                // a. Append key to O.[[RemainingKeys]].
                self.remaining_keys
                    .extend(keys.into_iter().filter(|key| !key.is_symbol()));
                // iii. Set O.[[ObjectWasVisited]] to true.
                self.object_was_visited = true;
            }
            // b. Repeat, while O.[[RemainingKeys]] is not empty,
            // i. Let r be the first element of O.[[RemainingKeys]].
            // ii. Remove the first element from O.[[RemainingKeys]].
            while let Some(r) = self.remaining_keys.pop_front() {
                // iii. If there does not exist an element v of O.[[VisitedKeys]] such that SameValue(r, v) is true, then
                if self.visited_keys.contains(&r) {
                    continue;
                }
                // 1. Let desc be ? object.[[GetOwnProperty]](r).
                // 2. If desc is not undefined, then
                if let Some(desc) = object.internal_get_own_property(agent, r)? {
                    // a. Append r to O.[[VisitedKeys]].
                    self.visited_keys.insert(r);
                    // b. If desc.[[Enumerable]] is true, return CreateIterResultObject(r, false).
                    if desc.enumerable == Some(true) {
                        return Ok(Some(r));
                    }
                }
            }
            // c. Set object to ? object.[[GetPrototypeOf]]().
            // d. Set O.[[Object]] to object.
            // e. Set O.[[ObjectWasVisited]] to false.
            // f. If object is null, return CreateIterResultObject(undefined, true).
            self.object = object.internal_get_prototype_of(agent)?;
            self.object_was_visited = false;
        }
    }

    /// Drains the iterator.
    pub fn collect_keys(mut self, agent: &mut Agent) -> JsResult<Vec<PropertyKey>> {
        let mut keys = Vec::new();
        while let Some(key) = self.next(agent)? {
            keys.push(key);
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ecmascript::{
        abstract_operations::operations_on_objects::{
            create_data_property_or_throw, delete_property_or_throw,
        },
        builtins::{ordinary_object_create_with_intrinsics, ordinary_object_create_with_prototype},
        execution::Options,
    };

    #[test]
    fn shadowed_keys_are_produced_once() {
        let mut agent = Agent::new(Options::default());
        let parent = ordinary_object_create_with_intrinsics(&mut agent);
        let child = ordinary_object_create_with_prototype(&mut agent, Some(parent));
        let a = PropertyKey::from_str(&mut agent, "a");
        let b = PropertyKey::from_str(&mut agent, "b");
        create_data_property_or_throw(&mut agent, parent, a, 1.into()).unwrap();
        create_data_property_or_throw(&mut agent, parent, b, 2.into()).unwrap();
        create_data_property_or_throw(&mut agent, child, a, 3.into()).unwrap();
        let keys = ForInIterator::new(child).collect_keys(&mut agent).unwrap();
        assert_eq!(keys, vec![a, b]);
    }

    #[test]
    fn keys_deleted_mid_iteration_are_skipped() {
        let mut agent = Agent::new(Options::default());
        let object = ordinary_object_create_with_intrinsics(&mut agent);
        let keys: Vec<PropertyKey> = ["x", "y", "z"]
            .into_iter()
            .map(|name| PropertyKey::from_str(&mut agent, name))
            .collect();
        for key in keys.iter() {
            create_data_property_or_throw(&mut agent, object, *key, true.into()).unwrap();
        }
        let mut iterator = ForInIterator::new(object);
        assert_eq!(iterator.next(&mut agent).unwrap(), Some(keys[0]));
        delete_property_or_throw(&mut agent, object, keys[1]).unwrap();
        let added = PropertyKey::from_str(&mut agent, "added");
        create_data_property_or_throw(&mut agent, object, added, true.into()).unwrap();
        assert_eq!(iterator.next(&mut agent).unwrap(), Some(keys[2]));
        assert_eq!(iterator.next(&mut agent).unwrap(), None);
    }
}
