// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [24.3 WeakMap Objects](https://tc39.es/ecma262/#sec-weakmap-objects) and [24.4 WeakSet Objects](https://tc39.es/ecma262/#sec-weakset-objects)
//!
//! The storage side of weak collections. Every key object records the
//! collections holding it in its weak registry, so that finalizing the key
//! can remove its entries without scanning every collection.

use ahash::AHashMap;

use crate::{
    ecmascript::{
        execution::{Agent, ExceptionType, JsResult, weak_registry::WeakRegistry},
        types::{Object, Value},
    },
    heap::{CreateHeapData, WeakCollectionIndex},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeakCollectionKind {
    Map,
    Set,
}

#[derive(Debug)]
pub struct WeakCollectionHeapData {
    kind: WeakCollectionKind,
    pub(crate) entries: AHashMap<Object, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeakCollection(WeakCollectionIndex);

impl From<WeakCollectionIndex> for WeakCollection {
    fn from(value: WeakCollectionIndex) -> Self {
        Self(value)
    }
}

impl WeakCollection {
    pub(crate) const fn get_index(self) -> usize {
        self.0.into_index()
    }

    pub fn create(agent: &mut Agent, kind: WeakCollectionKind) -> Self {
        agent.heap.create(WeakCollectionHeapData {
            kind,
            entries: AHashMap::new(),
        })
    }

    pub fn kind(self, agent: &Agent) -> WeakCollectionKind {
        agent[self].kind
    }

    /// ### [24.3.3.5 WeakMap.prototype.set ( key, value )](https://tc39.es/ecma262/#sec-weakmap.prototype.set)
    pub fn set(self, agent: &mut Agent, key: Value, value: Value) -> JsResult<()> {
        // 3. If CanBeHeldWeakly(key) is false, throw a TypeError exception.
        let Value::Object(key) = key else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Invalid value used as weak map key",
            ));
        };
        // 4. For each Record { [[Key]], [[Value]] } p of M.[[WeakMapData]], do
        // a. If p.[[Key]] is not empty and SameValue(p.[[Key]], key) is true, then
        // i. Set p.[[Value]] to value.
        // 5. Let p be the Record { [[Key]]: key, [[Value]]: value }.
        // 6. Append p to M.[[WeakMapData]].
        agent[self].entries.insert(key, value);
        agent[key]
            .weak_registry
            .get_or_insert_with(WeakRegistry::default)
            .add(self);
        // 7. Return M.
        Ok(())
    }

    /// ### [24.4.3.1 WeakSet.prototype.add ( value )](https://tc39.es/ecma262/#sec-weakset.prototype.add)
    pub fn add(self, agent: &mut Agent, value: Value) -> JsResult<()> {
        if !value.is_object() {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Invalid value used in weak set",
            ));
        }
        self.set(agent, value, Value::Undefined)
    }

    /// ### [24.3.3.3 WeakMap.prototype.get ( key )](https://tc39.es/ecma262/#sec-weakmap.prototype.get)
    pub fn get(self, agent: &Agent, key: Value) -> Value {
        // 3. If CanBeHeldWeakly(key) is false, return undefined.
        let Value::Object(key) = key else {
            return Value::Undefined;
        };
        agent[self]
            .entries
            .get(&key)
            .copied()
            .unwrap_or(Value::Undefined)
    }

    /// ### [24.3.3.4 WeakMap.prototype.has ( key )](https://tc39.es/ecma262/#sec-weakmap.prototype.has)
    pub fn has(self, agent: &Agent, key: Value) -> bool {
        let Value::Object(key) = key else {
            return false;
        };
        agent[self].entries.contains_key(&key)
    }

    /// ### [24.3.3.2 WeakMap.prototype.delete ( key )](https://tc39.es/ecma262/#sec-weakmap.prototype.delete)
    pub fn delete(self, agent: &mut Agent, key: Value) -> bool {
        let Value::Object(key) = key else {
            return false;
        };
        if agent[self].entries.remove(&key).is_none() {
            return false;
        }
        if let Some(registry) = agent[key].weak_registry.as_mut() {
            registry.remove(self);
        }
        true
    }

    pub fn len(self, agent: &Agent) -> usize {
        agent[self].entries.len()
    }

    pub fn is_empty(self, agent: &Agent) -> bool {
        self.len(agent) == 0
    }
}
