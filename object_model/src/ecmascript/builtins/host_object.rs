// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Objects whose own properties live in embedder storage.
//!
//! The engine keeps the prototype and extensibility of a host object;
//! own-property access goes through a [`HostObjectAdapter`]. Inherited
//! lookups, receivers and setters use the ordinary algorithms on top of the
//! adapter, so a host object behaves like any other object to callers.

use std::{fmt::Debug, rc::Rc};

use super::ordinary::PropertyStore;
use crate::{
    ecmascript::{
        execution::{Agent, JsResult},
        types::{Backend, InternalMethods, Object, PropertyDescriptor, PropertyKey, Value},
    },
    heap::CreateHeapData,
};

/// Own-property access into foreign storage. Implementations use interior
/// mutability for their state.
pub trait HostObjectAdapter {
    /// Returns the fully populated descriptor of the own property `key`.
    fn get_own_property(
        &self,
        agent: &mut Agent,
        key: PropertyKey,
    ) -> JsResult<Option<PropertyDescriptor>>;

    /// Creates or updates the own property `key`. Returns false if the
    /// storage cannot represent the requested property.
    fn define_own_property(
        &self,
        agent: &mut Agent,
        key: PropertyKey,
        descriptor: PropertyDescriptor,
    ) -> JsResult<bool>;

    fn delete(&self, agent: &mut Agent, key: PropertyKey) -> JsResult<bool>;

    /// Own keys in enumeration order.
    fn own_property_keys(&self, agent: &mut Agent) -> JsResult<Vec<PropertyKey>>;
}

pub struct HostObjectHeapData {
    /// Prototype and extensibility. Named properties stay empty.
    pub(crate) store: PropertyStore,
    pub(crate) adapter: Rc<dyn HostObjectAdapter>,
}

impl Debug for HostObjectHeapData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostObjectHeapData")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostObject(pub(crate) Object);

impl From<HostObject> for Object {
    fn from(value: HostObject) -> Self {
        value.0
    }
}

impl From<HostObject> for Value {
    fn from(value: HostObject) -> Self {
        Value::Object(value.0)
    }
}

impl HostObject {
    fn adapter(self, agent: &Agent) -> Rc<dyn HostObjectAdapter> {
        match &agent[self.0].backend {
            Backend::Host(data) => data.adapter.clone(),
            _ => unreachable!("HostObject handle over a non-host backend"),
        }
    }
}

impl InternalMethods for HostObject {
    fn internal_get_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
    ) -> JsResult<Option<PropertyDescriptor>> {
        self.adapter(agent).get_own_property(agent, property_key)
    }

    fn internal_define_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        property_descriptor: PropertyDescriptor,
    ) -> JsResult<bool> {
        let adapter = self.adapter(agent);
        if !self.0.property_store(agent).extensible
            && adapter.get_own_property(agent, property_key)?.is_none()
        {
            return Ok(false);
        }
        adapter.define_own_property(agent, property_key, property_descriptor)
    }

    fn internal_delete(self, agent: &mut Agent, property_key: PropertyKey) -> JsResult<bool> {
        self.adapter(agent).delete(agent, property_key)
    }

    fn internal_own_property_keys(self, agent: &mut Agent) -> JsResult<Vec<PropertyKey>> {
        self.adapter(agent).own_property_keys(agent)
    }
}

/// Creates an object whose own properties are provided by `adapter`.
pub fn create_host_object(
    agent: &mut Agent,
    prototype: Option<Object>,
    adapter: Rc<dyn HostObjectAdapter>,
) -> Object {
    agent.heap.create(Backend::Host(HostObjectHeapData {
        store: PropertyStore::new(prototype),
        adapter,
    }))
}
