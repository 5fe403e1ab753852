// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod internal_methods;
mod property_key;

pub use internal_methods::InternalMethods;
pub(crate) use property_key::MAX_ARRAY_INDEX;
pub use property_key::PropertyKey;

use super::Value;
use crate::{
    ecmascript::{
        builtins::{
            array::{Array, DenseArrayHeapData, SparseArrayHeapData},
            builtin_function::BuiltinFunctionHeapData,
            error::ErrorHeapData,
            host_object::{HostObject, HostObjectHeapData},
            lazy_object::{LazyObjectHeapData, materialize_lazy_object},
            ordinary::{OrdinaryObject, PropertyStore},
            proxy::{Proxy, ProxyHeapData},
        },
        execution::{Agent, JsResult},
        types::PropertyDescriptor,
    },
    heap::ObjectIndex,
};

/// ### [6.1.7 The Object Type](https://tc39.es/ecma262/#sec-object-type)
///
/// An object handle. The handle's identity never changes; the backend it
/// forwards to lives in the heap and may be swapped at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Object(ObjectIndex);

/// The storage and behaviour strategy active for an object.
#[derive(Debug)]
pub(crate) enum Backend {
    Ordinary(PropertyStore),
    DenseArray(DenseArrayHeapData),
    SparseArray(SparseArrayHeapData),
    Proxy(ProxyHeapData),
    BuiltinFunction(BuiltinFunctionHeapData),
    Error(ErrorHeapData),
    Host(HostObjectHeapData),
    Lazy(LazyObjectHeapData),
}

/// Discriminant of the active backend, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Ordinary,
    DenseArray,
    SparseArray,
    Proxy,
    BuiltinFunction,
    Error,
    Host,
    Lazy,
}

impl Backend {
    pub(crate) fn kind(&self) -> BackendKind {
        match self {
            Backend::Ordinary(_) => BackendKind::Ordinary,
            Backend::DenseArray(_) => BackendKind::DenseArray,
            Backend::SparseArray(_) => BackendKind::SparseArray,
            Backend::Proxy(_) => BackendKind::Proxy,
            Backend::BuiltinFunction(_) => BackendKind::BuiltinFunction,
            Backend::Error(_) => BackendKind::Error,
            Backend::Host(_) => BackendKind::Host,
            Backend::Lazy(_) => BackendKind::Lazy,
        }
    }

    /// The store holding the prototype, extensibility and named properties.
    /// Proxies and uninitialised lazy objects have none.
    pub(crate) fn property_store(&self) -> Option<&PropertyStore> {
        match self {
            Backend::Ordinary(store) => Some(store),
            Backend::DenseArray(data) => Some(&data.properties.store),
            Backend::SparseArray(data) => Some(&data.properties.store),
            Backend::BuiltinFunction(data) => Some(&data.store),
            Backend::Error(data) => Some(&data.store),
            Backend::Host(data) => Some(&data.store),
            Backend::Proxy(_) | Backend::Lazy(_) => None,
        }
    }

    pub(crate) fn property_store_mut(&mut self) -> Option<&mut PropertyStore> {
        match self {
            Backend::Ordinary(store) => Some(store),
            Backend::DenseArray(data) => Some(&mut data.properties.store),
            Backend::SparseArray(data) => Some(&mut data.properties.store),
            Backend::BuiltinFunction(data) => Some(&mut data.store),
            Backend::Error(data) => Some(&mut data.store),
            Backend::Host(data) => Some(&mut data.store),
            Backend::Proxy(_) | Backend::Lazy(_) => None,
        }
    }
}

/// The internal method implementation an object currently dispatches to.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ObjectView {
    Ordinary(OrdinaryObject),
    Array(Array),
    Proxy(Proxy),
    Host(HostObject),
}

impl From<ObjectIndex> for Object {
    fn from(value: ObjectIndex) -> Self {
        Object(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Value::Object(value)
    }
}

impl TryFrom<Value> for Object {
    type Error = ();

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(object) => Ok(object),
            _ => Err(()),
        }
    }
}

impl Object {
    pub(crate) const fn get_index(self) -> usize {
        self.0.into_index()
    }

    pub fn backend_kind(self, agent: &Agent) -> BackendKind {
        agent[self].backend.kind()
    }

    pub fn is_proxy(self, agent: &Agent) -> bool {
        matches!(agent[self].backend, Backend::Proxy(_))
    }

    /// Property store of a non-proxy object.
    ///
    /// ## Panics
    ///
    /// If the object is a Proxy or an uninitialised lazy object.
    pub(crate) fn property_store(self, agent: &Agent) -> &PropertyStore {
        agent[self]
            .backend
            .property_store()
            .expect("Object has no property store")
    }

    pub(crate) fn property_store_mut(self, agent: &mut Agent) -> &mut PropertyStore {
        agent[self]
            .backend
            .property_store_mut()
            .expect("Object has no property store")
    }

    /// Resolves the internal method implementation for this object,
    /// initialising lazy objects on the way.
    pub(crate) fn view(self, agent: &mut Agent) -> JsResult<ObjectView> {
        Ok(match agent[self].backend.kind() {
            BackendKind::Ordinary | BackendKind::BuiltinFunction | BackendKind::Error => {
                ObjectView::Ordinary(OrdinaryObject(self))
            }
            BackendKind::DenseArray | BackendKind::SparseArray => ObjectView::Array(Array(self)),
            BackendKind::Proxy => ObjectView::Proxy(Proxy(self)),
            BackendKind::Host => ObjectView::Host(HostObject(self)),
            BackendKind::Lazy => {
                materialize_lazy_object(agent, self)?;
                ObjectView::Ordinary(OrdinaryObject(self))
            }
        })
    }
}

macro_rules! dispatch {
    ($self:ident, $agent:ident, $method:ident($($arg:expr),*)) => {
        match $self.view($agent)? {
            ObjectView::Ordinary(data) => data.$method($agent $(, $arg)*),
            ObjectView::Array(data) => data.$method($agent $(, $arg)*),
            ObjectView::Proxy(data) => data.$method($agent $(, $arg)*),
            ObjectView::Host(data) => data.$method($agent $(, $arg)*),
        }
    };
}

impl InternalMethods for Object {
    fn internal_get_prototype_of(self, agent: &mut Agent) -> JsResult<Option<Object>> {
        dispatch!(self, agent, internal_get_prototype_of())
    }

    fn internal_set_prototype_of(
        self,
        agent: &mut Agent,
        prototype: Option<Object>,
    ) -> JsResult<bool> {
        dispatch!(self, agent, internal_set_prototype_of(prototype))
    }

    fn internal_is_extensible(self, agent: &mut Agent) -> JsResult<bool> {
        dispatch!(self, agent, internal_is_extensible())
    }

    fn internal_prevent_extensions(self, agent: &mut Agent) -> JsResult<bool> {
        dispatch!(self, agent, internal_prevent_extensions())
    }

    fn internal_get_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
    ) -> JsResult<Option<PropertyDescriptor>> {
        dispatch!(self, agent, internal_get_own_property(property_key))
    }

    fn internal_define_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        property_descriptor: PropertyDescriptor,
    ) -> JsResult<bool> {
        dispatch!(
            self,
            agent,
            internal_define_own_property(property_key, property_descriptor)
        )
    }

    fn internal_has_property(self, agent: &mut Agent, property_key: PropertyKey) -> JsResult<bool> {
        dispatch!(self, agent, internal_has_property(property_key))
    }

    fn internal_get(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        receiver: Value,
    ) -> JsResult<Value> {
        dispatch!(self, agent, internal_get(property_key, receiver))
    }

    fn internal_set(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        value: Value,
        receiver: Value,
    ) -> JsResult<bool> {
        dispatch!(self, agent, internal_set(property_key, value, receiver))
    }

    fn internal_delete(self, agent: &mut Agent, property_key: PropertyKey) -> JsResult<bool> {
        dispatch!(self, agent, internal_delete(property_key))
    }

    fn internal_own_property_keys(self, agent: &mut Agent) -> JsResult<Vec<PropertyKey>> {
        dispatch!(self, agent, internal_own_property_keys())
    }
}
