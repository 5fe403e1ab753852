// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{Object, PropertyKey};
use crate::ecmascript::{
    builtins::ordinary::{
        ordinary_define_own_property, ordinary_delete, ordinary_get, ordinary_get_own_property,
        ordinary_get_prototype_of, ordinary_has_property, ordinary_is_extensible,
        ordinary_own_property_keys, ordinary_prevent_extensions, ordinary_set,
        ordinary_set_prototype_of,
    },
    execution::{Agent, JsResult},
    types::{PropertyDescriptor, Value},
};

/// ### [Table 4: Essential Internal Methods](https://tc39.es/ecma262/#table-essential-internal-methods)
///
/// The capability set every backend implements. The default
/// implementations are the ordinary object algorithms operating on the
/// backend's property store; exotic backends override the methods whose
/// behaviour differs.
pub trait InternalMethods: Sized + Copy + Into<Object> {
    /// ## \[\[GetPrototypeOf\]\]
    fn internal_get_prototype_of(self, agent: &mut Agent) -> JsResult<Option<Object>> {
        Ok(ordinary_get_prototype_of(agent, self.into()))
    }

    /// ## \[\[SetPrototypeOf\]\]
    fn internal_set_prototype_of(
        self,
        agent: &mut Agent,
        prototype: Option<Object>,
    ) -> JsResult<bool> {
        ordinary_set_prototype_of(agent, self.into(), prototype)
    }

    /// ## \[\[IsExtensible\]\]
    fn internal_is_extensible(self, agent: &mut Agent) -> JsResult<bool> {
        Ok(ordinary_is_extensible(agent, self.into()))
    }

    /// ## \[\[PreventExtensions\]\]
    fn internal_prevent_extensions(self, agent: &mut Agent) -> JsResult<bool> {
        Ok(ordinary_prevent_extensions(agent, self.into()))
    }

    /// ## \[\[GetOwnProperty\]\]
    fn internal_get_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
    ) -> JsResult<Option<PropertyDescriptor>> {
        Ok(ordinary_get_own_property(agent, self.into(), property_key))
    }

    /// ## \[\[DefineOwnProperty\]\]
    fn internal_define_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        property_descriptor: PropertyDescriptor,
    ) -> JsResult<bool> {
        Ok(ordinary_define_own_property(
            agent,
            self.into(),
            property_key,
            property_descriptor,
        ))
    }

    /// ## \[\[HasProperty\]\]
    fn internal_has_property(self, agent: &mut Agent, property_key: PropertyKey) -> JsResult<bool> {
        ordinary_has_property(agent, self.into(), property_key)
    }

    /// ## \[\[Get\]\]
    fn internal_get(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        receiver: Value,
    ) -> JsResult<Value> {
        ordinary_get(agent, self.into(), property_key, receiver)
    }

    /// ## \[\[Set\]\]
    fn internal_set(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        value: Value,
        receiver: Value,
    ) -> JsResult<bool> {
        ordinary_set(agent, self.into(), property_key, value, receiver)
    }

    /// ## \[\[Delete\]\]
    fn internal_delete(self, agent: &mut Agent, property_key: PropertyKey) -> JsResult<bool> {
        Ok(ordinary_delete(agent, self.into(), property_key))
    }

    /// ## \[\[OwnPropertyKeys\]\]
    fn internal_own_property_keys(self, agent: &mut Agent) -> JsResult<Vec<PropertyKey>> {
        Ok(ordinary_own_property_keys(agent, self.into()))
    }
}
