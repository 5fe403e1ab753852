// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::{get, has_property},
        testing_and_comparison::is_callable,
        type_conversion::to_boolean,
    },
    builtins::ordinary::ordinary_object_create_with_intrinsics,
    execution::{Agent, ExceptionType, JsResult},
    types::{BUILTIN_STRING_MEMORY, Object, PropertyKey, Value},
};

/// ### [6.2.6 The Property Descriptor Specification Type](https://tc39.es/ecma262/#sec-property-descriptor-specification-type)
///
/// The presence of each field is meaningful during reconciliation, not just
/// its value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PropertyDescriptor {
    /// \[\[Value]]
    pub value: Option<Value>,

    /// \[\[Writable]]
    pub writable: Option<bool>,

    /// \[\[Get]]
    ///
    /// Note: double-Option because these fields can be set explicitly undefined
    /// to unset them.
    pub get: Option<Option<Object>>,

    /// \[\[Set]]
    ///
    /// Note: double-Option because these fields can be set explicitly undefined
    /// to unset them.
    pub set: Option<Option<Object>>,

    /// \[\[Enumerable]]
    pub enumerable: Option<bool>,

    /// \[\[Configurable]]
    pub configurable: Option<bool>,
}

impl PropertyDescriptor {
    pub fn new_data_descriptor(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            writable: Some(true),
            get: None,
            set: None,
            enumerable: Some(true),
            configurable: Some(true),
        }
    }

    /// Data descriptor with every attribute given explicitly.
    pub fn new_frozen_data_descriptor(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            writable: Some(false),
            get: None,
            set: None,
            enumerable: Some(true),
            configurable: Some(false),
        }
    }

    /// ### [6.2.6.1 IsAccessorDescriptor ( Desc )](https://tc39.es/ecma262/#sec-isaccessordescriptor)
    pub fn is_accessor_descriptor(&self) -> bool {
        // 1. If Desc is undefined, return false.
        match (self.get, self.set) {
            // 2. If Desc has a [[Get]] field, return true.
            (Some(_), _) => true,
            // 3. If Desc has a [[Set]] field, return true.
            (_, Some(_)) => true,
            // 4. Return false.
            _ => false,
        }
    }

    /// ### [6.2.6.2 IsDataDescriptor ( Desc )](https://tc39.es/ecma262/#sec-isdatadescriptor)
    pub fn is_data_descriptor(&self) -> bool {
        // 1. If Desc is undefined, return false.
        match (self.value, self.writable) {
            // 2. If Desc has a [[Value]] field, return true.
            (Some(_), _) => true,
            // 3. If Desc has a [[Writable]] field, return true.
            (_, Some(_)) => true,
            // 4. Return false.
            _ => false,
        }
    }

    /// ### [6.2.6.3 IsGenericDescriptor ( Desc )](https://tc39.es/ecma262/#sec-isgenericdescriptor)
    pub fn is_generic_descriptor(&self) -> bool {
        // 1. If Desc is undefined, return false.
        // 2. If IsAccessorDescriptor(Desc) is true, return false.
        // 3. If IsDataDescriptor(Desc) is true, return false.
        // 4. Return true.
        !self.is_accessor_descriptor() && !self.is_data_descriptor()
    }

    /// ### [6.2.6.4 FromPropertyDescriptor ( Desc )](https://tc39.es/ecma262/#sec-frompropertydescriptor)
    ///
    /// The abstract operation FromPropertyDescriptor takes argument Desc (a
    /// Property Descriptor or undefined) and returns an Object or undefined.
    pub fn from_property_descriptor(desc: Option<Self>, agent: &mut Agent) -> Option<Object> {
        // 1. If Desc is undefined, return undefined.
        let desc = desc?;

        // 2. Let obj be OrdinaryObjectCreate(%Object.prototype%).
        // 3. Assert: obj is an extensible ordinary object with no own properties.
        let obj = ordinary_object_create_with_intrinsics(agent);

        let mut entries: Vec<(PropertyKey, Value)> = Vec::with_capacity(4);
        // 4. If Desc has a [[Value]] field, then
        if let Some(value) = desc.value {
            // a. Perform ! CreateDataPropertyOrThrow(obj, "value", Desc.[[Value]]).
            entries.push((PropertyKey::String(BUILTIN_STRING_MEMORY.value), value));
        }
        // 5. If Desc has a [[Writable]] field, then
        if let Some(writable) = desc.writable {
            // a. Perform ! CreateDataPropertyOrThrow(obj, "writable", Desc.[[Writable]]).
            entries.push((PropertyKey::String(BUILTIN_STRING_MEMORY.writable), writable.into()));
        }
        // 6. If Desc has a [[Get]] field, then
        if let Some(get) = desc.get {
            // a. Perform ! CreateDataPropertyOrThrow(obj, "get", Desc.[[Get]]).
            entries.push((PropertyKey::String(BUILTIN_STRING_MEMORY.get), get.into()));
        }
        // 7. If Desc has a [[Set]] field, then
        if let Some(set) = desc.set {
            // a. Perform ! CreateDataPropertyOrThrow(obj, "set", Desc.[[Set]]).
            entries.push((PropertyKey::String(BUILTIN_STRING_MEMORY.set), set.into()));
        }
        // 8. If Desc has an [[Enumerable]] field, then
        if let Some(enumerable) = desc.enumerable {
            // a. Perform ! CreateDataPropertyOrThrow(obj, "enumerable", Desc.[[Enumerable]]).
            entries.push((PropertyKey::String(BUILTIN_STRING_MEMORY.enumerable), enumerable.into()));
        }
        // 9. If Desc has a [[Configurable]] field, then
        if let Some(configurable) = desc.configurable {
            // a. Perform ! CreateDataPropertyOrThrow(obj, "configurable", Desc.[[Configurable]]).
            entries.push((
                PropertyKey::String(BUILTIN_STRING_MEMORY.configurable),
                configurable.into(),
            ));
        }
        debug_assert!(entries.len() <= 4);

        let store = obj.property_store_mut(agent);
        for (key, value) in entries {
            store.set_value(key, value);
        }

        // 10. Return obj.
        Some(obj)
    }

    /// ### [6.2.6.5 ToPropertyDescriptor ( Obj )](https://tc39.es/ecma262/#sec-topropertydescriptor)
    ///
    /// The abstract operation ToPropertyDescriptor takes argument Obj (an
    /// ECMAScript language value) and returns either a normal completion
    /// containing a Property Descriptor or a throw completion.
    pub fn to_property_descriptor(agent: &mut Agent, obj: Value) -> JsResult<Self> {
        // 1. If Obj is not an Object, throw a TypeError exception.
        let Value::Object(obj) = obj else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Property description must be an object",
            ));
        };
        // 2. Let desc be a new Property Descriptor that initially has no
        // fields.
        let mut desc = PropertyDescriptor::default();
        // 3. Let hasEnumerable be ? HasProperty(Obj, "enumerable").
        let key = PropertyKey::String(BUILTIN_STRING_MEMORY.enumerable);
        // 4. If hasEnumerable is true, then
        if has_property(agent, obj, key)? {
            // a. Let enumerable be ToBoolean(? Get(Obj, "enumerable")).
            // b. Set desc.[[Enumerable]] to enumerable.
            desc.enumerable = Some(to_boolean(get(agent, obj, key)?));
        }
        // 5. Let hasConfigurable be ? HasProperty(Obj, "configurable").
        let key = PropertyKey::String(BUILTIN_STRING_MEMORY.configurable);
        // 6. If hasConfigurable is true, then
        if has_property(agent, obj, key)? {
            // a. Let configurable be ToBoolean(? Get(Obj, "configurable")).
            // b. Set desc.[[Configurable]] to configurable.
            desc.configurable = Some(to_boolean(get(agent, obj, key)?));
        }
        // 7. Let hasValue be ? HasProperty(Obj, "value").
        let key = PropertyKey::String(BUILTIN_STRING_MEMORY.value);
        // 8. If hasValue is true, then
        if has_property(agent, obj, key)? {
            // a. Let value be ? Get(Obj, "value").
            // b. Set desc.[[Value]] to value.
            desc.value = Some(get(agent, obj, key)?);
        }
        // 9. Let hasWritable be ? HasProperty(Obj, "writable").
        let key = PropertyKey::String(BUILTIN_STRING_MEMORY.writable);
        // 10. If hasWritable is true, then
        if has_property(agent, obj, key)? {
            // a. Let writable be ToBoolean(? Get(Obj, "writable")).
            // b. Set desc.[[Writable]] to writable.
            desc.writable = Some(to_boolean(get(agent, obj, key)?));
        }
        // 11. Let hasGet be ? HasProperty(Obj, "get").
        let key = PropertyKey::String(BUILTIN_STRING_MEMORY.get);
        // 12. If hasGet is true, then
        if has_property(agent, obj, key)? {
            // a. Let getter be ? Get(Obj, "get").
            let getter = get(agent, obj, key)?;
            // b. If IsCallable(getter) is false and getter is not undefined,
            // throw a TypeError exception.
            // c. Set desc.[[Get]] to getter.
            desc.get = Some(Self::accessor_function(agent, getter, "getter")?);
        }
        // 13. Let hasSet be ? HasProperty(Obj, "set").
        let key = PropertyKey::String(BUILTIN_STRING_MEMORY.set);
        // 14. If hasSet is true, then
        if has_property(agent, obj, key)? {
            // a. Let setter be ? Get(Obj, "set").
            let setter = get(agent, obj, key)?;
            // b. If IsCallable(setter) is false and setter is not undefined,
            // throw a TypeError exception.
            // c. Set desc.[[Set]] to setter.
            desc.set = Some(Self::accessor_function(agent, setter, "setter")?);
        }
        // 15. If desc has a [[Get]] field or desc has a [[Set]] field, then
        if desc.get.is_some() || desc.set.is_some() {
            // a. If desc has a [[Value]] field or desc has a [[Writable]]
            // field, throw a TypeError exception.
            if desc.value.is_some() || desc.writable.is_some() {
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "Invalid property descriptor. Cannot both specify accessors and a value or writable attribute",
                ));
            }
        }
        // 16. Return desc.
        Ok(desc)
    }

    fn accessor_function(agent: &mut Agent, value: Value, kind: &str) -> JsResult<Option<Object>> {
        if value.is_undefined() {
            return Ok(None);
        }
        match is_callable(agent, value) {
            Some(function) => Ok(Some(function)),
            None => Err(agent.throw_exception(
                ExceptionType::TypeError,
                &format!("Property {kind} must be a function"),
            )),
        }
    }

    /// ### [6.2.6.6 CompletePropertyDescriptor ( Desc )](https://tc39.es/ecma262/#sec-completepropertydescriptor)
    pub fn complete_property_descriptor(&mut self) {
        // 1. Let like be the Record { [[Value]]: undefined, [[Writable]]: false, [[Get]]: undefined, [[Set]]: undefined, [[Enumerable]]: false, [[Configurable]]: false }.
        // 2. If IsGenericDescriptor(Desc) is true or IsDataDescriptor(Desc) is true, then
        if self.is_generic_descriptor() || self.is_data_descriptor() {
            // a. If Desc does not have a [[Value]] field, set Desc.[[Value]] to like.[[Value]].
            self.value.get_or_insert(Value::Undefined);
            // b. If Desc does not have a [[Writable]] field, set Desc.[[Writable]] to like.[[Writable]].
            self.writable.get_or_insert(false);
        } else {
            // 3. Else,
            // a. If Desc does not have a [[Get]] field, set Desc.[[Get]] to like.[[Get]].
            self.get.get_or_insert(None);
            // b. If Desc does not have a [[Set]] field, set Desc.[[Set]] to like.[[Set]].
            self.set.get_or_insert(None);
        }
        // 4. If Desc does not have an [[Enumerable]] field, set Desc.[[Enumerable]] to like.[[Enumerable]].
        self.enumerable.get_or_insert(false);
        // 5. If Desc does not have a [[Configurable]] field, set Desc.[[Configurable]] to like.[[Configurable]].
        self.configurable.get_or_insert(false);
        // 6. Return unused.
    }

    /// Returns true if all the fields have a value.
    pub fn is_fully_populated(&self) -> bool {
        ((self.value.is_some() && self.writable.is_some())
            || (self.get.is_some() && self.set.is_some()))
            && self.enumerable.is_some()
            && self.configurable.is_some()
    }

    /// Returns true if any field is present.
    pub fn has_fields(&self) -> bool {
        self.value.is_some()
            || self.writable.is_some()
            || self.get.is_some()
            || self.set.is_some()
            || self.enumerable.is_some()
            || self.configurable.is_some()
    }
}
