// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [10.5 Proxy Object Internal Methods and Internal Slots](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots)

use std::rc::Rc;

use ahash::AHashSet;

use abstract_operations::{NonRevokedProxy, validate_non_revoked_proxy};
pub use data::ProxyHeapData;
pub use native_handler::{ProxyTrapConfig, new_native_proxy};

use crate::{
    ecmascript::{
        abstract_operations::{
            operations_on_objects::{
                call_function, construct, create_data_property_or_throw,
                create_property_key_list_from_array_like, get_object_method,
            },
            testing_and_comparison::{is_callable, is_constructor, is_extensible, same_value},
            type_conversion::to_boolean,
        },
        builtins::{
            ArgumentsList, Behaviour, BuiltinFunctionArgs, create_array_from_list,
            create_builtin_function,
            ordinary::{is_compatible_property_descriptor, ordinary_object_create_with_intrinsics},
        },
        execution::{Agent, ExceptionType, JsResult},
        types::{
            BUILTIN_STRING_MEMORY, Backend, InternalMethods, Object, PropertyDescriptor,
            PropertyKey, String, Value,
        },
    },
    heap::CreateHeapData,
};

pub(crate) mod abstract_operations;
pub mod data;
mod native_handler;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Proxy(pub(crate) Object);

impl From<Proxy> for Object {
    fn from(value: Proxy) -> Self {
        value.0
    }
}

impl From<Proxy> for Value {
    fn from(value: Proxy) -> Self {
        Value::Object(value.0)
    }
}

impl Proxy {
    pub fn from_object(agent: &Agent, object: Object) -> Option<Proxy> {
        match agent[object].backend {
            Backend::Proxy(_) => Some(Proxy(object)),
            _ => None,
        }
    }

    pub(crate) fn data(self, agent: &Agent) -> &ProxyHeapData {
        match &agent[self.0].backend {
            Backend::Proxy(data) => data,
            _ => unreachable!("Proxy handle over a non-proxy backend"),
        }
    }

    fn data_mut(self, agent: &mut Agent) -> &mut ProxyHeapData {
        match &mut agent[self.0].backend {
            Backend::Proxy(data) => data,
            _ => unreachable!("Proxy handle over a non-proxy backend"),
        }
    }

    pub fn is_revoked(self, agent: &Agent) -> bool {
        self.data(agent).is_revoked()
    }

    /// The current target, or None once revoked.
    pub fn target(self, agent: &Agent) -> Option<Object> {
        match *self.data(agent) {
            ProxyHeapData::NonRevoked { proxy_target, .. } => Some(proxy_target),
            ProxyHeapData::Revoked { .. } => None,
        }
    }

    /// Severs the proxy from its target and handler. Every later operation
    /// on the proxy throws a TypeError.
    pub fn revoke(self, agent: &mut Agent) {
        if !self.is_revoked(agent) {
            log::debug!("revoking proxy {:?}", self.0);
        }
        self.data_mut(agent).revoke();
    }
}

fn trap(agent: &mut Agent, handler: Object, name: String) -> JsResult<Option<Object>> {
    get_object_method(agent, handler, PropertyKey::String(name))
}

fn invariant_violation(agent: &mut Agent, message: &'static str) -> JsResult<bool> {
    Err(agent.throw_exception_with_static_message(ExceptionType::TypeError, message))
}

impl InternalMethods for Proxy {
    /// ### [10.5.1 \[\[GetPrototypeOf\]\] ( )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-getprototypeof)
    fn internal_get_prototype_of(self, agent: &mut Agent) -> JsResult<Option<Object>> {
        // 1. Perform ? ValidateNonRevokedProxy(O).
        // 2. Let target be O.[[ProxyTarget]].
        // 3. Let handler be O.[[ProxyHandler]].
        // 4. Assert: handler is an Object.
        let NonRevokedProxy { target, handler } = validate_non_revoked_proxy(agent, self)?;

        // 5. Let trap be ? GetMethod(handler, "getPrototypeOf").
        let Some(trap) = trap(agent, handler, BUILTIN_STRING_MEMORY.getPrototypeOf)? else {
            // 6. If trap is undefined, then
            // a. Return ? target.[[GetPrototypeOf]]().
            return target.internal_get_prototype_of(agent);
        };

        // 7. Let handlerProto be ? Call(trap, handler, « target »).
        let handler_proto = call_function(agent, trap, handler.into(), &[target.into()])?;

        // 8. If handlerProto is not an Object and handlerProto is not null, throw a TypeError exception.
        let handler_proto = match handler_proto {
            Value::Null => None,
            Value::Object(handler_proto) => Some(handler_proto),
            _ => {
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "'getPrototypeOf' on proxy: trap returned neither object nor null",
                ));
            }
        };

        // 9. Let extensibleTarget be ? IsExtensible(target).
        // 10. If extensibleTarget is true, return handlerProto.
        if is_extensible(agent, target)? {
            return Ok(handler_proto);
        }

        // 11. Let targetProto be ? target.[[GetPrototypeOf]]().
        let target_proto = target.internal_get_prototype_of(agent)?;

        // 12. If SameValue(handlerProto, targetProto) is false, throw a TypeError exception.
        if handler_proto != target_proto {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "'getPrototypeOf' on proxy: proxy target is non-extensible but the trap did not return its actual prototype",
            ));
        }

        // 13. Return handlerProto.
        Ok(handler_proto)
    }

    /// ### [10.5.2 \[\[SetPrototypeOf\]\] ( V )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-setprototypeof-v)
    fn internal_set_prototype_of(
        self,
        agent: &mut Agent,
        prototype: Option<Object>,
    ) -> JsResult<bool> {
        // 1. Perform ? ValidateNonRevokedProxy(O).
        // 2. Let target be O.[[ProxyTarget]].
        // 3. Let handler be O.[[ProxyHandler]].
        // 4. Assert: handler is an Object.
        let NonRevokedProxy { target, handler } = validate_non_revoked_proxy(agent, self)?;

        // 5. Let trap be ? GetMethod(handler, "setPrototypeOf").
        let Some(trap) = trap(agent, handler, BUILTIN_STRING_MEMORY.setPrototypeOf)? else {
            // 6. If trap is undefined, then
            // a. Return ? target.[[SetPrototypeOf]](V).
            return target.internal_set_prototype_of(agent, prototype);
        };

        // 7. Let booleanTrapResult be ToBoolean(? Call(trap, handler, « target, V »)).
        let boolean_trap_result = to_boolean(call_function(
            agent,
            trap,
            handler.into(),
            &[target.into(), prototype.into()],
        )?);

        // 8. If booleanTrapResult is false, return false.
        if !boolean_trap_result {
            return Ok(false);
        }

        // 9. Let extensibleTarget be ? IsExtensible(target).
        // 10. If extensibleTarget is true, return true.
        if is_extensible(agent, target)? {
            return Ok(true);
        }

        // 11. Let targetProto be ? target.[[GetPrototypeOf]]().
        let target_proto = target.internal_get_prototype_of(agent)?;

        // 12. If SameValue(V, targetProto) is false, throw a TypeError exception.
        if prototype != target_proto {
            return invariant_violation(
                agent,
                "'setPrototypeOf' on proxy: trap returned truish for setting a new prototype on the non-extensible proxy target",
            );
        }

        // 13. Return true.
        Ok(true)
    }

    /// ### [10.5.3 \[\[IsExtensible\]\] ( )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-isextensible)
    fn internal_is_extensible(self, agent: &mut Agent) -> JsResult<bool> {
        // 1. Perform ? ValidateNonRevokedProxy(O).
        // 2. Let target be O.[[ProxyTarget]].
        // 3. Let handler be O.[[ProxyHandler]].
        // 4. Assert: handler is an Object.
        let NonRevokedProxy { target, handler } = validate_non_revoked_proxy(agent, self)?;

        // 5. Let trap be ? GetMethod(handler, "isExtensible").
        let Some(trap) = trap(agent, handler, BUILTIN_STRING_MEMORY.isExtensible)? else {
            // 6. If trap is undefined, then
            // a. Return ? IsExtensible(target).
            return is_extensible(agent, target);
        };

        // 7. Let booleanTrapResult be ToBoolean(? Call(trap, handler, « target »)).
        let boolean_trap_result =
            to_boolean(call_function(agent, trap, handler.into(), &[target.into()])?);

        // 8. Let targetResult be ? IsExtensible(target).
        let target_result = is_extensible(agent, target)?;

        // 9. If booleanTrapResult is not targetResult, throw a TypeError exception.
        if boolean_trap_result != target_result {
            return invariant_violation(
                agent,
                "'isExtensible' on proxy: trap result does not reflect extensibility of proxy target",
            );
        }

        // 10. Return booleanTrapResult.
        Ok(boolean_trap_result)
    }

    /// ### [10.5.4 \[\[PreventExtensions\]\] ( )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-preventextensions)
    fn internal_prevent_extensions(self, agent: &mut Agent) -> JsResult<bool> {
        // 1. Perform ? ValidateNonRevokedProxy(O).
        // 2. Let target be O.[[ProxyTarget]].
        // 3. Let handler be O.[[ProxyHandler]].
        // 4. Assert: handler is an Object.
        let NonRevokedProxy { target, handler } = validate_non_revoked_proxy(agent, self)?;

        // 5. Let trap be ? GetMethod(handler, "preventExtensions").
        let Some(trap) = trap(agent, handler, BUILTIN_STRING_MEMORY.preventExtensions)? else {
            // 6. If trap is undefined, then
            // a. Return ? target.[[PreventExtensions]]().
            return target.internal_prevent_extensions(agent);
        };

        // 7. Let booleanTrapResult be ToBoolean(? Call(trap, handler, « target »)).
        let boolean_trap_result =
            to_boolean(call_function(agent, trap, handler.into(), &[target.into()])?);

        // 8. If booleanTrapResult is true, then
        // a. Let extensibleTarget be ? IsExtensible(target).
        // b. If extensibleTarget is true, throw a TypeError exception.
        if boolean_trap_result && is_extensible(agent, target)? {
            return invariant_violation(
                agent,
                "'preventExtensions' on proxy: trap returned truish but the proxy target is extensible",
            );
        }

        // 9. Return booleanTrapResult.
        Ok(boolean_trap_result)
    }

    /// ### [10.5.5 \[\[GetOwnProperty\]\] ( P )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-getownproperty-p)
    fn internal_get_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
    ) -> JsResult<Option<PropertyDescriptor>> {
        // 1. Perform ? ValidateNonRevokedProxy(O).
        // 2. Let target be O.[[ProxyTarget]].
        // 3. Let handler be O.[[ProxyHandler]].
        // 4. Assert: handler is an Object.
        let NonRevokedProxy { target, handler } = validate_non_revoked_proxy(agent, self)?;

        // 5. Let trap be ? GetMethod(handler, "getOwnPropertyDescriptor").
        let Some(trap) = trap(agent, handler, BUILTIN_STRING_MEMORY.getOwnPropertyDescriptor)?
        else {
            // 6. If trap is undefined, then
            // a. Return ? target.[[GetOwnProperty]](P).
            return target.internal_get_own_property(agent, property_key);
        };

        // 7. Let trapResultObj be ? Call(trap, handler, « target, P »).
        let p = property_key.into_value(agent);
        let trap_result_obj = call_function(agent, trap, handler.into(), &[target.into(), p])?;

        // 8. If trapResultObj is not an Object and trapResultObj is not undefined, throw a TypeError exception.
        if !trap_result_obj.is_object() && !trap_result_obj.is_undefined() {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "'getOwnPropertyDescriptor' on proxy: trap returned neither object nor undefined",
            ));
        }

        // 9. Let targetDesc be ? target.[[GetOwnProperty]](P).
        let target_desc = target.internal_get_own_property(agent, property_key)?;

        // 10. If trapResultObj is undefined, then
        if trap_result_obj.is_undefined() {
            // a. If targetDesc is undefined, return undefined.
            let Some(target_desc) = target_desc else {
                return Ok(None);
            };
            // b. If targetDesc.[[Configurable]] is false, throw a TypeError exception.
            if target_desc.configurable == Some(false) {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    &format!(
                        "'getOwnPropertyDescriptor' on proxy: trap returned undefined for property '{}' which is non-configurable in the proxy target",
                        property_key.as_display(agent)
                    ),
                ));
            }
            // c. Let extensibleTarget be ? IsExtensible(target).
            // d. If extensibleTarget is false, throw a TypeError exception.
            if !is_extensible(agent, target)? {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    &format!(
                        "'getOwnPropertyDescriptor' on proxy: trap returned undefined for property '{}' which exists in the non-extensible proxy target",
                        property_key.as_display(agent)
                    ),
                ));
            }
            // e. Return undefined.
            return Ok(None);
        }

        // 11. Let extensibleTarget be ? IsExtensible(target).
        let extensible_target = is_extensible(agent, target)?;

        // 12. Let resultDesc be ? ToPropertyDescriptor(trapResultObj).
        let mut result_desc = PropertyDescriptor::to_property_descriptor(agent, trap_result_obj)?;

        // 13. Perform CompletePropertyDescriptor(resultDesc).
        result_desc.complete_property_descriptor();

        // 14. Let valid be IsCompatiblePropertyDescriptor(extensibleTarget, resultDesc, targetDesc).
        // 15. If valid is false, throw a TypeError exception.
        if !is_compatible_property_descriptor(extensible_target, result_desc, target_desc) {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                &format!(
                    "'getOwnPropertyDescriptor' on proxy: trap returned descriptor for property '{}' that is incompatible with the existing property in the proxy target",
                    property_key.as_display(agent)
                ),
            ));
        }

        // 16. If resultDesc.[[Configurable]] is false, then
        if result_desc.configurable == Some(false) {
            // a. If targetDesc is undefined or targetDesc.[[Configurable]] is true, then
            match target_desc {
                Some(target_desc) if target_desc.configurable == Some(false) => {
                    // b. If resultDesc has a [[Writable]] field and resultDesc.[[Writable]] is false, then
                    // i. Assert: targetDesc has a [[Writable]] field.
                    // ii. If targetDesc.[[Writable]] is true, throw a TypeError exception.
                    if result_desc.writable == Some(false) && target_desc.writable == Some(true) {
                        return Err(agent.throw_exception(
                            ExceptionType::TypeError,
                            &format!(
                                "'getOwnPropertyDescriptor' on proxy: trap reported non-configurable and writable for property '{}' which is non-configurable, non-writable in the proxy target",
                                property_key.as_display(agent)
                            ),
                        ));
                    }
                }
                // i. Throw a TypeError exception.
                _ => {
                    return Err(agent.throw_exception(
                        ExceptionType::TypeError,
                        &format!(
                            "'getOwnPropertyDescriptor' on proxy: trap reported non-configurability for property '{}' which is either non-existent or configurable in the proxy target",
                            property_key.as_display(agent)
                        ),
                    ));
                }
            }
        }

        // 17. Return resultDesc.
        Ok(Some(result_desc))
    }

    /// ### [10.5.6 \[\[DefineOwnProperty\]\] ( P, Desc )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-defineownproperty-p-desc)
    fn internal_define_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        property_descriptor: PropertyDescriptor,
    ) -> JsResult<bool> {
        // 1. Perform ? ValidateNonRevokedProxy(O).
        // 2. Let target be O.[[ProxyTarget]].
        // 3. Let handler be O.[[ProxyHandler]].
        // 4. Assert: handler is an Object.
        let NonRevokedProxy { target, handler } = validate_non_revoked_proxy(agent, self)?;

        // 5. Let trap be ? GetMethod(handler, "defineProperty").
        let Some(trap) = trap(agent, handler, BUILTIN_STRING_MEMORY.defineProperty)? else {
            // 6. If trap is undefined, then
            // a. Return ? target.[[DefineOwnProperty]](P, Desc).
            return target.internal_define_own_property(agent, property_key, property_descriptor);
        };

        // 7. Let descObj be FromPropertyDescriptor(Desc).
        let desc_obj = PropertyDescriptor::from_property_descriptor(Some(property_descriptor), agent);

        // 8. Let booleanTrapResult be ToBoolean(? Call(trap, handler, « target, P, descObj »)).
        let p = property_key.into_value(agent);
        let boolean_trap_result = to_boolean(call_function(
            agent,
            trap,
            handler.into(),
            &[target.into(), p, desc_obj.into()],
        )?);

        // 9. If booleanTrapResult is false, return false.
        if !boolean_trap_result {
            return Ok(false);
        }

        // 10. Let targetDesc be ? target.[[GetOwnProperty]](P).
        let target_desc = target.internal_get_own_property(agent, property_key)?;

        // 11. Let extensibleTarget be ? IsExtensible(target).
        let extensible_target = is_extensible(agent, target)?;

        // 12. If Desc has a [[Configurable]] field and Desc.[[Configurable]] is false, then
        // a. Let settingConfigFalse be true.
        // 13. Else, let settingConfigFalse be false.
        let setting_config_false = property_descriptor.configurable == Some(false);

        // 14. If targetDesc is undefined, then
        let Some(target_desc) = target_desc else {
            // a. If extensibleTarget is false, throw a TypeError exception.
            if !extensible_target {
                return invariant_violation(
                    agent,
                    "'defineProperty' on proxy: trap returned truish for adding a property to the non-extensible proxy target",
                );
            }
            // b. If settingConfigFalse is true, throw a TypeError exception.
            if setting_config_false {
                return invariant_violation(
                    agent,
                    "'defineProperty' on proxy: trap returned truish for defining a non-configurable property which is non-existent in the proxy target",
                );
            }
            // 16. Return true.
            return Ok(true);
        };

        // 15. Else,
        // a. If IsCompatiblePropertyDescriptor(extensibleTarget, Desc, targetDesc) is false, throw a TypeError exception.
        if !is_compatible_property_descriptor(
            extensible_target,
            property_descriptor,
            Some(target_desc),
        ) {
            return invariant_violation(
                agent,
                "'defineProperty' on proxy: trap returned truish for adding a property that is incompatible with the existing property in the proxy target",
            );
        }
        // b. If settingConfigFalse is true and targetDesc.[[Configurable]] is true, throw a TypeError exception.
        if setting_config_false && target_desc.configurable == Some(true) {
            return invariant_violation(
                agent,
                "'defineProperty' on proxy: trap returned truish for defining a non-configurable property which is configurable in the proxy target",
            );
        }
        // c. If IsDataDescriptor(targetDesc) is true, targetDesc.[[Configurable]] is false, and targetDesc.[[Writable]] is true, then
        // i. If Desc has a [[Writable]] field and Desc.[[Writable]] is false, throw a TypeError exception.
        if target_desc.is_data_descriptor()
            && target_desc.configurable == Some(false)
            && target_desc.writable == Some(true)
            && property_descriptor.writable == Some(false)
        {
            return invariant_violation(
                agent,
                "'defineProperty' on proxy: trap returned truish for defining a non-configurable property which cannot be non-writable, unless there exists a corresponding non-configurable, non-writable own property of the target object",
            );
        }

        // 16. Return true.
        Ok(true)
    }

    /// ### [10.5.7 \[\[HasProperty\]\] ( P )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-hasproperty-p)
    fn internal_has_property(self, agent: &mut Agent, property_key: PropertyKey) -> JsResult<bool> {
        // 1. Perform ? ValidateNonRevokedProxy(O).
        // 2. Let target be O.[[ProxyTarget]].
        // 3. Let handler be O.[[ProxyHandler]].
        // 4. Assert: handler is an Object.
        let NonRevokedProxy { target, handler } = validate_non_revoked_proxy(agent, self)?;

        // 5. Let trap be ? GetMethod(handler, "has").
        let Some(trap) = trap(agent, handler, BUILTIN_STRING_MEMORY.has)? else {
            // 6. If trap is undefined, then
            // a. Return ? target.[[HasProperty]](P).
            return target.internal_has_property(agent, property_key);
        };

        // 7. Let booleanTrapResult be ToBoolean(? Call(trap, handler, « target, P »)).
        let p = property_key.into_value(agent);
        let boolean_trap_result =
            to_boolean(call_function(agent, trap, handler.into(), &[target.into(), p])?);

        // 8. If booleanTrapResult is false, then
        if !boolean_trap_result {
            // a. Let targetDesc be ? target.[[GetOwnProperty]](P).
            // b. If targetDesc is not undefined, then
            if let Some(target_desc) = target.internal_get_own_property(agent, property_key)? {
                // i. If targetDesc.[[Configurable]] is false, throw a TypeError exception.
                if target_desc.configurable == Some(false) {
                    return Err(agent.throw_exception(
                        ExceptionType::TypeError,
                        &format!(
                            "'has' on proxy: trap returned falsish for property '{}' which exists in the proxy target as non-configurable",
                            property_key.as_display(agent)
                        ),
                    ));
                }
                // ii. Let extensibleTarget be ? IsExtensible(target).
                // iii. If extensibleTarget is false, throw a TypeError exception.
                if !is_extensible(agent, target)? {
                    return Err(agent.throw_exception(
                        ExceptionType::TypeError,
                        &format!(
                            "'has' on proxy: trap returned falsish for property '{}' but the proxy target is not extensible",
                            property_key.as_display(agent)
                        ),
                    ));
                }
            }
        }

        // 9. Return booleanTrapResult.
        Ok(boolean_trap_result)
    }

    /// ### [10.5.8 \[\[Get\]\] ( P, Receiver )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-get-p-receiver)
    ///
    /// > #### Note
    /// > \[\[Get]] for Proxy objects enforces the following invariants:
    /// >
    /// > The value reported for a property must be the same as the value of
    /// > the corresponding target object property if the target object
    /// > property is a non-writable, non-configurable own data property.
    /// > The value reported for a property must be undefined if the
    /// > corresponding target object property is a non-configurable own
    /// > accessor property that has undefined as its \[\[Get]] attribute.
    fn internal_get(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        receiver: Value,
    ) -> JsResult<Value> {
        // 1. Perform ? ValidateNonRevokedProxy(O).
        // 2. Let target be O.[[ProxyTarget]].
        // 3. Let handler be O.[[ProxyHandler]].
        // 4. Assert: handler is an Object.
        let NonRevokedProxy { target, handler } = validate_non_revoked_proxy(agent, self)?;

        // 5. Let trap be ? GetMethod(handler, "get").
        let Some(trap) = trap(agent, handler, BUILTIN_STRING_MEMORY.get)? else {
            // 6. If trap is undefined, then
            // a. Return ? target.[[Get]](P, Receiver).
            return target.internal_get(agent, property_key, receiver);
        };

        // 7. Let trapResult be ? Call(trap, handler, « target, P, Receiver »).
        let p = property_key.into_value(agent);
        let trap_result =
            call_function(agent, trap, handler.into(), &[target.into(), p, receiver])?;

        // 8. Let targetDesc be ? target.[[GetOwnProperty]](P).
        let target_desc = target.internal_get_own_property(agent, property_key)?;

        // 9. If targetDesc is not undefined and targetDesc.[[Configurable]] is false, then
        if let Some(target_desc) = target_desc
            && target_desc.configurable == Some(false)
        {
            // a. If IsDataDescriptor(targetDesc) is true and targetDesc.[[Writable]] is false, then
            // i. If SameValue(trapResult, targetDesc.[[Value]]) is false, throw a TypeError exception.
            if target_desc.is_data_descriptor()
                && target_desc.writable == Some(false)
                && !same_value(trap_result, target_desc.value.unwrap_or_default())
            {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    &format!(
                        "'get' on proxy: property '{}' is a read-only and non-configurable data property on the proxy target but the proxy did not return its actual value",
                        property_key.as_display(agent)
                    ),
                ));
            }
            // b. If IsAccessorDescriptor(targetDesc) is true and targetDesc.[[Get]] is undefined, then
            // i. If trapResult is not undefined, throw a TypeError exception.
            if target_desc.is_accessor_descriptor()
                && target_desc.get.flatten().is_none()
                && !trap_result.is_undefined()
            {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    &format!(
                        "'get' on proxy: property '{}' is a non-configurable accessor property on the proxy target and does not have a getter function, but the trap did not return 'undefined'",
                        property_key.as_display(agent)
                    ),
                ));
            }
        }

        // 10. Return trapResult.
        Ok(trap_result)
    }

    /// ### [10.5.9 \[\[Set\]\] ( P, V, Receiver )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-set-p-v-receiver)
    fn internal_set(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        value: Value,
        receiver: Value,
    ) -> JsResult<bool> {
        // 1. Perform ? ValidateNonRevokedProxy(O).
        // 2. Let target be O.[[ProxyTarget]].
        // 3. Let handler be O.[[ProxyHandler]].
        // 4. Assert: handler is an Object.
        let NonRevokedProxy { target, handler } = validate_non_revoked_proxy(agent, self)?;

        // 5. Let trap be ? GetMethod(handler, "set").
        let Some(trap) = trap(agent, handler, BUILTIN_STRING_MEMORY.set)? else {
            // 6. If trap is undefined, then
            // a. Return ? target.[[Set]](P, V, Receiver).
            return target.internal_set(agent, property_key, value, receiver);
        };

        // 7. Let booleanTrapResult be ToBoolean(? Call(trap, handler, « target, P, V, Receiver »)).
        let p = property_key.into_value(agent);
        let boolean_trap_result = to_boolean(call_function(
            agent,
            trap,
            handler.into(),
            &[target.into(), p, value, receiver],
        )?);

        // 8. If booleanTrapResult is false, return false.
        if !boolean_trap_result {
            return Ok(false);
        }

        // 9. Let targetDesc be ? target.[[GetOwnProperty]](P).
        let target_desc = target.internal_get_own_property(agent, property_key)?;

        // 10. If targetDesc is not undefined and targetDesc.[[Configurable]] is false, then
        if let Some(target_desc) = target_desc
            && target_desc.configurable == Some(false)
        {
            // a. If IsDataDescriptor(targetDesc) is true and targetDesc.[[Writable]] is false, then
            // i. If SameValue(V, targetDesc.[[Value]]) is false, throw a TypeError exception.
            if target_desc.is_data_descriptor()
                && target_desc.writable == Some(false)
                && !same_value(value, target_desc.value.unwrap_or_default())
            {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    &format!(
                        "'set' on proxy: trap returned truish for property '{}' which exists in the proxy target as a non-configurable and non-writable data property with a different value",
                        property_key.as_display(agent)
                    ),
                ));
            }
            // b. If IsAccessorDescriptor(targetDesc) is true, then
            // i. If targetDesc.[[Set]] is undefined, throw a TypeError exception.
            if target_desc.is_accessor_descriptor() && target_desc.set.flatten().is_none() {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    &format!(
                        "'set' on proxy: trap returned truish for property '{}' which exists in the proxy target as a non-configurable and non-writable accessor property without a setter",
                        property_key.as_display(agent)
                    ),
                ));
            }
        }

        // 11. Return true.
        Ok(true)
    }

    /// ### [10.5.10 \[\[Delete\]\] ( P )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-delete-p)
    fn internal_delete(self, agent: &mut Agent, property_key: PropertyKey) -> JsResult<bool> {
        // 1. Perform ? ValidateNonRevokedProxy(O).
        // 2. Let target be O.[[ProxyTarget]].
        // 3. Let handler be O.[[ProxyHandler]].
        // 4. Assert: handler is an Object.
        let NonRevokedProxy { target, handler } = validate_non_revoked_proxy(agent, self)?;

        // 5. Let trap be ? GetMethod(handler, "deleteProperty").
        let Some(trap) = trap(agent, handler, BUILTIN_STRING_MEMORY.deleteProperty)? else {
            // 6. If trap is undefined, then
            // a. Return ? target.[[Delete]](P).
            return target.internal_delete(agent, property_key);
        };

        // 7. Let booleanTrapResult be ToBoolean(? Call(trap, handler, « target, P »)).
        let p = property_key.into_value(agent);
        let boolean_trap_result =
            to_boolean(call_function(agent, trap, handler.into(), &[target.into(), p])?);

        // 8. If booleanTrapResult is false, return false.
        if !boolean_trap_result {
            return Ok(false);
        }

        // 9. Let targetDesc be ? target.[[GetOwnProperty]](P).
        // 10. If targetDesc is undefined, return true.
        let Some(target_desc) = target.internal_get_own_property(agent, property_key)? else {
            return Ok(true);
        };

        // 11. If targetDesc.[[Configurable]] is false, throw a TypeError exception.
        if target_desc.configurable == Some(false) {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                &format!(
                    "'deleteProperty' on proxy: trap returned truish for property '{}' which is non-configurable in the proxy target",
                    property_key.as_display(agent)
                ),
            ));
        }

        // 12. Let extensibleTarget be ? IsExtensible(target).
        // 13. If extensibleTarget is false, throw a TypeError exception.
        if !is_extensible(agent, target)? {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                &format!(
                    "'deleteProperty' on proxy: trap returned truish for property '{}' but the proxy target is non-extensible",
                    property_key.as_display(agent)
                ),
            ));
        }

        // 14. Return true.
        Ok(true)
    }

    /// ### [10.5.11 \[\[OwnPropertyKeys\]\] ( )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-ownpropertykeys)
    fn internal_own_property_keys(self, agent: &mut Agent) -> JsResult<Vec<PropertyKey>> {
        // 1. Perform ? ValidateNonRevokedProxy(O).
        // 2. Let target be O.[[ProxyTarget]].
        // 3. Let handler be O.[[ProxyHandler]].
        // 4. Assert: handler is an Object.
        let NonRevokedProxy { target, handler } = validate_non_revoked_proxy(agent, self)?;

        // 5. Let trap be ? GetMethod(handler, "ownKeys").
        let Some(trap) = trap(agent, handler, BUILTIN_STRING_MEMORY.ownKeys)? else {
            // 6. If trap is undefined, then
            // a. Return ? target.[[OwnPropertyKeys]]().
            return target.internal_own_property_keys(agent);
        };

        // 7. Let trapResultArray be ? Call(trap, handler, « target »).
        let trap_result_array = call_function(agent, trap, handler.into(), &[target.into()])?;

        // 8. Let trapResult be ? CreateListFromArrayLike(trapResultArray, property-key).
        let trap_result = create_property_key_list_from_array_like(agent, trap_result_array)?;

        // 9. If trapResult contains any duplicate entries, throw a TypeError exception.
        let mut unchecked_result_keys = AHashSet::with_capacity(trap_result.len());
        for key in trap_result.iter() {
            if !unchecked_result_keys.insert(*key) {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    &format!(
                        "'ownKeys' on proxy: trap returned duplicate entries ('{}')",
                        key.as_display(agent)
                    ),
                ));
            }
        }

        // 10. Let extensibleTarget be ? IsExtensible(target).
        let extensible_target = is_extensible(agent, target)?;

        // 11. Let targetKeys be ? target.[[OwnPropertyKeys]]().
        // 12. Assert: targetKeys is a List of property keys.
        // 13. Assert: targetKeys contains no duplicate entries.
        let target_keys = target.internal_own_property_keys(agent)?;

        // 14. Let targetConfigurableKeys be a new empty List.
        let mut target_configurable_keys = Vec::new();
        // 15. Let targetNonconfigurableKeys be a new empty List.
        let mut target_nonconfigurable_keys = Vec::new();

        // 16. For each element key of targetKeys, do
        for key in target_keys {
            // a. Let desc be ? target.[[GetOwnProperty]](key).
            let desc = target.internal_get_own_property(agent, key)?;
            // b. If desc is not undefined and desc.[[Configurable]] is false, then
            if desc.is_some_and(|desc| desc.configurable == Some(false)) {
                // i. Append key to targetNonconfigurableKeys.
                target_nonconfigurable_keys.push(key);
            } else {
                // c. Else,
                // i. Append key to targetConfigurableKeys.
                target_configurable_keys.push(key);
            }
        }

        // 17. If extensibleTarget is true and targetNonconfigurableKeys is empty, then
        if extensible_target && target_nonconfigurable_keys.is_empty() {
            // a. Return trapResult.
            return Ok(trap_result);
        }

        // 18. Let uncheckedResultKeys be a List whose elements are the elements of trapResult.
        // 19. For each element key of targetNonconfigurableKeys, do
        for key in target_nonconfigurable_keys {
            // a. If uncheckedResultKeys does not contain key, throw a TypeError exception.
            // b. Remove key from uncheckedResultKeys.
            if !unchecked_result_keys.remove(&key) {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    &format!(
                        "'ownKeys' on proxy: trap result did not include '{}'",
                        key.as_display(agent)
                    ),
                ));
            }
        }

        // 20. If extensibleTarget is true, return trapResult.
        if extensible_target {
            return Ok(trap_result);
        }

        // 21. For each element key of targetConfigurableKeys, do
        for key in target_configurable_keys {
            // a. If uncheckedResultKeys does not contain key, throw a TypeError exception.
            // b. Remove key from uncheckedResultKeys.
            if !unchecked_result_keys.remove(&key) {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    &format!(
                        "'ownKeys' on proxy: trap result did not include '{}'",
                        key.as_display(agent)
                    ),
                ));
            }
        }

        // 22. If uncheckedResultKeys is not empty, throw a TypeError exception.
        if !unchecked_result_keys.is_empty() {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "'ownKeys' on proxy: trap returned extra keys but proxy target is non-extensible",
            ));
        }

        // 23. Return trapResult.
        Ok(trap_result)
    }
}

/// ### [10.5.12 \[\[Call\]\] ( thisArgument, argumentsList )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-call-thisargument-argumentslist)
pub(crate) fn proxy_call(
    agent: &mut Agent,
    proxy: Proxy,
    this_argument: Value,
    arguments_list: &[Value],
) -> JsResult<Value> {
    // 1. Perform ? ValidateNonRevokedProxy(O).
    // 2. Let target be O.[[ProxyTarget]].
    // 3. Let handler be O.[[ProxyHandler]].
    // 4. Assert: handler is an Object.
    let NonRevokedProxy { target, handler } = validate_non_revoked_proxy(agent, proxy)?;

    // 5. Let trap be ? GetMethod(handler, "apply").
    let Some(trap) = trap(agent, handler, BUILTIN_STRING_MEMORY.apply)? else {
        // 6. If trap is undefined, then
        // a. Return ? Call(target, thisArgument, argumentsList).
        return call_function(agent, target, this_argument, arguments_list);
    };

    // 7. Let argArray be CreateArrayFromList(argumentsList).
    let arg_array = create_array_from_list(agent, arguments_list);

    // 8. Return ? Call(trap, handler, « target, thisArgument, argArray »).
    call_function(
        agent,
        trap,
        handler.into(),
        &[target.into(), this_argument, arg_array.into()],
    )
}

/// ### [10.5.13 \[\[Construct\]\] ( argumentsList, newTarget )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-construct-argumentslist-newtarget)
pub(crate) fn proxy_construct(
    agent: &mut Agent,
    proxy: Proxy,
    arguments_list: &[Value],
    new_target: Object,
) -> JsResult<Object> {
    // 1. Perform ? ValidateNonRevokedProxy(O).
    // 2. Let target be O.[[ProxyTarget]].
    // 3. Let handler be O.[[ProxyHandler]].
    // 4. Assert: handler is an Object.
    let NonRevokedProxy { target, handler } = validate_non_revoked_proxy(agent, proxy)?;

    // 5. Assert: IsConstructor(target) is true.
    debug_assert!(is_constructor(agent, target.into()).is_some());

    // 6. Let trap be ? GetMethod(handler, "construct").
    let Some(trap) = trap(agent, handler, BUILTIN_STRING_MEMORY.construct)? else {
        // 7. If trap is undefined, then
        // a. Return ? Construct(target, argumentsList, newTarget).
        return construct(agent, target, arguments_list, Some(new_target));
    };

    // 8. Let argArray be CreateArrayFromList(argumentsList).
    let arg_array = create_array_from_list(agent, arguments_list);

    // 9. Let newObj be ? Call(trap, handler, « target, argArray, newTarget »).
    let new_obj = call_function(
        agent,
        trap,
        handler.into(),
        &[target.into(), arg_array.into(), new_target.into()],
    )?;

    // 10. If newObj is not an Object, throw a TypeError exception.
    let Value::Object(new_obj) = new_obj else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "'construct' on proxy: trap returned non-object",
        ));
    };

    // 11. Return newObj.
    Ok(new_obj)
}

/// ### [10.5.15 ProxyCreate ( target, handler )](https://tc39.es/ecma262/#sec-proxycreate)
///
/// The abstract operation ProxyCreate takes arguments target (an ECMAScript
/// language value) and handler (an ECMAScript language value) and returns
/// either a normal completion containing a Proxy exotic object or a throw
/// completion. It is used to specify the creation of new Proxy objects.
pub fn proxy_create(agent: &mut Agent, target: Value, handler: Value) -> JsResult<Object> {
    // 1. If target is not an Object, throw a TypeError exception.
    let Ok(target) = Object::try_from(target) else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot create proxy with a non-object as target or handler",
        ));
    };
    // 2. If handler is not an Object, throw a TypeError exception.
    let Ok(handler) = Object::try_from(handler) else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot create proxy with a non-object as target or handler",
        ));
    };
    // 3. Let P be MakeBasicObject(« [[ProxyHandler]], [[ProxyTarget]] »).
    // 4. Set P's essential internal methods, except for [[Call]] and
    // [[Construct]], to the definitions specified in 10.5.
    // 5. If IsCallable(target) is true, then
    // a. Set P.[[Call]] as specified in 10.5.12.
    // b. If IsConstructor(target) is true, then
    // i. Set P.[[Construct]] as specified in 10.5.13.
    let callable = is_callable(agent, target.into()).is_some();
    let constructible = callable && is_constructor(agent, target.into()).is_some();
    // 6. Set P.[[ProxyTarget]] to target.
    // 7. Set P.[[ProxyHandler]] to handler.
    // 8. Return P.
    Ok(agent.heap.create(Backend::Proxy(ProxyHeapData::NonRevoked {
        proxy_target: target,
        proxy_handler: handler,
        callable,
        constructible,
    })))
}

/// ### [28.2.2.1 Proxy.revocable ( target, handler )](https://tc39.es/ecma262/#sec-proxy.revocable)
///
/// Returns the new proxy together with its revoker function. Calling the
/// revoker any number of times revokes the proxy once.
pub fn create_revocable_proxy(
    agent: &mut Agent,
    target: Value,
    handler: Value,
) -> JsResult<(Object, Object)> {
    // 1. Let proxy be ? ProxyCreate(target, handler).
    let proxy = proxy_create(agent, target, handler)?;

    // 2. Let revokerClosure be a new Abstract Closure with no parameters that captures nothing and performs the following steps when called:
    // a. Let F be the active function object.
    // b. Let p be F.[[RevocableProxy]].
    // c. If p is null, return undefined.
    // d. Set F.[[RevocableProxy]] to null.
    // e. Assert: p is a Proxy exotic object.
    // f. Set p.[[ProxyTarget]] to null.
    // g. Set p.[[ProxyHandler]] to null.
    // h. Return undefined.
    let revoker_closure = move |agent: &mut Agent, _: Value, _: ArgumentsList| {
        Proxy(proxy).revoke(agent);
        Ok(Value::Undefined)
    };

    // 3. Let revoker be CreateBuiltinFunction(revokerClosure, 0, "", « [[RevocableProxy]] »).
    // 4. Set revoker.[[RevocableProxy]] to proxy.
    let revoker = create_builtin_function(
        agent,
        Behaviour::Closure(Rc::new(revoker_closure)),
        BuiltinFunctionArgs::new(0, ""),
    );
    Ok((proxy, revoker))
}

/// ### [28.2.2.1 Proxy.revocable ( target, handler )](https://tc39.es/ecma262/#sec-proxy.revocable)
///
/// Returns a `{ proxy, revoke }` result object.
pub fn proxy_revocable(agent: &mut Agent, target: Value, handler: Value) -> JsResult<Object> {
    let (proxy, revoker) = create_revocable_proxy(agent, target, handler)?;

    // 5. Let result be OrdinaryObjectCreate(%Object.prototype%).
    let result = ordinary_object_create_with_intrinsics(agent);

    // 6. Perform ! CreateDataPropertyOrThrow(result, "proxy", proxy).
    create_data_property_or_throw(
        agent,
        result,
        PropertyKey::String(BUILTIN_STRING_MEMORY.proxy),
        proxy.into(),
    )?;

    // 7. Perform ! CreateDataPropertyOrThrow(result, "revoke", revoker).
    create_data_property_or_throw(
        agent,
        result,
        PropertyKey::String(BUILTIN_STRING_MEMORY.revoke),
        revoker.into(),
    )?;

    // 8. Return result.
    Ok(result)
}
