// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Proxy handlers implemented by the embedder in Rust.
//!
//! Each configured trap becomes a builtin function on a fresh handler
//! object, so native traps go through exactly the same lookup, call and
//! invariant checks as traps written in script.

use std::rc::Rc;

use super::proxy_create;
use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::create_list_from_array_like, type_conversion::to_property_key,
    },
    builtins::{
        ArgumentsList, Behaviour, BuiltinFunctionArgs, create_array_from_list,
        create_builtin_function, ordinary::ordinary_object_create_with_prototype,
    },
    execution::{Agent, ExceptionType, JsResult},
    types::{Object, PropertyDescriptor, PropertyKey, Value},
};

pub type GetPrototypeOfTrap = dyn Fn(&mut Agent, Object) -> JsResult<Option<Object>>;
pub type SetPrototypeOfTrap = dyn Fn(&mut Agent, Object, Option<Object>) -> JsResult<bool>;
pub type IsExtensibleTrap = dyn Fn(&mut Agent, Object) -> JsResult<bool>;
pub type PreventExtensionsTrap = dyn Fn(&mut Agent, Object) -> JsResult<bool>;
pub type GetOwnPropertyDescriptorTrap =
    dyn Fn(&mut Agent, Object, PropertyKey) -> JsResult<Option<PropertyDescriptor>>;
pub type DefinePropertyTrap =
    dyn Fn(&mut Agent, Object, PropertyKey, PropertyDescriptor) -> JsResult<bool>;
pub type HasTrap = dyn Fn(&mut Agent, Object, PropertyKey) -> JsResult<bool>;
pub type GetTrap = dyn Fn(&mut Agent, Object, PropertyKey, Value) -> JsResult<Value>;
pub type SetTrap = dyn Fn(&mut Agent, Object, PropertyKey, Value, Value) -> JsResult<bool>;
pub type DeletePropertyTrap = dyn Fn(&mut Agent, Object, PropertyKey) -> JsResult<bool>;
pub type OwnKeysTrap = dyn Fn(&mut Agent, Object) -> JsResult<Vec<PropertyKey>>;
pub type ApplyTrap = dyn Fn(&mut Agent, Object, Value, &[Value]) -> JsResult<Value>;
pub type ConstructTrap = dyn Fn(&mut Agent, Object, &[Value], Object) -> JsResult<Object>;

/// Native implementations for any subset of the thirteen proxy traps.
/// Missing traps forward to the target.
#[derive(Clone, Default)]
pub struct ProxyTrapConfig {
    pub get_prototype_of: Option<Rc<GetPrototypeOfTrap>>,
    pub set_prototype_of: Option<Rc<SetPrototypeOfTrap>>,
    pub is_extensible: Option<Rc<IsExtensibleTrap>>,
    pub prevent_extensions: Option<Rc<PreventExtensionsTrap>>,
    pub get_own_property_descriptor: Option<Rc<GetOwnPropertyDescriptorTrap>>,
    pub define_property: Option<Rc<DefinePropertyTrap>>,
    pub has: Option<Rc<HasTrap>>,
    pub get: Option<Rc<GetTrap>>,
    pub set: Option<Rc<SetTrap>>,
    pub delete_property: Option<Rc<DeletePropertyTrap>>,
    pub own_keys: Option<Rc<OwnKeysTrap>>,
    pub apply: Option<Rc<ApplyTrap>>,
    pub construct: Option<Rc<ConstructTrap>>,
}

impl std::fmt::Debug for ProxyTrapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyTrapConfig")
            .field("get_prototype_of", &self.get_prototype_of.is_some())
            .field("set_prototype_of", &self.set_prototype_of.is_some())
            .field("is_extensible", &self.is_extensible.is_some())
            .field("prevent_extensions", &self.prevent_extensions.is_some())
            .field(
                "get_own_property_descriptor",
                &self.get_own_property_descriptor.is_some(),
            )
            .field("define_property", &self.define_property.is_some())
            .field("has", &self.has.is_some())
            .field("get", &self.get.is_some())
            .field("set", &self.set.is_some())
            .field("delete_property", &self.delete_property.is_some())
            .field("own_keys", &self.own_keys.is_some())
            .field("apply", &self.apply.is_some())
            .field("construct", &self.construct.is_some())
            .finish()
    }
}

fn trap_target(agent: &mut Agent, value: Value) -> JsResult<Object> {
    Object::try_from(value).map_err(|_| {
        agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Proxy trap called without an object target",
        )
    })
}

fn optional_object(agent: &mut Agent, value: Value) -> JsResult<Option<Object>> {
    match value {
        Value::Null => Ok(None),
        Value::Object(object) => Ok(Some(object)),
        _ => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Object prototype may only be an Object or null",
        )),
    }
}

/// Installs `behaviour` on `handler` as the trap called `name`.
fn install(
    agent: &mut Agent,
    handler: Object,
    name: &'static str,
    length: u32,
    behaviour: impl Fn(&mut Agent, Value, ArgumentsList) -> JsResult<Value> + 'static,
) {
    let function = create_builtin_function(
        agent,
        Behaviour::Closure(Rc::new(behaviour)),
        BuiltinFunctionArgs::new(length, name),
    );
    let key = PropertyKey::from_str(agent, name);
    handler.property_store_mut(agent).set_value(key, function.into());
}

/// Creates a proxy for `target` whose handler dispatches to the native
/// traps in `config`.
pub fn new_native_proxy(
    agent: &mut Agent,
    target: Object,
    config: ProxyTrapConfig,
) -> JsResult<Object> {
    let handler = ordinary_object_create_with_prototype(agent, None);

    if let Some(trap) = config.get_prototype_of {
        install(
            agent,
            handler,
            "getPrototypeOf",
            1,
            move |agent, _, args| {
                let target = trap_target(agent, args.get(0))?;
                Ok(trap(agent, target)?.into())
            },
        );
    }
    if let Some(trap) = config.set_prototype_of {
        install(
            agent,
            handler,
            "setPrototypeOf",
            2,
            move |agent, _, args| {
                let target = trap_target(agent, args.get(0))?;
                let prototype = optional_object(agent, args.get(1))?;
                Ok(trap(agent, target, prototype)?.into())
            },
        );
    }
    if let Some(trap) = config.is_extensible {
        install(
            agent,
            handler,
            "isExtensible",
            1,
            move |agent, _, args| {
                let target = trap_target(agent, args.get(0))?;
                Ok(trap(agent, target)?.into())
            },
        );
    }
    if let Some(trap) = config.prevent_extensions {
        install(
            agent,
            handler,
            "preventExtensions",
            1,
            move |agent, _, args| {
                let target = trap_target(agent, args.get(0))?;
                Ok(trap(agent, target)?.into())
            },
        );
    }
    if let Some(trap) = config.get_own_property_descriptor {
        install(
            agent,
            handler,
            "getOwnPropertyDescriptor",
            2,
            move |agent, _, args| {
                let target = trap_target(agent, args.get(0))?;
                let key = to_property_key(agent, args.get(1))?;
                let descriptor = trap(agent, target, key)?;
                Ok(PropertyDescriptor::from_property_descriptor(descriptor, agent).into())
            },
        );
    }
    if let Some(trap) = config.define_property {
        install(
            agent,
            handler,
            "defineProperty",
            3,
            move |agent, _, args| {
                let target = trap_target(agent, args.get(0))?;
                let key = to_property_key(agent, args.get(1))?;
                let descriptor = PropertyDescriptor::to_property_descriptor(agent, args.get(2))?;
                Ok(trap(agent, target, key, descriptor)?.into())
            },
        );
    }
    if let Some(trap) = config.has {
        install(
            agent,
            handler,
            "has",
            2,
            move |agent, _, args| {
                let target = trap_target(agent, args.get(0))?;
                let key = to_property_key(agent, args.get(1))?;
                Ok(trap(agent, target, key)?.into())
            },
        );
    }
    if let Some(trap) = config.get {
        install(
            agent,
            handler,
            "get",
            3,
            move |agent, _, args| {
                let target = trap_target(agent, args.get(0))?;
                let key = to_property_key(agent, args.get(1))?;
                trap(agent, target, key, args.get(2))
            },
        );
    }
    if let Some(trap) = config.set {
        install(
            agent,
            handler,
            "set",
            4,
            move |agent, _, args| {
                let target = trap_target(agent, args.get(0))?;
                let key = to_property_key(agent, args.get(1))?;
                Ok(trap(agent, target, key, args.get(2), args.get(3))?.into())
            },
        );
    }
    if let Some(trap) = config.delete_property {
        install(
            agent,
            handler,
            "deleteProperty",
            2,
            move |agent, _, args| {
                let target = trap_target(agent, args.get(0))?;
                let key = to_property_key(agent, args.get(1))?;
                Ok(trap(agent, target, key)?.into())
            },
        );
    }
    if let Some(trap) = config.own_keys {
        install(
            agent,
            handler,
            "ownKeys",
            1,
            move |agent, _, args| {
                let target = trap_target(agent, args.get(0))?;
                let keys = trap(agent, target)?;
                let values: Vec<Value> = keys.into_iter().map(|key| key.into_value(agent)).collect();
                Ok(create_array_from_list(agent, &values).into())
            },
        );
    }
    if let Some(trap) = config.apply {
        install(
            agent,
            handler,
            "apply",
            3,
            move |agent, _, args| {
                let target = trap_target(agent, args.get(0))?;
                let arguments = create_list_from_array_like(agent, args.get(2))?;
                trap(agent, target, args.get(1), &arguments)
            },
        );
    }
    if let Some(trap) = config.construct {
        install(
            agent,
            handler,
            "construct",
            3,
            move |agent, _, args| {
                let target = trap_target(agent, args.get(0))?;
                let arguments = create_list_from_array_like(agent, args.get(1))?;
                let new_target = trap_target(agent, args.get(2))?;
                Ok(trap(agent, target, &arguments, new_target)?.into())
            },
        );
    }

    proxy_create(agent, target.into(), handler.into())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ecmascript::{
        builtins::ordinary_object_create_with_intrinsics, execution::Options,
        types::InternalMethods,
    };

    #[test]
    fn native_get_trap_intercepts_reads() {
        let mut agent = Agent::new(Options::default());
        let target = ordinary_object_create_with_intrinsics(&mut agent);
        let proxy = new_native_proxy(
            &mut agent,
            target,
            ProxyTrapConfig {
                get: Some(Rc::new(|_: &mut Agent, _: Object, key: PropertyKey, _: Value| {
                    Ok(match key {
                        PropertyKey::Integer(index) => Value::from(index * 2),
                        _ => Value::Undefined,
                    })
                })),
                ..Default::default()
            },
        )
        .unwrap();
        let value = proxy
            .internal_get(&mut agent, PropertyKey::Integer(21), proxy.into())
            .unwrap();
        assert_eq!(value, Value::from(42));
    }
}
