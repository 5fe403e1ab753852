// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [28.1 The Reflect Object](https://tc39.es/ecma262/#sec-reflect-object)

use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::{call_function, construct, create_list_from_array_like},
        testing_and_comparison::{is_callable, is_constructor},
        type_conversion::to_property_key,
    },
    builtins::{
        ArgumentsList, Behaviour, BuiltinFunctionArgs, RegularFn, create_array_from_list,
        create_builtin_function, ordinary_object_create_with_intrinsics,
    },
    execution::{Agent, ExceptionType, JsResult, hidden, hidden_readonly},
    types::{
        InternalMethods, Object, PropertyDescriptor, PropertyKey, String, Symbol, Value,
        WellKnownSymbolIndexes,
    },
};

/// Name, length and behaviour of every function property of Reflect.
const REFLECT_FUNCTIONS: [(&str, u32, RegularFn); 13] = [
    ("apply", 3, ReflectObject::apply),
    ("construct", 2, ReflectObject::construct),
    ("defineProperty", 3, ReflectObject::define_property),
    ("deleteProperty", 2, ReflectObject::delete_property),
    ("get", 2, ReflectObject::get),
    (
        "getOwnPropertyDescriptor",
        2,
        ReflectObject::get_own_property_descriptor,
    ),
    ("getPrototypeOf", 1, ReflectObject::get_prototype_of),
    ("has", 2, ReflectObject::has),
    ("isExtensible", 1, ReflectObject::is_extensible),
    ("ownKeys", 1, ReflectObject::own_keys),
    ("preventExtensions", 1, ReflectObject::prevent_extensions),
    ("set", 3, ReflectObject::set),
    ("setPrototypeOf", 2, ReflectObject::set_prototype_of),
];

pub(crate) struct ReflectObject;

fn require_object(agent: &mut Agent, value: Value) -> JsResult<Object> {
    Object::try_from(value).map_err(|_| {
        agent.throw_exception_with_static_message(ExceptionType::TypeError, "Value is not an object")
    })
}

impl ReflectObject {
    /// ### [28.1.1 Reflect.apply ( target, thisArgument, argumentsList )](https://tc39.es/ecma262/#sec-reflect.apply)
    fn apply(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let target = arguments.get(0);
        let this_argument = arguments.get(1);
        let arguments_list = arguments.get(2);

        // 1. If IsCallable(target) is false, throw a TypeError exception.
        let Some(target) = is_callable(agent, target) else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Value is not callable",
            ));
        };
        // 2. Let args be ? CreateListFromArrayLike(argumentsList).
        let args = create_list_from_array_like(agent, arguments_list)?;
        // 3. Perform PrepareForTailCall().
        // 4. Return ? Call(target, thisArgument, args)
        call_function(agent, target, this_argument, &args)
    }

    /// ### [28.1.2 Reflect.construct ( target, argumentsList \[ , newTarget \] )](https://tc39.es/ecma262/#sec-reflect.construct)
    fn construct(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let target = arguments.get(0);
        let arguments_list = arguments.get(1);

        // 1. If IsConstructor(target) is false, throw a TypeError exception.
        let Some(target) = is_constructor(agent, target) else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Value is not a constructor",
            ));
        };

        // 2. If newTarget is not present, set newTarget to target.
        // 3. Else if IsConstructor(newTarget) is false, throw a TypeError exception.
        let new_target = if arguments.len() > 2 {
            let Some(new_target) = is_constructor(agent, arguments.get(2)) else {
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "Value is not a constructor",
                ));
            };
            new_target
        } else {
            target
        };

        // 4. Let args be ? CreateListFromArrayLike(argumentsList).
        let args = create_list_from_array_like(agent, arguments_list)?;
        // 5. Return ? Construct(target, args, newTarget).
        Ok(construct(agent, target, &args, Some(new_target))?.into())
    }

    /// ### [28.1.3 Reflect.defineProperty ( target, propertyKey, attributes )](https://tc39.es/ecma262/#sec-reflect.defineproperty)
    fn define_property(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        // 1. If target is not an Object, throw a TypeError exception.
        let target = require_object(agent, arguments.get(0))?;
        // 2. Let key be ? ToPropertyKey(propertyKey).
        let key = to_property_key(agent, arguments.get(1))?;
        // 3. Let desc be ? ToPropertyDescriptor(attributes).
        let desc = PropertyDescriptor::to_property_descriptor(agent, arguments.get(2))?;
        // 4. Return ? target.[[DefineOwnProperty]](key, desc).
        Ok(target.internal_define_own_property(agent, key, desc)?.into())
    }

    /// ### [28.1.4 Reflect.deleteProperty ( target, propertyKey )](https://tc39.es/ecma262/#sec-reflect.deleteproperty)
    fn delete_property(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        // 1. If target is not an Object, throw a TypeError exception.
        let target = require_object(agent, arguments.get(0))?;
        // 2. Let key be ? ToPropertyKey(propertyKey).
        let key = to_property_key(agent, arguments.get(1))?;
        // 3. Return ? target.[[Delete]](key).
        Ok(target.internal_delete(agent, key)?.into())
    }

    /// ### [28.1.5 Reflect.get ( target, propertyKey \[ , receiver \] )](https://tc39.es/ecma262/#sec-reflect.get)
    fn get(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. If target is not an Object, throw a TypeError exception.
        let target = require_object(agent, arguments.get(0))?;
        // 2. Let key be ? ToPropertyKey(propertyKey).
        let key = to_property_key(agent, arguments.get(1))?;
        let receiver = if arguments.len() > 2 {
            arguments.get(2)
        } else {
            // 3. If receiver is not present, then
            //   a. Set receiver to target.
            target.into()
        };
        // 4. Return ? target.[[Get]](key, receiver).
        target.internal_get(agent, key, receiver)
    }

    /// ### [28.1.6 Reflect.getOwnPropertyDescriptor ( target, propertyKey )](https://tc39.es/ecma262/#sec-reflect.getownpropertydescriptor)
    fn get_own_property_descriptor(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        // 1. If target is not an Object, throw a TypeError exception.
        let target = require_object(agent, arguments.get(0))?;
        // 2. Let key be ? ToPropertyKey(propertyKey).
        let key = to_property_key(agent, arguments.get(1))?;
        // 3. Let desc be ? target.[[GetOwnProperty]](key).
        let desc = target.internal_get_own_property(agent, key)?;
        // 4. Return FromPropertyDescriptor(desc).
        Ok(PropertyDescriptor::from_property_descriptor(desc, agent).into())
    }

    /// ### [28.1.7 Reflect.getPrototypeOf ( target )](https://tc39.es/ecma262/#sec-reflect.getprototypeof)
    fn get_prototype_of(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        // 1. If target is not an Object, throw a TypeError exception.
        let target = require_object(agent, arguments.get(0))?;
        // 2. Return ? target.[[GetPrototypeOf]]().
        Ok(target
            .internal_get_prototype_of(agent)?
            .map_or(Value::Null, Value::Object))
    }

    /// ### [28.1.8 Reflect.has ( target, propertyKey )](https://tc39.es/ecma262/#sec-reflect.has)
    fn has(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. If target is not an Object, throw a TypeError exception.
        let target = require_object(agent, arguments.get(0))?;
        // 2. Let key be ? ToPropertyKey(propertyKey).
        let key = to_property_key(agent, arguments.get(1))?;
        // 3. Return ? target.[[HasProperty]](key).
        Ok(target.internal_has_property(agent, key)?.into())
    }

    /// ### [28.1.9 Reflect.isExtensible ( target )](https://tc39.es/ecma262/#sec-reflect.isextensible)
    fn is_extensible(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        // 1. If target is not an Object, throw a TypeError exception.
        let target = require_object(agent, arguments.get(0))?;
        // 2. Return ? target.[[IsExtensible]]().
        Ok(target.internal_is_extensible(agent)?.into())
    }

    /// ### [28.1.10 Reflect.ownKeys ( target )](https://tc39.es/ecma262/#sec-reflect.ownkeys)
    fn own_keys(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. If target is not an Object, throw a TypeError exception.
        let target = require_object(agent, arguments.get(0))?;
        // 2. Let keys be ? target.[[OwnPropertyKeys]]().
        let keys = target.internal_own_property_keys(agent)?;
        let keys: Vec<Value> = keys.into_iter().map(|key| key.into_value(agent)).collect();
        // 3. Return CreateArrayFromList(keys).
        Ok(create_array_from_list(agent, &keys).into())
    }

    /// ### [28.1.11 Reflect.preventExtensions ( target )](https://tc39.es/ecma262/#sec-reflect.preventextensions)
    fn prevent_extensions(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        // 1. If target is not an Object, throw a TypeError exception.
        let target = require_object(agent, arguments.get(0))?;
        // 2. Return ? target.[[PreventExtensions]]().
        Ok(target.internal_prevent_extensions(agent)?.into())
    }

    /// ### [28.1.12 Reflect.set ( target, propertyKey, V \[ , receiver \] )](https://tc39.es/ecma262/#sec-reflect.set)
    fn set(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. If target is not an Object, throw a TypeError exception.
        let target = require_object(agent, arguments.get(0))?;
        // 2. Let key be ? ToPropertyKey(propertyKey).
        let key = to_property_key(agent, arguments.get(1))?;
        let v = arguments.get(2);
        let receiver = if arguments.len() > 3 {
            arguments.get(3)
        } else {
            // 3. If receiver is not present, then
            //   a. Set receiver to target.
            target.into()
        };
        // 4. Return ? target.[[Set]](key, V, receiver).
        Ok(target.internal_set(agent, key, v, receiver)?.into())
    }

    /// ### [28.1.13 Reflect.setPrototypeOf ( target, proto )](https://tc39.es/ecma262/#sec-reflect.setprototypeof)
    fn set_prototype_of(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        // 1. If target is not an Object, throw a TypeError exception.
        let target = require_object(agent, arguments.get(0))?;
        // 2. If proto is not an Object and proto is not null, throw a TypeError exception.
        let proto = match arguments.get(1) {
            Value::Object(proto) => Some(proto),
            Value::Null => None,
            _ => {
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "Prototype must be an object or null",
                ));
            }
        };
        // 3. Return ? target.[[SetPrototypeOf]](proto).
        Ok(target.internal_set_prototype_of(agent, proto)?.into())
    }
}

/// Creates a Reflect namespace object holding fresh builtin functions.
pub fn create_reflect_object(agent: &mut Agent) -> Object {
    let reflect = ordinary_object_create_with_intrinsics(agent);
    for (name, length, behaviour) in REFLECT_FUNCTIONS {
        let function = create_builtin_function(
            agent,
            Behaviour::Regular(behaviour),
            BuiltinFunctionArgs::new(length, name),
        );
        let key = PropertyKey::from_str(agent, name);
        reflect
            .property_store_mut(agent)
            .set(key, hidden(function.into()));
    }
    // 28.1.14 Reflect [ @@toStringTag ]
    let tag = String::from_str(agent, "Reflect");
    reflect.property_store_mut(agent).set(
        PropertyKey::Symbol(Symbol::from(WellKnownSymbolIndexes::ToStringTag)),
        hidden_readonly(tag.into()),
    );
    reflect
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ecmascript::{
        abstract_operations::operations_on_objects::{call_function, get},
        execution::Options,
    };

    #[test]
    fn reflect_get_prototype_of_null() {
        let mut agent = Agent::new(Options::default());
        let reflect = create_reflect_object(&mut agent);
        let key = PropertyKey::from_str(&mut agent, "getPrototypeOf");
        let Value::Object(get_prototype_of) = get(&mut agent, reflect, key).unwrap() else {
            panic!("Reflect.getPrototypeOf missing");
        };
        let prototype = agent.intrinsics().object_prototype();
        let result =
            call_function(&mut agent, get_prototype_of, Value::Undefined, &[prototype.into()])
                .unwrap();
        assert_eq!(result, Value::Null);
        assert!(
            call_function(&mut agent, get_prototype_of, Value::Undefined, &[1.into()]).is_err()
        );
    }
}
