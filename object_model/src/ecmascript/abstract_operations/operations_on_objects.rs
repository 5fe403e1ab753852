// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [7.3 Operations on Objects](https://tc39.es/ecma262/#sec-operations-on-objects)

use super::{testing_and_comparison::is_callable, type_conversion::to_length};
use crate::ecmascript::{
    builtins::{
        Array, ArgumentsList,
        builtin_function::builtin_call_or_construct,
        proxy::{Proxy, proxy_call, proxy_construct},
    },
    execution::{Agent, ExceptionType, JsError, JsResult},
    types::{
        BUILTIN_STRING_MEMORY, Backend, InternalMethods, Object, PropertyDescriptor, PropertyKey,
        Value,
    },
};

/// ### [7.3.2 Get ( O, P )](https://tc39.es/ecma262/#sec-get-o-p)
///
/// The abstract operation Get takes arguments O (an Object) and P (a property
/// key) and returns either a normal completion containing an ECMAScript
/// language value or a throw completion. It is used to retrieve the value of a
/// specific property of an object.
pub fn get(agent: &mut Agent, o: Object, p: PropertyKey) -> JsResult<Value> {
    // 1. Return ? O.[[Get]](P, O).
    o.internal_get(agent, p, o.into())
}

/// ### [7.3.4 Set ( O, P, V, Throw )](https://tc39.es/ecma262/#sec-set-o-p-v-throw)
///
/// The abstract operation Set takes arguments O (an Object), P (a property
/// key), V (an ECMAScript language value), and Throw (a Boolean) and returns
/// either a normal completion containing UNUSED or a throw completion. It is
/// used to set the value of a specific property of an object. V is the new
/// value for the property.
///
/// Returns the success of the assignment when Throw is false.
pub fn set(agent: &mut Agent, o: Object, p: PropertyKey, v: Value, throw: bool) -> JsResult<bool> {
    // 1. Let success be ? O.[[Set]](P, V, O).
    let success = o.internal_set(agent, p, v, o.into())?;
    // 2. If success is false and Throw is true, throw a TypeError exception.
    if !success && throw {
        return Err(assignment_failure(agent, o, p)?);
    }
    // 3. Return UNUSED.
    Ok(success)
}

/// ### [7.3.5 CreateDataProperty ( O, P, V )](https://tc39.es/ecma262/#sec-createdataproperty)
///
/// > NOTE: This abstract operation creates a property whose attributes are set
/// > to the same defaults used for properties created by the ECMAScript language
/// > assignment operator. Normally, the property will not already exist. If it
/// > does exist and is not configurable or if O is not extensible,
/// > \[\[DefineOwnProperty]] will return false.
pub fn create_data_property(
    agent: &mut Agent,
    object: Object,
    property_key: PropertyKey,
    value: Value,
) -> JsResult<bool> {
    // 1. Let newDesc be the PropertyDescriptor { [[Value]]: V, [[Writable]]: true, [[Enumerable]]: true, [[Configurable]]: true }.
    let new_desc = PropertyDescriptor::new_data_descriptor(value);
    // 2. Return ? O.[[DefineOwnProperty]](P, newDesc).
    object.internal_define_own_property(agent, property_key, new_desc)
}

/// ### [7.3.7 CreateDataPropertyOrThrow ( O, P, V )](https://tc39.es/ecma262/#sec-createdatapropertyorthrow)
pub fn create_data_property_or_throw(
    agent: &mut Agent,
    object: Object,
    property_key: PropertyKey,
    value: Value,
) -> JsResult<()> {
    // 1. Let success be ? CreateDataProperty(O, P, V).
    let success = create_data_property(agent, object, property_key, value)?;
    // 2. If success is false, throw a TypeError exception.
    if !success {
        return Err(definition_failure(agent, object, property_key)?);
    }
    // 3. Return UNUSED.
    Ok(())
}

/// ### [7.3.8 DefinePropertyOrThrow ( O, P, desc )](https://tc39.es/ecma262/#sec-definepropertyorthrow)
///
/// The abstract operation DefinePropertyOrThrow takes arguments O (an Object),
/// P (a property key), and desc (a Property Descriptor) and returns either a
/// normal completion containing UNUSED or a throw completion. It is used to
/// call the \[\[DefineOwnProperty]] internal method of an object in a manner
/// that will throw a TypeError exception if the requested property update
/// cannot be performed.
pub fn define_property_or_throw(
    agent: &mut Agent,
    object: Object,
    property_key: PropertyKey,
    desc: PropertyDescriptor,
) -> JsResult<()> {
    define_own_property(agent, object, property_key, desc, true).map(|_| ())
}

/// Calls \[\[DefineOwnProperty]], turning a false result into a TypeError
/// when `throw` is set.
pub fn define_own_property(
    agent: &mut Agent,
    object: Object,
    property_key: PropertyKey,
    desc: PropertyDescriptor,
    throw: bool,
) -> JsResult<bool> {
    // 1. Let success be ? O.[[DefineOwnProperty]](P, desc).
    let success = object.internal_define_own_property(agent, property_key, desc)?;
    // 2. If success is false, throw a TypeError exception.
    if !success && throw {
        return Err(definition_failure(agent, object, property_key)?);
    }
    // 3. Return UNUSED.
    Ok(success)
}

/// ### [7.3.9 DeletePropertyOrThrow ( O, P )](https://tc39.es/ecma262/#sec-deletepropertyorthrow)
pub fn delete_property_or_throw(agent: &mut Agent, o: Object, p: PropertyKey) -> JsResult<()> {
    delete_property(agent, o, p, true).map(|_| ())
}

/// Calls \[\[Delete]], turning a false result into a TypeError when `throw`
/// is set.
pub fn delete_property(agent: &mut Agent, o: Object, p: PropertyKey, throw: bool) -> JsResult<bool> {
    // 1. Let success be ? O.[[Delete]](P).
    let success = o.internal_delete(agent, p)?;
    // 2. If success is false, throw a TypeError exception.
    if !success && throw {
        let message = format!("Cannot delete property: {}", p.as_display(agent));
        return Err(agent.throw_exception(ExceptionType::TypeError, &message));
    }
    // 3. Return unused.
    Ok(success)
}

/// ### [7.3.11 GetMethod ( V, P )](https://tc39.es/ecma262/#sec-getmethod)
///
/// The abstract operation GetMethod takes arguments V (an ECMAScript language
/// value) and P (a property key) and returns either a normal completion
/// containing either a function object or undefined, or a throw completion. It
/// is used to get the value of a specific property of an ECMAScript language
/// value when the value of the property is expected to be a function.
///
/// Only objects are supported as V: there are no primitive wrapper objects.
pub fn get_object_method(agent: &mut Agent, o: Object, p: PropertyKey) -> JsResult<Option<Object>> {
    // 1. Let func be ? GetV(V, P).
    let func = get(agent, o, p)?;
    // 2. If func is either undefined or null, return undefined.
    if func.is_nullish() {
        return Ok(None);
    }
    // 3. If IsCallable(func) is false, throw a TypeError exception.
    let Some(func) = is_callable(agent, func) else {
        let message = format!("{} is not a function", p.as_display(agent));
        return Err(agent.throw_exception(ExceptionType::TypeError, &message));
    };
    // 4. Return func.
    Ok(Some(func))
}

/// ### [7.3.12 HasProperty ( O, P )](https://tc39.es/ecma262/#sec-hasproperty)
///
/// The abstract operation HasProperty takes arguments O (an Object) and P (a
/// property key) and returns either a normal completion containing a Boolean
/// or a throw completion. It is used to determine whether an object has a
/// property with the specified property key. The property may be either own or
/// inherited.
pub fn has_property(agent: &mut Agent, o: Object, p: PropertyKey) -> JsResult<bool> {
    // 1. Return ? O.[[HasProperty]](P).
    o.internal_has_property(agent, p)
}

/// ### [7.3.13 HasOwnProperty ( O, P )](https://tc39.es/ecma262/#sec-hasownproperty)
pub fn has_own_property(agent: &mut Agent, o: Object, p: PropertyKey) -> JsResult<bool> {
    // 1. Let desc be ? O.[[GetOwnProperty]](P).
    let desc = o.internal_get_own_property(agent, p)?;
    // 2. If desc is undefined, return false.
    // 3. Return true.
    Ok(desc.is_some())
}

pub fn get_own_property(
    agent: &mut Agent,
    o: Object,
    p: PropertyKey,
) -> JsResult<Option<PropertyDescriptor>> {
    o.internal_get_own_property(agent, p)
}

pub fn get_prototype_of(agent: &mut Agent, o: Object) -> JsResult<Option<Object>> {
    o.internal_get_prototype_of(agent)
}

/// Calls \[\[SetPrototypeOf]], turning a false result into a TypeError when
/// `throw` is set.
pub fn set_prototype_of(
    agent: &mut Agent,
    o: Object,
    prototype: Option<Object>,
    throw: bool,
) -> JsResult<bool> {
    let success = o.internal_set_prototype_of(agent, prototype)?;
    if !success && throw {
        let message = if o.is_proxy(agent) {
            "'setPrototypeOf' on proxy: trap returned falsish"
        } else if o.property_store(agent).extensible {
            // An extensible ordinary object only refuses a cycle.
            "Cyclic __proto__ value"
        } else {
            "Object is not extensible"
        };
        return Err(agent.throw_exception_with_static_message(ExceptionType::TypeError, message));
    }
    Ok(success)
}

/// Calls \[\[PreventExtensions]], turning a false result into a TypeError
/// when `throw` is set.
pub fn prevent_extensions(agent: &mut Agent, o: Object, throw: bool) -> JsResult<bool> {
    let success = o.internal_prevent_extensions(agent)?;
    if !success && throw {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "'preventExtensions' on proxy: trap returned falsish",
        ));
    }
    Ok(success)
}

/// ### [7.3.14 Call ( F, V \[ , argumentsList \] )](https://tc39.es/ecma262/#sec-call)
///
/// The abstract operation Call takes arguments F (an ECMAScript language
/// value) and V (an ECMAScript language value) and optional argument
/// argumentsList (a List of ECMAScript language values) and returns either a
/// normal completion containing an ECMAScript language value or a throw
/// completion. It is used to call the \[\[Call]] internal method of a function
/// object. F is the function object, V is an ECMAScript language value that is
/// the this value of the \[\[Call]], and argumentsList is the value passed to
/// the corresponding argument of the internal method.
pub fn call(agent: &mut Agent, f: Value, v: Value, arguments_list: &[Value]) -> JsResult<Value> {
    // 2. If IsCallable(F) is false, throw a TypeError exception.
    let Some(f) = is_callable(agent, f) else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Not a callable object",
        ));
    };
    // 3. Return ? F.[[Call]](V, argumentsList).
    call_function(agent, f, v, arguments_list)
}

/// Abstract operation Call specialized for an object.
pub fn call_function(
    agent: &mut Agent,
    f: Object,
    v: Value,
    arguments_list: &[Value],
) -> JsResult<Value> {
    match &agent[f].backend {
        Backend::BuiltinFunction(_) => {
            builtin_call_or_construct(agent, f, Some(v), ArgumentsList(arguments_list), None)
        }
        Backend::Proxy(data) if data.is_callable() => proxy_call(agent, Proxy(f), v, arguments_list),
        _ => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Not a callable object",
        )),
    }
}

/// ### [7.3.15 Construct ( F \[ , argumentsList \[ , newTarget \] \] )](https://tc39.es/ecma262/#sec-construct)
pub fn construct(
    agent: &mut Agent,
    f: Object,
    arguments_list: &[Value],
    new_target: Option<Object>,
) -> JsResult<Object> {
    // 1. If newTarget is not present, set newTarget to F.
    let new_target = new_target.unwrap_or(f);
    // 3. Return ? F.[[Construct]](argumentsList, newTarget).
    match &agent[f].backend {
        Backend::BuiltinFunction(data) if data.behaviour.is_constructor() => {
            let result = builtin_call_or_construct(
                agent,
                f,
                None,
                ArgumentsList(arguments_list),
                Some(new_target),
            )?;
            Object::try_from(result).map_err(|_| {
                agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "Constructor returned a non-object",
                )
            })
        }
        Backend::Proxy(data) if data.is_constructor() => {
            proxy_construct(agent, Proxy(f), arguments_list, new_target)
        }
        _ => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Not a constructor",
        )),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityLevel {
    Sealed,
    Frozen,
}

pub trait Level {
    const LEVEL: IntegrityLevel;
}

pub mod integrity {
    use super::{IntegrityLevel, Level};

    pub struct Sealed {}
    pub struct Frozen {}

    impl Level for Sealed {
        const LEVEL: IntegrityLevel = IntegrityLevel::Sealed;
    }

    impl Level for Frozen {
        const LEVEL: IntegrityLevel = IntegrityLevel::Frozen;
    }
}

/// ### [7.3.16 SetIntegrityLevel ( O, level )](https://tc39.es/ecma262/#sec-setintegritylevel)
///
/// The abstract operation SetIntegrityLevel takes arguments O (an Object) and
/// level (SEALED or FROZEN) and returns either a normal completion containing
/// a Boolean or a throw completion. It is used to fix the set of own
/// properties of an object.
pub fn set_integrity_level<T: Level>(agent: &mut Agent, o: Object) -> JsResult<bool> {
    // 1. Let status be ? O.[[PreventExtensions]]().
    let status = o.internal_prevent_extensions(agent)?;
    // 2. If status is false, return false.
    if !status {
        return Ok(false);
    }
    // 3. Let keys be ? O.[[OwnPropertyKeys]]().
    let keys = o.internal_own_property_keys(agent)?;
    // 4. If level is SEALED, then
    if T::LEVEL == IntegrityLevel::Sealed {
        // a. For each element k of keys, do
        for k in keys {
            // i. Perform ? DefinePropertyOrThrow(O, k, PropertyDescriptor { [[Configurable]]: false }).
            define_property_or_throw(
                agent,
                o,
                k,
                PropertyDescriptor {
                    configurable: Some(false),
                    ..Default::default()
                },
            )?;
        }
    } else {
        // 5. Else,
        // a. Assert: level is FROZEN.
        // b. For each element k of keys, do
        for k in keys {
            // i. Let currentDesc be ? O.[[GetOwnProperty]](k).
            // ii. If currentDesc is not undefined, then
            let Some(current_desc) = o.internal_get_own_property(agent, k)? else {
                continue;
            };
            // 1. If IsAccessorDescriptor(currentDesc) is true, then
            let desc = if current_desc.is_accessor_descriptor() {
                // a. Let desc be the PropertyDescriptor { [[Configurable]]: false }.
                PropertyDescriptor {
                    configurable: Some(false),
                    ..Default::default()
                }
            } else {
                // 2. Else,
                // a. Let desc be the PropertyDescriptor { [[Configurable]]: false, [[Writable]]: false }.
                PropertyDescriptor {
                    configurable: Some(false),
                    writable: Some(false),
                    ..Default::default()
                }
            };
            // 3. Perform ? DefinePropertyOrThrow(O, k, desc).
            define_property_or_throw(agent, o, k, desc)?;
        }
    }
    // 6. Return true.
    Ok(true)
}

/// ### [7.3.17 TestIntegrityLevel ( O, level )](https://tc39.es/ecma262/#sec-testintegritylevel)
pub fn test_integrity_level<T: Level>(agent: &mut Agent, o: Object) -> JsResult<bool> {
    // 1. Let extensible be ? IsExtensible(O).
    // 2. If extensible is true, return false.
    // 3. NOTE: If the object is extensible, none of its properties are examined.
    if o.internal_is_extensible(agent)? {
        return Ok(false);
    }
    // 4. Let keys be ? O.[[OwnPropertyKeys]]().
    let keys = o.internal_own_property_keys(agent)?;
    // 5. For each element k of keys, do
    for k in keys {
        // a. Let currentDesc be ? O.[[GetOwnProperty]](k).
        // b. If currentDesc is not undefined, then
        if let Some(current_desc) = o.internal_get_own_property(agent, k)? {
            // i. If currentDesc.[[Configurable]] is true, return false.
            if current_desc.configurable == Some(true) {
                return Ok(false);
            }
            // ii. If level is FROZEN and IsDataDescriptor(currentDesc) is true, then
            // 1. If currentDesc.[[Writable]] is true, return false.
            if T::LEVEL == IntegrityLevel::Frozen
                && current_desc.is_data_descriptor()
                && current_desc.writable == Some(true)
            {
                return Ok(false);
            }
        }
    }
    // 6. Return true.
    Ok(true)
}

/// ### [7.3.19 LengthOfArrayLike ( obj )](https://tc39.es/ecma262/#sec-lengthofarraylike)
///
/// The abstract operation LengthOfArrayLike takes argument obj (an Object) and
/// returns either a normal completion containing a non-negative integer or a
/// throw completion. It returns the value of the "length" property of an
/// array-like object.
pub fn length_of_array_like(agent: &mut Agent, obj: Object) -> JsResult<u64> {
    // NOTE: Fast path for Array objects.
    if let Some(array) = Array::from_object(agent, obj) {
        return Ok(u64::from(array.len(agent)));
    }
    // 1. Return ℝ(? ToLength(? Get(obj, "length"))).
    let property = get(agent, obj, PropertyKey::String(BUILTIN_STRING_MEMORY.length))?;
    to_length(agent, property)
}

/// ### [7.3.20 CreateListFromArrayLike ( obj \[ , validElementTypes \] )](https://tc39.es/ecma262/#sec-createlistfromarraylike)
///
/// The abstract operation CreateListFromArrayLike takes argument obj (an
/// ECMAScript language value) and returns either a normal completion
/// containing a List of ECMAScript language values or a throw completion. It
/// is used to create a List value whose elements are provided by the indexed
/// properties of obj.
pub fn create_list_from_array_like(agent: &mut Agent, obj: Value) -> JsResult<Vec<Value>> {
    // 2. If obj is not an Object, throw a TypeError exception.
    let Value::Object(object) = obj else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "CreateListFromArrayLike called on non-object",
        ));
    };
    // NOTE: Fast path for arrays holding only data elements.
    if let Some(array) = Array::from_object(agent, object)
        && let Some(values) = array.element_values(agent)
    {
        return Ok(values);
    }
    // 3. Let len be ? LengthOfArrayLike(obj).
    let len = length_of_array_like(agent, object)?;
    // 4. Let list be a new empty List.
    let mut list = Vec::new();
    // 5. Let index be 0.
    // 6. Repeat, while index < len,
    for index in 0..len {
        // a. Let indexName be ! ToString(𝔽(index)).
        let index_name = PropertyKey::from_u64(agent, index);
        // b. Let next be ? Get(obj, indexName).
        let next = get(agent, object, index_name)?;
        // d. Append next to list.
        list.push(next);
    }
    // 7. Return list.
    Ok(list)
}

/// CreateListFromArrayLike with validElementTypes PROPERTY-KEY, converting
/// each element into a property key.
pub fn create_property_key_list_from_array_like(
    agent: &mut Agent,
    obj: Value,
) -> JsResult<Vec<PropertyKey>> {
    let elements = create_list_from_array_like(agent, obj)?;
    let mut keys = Vec::with_capacity(elements.len());
    for element in elements {
        // c. If validElementTypes is PROPERTY-KEY and next is not a property
        //    key, throw a TypeError exception.
        let key = match element {
            Value::String(string) => PropertyKey::from_string(agent, string),
            Value::Symbol(symbol) => PropertyKey::Symbol(symbol),
            _ => {
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "Property key list contains a value that is not a String or Symbol",
                ));
            }
        };
        keys.push(key);
    }
    Ok(keys)
}

/// Own string keys of `o` in enumeration order. Non-enumerable properties
/// are only included when `include_non_enumerable` is set.
pub fn enumerate_own_keys(
    agent: &mut Agent,
    o: Object,
    include_non_enumerable: bool,
) -> JsResult<Vec<PropertyKey>> {
    // 1. Let ownKeys be ? O.[[OwnPropertyKeys]]().
    let own_keys = o.internal_own_property_keys(agent)?;
    // 2. Let results be a new empty List.
    let mut results = Vec::with_capacity(own_keys.len());
    // 3. For each element key of ownKeys, do
    for key in own_keys {
        // a. If key is a String, then
        if key.is_symbol() {
            continue;
        }
        if include_non_enumerable {
            results.push(key);
            continue;
        }
        // i. Let desc be ? O.[[GetOwnProperty]](key).
        // ii. If desc is not undefined and desc.[[Enumerable]] is true, then
        if let Some(desc) = o.internal_get_own_property(agent, key)?
            && desc.enumerable == Some(true)
        {
            // 1. Append key to results.
            results.push(key);
        }
    }
    // 4. Return results.
    Ok(results)
}

/// Every own key of `o` in enumeration order, leaving out symbols unless
/// `include_symbols` is set.
pub fn own_keys(agent: &mut Agent, o: Object, include_symbols: bool) -> JsResult<Vec<PropertyKey>> {
    let mut keys = o.internal_own_property_keys(agent)?;
    if !include_symbols {
        keys.retain(|key| !key.is_symbol());
    }
    Ok(keys)
}

/// Error for a failed \[\[Set]]. Proxies are not inspected, to avoid
/// running traps while building a message.
fn assignment_failure(agent: &mut Agent, o: Object, p: PropertyKey) -> JsResult<JsError> {
    let message = if o.is_proxy(agent) {
        format!(
            "'set' on proxy: trap returned falsish for property '{}'",
            p.as_display(agent)
        )
    } else if let Some(message) = fixed_length_failure(agent, o, p) {
        message
    } else if o.internal_get_own_property(agent, p)?.is_none()
        && !o.property_store(agent).extensible
    {
        format!(
            "Cannot add property {}, object is not extensible",
            p.as_display(agent)
        )
    } else {
        format!(
            "Cannot assign to read only property: {}",
            p.as_display(agent)
        )
    };
    Ok(agent.throw_exception(ExceptionType::TypeError, &message))
}

/// Error for a failed \[\[DefineOwnProperty]].
fn definition_failure(agent: &mut Agent, o: Object, p: PropertyKey) -> JsResult<JsError> {
    let message = if o.is_proxy(agent) {
        format!(
            "'defineProperty' on proxy: trap returned falsish for property '{}'",
            p.as_display(agent)
        )
    } else if let Some(message) = fixed_length_failure(agent, o, p) {
        message
    } else if o.internal_get_own_property(agent, p)?.is_none() {
        format!(
            "Cannot add property {}, object is not extensible",
            p.as_display(agent)
        )
    } else {
        format!("Cannot redefine property: {}", p.as_display(agent))
    };
    Ok(agent.throw_exception(ExceptionType::TypeError, &message))
}

/// An array refuses new elements at or past a non-writable length.
fn fixed_length_failure(agent: &Agent, o: Object, p: PropertyKey) -> Option<String> {
    let array = Array::from_object(agent, o)?;
    let index = p.as_array_index()?;
    let length = array.len(agent);
    (index >= length && !array.is_length_writable(agent)).then(|| {
        format!("Cannot add property {index}, array length {length} is not writable")
    })
}
