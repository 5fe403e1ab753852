// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod property_storage;

pub(crate) use property_storage::PropertyRecord;
pub use property_storage::PropertyStore;

use crate::{
    ecmascript::{
        abstract_operations::{
            operations_on_objects::{call_function, create_data_property},
            testing_and_comparison::same_value,
        },
        execution::{Agent, JsResult},
        types::{Backend, InternalMethods, Object, PropertyDescriptor, PropertyKey, Value},
    },
    heap::CreateHeapData,
};

/// An object using the ordinary internal methods: plain objects, builtin
/// functions and error objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrdinaryObject(pub(crate) Object);

impl From<OrdinaryObject> for Object {
    fn from(value: OrdinaryObject) -> Self {
        value.0
    }
}

impl InternalMethods for OrdinaryObject {}

/// ### [10.1.1.1 OrdinaryGetPrototypeOf ( O )](https://tc39.es/ecma262/#sec-ordinarygetprototypeof)
pub(crate) fn ordinary_get_prototype_of(agent: &Agent, object: Object) -> Option<Object> {
    // 1. Return O.[[Prototype]].
    object.property_store(agent).prototype
}

/// The \[\[Prototype]] slot of an object whose \[\[GetPrototypeOf]] is
/// ordinary, or None for proxies.
fn ordinary_prototype_slot(agent: &Agent, object: Object) -> Option<Option<Object>> {
    match &agent[object].backend {
        Backend::Proxy(_) => None,
        Backend::Lazy(data) => Some(data.prototype),
        backend => backend.property_store().map(|store| store.prototype),
    }
}

/// ### [10.1.2.1 OrdinarySetPrototypeOf ( O, V )](https://tc39.es/ecma262/#sec-ordinarysetprototypeof)
pub(crate) fn ordinary_set_prototype_of(
    agent: &mut Agent,
    object: Object,
    prototype: Option<Object>,
) -> JsResult<bool> {
    // 1. Let current be O.[[Prototype]].
    let current = object.property_store(agent).prototype;

    // 2. If SameValue(V, current) is true, return true.
    if prototype == current {
        return Ok(true);
    }

    // 3. Let extensible be O.[[Extensible]].
    // 4. If extensible is false, return false.
    if !object.property_store(agent).extensible {
        return Ok(false);
    }

    // 5. Let p be V.
    let mut parent_prototype_outer = prototype;

    // 6. Let done be false.
    // 7. Repeat, while done is false,
    while let Some(parent_prototype) = parent_prototype_outer {
        // a. If p is null, then
        //     i. Set done to true.

        // b. Else if SameValue(p, O) is true, then
        if parent_prototype == object {
            // i. Return false.
            return Ok(false);
        }

        // c. Else,
        // i. If p.[[GetPrototypeOf]] is not the ordinary object internal
        //    method defined in 10.1.1, set done to true.
        // ii. Else, set p to p.[[Prototype]].
        match ordinary_prototype_slot(agent, parent_prototype) {
            Some(next) => parent_prototype_outer = next,
            None => break,
        }
    }

    // 8. Set O.[[Prototype]] to V.
    object.property_store_mut(agent).prototype = prototype;

    // 9. Return true.
    Ok(true)
}

/// ### [10.1.3.1 OrdinaryIsExtensible ( O )](https://tc39.es/ecma262/#sec-ordinaryisextensible)
pub(crate) fn ordinary_is_extensible(agent: &Agent, object: Object) -> bool {
    // 1. Return O.[[Extensible]].
    object.property_store(agent).extensible
}

/// ### [10.1.4.1 OrdinaryPreventExtensions ( O )](https://tc39.es/ecma262/#sec-ordinarypreventextensions)
pub(crate) fn ordinary_prevent_extensions(agent: &mut Agent, object: Object) -> bool {
    // 1. Set O.[[Extensible]] to false.
    object.property_store_mut(agent).extensible = false;

    // 2. Return true.
    true
}

/// ### [10.1.5.1 OrdinaryGetOwnProperty ( O, P )](https://tc39.es/ecma262/#sec-ordinarygetownproperty)
pub(crate) fn ordinary_get_own_property(
    agent: &Agent,
    object: Object,
    property_key: PropertyKey,
) -> Option<PropertyDescriptor> {
    // 1. If O does not have an own property with key P, return undefined.
    // 2. Let D be a newly created Property Descriptor with no fields.
    // 3. Let X be O's own property whose key is P.
    // 4-8. Copy the attributes of X into D.
    // 9. Return D.
    object
        .property_store(agent)
        .get(property_key)
        .map(|record| record.to_descriptor())
}

/// ### [10.1.6.1 OrdinaryDefineOwnProperty ( O, P, Desc )](https://tc39.es/ecma262/#sec-ordinarydefineownproperty)
pub(crate) fn ordinary_define_own_property(
    agent: &mut Agent,
    object: Object,
    property_key: PropertyKey,
    descriptor: PropertyDescriptor,
) -> bool {
    // 1. Let current be ? O.[[GetOwnProperty]](P).
    let current = ordinary_get_own_property(agent, object, property_key);

    // 2. Let extensible be ? IsExtensible(O).
    let extensible = object.property_store(agent).extensible;

    // 3. Return ValidateAndApplyPropertyDescriptor(O, P, extensible, Desc, current).
    match validate_and_apply_property_descriptor(extensible, descriptor, current) {
        Some(record) => {
            object.property_store_mut(agent).set(property_key, record);
            true
        }
        None => false,
    }
}

/// ### [10.1.6.2 IsCompatiblePropertyDescriptor ( Extensible, Desc, Current )](https://tc39.es/ecma262/#sec-iscompatiblepropertydescriptor)
pub(crate) fn is_compatible_property_descriptor(
    extensible: bool,
    descriptor: PropertyDescriptor,
    current: Option<PropertyDescriptor>,
) -> bool {
    // 1. Return ValidateAndApplyPropertyDescriptor(undefined, "", Extensible, Desc, Current).
    validate_and_apply_property_descriptor(extensible, descriptor, current).is_some()
}

/// ### [10.1.6.3 ValidateAndApplyPropertyDescriptor ( O, P, extensible, Desc, current )](https://tc39.es/ecma262/#sec-validateandapplypropertydescriptor)
///
/// Returns the record that property P must hold afterwards, or None if the
/// descriptor cannot be applied. The caller owns the storage and writes the
/// record back; when O is undefined the caller simply discards it.
pub(crate) fn validate_and_apply_property_descriptor(
    extensible: bool,
    descriptor: PropertyDescriptor,
    current: Option<PropertyDescriptor>,
) -> Option<PropertyRecord> {
    // 1. Assert: IsPropertyKey(P) is true.

    // 2. If current is undefined, then
    let Some(current) = current else {
        // a. If extensible is false, return false.
        if !extensible {
            return None;
        }

        // b. If O is undefined, return true.
        // c. If IsAccessorDescriptor(Desc) is true, then
        let record = if descriptor.is_accessor_descriptor() {
            // i. Create an own accessor property named P of object O whose [[Get]], [[Set]],
            //    [[Enumerable]], and [[Configurable]] attributes are set to the value of the
            //    corresponding field in Desc if Desc has that field, or to the attribute's default
            //    value otherwise.
            PropertyRecord::Accessor {
                get: descriptor.get.flatten(),
                set: descriptor.set.flatten(),
                enumerable: descriptor.enumerable.unwrap_or(false),
                configurable: descriptor.configurable.unwrap_or(false),
            }
        }
        // d. Else,
        else {
            // i. Create an own data property named P of object O whose [[Value]], [[Writable]],
            //    [[Enumerable]], and [[Configurable]] attributes are set to the value of the
            //    corresponding field in Desc if Desc has that field, or to the attribute's default
            //    value otherwise.
            PropertyRecord::from_descriptor(&PropertyDescriptor {
                value: Some(descriptor.value.unwrap_or(Value::Undefined)),
                writable: Some(descriptor.writable.unwrap_or(false)),
                enumerable: Some(descriptor.enumerable.unwrap_or(false)),
                configurable: Some(descriptor.configurable.unwrap_or(false)),
                ..Default::default()
            })
        };

        // e. Return true.
        return Some(record);
    };

    // 3. Assert: current is a fully populated Property Descriptor.
    debug_assert!(current.is_fully_populated());
    let current_configurable = current.configurable.unwrap_or(false);
    let current_enumerable = current.enumerable.unwrap_or(false);

    // 4. If Desc does not have any fields, return true.
    if !descriptor.has_fields() {
        return Some(PropertyRecord::from_descriptor(&current));
    }

    // 5. If current.[[Configurable]] is false, then
    if !current_configurable {
        // a. If Desc has a [[Configurable]] field and Desc.[[Configurable]] is true, return false.
        if descriptor.configurable == Some(true) {
            return None;
        }

        // b. If Desc has an [[Enumerable]] field and SameValue(Desc.[[Enumerable]], current.[[Enumerable]])
        //    is false, return false.
        if descriptor.enumerable.is_some() && descriptor.enumerable != current.enumerable {
            return None;
        }

        // c. If IsGenericDescriptor(Desc) is false and SameValue(IsAccessorDescriptor(Desc), IsAccessorDescriptor(current))
        //    is false, return false.
        if !descriptor.is_generic_descriptor()
            && descriptor.is_accessor_descriptor() != current.is_accessor_descriptor()
        {
            return None;
        }

        // d. If IsAccessorDescriptor(current) is true, then
        if current.is_accessor_descriptor() {
            // i. If Desc has a [[Get]] field and SameValue(Desc.[[Get]], current.[[Get]]) is false,
            //    return false.
            if descriptor.get.is_some() && descriptor.get != current.get {
                return None;
            }

            // ii. If Desc has a [[Set]] field and SameValue(Desc.[[Set]], current.[[Set]]) is
            //     false, return false.
            if descriptor.set.is_some() && descriptor.set != current.set {
                return None;
            }
        }
        // e. Else if current.[[Writable]] is false, then
        else if current.writable == Some(false) {
            // i. If Desc has a [[Writable]] field and Desc.[[Writable]] is true, return false.
            if descriptor.writable == Some(true) {
                return None;
            }

            // ii. If Desc has a [[Value]] field and SameValue(Desc.[[Value]], current.[[Value]])
            //     is false, return false.
            if let Some(desc_value) = descriptor.value {
                if !same_value(desc_value, current.value.unwrap_or_default()) {
                    return None;
                }
            }
        }
    }

    // 6. If O is not undefined, then
    // a. If IsDataDescriptor(current) is true and IsAccessorDescriptor(Desc) is true, then
    let record = if current.is_data_descriptor() && descriptor.is_accessor_descriptor() {
        // i. If Desc has a [[Configurable]] field, let configurable be Desc.[[Configurable]];
        //    else let configurable be current.[[Configurable]].
        // ii. If Desc has a [[Enumerable]] field, let enumerable be Desc.[[Enumerable]]; else
        //     let enumerable be current.[[Enumerable]].
        // iii. Replace the property named P of object O with an accessor property whose
        //      [[Configurable]] and [[Enumerable]] attributes are set to configurable and
        //      enumerable, respectively, and whose [[Get]] and [[Set]] attributes are set to
        //      the value of the corresponding field in Desc if Desc has that field, or to the
        //      attribute's default value otherwise.
        PropertyRecord::Accessor {
            get: descriptor.get.flatten(),
            set: descriptor.set.flatten(),
            enumerable: descriptor.enumerable.unwrap_or(current_enumerable),
            configurable: descriptor.configurable.unwrap_or(current_configurable),
        }
    }
    // b. Else if IsAccessorDescriptor(current) is true and IsDataDescriptor(Desc) is true, then
    else if current.is_accessor_descriptor() && descriptor.is_data_descriptor() {
        // i. If Desc has a [[Configurable]] field, let configurable be Desc.[[Configurable]];
        //    else let configurable be current.[[Configurable]].
        // ii. If Desc has a [[Enumerable]] field, let enumerable be Desc.[[Enumerable]]; else
        //     let enumerable be current.[[Enumerable]].
        // iii. Replace the property named P of object O with a data property whose
        //      [[Configurable]] and [[Enumerable]] attributes are set to configurable and
        //      enumerable, respectively, and whose [[Value]] and [[Writable]] attributes are
        //      set to the value of the corresponding field in Desc if Desc has that field, or
        //      to the attribute's default value otherwise.
        PropertyRecord::from_descriptor(&PropertyDescriptor {
            value: Some(descriptor.value.unwrap_or(Value::Undefined)),
            writable: Some(descriptor.writable.unwrap_or(false)),
            enumerable: Some(descriptor.enumerable.unwrap_or(current_enumerable)),
            configurable: Some(descriptor.configurable.unwrap_or(current_configurable)),
            ..Default::default()
        })
    }
    // c. Else,
    else {
        // i. For each field of Desc, set the corresponding attribute of the property named P
        //    of object O to the value of the field.
        PropertyRecord::from_descriptor(&PropertyDescriptor {
            value: descriptor.value.or(current.value),
            writable: descriptor.writable.or(current.writable),
            get: descriptor.get.or(current.get),
            set: descriptor.set.or(current.set),
            enumerable: descriptor.enumerable.or(current.enumerable),
            configurable: descriptor.configurable.or(current.configurable),
        })
    };

    // 7. Return true.
    Some(record)
}

/// ### [10.1.7.1 OrdinaryHasProperty ( O, P )](https://tc39.es/ecma262/#sec-ordinaryhasproperty)
pub(crate) fn ordinary_has_property(
    agent: &mut Agent,
    object: Object,
    property_key: PropertyKey,
) -> JsResult<bool> {
    // 1. Let hasOwn be ? O.[[GetOwnProperty]](P).
    let has_own = object.internal_get_own_property(agent, property_key)?;

    // 2. If hasOwn is not undefined, return true.
    if has_own.is_some() {
        return Ok(true);
    }

    // 3. Let parent be ? O.[[GetPrototypeOf]]().
    let parent = object.internal_get_prototype_of(agent)?;

    // 4. If parent is not null, then
    if let Some(parent) = parent {
        // a. Return ? parent.[[HasProperty]](P).
        return parent.internal_has_property(agent, property_key);
    }

    // 5. Return false.
    Ok(false)
}

/// ### [10.1.8.1 OrdinaryGet ( O, P, Receiver )](https://tc39.es/ecma262/#sec-ordinaryget)
pub(crate) fn ordinary_get(
    agent: &mut Agent,
    object: Object,
    property_key: PropertyKey,
    receiver: Value,
) -> JsResult<Value> {
    // 1. Let desc be ? O.[[GetOwnProperty]](P).
    let Some(descriptor) = object.internal_get_own_property(agent, property_key)? else {
        // 2. If desc is undefined, then

        // a. Let parent be ? O.[[GetPrototypeOf]]().
        let Some(parent) = object.internal_get_prototype_of(agent)? else {
            // b. If parent is null, return undefined.
            return Ok(Value::Undefined);
        };

        // c. Return ? parent.[[Get]](P, Receiver).
        return parent.internal_get(agent, property_key, receiver);
    };

    // 3. If IsDataDescriptor(desc) is true, return desc.[[Value]].
    if let Some(value) = descriptor.value {
        debug_assert!(descriptor.is_data_descriptor());
        return Ok(value);
    }

    // 4. Assert: IsAccessorDescriptor(desc) is true.
    debug_assert!(descriptor.is_accessor_descriptor());

    // 5. Let getter be desc.[[Get]].
    // 6. If getter is undefined, return undefined.
    let Some(Some(getter)) = descriptor.get else {
        return Ok(Value::Undefined);
    };

    // 7. Return ? Call(getter, Receiver).
    call_function(agent, getter, receiver, &[])
}

/// ### [10.1.9.1 OrdinarySet ( O, P, V, Receiver )](https://tc39.es/ecma262/#sec-ordinaryset)
pub(crate) fn ordinary_set(
    agent: &mut Agent,
    object: Object,
    property_key: PropertyKey,
    value: Value,
    receiver: Value,
) -> JsResult<bool> {
    // 1. Let ownDesc be ? O.[[GetOwnProperty]](P).
    let own_descriptor = object.internal_get_own_property(agent, property_key)?;

    // 2. Return ? OrdinarySetWithOwnDescriptor(O, P, V, Receiver, ownDesc).
    ordinary_set_with_own_descriptor(agent, object, property_key, value, receiver, own_descriptor)
}

/// ### [10.1.9.2 OrdinarySetWithOwnDescriptor ( O, P, V, Receiver, ownDesc )](https://tc39.es/ecma262/#sec-ordinarysetwithowndescriptor)
pub(crate) fn ordinary_set_with_own_descriptor(
    agent: &mut Agent,
    object: Object,
    property_key: PropertyKey,
    value: Value,
    receiver: Value,
    own_descriptor: Option<PropertyDescriptor>,
) -> JsResult<bool> {
    let own_descriptor = if let Some(own_descriptor) = own_descriptor {
        own_descriptor
    } else {
        // 1. If ownDesc is undefined, then
        // a. Let parent be ? O.[[GetPrototypeOf]]().
        let parent = object.internal_get_prototype_of(agent)?;

        // b. If parent is not null, then
        if let Some(parent) = parent {
            // i. Return ? parent.[[Set]](P, V, Receiver).
            return parent.internal_set(agent, property_key, value, receiver);
        }
        // c. Else,
        else {
            // i. Set ownDesc to the PropertyDescriptor {
            //      [[Value]]: undefined, [[Writable]]: true, [[Enumerable]]: true, [[Configurable]]: true
            //    }.
            PropertyDescriptor::new_data_descriptor(Value::Undefined)
        }
    };

    // 2. If IsDataDescriptor(ownDesc) is true, then
    if own_descriptor.is_data_descriptor() {
        // a. If ownDesc.[[Writable]] is false, return false.
        if own_descriptor.writable == Some(false) {
            return Ok(false);
        }

        // b. If Receiver is not an Object, return false.
        let Value::Object(receiver) = receiver else {
            return Ok(false);
        };

        // c. Let existingDescriptor be ? Receiver.[[GetOwnProperty]](P).
        let existing_descriptor = receiver.internal_get_own_property(agent, property_key)?;

        // d. If existingDescriptor is not undefined, then
        if let Some(existing_descriptor) = existing_descriptor {
            // i. If IsAccessorDescriptor(existingDescriptor) is true, return false.
            if existing_descriptor.is_accessor_descriptor() {
                return Ok(false);
            }

            // ii. If existingDescriptor.[[Writable]] is false, return false.
            if existing_descriptor.writable == Some(false) {
                return Ok(false);
            }

            // iii. Let valueDesc be the PropertyDescriptor { [[Value]]: V }.
            let value_descriptor = PropertyDescriptor {
                value: Some(value),
                ..Default::default()
            };

            // iv. Return ? Receiver.[[DefineOwnProperty]](P, valueDesc).
            return receiver.internal_define_own_property(agent, property_key, value_descriptor);
        }
        // e. Else,
        else {
            // i. Assert: Receiver does not currently have a property P.
            // ii. Return ? CreateDataProperty(Receiver, P, V).
            return create_data_property(agent, receiver, property_key, value);
        }
    }

    // 3. Assert: IsAccessorDescriptor(ownDesc) is true.
    debug_assert!(own_descriptor.is_accessor_descriptor());

    // 4. Let setter be ownDesc.[[Set]].
    // 5. If setter is undefined, return false.
    let Some(Some(setter)) = own_descriptor.set else {
        return Ok(false);
    };

    // 6. Perform ? Call(setter, Receiver, « V »).
    call_function(agent, setter, receiver, &[value])?;

    // 7. Return true.
    Ok(true)
}

/// ### [10.1.10.1 OrdinaryDelete ( O, P )](https://tc39.es/ecma262/#sec-ordinarydelete)
pub(crate) fn ordinary_delete(agent: &mut Agent, object: Object, property_key: PropertyKey) -> bool {
    let store = object.property_store_mut(agent);
    // 1. Let desc be ? O.[[GetOwnProperty]](P).
    // 2. If desc is undefined, return true.
    let Some(record) = store.get(property_key) else {
        return true;
    };

    // 3. If desc.[[Configurable]] is true, then
    if record.is_configurable() {
        // a. Remove the own property with name P from O.
        store.remove(property_key);

        // b. Return true.
        return true;
    }

    // 4. Return false.
    false
}

/// ### [10.1.11.1 OrdinaryOwnPropertyKeys ( O )](https://tc39.es/ecma262/#sec-ordinaryownpropertykeys)
pub(crate) fn ordinary_own_property_keys(agent: &Agent, object: Object) -> Vec<PropertyKey> {
    object.property_store(agent).own_keys()
}

/// ### [10.1.12 OrdinaryObjectCreate ( proto \[ , additionalInternalSlotsList \] )](https://tc39.es/ecma262/#sec-ordinaryobjectcreate)
pub fn ordinary_object_create_with_prototype(
    agent: &mut Agent,
    prototype: Option<Object>,
) -> Object {
    agent
        .heap
        .create(Backend::Ordinary(PropertyStore::new(prototype)))
}

/// OrdinaryObjectCreate(%Object.prototype%).
pub fn ordinary_object_create_with_intrinsics(agent: &mut Agent) -> Object {
    let prototype = agent.intrinsics().object_prototype();
    ordinary_object_create_with_prototype(agent, Some(prototype))
}
