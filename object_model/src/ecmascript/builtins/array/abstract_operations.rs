// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{Array, dense::DenseArrayHeapData};
use crate::{
    ecmascript::{
        abstract_operations::type_conversion::{to_number, to_uint32},
        execution::{Agent, ExceptionType, JsResult},
        types::{Backend, Object, PropertyDescriptor, Value},
    },
    heap::CreateHeapData,
};

/// ### [10.4.2.2 ArrayCreate ( length \[ , proto \] )](https://tc39.es/ecma262/#sec-arraycreate)
///
/// The abstract operation ArrayCreate takes argument length (a
/// non-negative integer) and optional argument proto (an Object) and
/// returns either a normal completion containing an Array exotic object or
/// a throw completion. It is used to specify the creation of new Arrays.
pub fn array_create(
    agent: &mut Agent,
    length: u64,
    proto: Option<Object>,
) -> JsResult<Array> {
    // 1. If length > 2**32 - 1, throw a RangeError exception.
    let Ok(length) = u32::try_from(length) else {
        return Err(agent.throw_exception(ExceptionType::RangeError, "Invalid array length"));
    };

    // 2. If proto is not present, set proto to %Array.prototype%.
    let proto = proto.unwrap_or_else(|| agent.intrinsics().array_prototype());

    // 3. Let A be MakeBasicObject(« [[Prototype]], [[Extensible]] »).
    // 4. Set A.[[Prototype]] to proto.
    // 5. Set A.[[DefineOwnProperty]] as specified in 10.4.2.1.
    // 6. Perform ! OrdinaryDefineOwnProperty(A, "length", PropertyDescriptor {
    //      [[Value]]: 𝔽(length), [[Writable]]: true, [[Enumerable]]: false, [[Configurable]]: false
    //    }).
    let object = agent
        .heap
        .create(Backend::DenseArray(DenseArrayHeapData::new(Some(proto), length)));

    // 7. Return A.
    Ok(Array(object))
}

/// ### [10.4.2.4 ArraySetLength ( A, Desc )](https://tc39.es/ecma262/#sec-arraysetlength)
///
/// The abstract operation ArraySetLength takes arguments A (an Array) and
/// Desc (a Property Descriptor) and returns either a normal completion
/// containing a Boolean or a throw completion.
pub fn array_set_length(agent: &mut Agent, a: Array, desc: PropertyDescriptor) -> JsResult<bool> {
    // 1. If Desc does not have a [[Value]] field, then
    let Some(desc_value) = desc.value else {
        // a. Return ! OrdinaryDefineOwnProperty(A, "length", Desc).
        return Ok(a.define_length(agent, desc));
    };

    // 2. Let newLenDesc be a copy of Desc.
    let mut new_len_desc = desc;

    // 3. Let newLen be ? ToUint32(Desc.[[Value]]).
    let new_len = to_uint32(agent, desc_value)?;

    // 4. Let numberLen be ? ToNumber(Desc.[[Value]]).
    let number_len = to_number(agent, desc_value)?;

    // 5. If SameValueZero(newLen, numberLen) is false, throw a RangeError exception.
    if f64::from(new_len) != number_len {
        return Err(agent.throw_exception(ExceptionType::RangeError, "Invalid array length"));
    }

    // 6. Set newLenDesc.[[Value]] to newLen.
    new_len_desc.value = Some(new_len.into());

    // 7. Let oldLenDesc be OrdinaryGetOwnProperty(A, "length").
    // 8. Assert: IsDataDescriptor(oldLenDesc) is true.
    // 9. Assert: oldLenDesc.[[Configurable]] is false.
    // 10. Let oldLen be oldLenDesc.[[Value]].
    let old_len = a.len(agent);
    let old_len_writable = a.properties(agent).length_writable;

    // 11. If newLen ≥ oldLen, then
    if new_len >= old_len {
        // a. Return ! OrdinaryDefineOwnProperty(A, "length", newLenDesc).
        return Ok(a.define_length(agent, new_len_desc));
    }

    // 12. If oldLenDesc.[[Writable]] is false, return false.
    if !old_len_writable {
        return Ok(false);
    }

    // 13. If newLenDesc does not have a [[Writable]] field or newLenDesc.[[Writable]] is true, then
    //     a. Let newWritable be true.
    // 14. Else,
    //     a. NOTE: Setting the [[Writable]] attribute to false is deferred in case any elements cannot be deleted.
    //     b. Let newWritable be false.
    //     c. Set newLenDesc.[[Writable]] to true.
    let new_writable = new_len_desc.writable != Some(false);
    if !new_writable {
        new_len_desc.writable = Some(true);
    }

    // 15. Let succeeded be ! OrdinaryDefineOwnProperty(A, "length", newLenDesc).
    // 16. If succeeded is false, return false.
    if !a.define_length(agent, new_len_desc) {
        return Ok(false);
    }

    // 17. For each own property key P of A such that P is an array index and
    //     ! ToUint32(P) ≥ newLen, in descending numeric index order, do
    //     a. Let deleteSucceeded be ! A.[[Delete]](P).
    //     b. If deleteSucceeded is false, then
    if let Err(index) = a.truncate_elements(agent, new_len) {
        // i. Set newLenDesc.[[Value]] to ! ToUint32(P) + 1𝔽.
        // ii. If newWritable is false, set newLenDesc.[[Writable]] to false.
        // iii. Perform ! OrdinaryDefineOwnProperty(A, "length", newLenDesc).
        let properties = a.properties_mut(agent);
        properties.length = index + 1;
        properties.length_writable = new_writable;
        // iv. Return false.
        return Ok(false);
    }

    // 18. If newWritable is false, then
    if !new_writable {
        // a. Set succeeded to ! OrdinaryDefineOwnProperty(A, "length",
        //    PropertyDescriptor { [[Writable]]: false }).
        // b. Assert: succeeded is true.
        a.properties_mut(agent).length_writable = false;
    }

    // 19. Return true.
    Ok(true)
}

/// ### [7.3.18 CreateArrayFromList ( elements )](https://tc39.es/ecma262/#sec-createarrayfromlist)
///
/// The abstract operation CreateArrayFromList takes argument elements (a
/// List of ECMAScript language values) and returns an Array. It is used to
/// create an Array whose elements are provided by elements.
pub fn create_array_from_list(agent: &mut Agent, elements: &[Value]) -> Array {
    // 1. Let array be ! ArrayCreate(0).
    // 2. Let n be 0.
    // 3. For each element e of elements, do
    //     a. Perform ! CreateDataPropertyOrThrow(array, ! ToString(𝔽(n)), e).
    //     b. Set n to n + 1.
    // 4. Return array.
    let prototype = agent.intrinsics().array_prototype();
    let object = agent
        .heap
        .create(Backend::DenseArray(DenseArrayHeapData::from_values(
            Some(prototype),
            elements,
        )));
    Array(object)
}
