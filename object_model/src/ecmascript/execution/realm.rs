// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::Agent;
use crate::{
    ecmascript::{
        builtins::{
            ArgumentsList, Behaviour,
            array::DenseArrayHeapData,
            builtin_function::BuiltinFunctionHeapData,
            ordinary::{PropertyRecord, PropertyStore},
        },
        execution::JsResult,
        types::{BUILTIN_STRING_MEMORY, Backend, Object, PropertyKey, Value},
    },
    heap::{CreateHeapData, Heap},
};

/// ### [9.3 Realms](https://tc39.es/ecma262/#sec-code-realms)
///
/// The well-known intrinsic objects the object model itself refers to.
#[derive(Debug, Clone, Copy)]
pub struct Intrinsics {
    object_prototype: Object,
    function_prototype: Object,
    array_prototype: Object,
    error_prototype: Object,
}

/// ### [20.2.3 Properties of the Function Prototype Object](https://tc39.es/ecma262/#sec-properties-of-the-function-prototype-object)
///
/// The function prototype accepts any arguments and returns undefined.
fn function_prototype_behaviour(_: &mut Agent, _: Value, _: ArgumentsList) -> JsResult<Value> {
    Ok(Value::Undefined)
}

impl Intrinsics {
    pub(crate) fn create(heap: &mut Heap) -> Self {
        let object_prototype = heap.create(Backend::Ordinary(PropertyStore::new(None)));
        let function_prototype = heap.create(Backend::BuiltinFunction(
            BuiltinFunctionHeapData::new(
                Some(object_prototype),
                Behaviour::Regular(function_prototype_behaviour),
            ),
        ));
        let array_prototype = heap.create(Backend::DenseArray(DenseArrayHeapData::new(
            Some(object_prototype),
            0,
        )));
        let error_prototype =
            heap.create(Backend::Ordinary(PropertyStore::new(Some(object_prototype))));
        Self {
            object_prototype,
            function_prototype,
            array_prototype,
            error_prototype,
        }
    }

    /// Populates the intrinsic objects' own properties.
    pub(crate) fn initialize(agent: &mut Agent) {
        let intrinsics = *agent.intrinsics();
        let name = PropertyKey::String(BUILTIN_STRING_MEMORY.name);
        let message = PropertyKey::String(BUILTIN_STRING_MEMORY.message);
        let length = PropertyKey::String(BUILTIN_STRING_MEMORY.length);

        let function_prototype = intrinsics.function_prototype.property_store_mut(agent);
        function_prototype.set(length, hidden_readonly(0.into()));
        function_prototype.set(name, hidden_readonly(BUILTIN_STRING_MEMORY._empty.into()));

        let error_prototype = intrinsics.error_prototype.property_store_mut(agent);
        error_prototype.set(name, hidden(BUILTIN_STRING_MEMORY.Error.into()));
        error_prototype.set(message, hidden(BUILTIN_STRING_MEMORY._empty.into()));
    }

    /// %Object.prototype%
    pub fn object_prototype(&self) -> Object {
        self.object_prototype
    }

    /// %Function.prototype%
    pub fn function_prototype(&self) -> Object {
        self.function_prototype
    }

    /// %Array.prototype%
    pub fn array_prototype(&self) -> Object {
        self.array_prototype
    }

    /// %Error.prototype%
    pub fn error_prototype(&self) -> Object {
        self.error_prototype
    }
}

/// Writable, configurable, non-enumerable data property.
pub(crate) fn hidden(value: Value) -> PropertyRecord {
    PropertyRecord::Data {
        value,
        writable: true,
        enumerable: false,
        configurable: true,
    }
}

/// Configurable, non-writable, non-enumerable data property.
pub(crate) fn hidden_readonly(value: Value) -> PropertyRecord {
    PropertyRecord::Data {
        value,
        writable: false,
        enumerable: false,
        configurable: true,
    }
}
