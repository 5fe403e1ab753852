// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::{fmt::Debug, ops::Deref, rc::Rc};

use super::ordinary::PropertyStore;
use crate::{
    ecmascript::{
        execution::{Agent, ExceptionType, JsResult, hidden_readonly},
        types::{BUILTIN_STRING_MEMORY, Backend, Object, PropertyKey, String, Value},
    },
    heap::CreateHeapData,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct ArgumentsList<'a>(pub &'a [Value]);

impl<'a> Deref for ArgumentsList<'a> {
    type Target = &'a [Value];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ArgumentsList<'_> {
    #[inline]
    pub fn get(&self, index: usize) -> Value {
        *self.0.get(index).unwrap_or(&Value::Undefined)
    }
}

pub type RegularFn = fn(&mut Agent, Value, ArgumentsList<'_>) -> JsResult<Value>;
pub type ConstructorFn =
    fn(&mut Agent, Value, ArgumentsList<'_>, Option<Object>) -> JsResult<Value>;
/// A native function capturing embedder state.
pub type NativeClosure = dyn Fn(&mut Agent, Value, ArgumentsList<'_>) -> JsResult<Value>;

#[derive(Clone)]
pub enum Behaviour {
    Regular(RegularFn),
    Constructor(ConstructorFn),
    Closure(Rc<NativeClosure>),
}

impl Debug for Behaviour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Behaviour::Regular(_) => f.write_str("Behaviour::Regular"),
            Behaviour::Constructor(_) => f.write_str("Behaviour::Constructor"),
            Behaviour::Closure(_) => f.write_str("Behaviour::Closure"),
        }
    }
}

impl Behaviour {
    pub(crate) fn is_constructor(&self) -> bool {
        matches!(self, Behaviour::Constructor(_))
    }
}

#[derive(Debug, Default)]
pub struct BuiltinFunctionArgs {
    pub length: u32,
    pub name: &'static str,
    /// Defaults to %Function.prototype%.
    pub prototype: Option<Object>,
}

impl BuiltinFunctionArgs {
    pub fn new(length: u32, name: &'static str) -> Self {
        Self {
            length,
            name,
            ..Default::default()
        }
    }
}

#[derive(Debug)]
pub struct BuiltinFunctionHeapData {
    pub(crate) store: PropertyStore,
    pub(crate) behaviour: Behaviour,
}

impl BuiltinFunctionHeapData {
    pub(crate) fn new(prototype: Option<Object>, behaviour: Behaviour) -> Self {
        Self {
            store: PropertyStore::new(prototype),
            behaviour,
        }
    }
}

/// ### [10.3.4 CreateBuiltinFunction ( behaviour, length, name, additionalInternalSlotsList \[ , realm \[ , prototype \[ , prefix \] \] \] )](https://tc39.es/ecma262/#sec-createbuiltinfunction)
pub fn create_builtin_function(
    agent: &mut Agent,
    behaviour: Behaviour,
    args: BuiltinFunctionArgs,
) -> Object {
    // 2. If prototype is not present, set prototype to realm.[[Intrinsics]].[[%Function.prototype%]].
    let prototype = args
        .prototype
        .unwrap_or_else(|| agent.intrinsics().function_prototype());
    // 11. If prefix is not present, then
    // a. Perform SetFunctionName(func, name).
    let initial_name = String::from_str(agent, args.name);

    // 5. Let func be a new built-in function object that, when called, performs the action
    //    described by behaviour using the provided arguments as the values of the corresponding
    //    parameters specified by behaviour.
    // 6. Set func.[[Prototype]] to prototype.
    // 7. Set func.[[Extensible]] to true.
    let mut data = BuiltinFunctionHeapData::new(Some(prototype), behaviour);
    // 10. Perform SetFunctionLength(func, length).
    data.store.set(
        PropertyKey::String(BUILTIN_STRING_MEMORY.length),
        hidden_readonly(args.length.into()),
    );
    data.store.set(
        PropertyKey::String(BUILTIN_STRING_MEMORY.name),
        hidden_readonly(initial_name.into()),
    );

    // 13. Return func.
    agent.heap.create(Backend::BuiltinFunction(data))
}

/// ### [10.3.3 BuiltinCallOrConstruct ( F, thisArgument, argumentsList, newTarget )](https://tc39.es/ecma262/#sec-builtincallorconstruct)
pub(crate) fn builtin_call_or_construct(
    agent: &mut Agent,
    f: Object,
    this_argument: Option<Value>,
    arguments_list: ArgumentsList,
    new_target: Option<Object>,
) -> JsResult<Value> {
    let Backend::BuiltinFunction(data) = &agent[f].backend else {
        unreachable!("builtin_call_or_construct on a non-builtin object");
    };
    // 10. Let result be the Completion Record that is the result of evaluating F in a manner that conforms to
    // the specification of F. If thisArgument is uninitialized, the this value is uninitialized; otherwise,
    // thisArgument provides the this value. argumentsList provides the named parameters. newTarget provides the NewTarget value.
    let this_argument = this_argument.unwrap_or(Value::Undefined);
    match data.behaviour.clone() {
        Behaviour::Regular(func) => {
            if new_target.is_some() {
                Err(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "Not a constructor",
                ))
            } else {
                func(agent, this_argument, arguments_list)
            }
        }
        Behaviour::Constructor(func) => func(agent, this_argument, arguments_list, new_target),
        Behaviour::Closure(func) => {
            if new_target.is_some() {
                Err(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "Not a constructor",
                ))
            } else {
                func(agent, this_argument, arguments_list)
            }
        }
    }
    // 12. Return ? result.
}
