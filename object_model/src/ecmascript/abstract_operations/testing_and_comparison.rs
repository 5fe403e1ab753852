// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [7.2 Testing and Comparison Operations](https://tc39.es/ecma262/#sec-testing-and-comparison-operations)

use crate::ecmascript::{
    builtins::proxy::{Proxy, abstract_operations::validate_non_revoked_proxy},
    execution::{Agent, JsResult},
    types::{Backend, InternalMethods, Object, Value},
};

/// ### [7.2.2 IsArray ( argument )](https://tc39.es/ecma262/#sec-isarray)
///
/// The abstract operation IsArray takes argument argument (an ECMAScript
/// language value) and returns either a normal completion containing a
/// Boolean or a throw completion.
pub fn is_array(agent: &mut Agent, argument: Value) -> JsResult<bool> {
    // 1. If argument is not an Object, return false.
    let Value::Object(mut argument) = argument else {
        return Ok(false);
    };
    loop {
        match &agent[argument].backend {
            // 2. If argument is an Array exotic object, return true.
            Backend::DenseArray(_) | Backend::SparseArray(_) => return Ok(true),
            // 3. If argument is a Proxy exotic object, then
            Backend::Proxy(_) => {
                // a. Perform ? ValidateNonRevokedProxy(argument).
                // b. Let proxyTarget be argument.[[ProxyTarget]].
                // c. Return ? IsArray(proxyTarget).
                argument = validate_non_revoked_proxy(agent, Proxy(argument))?.target;
            }
            // 4. Return false.
            _ => return Ok(false),
        }
    }
}

/// ### [7.2.3 IsCallable ( argument )](https://tc39.es/ecma262/#sec-iscallable)
///
/// The abstract operation IsCallable takes argument argument (an ECMAScript
/// language value) and returns a Boolean. It determines if argument is a
/// callable function with a \[\[Call]] internal method.
pub fn is_callable(agent: &Agent, argument: Value) -> Option<Object> {
    // 1. If argument is not an Object, return false.
    let Value::Object(argument) = argument else {
        return None;
    };
    // 2. If argument has a [[Call]] internal method, return true.
    // 3. Return false.
    match &agent[argument].backend {
        Backend::BuiltinFunction(_) => Some(argument),
        Backend::Proxy(data) if data.is_callable() => Some(argument),
        _ => None,
    }
}

/// ### [7.2.4 IsConstructor ( argument )](https://tc39.es/ecma262/#sec-isconstructor)
///
/// The abstract operation IsConstructor takes argument argument (an ECMAScript
/// language value) and returns a Boolean. It determines if argument is a
/// function object with a \[\[Construct]] internal method.
pub fn is_constructor(agent: &Agent, argument: Value) -> Option<Object> {
    // 1. If argument is not an Object, return false.
    let Value::Object(argument) = argument else {
        return None;
    };
    // 2. If argument has a [[Construct]] internal method, return true.
    // 3. Return false.
    match &agent[argument].backend {
        Backend::BuiltinFunction(data) if data.behaviour.is_constructor() => Some(argument),
        Backend::Proxy(data) if data.is_constructor() => Some(argument),
        _ => None,
    }
}

/// ### [7.2.5 IsExtensible ( O )](https://tc39.es/ecma262/#sec-isextensible-o)
///
/// The abstract operation IsExtensible takes argument O (an Object) and
/// returns either a normal completion containing a Boolean or a throw
/// completion. It is used to determine whether additional properties can be
/// added to O.
pub fn is_extensible(agent: &mut Agent, o: Object) -> JsResult<bool> {
    // 1. Return ? O.[[IsExtensible]]().
    o.internal_is_extensible(agent)
}

/// ### [7.2.10 SameValue ( x, y )](https://tc39.es/ecma262/#sec-samevalue)
///
/// The abstract operation SameValue takes arguments x (an ECMAScript language
/// value) and y (an ECMAScript language value) and returns a Boolean. It
/// determines whether or not the two arguments are the same value.
pub fn same_value(x: Value, y: Value) -> bool {
    // 1. If Type(x) is not Type(y), return false.
    // 2. If x is a Number, then
    if let (Value::Number(x), Value::Number(y)) = (x, y) {
        // a. Return Number::sameValue(x, y).
        return (x.is_nan() && y.is_nan()) || x.to_bits() == y.to_bits();
    }
    // 3. Return SameValueNonNumber(x, y).
    x == y
}

/// ### [7.2.11 SameValueZero ( x, y )](https://tc39.es/ecma262/#sec-samevaluezero)
///
/// Like [`same_value`] but treats +0 and -0 as equal.
pub fn same_value_zero(x: Value, y: Value) -> bool {
    if let (Value::Number(x), Value::Number(y)) = (x, y) {
        return (x.is_nan() && y.is_nan()) || x == y;
    }
    x == y
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn same_value_distinguishes_zeroes() {
        assert!(same_value(f64::NAN.into(), f64::NAN.into()));
        assert!(!same_value(0.0.into(), (-0.0).into()));
        assert!(same_value_zero(0.0.into(), (-0.0).into()));
        assert!(!same_value(Value::Undefined, Value::Null));
        assert!(same_value(Value::Boolean(true), true.into()));
    }
}
