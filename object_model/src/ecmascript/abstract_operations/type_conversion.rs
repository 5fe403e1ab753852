// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [7.1 Type Conversion](https://tc39.es/ecma262/#sec-type-conversion)
//!
//! The ECMAScript language implicitly performs automatic type conversion as
//! needed. To clarify the semantics of certain constructs it is useful to
//! define a set of conversion abstract operations. The conversion abstract
//! operations are polymorphic; they can accept a value of any ECMAScript
//! language type. But no other specification types are used with these
//! operations.

use super::{
    operations_on_objects::{call_function, get, get_object_method},
    testing_and_comparison::is_callable,
};
use crate::ecmascript::{
    execution::{Agent, ExceptionType, JsResult},
    types::{
        BUILTIN_STRING_MEMORY, MAX_ARRAY_INDEX, Object, PropertyKey, String, Symbol, Value,
        WellKnownSymbolIndexes,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferredType {
    String = 1,
    Number,
}

/// ### [7.1.1 ToPrimitive ( input \[ , preferredType \] )](https://tc39.es/ecma262/#sec-toprimitive)
///
/// The abstract operation ToPrimitive takes argument input (an ECMAScript
/// language value) and optional argument preferredType (STRING or NUMBER) and
/// returns either a normal completion containing an ECMAScript language value
/// or a throw completion. It converts its input argument to a non-Object type.
/// If an object is capable of converting to more than one primitive type, it
/// may use the optional hint preferredType to favour that type.
pub fn to_primitive(
    agent: &mut Agent,
    input: Value,
    preferred_type: Option<PreferredType>,
) -> JsResult<Value> {
    // 1. If input is an Object, then
    let Value::Object(input) = input else {
        // 2. Return input.
        return Ok(input);
    };
    // a. Let exoticToPrim be ? GetMethod(input, @@toPrimitive).
    let exotic_to_prim = get_object_method(
        agent,
        input,
        PropertyKey::Symbol(Symbol::from(WellKnownSymbolIndexes::ToPrimitive)),
    )?;
    // b. If exoticToPrim is not undefined, then
    let Some(exotic_to_prim) = exotic_to_prim else {
        // c. If preferredType is not present, let preferredType be NUMBER.
        // d. Return ? OrdinaryToPrimitive(input, preferredType).
        return ordinary_to_primitive(
            agent,
            input,
            preferred_type.unwrap_or(PreferredType::Number),
        );
    };
    let hint = match preferred_type {
        // i. If preferredType is not present, then
        // 1. Let hint be "default".
        None => BUILTIN_STRING_MEMORY.default,
        // ii. Else if preferredType is STRING, then
        // 1. Let hint be "string".
        Some(PreferredType::String) => BUILTIN_STRING_MEMORY.string,
        // iii. Else,
        // 1. Assert: preferredType is NUMBER.
        // 2. Let hint be "number".
        Some(PreferredType::Number) => BUILTIN_STRING_MEMORY.number,
    };
    // iv. Let result be ? Call(exoticToPrim, input, « hint »).
    let result = call_function(agent, exotic_to_prim, input.into(), &[hint.into()])?;
    // v. If result is not an Object, return result.
    if !result.is_object() {
        return Ok(result);
    }
    // vi. Throw a TypeError exception.
    Err(agent.throw_exception_with_static_message(
        ExceptionType::TypeError,
        "Cannot convert object to primitive value",
    ))
}

/// #### [7.1.1.1 OrdinaryToPrimitive ( O, hint )](https://tc39.es/ecma262/#sec-ordinarytoprimitive)
///
/// The abstract operation OrdinaryToPrimitive takes arguments O (an Object)
/// and hint (STRING or NUMBER) and returns either a normal completion
/// containing an ECMAScript language value or a throw completion.
pub fn ordinary_to_primitive(agent: &mut Agent, o: Object, hint: PreferredType) -> JsResult<Value> {
    let to_string_key = PropertyKey::String(BUILTIN_STRING_MEMORY.toString);
    let value_of_key = PropertyKey::String(BUILTIN_STRING_MEMORY.valueOf);
    let method_names = match hint {
        // 1. If hint is STRING, then
        // a. Let methodNames be « "toString", "valueOf" ».
        PreferredType::String => [to_string_key, value_of_key],
        // 2. Else,
        // a. Let methodNames be « "valueOf", "toString" ».
        PreferredType::Number => [value_of_key, to_string_key],
    };
    // 3. For each element name of methodNames, do
    for name in method_names {
        // a. Let method be ? Get(O, name).
        let method = get(agent, o, name)?;
        // b. If IsCallable(method) is true, then
        if let Some(method) = is_callable(agent, method) {
            // i. Let result be ? Call(method, O).
            let result = call_function(agent, method, o.into(), &[])?;
            // ii. If result is not an Object, return result.
            if !result.is_object() {
                return Ok(result);
            }
        }
    }
    // 4. Throw a TypeError exception.
    Err(agent.throw_exception_with_static_message(
        ExceptionType::TypeError,
        "Cannot convert object to primitive value",
    ))
}

/// ### [7.1.2 ToBoolean ( argument )](https://tc39.es/ecma262/#sec-toboolean)
pub fn to_boolean(argument: Value) -> bool {
    match argument {
        // 1. If argument is a Boolean, return argument.
        Value::Boolean(bool) => bool,
        // 2. If argument is one of undefined, null, +0𝔽, -0𝔽, NaN, 0ℤ, or the empty String, return false.
        Value::Undefined | Value::Null => false,
        Value::Number(number) => !(number == 0.0 || number.is_nan()),
        Value::String(string) => !string.is_empty(),
        // 4. Return true.
        Value::Symbol(_) | Value::Object(_) => true,
    }
}

/// ### [7.1.4 ToNumber ( argument )](https://tc39.es/ecma262/#sec-tonumber)
///
/// The abstract operation ToNumber takes argument argument (an ECMAScript
/// language value) and returns either a normal completion containing a Number
/// or a throw completion. It converts argument to a value of type Number.
pub fn to_number(agent: &mut Agent, argument: Value) -> JsResult<f64> {
    match argument {
        // 1. If argument is a Number, return argument.
        Value::Number(number) => Ok(number),
        // 2. If argument is either a Symbol or a BigInt, throw a TypeError exception.
        Value::Symbol(_) => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot convert a Symbol value to a number",
        )),
        // 3. If argument is undefined, return NaN.
        Value::Undefined => Ok(f64::NAN),
        // 4. If argument is either null or false, return +0𝔽.
        Value::Null | Value::Boolean(false) => Ok(0.0),
        // 5. If argument is true, return 1𝔽.
        Value::Boolean(true) => Ok(1.0),
        // 6. If argument is a String, return StringToNumber(argument).
        Value::String(string) => Ok(string_to_number(agent, string)),
        // 7. Assert: argument is an Object.
        Value::Object(_) => {
            // 8. Let primValue be ? ToPrimitive(argument, NUMBER).
            let prim_value = to_primitive(agent, argument, Some(PreferredType::Number))?;
            // 9. Assert: primValue is not an Object.
            debug_assert!(!prim_value.is_object());
            // 10. Return ? ToNumber(primValue).
            to_number(agent, prim_value)
        }
    }
}

/// WhiteSpace and LineTerminator code points.
fn is_trimmable_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0009}'
            | '\u{000A}'
            | '\u{000B}'
            | '\u{000C}'
            | '\u{000D}'
            | '\u{0020}'
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// ### [7.1.4.1.1 StringToNumber ( str )](https://tc39.es/ecma262/#sec-stringtonumber)
pub fn string_to_number(agent: &Agent, str: String) -> f64 {
    let str = str.to_string_lossy(agent);
    let trimmed = str.trim_matches(is_trimmable_whitespace);
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    // NonDecimalIntegerLiteral
    let bytes = trimmed.as_bytes();
    if bytes.len() > 2 && bytes[0] == b'0' {
        let radix = match bytes[1] {
            b'x' | b'X' => Some(16),
            b'o' | b'O' => Some(8),
            b'b' | b'B' => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            return parse_non_decimal(&trimmed[2..], radix);
        }
    }
    // fast_float accepts "inf", "infinity" and "nan" in any case; the only
    // letters a StrDecimalLiteral can contain are exponent markers.
    if bytes
        .iter()
        .any(|byte| byte.is_ascii_alphabetic() && !matches!(byte, b'e' | b'E'))
    {
        return f64::NAN;
    }
    fast_float::parse::<f64, _>(trimmed).unwrap_or(f64::NAN)
}

fn parse_non_decimal(digits: &str, radix: u32) -> f64 {
    let mut result = 0.0;
    for c in digits.chars() {
        let Some(digit) = c.to_digit(radix) else {
            return f64::NAN;
        };
        result = result * f64::from(radix) + f64::from(digit);
    }
    result
}

/// ### [7.1.5 ToIntegerOrInfinity ( argument )](https://tc39.es/ecma262/#sec-tointegerorinfinity)
pub fn to_integer_or_infinity(agent: &mut Agent, argument: Value) -> JsResult<f64> {
    // 1. Let number be ? ToNumber(argument).
    let number = to_number(agent, argument)?;
    // 2. If number is one of NaN, +0𝔽, or -0𝔽, return 0.
    if number.is_nan() || number == 0.0 {
        return Ok(0.0);
    }
    // 3. If number is +∞𝔽, return +∞.
    // 4. If number is -∞𝔽, return -∞.
    // 5. Return truncate(ℝ(number)).
    Ok(number.trunc())
}

/// ### [7.1.7 ToUint32 ( argument )](https://tc39.es/ecma262/#sec-touint32)
///
/// The abstract operation ToUint32 takes argument argument (an ECMAScript
/// language value) and returns either a normal completion containing an
/// integral Number or a throw completion. It converts argument to one of 2^32
/// integral Number values in the inclusive interval from +0𝔽 to 𝔽(2^32 - 1).
pub fn to_uint32(agent: &mut Agent, argument: Value) -> JsResult<u32> {
    // 1. Let number be ? ToNumber(argument).
    let number = to_number(agent, argument)?;
    // 2. If number is not finite or number is either +0𝔽 or -0𝔽, return +0𝔽.
    if !number.is_finite() || number == 0.0 {
        return Ok(0);
    }
    // 3. Let int be truncate(ℝ(number)).
    let int = number.trunc();
    // 4. Let int32bit be int modulo 2^32.
    // 5. Return 𝔽(int32bit).
    Ok(int.rem_euclid(4294967296.0) as u32)
}

/// ### [7.1.17 ToString ( argument )](https://tc39.es/ecma262/#sec-tostring)
pub fn to_string(agent: &mut Agent, argument: Value) -> JsResult<String> {
    match argument {
        // 1. If argument is a String, return argument.
        Value::String(string) => Ok(string),
        // 2. If argument is a Symbol, throw a TypeError exception.
        Value::Symbol(_) => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot convert a Symbol value to a string",
        )),
        // 3. If argument is undefined, return "undefined".
        Value::Undefined => Ok(BUILTIN_STRING_MEMORY.undefined),
        // 4. If argument is null, return "null".
        Value::Null => Ok(BUILTIN_STRING_MEMORY.null),
        // 5. If argument is true, return "true".
        Value::Boolean(true) => Ok(BUILTIN_STRING_MEMORY.r#true),
        // 6. If argument is false, return "false".
        Value::Boolean(false) => Ok(BUILTIN_STRING_MEMORY.r#false),
        // 7. If argument is a Number, return Number::toString(argument, 10).
        Value::Number(number) => Ok(number_to_string(agent, number)),
        // 9. Assert: argument is an Object.
        Value::Object(_) => {
            // 10. Let primValue be ? ToPrimitive(argument, STRING).
            let prim_value = to_primitive(agent, argument, Some(PreferredType::String))?;
            // 11. Assert: primValue is not an Object.
            debug_assert!(!prim_value.is_object());
            // 12. Return ? ToString(primValue).
            to_string(agent, prim_value)
        }
    }
}

/// ### [6.1.6.1.20 Number::toString ( x, radix )](https://tc39.es/ecma262/#sec-numeric-types-number-tostring)
///
/// Radix 10 only.
pub fn number_to_string(agent: &mut Agent, x: f64) -> String {
    let mut buffer = ryu_js::Buffer::new();
    String::from_str(agent, buffer.format(x))
}

/// ### [7.1.19 ToPropertyKey ( argument )](https://tc39.es/ecma262/#sec-topropertykey)
pub fn to_property_key(agent: &mut Agent, argument: Value) -> JsResult<PropertyKey> {
    // NOTE: Integral numbers in the array index range skip the string round
    // trip.
    if let Value::Number(number) = argument
        && number.fract() == 0.0
        && (0.0..=f64::from(MAX_ARRAY_INDEX)).contains(&number)
    {
        return Ok(PropertyKey::Integer(number as u32));
    }
    // 1. Let key be ? ToPrimitive(argument, STRING).
    let key = to_primitive(agent, argument, Some(PreferredType::String))?;
    // 2. If key is a Symbol, then
    if let Value::Symbol(symbol) = key {
        // a. Return key.
        return Ok(PropertyKey::Symbol(symbol));
    }
    // 3. Return ! ToString(key).
    let key = to_string(agent, key)?;
    Ok(PropertyKey::from_string(agent, key))
}

/// ### [7.1.20 ToLength ( argument )](https://tc39.es/ecma262/#sec-tolength)
pub fn to_length(agent: &mut Agent, argument: Value) -> JsResult<u64> {
    // 1. Let len be ? ToIntegerOrInfinity(argument).
    let len = to_integer_or_infinity(agent, argument)?;
    // 2. If len ≤ 0, return +0𝔽.
    if len <= 0.0 {
        return Ok(0);
    }
    // 3. Return 𝔽(min(len, 2^53 - 1)).
    Ok(len.min(9007199254740991.0) as u64)
}
