// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    abstract_operations::type_conversion::number_to_string,
    execution::Agent,
    types::{String, Symbol, Value},
};

/// Largest canonical array index, 2^32 - 2.
pub(crate) const MAX_ARRAY_INDEX: u32 = u32::MAX - 1;

/// A property key.
///
/// Canonical array indexes are always stored as [`PropertyKey::Integer`]
/// so that `"5"` and `5` name the same property. Every other string key,
/// including `"01"`, `"-0"` and `"4294967295"`, is a
/// [`PropertyKey::String`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    /// A canonical array index in `0..=2^32 - 2`.
    Integer(u32),
    String(String),
    Symbol(Symbol),
}

/// Parses `str` as a canonical array index: decimal digits without a
/// leading zero (except `"0"` itself) denoting a value no greater than
/// 2^32 - 2.
fn parse_array_index(str: &str) -> Option<u32> {
    let bytes = str.as_bytes();
    match bytes {
        [] => None,
        [b'0'] => Some(0),
        [b'0', ..] => None,
        // u32::MAX has 10 digits.
        _ if bytes.len() > 10 => None,
        _ => {
            let mut value: u64 = 0;
            for byte in bytes {
                if !byte.is_ascii_digit() {
                    return None;
                }
                value = value * 10 + u64::from(byte - b'0');
            }
            if value <= u64::from(MAX_ARRAY_INDEX) {
                Some(value as u32)
            } else {
                None
            }
        }
    }
}

impl PropertyKey {
    pub fn from_str(agent: &mut Agent, str: &str) -> Self {
        if let Some(index) = parse_array_index(str) {
            PropertyKey::Integer(index)
        } else {
            PropertyKey::String(String::from_str(agent, str))
        }
    }

    /// Converts an interned string into a key, recognising canonical array
    /// indexes.
    pub fn from_string(agent: &Agent, string: String) -> Self {
        match string.as_str(agent).and_then(parse_array_index) {
            Some(index) => PropertyKey::Integer(index),
            None => PropertyKey::String(string),
        }
    }

    /// Converts an integral number into a key. Values outside the array
    /// index range become string keys.
    pub fn from_u64(agent: &mut Agent, value: u64) -> Self {
        if value <= u64::from(MAX_ARRAY_INDEX) {
            PropertyKey::Integer(value as u32)
        } else {
            PropertyKey::String(String::from_str(agent, &value.to_string()))
        }
    }

    pub fn is_array_index(self) -> bool {
        matches!(self, PropertyKey::Integer(_))
    }

    pub fn is_symbol(self) -> bool {
        matches!(self, PropertyKey::Symbol(_))
    }

    pub fn as_array_index(self) -> Option<u32> {
        match self {
            PropertyKey::Integer(index) => Some(index),
            _ => None,
        }
    }

    /// The key as a language value: array indexes become their canonical
    /// string form.
    pub fn into_value(self, agent: &mut Agent) -> Value {
        match self {
            PropertyKey::Integer(index) => {
                Value::String(number_to_string(agent, f64::from(index)))
            }
            PropertyKey::String(string) => Value::String(string),
            PropertyKey::Symbol(symbol) => Value::Symbol(symbol),
        }
    }

    /// Human readable form for error messages.
    pub fn as_display(self, agent: &Agent) -> std::string::String {
        match self {
            PropertyKey::Integer(index) => index.to_string(),
            PropertyKey::String(string) => string.to_string_lossy(agent).into_owned(),
            PropertyKey::Symbol(symbol) => symbol.descriptive_string(),
        }
    }
}

impl From<Symbol> for PropertyKey {
    fn from(value: Symbol) -> Self {
        PropertyKey::Symbol(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn canonical_index_grammar() {
        assert_eq!(parse_array_index("0"), Some(0));
        assert_eq!(parse_array_index("7"), Some(7));
        assert_eq!(parse_array_index("4294967294"), Some(4294967294));
        assert_eq!(parse_array_index("4294967295"), None);
        assert_eq!(parse_array_index("99999999999"), None);
        assert_eq!(parse_array_index("01"), None);
        assert_eq!(parse_array_index("00"), None);
        assert_eq!(parse_array_index("-0"), None);
        assert_eq!(parse_array_index("1e3"), None);
        assert_eq!(parse_array_index(""), None);
        assert_eq!(parse_array_index(" 1"), None);
    }

    #[test]
    fn string_keys_are_canonicalised() {
        let mut agent = Agent::new(Default::default());
        assert_eq!(
            PropertyKey::from_str(&mut agent, "12"),
            PropertyKey::Integer(12)
        );
        let leading_zero = PropertyKey::from_str(&mut agent, "012");
        assert!(!leading_zero.is_array_index());
        let string = String::from_str(&mut agent, "3");
        assert_eq!(
            PropertyKey::from_string(&agent, string),
            PropertyKey::Integer(3)
        );
        assert!(!PropertyKey::from_u64(&mut agent, u64::from(u32::MAX)).is_array_index());
        let key = PropertyKey::Integer(42);
        let value = key.into_value(&mut agent);
        assert_eq!(value, Value::from_str(&mut agent, "42"));
    }
}
