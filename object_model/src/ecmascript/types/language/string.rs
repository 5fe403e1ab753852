// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::borrow::Cow;

use wtf8::{Wtf8, Wtf8Buf};

use super::Value;
use crate::{ecmascript::execution::Agent, heap::StringIndex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringHeapData {
    data: Wtf8Buf,
}

impl StringHeapData {
    pub(crate) fn new(data: Wtf8Buf) -> Self {
        Self { data }
    }

    pub fn as_wtf8(&self) -> &Wtf8 {
        &self.data
    }
}

/// ### [6.1.4 The String Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-string-type)
///
/// Strings are interned per heap: two handles are equal exactly when their
/// contents are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct String(StringIndex);

impl From<StringIndex> for String {
    fn from(value: StringIndex) -> Self {
        Self(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl TryFrom<Value> for String {
    type Error = ();

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(s),
            _ => Err(()),
        }
    }
}

impl String {
    pub fn from_str(agent: &mut Agent, str: &str) -> Self {
        agent.heap.intern_str(str)
    }

    pub(crate) const fn get_index(self) -> usize {
        self.0.into_index()
    }

    pub fn as_wtf8(self, agent: &Agent) -> &Wtf8 {
        agent[self].as_wtf8()
    }

    /// Returns the contents if they are valid UTF-8.
    pub fn as_str(self, agent: &Agent) -> Option<&str> {
        self.as_wtf8(agent).as_str()
    }

    pub fn to_string_lossy(self, agent: &Agent) -> Cow<'_, str> {
        self.as_wtf8(agent).to_string_lossy()
    }

    pub fn is_empty(self) -> bool {
        // The empty string is interned at a fixed slot.
        self == BUILTIN_STRING_MEMORY._empty
    }
}

macro_rules! builtin_strings {
    ($($name:ident: $value:literal,)*) => {
        #[allow(non_camel_case_types, clippy::enum_variant_names)]
        #[repr(u32)]
        enum BuiltinStringIndexes {
            $($name,)*
        }

        /// Strings interned into every heap at fixed slots.
        #[allow(non_snake_case)]
        pub struct BuiltinStrings {
            $(
                #[doc = concat!("`\"", $value, "\"`")]
                pub $name: String,
            )*
        }

        pub(crate) const BUILTIN_STRINGS_LIST: &[&str] = &[$($value,)*];

        pub const BUILTIN_STRING_MEMORY: BuiltinStrings = BuiltinStrings {
            $(
                $name: String(StringIndex::from_u32_index(BuiltinStringIndexes::$name as u32)),
            )*
        };
    };
}

builtin_strings! {
    _empty: "",
    __proto__: "__proto__",
    apply: "apply",
    configurable: "configurable",
    construct: "construct",
    default: "default",
    defineProperty: "defineProperty",
    deleteProperty: "deleteProperty",
    enumerable: "enumerable",
    Error: "Error",
    r#false: "false",
    get: "get",
    getOwnPropertyDescriptor: "getOwnPropertyDescriptor",
    getPrototypeOf: "getPrototypeOf",
    has: "has",
    Infinity: "Infinity",
    isExtensible: "isExtensible",
    length: "length",
    message: "message",
    name: "name",
    NaN: "NaN",
    _neg_Infinity: "-Infinity",
    null: "null",
    number: "number",
    ownKeys: "ownKeys",
    preventExtensions: "preventExtensions",
    proxy: "proxy",
    revoke: "revoke",
    set: "set",
    setPrototypeOf: "setPrototypeOf",
    string: "string",
    toString: "toString",
    r#true: "true",
    undefined: "undefined",
    value: "value",
    valueOf: "valueOf",
    writable: "writable",
}

#[test]
fn builtin_strings_are_interned_in_order() {
    let mut agent = Agent::new(Default::default());
    assert_eq!(
        String::from_str(&mut agent, "length"),
        BUILTIN_STRING_MEMORY.length
    );
    assert_eq!(
        BUILTIN_STRING_MEMORY.writable.as_str(&agent),
        Some("writable")
    );
    assert!(String::from_str(&mut agent, "").is_empty());
}
