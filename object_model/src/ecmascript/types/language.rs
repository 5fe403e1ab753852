// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod object;
mod string;
mod symbol;
mod value;

pub use object::{BackendKind, InternalMethods, Object, PropertyKey};
pub(crate) use object::{Backend, MAX_ARRAY_INDEX};
pub use string::{BUILTIN_STRING_MEMORY, BuiltinStrings, String};
pub(crate) use string::{BUILTIN_STRINGS_LIST, StringHeapData};
pub use symbol::{Symbol, WellKnownSymbolIndexes, initialize_symbol_table};
pub(crate) use symbol::SymbolData;
pub use value::Value;
