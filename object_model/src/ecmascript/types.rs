// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod language;
mod spec;

pub use language::{
    BUILTIN_STRING_MEMORY, BackendKind, BuiltinStrings, InternalMethods, Object, PropertyKey,
    String, Symbol, Value, WellKnownSymbolIndexes, initialize_symbol_table,
};
pub(crate) use language::{
    BUILTIN_STRINGS_LIST, Backend, MAX_ARRAY_INDEX, StringHeapData, SymbolData,
};
pub use spec::PropertyDescriptor;
