// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Symbols are process-wide: every agent in the process shares one symbol
//! table, so a symbol handle means the same thing in every heap. The table
//! holds the well-known symbols at fixed slots and the `Symbol.for`
//! registry.

use std::sync::{OnceLock, PoisonError, RwLock};

use ahash::AHashMap;

use super::Value;
use crate::heap::SymbolIndex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolData {
    descriptor: Option<Box<str>>,
    /// Key under which the symbol is registered in the global registry.
    registry_key: Option<Box<str>>,
}

#[derive(Debug, Default)]
struct SymbolTable {
    symbols: Vec<Option<SymbolData>>,
    registry: AHashMap<Box<str>, Symbol>,
}

static SYMBOL_TABLE: OnceLock<RwLock<SymbolTable>> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum WellKnownSymbolIndexes {
    AsyncIterator,
    HasInstance,
    IsConcatSpreadable,
    Iterator,
    Match,
    MatchAll,
    Replace,
    Search,
    Species,
    Split,
    ToPrimitive,
    ToStringTag,
    Unscopables,
}

const WELL_KNOWN_SYMBOL_DESCRIPTIONS: [&str; 13] = [
    "Symbol.asyncIterator",
    "Symbol.hasInstance",
    "Symbol.isConcatSpreadable",
    "Symbol.iterator",
    "Symbol.match",
    "Symbol.matchAll",
    "Symbol.replace",
    "Symbol.search",
    "Symbol.species",
    "Symbol.split",
    "Symbol.toPrimitive",
    "Symbol.toStringTag",
    "Symbol.unscopables",
];

impl From<WellKnownSymbolIndexes> for Symbol {
    fn from(value: WellKnownSymbolIndexes) -> Self {
        Symbol(SymbolIndex::from_u32_index(value as u32))
    }
}

impl From<WellKnownSymbolIndexes> for Value {
    fn from(value: WellKnownSymbolIndexes) -> Self {
        Value::Symbol(value.into())
    }
}

/// Sets up the process-wide symbol table with the well-known symbols.
///
/// Called by [`Agent::new`](crate::ecmascript::execution::Agent::new).
/// Calling it again is a no-op.
pub fn initialize_symbol_table() {
    symbol_table();
}

fn symbol_table() -> &'static RwLock<SymbolTable> {
    SYMBOL_TABLE.get_or_init(|| {
        let symbols = WELL_KNOWN_SYMBOL_DESCRIPTIONS
            .iter()
            .map(|description| {
                Some(SymbolData {
                    descriptor: Some((*description).into()),
                    registry_key: None,
                })
            })
            .collect();
        RwLock::new(SymbolTable {
            symbols,
            registry: AHashMap::default(),
        })
    })
}

fn with_table<R>(f: impl FnOnce(&SymbolTable) -> R) -> R {
    let table = symbol_table()
        .read()
        .unwrap_or_else(PoisonError::into_inner);
    f(&table)
}

fn with_table_mut<R>(f: impl FnOnce(&mut SymbolTable) -> R) -> R {
    let mut table = symbol_table()
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    f(&mut table)
}

/// ### [6.1.5 The Symbol Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-symbol-type)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(SymbolIndex);

impl From<Symbol> for Value {
    fn from(value: Symbol) -> Self {
        Value::Symbol(value)
    }
}

impl TryFrom<Value> for Symbol {
    type Error = ();

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Symbol(s) => Ok(s),
            _ => Err(()),
        }
    }
}

impl Symbol {
    /// Creates a new unique symbol, as `Symbol(description)` does.
    pub fn new(description: Option<&str>) -> Self {
        with_table_mut(|table| table.push(description.map(Into::into), None))
    }

    /// ### [20.4.2.2 Symbol.for ( key )](https://tc39.es/ecma262/#sec-symbol.for)
    pub fn for_key(key: &str) -> Self {
        // 2. For each element e of the GlobalSymbolRegistry List, do
        //    a. If e.[[Key]] is stringKey, return e.[[Symbol]].
        if let Some(symbol) = with_table(|table| table.registry.get(key).copied()) {
            return symbol;
        }
        with_table_mut(|table| {
            // Another thread may have registered the key in between.
            if let Some(symbol) = table.registry.get(key) {
                return *symbol;
            }
            // 4. Let newSymbol be a new Symbol whose [[Description]] is stringKey.
            let symbol = table.push(Some(key.into()), Some(key.into()));
            // 5. Append the GlobalSymbolRegistry Record { [[Key]]: stringKey, [[Symbol]]: newSymbol } to the GlobalSymbolRegistry List.
            table.registry.insert(key.into(), symbol);
            // 6. Return newSymbol.
            symbol
        })
    }

    /// ### [20.4.2.6 Symbol.keyFor ( sym )](https://tc39.es/ecma262/#sec-symbol.keyfor)
    pub fn key_for(self) -> Option<std::string::String> {
        with_table(|table| {
            table
                .get(self)
                .registry_key
                .as_deref()
                .map(ToOwned::to_owned)
        })
    }

    pub fn description(self) -> Option<std::string::String> {
        with_table(|table| table.get(self).descriptor.as_deref().map(ToOwned::to_owned))
    }

    /// ### [20.4.3.3.1 SymbolDescriptiveString ( sym )](https://tc39.es/ecma262/#sec-symboldescriptivestring)
    pub fn descriptive_string(self) -> std::string::String {
        format!("Symbol({})", self.description().unwrap_or_default())
    }
}

impl SymbolTable {
    fn push(&mut self, descriptor: Option<Box<str>>, registry_key: Option<Box<str>>) -> Symbol {
        self.symbols.push(Some(SymbolData {
            descriptor,
            registry_key,
        }));
        Symbol(SymbolIndex::last(&self.symbols))
    }

    fn get(&self, symbol: Symbol) -> &SymbolData {
        self.symbols
            .get(symbol.0.into_index())
            .expect("Symbol out of bounds")
            .as_ref()
            .expect("Symbol slot empty")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn well_known_symbols_have_fixed_descriptions() {
        initialize_symbol_table();
        initialize_symbol_table();
        let to_primitive = Symbol::from(WellKnownSymbolIndexes::ToPrimitive);
        assert_eq!(
            to_primitive.description().as_deref(),
            Some("Symbol.toPrimitive")
        );
        assert_eq!(to_primitive.key_for(), None);
    }

    #[test]
    fn registry_returns_the_same_symbol_per_key() {
        let a = Symbol::for_key("app.registry-test");
        let b = Symbol::for_key("app.registry-test");
        assert_eq!(a, b);
        assert_eq!(a.key_for().as_deref(), Some("app.registry-test"));
        let fresh = Symbol::new(Some("app.registry-test"));
        assert_ne!(fresh, a);
        assert_eq!(fresh.key_for(), None);
        assert_eq!(fresh.descriptive_string(), "Symbol(app.registry-test)");
    }
}
