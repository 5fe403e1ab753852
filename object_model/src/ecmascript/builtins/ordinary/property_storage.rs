// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use ahash::AHashMap;

use crate::ecmascript::types::{Object, PropertyDescriptor, PropertyKey, Value};

/// A single property slot.
///
/// Most properties are plain writable, enumerable, configurable data
/// properties; those are stored as a bare value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum PropertyRecord {
    Value(Value),
    Data {
        value: Value,
        writable: bool,
        enumerable: bool,
        configurable: bool,
    },
    Accessor {
        get: Option<Object>,
        set: Option<Object>,
        enumerable: bool,
        configurable: bool,
    },
}

impl PropertyRecord {
    /// Builds a record from a fully populated descriptor.
    pub(crate) fn from_descriptor(descriptor: &PropertyDescriptor) -> Self {
        debug_assert!(descriptor.is_fully_populated());
        let enumerable = descriptor.enumerable.unwrap_or(false);
        let configurable = descriptor.configurable.unwrap_or(false);
        if descriptor.is_accessor_descriptor() {
            return PropertyRecord::Accessor {
                get: descriptor.get.flatten(),
                set: descriptor.set.flatten(),
                enumerable,
                configurable,
            };
        }
        let value = descriptor.value.unwrap_or_default();
        let writable = descriptor.writable.unwrap_or(false);
        if writable && enumerable && configurable {
            PropertyRecord::Value(value)
        } else {
            PropertyRecord::Data {
                value,
                writable,
                enumerable,
                configurable,
            }
        }
    }

    /// The fully populated descriptor for this record.
    pub(crate) fn to_descriptor(self) -> PropertyDescriptor {
        match self {
            PropertyRecord::Value(value) => PropertyDescriptor::new_data_descriptor(value),
            PropertyRecord::Data {
                value,
                writable,
                enumerable,
                configurable,
            } => PropertyDescriptor {
                value: Some(value),
                writable: Some(writable),
                enumerable: Some(enumerable),
                configurable: Some(configurable),
                ..Default::default()
            },
            PropertyRecord::Accessor {
                get,
                set,
                enumerable,
                configurable,
            } => PropertyDescriptor {
                get: Some(get),
                set: Some(set),
                enumerable: Some(enumerable),
                configurable: Some(configurable),
                ..Default::default()
            },
        }
    }

    /// A record that is not a bare value carries explicit attributes.
    pub(crate) fn is_plain(&self) -> bool {
        matches!(self, PropertyRecord::Value(_))
    }

    pub(crate) fn is_configurable(&self) -> bool {
        match self {
            PropertyRecord::Value(_) => true,
            PropertyRecord::Data { configurable, .. }
            | PropertyRecord::Accessor { configurable, .. } => *configurable,
        }
    }

    /// Data value of the record, or None for accessors.
    pub(crate) fn value(&self) -> Option<Value> {
        match self {
            PropertyRecord::Value(value) | PropertyRecord::Data { value, .. } => Some(*value),
            PropertyRecord::Accessor { .. } => None,
        }
    }
}

/// An insertion-ordered map from property keys to records.
///
/// Removed entries leave an empty slot behind so that deleting does not
/// shift later entries. Slots are compacted once more than half of them are
/// empty.
#[derive(Debug, Default)]
pub(crate) struct PropertyMap {
    slots: Vec<Option<(PropertyKey, PropertyRecord)>>,
    lookup: AHashMap<PropertyKey, u32>,
}

impl PropertyMap {
    pub(crate) fn len(&self) -> usize {
        self.lookup.len()
    }

    pub(crate) fn get(&self, key: PropertyKey) -> Option<&PropertyRecord> {
        let index = *self.lookup.get(&key)?;
        self.slots[index as usize].as_ref().map(|(_, record)| record)
    }

    /// Replaces the record in place, keeping the key's position, or appends
    /// a new entry.
    pub(crate) fn insert(&mut self, key: PropertyKey, record: PropertyRecord) {
        if let Some(&index) = self.lookup.get(&key) {
            self.slots[index as usize] = Some((key, record));
            return;
        }
        let index = u32::try_from(self.slots.len()).expect("Property count overflowed u32");
        self.slots.push(Some((key, record)));
        self.lookup.insert(key, index);
    }

    pub(crate) fn remove(&mut self, key: PropertyKey) -> Option<PropertyRecord> {
        let index = self.lookup.remove(&key)? as usize;
        let (_, record) = self.slots[index].take()?;
        if self.slots.len() > 8 && self.lookup.len() * 2 < self.slots.len() {
            self.compact();
        }
        Some(record)
    }

    fn compact(&mut self) {
        self.slots.retain(Option::is_some);
        for (index, (key, _)) in self.slots.iter().flatten().enumerate() {
            self.lookup.insert(*key, index as u32);
        }
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = PropertyKey> + '_ {
        self.slots.iter().flatten().map(|(key, _)| *key)
    }
}

/// The generic object backend: string keyed properties in insertion order,
/// symbol keyed properties in a separate map, the prototype link and the
/// extensibility flag.
#[derive(Debug)]
pub struct PropertyStore {
    pub(crate) prototype: Option<Object>,
    pub(crate) extensible: bool,
    properties: PropertyMap,
    symbols: PropertyMap,
}

impl Default for PropertyStore {
    fn default() -> Self {
        Self::new(None)
    }
}

impl PropertyStore {
    pub(crate) fn new(prototype: Option<Object>) -> Self {
        Self {
            prototype,
            extensible: true,
            properties: PropertyMap::default(),
            symbols: PropertyMap::default(),
        }
    }

    fn map(&self, key: PropertyKey) -> &PropertyMap {
        match key {
            PropertyKey::Symbol(_) => &self.symbols,
            _ => &self.properties,
        }
    }

    fn map_mut(&mut self, key: PropertyKey) -> &mut PropertyMap {
        match key {
            PropertyKey::Symbol(_) => &mut self.symbols,
            _ => &mut self.properties,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.properties.len() + self.symbols.len()
    }

    pub(crate) fn get(&self, key: PropertyKey) -> Option<&PropertyRecord> {
        self.map(key).get(key)
    }

    pub(crate) fn set(&mut self, key: PropertyKey, record: PropertyRecord) {
        self.map_mut(key).insert(key, record);
    }

    /// Stores a plain writable, enumerable, configurable data property.
    pub(crate) fn set_value(&mut self, key: PropertyKey, value: Value) {
        self.set(key, PropertyRecord::Value(value));
    }

    pub(crate) fn remove(&mut self, key: PropertyKey) -> Option<PropertyRecord> {
        self.map_mut(key).remove(key)
    }

    /// ### [10.1.11.1 OrdinaryOwnPropertyKeys ( O )](https://tc39.es/ecma262/#sec-ordinaryownpropertykeys)
    ///
    /// Array indexes in ascending numeric order, then string keys in
    /// insertion order, then symbol keys in insertion order.
    pub(crate) fn own_keys(&self) -> Vec<PropertyKey> {
        let mut keys = Vec::with_capacity(self.len());
        // 2. For each own property key P of O such that P is an array index,
        //    in ascending numeric index order, do
        let mut indexes: Vec<u32> = self
            .properties
            .keys()
            .filter_map(PropertyKey::as_array_index)
            .collect();
        indexes.sort_unstable();
        keys.extend(indexes.into_iter().map(PropertyKey::Integer));
        // 3. For each own property key P of O such that P is a String and P is
        //    not an array index, in ascending chronological order of property
        //    creation, do
        keys.extend(self.properties.keys().filter(|key| !key.is_array_index()));
        // 4. For each own property key P of O such that P is a Symbol, in
        //    ascending chronological order of property creation, do
        keys.extend(self.symbols.keys());
        keys
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ecmascript::{execution::Agent, types::Symbol};

    #[test]
    fn property_map_removal_keeps_order() {
        let mut agent = Agent::new(Default::default());
        let mut map = PropertyMap::default();
        let a = PropertyKey::from_str(&mut agent, "a");
        let b = PropertyKey::from_str(&mut agent, "b");
        let c = PropertyKey::from_str(&mut agent, "c");
        map.insert(a, PropertyRecord::Value(1.into()));
        map.insert(b, PropertyRecord::Value(2.into()));
        map.insert(c, PropertyRecord::Value(3.into()));
        assert_eq!(map.remove(b), Some(PropertyRecord::Value(2.into())));
        assert_eq!(map.keys().collect::<Vec<_>>(), [a, c]);
        assert_eq!(map.get(c), Some(&PropertyRecord::Value(3.into())));
        // Re-inserting appends at the end.
        map.insert(b, PropertyRecord::Value(4.into()));
        map.insert(a, PropertyRecord::Value(5.into()));
        assert_eq!(map.keys().collect::<Vec<_>>(), [a, c, b]);
        assert_eq!(map.get(a), Some(&PropertyRecord::Value(5.into())));
    }

    #[test]
    fn bulk_removal_compacts_without_losing_order() {
        let mut agent = Agent::new(Default::default());
        let mut map = PropertyMap::default();
        let keys: Vec<PropertyKey> = (0..100)
            .map(|i| PropertyKey::from_str(&mut agent, &format!("k{i}")))
            .collect();
        for (i, key) in keys.iter().enumerate() {
            map.insert(*key, PropertyRecord::Value((i as u32).into()));
        }
        for key in keys.iter().step_by(3).chain(keys.iter().skip(1).step_by(3)) {
            assert!(map.remove(*key).is_some());
        }
        assert!(map.slots.len() < keys.len());
        let survivors: Vec<PropertyKey> = keys.iter().skip(2).step_by(3).copied().collect();
        assert_eq!(map.len(), survivors.len());
        assert_eq!(map.keys().collect::<Vec<_>>(), survivors);
        for (i, key) in keys.iter().enumerate().skip(2).step_by(3) {
            assert_eq!(map.get(*key), Some(&PropertyRecord::Value((i as u32).into())));
        }
        assert_eq!(map.remove(keys[0]), None);
        let fresh = PropertyKey::from_str(&mut agent, "fresh");
        map.insert(fresh, PropertyRecord::Value(Value::Null));
        assert_eq!(map.keys().last(), Some(fresh));
    }

    #[test]
    fn own_keys_order_indexes_strings_symbols() {
        let mut agent = Agent::new(Default::default());
        let mut store = PropertyStore::default();
        let symbol = Symbol::new(Some("s"));
        let x = PropertyKey::from_str(&mut agent, "x");
        store.set_value(symbol.into(), Value::Null);
        store.set_value(x, Value::Null);
        store.set_value(PropertyKey::Integer(10), Value::Null);
        store.set_value(PropertyKey::Integer(2), Value::Null);
        assert_eq!(
            store.own_keys(),
            vec![
                PropertyKey::Integer(2),
                PropertyKey::Integer(10),
                x,
                symbol.into()
            ]
        );
    }

    #[test]
    fn records_collapse_to_plain_values() {
        let plain = PropertyRecord::from_descriptor(&PropertyDescriptor::new_data_descriptor(1));
        assert!(plain.is_plain());
        let frozen =
            PropertyRecord::from_descriptor(&PropertyDescriptor::new_frozen_data_descriptor(1));
        assert!(!frozen.is_plain());
        assert!(!frozen.is_configurable());
        assert_eq!(
            frozen.to_descriptor(),
            PropertyDescriptor::new_frozen_data_descriptor(1)
        );
    }
}
