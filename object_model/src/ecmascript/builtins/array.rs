// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [10.4.2 Array Exotic Objects](https://tc39.es/ecma262/#sec-array-exotic-objects)
//!
//! Arrays store their elements in one of two backends. Dense storage is a
//! contiguous vector of optional slots; sparse storage is a sorted list of
//! (index, record) items. An array moves between the two in place when an
//! insertion leaves its current storage badly suited to the occupied
//! indexes. Both keep `length` and its writability outside the element
//! storage, along with the ordinary property store for non-index keys.

mod abstract_operations;
mod dense;
mod sparse;

pub use abstract_operations::{array_create, array_set_length, create_array_from_list};
pub use dense::DenseArrayHeapData;
pub use sparse::SparseArrayHeapData;

use crate::ecmascript::{
    builtins::ordinary::{
        PropertyRecord, PropertyStore, ordinary_define_own_property, ordinary_delete,
        ordinary_get_own_property, validate_and_apply_property_descriptor,
    },
    execution::{Agent, JsResult},
    types::{
        BUILTIN_STRING_MEMORY, Backend, InternalMethods, Object, PropertyDescriptor, PropertyKey,
        Value,
    },
};

/// State shared by both element backends.
#[derive(Debug)]
pub(crate) struct ArrayProperties {
    /// Prototype, extensibility and all non-index properties.
    pub(crate) store: PropertyStore,
    pub(crate) length: u32,
    pub(crate) length_writable: bool,
    /// Number of elements stored with explicit attributes.
    pub(crate) descriptor_count: u32,
}

impl ArrayProperties {
    pub(crate) fn new(prototype: Option<Object>, length: u32) -> Self {
        Self {
            store: PropertyStore::new(prototype),
            length,
            length_writable: true,
            descriptor_count: 0,
        }
    }
}

impl Default for ArrayProperties {
    fn default() -> Self {
        Self::new(None, 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Array(pub(crate) Object);

impl From<Array> for Object {
    fn from(value: Array) -> Self {
        value.0
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Value::Object(value.0)
    }
}

impl Array {
    /// Views `object` as an array if its backend is an array backend.
    pub fn from_object(agent: &Agent, object: Object) -> Option<Array> {
        match agent[object].backend {
            Backend::DenseArray(_) | Backend::SparseArray(_) => Some(Array(object)),
            _ => None,
        }
    }

    fn properties(self, agent: &Agent) -> &ArrayProperties {
        match &agent[self.0].backend {
            Backend::DenseArray(data) => &data.properties,
            Backend::SparseArray(data) => &data.properties,
            _ => unreachable!("Array handle over a non-array backend"),
        }
    }

    fn properties_mut(self, agent: &mut Agent) -> &mut ArrayProperties {
        match &mut agent[self.0].backend {
            Backend::DenseArray(data) => &mut data.properties,
            Backend::SparseArray(data) => &mut data.properties,
            _ => unreachable!("Array handle over a non-array backend"),
        }
    }

    pub fn len(self, agent: &Agent) -> u32 {
        self.properties(agent).length
    }

    pub fn is_empty(self, agent: &Agent) -> bool {
        self.len(agent) == 0
    }

    pub(crate) fn is_length_writable(self, agent: &Agent) -> bool {
        self.properties(agent).length_writable
    }

    pub fn is_sparse(self, agent: &Agent) -> bool {
        matches!(agent[self.0].backend, Backend::SparseArray(_))
    }

    pub(crate) fn set_len(self, agent: &mut Agent, length: u32) {
        self.properties_mut(agent).length = length;
    }

    fn length_descriptor(self, agent: &Agent) -> PropertyDescriptor {
        let properties = self.properties(agent);
        PropertyDescriptor {
            value: Some(properties.length.into()),
            writable: Some(properties.length_writable),
            enumerable: Some(false),
            configurable: Some(false),
            ..Default::default()
        }
    }

    /// OrdinaryDefineOwnProperty(A, "length", Desc) for the length slot,
    /// which lives outside the property store.
    pub(crate) fn define_length(self, agent: &mut Agent, descriptor: PropertyDescriptor) -> bool {
        let current = self.length_descriptor(agent);
        let Some(record) = validate_and_apply_property_descriptor(true, descriptor, Some(current))
        else {
            return false;
        };
        let PropertyRecord::Data {
            value: Value::Number(length),
            writable,
            ..
        } = record
        else {
            unreachable!("length is a non-configurable numeric data property");
        };
        let properties = self.properties_mut(agent);
        properties.length = length as u32;
        properties.length_writable = writable;
        true
    }

    pub(crate) fn get_element(self, agent: &Agent, index: u32) -> Option<PropertyRecord> {
        match &agent[self.0].backend {
            Backend::DenseArray(data) => data.get(index).copied(),
            Backend::SparseArray(data) => data.get(index).copied(),
            _ => unreachable!("Array handle over a non-array backend"),
        }
    }

    /// Stores `record` at `index`, switching the element backend first if
    /// the insertion makes the other representation the better fit. Does
    /// not touch `length`.
    pub(crate) fn put_element(self, agent: &mut Agent, index: u32, record: PropertyRecord) {
        let options = agent.options;
        let backend = &mut agent[self.0].backend;
        match backend {
            Backend::DenseArray(data) => {
                if options.disable_array_switching || !data.should_switch_to_sparse(index, &options)
                {
                    data.put(index, record, &options);
                    return;
                }
                log::debug!(
                    "switching {:?} to sparse storage: index {} with {} occupied slots",
                    self.0,
                    index,
                    data.occupied()
                );
                let mut sparse = std::mem::take(data).into_sparse();
                sparse.put(index, record);
                *backend = Backend::SparseArray(sparse);
            }
            Backend::SparseArray(data) => {
                let slots = if options.disable_array_switching {
                    None
                } else {
                    data.dense_switch_length(index, &options)
                };
                let Some(slots) = slots else {
                    data.put(index, record);
                    return;
                };
                log::debug!(
                    "switching {:?} to dense storage: {} items over {} slots",
                    self.0,
                    data.len() + 1,
                    slots
                );
                let mut dense = std::mem::take(data).into_dense(slots);
                dense.put(index, record, &options);
                *backend = Backend::DenseArray(dense);
            }
            _ => unreachable!("Array handle over a non-array backend"),
        }
    }

    pub(crate) fn remove_element(self, agent: &mut Agent, index: u32) -> Option<PropertyRecord> {
        match &mut agent[self.0].backend {
            Backend::DenseArray(data) => data.remove(index),
            Backend::SparseArray(data) => data.remove(index),
            _ => unreachable!("Array handle over a non-array backend"),
        }
    }

    /// Deletes all elements at or above `new_length` from the highest index
    /// down. On hitting a non-configurable element, returns its index.
    pub(crate) fn truncate_elements(self, agent: &mut Agent, new_length: u32) -> Result<(), u32> {
        match &mut agent[self.0].backend {
            Backend::DenseArray(data) => data.truncate(new_length),
            Backend::SparseArray(data) => data.truncate(new_length),
            _ => unreachable!("Array handle over a non-array backend"),
        }
    }

    /// Occupied indexes in ascending order.
    pub(crate) fn element_indexes(self, agent: &Agent) -> Vec<u32> {
        match &agent[self.0].backend {
            Backend::DenseArray(data) => data.iter().map(|(index, _)| index).collect(),
            Backend::SparseArray(data) => data.iter().map(|(index, _)| index).collect(),
            _ => unreachable!("Array handle over a non-array backend"),
        }
    }

    /// Element values by index, for building argument lists. Returns None if
    /// any element is an accessor or a hole, as those need the full [[Get]].
    pub(crate) fn element_values(self, agent: &Agent) -> Option<Vec<Value>> {
        let length = self.len(agent) as usize;
        // With every index below length occupied, records come out in index
        // order with no gaps.
        match &agent[self.0].backend {
            Backend::DenseArray(data) if data.occupied() as usize == length => {
                data_values(data.iter(), length)
            }
            Backend::SparseArray(data) if data.len() == length => data_values(data.iter(), length),
            Backend::DenseArray(_) | Backend::SparseArray(_) => None,
            _ => unreachable!("Array handle over a non-array backend"),
        }
    }
}

fn data_values<'a>(
    records: impl Iterator<Item = (u32, &'a PropertyRecord)>,
    length: usize,
) -> Option<Vec<Value>> {
    let mut values = Vec::with_capacity(length);
    for (_, record) in records {
        values.push(record.value()?);
    }
    Some(values)
}

impl InternalMethods for Array {
    fn internal_get_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
    ) -> JsResult<Option<PropertyDescriptor>> {
        if let Some(index) = property_key.as_array_index() {
            return Ok(self
                .get_element(agent, index)
                .map(|record| record.to_descriptor()));
        }
        if property_key == PropertyKey::String(BUILTIN_STRING_MEMORY.length) {
            return Ok(Some(self.length_descriptor(agent)));
        }
        Ok(ordinary_get_own_property(agent, self.0, property_key))
    }

    /// ### [10.4.2.1 \[\[DefineOwnProperty\]\] ( P, Desc )](https://tc39.es/ecma262/#sec-array-exotic-objects-defineownproperty-p-desc)
    fn internal_define_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        property_descriptor: PropertyDescriptor,
    ) -> JsResult<bool> {
        // 1. If P is "length", then
        if property_key == PropertyKey::String(BUILTIN_STRING_MEMORY.length) {
            // a. Return ? ArraySetLength(A, Desc).
            return array_set_length(agent, self, property_descriptor);
        }

        // 2. Else if P is an array index, then
        let Some(index) = property_key.as_array_index() else {
            // 3. Return ? OrdinaryDefineOwnProperty(A, P, Desc).
            return Ok(ordinary_define_own_property(
                agent,
                self.0,
                property_key,
                property_descriptor,
            ));
        };

        // a. Let lengthDesc be OrdinaryGetOwnProperty(A, "length").
        // b. Assert: lengthDesc is not undefined.
        // c. Assert: IsDataDescriptor(lengthDesc) is true.
        // d. Assert: lengthDesc.[[Configurable]] is false.
        // e. Let length be lengthDesc.[[Value]].
        let ArrayProperties {
            length,
            length_writable,
            store,
            ..
        } = self.properties(agent);
        let (length, length_writable, extensible) = (*length, *length_writable, store.extensible);

        // f. Assert: length is a non-negative integral Number.
        // g. Let index be ! ToUint32(P).
        // h. If index ≥ length and lengthDesc.[[Writable]] is false, return false.
        if index >= length && !length_writable {
            return Ok(false);
        }

        // i. Let succeeded be ! OrdinaryDefineOwnProperty(A, P, Desc).
        let current = self
            .get_element(agent, index)
            .map(|record| record.to_descriptor());
        let Some(record) =
            validate_and_apply_property_descriptor(extensible, property_descriptor, current)
        else {
            // j. If succeeded is false, return false.
            return Ok(false);
        };
        self.put_element(agent, index, record);

        // k. If index ≥ length, then
        if index >= length {
            // i. Set lengthDesc.[[Value]] to index + 1𝔽.
            // ii. Set succeeded to ! OrdinaryDefineOwnProperty(A, "length", lengthDesc).
            // iii. Assert: succeeded is true.
            self.set_len(agent, index + 1);
        }

        // l. Return true.
        Ok(true)
    }

    fn internal_delete(self, agent: &mut Agent, property_key: PropertyKey) -> JsResult<bool> {
        if let Some(index) = property_key.as_array_index() {
            return Ok(match self.get_element(agent, index) {
                None => true,
                Some(record) if record.is_configurable() => {
                    // Deleting leaves a hole; length is unchanged.
                    self.remove_element(agent, index);
                    true
                }
                Some(_) => false,
            });
        }
        if property_key == PropertyKey::String(BUILTIN_STRING_MEMORY.length) {
            return Ok(false);
        }
        Ok(ordinary_delete(agent, self.0, property_key))
    }

    fn internal_own_property_keys(self, agent: &mut Agent) -> JsResult<Vec<PropertyKey>> {
        let store_keys = self.properties(agent).store.own_keys();
        let mut keys: Vec<PropertyKey> = self
            .element_indexes(agent)
            .into_iter()
            .map(PropertyKey::Integer)
            .collect();
        keys.reserve(store_keys.len() + 1);
        keys.push(PropertyKey::String(BUILTIN_STRING_MEMORY.length));
        keys.extend(store_keys);
        Ok(keys)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ecmascript::execution::Options;

    #[test]
    fn defining_past_the_end_extends_length() {
        let mut agent = Agent::new(Options::default());
        let array = create_array_from_list(&mut agent, &[1.into(), 2.into()]);
        let defined = array
            .internal_define_own_property(
                &mut agent,
                PropertyKey::Integer(9),
                PropertyDescriptor::new_data_descriptor(10),
            )
            .unwrap();
        assert!(defined);
        assert_eq!(array.len(&agent), 10);
        assert!(!array.is_sparse(&agent));
        assert_eq!(array.element_indexes(&agent), vec![0, 1, 9]);
    }

    #[test]
    fn length_is_reported_after_indexes() {
        let mut agent = Agent::new(Options::default());
        let array = create_array_from_list(&mut agent, &[Value::Null]);
        let name = PropertyKey::String(BUILTIN_STRING_MEMORY.name);
        array
            .internal_define_own_property(
                &mut agent,
                name,
                PropertyDescriptor::new_data_descriptor(true),
            )
            .unwrap();
        let keys = array.internal_own_property_keys(&mut agent).unwrap();
        assert_eq!(
            keys,
            vec![
                PropertyKey::Integer(0),
                PropertyKey::String(BUILTIN_STRING_MEMORY.length),
                name,
            ]
        );
    }

    #[test]
    fn length_cannot_be_deleted_or_made_configurable() {
        let mut agent = Agent::new(Options::default());
        let array = create_array_from_list(&mut agent, &[]);
        let length = PropertyKey::String(BUILTIN_STRING_MEMORY.length);
        assert!(!array.internal_delete(&mut agent, length).unwrap());
        let reconfigured = array
            .internal_define_own_property(
                &mut agent,
                length,
                PropertyDescriptor {
                    configurable: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(!reconfigured);
    }

    #[test]
    fn switching_can_be_disabled() {
        let mut agent = Agent::new(Options {
            disable_array_switching: true,
            ..Default::default()
        });
        let array = create_array_from_list(&mut agent, &[]);
        array
            .internal_define_own_property(
                &mut agent,
                PropertyKey::Integer(20470),
                PropertyDescriptor::new_data_descriptor(1),
            )
            .unwrap();
        assert!(!array.is_sparse(&agent));
        assert_eq!(array.len(&agent), 20471);
    }

    #[test]
    fn element_values_requires_every_index() {
        let mut agent = Agent::new(Options::default());
        let array = create_array_from_list(&mut agent, &[1.into(), 2.into()]);
        assert_eq!(array.element_values(&agent), Some(vec![1.into(), 2.into()]));

        let length = PropertyKey::String(BUILTIN_STRING_MEMORY.length);
        array
            .internal_define_own_property(
                &mut agent,
                length,
                PropertyDescriptor {
                    value: Some(200_000_000.into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(array.element_values(&agent), None);

        let sparse = create_array_from_list(&mut agent, &[]);
        sparse
            .internal_define_own_property(
                &mut agent,
                PropertyKey::Integer(199_999_999),
                PropertyDescriptor::new_data_descriptor(1),
            )
            .unwrap();
        assert!(sparse.is_sparse(&agent));
        assert_eq!(sparse.element_values(&agent), None);
    }
}
