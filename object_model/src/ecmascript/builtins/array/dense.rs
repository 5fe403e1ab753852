// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{ArrayProperties, sparse::SparseArrayHeapData};
use crate::ecmascript::{
    builtins::ordinary::PropertyRecord,
    execution::Options,
    types::{Object, Value},
};

/// Contiguous element storage. Holes are `None`.
#[derive(Debug, Default)]
pub struct DenseArrayHeapData {
    pub(crate) properties: ArrayProperties,
    values: Vec<Option<PropertyRecord>>,
    /// Number of non-hole slots.
    occupied: u32,
}

/// Capacity to grow a dense store to so that it fits `needed` slots:
/// doubling while small, then growing by a quarter at a time.
pub(crate) fn grow_capacity(old_capacity: usize, needed: usize, doubling_limit: usize) -> usize {
    let doubled = old_capacity * 2;
    if needed > doubled {
        return needed;
    }
    if old_capacity < doubling_limit {
        return doubled;
    }
    let mut capacity = old_capacity;
    while capacity < needed {
        capacity += (capacity / 4).max(1);
    }
    capacity
}

impl DenseArrayHeapData {
    pub(crate) fn new(prototype: Option<Object>, length: u32) -> Self {
        Self {
            properties: ArrayProperties::new(prototype, length),
            values: Vec::new(),
            occupied: 0,
        }
    }

    pub(crate) fn from_values(prototype: Option<Object>, values: &[Value]) -> Self {
        let length = u32::try_from(values.len()).expect("Array length overflowed u32");
        Self {
            properties: ArrayProperties::new(prototype, length),
            values: values
                .iter()
                .map(|value| Some(PropertyRecord::Value(*value)))
                .collect(),
            occupied: length,
        }
    }

    /// Builds dense storage with room for `slots` elements from records
    /// sorted by index.
    pub(crate) fn from_sorted_records(
        properties: ArrayProperties,
        slots: usize,
        records: impl IntoIterator<Item = (u32, PropertyRecord)>,
    ) -> Self {
        let mut values = Vec::with_capacity(slots);
        values.resize(slots, None);
        let mut occupied = 0;
        for (index, record) in records {
            values[index as usize] = Some(record);
            occupied += 1;
        }
        Self {
            properties,
            values,
            occupied,
        }
    }

    pub(crate) fn occupied(&self) -> u32 {
        self.occupied
    }

    pub(crate) fn get(&self, index: u32) -> Option<&PropertyRecord> {
        self.values.get(index as usize)?.as_ref()
    }

    /// Storing at `index` would need more capacity and the resulting store
    /// would be mostly holes.
    pub(crate) fn should_switch_to_sparse(&self, index: u32, options: &Options) -> bool {
        let target_length = index as usize + 1;
        if target_length <= self.values.len() || target_length <= self.values.capacity() {
            return false;
        }
        index > options.sparse_switch_min_index
            && (self.occupied == 0 || index / self.occupied > options.sparse_switch_ratio)
    }

    pub(crate) fn put(&mut self, index: u32, record: PropertyRecord, options: &Options) {
        let index = index as usize;
        if index >= self.values.len() {
            if index >= self.values.capacity() {
                let capacity = grow_capacity(
                    self.values.capacity(),
                    index + 1,
                    options.dense_growth_doubling_limit,
                );
                log::trace!(
                    "growing dense array storage from {} to {}",
                    self.values.capacity(),
                    capacity
                );
                self.values.reserve_exact(capacity - self.values.len());
            }
            self.values.resize(index + 1, None);
        }
        let slot = &mut self.values[index];
        match slot {
            None => self.occupied += 1,
            Some(previous) if !previous.is_plain() => self.properties.descriptor_count -= 1,
            Some(_) => {}
        }
        if !record.is_plain() {
            self.properties.descriptor_count += 1;
        }
        *slot = Some(record);
    }

    pub(crate) fn remove(&mut self, index: u32) -> Option<PropertyRecord> {
        let record = self.values.get_mut(index as usize)?.take()?;
        self.occupied -= 1;
        if !record.is_plain() {
            self.properties.descriptor_count -= 1;
        }
        Some(record)
    }

    /// Deletes every element at or above `new_length`, from the top down.
    /// Stops at the first non-configurable element and returns its index.
    pub(crate) fn truncate(&mut self, new_length: u32) -> Result<(), u32> {
        let new_length = new_length as usize;
        if self.values.len() <= new_length {
            return Ok(());
        }
        if self.properties.descriptor_count == 0 {
            // Only plain values: everything is configurable.
            let removed = self.values[new_length..]
                .iter()
                .filter(|slot| slot.is_some())
                .count();
            self.occupied -= removed as u32;
            self.values.truncate(new_length);
            return Ok(());
        }
        while self.values.len() > new_length {
            let index = self.values.len() - 1;
            if let Some(record) = self.values[index] {
                if !record.is_configurable() {
                    return Err(index as u32);
                }
                self.remove(index as u32);
            }
            self.values.pop();
        }
        Ok(())
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (u32, &PropertyRecord)> {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|record| (index as u32, record)))
    }

    pub(crate) fn into_sparse(self) -> SparseArrayHeapData {
        let records = self
            .values
            .into_iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.map(|record| (index as u32, record)));
        SparseArrayHeapData::from_sorted_records(self.properties, records)
    }
}
