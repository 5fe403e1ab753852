// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{ArrayProperties, dense::DenseArrayHeapData};
use crate::ecmascript::{builtins::ordinary::PropertyRecord, execution::Options};

#[derive(Debug, Clone, Copy, PartialEq)]
struct SparseArrayItem {
    index: u32,
    record: PropertyRecord,
}

/// Element storage for arrays with widely spread indexes: items sorted by
/// index and found by binary search.
#[derive(Debug, Default)]
pub struct SparseArrayHeapData {
    pub(crate) properties: ArrayProperties,
    items: Vec<SparseArrayItem>,
}

impl SparseArrayHeapData {
    pub(crate) fn from_sorted_records(
        properties: ArrayProperties,
        records: impl IntoIterator<Item = (u32, PropertyRecord)>,
    ) -> Self {
        let items: Vec<SparseArrayItem> = records
            .into_iter()
            .map(|(index, record)| SparseArrayItem { index, record })
            .collect();
        debug_assert!(items.windows(2).all(|pair| pair[0].index < pair[1].index));
        Self { properties, items }
    }

    fn find(&self, index: u32) -> Result<usize, usize> {
        self.items.binary_search_by_key(&index, |item| item.index)
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn get(&self, index: u32) -> Option<&PropertyRecord> {
        let position = self.find(index).ok()?;
        Some(&self.items[position].record)
    }

    /// Number of dense slots to convert to if inserting a new item at
    /// `index` leaves the array dense enough, otherwise None.
    pub(crate) fn dense_switch_length(&self, index: u32, options: &Options) -> Option<usize> {
        let items = self.items.len() as u64;
        if self.find(index).is_ok() || items < u64::from(options.dense_switch_min_items) {
            return None;
        }
        let highest = self
            .items
            .last()
            .map_or(index, |item| item.index.max(index));
        if u64::from(highest.checked_shr(options.dense_switch_shift).unwrap_or(0)) < items {
            Some(highest as usize + 1)
        } else {
            None
        }
    }

    pub(crate) fn put(&mut self, index: u32, record: PropertyRecord) {
        if !record.is_plain() {
            self.properties.descriptor_count += 1;
        }
        match self.find(index) {
            Ok(position) => {
                let item = &mut self.items[position];
                if !item.record.is_plain() {
                    self.properties.descriptor_count -= 1;
                }
                item.record = record;
            }
            Err(position) => self.items.insert(position, SparseArrayItem { index, record }),
        }
    }

    pub(crate) fn remove(&mut self, index: u32) -> Option<PropertyRecord> {
        let position = self.find(index).ok()?;
        let item = self.items.remove(position);
        if !item.record.is_plain() {
            self.properties.descriptor_count -= 1;
        }
        Some(item.record)
    }

    /// Deletes every element at or above `new_length`, from the top down.
    /// Stops at the first non-configurable element and returns its index.
    pub(crate) fn truncate(&mut self, new_length: u32) -> Result<(), u32> {
        if self.properties.descriptor_count == 0 {
            let position = self.find(new_length).unwrap_or_else(|position| position);
            self.items.truncate(position);
            return Ok(());
        }
        while let Some(item) = self.items.last() {
            if item.index < new_length {
                break;
            }
            if !item.record.is_configurable() {
                return Err(item.index);
            }
            let index = item.index;
            self.remove(index);
        }
        Ok(())
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (u32, &PropertyRecord)> {
        self.items.iter().map(|item| (item.index, &item.record))
    }

    pub(crate) fn into_dense(self, slots: usize) -> DenseArrayHeapData {
        let records = self.items.into_iter().map(|item| (item.index, item.record));
        DenseArrayHeapData::from_sorted_records(self.properties, slots, records)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ecmascript::types::Value;

    #[test]
    fn items_stay_sorted() {
        let mut data = SparseArrayHeapData::default();
        for index in [50, 3, 9000, 7] {
            data.put(index, PropertyRecord::Value(index.into()));
        }
        let indexes: Vec<u32> = data.iter().map(|(index, _)| index).collect();
        assert_eq!(indexes, vec![3, 7, 50, 9000]);
        assert_eq!(data.get(50), Some(&PropertyRecord::Value(50.into())));
        assert_eq!(data.get(51), None);
        assert_eq!(data.remove(7), Some(PropertyRecord::Value(7.into())));
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn densifies_once_full_enough() {
        let options = Options::default();
        let mut data = SparseArrayHeapData::default();
        data.put(20470, PropertyRecord::Value(Value::Null));
        let mut index = 20469;
        loop {
            if let Some(slots) = data.dense_switch_length(index, &options) {
                assert_eq!(slots, 20471);
                break;
            }
            data.put(index, PropertyRecord::Value(Value::Null));
            index -= 1;
        }
        assert_eq!(index, 17911);
    }
}
