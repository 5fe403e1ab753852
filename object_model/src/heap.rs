// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod indexes;

use std::ops::{Index, IndexMut};

use hashbrown::HashMap;
use wtf8::Wtf8Buf;

pub use self::indexes::*;
#[cfg(feature = "weak-refs")]
use crate::ecmascript::{
    builtins::weak_collection::{WeakCollection, WeakCollectionHeapData},
    execution::weak_registry::WeakRegistry,
};
use crate::ecmascript::{
    execution::Agent,
    types::{BUILTIN_STRINGS_LIST, Backend, Object, String, StringHeapData},
};

/// Arena storage for every heap-allocated engine value.
///
/// Objects are never freed by the heap itself: reclaiming them is the host
/// memory manager's business. Handles index into the vectors below.
#[derive(Debug)]
pub struct Heap {
    pub(crate) objects: Vec<Option<ObjectHeapData>>,
    pub(crate) strings: Vec<Option<StringHeapData>>,
    string_lookup: HashMap<Wtf8Buf, String>,
    #[cfg(feature = "weak-refs")]
    pub(crate) weak_collections: Vec<Option<WeakCollectionHeapData>>,
}

/// The heap slot behind an [`Object`] handle.
///
/// The backend is a mutable single-owner slot: array density conversion and
/// lazy initialization replace it in place, and every holder of the handle
/// observes the replacement.
#[derive(Debug)]
pub struct ObjectHeapData {
    pub(crate) backend: Backend,
    /// Weak collections holding this object as a key. Not an ownership edge.
    #[cfg(feature = "weak-refs")]
    pub(crate) weak_registry: Option<WeakRegistry>,
}

impl ObjectHeapData {
    pub(crate) fn new(backend: Backend) -> Self {
        Self {
            backend,
            #[cfg(feature = "weak-refs")]
            weak_registry: None,
        }
    }
}

pub trait CreateHeapData<T, F> {
    /// Creates a [`Value`](crate::ecmascript::types::Value) from the given
    /// data. Allocating the data is **not** guaranteed.
    fn create(&mut self, data: T) -> F;
}

impl CreateHeapData<Backend, Object> for Heap {
    fn create(&mut self, data: Backend) -> Object {
        self.objects.push(Some(ObjectHeapData::new(data)));
        Object::from(ObjectIndex::last(&self.objects))
    }
}

#[cfg(feature = "weak-refs")]
impl CreateHeapData<WeakCollectionHeapData, WeakCollection> for Heap {
    fn create(&mut self, data: WeakCollectionHeapData) -> WeakCollection {
        self.weak_collections.push(Some(data));
        WeakCollection::from(WeakCollectionIndex::last(&self.weak_collections))
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

impl Heap {
    pub fn new() -> Self {
        let mut heap = Self {
            objects: Vec::with_capacity(1024),
            strings: Vec::with_capacity(BUILTIN_STRINGS_LIST.len() * 2),
            string_lookup: HashMap::with_capacity(BUILTIN_STRINGS_LIST.len() * 2),
            #[cfg(feature = "weak-refs")]
            weak_collections: Vec::new(),
        };
        // Builtin strings occupy the first string slots in declaration order.
        for builtin in BUILTIN_STRINGS_LIST {
            heap.intern_str(builtin);
        }
        heap
    }

    /// Returns the unique string handle for the given contents, allocating it
    /// on first use.
    pub(crate) fn intern_str(&mut self, str: &str) -> String {
        let data = Wtf8Buf::from_str(str);
        if let Some(&string) = self.string_lookup.get(&data) {
            return string;
        }
        self.strings.push(Some(StringHeapData::new(data.clone())));
        let string = String::from(StringIndex::last(&self.strings));
        self.string_lookup.insert(data, string);
        string
    }
}

impl Index<Object> for Heap {
    type Output = ObjectHeapData;

    fn index(&self, index: Object) -> &Self::Output {
        self.objects
            .get(index.get_index())
            .expect("Object out of bounds")
            .as_ref()
            .expect("Object slot empty")
    }
}

impl IndexMut<Object> for Heap {
    fn index_mut(&mut self, index: Object) -> &mut Self::Output {
        self.objects
            .get_mut(index.get_index())
            .expect("Object out of bounds")
            .as_mut()
            .expect("Object slot empty")
    }
}

impl Index<String> for Heap {
    type Output = StringHeapData;

    fn index(&self, index: String) -> &Self::Output {
        self.strings
            .get(index.get_index())
            .expect("String out of bounds")
            .as_ref()
            .expect("String slot empty")
    }
}

impl Index<Object> for Agent {
    type Output = ObjectHeapData;

    fn index(&self, index: Object) -> &Self::Output {
        &self.heap[index]
    }
}

impl IndexMut<Object> for Agent {
    fn index_mut(&mut self, index: Object) -> &mut Self::Output {
        &mut self.heap[index]
    }
}

impl Index<String> for Agent {
    type Output = StringHeapData;

    fn index(&self, index: String) -> &Self::Output {
        &self.heap[index]
    }
}

#[cfg(feature = "weak-refs")]
impl Index<WeakCollection> for Agent {
    type Output = WeakCollectionHeapData;

    fn index(&self, index: WeakCollection) -> &Self::Output {
        self.heap
            .weak_collections
            .get(index.get_index())
            .expect("WeakCollection out of bounds")
            .as_ref()
            .expect("WeakCollection slot empty")
    }
}

#[cfg(feature = "weak-refs")]
impl IndexMut<WeakCollection> for Agent {
    fn index_mut(&mut self, index: WeakCollection) -> &mut Self::Output {
        self.heap
            .weak_collections
            .get_mut(index.get_index())
            .expect("WeakCollection out of bounds")
            .as_mut()
            .expect("WeakCollection slot empty")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn interned_strings_share_handles() {
        let mut heap = Heap::new();
        let builtin_count = heap.strings.len();
        let foo = heap.intern_str("foo");
        let bar = heap.intern_str("bar");
        assert_ne!(foo, bar);
        assert_eq!(heap.intern_str("foo"), foo);
        assert_eq!(heap.strings.len(), builtin_count + 2);
    }
}
