// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use core::fmt::Debug;
use std::{
    hash::{Hash, Hasher},
    marker::PhantomData,
    mem::size_of,
    num::NonZeroU32,
};

use crate::{
    ecmascript::types::{StringHeapData, SymbolData},
    heap::ObjectHeapData,
};
#[cfg(feature = "weak-refs")]
use crate::ecmascript::builtins::weak_collection::WeakCollectionHeapData;

/// A struct containing a non-zero index into an array or
/// vector of `T`s. Due to the non-zero value, the offset
/// in the vector is offset by one.
///
/// The index never owns the data it points to: handles are freely shared
/// between threads even when `T` itself is not.
pub struct BaseIndex<T>(NonZeroU32, PhantomData<fn() -> T>);

const _INDEX_SIZE_IS_U32: () = assert!(size_of::<BaseIndex<()>>() == size_of::<u32>());
const _OPTION_INDEX_SIZE_IS_U32: () =
    assert!(size_of::<Option<BaseIndex<()>>>() == size_of::<u32>());

impl<T> Debug for BaseIndex<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        (self.0.get() - 1).fmt(f)
    }
}

impl<T> Clone for BaseIndex<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for BaseIndex<T> {}

impl<T> PartialEq for BaseIndex<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for BaseIndex<T> {}

impl<T> PartialOrd for BaseIndex<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for BaseIndex<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T> Hash for BaseIndex<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> BaseIndex<T> {
    pub const fn into_index(self) -> usize {
        self.0.get() as usize - 1
    }

    pub const fn into_u32_index(self) -> u32 {
        self.0.get() - 1
    }

    pub const fn from_index(value: usize) -> Self {
        let value = value as u32;
        assert!(value != u32::MAX);
        // SAFETY: Number is not max value and will not overflow to zero.
        // This check is done manually to allow const context.
        Self(unsafe { NonZeroU32::new_unchecked(value + 1) }, PhantomData)
    }

    pub const fn from_u32_index(value: u32) -> Self {
        assert!(value != u32::MAX);
        // SAFETY: Number is not max value and will not overflow to zero.
        // This check is done manually to allow const context.
        Self(unsafe { NonZeroU32::new_unchecked(value + 1) }, PhantomData)
    }

    /// Index of the last element of a heap vector.
    pub fn last(vec: &[Option<T>]) -> Self {
        assert!(!vec.is_empty());
        Self::from_index(vec.len() - 1)
    }
}

pub type ObjectIndex = BaseIndex<ObjectHeapData>;
pub type StringIndex = BaseIndex<StringHeapData>;
pub type SymbolIndex = BaseIndex<SymbolData>;
#[cfg(feature = "weak-refs")]
pub type WeakCollectionIndex = BaseIndex<WeakCollectionHeapData>;
