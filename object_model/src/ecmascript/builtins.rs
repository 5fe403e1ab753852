// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod array;
pub mod builtin_function;
pub mod error;
pub mod for_in_iterator;
pub mod host_object;
pub mod lazy_object;
pub mod ordinary;
pub mod proxy;
#[cfg(feature = "reflect")]
pub mod reflection;
#[cfg(feature = "weak-refs")]
pub mod weak_collection;

pub use array::{Array, array_create, create_array_from_list};
pub use builtin_function::{
    ArgumentsList, Behaviour, BuiltinFunctionArgs, ConstructorFn, NativeClosure, RegularFn,
    create_builtin_function,
};
pub use for_in_iterator::ForInIterator;
pub use host_object::{HostObject, HostObjectAdapter, create_host_object};
pub use lazy_object::{LazyInit, create_lazy_object};
pub use ordinary::{
    OrdinaryObject, ordinary_object_create_with_intrinsics, ordinary_object_create_with_prototype,
};
pub use proxy::{
    Proxy, ProxyTrapConfig, create_revocable_proxy, new_native_proxy, proxy_create,
    proxy_revocable,
};
#[cfg(feature = "reflect")]
pub use reflection::create_reflect_object;
