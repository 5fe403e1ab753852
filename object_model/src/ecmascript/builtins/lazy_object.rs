// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Objects whose properties are populated on first use.

use super::ordinary::PropertyStore;
use crate::{
    ecmascript::{
        execution::{Agent, JsResult},
        types::{Backend, Object},
    },
    heap::CreateHeapData,
};

/// Populates a freshly materialized object. Runs once, with the object
/// already backed by an empty ordinary store.
pub type LazyInit = fn(&mut Agent, Object) -> JsResult<()>;

#[derive(Debug)]
pub struct LazyObjectHeapData {
    pub(crate) prototype: Option<Object>,
    init: LazyInit,
}

/// Allocates a placeholder object. The first internal method called on it
/// swaps in an ordinary property store and runs `init`.
pub fn create_lazy_object(agent: &mut Agent, prototype: Option<Object>, init: LazyInit) -> Object {
    agent
        .heap
        .create(Backend::Lazy(LazyObjectHeapData { prototype, init }))
}

pub(crate) fn materialize_lazy_object(agent: &mut Agent, object: Object) -> JsResult<()> {
    let Backend::Lazy(LazyObjectHeapData { prototype, init }) = agent[object].backend else {
        return Ok(());
    };
    log::debug!("materializing lazy object {object:?}");
    // The backend is replaced before running init so that init can operate
    // on the object through its internal methods.
    agent[object].backend = Backend::Ordinary(PropertyStore::new(prototype));
    init(agent, object)
}
