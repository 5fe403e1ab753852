// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cleanup of weak collection entries for unreachable objects.
//!
//! The host memory manager decides when an object is unreachable. It
//! reports that by calling [`Agent::finalize_object`] directly, or from any
//! thread through a [`WeakCleanupQueue`] that the agent drains in
//! [`Agent::run_weak_cleanup`].

use std::sync::{Arc, Mutex, PoisonError};

use ahash::AHashSet;

use super::Agent;
use crate::ecmascript::{builtins::weak_collection::WeakCollection, types::Object};

/// The weak collections an object is a key of.
#[derive(Debug, Default)]
pub struct WeakRegistry {
    collections: AHashSet<WeakCollection>,
}

impl WeakRegistry {
    pub(crate) fn add(&mut self, collection: WeakCollection) {
        self.collections.insert(collection);
    }

    pub(crate) fn remove(&mut self, collection: WeakCollection) {
        self.collections.remove(&collection);
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    fn drain(&mut self) -> impl Iterator<Item = WeakCollection> + '_ {
        self.collections.drain()
    }
}

/// Objects awaiting weak cleanup. Clones share the same queue.
#[derive(Debug, Clone, Default)]
pub struct WeakCleanupQueue(Arc<Mutex<Vec<Object>>>);

impl WeakCleanupQueue {
    /// Schedules `object` for cleanup on the next
    /// [`Agent::run_weak_cleanup`].
    pub fn schedule(&self, object: Object) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(object);
    }

    fn take(&self) -> Vec<Object> {
        std::mem::take(&mut *self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Agent {
    /// A handle for scheduling weak cleanup from outside the agent.
    pub fn weak_cleanup_queue(&self) -> WeakCleanupQueue {
        self.weak_cleanup_queue.clone()
    }

    /// Removes `object` from every weak collection that holds it as a key.
    /// Finalizing an object twice is a no-op. The object's own properties
    /// are not touched.
    pub fn finalize_object(&mut self, object: Object) {
        let Some(mut registry) = self[object].weak_registry.take() else {
            return;
        };
        for collection in registry.drain() {
            self[collection].entries.remove(&object);
        }
    }

    /// Finalizes every object scheduled through the cleanup queue. Returns
    /// the number of objects processed.
    pub fn run_weak_cleanup(&mut self) -> usize {
        let objects = self.weak_cleanup_queue.take();
        if objects.is_empty() {
            return 0;
        }
        log::debug!("running weak cleanup for {} objects", objects.len());
        for object in objects.iter() {
            self.finalize_object(*object);
        }
        objects.len()
    }

    /// Number of weak collections holding `object` as a key.
    pub fn weak_registry_len(&self, object: Object) -> usize {
        self[object]
            .weak_registry
            .as_ref()
            .map_or(0, WeakRegistry::len)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ecmascript::{
        builtins::{
            ordinary_object_create_with_intrinsics,
            weak_collection::{WeakCollection, WeakCollectionKind},
        },
        execution::Options,
        types::Value,
    };

    #[test]
    fn finalizing_twice_is_harmless() {
        let mut agent = Agent::new(Options::default());
        let map = WeakCollection::create(&mut agent, WeakCollectionKind::Map);
        let key = ordinary_object_create_with_intrinsics(&mut agent);
        map.set(&mut agent, key.into(), 1.into()).unwrap();
        assert_eq!(agent.weak_registry_len(key), 1);
        agent.finalize_object(key);
        agent.finalize_object(key);
        assert!(!map.has(&agent, key.into()));
        assert_eq!(map.get(&agent, key.into()), Value::Undefined);
        assert_eq!(agent.weak_registry_len(key), 0);
    }

    #[test]
    fn queue_is_shared_across_threads() {
        let mut agent = Agent::new(Options::default());
        let set = WeakCollection::create(&mut agent, WeakCollectionKind::Set);
        let key = ordinary_object_create_with_intrinsics(&mut agent);
        set.add(&mut agent, key.into()).unwrap();
        let queue = agent.weak_cleanup_queue();
        std::thread::spawn(move || queue.schedule(key))
            .join()
            .unwrap();
        assert_eq!(agent.run_weak_cleanup(), 1);
        assert!(set.is_empty(&agent));
        assert_eq!(agent.run_weak_cleanup(), 0);
    }
}
