// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::ordinary::PropertyStore;
use crate::ecmascript::{
    execution::{ExceptionType, hidden},
    types::{BUILTIN_STRING_MEMORY, Object, PropertyKey, String},
};

/// ### [20.5 Error Objects](https://tc39.es/ecma262/#sec-error-objects)
#[derive(Debug)]
pub struct ErrorHeapData {
    pub(crate) store: PropertyStore,
    pub(crate) kind: ExceptionType,
    pub(crate) message: Option<String>,
}

impl ErrorHeapData {
    pub(crate) fn new(kind: ExceptionType, message: Option<String>, prototype: Object) -> Self {
        let mut store = PropertyStore::new(Some(prototype));
        if let Some(message) = message {
            // 3.c. Perform CreateNonEnumerableDataPropertyOrThrow(O, "message", msg).
            store.set(
                PropertyKey::String(BUILTIN_STRING_MEMORY.message),
                hidden(message.into()),
            );
        }
        Self {
            store,
            kind,
            message,
        }
    }
}
