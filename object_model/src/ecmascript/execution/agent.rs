// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [9.7 Agents](https://tc39.es/ecma262/#sec-agents)

use super::realm::Intrinsics;
#[cfg(feature = "weak-refs")]
use super::weak_registry::WeakCleanupQueue;
use crate::{
    ecmascript::{
        builtins::error::ErrorHeapData,
        types::{Backend, Object, String, Value, initialize_symbol_table},
    },
    heap::{CreateHeapData, Heap},
};

/// Engine configuration.
///
/// The array thresholds are tuning constants: any values keep the observable
/// behaviour of arrays identical, they only decide when storage switches
/// between the dense and sparse representations.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// A dense array only turns sparse when written past its capacity at an
    /// index above this value.
    pub sparse_switch_min_index: u32,
    /// ...and the index divided by the number of occupied slots exceeds this
    /// ratio.
    pub sparse_switch_ratio: u32,
    /// A sparse array is only considered for densification once it holds at
    /// least this many items.
    pub dense_switch_min_items: u32,
    /// A sparse array turns dense when its highest index shifted right by
    /// this amount is below its item count.
    pub dense_switch_shift: u32,
    /// Dense storage doubles its capacity below this size and grows by a
    /// quarter above it.
    pub dense_growth_doubling_limit: usize,
    /// Keeps every array dense. Useful for debugging.
    pub disable_array_switching: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            sparse_switch_min_index: 4096,
            sparse_switch_ratio: 10,
            dense_switch_min_items: 1024,
            dense_switch_shift: 3,
            dense_growth_doubling_limit: 1024,
            disable_array_switching: false,
        }
    }
}

pub type JsResult<T> = std::result::Result<T, JsError>;

/// A thrown language value.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct JsError(pub(crate) Value);

impl JsError {
    pub(crate) fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn value(self) -> Value {
        self.0
    }

    /// The kind of the thrown error, if an engine error object was thrown.
    pub fn exception_type(self, agent: &Agent) -> Option<ExceptionType> {
        let Value::Object(object) = self.0 else {
            return None;
        };
        match &agent[object].backend {
            Backend::Error(data) => Some(data.kind),
            _ => None,
        }
    }

    pub fn message(self, agent: &Agent) -> Option<std::string::String> {
        let Value::Object(object) = self.0 else {
            return None;
        };
        match &agent[object].backend {
            Backend::Error(data) => data
                .message
                .map(|message| message.to_string_lossy(agent).into_owned()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionType {
    Error,
    RangeError,
    ReferenceError,
    SyntaxError,
    TypeError,
}

impl ExceptionType {
    pub fn name(self) -> &'static str {
        match self {
            ExceptionType::Error => "Error",
            ExceptionType::RangeError => "RangeError",
            ExceptionType::ReferenceError => "ReferenceError",
            ExceptionType::SyntaxError => "SyntaxError",
            ExceptionType::TypeError => "TypeError",
        }
    }
}

/// ### [9.7 Agents](https://tc39.es/ecma262/#sec-agents)
///
/// Owns the heap and the intrinsic objects every other operation works with.
#[derive(Debug)]
pub struct Agent {
    pub(crate) heap: Heap,
    pub(crate) options: Options,
    intrinsics: Intrinsics,
    #[cfg(feature = "weak-refs")]
    pub(crate) weak_cleanup_queue: WeakCleanupQueue,
}

impl Default for Agent {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Agent {
    pub fn new(options: Options) -> Self {
        initialize_symbol_table();
        let mut heap = Heap::new();
        let intrinsics = Intrinsics::create(&mut heap);
        let mut agent = Self {
            heap,
            options,
            intrinsics,
            #[cfg(feature = "weak-refs")]
            weak_cleanup_queue: WeakCleanupQueue::default(),
        };
        Intrinsics::initialize(&mut agent);
        agent
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn intrinsics(&self) -> &Intrinsics {
        &self.intrinsics
    }

    /// Creates an error object of the given kind and returns it as a thrown
    /// value.
    pub fn throw_exception(&mut self, kind: ExceptionType, message: &str) -> JsError {
        let message = String::from_str(self, message);
        let prototype = self.intrinsics.error_prototype();
        let error = self
            .heap
            .create(Backend::Error(ErrorHeapData::new(kind, Some(message), prototype)));
        log::trace!("throwing {}: {:?}", kind.name(), error);
        JsError::new(Value::Object(error))
    }

    pub fn throw_exception_with_static_message(
        &mut self,
        kind: ExceptionType,
        message: &'static str,
    ) -> JsError {
        self.throw_exception(kind, message)
    }

    /// Wraps an arbitrary value as a thrown value, as a `throw` statement
    /// would.
    pub fn throw_value(&self, value: Value) -> JsError {
        JsError::new(value)
    }

    pub fn is_error_object(&self, object: Object) -> bool {
        matches!(self[object].backend, Backend::Error(_))
    }
}
