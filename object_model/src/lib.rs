// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The ECMAScript object and property model: property stores with
//! prototype resolution, adaptive dense/sparse arrays, and Proxy trap
//! dispatch with invariant enforcement.
//!
//! Every operation takes the [`Agent`](ecmascript::execution::Agent) that
//! owns the heap as its first parameter. Objects are referred to through
//! [`Object`](ecmascript::types::Object) handles which forward each internal
//! method to the backend currently installed in their heap slot.

pub mod ecmascript;
pub mod heap;
