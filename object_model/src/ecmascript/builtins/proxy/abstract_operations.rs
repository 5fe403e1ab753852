// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{Proxy, data::ProxyHeapData};
use crate::ecmascript::{
    execution::{Agent, ExceptionType, JsResult},
    types::Object,
};

/// The target and handler of a proxy that has not been revoked.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NonRevokedProxy {
    pub(crate) target: Object,
    pub(crate) handler: Object,
}

/// ### [10.5.14 ValidateNonRevokedProxy ( proxy )](https://tc39.es/ecma262/#sec-validatenonrevokedproxy)
///
/// The abstract operation ValidateNonRevokedProxy takes argument
/// proxy (a Proxy exotic object) and returns either a normal completion
/// containing unused or a throw completion. It throws a TypeError exception
/// if proxy has been revoked.
pub(crate) fn validate_non_revoked_proxy(
    agent: &mut Agent,
    proxy: Proxy,
) -> JsResult<NonRevokedProxy> {
    match *proxy.data(agent) {
        ProxyHeapData::NonRevoked {
            proxy_target,
            proxy_handler,
            ..
        } => Ok(NonRevokedProxy {
            target: proxy_target,
            handler: proxy_handler,
        }),
        // 1. If proxy.[[ProxyTarget]] is null, throw a TypeError exception.
        // 2. Assert: proxy.[[ProxyHandler]] is not null.
        ProxyHeapData::Revoked { .. } => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot perform operation on a revoked proxy",
        )),
    }
    // 3. Return unused.
}
