// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::types::Object;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyHeapData {
    /// Proxy has not been revoked.
    NonRevoked {
        /// [[ProxyTarget]]
        proxy_target: Object,
        /// [[ProxyHandler]]
        proxy_handler: Object,
        /// The target had a [[Call]] internal method at creation.
        callable: bool,
        /// The target had a [[Construct]] internal method at creation.
        constructible: bool,
    },
    /// The Proxy was revoked. A revoked proxy keeps the capabilities it was
    /// created with so that `typeof` and IsCallable stay stable.
    Revoked { callable: bool, constructible: bool },
}

impl ProxyHeapData {
    pub(crate) fn is_callable(&self) -> bool {
        match self {
            ProxyHeapData::NonRevoked { callable, .. } | ProxyHeapData::Revoked { callable, .. } => {
                *callable
            }
        }
    }

    pub(crate) fn is_constructor(&self) -> bool {
        match self {
            ProxyHeapData::NonRevoked { constructible, .. }
            | ProxyHeapData::Revoked { constructible, .. } => *constructible,
        }
    }

    pub(crate) fn is_revoked(&self) -> bool {
        matches!(self, ProxyHeapData::Revoked { .. })
    }

    /// Drops the target and handler. Revoking twice is a no-op.
    pub(crate) fn revoke(&mut self) {
        *self = ProxyHeapData::Revoked {
            callable: self.is_callable(),
            constructible: self.is_constructor(),
        };
    }
}
