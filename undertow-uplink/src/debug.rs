// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

#[doc(hidden)]
pub use alloc::format as alloc_format;

/// Formats a message and reports it to the host as debug output.
///
/// ```ignore
/// undertow_uplink::debug!(host, "balance of {account} is {balance}");
/// ```
#[macro_export]
macro_rules! debug {
    ($host:expr, $($tt:tt)*) => {
        $crate::Host::debug(&mut *$host, &$crate::alloc_format!($($tt)*))
    };
}
