// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Build contracts for the `undertow` host.
//!
//! Contracts implement [`Contract`] and talk to the host through [`Host`].
//! Arguments, return values and storage are all sequences of [`Felt`]s,
//! written and read with [`Codec`]. The [`read_only`] module lets a contract
//! call an untrusted contract without letting any of its state changes
//! persist.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

extern crate alloc;

mod types;
pub use types::*;

pub mod codec;
pub use codec::{Codec, DecodeError};

mod error;
pub use error::*;

mod host;
pub use host::*;

mod contract;
pub use contract::*;

mod storage;
pub use storage::*;

mod debug;
#[doc(hidden)]
pub use debug::alloc_format;

pub mod read_only;

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support;
