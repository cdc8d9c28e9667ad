// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::{Display, Formatter};

use crate::types::Felt;

/// Appended by the host to the panic data of every call that fails, when the
/// failure is handed back to the calling contract.
pub const ENTRYPOINT_FAILED: Felt = Felt::from_short_str("ENTRYPOINT_FAILED");

/// Panic word describing a frame that exhausted its gas.
pub const OUT_OF_GAS: Felt = Felt::from_short_str("Out of gas");

/// Panic word for a selector the contract does not expose.
pub const ENTRYPOINT_NOT_FOUND: Felt =
    Felt::from_short_str("ENTRYPOINT_NOT_FOUND");

/// Panic word for calldata that does not decode into the entry point's
/// argument.
pub const FAILED_TO_DESERIALIZE: Felt =
    Felt::from_short_str("Failed to deserialize param");

/// Panic word for a call to an ID with no contract behind it.
pub const CONTRACT_NOT_DEPLOYED: Felt =
    Felt::from_short_str("CONTRACT_NOT_DEPLOYED");

/// Panic word for a deployment of a class the host does not know.
pub const CLASS_NOT_DECLARED: Felt =
    Felt::from_short_str("CLASS_NOT_DECLARED");

/// Panic word for a deployment to an ID that is already taken.
pub const CONTRACT_ALREADY_DEPLOYED: Felt =
    Felt::from_short_str("CONTRACT_ALREADY_DEPLOYED");

/// Panic word for a call nesting deeper than the host allows.
pub const MAX_DEPTH_EXCEEDED: Felt = Felt::from_short_str("Max call depth");

/// The error a contract aborts its execution with.
///
/// Returning it from an entry point unwinds the current frame: the host
/// discards every state change made by the frame and the calls it made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    /// The contract panicked with the given data.
    Panic(Vec<Felt>),
    /// The frame ran out of gas.
    OutOfGas,
}

impl ContractError {
    /// Panics with a single short string.
    ///
    /// # Panics
    /// If `msg` is not a valid short string.
    pub fn msg(msg: &str) -> Self {
        Self::Panic(vec![Felt::from_short_str(msg)])
    }

    /// Panics with the given data.
    pub fn panic<I: IntoIterator<Item = Felt>>(data: I) -> Self {
        Self::Panic(data.into_iter().collect())
    }

    pub fn entrypoint_not_found() -> Self {
        Self::Panic(vec![ENTRYPOINT_NOT_FOUND])
    }

    /// Returns the data describing the failure.
    pub fn panic_data(&self) -> Vec<Felt> {
        match self {
            Self::Panic(data) => data.clone(),
            Self::OutOfGas => vec![OUT_OF_GAS],
        }
    }

    /// Consumes the error, returning the data describing the failure.
    pub fn into_panic_data(self) -> Vec<Felt> {
        match self {
            Self::Panic(data) => data,
            Self::OutOfGas => vec![OUT_OF_GAS],
        }
    }

    /// The shape a failure takes once it crossed a call boundary: the panic
    /// data followed by [`ENTRYPOINT_FAILED`].
    pub fn into_failed_entry_point(self) -> Self {
        let mut data = self.into_panic_data();
        data.push(ENTRYPOINT_FAILED);
        Self::Panic(data)
    }
}

impl Display for ContractError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            ContractError::Panic(data) => write!(f, "CONTRACT PANIC: {data:?}"),
            ContractError::OutOfGas => write!(f, "OUT OF GAS"),
        }
    }
}
