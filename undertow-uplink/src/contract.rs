// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use alloc::vec;
use alloc::vec::Vec;

use crate::codec::{self, Codec};
use crate::error::{ContractError, FAILED_TO_DESERIALIZE};
use crate::host::Host;
use crate::types::{Felt, Selector};

/// Contract code, as declared to the host.
///
/// A contract holds no state of its own: everything that must outlive a call
/// goes through [`Host::storage_write`]. The same code may back many deployed
/// contracts, each with its own storage.
pub trait Contract: Send + Sync {
    /// Runs once, when a contract of this class is deployed.
    fn constructor(
        &self,
        _host: &mut dyn Host,
        _calldata: &[Felt],
    ) -> Result<(), ContractError> {
        Ok(())
    }

    /// Executes the entry point named by `selector`.
    ///
    /// Returning an error unwinds the call: none of the state changes it made
    /// persist.
    fn call(
        &self,
        host: &mut dyn Host,
        selector: Selector,
        calldata: &[Felt],
    ) -> Result<Vec<Felt>, ContractError>;
}

/// Wrap an entry point with its (de)serializers.
///
/// The calldata must decode into `A` exactly, otherwise the call panics with
/// [`FAILED_TO_DESERIALIZE`].
pub fn wrap_call<A, R, F>(
    calldata: &[Felt],
    f: F,
) -> Result<Vec<Felt>, ContractError>
where
    A: Codec,
    R: Codec,
    F: FnOnce(A) -> Result<R, ContractError>,
{
    let arg: A = codec::decode_exact(calldata)
        .map_err(|_| ContractError::Panic(vec![FAILED_TO_DESERIALIZE]))?;
    let ret = f(arg)?;
    Ok(codec::encode(&ret))
}
