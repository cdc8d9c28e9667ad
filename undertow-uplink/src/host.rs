// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use alloc::vec::Vec;

use crate::codec::{self, Codec};
use crate::error::{ContractError, FAILED_TO_DESERIALIZE};
use crate::types::{ClassHash, ContractId, Felt, Selector};

/// The functions the host makes available to a running contract.
///
/// Every call made through this interface is on behalf of the contract at the
/// top of the call stack. Operations that cost gas return
/// [`ContractError::OutOfGas`] once the frame's allowance is exhausted, after
/// which the frame is considered failed no matter what it returns.
pub trait Host {
    /// Calls `selector` on `contract` with the given `calldata`.
    ///
    /// The called contract gets `93%` of the remaining gas. If it fails, every
    /// state change it made (including the ones made by contracts it called)
    /// is undone, and its panic data is returned followed by
    /// [`ENTRYPOINT_FAILED`].
    ///
    /// [`ENTRYPOINT_FAILED`]: crate::ENTRYPOINT_FAILED
    fn call_contract(
        &mut self,
        contract: ContractId,
        selector: Selector,
        calldata: &[Felt],
    ) -> Result<Vec<Felt>, ContractError>;

    /// Deploys a contract of the given `class`, running its constructor with
    /// `calldata`. The ID is derived from the class and `salt`.
    ///
    /// Failures are reported the same way as those of [`call_contract`], and
    /// a failed deployment leaves no trace.
    ///
    /// [`call_contract`]: Host::call_contract
    fn deploy_contract(
        &mut self,
        class: ClassHash,
        salt: Felt,
        calldata: &[Felt],
    ) -> Result<ContractId, ContractError>;

    /// The contract that called the current one, or
    /// [`ContractId::uninitialized`] if it was called by the host.
    fn caller(&self) -> ContractId;

    /// The ID of the contract currently executing.
    fn self_id(&self) -> ContractId;

    /// Reads the given key of the current contract's storage. Keys never
    /// written read as zero.
    fn storage_read(&mut self, key: Felt) -> Result<Felt, ContractError>;

    /// Writes the given key of the current contract's storage.
    fn storage_write(
        &mut self,
        key: Felt,
        value: Felt,
    ) -> Result<(), ContractError>;

    /// Emits an event on behalf of the current contract.
    fn emit(
        &mut self,
        keys: Vec<Felt>,
        data: Vec<Felt>,
    ) -> Result<(), ContractError>;

    /// The gas limit of the current frame.
    fn limit(&self) -> u64;

    /// The gas spent so far by the current frame.
    fn spent(&self) -> u64;

    /// Reports a debug message to the host.
    fn debug(&mut self, msg: &str);
}

/// Calls a `contract`'s `selector` with the given argument `arg`, decoding
/// the returned felts as `Ret`.
pub fn call<A, Ret>(
    host: &mut dyn Host,
    contract: ContractId,
    selector: Selector,
    arg: &A,
) -> Result<Ret, ContractError>
where
    A: Codec,
    Ret: Codec,
{
    let ret = host.call_contract(contract, selector, &codec::encode(arg))?;
    codec::decode_exact(&ret)
        .map_err(|_| ContractError::Panic(alloc::vec![FAILED_TO_DESERIALIZE]))
}
