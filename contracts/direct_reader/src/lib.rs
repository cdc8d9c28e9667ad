// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Contract calling other contracts directly, letting their state changes
//! persist.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use undertow_uplink::{
    call, wrap_call, Contract, ContractError, ContractId, Felt, Host,
    Selector, StorageValue,
};

/// Reads a balance from the given balance contract.
pub const READ_BALANCE: Selector = Selector::new("read_balance");
/// Calls the given contract with raw calldata, returning the raw result.
pub const CALL_RAW: Selector = Selector::new("call_raw");
/// Stores the given value. Called back by contracts this one calls.
pub const NOTE: Selector = Selector::new("note");
/// Returns the last noted value.
pub const GET_NOTE: Selector = Selector::new("get_note");

const BALANCE_OF: Selector = Selector::new("balance_of");

const NOTED: StorageValue<u64> = StorageValue::new("noted");

pub struct DirectReader;

impl Contract for DirectReader {
    fn call(
        &self,
        host: &mut dyn Host,
        selector: Selector,
        calldata: &[Felt],
    ) -> Result<Vec<Felt>, ContractError> {
        match selector {
            READ_BALANCE => {
                wrap_call(calldata, |(target, account): (ContractId, Felt)| {
                    call::<_, u64>(host, target, BALANCE_OF, &account)
                })
            }
            CALL_RAW => wrap_call(
                calldata,
                |(target, selector, calldata): (
                    ContractId,
                    Selector,
                    Vec<Felt>,
                )| { host.call_contract(target, selector, &calldata) },
            ),
            NOTE => wrap_call(calldata, |value| NOTED.write(host, &value)),
            GET_NOTE => wrap_call(calldata, |()| NOTED.read(host)),
            _ => Err(ContractError::entrypoint_not_found()),
        }
    }
}
