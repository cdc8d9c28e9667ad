// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Contract embedding the read-only call protocol, reading other contracts
//! without letting them change any state.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use undertow_uplink::read_only::{CallDescriptor, Embedded, ReadOnlyCall};
use undertow_uplink::{
    debug, wrap_call, Contract, ContractError, ContractId, Felt, Host,
    Selector, StorageValue,
};

/// Reads a balance from the given balance contract.
pub const READ_BALANCE: Selector = Selector::new("read_balance");
/// Reads a balance, and stores it as this contract's own note.
pub const READ_AND_RECORD: Selector = Selector::new("read_and_record");
/// Calls the given contract read-only, returning its raw return data.
pub const READ_RAW: Selector = Selector::new("read_raw");
/// Calls the given contract read-only, expecting a `u64`.
pub const READ_U64: Selector = Selector::new("read_u64");
/// Calls the given contract read-only, expecting nothing.
pub const READ_UNIT: Selector = Selector::new("read_unit");
/// Stores the given value. Called back by contracts this one calls.
pub const NOTE: Selector = Selector::new("note");
/// Returns the last noted value.
pub const GET_NOTE: Selector = Selector::new("get_note");

const BALANCE_OF: Selector = Selector::new("balance_of");

const NOTED: StorageValue<u64> = StorageValue::new("noted");

type RawCall = (ContractId, Selector, Vec<Felt>);

pub struct SafeReader;

impl SafeReader {
    fn read_balance(
        &self,
        host: &mut dyn Host,
        target: ContractId,
        account: Felt,
    ) -> Result<u64, ContractError> {
        let call = CallDescriptor::new(target, BALANCE_OF, &account);
        let balance = Embedded.read_only_call(host, &call)?;
        debug!(host, "read balance of {account} from {target}: {balance}");
        Ok(balance)
    }

    fn read_and_record(
        &self,
        host: &mut dyn Host,
        target: ContractId,
        account: Felt,
    ) -> Result<u64, ContractError> {
        let balance = self.read_balance(host, target, account)?;
        NOTED.write(host, &balance)?;
        Ok(balance)
    }
}

impl Contract for SafeReader {
    fn call(
        &self,
        host: &mut dyn Host,
        selector: Selector,
        calldata: &[Felt],
    ) -> Result<Vec<Felt>, ContractError> {
        if let Some(result) = Embedded.dispatch(host, selector, calldata) {
            return result;
        }

        match selector {
            READ_BALANCE => wrap_call(calldata, |(target, account)| {
                self.read_balance(host, target, account)
            }),
            READ_AND_RECORD => wrap_call(calldata, |(target, account)| {
                self.read_and_record(host, target, account)
            }),
            READ_RAW => {
                wrap_call(calldata, |(target, selector, args): RawCall| {
                    let call = CallDescriptor::raw(target, selector, args);
                    Embedded.read_only_call_raw(host, &call)
                })
            }
            READ_U64 => {
                wrap_call(calldata, |(target, selector, args): RawCall| {
                    let call = CallDescriptor::raw(target, selector, args);
                    Embedded.read_only_call::<u64>(host, &call)
                })
            }
            READ_UNIT => {
                wrap_call(calldata, |(target, selector, args): RawCall| {
                    let call = CallDescriptor::raw(target, selector, args);
                    Embedded.read_only_call::<()>(host, &call)
                })
            }
            NOTE => wrap_call(calldata, |value| NOTED.write(host, &value)),
            GET_NOTE => wrap_call(calldata, |()| NOTED.read(host)),
            _ => Err(ContractError::entrypoint_not_found()),
        }
    }
}
