// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Contract reading other contracts through the read-only service, without
//! embedding the protocol itself.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use read_only_service::READ_ONLY_SERVICE_ID;
use undertow_uplink::read_only::{CallDescriptor, ReadOnlyCall, Service};
use undertow_uplink::{
    wrap_call, Contract, ContractError, ContractId, Felt, Host, Selector,
    StorageValue,
};

/// Reads a balance from the given balance contract.
pub const READ_BALANCE: Selector = Selector::new("read_balance");
/// Calls the given contract read-only, returning its raw return data.
pub const READ_RAW: Selector = Selector::new("read_raw");
/// Calls the given contract read-only, expecting a `u64`.
pub const READ_U64: Selector = Selector::new("read_u64");
/// Stores the given value. Called back by contracts this one calls.
pub const NOTE: Selector = Selector::new("note");
/// Returns the last noted value.
pub const GET_NOTE: Selector = Selector::new("get_note");

const BALANCE_OF: Selector = Selector::new("balance_of");

const SERVICE: Service = Service::new(READ_ONLY_SERVICE_ID);

const NOTED: StorageValue<u64> = StorageValue::new("noted");

type RawCall = (ContractId, Selector, Vec<Felt>);

pub struct ServiceReader;

impl Contract for ServiceReader {
    fn call(
        &self,
        host: &mut dyn Host,
        selector: Selector,
        calldata: &[Felt],
    ) -> Result<Vec<Felt>, ContractError> {
        match selector {
            READ_BALANCE => {
                wrap_call(calldata, |(target, account): (ContractId, Felt)| {
                    let call =
                        CallDescriptor::new(target, BALANCE_OF, &account);
                    SERVICE.read_only_call::<u64>(host, &call)
                })
            }
            READ_RAW => {
                wrap_call(calldata, |(target, selector, args): RawCall| {
                    let call = CallDescriptor::raw(target, selector, args);
                    SERVICE.read_only_call_raw(host, &call)
                })
            }
            READ_U64 => {
                wrap_call(calldata, |(target, selector, args): RawCall| {
                    let call = CallDescriptor::raw(target, selector, args);
                    SERVICE.read_only_call::<u64>(host, &call)
                })
            }
            NOTE => wrap_call(calldata, |value| NOTED.write(host, &value)),
            GET_NOTE => wrap_call(calldata, |()| NOTED.read(host)),
            _ => Err(ContractError::entrypoint_not_found()),
        }
    }
}
