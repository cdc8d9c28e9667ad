// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Contract misbehaving in every way a callee of a read-only call might.

#![no_std]

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

use undertow_uplink::read_only::{
    CallDescriptor, EXECUTE_AND_ABORT, SUCCESS_MARKER,
};
use undertow_uplink::{
    call, debug, wrap_call, ClassHash, Contract, ContractError, ContractId,
    Felt, Host, Selector, StorageValue, ENTRYPOINT_FAILED,
};

/// Writes to storage, emits an event, reports the write to the host and
/// returns the given value.
pub const WRITE_AND_RETURN: Selector = Selector::new("write_and_return");
/// Calls `note` on its caller with the given value.
pub const CALL_BACK: Selector = Selector::new("call_back");
/// Panics.
pub const PANIC: Selector = Selector::new("panic");
/// Fails with panic data shaped like a successful read-only outcome.
pub const FORGE: Selector = Selector::new("forge");
/// Succeeds, returning data shaped like a successful read-only outcome.
pub const FORGE_RETURN: Selector = Selector::new("forge_return");
/// Reads storage until it runs out of gas, then pretends nothing happened.
pub const BURN: Selector = Selector::new("burn");
/// Invokes the executor entry point of another contract directly.
pub const HIJACK: Selector = Selector::new("hijack");
/// Deploys a contract.
pub const DEPLOY: Selector = Selector::new("deploy");
/// Returns its calldata verbatim.
pub const ECHO: Selector = Selector::new("echo");
/// Returns the last value written by `write_and_return`.
pub const WRITTEN: Selector = Selector::new("written");

/// The selector `call_back` calls on its caller.
pub const NOTE: Selector = Selector::new("note");

/// Key of the event emitted by `write_and_return`.
pub const WROTE: Felt = Felt::from_short_str("Wrote");

/// The value a forged payload claims was returned.
pub const FORGED_VALUE: u64 = 42;

const INTRUDER_PANIC: &str = "intruder panic";

const VALUE: StorageValue<u64> = StorageValue::new("value");

fn forged_payload() -> Vec<Felt> {
    vec![SUCCESS_MARKER, Felt::from_u64(FORGED_VALUE), ENTRYPOINT_FAILED]
}

pub struct Intruder;

impl Intruder {
    fn write_and_return(
        &self,
        host: &mut dyn Host,
        value: u64,
    ) -> Result<u64, ContractError> {
        VALUE.write(host, &value)?;
        host.emit(vec![WROTE], vec![Felt::from_u64(value)])?;
        debug!(host, "wrote {value}");
        Ok(value)
    }

    fn call_back(
        &self,
        host: &mut dyn Host,
        value: u64,
    ) -> Result<(), ContractError> {
        let caller = host.caller();
        call(host, caller, NOTE, &value)
    }

    fn burn(&self, host: &mut dyn Host) -> Result<(), ContractError> {
        let mut key = 0u64;
        loop {
            if host.storage_read(Felt::from_u64(key)).is_err() {
                // swallowed, the host still knows
                return Ok(());
            }
            key += 1;
        }
    }

    fn hijack(
        &self,
        host: &mut dyn Host,
        victim: ContractId,
        call: CallDescriptor,
    ) -> Result<Vec<Felt>, ContractError> {
        let calldata = undertow_uplink::codec::encode(&call);
        host.call_contract(victim, EXECUTE_AND_ABORT, &calldata)
    }

    fn deploy(
        &self,
        host: &mut dyn Host,
        class: ClassHash,
        salt: Felt,
    ) -> Result<ContractId, ContractError> {
        host.deploy_contract(class, salt, &[])
    }
}

impl Contract for Intruder {
    fn call(
        &self,
        host: &mut dyn Host,
        selector: Selector,
        calldata: &[Felt],
    ) -> Result<Vec<Felt>, ContractError> {
        match selector {
            WRITE_AND_RETURN => wrap_call(calldata, |value| {
                self.write_and_return(host, value)
            }),
            CALL_BACK => {
                wrap_call(calldata, |value| self.call_back(host, value))
            }
            PANIC => wrap_call(calldata, |()| -> Result<(), _> {
                Err(ContractError::msg(INTRUDER_PANIC))
            }),
            FORGE => wrap_call(calldata, |()| -> Result<(), _> {
                Err(ContractError::Panic(forged_payload()))
            }),
            FORGE_RETURN => Ok(forged_payload()),
            BURN => wrap_call(calldata, |()| self.burn(host)),
            HIJACK => wrap_call(calldata, |(victim, call)| {
                self.hijack(host, victim, call)
            }),
            DEPLOY => wrap_call(calldata, |(class, salt)| {
                self.deploy(host, class, salt)
            }),
            ECHO => Ok(calldata.to_vec()),
            WRITTEN => wrap_call(calldata, |()| VALUE.read(host)),
            _ => Err(ContractError::entrypoint_not_found()),
        }
    }
}
