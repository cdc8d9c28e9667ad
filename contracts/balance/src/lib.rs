// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Contract keeping account balances, that remembers who read them.
//!
//! Reading a balance is *not* free of side effects: every read bumps a
//! counter, records the reader and emits an event. This makes the contract a
//! good target for checking that read-only calls leave no trace.

#![no_std]

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

use undertow_uplink::{
    wrap_call, Contract, ContractError, ContractId, Felt, Host, Selector,
    StorageMap, StorageValue,
};

/// Returns the balance of an account, recording the read.
pub const BALANCE_OF: Selector = Selector::new("balance_of");
/// Sets the balance of an account.
pub const SET_BALANCE: Selector = Selector::new("set_balance");
/// Returns how many times a balance was read.
pub const READS: Selector = Selector::new("reads");
/// Returns the last contract to read a balance.
pub const LAST_READER: Selector = Selector::new("last_reader");

/// Key of the event emitted on every balance read.
pub const BALANCE_READ: Felt = Felt::from_short_str("BalanceRead");

const BALANCES: StorageMap<Felt, u64> = StorageMap::new("balances");
const READ_COUNT: StorageValue<u64> = StorageValue::new("read_count");
const LAST: StorageValue<ContractId> = StorageValue::new("last_reader");

pub struct Balance;

impl Balance {
    fn balance_of(
        &self,
        host: &mut dyn Host,
        account: Felt,
    ) -> Result<u64, ContractError> {
        let reader = host.caller();

        let reads = READ_COUNT.read(host)? + 1;
        READ_COUNT.write(host, &reads)?;
        LAST.write(host, &reader)?;
        host.emit(vec![BALANCE_READ], vec![reader.as_felt(), account])?;

        BALANCES.read(host, &account)
    }

    fn set_balance(
        &self,
        host: &mut dyn Host,
        account: Felt,
        balance: u64,
    ) -> Result<(), ContractError> {
        BALANCES.write(host, &account, &balance)
    }
}

impl Contract for Balance {
    /// Optionally takes an initial `(account, balance)` pair.
    fn constructor(
        &self,
        host: &mut dyn Host,
        calldata: &[Felt],
    ) -> Result<(), ContractError> {
        if calldata.is_empty() {
            return Ok(());
        }
        wrap_call(calldata, |(account, balance)| {
            self.set_balance(host, account, balance)
        })
        .map(|_| ())
    }

    fn call(
        &self,
        host: &mut dyn Host,
        selector: Selector,
        calldata: &[Felt],
    ) -> Result<Vec<Felt>, ContractError> {
        match selector {
            BALANCE_OF => {
                wrap_call(calldata, |account| self.balance_of(host, account))
            }
            SET_BALANCE => wrap_call(calldata, |(account, balance)| {
                self.set_balance(host, account, balance)
            }),
            READS => wrap_call(calldata, |()| READ_COUNT.read(host)),
            LAST_READER => wrap_call(calldata, |()| LAST.read(host)),
            _ => Err(ContractError::entrypoint_not_found()),
        }
    }
}
