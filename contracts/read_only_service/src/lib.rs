// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Contract offering read-only calls to any contract that asks.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use const_decoder::Decoder;
use undertow_uplink::read_only::serve;
use undertow_uplink::{
    Contract, ContractError, ContractId, Felt, Host, Selector,
};

pub use undertow_uplink::read_only::READ_ONLY_CALL;

/// The ID the service is deployed under.
pub const READ_ONLY_SERVICE_ID: ContractId = ContractId::from_bytes(
    Decoder::Hex.decode(
        b"00524541445f4f4e4c595f534552564943450000000000000000000000000001",
    ),
);

pub struct ReadOnlyService;

impl Contract for ReadOnlyService {
    fn call(
        &self,
        host: &mut dyn Host,
        selector: Selector,
        calldata: &[Felt],
    ) -> Result<Vec<Felt>, ContractError> {
        serve(host, selector, calldata)
            .unwrap_or_else(|| Err(ContractError::entrypoint_not_found()))
    }
}
