// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use alloc::vec;

use crate::codec;
use crate::error::{ContractError, FAILED_TO_DESERIALIZE};
use crate::host::Host;
use crate::read_only::{frame, CallDescriptor, ReadOnlyError};
use crate::types::Felt;

/// Performs the described call and aborts with its outcome.
///
/// This never succeeds. Unwinding the frame is what undoes every state
/// change the called contract made, and the abort data is the only channel
/// the outcome leaves through. Only the contract itself may invoke it: any
/// other caller is rejected before the calldata is even looked at.
pub fn execute_and_abort(
    host: &mut dyn Host,
    calldata: &[Felt],
) -> ContractError {
    let caller = host.caller();
    if caller != host.self_id() {
        return ReadOnlyError::RejectedSelfInvocation { caller }.into();
    }

    let call: CallDescriptor = match codec::decode_exact(calldata) {
        Ok(call) => call,
        Err(_) => return ContractError::Panic(vec![FAILED_TO_DESERIALIZE]),
    };

    let outcome =
        host.call_contract(call.target(), call.selector(), call.calldata());
    frame::smuggle(outcome)
}
