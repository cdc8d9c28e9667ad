// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Read-only calls to untrusted contracts.
//!
//! The host has no call primitive that discards the callee's state changes
//! while keeping its return value. A read-only call builds one out of the
//! primitives it does have:
//!
//! 1. The calling contract calls itself on [`EXECUTE_AND_ABORT`].
//! 2. That entry point performs the requested call, and then always fails,
//!    putting the outcome in its panic data. Failing makes the host undo
//!    everything the requested call did.
//! 3. Back in the caller, the panic data is checked for the
//!    [`SUCCESS_MARKER`] and the host's [`ENTRYPOINT_FAILED`] indicator, and
//!    what lies between them is decoded into the expected return type.
//!
//! Every deviation from this (a callee that fails, a payload forged by the
//! callee, exhausting the gas) is fatal to the calling operation. See
//! [`ReadOnlyError`] for the possible faults.
//!
//! Contracts either embed the protocol, routing [`EXECUTE_AND_ABORT`] to
//! [`Embedded::dispatch`], or go through a deployed service contract using
//! [`Service`]. Both are used through the [`ReadOnlyCall`] trait.
//!
//! [`ENTRYPOINT_FAILED`]: crate::ENTRYPOINT_FAILED

use alloc::vec::Vec;

use crate::codec::{self, Codec};
use crate::error::{ContractError, FAILED_TO_DESERIALIZE};
use crate::host::Host;
use crate::types::{ContractId, Felt, Selector};

mod descriptor;
mod executor;
mod fault;
pub mod frame;

pub use descriptor::CallDescriptor;
pub use executor::execute_and_abort;
pub use fault::*;
pub use frame::{FAILURE_MARKER, SUCCESS_MARKER};

/// Entry point running the executor. It must only ever be invoked by the
/// contract exposing it, on itself.
pub const EXECUTE_AND_ABORT: Selector = Selector::new("ro_execute_and_abort");

/// Entry point of a read-only service contract, taking a [`CallDescriptor`]
/// and returning the raw return data of the described call.
pub const READ_ONLY_CALL: Selector = Selector::new("ro_read_only_call");

/// Performs calls whose state changes never persist.
pub trait ReadOnlyCall {
    /// Performs the described call, returning its raw return data.
    fn read_only_call_raw(
        &self,
        host: &mut dyn Host,
        call: &CallDescriptor,
    ) -> Result<Vec<Felt>, ContractError>;

    /// Performs the described call, decoding its return data as `T`.
    fn read_only_call<T: Codec>(
        &self,
        host: &mut dyn Host,
        call: &CallDescriptor,
    ) -> Result<T, ContractError> {
        let body = self.read_only_call_raw(host, call)?;
        Ok(frame::decode_body(&body)?)
    }
}

/// The protocol embedded in the calling contract.
///
/// The contract must route [`EXECUTE_AND_ABORT`] to [`Embedded::dispatch`]:
///
/// ```
/// use undertow_uplink::read_only::{Embedded, ReadOnlyCall};
/// use undertow_uplink::{Contract, ContractError, Felt, Host, Selector};
///
/// struct Reader;
///
/// impl Contract for Reader {
///     fn call(
///         &self,
///         host: &mut dyn Host,
///         selector: Selector,
///         calldata: &[Felt],
///     ) -> Result<Vec<Felt>, ContractError> {
///         if let Some(result) = Embedded.dispatch(host, selector, calldata) {
///             return result;
///         }
///         Err(ContractError::entrypoint_not_found())
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Embedded;

impl Embedded {
    /// Handles the executor entry point, returning `None` for any other
    /// selector.
    pub fn dispatch(
        &self,
        host: &mut dyn Host,
        selector: Selector,
        calldata: &[Felt],
    ) -> Option<Result<Vec<Felt>, ContractError>> {
        match selector {
            EXECUTE_AND_ABORT => Some(Err(execute_and_abort(host, calldata))),
            _ => None,
        }
    }
}

impl ReadOnlyCall for Embedded {
    fn read_only_call_raw(
        &self,
        host: &mut dyn Host,
        call: &CallDescriptor,
    ) -> Result<Vec<Felt>, ContractError> {
        let self_id = host.self_id();
        let calldata = codec::encode(call);

        let payload =
            match host.call_contract(self_id, EXECUTE_AND_ABORT, &calldata) {
                Ok(returned) => {
                    return Err(
                        ReadOnlyError::UninterceptedAbort { returned }.into()
                    )
                }
                Err(ContractError::Panic(payload)) => payload,
                Err(ContractError::OutOfGas) => {
                    return Err(ContractError::OutOfGas)
                }
            };

        let body = frame::unwrap_success(&payload)?;
        Ok(body.to_vec())
    }
}

/// The protocol as offered by a deployed service contract.
///
/// The calling contract keeps no state for it. Faults raised by the service
/// reach the caller with the host's failure indicator appended, and are
/// still classified by [`FaultKind::from_panic_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Service {
    contract: ContractId,
}

impl Service {
    pub const fn new(contract: ContractId) -> Self {
        Self { contract }
    }

    pub const fn contract(&self) -> ContractId {
        self.contract
    }
}

impl ReadOnlyCall for Service {
    fn read_only_call_raw(
        &self,
        host: &mut dyn Host,
        call: &CallDescriptor,
    ) -> Result<Vec<Felt>, ContractError> {
        host.call_contract(self.contract, READ_ONLY_CALL, &codec::encode(call))
    }
}

/// Handles the entry points of a read-only service contract, returning
/// `None` for any other selector.
pub fn serve(
    host: &mut dyn Host,
    selector: Selector,
    calldata: &[Felt],
) -> Option<Result<Vec<Felt>, ContractError>> {
    match selector {
        READ_ONLY_CALL => {
            let call = match codec::decode_exact::<CallDescriptor>(calldata) {
                Ok(call) => call,
                Err(_) => {
                    return Some(Err(ContractError::Panic(alloc::vec![
                        FAILED_TO_DESERIALIZE
                    ])))
                }
            };
            Some(Embedded.read_only_call_raw(host, &call))
        }
        _ => Embedded.dispatch(host, selector, calldata),
    }
}

/// Performs a read-only call through the embedded protocol, decoding the
/// return data as `T`.
pub fn read_only_call<T: Codec>(
    host: &mut dyn Host,
    call: &CallDescriptor,
) -> Result<T, ContractError> {
    Embedded.read_only_call(host, call)
}
