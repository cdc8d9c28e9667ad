// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Layout of the data the executor aborts with.
//!
//! When the external call succeeds with return data `R` the executor aborts
//! with `[SUCCESS_MARKER, ...R]`; when it fails with data `E` it aborts with
//! `[FAILURE_MARKER, ...E]`. By the time the front-end sees either, the host
//! has appended [`ENTRYPOINT_FAILED`].

use alloc::vec::Vec;

use crate::codec::{self, Codec};
use crate::error::{ContractError, ENTRYPOINT_FAILED};
use crate::read_only::ReadOnlyError;
use crate::types::Felt;

/// Leads the abort data of an executor whose external call succeeded.
pub const SUCCESS_MARKER: Felt = Felt::from_short_str("RO_CALL_SUCCESS");

/// Leads the abort data of an executor whose external call failed.
pub const FAILURE_MARKER: Felt = Felt::from_short_str("RO_CALL_FAILED");

/// Turns the outcome of the external call into the error the executor
/// unwinds with.
pub fn smuggle(outcome: Result<Vec<Felt>, ContractError>) -> ContractError {
    let (marker, body) = match outcome {
        Ok(ret) => (SUCCESS_MARKER, ret),
        Err(err) => (FAILURE_MARKER, err.into_panic_data()),
    };

    let mut payload = Vec::with_capacity(body.len() + 1);
    payload.push(marker);
    payload.extend(body);
    ContractError::Panic(payload)
}

/// Returns the smuggled return data of a successful external call, as found
/// between the marker and the failure indicator.
///
/// Anything else, including the payload of a failed external call, is a
/// [`ReadOnlyError::FramingMismatch`].
pub fn unwrap_success(payload: &[Felt]) -> Result<&[Felt], ReadOnlyError> {
    match payload {
        [SUCCESS_MARKER, body @ .., ENTRYPOINT_FAILED] => Ok(body),
        _ => Err(ReadOnlyError::FramingMismatch {
            payload: payload.to_vec(),
        }),
    }
}

/// Decodes the smuggled return data, which must span the whole body.
///
/// The body is what [`unwrap_success`] accepted, so on failure the fault
/// reports it framed back into the payload it was taken from.
pub fn decode_body<T: Codec>(body: &[Felt]) -> Result<T, ReadOnlyError> {
    codec::decode_exact(body).map_err(|error| ReadOnlyError::DecodeMismatch {
        payload: frame_success(body),
        error,
    })
}

fn frame_success(body: &[Felt]) -> Vec<Felt> {
    let mut payload = Vec::with_capacity(body.len() + 2);
    payload.push(SUCCESS_MARKER);
    payload.extend_from_slice(body);
    payload.push(ENTRYPOINT_FAILED);
    payload
}
