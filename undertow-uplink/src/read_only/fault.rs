// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use alloc::vec::Vec;
use core::fmt::{Display, Formatter};

use crate::codec::DecodeError;
use crate::error::ContractError;
use crate::types::{ContractId, Felt};

/// Tag of a [`ReadOnlyError::RejectedSelfInvocation`].
pub const CALLER_NOT_SELF: Felt =
    Felt::from_short_str("RO: caller is not self");

/// Tag of a [`ReadOnlyError::UninterceptedAbort`].
pub const UNINTERCEPTED_ABORT: Felt =
    Felt::from_short_str("RO: unintercepted abort");

/// Tag of a [`ReadOnlyError::FramingMismatch`].
pub const FRAMING_MISMATCH: Felt =
    Felt::from_short_str("RO: framing mismatch");

/// Tag of a [`ReadOnlyError::DecodeMismatch`].
pub const DECODE_MISMATCH: Felt = Felt::from_short_str("RO: decode mismatch");

/// A fault of the read-only call protocol.
///
/// None of these are recoverable. They reach the calling contract as a
/// [`ContractError::Panic`] whose first felt is the fault's tag, followed by
/// the diagnostic data carried here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOnlyError {
    /// The executor entry point was invoked by a contract other than the one
    /// exposing it.
    RejectedSelfInvocation { caller: ContractId },
    /// The executor entry point returned normally.
    UninterceptedAbort { returned: Vec<Felt> },
    /// The abort data did not carry the success marker and the host's
    /// failure indicator.
    FramingMismatch { payload: Vec<Felt> },
    /// The smuggled return data did not decode into the expected type. The
    /// payload is the whole abort data, marker and indicator included.
    DecodeMismatch {
        payload: Vec<Felt>,
        error: DecodeError,
    },
}

impl ReadOnlyError {
    pub fn kind(&self) -> FaultKind {
        match self {
            Self::RejectedSelfInvocation { .. } => {
                FaultKind::RejectedSelfInvocation
            }
            Self::UninterceptedAbort { .. } => FaultKind::UninterceptedAbort,
            Self::FramingMismatch { .. } => FaultKind::FramingMismatch,
            Self::DecodeMismatch { .. } => FaultKind::DecodeMismatch,
        }
    }
}

impl From<ReadOnlyError> for ContractError {
    fn from(err: ReadOnlyError) -> Self {
        let tag = err.kind().tag();
        let diagnostic = match err {
            ReadOnlyError::RejectedSelfInvocation { caller } => {
                alloc::vec![caller.as_felt()]
            }
            ReadOnlyError::UninterceptedAbort { returned: data }
            | ReadOnlyError::FramingMismatch { payload: data }
            | ReadOnlyError::DecodeMismatch { payload: data, .. } => data,
        };

        let mut data = Vec::with_capacity(diagnostic.len() + 1);
        data.push(tag);
        data.extend(diagnostic);
        ContractError::Panic(data)
    }
}

impl Display for ReadOnlyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::RejectedSelfInvocation { caller } => {
                write!(f, "executor invoked by {caller:#}")
            }
            Self::UninterceptedAbort { returned } => {
                write!(f, "executor returned normally: {returned:?}")
            }
            Self::FramingMismatch { payload } => {
                write!(f, "unexpected abort payload: {payload:?}")
            }
            Self::DecodeMismatch { payload, error } => {
                write!(f, "return data in {payload:?} does not decode: {error}")
            }
        }
    }
}

/// The kind of a [`ReadOnlyError`], recoverable from abort data after the
/// fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    RejectedSelfInvocation,
    UninterceptedAbort,
    FramingMismatch,
    DecodeMismatch,
}

impl FaultKind {
    /// The first felt of the abort data of a fault of this kind.
    pub const fn tag(self) -> Felt {
        match self {
            Self::RejectedSelfInvocation => CALLER_NOT_SELF,
            Self::UninterceptedAbort => UNINTERCEPTED_ABORT,
            Self::FramingMismatch => FRAMING_MISMATCH,
            Self::DecodeMismatch => DECODE_MISMATCH,
        }
    }

    pub fn from_tag(tag: Felt) -> Option<Self> {
        match tag {
            CALLER_NOT_SELF => Some(Self::RejectedSelfInvocation),
            UNINTERCEPTED_ABORT => Some(Self::UninterceptedAbort),
            FRAMING_MISMATCH => Some(Self::FramingMismatch),
            DECODE_MISMATCH => Some(Self::DecodeMismatch),
            _ => None,
        }
    }

    /// Classifies the panic data of a failed call.
    ///
    /// Faults raised by a nested call are recognized too, since the host only
    /// ever appends to panic data.
    pub fn from_panic_data(data: &[Felt]) -> Option<Self> {
        data.first().copied().and_then(Self::from_tag)
    }
}
