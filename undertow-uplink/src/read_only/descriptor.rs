// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use alloc::vec::Vec;

use crate::codec::{self, Codec, DecodeError};
use crate::types::{ContractId, Felt, Selector};

/// A fully specified external call: the contract to call, the entry point to
/// call on it, and the encoded argument.
///
/// Descriptors are immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallDescriptor {
    target: ContractId,
    selector: Selector,
    calldata: Vec<Felt>,
}

impl CallDescriptor {
    /// Describes a call passing `arg` to `selector` on `target`.
    pub fn new<A: Codec>(
        target: ContractId,
        selector: Selector,
        arg: &A,
    ) -> Self {
        Self::raw(target, selector, codec::encode(arg))
    }

    /// Describes a call with already encoded calldata.
    pub fn raw(
        target: ContractId,
        selector: Selector,
        calldata: Vec<Felt>,
    ) -> Self {
        Self {
            target,
            selector,
            calldata,
        }
    }

    pub fn target(&self) -> ContractId {
        self.target
    }

    pub fn selector(&self) -> Selector {
        self.selector
    }

    pub fn calldata(&self) -> &[Felt] {
        &self.calldata
    }
}

impl Codec for CallDescriptor {
    fn encode(&self, out: &mut Vec<Felt>) {
        self.target.encode(out);
        self.selector.encode(out);
        self.calldata.encode(out);
    }

    fn decode(input: &mut &[Felt]) -> Result<Self, DecodeError> {
        Ok(Self {
            target: ContractId::decode(input)?,
            selector: Selector::decode(input)?,
            calldata: Vec::decode(input)?,
        })
    }
}
