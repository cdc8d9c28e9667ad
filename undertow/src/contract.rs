// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use undertow_uplink::{ContractId, Felt};

/// The data needed to deploy a contract.
pub struct ContractData<'a, A> {
    pub(crate) contract_id: Option<ContractId>,
    pub(crate) salt: Felt,
    pub(crate) constructor_arg: Option<&'a A>,
}

// `()` is done on purpose, since by default it should be that the constructor
// takes no argument.
impl<'a> ContractData<'a, ()> {
    /// Build a deploy data structure.
    ///
    /// This function returns a builder that can be used to set optional fields
    /// in contract deployment.
    pub fn builder() -> ContractDataBuilder<'a, ()> {
        ContractDataBuilder {
            contract_id: None,
            salt: Felt::ZERO,
            constructor_arg: None,
        }
    }
}

impl<'a, A> From<ContractDataBuilder<'a, A>> for ContractData<'a, A> {
    fn from(builder: ContractDataBuilder<'a, A>) -> Self {
        builder.build()
    }
}

pub struct ContractDataBuilder<'a, A> {
    contract_id: Option<ContractId>,
    salt: Felt,
    constructor_arg: Option<&'a A>,
}

impl<'a, A> ContractDataBuilder<'a, A> {
    /// Set the deployment contract ID. If not set, the ID is derived from the
    /// class and the salt.
    pub fn contract_id(mut self, id: ContractId) -> Self {
        self.contract_id = Some(id);
        self
    }

    /// Set the salt the contract ID is derived with.
    pub fn salt(mut self, salt: impl Into<Felt>) -> Self {
        self.salt = salt.into();
        self
    }

    /// Set the constructor argument for deployment.
    pub fn constructor_arg<B>(self, arg: &B) -> ContractDataBuilder<B> {
        ContractDataBuilder {
            contract_id: self.contract_id,
            salt: self.salt,
            constructor_arg: Some(arg),
        }
    }

    pub fn build(self) -> ContractData<'a, A> {
        ContractData {
            contract_id: self.contract_id,
            salt: self.salt,
            constructor_arg: self.constructor_arg,
        }
    }
}
