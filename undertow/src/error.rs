// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::borrow::Cow;
use std::sync::Arc;
use thiserror::Error;

use undertow_uplink::read_only::FaultKind;
use undertow_uplink::{ClassHash, ContractError, ContractId, DecodeError, Felt};

/// The error type returned by the undertow host.
#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("Class not declared: {0}")]
    ClassNotDeclared(ClassHash),
    #[error("Commit error: {0}")]
    CommitError(Cow<'static, str>),
    #[error("Contract already deployed: {0}")]
    ContractAlreadyDeployed(ContractId),
    #[error("Contract does not exist: {0}")]
    ContractDoesNotExist(ContractId),
    #[error("Failed to decode return data: {0}")]
    DecodeError(DecodeError),
    #[error("OutOfGas")]
    OutOfGas,
    #[error("Panic: {0:?}")]
    Panic(Vec<Felt>),
    #[error(transparent)]
    PersistenceError(Arc<std::io::Error>),
    #[error(transparent)]
    RestoreError(Arc<std::io::Error>),
    #[error("Session error: {0}")]
    SessionError(Cow<'static, str>),
    #[error("ValidationError")]
    ValidationError,
}

impl Error {
    /// The data a contract panicked with, if this is a contract panic.
    pub fn panic_data(&self) -> Option<&[Felt]> {
        match self {
            Self::Panic(data) => Some(data),
            _ => None,
        }
    }

    /// The read-only call fault this error stems from, if any.
    pub fn fault_kind(&self) -> Option<FaultKind> {
        self.panic_data().and_then(FaultKind::from_panic_data)
    }
}

impl From<ContractError> for Error {
    fn from(err: ContractError) -> Self {
        match err {
            ContractError::Panic(data) => Self::Panic(data),
            ContractError::OutOfGas => Self::OutOfGas,
        }
    }
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Self::DecodeError(err)
    }
}

impl<A, B> From<rkyv::validation::CheckArchiveError<A, B>> for Error {
    fn from(_e: rkyv::validation::CheckArchiveError<A, B>) -> Self {
        Error::ValidationError
    }
}
