// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::collections::BTreeMap;
use std::io;

use bytecheck::CheckBytes;
use rkyv::{Archive, Deserialize, Infallible, Serialize};
use undertow_uplink::{ClassHash, ContractId, Felt};

use crate::Error;

const CONTRACT_DOMAIN: &[u8] = b"contract";
const STORAGE_DOMAIN: &[u8] = b"storage";

/// The full state of the contracts at a point in time: which contract is
/// deployed with which class, and what each contract's storage holds.
///
/// Storage keys holding zero are never kept, so a key that was written back
/// to zero and a key never written hash the same.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Commit {
    contracts: BTreeMap<ContractId, ClassHash>,
    storage: BTreeMap<ContractId, BTreeMap<Felt, Felt>>,
}

impl Commit {
    pub fn class_of(&self, contract: &ContractId) -> Option<ClassHash> {
        self.contracts.get(contract).copied()
    }

    pub fn contract_deployed(&self, contract: &ContractId) -> bool {
        self.contracts.contains_key(contract)
    }

    pub fn read(&self, contract: &ContractId, key: &Felt) -> Felt {
        self.storage
            .get(contract)
            .and_then(|storage| storage.get(key))
            .copied()
            .unwrap_or(Felt::ZERO)
    }

    /// Sets a storage key, returning its previous value if it was not zero.
    pub fn write(
        &mut self,
        contract: ContractId,
        key: Felt,
        value: Felt,
    ) -> Option<Felt> {
        let storage = self.storage.entry(contract).or_default();
        match value.is_zero() {
            true => storage.remove(&key),
            false => storage.insert(key, value),
        }
    }

    pub fn deploy(&mut self, contract: ContractId, class: ClassHash) {
        self.contracts.insert(contract, class);
    }

    pub fn remove_contract(&mut self, contract: &ContractId) {
        self.contracts.remove(contract);
        self.storage.remove(contract);
    }

    /// The state root: a hash of every deployment and every non-zero storage
    /// key, in order.
    pub fn root(&self) -> [u8; 32] {
        tracing::trace!("calculating root started");
        let mut hasher = blake3::Hasher::new();

        for (contract, class) in &self.contracts {
            hasher.update(CONTRACT_DOMAIN);
            hasher.update(contract.as_felt().as_bytes());
            hasher.update(class.as_felt().as_bytes());
        }
        for (contract, storage) in &self.storage {
            for (key, value) in storage {
                hasher.update(STORAGE_DOMAIN);
                hasher.update(contract.as_felt().as_bytes());
                hasher.update(key.as_bytes());
                hasher.update(value.as_bytes());
            }
        }

        let root = hasher.finalize().into();
        tracing::trace!("calculating root finished");
        root
    }

    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let file = CommitFile {
            contracts: self
                .contracts
                .iter()
                .map(|(contract_id, class)| DeployedEntry {
                    contract_id: *contract_id,
                    class: *class,
                })
                .collect(),
            storage: self
                .storage
                .iter()
                .flat_map(|(contract_id, storage)| {
                    storage.iter().map(|(key, value)| StorageEntry {
                        contract_id: *contract_id,
                        key: *key,
                        value: *value,
                    })
                })
                .collect(),
        };

        rkyv::to_bytes::<_, 1024>(&file)
            .map(|bytes| bytes.into_vec())
            .map_err(|err| {
                io::Error::new(io::ErrorKind::Other, err.to_string())
            })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut aligned = rkyv::AlignedVec::with_capacity(bytes.len());
        aligned.extend_from_slice(bytes);

        let archived = rkyv::check_archived_root::<CommitFile>(&aligned)?;
        let file: CommitFile = match archived.deserialize(&mut Infallible) {
            Ok(file) => file,
            Err(never) => match never {},
        };

        let mut commit = Self::default();
        for entry in file.contracts {
            commit.deploy(entry.contract_id, entry.class);
        }
        for entry in file.storage {
            commit.write(entry.contract_id, entry.key, entry.value);
        }
        Ok(commit)
    }
}

/// The form a [`Commit`] takes on disk.
#[derive(Archive, Serialize, Deserialize, Debug)]
#[archive_attr(derive(CheckBytes))]
struct CommitFile {
    contracts: Vec<DeployedEntry>,
    storage: Vec<StorageEntry>,
}

#[derive(Archive, Serialize, Deserialize, Debug, Clone, Copy)]
#[archive_attr(derive(CheckBytes))]
struct DeployedEntry {
    contract_id: ContractId,
    class: ClassHash,
}

#[derive(Archive, Serialize, Deserialize, Debug, Clone, Copy)]
#[archive_attr(derive(CheckBytes))]
struct StorageEntry {
    contract_id: ContractId,
    key: Felt,
    value: Felt,
}
