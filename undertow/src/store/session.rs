// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::fmt::{self, Debug, Formatter};
use std::io;
use std::sync::Arc;

use undertow_uplink::{ClassHash, ContractId, Felt};

use crate::store::{Commit, ContractStore};

/// A change made to the state during a session, with what is needed to undo
/// it.
#[derive(Debug, Clone, Copy)]
enum Change {
    Deploy(ContractId),
    Write {
        contract: ContractId,
        key: Felt,
        prev: Option<Felt>,
    },
}

/// A position in the changes made by a session, which can later be reverted
/// to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Savepoint(usize);

/// The representation of a session with a [`ContractStore`].
///
/// A session works on its own copy of the commit it was started from, and
/// keeps a journal of every change made to it so any suffix of them can be
/// undone.
///
/// The modifications are kept in memory and are only persisted to disk on a
/// call to [`commit`].
///
/// [`commit`]: ContractSession::commit
pub struct ContractSession {
    state: Commit,
    changes: Vec<Change>,
    store: Arc<ContractStore>,
}

impl Debug for ContractSession {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractSession")
            .field("state", &self.state)
            .field("changes", &self.changes.len())
            .finish()
    }
}

impl ContractSession {
    pub(crate) fn new(base: Commit, store: Arc<ContractStore>) -> Self {
        Self {
            state: base,
            changes: Vec::new(),
            store,
        }
    }

    pub fn savepoint(&self) -> Savepoint {
        Savepoint(self.changes.len())
    }

    /// Undoes every change made since the given savepoint, newest first.
    pub fn revert(&mut self, savepoint: Savepoint) {
        let Savepoint(len) = savepoint;
        if len < self.changes.len() {
            tracing::trace!(changes = self.changes.len() - len, "reverting");
        }

        while self.changes.len() > len {
            match self.changes.pop() {
                Some(Change::Deploy(contract)) => {
                    self.state.remove_contract(&contract);
                }
                Some(Change::Write {
                    contract,
                    key,
                    prev,
                }) => {
                    self.state.write(contract, key, prev.unwrap_or_default());
                }
                None => break,
            }
        }
    }

    /// Forgets the journal, making every change so far permanent for the
    /// session.
    pub fn settle(&mut self) {
        self.changes.clear();
    }

    pub fn contract_deployed(&self, contract: &ContractId) -> bool {
        self.state.contract_deployed(contract)
    }

    pub fn class_of(&self, contract: &ContractId) -> Option<ClassHash> {
        self.state.class_of(contract)
    }

    pub fn deploy(&mut self, contract: ContractId, class: ClassHash) {
        self.state.deploy(contract, class);
        self.changes.push(Change::Deploy(contract));
    }

    pub fn read(&self, contract: &ContractId, key: &Felt) -> Felt {
        self.state.read(contract, key)
    }

    pub fn write(&mut self, contract: ContractId, key: Felt, value: Felt) {
        let prev = self.state.write(contract, key, value);
        self.changes.push(Change::Write {
            contract,
            key,
            prev,
        });
    }

    /// Returns the root that the session would have if one would decide to
    /// commit it.
    pub fn root(&self) -> [u8; 32] {
        self.state.root()
    }

    /// Commits the state to the store, returning its root.
    pub fn commit(self) -> io::Result<[u8; 32]> {
        self.store.commit(self.state)
    }
}
