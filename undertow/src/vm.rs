// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::collections::BTreeMap;
use std::fmt::{self, Debug, Formatter};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use tempfile::tempdir;
use undertow_uplink::{ClassHash, Contract};

use crate::session::{Session, SessionData};
use crate::store::ContractStore;
use crate::Error::{self, PersistenceError};

/// The host contracts run on.
///
/// A VM knows the contract classes that were declared to it, and keeps the
/// commits of the contracts' state in its root directory. Sessions spawned
/// from it execute calls on top of one of these commits.
///
/// Classes are not persisted: a VM loaded from an existing directory must
/// have the classes of the contracts in its commits declared again before
/// they can be called.
#[derive(Clone)]
pub struct VM {
    inner: Arc<VMInner>,
}

struct VMInner {
    classes: RwLock<BTreeMap<ClassHash, Arc<dyn Contract>>>,
    store: Arc<ContractStore>,
    // the directory is deleted when dropped
    _tmp_dir: Option<tempfile::TempDir>,
}

impl Debug for VM {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("VM")
            .field("classes", &self.classes())
            .field("store", &self.inner.store)
            .finish()
    }
}

impl VM {
    /// Creates a new `VM`, reading the given `dir`ectory for existing commits
    /// and using it to store new ones.
    ///
    /// # Errors
    /// If the directory contains a commit that is corrupted, or does not
    /// match the root it is named after, an error will be returned.
    pub fn new<P: AsRef<Path>>(root_dir: P) -> Result<Self, Error> {
        tracing::trace!("vm::new");
        let store = ContractStore::new(root_dir)?;
        Ok(Self::with_store(store, None))
    }

    /// Creates a new `VM` using a new temporary directory.
    ///
    /// Any session created with this VM will be able to commit, but the
    /// directory is removed once the VM and all its clones are dropped.
    ///
    /// # Errors
    /// If the directory cannot be created, an error will be returned.
    pub fn ephemeral() -> Result<Self, Error> {
        let tmp = tempdir().map_err(|err| PersistenceError(Arc::new(err)))?;
        let store = ContractStore::new(tmp.path())?;
        Ok(Self::with_store(store, Some(tmp)))
    }

    fn with_store(
        store: ContractStore,
        tmp_dir: Option<tempfile::TempDir>,
    ) -> Self {
        Self {
            inner: Arc::new(VMInner {
                classes: RwLock::new(BTreeMap::new()),
                store: Arc::new(store),
                _tmp_dir: tmp_dir,
            }),
        }
    }

    /// Declares a contract class under the given `label`, returning its
    /// hash. Contracts of the class can then be deployed in any session.
    ///
    /// Declaring a label again replaces the code behind it.
    pub fn declare<C>(&self, label: &str, contract: C) -> ClassHash
    where
        C: 'static + Contract,
    {
        let class = ClassHash::from_label(label.as_bytes());
        tracing::debug!(label, %class, "declared class");

        self.inner
            .classes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(class, Arc::new(contract));

        class
    }

    /// The hashes of all declared classes.
    pub fn classes(&self) -> Vec<ClassHash> {
        self.inner
            .classes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect()
    }

    pub(crate) fn class(&self, class: &ClassHash) -> Option<Arc<dyn Contract>> {
        self.inner
            .classes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(class)
            .cloned()
    }

    /// Spawn a [`Session`].
    ///
    /// # Errors
    /// If base commit is provided but does not exist, an error is returned.
    pub fn session(
        &self,
        data: impl Into<SessionData>,
    ) -> Result<Session, Error> {
        let data = data.into();
        let contract_session = match data.base {
            Some(base) => self.inner.store.session(base).ok_or_else(|| {
                Error::CommitError(
                    format!("No such base commit: {}", hex::encode(base))
                        .into(),
                )
            })?,
            None => self.inner.store.genesis_session(),
        };
        Ok(Session::new(self.clone(), contract_session))
    }

    /// Spawn a [`Session`] with no base commit.
    pub fn genesis_session(&self) -> Session {
        Session::new(self.clone(), self.inner.store.genesis_session())
    }

    /// Return all existing commits.
    pub fn commits(&self) -> Vec<[u8; 32]> {
        self.inner.store.commits()
    }

    /// Deletes the given commit from disk.
    pub fn delete_commit(&self, root: [u8; 32]) -> Result<(), Error> {
        self.inner
            .store
            .delete_commit(root)
            .map_err(|err| PersistenceError(Arc::new(err)))
    }

    /// Return the root directory of the virtual machine.
    ///
    /// This is either the directory passed in by using [`new`], or the
    /// temporary directory created using [`ephemeral`].
    ///
    /// [`new`]: VM::new
    /// [`ephemeral`]: VM::ephemeral
    pub fn root_dir(&self) -> PathBuf {
        self.inner.store.root_dir().to_path_buf()
    }
}
