// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Storage of the contracts' state, and of its commits.

mod commit;
mod session;

use std::collections::BTreeMap;
use std::fmt::{self, Debug, Formatter};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::{fs, io};

pub(crate) use commit::Commit;
pub use session::{ContractSession, Savepoint};

use crate::Error;

const COMMIT_EXTENSION: &str = "commit";

/// A store for all contract commits.
///
/// Every commit lives in a file named after its root under the store's
/// directory, and is kept in memory once loaded.
pub struct ContractStore {
    root_dir: PathBuf,
    commits: RwLock<BTreeMap<[u8; 32], Arc<Commit>>>,
}

impl Debug for ContractStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractStore")
            .field("root_dir", &self.root_dir)
            .field("commits", &self.commits().len())
            .finish()
    }
}

impl ContractStore {
    /// Loads a new contract store from the given `dir`ectory, reading every
    /// commit found in it.
    ///
    /// # Errors
    /// A directory that cannot be created fails with a
    /// [`PersistenceError`], one that cannot be read or holds a commit whose
    /// contents do not hash to its name with a [`RestoreError`], and a
    /// commit file that is not a commit at all with a [`ValidationError`].
    ///
    /// [`PersistenceError`]: Error::PersistenceError
    /// [`RestoreError`]: Error::RestoreError
    /// [`ValidationError`]: Error::ValidationError
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, Error> {
        let root_dir = dir.as_ref();

        fs::create_dir_all(root_dir)
            .map_err(|err| Error::PersistenceError(Arc::new(err)))?;
        let commits = read_all_commits(root_dir)?;

        Ok(Self {
            root_dir: root_dir.into(),
            commits: RwLock::new(commits),
        })
    }

    /// Create a new [`ContractSession`] with no commit as a base.
    pub fn genesis_session(self: &Arc<Self>) -> ContractSession {
        ContractSession::new(Commit::default(), self.clone())
    }

    /// Create a new [`ContractSession`] with the given `base` commit, if it
    /// exists.
    pub fn session(
        self: &Arc<Self>,
        base: [u8; 32],
    ) -> Option<ContractSession> {
        let commits =
            self.commits.read().unwrap_or_else(PoisonError::into_inner);
        let base = commits.get(&base)?;
        Some(ContractSession::new(Commit::clone(base), self.clone()))
    }

    /// Writes the given state to disk, returning its root.
    pub(crate) fn commit(&self, commit: Commit) -> io::Result<[u8; 32]> {
        let root = commit.root();
        let path = self.commit_path(&root);

        if !path.exists() {
            fs::write(&path, commit.to_bytes()?)?;
            tracing::debug!(root = hex::encode(root), "commit written");
        }

        self.commits
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(root, Arc::new(commit));

        Ok(root)
    }

    /// Returns the roots of the commits in the store.
    pub fn commits(&self) -> Vec<[u8; 32]> {
        self.commits
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect()
    }

    /// Deletes the given commit from disk.
    pub fn delete_commit(&self, root: [u8; 32]) -> io::Result<()> {
        self.commits
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&root);

        let path = self.commit_path(&root);
        if path.exists() {
            fs::remove_file(path)?;
            tracing::debug!(root = hex::encode(root), "commit deleted");
        }

        Ok(())
    }

    /// Return the root directory of the contract store.
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn commit_path(&self, root: &[u8; 32]) -> PathBuf {
        self.root_dir
            .join(format!("{}.{COMMIT_EXTENSION}", hex::encode(root)))
    }
}

fn restore_error(err: io::Error) -> Error {
    Error::RestoreError(Arc::new(err))
}

fn read_all_commits<P: AsRef<Path>>(
    root_dir: P,
) -> Result<BTreeMap<[u8; 32], Arc<Commit>>, Error> {
    let root_dir = root_dir.as_ref();
    let mut commits = BTreeMap::new();

    for entry in fs::read_dir(root_dir).map_err(restore_error)? {
        let path = entry.map_err(restore_error)?.path();

        if path.extension().and_then(|ext| ext.to_str())
            != Some(COMMIT_EXTENSION)
        {
            continue;
        }
        let Some(root) = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(root_from_name)
        else {
            continue;
        };

        let bytes = fs::read(&path).map_err(restore_error)?;
        let commit = Commit::from_bytes(&bytes)?;
        if commit.root() != root {
            return Err(restore_error(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("commit {} does not match its root", path.display()),
            )));
        }

        tracing::trace!(root = hex::encode(root), "commit loaded");
        commits.insert(root, Arc::new(commit));
    }

    Ok(commits)
}

fn root_from_name(name: &str) -> Option<[u8; 32]> {
    let mut root = [0u8; 32];
    hex::decode_to_slice(name, &mut root).ok()?;
    Some(root)
}
