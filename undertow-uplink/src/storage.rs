// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Typed views over a contract's felt-keyed storage.
//!
//! A value is stored under a base address derived from its variable name
//! (and, for maps, the encoded key): the base holds the encoded length and
//! the following slots hold the encoding itself. A length of zero reads back
//! as the type's default. Overwriting a value with a shorter one zeroes the
//! slots past its end.

use alloc::vec::Vec;
use core::marker::PhantomData;

use crate::codec::{self, Codec};
use crate::error::{ContractError, FAILED_TO_DESERIALIZE};
use crate::host::Host;
use crate::types::Felt;

/// Address of the `index`th slot of the value stored under `name` and `keys`.
pub fn storage_address(name: &str, keys: &[Felt], index: u32) -> Felt {
    let mut hasher = blake3::Hasher::new();
    hasher.update(name.as_bytes());
    for key in keys {
        hasher.update(key.as_bytes());
    }
    hasher.update(&index.to_be_bytes());
    Felt::from_hash(hasher.finalize().into())
}

fn stored_len(
    host: &mut dyn Host,
    name: &str,
    keys: &[Felt],
) -> Result<u32, ContractError> {
    host.storage_read(storage_address(name, keys, 0))?
        .to_u128()
        .and_then(|len| u32::try_from(len).ok())
        .ok_or_else(|| ContractError::msg("Corrupted storage length"))
}

fn read_slots<T: Codec + Default>(
    host: &mut dyn Host,
    name: &str,
    keys: &[Felt],
) -> Result<T, ContractError> {
    let len = stored_len(host, name, keys)?;

    if len == 0 {
        return Ok(T::default());
    }

    let mut felts = Vec::with_capacity(len as usize);
    for index in 1..=len {
        felts.push(host.storage_read(storage_address(name, keys, index))?);
    }

    codec::decode_exact(&felts)
        .map_err(|_| ContractError::Panic(alloc::vec![FAILED_TO_DESERIALIZE]))
}

fn write_slots<T: Codec>(
    host: &mut dyn Host,
    name: &str,
    keys: &[Felt],
    value: &T,
) -> Result<(), ContractError> {
    let felts = codec::encode(value);
    let len = felts.len() as u32;
    let old_len = stored_len(host, name, keys)?;

    let len_address = storage_address(name, keys, 0);
    host.storage_write(len_address, Felt::from_u64(len as u64))?;
    for (index, felt) in (1..=len).zip(felts) {
        host.storage_write(storage_address(name, keys, index), felt)?;
    }
    // a shorter value leaves no slots of the longer one behind
    for index in len + 1..=old_len {
        host.storage_write(storage_address(name, keys, index), Felt::ZERO)?;
    }
    Ok(())
}

/// A single typed storage variable.
#[derive(Debug, Clone, Copy)]
pub struct StorageValue<T> {
    name: &'static str,
    _marker: PhantomData<T>,
}

impl<T: Codec + Default> StorageValue<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub fn read(&self, host: &mut dyn Host) -> Result<T, ContractError> {
        read_slots(host, self.name, &[])
    }

    pub fn write(
        &self,
        host: &mut dyn Host,
        value: &T,
    ) -> Result<(), ContractError> {
        write_slots(host, self.name, &[], value)
    }
}

/// A typed storage mapping from `K` to `V`.
#[derive(Debug, Clone, Copy)]
pub struct StorageMap<K, V> {
    name: &'static str,
    _marker: PhantomData<(K, V)>,
}

impl<K: Codec, V: Codec + Default> StorageMap<K, V> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub fn read(
        &self,
        host: &mut dyn Host,
        key: &K,
    ) -> Result<V, ContractError> {
        read_slots(host, self.name, &codec::encode(key))
    }

    pub fn write(
        &self,
        host: &mut dyn Host,
        key: &K,
        value: &V,
    ) -> Result<(), ContractError> {
        write_slots(host, self.name, &codec::encode(key), value)
    }
}
