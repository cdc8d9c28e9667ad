// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use bytecheck::CheckBytes;
use rkyv::{Archive, Deserialize, Serialize};

/// The length of a [`Felt`] in bytes
pub const FELT_BYTES: usize = 32;

/// The maximum number of ASCII characters a short string felt can hold
pub const SHORT_STR_MAX_LEN: usize = 31;

/// The length of [`ContractId`] in bytes
pub const CONTRACT_ID_BYTES: usize = FELT_BYTES;

/// Big-endian bytes of the field modulus `2^251 + 17 * 2^192 + 1`.
const MODULUS: [u8; FELT_BYTES] = [
    0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x11, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
];

/// An element of the Stark field, stored as 32 big-endian bytes.
///
/// All arguments, return values, storage keys and storage values exchanged
/// between contracts and the host are sequences of field elements.
#[derive(
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Clone,
    Copy,
    Default,
    Archive,
    Serialize,
    CheckBytes,
    Deserialize,
)]
#[archive(as = "Self")]
#[repr(C)]
pub struct Felt([u8; FELT_BYTES]);

impl Felt {
    pub const ZERO: Self = Self([0; FELT_BYTES]);
    pub const ONE: Self = Self::from_u64(1);

    /// Creates a felt from a `u64`.
    pub const fn from_u64(value: u64) -> Self {
        Self::from_u128(value as u128)
    }

    /// Creates a felt from a `u128`. Every `u128` fits in the field.
    pub const fn from_u128(value: u128) -> Self {
        let be = value.to_be_bytes();
        let mut bytes = [0u8; FELT_BYTES];
        let mut i = 0;
        while i < be.len() {
            bytes[FELT_BYTES - be.len() + i] = be[i];
            i += 1;
        }
        Self(bytes)
    }

    /// Packs an ASCII string of at most [`SHORT_STR_MAX_LEN`] characters into
    /// a felt, big-endian, the way Cairo short strings are encoded.
    ///
    /// # Panics
    /// If the string is too long or contains non-ASCII characters. In a
    /// `const` context this is a compile time error.
    pub const fn from_short_str(s: &str) -> Self {
        let src = s.as_bytes();
        assert!(
            src.len() <= SHORT_STR_MAX_LEN,
            "short strings hold at most 31 characters"
        );

        let mut bytes = [0u8; FELT_BYTES];
        let offset = FELT_BYTES - src.len();
        let mut i = 0;
        while i < src.len() {
            assert!(src[i].is_ascii(), "short strings must be ASCII");
            bytes[offset + i] = src[i];
            i += 1;
        }
        Self(bytes)
    }

    /// Creates a felt from a digest, clearing its five most significant bits
    /// so the value always lies below the modulus.
    pub const fn from_hash(mut digest: [u8; FELT_BYTES]) -> Self {
        digest[0] &= 0x07;
        Self(digest)
    }

    /// Creates a felt from its big-endian representation, if it lies below
    /// the modulus.
    pub fn from_bytes_be(bytes: [u8; FELT_BYTES]) -> Option<Self> {
        (bytes < MODULUS).then_some(Self(bytes))
    }

    /// Parses a hexadecimal felt, with or without a `0x` prefix. Leading
    /// zeros may be omitted.
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.is_empty() || digits.len() > 2 * FELT_BYTES {
            return None;
        }

        let mut padded = [b'0'; 2 * FELT_BYTES];
        padded[2 * FELT_BYTES - digits.len()..]
            .copy_from_slice(digits.as_bytes());

        let mut bytes = [0u8; FELT_BYTES];
        hex::decode_to_slice(padded, &mut bytes).ok()?;
        Self::from_bytes_be(bytes)
    }

    /// Returns the big-endian bytes of the felt.
    pub const fn to_bytes_be(self) -> [u8; FELT_BYTES] {
        self.0
    }

    /// Returns a reference to the big-endian bytes of the felt.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the value as a `u128` if it fits.
    pub fn to_u128(self) -> Option<u128> {
        let (high, low) = self.0.split_at(FELT_BYTES - 16);
        if high.iter().any(|b| *b != 0) {
            return None;
        }
        let mut be = [0u8; 16];
        be.copy_from_slice(low);
        Some(u128::from_be_bytes(be))
    }

    /// Decodes the felt as a short string, if it is a non-empty run of
    /// printable ASCII characters.
    pub fn to_short_str(self) -> Option<String> {
        let start = self.0.iter().position(|b| *b != 0)?;
        let text = &self.0[start..];
        if text.len() > SHORT_STR_MAX_LEN
            || !text.iter().all(|b| b.is_ascii_graphic() || *b == b' ')
        {
            return None;
        }
        Some(text.iter().map(|b| *b as char).collect())
    }

    pub fn is_zero(&self) -> bool {
        self == &Self::ZERO
    }
}

impl From<u64> for Felt {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<u128> for Felt {
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

impl From<bool> for Felt {
    fn from(value: bool) -> Self {
        Self::from_u64(value as u64)
    }
}

impl AsRef<[u8]> for Felt {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Display for Felt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x")?;
        match self.0.iter().position(|b| *b != 0) {
            None => write!(f, "0"),
            Some(start) => {
                write!(f, "{:x}", self.0[start])?;
                for byte in &self.0[start + 1..] {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Debug for Felt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // words of three characters or more read better as text
        match self.to_short_str().filter(|s| s.len() >= 3) {
            Some(s) => write!(f, "'{s}'"),
            None => fmt::Display::fmt(self, f),
        }
    }
}

/// ID to identify contracts after they have been deployed
#[derive(
    PartialEq,
    Eq,
    Archive,
    Serialize,
    CheckBytes,
    Deserialize,
    PartialOrd,
    Ord,
    Hash,
    Clone,
    Copy,
    Default,
)]
#[archive(as = "Self")]
#[repr(C)]
pub struct ContractId(Felt);

impl ContractId {
    /// The zero ID. This is the caller observed by a contract called directly
    /// by the host, and can be used to determine if a contract is the first
    /// to be called.
    pub const fn uninitialized() -> Self {
        ContractId(Felt::ZERO)
    }

    /// Creates a new [`ContractId`] from an array of bytes. The five most
    /// significant bits are cleared so the ID is always a valid felt.
    pub const fn from_bytes(bytes: [u8; CONTRACT_ID_BYTES]) -> Self {
        Self(Felt::from_hash(bytes))
    }

    pub const fn from_felt(felt: Felt) -> Self {
        Self(felt)
    }

    /// Derives the ID a deployment of `class` with the given `salt` gets.
    pub fn derive(class: ClassHash, salt: Felt) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(class.as_felt().as_bytes());
        hasher.update(salt.as_bytes());
        Self::from_bytes(hasher.finalize().into())
    }

    /// Returns the array of bytes that make up the [`ContractId`]
    pub const fn to_bytes(self) -> [u8; CONTRACT_ID_BYTES] {
        self.0.to_bytes_be()
    }

    pub const fn as_felt(&self) -> Felt {
        self.0
    }

    /// Determines whether the [`ContractId`] is uninitialized, which can be
    /// used to check if this contract is the first to be called.
    pub fn is_uninitialized(&self) -> bool {
        self == &Self::uninitialized()
    }
}

impl From<[u8; CONTRACT_ID_BYTES]> for ContractId {
    fn from(bytes: [u8; CONTRACT_ID_BYTES]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<ContractId> for Felt {
    fn from(id: ContractId) -> Self {
        id.0
    }
}

impl AsRef<[u8]> for ContractId {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if f.alternate() {
            write!(f, "0x")?
        }
        for byte in self.0.as_bytes() {
            write!(f, "{:02x}", &byte)?
        }
        Ok(())
    }
}

/// Identity of a declared contract class, i.e. a piece of contract code.
#[derive(
    PartialEq,
    Eq,
    Archive,
    Serialize,
    CheckBytes,
    Deserialize,
    PartialOrd,
    Ord,
    Hash,
    Clone,
    Copy,
)]
#[archive(as = "Self")]
#[repr(C)]
pub struct ClassHash(Felt);

impl ClassHash {
    /// Computes the class hash from the label the class is declared under.
    pub fn from_label(label: &[u8]) -> Self {
        Self(Felt::from_hash(blake3::hash(label).into()))
    }

    pub const fn from_felt(felt: Felt) -> Self {
        Self(felt)
    }

    pub const fn as_felt(&self) -> Felt {
        self.0
    }
}

impl fmt::Debug for ClassHash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Display for ClassHash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Names an entry point of a contract.
///
/// Selectors are the short string encoding of the entry point name, so they
/// can be built in `const` context and used as patterns:
///
/// ```
/// use undertow_uplink::Selector;
///
/// const READ: Selector = Selector::new("read");
///
/// match Selector::new("read") {
///     READ => {}
///     _ => unreachable!(),
/// }
/// ```
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct Selector(Felt);

impl Selector {
    pub const fn new(name: &str) -> Self {
        Self(Felt::from_short_str(name))
    }

    pub const fn from_felt(felt: Felt) -> Self {
        Self(felt)
    }

    pub const fn as_felt(&self) -> Felt {
        self.0
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0.to_short_str() {
            Some(name) => write!(f, "{name}"),
            None => fmt::Display::fmt(&self.0, f),
        }
    }
}

/// An event emitted by a contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Event {
    pub source: ContractId,
    pub keys: Vec<Felt>,
    pub data: Vec<Felt>,
}
