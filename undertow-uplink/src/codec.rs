// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Serialization of values to and from sequences of field elements.
//!
//! Scalars take one felt each. Sequences are prefixed with their length and
//! options with a `0`/`1` discriminant. Decoding is always length-aware:
//! [`decode_exact`] refuses both a shortfall and any leftover felts.

use alloc::vec::Vec;
use core::fmt::{Display, Formatter};

use crate::types::{ClassHash, ContractId, Felt, Selector};

/// The error returned when a felt sequence does not decode into a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The input ended before the value was complete.
    Exhausted,
    /// A felt was out of range for the type being decoded.
    InvalidValue,
    /// The value was complete but this many felts were left over.
    TrailingData(usize),
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            DecodeError::Exhausted => write!(f, "input exhausted"),
            DecodeError::InvalidValue => write!(f, "invalid value"),
            DecodeError::TrailingData(n) => {
                write!(f, "{n} trailing felts")
            }
        }
    }
}

/// A type that can be written to and read from a felt sequence.
pub trait Codec: Sized {
    /// Appends the encoding of `self` to `out`.
    fn encode(&self, out: &mut Vec<Felt>);

    /// Reads a value from the front of `input`, advancing it past the felts
    /// consumed.
    fn decode(input: &mut &[Felt]) -> Result<Self, DecodeError>;
}

/// Encodes a value into a fresh felt vector.
pub fn encode<T: Codec>(value: &T) -> Vec<Felt> {
    let mut out = Vec::new();
    value.encode(&mut out);
    out
}

/// Decodes a value that must span the whole of `data`.
pub fn decode_exact<T: Codec>(data: &[Felt]) -> Result<T, DecodeError> {
    let mut input = data;
    let value = T::decode(&mut input)?;
    match input.len() {
        0 => Ok(value),
        n => Err(DecodeError::TrailingData(n)),
    }
}

fn take(input: &mut &[Felt]) -> Result<Felt, DecodeError> {
    let (first, rest) = input.split_first().ok_or(DecodeError::Exhausted)?;
    *input = rest;
    Ok(*first)
}


impl Codec for () {
    fn encode(&self, _: &mut Vec<Felt>) {}

    fn decode(_: &mut &[Felt]) -> Result<Self, DecodeError> {
        Ok(())
    }
}

impl Codec for Felt {
    fn encode(&self, out: &mut Vec<Felt>) {
        out.push(*self);
    }

    fn decode(input: &mut &[Felt]) -> Result<Self, DecodeError> {
        take(input)
    }
}

impl Codec for bool {
    fn encode(&self, out: &mut Vec<Felt>) {
        out.push(Felt::from(*self));
    }

    fn decode(input: &mut &[Felt]) -> Result<Self, DecodeError> {
        match u8::decode(input)? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(DecodeError::InvalidValue),
        }
    }
}

macro_rules! unsigned_codec {
    ($($t:ty),*) => {
        $(
            impl Codec for $t {
                fn encode(&self, out: &mut Vec<Felt>) {
                    out.push(Felt::from_u128(*self as u128));
                }

                fn decode(input: &mut &[Felt]) -> Result<Self, DecodeError> {
                    let value = take(input)?
                        .to_u128()
                        .ok_or(DecodeError::InvalidValue)?;
                    <$t>::try_from(value).map_err(|_| DecodeError::InvalidValue)
                }
            }
        )*
    };
}

unsigned_codec!(u8, u16, u32, u64, u128);

macro_rules! felt_newtype_codec {
    ($($t:ty),*) => {
        $(
            impl Codec for $t {
                fn encode(&self, out: &mut Vec<Felt>) {
                    out.push(self.as_felt());
                }

                fn decode(input: &mut &[Felt]) -> Result<Self, DecodeError> {
                    take(input).map(<$t>::from_felt)
                }
            }
        )*
    };
}

felt_newtype_codec!(ContractId, ClassHash, Selector);

impl<T: Codec> Codec for Vec<T> {
    fn encode(&self, out: &mut Vec<Felt>) {
        (self.len() as u32).encode(out);
        for elem in self {
            elem.encode(out);
        }
    }

    fn decode(input: &mut &[Felt]) -> Result<Self, DecodeError> {
        let len = u32::decode(input)? as usize;
        // zero-width elements take no felts, so the prefix may exceed them
        let mut elems = Vec::with_capacity(len.min(input.len()));
        for _ in 0..len {
            elems.push(T::decode(input)?);
        }
        Ok(elems)
    }
}

impl<T: Codec> Codec for Option<T> {
    fn encode(&self, out: &mut Vec<Felt>) {
        match self {
            None => out.push(Felt::ZERO),
            Some(value) => {
                out.push(Felt::ONE);
                value.encode(out);
            }
        }
    }

    fn decode(input: &mut &[Felt]) -> Result<Self, DecodeError> {
        match bool::decode(input)? {
            false => Ok(None),
            true => T::decode(input).map(Some),
        }
    }
}

macro_rules! tuple_codec {
    ($($name:ident),+) => {
        impl<$($name: Codec),+> Codec for ($($name,)+) {
            #[allow(non_snake_case)]
            fn encode(&self, out: &mut Vec<Felt>) {
                let ($($name,)+) = self;
                $($name.encode(out);)+
            }

            fn decode(input: &mut &[Felt]) -> Result<Self, DecodeError> {
                Ok(($($name::decode(input)?,)+))
            }
        }
    };
}

tuple_codec!(A);
tuple_codec!(A, B);
tuple_codec!(A, B, C);
tuple_codec!(A, B, C, D);
