// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use serde::de::Error as _;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{ClassHash, ContractId, Event, Felt, Selector, CONTRACT_ID_BYTES};

impl Serialize for Felt {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{self}"))
    }
}

impl<'de> Deserialize<'de> for Felt {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Felt::from_hex(&s)
            .ok_or_else(|| D::Error::custom(format!("invalid felt: {s}")))
    }
}

impl Serialize for ContractId {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        hex::serde::serialize(self.to_bytes(), serializer)
    }
}

impl<'de> Deserialize<'de> for ContractId {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        let bytes: [u8; CONTRACT_ID_BYTES] =
            hex::serde::deserialize(deserializer)?;
        Felt::from_bytes_be(bytes)
            .map(ContractId::from_felt)
            .ok_or_else(|| D::Error::custom("contract id out of range"))
    }
}

impl Serialize for ClassHash {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        self.as_felt().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ClassHash {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        Felt::deserialize(deserializer).map(ClassHash::from_felt)
    }
}

impl Serialize for Selector {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        self.as_felt().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Selector {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        Felt::deserialize(deserializer).map(Selector::from_felt)
    }
}

impl Serialize for Event {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut struct_ser = serializer.serialize_struct("Event", 3)?;
        struct_ser.serialize_field("source", &self.source)?;
        struct_ser.serialize_field("keys", &self.keys)?;
        struct_ser.serialize_field("data", &self.data)?;
        struct_ser.end()
    }
}

impl<'de> Deserialize<'de> for Event {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct IntermediateEvent {
            source: ContractId,
            keys: Vec<Felt>,
            data: Vec<Felt>,
        }

        let intermediate: IntermediateEvent =
            Deserialize::deserialize(deserializer)?;
        Ok(Event {
            source: intermediate.source,
            keys: intermediate.keys,
            data: intermediate.data,
        })
    }
}
