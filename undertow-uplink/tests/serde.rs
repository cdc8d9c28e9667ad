// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

#![cfg(feature = "serde")]

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use undertow_uplink::{
    ClassHash, ContractId, Event, Felt, Selector, CONTRACT_ID_BYTES,
};

fn rand_contract_id(rng: &mut StdRng) -> ContractId {
    let mut bytes = [0; CONTRACT_ID_BYTES];
    rng.fill_bytes(&mut bytes);
    bytes.into()
}

fn rand_felt(rng: &mut StdRng) -> Felt {
    let mut bytes = [0; 32];
    rng.fill_bytes(&mut bytes);
    Felt::from_hash(bytes)
}

fn rand_event(rng: &mut StdRng) -> Event {
    Event {
        source: rand_contract_id(rng),
        keys: vec![Felt::from_short_str("Transfer"), rand_felt(rng)],
        data: (0..5).map(|_| rand_felt(rng)).collect(),
    }
}

fn assert_canonical_json<T>(
    input: &T,
    expected: &str,
) -> Result<String, Box<dyn std::error::Error>>
where
    T: ?Sized + Serialize,
{
    let serialized = serde_json::to_string(input)?;
    let input_canonical: serde_json::Value = serialized.parse()?;
    let expected_canonical: serde_json::Value = expected.parse()?;
    assert_eq!(input_canonical, expected_canonical);
    Ok(serialized)
}

#[test]
fn serde_contract_id() -> Result<(), Box<dyn std::error::Error>> {
    let id = ContractId::from_bytes([0x01; CONTRACT_ID_BYTES]);
    let ser = assert_canonical_json(
        &id,
        "\"0101010101010101010101010101010101010101010101010101010101010101\"",
    )?;
    let deser: ContractId = serde_json::from_str(&ser)?;
    assert_eq!(id, deser);
    Ok(())
}

#[test]
fn serde_random_contract_ids() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = StdRng::seed_from_u64(0xdead);
    for _ in 0..32 {
        let id = rand_contract_id(&mut rng);
        let ser = serde_json::to_string(&id)?;
        let deser: ContractId = serde_json::from_str(&ser)?;
        assert_eq!(id, deser);
    }
    Ok(())
}

#[test]
fn serde_felt() -> Result<(), Box<dyn std::error::Error>> {
    let felt = Felt::from_u64(0xbeef);
    let ser = assert_canonical_json(&felt, "\"0xbeef\"")?;
    let deser: Felt = serde_json::from_str(&ser)?;
    assert_eq!(felt, deser);

    let zero: Felt = serde_json::from_str("\"0x0\"")?;
    assert_eq!(zero, Felt::ZERO);
    Ok(())
}

#[test]
fn serde_selector_and_class() -> Result<(), Box<dyn std::error::Error>> {
    let selector = Selector::new("balance_of");
    let deser: Selector =
        serde_json::from_str(&serde_json::to_string(&selector)?)?;
    assert_eq!(selector, deser);

    let class = ClassHash::from_label(b"balance");
    let deser: ClassHash =
        serde_json::from_str(&serde_json::to_string(&class)?)?;
    assert_eq!(class, deser);
    Ok(())
}

#[test]
fn serde_event() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = StdRng::seed_from_u64(0xbeef);
    let event = rand_event(&mut rng);
    let ser = serde_json::to_string(&event)?;

    let value: serde_json::Value = ser.parse()?;
    assert_eq!(value["keys"][0], "0x5472616e73666572");

    let deser: Event = serde_json::from_str(&ser)?;
    assert_eq!(event, deser);
    Ok(())
}

#[test]
fn serde_wrong_encoded() {
    let wrong_encoded = "\"wrong-encoded\"";

    let contract_id: Result<ContractId, _> =
        serde_json::from_str(wrong_encoded);
    assert!(contract_id.is_err());

    let felt: Result<Felt, _> = serde_json::from_str(wrong_encoded);
    assert!(felt.is_err());
}

#[test]
fn serde_out_of_field() {
    let modulus = "\"0x800000000000011000000000000000000000000000000000000000000000001\"";

    let felt: Result<Felt, _> = serde_json::from_str(modulus);
    assert!(felt.is_err());

    let all_ones = "\"ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff\"";
    let contract_id: Result<ContractId, _> = serde_json::from_str(all_ones);
    assert!(contract_id.is_err());
}

#[test]
fn serde_too_long_encoded() {
    let length_33_enc = "\"e4ab9de40283a85d6ea0cd0120500697d8b01c71b7b4b520292252d20937000631\"";

    let contract_id: Result<ContractId, _> =
        serde_json::from_str(length_33_enc);
    assert!(contract_id.is_err());
}

#[test]
fn serde_too_short_encoded() {
    let length_31_enc =
        "\"0751c37a1dca7aa4c048fcc6177194243edc3637bae042e167e4285945e046\"";

    let contract_id: Result<ContractId, _> =
        serde_json::from_str(length_31_enc);
    assert!(contract_id.is_err());
}
