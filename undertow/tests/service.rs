// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use undertow::{ContractData, Error, Session, SessionData, VM};
use undertow_uplink::read_only::{
    CallDescriptor, FaultKind, CALLER_NOT_SELF, DECODE_MISMATCH,
    FAILURE_MARKER, FRAMING_MISMATCH, SUCCESS_MARKER,
};
use undertow_uplink::{
    codec, ContractId, Felt, ENTRYPOINT_FAILED, FAILED_TO_DESERIALIZE,
};

use read_only_service::READ_ONLY_SERVICE_ID;

const LIMIT: u64 = 1_000_000;

const ACCOUNT: Felt = Felt::from_short_str("bob");
const BALANCE: u64 = 1_234;

struct Contracts {
    balance: ContractId,
    service: ContractId,
    reader: ContractId,
    intruder: ContractId,
}

fn deploy_all(vm: &VM) -> Result<(Session, Contracts), Error> {
    let balance_class = vm.declare("balance", balance::Balance);
    let service_class =
        vm.declare("read_only_service", read_only_service::ReadOnlyService);
    let reader_class =
        vm.declare("service_reader", service_reader::ServiceReader);
    let intruder_class = vm.declare("intruder", intruder::Intruder);

    let mut session = vm.session(SessionData::builder())?;

    let balance = session.deploy(
        balance_class,
        ContractData::builder().constructor_arg(&(ACCOUNT, BALANCE)),
        LIMIT,
    )?;
    let service = session.deploy(
        service_class,
        ContractData::builder().contract_id(READ_ONLY_SERVICE_ID),
        LIMIT,
    )?;
    let reader =
        session.deploy(reader_class, ContractData::builder(), LIMIT)?;
    let intruder =
        session.deploy(intruder_class, ContractData::builder(), LIMIT)?;

    let contracts = Contracts {
        balance,
        service,
        reader,
        intruder,
    };
    Ok((session, contracts))
}

#[test]
fn reads_through_the_service() -> Result<(), Error> {
    let vm = VM::ephemeral()?;
    let (mut session, c) = deploy_all(&vm)?;

    assert_eq!(c.service, READ_ONLY_SERVICE_ID);

    let root = session.root();

    let receipt = session.call::<_, u64>(
        c.reader,
        service_reader::READ_BALANCE,
        &(c.balance, ACCOUNT),
        LIMIT,
    )?;
    assert_eq!(receipt.data, BALANCE);
    assert!(receipt.events.is_empty());
    assert_eq!(session.root(), root);

    let reads: u64 = session.call(c.balance, balance::READS, &(), LIMIT)?.data;
    assert_eq!(reads, 0);

    Ok(())
}

#[test]
fn service_preserves_return_data() -> Result<(), Error> {
    let vm = VM::ephemeral()?;
    let (mut session, c) = deploy_all(&vm)?;

    let values = vec![Felt::from_u64(3), ENTRYPOINT_FAILED, FAILURE_MARKER];
    let echoed: Vec<Felt> = session
        .call(
            c.reader,
            service_reader::READ_RAW,
            &(c.intruder, intruder::ECHO, values.clone()),
            LIMIT,
        )?
        .data;
    assert_eq!(echoed, values);

    Ok(())
}

#[test]
fn service_faults() -> Result<(), Error> {
    let vm = VM::ephemeral()?;
    let (mut session, c) = deploy_all(&vm)?;

    let err = session
        .call::<_, u64>(
            c.reader,
            service_reader::READ_U64,
            &(c.intruder, intruder::PANIC, Vec::<Felt>::new()),
            LIMIT,
        )
        .expect_err("a failed callee should be fatal");
    assert_eq!(err.fault_kind(), Some(FaultKind::FramingMismatch));

    let panic = Felt::from_short_str("intruder panic");
    let ef = ENTRYPOINT_FAILED;
    let expected = [FRAMING_MISMATCH, FAILURE_MARKER, panic, ef, ef, ef];
    assert_eq!(err.panic_data(), Some(&expected[..]));

    let err = session
        .call::<_, u64>(
            c.reader,
            service_reader::READ_U64,
            &(c.intruder, intruder::ECHO, vec![Felt::ONE, Felt::ONE]),
            LIMIT,
        )
        .expect_err("two felts are not a u64");
    assert_eq!(err.fault_kind(), Some(FaultKind::DecodeMismatch));
    let expected = [DECODE_MISMATCH, SUCCESS_MARKER, Felt::ONE, Felt::ONE, ef];
    assert_eq!(err.panic_data(), Some(&expected[..]));

    Ok(())
}

#[test]
fn service_executor_cannot_be_hijacked() -> Result<(), Error> {
    let vm = VM::ephemeral()?;
    let (mut session, c) = deploy_all(&vm)?;

    let call =
        CallDescriptor::new(c.intruder, intruder::WRITE_AND_RETURN, &1u64);
    let err = session
        .call::<_, Vec<Felt>>(
            c.intruder,
            intruder::HIJACK,
            &(c.service, call),
            LIMIT,
        )
        .expect_err("the service executor must refuse other callers");

    let expected = [CALLER_NOT_SELF, c.intruder.as_felt(), ENTRYPOINT_FAILED];
    assert_eq!(err.panic_data(), Some(&expected[..]));

    Ok(())
}

#[test]
fn service_requests_must_decode() -> Result<(), Error> {
    let vm = VM::ephemeral()?;
    let (mut session, c) = deploy_all(&vm)?;

    let garbage = codec::encode(&(1u64, 2u64));
    let err = session
        .call_raw(
            c.service,
            read_only_service::READ_ONLY_CALL,
            garbage,
            LIMIT,
        )
        .expect_err("garbage is not a call descriptor");
    assert_eq!(err.fault_kind(), None);
    assert_eq!(err.panic_data(), Some(&[FAILED_TO_DESERIALIZE][..]));

    Ok(())
}
