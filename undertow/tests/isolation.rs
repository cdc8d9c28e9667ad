// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use undertow::{ContractData, Error, Session, SessionData, VM};
use undertow_uplink::{codec, ContractId, Felt};

const LIMIT: u64 = 1_000_000;

const ACCOUNT: Felt = Felt::from_short_str("alice");
const BALANCE: u64 = 500;

struct Contracts {
    balance: ContractId,
    direct: ContractId,
    safe: ContractId,
    intruder: ContractId,
}

fn deploy_all(vm: &VM) -> Result<(Session, Contracts), Error> {
    let balance_class = vm.declare("balance", balance::Balance);
    let direct_class = vm.declare("direct_reader", direct_reader::DirectReader);
    let safe_class = vm.declare("safe_reader", safe_reader::SafeReader);
    let intruder_class = vm.declare("intruder", intruder::Intruder);

    let mut session = vm.session(SessionData::builder())?;

    let balance = session.deploy(
        balance_class,
        ContractData::builder().constructor_arg(&(ACCOUNT, BALANCE)),
        LIMIT,
    )?;
    let direct =
        session.deploy(direct_class, ContractData::builder(), LIMIT)?;
    let safe = session.deploy(safe_class, ContractData::builder(), LIMIT)?;
    let intruder =
        session.deploy(intruder_class, ContractData::builder(), LIMIT)?;

    let contracts = Contracts {
        balance,
        direct,
        safe,
        intruder,
    };
    Ok((session, contracts))
}

#[test]
fn direct_read_leaves_a_trace() -> Result<(), Error> {
    let vm = VM::ephemeral()?;
    let (mut session, c) = deploy_all(&vm)?;

    let receipt = session.call::<_, u64>(
        c.direct,
        direct_reader::READ_BALANCE,
        &(c.balance, ACCOUNT),
        LIMIT,
    )?;
    assert_eq!(receipt.data, BALANCE);
    assert_eq!(receipt.events.len(), 1);
    assert_eq!(receipt.events[0].keys, vec![balance::BALANCE_READ]);

    let reads: u64 = session.call(c.balance, balance::READS, &(), LIMIT)?.data;
    assert_eq!(reads, 1);

    let reader: ContractId = session
        .call(c.balance, balance::LAST_READER, &(), LIMIT)?
        .data;
    assert_eq!(reader, c.direct);

    Ok(())
}

#[test]
fn read_only_call_leaves_no_trace() -> Result<(), Error> {
    let vm = VM::ephemeral()?;
    let (mut session, c) = deploy_all(&vm)?;

    let root_before = session.root();

    let receipt = session.call::<_, u64>(
        c.safe,
        safe_reader::READ_BALANCE,
        &(c.balance, ACCOUNT),
        LIMIT,
    )?;
    assert_eq!(receipt.data, BALANCE);
    assert!(receipt.events.is_empty(), "events should be discarded");

    assert_eq!(session.root(), root_before);

    let reads: u64 = session.call(c.balance, balance::READS, &(), LIMIT)?.data;
    assert_eq!(reads, 0);

    let reader: ContractId = session
        .call(c.balance, balance::LAST_READER, &(), LIMIT)?
        .data;
    assert_eq!(reader, ContractId::uninitialized());

    session.with_debug(|debug| {
        assert_eq!(debug.len(), 1);
        assert!(debug[0].contains("500"));
    });

    Ok(())
}

#[test]
fn read_only_calls_are_idempotent() -> Result<(), Error> {
    let vm = VM::ephemeral()?;
    let (mut session, c) = deploy_all(&vm)?;

    let root = session.root();

    for _ in 0..8 {
        let balance: u64 = session
            .call(
                c.safe,
                safe_reader::READ_BALANCE,
                &(c.balance, ACCOUNT),
                LIMIT,
            )?
            .data;
        assert_eq!(balance, BALANCE);
        assert_eq!(session.root(), root);
    }

    Ok(())
}

#[test]
fn caller_keeps_its_own_writes() -> Result<(), Error> {
    let vm = VM::ephemeral()?;
    let (mut session, c) = deploy_all(&vm)?;

    let balance: u64 = session
        .call(
            c.safe,
            safe_reader::READ_AND_RECORD,
            &(c.balance, ACCOUNT),
            LIMIT,
        )?
        .data;
    assert_eq!(balance, BALANCE);

    let noted: u64 =
        session.call(c.safe, safe_reader::GET_NOTE, &(), LIMIT)?.data;
    assert_eq!(noted, BALANCE);

    let reads: u64 = session.call(c.balance, balance::READS, &(), LIMIT)?.data;
    assert_eq!(reads, 0, "only the caller's own write should persist");

    Ok(())
}

#[test]
fn callbacks_into_the_caller_are_discarded() -> Result<(), Error> {
    let vm = VM::ephemeral()?;
    let (mut session, c) = deploy_all(&vm)?;

    let args = codec::encode(&7u64);

    session.call::<_, Vec<Felt>>(
        c.direct,
        direct_reader::CALL_RAW,
        &(c.intruder, intruder::CALL_BACK, args.clone()),
        LIMIT,
    )?;
    let noted: u64 = session
        .call(c.direct, direct_reader::GET_NOTE, &(), LIMIT)?
        .data;
    assert_eq!(noted, 7, "a direct call lets the callback persist");

    let ret: Vec<Felt> = session
        .call(
            c.safe,
            safe_reader::READ_RAW,
            &(c.intruder, intruder::CALL_BACK, args),
            LIMIT,
        )?
        .data;
    assert!(ret.is_empty());

    let noted: u64 =
        session.call(c.safe, safe_reader::GET_NOTE, &(), LIMIT)?.data;
    assert_eq!(noted, 0, "a read-only call must discard the callback");

    Ok(())
}

#[test]
fn writes_of_the_callee_are_discarded() -> Result<(), Error> {
    let vm = VM::ephemeral()?;
    let (mut session, c) = deploy_all(&vm)?;

    let root = session.root();

    let value: u64 = session
        .call(
            c.safe,
            safe_reader::READ_U64,
            &(c.intruder, intruder::WRITE_AND_RETURN, codec::encode(&99u64)),
            LIMIT,
        )?
        .data;
    assert_eq!(value, 99);
    assert_eq!(session.root(), root);

    let written: u64 =
        session.call(c.intruder, intruder::WRITTEN, &(), LIMIT)?.data;
    assert_eq!(written, 0);

    Ok(())
}

#[test]
fn deployments_of_the_callee_are_discarded() -> Result<(), Error> {
    let vm = VM::ephemeral()?;
    let (mut session, c) = deploy_all(&vm)?;

    let class = vm.declare("balance", balance::Balance);
    let salt = Felt::from_u64(0xdead);
    let expected = ContractId::derive(class, salt);

    let ret: Vec<Felt> = session
        .call(
            c.safe,
            safe_reader::READ_RAW,
            &(c.intruder, intruder::DEPLOY, codec::encode(&(class, salt))),
            LIMIT,
        )?
        .data;
    assert_eq!(ret, vec![expected.as_felt()]);
    assert!(!session.contract_deployed(expected));

    let ret: Vec<Felt> = session
        .call(
            c.direct,
            direct_reader::CALL_RAW,
            &(c.intruder, intruder::DEPLOY, codec::encode(&(class, salt))),
            LIMIT,
        )?
        .data;
    assert_eq!(ret, vec![expected.as_felt()]);
    assert!(session.contract_deployed(expected));

    Ok(())
}

#[test]
fn unit_returns() -> Result<(), Error> {
    let vm = VM::ephemeral()?;
    let (mut session, c) = deploy_all(&vm)?;

    session.call::<_, ()>(
        c.safe,
        safe_reader::READ_UNIT,
        &(
            c.balance,
            balance::SET_BALANCE,
            codec::encode(&(ACCOUNT, 0u64)),
        ),
        LIMIT,
    )?;

    assert_eq!(
        session
            .call::<_, u64>(
                c.direct,
                direct_reader::READ_BALANCE,
                &(c.balance, ACCOUNT),
                LIMIT,
            )?
            .data,
        BALANCE
    );

    Ok(())
}
