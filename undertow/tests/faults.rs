// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use undertow::{ContractData, Error, Session, SessionData, VM};
use undertow_uplink::read_only::{
    CallDescriptor, Embedded, FaultKind, ReadOnlyCall, CALLER_NOT_SELF,
    DECODE_MISMATCH, EXECUTE_AND_ABORT, FAILURE_MARKER, FRAMING_MISMATCH,
    SUCCESS_MARKER, UNINTERCEPTED_ABORT,
};
use undertow_uplink::{
    codec, wrap_call, Contract, ContractError, ContractId, Felt, Host,
    Selector, CONTRACT_NOT_DEPLOYED, ENTRYPOINT_FAILED, ENTRYPOINT_NOT_FOUND,
    OUT_OF_GAS,
};

const LIMIT: u64 = 1_000_000;

const EF: Felt = ENTRYPOINT_FAILED;

type RawCall = (ContractId, Selector, Vec<Felt>);

const LEAK: Selector = Selector::new("leak");

/// Runs the executor entry point as if it were a normal one.
struct Leaky;

impl Contract for Leaky {
    fn call(
        &self,
        host: &mut dyn Host,
        selector: Selector,
        calldata: &[Felt],
    ) -> Result<Vec<Felt>, ContractError> {
        match selector {
            EXECUTE_AND_ABORT => Ok(vec![Felt::ONE]),
            LEAK => wrap_call(calldata, |(target, selector, args): RawCall| {
                let call = CallDescriptor::raw(target, selector, args);
                Embedded.read_only_call_raw(host, &call)
            }),
            _ => Err(ContractError::entrypoint_not_found()),
        }
    }
}

/// Uses read-only calls, but never routes the executor entry point.
struct Unrouted;

impl Contract for Unrouted {
    fn call(
        &self,
        host: &mut dyn Host,
        selector: Selector,
        calldata: &[Felt],
    ) -> Result<Vec<Felt>, ContractError> {
        match selector {
            LEAK => wrap_call(calldata, |(target, selector, args): RawCall| {
                let call = CallDescriptor::raw(target, selector, args);
                Embedded.read_only_call_raw(host, &call)
            }),
            _ => Err(ContractError::entrypoint_not_found()),
        }
    }
}

fn setup(vm: &VM) -> Result<(Session, ContractId, ContractId), Error> {
    let safe_class = vm.declare("safe_reader", safe_reader::SafeReader);
    let intruder_class = vm.declare("intruder", intruder::Intruder);

    let mut session = vm.session(SessionData::builder())?;

    let safe = session.deploy(safe_class, ContractData::builder(), LIMIT)?;
    let intruder =
        session.deploy(intruder_class, ContractData::builder(), LIMIT)?;

    Ok((session, safe, intruder))
}

fn read_u64(
    session: &mut Session,
    safe: ContractId,
    call: RawCall,
) -> Result<u64, Error> {
    session
        .call(safe, safe_reader::READ_U64, &call, LIMIT)
        .map(|receipt| receipt.data)
}

#[track_caller]
fn assert_panic(err: Error, kind: FaultKind, data: &[Felt]) {
    assert_eq!(err.fault_kind(), Some(kind), "{err}");
    assert_eq!(err.panic_data(), Some(data));
}

#[test]
fn callee_panic() -> Result<(), Error> {
    let vm = VM::ephemeral()?;
    let (mut session, safe, intruder) = setup(&vm)?;

    let err = read_u64(&mut session, safe, (intruder, intruder::PANIC, vec![]))
        .expect_err("a failed callee should be fatal");

    let panic = Felt::from_short_str("intruder panic");
    assert_panic(
        err,
        FaultKind::FramingMismatch,
        &[FRAMING_MISMATCH, FAILURE_MARKER, panic, EF, EF],
    );

    Ok(())
}

#[test]
fn forged_abort_data() -> Result<(), Error> {
    let vm = VM::ephemeral()?;
    let (mut session, safe, intruder) = setup(&vm)?;

    let err = read_u64(&mut session, safe, (intruder, intruder::FORGE, vec![]))
        .expect_err("a forged payload should never be taken as a result");

    let forged = Felt::from_u64(intruder::FORGED_VALUE);
    assert_panic(
        err,
        FaultKind::FramingMismatch,
        &[
            FRAMING_MISMATCH,
            FAILURE_MARKER,
            SUCCESS_MARKER,
            forged,
            EF,
            EF,
            EF,
        ],
    );

    Ok(())
}

#[test]
fn forged_return_data() -> Result<(), Error> {
    let vm = VM::ephemeral()?;
    let (mut session, safe, intruder) = setup(&vm)?;

    let call = (intruder, intruder::FORGE_RETURN, vec![]);
    let err = read_u64(&mut session, safe, call)
        .expect_err("marker-like return data is not a u64");

    let forged = Felt::from_u64(intruder::FORGED_VALUE);
    assert_panic(
        err,
        FaultKind::DecodeMismatch,
        &[DECODE_MISMATCH, SUCCESS_MARKER, SUCCESS_MARKER, forged, EF, EF],
    );

    Ok(())
}

#[test]
fn callee_out_of_gas() -> Result<(), Error> {
    let vm = VM::ephemeral()?;
    let (mut session, safe, intruder) = setup(&vm)?;

    let root = session.root();

    let err = read_u64(&mut session, safe, (intruder, intruder::BURN, vec![]))
        .expect_err("exhausting the gas should be fatal");

    assert_panic(
        err,
        FaultKind::FramingMismatch,
        &[FRAMING_MISMATCH, FAILURE_MARKER, OUT_OF_GAS, EF, EF],
    );
    assert_eq!(session.root(), root);

    // the session is still usable
    let value = read_u64(
        &mut session,
        safe,
        (intruder, intruder::WRITE_AND_RETURN, codec::encode(&3u64)),
    )?;
    assert_eq!(value, 3);

    Ok(())
}

#[test]
fn missing_entry_point_and_contract() -> Result<(), Error> {
    let vm = VM::ephemeral()?;
    let (mut session, safe, intruder) = setup(&vm)?;

    let missing = Selector::new("missing");
    let err = read_u64(&mut session, safe, (intruder, missing, vec![]))
        .expect_err("calling a missing entry point should fail");
    assert_panic(
        err,
        FaultKind::FramingMismatch,
        &[FRAMING_MISMATCH, FAILURE_MARKER, ENTRYPOINT_NOT_FOUND, EF, EF],
    );

    let nobody = ContractId::from_bytes([1; 32]);
    let err = read_u64(&mut session, safe, (nobody, missing, vec![]))
        .expect_err("calling a missing contract should fail");
    assert_panic(
        err,
        FaultKind::FramingMismatch,
        &[FRAMING_MISMATCH, FAILURE_MARKER, CONTRACT_NOT_DEPLOYED, EF, EF],
    );

    Ok(())
}

#[test]
fn decode_mismatch() -> Result<(), Error> {
    let vm = VM::ephemeral()?;
    let (mut session, safe, intruder) = setup(&vm)?;

    let two = vec![Felt::from_u64(1), Felt::from_u64(2)];
    let err = read_u64(&mut session, safe, (intruder, intruder::ECHO, two))
        .expect_err("two felts are not a u64");
    assert_panic(
        err,
        FaultKind::DecodeMismatch,
        &[
            DECODE_MISMATCH,
            SUCCESS_MARKER,
            Felt::from_u64(1),
            Felt::from_u64(2),
            EF,
        ],
    );

    let err = read_u64(&mut session, safe, (intruder, intruder::ECHO, vec![]))
        .expect_err("nothing is not a u64");
    assert_panic(
        err,
        FaultKind::DecodeMismatch,
        &[DECODE_MISMATCH, SUCCESS_MARKER, EF],
    );

    let err = session
        .call::<_, ()>(
            safe,
            safe_reader::READ_UNIT,
            &(intruder, intruder::WRITE_AND_RETURN, codec::encode(&5u64)),
            LIMIT,
        )
        .expect_err("a u64 is not a unit");
    assert_panic(
        err,
        FaultKind::DecodeMismatch,
        &[DECODE_MISMATCH, SUCCESS_MARKER, Felt::from_u64(5), EF],
    );

    let written: u64 =
        session.call(intruder, intruder::WRITTEN, &(), LIMIT)?.data;
    assert_eq!(written, 0);

    Ok(())
}

#[test]
fn hijacked_executor() -> Result<(), Error> {
    let vm = VM::ephemeral()?;
    let (mut session, safe, intruder) = setup(&vm)?;

    let call =
        CallDescriptor::new(intruder, intruder::WRITE_AND_RETURN, &1u64);

    let err = session
        .call::<_, Vec<Felt>>(
            intruder,
            intruder::HIJACK,
            &(safe, call.clone()),
            LIMIT,
        )
        .expect_err("the executor must refuse other callers");
    assert_panic(
        err,
        FaultKind::RejectedSelfInvocation,
        &[CALLER_NOT_SELF, intruder.as_felt(), EF],
    );

    let err = session
        .call_raw(safe, EXECUTE_AND_ABORT, codec::encode(&call), LIMIT)
        .expect_err("the executor must refuse the host too");
    assert_panic(
        err,
        FaultKind::RejectedSelfInvocation,
        &[CALLER_NOT_SELF, ContractId::uninitialized().as_felt()],
    );

    // the target reports every write to the host, and failed calls do not
    // take the reports back
    session.with_debug(|debug| {
        assert!(debug.is_empty(), "the target was reached: {debug:?}")
    });

    let args = codec::encode(&1u64);
    let call = (intruder, intruder::WRITE_AND_RETURN, args);
    read_u64(&mut session, safe, call)?;
    session.with_debug(|debug| assert_eq!(debug, ["wrote 1"]));

    Ok(())
}

#[test]
fn executor_returning_normally() -> Result<(), Error> {
    let vm = VM::ephemeral()?;
    let (mut session, _, intruder) = setup(&vm)?;

    let leaky_class = vm.declare("leaky", Leaky);
    let leaky = session.deploy(leaky_class, ContractData::builder(), LIMIT)?;

    let call = (intruder, intruder::ECHO, vec![Felt::ONE]);
    let err = session
        .call::<_, Vec<Felt>>(leaky, LEAK, &call, LIMIT)
        .expect_err("an executor returning normally should be fatal");
    assert_panic(
        err,
        FaultKind::UninterceptedAbort,
        &[UNINTERCEPTED_ABORT, Felt::ONE],
    );

    Ok(())
}

#[test]
fn executor_not_routed() -> Result<(), Error> {
    let vm = VM::ephemeral()?;
    let (mut session, _, intruder) = setup(&vm)?;

    let unrouted_class = vm.declare("unrouted", Unrouted);
    let unrouted =
        session.deploy(unrouted_class, ContractData::builder(), LIMIT)?;

    let call = (intruder, intruder::ECHO, vec![Felt::ONE]);
    let err = session
        .call::<_, Vec<Felt>>(unrouted, LEAK, &call, LIMIT)
        .expect_err("a missing executor should be fatal");
    assert_panic(
        err,
        FaultKind::FramingMismatch,
        &[FRAMING_MISMATCH, ENTRYPOINT_NOT_FOUND, EF],
    );

    Ok(())
}
