// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

mod call_stack;

use std::fmt::{self, Debug, Formatter};
use std::mem;
use std::sync::Arc;

use undertow_uplink::{
    codec, ClassHash, Codec, ContractError, ContractId, Event, Felt, Host,
    Selector, CLASS_NOT_DECLARED, CONTRACT_ALREADY_DEPLOYED,
    CONTRACT_NOT_DEPLOYED, MAX_DEPTH_EXCEEDED,
};

use crate::call_tree::{CallTree, CallTreeElem};
use crate::config::{
    callee_limit, CALL_COST, DEPLOY_COST, EVENT_COST, EVENT_FELT_COST,
    MAX_CALL_DEPTH, STORAGE_READ_COST, STORAGE_WRITE_COST,
};
use crate::contract::ContractData;
use crate::error::Error::{self, PersistenceError};
use crate::store::ContractSession;
use crate::vm::VM;

use call_stack::{CallStack, StackElement};

/// The selector a constructor shows up under in the call tree. It cannot be
/// called directly.
pub const CONSTRUCTOR: Selector = Selector::new("constructor");

/// A running mutation to a state.
///
/// `Session`s are spawned using a [`VM`] instance, and can be used to [`call`]
/// contracts with to modify their state. A sequence of these calls may then be
/// [`commit`]ed to, or discarded by simply allowing the session to drop.
///
/// New contracts are to be [`deploy`]ed in the context of a session.
///
/// [`call`]: Session::call
/// [`commit`]: Session::commit
/// [`deploy`]: Session::deploy
pub struct Session {
    vm: VM,
    contract_session: ContractSession,

    call_stack: CallStack,
    call_tree: CallTree,
    events: Vec<Event>,
    debug: Vec<String>,
}

impl Debug for Session {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("contract_session", &self.contract_session)
            .field("call_tree", &self.call_tree)
            .field("debug", &self.debug)
            .finish()
    }
}

/// What a frame runs.
#[derive(Debug, Clone, Copy)]
enum Entry {
    Constructor,
    Call(Selector),
}

impl Entry {
    fn selector(self) -> Selector {
        match self {
            Entry::Constructor => CONSTRUCTOR,
            Entry::Call(selector) => selector,
        }
    }
}

impl Session {
    pub(crate) fn new(vm: VM, contract_session: ContractSession) -> Self {
        Self {
            vm,
            contract_session,
            call_stack: CallStack::new(),
            call_tree: CallTree::new(),
            events: vec![],
            debug: vec![],
        }
    }

    /// Deploy a contract of the given `class`, returning its [`ContractId`].
    /// Unless set in `deploy_data`, the ID is derived from the class and the
    /// salt.
    ///
    /// The constructor of the contract is executed with the given
    /// `gas_limit`. Deployment is atomic: if the constructor fails, the
    /// contract is not deployed.
    ///
    /// # Errors
    /// If the class was not declared to the VM, or a contract is already
    /// deployed with the same ID, an error is returned without executing
    /// anything.
    pub fn deploy<'a, A, D>(
        &mut self,
        class: ClassHash,
        deploy_data: D,
        gas_limit: u64,
    ) -> Result<ContractId, Error>
    where
        A: 'a + Codec,
        D: Into<ContractData<'a, A>>,
    {
        let deploy_data = deploy_data.into();
        let calldata = deploy_data
            .constructor_arg
            .map(codec::encode)
            .unwrap_or_default();

        self.deploy_raw(
            class,
            deploy_data.contract_id,
            deploy_data.salt,
            calldata,
            gas_limit,
        )
    }

    /// Deploy a contract passing already encoded constructor calldata.
    ///
    /// See [`deploy`] for more information.
    ///
    /// [`deploy`]: Session::deploy
    pub fn deploy_raw(
        &mut self,
        class: ClassHash,
        contract_id: Option<ContractId>,
        salt: Felt,
        calldata: Vec<Felt>,
        gas_limit: u64,
    ) -> Result<ContractId, Error> {
        if self.vm.class(&class).is_none() {
            return Err(Error::ClassNotDeclared(class));
        }

        let contract_id =
            contract_id.unwrap_or_else(|| ContractId::derive(class, salt));
        if self.contract_session.contract_deployed(&contract_id) {
            return Err(Error::ContractAlreadyDeployed(contract_id));
        }

        tracing::debug!(contract = %contract_id, %class, "deploying");
        self.call_stack.clear();
        self.call_tree.clear();

        let (_, result) = self.instantiate(
            contract_id,
            class,
            &calldata,
            ContractId::uninitialized(),
            gas_limit,
        );

        self.call_tree.clear();
        self.events.clear();
        result?;
        self.contract_session.settle();

        Ok(contract_id)
    }

    /// Execute a call on the current state of this session.
    ///
    /// Calls are atomic, meaning that on failure their execution doesn't modify
    /// the state. They are also metered, and will execute with the given
    /// `gas_limit`.
    ///
    /// # Errors
    /// The call may error during execution for a wide array of reasons, the
    /// most common ones being running against the gas limit and a contract
    /// panic. A return value that doesn't decode into `R` is an error too.
    pub fn call<A, R>(
        &mut self,
        contract: ContractId,
        selector: Selector,
        fn_arg: &A,
        gas_limit: u64,
    ) -> Result<CallReceipt<R>, Error>
    where
        A: Codec,
        R: Codec,
    {
        let fn_arg = codec::encode(fn_arg);
        let receipt = self.call_raw(contract, selector, fn_arg, gas_limit)?;
        receipt.decode()
    }

    /// Execute a raw call on the current state of this session.
    ///
    /// Raw calls do not specify the type of the argument or of the return. The
    /// caller is responsible for encoding the argument as the target
    /// `contract` expects.
    ///
    /// For more information about calls see [`call`].
    ///
    /// [`call`]: Session::call
    pub fn call_raw<V: Into<Vec<Felt>>>(
        &mut self,
        contract: ContractId,
        selector: Selector,
        fn_arg: V,
        gas_limit: u64,
    ) -> Result<CallReceipt<Vec<Felt>>, Error> {
        if selector == CONSTRUCTOR {
            return Err(Error::SessionError(
                "constructor call not allowed".into(),
            ));
        }

        let class = self
            .contract_session
            .class_of(&contract)
            .ok_or(Error::ContractDoesNotExist(contract))?;
        if self.vm.class(&class).is_none() {
            return Err(Error::ClassNotDeclared(class));
        }

        tracing::debug!(contract = %contract, %selector, gas_limit, "call");
        self.call_stack.clear();
        self.call_tree.clear();

        let fn_arg = fn_arg.into();
        let (gas_spent, result) = self.execute(
            contract,
            Entry::Call(selector),
            &fn_arg,
            ContractId::uninitialized(),
            gas_limit,
        );

        let data = match result {
            Ok(data) => data,
            Err(err) => {
                self.call_tree.clear();
                self.events.clear();
                return Err(err.into());
            }
        };
        self.contract_session.settle();

        let mut call_tree = mem::take(&mut self.call_tree);
        call_tree.update_spent();
        let events = mem::take(&mut self.events);

        Ok(CallReceipt {
            gas_limit,
            gas_spent,
            events,
            call_tree,
            data,
        })
    }

    /// Returns the value stored under `key` by the given `contract`.
    pub fn storage(&self, contract: ContractId, key: Felt) -> Felt {
        self.contract_session.read(&contract, &key)
    }

    /// Returns whether a contract is deployed under the given ID.
    pub fn contract_deployed(&self, contract: ContractId) -> bool {
        self.contract_session.contract_deployed(&contract)
    }

    /// Return the state root of the current state of the session.
    ///
    /// The state root is a hash of every deployment and every storage value of
    /// every contract. It also doubles as the ID of a commit - the commit
    /// root.
    pub fn root(&self) -> [u8; 32] {
        self.contract_session.root()
    }

    /// Commits the given session to disk, consuming the session and returning
    /// its state root.
    pub fn commit(self) -> Result<[u8; 32], Error> {
        self.contract_session
            .commit()
            .map_err(|err| PersistenceError(Arc::new(err)))
    }

    /// Calls the given closure with the debug messages contracts reported in
    /// this session, oldest first.
    pub fn with_debug<C, R>(&self, c: C) -> R
    where
        C: FnOnce(&[String]) -> R,
    {
        c(&self.debug)
    }

    /// Deploys `contract_id` with the given `class` and runs its constructor.
    /// The deployment is undone if the constructor fails.
    fn instantiate(
        &mut self,
        contract_id: ContractId,
        class: ClassHash,
        calldata: &[Felt],
        caller: ContractId,
        limit: u64,
    ) -> (u64, Result<(), ContractError>) {
        let savepoint = self.contract_session.savepoint();
        self.contract_session.deploy(contract_id, class);

        let (spent, result) = self.execute(
            contract_id,
            Entry::Constructor,
            calldata,
            caller,
            limit,
        );
        if result.is_err() {
            self.contract_session.revert(savepoint);
        }

        (spent, result.map(|_| ()))
    }

    /// Runs a frame, returning the gas it spent and its outcome.
    ///
    /// If the frame fails every change it made to the state is reverted, its
    /// events are discarded, and it is pruned from the call tree.
    fn execute(
        &mut self,
        contract_id: ContractId,
        entry: Entry,
        calldata: &[Felt],
        caller: ContractId,
        limit: u64,
    ) -> (u64, Result<Vec<Felt>, ContractError>) {
        if self.call_stack.len() >= MAX_CALL_DEPTH {
            return (0, Err(ContractError::Panic(vec![MAX_DEPTH_EXCEEDED])));
        }

        let contract = match self
            .contract_session
            .class_of(&contract_id)
            .and_then(|class| self.vm.class(&class))
        {
            Some(contract) => contract,
            None => {
                let err = ContractError::Panic(vec![CONTRACT_NOT_DEPLOYED]);
                return (0, Err(err));
            }
        };

        let savepoint = self.contract_session.savepoint();
        let n_events = self.events.len();

        self.call_stack
            .push(StackElement::new(contract_id, caller, limit));
        self.call_tree.push(CallTreeElem {
            contract_id,
            selector: entry.selector(),
            limit,
            spent: 0,
        });
        tracing::trace!(
            contract = %contract_id,
            selector = %entry.selector(),
            limit,
            depth = self.call_stack.len(),
            "frame pushed"
        );

        let result = {
            let mut env = Env {
                session: &mut *self,
            };
            match entry {
                Entry::Constructor => {
                    contract.constructor(&mut env, calldata).map(|_| vec![])
                }
                Entry::Call(selector) => {
                    contract.call(&mut env, selector, calldata)
                }
            }
        };

        let frame = self
            .call_stack
            .pop()
            .expect("The frame was pushed to the stack above");
        let result = match frame.exhausted {
            true => Err(ContractError::OutOfGas),
            false => result,
        };

        match result {
            Ok(ret) => {
                self.call_tree.move_up(frame.spent);
                tracing::trace!(
                    contract = %contract_id,
                    spent = frame.spent,
                    "frame popped"
                );
                (frame.spent, Ok(ret))
            }
            Err(err) => {
                self.contract_session.revert(savepoint);
                self.events.truncate(n_events);
                self.call_tree.move_up_prune();
                tracing::debug!(
                    contract = %contract_id,
                    %err,
                    "frame failed, changes reverted"
                );
                (frame.spent, Err(err))
            }
        }
    }
}

/// The host environment a contract executes in.
///
/// Every operation is performed on behalf of the frame at the top of the call
/// stack.
struct Env<'a> {
    session: &'a mut Session,
}

impl Env<'_> {
    fn frame(&self) -> Option<&StackElement> {
        self.session.call_stack.top()
    }

    fn charge(&mut self, cost: u64) -> Result<(), ContractError> {
        match self.session.call_stack.top_mut() {
            Some(frame) => frame.charge(cost),
            None => Ok(()),
        }
    }

    /// Charges the gas spent by a frame this one called.
    fn charge_callee(&mut self, spent: u64) {
        if let Some(frame) = self.session.call_stack.top_mut() {
            frame.spent += spent;
        }
    }

    fn callee_gas_limit(&self) -> u64 {
        self.frame()
            .map(|frame| callee_limit(frame.remaining()))
            .unwrap_or(0)
    }
}

impl Host for Env<'_> {
    fn call_contract(
        &mut self,
        contract: ContractId,
        selector: Selector,
        calldata: &[Felt],
    ) -> Result<Vec<Felt>, ContractError> {
        self.charge(CALL_COST)?;

        let caller = self.self_id();
        let limit = self.callee_gas_limit();

        let (spent, result) = self.session.execute(
            contract,
            Entry::Call(selector),
            calldata,
            caller,
            limit,
        );
        self.charge_callee(spent);

        result.map_err(ContractError::into_failed_entry_point)
    }

    fn deploy_contract(
        &mut self,
        class: ClassHash,
        salt: Felt,
        calldata: &[Felt],
    ) -> Result<ContractId, ContractError> {
        self.charge(DEPLOY_COST)?;

        if self.session.vm.class(&class).is_none() {
            let err = ContractError::Panic(vec![CLASS_NOT_DECLARED]);
            return Err(err.into_failed_entry_point());
        }
        let contract_id = ContractId::derive(class, salt);
        if self.session.contract_session.contract_deployed(&contract_id) {
            let err = ContractError::Panic(vec![CONTRACT_ALREADY_DEPLOYED]);
            return Err(err.into_failed_entry_point());
        }

        let caller = self.self_id();
        let limit = self.callee_gas_limit();

        let (spent, result) = self.session.instantiate(
            contract_id,
            class,
            calldata,
            caller,
            limit,
        );
        self.charge_callee(spent);

        result
            .map(|_| contract_id)
            .map_err(ContractError::into_failed_entry_point)
    }

    fn caller(&self) -> ContractId {
        self.frame()
            .map(|frame| frame.caller)
            .unwrap_or_else(ContractId::uninitialized)
    }

    fn self_id(&self) -> ContractId {
        self.frame()
            .map(|frame| frame.contract_id)
            .unwrap_or_else(ContractId::uninitialized)
    }

    fn storage_read(&mut self, key: Felt) -> Result<Felt, ContractError> {
        self.charge(STORAGE_READ_COST)?;
        let contract = self.self_id();
        Ok(self.session.contract_session.read(&contract, &key))
    }

    fn storage_write(
        &mut self,
        key: Felt,
        value: Felt,
    ) -> Result<(), ContractError> {
        self.charge(STORAGE_WRITE_COST)?;
        let contract = self.self_id();
        self.session.contract_session.write(contract, key, value);
        Ok(())
    }

    fn emit(
        &mut self,
        keys: Vec<Felt>,
        data: Vec<Felt>,
    ) -> Result<(), ContractError> {
        let n_felts = (keys.len() + data.len()) as u64;
        self.charge(EVENT_COST.saturating_add(
            EVENT_FELT_COST.saturating_mul(n_felts),
        ))?;

        let source = self.self_id();
        self.session.events.push(Event { source, keys, data });
        Ok(())
    }

    fn limit(&self) -> u64 {
        self.frame().map(|frame| frame.limit).unwrap_or(0)
    }

    fn spent(&self) -> u64 {
        self.frame().map(|frame| frame.spent).unwrap_or(0)
    }

    fn debug(&mut self, msg: &str) {
        tracing::debug!(contract = %self.self_id(), "{msg}");
        self.session.debug.push(msg.to_string());
    }
}

/// The receipt given for a call execution using one of either [`call`] or
/// [`call_raw`].
///
/// [`call`]: Session::call
/// [`call_raw`]: Session::call_raw
#[derive(Debug)]
pub struct CallReceipt<T> {
    /// The amount of gas spent in the execution of the call.
    pub gas_spent: u64,
    /// The limit used in during this execution.
    pub gas_limit: u64,

    /// The events emitted during the execution of the call.
    pub events: Vec<Event>,
    /// The call tree produced during the execution.
    pub call_tree: CallTree,

    /// The data returned by the called contract.
    pub data: T,
}

impl CallReceipt<Vec<Felt>> {
    /// Decodes a `CallReceipt<Vec<Felt>>` into a `CallReceipt<T>`.
    fn decode<T: Codec>(self) -> Result<CallReceipt<T>, Error> {
        let data = codec::decode_exact(&self.data)?;

        Ok(CallReceipt {
            gas_spent: self.gas_spent,
            gas_limit: self.gas_limit,
            events: self.events,
            call_tree: self.call_tree,
            data,
        })
    }
}

/// The data a session is spawned with.
#[derive(Debug, Default, Clone)]
pub struct SessionData {
    pub base: Option<[u8; 32]>,
}

impl SessionData {
    pub fn builder() -> SessionDataBuilder {
        SessionDataBuilder { base: None }
    }
}

impl From<SessionDataBuilder> for SessionData {
    fn from(builder: SessionDataBuilder) -> Self {
        builder.build()
    }
}

pub struct SessionDataBuilder {
    base: Option<[u8; 32]>,
}

impl SessionDataBuilder {
    /// Set the commit the session starts from.
    pub fn base(mut self, base: [u8; 32]) -> Self {
        self.base = Some(base);
        self
    }

    fn build(&self) -> SessionData {
        SessionData { base: self.base }
    }
}
