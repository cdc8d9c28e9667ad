// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! A host for contracts written against [`undertow_uplink`].
//!
//! Contract classes are [`declare`]d to a [`VM`], deployed and called in a
//! [`Session`], and the resulting state is [`commit`]ted to disk.
//!
//! Every call runs in a frame of its own. A frame that fails, whether by
//! returning an error or by running out of gas, has every change it made to
//! the state undone: storage writes, deployments and events, including the
//! ones made by the calls it made in turn. Contracts calling other contracts
//! observe such a failure as an error value carrying the callee's panic data
//! followed by [`ENTRYPOINT_FAILED`].
//!
//! ```
//! use undertow::{ContractData, SessionData, VM};
//! use undertow_uplink::{
//!     wrap_call, Contract, ContractError, Felt, Host, Selector,
//!     StorageValue,
//! };
//!
//! const COUNT: StorageValue<u64> = StorageValue::new("count");
//! const INCREMENT: Selector = Selector::new("increment");
//!
//! struct Counter;
//!
//! impl Contract for Counter {
//!     fn call(
//!         &self,
//!         host: &mut dyn Host,
//!         selector: Selector,
//!         calldata: &[Felt],
//!     ) -> Result<Vec<Felt>, ContractError> {
//!         match selector {
//!             INCREMENT => wrap_call(calldata, |()| {
//!                 let count = COUNT.read(host)? + 1;
//!                 COUNT.write(host, &count)?;
//!                 Ok(count)
//!             }),
//!             _ => Err(ContractError::entrypoint_not_found()),
//!         }
//!     }
//! }
//!
//! let vm = VM::ephemeral()?;
//! let counter = vm.declare("counter", Counter);
//!
//! let mut session = vm.session(SessionData::builder())?;
//! let id = session.deploy(counter, ContractData::builder(), 1_000_000)?;
//!
//! let receipt = session.call::<_, u64>(id, INCREMENT, &(), 1_000_000)?;
//! assert_eq!(receipt.data, 1);
//! # Ok::<(), undertow::Error>(())
//! ```
//!
//! [`declare`]: VM::declare
//! [`commit`]: Session::commit
//! [`ENTRYPOINT_FAILED`]: undertow_uplink::ENTRYPOINT_FAILED

mod call_tree;
pub mod config;
mod contract;
mod error;
mod session;
mod store;
mod vm;

pub use call_tree::{CallTree, CallTreeElem};
pub use contract::{ContractData, ContractDataBuilder};
pub use error::Error;
pub use session::{
    CallReceipt, Session, SessionData, SessionDataBuilder, CONSTRUCTOR,
};
pub use vm::VM;

// re-exports

pub use undertow_uplink::{ClassHash, ContractId, Event, Felt, Selector};
