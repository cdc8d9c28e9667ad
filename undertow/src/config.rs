// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Metering and limits applied to contract execution.

/// Gas charged to a contract for each call it makes.
pub const CALL_COST: u64 = 100;

/// Gas charged to a contract for each deployment it makes.
pub const DEPLOY_COST: u64 = 1_000;

/// Gas charged for reading a storage key.
pub const STORAGE_READ_COST: u64 = 50;

/// Gas charged for writing a storage key.
pub const STORAGE_WRITE_COST: u64 = 200;

/// Gas charged for emitting an event.
pub const EVENT_COST: u64 = 50;

/// Gas charged for each felt of an emitted event's keys and data.
pub const EVENT_FELT_COST: u64 = 5;

/// Percentage of its remaining gas a contract passes to the contracts it
/// calls.
pub const GAS_PASS_PCT: u64 = 93;

/// Maximum depth of the call stack.
pub const MAX_CALL_DEPTH: usize = 64;

/// The gas limit a call made with `remaining` gas left passes on.
pub(crate) const fn callee_limit(remaining: u64) -> u64 {
    let div = remaining / 100 * GAS_PASS_PCT;
    let rem = remaining % 100 * GAS_PASS_PCT / 100;
    div + rem
}
