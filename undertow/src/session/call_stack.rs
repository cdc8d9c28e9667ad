// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use undertow_uplink::{ContractError, ContractId};

/// A contract call in progress.
#[derive(Debug, Clone, Copy)]
pub struct StackElement {
    pub contract_id: ContractId,
    pub caller: ContractId,
    pub limit: u64,
    pub spent: u64,
    /// Set once the frame ran out of gas. Such a frame fails regardless of
    /// what the contract returns.
    pub exhausted: bool,
}

impl StackElement {
    pub fn new(
        contract_id: ContractId,
        caller: ContractId,
        limit: u64,
    ) -> Self {
        Self {
            contract_id,
            caller,
            limit,
            spent: 0,
            exhausted: false,
        }
    }

    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.spent)
    }

    /// Charges the given amount of gas to the frame.
    pub fn charge(&mut self, cost: u64) -> Result<(), ContractError> {
        match self.spent.checked_add(cost) {
            Some(spent) if spent <= self.limit => {
                self.spent = spent;
                Ok(())
            }
            _ => {
                self.spent = self.limit;
                self.exhausted = true;
                Err(ContractError::OutOfGas)
            }
        }
    }
}

/// A stack of contract calls.
#[derive(Debug, Default)]
pub struct CallStack {
    stack: Vec<StackElement>,
}

impl CallStack {
    pub const fn new() -> Self {
        Self { stack: Vec::new() }
    }

    /// Push an element to the call stack.
    pub fn push(&mut self, elem: StackElement) {
        self.stack.push(elem);
    }

    /// Pops an element from the callstack.
    pub fn pop(&mut self) -> Option<StackElement> {
        self.stack.pop()
    }

    /// The element at the top of the stack.
    pub fn top(&self) -> Option<&StackElement> {
        self.stack.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut StackElement> {
        self.stack.last_mut()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Clear the call stack of all elements.
    pub fn clear(&mut self) {
        self.stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausting_a_frame() {
        let id = ContractId::from_bytes([1; 32]);
        let mut frame =
            StackElement::new(id, ContractId::uninitialized(), 100);

        assert_eq!(frame.charge(60), Ok(()));
        assert_eq!(frame.remaining(), 40);
        assert_eq!(frame.charge(41), Err(ContractError::OutOfGas));
        assert_eq!(frame.spent, 100);
        assert!(frame.exhausted);
    }

    #[test]
    fn top_of_stack() {
        let mut stack = CallStack::new();
        for n in 1..=3 {
            let id = ContractId::from_bytes([n; 32]);
            stack.push(StackElement::new(id, ContractId::uninitialized(), 10));
        }

        let top = stack.top().expect("three elements pushed");
        assert_eq!(top.contract_id, ContractId::from_bytes([3; 32]));
        assert_eq!(stack.len(), 3);

        stack.clear();
        assert!(stack.top().is_none());
    }
}
