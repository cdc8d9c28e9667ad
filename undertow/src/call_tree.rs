// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::fmt;

use undertow_uplink::{ContractId, Selector};

/// An element of the call tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallTreeElem {
    pub contract_id: ContractId,
    pub selector: Selector,
    pub limit: u64,
    pub spent: u64,
}

/// The tree of the contract calls made during a session call.
///
/// Only calls that succeeded are kept: a failing call is removed from the
/// tree together with every call it made.
#[derive(Default, Clone)]
pub struct CallTree {
    nodes: Vec<CallTreeNode>,
    cursor: Option<usize>,
}

#[derive(Clone)]
struct CallTreeNode {
    elem: CallTreeElem,
    parent: Option<usize>,
    children: Vec<usize>,
}

impl CallTree {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            cursor: None,
        }
    }

    /// Push an element to the call tree.
    ///
    /// This pushes a new child to the current node, and advances to it.
    pub(crate) fn push(&mut self, elem: CallTreeElem) {
        let index = self.nodes.len();
        self.nodes.push(CallTreeNode {
            elem,
            parent: self.cursor,
            children: Vec::new(),
        });
        if let Some(cursor) = self.cursor {
            self.nodes[cursor].children.push(index);
        }
        self.cursor = Some(index);
    }

    /// Moves to the parent node and set the gas spent of the current element,
    /// returning it.
    pub(crate) fn move_up(&mut self, spent: u64) -> Option<CallTreeElem> {
        let cursor = self.cursor?;
        let node = &mut self.nodes[cursor];
        node.elem.spent = spent;
        self.cursor = node.parent;
        Some(node.elem)
    }

    /// Moves to the parent node, removing the current node and the tree under
    /// it, and returns the current element.
    pub(crate) fn move_up_prune(&mut self) -> Option<CallTreeElem> {
        let cursor = self.cursor?;
        let CallTreeNode { elem, parent, .. } = self.nodes[cursor].clone();

        // everything pushed after the current node is a descendant of it
        self.nodes.truncate(cursor);
        if let Some(parent) = parent {
            self.nodes[parent].children.pop();
        }
        self.cursor = parent;

        Some(elem)
    }

    /// Turns the gas spent of every node, which includes the gas spent by the
    /// calls it made, into the gas spent by the node alone.
    pub(crate) fn update_spent(&mut self) {
        // parents always precede their children
        for index in 0..self.nodes.len() {
            let children_spent: u64 = self.nodes[index]
                .children
                .iter()
                .map(|child| self.nodes[*child].elem.spent)
                .sum();
            let elem = &mut self.nodes[index].elem;
            elem.spent = elem.spent.saturating_sub(children_spent);
        }
    }

    /// Clears the call tree of all elements.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.cursor = None;
    }

    /// The element of the call made by the host, if any.
    pub fn root(&self) -> Option<&CallTreeElem> {
        self.nodes.first().map(|node| &node.elem)
    }

    /// Returns an iterator over the call tree in the order the calls were
    /// made.
    pub fn iter(&self) -> impl Iterator<Item = &CallTreeElem> {
        self.nodes.iter().map(|node| &node.elem)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn format_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        index: usize,
    ) -> fmt::Result {
        let node = &self.nodes[index];
        write_short(f, &node.elem, self.cursor == Some(index))?;

        if !node.children.is_empty() {
            write!(f, "[")?;
            for (i, child) in node.children.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                self.format_node(f, *child)?;
            }
            write!(f, "]")?;
        }

        Ok(())
    }

    fn format_node_pretty(
        &self,
        f: &mut fmt::Formatter<'_>,
        index: usize,
        prefix: &str,
        is_last: bool,
    ) -> fmt::Result {
        let node = &self.nodes[index];
        let is_root = node.parent.is_none();

        if !is_root {
            write!(f, "{prefix}")?;
            write!(f, "{}", if is_last { "└── " } else { "├── " })?;
        }
        write_short(f, &node.elem, self.cursor == Some(index))?;
        writeln!(f, " ({}/{})", node.elem.spent, node.elem.limit)?;

        let child_count = node.children.len();
        for (i, child) in node.children.iter().enumerate() {
            let new_prefix = if is_root {
                String::new()
            } else {
                format!("{}{}    ", prefix, if is_last { " " } else { "│" })
            };
            self.format_node_pretty(
                f,
                *child,
                &new_prefix,
                i == child_count - 1,
            )?;
        }

        Ok(())
    }
}

/// Writes the first four bytes of the contract ID, followed by the selector.
fn write_short(
    f: &mut fmt::Formatter<'_>,
    elem: &CallTreeElem,
    is_cursor: bool,
) -> fmt::Result {
    let id_bytes = elem.contract_id.to_bytes();
    if is_cursor {
        write!(f, "*")?;
    }
    write!(
        f,
        "0x{:02x}{:02x}{:02x}{:02x}:{}",
        id_bytes[0], id_bytes[1], id_bytes[2], id_bytes[3], elem.selector
    )
}

impl fmt::Display for CallTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.nodes.is_empty() {
            true => write!(f, "[]"),
            false => self.format_node(f, 0),
        }
    }
}

impl fmt::Debug for CallTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.nodes.is_empty() {
            true => write!(f, "[]"),
            false => self.format_node_pretty(f, 0, "", true),
        }
    }
}
