// Copyright (c) Sienna Satterwhite, Skiplayer Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

//! Slot storage for lattice nodes. Every neighbor relation in the list is a
//! [`NodeId`] into this arena, so the four-way links never form ownership
//! cycles. Freed slots are pushed onto a free stack and reused by later
//! allocations; a handle stays valid until its node is freed.

use std::ops::{
    Index,
    IndexMut,
};

use crate::node::{
    Node,
    NodeId,
};

#[derive(Debug, Clone)]
pub(crate) struct Arena<K> {
    slots: Vec<Option<Node<K>>>,
    free: Vec<usize>,
    live: usize,
}

impl<K> Arena<K> {
    pub(crate) fn new() -> Self {
        Arena {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Arena {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Number of occupied slots.
    #[inline]
    pub(crate) fn live(&self) -> usize {
        self.live
    }

    pub(crate) fn alloc(&mut self, node: Node<K>) -> NodeId {
        self.live += 1;
        match self.free.pop() {
            | Some(idx) => {
                self.slots[idx] = Some(node);
                NodeId(idx)
            },
            | None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            },
        }
    }

    pub(crate) fn free(&mut self, id: NodeId) -> Option<Node<K>> {
        let node = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id.0);
        self.live -= 1;
        Some(node)
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> Option<&Node<K>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<K>> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.live = 0;
    }
}

// Ids handed out by the list always point at live slots.
impl<K> Index<NodeId> for Arena<K> {
    type Output = Node<K>;

    #[inline]
    fn index(&self, id: NodeId) -> &Node<K> {
        self.get(id)
            .unwrap_or_else(|| panic!("dangling node id {}", id))
    }
}

impl<K> IndexMut<NodeId> for Arena<K> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node<K> {
        self.get_mut(id)
            .unwrap_or_else(|| panic!("dangling node id {}", id))
    }
}

impl<K> Default for Arena<K> {
    fn default() -> Self {
        Self::new()
    }
}
