// Copyright (c) Sienna Satterwhite, Skiplayer Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use crate::{
    arena::Arena,
    key::SentinelKey,
    node::NodeId,
};

/// Keys of the bottom layer in ascending order, sentinels excluded.
pub struct Iter<'a, K> {
    arena: &'a Arena<K>,
    next: Option<NodeId>,
}

impl<'a, K> Iter<'a, K> {
    pub(crate) fn new(arena: &'a Arena<K>, first: Option<NodeId>) -> Self {
        Iter { arena, next: first }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.arena.get(self.next?)?;
        // the right sentinel ends the layer
        let key = node.key.value()?;
        self.next = node.right;
        Some(key)
    }
}

/// Every key of one layer, both sentinels included.
pub struct LayerIter<'a, K> {
    arena: &'a Arena<K>,
    next: Option<NodeId>,
}

impl<'a, K> LayerIter<'a, K> {
    pub(crate) fn new(arena: &'a Arena<K>, first: Option<NodeId>) -> Self {
        LayerIter { arena, next: first }
    }
}

impl<'a, K> Iterator for LayerIter<'a, K> {
    type Item = &'a SentinelKey<K>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.arena.get(self.next?)?;
        self.next = node.right;
        Some(&node.key)
    }
}
