// Copyright (c) Sienna Satterwhite, Skiplayer Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use std::fmt;

use getset::{
    CopyGetters,
    Getters,
};

use crate::key::SentinelKey;

/// Stable handle to a node in the arena. Handles are only meaningful for
/// the list that issued them and may be reused after the node is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A lattice element. Horizontal links stay within a layer, vertical links
/// join the copies of one key across adjacent layers.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct Node<K> {
    #[getset(get = "pub")]
    pub(crate) key: SentinelKey<K>,
    #[getset(get_copy = "pub")]
    pub(crate) left: Option<NodeId>,
    #[getset(get_copy = "pub")]
    pub(crate) right: Option<NodeId>,
    #[getset(get_copy = "pub")]
    pub(crate) up: Option<NodeId>,
    #[getset(get_copy = "pub")]
    pub(crate) down: Option<NodeId>,
    /// 0 is the bottom layer.
    #[getset(get_copy = "pub")]
    pub(crate) layer: usize,
    /// Horizontal slot used by observers for layout only.
    #[getset(get_copy = "pub")]
    pub(crate) column: usize,
}

impl<K> Node<K> {
    pub(crate) fn new(key: SentinelKey<K>, layer: usize, column: usize) -> Self {
        Node {
            key,
            left: None,
            right: None,
            up: None,
            down: None,
            layer,
            column,
        }
    }

    #[inline]
    pub fn is_sentinel(&self) -> bool {
        self.key.is_sentinel()
    }
}
