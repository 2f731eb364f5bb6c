// Copyright (c) Sienna Satterwhite, Skiplayer Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use std::fmt::Debug;

use tracing::instrument;

use crate::{
    errs::SkipListError,
    event::EventSink,
    key::SentinelKey,
    skiplist::{
        list::SkipList,
        promotion::PromotionPolicy,
    },
};

impl<K, P, S> SkipList<K, P, S>
where
    K: Ord + Clone + Debug,
    P: PromotionPolicy,
    S: EventSink<K>,
{
    /// Walks the whole lattice and checks its structural invariants:
    ///
    /// - every layer runs from a negative to a positive sentinel through
    ///   symmetric `left`/`right` links, with strictly increasing keys
    /// - layers are numbered `0..layer_count()` from the bottom, and the root
    ///   is the left sentinel of the top one
    /// - every node above the bottom sits on a node with the same key
    ///   through symmetric `up`/`down` links, and bottom nodes have nothing
    ///   below
    /// - the bottom layer holds exactly `len()` keys and the arena holds no
    ///   node that is unreachable from the root
    /// - with an active sink, columns match bottom-layer positions
    #[instrument(level = "trace", skip(self))]
    pub fn verify(&self) -> Result<(), SkipListError> {
        let top = self.layers - 1;
        if self.arena[self.root].up.is_some() {
            return Err(SkipListError::violation(top, "root has a node above it"));
        }

        let mut reachable = 0;
        let mut rows = Some(self.root);
        let mut layer = top;
        loop {
            let left = rows.ok_or_else(|| SkipListError::violation(layer, "layer is missing"))?;
            let first = self
                .arena
                .get(left)
                .ok_or_else(|| SkipListError::violation(layer, "dangling layer start"))?;
            if first.key != SentinelKey::NegativeSentinel || first.left.is_some() {
                return Err(SkipListError::violation(
                    layer,
                    "layer does not start with a negative sentinel",
                ));
            }

            let mut prev = left;
            let mut values = 0;
            let mut cursor = Some(left);
            while let Some(id) = cursor {
                let node = self
                    .arena
                    .get(id)
                    .ok_or_else(|| SkipListError::violation(layer, format!("dangling node {}", id)))?;
                reachable += 1;
                if reachable > self.arena.live() {
                    return Err(SkipListError::violation(layer, "links form a cycle"));
                }

                if node.layer != layer {
                    return Err(SkipListError::violation(
                        layer,
                        format!("node {} claims layer {}", id, node.layer),
                    ));
                }
                if id != left {
                    if node.left != Some(prev) {
                        return Err(SkipListError::violation(
                            layer,
                            format!("node {} has an asymmetric left link", id),
                        ));
                    }
                    if self.arena[prev].key >= node.key {
                        return Err(SkipListError::violation(
                            layer,
                            format!("{:?} does not follow {:?}", node.key, self.arena[prev].key),
                        ));
                    }
                }
                if !node.is_sentinel() {
                    values += 1;
                }

                match (layer, node.down) {
                    | (0, Some(_)) => {
                        return Err(SkipListError::violation(
                            layer,
                            format!("bottom node {} links below", id),
                        ))
                    },
                    | (0, None) => {
                        if self.sink.is_active() && !node.is_sentinel() && node.column != values {
                            return Err(SkipListError::violation(
                                layer,
                                format!("{:?} sits in column {}, expected {}", node.key, node.column, values),
                            ));
                        }
                    },
                    | (_, None) => {
                        return Err(SkipListError::violation(
                            layer,
                            format!("{:?} has nothing below it", node.key),
                        ))
                    },
                    | (_, Some(down)) => {
                        let below = self.arena.get(down).ok_or_else(|| {
                            SkipListError::violation(layer, format!("dangling down link of {}", id))
                        })?;
                        if below.up != Some(id) || below.key != node.key {
                            return Err(SkipListError::violation(
                                layer,
                                format!("{:?} is not stacked on its own key", node.key),
                            ));
                        }
                        if self.sink.is_active() && below.column != node.column {
                            return Err(SkipListError::violation(
                                layer,
                                format!("tower of {:?} is not in one column", node.key),
                            ));
                        }
                    },
                }

                prev = id;
                cursor = node.right;
            }

            let last = &self.arena[prev];
            if last.key != SentinelKey::PositiveSentinel {
                return Err(SkipListError::violation(
                    layer,
                    "layer does not end with a positive sentinel",
                ));
            }
            if layer == top && prev != self.tail {
                return Err(SkipListError::violation(layer, "tail is not the top right sentinel"));
            }
            if layer == 0 {
                if left != self.head {
                    return Err(SkipListError::violation(layer, "head is not the bottom left sentinel"));
                }
                if values != self.len {
                    return Err(SkipListError::violation(
                        layer,
                        format!("holds {} keys but the list counts {}", values, self.len),
                    ));
                }
                break;
            }

            rows = first.down;
            layer -= 1;
        }

        if reachable != self.arena.live() {
            return Err(SkipListError::violation(
                0,
                format!("{} nodes allocated but {} reachable", self.arena.live(), reachable),
            ));
        }
        Ok(())
    }
}
