// Copyright (c) Sienna Satterwhite, Skiplayer Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use std::fmt::{
    self,
    Debug,
    Display,
};

use tracing::{
    debug,
    instrument,
    trace,
};

use crate::{
    arena::Arena,
    config::{
        Config,
        DEFAULT_MAX_LAYERS,
    },
    errs::SkipListError,
    event::{
        notify,
        Event,
        EventSink,
        NoopSink,
    },
    key::SentinelKey,
    node::{
        Node,
        NodeId,
    },
    skiplist::{
        iter::{
            Iter,
            LayerIter,
        },
        promotion::{
            PromotionPolicy,
            RandomPromotionPolicy,
        },
    },
};

#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupResult {
    Found,
    NotFound,
}

impl LookupResult {
    #[inline]
    pub fn is_found(&self) -> bool {
        matches!(self, LookupResult::Found)
    }
}

#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertResult {
    Inserted,
    AlreadyPresent,
}

#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveResult {
    Removed,
    NotFound,
}

/// A skip list built as a four-way linked lattice of nodes.
///
/// Every layer is a doubly linked run of nodes bounded by a
/// [`SentinelKey::NegativeSentinel`] and a [`SentinelKey::PositiveSentinel`].
/// Layer 0 holds every key; a key that reaches layer `L` also sits on every
/// layer below it, each copy linked to the next by `up`/`down`. New top
/// layers are created on demand when a promotion climbs past the current
/// top, and are kept around even once every key on them is removed.
///
/// `P` decides promotions, `S` observes structural changes. Neither can
/// change what a search finds.
pub struct SkipList<K, P = RandomPromotionPolicy, S = NoopSink> {
    pub(super) arena: Arena<K>,
    /// Top-left sentinel, where every search starts.
    pub(super) root: NodeId,
    /// Top-right sentinel.
    pub(super) tail: NodeId,
    /// Bottom-left sentinel. Never replaced.
    pub(super) head: NodeId,
    pub(super) len: usize,
    pub(super) layers: usize,
    pub(super) max_layers: usize,
    pub(super) policy: P,
    pub(super) sink: S,
}

impl<K: Ord + Clone + Debug> SkipList<K> {
    /// An empty list promoting with a fair coin.
    pub fn new() -> Self {
        Self::with_policy(RandomPromotionPolicy::default())
    }

    pub fn from_config(config: &Config) -> Result<Self, SkipListError> {
        let policy = RandomPromotionPolicy::from_config(config)?;
        let mut list = Self::with_policy(policy);
        list.max_layers = config.max_layers();
        Ok(list)
    }
}

impl<K: Ord + Clone + Debug> Default for SkipList<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone + Debug, P: PromotionPolicy> SkipList<K, P> {
    pub fn with_policy(policy: P) -> Self {
        Self::with_policy_and_sink(policy, NoopSink)
    }
}

impl<K, P, S> SkipList<K, P, S>
where
    K: Ord + Clone + Debug,
    P: PromotionPolicy,
    S: EventSink<K>,
{
    pub fn with_policy_and_sink(policy: P, mut sink: S) -> Self {
        let mut arena = Arena::with_capacity(2);
        let (left, right) = bootstrap(&mut arena, &mut sink);
        SkipList {
            arena,
            root: left,
            tail: right,
            head: left,
            len: 0,
            layers: 1,
            max_layers: DEFAULT_MAX_LAYERS,
            policy,
            sink,
        }
    }

    /// Cap the number of layers. Towers stop growing at the ceiling even if
    /// the policy keeps asking for promotions; layers that already exist
    /// above it are left alone.
    pub fn set_max_layers(&mut self, max_layers: usize) -> Result<(), SkipListError> {
        if max_layers == 0 {
            return Err(SkipListError::InvalidMaxLayers(max_layers));
        }
        self.max_layers = max_layers;
        Ok(())
    }

    pub fn max_layers(&self) -> usize {
        self.max_layers
    }

    /// Number of keys stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of layers, including empty ones.
    #[inline]
    pub fn layer_count(&self) -> usize {
        self.layers
    }

    /// The top-left sentinel.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<K>> {
        self.arena.get(id)
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Keys of the bottom layer, in order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(&self.arena, self.arena[self.head].right)
    }

    /// Every key of `layer` (0 is the bottom) from left sentinel to right
    /// sentinel, or `None` if the layer does not exist.
    pub fn layer(&self, layer: usize) -> Option<LayerIter<'_, K>> {
        if layer >= self.layers {
            return None;
        }
        let mut left = self.root;
        for _ in layer + 1..self.layers {
            left = self.arena[left].down?;
        }
        Some(LayerIter::new(&self.arena, Some(left)))
    }

    /// Same as [`SkipList::lookup`] but read-only and silent.
    pub fn contains(&self, key: &K) -> bool {
        let found = search(&self.arena, self.root, key, &mut NoopSink);
        self.arena[found].key.cmp_value(key).is_eq()
    }

    /// How many layers `key` occupies, 0 if it is absent.
    pub fn height_of(&self, key: &K) -> usize {
        let found = search(&self.arena, self.root, key, &mut NoopSink);
        if !self.arena[found].key.cmp_value(key).is_eq() {
            return 0;
        }
        let mut height = 1;
        let mut cursor = self.arena[found].up;
        while let Some(id) = cursor {
            height += 1;
            cursor = self.arena[id].up;
        }
        height
    }

    /// Runs the shared search and returns the bottom-layer node holding
    /// `key`, or the greatest node whose key is below it.
    pub fn locate(&mut self, key: &K) -> NodeId {
        let SkipList {
            arena, root, sink, ..
        } = self;
        search(arena, *root, key, sink)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn lookup(&mut self, key: &K) -> LookupResult {
        let found = self.locate(key);
        let result = if self.arena[found].key.cmp_value(key).is_eq() {
            LookupResult::Found
        } else {
            LookupResult::NotFound
        };
        notify(&mut self.sink, || {
            Event::Message(match result {
                | LookupResult::Found => format!("Key {:?} found", key),
                | LookupResult::NotFound => format!("Key {:?} not found", key),
            })
        });
        debug!(?result, "lookup finished");
        result
    }

    #[instrument(level = "debug", skip(self))]
    pub fn insert(&mut self, key: K) -> InsertResult {
        let pred = self.locate(&key);
        if self.arena[pred].key.cmp_value(&key).is_eq() {
            notify(&mut self.sink, || {
                Event::Message(format!("Key {:?} already exists", key))
            });
            debug!("key already present");
            return InsertResult::AlreadyPresent;
        }

        notify(&mut self.sink, || {
            Event::Message(format!("Insert the key {:?}", key))
        });
        self.len += 1;

        if self.sink.is_active() {
            self.shift_columns(self.arena[pred].right, true);
        }
        let column = self.arena[pred].column + 1;

        let mut below = self.splice_after(pred, SentinelKey::Value(key.clone()), 0, column);
        let mut pred = pred;
        loop {
            let promote = self.policy.promote();
            notify(&mut self.sink, || {
                Event::Message(
                    if promote {
                        "Coin flip result: True; Going up"
                    } else {
                        "Coin flip result: False; Stop"
                    }
                    .to_string(),
                )
            });
            if !promote {
                break;
            }

            let layer = self.arena[below].layer + 1;
            if layer >= self.max_layers {
                debug!(layer, max_layers = self.max_layers, "layer ceiling reached");
                break;
            }

            let ancestor = self.ancestor_above(pred);
            let upper = self.splice_after(ancestor, SentinelKey::Value(key.clone()), layer, column);
            self.arena[upper].down = Some(below);
            self.arena[below].up = Some(upper);
            notify(&mut self.sink, || Event::Connected {
                from: upper,
                to: below,
                directed: false,
            });
            trace!(layer, "promoted");

            below = upper;
            pred = ancestor;
        }
        self.policy.finish();

        notify(&mut self.sink, || {
            Event::Message(format!("Successfully inserted the key {:?}", key))
        });
        debug!(height = self.arena[below].layer + 1, len = self.len, "inserted");
        InsertResult::Inserted
    }

    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, key: &K) -> RemoveResult {
        let found = self.locate(key);
        if !self.arena[found].key.cmp_value(key).is_eq() {
            notify(&mut self.sink, || {
                Event::Message(format!(
                    "Key {:?} not found and thus not in the list now",
                    key
                ))
            });
            debug!("key not found");
            return RemoveResult::NotFound;
        }

        let after = self.arena[found].right;
        let mut height = 0;
        let mut cursor = Some(found);
        while let Some(id) = cursor {
            let Some(node) = self.arena.free(id) else {
                break;
            };
            if let Some(left) = node.left {
                self.arena[left].right = node.right;
            }
            if let Some(right) = node.right {
                self.arena[right].left = node.left;
            }

            notify(&mut self.sink, || Event::Highlighted { id, on: true });
            if let Some(left) = node.left {
                notify(&mut self.sink, || Event::Disconnected { from: left, to: id });
            }
            if let Some(right) = node.right {
                notify(&mut self.sink, || Event::Disconnected { from: id, to: right });
            }
            notify(&mut self.sink, || Event::NodeDeleted { id });
            if let (Some(from), Some(to)) = (node.left, node.right) {
                notify(&mut self.sink, || Event::Connected {
                    from,
                    to,
                    directed: true,
                });
            }

            height += 1;
            cursor = node.up;
        }

        self.len -= 1;
        if self.sink.is_active() {
            self.shift_columns(after, false);
        }
        notify(&mut self.sink, || {
            Event::Message(format!("Successfully removed key {:?}", key))
        });
        debug!(height, len = self.len, "removed");
        RemoveResult::Removed
    }

    /// Drops every key and every layer above the bottom one.
    pub fn clear(&mut self) {
        if self.sink.is_active() {
            let mut rows = Some(self.root);
            while let Some(left) = rows {
                let mut cursor = Some(left);
                while let Some(id) = cursor {
                    self.sink.emit(Event::NodeDeleted { id });
                    cursor = self.arena[id].right;
                }
                rows = self.arena[left].down;
            }
        }

        self.arena.clear();
        let (left, right) = bootstrap(&mut self.arena, &mut self.sink);
        self.root = left;
        self.tail = right;
        self.head = left;
        self.len = 0;
        self.layers = 1;
        debug!("cleared");
    }

    /// Walks left from `pred` until a node with an upper neighbor is found
    /// and returns that upper neighbor. Reaching the left sentinel without
    /// one means `pred` sits on the top layer, so a new layer is grown.
    fn ancestor_above(&mut self, pred: NodeId) -> NodeId {
        let mut cursor = pred;
        loop {
            notify(&mut self.sink, || Event::Highlighted {
                id: cursor,
                on: true,
            });
            notify(&mut self.sink, || Event::Highlighted {
                id: cursor,
                on: false,
            });

            let (up, left) = (self.arena[cursor].up, self.arena[cursor].left);
            if let Some(up) = up {
                return up;
            }
            match left {
                | Some(left) => cursor = left,
                | None => return self.grow_layer(),
            }
        }
    }

    /// Puts a fresh pair of sentinels on top of the current top layer and
    /// returns the new root.
    fn grow_layer(&mut self) -> NodeId {
        let layer = self.layers;
        let (old_left, old_right) = (self.root, self.tail);
        let right_column = self.arena[old_right].column;

        let mut left_node = Node::new(SentinelKey::NegativeSentinel, layer, 0);
        left_node.down = Some(old_left);
        let left = self.arena.alloc(left_node);

        let mut right_node = Node::new(SentinelKey::PositiveSentinel, layer, right_column);
        right_node.down = Some(old_right);
        right_node.left = Some(left);
        let right = self.arena.alloc(right_node);

        self.arena[left].right = Some(right);
        self.arena[old_left].up = Some(left);
        self.arena[old_right].up = Some(right);

        notify(&mut self.sink, || Event::NodeCreated {
            id: left,
            key: SentinelKey::NegativeSentinel,
            layer,
            column: 0,
        });
        notify(&mut self.sink, || Event::NodeCreated {
            id: right,
            key: SentinelKey::PositiveSentinel,
            layer,
            column: right_column,
        });
        notify(&mut self.sink, || Event::Connected {
            from: left,
            to: right,
            directed: true,
        });
        notify(&mut self.sink, || Event::Connected {
            from: left,
            to: old_left,
            directed: false,
        });
        notify(&mut self.sink, || Event::Connected {
            from: right,
            to: old_right,
            directed: false,
        });

        self.root = left;
        self.tail = right;
        self.layers += 1;
        debug!(layers = self.layers, "grew a new top layer");
        left
    }

    /// Creates a node right of `left` on the same layer and links it in
    /// both directions.
    fn splice_after(&mut self, left: NodeId, key: SentinelKey<K>, layer: usize, column: usize) -> NodeId {
        let right = self.arena[left].right;
        let event_key = self.sink.is_active().then(|| key.clone());

        let mut node = Node::new(key, layer, column);
        node.left = Some(left);
        node.right = right;
        let id = self.arena.alloc(node);

        self.arena[left].right = Some(id);
        if let Some(right) = right {
            self.arena[right].left = Some(id);
        }

        if let Some(key) = event_key {
            if let Some(right) = right {
                self.sink.emit(Event::Disconnected {
                    from: left,
                    to: right,
                });
            }
            self.sink.emit(Event::NodeCreated {
                id,
                key,
                layer,
                column,
            });
            self.sink.emit(Event::Connected {
                from: left,
                to: id,
                directed: true,
            });
            if let Some(right) = right {
                self.sink.emit(Event::Connected {
                    from: id,
                    to: right,
                    directed: true,
                });
            }
            self.sink.emit(Event::Highlighted { id, on: true });
            self.sink.emit(Event::Highlighted { id, on: false });
        }
        id
    }

    /// Moves every tower from `start` rightwards one column, towards the
    /// right when `grow` is set and towards the left otherwise.
    fn shift_columns(&mut self, start: Option<NodeId>, grow: bool) {
        let mut base = start;
        while let Some(column_base) = base {
            let mut tower = Some(column_base);
            while let Some(id) = tower {
                let node = &mut self.arena[id];
                node.column = if grow {
                    node.column + 1
                } else {
                    node.column.saturating_sub(1)
                };
                let (column, layer) = (node.column, node.layer);
                tower = node.up;
                self.sink.emit(Event::NodeMoved { id, column, layer });
            }
            base = self.arena[column_base].right;
        }
    }
}

/// Creates the two sentinels of an empty bottom layer.
fn bootstrap<K, S: EventSink<K>>(arena: &mut Arena<K>, sink: &mut S) -> (NodeId, NodeId) {
    let left = arena.alloc(Node::new(SentinelKey::NegativeSentinel, 0, 0));
    let mut right_node = Node::new(SentinelKey::PositiveSentinel, 0, 1);
    right_node.left = Some(left);
    let right = arena.alloc(right_node);
    arena[left].right = Some(right);

    notify(sink, || Event::NodeCreated {
        id: left,
        key: SentinelKey::NegativeSentinel,
        layer: 0,
        column: 0,
    });
    notify(sink, || Event::NodeCreated {
        id: right,
        key: SentinelKey::PositiveSentinel,
        layer: 0,
        column: 1,
    });
    notify(sink, || Event::Connected {
        from: left,
        to: right,
        directed: true,
    });
    (left, right)
}

/// Goes right while the next key is `<= key`, otherwise down, until there
/// is nothing below. The returned bottom-layer node `p` satisfies
/// `p.key <= key < p.right.key`.
fn search<K, S>(arena: &Arena<K>, root: NodeId, key: &K, sink: &mut S) -> NodeId
where
    K: Ord + Debug,
    S: EventSink<K> + ?Sized,
{
    notify(sink, || Event::Message(format!("Searching for {:?}", key)));

    let mut current = root;
    loop {
        loop {
            notify(sink, || Event::Highlighted {
                id: current,
                on: true,
            });

            let step = arena[current]
                .right
                .filter(|right| arena[*right].key.cmp_value(key).is_le());
            notify(sink, || {
                Event::Message(
                    if step.is_some() {
                        "Going right"
                    } else {
                        "Going down"
                    }
                    .to_string(),
                )
            });
            notify(sink, || Event::Highlighted {
                id: current,
                on: false,
            });

            match step {
                | Some(right) => {
                    notify(sink, || Event::Connected {
                        from: current,
                        to: right,
                        directed: true,
                    });
                    current = right;
                },
                | None => break,
            }
        }

        match arena[current].down {
            | Some(down) => {
                notify(sink, || Event::Connected {
                    from: current,
                    to: down,
                    directed: false,
                });
                current = down;
            },
            | None => break,
        }
    }

    notify(sink, || {
        Event::Message("No layers below; Finish searching".to_string())
    });
    current
}

impl<K: Ord + Clone + Debug, P: PromotionPolicy, S: EventSink<K>> Extend<K> for SkipList<K, P, S> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            let _ = self.insert(key);
        }
    }
}

impl<K: Ord + Clone + Debug> FromIterator<K> for SkipList<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut list = SkipList::new();
        list.extend(iter);
        list
    }
}

impl<'a, K, P, S> IntoIterator for &'a SkipList<K, P, S>
where
    K: Ord + Clone + Debug,
    P: PromotionPolicy,
    S: EventSink<K>,
{
    type IntoIter = Iter<'a, K>;
    type Item = &'a K;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Display, P, S> Display for SkipList<K, P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        let bottom = LayerIter::new(&self.arena, Some(self.head));
        for (i, key) in bottom.enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", key)?;
        }
        write!(f, "]")
    }
}

impl<K: Debug, P, S> Debug for SkipList<K, P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SkipList {{ len: {}, layers: {} }}", self.len, self.layers)?;
        let mut rows = Some(self.root);
        while let Some(left) = rows {
            let layer = self.arena[left].layer;
            let keys: Vec<_> = LayerIter::new(&self.arena, Some(left)).collect();
            writeln!(f, "  {}: {:?}", layer, keys)?;
            rows = self.arena[left].down;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        search,
        InsertResult,
        LookupResult,
        RemoveResult,
        SkipList,
    };
    use crate::{
        config::Config,
        errs::SkipListError,
        event::{
            Event,
            EventLog,
            EventSink,
            NoopSink,
        },
        key::SentinelKey::{
            self,
            NegativeSentinel,
            PositiveSentinel,
            Value,
        },
        skiplist::promotion::{
            PromotionPolicy,
            RandomPromotionPolicy,
            ScriptedPolicy,
        },
    };

    fn layer_of<K, P, S>(list: &SkipList<K, P, S>, layer: usize) -> Vec<SentinelKey<K>>
    where
        K: Ord + Clone + std::fmt::Debug,
        P: PromotionPolicy,
        S: EventSink<K>,
    {
        list.layer(layer).unwrap().cloned().collect()
    }

    #[test]
    fn test_empty() {
        let list: SkipList<i32> = SkipList::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert_eq!(list.layer_count(), 1);
        assert_eq!(layer_of(&list, 0), vec![NegativeSentinel, PositiveSentinel]);
        assert!(list.layer(1).is_none());
        assert!(list.verify().is_ok());
    }

    #[test]
    fn test_scenario_insert_lookup_remove() {
        let mut list = SkipList::with_policy(ScriptedPolicy::never());
        assert_eq!(list.insert(30), InsertResult::Inserted);
        assert_eq!(list.insert(10), InsertResult::Inserted);
        assert_eq!(list.insert(20), InsertResult::Inserted);

        assert_eq!(
            layer_of(&list, 0),
            vec![NegativeSentinel, Value(10), Value(20), Value(30), PositiveSentinel]
        );
        assert_eq!(list.len(), 3);
        assert_eq!(list.lookup(&20), LookupResult::Found);
        assert_eq!(list.lookup(&99), LookupResult::NotFound);

        assert_eq!(list.remove(&10), RemoveResult::Removed);
        assert_eq!(
            layer_of(&list, 0),
            vec![NegativeSentinel, Value(20), Value(30), PositiveSentinel]
        );
        assert_eq!(list.len(), 2);
        assert!(list.verify().is_ok());
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut list = SkipList::with_policy(ScriptedPolicy::new([true, false, true, true]));
        assert_eq!(list.insert(5), InsertResult::Inserted);
        let layers = list.layer_count();
        assert_eq!(list.insert(5), InsertResult::AlreadyPresent);
        assert_eq!(list.len(), 1);
        assert_eq!(list.layer_count(), layers);
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![5]);
        // the duplicate never consulted the policy
        assert_eq!(list.policy().remaining(), 2);
    }

    #[test]
    fn test_remove_absent() {
        let mut list: SkipList<i32> = [1, 2, 3].into_iter().collect();
        assert_eq!(list.remove(&4), RemoveResult::NotFound);
        assert_eq!(list.len(), 3);
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_forced_promotions_build_a_tower() {
        let mut policy = RandomPromotionPolicy::seeded(0.0, 3).unwrap();
        policy.force(3);
        let mut list = SkipList::with_policy(policy);

        assert_eq!(list.insert(42), InsertResult::Inserted);
        assert_eq!(list.height_of(&42), 4);
        assert_eq!(list.layer_count(), 4);
        for layer in 0..4 {
            assert_eq!(
                layer_of(&list, layer),
                vec![NegativeSentinel, Value(42), PositiveSentinel]
            );
        }

        // the override is spent, p = 0 keeps the next key on the bottom
        assert_eq!(list.insert(7), InsertResult::Inserted);
        assert_eq!(list.height_of(&7), 1);
        assert_eq!(list.layer_count(), 4);
        assert!(list.verify().is_ok());
    }

    #[test]
    fn test_promotion_reuses_existing_layers() {
        // 50 climbs to layer 2, then 20 climbs to layer 1 only
        let mut list = SkipList::with_policy(ScriptedPolicy::new([true, true, false, true, false]));
        let _ = list.insert(50);
        let _ = list.insert(20);
        let _ = list.insert(35);

        assert_eq!(list.layer_count(), 3);
        assert_eq!(
            layer_of(&list, 2),
            vec![NegativeSentinel, Value(50), PositiveSentinel]
        );
        assert_eq!(
            layer_of(&list, 1),
            vec![NegativeSentinel, Value(20), Value(50), PositiveSentinel]
        );
        assert_eq!(
            layer_of(&list, 0),
            vec![NegativeSentinel, Value(20), Value(35), Value(50), PositiveSentinel]
        );
        assert!(list.verify().is_ok());
    }

    #[test]
    fn test_removal_keeps_empty_layers() {
        let mut list = SkipList::with_policy(ScriptedPolicy::new([true, true]));
        let _ = list.insert(1);
        assert_eq!(list.layer_count(), 3);

        assert_eq!(list.remove(&1), RemoveResult::Removed);
        assert_eq!(list.layer_count(), 3);
        for layer in 0..3 {
            assert_eq!(layer_of(&list, layer), vec![NegativeSentinel, PositiveSentinel]);
        }
        assert_eq!(list.lookup(&1), LookupResult::NotFound);
        assert!(list.verify().is_ok());
    }

    #[test]
    fn test_max_layers_caps_promotion() {
        let config = Config::new().with_probability(1.0).with_max_layers(4).with_seed(1);
        let mut list: SkipList<u32> = SkipList::from_config(&config).unwrap();
        for key in 0..16 {
            let _ = list.insert(key);
        }
        assert_eq!(list.layer_count(), 4);
        assert_eq!(list.height_of(&9), 4);
        assert!(list.verify().is_ok());

        assert_eq!(list.set_max_layers(0), Err(SkipListError::InvalidMaxLayers(0)));
        assert_eq!(list.max_layers(), 4);
    }

    #[test]
    fn test_ceiling_drops_unused_forced_promotions() {
        let mut list: SkipList<u32> = SkipList::with_policy(RandomPromotionPolicy::seeded(0.0, 1).unwrap());
        list.set_max_layers(3).unwrap();

        list.policy_mut().force(5);
        assert_eq!(list.insert(10), InsertResult::Inserted);
        assert_eq!(list.height_of(&10), 3);
        assert_eq!(list.policy().pending(), None);

        // p = 0, so nothing after the forced insertion may climb
        assert_eq!(list.insert(20), InsertResult::Inserted);
        assert_eq!(list.height_of(&20), 1);
        assert!(list.verify().is_ok());
    }

    #[test]
    fn test_from_config_rejects_bad_probability() {
        let config = Config::new().with_probability(3.0);
        assert!(SkipList::<u8>::from_config(&config).is_err());
    }

    #[test]
    fn test_contains_and_height_of() {
        let mut list = SkipList::with_policy(ScriptedPolicy::new([false, true, false]));
        let _ = list.insert("b");
        let _ = list.insert("a");
        assert!(list.contains(&"a"));
        assert!(!list.contains(&"c"));
        assert_eq!(list.height_of(&"b"), 1);
        assert_eq!(list.height_of(&"a"), 2);
        assert_eq!(list.height_of(&"c"), 0);
    }

    #[test]
    fn test_clear() {
        let mut list = SkipList::with_policy(ScriptedPolicy::new([true, true, true]));
        list.extend([3, 1, 2]);
        assert!(list.layer_count() > 1);

        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.layer_count(), 1);
        assert_eq!(layer_of(&list, 0), vec![NegativeSentinel, PositiveSentinel]);
        assert!(list.verify().is_ok());

        let _ = list.insert(9);
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![9]);
    }

    #[test]
    fn test_display_and_debug() {
        let mut list = SkipList::with_policy(ScriptedPolicy::new([false, false, true]));
        list.extend([20, 10, 30]);
        assert_eq!(list.to_string(), "[-inf, 10, 20, 30, +inf]");

        let debug = format!("{:?}", list);
        assert!(debug.contains("len: 3, layers: 2"));
        assert!(debug.contains("1: [NegativeSentinel, Value(30), PositiveSentinel]"));
    }

    #[test]
    fn test_columns_follow_the_bottom_layer() {
        let mut list = SkipList::with_policy_and_sink(ScriptedPolicy::new([false, true]), EventLog::new());
        let _ = list.insert(30);
        let _ = list.insert(10);
        let _ = list.insert(20);

        let columns = |list: &SkipList<i32, ScriptedPolicy, EventLog<i32>>, key: i32| {
            let found = search(&list.arena, list.root, &key, &mut NoopSink);
            list.arena[found].column
        };
        assert_eq!(columns(&list, 10), 1);
        assert_eq!(columns(&list, 20), 2);
        assert_eq!(columns(&list, 30), 3);
        assert_eq!(list.arena[list.tail].column, 4);
        assert!(list.verify().is_ok());

        let _ = list.remove(&10);
        assert_eq!(columns(&list, 20), 1);
        assert_eq!(columns(&list, 30), 2);
        assert!(list.verify().is_ok());
    }

    #[test]
    fn test_events_narrate_an_insert() {
        let mut list = SkipList::with_policy_and_sink(ScriptedPolicy::never(), EventLog::new());
        list.sink_mut().drain();

        let _ = list.insert(7);
        let log = list.sink();
        let messages: Vec<_> = log.messages().collect();
        assert_eq!(messages.first(), Some(&"Searching for 7"));
        assert!(messages.contains(&"Insert the key 7"));
        assert!(messages.contains(&"Coin flip result: False; Stop"));
        assert_eq!(messages.last(), Some(&"Successfully inserted the key 7"));

        let created: Vec<_> = log
            .events()
            .iter()
            .filter_map(|e| match e {
                | Event::NodeCreated { key, layer, column, .. } => Some((key.clone(), *layer, *column)),
                | _ => None,
            })
            .collect();
        assert_eq!(created, vec![(Value(7), 0, 1)]);
        assert!(log
            .events()
            .iter()
            .any(|e| matches!(e, Event::NodeMoved { column: 2, layer: 0, .. })));
    }

    #[test]
    fn test_events_narrate_a_remove() {
        let mut list = SkipList::with_policy_and_sink(ScriptedPolicy::new([false, true, false]), EventLog::new());
        list.extend([1, 2, 3]);
        let bottom = list.locate(&2);
        let top = list.node(bottom).and_then(|n| n.up()).unwrap();
        let left = list.locate(&1);
        let right = list.node(bottom).and_then(|n| n.right()).unwrap();
        list.sink_mut().drain();

        assert_eq!(list.remove(&2), RemoveResult::Removed);
        let log = list.sink();
        let events = log.events();
        for id in [bottom, top] {
            assert!(events.contains(&Event::NodeDeleted { id }));
            assert!(events
                .iter()
                .any(|e| matches!(e, Event::Disconnected { to, .. } if *to == id)));
            assert!(events
                .iter()
                .any(|e| matches!(e, Event::Disconnected { from, .. } if *from == id)));
        }
        assert!(events.contains(&Event::Disconnected { from: left, to: bottom }));
        assert!(events.contains(&Event::Disconnected { from: bottom, to: right }));
        assert!(events.contains(&Event::Connected {
            from: left,
            to: right,
            directed: true,
        }));
        assert_eq!(log.messages().last(), Some("Successfully removed key 2"));
        assert!(list.verify().is_ok());
    }

    #[test]
    fn test_events_on_missing_key() {
        let mut list: SkipList<i32, _, _> = SkipList::with_policy_and_sink(ScriptedPolicy::never(), EventLog::new());
        let _ = list.lookup(&3);
        let _ = list.remove(&3);
        let messages: Vec<_> = list.sink().messages().collect();
        assert!(messages.contains(&"Key 3 not found"));
        assert!(messages.contains(&"Key 3 not found and thus not in the list now"));
        assert!(!list
            .sink()
            .events()
            .iter()
            .any(|e| matches!(e, Event::NodeDeleted { .. })));
    }

    #[test]
    fn test_observer_does_not_change_results() {
        let script = [true, false, false, true, true, false, false];
        let mut quiet = SkipList::with_policy(ScriptedPolicy::new(script));
        let mut loud = SkipList::with_policy_and_sink(ScriptedPolicy::new(script), EventLog::new());
        for key in [4, 8, 2, 6] {
            assert_eq!(quiet.insert(key), loud.insert(key));
        }
        assert_eq!(quiet.remove(&8), loud.remove(&8));
        for layer in 0..quiet.layer_count() {
            assert_eq!(layer_of(&quiet, layer), layer_of(&loud, layer));
        }
        assert!(!loud.into_sink().events().is_empty());
    }

    #[test]
    fn test_locate_returns_predecessor() {
        let mut list = SkipList::with_policy(ScriptedPolicy::new([true, false, false, true]));
        list.extend([10, 20, 30]);
        let p = list.locate(&25);
        assert_eq!(list.node(p).map(|n| n.key().clone()), Some(Value(20)));
        let p = list.locate(&5);
        assert_eq!(list.node(p).map(|n| n.key().clone()), Some(NegativeSentinel));
        let p = list.locate(&30);
        assert_eq!(list.node(p).map(|n| n.layer()), Some(0));
        assert_eq!(list.node(p).map(|n| n.key().clone()), Some(Value(30)));
    }
}
