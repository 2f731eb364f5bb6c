//! A skip list kept as a lattice of nodes linked in four directions.
//!
//! SkipLists use a probabilistic distribution of nodes over the internal
//! layers, whereby the lowest layer (layer 0) contains all the keys, and each
//! layer `n > 0` contains a random subset of the keys on layer `n - 1`.
//!
//! ```text
//! layer 2:  -inf ───────────────────► 50 ─────────► +inf
//!             │                        │              │
//! layer 1:  -inf ────────► 20 ───────► 50 ─────────► +inf
//!             │             │          │              │
//! layer 0:  -inf ──► 10 ──► 20 ──► 30 ──► 50 ──► 60 ──► +inf
//! ```
//!
//! Every layer is bounded by its own pair of sentinels, and each node links to
//! its neighbors left, right, up and down. A search starts at the top-left
//! sentinel, moves right while the next key is not past the target and drops
//! down otherwise. After a key is placed on a layer a [`PromotionPolicy`] is
//! asked whether it should also appear on the layer above; when it climbs past
//! the current top, a fresh layer of sentinels is stacked on first.
//!
//! Most commonly a fair coin is used, but the policy is pluggable so layouts
//! can be scripted.

mod iter;
mod list;
mod promotion;
mod verify;

pub use iter::{
    Iter,
    LayerIter,
};
pub use list::{
    InsertResult,
    LookupResult,
    RemoveResult,
    SkipList,
};
pub use promotion::{
    PromotionPolicy,
    RandomPromotionPolicy,
    ScriptedPolicy,
};
