//! Skiplayer - a probabilistic [`skip list`] laid out as a lattice of nodes.
//!
//! ```
//! use skiplayer::{
//!     InsertResult,
//!     LookupResult,
//!     SkipList,
//! };
//!
//! let mut list = SkipList::new();
//! assert_eq!(list.insert(30), InsertResult::Inserted);
//! assert_eq!(list.insert(10), InsertResult::Inserted);
//! assert_eq!(list.insert(10), InsertResult::AlreadyPresent);
//!
//! assert_eq!(list.lookup(&10), LookupResult::Found);
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![10, 30]);
//! ```
//!
//! [`skip list`]: https://en.wikipedia.org/wiki/Skip_list

mod arena;

/// Tunables for the promotion policy and layer ceiling
pub mod config;
pub mod errs;
/// Structural events for external observers
pub mod event;
pub mod key;
pub mod node;
/// The skip list itself
pub mod skiplist;

pub use config::Config;
pub use errs::SkipListError;
pub use event::{
    Event,
    EventLog,
    EventSink,
    NoopSink,
    TracingSink,
};
pub use key::SentinelKey;
pub use node::{
    Node,
    NodeId,
};
pub use skiplist::{
    InsertResult,
    LookupResult,
    PromotionPolicy,
    RandomPromotionPolicy,
    RemoveResult,
    ScriptedPolicy,
    SkipList,
};
