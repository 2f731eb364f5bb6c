// Copyright (c) Sienna Satterwhite, Skiplayer Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use std::{
    cmp::Ordering,
    fmt,
};

/// A key stored in a lattice node. Every layer is bounded by a
/// [`SentinelKey::NegativeSentinel`] on the left and a
/// [`SentinelKey::PositiveSentinel`] on the right, which behave as -inf and
/// +inf when compared against real keys.
///
/// The variant order matters: the derived [`Ord`] ranks
/// `NegativeSentinel < Value(_) < PositiveSentinel`, and values compare by
/// their own ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SentinelKey<K> {
    NegativeSentinel,
    Value(K),
    PositiveSentinel,
}

impl<K> SentinelKey<K> {
    #[inline]
    pub fn is_sentinel(&self) -> bool {
        !matches!(self, SentinelKey::Value(_))
    }

    #[inline]
    pub fn value(&self) -> Option<&K> {
        match self {
            | SentinelKey::Value(k) => Some(k),
            | _ => None,
        }
    }

    #[inline]
    pub fn into_value(self) -> Option<K> {
        match self {
            | SentinelKey::Value(k) => Some(k),
            | _ => None,
        }
    }
}

impl<K: Ord> SentinelKey<K> {
    /// Compares a stored key against a bare search key.
    #[inline]
    pub fn cmp_value(&self, key: &K) -> Ordering {
        match self {
            | SentinelKey::NegativeSentinel => Ordering::Less,
            | SentinelKey::Value(k) => k.cmp(key),
            | SentinelKey::PositiveSentinel => Ordering::Greater,
        }
    }
}

impl<K> From<K> for SentinelKey<K> {
    fn from(key: K) -> Self {
        SentinelKey::Value(key)
    }
}

impl<K: fmt::Display> fmt::Display for SentinelKey<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            | SentinelKey::NegativeSentinel => write!(f, "-inf"),
            | SentinelKey::Value(k) => write!(f, "{}", k),
            | SentinelKey::PositiveSentinel => write!(f, "+inf"),
        }
    }
}

/// Total order over sentinel-tagged keys. Each sentinel is equal only to
/// itself.
#[inline]
pub fn compare<K: Ord>(a: &SentinelKey<K>, b: &SentinelKey<K>) -> Ordering {
    a.cmp(b)
}
