//! Dedup (`uniq`) and duplicate detection (`dup`) with lazy strategy selection
//!
//! Both stages decide on their first non-empty pull how to read upstream:
//! a first request of `All` materializes everything and filters the owned
//! buffer against a pre-sized membership map; anything else filters upstream
//! incrementally and grows the map as it goes.
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use log::debug;

use super::constructors::{from_vec, FromVec};
use super::core::{pull_retain, Request, Seq};
use crate::seq_configuration::FastPathConfig;

/// Upstream reader whose strategy is chosen exactly once
pub(crate) enum FastPath<S: Seq> {
    Unselected(S),
    Eager(FromVec<S::Item>),
    Incremental(S),
    Selecting,
}

impl<S: Seq> FastPath<S> {
    /// Resolve the strategy for the first non-empty request. Returns the
    /// materialized length when the eager strategy was taken.
    pub(crate) fn select(&mut self, request: Request) -> Option<usize> {
        if request.is_empty() || !matches!(self, FastPath::Unselected(_)) {
            return None;
        }
        match std::mem::replace(self, FastPath::Selecting) {
            FastPath::Unselected(mut seq) if request.is_all() => {
                let elems = seq.next(Request::All);
                let len = elems.len();
                *self = FastPath::Eager(from_vec(elems));
                Some(len)
            }
            FastPath::Unselected(seq) => {
                *self = FastPath::Incremental(seq);
                None
            }
            other => {
                *self = other;
                None
            }
        }
    }
}

impl<S: Seq> Seq for FastPath<S> {
    type Item = S::Item;

    fn next(&mut self, request: Request) -> Vec<S::Item> {
        match self {
            FastPath::Unselected(seq) | FastPath::Incremental(seq) => seq.next(request),
            FastPath::Eager(buf) => buf.next(request),
            FastPath::Selecting => Vec::new(),
        }
    }

    fn is_unbounded(&self) -> bool {
        match self {
            FastPath::Unselected(seq) | FastPath::Incremental(seq) => seq.is_unbounded(),
            FastPath::Eager(_) | FastPath::Selecting => false,
        }
    }
}

// ================================
// Uniq
// ================================

/// First occurrence of each key, in upstream order
pub struct Uniq<S: Seq, K, F> {
    pub(crate) source: FastPath<S>,
    pub(crate) key: F,
    pub(crate) seen: HashSet<K>,
    pub(crate) config: FastPathConfig,
}

impl<S: Seq, K, F> Uniq<S, K, F> {
    /// Sizing for the eager strategy; only meaningful before the first pull
    pub fn with_fast_path(mut self, config: FastPathConfig) -> Self {
        self.config = config;
        self
    }
}

impl<S, K, F> Seq for Uniq<S, K, F>
where
    S: Seq,
    K: Eq + Hash,
    F: FnMut(&S::Item) -> K,
{
    type Item = S::Item;

    fn next(&mut self, request: Request) -> Vec<S::Item> {
        if let Some(len) = self.source.select(request) {
            self.seen.reserve(self.config.capacity_for(len));
            debug!("uniq: eager strategy over {} elements", len);
        }
        let key = &mut self.key;
        let seen = &mut self.seen;
        pull_retain(&mut self.source, request, |e| seen.insert(key(e)))
    }

    fn is_unbounded(&self) -> bool {
        self.source.is_unbounded()
    }
}

// ================================
// Dup
// ================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Occurrence {
    Once,
    Reported,
}

/// True exactly when `key` is seen for the second time
fn first_repeat<K: Eq + Hash>(seen: &mut HashMap<K, Occurrence>, key: K) -> bool {
    match seen.entry(key) {
        Entry::Vacant(slot) => {
            slot.insert(Occurrence::Once);
            false
        }
        Entry::Occupied(mut slot) => match slot.get() {
            Occurrence::Once => {
                slot.insert(Occurrence::Reported);
                true
            }
            Occurrence::Reported => false,
        },
    }
}

/// Each repeated key once, at its second occurrence
pub struct Dup<S: Seq, K, F> {
    pub(crate) source: FastPath<S>,
    pub(crate) key: F,
    pub(crate) seen: HashMap<K, Occurrence>,
    pub(crate) config: FastPathConfig,
}

impl<S: Seq, K, F> Dup<S, K, F> {
    /// Sizing for the eager strategy; only meaningful before the first pull
    pub fn with_fast_path(mut self, config: FastPathConfig) -> Self {
        self.config = config;
        self
    }
}

impl<S, K, F> Seq for Dup<S, K, F>
where
    S: Seq,
    K: Eq + Hash,
    F: FnMut(&S::Item) -> K,
{
    type Item = S::Item;

    fn next(&mut self, request: Request) -> Vec<S::Item> {
        if let Some(len) = self.source.select(request) {
            self.seen.reserve(self.config.capacity_for(len));
            debug!("dup: eager strategy over {} elements", len);
        }
        let key = &mut self.key;
        let seen = &mut self.seen;
        pull_retain(&mut self.source, request, |e| first_repeat(seen, key(e)))
    }

    fn is_unbounded(&self) -> bool {
        self.source.is_unbounded()
    }
}

// ================================
// Extension Trait
// ================================

#[allow(clippy::type_complexity)]
pub trait DedupSeqExt: Seq + Sized {
    fn uniq(self) -> Uniq<Self, Self::Item, fn(&Self::Item) -> Self::Item>
    where
        Self::Item: Clone + Eq + Hash,
    {
        self.uniq_by(Clone::clone as fn(&Self::Item) -> Self::Item)
    }

    /// Keep the first element for each distinct `key(element)`
    fn uniq_by<K, F>(self, key: F) -> Uniq<Self, K, F>
    where
        K: Eq + Hash,
        F: FnMut(&Self::Item) -> K,
    {
        Uniq {
            source: FastPath::Unselected(self),
            key,
            seen: HashSet::new(),
            config: FastPathConfig::default(),
        }
    }

    fn dup(self) -> Dup<Self, Self::Item, fn(&Self::Item) -> Self::Item>
    where
        Self::Item: Clone + Eq + Hash,
    {
        self.dup_by(Clone::clone as fn(&Self::Item) -> Self::Item)
    }

    /// Emit an element when its key is seen for the second time; later
    /// repeats are dropped
    fn dup_by<K, F>(self, key: F) -> Dup<Self, K, F>
    where
        K: Eq + Hash,
        F: FnMut(&Self::Item) -> K,
    {
        Dup {
            source: FastPath::Unselected(self),
            key,
            seen: HashMap::new(),
            config: FastPathConfig::default(),
        }
    }
}

impl<S: Seq> DedupSeqExt for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seq::constructors::from_vec;

    #[test]
    fn all_request_selects_eager_path() {
        let mut u = from_vec(vec![3, 1, 2, 3, 3, 5]).uniq();
        assert!(matches!(u.source, FastPath::Unselected(_)));
        assert_eq!(u.next(Request::All), vec![3, 1, 2, 5]);
        assert!(matches!(u.source, FastPath::Eager(_)));
    }

    #[test]
    fn bounded_request_selects_incremental_path() {
        let mut d = from_vec(vec![3, 1, 2, 3, 3, 5]).dup();
        assert_eq!(d.next(Request::Count(1)), vec![3]);
        assert!(matches!(d.source, FastPath::Incremental(_)));
        assert!(d.next(Request::All).is_empty());
    }

    #[test]
    fn empty_request_leaves_strategy_open() {
        let mut u = from_vec(vec![1, 1]).uniq();
        assert!(u.next(Request::Count(0)).is_empty());
        assert!(matches!(u.source, FastPath::Unselected(_)));
    }

    #[test]
    fn occurrence_is_tri_state() {
        let mut seen = HashMap::new();
        assert!(!first_repeat(&mut seen, 'a'));
        assert!(first_repeat(&mut seen, 'a'));
        assert!(!first_repeat(&mut seen, 'a'));
        assert_eq!(seen.get(&'a'), Some(&Occurrence::Reported));
    }
}
