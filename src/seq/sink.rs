//! Sinks draining a sequence into an ordered or associative container
use std::collections::HashMap;
use std::hash::Hash;

use super::core::{Request, Seq};
use crate::error::SeqResult;

pub trait SinkSeqExt: Seq + Sized {
    /// Drain everything into a `Vec`.
    ///
    /// # Panics
    ///
    /// On an unbounded sequence such as `repeat`; see [`SinkSeqExt::try_to_vec`].
    fn to_vec(mut self) -> Vec<Self::Item> {
        self.next(Request::All)
    }

    /// Drain everything, or fail with `UnboundedDrain` without pulling
    fn try_to_vec(mut self) -> SeqResult<Vec<Self::Item>> {
        self.try_next(Request::All)
    }

    /// Build a map from `f(element)`; the last write wins on a key collision
    fn to_map<K, V, F>(mut self, mut f: F) -> HashMap<K, V>
    where
        K: Eq + Hash,
        F: FnMut(Self::Item) -> (K, V),
    {
        let all = self.next(Request::All);
        let mut map = HashMap::with_capacity(all.len());
        for e in all {
            let (k, v) = f(e);
            map.insert(k, v);
        }
        map
    }

    /// Build a map from `f(element)`, resolving collisions with
    /// `merge(existing, incoming)`
    fn to_map_with<K, V, F, M>(mut self, mut f: F, mut merge: M) -> HashMap<K, V>
    where
        K: Eq + Hash,
        F: FnMut(Self::Item) -> (K, V),
        M: FnMut(V, V) -> V,
    {
        let all = self.next(Request::All);
        let mut map: HashMap<K, V> = HashMap::with_capacity(all.len());
        for e in all {
            let (k, v) = f(e);
            let merged = match map.remove(&k) {
                Some(existing) => merge(existing, v),
                None => v,
            };
            map.insert(k, merged);
        }
        map
    }

    /// Key each whole element by `key(element)`; the last write wins
    fn to_map_values<K, F>(mut self, mut key: F) -> HashMap<K, Self::Item>
    where
        K: Eq + Hash,
        F: FnMut(&Self::Item) -> K,
    {
        let all = self.next(Request::All);
        let mut map = HashMap::with_capacity(all.len());
        for e in all {
            map.insert(key(&e), e);
        }
        map
    }

    /// Collect `(key, value)` elements into a map
    fn kv_to_map<K, V>(self) -> HashMap<K, V>
    where
        Self: Seq<Item = (K, V)>,
        K: Eq + Hash,
    {
        self.to_map(|kv| kv)
    }
}

impl<S: Seq> SinkSeqExt for S {}
