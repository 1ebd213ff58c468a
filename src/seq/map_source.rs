//! Sources over the entries, keys or values of a `HashMap`
//!
//! A request that covers the whole map on first use snapshots it in one pass.
//! Anything smaller switches the source to a persistent `hash_map::IntoIter`
//! cursor, so later pulls resume where the previous one stopped.
use std::collections::hash_map::{self, RandomState};
use std::collections::HashMap;

use log::debug;

use super::core::{Request, Seq};

enum MapCursor<K, V, H> {
    Fresh(HashMap<K, V, H>),
    Draining(hash_map::IntoIter<K, V>),
    Done,
}

impl<K, V, H> MapCursor<K, V, H> {
    fn pull<U, Snap, Proj>(&mut self, request: Request, snapshot: Snap, mut project: Proj) -> Vec<U>
    where
        Snap: FnOnce(HashMap<K, V, H>) -> Vec<U>,
        Proj: FnMut((K, V)) -> U,
    {
        if request.is_empty() {
            return Vec::new();
        }

        let mut cursor = match std::mem::replace(self, MapCursor::Done) {
            MapCursor::Fresh(map) if request.covers(map.len()) => {
                debug!("map source: snapshot of {} entries", map.len());
                return snapshot(map);
            }
            MapCursor::Fresh(map) => map.into_iter(),
            MapCursor::Draining(cursor) => cursor,
            MapCursor::Done => return Vec::new(),
        };

        let out: Vec<U> = match request {
            Request::Count(n) => cursor.by_ref().take(n).map(&mut project).collect(),
            Request::All => cursor.by_ref().map(&mut project).collect(),
        };
        if cursor.len() > 0 {
            *self = MapCursor::Draining(cursor);
        }
        out
    }

    fn remaining(&self) -> usize {
        match self {
            MapCursor::Fresh(map) => map.len(),
            MapCursor::Draining(cursor) => cursor.len(),
            MapCursor::Done => 0,
        }
    }
}

/// `(key, value)` pairs of a map
pub struct MapEntries<K, V, H = RandomState> {
    cursor: MapCursor<K, V, H>,
}

impl<K, V, H> Seq for MapEntries<K, V, H> {
    type Item = (K, V);

    fn next(&mut self, request: Request) -> Vec<(K, V)> {
        self.cursor
            .pull(request, |map| map.into_iter().collect(), |kv| kv)
    }
}

pub struct MapKeys<K, V, H = RandomState> {
    cursor: MapCursor<K, V, H>,
}

impl<K, V, H> Seq for MapKeys<K, V, H> {
    type Item = K;

    fn next(&mut self, request: Request) -> Vec<K> {
        self.cursor
            .pull(request, |map| map.into_keys().collect(), |(k, _)| k)
    }
}

pub struct MapValues<K, V, H = RandomState> {
    cursor: MapCursor<K, V, H>,
}

impl<K, V, H> Seq for MapValues<K, V, H> {
    type Item = V;

    fn next(&mut self, request: Request) -> Vec<V> {
        self.cursor
            .pull(request, |map| map.into_values().collect(), |(_, v)| v)
    }
}

macro_rules! impl_remaining {
    ($($t:ident),*) => {
        $(
            impl<K, V, H> $t<K, V, H> {
                /// Entries not yet pulled
                pub fn remaining(&self) -> usize {
                    self.cursor.remaining()
                }
            }
        )*
    };
}

impl_remaining!(MapEntries, MapKeys, MapValues);

pub fn from_map<K, V, H>(map: HashMap<K, V, H>) -> MapEntries<K, V, H> {
    MapEntries { cursor: MapCursor::Fresh(map) }
}

pub fn from_map_keys<K, V, H>(map: HashMap<K, V, H>) -> MapKeys<K, V, H> {
    MapKeys { cursor: MapCursor::Fresh(map) }
}

pub fn from_map_values<K, V, H>(map: HashMap<K, V, H>) -> MapValues<K, V, H> {
    MapValues { cursor: MapCursor::Fresh(map) }
}
