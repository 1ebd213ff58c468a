//! Terminal reducers: fold, reduce, head, at, min/max, all/any, count, find,
//! contains, sum, avg, group_by, join, divide, plus the numeric `cast` stage
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use super::constructors::Numeric;
use super::core::{Map, Request, Seq};
use crate::error::{SeqError, SeqResult};

/// Single pass over `all` keeping the element `better` prefers.
/// Ties keep the earlier element.
fn select_by<T, F>(all: Vec<T>, mut better: F) -> Option<T>
where
    F: FnMut(&T, &T) -> bool,
{
    let mut it = all.into_iter();
    let mut best = it.next()?;
    for e in it {
        if better(&e, &best) {
            best = e;
        }
    }
    Some(best)
}

pub trait UtilitySeqExt: Seq + Sized {
    /// Call `f(index, element)` for every element
    fn for_each<F>(mut self, mut f: F)
    where
        F: FnMut(usize, Self::Item),
    {
        for (i, e) in self.next(Request::All).into_iter().enumerate() {
            f(i, e);
        }
    }

    fn fold<A, F>(mut self, init: A, f: F) -> A
    where
        F: FnMut(A, Self::Item) -> A,
    {
        self.next(Request::All).into_iter().fold(init, f)
    }

    /// Fold seeded with the first element; `None` when empty
    fn reduce<F>(mut self, f: F) -> Option<Self::Item>
    where
        F: FnMut(Self::Item, Self::Item) -> Self::Item,
    {
        self.next(Request::All).into_iter().reduce(f)
    }

    /// First element, pulling only one
    fn head(mut self) -> Option<Self::Item> {
        self.next(Request::Count(1)).pop()
    }

    /// Element at `idx`, pulling `idx + 1`
    fn at(mut self, idx: usize) -> Option<Self::Item> {
        let want = idx.saturating_add(1);
        let mut batch = self.next(Request::Count(want));
        if batch.len() < want {
            return None;
        }
        batch.pop()
    }

    fn max(self) -> Option<Self::Item>
    where
        Self::Item: PartialOrd,
    {
        self.max_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
    }

    fn max_by<F>(mut self, mut cmp: F) -> Option<Self::Item>
    where
        F: FnMut(&Self::Item, &Self::Item) -> Ordering,
    {
        select_by(self.next(Request::All), |e, best| cmp(e, best) == Ordering::Greater)
    }

    fn min(self) -> Option<Self::Item>
    where
        Self::Item: PartialOrd,
    {
        self.min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
    }

    fn min_by<F>(mut self, mut cmp: F) -> Option<Self::Item>
    where
        F: FnMut(&Self::Item, &Self::Item) -> Ordering,
    {
        select_by(self.next(Request::All), |e, best| cmp(e, best) == Ordering::Less)
    }

    /// `(min, max)` in one pass
    fn min_max(self) -> Option<(Self::Item, Self::Item)>
    where
        Self::Item: PartialOrd + Clone,
    {
        self.min_max_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
    }

    fn min_max_by<F>(mut self, mut cmp: F) -> Option<(Self::Item, Self::Item)>
    where
        Self::Item: Clone,
        F: FnMut(&Self::Item, &Self::Item) -> Ordering,
    {
        let mut it = self.next(Request::All).into_iter();
        let first = it.next()?;
        let (mut lo, mut hi) = (first.clone(), first);
        for e in it {
            if cmp(&e, &lo) == Ordering::Less {
                lo = e;
            } else if cmp(&e, &hi) == Ordering::Greater {
                hi = e;
            }
        }
        Some((lo, hi))
    }

    /// True for an empty sequence
    fn all<F>(mut self, f: F) -> bool
    where
        F: FnMut(&Self::Item) -> bool,
    {
        self.next(Request::All).iter().all(f)
    }

    fn any<F>(mut self, f: F) -> bool
    where
        F: FnMut(&Self::Item) -> bool,
    {
        self.next(Request::All).iter().any(f)
    }

    fn and(self) -> bool
    where
        Self: Seq<Item = bool>,
    {
        self.all(|b| *b)
    }

    fn or(self) -> bool
    where
        Self: Seq<Item = bool>,
    {
        self.any(|b| *b)
    }

    fn count(mut self) -> usize {
        self.next(Request::All).len()
    }

    fn find<F>(mut self, mut f: F) -> Option<Self::Item>
    where
        F: FnMut(&Self::Item) -> bool,
    {
        self.next(Request::All).into_iter().find(|e| f(e))
    }

    fn contains(self, value: &Self::Item) -> bool
    where
        Self::Item: PartialEq,
    {
        self.any(|e| e == value)
    }

    /// True when at least one of `values` occurs
    fn contains_any(mut self, values: &[Self::Item]) -> bool
    where
        Self::Item: Eq + Hash,
    {
        if values.is_empty() {
            return false;
        }
        let wanted: HashSet<&Self::Item> = values.iter().collect();
        self.next(Request::All).iter().any(|e| wanted.contains(e))
    }

    /// True when every one of `values` occurs; vacuously true for none
    fn contains_all(mut self, values: &[Self::Item]) -> bool
    where
        Self::Item: Eq + Hash,
    {
        let mut missing: HashSet<&Self::Item> = values.iter().collect();
        if missing.is_empty() {
            return true;
        }
        for e in self.next(Request::All) {
            missing.remove(&e);
            if missing.is_empty() {
                return true;
            }
        }
        false
    }

    fn sum(self) -> Self::Item
    where
        Self::Item: Numeric,
    {
        self.fold(<Self::Item as Numeric>::zero(), |acc, e| acc + e)
    }

    fn sum_by<N, F>(self, mut f: F) -> N
    where
        N: Numeric,
        F: FnMut(Self::Item) -> N,
    {
        self.fold(N::zero(), |acc, e| acc + f(e))
    }

    /// Arithmetic mean as `f64`, 0.0 for an empty sequence
    fn avg(self) -> f64
    where
        Self::Item: Numeric,
    {
        self.avg_by(|e| e)
    }

    fn avg_by<N, F>(mut self, mut f: F) -> f64
    where
        N: Numeric,
        F: FnMut(Self::Item) -> N,
    {
        let all = self.next(Request::All);
        if all.is_empty() {
            return 0.0;
        }
        let len = all.len() as f64;
        all.into_iter().map(|e| f(e).to_f64()).sum::<f64>() / len
    }

    /// Bucket elements by `key(element)`, keeping upstream order per bucket
    fn group_by<K, F>(mut self, mut key: F) -> HashMap<K, Vec<Self::Item>>
    where
        K: Eq + Hash,
        F: FnMut(&Self::Item) -> K,
    {
        let mut groups: HashMap<K, Vec<Self::Item>> = HashMap::new();
        for e in self.next(Request::All) {
            groups.entry(key(&e)).or_default().push(e);
        }
        groups
    }

    fn join(mut self, sep: &str) -> String
    where
        Self::Item: AsRef<str>,
    {
        let all = self.next(Request::All);
        let mut out = String::new();
        for (i, s) in all.iter().enumerate() {
            if i > 0 {
                out.push_str(sep);
            }
            out.push_str(s.as_ref());
        }
        out
    }

    /// Split into `n` contiguous parts whose lengths differ by at most one;
    /// the first `len % n` parts carry the extra element.
    fn divide(mut self, n: usize) -> SeqResult<Vec<Vec<Self::Item>>> {
        if n == 0 {
            return Err(SeqError::invalid("divide count must be greater than 0"));
        }
        let all = self.next(Request::All);
        let (base, extra) = (all.len() / n, all.len() % n);
        let mut it = all.into_iter();
        let parts = (0..n)
            .map(|i| {
                let size = base + usize::from(i < extra);
                it.by_ref().take(size).collect()
            })
            .collect();
        Ok(parts)
    }

    /// Numeric conversion with `as` semantics. Integer to integer is exact
    /// where the target can hold the value; floats saturate at the target's range.
    #[allow(clippy::type_complexity)]
    fn cast<U>(self) -> Map<Self, fn(Self::Item) -> U>
    where
        Self::Item: Numeric,
        U: Numeric,
    {
        Map { seq: self, f: cast_numeric::<Self::Item, U> as fn(Self::Item) -> U }
    }
}

fn cast_numeric<T: Numeric, U: Numeric>(v: T) -> U {
    U::from_scalar(v.to_scalar())
}

impl<S: Seq> UtilitySeqExt for S {}
