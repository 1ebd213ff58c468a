//! Advanced stages: flat_map, zip, intersperse, prepend/append, chain/concat,
//! chunks, reverse and sort
use std::cmp::Ordering;
use std::collections::VecDeque;

use log::{debug, trace};

use super::constructors::{from_vec, FromVec};
use super::core::{Request, Seq};
use super::peek::Peeker;
use crate::error::{SeqError, SeqResult};
use crate::seq_configuration::ProbeConfig;

// ================================
// FlatMap
// ================================

pub struct FlatMap<S, F, U> {
    pub(crate) seq: S,
    pub(crate) f: F,
    pub(crate) residual: VecDeque<U>,
}

impl<S, F, I> Seq for FlatMap<S, F, I::Item>
where
    S: Seq,
    F: FnMut(S::Item) -> I,
    I: IntoIterator,
{
    type Item = I::Item;

    fn next(&mut self, request: Request) -> Vec<I::Item> {
        match request {
            Request::Count(n) => {
                // Expand one upstream element at a time until the request is covered.
                while self.residual.len() < n {
                    match self.seq.next(Request::Count(1)).pop() {
                        Some(item) => self.residual.extend((self.f)(item)),
                        None => break,
                    }
                }
                let k = n.min(self.residual.len());
                self.residual.drain(..k).collect()
            }
            Request::All => {
                let mut out: Vec<I::Item> = self.residual.drain(..).collect();
                for item in self.seq.next(Request::All) {
                    out.extend((self.f)(item));
                }
                out
            }
        }
    }

    fn is_unbounded(&self) -> bool {
        self.seq.is_unbounded()
    }
}

// ================================
// Zip
// ================================

pub struct Zip<A: Seq, B: Seq, F> {
    pub(crate) left: Peeker<A>,
    pub(crate) right: Peeker<B>,
    pub(crate) f: F,
    pub(crate) probe: ProbeConfig,
}

impl<A: Seq, B: Seq, F> Zip<A, B, F> {
    /// Probe rounds used to find the common length on `Request::All`
    pub fn with_probe(mut self, probe: ProbeConfig) -> Self {
        self.probe = probe;
        self
    }
}

impl<A, B, C, F> Zip<A, B, F>
where
    A: Seq,
    B: Seq,
    F: FnMut(A::Item, B::Item) -> C,
{
    /// Combine the common prefix of the next `size` elements of both sides;
    /// true when either side came back short.
    fn round(&mut self, size: usize) -> (Vec<C>, bool) {
        let l = self.left.peek(Request::Count(size)).len();
        let r = self.right.peek(Request::Count(size)).len();
        let common = l.min(r);
        let lhs = self.left.next(Request::Count(common));
        let rhs = self.right.next(Request::Count(common));
        let f = &mut self.f;
        let out = lhs.into_iter().zip(rhs).map(|(a, b)| f(a, b)).collect();
        (out, common < size)
    }
}

impl<A, B, C, F> Seq for Zip<A, B, F>
where
    A: Seq,
    B: Seq,
    F: FnMut(A::Item, B::Item) -> C,
{
    type Item = C;

    fn next(&mut self, request: Request) -> Vec<C> {
        match request {
            Request::Count(0) => Vec::new(),
            Request::Count(n) => self.round(n).0,
            Request::All => {
                let mut out = Vec::new();
                let mut size = self.probe.first();
                loop {
                    let (batch, short) = self.round(size);
                    trace!("zip: probe of {} matched {}", size, batch.len());
                    out.extend(batch);
                    if short {
                        break;
                    }
                    size = self.probe.after(size);
                }
                out
            }
        }
    }

    fn is_unbounded(&self) -> bool {
        self.left.is_unbounded() && self.right.is_unbounded()
    }
}

fn pair<A, B>(a: A, b: B) -> (A, B) {
    (a, b)
}

// ================================
// Intersperse
// ================================

pub struct Intersperse<S: Seq> {
    pub(crate) seq: Peeker<S>,
    pub(crate) sep: S::Item,
    /// Next output slot is a separator
    pub(crate) need_sep: bool,
}

impl<S> Seq for Intersperse<S>
where
    S: Seq,
    S::Item: Clone,
{
    type Item = S::Item;

    fn next(&mut self, request: Request) -> Vec<S::Item> {
        let (elems, bound) = match request {
            Request::Count(0) => return Vec::new(),
            Request::Count(n) => {
                // Real elements needed to fill n slots: ceil((n - pending separator) / 2)
                let needed = (n - self.need_sep as usize + 1) / 2;
                (self.seq.next(Request::Count(needed)), Some(n))
            }
            Request::All => (self.seq.next(Request::All), None),
        };

        let mut out = Vec::with_capacity(elems.len() * 2);
        for e in elems {
            if self.need_sep {
                out.push(self.sep.clone());
            }
            out.push(e);
            self.need_sep = true;
        }

        // End on a separator only if upstream really has another element.
        if let Some(n) = bound {
            if out.len() < n && self.need_sep && self.seq.has_next() {
                out.push(self.sep.clone());
                self.need_sep = false;
            }
        }
        out
    }

    fn is_unbounded(&self) -> bool {
        self.seq.is_unbounded()
    }
}

// ================================
// Prepend / Append
// ================================

pub struct Prepend<S: Seq> {
    pub(crate) seq: S,
    pub(crate) head: Option<S::Item>,
}

impl<S: Seq> Seq for Prepend<S> {
    type Item = S::Item;

    fn next(&mut self, request: Request) -> Vec<S::Item> {
        if request.is_empty() {
            return Vec::new();
        }
        let head = match self.head.take() {
            Some(head) => head,
            None => return self.seq.next(request),
        };
        let rest = match request {
            Request::Count(n) => self.seq.next(Request::Count(n - 1)),
            Request::All => self.seq.next(Request::All),
        };
        let mut out = Vec::with_capacity(rest.len() + 1);
        out.push(head);
        out.extend(rest);
        out
    }

    fn is_unbounded(&self) -> bool {
        self.seq.is_unbounded()
    }
}

pub struct Append<S: Seq> {
    pub(crate) seq: S,
    pub(crate) tail: Option<S::Item>,
}

impl<S: Seq> Seq for Append<S> {
    type Item = S::Item;

    fn next(&mut self, request: Request) -> Vec<S::Item> {
        let mut batch = self.seq.next(request);
        let exhausted = match request {
            Request::Count(n) => batch.len() < n,
            Request::All => true,
        };
        if exhausted {
            if let Some(tail) = self.tail.take() {
                batch.push(tail);
            }
        }
        batch
    }

    fn is_unbounded(&self) -> bool {
        self.seq.is_unbounded()
    }
}

// ================================
// Chain / Concat
// ================================

pub struct Chain<A, B> {
    pub(crate) first: A,
    pub(crate) second: B,
    pub(crate) first_done: bool,
}

impl<A, B> Seq for Chain<A, B>
where
    A: Seq,
    B: Seq<Item = A::Item>,
{
    type Item = A::Item;

    fn next(&mut self, request: Request) -> Vec<A::Item> {
        match request {
            Request::Count(n) => {
                let mut out = Vec::new();
                if !self.first_done {
                    out = self.first.next(request);
                    self.first_done = out.len() < n;
                }
                if out.len() < n {
                    let want = n - out.len();
                    out.extend(self.second.next(Request::Count(want)));
                }
                out
            }
            Request::All => {
                let mut out = if self.first_done {
                    Vec::new()
                } else {
                    self.first.next(Request::All)
                };
                self.first_done = true;
                out.extend(self.second.next(Request::All));
                out
            }
        }
    }

    fn is_unbounded(&self) -> bool {
        (!self.first_done && self.first.is_unbounded()) || self.second.is_unbounded()
    }
}

/// Any number of sequences of one type, drained front to back
pub struct Concat<S> {
    pub(crate) seqs: VecDeque<S>,
}

impl<S: Seq> Seq for Concat<S> {
    type Item = S::Item;

    fn next(&mut self, request: Request) -> Vec<S::Item> {
        match request {
            Request::Count(n) => {
                let mut out = Vec::new();
                while out.len() < n {
                    let front = match self.seqs.front_mut() {
                        Some(front) => front,
                        None => break,
                    };
                    let want = n - out.len();
                    let batch = front.next(Request::Count(want));
                    if batch.len() < want {
                        self.seqs.pop_front();
                    }
                    out.extend(batch);
                }
                out
            }
            Request::All => {
                let mut out = Vec::new();
                for mut seq in self.seqs.drain(..) {
                    out.extend(seq.next(Request::All));
                }
                out
            }
        }
    }

    fn is_unbounded(&self) -> bool {
        self.seqs.iter().any(|s| s.is_unbounded())
    }
}

/// Concatenate sequences in order; use [`BoxSeq`](super::core::BoxSeq) for
/// mixed stage types
pub fn concat<S, I>(seqs: I) -> Concat<S>
where
    S: Seq,
    I: IntoIterator<Item = S>,
{
    Concat { seqs: seqs.into_iter().collect() }
}

// ================================
// Chunks
// ================================

#[derive(Debug)]
pub struct Chunks<S> {
    pub(crate) seq: S,
    pub(crate) size: usize,
}

impl<S: Seq> Seq for Chunks<S> {
    type Item = Vec<S::Item>;

    fn next(&mut self, request: Request) -> Vec<Vec<S::Item>> {
        let mut out = Vec::new();
        let mut left = match request {
            Request::Count(k) => Some(k),
            Request::All => None,
        };
        while left != Some(0) {
            let chunk = self.seq.next(Request::Count(self.size));
            let short = chunk.len() < self.size;
            if !chunk.is_empty() {
                out.push(chunk);
            }
            if short {
                break;
            }
            if let Some(k) = left.as_mut() {
                *k -= 1;
            }
        }
        out
    }

    fn is_unbounded(&self) -> bool {
        self.seq.is_unbounded()
    }
}

// ================================
// Reverse
// ================================

/// Serves the upstream back to front.
///
/// The upstream is materialized on the first non-empty pull. Each request
/// swaps only the pairs needed for its own prefix, inside the window not yet
/// in final position, so the reversal cost is spread across pulls.
pub struct Reverse<S: Seq> {
    pub(crate) seq: S,
    pub(crate) buf: Option<VecDeque<S::Item>>,
    /// Trailing elements already in final position
    pub(crate) settled: usize,
}

impl<S: Seq> Seq for Reverse<S> {
    type Item = S::Item;

    fn next(&mut self, request: Request) -> Vec<S::Item> {
        if request.is_empty() {
            return Vec::new();
        }
        let seq = &mut self.seq;
        let buf = self.buf.get_or_insert_with(|| {
            let all = seq.next(Request::All);
            debug!("reverse: materialized {} elements", all.len());
            VecDeque::from(all)
        });

        let len = buf.len();
        let k = request.clamp(len);
        let window = len - self.settled.min(len);
        let swaps = k.min(window / 2);
        for i in 0..swaps {
            buf.swap(i, window - 1 - i);
        }
        self.settled = if k > window / 2 { len } else { self.settled + swaps };

        let out: Vec<S::Item> = buf.drain(..k).collect();
        self.settled = self.settled.min(len - k);
        out
    }

    fn is_unbounded(&self) -> bool {
        self.buf.is_none() && self.seq.is_unbounded()
    }
}

// ================================
// Sort
// ================================

/// Materializes and sorts on the first non-empty pull, then serves the
/// sorted buffer through an owning source
pub struct Sort<S: Seq, F> {
    pub(crate) seq: Option<S>,
    pub(crate) cmp: F,
    pub(crate) stable: bool,
    pub(crate) sorted: FromVec<S::Item>,
}

impl<S, F> Seq for Sort<S, F>
where
    S: Seq,
    F: FnMut(&S::Item, &S::Item) -> Ordering,
{
    type Item = S::Item;

    fn next(&mut self, request: Request) -> Vec<S::Item> {
        if request.is_empty() {
            return Vec::new();
        }
        if let Some(mut seq) = self.seq.take() {
            let mut all = seq.next(Request::All);
            let cmp = &mut self.cmp;
            if self.stable {
                all.sort_by(|a, b| cmp(a, b));
            } else {
                all.sort_unstable_by(|a, b| cmp(a, b));
            }
            debug!("sort: materialized {} elements (stable: {})", all.len(), self.stable);
            self.sorted = from_vec(all);
        }
        self.sorted.next(request)
    }

    fn is_unbounded(&self) -> bool {
        self.seq.as_ref().map_or(false, |s| s.is_unbounded())
    }
}

// ================================
// Extension Trait
// ================================

pub trait AdvancedSeqExt: Seq + Sized {
    /// Expand each element into zero or more elements
    fn flat_map<I, F>(self, f: F) -> FlatMap<Self, F, I::Item>
    where
        F: FnMut(Self::Item) -> I,
        I: IntoIterator,
    {
        FlatMap { seq: self, f, residual: VecDeque::new() }
    }

    /// Combine elements index-wise; stops at the shorter side
    fn zip_with<B, C, F>(self, other: B, f: F) -> Zip<Self, B, F>
    where
        B: Seq,
        F: FnMut(Self::Item, B::Item) -> C,
    {
        Zip {
            left: Peeker::new(self),
            right: Peeker::new(other),
            f,
            probe: ProbeConfig::default(),
        }
    }

    #[allow(clippy::type_complexity)]
    fn zip<B: Seq>(
        self,
        other: B,
    ) -> Zip<Self, B, fn(Self::Item, B::Item) -> (Self::Item, B::Item)> {
        self.zip_with(other, pair as fn(Self::Item, B::Item) -> (Self::Item, B::Item))
    }

    /// Place `sep` between consecutive elements
    fn intersperse(self, sep: Self::Item) -> Intersperse<Self>
    where
        Self::Item: Clone,
    {
        Intersperse { seq: Peeker::new(self), sep, need_sep: false }
    }

    fn prepend(self, head: Self::Item) -> Prepend<Self> {
        Prepend { seq: self, head: Some(head) }
    }

    fn append(self, tail: Self::Item) -> Append<Self> {
        Append { seq: self, tail: Some(tail) }
    }

    fn chain<B>(self, other: B) -> Chain<Self, B>
    where
        B: Seq<Item = Self::Item>,
    {
        Chain { first: self, second: other, first_done: false }
    }

    /// Group consecutive elements into vectors of `size`; only the last one
    /// may be shorter
    fn chunks(self, size: usize) -> SeqResult<Chunks<Self>> {
        if size == 0 {
            return Err(SeqError::invalid("chunk size must be greater than 0"));
        }
        Ok(Chunks { seq: self, size })
    }

    fn rev(self) -> Reverse<Self> {
        Reverse { seq: self, buf: None, settled: 0 }
    }

    /// Stable sort by `Ord`
    #[allow(clippy::type_complexity)]
    fn sort(self) -> Sort<Self, fn(&Self::Item, &Self::Item) -> Ordering>
    where
        Self::Item: Ord,
    {
        self.sort_by(Ord::cmp as fn(&Self::Item, &Self::Item) -> Ordering)
    }

    /// Stable sort; equal elements keep their upstream order
    fn sort_by<F>(self, cmp: F) -> Sort<Self, F>
    where
        F: FnMut(&Self::Item, &Self::Item) -> Ordering,
    {
        Sort { seq: Some(self), cmp, stable: true, sorted: from_vec(Vec::new()) }
    }

    /// Stable sort by a derived key
    fn sort_by_key<K, F>(self, mut key: F) -> Sort<Self, impl FnMut(&Self::Item, &Self::Item) -> Ordering>
    where
        K: Ord,
        F: FnMut(&Self::Item) -> K,
    {
        self.sort_by(move |a, b| key(a).cmp(&key(b)))
    }

    #[allow(clippy::type_complexity)]
    fn sort_unstable(self) -> Sort<Self, fn(&Self::Item, &Self::Item) -> Ordering>
    where
        Self::Item: Ord,
    {
        self.sort_unstable_by(Ord::cmp as fn(&Self::Item, &Self::Item) -> Ordering)
    }

    fn sort_unstable_by<F>(self, cmp: F) -> Sort<Self, F>
    where
        F: FnMut(&Self::Item, &Self::Item) -> Ordering,
    {
        Sort { seq: Some(self), cmp, stable: false, sorted: from_vec(Vec::new()) }
    }
}

impl<S: Seq> AdvancedSeqExt for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seq::constructors::from_vec;

    #[test]
    fn reverse_settles_window_across_pulls() {
        let mut r = from_vec(vec![1, 2, 3, 4, 5, 6, 7]).rev();
        assert_eq!(r.next(Request::Count(2)), vec![7, 6]);
        assert_eq!(r.settled, 2);
        assert_eq!(r.next(Request::Count(1)), vec![5]);
        assert_eq!(r.next(Request::Count(3)), vec![4, 3, 2]);
        assert_eq!(r.next(Request::All), vec![1]);
        assert!(r.next(Request::All).is_empty());
    }

    #[test]
    fn reverse_even_length_one_at_a_time() {
        let mut r = from_vec(vec![1, 2, 3, 4]).rev();
        let mut out = Vec::new();
        loop {
            let batch = r.next(Request::Count(1));
            if batch.is_empty() {
                break;
            }
            out.extend(batch);
        }
        assert_eq!(out, vec![4, 3, 2, 1]);
    }
}
