//! Pull protocol and the core per-batch stages
//!
//! Every source and stage implements [`Seq`]: a single `next(request)` call that
//! returns up to `n` elements, or everything left for [`Request::All`]. A batch
//! shorter than requested means the sequence is exhausted.

use crate::error::{SeqError, SeqResult};
use log::trace;

/// How many elements a pull asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Request {
    /// At most this many elements
    Count(usize),
    /// Everything that is left; the sequence is exhausted afterwards
    All,
}

/// Shorthand for [`Request::All`]
pub const ALL: Request = Request::All;

impl Request {
    pub fn is_all(self) -> bool {
        matches!(self, Request::All)
    }

    /// A zero-count request, which every stage answers without pulling
    pub fn is_empty(self) -> bool {
        matches!(self, Request::Count(0))
    }

    pub fn count(self) -> Option<usize> {
        match self {
            Request::Count(n) => Some(n),
            Request::All => None,
        }
    }

    /// True when this request asks for at least `len` elements
    pub fn covers(self, len: usize) -> bool {
        match self {
            Request::Count(n) => n >= len,
            Request::All => true,
        }
    }

    /// Number of elements to serve out of `available`
    pub fn clamp(self, available: usize) -> usize {
        match self {
            Request::Count(n) => n.min(available),
            Request::All => available,
        }
    }
}

impl From<usize> for Request {
    fn from(n: usize) -> Self {
        Request::Count(n)
    }
}

/// A single-pass, pull-based sequence
pub trait Seq {
    type Item;

    /// Pull the next batch, in source order.
    ///
    /// `Count(n)` returns at most `n` elements and fewer only once the
    /// sequence is exhausted. `All` drains the sequence.
    fn next(&mut self, request: Request) -> Vec<Self::Item>;

    /// Whether `Request::All` can never complete on this sequence
    fn is_unbounded(&self) -> bool {
        false
    }

    /// Like [`Seq::next`], but refuses to drain an unbounded sequence
    fn try_next(&mut self, request: Request) -> SeqResult<Vec<Self::Item>> {
        if request.is_all() && self.is_unbounded() {
            return Err(SeqError::UnboundedDrain {
                stage: std::any::type_name::<Self>(),
            });
        }
        Ok(self.next(request))
    }
}

impl<S: Seq + ?Sized> Seq for &mut S {
    type Item = S::Item;

    fn next(&mut self, request: Request) -> Vec<Self::Item> {
        (**self).next(request)
    }

    fn is_unbounded(&self) -> bool {
        (**self).is_unbounded()
    }
}

impl<S: Seq + ?Sized> Seq for Box<S> {
    type Item = S::Item;

    fn next(&mut self, request: Request) -> Vec<Self::Item> {
        (**self).next(request)
    }

    fn is_unbounded(&self) -> bool {
        (**self).is_unbounded()
    }
}

/// Boxed sequence for heterogeneous pipelines
pub type BoxSeq<'a, T> = Box<dyn Seq<Item = T> + 'a>;

/// Pull a batch and keep only elements accepted by `keep`.
///
/// The batch is compacted in place. While the last pull came back full and
/// the kept count is still short of the request, the shortfall is pulled
/// again, so the bounded contract holds through the filter.
pub(crate) fn pull_retain<S, P>(upstream: &mut S, request: Request, mut keep: P) -> Vec<S::Item>
where
    S: Seq + ?Sized,
    P: FnMut(&S::Item) -> bool,
{
    let mut batch = upstream.next(request);
    let n = match request {
        Request::All => {
            batch.retain(|e| keep(e));
            return batch;
        }
        Request::Count(n) => n,
    };

    let mut exhausted = batch.len() < n;
    batch.retain(|e| keep(e));

    while !exhausted && batch.len() < n {
        let want = n - batch.len();
        let more = upstream.next(Request::Count(want));
        trace!("refill: wanted {}, pulled {}", want, more.len());
        exhausted = more.len() < want;
        batch.extend(more.into_iter().filter(|e| keep(e)));
    }
    batch
}

// ================================
// Map / FilterMap
// ================================

pub struct Map<S, F> {
    pub(crate) seq: S,
    pub(crate) f: F,
}

impl<S, U, F> Seq for Map<S, F>
where
    S: Seq,
    F: FnMut(S::Item) -> U,
{
    type Item = U;

    fn next(&mut self, request: Request) -> Vec<U> {
        self.seq.next(request).into_iter().map(&mut self.f).collect()
    }

    fn is_unbounded(&self) -> bool {
        self.seq.is_unbounded()
    }
}

pub struct FilterMap<S, F> {
    pub(crate) seq: S,
    pub(crate) f: F,
}

impl<S, U, F> Seq for FilterMap<S, F>
where
    S: Seq,
    F: FnMut(S::Item) -> Option<U>,
{
    type Item = U;

    fn next(&mut self, request: Request) -> Vec<U> {
        let f = &mut self.f;
        let batch = self.seq.next(request);
        let n = match request {
            Request::All => return batch.into_iter().filter_map(|e| f(e)).collect(),
            Request::Count(n) => n,
        };

        let mut exhausted = batch.len() < n;
        let mut out: Vec<U> = batch.into_iter().filter_map(|e| f(e)).collect();
        while !exhausted && out.len() < n {
            let want = n - out.len();
            let more = self.seq.next(Request::Count(want));
            exhausted = more.len() < want;
            out.extend(more.into_iter().filter_map(|e| f(e)));
        }
        out
    }

    fn is_unbounded(&self) -> bool {
        self.seq.is_unbounded()
    }
}

// ================================
// Filter / Compact / Remove
// ================================

pub struct Filter<S, F> {
    pub(crate) seq: S,
    pub(crate) f: F,
}

impl<S, F> Seq for Filter<S, F>
where
    S: Seq,
    F: FnMut(&S::Item) -> bool,
{
    type Item = S::Item;

    fn next(&mut self, request: Request) -> Vec<S::Item> {
        pull_retain(&mut self.seq, request, &mut self.f)
    }

    fn is_unbounded(&self) -> bool {
        self.seq.is_unbounded()
    }
}

/// Drops elements equal to the type's default value
pub struct Compact<S: Seq> {
    pub(crate) seq: S,
    pub(crate) zero: S::Item,
}

impl<S> Seq for Compact<S>
where
    S: Seq,
    S::Item: PartialEq,
{
    type Item = S::Item;

    fn next(&mut self, request: Request) -> Vec<S::Item> {
        let zero = &self.zero;
        pull_retain(&mut self.seq, request, |e| e != zero)
    }

    fn is_unbounded(&self) -> bool {
        self.seq.is_unbounded()
    }
}

/// Drops elements equal to `value`, optionally only the first `limit` of them
pub struct Remove<S: Seq> {
    pub(crate) seq: S,
    pub(crate) value: S::Item,
    pub(crate) limit: Option<usize>,
}

impl<S> Seq for Remove<S>
where
    S: Seq,
    S::Item: PartialEq,
{
    type Item = S::Item;

    fn next(&mut self, request: Request) -> Vec<S::Item> {
        let value = &self.value;
        let limit = &mut self.limit;
        pull_retain(&mut self.seq, request, |e| {
            if e != value {
                return true;
            }
            match limit {
                None => false,
                Some(0) => true,
                Some(left) => {
                    *left -= 1;
                    false
                }
            }
        })
    }

    fn is_unbounded(&self) -> bool {
        self.seq.is_unbounded()
    }
}

// ================================
// Take / Skip
// ================================

pub struct Take<S> {
    pub(crate) seq: S,
    pub(crate) remaining: usize,
}

impl<S: Seq> Seq for Take<S> {
    type Item = S::Item;

    fn next(&mut self, request: Request) -> Vec<S::Item> {
        if self.remaining == 0 || request.is_empty() {
            return Vec::new();
        }
        let want = request.clamp(self.remaining);
        let batch = self.seq.next(Request::Count(want));
        if batch.len() < want {
            self.remaining = 0;
        } else {
            self.remaining -= want;
        }
        batch
    }
}

pub struct Skip<S> {
    pub(crate) seq: S,
    pub(crate) pending: usize,
}

impl<S: Seq> Seq for Skip<S> {
    type Item = S::Item;

    fn next(&mut self, request: Request) -> Vec<S::Item> {
        if request.is_empty() {
            return Vec::new();
        }
        if self.pending > 0 {
            let skipped = self.seq.next(Request::Count(self.pending));
            trace!("skip: discarded {} of {}", skipped.len(), self.pending);
            self.pending = 0;
        }
        self.seq.next(request)
    }

    fn is_unbounded(&self) -> bool {
        self.seq.is_unbounded()
    }
}

// ================================
// Extension Trait
// ================================

pub trait SeqExt: Seq + Sized {
    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        F: FnMut(Self::Item) -> U,
    {
        Map { seq: self, f }
    }

    fn filter<F>(self, f: F) -> Filter<Self, F>
    where
        F: FnMut(&Self::Item) -> bool,
    {
        Filter { seq: self, f }
    }

    fn filter_map<U, F>(self, f: F) -> FilterMap<Self, F>
    where
        F: FnMut(Self::Item) -> Option<U>,
    {
        FilterMap { seq: self, f }
    }

    fn take(self, n: usize) -> Take<Self> {
        Take { seq: self, remaining: n }
    }

    /// Discard the first `n` elements
    fn skip(self, n: usize) -> Skip<Self> {
        Skip { seq: self, pending: n }
    }

    /// Remove every element equal to `T::default()`
    fn compact(self) -> Compact<Self>
    where
        Self::Item: PartialEq + Default,
    {
        Compact { seq: self, zero: Self::Item::default() }
    }

    fn remove(self, value: Self::Item) -> Remove<Self>
    where
        Self::Item: PartialEq,
    {
        Remove { seq: self, value, limit: None }
    }

    /// Remove the first `n` elements equal to `value`
    fn remove_n(self, value: Self::Item, n: usize) -> Remove<Self>
    where
        Self::Item: PartialEq,
    {
        Remove { seq: self, value, limit: Some(n) }
    }

    fn boxed<'a>(self) -> BoxSeq<'a, Self::Item>
    where
        Self: 'a,
    {
        Box::new(self)
    }
}

impl<S: Seq> SeqExt for S {}
