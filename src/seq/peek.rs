//! Peek buffer and the look-ahead stages built on it: take_while, skip_while
use std::collections::VecDeque;

use log::debug;

use super::core::{Request, Seq};
use crate::seq_configuration::ProbeConfig;

// ================================
// Peeker
// ================================

/// Adds non-destructive look-ahead to any sequence.
///
/// Elements fetched by [`Peeker::peek`] are staged and served first by
/// subsequent pulls; nothing is fetched at construction.
pub struct Peeker<S: Seq> {
    pub(crate) seq: S,
    pub(crate) buf: VecDeque<S::Item>,
}

impl<S: Seq> Peeker<S> {
    pub fn new(seq: S) -> Self {
        Peeker { seq, buf: VecDeque::new() }
    }

    /// Up to `request` upcoming elements, without consuming them
    pub fn peek(&mut self, request: Request) -> &[S::Item] {
        match request {
            Request::All => {
                let rest = self.seq.next(Request::All);
                self.buf.extend(rest);
            }
            Request::Count(n) if n > self.buf.len() => {
                let more = self.seq.next(Request::Count(n - self.buf.len()));
                self.buf.extend(more);
            }
            Request::Count(_) => {}
        }
        let k = request.clamp(self.buf.len());
        &self.buf.make_contiguous()[..k]
    }

    pub fn peek_one(&mut self) -> Option<&S::Item> {
        self.peek(Request::Count(1)).first()
    }

    pub fn has_next(&mut self) -> bool {
        !self.peek(Request::Count(1)).is_empty()
    }

    /// Elements already staged
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }
}

impl<S: Seq> Seq for Peeker<S> {
    type Item = S::Item;

    fn next(&mut self, request: Request) -> Vec<S::Item> {
        match request {
            Request::Count(n) if n <= self.buf.len() => self.buf.drain(..n).collect(),
            Request::Count(n) => {
                let mut out: Vec<S::Item> = self.buf.drain(..).collect();
                let want = n - out.len();
                out.extend(self.seq.next(Request::Count(want)));
                out
            }
            Request::All => {
                let mut out: Vec<S::Item> = self.buf.drain(..).collect();
                out.extend(self.seq.next(Request::All));
                out
            }
        }
    }

    fn is_unbounded(&self) -> bool {
        self.seq.is_unbounded()
    }
}

// ================================
// TakeWhile
// ================================

pub struct TakeWhile<S: Seq, F> {
    pub(crate) seq: Peeker<S>,
    pub(crate) f: F,
    pub(crate) done: bool,
    pub(crate) probe: ProbeConfig,
}

impl<S: Seq, F> TakeWhile<S, F> {
    /// Probe rounds used to serve `Request::All`
    pub fn with_probe(mut self, probe: ProbeConfig) -> Self {
        self.probe = probe;
        self
    }
}

impl<S, F> TakeWhile<S, F>
where
    S: Seq,
    F: FnMut(&S::Item) -> bool,
{
    /// Consume the passing prefix of the next `size` elements; true once the
    /// predicate failed or upstream ran dry.
    fn scan(&mut self, size: usize) -> (Vec<S::Item>, bool) {
        let f = &mut self.f;
        let view = self.seq.peek(Request::Count(size));
        let len = view.len();
        match view.iter().position(|e| !f(e)) {
            Some(k) => {
                self.done = true;
                (self.seq.next(Request::Count(k)), true)
            }
            None => {
                if len < size {
                    self.done = true;
                }
                (self.seq.next(Request::Count(len)), len < size)
            }
        }
    }
}

impl<S, F> Seq for TakeWhile<S, F>
where
    S: Seq,
    F: FnMut(&S::Item) -> bool,
{
    type Item = S::Item;

    fn next(&mut self, request: Request) -> Vec<S::Item> {
        if self.done || request.is_empty() {
            return Vec::new();
        }
        match request {
            Request::Count(n) => self.scan(n).0,
            Request::All => {
                let mut out = Vec::new();
                let mut size = self.probe.first();
                loop {
                    let (batch, stop) = self.scan(size);
                    out.extend(batch);
                    if stop {
                        break;
                    }
                    size = self.probe.after(size);
                }
                out
            }
        }
    }
}

// ================================
// SkipWhile
// ================================

pub struct SkipWhile<S: Seq, F> {
    pub(crate) seq: Peeker<S>,
    pub(crate) f: F,
    pub(crate) skipping: bool,
    pub(crate) probe: ProbeConfig,
}

impl<S: Seq, F> SkipWhile<S, F> {
    /// Probe rounds used while discarding the leading run
    pub fn with_probe(mut self, probe: ProbeConfig) -> Self {
        self.probe = probe;
        self
    }
}

impl<S, F> Seq for SkipWhile<S, F>
where
    S: Seq,
    F: FnMut(&S::Item) -> bool,
{
    type Item = S::Item;

    fn next(&mut self, request: Request) -> Vec<S::Item> {
        if request.is_empty() {
            return Vec::new();
        }

        let mut size = match request {
            Request::Count(n) => n,
            Request::All => self.probe.first(),
        };
        let mut discarded = 0;
        while self.skipping {
            let f = &mut self.f;
            let view = self.seq.peek(Request::Count(size));
            let len = view.len();
            let cut = view.iter().position(|e| !f(e));
            let k = cut.unwrap_or(len);
            discarded += self.seq.next(Request::Count(k)).len();
            if cut.is_some() || len < size {
                self.skipping = false;
                debug!("skip_while: discarded {} leading elements", discarded);
            }
            size = self.probe.after(size);
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

pub trait PeekSeqExt: Seq + Sized {
    fn peekable(self) -> Peeker<Self> {
        Peeker::new(self)
    }

    /// Elements up to, not including, the first one failing `f`
    fn take_while<F>(self, f: F) -> TakeWhile<Self, F>
    where
        F: FnMut(&Self::Item) -> bool,
    {
        TakeWhile {
            seq: Peeker::new(self),
            f,
            done: false,
            probe: ProbeConfig::default(),
        }
    }

    /// Discard the leading run of elements satisfying `f`
    fn skip_while<F>(self, f: F) -> SkipWhile<Self, F>
    where
        F: FnMut(&Self::Item) -> bool,
    {
        SkipWhile {
            seq: Peeker::new(self),
            f,
            skipping: true,
            probe: ProbeConfig::default(),
        }
    }
}

impl<S: Seq> PeekSeqExt for S {}
