//! Sequence sources: slices, owned buffers, iterators, empty, once, repeat, range
use std::collections::VecDeque;
use std::iter::Fuse;
use std::marker::PhantomData;
use std::ops::Add;

use super::core::{Request, Seq};
use crate::error::{SeqError, SeqResult};

// ================================
// Buffer-backed Sources
// ================================

/// Serves a shrinking view of a borrowed slice, cloning each batch out
pub struct FromSlice<'a, T> {
    pub(crate) slice: &'a [T],
}

impl<'a, T: Clone> Seq for FromSlice<'a, T> {
    type Item = T;

    fn next(&mut self, request: Request) -> Vec<T> {
        let k = request.clamp(self.slice.len());
        let (head, rest) = self.slice.split_at(k);
        self.slice = rest;
        head.to_vec()
    }
}

impl<'a, T> FromSlice<'a, T> {
    pub fn remaining(&self) -> usize {
        self.slice.len()
    }
}

/// Owns its backing storage and moves elements out batch by batch
#[derive(Debug)]
pub struct FromVec<T> {
    pub(crate) buf: VecDeque<T>,
}

impl<T> Seq for FromVec<T> {
    type Item = T;

    fn next(&mut self, request: Request) -> Vec<T> {
        if request.is_empty() {
            return Vec::new();
        }
        if request.covers(self.buf.len()) {
            // Hands the storage back; no copy while the buffer is still contiguous.
            return Vec::from(std::mem::take(&mut self.buf));
        }
        let k = request.clamp(self.buf.len());
        self.buf.drain(..k).collect()
    }
}

impl<T> FromVec<T> {
    pub fn remaining(&self) -> usize {
        self.buf.len()
    }
}

impl<T> From<Vec<T>> for FromVec<T> {
    fn from(v: Vec<T>) -> Self {
        FromVec { buf: VecDeque::from(v) }
    }
}

/// Adapts a Rust iterator, pulling from it only as far as each request needs
pub struct FromIter<I: Iterator> {
    pub(crate) iter: Fuse<I>,
}

impl<I: Iterator> Seq for FromIter<I> {
    type Item = I::Item;

    fn next(&mut self, request: Request) -> Vec<I::Item> {
        match request {
            Request::Count(n) => self.iter.by_ref().take(n).collect(),
            Request::All => self.iter.by_ref().collect(),
        }
    }
}

pub struct Empty<T> {
    pub(crate) _phantom: PhantomData<T>,
}

impl<T> Seq for Empty<T> {
    type Item = T;

    fn next(&mut self, _request: Request) -> Vec<T> {
        Vec::new()
    }
}

pub struct Once<T> {
    pub(crate) value: Option<T>,
}

impl<T> Seq for Once<T> {
    type Item = T;

    fn next(&mut self, request: Request) -> Vec<T> {
        if request.is_empty() {
            return Vec::new();
        }
        self.value.take().into_iter().collect()
    }
}

// ================================
// Generated Sources
// ================================

/// Yields clones of one value forever
pub struct Repeat<T> {
    pub(crate) value: T,
}

impl<T: Clone> Seq for Repeat<T> {
    type Item = T;

    /// # Panics
    ///
    /// On `Request::All`, which can never complete. Use [`Seq::try_next`] to
    /// get [`SeqError::UnboundedDrain`] instead.
    fn next(&mut self, request: Request) -> Vec<T> {
        match request {
            Request::Count(n) => vec![self.value.clone(); n],
            Request::All => panic!("{}", SeqError::UnboundedDrain { stage: "repeat" }),
        }
    }

    fn is_unbounded(&self) -> bool {
        true
    }
}

/// Lossless carrier for a primitive number between two `Numeric` types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Int(i128),
    UInt(u128),
    Float(f64),
}

/// Primitive numbers usable as range bounds and cast targets
pub trait Numeric: Copy + PartialOrd + Add<Output = Self> {
    fn zero() -> Self;
    fn one() -> Self;
    fn to_f64(self) -> f64;
    /// Saturating `as` conversion
    fn from_f64(v: f64) -> Self;
    fn to_scalar(self) -> Scalar;
    /// `as` conversion from whatever the scalar holds
    fn from_scalar(v: Scalar) -> Self;
    /// Number of terms of `start, start + step, ...` strictly before `stop`
    fn term_count(start: Self, stop: Self, step: Self) -> usize;
}

macro_rules! impl_numeric_common {
    ($t:ty) => {
        fn zero() -> Self { 0 as $t }
        fn one() -> Self { 1 as $t }
        fn to_f64(self) -> f64 { self as f64 }
        fn from_f64(v: f64) -> Self { v as $t }
        fn from_scalar(v: Scalar) -> Self {
            match v {
                Scalar::Int(i) => i as $t,
                Scalar::UInt(u) => u as $t,
                Scalar::Float(f) => f as $t,
            }
        }
    };
}

// Integer counts are exact: the span is taken with `abs_diff` in the native
// width, so no bound is ever rounded.
macro_rules! impl_numeric_int {
    ($variant:ident as $wide:ty: $($t:ty),*) => {
        $(
            impl Numeric for $t {
                impl_numeric_common!($t);

                fn to_scalar(self) -> Scalar { Scalar::$variant(self as $wide) }

                fn term_count(start: Self, stop: Self, step: Self) -> usize {
                    let zero: $t = 0;
                    let forward = step > zero && stop > start;
                    let backward = step < zero && stop < start;
                    if !(forward || backward) {
                        return 0;
                    }
                    let span = start.abs_diff(stop);
                    let stride = zero.abs_diff(step);
                    usize::try_from(span.div_ceil(stride)).unwrap_or(usize::MAX)
                }
            }
        )*
    };
}

macro_rules! impl_numeric_float {
    ($($t:ty),*) => {
        $(
            impl Numeric for $t {
                impl_numeric_common!($t);

                fn to_scalar(self) -> Scalar { Scalar::Float(self as f64) }

                fn term_count(start: Self, stop: Self, step: Self) -> usize {
                    let span = stop as f64 - start as f64;
                    let step = step as f64;
                    if span == 0.0 || span.is_nan() || span.signum() != step.signum() {
                        return 0;
                    }
                    (span.abs() / step.abs()).ceil() as usize
                }
            }
        )*
    };
}

impl_numeric_int!(Int as i128: i8, i16, i32, i64, i128, isize);
impl_numeric_int!(UInt as u128: u8, u16, u32, u64, u128, usize);
impl_numeric_float!(f32, f64);

pub(crate) fn range_len<T: Numeric>(start: T, stop: T, step: T) -> usize {
    T::term_count(start, stop, step)
}

/// Arithmetic progression with no backing storage
#[derive(Debug, Clone)]
pub struct Range<T> {
    pub(crate) cur: T,
    pub(crate) step: T,
    pub(crate) remaining: usize,
}

impl<T: Numeric> Seq for Range<T> {
    type Item = T;

    fn next(&mut self, request: Request) -> Vec<T> {
        let k = request.clamp(self.remaining);
        let mut out = Vec::with_capacity(k);
        for _ in 0..k {
            out.push(self.cur);
            self.remaining -= 1;
            // Never step past the last term, so integer bounds cannot overflow.
            if self.remaining > 0 {
                self.cur = self.cur + self.step;
            }
        }
        out
    }
}

impl<T> Range<T> {
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

// ================================
// Constructor Functions
// ================================

/// Copying source over a borrowed slice
pub fn from_slice<T: Clone>(slice: &[T]) -> FromSlice<'_, T> {
    FromSlice { slice }
}

/// Owning source; an untouched buffer drained with `All` is returned as is
pub fn from_vec<T>(v: Vec<T>) -> FromVec<T> {
    FromVec::from(v)
}

pub fn from_iter<I: IntoIterator>(iter: I) -> FromIter<I::IntoIter> {
    FromIter { iter: iter.into_iter().fuse() }
}

pub fn empty<T>() -> Empty<T> {
    Empty { _phantom: PhantomData }
}

pub fn once<T>(value: T) -> Once<T> {
    Once { value: Some(value) }
}

pub fn repeat<T: Clone>(value: T) -> Repeat<T> {
    Repeat { value }
}

/// `start, start + 1, ...` up to but excluding `stop`
pub fn range<T: Numeric>(start: T, stop: T) -> Range<T> {
    Range {
        cur: start,
        step: T::one(),
        remaining: range_len(start, stop, T::one()),
    }
}

/// `start, start + step, ...` up to but excluding `stop`.
///
/// A step pointing away from `stop` gives an empty range; a zero step is
/// rejected.
pub fn range_with_step<T: Numeric>(start: T, stop: T, step: T) -> SeqResult<Range<T>> {
    let s = step.to_f64();
    if s == 0.0 || s.is_nan() {
        return Err(SeqError::invalid("range step must be non-zero"));
    }
    Ok(Range {
        cur: start,
        step,
        remaining: range_len(start, stop, step),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_len_uses_ceiling() {
        assert_eq!(range_len(0, 10, 3), 4);
        assert_eq!(range_len(0, 9, 3), 3);
        assert_eq!(range_len(10, 0, -4), 3);
        assert_eq!(range_len(0.0, 1.0, 0.25), 4);
    }

    #[test]
    fn range_len_wrong_direction_is_empty() {
        assert_eq!(range_len(0, 10, -1), 0);
        assert_eq!(range_len(5u8, 1u8, 1u8), 0);
        assert_eq!(range_len(3, 3, 1), 0);
    }

    #[test]
    fn range_len_is_exact_at_64_bit_limits() {
        assert_eq!(range_len(i64::MAX - 2000, i64::MAX, 1), 2000);
        assert_eq!(range_len(i64::MIN, i64::MAX, i64::MAX), 3);
        assert_eq!(range_len(u64::MAX - 1, u64::MAX, 1), 1);
        assert_eq!(range_len(0u64, u64::MAX, 1), usize::try_from(u64::MAX).unwrap_or(usize::MAX));
        assert_eq!(range_len(i64::MIN + 7, i64::MIN, -2), 4);
        assert_eq!(range_len(i128::MIN, i128::MAX, i128::MAX), 3);
    }

    #[test]
    fn scalar_keeps_wide_integers() {
        let big = (1i64 << 53) + 1;
        assert_eq!(big.to_scalar(), Scalar::Int(big as i128));
        assert_eq!(i64::from_scalar(big.to_scalar()), big);
        assert_eq!(u64::from_scalar(u64::MAX.to_scalar()), u64::MAX);
        assert_eq!(u8::from_scalar(Scalar::Float(300.0)), 255);
    }

    #[test]
    fn range_does_not_overflow_at_type_edge() {
        let mut r = range_with_step(0u8, 255u8, 10u8).unwrap();
        let all = r.next(Request::All);
        assert_eq!(all.len(), 26);
        assert_eq!(all.last(), Some(&250u8));
    }
}
