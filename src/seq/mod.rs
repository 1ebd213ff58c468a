//! Lazy pull-based sequences
//!
//! Sources produce batches on demand, stages wrap a source and transform each
//! pull, and sinks drive the chain to completion. Nothing is computed until a
//! consumer calls [`Seq::next`].

pub mod core;
pub mod constructors;
pub mod map_source;
pub mod channel;
pub mod peek;
pub mod advanced;
pub mod fast_path;
pub mod sink;
pub mod utility;

// Re-export the protocol
pub use self::core::{
    BoxSeq, Compact, Filter, FilterMap, Map, Remove, Request, Seq, SeqExt, Skip, Take, ALL,
};

// Re-export sources
pub use constructors::{
    empty, from_iter, from_slice, from_vec, once, range, range_with_step, repeat,
    Empty, FromIter, FromSlice, FromVec, Numeric, Once, Range, Repeat, Scalar,
};
pub use map_source::{from_map, from_map_keys, from_map_values, MapEntries, MapKeys, MapValues};
pub use channel::{from_channel, ChannelSeqExt, ChannelSource, Inbound};

// Re-export look-ahead stages
pub use peek::{PeekSeqExt, Peeker, SkipWhile, TakeWhile};

// Re-export advanced stages
pub use advanced::{
    concat, AdvancedSeqExt, Append, Chain, Chunks, Concat, FlatMap, Intersperse, Prepend,
    Reverse, Sort, Zip,
};

pub use fast_path::{DedupSeqExt, Dup, Uniq};

// Re-export sinks and reducers
pub use sink::SinkSeqExt;
pub use utility::UtilitySeqExt;
