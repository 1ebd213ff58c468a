//! Lazy, pull-based sequence processing.
//!
//! A pipeline is a chain of sources and stages that does no work until a
//! sink pulls from it. Each pull names how many elements it wants, or
//! [`ALL`] for everything left:
//!
//! ```
//! use pullseq::*;
//!
//! let out = from_vec(vec![3, 1, 2, 3, 3, 5])
//!     .uniq()
//!     .map(|x| x * 10)
//!     .take(3)
//!     .to_vec();
//! assert_eq!(out, vec![30, 10, 20]);
//! ```

pub mod cancel;
pub mod error;
pub mod seq;
pub mod seq_configuration;

// Re-export all items from the seq module at the crate root
pub use cancel::CancellationToken;
pub use error::{SeqError, SeqResult};
pub use seq::*;
pub use seq_configuration::{ChannelConfig, FastPathConfig, GrowthStrategy, ProbeConfig};
