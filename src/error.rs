//! Error types for pullseq
//!
//! The pull protocol itself carries no error channel. These errors are raised
//! at construction time or by the checked `try_*` entry points.

/// Misuse of a sequence or a stage constructor
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeqError {
    /// `Request::All` was sent to a sequence that can never be exhausted
    #[error("cannot drain an unbounded sequence ({stage})")]
    UnboundedDrain { stage: &'static str },
    /// A constructor argument is out of range
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl SeqError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SeqError::InvalidArgument(msg.into())
    }
}

/// Result type for pullseq operations
pub type SeqResult<T> = Result<T, SeqError>;
