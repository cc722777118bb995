//! Crate-wide error type.
//!
//! Every fallible operation in the library reports one of a small set of
//! error kinds:
//!
//! - [`Error::IndexOutOfRange`] / [`Error::CountOutOfRange`] - a position or
//!   occurrence count outside the valid range of a query.
//! - [`Error::Domain`] - a well-formed call on an ill-formed structure
//!   (unbalanced parentheses, `open` on an opening parenthesis, an inverted
//!   range).
//! - [`Error::NotFound`] - a forward or backward excess search with no
//!   matching position. Tree-level operations usually convert this into
//!   `None` rather than surfacing it.
//! - [`Error::TypeMismatch`] - query evaluation met the wrong node shape
//!   (e.g. an object index applied to a list). Suppressed by the `?` marker
//!   in a query.
//! - [`Error::Parse`] - malformed JSON source or a malformed query string.
//! - [`Error::Codec`] - encoding an unknown symbol or decoding an unknown
//!   code.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// The error type shared by all modules of this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A position argument outside `[0, len)`.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: isize, len: usize },

    /// An occurrence count outside the valid range of a select-style query.
    #[error("count out of range: {0}")]
    CountOutOfRange(String),

    /// A structurally invalid call or input.
    #[error("{0}")]
    Domain(String),

    /// A forward or backward excess search that has no answer.
    #[error("{0}")]
    NotFound(String),

    /// Query evaluation met a node of the wrong shape.
    #[error("{0}")]
    TypeMismatch(String),

    /// Malformed JSON source or query text.
    #[error("parse error at position {position}: {message}")]
    Parse { message: String, position: usize },

    /// Unknown symbol on encode or unknown code on decode.
    #[error("{0}")]
    Codec(String),
}

impl Error {
    pub(crate) fn index(index: isize, len: usize) -> Self {
        Error::IndexOutOfRange { index, len }
    }

    pub(crate) fn count(message: impl Into<String>) -> Self {
        Error::CountOutOfRange(message.into())
    }

    pub(crate) fn domain(message: impl Into<String>) -> Self {
        Error::Domain(message.into())
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Error::NotFound(message.into())
    }

    pub(crate) fn type_mismatch(message: impl Into<String>) -> Self {
        Error::TypeMismatch(message.into())
    }

    pub(crate) fn parse(message: impl Into<String>, position: usize) -> Self {
        Error::Parse {
            message: message.into(),
            position,
        }
    }

    pub(crate) fn codec(message: impl Into<String>) -> Self {
        Error::Codec(message.into())
    }
}
