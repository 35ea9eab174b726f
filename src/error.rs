//! Error types for shape flattening and raw-shape building.
//!
//! Every failure is reported through the single [`Error`] enum. Propagation is
//! fail-fast: the first error met anywhere in a traversal aborts the whole
//! operation and no partial output is returned.
//!
//! ## Error Categories
//!
//! - **Structural**: [`Error::ListRequiresKey`], a list in a position that has no flat key
//! - **Leaf conversion**: [`Error::LeafConversionFailed`], a leaf could not render itself
//! - **Depth**: [`Error::DepthExceeded`], the recursion guard tripped on deeply nested input
//! - **Configuration**: [`Error::InvalidOptions`], rejected before any traversal starts
//! - **Builder**: [`Error::UnsupportedType`] and [`Error::Custom`], raised while building a tree with serde
//!
//! ## Examples
//!
//! ```rust
//! use serde_shape::{flatten, tree, EncodingOptions, Error};
//!
//! let list = tree!(["a", "b"]);
//! let err = flatten(&list, &EncodingOptions::default()).unwrap_err();
//! assert!(matches!(err, Error::ListRequiresKey));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all recoverable errors raised while encoding a tree.
///
/// Operating on a tree that was never populated is not listed here: that is a
/// bug in the calling builder and panics instead (see
/// [`ShapeEncoder`](crate::ShapeEncoder)).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A list was found where a flat key is mandatory (a bare list at the root)
    #[error("list requires a key: flat key/value output cannot represent an unnamed top-level sequence")]
    ListRequiresKey,

    /// A leaf failed to render itself as a string or scalar
    #[error("leaf conversion failed{}: {reason}", key_context(.key))]
    LeafConversionFailed { key: Option<String>, reason: String },

    /// Nesting went deeper than the configured limit
    #[error("maximum nesting depth of {limit} exceeded")]
    DepthExceeded { limit: usize },

    /// The encoding options cannot be used
    #[error("invalid encoding options: {0}")]
    InvalidOptions(String),

    /// Unsupported type for tree building
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error
    #[error("{0}")]
    Custom(String),
}

fn key_context(key: &Option<String>) -> String {
    key.as_ref()
        .map(|k| format!(" at key '{}'", k))
        .unwrap_or_default()
}

/// Alias naming the error taxonomy by its role.
pub type EncodingError = Error;

impl Error {
    /// Creates a leaf conversion error with no key context.
    ///
    /// The flattening engine attaches the key being emitted via
    /// [`Error::at_key`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_shape::Error;
    ///
    /// let err = Error::leaf_conversion("null has no string form").at_key("Tags.1");
    /// assert!(err.to_string().contains("Tags.1"));
    /// ```
    pub fn leaf_conversion<T: fmt::Display>(reason: T) -> Self {
        Error::LeafConversionFailed {
            key: None,
            reason: reason.to_string(),
        }
    }

    /// Attaches the flat key to a [`Error::LeafConversionFailed`] that has none.
    ///
    /// Other variants are returned unchanged.
    #[must_use]
    pub fn at_key(self, at: &str) -> Self {
        match self {
            Error::LeafConversionFailed { key: None, reason } => Error::LeafConversionFailed {
                key: Some(at.to_string()),
                reason,
            },
            other => other,
        }
    }

    /// Creates a depth error for the given limit.
    pub fn depth_exceeded(limit: usize) -> Self {
        Error::DepthExceeded { limit }
    }

    /// Creates an invalid options error.
    pub fn invalid_options(msg: &str) -> Self {
        Error::InvalidOptions(msg.to_string())
    }

    /// Creates an unsupported type error for values the tree builder cannot map.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_shape::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
