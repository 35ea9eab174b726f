//! Configuration options for flattening.
//!
//! This module provides the types that select the flattening strategies:
//!
//! - [`EncodingOptions`]: main configuration struct, supplied per call
//! - [`ListStrategy`]: how list positions become key segments
//! - [`MapStrategy`]: how map entries become key segments
//! - [`KeyTransform`]: how each map key is rewritten before use
//!
//! ## Examples
//!
//! ```rust
//! use serde_shape::{EncodingOptions, KeyTransform, ListStrategy, MapStrategy};
//!
//! // Tag list members and split map entries into key/value slots
//! let options = EncodingOptions::new()
//!     .with_list_strategy(ListStrategy::tagged("member"))
//!     .with_map_strategy(MapStrategy::separate_entries("key", "value"));
//!
//! // Lower-case every map key
//! let options = EncodingOptions::new()
//!     .with_key_transform(KeyTransform::custom(|k| k.to_lowercase()));
//! ```

use crate::{Error, Result};
use std::fmt;
use std::sync::Arc;

/// Default nesting limit for both engines.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// How list positions become key segments.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum ListStrategy {
    /// `key.1`, `key.2`, ...
    #[default]
    FlatIndexed,
    /// `key.tag.1`, `key.tag.2`, ... for non-root lists
    TaggedIndexed(String),
}

impl ListStrategy {
    #[must_use]
    pub fn tagged(tag: impl Into<String>) -> Self {
        ListStrategy::TaggedIndexed(tag.into())
    }
}

/// How map entries become key segments.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum MapStrategy {
    /// `key.Member` carries the value directly
    #[default]
    NestedKey,
    /// `key.N.keyTag` carries the member name, `key.N.valueTag` the value;
    /// only applies below the root
    SeparateEntries { key_tag: String, value_tag: String },
}

impl MapStrategy {
    #[must_use]
    pub fn separate_entries(key_tag: impl Into<String>, value_tag: impl Into<String>) -> Self {
        MapStrategy::SeparateEntries {
            key_tag: key_tag.into(),
            value_tag: value_tag.into(),
        }
    }
}

/// Rewrites each map key before it becomes a key segment.
///
/// The transform only affects flattening; raw shapes keep original keys.
///
/// # Examples
///
/// ```rust
/// use serde_shape::KeyTransform;
///
/// assert_eq!(KeyTransform::CapitalizeFirst.apply("name"), "Name");
/// assert_eq!(KeyTransform::CapitalizeFirst.apply(""), "");
/// assert_eq!(KeyTransform::custom(|k| format!("x-{}", k)).apply("id"), "x-id");
/// ```
#[derive(Clone, Default)]
pub enum KeyTransform {
    #[default]
    Identity,
    /// Upper-cases the first character only
    CapitalizeFirst,
    Custom(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

impl KeyTransform {
    /// Wraps a closure as a [`KeyTransform::Custom`].
    #[must_use]
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        KeyTransform::Custom(Arc::new(f))
    }

    /// Applies the transform to a raw map key.
    #[must_use]
    pub fn apply(&self, key: &str) -> String {
        match self {
            KeyTransform::Identity => key.to_string(),
            KeyTransform::CapitalizeFirst => capitalize_first(key),
            KeyTransform::Custom(f) => f(key),
        }
    }
}

impl fmt::Debug for KeyTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyTransform::Identity => write!(f, "Identity"),
            KeyTransform::CapitalizeFirst => write!(f, "CapitalizeFirst"),
            KeyTransform::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

fn capitalize_first(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Configuration for [`flatten`](crate::flatten).
///
/// Immutable once built; pass a fresh or shared value per call.
///
/// # Examples
///
/// ```rust
/// use serde_shape::{EncodingOptions, KeyTransform, ListStrategy};
///
/// let options = EncodingOptions::new();
/// assert_eq!(options.separator, ".");
/// assert_eq!(options.list_strategy, ListStrategy::FlatIndexed);
///
/// let options = EncodingOptions::new()
///     .with_separator("_")
///     .with_key_transform(KeyTransform::CapitalizeFirst)
///     .with_max_depth(16);
/// assert_eq!(options.max_depth, 16);
/// ```
#[derive(Clone, Debug)]
pub struct EncodingOptions {
    pub separator: String,
    pub list_strategy: ListStrategy,
    pub map_strategy: MapStrategy,
    pub key_transform: KeyTransform,
    pub max_depth: usize,
}

impl Default for EncodingOptions {
    fn default() -> Self {
        EncodingOptions {
            separator: ".".to_string(),
            list_strategy: ListStrategy::default(),
            map_strategy: MapStrategy::default(),
            key_transform: KeyTransform::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EncodingOptions {
    /// Creates default options (`.` separator, flat lists, nested map keys, keys unchanged).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for query protocols that tag list members with `member` and
    /// split map entries into `key`/`value` slots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_shape::{EncodingOptions, ListStrategy};
    ///
    /// let options = EncodingOptions::query();
    /// assert_eq!(options.list_strategy, ListStrategy::tagged("member"));
    /// ```
    #[must_use]
    pub fn query() -> Self {
        EncodingOptions {
            list_strategy: ListStrategy::tagged("member"),
            map_strategy: MapStrategy::separate_entries("key", "value"),
            ..Default::default()
        }
    }

    /// Options for EC2-style query protocols: flat lists and capitalized member names.
    #[must_use]
    pub fn ec2_query() -> Self {
        EncodingOptions {
            key_transform: KeyTransform::CapitalizeFirst,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    #[must_use]
    pub fn with_list_strategy(mut self, strategy: ListStrategy) -> Self {
        self.list_strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_map_strategy(mut self, strategy: MapStrategy) -> Self {
        self.map_strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_key_transform(mut self, transform: KeyTransform) -> Self {
        self.key_transform = transform;
        self
    }

    /// Sets the nesting limit. Trees nested deeper fail with
    /// [`Error::DepthExceeded`](crate::Error::DepthExceeded).
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Checks the options before any traversal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOptions`] for an empty separator or a zero depth limit.
    pub fn validate(&self) -> Result<()> {
        if self.separator.is_empty() {
            return Err(Error::invalid_options("separator must not be empty"));
        }
        if self.max_depth == 0 {
            return Err(Error::invalid_options("max_depth must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize_first() {
        assert_eq!(KeyTransform::CapitalizeFirst.apply("name"), "Name");
        assert_eq!(KeyTransform::CapitalizeFirst.apply(""), "");
        assert_eq!(KeyTransform::CapitalizeFirst.apply("iPAddress"), "IPAddress");
        assert_eq!(KeyTransform::CapitalizeFirst.apply("Name"), "Name");
        assert_eq!(KeyTransform::CapitalizeFirst.apply("éclair"), "Éclair");
    }

    #[test]
    fn test_identity_and_custom() {
        assert_eq!(KeyTransform::Identity.apply("someKey"), "someKey");
        let snake = KeyTransform::custom(|k| k.replace('-', "_"));
        assert_eq!(snake.apply("a-b-c"), "a_b_c");
        assert_eq!(format!("{:?}", snake), "Custom(..)");
    }

    #[test]
    fn test_presets() {
        let query = EncodingOptions::query();
        assert_eq!(
            query.map_strategy,
            MapStrategy::separate_entries("key", "value")
        );

        let ec2 = EncodingOptions::ec2_query();
        assert_eq!(ec2.list_strategy, ListStrategy::FlatIndexed);
        assert_eq!(ec2.key_transform.apply("name"), "Name");
    }

    #[test]
    fn test_validate() {
        assert!(EncodingOptions::new().validate().is_ok());
        assert!(matches!(
            EncodingOptions::new().with_separator("").validate(),
            Err(Error::InvalidOptions(_))
        ));
        assert!(EncodingOptions::new().with_max_depth(0).validate().is_err());
    }

    #[test]
    fn test_options_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EncodingOptions>();
    }
}
