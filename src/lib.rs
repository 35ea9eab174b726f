//! # serde_shape
//!
//! Structural flattening for wire protocols.
//!
//! An encode pass first builds an intermediate [`Tree`] from an object's
//! fields. That tree is then handed exactly once to one of two engines,
//! chosen by the target wire format:
//!
//! - [`flatten`]: an ordered list of `(key, value)` string pairs for formats
//!   with no native nesting, such as query strings and form bodies
//! - [`build_raw_shape`]: a nested [`RawShape`] for formats that nest
//!   natively, ready for any serde renderer (JSON, XML)
//!
//! ## Key Features
//!
//! - **Deterministic**: map members are emitted in byte-wise sorted key order,
//!   independent of how the tree was built
//! - **Configurable**: list encoding, map encoding, key casing, and separator
//!   are chosen per call through [`EncodingOptions`]
//! - **Generic leaves**: any type implementing [`Leaf`] can sit in a tree;
//!   [`Scalar`] is provided
//! - **Serde driven**: [`to_tree`] builds trees from any `T: Serialize`
//! - **Bounded**: nesting depth is limited, so hostile input fails with an
//!   error instead of overflowing the stack
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::Serialize;
//! use serde_shape::{to_flat_entries, EncodingOptions};
//!
//! #[derive(Serialize)]
//! struct DescribeTags {
//!     #[serde(rename = "Names")]
//!     names: Vec<String>,
//!     #[serde(rename = "Filters")]
//!     filters: std::collections::BTreeMap<String, String>,
//! }
//!
//! let request = DescribeTags {
//!     names: vec!["a".into(), "b".into()],
//!     filters: [("Env".to_string(), "prod".to_string())].into_iter().collect(),
//! };
//!
//! let entries = to_flat_entries(&request, &EncodingOptions::query()).unwrap();
//! let pairs: Vec<_> = entries.iter().map(|e| e.as_pair()).collect();
//! assert_eq!(
//!     pairs,
//!     vec![
//!         ("Filters.1.key", Some("Env")),
//!         ("Filters.1.value", Some("prod")),
//!         ("Names.member.1", Some("a")),
//!         ("Names.member.2", Some("b")),
//!     ]
//! );
//! ```
//!
//! ## Nested output
//!
//! ```rust
//! use serde_shape::{build_raw_shape, tree};
//!
//! let shape = build_raw_shape(&tree!({ "name": "a", "ids": [1, 2] })).unwrap();
//! let json = serde_json::to_string(&shape).unwrap();
//! assert_eq!(json, r#"{"name":"a","ids":[1,2]}"#);
//! ```
//!
//! ## Concurrency
//!
//! Both engines are synchronous, pure traversals over a tree owned by a single
//! call. Separate calls over separate trees may run on separate threads with
//! no coordination.
//!
//! ## Logging
//!
//! Events are emitted through [`tracing`]: a `debug` event per completed
//! operation and a `warn` event when the depth limit trips. No subscriber is
//! installed by this crate.

pub mod error;
pub mod flatten;
pub mod macros;
pub mod options;
pub mod raw;
pub mod scalar;
pub mod ser;
pub mod tree;

pub use error::{EncodingError, Error, Result};
pub use flatten::{flatten, flatten_into, EntrySink, FlattenedEntry};
pub use options::{EncodingOptions, KeyTransform, ListStrategy, MapStrategy, DEFAULT_MAX_DEPTH};
pub use raw::{build_raw_shape, build_raw_shape_with_limit, RawShape, ShapeMap};
pub use scalar::{Number, Scalar};
pub use ser::{to_tree, ShapeEncoder, TreeSerializer};
pub use tree::{Leaf, Tree, TreeMap};

use serde::Serialize;

/// Serialize any `T: Serialize` straight into flat key/value entries.
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use serde_shape::{to_flat_entries, EncodingOptions};
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let entries = to_flat_entries(&Point { x: 1, y: 2 }, &EncodingOptions::ec2_query()).unwrap();
/// assert_eq!(entries[0].as_pair(), ("X", Some("1")));
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be built into a tree or the tree
/// cannot be flattened (see [`flatten`]).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_flat_entries<T>(value: &T, options: &EncodingOptions) -> Result<Vec<FlattenedEntry>>
where
    T: ?Sized + Serialize,
{
    let mut encoder: ShapeEncoder = ShapeEncoder::new();
    encoder.encode(value)?;
    encoder.flatten(options)
}

/// Serialize any `T: Serialize` into a nested [`RawShape`].
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use serde_shape::to_raw_shape;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let shape = to_raw_shape(&Point { x: 1, y: 2 }).unwrap();
/// assert!(shape.is_object());
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be built into a tree or the raw
/// shape cannot be built (see [`build_raw_shape`]).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_raw_shape<T>(value: &T) -> Result<RawShape>
where
    T: ?Sized + Serialize,
{
    let mut encoder: ShapeEncoder = ShapeEncoder::new();
    encoder.encode(value)?;
    encoder.raw_shape()
}
