//! The raw-shape builder.
//!
//! Converts a [`Tree`] into a [`RawShape`], a nested generic tree for wire
//! formats with native nesting. A raw shape is fully resolved: every leaf has
//! been rendered to a [`Scalar`], and it implements [`serde::Serialize`] so any
//! serde renderer can consume it directly.
//!
//! Map keys are kept exactly as they appear in the tree. Sorting and key
//! transforms are flattening concerns and do not apply here.
//!
//! ## Examples
//!
//! ```rust
//! use serde_shape::{build_raw_shape, tree, RawShape};
//!
//! let tree = tree!({ "name": "a", "tags": ["x", "y"] });
//! let shape = build_raw_shape(&tree).unwrap();
//!
//! let obj = shape.as_object().unwrap();
//! assert_eq!(obj.get("name").and_then(RawShape::as_str), Some("a"));
//! assert_eq!(obj.get("tags").and_then(RawShape::as_array).map(Vec::len), Some(2));
//! ```

use crate::options::DEFAULT_MAX_DEPTH;
use crate::{Error, Leaf, Result, Scalar, Tree};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

/// A nested, fully resolved value.
#[derive(Clone, Debug, PartialEq)]
pub enum RawShape {
    Scalar(Scalar),
    Array(Vec<RawShape>),
    Object(ShapeMap),
}

impl RawShape {
    #[inline]
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, RawShape::Scalar(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, RawShape::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, RawShape::Object(_))
    }

    #[inline]
    #[must_use]
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            RawShape::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// If the shape is a string scalar, returns it.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Scalar::as_str)
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<RawShape>> {
        match self {
            RawShape::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&ShapeMap> {
        match self {
            RawShape::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

impl Serialize for RawShape {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            RawShape::Scalar(s) => s.serialize(serializer),
            RawShape::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            RawShape::Object(obj) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (k, v) in obj.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl From<Scalar> for RawShape {
    fn from(value: Scalar) -> Self {
        RawShape::Scalar(value)
    }
}

impl From<Vec<RawShape>> for RawShape {
    fn from(value: Vec<RawShape>) -> Self {
        RawShape::Array(value)
    }
}

impl From<ShapeMap> for RawShape {
    fn from(value: ShapeMap) -> Self {
        RawShape::Object(value)
    }
}

/// Object payload of a [`RawShape`], iterated in the tree's insertion order.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ShapeMap(IndexMap<String, RawShape>);

impl ShapeMap {
    #[must_use]
    pub fn new() -> Self {
        ShapeMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        ShapeMap(IndexMap::with_capacity(capacity))
    }

    pub fn insert(&mut self, key: String, value: RawShape) -> Option<RawShape> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RawShape> {
        self.0.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, RawShape> {
        self.0.keys()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, RawShape> {
        self.0.iter()
    }
}

impl IntoIterator for ShapeMap {
    type Item = (String, RawShape);
    type IntoIter = indexmap::map::IntoIter<String, RawShape>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, RawShape)> for ShapeMap {
    fn from_iter<T: IntoIterator<Item = (String, RawShape)>>(iter: T) -> Self {
        ShapeMap(IndexMap::from_iter(iter))
    }
}

/// Builds a raw shape with the default depth limit.
///
/// # Errors
///
/// - [`Error::LeafConversionFailed`] if a leaf cannot render itself; the first failure aborts
/// - [`Error::DepthExceeded`] if nesting exceeds the default limit of 128
pub fn build_raw_shape<L: Leaf>(tree: &Tree<L>) -> Result<RawShape> {
    build_raw_shape_with_limit(tree, DEFAULT_MAX_DEPTH)
}

/// Builds a raw shape, failing once nesting goes past `max_depth`.
///
/// # Errors
///
/// Same as [`build_raw_shape`], plus [`Error::InvalidOptions`] for a zero limit.
pub fn build_raw_shape_with_limit<L: Leaf>(tree: &Tree<L>, max_depth: usize) -> Result<RawShape> {
    if max_depth == 0 {
        return Err(Error::invalid_options("max_depth must be at least 1"));
    }
    let shape = build(tree, 0, max_depth)?;
    debug!(root = tree.kind(), "built raw shape");
    Ok(shape)
}

fn build<L: Leaf>(node: &Tree<L>, depth: usize, max_depth: usize) -> Result<RawShape> {
    if depth > max_depth {
        warn!(limit = max_depth, "nesting depth limit exceeded");
        return Err(Error::depth_exceeded(max_depth));
    }

    match node {
        Tree::Leaf(leaf) => Ok(RawShape::Scalar(leaf.render_scalar()?)),
        Tree::List(items) => items
            .iter()
            .map(|item| build(item, depth + 1, max_depth))
            .collect::<Result<Vec<_>>>()
            .map(RawShape::Array),
        Tree::Map(map) => map
            .iter()
            .map(|(k, v)| build(v, depth + 1, max_depth).map(|shape| (k.clone(), shape)))
            .collect::<Result<ShapeMap>>()
            .map(RawShape::Object),
    }
}
