//! The intermediate tree built while encoding an object's fields.
//!
//! A [`Tree`] is handed exactly once to either the flattening engine
//! ([`flatten`](crate::flatten)) or the raw-shape builder
//! ([`build_raw_shape`](crate::build_raw_shape)). It is immutable once built
//! and is only ever traversed read-only.
//!
//! ## Core Types
//!
//! - [`Tree`]: leaf, ordered list, or string-keyed map
//! - [`TreeMap`]: the map payload, keeping insertion order for inspection
//! - [`Leaf`]: the two conversions every leaf type must support
//!
//! ## Examples
//!
//! ```rust
//! use serde_shape::{Scalar, Tree, TreeMap};
//!
//! let mut fields: TreeMap<Scalar> = TreeMap::new();
//! fields.insert("Name".to_string(), Tree::leaf(Scalar::from("a")));
//! fields.insert("Tags".to_string(), Tree::list(vec![Tree::leaf(Scalar::from("x"))]));
//!
//! let tree = Tree::Map(fields);
//! assert!(tree.is_map());
//! ```

use crate::{Result, Scalar};
use indexmap::IndexMap;

/// Capability contract for the leaf payload of a [`Tree`].
///
/// Both conversions are side-effect free. A failure surfaces as
/// [`Error::LeafConversionFailed`](crate::Error::LeafConversionFailed).
pub trait Leaf {
    /// Renders the leaf as a flat string value.
    fn render_string(&self) -> Result<String>;

    /// Renders the leaf as a scalar for nested output.
    fn render_scalar(&self) -> Result<Scalar>;
}

/// A node of the intermediate tree.
///
/// List order is meaningful and preserved. Map keys are unique; their
/// insertion order carries no meaning for flattening, which sorts them.
#[derive(Clone, Debug, PartialEq)]
pub enum Tree<L> {
    Leaf(L),
    List(Vec<Tree<L>>),
    Map(TreeMap<L>),
}

impl<L> Tree<L> {
    /// Wraps a single leaf value.
    #[inline]
    #[must_use]
    pub fn leaf(value: impl Into<L>) -> Self {
        Tree::Leaf(value.into())
    }

    /// Builds a list node from its items, in order.
    #[inline]
    #[must_use]
    pub fn list(items: Vec<Tree<L>>) -> Self {
        Tree::List(items)
    }

    /// Builds a map node from key/value pairs.
    ///
    /// A repeated key keeps the last value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_shape::{Scalar, Tree};
    ///
    /// let tree: Tree<Scalar> = Tree::map([("Env", Tree::leaf("prod"))]);
    /// assert_eq!(tree.as_map().map(|m| m.len()), Some(1));
    /// ```
    #[must_use]
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Tree<L>)>,
    {
        Tree::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v))
                .collect(),
        )
    }

    #[inline]
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Tree::Leaf(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Tree::List(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Tree::Map(_))
    }

    /// If the node is a leaf, returns its payload.
    #[inline]
    #[must_use]
    pub fn as_leaf(&self) -> Option<&L> {
        match self {
            Tree::Leaf(l) => Some(l),
            _ => None,
        }
    }

    /// If the node is a list, returns its items.
    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[Tree<L>]> {
        match self {
            Tree::List(items) => Some(items),
            _ => None,
        }
    }

    /// If the node is a map, returns it.
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&TreeMap<L>> {
        match self {
            Tree::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Short name of the node kind, used in log events.
    pub(crate) const fn kind(&self) -> &'static str {
        match self {
            Tree::Leaf(_) => "leaf",
            Tree::List(_) => "list",
            Tree::Map(_) => "map",
        }
    }
}

/// The map payload of a [`Tree`].
///
/// A thin wrapper around [`IndexMap`]; insertion order is kept only so trees
/// print and compare predictably.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeMap<L>(IndexMap<String, Tree<L>>);

impl<L> TreeMap<L> {
    #[must_use]
    pub fn new() -> Self {
        TreeMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        TreeMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair, returning the previous value for the key.
    pub fn insert(&mut self, key: String, value: Tree<L>) -> Option<Tree<L>> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Tree<L>> {
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

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Tree<L>> {
        self.0.keys()
    }

    /// Returns an iterator over the entries of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Tree<L>> {
        self.0.iter()
    }

    /// Returns the entries ordered by key, byte-wise ascending.
    pub fn sorted_entries(&self) -> Vec<(&String, &Tree<L>)> {
        let mut entries: Vec<_> = self.0.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
        entries
    }
}

impl<L> Default for TreeMap<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> IntoIterator for TreeMap<L> {
    type Item = (String, Tree<L>);
    type IntoIter = indexmap::map::IntoIter<String, Tree<L>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, L> IntoIterator for &'a TreeMap<L> {
    type Item = (&'a String, &'a Tree<L>);
    type IntoIter = indexmap::map::Iter<'a, String, Tree<L>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<L> FromIterator<(String, Tree<L>)> for TreeMap<L> {
    fn from_iter<T: IntoIterator<Item = (String, Tree<L>)>>(iter: T) -> Self {
        TreeMap(IndexMap::from_iter(iter))
    }
}

impl<L> From<TreeMap<L>> for Tree<L> {
    fn from(value: TreeMap<L>) -> Self {
        Tree::Map(value)
    }
}

impl<L> From<Vec<Tree<L>>> for Tree<L> {
    fn from(value: Vec<Tree<L>>) -> Self {
        Tree::List(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_entries_are_bytewise() {
        let tree: Tree<Scalar> = Tree::map([
            ("b", Tree::leaf(1)),
            ("B", Tree::leaf(2)),
            ("a", Tree::leaf(3)),
            ("", Tree::leaf(4)),
        ]);
        let keys: Vec<_> = tree
            .as_map()
            .unwrap()
            .sorted_entries()
            .into_iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(keys, vec!["", "B", "a", "b"]);
    }

    #[test]
    fn test_insertion_order_kept_for_iteration() {
        let mut map = TreeMap::<Scalar>::new();
        map.insert("z".to_string(), Tree::leaf("1"));
        map.insert("a".to_string(), Tree::leaf("2"));
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a"]);
    }

    #[test]
    fn test_kind_checks() {
        let leaf: Tree<Scalar> = Tree::leaf(true);
        assert!(leaf.is_leaf());
        assert_eq!(leaf.as_leaf(), Some(&Scalar::Bool(true)));

        let list: Tree<Scalar> = Tree::list(vec![leaf.clone()]);
        assert!(list.is_list());
        assert_eq!(list.as_list().map(<[_]>::len), Some(1));
        assert!(list.as_map().is_none());
    }
}
