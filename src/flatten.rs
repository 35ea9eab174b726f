//! The flattening engine.
//!
//! Turns a [`Tree`] into an ordered list of flat key/value entries for wire
//! formats with no native nesting (query strings, form bodies).
//!
//! ## Key construction
//!
//! Keys are joined with [`EncodingOptions::separator`]. With the default `.`:
//!
//! | node | strategy | child keys |
//! |---|---|---|
//! | list under `k` | `FlatIndexed` (or any list directly under the root) | `k.1`, `k.2` |
//! | list under `k` | `TaggedIndexed("member")` | `k.member.1`, `k.member.2` |
//! | map under `k` | `NestedKey` (or the root map) | `k.Name` |
//! | map under `k` | `SeparateEntries("key", "value")` | `k.1.key` = name, `k.1.value` = value |
//!
//! Map entries are visited in byte-wise ascending key order, computed per map,
//! so output never depends on insertion order. List items keep their order.
//! Entries appear in depth-first pre-order. Duplicate keys from independent
//! branches are emitted as-is.
//!
//! ## Examples
//!
//! ```rust
//! use serde_shape::{flatten, tree, EncodingOptions};
//!
//! let tree = tree!({ "Name": "a", "Age": "3" });
//! let entries = flatten(&tree, &EncodingOptions::default()).unwrap();
//!
//! let pairs: Vec<_> = entries.iter().map(|e| (e.key.as_str(), e.value.as_deref())).collect();
//! assert_eq!(pairs, vec![("Age", Some("3")), ("Name", Some("a"))]);
//! ```

use crate::{EncodingOptions, Error, Leaf, ListStrategy, MapStrategy, Result, Tree};
use tracing::{debug, warn};

/// One flat key/value pair.
///
/// `value` is `None` for key-only slots.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FlattenedEntry {
    pub key: String,
    pub value: Option<String>,
}

impl FlattenedEntry {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        FlattenedEntry {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    /// An entry with a key and no value, such as a bare flag in a query string.
    #[must_use]
    pub fn key_only(key: impl Into<String>) -> Self {
        FlattenedEntry {
            key: key.into(),
            value: None,
        }
    }

    /// Borrows the entry as a `(key, value)` pair.
    #[must_use]
    pub fn as_pair(&self) -> (&str, Option<&str>) {
        (&self.key, self.value.as_deref())
    }
}

impl From<FlattenedEntry> for (String, Option<String>) {
    fn from(entry: FlattenedEntry) -> Self {
        (entry.key, entry.value)
    }
}

/// Appender receiving flattened entries in emission order.
pub trait EntrySink {
    fn push_entry(&mut self, entry: FlattenedEntry);
}

impl EntrySink for Vec<FlattenedEntry> {
    fn push_entry(&mut self, entry: FlattenedEntry) {
        self.push(entry);
    }
}

impl EntrySink for Vec<(String, Option<String>)> {
    fn push_entry(&mut self, entry: FlattenedEntry) {
        self.push(entry.into());
    }
}

/// Flattens a tree into ordered key/value entries.
///
/// A leaf at the root yields a single entry with an empty key; the caller
/// decides what a bare scalar means for its wire format.
///
/// # Errors
///
/// - [`Error::InvalidOptions`] if `options` fail validation
/// - [`Error::ListRequiresKey`] for a list at the root
/// - [`Error::LeafConversionFailed`] if a leaf cannot render itself
/// - [`Error::DepthExceeded`] if nesting exceeds `options.max_depth`
pub fn flatten<L: Leaf>(tree: &Tree<L>, options: &EncodingOptions) -> Result<Vec<FlattenedEntry>> {
    let mut entries = Vec::new();
    flatten_into(tree, options, &mut entries)?;
    Ok(entries)
}

/// Flattens a tree, appending the entries to `sink`.
///
/// Nothing is appended unless the whole tree flattens successfully.
///
/// # Errors
///
/// Same as [`flatten`].
pub fn flatten_into<L, S>(tree: &Tree<L>, options: &EncodingOptions, sink: &mut S) -> Result<()>
where
    L: Leaf,
    S: EntrySink + ?Sized,
{
    options.validate()?;

    let mut flattener = Flattener {
        options,
        entries: Vec::new(),
    };
    flattener.visit(tree, None, true, 0)?;

    debug!(
        root = tree.kind(),
        entries = flattener.entries.len(),
        "flattened tree"
    );
    for entry in flattener.entries {
        sink.push_entry(entry);
    }
    Ok(())
}

struct Flattener<'a> {
    options: &'a EncodingOptions,
    entries: Vec<FlattenedEntry>,
}

impl Flattener<'_> {
    fn visit<L: Leaf>(
        &mut self,
        node: &Tree<L>,
        key: Option<&str>,
        is_root: bool,
        depth: usize,
    ) -> Result<()> {
        if depth > self.options.max_depth {
            warn!(limit = self.options.max_depth, key, "nesting depth limit exceeded");
            return Err(Error::depth_exceeded(self.options.max_depth));
        }

        match node {
            Tree::Leaf(leaf) => {
                let key = key.unwrap_or_default();
                let value = leaf.render_string().map_err(|e| e.at_key(key))?;
                self.entries.push(FlattenedEntry::new(key, value));
                Ok(())
            }
            Tree::List(items) => {
                let key = key.ok_or(Error::ListRequiresKey)?;
                self.visit_list(items, key, is_root, depth)
            }
            Tree::Map(map) => {
                for (idx, (raw_key, value)) in map.sorted_entries().into_iter().enumerate() {
                    self.visit_map_entry(raw_key, value, idx + 1, key, is_root, depth)?;
                }
                Ok(())
            }
        }
    }

    fn visit_list<L: Leaf>(
        &mut self,
        items: &[Tree<L>],
        key: &str,
        is_root: bool,
        depth: usize,
    ) -> Result<()> {
        let options = self.options;
        let sep = &options.separator;
        for (i, item) in items.iter().enumerate() {
            let position = i + 1;
            let child_key = match &options.list_strategy {
                ListStrategy::TaggedIndexed(tag) if !is_root => {
                    format!("{}{}{}{}{}", key, sep, tag, sep, position)
                }
                _ => format!("{}{}{}", key, sep, position),
            };
            self.visit(item, Some(&child_key), false, depth + 1)?;
        }
        Ok(())
    }

    fn visit_map_entry<L: Leaf>(
        &mut self,
        raw_key: &str,
        value: &Tree<L>,
        position: usize,
        key: Option<&str>,
        is_root: bool,
        depth: usize,
    ) -> Result<()> {
        let options = self.options;
        let sep = &options.separator;
        let transformed = options.key_transform.apply(raw_key);

        match &options.map_strategy {
            MapStrategy::SeparateEntries { key_tag, value_tag } if !is_root => {
                let prefix = key.map(|b| format!("{}{}", b, sep)).unwrap_or_default();
                let key_entry = format!("{}{}{}{}", prefix, position, sep, key_tag);
                self.entries.push(FlattenedEntry::new(key_entry, transformed));

                let value_key = format!("{}{}{}{}", prefix, position, sep, value_tag);
                self.visit(value, Some(&value_key), false, depth + 1)
            }
            _ => {
                let value_key = match key {
                    Some(k) => format!("{}{}{}", k, sep, transformed),
                    None => transformed,
                };
                self.visit(value, Some(&value_key), false, depth + 1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tree, KeyTransform, Scalar};

    fn pairs(entries: &[FlattenedEntry]) -> Vec<(&str, Option<&str>)> {
        entries.iter().map(FlattenedEntry::as_pair).collect()
    }

    #[test]
    fn test_root_map_is_sorted() {
        let tree = tree!({ "Name": "a", "Age": "3" });
        let entries = flatten(&tree, &EncodingOptions::default()).unwrap();
        assert_eq!(
            pairs(&entries),
            vec![("Age", Some("3")), ("Name", Some("a"))]
        );
    }

    #[test]
    fn test_flat_indexed_list() {
        let tree = tree!({ "b": ["x", "y"] });
        let entries = flatten(&tree, &EncodingOptions::default()).unwrap();
        assert_eq!(pairs(&entries), vec![("b.1", Some("x")), ("b.2", Some("y"))]);
    }

    #[test]
    fn test_tagged_list() {
        let tree = tree!({ "Items": ["p", "q"] });
        let options = EncodingOptions::new().with_list_strategy(ListStrategy::tagged("member"));
        let entries = flatten(&tree, &options).unwrap();
        assert_eq!(
            pairs(&entries),
            vec![("Items.member.1", Some("p")), ("Items.member.2", Some("q"))]
        );
    }

    #[test]
    fn test_separate_entries_map() {
        let tree = tree!({ "Tags": { "Env": "prod" } });
        let options =
            EncodingOptions::new().with_map_strategy(MapStrategy::separate_entries("key", "value"));
        let entries = flatten(&tree, &options).unwrap();
        assert_eq!(
            pairs(&entries),
            vec![("Tags.1.key", Some("Env")), ("Tags.1.value", Some("prod"))]
        );
    }

    #[test]
    fn test_separate_entries_ignored_at_root() {
        let tree = tree!({ "b": "2", "a": "1" });
        let entries = flatten(&tree, &EncodingOptions::query()).unwrap();
        assert_eq!(pairs(&entries), vec![("a", Some("1")), ("b", Some("2"))]);
    }

    #[test]
    fn test_separate_entries_positions_follow_sorted_order() {
        let tree = tree!({ "Attrs": { "zeta": 1, "alpha": { "Inner": ["v"] } } });
        let entries = flatten(&tree, &EncodingOptions::query()).unwrap();
        assert_eq!(
            pairs(&entries),
            vec![
                ("Attrs.1.key", Some("alpha")),
                ("Attrs.1.value.1.key", Some("Inner")),
                ("Attrs.1.value.1.value.member.1", Some("v")),
                ("Attrs.2.key", Some("zeta")),
                ("Attrs.2.value", Some("1")),
            ]
        );
    }

    #[test]
    fn test_key_transform_applies_to_nested_and_separate_keys() {
        let tree = tree!({ "outer": { "inner": "v" } });
        let options = EncodingOptions::new().with_key_transform(KeyTransform::CapitalizeFirst);
        let entries = flatten(&tree, &options).unwrap();
        assert_eq!(pairs(&entries), vec![("Outer.Inner", Some("v"))]);

        let options = EncodingOptions::query().with_key_transform(KeyTransform::CapitalizeFirst);
        let entries = flatten(&tree, &options).unwrap();
        assert_eq!(
            pairs(&entries),
            vec![("Outer.1.key", Some("Inner")), ("Outer.1.value", Some("v"))]
        );
    }

    #[test]
    fn test_sort_uses_raw_keys_not_transformed() {
        let tree = tree!({ "b": "1", "B": "2" });
        let options = EncodingOptions::new().with_key_transform(KeyTransform::custom(|k| {
            if k == "B" {
                "z".to_string()
            } else {
                "a".to_string()
            }
        }));
        let entries = flatten(&tree, &options).unwrap();
        assert_eq!(pairs(&entries), vec![("z", Some("2")), ("a", Some("1"))]);
    }

    #[test]
    fn test_root_list_requires_key() {
        let tree = tree!(["a"]);
        assert_eq!(
            flatten(&tree, &EncodingOptions::default()),
            Err(Error::ListRequiresKey)
        );
        let empty: Tree<Scalar> = Tree::list(vec![]);
        assert_eq!(
            flatten(&empty, &EncodingOptions::default()),
            Err(Error::ListRequiresKey)
        );
    }

    #[test]
    fn test_root_leaf_has_empty_key() {
        let tree: Tree<Scalar> = Tree::leaf("solo");
        let entries = flatten(&tree, &EncodingOptions::default()).unwrap();
        assert_eq!(pairs(&entries), vec![("", Some("solo"))]);
    }

    #[test]
    fn test_nested_lists_and_custom_separator() {
        let tree = tree!({ "grid": [["a", "b"], ["c"]] });
        let options = EncodingOptions::new().with_separator("_");
        let entries = flatten(&tree, &options).unwrap();
        assert_eq!(
            pairs(&entries),
            vec![
                ("grid_1_1", Some("a")),
                ("grid_1_2", Some("b")),
                ("grid_2_1", Some("c"))
            ]
        );
    }

    #[test]
    fn test_empty_containers_emit_nothing() {
        let tree = tree!({ "list": [], "map": {} });
        let entries = flatten(&tree, &EncodingOptions::query()).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_duplicate_keys_are_not_merged() {
        let tree = tree!({ "a.b": "1", "a": { "b": "2" } });
        let entries = flatten(&tree, &EncodingOptions::default()).unwrap();
        assert_eq!(pairs(&entries), vec![("a.b", Some("2")), ("a.b", Some("1"))]);
    }

    #[test]
    fn test_leaf_failure_carries_key_and_aborts() {
        let tree: Tree<Scalar> = Tree::map([(
            "Items",
            Tree::list(vec![Tree::leaf("ok"), Tree::Leaf(Scalar::Null)]),
        )]);
        let mut sink = Vec::<FlattenedEntry>::new();
        let err = flatten_into(&tree, &EncodingOptions::default(), &mut sink).unwrap_err();
        assert!(matches!(
            err,
            Error::LeafConversionFailed { key: Some(ref k), .. } if k == "Items.2"
        ));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_depth_limit() {
        let tree = tree!({ "a": { "b": { "c": "deep" } } });
        let shallow = EncodingOptions::new().with_max_depth(2);
        assert_eq!(
            flatten(&tree, &shallow),
            Err(Error::DepthExceeded { limit: 2 })
        );
        let enough = EncodingOptions::new().with_max_depth(3);
        assert_eq!(
            pairs(&flatten(&tree, &enough).unwrap()),
            vec![("a.b.c", Some("deep"))]
        );
    }

    #[test]
    fn test_invalid_options_rejected_before_traversal() {
        let tree = tree!({ "a": "1" });
        let options = EncodingOptions::new().with_separator("");
        assert!(matches!(
            flatten(&tree, &options),
            Err(Error::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_pair_sink() {
        let tree = tree!({ "k": "v" });
        let mut sink: Vec<(String, Option<String>)> = vec![("pre".into(), None)];
        flatten_into(&tree, &EncodingOptions::default(), &mut sink).unwrap();
        assert_eq!(
            sink,
            vec![
                ("pre".to_string(), None),
                ("k".to_string(), Some("v".to_string()))
            ]
        );
    }

    #[test]
    fn test_key_only_entry_through_pair_sink() {
        let entry = FlattenedEntry::key_only("Action");
        assert_eq!(entry.as_pair(), ("Action", None));

        let mut sink: Vec<(String, Option<String>)> = Vec::new();
        sink.push_entry(entry);
        flatten_into(&tree!({ "k": "v" }), &EncodingOptions::default(), &mut sink).unwrap();
        assert_eq!(
            sink,
            vec![
                ("Action".to_string(), None),
                ("k".to_string(), Some("v".to_string()))
            ]
        );
    }
}
