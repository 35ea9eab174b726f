/// Builds a [`Tree<Scalar>`](crate::Tree) from a JSON-like literal.
///
/// ```rust
/// use serde_shape::{tree, Tree};
///
/// let tree = tree!({
///     "Name": "a",
///     "Tags": ["x", "y"],
///     "Limits": { "max": 10 }
/// });
/// assert!(tree.is_map());
/// ```
#[macro_export]
macro_rules! tree {
    (null) => {
        $crate::Tree::Leaf($crate::Scalar::Null)
    };

    (true) => {
        $crate::Tree::Leaf($crate::Scalar::Bool(true))
    };

    (false) => {
        $crate::Tree::Leaf($crate::Scalar::Bool(false))
    };

    ([]) => {
        $crate::Tree::<$crate::Scalar>::List(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Tree::<$crate::Scalar>::List(vec![$($crate::tree!($elem)),*])
    };

    ({}) => {
        $crate::Tree::<$crate::Scalar>::Map($crate::TreeMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut map = $crate::TreeMap::<$crate::Scalar>::new();
        $(
            map.insert($key.to_string(), $crate::tree!($value));
        )*
        $crate::Tree::Map(map)
    }};

    // Any other expression goes through the serde tree builder
    ($s:expr) => {
        $crate::to_tree(&$s).expect("tree! value could not be built into a tree")
    };
}

#[cfg(test)]
mod tests {
    use crate::{Number, Scalar, Tree, TreeMap};
    use std::collections::BTreeMap;

    #[test]
    fn test_tree_macro_leaves() {
        assert_eq!(tree!(null), Tree::Leaf(Scalar::Null));
        assert_eq!(tree!(true), Tree::Leaf(Scalar::Bool(true)));
        assert_eq!(tree!(42), Tree::Leaf(Scalar::Number(Number::Integer(42))));
        assert_eq!(tree!("hello"), Tree::Leaf(Scalar::String("hello".to_string())));
    }

    #[test]
    fn test_tree_macro_lists() {
        assert_eq!(tree!([]), Tree::List(vec![]));
        assert_eq!(
            tree!([1, "two", [false]]),
            Tree::List(vec![
                Tree::leaf(1),
                Tree::leaf("two"),
                Tree::List(vec![Tree::leaf(false)])
            ])
        );
    }

    #[test]
    fn test_tree_macro_maps() {
        assert_eq!(tree!({}), Tree::Map(TreeMap::new()));

        let tree = tree!({ "name": "Alice", "tags": ["a"] });
        let map = tree.as_map().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("name"), Some(&Tree::leaf("Alice")));
        assert_eq!(map.get("tags"), Some(&Tree::List(vec![Tree::leaf("a")])));
    }

    #[test]
    fn test_tree_macro_serializes_expressions() {
        let limits: BTreeMap<&str, u32> = [("max", 10)].into_iter().collect();
        let tree = tree!({ "Limits": limits });
        let inner = tree.as_map().and_then(|m| m.get("Limits")).unwrap();
        assert_eq!(inner.as_map().and_then(|m| m.get("max")), Some(&Tree::leaf(10)));
    }

    #[test]
    #[should_panic(expected = "tree! value could not be built into a tree")]
    fn test_tree_macro_panics_on_unbuildable_value() {
        let by_pair: BTreeMap<(u8, u8), &str> = [((1, 2), "x")].into_iter().collect();
        let _ = tree!(by_pair);
    }
}
