//! Building trees from serde data.
//!
//! [`TreeSerializer`] maps any `T: Serialize` onto a [`Tree<Scalar>`]:
//!
//! - structs and maps become [`Tree::Map`]
//! - sequences, tuples, and tuple structs become [`Tree::List`]
//! - primitives become [`Tree::Leaf`]
//! - unit variants become their variant name; newtype, tuple, and struct
//!   variants become a single-entry map keyed by the variant name
//! - bytes become a list of integers
//!
//! Fields and map entries whose value is `None` (or unit) are left out, so
//! optional members simply do not appear in flattened output.
//!
//! ## Usage
//!
//! ```rust
//! use serde::Serialize;
//! use serde_shape::{to_tree, Scalar, Tree};
//!
//! #[derive(Serialize)]
//! struct Request { name: String, limit: Option<u32> }
//!
//! let tree = to_tree(&Request { name: "a".into(), limit: None }).unwrap();
//! let map = tree.as_map().unwrap();
//! assert_eq!(map.get("name"), Some(&Tree::Leaf(Scalar::from("a"))));
//! assert!(map.get("limit").is_none());
//! ```
//!
//! ## Holding a tree being populated
//!
//! [`ShapeEncoder`] owns the tree between population and the single encode
//! step that consumes it.

use crate::{
    build_raw_shape, flatten, EncodingOptions, Error, FlattenedEntry, Leaf, RawShape, Result,
    Scalar, Tree, TreeMap,
};
use serde::{ser, Serialize};
use std::fmt;

/// Converts a `T: Serialize` into a [`Tree<Scalar>`].
pub struct TreeSerializer;

pub struct SerializeVec {
    vec: Vec<Tree<Scalar>>,
}

pub struct SerializeMap {
    map: TreeMap<Scalar>,
    current_key: Option<String>,
}

pub struct SerializeTupleVariant {
    variant: &'static str,
    vec: Vec<Tree<Scalar>>,
}

pub struct SerializeStructVariant {
    variant: &'static str,
    map: TreeMap<Scalar>,
}

impl ser::Serializer for TreeSerializer {
    type Ok = Tree<Scalar>;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Tree<Scalar>> {
        Ok(Tree::leaf(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Tree<Scalar>> {
        Ok(Tree::leaf(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Tree<Scalar>> {
        Ok(Tree::leaf(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Tree<Scalar>> {
        Ok(Tree::leaf(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Tree<Scalar>> {
        Ok(Tree::leaf(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Tree<Scalar>> {
        Ok(Tree::leaf(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Tree<Scalar>> {
        Ok(Tree::leaf(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Tree<Scalar>> {
        Ok(Tree::leaf(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Tree<Scalar>> {
        Ok(Tree::leaf(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Tree<Scalar>> {
        Ok(Tree::leaf(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Tree<Scalar>> {
        Ok(Tree::leaf(v))
    }

    fn serialize_char(self, v: char) -> Result<Tree<Scalar>> {
        Ok(Tree::leaf(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Tree<Scalar>> {
        Ok(Tree::leaf(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Tree<Scalar>> {
        Ok(Tree::List(v.iter().map(|&b| Tree::leaf(b)).collect()))
    }

    fn serialize_none(self) -> Result<Tree<Scalar>> {
        Ok(Tree::Leaf(Scalar::Null))
    }

    fn serialize_some<T>(self, value: &T) -> Result<Tree<Scalar>>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Tree<Scalar>> {
        Ok(Tree::Leaf(Scalar::Null))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Tree<Scalar>> {
        Ok(Tree::Leaf(Scalar::Null))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Tree<Scalar>> {
        Ok(Tree::leaf(variant))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Tree<Scalar>>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Tree<Scalar>>
    where
        T: ?Sized + Serialize,
    {
        let mut map = TreeMap::with_capacity(1);
        map.insert(variant.to_string(), to_tree(value)?);
        Ok(Tree::Map(map))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::with_capacity(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::with_capacity(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::with_capacity(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            variant,
            vec: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeStructVariant> {
        Ok(SerializeStructVariant {
            variant,
            map: TreeMap::new(),
        })
    }
}

impl SerializeVec {
    fn with_capacity(capacity: usize) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
        }
    }
}

impl SerializeMap {
    fn new() -> Self {
        SerializeMap {
            map: TreeMap::new(),
            current_key: None,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Tree<Scalar>;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_tree(value)?);
        Ok(())
    }

    fn end(self) -> Result<Tree<Scalar>> {
        Ok(Tree::List(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Tree<Scalar>;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Tree<Scalar>> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Tree<Scalar>;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Tree<Scalar>> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Tree<Scalar>;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_tree(value)?);
        Ok(())
    }

    fn end(self) -> Result<Tree<Scalar>> {
        let mut map = TreeMap::with_capacity(1);
        map.insert(self.variant.to_string(), Tree::List(self.vec));
        Ok(Tree::Map(map))
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Tree<Scalar>;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.current_key = Some(map_key(to_tree(key)?)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        insert_present(&mut self.map, key, to_tree(value)?);
        Ok(())
    }

    fn end(self) -> Result<Tree<Scalar>> {
        Ok(Tree::Map(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Tree<Scalar>;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        insert_present(&mut self.map, key.to_string(), to_tree(value)?);
        Ok(())
    }

    fn end(self) -> Result<Tree<Scalar>> {
        Ok(Tree::Map(self.map))
    }
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Tree<Scalar>;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        insert_present(&mut self.map, key.to_string(), to_tree(value)?);
        Ok(())
    }

    fn end(self) -> Result<Tree<Scalar>> {
        let mut outer = TreeMap::with_capacity(1);
        outer.insert(self.variant.to_string(), Tree::Map(self.map));
        Ok(Tree::Map(outer))
    }
}

// Absent optional members are dropped rather than stored as null leaves.
fn insert_present(map: &mut TreeMap<Scalar>, key: String, value: Tree<Scalar>) {
    if !matches!(value, Tree::Leaf(Scalar::Null)) {
        map.insert(key, value);
    }
}

fn map_key(key: Tree<Scalar>) -> Result<String> {
    match key {
        Tree::Leaf(Scalar::String(s)) => Ok(s),
        Tree::Leaf(
            scalar @ (Scalar::Bool(_) | Scalar::Number(_) | Scalar::BigInt(_)),
        ) => scalar.render_string(),
        _ => Err(Error::unsupported_type(
            "map keys must be strings, numbers, or booleans",
        )),
    }
}

/// Converts any `T: Serialize` into a [`Tree<Scalar>`].
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] for map keys that are not strings,
/// numbers, or booleans, and [`Error::Custom`] for errors raised by `T`'s
/// `Serialize` implementation.
pub fn to_tree<T>(value: &T) -> Result<Tree<Scalar>>
where
    T: ?Sized + Serialize,
{
    value.serialize(TreeSerializer)
}

/// Owns the tree produced by an encode pass until it is consumed.
///
/// An encoder starts empty. A builder populates it once, with
/// [`encode`](ShapeEncoder::encode) or [`set_tree`](ShapeEncoder::set_tree),
/// and the tree is then consumed by exactly one of
/// [`flatten`](ShapeEncoder::flatten) or [`raw_shape`](ShapeEncoder::raw_shape).
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use serde_shape::{EncodingOptions, ShapeEncoder};
///
/// #[derive(Serialize)]
/// struct Query { action: String }
///
/// let mut encoder: ShapeEncoder = ShapeEncoder::new();
/// encoder.encode(&Query { action: "List".into() }).unwrap();
/// let entries = encoder.flatten(&EncodingOptions::ec2_query()).unwrap();
/// assert_eq!(entries[0].as_pair(), ("Action", Some("List")));
/// ```
pub struct ShapeEncoder<L = Scalar> {
    tree: Option<Tree<L>>,
}

impl<L> ShapeEncoder<L> {
    #[must_use]
    pub fn new() -> Self {
        ShapeEncoder { tree: None }
    }

    /// Stores a tree built elsewhere, replacing any earlier one.
    pub fn set_tree(&mut self, tree: Tree<L>) {
        self.tree = Some(tree);
    }

    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.tree.is_some()
    }

    /// Borrows the populated tree.
    ///
    /// # Panics
    ///
    /// Panics if the encoder was never populated.
    #[must_use]
    pub fn tree(&self) -> &Tree<L> {
        match &self.tree {
            Some(tree) => tree,
            None => unpopulated(),
        }
    }

    /// Takes the populated tree out of the encoder.
    ///
    /// # Panics
    ///
    /// Panics if the encoder was never populated.
    #[must_use]
    pub fn into_tree(self) -> Tree<L> {
        match self.tree {
            Some(tree) => tree,
            None => unpopulated(),
        }
    }
}

impl<L: Leaf> ShapeEncoder<L> {
    /// Consumes the tree through the flattening engine.
    ///
    /// # Errors
    ///
    /// See [`flatten`](crate::flatten).
    ///
    /// # Panics
    ///
    /// Panics if the encoder was never populated.
    pub fn flatten(self, options: &EncodingOptions) -> Result<Vec<FlattenedEntry>> {
        flatten(&self.into_tree(), options)
    }

    /// Consumes the tree through the raw-shape builder.
    ///
    /// # Errors
    ///
    /// See [`build_raw_shape`](crate::build_raw_shape).
    ///
    /// # Panics
    ///
    /// Panics if the encoder was never populated.
    pub fn raw_shape(self) -> Result<RawShape> {
        build_raw_shape(&self.into_tree())
    }
}

impl ShapeEncoder<Scalar> {
    /// Populates the encoder from any `T: Serialize`.
    ///
    /// # Errors
    ///
    /// See [`to_tree`].
    pub fn encode<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.tree = Some(to_tree(value)?);
        Ok(())
    }
}

impl<L> Default for ShapeEncoder<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: fmt::Debug> fmt::Debug for ShapeEncoder<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeEncoder")
            .field("tree", &self.tree)
            .finish()
    }
}

#[cold]
fn unpopulated() -> ! {
    panic!("ShapeEncoder used before a tree was populated; the builder must encode a value first")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Filter {
        name: String,
        values: Vec<String>,
    }

    #[derive(Serialize)]
    enum Shape {
        Unit,
        Circle(f64),
        Point(i32, i32),
        Rect { w: u32, h: u32 },
    }

    #[test]
    fn test_struct_to_map() {
        let filter = Filter {
            name: "tag".to_string(),
            values: vec!["a".to_string(), "b".to_string()],
        };
        let tree = to_tree(&filter).unwrap();
        let map = tree.as_map().unwrap();
        assert_eq!(map.get("name"), Some(&Tree::leaf("tag")));
        assert_eq!(
            map.get("values"),
            Some(&Tree::List(vec![Tree::leaf("a"), Tree::leaf("b")]))
        );
    }

    #[test]
    fn test_none_fields_are_omitted_but_list_nulls_kept() {
        let mut map: BTreeMap<&str, Option<i32>> = BTreeMap::new();
        map.insert("a", Some(1));
        map.insert("b", None);
        let tree = to_tree(&map).unwrap();
        assert_eq!(tree.as_map().map(TreeMap::len), Some(1));

        let list = to_tree(&vec![Some(1), None]).unwrap();
        assert_eq!(
            list,
            Tree::List(vec![Tree::leaf(1), Tree::Leaf(Scalar::Null)])
        );
    }

    #[test]
    fn test_enum_variants() {
        assert_eq!(to_tree(&Shape::Unit).unwrap(), Tree::leaf("Unit"));
        assert_eq!(
            to_tree(&Shape::Circle(1.5)).unwrap(),
            Tree::map([("Circle", Tree::leaf(1.5))])
        );
        assert_eq!(
            to_tree(&Shape::Point(1, 2)).unwrap(),
            Tree::map([("Point", Tree::list(vec![Tree::leaf(1), Tree::leaf(2)]))])
        );
        assert_eq!(
            to_tree(&Shape::Rect { w: 3, h: 4 }).unwrap(),
            Tree::map([(
                "Rect",
                Tree::map([("w", Tree::leaf(3u32)), ("h", Tree::leaf(4u32))])
            )])
        );
    }

    #[test]
    fn test_integer_map_keys() {
        let mut map = BTreeMap::new();
        map.insert(7u32, "seven");
        let tree = to_tree(&map).unwrap();
        assert_eq!(tree.as_map().and_then(|m| m.get("7")), Some(&Tree::leaf("seven")));
    }

    #[test]
    fn test_structured_map_keys_rejected() {
        let mut map = BTreeMap::new();
        map.insert(vec![1], "x");
        assert!(matches!(to_tree(&map), Err(Error::UnsupportedType(_))));
    }

    #[test]
    fn test_encoder_lifecycle() {
        let mut encoder: ShapeEncoder = ShapeEncoder::new();
        assert!(!encoder.is_populated());
        encoder.encode(&vec!["a"]).unwrap();
        assert!(encoder.is_populated());
        assert!(encoder.tree().is_list());
        assert!(encoder.raw_shape().unwrap().is_array());
    }

    #[test]
    #[should_panic(expected = "before a tree was populated")]
    fn test_unpopulated_encoder_panics() {
        let encoder: ShapeEncoder = ShapeEncoder::new();
        let _ = encoder.flatten(&EncodingOptions::default());
    }
}
