//! In-memory tag tree.
//!
//! A [`Tag`] is a [`Value`] plus the optional name its container gave it.
//! Containers own their children outright: [`Compound`] holds named
//! entries in insertion order, [`List`] holds unnamed items of one declared
//! element type. Nothing here validates shape; the encoder rejects trees the
//! wire format cannot express.

use std::fmt;

use crate::tag_type::TagType;

/// Payload of a tag, one variant per wire type (except End, which is never a
/// value).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(List),
    Compound(Compound),
    IntArray(Vec<i32>),
}

impl Value {
    /// The zero value for `ty`. `None` for [`TagType::End`].
    pub fn default_for(ty: TagType) -> Option<Value> {
        Some(match ty {
            TagType::End => return None,
            TagType::Byte => Value::Byte(0),
            TagType::Short => Value::Short(0),
            TagType::Int => Value::Int(0),
            TagType::Long => Value::Long(0),
            TagType::Float => Value::Float(0.0),
            TagType::Double => Value::Double(0.0),
            TagType::ByteArray => Value::ByteArray(Vec::new()),
            TagType::String => Value::String(String::new()),
            TagType::List => Value::List(List::default()),
            TagType::Compound => Value::Compound(Compound::new()),
            TagType::IntArray => Value::IntArray(Vec::new()),
        })
    }

    pub fn tag_type(&self) -> TagType {
        match self {
            Value::Byte(_) => TagType::Byte,
            Value::Short(_) => TagType::Short,
            Value::Int(_) => TagType::Int,
            Value::Long(_) => TagType::Long,
            Value::Float(_) => TagType::Float,
            Value::Double(_) => TagType::Double,
            Value::ByteArray(_) => TagType::ByteArray,
            Value::String(_) => TagType::String,
            Value::List(_) => TagType::List,
            Value::Compound(_) => TagType::Compound,
            Value::IntArray(_) => TagType::IntArray,
        }
    }

    pub fn as_byte(&self) -> Option<i8> {
        match self {
            Value::Byte(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_short(&self) -> Option<i16> {
        match self {
            Value::Short(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_byte_array(&self) -> Option<&[i8]> {
        match self {
            Value::ByteArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut List> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Value::Compound(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_compound_mut(&mut self) -> Option<&mut Compound> {
        match self {
            Value::Compound(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int_array(&self) -> Option<&[i32]> {
        match self {
            Value::IntArray(v) => Some(v),
            _ => None,
        }
    }
}

macro_rules! impl_from_for_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_for_value! {
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    Vec<i8> => ByteArray,
    String => String,
    List => List,
    Compound => Compound,
    Vec<i32> => IntArray,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

/// One node of the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    name: Option<String>,
    value: Value,
}

impl Tag {
    /// An unnamed tag, as found inside a list.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            name: None,
            value: value.into(),
        }
    }

    /// A named tag, as found inside a compound or at the document root.
    pub fn named(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: Some(name.into()),
            value: value.into(),
        }
    }

    /// A tag of type `ty` holding that type's zero value.
    ///
    /// Returns `None` for [`TagType::End`], which has no value.
    pub fn empty(ty: TagType, name: Option<String>) -> Option<Self> {
        Value::default_for(ty).map(|value| Self { name, value })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn take_name(&mut self) -> Option<String> {
        self.name.take()
    }

    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }

    pub fn tag_type(&self) -> TagType {
        self.value.tag_type()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    pub fn set_value(&mut self, value: impl Into<Value>) {
        self.value = value.into();
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn into_parts(self) -> (Option<String>, Value) {
        (self.name, self.value)
    }

    /// Looks up a direct child by name when this tag is a compound.
    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.value.as_compound()?.get(name)
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        write!(f, "{:?}", self.tag_type())?;
        if let Value::List(list) = &self.value {
            if let Some(ty) = list.element_type {
                write!(f, "<{ty:?}>")?;
            }
        }
        if let Some(name) = &self.name {
            write!(f, "('{name}')")?;
        }
        match &self.value {
            Value::Byte(v) => write!(f, ": {v}"),
            Value::Short(v) => write!(f, ": {v}"),
            Value::Int(v) => write!(f, ": {v}"),
            Value::Long(v) => write!(f, ": {v}"),
            Value::Float(v) => write!(f, ": {v:?}"),
            Value::Double(v) => write!(f, ": {v:?}"),
            Value::ByteArray(v) => write!(f, ": {v:?}"),
            Value::String(v) => write!(f, ": {v:?}"),
            Value::IntArray(v) => write!(f, ": {v:?}"),
            Value::List(list) => write_children(f, list.iter(), indent),
            Value::Compound(compound) => write_children(f, compound.iter(), indent),
        }
    }
}

fn write_children<'t>(
    f: &mut fmt::Formatter<'_>,
    children: impl Iterator<Item = &'t Tag>,
    indent: usize,
) -> fmt::Result {
    const STEP: usize = 2;
    f.write_str(" {\n")?;
    for child in children {
        write!(f, "{:width$}", "", width = indent + STEP)?;
        child.write_tree(f, indent + STEP)?;
        f.write_str("\n")?;
    }
    write!(f, "{:width$}}}", "", width = indent)
}

/// Indented tree dump: `Type('name'): value`, containers nest their children
/// two spaces deeper.
impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}

/// Named children in insertion order.
///
/// Unique names are a convention, not a format rule: [`push`](Compound::push)
/// appends unconditionally, [`insert`](Compound::insert) replaces an existing
/// entry of the same name in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Compound {
    pub entries: Vec<Tag>,
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Tag> {
        self.entries.iter_mut()
    }

    /// First entry called `name`.
    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.entries.iter().find(|t| t.name() == Some(name))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Tag> {
        self.entries.iter_mut().find(|t| t.name() == Some(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Appends `tag`, keeping any existing entry of the same name.
    pub fn push(&mut self, tag: Tag) {
        self.entries.push(tag);
    }

    /// Inserts `tag`, replacing the first entry with the same name.
    ///
    /// The replaced entry keeps its position and is returned.
    pub fn insert(&mut self, tag: Tag) -> Option<Tag> {
        if let Some(name) = tag.name() {
            if let Some(slot) = self.entries.iter_mut().find(|t| t.name() == Some(name)) {
                return Some(std::mem::replace(slot, tag));
            }
        }
        self.entries.push(tag);
        None
    }

    /// Removes and returns the first entry called `name`.
    pub fn remove(&mut self, name: &str) -> Option<Tag> {
        let idx = self.entries.iter().position(|t| t.name() == Some(name))?;
        Some(self.entries.remove(idx))
    }
}

impl FromIterator<Tag> for Compound {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Compound {
    type Item = Tag;
    type IntoIter = std::vec::IntoIter<Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Compound {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Unnamed items sharing one element type.
///
/// `element_type` is what goes on the wire. It is `None` only for a list
/// built without one and left empty, which the encoder cannot write. A
/// decoded list always has it set, even when empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct List {
    pub element_type: Option<TagType>,
    pub items: Vec<Tag>,
}

impl List {
    /// An empty list declared to hold `element_type`.
    pub fn new(element_type: TagType) -> Self {
        Self {
            element_type: Some(element_type),
            items: Vec::new(),
        }
    }

    pub fn with_items(element_type: TagType, items: Vec<Tag>) -> Self {
        Self {
            element_type: Some(element_type),
            items,
        }
    }

    /// A list whose element type is taken from the first item.
    pub fn from_items(items: Vec<Tag>) -> Self {
        Self {
            element_type: items.first().map(Tag::tag_type),
            items,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.items.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Tag> {
        self.items.get(index)
    }

    /// Appends an item, adopting its type if none was declared yet.
    pub fn push(&mut self, tag: Tag) {
        self.element_type.get_or_insert(tag.tag_type());
        self.items.push(tag);
    }

    /// `true` when every item matches the declared element type.
    pub fn is_homogeneous(&self) -> bool {
        match self.element_type {
            Some(ty) => self.items.iter().all(|t| t.tag_type() == ty),
            None => self.items.is_empty(),
        }
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tag_per_type() {
        assert!(Tag::empty(TagType::End, None).is_none());
        let tag = Tag::empty(TagType::IntArray, Some("ids".into())).unwrap();
        assert_eq!(tag.name(), Some("ids"));
        assert_eq!(tag.value(), &Value::IntArray(vec![]));
        for ty in &TagType::ALL[1..] {
            assert_eq!(Tag::empty(*ty, None).unwrap().tag_type(), *ty);
        }
    }

    #[test]
    fn name_is_container_metadata() {
        let mut tag = Tag::named("x", 5i32);
        assert!(tag.is_named());
        assert_eq!(tag.take_name(), Some("x".to_owned()));
        assert!(!tag.is_named());
        tag.set_name(Some("y".into()));
        assert_eq!(tag.name(), Some("y"));
        assert_eq!(tag.value().as_int(), Some(5));
    }

    #[test]
    fn typed_accessors_match_variant_only() {
        let v = Value::from("hi");
        assert_eq!(v.as_str(), Some("hi"));
        assert_eq!(v.as_int(), None);
        assert_eq!(Value::from(vec![1i8, 2]).as_byte_array(), Some(&[1i8, 2][..]));
        assert_eq!(Value::from(1.5f64).as_double(), Some(1.5));
        assert_eq!(Value::from(1.5f32).as_double(), None);
    }

    #[test]
    fn compound_insert_replaces_in_place() {
        let mut c = Compound::new();
        c.insert(Tag::named("a", 1i8));
        c.insert(Tag::named("b", 2i8));
        let old = c.insert(Tag::named("a", 3i8));
        assert_eq!(old, Some(Tag::named("a", 1i8)));
        let names: Vec<_> = c.iter().filter_map(Tag::name).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(c.get("a").and_then(|t| t.value().as_byte()), Some(3));

        c.push(Tag::named("b", 4i8));
        assert_eq!(c.len(), 3);
        assert_eq!(c.remove("b"), Some(Tag::named("b", 2i8)));
        assert!(c.contains("b"));
    }

    #[test]
    fn list_element_type_is_explicit() {
        let empty = List::new(TagType::Compound);
        assert_eq!(empty.element_type, Some(TagType::Compound));
        assert!(empty.is_homogeneous());

        let inferred = List::from_items(vec![Tag::new(1i32), Tag::new(2i32)]);
        assert_eq!(inferred.element_type, Some(TagType::Int));
        assert!(inferred.is_homogeneous());

        assert_eq!(List::from_items(vec![]).element_type, None);

        let mut mixed = List::default();
        mixed.push(Tag::new(1i32));
        mixed.push(Tag::new("x"));
        assert_eq!(mixed.element_type, Some(TagType::Int));
        assert!(!mixed.is_homogeneous());
    }

    #[test]
    fn tree_dump_indents_children() {
        let mut inner = Compound::new();
        inner.push(Tag::named("s", "hi"));
        let mut root = Compound::new();
        root.push(Tag::named("b", 1i8));
        root.push(Tag::named(
            "l",
            List::with_items(TagType::Compound, vec![Tag::new(inner)]),
        ));
        let doc = Tag::named("root", root);

        let expected = "Compound('root') {\n  Byte('b'): 1\n  List<Compound>('l') {\n    Compound {\n      String('s'): \"hi\"\n    }\n  }\n}";
        assert_eq!(doc.to_string(), expected);
    }

    #[test]
    fn get_walks_compound_children() {
        let root = Tag::named("", Compound::from_iter([Tag::named("n", 7i64)]));
        assert_eq!(root.get("n").and_then(|t| t.value().as_long()), Some(7));
        assert!(root.get("missing").is_none());
        assert!(Tag::new(1i8).get("n").is_none());
    }
}
