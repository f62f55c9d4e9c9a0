//! Static description of a model's fields.
//!
//! Every type that can appear in a model implements [`Queryable`], reporting either a scalar
//! [`TypeTag`] or a [`Record`] listing its fields. `#[derive(Queryable)]` writes the record case for
//! user structs; the impls below cover std, chrono and uuid types.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

pub trait Queryable {
    fn shape() -> Shape;
}

#[derive(Debug, Clone)]
pub enum Shape {
    Scalar(TypeTag),
    Record(Record),
}

impl Shape {
    pub fn type_name(&self) -> String {
        match self {
            Shape::Scalar(tag) => tag.to_string(),
            Shape::Record(record) => record.name().to_owned(),
        }
    }
}

/// A record type. Fields are produced lazily so self-referencing types can be described.
#[derive(Debug, Clone, Copy)]
pub struct Record {
    name: &'static str,
    fields: fn() -> Vec<FieldDescriptor>,
}

impl Record {
    pub fn new(name: &'static str, fields: fn() -> Vec<FieldDescriptor>) -> Self { Self { name, fields } }

    pub fn name(&self) -> &'static str { self.name }

    pub fn fields(&self) -> Vec<FieldDescriptor> { (self.fields)() }
}

/// One declared field: its name as written in the model, its shape, its tags, and whether it is
/// embedded (its sub-fields are promoted without a prefix).
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub shape: Shape,
    pub tags: Vec<(String, String)>,
    pub embedded: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self { Self { name: name.into(), shape, tags: Vec::new(), embedded: false } }

    pub fn of<T: Queryable>(name: impl Into<String>) -> Self { Self::new(name, T::shape()) }

    pub fn tag(mut self, key: impl Into<String>, options: impl Into<String>) -> Self {
        self.tags.push((key.into(), options.into()));
        self
    }

    pub fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }

    /// Options of the tag named `key`, if the field carries it.
    pub fn lookup(&self, key: &str) -> Option<&str> { self.tags.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str()) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
    Size,
}

impl IntWidth {
    pub fn signed_bounds(self) -> (i128, i128) {
        match self {
            IntWidth::W8 => (i8::MIN as i128, i8::MAX as i128),
            IntWidth::W16 => (i16::MIN as i128, i16::MAX as i128),
            IntWidth::W32 => (i32::MIN as i128, i32::MAX as i128),
            IntWidth::W64 => (i64::MIN as i128, i64::MAX as i128),
            IntWidth::Size => (isize::MIN as i128, isize::MAX as i128),
        }
    }

    pub fn unsigned_max(self) -> i128 {
        match self {
            IntWidth::W8 => u8::MAX as i128,
            IntWidth::W16 => u16::MAX as i128,
            IntWidth::W32 => u32::MAX as i128,
            IntWidth::W64 => u64::MAX as i128,
            IntWidth::Size => usize::MAX as i128,
        }
    }

    fn bits(self) -> &'static str {
        match self {
            IntWidth::W8 => "8",
            IntWidth::W16 => "16",
            IntWidth::W32 => "32",
            IntWidth::W64 => "64",
            IntWidth::Size => "size",
        }
    }
}

/// The type of a field as far as filtering is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Bool,
    String,
    Int(IntWidth),
    UInt(IntWidth),
    Float,
    Time,
    Uuid,
    Nullable(Box<TypeTag>),
    List(Box<TypeTag>),
    Map,
    Other(String),
}

impl TypeTag {
    /// The tag with any nullable wrappers removed.
    pub fn base(&self) -> &TypeTag {
        match self {
            TypeTag::Nullable(inner) => inner.base(),
            tag => tag,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Bool => f.write_str("bool"),
            TypeTag::String => f.write_str("string"),
            TypeTag::Int(width) => write!(f, "int{}", width.bits()),
            TypeTag::UInt(width) => write!(f, "uint{}", width.bits()),
            TypeTag::Float => f.write_str("float"),
            TypeTag::Time => f.write_str("time"),
            TypeTag::Uuid => f.write_str("uuid"),
            TypeTag::Nullable(inner) => write!(f, "nullable<{inner}>"),
            TypeTag::List(inner) => write!(f, "list<{inner}>"),
            TypeTag::Map => f.write_str("map"),
            TypeTag::Other(name) => f.write_str(name),
        }
    }
}

macro_rules! impl_scalar {
    ($($ty:ty => $tag:expr),* $(,)?) => {
        $(
            impl Queryable for $ty {
                fn shape() -> Shape { Shape::Scalar($tag) }
            }
        )*
    };
}

impl_scalar! {
    bool => TypeTag::Bool,
    String => TypeTag::String,
    char => TypeTag::String,
    i8 => TypeTag::Int(IntWidth::W8),
    i16 => TypeTag::Int(IntWidth::W16),
    i32 => TypeTag::Int(IntWidth::W32),
    i64 => TypeTag::Int(IntWidth::W64),
    isize => TypeTag::Int(IntWidth::Size),
    u8 => TypeTag::UInt(IntWidth::W8),
    u16 => TypeTag::UInt(IntWidth::W16),
    u32 => TypeTag::UInt(IntWidth::W32),
    u64 => TypeTag::UInt(IntWidth::W64),
    usize => TypeTag::UInt(IntWidth::Size),
    f32 => TypeTag::Float,
    f64 => TypeTag::Float,
    chrono::NaiveDateTime => TypeTag::Time,
    chrono::NaiveDate => TypeTag::Time,
    uuid::Uuid => TypeTag::Uuid,
    serde_json::Value => TypeTag::Other("json".to_owned()),
}

impl<Tz: chrono::TimeZone> Queryable for chrono::DateTime<Tz> {
    fn shape() -> Shape { Shape::Scalar(TypeTag::Time) }
}

impl<T: Queryable> Queryable for Option<T> {
    fn shape() -> Shape {
        match T::shape() {
            Shape::Scalar(tag) => Shape::Scalar(TypeTag::Nullable(Box::new(tag))),
            record => record,
        }
    }
}

impl<T: Queryable> Queryable for Box<T> {
    fn shape() -> Shape { T::shape() }
}

impl<T: Queryable> Queryable for Vec<T> {
    fn shape() -> Shape {
        let element = match T::shape() {
            Shape::Scalar(tag) => tag,
            Shape::Record(record) => TypeTag::Other(record.name().to_owned()),
        };
        Shape::Scalar(TypeTag::List(Box::new(element)))
    }
}

impl<K, V, S> Queryable for HashMap<K, V, S> {
    fn shape() -> Shape { Shape::Scalar(TypeTag::Map) }
}

impl<K, V> Queryable for BTreeMap<K, V> {
    fn shape() -> Shape { Shape::Scalar(TypeTag::Map) }
}
