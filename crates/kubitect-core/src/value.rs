//! Closed value model the comparator operates on.
//!
//! Configuration types are lowered into a [`Value`] tree through the
//! [`ToValue`] trait (usually derived with [`impl_to_value!`](crate::impl_to_value)).
//! Struct fields keep their declaration order and raw tag strings so the
//! comparator can resolve display names and identity fields without any
//! runtime type inspection.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

use crate::cmp::options::SKIP_MARKER;

/// Tag naming a field in serialized output
const DISPLAY_TAG: &str = "yaml";

/// A dynamically shaped configuration value.
///
/// `Null` doubles as the "absent" side of a comparison: a missing optional
/// field, an empty pointer and a zero-valued struct field all lower to it.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Struct(StructValue),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

/// Kind tag of a [`Value`], used for dispatch and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Null,
    Bool,
    Int,
    UInt,
    Float,
    String,
    Struct,
    List,
    Map,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::UInt => "uint",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Struct => "struct",
            Kind::List => "list",
            Kind::Map => "map",
        };
        f.write_str(s)
    }
}

/// A struct instance: type name plus ordered, tagged fields.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
    pub type_name: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Schema (struct) field name
    pub name: String,
    /// Raw tag strings keyed by tag name, e.g. `yaml -> "mainDiskSize"`
    pub tags: BTreeMap<String, String>,
    pub value: Value,
}

impl Field {
    pub fn tag(&self, tag: &str) -> Option<&str> {
        self.tags.get(tag).map(String::as_str)
    }

    /// Name under which the field is serialized: the `yaml` tag name when
    /// one is set, the schema name otherwise.
    pub fn display_name(&self) -> &str {
        let tagged = self
            .tag(DISPLAY_TAG)
            .and_then(|raw| raw.split(',').next())
            .map(str::trim)
            .filter(|name| !name.is_empty() && *name != SKIP_MARKER);
        tagged.unwrap_or(self.name.as_str())
    }
}

impl StructValue {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Append an untagged field
    pub fn field(self, name: impl Into<String>, value: impl ToValue) -> Self {
        self.tagged_field(name, &[], value)
    }

    /// Append a field carrying `(tag, raw value)` pairs
    pub fn tagged_field(
        mut self,
        name: impl Into<String>,
        tags: &[(&str, &str)],
        value: impl ToValue,
    ) -> Self {
        self.fields.push(Field {
            name: name.into(),
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            value: value.to_value(),
        });
        self
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::UInt(_) => Kind::UInt,
            Value::Float(_) => Kind::Float,
            Value::String(_) => Kind::String,
            Value::Struct(_) => Kind::Struct,
            Value::List(_) => Kind::List,
            Value::Map(_) => Kind::Map,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Bool(_) | Value::Int(_) | Value::UInt(_) | Value::Float(_) | Value::String(_)
        )
    }

    /// Zero-valued counterpart of this value.
    ///
    /// Structs keep their shape with every field set to `Null`, so diffing
    /// an unmatched element against its zero value classifies each leaf
    /// individually. Every other kind collapses to `Null`.
    pub fn zero_of(&self) -> Value {
        match self {
            Value::Struct(s) => Value::Struct(StructValue {
                type_name: s.type_name.clone(),
                fields: s
                    .fields
                    .iter()
                    .map(|f| Field {
                        name: f.name.clone(),
                        tags: f.tags.clone(),
                        value: Value::Null,
                    })
                    .collect(),
            }),
            _ => Value::Null,
        }
    }

    /// Scalar rendered as a bare key (no quotes), used for identity keys
    pub fn as_key(&self) -> Option<String> {
        match self {
            Value::Bool(b) => Some(b.to_string()),
            Value::Int(i) => Some(i.to_string()),
            Value::UInt(u) => Some(u.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            // NaN equals itself so compare(a, a) stays empty
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Struct(a), Value::Struct(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("<nil>"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::UInt(u) => write!(f, "{}", u),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "\"{}\"", s),
            composite => match serde_json::to_string(composite) {
                Ok(json) => f.write_str(&json),
                Err(_) => write!(f, "{:?}", composite),
            },
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::UInt(u) => serializer.serialize_u64(*u),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::String(s) => serializer.serialize_str(s),
            Value::Struct(s) => {
                let mut map = serializer.serialize_map(Some(s.fields.len()))?;
                for field in &s.fields {
                    map.serialize_entry(field.display_name(), &field.value)?;
                }
                map.end()
            }
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

/// Lowering into the closed value model.
pub trait ToValue {
    fn to_value(&self) -> Value;
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

macro_rules! signed_to_value {
    ($($t:ty),*) => {
        $(impl ToValue for $t {
            fn to_value(&self) -> Value {
                Value::Int(i64::from(*self))
            }
        })*
    };
}

macro_rules! unsigned_to_value {
    ($($t:ty),*) => {
        $(impl ToValue for $t {
            fn to_value(&self) -> Value {
                Value::UInt(u64::from(*self))
            }
        })*
    };
}

signed_to_value!(i8, i16, i32, i64);
unsigned_to_value!(u8, u16, u32, u64);

impl ToValue for usize {
    fn to_value(&self) -> Value {
        Value::UInt(*self as u64)
    }
}

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue> ToValue for BTreeMap<String, T> {
    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }
}

impl<T: ToValue, S> ToValue for HashMap<String, T, S> {
    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }
}

impl ToValue for serde_yaml::Value {
    fn to_value(&self) -> Value {
        use serde_yaml::Value as Yaml;
        match self {
            Yaml::Null => Value::Null,
            Yaml::Bool(b) => Value::Bool(*b),
            Yaml::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Yaml::String(s) => Value::String(s.clone()),
            Yaml::Sequence(items) => Value::List(items.iter().map(ToValue::to_value).collect()),
            Yaml::Mapping(entries) => Value::Map(
                entries
                    .iter()
                    .map(|(k, v)| (yaml_key(k), v.to_value()))
                    .collect(),
            ),
            Yaml::Tagged(tagged) => tagged.value.to_value(),
        }
    }
}

fn yaml_key(key: &serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Implement [`ToValue`] for a struct, listing its fields in declaration
/// order together with their tags.
///
/// ```
/// use kubitect_core::impl_to_value;
/// use kubitect_core::value::{ToValue, Value};
///
/// struct Disk {
///     name: String,
///     size: u32,
/// }
///
/// impl_to_value!(Disk {
///     name => { yaml = "name", opt = ",id" },
///     size => { yaml = "size" },
/// });
///
/// let v = Disk { name: "data".into(), size: 8 }.to_value();
/// assert!(matches!(v, Value::Struct(_)));
/// ```
#[macro_export]
macro_rules! impl_to_value {
    ($ty:ident { $($field:ident => { $($tag:ident = $raw:literal),* $(,)? }),* $(,)? }) => {
        impl $crate::value::ToValue for $ty {
            fn to_value(&self) -> $crate::value::Value {
                $crate::value::Value::Struct(
                    $crate::value::StructValue::new(stringify!($ty))
                        $(.tagged_field(
                            stringify!($field),
                            &[$((stringify!($tag), $raw)),*],
                            &self.$field,
                        ))*
                )
            }
        }
    };
}
