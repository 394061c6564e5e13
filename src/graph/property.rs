//! Property values for vertices and edges
//!
//! Values are a small closed set of primitive kinds; comparisons and index
//! keys dispatch on the tag.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A property value. Floats may hold NaN, which compares to nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
}

impl PropertyValue {
    pub fn as_string(&self) -> Option<&str> {
        if let PropertyValue::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let PropertyValue::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    /// Numeric value as a float; integers widen
    pub fn as_float(&self) -> Option<f64> {
        match *self {
            PropertyValue::Float(x) => Some(x),
            PropertyValue::Integer(i) => Some(i as f64),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if let PropertyValue::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, PropertyValue::Integer(_) | PropertyValue::Float(_))
    }

    /// Only a float can be NaN
    pub fn is_nan(&self) -> bool {
        matches!(self, PropertyValue::Float(x) if x.is_nan())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Integer(_) => "integer",
            PropertyValue::Float(_) => "float",
            PropertyValue::Boolean(_) => "boolean",
            PropertyValue::String(_) => "string",
        }
    }
}

/// Values print bare, so `eq("marko")` renders as `eq(marko)`
impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Integer(i) => i.fmt(f),
            PropertyValue::Float(x) => x.fmt(f),
            PropertyValue::Boolean(b) => b.fmt(f),
            PropertyValue::String(s) => f.write_str(s),
        }
    }
}

macro_rules! property_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for PropertyValue {
                fn from(value: $t) -> Self {
                    PropertyValue::$variant(value.into())
                }
            }
        )*
    };
}

property_from!(
    i64 => Integer,
    i32 => Integer,
    f64 => Float,
    f32 => Float,
    bool => Boolean,
    String => String,
    &str => String,
);

/// Single-valued property map, kept in insertion order (edge properties)
pub type PropertyMap = IndexMap<String, PropertyValue>;

/// Multi-valued property map, kept in insertion order (vertex properties)
pub type MultiPropertyMap = IndexMap<String, Vec<PropertyValue>>;
