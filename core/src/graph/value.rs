//! Property values for graph nodes and relationships
//!
//! This module provides the typed property values stored on nodes and edges,
//! together with the property-map alias used throughout the adapter contract.

use std::collections::HashMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Type of a property value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueType {
    /// Text string
    Text,

    /// Integer (64-bit)
    Integer,

    /// Floating point (64-bit)
    Float,

    /// Boolean
    Boolean,

    /// Null value
    Null,
}

/// A property value on a node or relationship
#[derive(Clone, Serialize, Deserialize)]
pub enum Value {
    /// Text string
    Str(String),

    /// Integer (64-bit)
    Int(i64),

    /// Floating point (64-bit)
    Float(f64),

    /// Boolean
    Bool(bool),

    /// Null value
    Null,
}

/// A property map, keyed by property name
pub type Properties = HashMap<String, Value>;

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Value::Str(v) => {
                if v.len() > 24 {
                    write!(f, "Str(\"{}...\")", &v[0..24])
                } else {
                    write!(f, "Str(\"{}\")", v)
                }
            }
            Value::Int(v) => write!(f, "Int({})", v),
            Value::Float(v) => write!(f, "Float({})", v),
            Value::Bool(v) => write!(f, "Bool({})", v),
            Value::Null => write!(f, "Null"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => {
                // Special handling for NaN
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            _ => false,
        }
    }
}

impl Value {
    /// Get the type of the value
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Str(_) => ValueType::Text,
            Value::Int(_) => ValueType::Integer,
            Value::Float(_) => ValueType::Float,
            Value::Bool(_) => ValueType::Boolean,
            Value::Null => ValueType::Null,
        }
    }

    /// Get the value as a string slice, if it is text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Get the value as an integer, if it is one
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the value as a float, widening integers
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Get the value as a boolean, if it is one
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Whether the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}
