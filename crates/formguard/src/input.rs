//! Input values and string coercion
//!
//! Checks only ever see strings. Whatever a caller hands to
//! [`Field::validate`](crate::Field::validate) or stores in a
//! [`Form`](crate::Form) is coerced first: falsy values (`null`, `false`,
//! `0`, `NaN`, the empty string) become `""`, everything else its display
//! form.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Inputs of a form, keyed by field id.
pub type Inputs = HashMap<String, InputValue>;

/// A raw input value before coercion.
///
/// Deserializes through [`serde_json::Value`], so arrays and objects land
/// as their JSON text just like [`From<serde_json::Value>`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged, from = "serde_json::Value")]
pub enum InputValue {
    /// No value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Text value.
    Text(String),
}

impl InputValue {
    /// Returns true for values that coerce to the empty string.
    #[must_use]
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Null | Self::Bool(false) | Self::Int(0) => true,
            Self::Float(n) => *n == 0.0 || n.is_nan(),
            Self::Text(s) => s.is_empty(),
            Self::Bool(true) | Self::Int(_) => false,
        }
    }

    /// Coerces the value to the string checks run against.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            other if other.is_falsy() => String::new(),
            other => other.to_string(),
        }
    }

    /// Owning form of [`to_text`](Self::to_text).
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Text(s) => s,
            other => other.to_text(),
        }
    }
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for InputValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for InputValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<bool> for InputValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! input_from_int {
    ($($ty:ty),*) => {
        $(impl From<$ty> for InputValue {
            fn from(value: $ty) -> Self {
                Self::Int(i64::from(value))
            }
        })*
    };
}

input_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for InputValue {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or(Self::Float(value as f64), Self::Int)
    }
}

impl From<usize> for InputValue {
    fn from(value: usize) -> Self {
        i64::try_from(value).map_or(Self::Float(value as f64), Self::Int)
    }
}

impl From<f32> for InputValue {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for InputValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: Into<InputValue>> From<Option<T>> for InputValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<serde_json::Value> for InputValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float))
                .unwrap_or_else(|| Self::Text(n.to_string())),
            Value::String(s) => Self::Text(s),
            composite @ (Value::Array(_) | Value::Object(_)) => Self::Text(composite.to_string()),
        }
    }
}
