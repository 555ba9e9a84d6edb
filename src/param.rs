//! Parameter value storage types.

use core::fmt;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A parameter assignment: parameter name to value, sorted by name.
pub type ParameterValues = BTreeMap<String, ParamValue>;

/// Represents one assigned parameter value.
///
/// On the wire this is a bare JSON number or string. Integers are read back
/// as [`Int`](ParamValue::Int), other numbers as [`Float`](ParamValue::Float).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// An integer parameter value.
    Int(i64),
    /// A floating-point parameter value.
    Float(f64),
    /// A categorical or discrete parameter value, stored as its label.
    Categorical(String),
}

impl ParamValue {
    /// Returns the value as `f64` if it is numeric.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(v) => Some(*v as f64),
            ParamValue::Float(v) => Some(*v),
            ParamValue::Categorical(_) => None,
        }
    }

    /// Returns the label of a categorical value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Categorical(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Float(v) => write!(f, "{v}"),
            ParamValue::Categorical(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Categorical(v.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Categorical(v)
    }
}
