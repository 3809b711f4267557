//! Dynamically-typed scalar values carried by broadcast payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SkipReason;

/// A single payload value.
///
/// Broadcast extras only ever carry these four shapes once the transport has
/// unpacked them. Serializes untagged, so a `Scalar::Int(5)` is the JSON `5`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

/// Kind of a [`Scalar`], used for coercion targets and diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Int,
    Float,
    Bool,
    Str,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarKind::Int => "integer",
            ScalarKind::Float => "float",
            ScalarKind::Bool => "boolean",
            ScalarKind::Str => "string",
        };
        f.write_str(name)
    }
}

impl Scalar {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Int(_) => ScalarKind::Int,
            Scalar::Float(_) => ScalarKind::Float,
            Scalar::Bool(_) => ScalarKind::Bool,
            Scalar::Str(_) => ScalarKind::Str,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Float(v) => Some(*v),
            Scalar::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Whether the value can be represented on the canonical stream at all.
    ///
    /// NaN and infinities have no JSON form and are rejected.
    pub fn is_representable(&self) -> bool {
        !matches!(self, Scalar::Float(v) if !v.is_finite())
    }

    /// Coerce this value to `target`, converting between compatible shapes.
    ///
    /// - integers accept integral floats and numeric strings
    /// - floats accept integers and numeric strings
    /// - booleans accept `0`/`1` and `"true"`/`"false"`
    /// - strings accept anything, rendered as text
    pub fn coerce(&self, target: ScalarKind) -> Result<Scalar, SkipReason> {
        if !self.is_representable() {
            return Err(SkipReason::NonFinite);
        }

        let mismatch = || SkipReason::Mismatch {
            expected: target,
            found: self.kind(),
        };

        match (target, self) {
            (ScalarKind::Int, Scalar::Int(v)) => Ok(Scalar::Int(*v)),
            (ScalarKind::Int, Scalar::Float(v)) => {
                if v.fract() == 0.0 && *v >= i64::MIN as f64 && *v < i64::MAX as f64 {
                    Ok(Scalar::Int(*v as i64))
                } else {
                    Err(mismatch())
                }
            }
            (ScalarKind::Int, Scalar::Str(s)) => {
                s.trim().parse::<i64>().map(Scalar::Int).map_err(|_| mismatch())
            }

            (ScalarKind::Float, Scalar::Float(v)) => Ok(Scalar::Float(*v)),
            (ScalarKind::Float, Scalar::Int(v)) => Ok(Scalar::Float(*v as f64)),
            (ScalarKind::Float, Scalar::Str(s)) => match s.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(Scalar::Float(v)),
                _ => Err(mismatch()),
            },

            (ScalarKind::Bool, Scalar::Bool(v)) => Ok(Scalar::Bool(*v)),
            (ScalarKind::Bool, Scalar::Int(0)) => Ok(Scalar::Bool(false)),
            (ScalarKind::Bool, Scalar::Int(1)) => Ok(Scalar::Bool(true)),
            (ScalarKind::Bool, Scalar::Str(s)) => match s.trim() {
                v if v.eq_ignore_ascii_case("true") || v == "1" => Ok(Scalar::Bool(true)),
                v if v.eq_ignore_ascii_case("false") || v == "0" => Ok(Scalar::Bool(false)),
                _ => Err(mismatch()),
            },

            (ScalarKind::Str, Scalar::Str(s)) => Ok(Scalar::Str(s.clone())),
            (ScalarKind::Str, other) => Ok(Scalar::Str(other.to_string())),

            _ => Err(mismatch()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Bool(v) => write!(f, "{}", v),
            Scalar::Str(v) => f.write_str(v),
        }
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(i64::from(value))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<f32> for Scalar {
    fn from(value: f32) -> Self {
        Scalar::Float(f64::from(value))
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Str(value)
    }
}

impl From<&Scalar> for serde_json::Value {
    fn from(value: &Scalar) -> Self {
        match value {
            Scalar::Int(v) => serde_json::Value::from(*v),
            // Non-finite floats map to null
            Scalar::Float(v) => serde_json::Value::from(*v),
            Scalar::Bool(v) => serde_json::Value::Bool(*v),
            Scalar::Str(v) => serde_json::Value::String(v.clone()),
        }
    }
}
