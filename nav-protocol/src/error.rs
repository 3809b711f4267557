//! Error types for protocol normalization

use thiserror::Error;

use crate::scalar::{Scalar, ScalarKind};

/// Why a single field was left out of a canonical event.
///
/// These never abort normalization; they are collected into
/// [`crate::CanonicalEvent::diagnostics`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipReason {
    #[error("value absent")]
    Absent,

    #[error("empty field name")]
    EmptyName,

    #[error("non-finite float")]
    NonFinite,

    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: ScalarKind,
        found: ScalarKind,
    },

    #[error("{value} outside {min}..={max}")]
    OutOfRange { value: f64, min: f64, max: f64 },

    /// Another key already produced this canonical field
    #[error("duplicate of canonical field {canonical}")]
    Duplicate { canonical: String },
}

/// Payload-level failures raised by an adapter.
///
/// Navigation and location adapters fold these into a failure-flagged event;
/// the standard broadcast adapter returns them to its caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdapterError {
    /// The payload carries more extras than the bridge accepts per event
    #[error("payload has {count} fields, limit is {limit}")]
    TooManyFields { count: usize, limit: usize },

    /// The standard broadcast message kind could not be read
    #[error("KEY_TYPE must be an integer, found {found:?}")]
    InvalidDiscriminator { found: Scalar },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::Absent.to_string(), "value absent");
        assert_eq!(SkipReason::EmptyName.to_string(), "empty field name");
        assert_eq!(SkipReason::NonFinite.to_string(), "non-finite float");
        assert_eq!(
            SkipReason::Mismatch {
                expected: ScalarKind::Int,
                found: ScalarKind::Str,
            }
            .to_string(),
            "expected integer, found string"
        );
        assert_eq!(
            SkipReason::OutOfRange {
                value: 91.0,
                min: -90.0,
                max: 90.0,
            }
            .to_string(),
            "91 outside -90..=90"
        );
        assert_eq!(
            SkipReason::Duplicate {
                canonical: "keyType".into(),
            }
            .to_string(),
            "duplicate of canonical field keyType"
        );
    }

    #[test]
    fn test_adapter_error_display() {
        let error = AdapterError::TooManyFields {
            count: 300,
            limit: 256,
        };
        assert_eq!(error.to_string(), "payload has 300 fields, limit is 256");

        let error = AdapterError::InvalidDiscriminator {
            found: Scalar::Str("nav".into()),
        };
        assert!(error.to_string().contains("KEY_TYPE"));
        assert!(error.to_string().contains("nav"));
    }
}
