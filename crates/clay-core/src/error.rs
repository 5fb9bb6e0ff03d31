//! Error types for Clay dispatch
//!
//! Unclaimed operations are not errors: the descriptor's fallback decides the
//! result, and only when that fallback fails (for example with
//! [`ClayError::MissingMember`]) does an error reach the caller.

use crate::operation::Conversion;

/// Main Clay error type
#[derive(Debug, thiserror::Error)]
pub enum ClayError {
    /// No behavior claimed a member operation and the default fallback ran
    #[error("missing member: {name}")]
    MissingMember {
        /// Member that was requested
        name: String,
    },

    /// Indexer read of a key that is not stored
    #[error("key not found: {0}")]
    MissingKey(String),

    /// Bulk property access on an object without a property store
    #[error("no property store installed in the behavior chain")]
    NoPropertyStore,

    /// No behavior performed the conversion and the default has none
    #[error("cannot convert to {target}")]
    NotConvertible {
        /// Requested conversion target
        target: Conversion,
    },

    /// No behavior implements the operator
    #[error("unsupported operator: {operator}")]
    UnsupportedOperator {
        /// Operator symbol
        operator: String,
    },

    /// A behavior failed while attempting an operation it would claim
    #[error("behavior '{behavior}' failed: {message}")]
    Behavior {
        /// Name of the failing behavior
        behavior: String,
        /// Failure description
        message: String,
    },

    /// Arguments do not fit the operation
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration could not be parsed
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClayError {
    /// Create missing member error
    #[inline]
    #[must_use]
    pub fn missing_member(name: impl Into<String>) -> Self {
        Self::MissingMember { name: name.into() }
    }

    /// Create behavior failure
    #[inline]
    #[must_use]
    pub fn behavior(behavior: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Behavior {
            behavior: behavior.into(),
            message: message.into(),
        }
    }

    /// Check if error is the default missing-member fallback
    #[inline]
    #[must_use]
    pub fn is_missing_member(&self) -> bool {
        matches!(self, Self::MissingMember { .. })
    }

    /// Check if error points at a misconfigured object or factory
    ///
    /// These are not recoverable by retrying the operation.
    #[inline]
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::NoPropertyStore | Self::Config(_))
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ClayError>;
