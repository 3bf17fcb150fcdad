use thiserror::Error;

use crate::codec::CodecKind;
use crate::types::LogicalType;

/// Result alias used throughout the key encoder.
pub type Result<T> = std::result::Result<T, KeyError>;

/// Failures raised while building, encoding or decoding key parts.
///
/// An unsupported type is a schema/configuration problem; the other two
/// variants report bad data.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum KeyError {
    /// No codec factory is registered for the column type.
    #[error("type {ty} is not supported by the key encoder")]
    UnsupportedType {
        /// The offending column type.
        ty: LogicalType,
    },
    /// A raw value could not be converted to the native form its codec expects.
    #[error("cannot adapt {ty} value: {reason}")]
    AdaptationFailure {
        /// Declared type of the malformed value.
        ty: LogicalType,
        /// What was wrong with the value.
        reason: String,
    },
    /// A codec could not serialize a native value or deserialize key bytes.
    #[error("{codec} codec failure: {reason}")]
    CodecFailure {
        /// The codec that rejected the input.
        codec: CodecKind,
        /// What was wrong with the input.
        reason: String,
    },
}

/// Discriminant of a [`KeyError`], for callers that branch on the category.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum KeyErrorKind {
    /// See [`KeyError::UnsupportedType`].
    UnsupportedType,
    /// See [`KeyError::AdaptationFailure`].
    Adaptation,
    /// See [`KeyError::CodecFailure`].
    Codec,
}

impl KeyError {
    pub(crate) fn adaptation(ty: LogicalType, reason: impl Into<String>) -> Self {
        KeyError::AdaptationFailure {
            ty,
            reason: reason.into(),
        }
    }

    pub(crate) fn codec(codec: CodecKind, reason: impl Into<String>) -> Self {
        KeyError::CodecFailure {
            codec,
            reason: reason.into(),
        }
    }

    /// Returns the category of this error.
    pub fn kind(&self) -> KeyErrorKind {
        match self {
            KeyError::UnsupportedType { .. } => KeyErrorKind::UnsupportedType,
            KeyError::AdaptationFailure { .. } => KeyErrorKind::Adaptation,
            KeyError::CodecFailure { .. } => KeyErrorKind::Codec,
        }
    }

    /// Returns `true` for schema/configuration errors as opposed to bad data.
    pub fn is_schema_error(&self) -> bool {
        self.kind() == KeyErrorKind::UnsupportedType
    }
}
