//! # Domain Errors
//!
//! Error taxonomy of the name registry query subsystem, with the JSON-RPC
//! codes the errors carry when surfaced to a client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::encoding::{EncodingError, NameEncoding};
use crate::ports::outbound::{IndexError, LookupError};

/// JSON-RPC error codes for name registry failures.
pub mod codes {
    pub const MISC_ERROR: i32 = -1;
    pub const TYPE_ERROR: i32 = -3;
    pub const WALLET_ERROR: i32 = -4;
    pub const INVALID_ADDRESS_OR_KEY: i32 = -5;
    pub const INVALID_PARAMETER: i32 = -8;
    pub const CLIENT_IN_INITIAL_DOWNLOAD: i32 = -10;
    pub const DATABASE_ERROR: i32 = -20;
    pub const NAME_INVALID_ENCODING: i32 = -1010;
}

/// All errors that can occur while querying or exporting names.
#[derive(Debug, Error)]
pub enum NameRegistryError {
    /// Text is not valid under the declared encoding.
    #[error("Name/value is invalid for encoding {encoding}")]
    InvalidEncoding { encoding: NameEncoding },

    /// Options bag names a key the operation does not recognise.
    #[error("Unexpected key {key}")]
    UnknownOption { key: String },

    /// Recognised option has the wrong JSON type.
    #[error("Expected type {expected} for {key}, got {actual}")]
    InvalidOptionType {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Numeric filter out of range or malformed pattern.
    #[error("{0}")]
    InvalidParameter(String),

    /// Name is absent from the index.
    #[error("name not found: {name}")]
    NotFound { name: String },

    /// Operation needs a feature the deployment has disabled.
    #[error("{0}")]
    FeatureDisabled(String),

    /// Queries are refused while the chain is catching up.
    #[error("Namecoin is downloading blocks...")]
    SyncInProgress,

    /// Originating transaction of a record cannot be located.
    #[error("{0}")]
    ResolutionFailure(String),

    /// Export destination cannot be written.
    #[error("export destination cannot be written: {0}")]
    IoFailure(#[from] std::io::Error),

    /// Failure reported by the name index.
    #[error("name index error: {0}")]
    Index(#[from] IndexError),
}

impl NameRegistryError {
    /// JSON-RPC code for this error.
    pub fn code(&self) -> i32 {
        match self {
            Self::InvalidEncoding { .. } => codes::NAME_INVALID_ENCODING,
            Self::UnknownOption { .. } | Self::InvalidOptionType { .. } => codes::TYPE_ERROR,
            Self::InvalidParameter(_) => codes::INVALID_PARAMETER,
            Self::NotFound { .. } => codes::WALLET_ERROR,
            Self::FeatureDisabled(_) | Self::IoFailure(_) => codes::MISC_ERROR,
            Self::SyncInProgress => codes::CLIENT_IN_INITIAL_DOWNLOAD,
            Self::ResolutionFailure(_) => codes::INVALID_ADDRESS_OR_KEY,
            Self::Index(_) => codes::DATABASE_ERROR,
        }
    }

    pub fn error_type(&self) -> NameRegistryErrorType {
        match self {
            Self::InvalidEncoding { .. } => NameRegistryErrorType::InvalidEncoding,
            Self::UnknownOption { .. } => NameRegistryErrorType::UnknownOption,
            Self::InvalidOptionType { .. } => NameRegistryErrorType::InvalidOptionType,
            Self::InvalidParameter(_) => NameRegistryErrorType::InvalidParameter,
            Self::NotFound { .. } => NameRegistryErrorType::NotFound,
            Self::FeatureDisabled(_) => NameRegistryErrorType::FeatureDisabled,
            Self::SyncInProgress => NameRegistryErrorType::SyncInProgress,
            Self::ResolutionFailure(_) => NameRegistryErrorType::ResolutionFailure,
            Self::IoFailure(_) => NameRegistryErrorType::IoFailure,
            Self::Index(_) => NameRegistryErrorType::IndexFailure,
        }
    }

    pub(crate) fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    pub(crate) fn history_disabled() -> Self {
        Self::FeatureDisabled("-namehistory is not enabled".to_string())
    }
}

impl From<EncodingError> for NameRegistryError {
    fn from(err: EncodingError) -> Self {
        Self::InvalidEncoding {
            encoding: err.encoding,
        }
    }
}

impl From<LookupError> for NameRegistryError {
    fn from(err: LookupError) -> Self {
        Self::ResolutionFailure(err.to_string())
    }
}

/// Serializable error for API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRegistryErrorPayload {
    pub error_type: NameRegistryErrorType,
    pub code: i32,
    pub message: String,
}

impl From<&NameRegistryError> for NameRegistryErrorPayload {
    fn from(err: &NameRegistryError) -> Self {
        Self {
            error_type: err.error_type(),
            code: err.code(),
            message: err.to_string(),
        }
    }
}

/// Error type enumeration for serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameRegistryErrorType {
    InvalidEncoding,
    UnknownOption,
    InvalidOptionType,
    InvalidParameter,
    NotFound,
    FeatureDisabled,
    SyncInProgress,
    ResolutionFailure,
    IoFailure,
    IndexFailure,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_encoding_display() {
        let err = NameRegistryError::InvalidEncoding {
            encoding: NameEncoding::Hex,
        };
        assert_eq!(err.to_string(), "Name/value is invalid for encoding hex");
        assert_eq!(err.code(), codes::NAME_INVALID_ENCODING);
    }

    #[test]
    fn test_not_found_uses_wallet_error_code() {
        let err = NameRegistryError::NotFound {
            name: "'d/abc'".to_string(),
        };
        assert_eq!(err.to_string(), "name not found: 'd/abc'");
        assert_eq!(err.code(), codes::WALLET_ERROR);
    }

    #[test]
    fn test_payload_from_error() {
        let err = NameRegistryError::SyncInProgress;
        let payload = NameRegistryErrorPayload::from(&err);
        assert_eq!(payload.error_type, NameRegistryErrorType::SyncInProgress);
        assert_eq!(payload.code, codes::CLIENT_IN_INITIAL_DOWNLOAD);
        assert!(payload.message.contains("downloading"));
    }

    #[test]
    fn test_io_failure_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: NameRegistryError = io.into();
        assert_eq!(err.error_type(), NameRegistryErrorType::IoFailure);
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_history_disabled_message() {
        let err = NameRegistryError::history_disabled();
        assert!(matches!(err, NameRegistryError::FeatureDisabled(_)));
        assert_eq!(err.to_string(), "-namehistory is not enabled");
    }
}
