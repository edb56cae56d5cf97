use std::fmt::Display;
use std::path::PathBuf;
use thiserror::Error;

pub mod codes;

pub use codes::{describe_error_code, ErrorCode};

/// The unified error type for loader-setup
///
/// `Validation` rejects a single loader; every other variant is fatal to the
/// whole run (see [`SetupError::is_fatal`]). A region outside the allow-list
/// gets its own `Region` variant because it ends the run.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("[E{code:04}] Validation error: {message}")]
    Validation {
        code: u16,
        message: String,
        field: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Unsupported region '{region}': {message}")]
    Region {
        code: u16,
        region: String,
        message: String,
    },

    #[error("[E{code:04}] Encryption error: {message}")]
    Encryption {
        code: u16,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Storage error: {message}")]
    Storage {
        code: u16,
        message: String,
        table: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Provisioning error: {message}")]
    Provisioning {
        code: u16,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Input error: {message}")]
    Input {
        code: u16,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] {message}")]
    Other {
        code: u16,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl SetupError {
    /// Create a validation error with default code
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            code: ErrorCode::VALIDATION_GENERIC,
            message: message.into(),
            field: None,
            source: None,
        }
    }

    /// Create a validation error with specific code and field
    pub fn validation_with_code(
        code: u16,
        message: impl Into<String>,
        field: Option<String>,
    ) -> Self {
        Self::Validation {
            code,
            message: message.into(),
            field,
            source: None,
        }
    }

    /// Create the fatal error for a region outside the allow-list
    pub fn unsupported_region(region: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Region {
            code: ErrorCode::REGION_NOT_SUPPORTED,
            region: region.into(),
            message: message.into(),
        }
    }

    /// Create an encryption error with default code
    pub fn encryption(message: impl Into<String>) -> Self {
        Self::Encryption {
            code: ErrorCode::ENCRYPTION_GENERIC,
            message: message.into(),
            source: None,
        }
    }

    /// Create an encryption error with specific code
    pub fn encryption_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Encryption {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create a storage error with default code
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            code: ErrorCode::STORAGE_GENERIC,
            message: message.into(),
            table: None,
            source: None,
        }
    }

    /// Create a storage error with specific code and table
    pub fn storage_with_code(code: u16, message: impl Into<String>, table: Option<String>) -> Self {
        Self::Storage {
            code,
            message: message.into(),
            table,
            source: None,
        }
    }

    /// Create a provisioning error with specific code
    pub fn provisioning_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Provisioning {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create an input document error with specific code and path
    pub fn input_with_code(code: u16, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Input {
            code,
            message: message.into(),
            path,
            source: None,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Other {
            code: ErrorCode::OTHER_INTERNAL_ERROR,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error to this error
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        match &mut self {
            Self::Validation { source: src, .. }
            | Self::Encryption { source: src, .. }
            | Self::Storage { source: src, .. }
            | Self::Provisioning { source: src, .. }
            | Self::Input { source: src, .. }
            | Self::Other { source: src, .. } => {
                *src = Some(source.into());
            }
            Self::Region { .. } => {}
        }
        self
    }

    /// Add context to the error message
    pub fn with_context(mut self, context: impl Display) -> Self {
        match &mut self {
            Self::Validation { message, .. }
            | Self::Region { message, .. }
            | Self::Encryption { message, .. }
            | Self::Storage { message, .. }
            | Self::Provisioning { message, .. }
            | Self::Input { message, .. }
            | Self::Other { message, .. } => {
                *message = format!("{}: {}", message, context);
            }
        }
        self
    }

    /// Attach the offending input field to a validation error
    pub fn with_field(mut self, name: impl Into<String>) -> Self {
        if let Self::Validation {
            field: ref mut f, ..
        } = self
        {
            *f = Some(name.into());
        }
        self
    }

    /// Whether this error terminates the whole run rather than one loader
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Validation { .. })
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } => 2,
            Self::Region { .. } => 7,
            Self::Encryption { .. } => 3,
            Self::Storage { .. } => 4,
            Self::Provisioning { .. } => 5,
            Self::Input { .. } => 6,
            Self::Other { .. } => 1,
        }
    }

    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::Validation { code, .. }
            | Self::Region { code, .. }
            | Self::Encryption { code, .. }
            | Self::Storage { code, .. }
            | Self::Provisioning { code, .. }
            | Self::Input { code, .. }
            | Self::Other { code, .. } => *code,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message, field, .. } => {
                if let Some(f) = field {
                    format!("Invalid value for '{}': {}", f, message)
                } else {
                    format!("Validation error: {}", message)
                }
            }
            Self::Region { region, message, .. } => {
                format!("Unsupported region '{}': {}", region, message)
            }
            Self::Encryption { message, .. } => {
                format!("Could not encrypt a secret value: {}", message)
            }
            Self::Storage { message, table, .. } => {
                if let Some(t) = table {
                    format!("Could not write to table {}: {}", t, message)
                } else {
                    format!("Storage error: {}", message)
                }
            }
            Self::Provisioning { message, .. } => {
                format!("Could not provision supporting resources: {}", message)
            }
            Self::Input { message, path, .. } => {
                if let Some(p) = path {
                    format!("Problem with setup document {}: {}", p.display(), message)
                } else {
                    format!("Problem with setup document: {}", message)
                }
            }
            Self::Other { message, .. } => message.clone(),
        }
    }

    /// Get a developer-friendly error message with full chain
    pub fn developer_message(&self) -> String {
        let mut out = format!("{} ({})", self, describe_error_code(self.code()));
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            out.push_str(&format!("\n  caused by: {}", cause));
            source = cause.source();
        }
        out
    }
}

/// Type alias for Results using SetupError
pub type Result<T> = std::result::Result<T, SetupError>;

impl From<crate::storage::error::StorageError> for SetupError {
    fn from(err: crate::storage::error::StorageError) -> Self {
        use crate::storage::error::StorageError;

        match err {
            StorageError::Serialization(msg) => {
                SetupError::storage_with_code(ErrorCode::STORAGE_SERIALIZATION_ERROR, msg, None)
            }
            StorageError::Write { table, message } => {
                SetupError::storage_with_code(ErrorCode::STORAGE_WRITE_FAILED, message, Some(table))
            }
            StorageError::Table { table, message } => SetupError::provisioning_with_code(
                ErrorCode::PROVISION_TABLE_FAILED,
                format!("{}: {}", table, message),
            ),
            StorageError::Timeout { table, waited } => SetupError::provisioning_with_code(
                ErrorCode::PROVISION_TABLE_TIMEOUT,
                format!("{} was not active after {:?}", table, waited),
            ),
            StorageError::EventSource(msg) => {
                SetupError::provisioning_with_code(ErrorCode::PROVISION_EVENT_SOURCE_FAILED, msg)
            }
        }
    }
}

impl From<crate::crypto::CryptoError> for SetupError {
    fn from(err: crate::crypto::CryptoError) -> Self {
        use crate::crypto::CryptoError;

        let code = match &err {
            CryptoError::Service(_) => ErrorCode::ENCRYPTION_SERVICE_FAILED,
            CryptoError::KeySetup(_) => ErrorCode::ENCRYPTION_KEY_SETUP_FAILED,
            CryptoError::EmptyCiphertext => ErrorCode::ENCRYPTION_EMPTY_CIPHERTEXT,
        };
        let message = err.to_string();
        SetupError::encryption_with_code(code, message).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_is_not_fatal() {
        let err = SetupError::validation("You Must Provide a Table Name");
        assert!(!err.is_fatal());
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.code(), ErrorCode::VALIDATION_GENERIC);
    }

    #[test]
    fn test_external_failures_are_fatal() {
        assert!(SetupError::encryption("kms down").is_fatal());
        assert!(SetupError::storage("throttled").is_fatal());
        assert!(
            SetupError::provisioning_with_code(ErrorCode::PROVISION_GENERIC, "denied").is_fatal()
        );
        assert!(SetupError::internal("bug").is_fatal());
    }

    #[test]
    fn test_exit_codes_are_distinct_for_fatal_kinds() {
        let codes = [
            SetupError::encryption("a").exit_code(),
            SetupError::storage("b").exit_code(),
            SetupError::provisioning_with_code(ErrorCode::PROVISION_GENERIC, "c").exit_code(),
            SetupError::input_with_code(ErrorCode::INPUT_GENERIC, "d", None).exit_code(),
            SetupError::unsupported_region("mars-1", "e").exit_code(),
        ];
        assert_eq!(codes, [3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_unsupported_region_is_fatal() {
        let err = SetupError::unsupported_region("mars-1", "allowed: us-east-1")
            .with_field("region");

        assert!(err.is_fatal());
        assert_eq!(err.code(), ErrorCode::REGION_NOT_SUPPORTED);
        assert!(err.user_message().contains("'mars-1'"));
        assert!(err.to_string().starts_with("[E6001]"));
    }

    #[test]
    fn test_with_field_only_touches_validation() {
        let err = SetupError::validation("not an integer").with_field("clusterPort");
        assert!(err.user_message().contains("'clusterPort'"));

        let err = SetupError::storage("boom").with_field("clusterPort");
        assert!(!err.user_message().contains("clusterPort"));
    }

    #[test]
    fn test_developer_message_includes_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "config.json");
        let err = SetupError::input_with_code(ErrorCode::INPUT_NOT_FOUND, "cannot read", None)
            .with_source(io_err)
            .with_context("while loading");

        assert!(err.to_string().contains("[E1001]"));
        let dev = err.developer_message();
        assert!(dev.contains("Setup document not found"));
        assert!(dev.contains("caused by: config.json"));
    }
}
