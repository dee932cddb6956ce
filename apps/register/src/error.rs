//! # API Error Type
//!
//! Unified error type for register commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Kirana POS                             │
//! │                                                                         │
//! │  Terminal                     Command layer                             │
//! │  ────────                     ─────────────                             │
//! │                                                                         │
//! │  kirana> add Apple 25                                                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐   │
//! │  │  Command Function                                                │   │
//! │  │  Result<String, ApiError>                                        │   │
//! │  │         │                                                        │   │
//! │  │         ▼                                                        │   │
//! │  │  CoreError / AuthError / StoreError ──► ApiError{code, message}  │   │
//! │  └──────────────────────────────────────────────────────────────────┘   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  "! Insufficient stock for Apple: available 20, requested 25"           │
//! │                                                                         │
//! │  Every command error is recoverable: the register prints the message    │
//! │  and keeps the session running.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use kirana_core::{AuthError, CoreError, ValidationError};
use kirana_store::StoreError;

/// API error returned from register commands.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Machine-readable error code for tests and logging
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Item/barcode/user not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Login failed, login missing, or role insufficient
    AuthError,

    /// Requested quantity exceeds shelf stock
    InsufficientStock,

    /// Business rule violation (empty bill, barcode conflict, ...)
    BusinessLogic,

    /// Persistence operation failed
    StoreError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an auth error.
    pub fn auth(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::AuthError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts billing/catalog errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::ItemNotFound(_) | CoreError::BarcodeNotFound(_) => ErrorCode::NotFound,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::EmptyBill | CoreError::BillTooLarge { .. } => ErrorCode::BusinessLogic,
            CoreError::LineOutOfRange { .. } => ErrorCode::ValidationError,
            CoreError::BarcodeInUse { .. } => ErrorCode::BusinessLogic,
            CoreError::Validation(_) => ErrorCode::ValidationError,
        };

        // BarcodeInUse carries an actionable hint for the register
        let message = match &err {
            CoreError::BarcodeInUse { .. } => {
                format!("{} (append 'overwrite' to reassign it)", err)
            }
            _ => err.to_string(),
        };

        ApiError::new(code, message)
    }
}

/// Converts validation errors directly (command-level parsing).
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts authentication errors to API errors.
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let code = match &err {
            AuthError::UnknownUser(_) => ErrorCode::NotFound,
            AuthError::Validation(_) => ErrorCode::ValidationError,
            AuthError::Credential(_) => ErrorCode::Internal,
            AuthError::DuplicateUser(_) | AuthError::CannotDeleteSelf => ErrorCode::BusinessLogic,
            AuthError::InvalidCredentials | AuthError::AdminRequired => ErrorCode::AuthError,
        };
        ApiError::new(code, err.to_string())
    }
}

/// Converts persistence errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        // Log the full error; the cashier gets the short form
        tracing::error!(error = %err, "Store operation failed");
        ApiError::new(ErrorCode::StoreError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
