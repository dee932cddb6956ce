//! # Error Types
//!
//! Domain-specific error types for kirana-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kirana-core errors (this file)                                         │
//! │  ├── CoreError        - Billing/catalog domain errors                   │
//! │  ├── ValidationError  - Register-input validation failures              │
//! │  └── AuthError        - Login and user-management failures              │
//! │                                                                         │
//! │  kirana-store errors (separate crate)                                   │
//! │  └── StoreError       - Persistence failures                            │
//! │                                                                         │
//! │  Register app errors                                                    │
//! │  └── ApiError         - What the cashier sees (rendered message)        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → terminal                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (item name, stock counts, etc.)
//! 3. Errors are enum variants, never String
//! 4. Every variant maps to a message the register can show and recover from

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Billing and catalog domain errors.
///
/// These represent business rule violations. They are always recoverable:
/// the register shows the message and the session continues.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Item has no catalog entry.
    ///
    /// ## When This Occurs
    /// - The typed item name is unknown
    /// - A barcode resolved to an item that was never (re)created
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Barcode has no mapping in the catalog.
    #[error("Barcode not found: {0}")]
    BarcodeNotFound(String),

    /// Insufficient stock to put the requested quantity on the bill.
    ///
    /// ## User Workflow
    /// ```text
    /// add Apple 25
    ///      │
    ///      ▼
    /// Check stock: available = 20
    ///      │
    ///      ▼
    /// InsufficientStock { item: "Apple", available: 20, requested: 25 }
    ///      │
    ///      ▼
    /// Register shows: "Insufficient stock for Apple: available 20, requested 25"
    /// ```
    #[error("Insufficient stock for {item}: available {available}, requested {requested}")]
    InsufficientStock {
        item: String,
        available: i64,
        requested: i64,
    },

    /// Checkout attempted with no lines on the bill.
    #[error("Bill has no items")]
    EmptyBill,

    /// Line index does not exist on the current bill.
    #[error("No bill line at index {index} (bill has {len} lines)")]
    LineOutOfRange { index: usize, len: usize },

    /// Bill has reached the maximum number of lines.
    #[error("Bill cannot have more than {max} lines")]
    BillTooLarge { max: usize },

    /// Barcode is already assigned to a different item and the caller did
    /// not confirm the overwrite.
    #[error("Barcode {barcode} is already assigned to '{item}'")]
    BarcodeInUse { barcode: String, item: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Register-input validation errors.
///
/// These occur when typed input doesn't meet requirements. Used for early
/// validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value did not parse as a number of the expected shape.
    #[error("{field} is not a valid number: '{value}'")]
    NotANumber { field: String, value: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },
}

// =============================================================================
// Auth Error
// =============================================================================

/// Authentication and user-management errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Login failed.
    ///
    /// Deliberately covers both the unknown-username and wrong-password
    /// cases with one message, so a caller cannot probe which part of the
    /// credential was wrong.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Username already exists in the directory.
    #[error("User already exists: {0}")]
    DuplicateUser(String),

    /// Username does not exist in the directory.
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    /// The authenticated user tried to delete their own account.
    #[error("The logged-in user cannot delete themself")]
    CannotDeleteSelf,

    /// The action requires the admin role.
    #[error("Only an admin can perform this action")]
    AdminRequired,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Credential hashing failed. Not expected in normal operation.
    #[error("Credential error: {0}")]
    Credential(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Convenience type alias for Results with AuthError.
pub type AuthResult<T> = Result<T, AuthError>;

// =============================================================================
// Unit Tests
// =============================================================================
