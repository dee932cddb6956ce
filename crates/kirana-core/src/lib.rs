//! # kirana-core: Pure Business Logic for Kirana POS
//!
//! This crate is the **heart** of Kirana POS. It contains all business logic
//! as pure functions and plain owned structs with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kirana POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/register (terminal register)               │   │
//! │  │    login loop ──► command dispatch ──► receipt rendering        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kirana-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌───────────┐ ┌────────┐ ┌────────┐  │   │
//! │  │   │  money  │ │ catalog │ │ directory │ │  bill  │ │ ledger │  │   │
//! │  │   │  Money  │ │  Item   │ │ User/Role │ │Session │ │Receipt │  │   │
//! │  │   │ Percent │ │ Barcode │ │Credential │ │ Lines  │ │ Totals │  │   │
//! │  │   └─────────┘ └─────────┘ └───────────┘ └────────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO TERMINAL • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                kirana-store (persistence gateway)               │   │
//! │  │            SQLite load/save for the three aggregates            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`types`] - Shared domain types (Percent, Item, Receipt)
//! - [`error`] - Domain error types
//! - [`validation`] - Register-input parsing and business rule validation
//! - [`catalog`] - The item/price/stock/barcode store
//! - [`directory`] - The authentication directory (users, roles, credentials)
//! - [`bill`] - The active bill session (the single in-progress transaction)
//! - [`ledger`] - Append-only receipt history with the running sales total
//!
//! ## Design Principles
//!
//! 1. **Pure Logic**: Database, network and terminal access are FORBIDDEN here
//! 2. **Integer Money**: All monetary values are paise (i64) to avoid float errors
//! 3. **Explicit Errors**: All errors are typed, never strings or panics
//! 4. **Explicit Handles**: Stores are plain structs passed by reference -
//!    no globals, no singletons, no locks
//!
//! ## Example Usage
//!
//! ```rust
//! use kirana_core::{Money, Percent};
//!
//! // Create money from paise (never from floats!)
//! let subtotal = Money::from_paise(10_000); // ₹100.00
//!
//! // Discount first, then GST on the discounted amount
//! let total = subtotal
//!     .apply_discount(Percent::from_bps(1000)) // 10%
//!     .add_tax(Percent::from_bps(500));        // 5%
//!
//! assert_eq!(total.paise(), 9_450); // ₹94.50
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bill;
pub mod catalog;
pub mod directory;
pub mod error;
pub mod ledger;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use kirana_core::Money` instead of
// `use kirana_core::money::Money`

pub use bill::{BillLine, BillSession};
pub use catalog::Catalog;
pub use directory::{
    require_admin, Credential, Directory, Role, User, DEFAULT_ADMIN_PASSWORD,
    DEFAULT_ADMIN_USERNAME,
};
pub use error::{AuthError, AuthResult, CoreError, CoreResult, ValidationError};
pub use ledger::Ledger;
pub use money::Money;
pub use types::{Item, Percent, Receipt, ReceiptLine};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed on a single bill.
///
/// ## Business Reason
/// Prevents runaway bills and keeps receipts printable.
pub const MAX_BILL_LINES: usize = 100;

/// Maximum quantity of a single item on one bill line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Customer name used when none is given at checkout.
pub const DEFAULT_CUSTOMER: &str = "Guest";
