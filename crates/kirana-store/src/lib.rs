//! # kirana-store: Persistence Gateway for Kirana POS
//!
//! This crate provides durable storage for the three persisted aggregates.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kirana POS Data Flow                             │
//! │                                                                         │
//! │  Register command (`save`, `checkout`, user management)                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   kirana-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │     Store     │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  catalog.rs    │    │  (embedded)  │  │   │
//! │  │   │               │    │  directory.rs  │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│  ledger.rs     │    │ 001_init.sql │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   Each repository: load() -> Option<Aggregate> / save(&Agg)     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │              ./kirana.db (working directory)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and the `Store` handle
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Store error types
//! - [`repository`] - One repository per persisted aggregate
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kirana_store::{DbConfig, Store};
//!
//! let store = Store::new(DbConfig::new("./kirana.db")).await?;
//!
//! let catalog = store
//!     .catalog()
//!     .load()
//!     .await?
//!     .unwrap_or_else(Catalog::with_defaults);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use pool::{DbConfig, Store};

// Repository re-exports for convenience
pub use repository::catalog::CatalogRepository;
pub use repository::directory::DirectoryRepository;
pub use repository::ledger::LedgerRepository;
