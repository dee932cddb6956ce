//! # Repositories
//!
//! One repository per persisted aggregate, each exposing the gateway
//! contract: `load() -> Option<Aggregate>` and `save(&Aggregate)`.
//!
//! `save` replaces the aggregate wholesale inside a transaction, mirroring
//! how the register treats persistence: explicit flush of an in-memory
//! source of truth, not row-level CRUD.

pub mod catalog;
pub mod directory;
pub mod ledger;
