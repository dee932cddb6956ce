//! # Register Commands
//!
//! The testable command surface of the register. Each function takes the
//! plain `RegisterState` (and the `Store` when it persists something),
//! validates its input, calls into kirana-core, and renders a message for
//! the terminal. The REPL in `lib.rs` is only a tokenizer over these.

pub mod auth;
pub mod bill;
pub mod catalog;
pub mod ledger;
pub mod users;
