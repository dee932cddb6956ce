//! # Register State
//!
//! The in-memory state of one running register.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       RegisterState                                     │
//! │                                                                         │
//! │  catalog     ── the item/price/stock/barcode source of truth            │
//! │  directory   ── the username → user source of truth                     │
//! │  ledger      ── finalized receipts + running total sales                │
//! │  session     ── the single active bill                                  │
//! │  current_user ─ who is logged in at this register                       │
//! │                                                                         │
//! │  One register = one synchronous caller = plain owned structs.           │
//! │  Commands take `&mut RegisterState`; no Arc, no Mutex, no globals.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Load Policy
//! A missing aggregate falls back to its default (starter catalog, empty
//! ledger, bootstrapped admin). A *failed* load is logged as a warning and
//! treated the same as missing - the register must come up even with a
//! corrupt database file, it just starts from defaults.

use tracing::{info, warn};

use kirana_core::{BillSession, Catalog, Directory, Ledger, User};
use kirana_store::Store;

use crate::error::{ApiError, ErrorCode};

/// The seeded default credential, surfaced once so the register can show it.
pub type BootstrapNotice = Option<(&'static str, &'static str)>;

/// In-memory state of the register.
#[derive(Debug)]
pub struct RegisterState {
    /// Item/price/stock/barcode store.
    pub catalog: Catalog,

    /// Username → user directory.
    pub directory: Directory,

    /// Finalized receipt history.
    pub ledger: Ledger,

    /// The active bill.
    pub session: BillSession,

    /// The authenticated user, if any.
    pub current_user: Option<User>,
}

impl RegisterState {
    /// Loads register state from the store, falling back to defaults.
    ///
    /// ## What This Does
    /// 1. Loads catalog / directory / ledger (warn + defaults on failure)
    /// 2. Bootstraps the default admin when the directory is empty and
    ///    saves the seeded directory immediately
    /// 3. Seeds the bill counter from the ledger so numbering continues
    ///    across restarts
    ///
    /// Returns the state plus the seeded default credential (for display)
    /// when a bootstrap happened.
    pub async fn load(store: &Store) -> Result<(Self, BootstrapNotice), ApiError> {
        let catalog = match store.catalog().load().await {
            Ok(Some(catalog)) => catalog,
            Ok(None) => {
                info!("No saved catalog, using starter stock");
                Catalog::with_defaults()
            }
            Err(err) => {
                warn!(error = %err, "Failed to load catalog, using starter stock");
                Catalog::with_defaults()
            }
        };

        let mut directory = match store.directory().load().await {
            Ok(Some(directory)) => directory,
            Ok(None) => {
                info!("No saved users");
                Directory::new()
            }
            Err(err) => {
                warn!(error = %err, "Failed to load users, starting empty");
                Directory::new()
            }
        };

        let notice = directory.bootstrap_if_empty()?;
        if notice.is_some() {
            info!("Seeded default admin account");
            if let Err(err) = store.directory().save(&directory).await {
                warn!(error = %err, "Failed to save bootstrapped users");
            }
        }

        let ledger = match store.ledger().load().await {
            Ok(Some(ledger)) => ledger,
            Ok(None) => {
                info!("No saved bills");
                Ledger::new()
            }
            Err(err) => {
                warn!(error = %err, "Failed to load bills, starting empty");
                Ledger::new()
            }
        };

        let session = BillSession::starting_at(ledger.len() as i64 + 1);

        Ok((
            RegisterState {
                catalog,
                directory,
                ledger,
                session,
                current_user: None,
            },
            notice,
        ))
    }

    /// Creates a fresh state from defaults, bypassing the store (tests).
    pub fn with_defaults() -> Result<(Self, BootstrapNotice), ApiError> {
        let mut directory = Directory::new();
        let notice = directory.bootstrap_if_empty()?;

        Ok((
            RegisterState {
                catalog: Catalog::with_defaults(),
                directory,
                ledger: Ledger::new(),
                session: BillSession::new(),
                current_user: None,
            },
            notice,
        ))
    }

    /// The authenticated user, or an auth error when nobody is logged in.
    ///
    /// Every command goes through this - no operation is available
    /// unauthenticated.
    pub fn user(&self) -> Result<&User, ApiError> {
        self.current_user
            .as_ref()
            .ok_or_else(|| ApiError::new(ErrorCode::AuthError, "Not logged in"))
    }
}
