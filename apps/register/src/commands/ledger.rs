//! # Ledger Commands
//!
//! Receipt history and the running sales total.

use std::fmt::Write as _;

use kirana_store::Store;

use crate::commands::bill::render_receipt;
use crate::error::ApiError;
use crate::state::RegisterState;

/// Shows every recorded receipt in creation order.
pub fn view_bills(state: &RegisterState) -> Result<String, ApiError> {
    state.user()?;

    if state.ledger.is_empty() {
        return Ok("No bills recorded yet".to_string());
    }

    let mut out = String::new();
    for (index, receipt) in state.ledger.receipts().iter().enumerate() {
        let _ = writeln!(out, "BILL #{}", index + 1);
        let _ = writeln!(out, "{}", render_receipt(receipt));
        let _ = writeln!(out);
    }
    Ok(out.trim_end().to_string())
}

/// Shows the running total of all finalized bills.
pub fn total_sales(state: &RegisterState) -> Result<String, ApiError> {
    state.user()?;
    Ok(format!("Total Sales: {}", state.ledger.total_sales()))
}

/// Saves the receipt history to the store.
pub async fn save_bills(state: &RegisterState, store: &Store) -> Result<String, ApiError> {
    state.user()?;
    store.ledger().save(&state.ledger).await?;
    Ok(format!("Bills saved ({} receipts)", state.ledger.len()))
}

/// Reloads the receipt history from the store, replacing the in-memory one.
pub async fn reload_bills(state: &mut RegisterState, store: &Store) -> Result<String, ApiError> {
    state.user()?;

    match store.ledger().load().await? {
        Some(ledger) => {
            let receipts = ledger.len();
            state.ledger = ledger;
            Ok(format!("Bills loaded ({} receipts)", receipts))
        }
        None => Ok("No saved bills".to_string()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{auth, bill};
    use kirana_store::DbConfig;

    async fn register_with_one_sale() -> (RegisterState, Store) {
        let store = Store::new(DbConfig::in_memory()).await.unwrap();
        let (mut state, _) = RegisterState::load(&store).await.unwrap();
        auth::login(&mut state, "admin", "admin123").unwrap();
        bill::add(&mut state, "Apple", "3").unwrap();
        bill::add(&mut state, "Milk", "2").unwrap();
        bill::checkout(&mut state, &store, "0", "0", None)
            .await
            .unwrap();
        (state, store)
    }

    #[tokio::test]
    async fn test_total_sales_after_one_checkout() {
        let (state, _store) = register_with_one_sale().await;
        assert_eq!(total_sales(&state).unwrap(), "Total Sales: ₹210.00");
    }

    #[tokio::test]
    async fn test_view_bills() {
        let (state, _store) = register_with_one_sale().await;
        let listing = view_bills(&state).unwrap();
        assert!(listing.contains("BILL #1"));
        assert!(listing.contains("Total: ₹210.00"));
    }

    #[tokio::test]
    async fn test_save_and_reload_bills() {
        let (mut state, store) = register_with_one_sale().await;

        save_bills(&state, &store).await.unwrap();
        state.ledger = kirana_core::Ledger::new();

        let msg = reload_bills(&mut state, &store).await.unwrap();
        assert_eq!(msg, "Bills loaded (1 receipts)");
        assert_eq!(state.ledger.total_sales().paise(), 21_000);
    }

    #[tokio::test]
    async fn test_bill_numbering_continues_after_restart() {
        let (_, store) = register_with_one_sale().await;

        // A new register against the same store picks up after BILL-0001
        let (state, _) = RegisterState::load(&store).await.unwrap();
        assert_eq!(state.session.bill_no(), "BILL-0002");
    }
}
