//! # Ledger Repository
//!
//! Load/save for the receipt history aggregate.
//!
//! The frozen line items travel as a JSON payload column; the totals live
//! in plain columns so the history stays queryable with ad-hoc SQL. The
//! running `total_sales` aggregate is not stored - the core recomputes it
//! from the receipts on load.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::StoreResult;
use kirana_core::{Ledger, Receipt, ReceiptLine};

/// Repository for the ledger aggregate.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
}

/// Row shape for the `receipts` table.
#[derive(sqlx::FromRow)]
struct ReceiptRow {
    id: String,
    bill_number: i64,
    customer: String,
    cashier: String,
    created_at: DateTime<Utc>,
    lines: String,
    subtotal_paise: i64,
    discount_bps: i64,
    tax_bps: i64,
    total_paise: i64,
}

impl LedgerRepository {
    /// Creates a new LedgerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LedgerRepository { pool }
    }

    /// Loads the persisted receipt history.
    ///
    /// ## Returns
    /// * `Ok(Some(Ledger))` - receipts were previously saved
    /// * `Ok(None)` - no prior data; the register starts an empty ledger
    pub async fn load(&self) -> StoreResult<Option<Ledger>> {
        let rows: Vec<ReceiptRow> = sqlx::query_as(
            "SELECT id, bill_number, customer, cashier, created_at, lines, \
             subtotal_paise, discount_bps, tax_bps, total_paise \
             FROM receipts ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            debug!("No persisted receipts");
            return Ok(None);
        }

        debug!(receipts = rows.len(), "Loaded ledger");

        let receipts = rows
            .into_iter()
            .map(|row| {
                let lines: Vec<ReceiptLine> = serde_json::from_str(&row.lines)?;
                Ok(Receipt {
                    id: row.id,
                    bill_number: row.bill_number,
                    customer: row.customer,
                    cashier: row.cashier,
                    created_at: row.created_at,
                    lines,
                    subtotal_paise: row.subtotal_paise,
                    discount_bps: row.discount_bps as u32,
                    tax_bps: row.tax_bps as u32,
                    total_paise: row.total_paise,
                })
            })
            .collect::<StoreResult<Vec<Receipt>>>()?;

        Ok(Some(Ledger::from_receipts(receipts)))
    }

    /// Saves the ledger, replacing any previously stored history.
    pub async fn save(&self, ledger: &Ledger) -> StoreResult<()> {
        debug!(receipts = ledger.len(), "Saving ledger");

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM receipts").execute(&mut *tx).await?;

        for receipt in ledger.receipts() {
            let lines = serde_json::to_string(&receipt.lines)?;
            sqlx::query(
                "INSERT INTO receipts \
                 (id, bill_number, customer, cashier, created_at, lines, \
                  subtotal_paise, discount_bps, tax_bps, total_paise) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )
            .bind(&receipt.id)
            .bind(receipt.bill_number)
            .bind(&receipt.customer)
            .bind(&receipt.cashier)
            .bind(receipt.created_at)
            .bind(lines)
            .bind(receipt.subtotal_paise)
            .bind(receipt.discount_bps as i64)
            .bind(receipt.tax_bps as i64)
            .bind(receipt.total_paise)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{DbConfig, Store};
    use kirana_core::{BillSession, Catalog, Ledger, Percent};

    fn sample_ledger() -> Ledger {
        let mut catalog = Catalog::with_defaults();
        let mut session = BillSession::new();
        let mut ledger = Ledger::new();

        session.add_line(&mut catalog, "Apple", 3).unwrap();
        session.add_line(&mut catalog, "Milk", 2).unwrap();
        let first = session
            .finalize(Some("Meena"), Percent::zero(), Percent::zero(), "admin")
            .unwrap();
        ledger.append(first);

        session.add_line(&mut catalog, "Apple", 2).unwrap();
        let second = session
            .finalize(None, Percent::from_bps(1_000), Percent::from_bps(500), "ravi")
            .unwrap();
        ledger.append(second);

        ledger
    }

    #[tokio::test]
    async fn test_round_trip_preserves_receipts_and_total() {
        let store = Store::new(DbConfig::in_memory()).await.unwrap();
        let repo = store.ledger();

        let ledger = sample_ledger();
        repo.save(&ledger).await.unwrap();
        let loaded = repo.load().await.unwrap().expect("ledger was saved");

        // Creation order, every field, and the recomputed aggregate survive
        assert_eq!(loaded.len(), ledger.len());
        assert_eq!(loaded.total_sales(), ledger.total_sales());
        for (saved, read) in ledger.receipts().iter().zip(loaded.receipts()) {
            assert_eq!(read.id, saved.id);
            assert_eq!(read.bill_number, saved.bill_number);
            assert_eq!(read.customer, saved.customer);
            assert_eq!(read.cashier, saved.cashier);
            assert_eq!(read.lines, saved.lines);
            assert_eq!(read.subtotal_paise, saved.subtotal_paise);
            assert_eq!(read.discount_bps, saved.discount_bps);
            assert_eq!(read.tax_bps, saved.tax_bps);
            assert_eq!(read.total_paise, saved.total_paise);
            assert_eq!(read.created_at.timestamp(), saved.created_at.timestamp());
        }
        assert_eq!(loaded.receipts()[0].customer, "Meena");
        assert_eq!(loaded.receipts()[0].lines.len(), 2);
        assert_eq!(loaded.receipts()[1].discount_bps, 1_000);
        // ₹100 subtotal → 10% off → 5% GST = ₹94.50
        assert_eq!(loaded.receipts()[1].total_paise, 9_450);
    }

    #[tokio::test]
    async fn test_load_without_data_is_none() {
        let store = Store::new(DbConfig::in_memory()).await.unwrap();
        assert!(store.ledger().load().await.unwrap().is_none());
    }
}
