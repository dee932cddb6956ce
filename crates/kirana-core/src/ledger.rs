//! # Ledger
//!
//! Append-only history of finalized receipts plus the running sales total.
//!
//! Receipts enter in creation order and are never mutated or removed. The
//! `total_sales` aggregate is derived state: `append` accumulates it and
//! `from_receipts` recomputes it when the history is loaded from the store.

use crate::money::Money;
use crate::types::Receipt;

/// The append-only receipt history.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    receipts: Vec<Receipt>,
    total_sales_paise: i64,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Ledger::default()
    }

    /// Rebuilds a ledger from persisted receipts, recomputing the total.
    pub fn from_receipts(receipts: Vec<Receipt>) -> Self {
        let total_sales_paise = receipts.iter().map(|r| r.total_paise).sum();
        Ledger {
            receipts,
            total_sales_paise,
        }
    }

    /// Appends a finalized receipt and adds its total to the running sum.
    pub fn append(&mut self, receipt: Receipt) {
        self.total_sales_paise += receipt.total_paise;
        self.receipts.push(receipt);
    }

    /// Receipts in creation order.
    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    /// Sum of all finalized totals.
    #[inline]
    pub fn total_sales(&self) -> Money {
        Money::from_paise(self.total_sales_paise)
    }

    /// Number of receipts recorded.
    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    /// Checks whether any receipts are recorded.
    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn receipt(bill_number: i64, total_paise: i64) -> Receipt {
        Receipt {
            id: format!("r{}", bill_number),
            bill_number,
            customer: "Guest".to_string(),
            cashier: "admin".to_string(),
            created_at: Utc::now(),
            lines: Vec::new(),
            subtotal_paise: total_paise,
            discount_bps: 0,
            tax_bps: 0,
            total_paise,
        }
    }

    #[test]
    fn test_append_accumulates_total_sales() {
        let mut ledger = Ledger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.total_sales(), Money::zero());

        ledger.append(receipt(1, 21_000));
        ledger.append(receipt(2, 9_450));

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.total_sales().paise(), 30_450);
    }

    #[test]
    fn test_receipts_keep_creation_order() {
        let mut ledger = Ledger::new();
        for n in 1..=3 {
            ledger.append(receipt(n, 100));
        }
        let numbers: Vec<i64> = ledger.receipts().iter().map(|r| r.bill_number).collect();
        assert_eq!(numbers, [1, 2, 3]);
    }

    #[test]
    fn test_from_receipts_recomputes_total() {
        let ledger = Ledger::from_receipts(vec![receipt(1, 5_000), receipt(2, 2_500)]);
        assert_eq!(ledger.total_sales().paise(), 7_500);
        assert_eq!(ledger.len(), 2);
    }
}
