//! # Domain Types
//!
//! Shared domain types used throughout Kirana POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Item        │   │    Receipt      │   │  ReceiptLine    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name (key)     │   │  id (UUID)      │   │  item (frozen)  │       │
//! │  │  price_paise    │   │  bill_number    │   │  quantity       │       │
//! │  │  stock          │   │  totals         │   │  unit price     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐                                                    │
//! │  │    Percent      │   One rate type for both discount and GST.         │
//! │  │  ─────────────  │                                                    │
//! │  │  bps (u32)      │                                                    │
//! │  │  825 = 8.25%    │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! A receipt has:
//! - `id`: UUID v4 - immutable, used for storage
//! - `bill_number`: human-readable business number shown on the printout

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Percent
// =============================================================================

/// A percentage rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 825 bps = 8.25%, so two-decimal percentages stay exact integers.
///
/// Used for both the per-bill discount and the GST rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Percent(u32);

impl Percent {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percent(bps)
    }

    /// Creates a rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        Percent((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Percent(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// Item
// =============================================================================

/// A catalog item available for sale.
///
/// Identified by its unique name; the catalog enforces the invariant that
/// `price_paise` and `stock` never go negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Display name, also the catalog key.
    pub name: String,

    /// Price in paise (smallest currency unit).
    pub price_paise: i64,

    /// Units currently on the shelf.
    pub stock: i64,
}

impl Item {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_paise(self.price_paise)
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// A line item on a finalized receipt.
/// Uses the snapshot pattern to freeze item data at time of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLine {
    /// Item name at time of sale (frozen).
    pub item: String,
    /// Quantity sold.
    pub quantity: i64,
    /// Unit price in paise at time of sale (frozen).
    pub unit_price_paise: i64,
    /// Line total (unit price × quantity).
    pub line_total_paise: i64,
}

impl ReceiptLine {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_paise(self.unit_price_paise)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_paise(self.line_total_paise)
    }
}

/// An immutable snapshot of a finalized bill.
///
/// Created once at checkout, appended to the ledger, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Business bill number, shown as `BILL-0001` on the printout.
    pub bill_number: i64,

    /// Customer name ("Guest" when none was given).
    pub customer: String,

    /// Username of the cashier who rang the sale up.
    pub cashier: String,

    /// When the bill was finalized.
    pub created_at: DateTime<Utc>,

    /// Frozen line items in bill order.
    pub lines: Vec<ReceiptLine>,

    /// Sum of line totals before discount and tax.
    pub subtotal_paise: i64,

    /// Discount applied to the subtotal, in basis points.
    pub discount_bps: u32,

    /// GST applied after the discount, in basis points.
    pub tax_bps: u32,

    /// Final amount due: `(subtotal - discount) + GST`.
    pub total_paise: i64,
}

impl Receipt {
    /// Returns the subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_paise(self.subtotal_paise)
    }

    /// Returns the final total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_paise(self.total_paise)
    }

    /// Returns the discount rate.
    #[inline]
    pub fn discount(&self) -> Percent {
        Percent::from_bps(self.discount_bps)
    }

    /// Returns the GST rate.
    #[inline]
    pub fn tax(&self) -> Percent {
        Percent::from_bps(self.tax_bps)
    }

    /// Formats the business bill number, e.g. `BILL-0042`.
    pub fn bill_no(&self) -> String {
        format!("BILL-{:04}", self.bill_number)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_from_bps() {
        let rate = Percent::from_bps(825);
        assert_eq!(rate.bps(), 825);
        assert!((rate.percentage() - 8.25).abs() < 0.001);
    }

    #[test]
    fn test_percent_from_percentage() {
        let rate = Percent::from_percentage(8.25);
        assert_eq!(rate.bps(), 825);
    }

    #[test]
    fn test_item_price_as_money() {
        let item = Item {
            name: "Apple".to_string(),
            price_paise: 5_000,
            stock: 20,
        };
        assert_eq!(item.price(), Money::from_paise(5_000));
    }

    #[test]
    fn test_receipt_bill_no_format() {
        let receipt = Receipt {
            id: "r1".to_string(),
            bill_number: 7,
            customer: "Guest".to_string(),
            cashier: "admin".to_string(),
            created_at: Utc::now(),
            lines: Vec::new(),
            subtotal_paise: 0,
            discount_bps: 0,
            tax_bps: 0,
            total_paise: 0,
        };
        assert_eq!(receipt.bill_no(), "BILL-0007");
    }
}
