//! # Bill Session
//!
//! The single in-progress transaction at the register.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Bill Session Lifecycle                             │
//! │                                                                         │
//! │  ┌──────────┐      ┌──────────┐      ┌───────────┐                      │
//! │  │  Empty   │─────►│ Building │─────►│ Finalized │                      │
//! │  │  bill    │ add  │          │ fin. │ (Receipt) │                      │
//! │  └──────────┘      └──────────┘      └─────┬─────┘                      │
//! │       ▲                 │                  │                            │
//! │       │                 │ reset            │ bill number + 1            │
//! │       └─────────────────┴──────────────────┘                            │
//! │                                                                         │
//! │  add_line / add_by_barcode  decrement catalog stock and snapshot the    │
//! │                             current price onto the new line             │
//! │  remove_line                restores stock, subtotal floored at zero    │
//! │  finalize                   builds the immutable Receipt, then resets   │
//! │  reset                      abandons the bill; consumed stock is NOT    │
//! │                             restored (see note on the method)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The catalog is passed in as an explicit `&mut` handle per call - the
//! session never owns or shares it, which keeps both sides plain testable
//! structs.

use chrono::Utc;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Percent, Receipt, ReceiptLine};
use crate::validation::validate_quantity;
use crate::{DEFAULT_CUSTOMER, MAX_BILL_LINES};

// =============================================================================
// Bill Line
// =============================================================================

/// A line on the in-progress bill.
///
/// ## Price Freezing
/// `unit_price_paise` is captured when the line is added. Later catalog
/// price edits do not retroactively change lines already on the bill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillLine {
    /// Item name (catalog key).
    pub item: String,

    /// Quantity on this line.
    pub quantity: i64,

    /// Unit price in paise at time of adding (frozen).
    pub unit_price_paise: i64,
}

impl BillLine {
    /// Line total in paise (unit price × quantity).
    #[inline]
    pub fn line_total_paise(&self) -> i64 {
        self.unit_price_paise * self.quantity
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_paise(self.unit_price_paise)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_paise(self.line_total_paise())
    }
}

// =============================================================================
// Bill Session
// =============================================================================

/// The active bill: ordered lines, running subtotal, bill counter.
///
/// ## Invariants
/// - Line order is insertion order and equals receipt order
/// - `subtotal_paise` equals the sum of the line totals (floored at zero
///   after removals)
/// - The bill number increases by exactly one on every reset, finalized
///   or abandoned
#[derive(Debug, Clone)]
pub struct BillSession {
    bill_number: i64,
    lines: Vec<BillLine>,
    subtotal_paise: i64,
}

impl BillSession {
    /// Creates a fresh session starting at bill number 1.
    pub fn new() -> Self {
        BillSession::starting_at(1)
    }

    /// Creates a session with a given starting bill number.
    ///
    /// The register seeds this from the loaded ledger so numbering
    /// continues across restarts.
    pub fn starting_at(bill_number: i64) -> Self {
        BillSession {
            bill_number: bill_number.max(1),
            lines: Vec::new(),
            subtotal_paise: 0,
        }
    }

    /// Current bill number.
    #[inline]
    pub fn bill_number(&self) -> i64 {
        self.bill_number
    }

    /// Formatted bill number, e.g. `BILL-0001`.
    pub fn bill_no(&self) -> String {
        format!("BILL-{:04}", self.bill_number)
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[BillLine] {
        &self.lines
    }

    /// Running subtotal.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_paise(self.subtotal_paise)
    }

    /// Checks whether the bill has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds an item to the bill.
    ///
    /// ## Behavior
    /// 1. Validates the quantity (positive, within the per-line maximum)
    /// 2. Looks the item up in the catalog
    /// 3. Decrements catalog stock by `qty` - stock is committed at
    ///    add-time, not at checkout
    /// 4. Appends a line with the *current* catalog price frozen onto it
    /// 5. Updates the running subtotal
    ///
    /// ## Errors
    /// - `ValidationError` for a non-positive or oversized quantity
    /// - `CoreError::ItemNotFound` for an unknown item
    /// - `CoreError::InsufficientStock` when `qty` exceeds the shelf count
    /// - `CoreError::BillTooLarge` when the bill is already at capacity
    pub fn add_line(&mut self, catalog: &mut Catalog, name: &str, qty: i64) -> CoreResult<()> {
        validate_quantity(qty)?;

        if self.lines.len() >= MAX_BILL_LINES {
            return Err(CoreError::BillTooLarge {
                max: MAX_BILL_LINES,
            });
        }

        let item = catalog
            .find_by_name(name)
            .ok_or_else(|| CoreError::ItemNotFound(name.to_string()))?;
        let item_name = item.name.clone();
        let unit_price_paise = item.price_paise;

        catalog.decrement_stock(&item_name, qty)?;

        self.subtotal_paise += unit_price_paise * qty;
        self.lines.push(BillLine {
            item: item_name,
            quantity: qty,
            unit_price_paise,
        });

        Ok(())
    }

    /// Adds one unit of the item a barcode resolves to.
    ///
    /// Returns the resolved item name so the register can echo it. A
    /// barcode that resolves to a no-longer-existing item surfaces as
    /// `ItemNotFound` (barcode mappings are weak references).
    pub fn add_by_barcode(&mut self, catalog: &mut Catalog, barcode: &str) -> CoreResult<String> {
        let item = catalog
            .find_by_barcode(barcode.trim())
            .ok_or_else(|| CoreError::BarcodeNotFound(barcode.trim().to_string()))?
            .to_string();

        self.add_line(catalog, &item, 1)?;
        Ok(item)
    }

    /// Removes the line at `index` (0-based) and restores its stock.
    ///
    /// Indices above the removed line shift down. The subtotal is floored
    /// at zero. Returns the removed line.
    pub fn remove_line(&mut self, catalog: &mut Catalog, index: usize) -> CoreResult<BillLine> {
        if index >= self.lines.len() {
            return Err(CoreError::LineOutOfRange {
                index,
                len: self.lines.len(),
            });
        }

        // Restore stock first so a failed restore leaves the bill intact
        let line = &self.lines[index];
        catalog.increment_stock(&line.item, line.quantity)?;

        let line = self.lines.remove(index);
        self.subtotal_paise = (self.subtotal_paise - line.line_total_paise()).max(0);

        Ok(line)
    }

    /// Finalizes the bill into an immutable receipt and resets the session.
    ///
    /// The final total follows `(subtotal − discount%) + GST%` with the
    /// discount applied first. The caller owns the observable side effects
    /// of checkout: appending the receipt to the ledger and saving it.
    ///
    /// ## Errors
    /// - `CoreError::EmptyBill` when no lines are present
    /// - `ValidationError::OutOfRange` for a discount above 100%
    pub fn finalize(
        &mut self,
        customer: Option<&str>,
        discount: Percent,
        tax: Percent,
        cashier: &str,
    ) -> CoreResult<Receipt> {
        if self.lines.is_empty() {
            return Err(CoreError::EmptyBill);
        }

        if discount.bps() > 10_000 {
            return Err(ValidationError::OutOfRange {
                field: "discount".to_string(),
                min: 0,
                max: 100,
            }
            .into());
        }

        let customer = customer
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CUSTOMER);

        let subtotal = self.subtotal();
        let total = subtotal.apply_discount(discount).add_tax(tax);

        let lines = self
            .lines
            .iter()
            .map(|line| ReceiptLine {
                item: line.item.clone(),
                quantity: line.quantity,
                unit_price_paise: line.unit_price_paise,
                line_total_paise: line.line_total_paise(),
            })
            .collect();

        let receipt = Receipt {
            id: Uuid::new_v4().to_string(),
            bill_number: self.bill_number,
            customer: customer.to_string(),
            cashier: cashier.to_string(),
            created_at: Utc::now(),
            lines,
            subtotal_paise: self.subtotal_paise,
            discount_bps: discount.bps(),
            tax_bps: tax.bps(),
            total_paise: total.paise(),
        };

        self.reset();
        Ok(receipt)
    }

    /// Abandons the current bill and starts the next one.
    ///
    /// Clears the lines and subtotal and increments the bill number, same
    /// as after a finalize - but produces no receipt and touches neither
    /// the ledger nor the catalog. Stock consumed by the abandoned lines is
    /// NOT restored: stock commits at add-time, and an abandoned bill
    /// forfeits it. Use `remove_line` first to hand stock back.
    pub fn reset(&mut self) {
        self.lines.clear();
        self.subtotal_paise = 0;
        self.bill_number += 1;
    }
}

impl Default for BillSession {
    fn default() -> Self {
        BillSession::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Catalog, BillSession) {
        (Catalog::with_defaults(), BillSession::new())
    }

    #[test]
    fn test_add_line_freezes_price_and_commits_stock() {
        let (mut catalog, mut session) = setup();

        session.add_line(&mut catalog, "Apple", 5).unwrap();

        assert_eq!(catalog.find_by_name("Apple").unwrap().stock, 15);
        assert_eq!(session.subtotal().paise(), 25_000);
        assert_eq!(session.lines().len(), 1);

        // Price edits after the fact don't touch existing lines
        catalog
            .upsert_item("Apple", Money::from_paise(9_900), 15, None, false)
            .unwrap();
        assert_eq!(session.lines()[0].unit_price_paise, 5_000);
        assert_eq!(session.subtotal().paise(), 25_000);
    }

    #[test]
    fn test_subtotal_is_order_independent() {
        let (mut catalog_a, mut session_a) = setup();
        session_a.add_line(&mut catalog_a, "Apple", 3).unwrap();
        session_a.add_line(&mut catalog_a, "Milk", 2).unwrap();

        let (mut catalog_b, mut session_b) = setup();
        session_b.add_line(&mut catalog_b, "Milk", 2).unwrap();
        session_b.add_line(&mut catalog_b, "Apple", 3).unwrap();

        // 3×₹50 + 2×₹30 = ₹210 either way
        assert_eq!(session_a.subtotal().paise(), 21_000);
        assert_eq!(session_b.subtotal().paise(), 21_000);
    }

    #[test]
    fn test_add_line_errors() {
        let (mut catalog, mut session) = setup();

        assert!(matches!(
            session.add_line(&mut catalog, "Caviar", 1),
            Err(CoreError::ItemNotFound(_))
        ));
        assert!(matches!(
            session.add_line(&mut catalog, "Apple", 0),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            session.add_line(&mut catalog, "Apple", 21),
            Err(CoreError::InsufficientStock { available: 20, .. })
        ));

        // Failed adds leave everything untouched
        assert!(session.is_empty());
        assert_eq!(catalog.find_by_name("Apple").unwrap().stock, 20);
    }

    #[test]
    fn test_remove_line_is_inverse_of_add_line() {
        let (mut catalog, mut session) = setup();

        session.add_line(&mut catalog, "Apple", 5).unwrap();
        let removed = session.remove_line(&mut catalog, 0).unwrap();

        assert_eq!(removed.item, "Apple");
        assert_eq!(catalog.find_by_name("Apple").unwrap().stock, 20);
        assert_eq!(session.subtotal(), Money::zero());
        assert!(session.is_empty());
    }

    #[test]
    fn test_remove_line_shifts_later_indices_down() {
        let (mut catalog, mut session) = setup();
        session.add_line(&mut catalog, "Apple", 1).unwrap();
        session.add_line(&mut catalog, "Milk", 1).unwrap();
        session.add_line(&mut catalog, "Bread", 1).unwrap();

        session.remove_line(&mut catalog, 1).unwrap();

        let items: Vec<&str> = session.lines().iter().map(|l| l.item.as_str()).collect();
        assert_eq!(items, ["Apple", "Bread"]);

        assert!(matches!(
            session.remove_line(&mut catalog, 5),
            Err(CoreError::LineOutOfRange { index: 5, len: 2 })
        ));
    }

    #[test]
    fn test_finalize_totals_without_rates() {
        let (mut catalog, mut session) = setup();
        session.add_line(&mut catalog, "Apple", 3).unwrap();
        session.add_line(&mut catalog, "Milk", 2).unwrap();

        let receipt = session
            .finalize(None, Percent::zero(), Percent::zero(), "admin")
            .unwrap();

        assert_eq!(receipt.total_paise, 21_000); // 3×₹50 + 2×₹30 = ₹210
        assert_eq!(receipt.subtotal_paise, 21_000);
        assert_eq!(receipt.customer, "Guest");
        assert_eq!(receipt.cashier, "admin");
        assert_eq!(receipt.lines.len(), 2);
        assert_eq!(receipt.bill_number, 1);
    }

    #[test]
    fn test_finalize_applies_discount_then_tax() {
        let (mut catalog, mut session) = setup();
        // 2×₹50 = ₹100 subtotal
        session.add_line(&mut catalog, "Apple", 2).unwrap();

        let receipt = session
            .finalize(
                Some("Meena"),
                Percent::from_bps(1_000), // 10%
                Percent::from_bps(500),   // 5%
                "admin",
            )
            .unwrap();

        // ₹100 → ₹90 → ₹94.50 exactly
        assert_eq!(receipt.total_paise, 9_450);
        assert_eq!(receipt.customer, "Meena");
    }

    #[test]
    fn test_finalize_resets_session_and_increments_bill_number() {
        let (mut catalog, mut session) = setup();
        session.add_line(&mut catalog, "Apple", 1).unwrap();

        assert_eq!(session.bill_no(), "BILL-0001");
        session
            .finalize(Some("Meena"), Percent::zero(), Percent::zero(), "admin")
            .unwrap();

        assert!(session.is_empty());
        assert_eq!(session.subtotal(), Money::zero());
        assert_eq!(session.bill_number(), 2);
        assert_eq!(session.bill_no(), "BILL-0002");
    }

    #[test]
    fn test_finalize_empty_bill_fails() {
        let (_, mut session) = setup();
        assert!(matches!(
            session.finalize(None, Percent::zero(), Percent::zero(), "admin"),
            Err(CoreError::EmptyBill)
        ));
        // A failed finalize must not consume a bill number
        assert_eq!(session.bill_number(), 1);
    }

    #[test]
    fn test_reset_abandons_without_restoring_stock() {
        let (mut catalog, mut session) = setup();
        session.add_line(&mut catalog, "Apple", 5).unwrap();

        session.reset();

        // Bill cleared, number advanced - but the 5 Apples stay committed
        assert!(session.is_empty());
        assert_eq!(session.bill_number(), 2);
        assert_eq!(catalog.find_by_name("Apple").unwrap().stock, 15);
    }

    #[test]
    fn test_add_by_barcode_adds_one_unit() {
        let (mut catalog, mut session) = setup();

        let item = session.add_by_barcode(&mut catalog, "111000113").unwrap();
        assert_eq!(item, "Milk");
        assert_eq!(session.lines()[0].quantity, 1);
        assert_eq!(catalog.find_by_name("Milk").unwrap().stock, 29);

        assert!(matches!(
            session.add_by_barcode(&mut catalog, "999999999"),
            Err(CoreError::BarcodeNotFound(_))
        ));
    }

    #[test]
    fn test_stale_barcode_resolves_to_item_not_found() {
        let mut catalog = Catalog::new();
        let mut session = BillSession::new();
        // A mapping whose item has no catalog entry (weak reference)
        catalog
            .upsert_item("Ghee", Money::from_paise(60_000), 2, Some("222000222"), false)
            .unwrap();
        let mut stale = Catalog::from_parts(
            Vec::new(),
            catalog.barcodes().map(|(b, i)| (b.to_string(), i.to_string())).collect(),
        );

        assert!(matches!(
            session.add_by_barcode(&mut stale, "222000222"),
            Err(CoreError::ItemNotFound(_))
        ));
    }
}
