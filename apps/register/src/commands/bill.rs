//! # Bill Commands
//!
//! The billing workflow: add items, scan barcodes, remove lines, checkout.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  kirana> checkout 10 5 Meena                                            │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  parse discount/tax ──► session.finalize() ──► Receipt                  │
//! │                    │                                                    │
//! │                    ├──► ledger.append(receipt)                          │
//! │                    │                                                    │
//! │                    └──► store.ledger().save(&ledger)                    │
//! │                          │                                              │
//! │                          └── on failure: WARN + note on the printout,   │
//! │                              the in-memory receipt stands (retry with   │
//! │                              the `save` command)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt::Write as _;

use tracing::{debug, warn};

use kirana_core::validation::{parse_percent, parse_quantity};
use kirana_core::Receipt;
use kirana_store::Store;

use crate::error::ApiError;
use crate::state::RegisterState;

/// Adds an item to the bill by name.
pub fn add(state: &mut RegisterState, name: &str, qty_raw: &str) -> Result<String, ApiError> {
    state.user()?;
    let qty = parse_quantity(qty_raw)?;

    debug!(item = %name, qty, "add command");
    state.session.add_line(&mut state.catalog, name.trim(), qty)?;

    let line = &state.session.lines()[state.session.lines().len() - 1];
    Ok(format!(
        "{} x {} = {}  (subtotal {})",
        line.item,
        line.quantity,
        line.line_total(),
        state.session.subtotal()
    ))
}

/// Adds one unit of the item a scanned barcode resolves to.
pub fn scan(state: &mut RegisterState, barcode: &str) -> Result<String, ApiError> {
    state.user()?;

    debug!(barcode = %barcode, "scan command");
    let item = state.session.add_by_barcode(&mut state.catalog, barcode)?;

    Ok(format!(
        "{} x 1  (subtotal {})",
        item,
        state.session.subtotal()
    ))
}

/// Removes a bill line by its displayed (1-based) number.
pub fn remove(state: &mut RegisterState, line_no_raw: &str) -> Result<String, ApiError> {
    state.user()?;

    let line_no: usize = line_no_raw
        .trim()
        .parse()
        .ok()
        .filter(|n| *n >= 1)
        .ok_or_else(|| {
            ApiError::validation(format!("line number is not valid: '{}'", line_no_raw.trim()))
        })?;

    let line = state.session.remove_line(&mut state.catalog, line_no - 1)?;
    Ok(format!(
        "Removed {} x {} (stock restored, subtotal {})",
        line.item,
        line.quantity,
        state.session.subtotal()
    ))
}

/// Shows the current bill.
pub fn show(state: &RegisterState) -> Result<String, ApiError> {
    state.user()?;

    if state.session.is_empty() {
        return Ok(format!("{}: bill is empty", state.session.bill_no()));
    }

    let mut out = String::new();
    let _ = writeln!(out, "Bill No: {}", state.session.bill_no());
    for (index, line) in state.session.lines().iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {} x {} @ {} = {}",
            index + 1,
            line.item,
            line.quantity,
            line.unit_price(),
            line.line_total()
        );
    }
    let _ = write!(out, "Subtotal: {}", state.session.subtotal());
    Ok(out)
}

/// Finalizes the bill: builds the receipt, records it, saves the ledger.
///
/// A failed ledger save is reported on the printout but does not undo the
/// sale - the receipt already happened; retry persistence with `save`.
pub async fn checkout(
    state: &mut RegisterState,
    store: &Store,
    discount_raw: &str,
    tax_raw: &str,
    customer: Option<&str>,
) -> Result<String, ApiError> {
    let cashier = state.user()?.username.clone();
    let discount = parse_percent("discount", discount_raw)?;
    let tax = parse_percent("tax", tax_raw)?;

    debug!(discount_bps = discount.bps(), tax_bps = tax.bps(), "checkout command");

    let receipt = state.session.finalize(customer, discount, tax, &cashier)?;
    let mut out = render_receipt(&receipt);
    state.ledger.append(receipt);

    if let Err(err) = store.ledger().save(&state.ledger).await {
        warn!(error = %err, "Failed to save bills after checkout");
        let _ = write!(out, "\n(warning: bills were not saved: {})", err);
    }

    Ok(out)
}

/// Abandons the current bill and starts the next one.
///
/// Stock consumed by the abandoned lines stays committed; remove lines
/// first to hand it back.
pub fn new_bill(state: &mut RegisterState) -> Result<String, ApiError> {
    state.user()?;
    state.session.reset();
    Ok(format!("Ready for {}", state.session.bill_no()))
}

/// Renders a receipt in the printout layout.
pub fn render_receipt(receipt: &Receipt) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Kirana Supermarket Bill");
    let _ = writeln!(out, "---------------------------------");
    let _ = writeln!(out, "Bill No: {}", receipt.bill_no());
    let _ = writeln!(out, "Customer: {}", receipt.customer);
    let _ = writeln!(out, "Cashier: {}", receipt.cashier);
    let _ = writeln!(
        out,
        "Date: {}",
        receipt.created_at.format("%d-%m-%Y %H:%M:%S")
    );
    let _ = writeln!(out);
    for line in &receipt.lines {
        let _ = writeln!(out, "{} x {} = {}", line.item, line.quantity, line.line_total());
    }
    let _ = writeln!(out, "---------------------------------");
    let _ = writeln!(out, "Subtotal: {}", receipt.subtotal());
    let _ = writeln!(out, "Discount: {:.1}%", receipt.discount().percentage());
    let _ = writeln!(out, "GST: {:.1}%", receipt.tax().percentage());
    let _ = writeln!(out, "Total: {}", receipt.total());
    let _ = writeln!(out, "---------------------------------");
    let _ = write!(out, "Thank You! Visit Again!");
    out
}

// =============================================================================
// Unit Tests
// =============================================================================
