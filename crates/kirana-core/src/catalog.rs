//! # Catalog Store
//!
//! The item/price/stock/barcode store backing the register.
//!
//! ## Responsibilities
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Catalog                                        │
//! │                                                                         │
//! │  items: Vec<Item>              barcodes: HashMap<String, String>        │
//! │  ─────────────────             ─────────────────────────────────        │
//! │  Apple   ₹50.00  x20           111000111 → Apple                        │
//! │  Banana  ₹20.00  x50           111000112 → Banana                       │
//! │  Milk    ₹30.00  x30           111000113 → Milk                         │
//! │  ...                                                                    │
//! │                                                                         │
//! │  Items live in a Vec so listings keep first-creation order.             │
//! │  Barcodes are weak references: they resolve lazily and a stale          │
//! │  mapping surfaces as "item not found" at scan time.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Items are never deleted, only edited/replaced. The bill session holds a
//! `&mut Catalog` while it runs, so stock moves are plain synchronous
//! mutations with no locking.

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Item;
use crate::validation::validate_item_name;

/// The catalog of sellable items.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Items in first-creation order.
    items: Vec<Item>,

    /// Barcode → item name.
    barcodes: HashMap<String, String>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Creates the starter catalog used when no catalog has been persisted.
    ///
    /// ## Starter Stock
    /// Apple ₹50 x20, Banana ₹20 x50, Milk ₹30 x30, Bread ₹25 x25,
    /// Soap ₹40 x40, plus barcodes for the first three.
    pub fn with_defaults() -> Self {
        let items = vec![
            ("Apple", 5_000, 20),
            ("Banana", 2_000, 50),
            ("Milk", 3_000, 30),
            ("Bread", 2_500, 25),
            ("Soap", 4_000, 40),
        ]
        .into_iter()
        .map(|(name, price_paise, stock)| Item {
            name: name.to_string(),
            price_paise,
            stock,
        })
        .collect();

        let barcodes = [
            ("111000111", "Apple"),
            ("111000112", "Banana"),
            ("111000113", "Milk"),
        ]
        .into_iter()
        .map(|(barcode, item)| (barcode.to_string(), item.to_string()))
        .collect();

        Catalog { items, barcodes }
    }

    /// Rebuilds a catalog from persisted parts.
    ///
    /// The item order must be the stored first-creation order; the
    /// aggregate invariants are assumed to have been enforced on the way in.
    pub fn from_parts(items: Vec<Item>, barcodes: HashMap<String, String>) -> Self {
        Catalog { items, barcodes }
    }

    /// Checks whether the catalog holds no items and no barcodes.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.barcodes.is_empty()
    }

    /// Number of items in the catalog.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Finds an item by name.
    pub fn find_by_name(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.name == name)
    }

    /// Resolves a barcode to an item name.
    pub fn find_by_barcode(&self, barcode: &str) -> Option<&str> {
        self.barcodes.get(barcode).map(String::as_str)
    }

    /// Reverse lookup: the barcode assigned to an item, if any.
    ///
    /// Linear scan over the (small) barcode map; used for stock listings.
    pub fn barcode_for(&self, item_name: &str) -> Option<&str> {
        self.barcodes
            .iter()
            .find(|(_, name)| name.as_str() == item_name)
            .map(|(barcode, _)| barcode.as_str())
    }

    /// Items in first-creation order, stable for display.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// All barcode → item mappings (iteration order unspecified).
    pub fn barcodes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.barcodes
            .iter()
            .map(|(barcode, item)| (barcode.as_str(), item.as_str()))
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Creates an item or fully replaces its price and stock.
    ///
    /// ## Behavior
    /// - Existing items keep their position in the listing; new items append
    /// - A barcode already bound to a *different* item is only reassigned
    ///   when the caller passes `overwrite_barcode = true` (the register asks
    ///   the cashier first); otherwise `CoreError::BarcodeInUse` is returned
    ///   and nothing changes
    ///
    /// ## Errors
    /// - `ValidationError::Required` for a blank name
    /// - `ValidationError::OutOfRange` for negative price/stock
    /// - `CoreError::BarcodeInUse` for an unconfirmed barcode reassignment
    pub fn upsert_item(
        &mut self,
        name: &str,
        price: Money,
        stock: i64,
        barcode: Option<&str>,
        overwrite_barcode: bool,
    ) -> CoreResult<()> {
        let name = validate_item_name(name)?;

        if price.is_negative() {
            return Err(ValidationError::OutOfRange {
                field: "price".to_string(),
                min: 0,
                max: i64::MAX,
            }
            .into());
        }
        if stock < 0 {
            return Err(ValidationError::OutOfRange {
                field: "stock".to_string(),
                min: 0,
                max: i64::MAX,
            }
            .into());
        }

        // Resolve the barcode conflict before touching the item, so a
        // refused overwrite leaves the catalog untouched.
        let barcode = barcode.map(str::trim).filter(|b| !b.is_empty());
        if let Some(code) = barcode {
            if let Some(existing) = self.barcodes.get(code) {
                if existing != &name && !overwrite_barcode {
                    return Err(CoreError::BarcodeInUse {
                        barcode: code.to_string(),
                        item: existing.clone(),
                    });
                }
            }
            self.barcodes.insert(code.to_string(), name.clone());
        }

        match self.items.iter_mut().find(|item| item.name == name) {
            Some(item) => {
                item.price_paise = price.paise();
                item.stock = stock;
            }
            None => self.items.push(Item {
                name,
                price_paise: price.paise(),
                stock,
            }),
        }

        Ok(())
    }

    /// Removes `qty` units of an item from the shelf.
    ///
    /// ## Errors
    /// - `CoreError::ItemNotFound` when the item has no catalog entry
    /// - `CoreError::InsufficientStock` when `qty` exceeds the current
    ///   stock; the stock is left untouched and never goes negative
    pub fn decrement_stock(&mut self, name: &str, qty: i64) -> CoreResult<()> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.name == name)
            .ok_or_else(|| CoreError::ItemNotFound(name.to_string()))?;

        if qty > item.stock {
            return Err(CoreError::InsufficientStock {
                item: item.name.clone(),
                available: item.stock,
                requested: qty,
            });
        }

        item.stock -= qty;
        Ok(())
    }

    /// Returns `qty` units of an item to the shelf (line removal).
    pub fn increment_stock(&mut self, name: &str, qty: i64) -> CoreResult<()> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.name == name)
            .ok_or_else(|| CoreError::ItemNotFound(name.to_string()))?;

        item.stock += qty;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
