//! # Catalog Commands
//!
//! Stock viewing for everyone; stock editing for admins only.

use std::fmt::Write as _;

use tracing::debug;

use kirana_core::validation::{parse_price, parse_stock};
use kirana_core::{require_admin, CoreError};
use kirana_store::Store;

use crate::error::ApiError;
use crate::state::RegisterState;

/// Lists the catalog in first-creation order.
pub fn stock_list(state: &RegisterState) -> Result<String, ApiError> {
    state.user()?;

    let mut out = String::from("Current Stock:\n");
    for item in state.catalog.items() {
        let barcode = state.catalog.barcode_for(&item.name).unwrap_or("-");
        let _ = writeln!(
            out,
            "{:<12} : {:>4} pcs ({} each)  Barcode: {}",
            item.name,
            item.stock,
            item.price(),
            barcode
        );
    }
    Ok(out.trim_end().to_string())
}

/// Shows one item's stock, price and barcode.
pub fn find_item(state: &RegisterState, name: &str) -> Result<String, ApiError> {
    state.user()?;

    let name = name.trim();
    let item = state
        .catalog
        .find_by_name(name)
        .ok_or_else(|| CoreError::ItemNotFound(name.to_string()))?;

    Ok(format!(
        "{} - Stock: {} Price: {} Barcode: {}",
        item.name,
        item.stock,
        item.price(),
        state.catalog.barcode_for(&item.name).unwrap_or("-")
    ))
}

/// Creates an item or replaces its price/stock (admin only).
///
/// Reassigning a barcode that belongs to a different item needs the
/// explicit `overwrite` confirmation; without it the command reports the
/// conflict and changes nothing.
pub fn edit_stock(
    state: &mut RegisterState,
    name: &str,
    stock_raw: &str,
    price_raw: &str,
    barcode: Option<&str>,
    overwrite: bool,
) -> Result<String, ApiError> {
    require_admin(state.user()?)?;

    let stock = parse_stock(stock_raw)?;
    let price = parse_price(price_raw)?;

    debug!(item = %name.trim(), stock, price = %price, "edit command");
    state
        .catalog
        .upsert_item(name, price, stock, barcode, overwrite)?;

    Ok(format!("Stock updated for {}", name.trim()))
}

/// Saves the catalog to the store.
pub async fn save_stock(state: &RegisterState, store: &Store) -> Result<String, ApiError> {
    state.user()?;
    store.catalog().save(&state.catalog).await?;
    Ok(format!("Stock saved ({} items)", state.catalog.len()))
}

/// Reloads the catalog from the store, replacing the in-memory one.
pub async fn reload_stock(state: &mut RegisterState, store: &Store) -> Result<String, ApiError> {
    state.user()?;

    match store.catalog().load().await? {
        Some(catalog) => {
            let items = catalog.len();
            state.catalog = catalog;
            Ok(format!("Stock loaded ({} items)", items))
        }
        None => Ok("No saved stock".to_string()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
