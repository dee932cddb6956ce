//! # Catalog Repository
//!
//! Load/save for the catalog aggregate (items + barcodes).
//!
//! ## Round-Trip Guarantee
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  save(catalog) ──► items(name, price, stock, position) + barcodes       │
//! │                                                                         │
//! │  load() ──► ORDER BY position ──► identical (name, price, stock,        │
//! │             barcode) tuples, independent of map iteration order         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::StoreResult;
use kirana_core::{Catalog, Item};

/// Repository for the catalog aggregate.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

/// Row shape for the `items` table.
#[derive(sqlx::FromRow)]
struct ItemRow {
    name: String,
    price_paise: i64,
    stock: i64,
}

/// Row shape for the `barcodes` table.
#[derive(sqlx::FromRow)]
struct BarcodeRow {
    barcode: String,
    item_name: String,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Loads the persisted catalog.
    ///
    /// ## Returns
    /// * `Ok(Some(Catalog))` - a catalog was previously saved
    /// * `Ok(None)` - no prior data; the register uses built-in defaults
    pub async fn load(&self) -> StoreResult<Option<Catalog>> {
        let items: Vec<ItemRow> =
            sqlx::query_as("SELECT name, price_paise, stock FROM items ORDER BY position")
                .fetch_all(&self.pool)
                .await?;

        let barcodes: Vec<BarcodeRow> = sqlx::query_as("SELECT barcode, item_name FROM barcodes")
            .fetch_all(&self.pool)
            .await?;

        if items.is_empty() && barcodes.is_empty() {
            debug!("No persisted catalog");
            return Ok(None);
        }

        debug!(items = items.len(), barcodes = barcodes.len(), "Loaded catalog");

        let items = items
            .into_iter()
            .map(|row| Item {
                name: row.name,
                price_paise: row.price_paise,
                stock: row.stock,
            })
            .collect();

        let barcodes: HashMap<String, String> = barcodes
            .into_iter()
            .map(|row| (row.barcode, row.item_name))
            .collect();

        Ok(Some(Catalog::from_parts(items, barcodes)))
    }

    /// Saves the catalog, replacing any previously stored one.
    ///
    /// Runs as a single transaction; the `position` column records the
    /// in-memory listing order.
    pub async fn save(&self, catalog: &Catalog) -> StoreResult<()> {
        debug!(items = catalog.len(), "Saving catalog");

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM items").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM barcodes").execute(&mut *tx).await?;

        for (position, item) in catalog.items().iter().enumerate() {
            sqlx::query(
                "INSERT INTO items (name, price_paise, stock, position) VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(&item.name)
            .bind(item.price_paise)
            .bind(item.stock)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }

        for (barcode, item_name) in catalog.barcodes() {
            sqlx::query("INSERT INTO barcodes (barcode, item_name) VALUES (?1, ?2)")
                .bind(barcode)
                .bind(item_name)
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
