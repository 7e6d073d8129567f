//! Applying the row transforms to stored tables.
//!
//! The engine only maps an old row to a new row. Finding the row, replacing
//! it and rewriting the whole table happens here, one file at a time.

use revenue_engine::{apply_campaign_boost, restock, InventoryRow, ProductRow};

use crate::error::LoadResult;
use crate::table_loader::{load_inventory_file, load_products_file, write_table_file};

/// Boost the first product named `product`. Returns the updated row.
pub fn apply_campaign(rows: &mut [ProductRow], product: &str) -> Option<ProductRow> {
    let row = rows.iter_mut().find(|r| r.product_name == product)?;
    *row = apply_campaign_boost(row);
    Some(row.clone())
}

/// Restock the first inventory row named `product`. Returns the updated row.
pub fn restock_product(rows: &mut [InventoryRow], product: &str) -> Option<InventoryRow> {
    let row = rows.iter_mut().find(|r| r.product_name == product)?;
    *row = restock(row);
    Some(row.clone())
}

/// Apply a campaign boost to one product in a products CSV.
///
/// The file is left untouched when the product is not present.
pub fn apply_campaign_to_file(path: &str, product: &str) -> LoadResult<Option<ProductRow>> {
    let mut rows = load_products_file(path)?;
    let updated = apply_campaign(&mut rows, product);
    if updated.is_some() {
        write_table_file(path, &rows)?;
    } else {
        log::warn!("product '{}' not found in {}", product, path);
    }
    Ok(updated)
}

/// Restock one product in an inventory CSV.
///
/// The file is left untouched when the product is not present.
pub fn restock_in_file(path: &str, product: &str) -> LoadResult<Option<InventoryRow>> {
    let mut rows = load_inventory_file(path)?;
    let updated = restock_product(&mut rows, product);
    if updated.is_some() {
        write_table_file(path, &rows)?;
    } else {
        log::warn!("product '{}' not found in {}", product, path);
    }
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn products() -> Vec<ProductRow> {
        vec![
            ProductRow {
                product_name: "Ships".into(),
                revenue: 9_000.0,
                growth_rate: 0.12,
                units_sold: 70,
            },
            ProductRow {
                product_name: "Planes".into(),
                revenue: 11_000.0,
                growth_rate: 0.3,
                units_sold: 40,
            },
        ]
    }

    #[test]
    fn campaign_updates_only_the_named_row() {
        let mut rows = products();
        let updated = apply_campaign(&mut rows, "Ships").unwrap();
        assert_eq!(updated.growth_rate, 0.17);
        assert_eq!(rows[0].growth_rate, 0.17);
        assert_eq!(rows[1].growth_rate, 0.3);
    }

    #[test]
    fn unknown_product_changes_nothing() {
        let mut rows = products();
        assert!(apply_campaign(&mut rows, "Trucks").is_none());
        assert_eq!(rows, products());
    }

    #[test]
    fn restock_adds_units() {
        let mut rows = vec![InventoryRow {
            product_name: "Ships".into(),
            stock: 10,
            reorder_threshold: 15,
        }];
        assert_eq!(restock_product(&mut rows, "Ships").unwrap().stock, 35);
        assert_eq!(rows[0].stock, 35);
    }

    #[test]
    fn restock_rewrites_file() {
        let dir = std::env::temp_dir().join(format!("revenue-pipeline-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("inventory.csv");
        std::fs::write(
            &path,
            "product_name,stock,reorder_threshold\nShips,10,15\nPlanes,40,15\n",
        )
        .unwrap();
        let path_str = path.to_str().unwrap();

        let updated = restock_in_file(path_str, "Ships").unwrap().unwrap();
        assert_eq!(updated.stock, 35);

        let reloaded = load_inventory_file(path_str).unwrap();
        assert_eq!(reloaded[0].stock, 35);
        assert_eq!(reloaded[1].stock, 40);

        assert!(restock_in_file(path_str, "Trucks").unwrap().is_none());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
