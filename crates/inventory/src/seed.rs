//! Startup catalog.

use common::Money;
use contracts::{InventoryService, NewProduct, Result};

/// Products every fresh deployment starts with.
pub fn default_catalog() -> Vec<NewProduct> {
    vec![
        NewProduct {
            sku: "SKU-100".to_string(),
            name: "Premium Plan".to_string(),
            price: Money::from_units(99),
            stock: 100,
        },
        NewProduct {
            sku: "SKU-200".to_string(),
            name: "Enterprise Plan".to_string(),
            price: Money::from_units(499),
            stock: 50,
        },
    ]
}

/// Creates each product that does not exist yet. Returns how many were added.
pub async fn seed_catalog(
    inventory: &dyn InventoryService,
    products: Vec<NewProduct>,
) -> Result<usize> {
    let mut created = 0;
    for product in products {
        if inventory.find_by_sku(&product.sku).await?.is_some() {
            continue;
        }
        inventory.create_product(product).await?;
        created += 1;
    }
    tracing::info!(created, "catalog seeded");
    Ok(created)
}
