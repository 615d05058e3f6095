//! Product record.

use common::Money;
use contracts::{NewProduct, ProductDto};

/// A catalog entry. `stock` is unsigned, so it can never go negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub sku: String,
    pub name: String,
    pub price: Money,
    pub stock: u32,
}

impl Product {
    /// Decrements stock, or reports what is available.
    pub fn reserve(&mut self, quantity: u32) -> Result<(), u32> {
        match self.stock.checked_sub(quantity) {
            Some(remaining) => {
                self.stock = remaining;
                Ok(())
            }
            None => Err(self.stock),
        }
    }

    /// Increments stock. Returns false on overflow, leaving stock unchanged.
    pub fn release(&mut self, quantity: u32) -> bool {
        match self.stock.checked_add(quantity) {
            Some(stock) => {
                self.stock = stock;
                true
            }
            None => false,
        }
    }
}

impl From<NewProduct> for Product {
    fn from(p: NewProduct) -> Self {
        Self {
            sku: p.sku,
            name: p.name,
            price: p.price,
            stock: p.stock,
        }
    }
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        Self {
            sku: p.sku,
            name: p.name,
            price: p.price,
            stock: p.stock,
        }
    }
}
