//! Product mutations.

use chrono::Utc;
use uuid::Uuid;

use crate::{
    LedgerError, NewProduct, Product, ProductPatch, ResultEngine, store::CollectionKey, util,
};

use super::Engine;

impl Engine {
    pub async fn add_product(&mut self, draft: NewProduct) -> ResultEngine<Uuid> {
        let name = util::normalize_required_name(&draft.name, "product")?;
        if draft.stock < 0 {
            return Err(LedgerError::Validation("stock must be >= 0".to_string()));
        }
        if draft.unit_price.is_negative() {
            return Err(LedgerError::Validation(
                "unit price must be >= 0".to_string(),
            ));
        }

        let product = Product {
            id: Uuid::new_v4(),
            name,
            stock: draft.stock,
            unit_price: draft.unit_price,
            cost_price: draft.cost_price,
            category: draft.category,
            min_stock_level: draft.min_stock_level,
            created_at: Utc::now(),
        };
        let product_id = product.id;

        let mut products = self.snapshot.products.clone();
        products.push(product);
        self.store.save(CollectionKey::Products, &products).await?;
        self.snapshot.products = products;
        Ok(product_id)
    }

    pub async fn update_product(&mut self, id: Uuid, patch: ProductPatch) -> ResultEngine<()> {
        let index = self
            .snapshot
            .products
            .iter()
            .position(|product| product.id == id)
            .ok_or_else(|| LedgerError::NotFound(format!("product {id}")))?;
        if patch.stock.is_some_and(|stock| stock < 0) {
            return Err(LedgerError::Validation("stock must be >= 0".to_string()));
        }

        let mut products = self.snapshot.products.clone();
        let product = &mut products[index];
        if let Some(name) = patch.name {
            product.name = util::normalize_required_name(&name, "product")?;
        }
        if let Some(stock) = patch.stock {
            product.stock = stock;
        }
        if let Some(unit_price) = patch.unit_price {
            product.unit_price = unit_price;
        }
        if let Some(cost_price) = patch.cost_price {
            product.cost_price = Some(cost_price);
        }
        if let Some(category) = patch.category {
            product.category = Some(category);
        }
        if let Some(level) = patch.min_stock_level {
            product.min_stock_level = Some(level);
        }

        self.store.save(CollectionKey::Products, &products).await?;
        self.snapshot.products = products;
        Ok(())
    }

    /// Deletes a product unless a sale line still references it.
    pub async fn delete_product(&mut self, id: Uuid) -> ResultEngine<()> {
        if self.snapshot.product(id).is_none() {
            return Err(LedgerError::NotFound(format!("product {id}")));
        }
        let referenced = self
            .snapshot
            .sales
            .iter()
            .any(|sale| sale.items.iter().any(|item| item.product_id == id));
        if referenced {
            return Err(LedgerError::Conflict(
                "product is referenced by recorded sales".to_string(),
            ));
        }

        let mut products = self.snapshot.products.clone();
        products.retain(|product| product.id != id);
        self.store.save(CollectionKey::Products, &products).await?;
        self.snapshot.products = products;
        Ok(())
    }
}
