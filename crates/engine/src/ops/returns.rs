//! Sale returns: the multi-entity reversal path.

use uuid::Uuid;

use crate::{
    LedgerError, NewReturn, ResultEngine, SaleReturn, store::CollectionKey,
};

use super::Engine;

impl Engine {
    /// Records a return for a sale: snapshots the sale's items, restocks
    /// every item, and force-closes a linked credit.
    ///
    /// At most one return can exist per sale; a second attempt fails with
    /// [`LedgerError::DuplicateOperation`] before anything changes. Closing
    /// the credit sets its amount to whatever was already paid — the
    /// remaining owed balance is permanently forgiven.
    pub async fn add_return(&mut self, draft: NewReturn) -> ResultEngine<Uuid> {
        let sale = self
            .snapshot
            .sale(draft.sale_id)
            .ok_or_else(|| LedgerError::NotFound(format!("sale {}", draft.sale_id)))?;
        if self.snapshot.return_for_sale(draft.sale_id).is_some() {
            return Err(LedgerError::DuplicateOperation(format!(
                "sale {} already has a return",
                draft.sale_id
            )));
        }

        // The refund is what was actually received, not the sale total.
        let amount = draft.amount.unwrap_or_else(|| sale.effective_paid());
        let items = sale.items.clone();
        let party = sale.customer_name.clone();
        let linked_credit_id = sale.linked_credit_id;

        let mut products = self.snapshot.products.clone();
        let mut products_changed = false;
        for item in &items {
            if let Some(product) = products.iter_mut().find(|p| p.id == item.product_id) {
                product.increment_stock(item.quantity);
                products_changed = true;
            }
        }

        let mut credits = self.snapshot.credits.clone();
        let mut credits_changed = false;
        if let Some(credit_id) = linked_credit_id
            && let Some(credit) = credits.iter_mut().find(|c| c.id == credit_id)
        {
            credit.force_close();
            credits_changed = true;
        }

        let ret = SaleReturn {
            id: Uuid::new_v4(),
            sale_id: draft.sale_id,
            date: draft.date,
            party,
            amount,
            note: draft.note,
            items,
        };
        let return_id = ret.id;
        let mut returns = self.snapshot.returns.clone();
        returns.push(ret);

        if products_changed {
            self.store.save(CollectionKey::Products, &products).await?;
        }
        if credits_changed {
            self.store.save(CollectionKey::Credits, &credits).await?;
        }
        self.store.save(CollectionKey::Returns, &returns).await?;

        self.snapshot.products = products;
        self.snapshot.credits = credits;
        self.snapshot.returns = returns;
        Ok(return_id)
    }

    /// Deletes a return and takes its item quantities back out of stock
    /// (clamped at zero, like any other decrement).
    ///
    /// A credit that [`Engine::add_return`] force-closed stays closed: the
    /// forgiven balance is not resurrected by deleting the return record.
    pub async fn delete_return(&mut self, id: Uuid) -> ResultEngine<()> {
        let ret = self
            .snapshot
            .sale_return(id)
            .ok_or_else(|| LedgerError::NotFound(format!("return {id}")))?;
        let items = ret.items.clone();

        let mut products = self.snapshot.products.clone();
        let mut products_changed = false;
        for item in &items {
            if let Some(product) = products.iter_mut().find(|p| p.id == item.product_id) {
                product.decrement_stock(item.quantity);
                products_changed = true;
            }
        }

        let mut returns = self.snapshot.returns.clone();
        returns.retain(|ret| ret.id != id);

        if products_changed {
            self.store.save(CollectionKey::Products, &products).await?;
        }
        self.store.save(CollectionKey::Returns, &returns).await?;

        self.snapshot.products = products;
        self.snapshot.returns = returns;
        Ok(())
    }
}
