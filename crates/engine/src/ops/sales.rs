//! Sale mutations, including the implicit credit and stock side effects.

use uuid::Uuid;

use crate::{
    Credit, CreditKind, CreditStatus, LedgerError, NewSale, ResultEngine, Sale, SalePatch,
    store::CollectionKey, util,
};

use super::Engine;

impl Engine {
    /// Records a sale as one logical unit: the sale itself, the credit for an
    /// unpaid shortfall, the stock decrements, and the invoice number.
    ///
    /// A partial payment (`paid_amount < total_amount`) requires a customer
    /// name and creates exactly one `given` credit for the shortfall,
    /// cross-linked with the sale. Stock decrements clamp at zero:
    /// over-selling is permitted silently.
    pub async fn add_sale(&mut self, draft: NewSale) -> ResultEngine<Uuid> {
        if !draft.total_amount.is_positive() {
            return Err(LedgerError::Validation(
                "sale total must be > 0".to_string(),
            ));
        }
        let paid = draft.paid_amount.unwrap_or(draft.total_amount);
        if paid.is_negative() || paid > draft.total_amount {
            return Err(LedgerError::Validation(
                "paid amount must be between 0 and the sale total".to_string(),
            ));
        }
        let customer_name = util::normalize_name(&draft.customer_name);
        let outstanding = draft.total_amount - paid;
        if outstanding.is_positive() && customer_name.is_empty() {
            return Err(LedgerError::Validation(
                "a partially paid sale needs a customer name".to_string(),
            ));
        }

        let sale_id = Uuid::new_v4();

        // Stock decrements. Items pointing at an unknown product id simply
        // don't match anything, mirroring the clamp's silent over-sell.
        let mut products = self.snapshot.products.clone();
        let mut products_changed = false;
        for item in &draft.items {
            if let Some(product) = products.iter_mut().find(|p| p.id == item.product_id) {
                product.decrement_stock(item.quantity);
                products_changed = true;
            }
        }

        // Invoice numbering bumps the counter exactly once per numbered sale.
        let mut settings = self.snapshot.settings.clone();
        let mut settings_changed = false;
        let mut billing = draft.billing;
        if settings.tax_enabled
            && let Some(block) = billing.as_mut()
            && block.invoice_number.is_none()
        {
            block.invoice_number = Some(settings.next_invoice_number());
            settings_changed = true;
        }

        let mut credits = self.snapshot.credits.clone();
        let mut linked_credit_id = None;
        if outstanding.is_positive() {
            let credit = Credit {
                id: Uuid::new_v4(),
                party: customer_name.clone(),
                kind: CreditKind::Given,
                amount: outstanding,
                paid_amount: crate::Money::ZERO,
                status: CreditStatus::Pending,
                date: draft.date,
                linked_sale_id: Some(sale_id),
                payments: Vec::new(),
            };
            linked_credit_id = Some(credit.id);
            credits.push(credit);
        }

        let mut sales = self.snapshot.sales.clone();
        sales.push(Sale {
            id: sale_id,
            date: draft.date,
            customer_name,
            total_amount: draft.total_amount,
            paid_amount: Some(paid),
            payment_method: draft.payment_method,
            note: draft.note,
            linked_credit_id,
            items: draft.items,
            billing,
        });

        // Referenced collections first, the referencing sale last.
        if products_changed {
            self.store.save(CollectionKey::Products, &products).await?;
        }
        if settings_changed {
            self.store.save(CollectionKey::Settings, &settings).await?;
        }
        if linked_credit_id.is_some() {
            self.store.save(CollectionKey::Credits, &credits).await?;
        }
        self.store.save(CollectionKey::Sales, &sales).await?;

        self.snapshot.products = products;
        self.snapshot.settings = settings;
        self.snapshot.credits = credits;
        self.snapshot.sales = sales;
        Ok(sale_id)
    }

    /// Partial merge over an existing sale.
    ///
    /// The merge is unguarded: changing `total_amount`, `paid_amount` or
    /// `items` does **not** re-derive the linked credit or re-adjust stock.
    /// The original behaves the same way; re-deriving here would silently
    /// rewrite credit history.
    pub async fn update_sale(&mut self, id: Uuid, patch: SalePatch) -> ResultEngine<()> {
        let index = self
            .snapshot
            .sales
            .iter()
            .position(|sale| sale.id == id)
            .ok_or_else(|| LedgerError::NotFound(format!("sale {id}")))?;

        let mut sales = self.snapshot.sales.clone();
        let sale = &mut sales[index];
        if let Some(date) = patch.date {
            sale.date = date;
        }
        if let Some(name) = patch.customer_name {
            sale.customer_name = util::normalize_name(&name);
        }
        if let Some(total) = patch.total_amount {
            sale.total_amount = total;
        }
        if let Some(paid) = patch.paid_amount {
            sale.paid_amount = Some(paid);
        }
        if let Some(method) = patch.payment_method {
            sale.payment_method = method;
        }
        if let Some(note) = patch.note {
            sale.note = Some(note);
        }
        if let Some(items) = patch.items {
            sale.items = items;
        }
        if let Some(billing) = patch.billing {
            sale.billing = Some(billing);
        }

        self.store.save(CollectionKey::Sales, &sales).await?;
        self.snapshot.sales = sales;
        Ok(())
    }

    /// Deletes a sale; a linked credit is fully deleted with it (not
    /// cancelled or archived).
    pub async fn delete_sale(&mut self, id: Uuid) -> ResultEngine<()> {
        let sale = self
            .snapshot
            .sale(id)
            .ok_or_else(|| LedgerError::NotFound(format!("sale {id}")))?;
        let linked_credit_id = sale.linked_credit_id;

        let mut credits = self.snapshot.credits.clone();
        if let Some(credit_id) = linked_credit_id {
            credits.retain(|credit| credit.id != credit_id);
        }
        let mut sales = self.snapshot.sales.clone();
        sales.retain(|sale| sale.id != id);

        if linked_credit_id.is_some() {
            self.store.save(CollectionKey::Credits, &credits).await?;
        }
        self.store.save(CollectionKey::Sales, &sales).await?;

        self.snapshot.credits = credits;
        self.snapshot.sales = sales;
        Ok(())
    }
}
