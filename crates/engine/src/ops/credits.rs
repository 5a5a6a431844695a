//! Credit mutations. Status and paid amount are projections recomputed on
//! every path through here; a caller can never store a status directly.

use uuid::Uuid;

use crate::{
    Credit, CreditPatch, CreditPayment, CreditStatus, LedgerError, NewCredit, NewCreditPayment,
    ResultEngine, store::CollectionKey, util,
};

use super::Engine;

impl Engine {
    /// Records an explicit credit (one not generated by a sale).
    pub async fn add_credit(&mut self, draft: NewCredit) -> ResultEngine<Uuid> {
        if !draft.amount.is_positive() {
            return Err(LedgerError::Validation(
                "credit amount must be > 0".to_string(),
            ));
        }
        let party = util::normalize_required_name(&draft.party, "party")?;

        let credit = Credit {
            id: Uuid::new_v4(),
            party,
            kind: draft.kind,
            amount: draft.amount,
            paid_amount: crate::Money::ZERO,
            status: CreditStatus::Pending,
            date: draft.date,
            linked_sale_id: None,
            payments: Vec::new(),
        };
        let credit_id = credit.id;

        let mut credits = self.snapshot.credits.clone();
        credits.push(credit);
        self.store.save(CollectionKey::Credits, &credits).await?;
        self.snapshot.credits = credits;
        Ok(credit_id)
    }

    /// Merges the patch, then recomputes the status from the merged
    /// amount/paid_amount. There is no way to store a status the invariant
    /// disagrees with.
    pub async fn update_credit(&mut self, id: Uuid, patch: CreditPatch) -> ResultEngine<()> {
        let index = self
            .snapshot
            .credits
            .iter()
            .position(|credit| credit.id == id)
            .ok_or_else(|| LedgerError::NotFound(format!("credit {id}")))?;

        let mut credits = self.snapshot.credits.clone();
        let credit = &mut credits[index];
        if let Some(party) = patch.party {
            credit.party = util::normalize_required_name(&party, "party")?;
        }
        if let Some(amount) = patch.amount {
            credit.amount = amount;
        }
        if let Some(paid) = patch.paid_amount {
            credit.paid_amount = paid;
        }
        if let Some(date) = patch.date {
            credit.date = date;
        }
        credit.status = credit.derived_status();

        self.store.save(CollectionKey::Credits, &credits).await?;
        self.snapshot.credits = credits;
        Ok(())
    }

    /// Deletes a credit and detaches any sale that still points at it.
    pub async fn delete_credit(&mut self, id: Uuid) -> ResultEngine<()> {
        if self.snapshot.credit(id).is_none() {
            return Err(LedgerError::NotFound(format!("credit {id}")));
        }

        let mut sales = self.snapshot.sales.clone();
        let mut sales_changed = false;
        for sale in &mut sales {
            if sale.linked_credit_id == Some(id) {
                sale.linked_credit_id = None;
                sales_changed = true;
            }
        }
        let mut credits = self.snapshot.credits.clone();
        credits.retain(|credit| credit.id != id);

        if sales_changed {
            self.store.save(CollectionKey::Sales, &sales).await?;
        }
        self.store.save(CollectionKey::Credits, &credits).await?;

        self.snapshot.sales = sales;
        self.snapshot.credits = credits;
        Ok(())
    }

    /// Appends a repayment and recomputes the credit's projections
    /// (`paid_amount` = payment sum, status from the invariant).
    pub async fn add_credit_payment(
        &mut self,
        credit_id: Uuid,
        draft: NewCreditPayment,
    ) -> ResultEngine<Uuid> {
        if !draft.amount.is_positive() {
            return Err(LedgerError::Validation(
                "payment amount must be > 0".to_string(),
            ));
        }
        let index = self
            .snapshot
            .credits
            .iter()
            .position(|credit| credit.id == credit_id)
            .ok_or_else(|| LedgerError::NotFound(format!("credit {credit_id}")))?;

        let payment = CreditPayment {
            id: Uuid::new_v4(),
            amount: draft.amount,
            payment_mode: draft.payment_mode,
            date: draft.date,
        };
        let payment_id = payment.id;

        let mut credits = self.snapshot.credits.clone();
        let credit = &mut credits[index];
        credit.payments.push(payment);
        credit.recompute();

        self.store.save(CollectionKey::Credits, &credits).await?;
        self.snapshot.credits = credits;
        Ok(payment_id)
    }
}
