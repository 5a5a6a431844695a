//! Expense mutations.

use uuid::Uuid;

use crate::{
    Expense, ExpensePatch, LedgerError, NewExpense, ResultEngine, store::CollectionKey, util,
};

use super::Engine;

impl Engine {
    pub async fn add_expense(&mut self, draft: NewExpense) -> ResultEngine<Uuid> {
        if !draft.amount.is_positive() {
            return Err(LedgerError::Validation(
                "expense amount must be > 0".to_string(),
            ));
        }
        let title = util::normalize_required_name(&draft.title, "expense")?;

        let expense = Expense {
            id: Uuid::new_v4(),
            date: draft.date,
            title,
            amount: draft.amount,
            payment_method: draft.payment_method,
            vendor: draft.vendor.map(|vendor| util::normalize_name(&vendor)),
            category: draft.category,
            note: draft.note,
        };
        let expense_id = expense.id;

        let mut expenses = self.snapshot.expenses.clone();
        expenses.push(expense);
        self.store.save(CollectionKey::Expenses, &expenses).await?;
        self.snapshot.expenses = expenses;
        Ok(expense_id)
    }

    pub async fn update_expense(&mut self, id: Uuid, patch: ExpensePatch) -> ResultEngine<()> {
        let index = self
            .snapshot
            .expenses
            .iter()
            .position(|expense| expense.id == id)
            .ok_or_else(|| LedgerError::NotFound(format!("expense {id}")))?;
        if patch.amount.is_some_and(|amount| !amount.is_positive()) {
            return Err(LedgerError::Validation(
                "expense amount must be > 0".to_string(),
            ));
        }

        let mut expenses = self.snapshot.expenses.clone();
        let expense = &mut expenses[index];
        if let Some(date) = patch.date {
            expense.date = date;
        }
        if let Some(title) = patch.title {
            expense.title = util::normalize_required_name(&title, "expense")?;
        }
        if let Some(amount) = patch.amount {
            expense.amount = amount;
        }
        if let Some(method) = patch.payment_method {
            expense.payment_method = method;
        }
        if let Some(vendor) = patch.vendor {
            expense.vendor = Some(util::normalize_name(&vendor));
        }
        if let Some(category) = patch.category {
            expense.category = Some(category);
        }
        if let Some(note) = patch.note {
            expense.note = Some(note);
        }

        self.store.save(CollectionKey::Expenses, &expenses).await?;
        self.snapshot.expenses = expenses;
        Ok(())
    }

    pub async fn delete_expense(&mut self, id: Uuid) -> ResultEngine<()> {
        if self.snapshot.expense(id).is_none() {
            return Err(LedgerError::NotFound(format!("expense {id}")));
        }
        let mut expenses = self.snapshot.expenses.clone();
        expenses.retain(|expense| expense.id != id);
        self.store.save(CollectionKey::Expenses, &expenses).await?;
        self.snapshot.expenses = expenses;
        Ok(())
    }
}
