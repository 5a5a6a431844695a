//! The in-memory snapshot of every ledger collection, and the backup file
//! shape built from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Contact, Credit, Expense, Product, Sale, SaleReturn, Settings};

/// The complete in-memory copy of all ledger collections at a point in time.
///
/// The engine owns exactly one `Snapshot` and replaces its contents strictly
/// after the corresponding collections have been persisted. Readers (derived
/// metrics, list accessors) only ever see durable state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub sales: Vec<Sale>,
    pub expenses: Vec<Expense>,
    pub credits: Vec<Credit>,
    pub contacts: Vec<Contact>,
    pub products: Vec<Product>,
    pub returns: Vec<SaleReturn>,
    pub settings: Settings,
}

/// What the load-time reconciliation pass repaired.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Sales whose `linked_credit_id` pointed at a missing credit.
    pub sales_repaired: usize,
    /// Credits whose `linked_sale_id` pointed at a missing sale, plus
    /// credits whose stored projections disagreed with their payments.
    pub credits_repaired: usize,
}

impl ReconcileReport {
    #[must_use]
    pub fn is_clean(self) -> bool {
        self.sales_repaired == 0 && self.credits_repaired == 0
    }
}

impl Snapshot {
    pub fn sale(&self, id: Uuid) -> Option<&Sale> {
        self.sales.iter().find(|sale| sale.id == id)
    }

    pub fn credit(&self, id: Uuid) -> Option<&Credit> {
        self.credits.iter().find(|credit| credit.id == id)
    }

    pub fn product(&self, id: Uuid) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    pub fn contact(&self, id: Uuid) -> Option<&Contact> {
        self.contacts.iter().find(|contact| contact.id == id)
    }

    pub fn expense(&self, id: Uuid) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id == id)
    }

    pub fn sale_return(&self, id: Uuid) -> Option<&SaleReturn> {
        self.returns.iter().find(|ret| ret.id == id)
    }

    pub fn return_for_sale(&self, sale_id: Uuid) -> Option<&SaleReturn> {
        self.returns.iter().find(|ret| ret.sale_id == sale_id)
    }

    /// Repairs dangling cross-references and stale credit projections.
    ///
    /// Collections are written one key at a time with no atomic multi-key
    /// persistence, so a crash between related writes can leave a sale and
    /// its credit pointing past each other. The dangling link is the only
    /// recovery signal; this pass clears it and recomputes every credit's
    /// paid/status projection from its payment list.
    pub fn reconcile(&mut self) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        let credit_ids: Vec<Uuid> = self.credits.iter().map(|credit| credit.id).collect();
        for sale in &mut self.sales {
            if let Some(credit_id) = sale.linked_credit_id
                && !credit_ids.contains(&credit_id)
            {
                tracing::warn!(sale = %sale.id, credit = %credit_id, "clearing dangling credit link");
                sale.linked_credit_id = None;
                report.sales_repaired += 1;
            }
        }

        let sale_ids: Vec<Uuid> = self.sales.iter().map(|sale| sale.id).collect();
        for credit in &mut self.credits {
            let mut repaired = false;
            if let Some(sale_id) = credit.linked_sale_id
                && !sale_ids.contains(&sale_id)
            {
                tracing::warn!(credit = %credit.id, sale = %sale_id, "clearing dangling sale link");
                credit.linked_sale_id = None;
                repaired = true;
            }

            let before = (credit.paid_amount, credit.status);
            credit.recompute();
            if before != (credit.paid_amount, credit.status) {
                tracing::warn!(credit = %credit.id, "recomputed stale credit projection");
                repaired = true;
            }

            if repaired {
                report.credits_repaired += 1;
            }
        }

        report
    }
}

/// The backup document: the exact top-level shape consumed by file
/// import/export and the remote mirror collaborator.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    #[serde(default)]
    pub sales: Vec<Sale>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub credits: Vec<Credit>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub returns: Vec<SaleReturn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
}

impl Backup {
    /// Captures the snapshot verbatim, stamping the export time.
    #[must_use]
    pub fn capture(snapshot: &Snapshot, exported_at: DateTime<Utc>) -> Self {
        Self {
            sales: snapshot.sales.clone(),
            expenses: snapshot.expenses.clone(),
            credits: snapshot.credits.clone(),
            settings: snapshot.settings.clone(),
            contacts: snapshot.contacts.clone(),
            products: snapshot.products.clone(),
            returns: snapshot.returns.clone(),
            exported_at: Some(exported_at),
        }
    }
}

impl From<Backup> for Snapshot {
    fn from(backup: Backup) -> Self {
        Self {
            sales: backup.sales,
            expenses: backup.expenses,
            credits: backup.credits,
            contacts: backup.contacts,
            products: backup.products,
            returns: backup.returns,
            settings: backup.settings,
        }
    }
}
