//! The ledger engine: owns the snapshot, validates inputs, computes every
//! entity affected by an operation, writes the affected collections through
//! the gateway, then publishes the new in-memory snapshot.
//!
//! Mutations follow one shape throughout: validate first (no state change on
//! a rejected input), build the changed collections on clones, persist them
//! in referenced-first order, and only then swap the clones into the
//! snapshot. The visible state never runs ahead of durable storage.

use chrono::Local;
use sea_orm::DatabaseConnection;

use crate::{
    Contact, Credit, Expense, Money, PaymentMethod, Product, ResultEngine, Sale, SaleReturn,
    Settings, Snapshot, metrics,
    store::{CollectionKey, CollectionStore},
};

mod contacts;
mod credits;
mod expenses;
mod maintenance;
mod products;
mod returns;
mod sales;

/// The ledger engine. One instance owns every collection; callers are
/// expected to serialize their operations (single-writer model).
#[derive(Debug)]
pub struct Engine {
    snapshot: Snapshot,
    store: CollectionStore,
}

impl Engine {
    /// Return a builder for `Engine`.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn sales(&self) -> &[Sale] {
        &self.snapshot.sales
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.snapshot.expenses
    }

    pub fn credits(&self) -> &[Credit] {
        &self.snapshot.credits
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.snapshot.contacts
    }

    pub fn products(&self) -> &[Product] {
        &self.snapshot.products
    }

    pub fn returns(&self) -> &[SaleReturn] {
        &self.snapshot.returns
    }

    pub fn settings(&self) -> &Settings {
        &self.snapshot.settings
    }

    // ── Derived metrics ────────────────────────────────────────────────────
    //
    // Zero-argument readers over the latest snapshot; "today" is the local
    // calendar date. The folds themselves live in [`crate::metrics`].

    pub fn today_sales(&self) -> Money {
        metrics::today_sales(&self.snapshot, Local::now().date_naive())
    }

    pub fn today_cash_received(&self) -> Money {
        metrics::today_received(&self.snapshot, Local::now().date_naive(), PaymentMethod::Cash)
    }

    pub fn today_upi_received(&self) -> Money {
        metrics::today_received(&self.snapshot, Local::now().date_naive(), PaymentMethod::Upi)
    }

    pub fn today_expenses(&self) -> Money {
        metrics::today_expenses(&self.snapshot, Local::now().date_naive())
    }

    pub fn credit_payments_received(&self) -> Money {
        metrics::credit_payments_received(&self.snapshot)
    }

    pub fn credit_payments_made(&self) -> Money {
        metrics::credit_payments_made(&self.snapshot)
    }

    pub fn balance(&self) -> Money {
        metrics::balance(&self.snapshot)
    }

    pub fn cash_balance(&self) -> Money {
        metrics::channel_balance(&self.snapshot, PaymentMethod::Cash)
    }

    pub fn upi_balance(&self) -> Money {
        metrics::channel_balance(&self.snapshot, PaymentMethod::Upi)
    }
}

/// The builder for `Engine`.
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database connection.
    #[must_use]
    pub fn database(mut self, database: DatabaseConnection) -> EngineBuilder {
        self.database = database;
        self
    }

    /// Loads every collection, repairs dangling cross-references and stale
    /// credit projections, and persists whatever the repair touched.
    pub async fn build(self) -> ResultEngine<Engine> {
        let store = CollectionStore::new(self.database);

        let mut snapshot = Snapshot {
            sales: store.load(CollectionKey::Sales).await?,
            expenses: store.load(CollectionKey::Expenses).await?,
            credits: store.load(CollectionKey::Credits).await?,
            contacts: store.load(CollectionKey::Contacts).await?,
            products: store.load(CollectionKey::Products).await?,
            returns: store.load(CollectionKey::Returns).await?,
            settings: store.load(CollectionKey::Settings).await?,
        };

        let report = snapshot.reconcile();
        if report.sales_repaired > 0 {
            store.save(CollectionKey::Sales, &snapshot.sales).await?;
        }
        if report.credits_repaired > 0 {
            store.save(CollectionKey::Credits, &snapshot.credits).await?;
        }
        if !report.is_clean() {
            tracing::info!(
                sales = report.sales_repaired,
                credits = report.credits_repaired,
                "reconciled collections on load"
            );
        }

        Ok(Engine { snapshot, store })
    }
}
