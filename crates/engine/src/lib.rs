//! Bookkeeping ledger engine for a small shop.
//!
//! Records sales, expenses, credits (udhaar), inventory and contacts, keeps
//! the collections consistent under the business invariants, and folds them
//! into financial summaries on demand. See [`Engine`] for the operation
//! surface and [`metrics`] for the derived values.

pub use commands::{
    ContactPatch, CreditPatch, ExpensePatch, NewContact, NewCredit, NewCreditPayment, NewExpense,
    NewProduct, NewReturn, NewSale, ProductPatch, SalePatch, SettingsPatch,
};
pub use contacts::{Contact, ContactKind};
pub use credits::{Credit, CreditKind, CreditPayment, CreditStatus};
pub use error::LedgerError;
pub use expenses::Expense;
pub use money::Money;
pub use ops::{Engine, EngineBuilder};
pub use products::Product;
pub use returns::SaleReturn;
pub use sales::{Billing, PaymentMethod, Sale, SaleItem};
pub use settings::{Settings, Theme};
pub use snapshot::{Backup, ReconcileReport, Snapshot};
pub use store::{CollectionKey, CollectionStore};

mod commands;
mod contacts;
mod credits;
mod error;
mod expenses;
pub mod metrics;
mod money;
mod ops;
mod products;
mod returns;
mod sales;
mod settings;
mod snapshot;
mod store;
mod util;

type ResultEngine<T> = Result<T, LedgerError>;
