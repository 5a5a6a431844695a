//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists. Patch structs leave every field
//! optional; only set fields are merged.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    Billing, ContactKind, CreditKind, Money, PaymentMethod, SaleItem,
};

/// Create a sale.
#[derive(Clone, Debug)]
pub struct NewSale {
    pub date: NaiveDate,
    pub customer_name: String,
    pub total_amount: Money,
    /// Defaults to the total (fully paid) when unset.
    pub paid_amount: Option<Money>,
    pub payment_method: PaymentMethod,
    pub note: Option<String>,
    pub items: Vec<SaleItem>,
    pub billing: Option<Billing>,
}

impl NewSale {
    #[must_use]
    pub fn new(total_amount: Money, payment_method: PaymentMethod, date: NaiveDate) -> Self {
        Self {
            date,
            customer_name: String::new(),
            total_amount,
            paid_amount: None,
            payment_method,
            note: None,
            items: Vec::new(),
            billing: None,
        }
    }

    #[must_use]
    pub fn customer(mut self, name: impl Into<String>) -> Self {
        self.customer_name = name.into();
        self
    }

    #[must_use]
    pub fn paid(mut self, amount: Money) -> Self {
        self.paid_amount = Some(amount);
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn item(mut self, item: SaleItem) -> Self {
        self.items.push(item);
        self
    }

    #[must_use]
    pub fn items(mut self, items: Vec<SaleItem>) -> Self {
        self.items = items;
        self
    }

    #[must_use]
    pub fn billing(mut self, billing: Billing) -> Self {
        self.billing = Some(billing);
        self
    }
}

/// Partial update of a sale. Merged field-by-field over the stored record.
#[derive(Clone, Debug, Default)]
pub struct SalePatch {
    pub date: Option<NaiveDate>,
    pub customer_name: Option<String>,
    pub total_amount: Option<Money>,
    pub paid_amount: Option<Money>,
    pub payment_method: Option<PaymentMethod>,
    pub note: Option<String>,
    pub items: Option<Vec<SaleItem>>,
    pub billing: Option<Billing>,
}

/// Create an expense.
#[derive(Clone, Debug)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub title: String,
    pub amount: Money,
    pub payment_method: PaymentMethod,
    pub vendor: Option<String>,
    pub category: Option<String>,
    pub note: Option<String>,
}

impl NewExpense {
    #[must_use]
    pub fn new(title: impl Into<String>, amount: Money, date: NaiveDate) -> Self {
        Self {
            date,
            title: title.into(),
            amount,
            payment_method: PaymentMethod::Cash,
            vendor: None,
            category: None,
            note: None,
        }
    }

    #[must_use]
    pub fn payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = method;
        self
    }

    #[must_use]
    pub fn vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct ExpensePatch {
    pub date: Option<NaiveDate>,
    pub title: Option<String>,
    pub amount: Option<Money>,
    pub payment_method: Option<PaymentMethod>,
    pub vendor: Option<String>,
    pub category: Option<String>,
    pub note: Option<String>,
}

/// Create an explicit credit (one not generated by a partial-payment sale).
#[derive(Clone, Debug)]
pub struct NewCredit {
    pub party: String,
    pub kind: CreditKind,
    pub amount: Money,
    pub date: NaiveDate,
}

impl NewCredit {
    #[must_use]
    pub fn new(party: impl Into<String>, kind: CreditKind, amount: Money, date: NaiveDate) -> Self {
        Self {
            party: party.into(),
            kind,
            amount,
            date,
        }
    }
}

/// Partial update of a credit. Status is deliberately not patchable: it is
/// recomputed from the merged amount/paid_amount on every update.
#[derive(Clone, Debug, Default)]
pub struct CreditPatch {
    pub party: Option<String>,
    pub amount: Option<Money>,
    pub paid_amount: Option<Money>,
    pub date: Option<NaiveDate>,
}

/// Append a repayment to a credit.
#[derive(Clone, Debug)]
pub struct NewCreditPayment {
    pub amount: Money,
    pub payment_mode: PaymentMethod,
    pub date: NaiveDate,
}

impl NewCreditPayment {
    #[must_use]
    pub fn new(amount: Money, payment_mode: PaymentMethod, date: NaiveDate) -> Self {
        Self {
            amount,
            payment_mode,
            date,
        }
    }
}

/// Record a return against a sale.
#[derive(Clone, Debug)]
pub struct NewReturn {
    pub sale_id: Uuid,
    pub date: NaiveDate,
    /// Defaults to the sale's paid amount when unset.
    pub amount: Option<Money>,
    pub note: Option<String>,
}

impl NewReturn {
    #[must_use]
    pub fn new(sale_id: Uuid, date: NaiveDate) -> Self {
        Self {
            sale_id,
            date,
            amount: None,
            note: None,
        }
    }

    #[must_use]
    pub fn amount(mut self, amount: Money) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Create a product.
#[derive(Clone, Debug)]
pub struct NewProduct {
    pub name: String,
    pub stock: i64,
    pub unit_price: Money,
    pub cost_price: Option<Money>,
    pub category: Option<String>,
    pub min_stock_level: Option<i64>,
}

impl NewProduct {
    #[must_use]
    pub fn new(name: impl Into<String>, stock: i64, unit_price: Money) -> Self {
        Self {
            name: name.into(),
            stock,
            unit_price,
            cost_price: None,
            category: None,
            min_stock_level: None,
        }
    }

    #[must_use]
    pub fn cost_price(mut self, cost_price: Money) -> Self {
        self.cost_price = Some(cost_price);
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn min_stock_level(mut self, level: i64) -> Self {
        self.min_stock_level = Some(level);
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub stock: Option<i64>,
    pub unit_price: Option<Money>,
    pub cost_price: Option<Money>,
    pub category: Option<String>,
    pub min_stock_level: Option<i64>,
}

/// Create a contact.
#[derive(Clone, Debug)]
pub struct NewContact {
    pub name: String,
    pub kind: ContactKind,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

impl NewContact {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ContactKind) -> Self {
        Self {
            name: name.into(),
            kind,
            phone: None,
            notes: None,
        }
    }

    #[must_use]
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub kind: Option<ContactKind>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

/// Partial update of the shop settings.
#[derive(Clone, Debug, Default)]
pub struct SettingsPatch {
    pub theme: Option<crate::Theme>,
    pub currency: Option<String>,
    pub lock_pin: Option<Option<String>>,
    pub gstin: Option<Option<String>>,
    pub invoice_prefix: Option<String>,
    pub tax_enabled: Option<bool>,
}
