//! Credit (udhaar) tracking: amounts owed between the business and a party.
//!
//! A credit's `status` and — once payments exist — its `paid_amount` are
//! computed projections, not authoritative state. Every mutation path and the
//! load-time pass recompute them; a caller-supplied status is never trusted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, Money, PaymentMethod};

/// Direction of a credit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditKind {
    /// A customer owes the business.
    Given,
    /// The business owes a supplier.
    Taken,
}

impl CreditKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Given => "given",
            Self::Taken => "taken",
        }
    }
}

impl TryFrom<&str> for CreditKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "given" => Ok(Self::Given),
            "taken" => Ok(Self::Taken),
            other => Err(LedgerError::Validation(format!(
                "invalid credit kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditStatus {
    Pending,
    Paid,
}

/// A repayment against a credit. Appended, never mutated or removed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditPayment {
    pub id: Uuid,
    pub amount: Money,
    pub payment_mode: PaymentMethod,
    pub date: NaiveDate,
}

/// A tracked amount owed to or by the business.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credit {
    pub id: Uuid,
    pub party: String,
    #[serde(rename = "type")]
    pub kind: CreditKind,
    pub amount: Money,
    #[serde(default)]
    pub paid_amount: Money,
    pub status: CreditStatus,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_sale_id: Option<Uuid>,
    #[serde(default)]
    pub payments: Vec<CreditPayment>,
}

impl Credit {
    /// The status invariant: `paid_amount >= amount` means paid.
    #[must_use]
    pub fn derived_status(&self) -> CreditStatus {
        if self.paid_amount >= self.amount {
            CreditStatus::Paid
        } else {
            CreditStatus::Pending
        }
    }

    /// Recomputes the stored projections from the payment list.
    ///
    /// `paid_amount` is overwritten with the payment sum whenever payments
    /// exist (a credit created by a partial-payment sale starts with zero
    /// payments and zero paid). `status` is always overwritten.
    pub fn recompute(&mut self) {
        if !self.payments.is_empty() {
            self.paid_amount = self.payments.iter().map(|p| p.amount).sum();
        }
        self.status = self.derived_status();
    }

    /// Remaining balance owed on this credit.
    #[must_use]
    pub fn outstanding(&self) -> Money {
        self.amount.saturating_sub_zero(self.paid_amount)
    }

    /// Closes the credit by forgiving the outstanding balance: the amount is
    /// lowered to whatever was actually paid and the status forced to paid.
    pub fn force_close(&mut self) {
        self.amount = self.paid_amount;
        self.status = CreditStatus::Paid;
    }
}
