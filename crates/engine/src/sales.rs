//! Sale records and their line items.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, Money};

/// Payment channel of a sale, expense or credit payment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    Cash,
    #[serde(rename = "UPI")]
    Upi,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Upi => "UPI",
        }
    }
}

impl TryFrom<&str> for PaymentMethod {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Cash" | "cash" => Ok(Self::Cash),
            "UPI" | "upi" => Ok(Self::Upi),
            other => Err(LedgerError::Validation(format!(
                "invalid payment method: {other}"
            ))),
        }
    }
}

/// One line of a sale. Also stored verbatim inside a [`SaleReturn`] as the
/// snapshot of what was sold.
///
/// [`SaleReturn`]: crate::SaleReturn
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub product_id: Uuid,
    pub quantity: i64,
    pub unit_price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<Money>,
}

impl SaleItem {
    pub fn new(product_id: Uuid, quantity: i64, unit_price: Money) -> Self {
        Self {
            product_id,
            quantity,
            unit_price,
            cost_price: None,
        }
    }
}

/// Optional invoice/tax breakdown attached to a sale.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Billing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_total: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_total: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cgst: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sgst: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub igst: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
}

/// A recorded sale.
///
/// `total_amount` is the grand total after discount/tax. A partially paid
/// sale (`paid_amount < total_amount`) carries the id of the credit that was
/// auto-created for the shortfall in `linked_credit_id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    pub date: NaiveDate,
    /// Blank for anonymous walk-in sales; required when partially paid.
    #[serde(default)]
    pub customer_name: String,
    pub total_amount: Money,
    /// `None` on legacy records imported from old backups; readers fall back
    /// to `total_amount`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_amount: Option<Money>,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_credit_id: Option<Uuid>,
    #[serde(default)]
    pub items: Vec<SaleItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing: Option<Billing>,
}

impl Sale {
    /// Amount actually received for this sale, falling back to the total for
    /// legacy records that never stored a paid amount.
    #[must_use]
    pub fn effective_paid(&self) -> Money {
        self.paid_amount.unwrap_or(self.total_amount)
    }

    /// Shortfall still owed by the customer at creation time.
    #[must_use]
    pub fn outstanding(&self) -> Money {
        self.total_amount.saturating_sub_zero(self.effective_paid())
    }

    #[must_use]
    pub fn is_partially_paid(&self) -> bool {
        self.effective_paid() < self.total_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(total: i64, paid: Option<i64>) -> Sale {
        Sale {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2026, 2, 14).unwrap(),
            customer_name: "Amit".to_string(),
            total_amount: Money::new(total),
            paid_amount: paid.map(Money::new),
            payment_method: PaymentMethod::Cash,
            note: None,
            linked_credit_id: None,
            items: Vec::new(),
            billing: None,
        }
    }

    #[test]
    fn effective_paid_falls_back_to_total() {
        assert_eq!(sale(1000, None).effective_paid(), Money::new(1000));
        assert_eq!(sale(1000, Some(400)).effective_paid(), Money::new(400));
    }

    #[test]
    fn outstanding_is_shortfall() {
        assert_eq!(sale(1000, Some(400)).outstanding(), Money::new(600));
        assert_eq!(sale(1000, Some(1000)).outstanding(), Money::ZERO);
        assert!(!sale(1000, None).is_partially_paid());
    }

    #[test]
    fn payment_method_round_trips_upi_spelling() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Upi).unwrap(),
            "\"UPI\""
        );
        assert_eq!(PaymentMethod::try_from("UPI").unwrap(), PaymentMethod::Upi);
        assert!(PaymentMethod::try_from("card").is_err());
    }
}
