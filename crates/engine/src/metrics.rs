//! Derived financial metrics.
//!
//! Every function here is a stateless fold over the current [`Snapshot`] —
//! nothing is cached or incrementally maintained, so the results can never
//! drift from the collections they are derived from. "Today" is passed in as
//! a calendar date; dates compare directly with no timezone normalization.
//!
//! The zero-argument readers on [`Engine`] bind `on` to the local calendar
//! date and delegate here.
//!
//! [`Engine`]: crate::Engine

use chrono::NaiveDate;

use crate::{CreditKind, Money, PaymentMethod, Snapshot};

/// Sum of `total_amount` over today's sales.
pub fn today_sales(snapshot: &Snapshot, on: NaiveDate) -> Money {
    snapshot
        .sales
        .iter()
        .filter(|sale| sale.date == on)
        .map(|sale| sale.total_amount)
        .sum()
}

/// Sum of received amounts over today's sales on one payment channel.
pub fn today_received(snapshot: &Snapshot, on: NaiveDate, method: PaymentMethod) -> Money {
    snapshot
        .sales
        .iter()
        .filter(|sale| sale.date == on && sale.payment_method == method)
        .map(|sale| sale.effective_paid())
        .sum()
}

/// Sum of today's expense amounts.
pub fn today_expenses(snapshot: &Snapshot, on: NaiveDate) -> Money {
    snapshot
        .expenses
        .iter()
        .filter(|expense| expense.date == on)
        .map(|expense| expense.amount)
        .sum()
}

/// Total repayments collected on credits the business gave out.
pub fn credit_payments_received(snapshot: &Snapshot) -> Money {
    credit_paid_total(snapshot, CreditKind::Given)
}

/// Total repayments the business made on credits it took.
pub fn credit_payments_made(snapshot: &Snapshot) -> Money {
    credit_paid_total(snapshot, CreditKind::Taken)
}

fn credit_paid_total(snapshot: &Snapshot, kind: CreditKind) -> Money {
    snapshot
        .credits
        .iter()
        .filter(|credit| credit.kind == kind)
        .map(|credit| credit.paid_amount)
        .sum()
}

/// Overall account balance across every payment channel.
pub fn balance(snapshot: &Snapshot) -> Money {
    let sales: Money = snapshot.sales.iter().map(|sale| sale.effective_paid()).sum();
    let expenses: Money = snapshot.expenses.iter().map(|expense| expense.amount).sum();
    let refunds: Money = snapshot.returns.iter().map(|ret| ret.amount).sum();

    sales + credit_payments_received(snapshot)
        - expenses
        - credit_payments_made(snapshot)
        - refunds
}

/// The balance formula restricted to one payment channel.
///
/// Credits contribute per recorded payment (a credit can be repaid across
/// several modes over time). A return carries no payment mode of its own and
/// inherits the channel of its originating sale; when that sale has been
/// deleted the return cannot be attributed and is skipped here (it still
/// counts in [`balance`]).
pub fn channel_balance(snapshot: &Snapshot, method: PaymentMethod) -> Money {
    let sales: Money = snapshot
        .sales
        .iter()
        .filter(|sale| sale.payment_method == method)
        .map(|sale| sale.effective_paid())
        .sum();

    let expenses: Money = snapshot
        .expenses
        .iter()
        .filter(|expense| expense.payment_method == method)
        .map(|expense| expense.amount)
        .sum();

    let mut credit_in = Money::ZERO;
    let mut credit_out = Money::ZERO;
    for credit in &snapshot.credits {
        let via: Money = credit
            .payments
            .iter()
            .filter(|payment| payment.payment_mode == method)
            .map(|payment| payment.amount)
            .sum();
        match credit.kind {
            CreditKind::Given => credit_in += via,
            CreditKind::Taken => credit_out += via,
        }
    }

    let refunds: Money = snapshot
        .returns
        .iter()
        .filter(|ret| {
            snapshot
                .sale(ret.sale_id)
                .is_some_and(|sale| sale.payment_method == method)
        })
        .map(|ret| ret.amount)
        .sum();

    sales + credit_in - expenses - credit_out - refunds
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;
    use crate::{
        Credit, CreditPayment, CreditStatus, Expense, Sale, SaleReturn,
    };

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn sale(date: NaiveDate, total: i64, paid: Option<i64>, method: PaymentMethod) -> Sale {
        Sale {
            id: Uuid::new_v4(),
            date,
            customer_name: String::new(),
            total_amount: Money::new(total),
            paid_amount: paid.map(Money::new),
            payment_method: method,
            note: None,
            linked_credit_id: None,
            items: Vec::new(),
            billing: None,
        }
    }

    fn expense(date: NaiveDate, amount: i64, method: PaymentMethod) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            date,
            title: "rent".to_string(),
            amount: Money::new(amount),
            payment_method: method,
            vendor: None,
            category: None,
            note: None,
        }
    }

    fn credit(kind: CreditKind, paid_modes: &[(i64, PaymentMethod)]) -> Credit {
        let payments: Vec<CreditPayment> = paid_modes
            .iter()
            .map(|(amount, mode)| CreditPayment {
                id: Uuid::new_v4(),
                amount: Money::new(*amount),
                payment_mode: *mode,
                date: day(1),
            })
            .collect();
        let mut credit = Credit {
            id: Uuid::new_v4(),
            party: "Amit".to_string(),
            kind,
            amount: Money::new(10_000),
            paid_amount: Money::ZERO,
            status: CreditStatus::Pending,
            date: day(1),
            linked_sale_id: None,
            payments,
        };
        credit.recompute();
        credit
    }

    #[test]
    fn today_filters_by_date_string_equality() {
        let snapshot = Snapshot {
            sales: vec![
                sale(day(1), 1000, Some(1000), PaymentMethod::Cash),
                sale(day(2), 500, Some(500), PaymentMethod::Cash),
            ],
            ..Default::default()
        };
        assert_eq!(today_sales(&snapshot, day(1)), Money::new(1000));
        assert_eq!(today_sales(&snapshot, day(3)), Money::ZERO);
    }

    #[test]
    fn received_falls_back_to_total_for_legacy_sales() {
        let snapshot = Snapshot {
            sales: vec![
                sale(day(1), 1000, None, PaymentMethod::Cash),
                sale(day(1), 800, Some(300), PaymentMethod::Upi),
            ],
            ..Default::default()
        };
        assert_eq!(
            today_received(&snapshot, day(1), PaymentMethod::Cash),
            Money::new(1000)
        );
        assert_eq!(
            today_received(&snapshot, day(1), PaymentMethod::Upi),
            Money::new(300)
        );
    }

    #[test]
    fn balance_subtracts_expenses_from_received() {
        // one cash sale of 500, one expense of 200, no credits/returns
        let snapshot = Snapshot {
            sales: vec![sale(day(1), 500, Some(500), PaymentMethod::Cash)],
            expenses: vec![expense(day(1), 200, PaymentMethod::Cash)],
            ..Default::default()
        };
        assert_eq!(balance(&snapshot), Money::new(300));
        assert_eq!(
            channel_balance(&snapshot, PaymentMethod::Cash),
            Money::new(300)
        );
        assert_eq!(channel_balance(&snapshot, PaymentMethod::Upi), Money::ZERO);
    }

    #[test]
    fn balance_is_idempotent() {
        let snapshot = Snapshot {
            sales: vec![sale(day(1), 500, Some(500), PaymentMethod::Cash)],
            credits: vec![credit(CreditKind::Given, &[(200, PaymentMethod::Upi)])],
            ..Default::default()
        };
        assert_eq!(balance(&snapshot), balance(&snapshot));
    }

    #[test]
    fn credit_payments_split_by_kind_and_mode() {
        let snapshot = Snapshot {
            credits: vec![
                credit(
                    CreditKind::Given,
                    &[(200, PaymentMethod::Cash), (300, PaymentMethod::Upi)],
                ),
                credit(CreditKind::Taken, &[(150, PaymentMethod::Cash)]),
            ],
            ..Default::default()
        };
        assert_eq!(credit_payments_received(&snapshot), Money::new(500));
        assert_eq!(credit_payments_made(&snapshot), Money::new(150));
        // cash channel: +200 received, -150 made
        assert_eq!(
            channel_balance(&snapshot, PaymentMethod::Cash),
            Money::new(50)
        );
        assert_eq!(
            channel_balance(&snapshot, PaymentMethod::Upi),
            Money::new(300)
        );
    }

    #[test]
    fn returns_inherit_the_sale_channel() {
        let upi_sale = sale(day(1), 500, Some(500), PaymentMethod::Upi);
        let ret = SaleReturn {
            id: Uuid::new_v4(),
            sale_id: upi_sale.id,
            date: day(2),
            party: String::new(),
            amount: Money::new(500),
            note: None,
            items: Vec::new(),
        };
        let snapshot = Snapshot {
            sales: vec![upi_sale],
            returns: vec![ret],
            ..Default::default()
        };
        assert_eq!(balance(&snapshot), Money::ZERO);
        assert_eq!(channel_balance(&snapshot, PaymentMethod::Upi), Money::ZERO);
        assert_eq!(channel_balance(&snapshot, PaymentMethod::Cash), Money::ZERO);
    }

    #[test]
    fn orphaned_return_counts_in_balance_but_no_channel() {
        let ret = SaleReturn {
            id: Uuid::new_v4(),
            sale_id: Uuid::new_v4(),
            date: day(2),
            party: String::new(),
            amount: Money::new(500),
            note: None,
            items: Vec::new(),
        };
        let snapshot = Snapshot {
            sales: vec![sale(day(1), 1000, Some(1000), PaymentMethod::Cash)],
            returns: vec![ret],
            ..Default::default()
        };
        assert_eq!(balance(&snapshot), Money::new(500));
        assert_eq!(
            channel_balance(&snapshot, PaymentMethod::Cash),
            Money::new(1000)
        );
    }
}
