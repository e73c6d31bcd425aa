//! Dashboard finance totals computed from fetched records.

use std::collections::BTreeMap;

use madrasa_core::status::{EXPENSE_APPROVED, PAYMENT_PENDING, PAYMENT_VERIFIED};
use serde::Serialize;

use crate::models::{Donation, Expense, Payment};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSummary {
    /// Verified payments.
    pub collected: f64,
    /// Payments awaiting verification.
    pub pending: f64,
    /// Approved expenses.
    pub expenses: f64,
    pub donations: f64,
    /// `collected + donations - expenses`.
    pub net_balance: f64,
    /// Approved expense totals keyed by category.
    pub expenses_by_category: BTreeMap<String, f64>,
}

impl FinanceSummary {
    pub fn compute(payments: &[Payment], expenses: &[Expense], donations: &[Donation]) -> Self {
        let collected = sum_payments(payments, PAYMENT_VERIFIED);
        let pending = sum_payments(payments, PAYMENT_PENDING);

        let mut expenses_by_category = BTreeMap::new();
        let mut expense_total = 0.0;
        for expense in expenses.iter().filter(|e| e.status == EXPENSE_APPROVED) {
            expense_total += expense.amount;
            *expenses_by_category
                .entry(expense.category.clone())
                .or_insert(0.0) += expense.amount;
        }

        let donation_total: f64 = donations.iter().map(|d| d.amount).sum();

        Self {
            collected,
            pending,
            expenses: expense_total,
            donations: donation_total,
            net_balance: collected + donation_total - expense_total,
            expenses_by_category,
        }
    }
}

fn sum_payments(payments: &[Payment], status: &str) -> f64 {
    payments
        .iter()
        .filter(|p| p.status == status)
        .map(|p| p.amount)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use serde_json::{json, Value};

    fn from<R: Record>(value: Value) -> R {
        R::from_row(value.as_object().unwrap())
    }

    #[test]
    fn totals_respect_status() {
        let payments: Vec<Payment> = vec![
            from(json!({"amount": 500, "status": "verified"})),
            from(json!({"amount": 300, "status": "pending"})),
            from(json!({"amount": 200, "status": "rejected"})),
        ];
        let expenses: Vec<Expense> = vec![
            from(json!({"amount": 150, "status": "approved", "category": "utilities"})),
            from(json!({"amount": 50, "status": "approved", "category": "utilities"})),
            from(json!({"amount": 80, "status": "approved", "category": "food"})),
            from(json!({"amount": 999, "status": "pending", "category": "food"})),
        ];
        let donations: Vec<Donation> = vec![from(json!({"amount": 1000}))];

        let summary = FinanceSummary::compute(&payments, &expenses, &donations);
        assert_eq!(summary.collected, 500.0);
        assert_eq!(summary.pending, 300.0);
        assert_eq!(summary.expenses, 280.0);
        assert_eq!(summary.donations, 1000.0);
        assert_eq!(summary.net_balance, 1220.0);
        assert_eq!(summary.expenses_by_category["utilities"], 200.0);
        assert_eq!(summary.expenses_by_category["food"], 80.0);
    }

    #[test]
    fn empty_inputs_are_zero() {
        assert_eq!(FinanceSummary::compute(&[], &[], &[]), FinanceSummary::default());
    }
}
