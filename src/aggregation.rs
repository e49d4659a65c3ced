//! Pure aggregation functions over transaction snapshots.
//!
//! Every function here takes an arbitrary slice, never mutates it, and is
//! order-independent: the results are plain commutative sums.

use std::collections::HashMap;

use crate::transaction::{Transaction, TransactionKind};

/// The sum of amounts for all transactions of `kind`. 0 for empty input.
pub fn total_by_kind(transactions: &[Transaction], kind: TransactionKind) -> f64 {
    transactions
        .iter()
        .filter(|t| t.kind == kind)
        .map(|t| t.amount)
        .sum()
}

/// Income total minus expense total.
pub fn net_balance(transactions: &[Transaction]) -> f64 {
    transactions.iter().map(Transaction::signed_amount).sum()
}

/// The sum of amounts per distinct category present in the input.
///
/// Categories are matched exactly as strings; categories with no matching
/// transactions are simply absent from the result.
pub fn totals_by_category(transactions: &[Transaction]) -> HashMap<String, f64> {
    let mut totals = HashMap::new();

    for transaction in transactions {
        *totals.entry(transaction.category.clone()).or_insert(0.0) += transaction.amount;
    }

    totals
}

/// Per-month income and expense totals, indexed 0=January..11=December.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MonthlyTotals {
    /// Income per month bucket.
    pub income: [f64; 12],
    /// Expenses per month bucket.
    pub expenses: [f64; 12],
}

/// Sum amounts into 12 month buckets by the month component of each date.
///
/// All years collapse onto the same buckets: a January 2023 entry and a
/// January 2024 entry land in bucket 0 together. That is deliberate,
/// inherited behavior, not a bug.
pub fn monthly_totals(transactions: &[Transaction]) -> MonthlyTotals {
    let mut totals = MonthlyTotals::default();

    for transaction in transactions {
        let bucket = u8::from(transaction.date.month()) as usize - 1;

        match transaction.kind {
            TransactionKind::Income => totals.income[bucket] += transaction.amount,
            TransactionKind::Expense => totals.expenses[bucket] += transaction.amount,
        }
    }

    totals
}
