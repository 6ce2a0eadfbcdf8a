//! Summary figures derived from a transaction list.
//!
//! Everything here is recomputed from scratch on each call. Pass either
//! `store.transactions()` or the output of `Store::list_transactions`.
//! Sums saturate at `Decimal::MAX` instead of overflowing.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::models::Transaction;

pub fn total_spend<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Decimal {
    transactions
        .into_iter()
        .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.amount))
}

/// Summed amount per category. Categories without transactions are absent.
pub fn spend_by_category<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> HashMap<String, Decimal> {
    let mut totals: HashMap<String, Decimal> = HashMap::new();
    for txn in transactions {
        let total = totals.entry(txn.category.clone()).or_default();
        *total = total.saturating_add(txn.amount);
    }
    totals
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub amount: Decimal,
    /// 0.0..=100.0
    pub percent: f64,
}

/// Per-category totals with their share of the grand total, largest first.
pub fn category_shares<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Vec<CategoryShare> {
    let totals = spend_by_category(transactions);
    let grand = totals
        .values()
        .fold(Decimal::ZERO, |acc, amount| acc.saturating_add(*amount));

    let mut shares: Vec<CategoryShare> = totals
        .into_iter()
        .map(|(category, amount)| {
            let percent = amount
                .checked_div(grand)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .and_then(|p| p.to_f64())
                .unwrap_or(0.0);
            CategoryShare {
                category,
                amount,
                percent,
            }
        })
        .collect();
    shares.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });
    shares
}

/// Everything the dashboard and `summary` command show.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total: Decimal,
    pub count: usize,
    pub shares: Vec<CategoryShare>,
}

impl Summary {
    pub fn of(transactions: &[&Transaction]) -> Self {
        Self {
            total: total_spend(transactions.iter().copied()),
            count: transactions.len(),
            shares: category_shares(transactions.iter().copied()),
        }
    }
}
