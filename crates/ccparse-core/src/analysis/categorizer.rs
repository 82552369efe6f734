//! Transaction categorization and per-category spending.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

use super::fixed;
use crate::models::{Category, Transaction};
use crate::statement::rules::amounts::parse_amount;

lazy_static! {
    /// Keyword patterns in priority order; the first hit wins.
    static ref CATEGORY_PATTERNS: Vec<(Category, Regex)> = vec![
        (Category::FoodAndDining, r"(?i)swiggy|zomato|restaurant|cafe|food|dining|pizza|burger|mcdonald|kfc|domino|subway"),
        (Category::Shopping, r"(?i)amazon|flipkart|myntra|ajio|shopping|mall|store|retail|walmart|target"),
        (Category::Groceries, r"(?i)grocery|supermarket|dmart|bigbazaar|reliance\s*fresh|more|vegetables"),
        (Category::Fuel, r"(?i)petrol|fuel|gas|pump|shell|hp|bharat|indian\s*oil"),
        (Category::Entertainment, r"(?i)netflix|prime|hotstar|spotify|movie|cinema|theatre|pvr|inox|gaming"),
        (Category::BillsAndUtilities, r"(?i)electricity|water|gas|bill|utility|internet|broadband|mobile|recharge"),
        (Category::Travel, r"(?i)uber|ola|taxi|flight|airline|hotel|booking|travel|makemytrip|goibibo|irctc"),
        (Category::Healthcare, r"(?i)hospital|doctor|medical|pharmacy|medicine|health|clinic|apollo|fortis"),
        (Category::Education, r"(?i)school|college|university|course|education|tuition|book|udemy|coursera"),
        (Category::Insurance, r"(?i)insurance|policy|premium|lic|hdfc\s*life|icici\s*pru"),
    ]
    .into_iter()
    .map(|(category, pattern)| (category, Regex::new(pattern).unwrap()))
    .collect();
}

/// Category for a transaction description.
pub fn categorize(description: &str) -> Category {
    CATEGORY_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(description))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Others)
}

/// A copy of `transactions` with every category assigned.
pub fn categorize_transactions(transactions: &[Transaction]) -> Vec<Transaction> {
    transactions
        .iter()
        .map(|txn| Transaction {
            category: Some(categorize(&txn.description)),
            ..txn.clone()
        })
        .collect()
}

/// Spending total for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpending {
    pub category: Category,
    /// Sum of amounts, two decimals.
    pub amount: Decimal,
    /// Share of all spending, one decimal.
    pub percentage: Decimal,
}

/// Per-category totals, largest first.
///
/// Uncategorized transactions are categorized on the fly; unparseable
/// amounts count as zero. Sums saturate at `Decimal::MAX`.
pub fn category_spending(transactions: &[Transaction]) -> Vec<CategorySpending> {
    let mut totals: Vec<(Category, Decimal)> = Vec::new();
    let mut total = Decimal::ZERO;

    for txn in transactions {
        let category = txn.category.unwrap_or_else(|| categorize(&txn.description));
        let amount = parse_amount(&txn.amount).unwrap_or_default();
        total = total.saturating_add(amount);

        match totals.iter_mut().find(|(c, _)| *c == category) {
            Some((_, sum)) => *sum = sum.saturating_add(amount),
            None => totals.push((category, amount)),
        }
    }

    let mut spending: Vec<CategorySpending> = totals
        .into_iter()
        .map(|(category, amount)| {
            let percentage = amount
                .checked_div(total)
                .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
                .unwrap_or(Decimal::ZERO);
            CategorySpending {
                category,
                amount: fixed(amount, 2),
                percentage: fixed(percentage, 1),
            }
        })
        .collect();

    spending.sort_by(|a, b| b.amount.cmp(&a.amount));
    spending
}
