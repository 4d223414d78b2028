//! Transaction display formatting
//!
//! Provides utilities for formatting ledger transactions for terminal
//! display, including register views with a running total.

use std::collections::HashMap;

use crate::models::{CategoryId, Money, Transaction};

/// Format a single transaction for display (register row)
pub fn format_transaction_row(txn: &Transaction, category_name: &str) -> String {
    let description: &str = if txn.description.is_empty() {
        "(no description)"
    } else {
        &txn.description
    };

    format!(
        "{} {} {} {:>12}  {}",
        txn.date.format("%Y-%m-%d"),
        truncate(category_name, 16),
        truncate(description, 24),
        txn.amount,
        txn.id.as_uuid()
    )
}

/// Format a list of transactions as a register
///
/// `category_names` maps category ids to display names; unknown ids render
/// as "(unknown)".
pub fn format_transaction_register(
    transactions: &[Transaction],
    category_names: &HashMap<CategoryId, String>,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:10} {:16} {:24} {:>12}  {}\n",
        "Date", "Category", "Description", "Amount", "ID"
    ));
    output.push_str(&"-".repeat(65));
    output.push('\n');

    let mut net = Money::zero();
    for txn in transactions {
        let name = category_names
            .get(&txn.category_id)
            .map(String::as_str)
            .unwrap_or("(unknown)");
        output.push_str(&format_transaction_row(txn, name));
        output.push('\n');
        net += txn.amount;
    }

    output.push_str(&"-".repeat(65));
    output.push('\n');
    output.push_str(&format!("{:>52} {:>12}\n", "Net:", net));

    output
}

/// Format transaction details for display
pub fn format_transaction_details(
    txn: &Transaction,
    account_name: &str,
    category_name: &str,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id.as_uuid()));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d")));
    output.push_str(&format!("Amount:      {}\n", txn.amount));
    output.push_str(&format!("Kind:        {}\n", txn.kind));
    output.push_str(&format!("Account:     {}\n", account_name));
    output.push_str(&format!("Category:    {}\n", category_name));

    if !txn.description.is_empty() {
        output.push_str(&format!("Description: {}\n", txn.description));
    }

    output
}

/// Truncate a string to a maximum length, padding shorter ones
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        format!("{:width$}", s, width = max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
