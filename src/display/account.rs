//! Account display formatting
//!
//! Formats accounts for terminal output in table and detail views.

use crate::models::{Account, Money};

/// Format a list of accounts as a table with a total row
pub fn format_account_list(accounts: &[Account]) -> String {
    if accounts.is_empty() {
        return "No accounts found.".to_string();
    }

    let name_width = accounts
        .iter()
        .map(|a| a.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let type_width = accounts
        .iter()
        .map(|a| a.account_type.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<type_width$}  {:>14}  {}\n",
        "Name",
        "Type",
        "Balance",
        "Status",
        name_width = name_width,
        type_width = type_width,
    ));

    output.push_str(&format!(
        "{:-<name_width$}  {:-<type_width$}  {:->14}  {:-<8}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
        type_width = type_width,
    ));

    for account in accounts {
        let status = if account.active { "" } else { "Inactive" };
        output.push_str(&format!(
            "{:<name_width$}  {:<type_width$}  {:>14}  {}\n",
            account.name,
            account.account_type,
            account.balance.to_string(),
            status,
            name_width = name_width,
            type_width = type_width,
        ));
    }

    let total: Money = accounts
        .iter()
        .filter(|a| a.active)
        .map(|a| a.balance)
        .sum();

    output.push_str(&format!(
        "{:-<name_width$}  {:-<type_width$}  {:->14}  {:-<8}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
        type_width = type_width,
    ));
    output.push_str(&format!(
        "{:<name_width$}  {:<type_width$}  {:>14}\n",
        "TOTAL",
        "",
        total.to_string(),
        name_width = name_width,
        type_width = type_width,
    ));

    output
}

/// Format a single account's details
pub fn format_account_details(account: &Account) -> String {
    let mut output = String::new();

    output.push_str(&format!("Account: {}\n", account.name));
    output.push_str(&format!("  Type:            {}\n", account.account_type));
    output.push_str(&format!("  ID:              {}\n", account.id.as_uuid()));
    output.push_str(&format!("  Balance:         {}\n", account.balance));
    output.push_str(&format!("  Opening Balance: {}\n", account.opening_balance));
    output.push_str(&format!(
        "  Active:          {}\n",
        if account.active { "Yes" } else { "No" }
    ));
    output.push_str(&format!(
        "  Created:         {}\n",
        account.created_at.format("%Y-%m-%d %H:%M")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserId;

    #[test]
    fn test_format_empty_list() {
        assert_eq!(format_account_list(&[]), "No accounts found.");
    }

    #[test]
    fn test_format_list_totals_active_accounts() {
        let owner = UserId::new();
        let checking = Account::new(owner, "Checking", "Checking", Money::from_cents(100000));
        let mut old = Account::new(owner, "Old Savings", "Savings", Money::from_cents(5000));
        old.active = false;

        let output = format_account_list(&[checking, old]);
        assert!(output.contains("Checking"));
        assert!(output.contains("Inactive"));
        assert!(output.contains("$1000.00"));
        assert!(output.lines().last().unwrap().contains("$1000.00"));
    }

    #[test]
    fn test_format_details() {
        let account = Account::new(UserId::new(), "Cash", "Cash", Money::from_cents(2500));
        let output = format_account_details(&account);
        assert!(output.contains("Account: Cash"));
        assert!(output.contains("$25.00"));
        assert!(output.contains("Active:          Yes"));
    }
}
