//! Budget display formatting

use std::collections::HashMap;

use crate::models::{Budget, CategoryId};

/// Format a list of budgets as a table
pub fn format_budget_list(budgets: &[Budget]) -> String {
    if budgets.is_empty() {
        return "No budgets found.".to_string();
    }

    let name_width = budgets
        .iter()
        .map(|b| b.name.len())
        .max()
        .unwrap_or(6)
        .max(6);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>12}  {:<22}  {:>10}  {}\n",
        "Budget",
        "Limit",
        "Period",
        "Categories",
        "Status",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->12}  {:-<22}  {:->10}  {:-<8}\n",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for budget in budgets {
        output.push_str(&format!(
            "{:<name_width$}  {:>12}  {} to {}  {:>10}  {}\n",
            budget.name,
            budget.limit_amount.to_string(),
            budget.start_date,
            budget.end_date,
            budget.category_ids.len(),
            if budget.active { "" } else { "Inactive" },
            name_width = name_width,
        ));
    }

    output
}

/// Format a single budget, resolving category names where known
pub fn format_budget_details(budget: &Budget, category_names: &HashMap<CategoryId, String>) -> String {
    let mut output = String::new();

    output.push_str(&format!("Budget: {}\n", budget.name));
    output.push_str(&format!("  ID:     {}\n", budget.id.as_uuid()));
    output.push_str(&format!("  Limit:  {}\n", budget.limit_amount));
    output.push_str(&format!(
        "  Period: {} to {}\n",
        budget.start_date, budget.end_date
    ));
    output.push_str(&format!(
        "  Active: {}\n",
        if budget.active { "Yes" } else { "No" }
    ));

    output.push_str("  Categories:\n");
    for id in &budget.category_ids {
        match category_names.get(id) {
            Some(name) => output.push_str(&format!("    - {}\n", name)),
            None => output.push_str(&format!("    - {}\n", id)),
        }
    }

    output
}
