//! Category display formatting
//!
//! Formats the shared category registry, grouped by kind.

use crate::models::{Category, EntryKind};

/// Format categories as a tree with one branch per kind
pub fn format_category_tree(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.".to_string();
    }

    let mut output = String::new();

    for (i, kind) in [EntryKind::Income, EntryKind::Expense].iter().enumerate() {
        let in_kind: Vec<&Category> = categories.iter().filter(|c| c.kind == *kind).collect();

        output.push_str(match kind {
            EntryKind::Income => "Income\n",
            EntryKind::Expense => "Expense\n",
        });

        if in_kind.is_empty() {
            output.push_str("  (no categories)\n");
        } else {
            for (j, category) in in_kind.iter().enumerate() {
                let prefix = if j == in_kind.len() - 1 { "└── " } else { "├── " };
                let icon = if category.icon.is_empty() {
                    String::new()
                } else {
                    format!("{} ", category.icon)
                };
                output.push_str(&format!("  {}{}{}\n", prefix, icon, category.name));
            }
        }

        if i == 0 {
            output.push('\n');
        }
    }

    output
}

/// Format a simple list of categories
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.".to_string();
    }

    let name_width = categories
        .iter()
        .map(|c| c.name.len())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<width$}  {:<7}  {}\n",
        "Category",
        "Kind",
        "ID",
        width = name_width
    ));
    output.push_str(&format!(
        "{:-<width$}  {:-<7}  {:-<36}\n",
        "",
        "",
        "",
        width = name_width
    ));

    for category in categories {
        output.push_str(&format!(
            "{:<width$}  {:<7}  {}\n",
            category.name,
            category.kind,
            category.id.as_uuid(),
            width = name_width
        ));
    }

    output
}

/// Format category details
pub fn format_category_details(category: &Category) -> String {
    let mut output = String::new();

    output.push_str(&format!("Category: {}\n", category.name));
    output.push_str(&format!("  ID:       {}\n", category.id.as_uuid()));
    output.push_str(&format!("  Kind:     {}\n", category.kind));
    if !category.icon.is_empty() {
        output.push_str(&format!("  Icon:     {}\n", category.icon));
    }

    output.push('\n');
    output.push_str(&format!(
        "  Created:  {}\n",
        category.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push_str(&format!(
        "  Modified: {}\n",
        category.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_empty_tree() {
        let output = format_category_tree(&[]);
        assert!(output.contains("No categories found"));
    }

    #[test]
    fn test_format_category_tree() {
        let categories = vec![
            Category::new("Salary", EntryKind::Income, ""),
            Category::new("Rent", EntryKind::Expense, "🏠"),
            Category::new("Food", EntryKind::Expense, ""),
        ];

        let output = format_category_tree(&categories);
        let income_at = output.find("Income").unwrap();
        let expense_at = output.find("Expense").unwrap();
        let salary_at = output.find("Salary").unwrap();
        let rent_at = output.find("Rent").unwrap();

        assert!(income_at < salary_at && salary_at < expense_at);
        assert!(expense_at < rent_at);
        assert!(output.contains("├── 🏠 Rent"));
        assert!(output.contains("└── Food"));
    }

    #[test]
    fn test_tree_marks_empty_kind() {
        let categories = vec![Category::new("Rent", EntryKind::Expense, "")];
        let output = format_category_tree(&categories);
        assert!(output.starts_with("Income\n  (no categories)\n"));
    }

    #[test]
    fn test_format_list() {
        let category = Category::new("Groceries", EntryKind::Expense, "");
        let output = format_category_list(&[category.clone()]);
        assert!(output.contains("Groceries"));
        assert!(output.contains("expense"));
        assert!(output.contains(&category.id.as_uuid().to_string()));
    }
}
