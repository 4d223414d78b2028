//! Savings goal display formatting
//!
//! Goals render with a progress bar toward the target amount.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::models::FinancialGoal;

const BAR_WIDTH: usize = 20;

/// Fraction of the target saved, clamped to `[0, 1]`
fn progress(goal: &FinancialGoal) -> Decimal {
    let target = goal.target_amount.value();
    if target <= Decimal::ZERO {
        return Decimal::ONE;
    }
    (goal.current_amount.value() / target).clamp(Decimal::ZERO, Decimal::ONE)
}

/// Create a simple bar for a fraction in `[0, 1]`
pub fn format_bar(fraction: Decimal, width: usize) -> String {
    let filled = (fraction * Decimal::from(width))
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a list of goals with their progress
pub fn format_goal_list(goals: &[FinancialGoal]) -> String {
    if goals.is_empty() {
        return "No goals found.".to_string();
    }

    let name_width = goals
        .iter()
        .map(|g| g.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>12}  {:>12}  {:<10}  {}\n",
        "Goal",
        "Saved",
        "Target",
        "Deadline",
        "Progress",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->12}  {:->12}  {:-<10}  {:-<width$}\n",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
        width = BAR_WIDTH,
    ));

    for goal in goals {
        let marker = if goal.is_completed() { " done" } else { "" };
        output.push_str(&format!(
            "{:<name_width$}  {:>12}  {:>12}  {}  {}{}\n",
            goal.name,
            goal.current_amount.to_string(),
            goal.target_amount.to_string(),
            goal.deadline,
            format_bar(progress(goal), BAR_WIDTH),
            marker,
            name_width = name_width,
        ));
    }

    output
}

/// Format goal details
pub fn format_goal_details(goal: &FinancialGoal) -> String {
    let percent = (progress(goal) * Decimal::ONE_HUNDRED).round_dp(1);

    let mut output = String::new();
    output.push_str(&format!("Goal: {}\n", goal.name));
    output.push_str(&format!("  ID:        {}\n", goal.id.as_uuid()));
    output.push_str(&format!("  Target:    {}\n", goal.target_amount));
    output.push_str(&format!("  Saved:     {}\n", goal.current_amount));
    output.push_str(&format!("  Remaining: {}\n", goal.remaining()));
    output.push_str(&format!("  Deadline:  {}\n", goal.deadline));
    output.push_str(&format!(
        "  Progress:  {} {}%\n",
        format_bar(progress(goal), BAR_WIDTH),
        percent
    ));
    if goal.is_completed() {
        output.push_str("  Completed\n");
    }

    output
}
