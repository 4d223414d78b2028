//! Report service
//!
//! Pulls the ledger's filtered transactions for an owner and hands them to
//! the folds in [`crate::reports`]. Never mutates anything.
//!
//! A report covers every account and category unless it is given a scope:
//! a [`TransactionFilter`] whose account and category are merged with the
//! report's date range.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{BudgetId, DateRange, UserId};
use crate::reports::{BudgetStatus, IncomeVsExpenseReport, Report, ReportKind, SpendingReport};
use crate::storage::Storage;

use super::account::AccountService;
use super::budget::BudgetService;
use super::transaction::{TransactionFilter, TransactionService};

/// Service for generating reports
pub struct ReportService<'a> {
    storage: &'a Storage,
}

impl<'a> ReportService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Generate a report from raw inputs
    ///
    /// Unknown report kinds and ranges that end before they start are
    /// validation errors. `scope` narrows the transactions by account and
    /// category; its own date range, kind and limit are ignored.
    pub fn generate(
        &self,
        owner: UserId,
        kind: &str,
        start: NaiveDate,
        end: NaiveDate,
        scope: &TransactionFilter,
    ) -> LedgerResult<Report> {
        let kind = ReportKind::parse(kind).ok_or_else(|| {
            debug!(kind, "rejected report kind");
            LedgerError::Validation(format!("Unsupported report kind: {}", kind))
        })?;
        let range = DateRange::new(start, end).map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.generate_report(owner, kind, range, scope)
    }

    /// Generate a report of a known kind
    pub fn generate_report(
        &self,
        owner: UserId,
        kind: ReportKind,
        range: DateRange,
        scope: &TransactionFilter,
    ) -> LedgerResult<Report> {
        let filter = self.scoped_filter(owner, range, scope)?;
        let transactions = TransactionService::new(self.storage).query(owner, &filter)?;

        let report = match kind {
            ReportKind::SpendingByCategory => {
                let categories = self.storage.categories.list()?;
                Report::SpendingByCategory(SpendingReport::from_transactions(
                    range,
                    &transactions,
                    &categories,
                ))
            }
            ReportKind::IncomeVsExpense => Report::IncomeVsExpense(
                IncomeVsExpenseReport::from_transactions(range, &transactions),
            ),
        };

        debug!(owner = %owner, kind = %kind, %range, transactions = transactions.len(), "generated report");
        Ok(report)
    }

    /// The date range plus the scope's account and category, each checked
    /// to exist so a typo is an error rather than an empty report
    fn scoped_filter(
        &self,
        owner: UserId,
        range: DateRange,
        scope: &TransactionFilter,
    ) -> LedgerResult<TransactionFilter> {
        let mut filter = TransactionFilter::new().date_range(range);

        if let Some(account_id) = scope.account_id {
            AccountService::new(self.storage).get(account_id, owner)?;
            filter = filter.account(account_id);
        }
        if let Some(category_id) = scope.category_id {
            self.storage
                .categories
                .get(category_id)?
                .ok_or_else(|| LedgerError::category_not_found(category_id.to_string()))?;
            filter = filter.category(category_id);
        }

        Ok(filter)
    }

    /// Spend against one of `owner`'s budgets over its own date range
    pub fn budget_status(&self, owner: UserId, budget_id: BudgetId) -> LedgerResult<BudgetStatus> {
        let budget = BudgetService::new(self.storage).get(budget_id, owner)?;
        let range = DateRange::new(budget.start_date, budget.end_date)
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let transactions = TransactionService::new(self.storage)
            .query(owner, &TransactionFilter::new().date_range(range))?;

        Ok(BudgetStatus::from_transactions(&budget, range, &transactions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, User};
    use crate::services::{
        AccountService, BudgetInput, CategoryService, CreateTransactionInput,
    };
    use rust_decimal_macros::dec;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    struct Ledger {
        storage: Storage,
        owner: UserId,
    }

    impl Ledger {
        fn new() -> Self {
            let storage = Storage::in_memory();
            let owner = storage.users.insert(User::new("alice")).unwrap().id;
            Self { storage, owner }
        }

        fn post(&self, account: &crate::models::Account, category: &crate::models::Category, amount: Money, on: NaiveDate) {
            TransactionService::new(&self.storage)
                .create(
                    self.owner,
                    CreateTransactionInput {
                        account_id: account.id,
                        category_id: category.id,
                        amount,
                        date: on,
                        description: String::new(),
                        kind: category.kind.as_str().into(),
                    },
                )
                .unwrap();
        }
    }

    #[test]
    fn test_reports_over_range() {
        let ledger = Ledger::new();
        let account = AccountService::new(&ledger.storage)
            .create(ledger.owner, "Checking", Money::zero(), "Checking")
            .unwrap();
        let categories = CategoryService::new(&ledger.storage);
        let salary = categories.create("Salary", "income", "").unwrap();
        let rent = categories.create("Rent", "expense", "").unwrap();
        let food = categories.create("Food", "expense", "").unwrap();

        ledger.post(&account, &salary, Money::new(dec!(3000)), date(1, 1));
        ledger.post(&account, &rent, Money::new(dec!(1200)), date(1, 2));
        ledger.post(&account, &food, Money::new(dec!(300)), date(1, 15));
        ledger.post(&account, &food, Money::new(dec!(999)), date(2, 1));

        let service = ReportService::new(&ledger.storage);

        let report = service
            .generate(ledger.owner, "income_vs_expense", date(1, 1), date(1, 31), &TransactionFilter::new())
            .unwrap();
        match report {
            Report::IncomeVsExpense(r) => {
                assert_eq!(r.total_income, Money::new(dec!(3000)));
                assert_eq!(r.total_expense, Money::new(dec!(1500)));
                assert_eq!(r.net_flow, Money::new(dec!(1500)));
            }
            other => panic!("unexpected report: {:?}", other),
        }

        let report = service
            .generate(ledger.owner, "spending_by_category", date(1, 1), date(1, 31), &TransactionFilter::new())
            .unwrap();
        match report {
            Report::SpendingByCategory(r) => {
                assert_eq!(r.categories.len(), 2);
                assert_eq!(r.categories[0].category_name, "Rent");
                assert_eq!(r.total_spending, Money::new(dec!(1500)));
            }
            other => panic!("unexpected report: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_requests() {
        let ledger = Ledger::new();
        let service = ReportService::new(&ledger.storage);

        assert!(service
            .generate(ledger.owner, "net_worth", date(1, 1), date(1, 31), &TransactionFilter::new())
            .unwrap_err()
            .is_validation());
        assert!(service
            .generate(ledger.owner, "income_vs_expense", date(2, 1), date(1, 1), &TransactionFilter::new())
            .unwrap_err()
            .is_validation());
        assert!(service
            .generate(UserId::new(), "income_vs_expense", date(1, 1), date(1, 31), &TransactionFilter::new())
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_budget_status() {
        let ledger = Ledger::new();
        let account = AccountService::new(&ledger.storage)
            .create(ledger.owner, "Checking", Money::new(dec!(1000)), "Checking")
            .unwrap();
        let food = CategoryService::new(&ledger.storage)
            .create("Food", "expense", "")
            .unwrap();

        let budget = BudgetService::new(&ledger.storage)
            .create(
                ledger.owner,
                BudgetInput {
                    name: "Groceries".into(),
                    limit_amount: Money::new(dec!(200)),
                    start_date: date(1, 1),
                    end_date: date(1, 31),
                    category_ids: vec![food.id],
                },
            )
            .unwrap();

        ledger.post(&account, &food, Money::new(dec!(150)), date(1, 10));
        ledger.post(&account, &food, Money::new(dec!(80)), date(1, 20));
        ledger.post(&account, &food, Money::new(dec!(500)), date(2, 1));

        let status = ReportService::new(&ledger.storage)
            .budget_status(ledger.owner, budget.id)
            .unwrap();
        assert_eq!(status.spent, Money::new(dec!(230)));
        assert_eq!(status.remaining, Money::new(dec!(-30)));
        assert!(status.over_limit);
    }

    #[test]
    fn test_report_scoped_to_account_and_category() {
        let ledger = Ledger::new();
        let accounts = AccountService::new(&ledger.storage);
        let checking = accounts
            .create(ledger.owner, "Checking", Money::zero(), "Checking")
            .unwrap();
        let card = accounts
            .create(ledger.owner, "Card", Money::zero(), "Credit Card")
            .unwrap();
        let categories = CategoryService::new(&ledger.storage);
        let salary = categories.create("Salary", "income", "").unwrap();
        let food = categories.create("Food", "expense", "").unwrap();
        let fuel = categories.create("Fuel", "expense", "").unwrap();

        ledger.post(&checking, &salary, Money::new(dec!(2000)), date(3, 1));
        ledger.post(&checking, &food, Money::new(dec!(120)), date(3, 5));
        ledger.post(&card, &food, Money::new(dec!(80)), date(3, 6));
        ledger.post(&card, &fuel, Money::new(dec!(60)), date(3, 7));

        let service = ReportService::new(&ledger.storage);
        let march = (date(3, 1), date(3, 31));

        let on_card = TransactionFilter::new().account(card.id);
        match service
            .generate(ledger.owner, "income_vs_expense", march.0, march.1, &on_card)
            .unwrap()
        {
            Report::IncomeVsExpense(r) => {
                assert_eq!(r.total_income, Money::zero());
                assert_eq!(r.total_expense, Money::new(dec!(140)));
            }
            other => panic!("unexpected report: {:?}", other),
        }

        // Scope's own range and limit do not override the report's
        let food_only = TransactionFilter::new()
            .category(food.id)
            .date_range(DateRange::month(2025, 1).unwrap())
            .limit(1);
        match service
            .generate(ledger.owner, "spending_by_category", march.0, march.1, &food_only)
            .unwrap()
        {
            Report::SpendingByCategory(r) => {
                assert_eq!(r.categories.len(), 1);
                assert_eq!(r.total_spending, Money::new(dec!(200)));
                assert_eq!(r.total_transactions, 2);
            }
            other => panic!("unexpected report: {:?}", other),
        }

        let unknown_account = TransactionFilter::new().account(crate::models::AccountId::new());
        assert!(service
            .generate(ledger.owner, "income_vs_expense", march.0, march.1, &unknown_account)
            .unwrap_err()
            .is_not_found());

        let unknown_category = TransactionFilter::new().category(crate::models::CategoryId::new());
        assert!(service
            .generate(ledger.owner, "income_vs_expense", march.0, march.1, &unknown_category)
            .unwrap_err()
            .is_not_found());
    }
}
