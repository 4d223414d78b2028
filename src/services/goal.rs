//! Goal service
//!
//! Savings goals. Completion is never stored: it is `current >= target`,
//! evaluated whenever a goal is read.
//!
//! Creating a goal whose current amount exceeds its target is rejected,
//! while an update with the same condition clamps the current amount down
//! to the target.

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{FinancialGoal, GoalId, Money, UserId};
use crate::storage::Storage;

use super::clock::{Clock, SystemClock};

/// Service for savings goals
pub struct GoalService<'a> {
    storage: &'a Storage,
    clock: Box<dyn Clock + 'a>,
}

/// Input for creating or replacing a goal
#[derive(Debug, Clone)]
pub struct GoalInput {
    pub name: String,
    pub target_amount: Money,
    pub current_amount: Money,
    pub deadline: NaiveDate,
}

impl GoalInput {
    /// Start from a goal's current values
    pub fn from_existing(goal: &FinancialGoal) -> Self {
        Self {
            name: goal.name.clone(),
            target_amount: goal.target_amount,
            current_amount: goal.current_amount,
            deadline: goal.deadline,
        }
    }
}

impl<'a> GoalService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self::with_clock(storage, SystemClock)
    }

    /// Use `clock` to decide what "today" is
    pub fn with_clock(storage: &'a Storage, clock: impl Clock + 'a) -> Self {
        Self {
            storage,
            clock: Box::new(clock),
        }
    }

    /// Create a goal for `owner`
    pub fn create(&self, owner: UserId, input: GoalInput) -> LedgerResult<FinancialGoal> {
        self.storage.users.require(owner)?;

        let goal = FinancialGoal::new(
            owner,
            input.name.trim(),
            input.target_amount,
            input.current_amount,
            input.deadline,
        );
        validate_fields(&goal)?;

        if goal.current_amount > goal.target_amount {
            debug!(owner = %owner, "rejected goal above target");
            return Err(LedgerError::Validation(format!(
                "Current amount {} cannot exceed target amount {}",
                goal.current_amount, goal.target_amount
            )));
        }
        self.check_deadline(&goal)?;

        self.storage.goals.commit_put(goal.clone())?;

        info!(
            goal_id = %goal.id,
            owner = %owner,
            target = %goal.target_amount,
            completed = goal.is_completed(),
            "created goal"
        );
        Ok(goal)
    }

    /// Get one of `owner`'s goals
    pub fn get(&self, id: GoalId, owner: UserId) -> LedgerResult<FinancialGoal> {
        self.storage.users.require(owner)?;
        self.resolve(id, owner)
    }

    /// Find a goal by ID string or name (case-insensitive)
    pub fn find(&self, owner: UserId, identifier: &str) -> LedgerResult<FinancialGoal> {
        if let Ok(id) = identifier.parse::<GoalId>() {
            return self.get(id, owner);
        }

        let wanted = identifier.trim().to_lowercase();
        self.list(owner)?
            .into_iter()
            .find(|g| g.name.to_lowercase() == wanted)
            .ok_or_else(|| LedgerError::goal_not_found(identifier.to_string()))
    }

    /// All of `owner`'s goals, oldest first
    pub fn list(&self, owner: UserId) -> LedgerResult<Vec<FinancialGoal>> {
        self.storage.users.require(owner)?;
        self.storage.goals.list(owner)
    }

    /// Replace a goal's definition; a current amount above target is clamped
    pub fn update(&self, id: GoalId, owner: UserId, input: GoalInput) -> LedgerResult<FinancialGoal> {
        self.storage.users.require(owner)?;

        let _writes = self.storage.lock_goals()?;
        let mut goal = self.resolve(id, owner)?;

        goal.name = input.name.trim().to_string();
        goal.target_amount = input.target_amount;
        goal.current_amount = input.current_amount;
        goal.deadline = input.deadline;
        validate_fields(&goal)?;

        if goal.current_amount > goal.target_amount {
            goal.current_amount = goal.target_amount;
        }
        self.check_deadline(&goal)?;

        goal.updated_at = Utc::now();
        self.storage.goals.commit_put(goal.clone())?;

        info!(goal_id = %id, owner = %owner, completed = goal.is_completed(), "updated goal");
        Ok(goal)
    }

    /// Add money to a goal that is not yet complete
    pub fn add_contribution(&self, id: GoalId, owner: UserId, amount: Money) -> LedgerResult<FinancialGoal> {
        self.storage.users.require(owner)?;

        if !amount.is_positive() {
            debug!(goal_id = %id, amount = %amount, "rejected contribution");
            return Err(LedgerError::Validation(format!(
                "Contribution must be positive, got {}",
                amount
            )));
        }

        let _writes = self.storage.lock_goals()?;
        let mut goal = self.resolve(id, owner)?;

        if goal.is_completed() {
            debug!(goal_id = %id, "rejected contribution to completed goal");
            return Err(LedgerError::Validation(format!(
                "Goal '{}' is already completed",
                goal.name
            )));
        }

        goal.contribute(amount)
            .map_err(|e| LedgerError::Validation(e.to_string()))?;
        self.storage.goals.commit_put(goal.clone())?;

        info!(
            goal_id = %id,
            owner = %owner,
            amount = %amount,
            current = %goal.current_amount,
            completed = goal.is_completed(),
            "added contribution"
        );
        Ok(goal)
    }

    /// Delete one of `owner`'s goals
    pub fn delete(&self, id: GoalId, owner: UserId) -> LedgerResult<FinancialGoal> {
        self.storage.users.require(owner)?;

        let _writes = self.storage.lock_goals()?;
        let goal = self.resolve(id, owner)?;

        self.storage.goals.commit_remove(owner, id)?;

        info!(goal_id = %id, owner = %owner, "deleted goal");
        Ok(goal)
    }

    /// A goal that is not complete must have a deadline from today on
    fn check_deadline(&self, goal: &FinancialGoal) -> LedgerResult<()> {
        let today = self.clock.today();
        if !goal.is_completed() && goal.deadline < today {
            debug!(goal_id = %goal.id, deadline = %goal.deadline, %today, "rejected past deadline");
            return Err(LedgerError::Validation(format!(
                "Deadline {} is in the past",
                goal.deadline
            )));
        }
        Ok(())
    }

    fn resolve(&self, id: GoalId, owner: UserId) -> LedgerResult<FinancialGoal> {
        let goal = self
            .storage
            .goals
            .get(owner, id)?
            .ok_or_else(|| LedgerError::goal_not_found(id.to_string()))?;

        if goal.owner_id != owner {
            return Err(LedgerError::Authorization(format!(
                "Goal {} does not belong to user {}",
                id, owner
            )));
        }
        Ok(goal)
    }
}

fn validate_fields(goal: &FinancialGoal) -> LedgerResult<()> {
    goal.validate().map_err(|e| {
        debug!(goal_id = %goal.id, error = %e, "rejected goal");
        LedgerError::Validation(e.to_string())
    })
}
