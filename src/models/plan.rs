//! Budget plan model
//!
//! A plan is either a spending cap over a date window (optionally limited to
//! one expense category) or a savings goal that accumulates contributions.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::category::same_name;
use super::ids::PlanId;
use super::money::Money;

/// What a plan tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanKind {
    /// Keep expenses in the window at or below the target
    Spending,
    /// Put aside the target amount by the end date
    Savings,
}

impl fmt::Display for PlanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spending => write!(f, "spending"),
            Self::Savings => write!(f, "savings"),
        }
    }
}

impl FromStr for PlanKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spending" | "budget" => Ok(Self::Spending),
            "savings" | "goal" => Ok(Self::Savings),
            other => Err(format!("Unknown plan kind: {}", other)),
        }
    }
}

/// A budget plan or savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetPlan {
    pub id: PlanId,
    pub name: String,
    pub kind: PlanKind,

    /// Expense category the cap applies to; `None` means all expenses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Always positive
    pub target: Money,

    pub start: NaiveDate,
    pub end: NaiveDate,

    /// Savings contributed so far (savings goals only)
    #[serde(default)]
    pub saved: Money,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BudgetPlan {
    pub fn new(
        name: impl Into<String>,
        kind: PlanKind,
        target: Money,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: PlanId::new(),
            name: name.into(),
            kind,
            category: None,
            target: target.abs(),
            start,
            end,
            saved: Money::zero(),
            comment: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `date` falls inside the plan window (inclusive)
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Whether the category of an expense counts toward this plan
    pub fn applies_to(&self, category: &str) -> bool {
        self.category
            .as_deref()
            .map_or(true, |c| same_name(c, category))
    }

    pub fn is_reached(&self) -> bool {
        self.kind == PlanKind::Savings && self.saved >= self.target
    }

    /// Add to (or withdraw from) the saved amount, never dropping below zero
    pub fn contribute(&mut self, amount: Money) {
        let next = self.saved + amount;
        self.saved = if next.is_negative() { Money::zero() } else { next };
        self.updated_at = Utc::now();
    }

    /// Amount still to save per remaining month to reach the goal by `end`
    ///
    /// The current month counts as one. Past the end date the whole
    /// remainder is due at once.
    pub fn monthly_contribution_needed(&self, today: NaiveDate) -> Money {
        let remaining = self.target - self.saved;
        if !remaining.is_positive() {
            return Money::zero();
        }

        let months = (self.end.year() - today.year()) * 12 + self.end.month() as i32
            - today.month() as i32
            + 1;
        if months <= 1 {
            return remaining;
        }

        Money::from_cents((remaining.cents() as f64 / months as f64).ceil() as i64)
    }

    /// Validate the plan
    pub fn validate(&self) -> Result<(), PlanValidationError> {
        if self.name.trim().is_empty() {
            return Err(PlanValidationError::EmptyName);
        }

        if !self.target.is_positive() {
            return Err(PlanValidationError::NonPositiveTarget);
        }

        if self.end < self.start {
            return Err(PlanValidationError::EndBeforeStart);
        }

        if self.kind == PlanKind::Savings && self.category.is_some() {
            return Err(PlanValidationError::CategoryOnSavings);
        }

        Ok(())
    }
}

impl fmt::Display for BudgetPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.name, self.kind, self.target)
    }
}

/// Validation errors for plans
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanValidationError {
    EmptyName,
    NonPositiveTarget,
    EndBeforeStart,
    CategoryOnSavings,
}

impl fmt::Display for PlanValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Plan name cannot be empty"),
            Self::NonPositiveTarget => write!(f, "Plan target must be greater than zero"),
            Self::EndBeforeStart => write!(f, "Plan end date is before its start date"),
            Self::CategoryOnSavings => write!(f, "Savings goals cannot be tied to a category"),
        }
    }
}

impl std::error::Error for PlanValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_contribute_floors_at_zero() {
        let mut goal = BudgetPlan::new(
            "Holiday",
            PlanKind::Savings,
            Money::from_cents(100000),
            d(2025, 1, 1),
            d(2025, 12, 31),
        );
        goal.contribute(Money::from_cents(40000));
        assert_eq!(goal.saved.cents(), 40000);

        goal.contribute(Money::from_cents(-50000));
        assert!(goal.saved.is_zero());

        goal.contribute(Money::from_cents(100000));
        assert!(goal.is_reached());
    }

    #[test]
    fn test_applies_to() {
        let mut plan = BudgetPlan::new(
            "Groceries cap",
            PlanKind::Spending,
            Money::from_cents(30000),
            d(2025, 1, 1),
            d(2025, 1, 31),
        );
        assert!(plan.applies_to("Anything"));

        plan.category = Some("Food".into());
        assert!(plan.applies_to("food"));
        assert!(!plan.applies_to("Transport"));
        assert!(plan.covers(d(2025, 1, 31)));
        assert!(!plan.covers(d(2025, 2, 1)));
    }

    #[test]
    fn test_monthly_contribution_needed() {
        let goal = BudgetPlan::new(
            "Laptop",
            PlanKind::Savings,
            Money::from_cents(120000),
            d(2025, 1, 1),
            d(2025, 12, 31),
        );
        // January through December: 12 months
        assert_eq!(goal.monthly_contribution_needed(d(2025, 1, 15)).cents(), 10000);
        // Final month: everything left
        assert_eq!(goal.monthly_contribution_needed(d(2025, 12, 1)).cents(), 120000);
        // Past the end
        assert_eq!(goal.monthly_contribution_needed(d(2026, 3, 1)).cents(), 120000);
    }

    #[test]
    fn test_validation() {
        let mut plan = BudgetPlan::new(
            "Goal",
            PlanKind::Savings,
            Money::from_cents(100),
            d(2025, 2, 1),
            d(2025, 1, 1),
        );
        assert_eq!(plan.validate(), Err(PlanValidationError::EndBeforeStart));

        plan.end = d(2025, 3, 1);
        plan.category = Some("Food".into());
        assert_eq!(plan.validate(), Err(PlanValidationError::CategoryOnSavings));

        plan.category = None;
        assert!(plan.validate().is_ok());
    }
}
