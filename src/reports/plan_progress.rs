//! Plan progress report
//!
//! Spending plans are measured against the expenses in their window,
//! savings goals against what has been put aside.

use std::fmt;

use chrono::NaiveDate;

use crate::error::BudgetResult;
use crate::models::{BudgetPlan, Expense, Money, PlanKind};
use crate::storage::Storage;

/// Where a plan stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStatus {
    OnTrack,
    /// Spending went over the cap
    Exceeded,
    /// Savings target met
    Reached,
    /// Window ended with a savings goal short of its target
    Expired,
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnTrack => write!(f, "On track"),
            Self::Exceeded => write!(f, "Exceeded"),
            Self::Reached => write!(f, "Reached"),
            Self::Expired => write!(f, "Expired"),
        }
    }
}

/// Progress for one plan
#[derive(Debug, Clone, PartialEq)]
pub struct PlanProgress {
    pub plan: BudgetPlan,
    /// Spent in the window (spending) or saved so far (savings), positive
    pub progress: Money,
    /// Target minus progress; negative once a spending cap is exceeded
    pub remaining: Money,
    /// Progress as a share of target, may exceed 100
    pub percent: f64,
    pub status: PlanStatus,
    /// Savings still needed per month to finish on time
    pub monthly_needed: Option<Money>,
}

impl PlanProgress {
    /// Measure a plan against a list of expenses as of `today`
    pub fn compute(plan: &BudgetPlan, expenses: &[Expense], today: NaiveDate) -> Self {
        let progress = match plan.kind {
            PlanKind::Spending => -expenses
                .iter()
                .filter(|e| plan.covers(e.date) && plan.applies_to(&e.category))
                .map(|e| e.amount)
                .sum::<Money>(),
            PlanKind::Savings => plan.saved,
        };

        let remaining = plan.target - progress;
        let percent = if plan.target.is_zero() {
            0.0
        } else {
            progress.cents() as f64 / plan.target.cents() as f64 * 100.0
        };

        let status = match plan.kind {
            PlanKind::Spending if progress > plan.target => PlanStatus::Exceeded,
            PlanKind::Spending => PlanStatus::OnTrack,
            PlanKind::Savings if plan.is_reached() => PlanStatus::Reached,
            PlanKind::Savings if today > plan.end => PlanStatus::Expired,
            PlanKind::Savings => PlanStatus::OnTrack,
        };

        let monthly_needed = (plan.kind == PlanKind::Savings && status == PlanStatus::OnTrack)
            .then(|| plan.monthly_contribution_needed(today));

        Self {
            plan: plan.clone(),
            progress,
            remaining,
            percent,
            status,
            monthly_needed,
        }
    }
}

/// Progress for every stored plan
#[derive(Debug, Clone)]
pub struct PlanProgressReport {
    pub as_of: NaiveDate,
    pub plans: Vec<PlanProgress>,
}

impl PlanProgressReport {
    pub fn generate(storage: &Storage, today: NaiveDate) -> BudgetResult<Self> {
        let expenses = storage.expenses.get_all()?;
        let plans = storage
            .plans
            .get_all()?
            .iter()
            .map(|p| PlanProgress::compute(p, &expenses, today))
            .collect();

        Ok(Self { as_of: today, plans })
    }

    /// Plans needing attention: exceeded caps and expired goals
    pub fn problems(&self) -> impl Iterator<Item = &PlanProgress> {
        self.plans
            .iter()
            .filter(|p| matches!(p.status, PlanStatus::Exceeded | PlanStatus::Expired))
    }
}
