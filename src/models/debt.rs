//! Loan and borrowed-money records
//!
//! A `DebtRecord` is either money lent to someone (`Loan`) or money owed to
//! someone (`Borrowed`). Each record carries a sub-ledger of adjustment
//! entries: repayments reduce what is outstanding, increases add to it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{DebtEntryId, DebtId};
use super::money::Money;

/// Direction of the debt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtKind {
    /// Money I lent to the counterparty
    Loan,
    /// Money I borrowed from the counterparty
    Borrowed,
}

impl fmt::Display for DebtKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loan => write!(f, "loan"),
            Self::Borrowed => write!(f, "borrowed"),
        }
    }
}

/// Kind of adjustment in a record's sub-ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtEntryKind {
    Repayment,
    Increase,
}

impl fmt::Display for DebtEntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Repayment => write!(f, "repayment"),
            Self::Increase => write!(f, "increase"),
        }
    }
}

impl FromStr for DebtEntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "repayment" | "repay" | "payment" => Ok(Self::Repayment),
            "increase" | "add" => Ok(Self::Increase),
            other => Err(format!("Unknown entry kind: {}", other)),
        }
    }
}

/// One adjustment in a debt record's sub-ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtEntry {
    pub id: DebtEntryId,
    pub kind: DebtEntryKind,

    /// Always positive; `kind` decides the direction
    pub amount: Money,

    pub date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl DebtEntry {
    pub fn new(kind: DebtEntryKind, amount: Money, date: NaiveDate) -> Self {
        Self {
            id: DebtEntryId::new(),
            kind,
            amount: amount.abs(),
            date,
            comment: None,
        }
    }

    /// Effect of this entry on the outstanding balance
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            DebtEntryKind::Repayment => -self.amount,
            DebtEntryKind::Increase => self.amount,
        }
    }
}

/// A loan given or money borrowed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtRecord {
    pub id: DebtId,
    pub kind: DebtKind,

    /// Principal, always positive
    pub amount: Money,

    pub counterparty: String,
    pub issue_date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(default)]
    pub entries: Vec<DebtEntry>,

    /// Set once nothing is outstanding
    #[serde(default)]
    pub closed: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DebtRecord {
    pub fn new(
        kind: DebtKind,
        amount: Money,
        counterparty: impl Into<String>,
        issue_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: DebtId::new(),
            kind,
            amount: amount.abs(),
            counterparty: counterparty.into(),
            issue_date,
            due_date: None,
            comment: None,
            entries: Vec::new(),
            closed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Principal plus increases minus repayments
    pub fn outstanding(&self) -> Money {
        self.amount + self.entries.iter().map(DebtEntry::signed_amount).sum::<Money>()
    }

    /// Total repaid so far
    pub fn repaid(&self) -> Money {
        self.entries
            .iter()
            .filter(|e| e.kind == DebtEntryKind::Repayment)
            .map(|e| e.amount)
            .sum()
    }

    /// Still open and past its due date
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.closed && self.due_date.is_some_and(|due| due < today)
    }

    /// Recompute the closed flag from the ledger
    pub fn refresh_closed(&mut self) {
        self.closed = !self.outstanding().is_positive();
        self.updated_at = Utc::now();
    }

    /// Validate the record
    pub fn validate(&self) -> Result<(), DebtValidationError> {
        if self.counterparty.trim().is_empty() {
            return Err(DebtValidationError::EmptyCounterparty);
        }

        if !self.amount.is_positive() {
            return Err(DebtValidationError::NonPositiveAmount);
        }

        if let Some(due) = self.due_date {
            if due < self.issue_date {
                return Err(DebtValidationError::DueBeforeIssue {
                    issue: self.issue_date,
                    due,
                });
            }
        }

        if self.outstanding().is_negative() {
            return Err(DebtValidationError::NegativeOutstanding);
        }

        Ok(())
    }
}

impl fmt::Display for DebtRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.counterparty, self.outstanding(), self.kind)
    }
}

/// Validation errors for debt records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebtValidationError {
    EmptyCounterparty,
    NonPositiveAmount,
    DueBeforeIssue { issue: NaiveDate, due: NaiveDate },
    NegativeOutstanding,
}

impl fmt::Display for DebtValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCounterparty => write!(f, "Counterparty name cannot be empty"),
            Self::NonPositiveAmount => write!(f, "Amount must be greater than zero"),
            Self::DueBeforeIssue { issue, due } => {
                write!(f, "Due date {} is before issue date {}", due, issue)
            }
            Self::NegativeOutstanding => {
                write!(f, "Repayments exceed the amount owed")
            }
        }
    }
}

impl std::error::Error for DebtValidationError {}
