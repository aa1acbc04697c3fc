//! Loan and borrowed-money service
//!
//! Loans and borrowed records share one model and one service; the `DebtKind`
//! picks the collection. Adjustments go through the record's sub-ledger so
//! the outstanding balance is always derived, never edited directly.

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::audit::EntityType;
use crate::error::{BudgetError, BudgetResult};
use crate::models::transaction::normalize_comment;
use crate::models::{DebtEntry, DebtEntryId, DebtEntryKind, DebtId, DebtKind, DebtRecord, Money};
use crate::storage::{Repository, Storage};

/// Input for a new loan or borrowed record
#[derive(Debug, Clone)]
pub struct CreateDebtInput {
    pub counterparty: String,
    pub amount: Money,
    /// Defaults to today
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub comment: Option<String>,
}

/// Changes to an existing record
#[derive(Debug, Clone, Default)]
pub struct UpdateDebtInput {
    pub counterparty: Option<String>,
    pub amount: Option<Money>,
    pub issue_date: Option<NaiveDate>,
    /// `Some(None)` removes the due date
    pub due_date: Option<Option<NaiveDate>>,
    pub comment: Option<Option<String>>,
}

/// Totals across the open records of one kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DebtTotals {
    pub open_count: usize,
    pub principal: Money,
    pub repaid: Money,
    pub outstanding: Money,
}

/// Service for loans and borrowed money
pub struct DebtService<'a> {
    storage: &'a Storage,
}

impl<'a> DebtService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn repo(&self, kind: DebtKind) -> &Repository<DebtRecord> {
        self.storage.debts(kind)
    }

    fn entity_type(kind: DebtKind) -> EntityType {
        match kind {
            DebtKind::Loan => EntityType::Loan,
            DebtKind::Borrowed => EntityType::Borrowed,
        }
    }

    fn persist(&self, kind: DebtKind, record: DebtRecord) -> BudgetResult<()> {
        let repo = self.repo(kind);
        repo.upsert(record)?;
        self.storage.save(repo.key())
    }

    /// Create a new loan or borrowed record
    pub fn create(&self, kind: DebtKind, input: CreateDebtInput) -> BudgetResult<DebtRecord> {
        let issue_date = input.issue_date.unwrap_or_else(|| Local::now().date_naive());
        let mut record = DebtRecord::new(kind, input.amount, input.counterparty.trim(), issue_date);
        record.due_date = input.due_date;
        record.comment = normalize_comment(input.comment);

        record
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        self.persist(kind, record.clone())?;

        self.storage.log_create(
            Self::entity_type(kind),
            record.id.to_string(),
            Some(record.counterparty.clone()),
            &record,
        )?;
        info!(id = %record.id, %kind, amount = %record.amount, "debt record created");

        Ok(record)
    }

    pub fn get(&self, kind: DebtKind, id: DebtId) -> BudgetResult<Option<DebtRecord>> {
        self.repo(kind).get(id)
    }

    /// Find a record by full or short ID
    pub fn find(&self, kind: DebtKind, identifier: &str) -> BudgetResult<DebtRecord> {
        self.repo(kind)
            .find(identifier)?
            .ok_or_else(|| BudgetError::debt_not_found(identifier))
    }

    /// Records of one kind, most recently issued first
    pub fn list(&self, kind: DebtKind, include_closed: bool) -> BudgetResult<Vec<DebtRecord>> {
        self.repo(kind).filter(|r| include_closed || !r.closed)
    }

    /// Open records past their due date
    pub fn overdue(&self, kind: DebtKind, today: NaiveDate) -> BudgetResult<Vec<DebtRecord>> {
        let mut records = self.repo(kind).filter(|r| r.is_overdue(today))?;
        records.sort_by_key(|r| r.due_date);
        Ok(records)
    }

    /// Sum principal, repayments and outstanding over open records
    pub fn totals(&self, kind: DebtKind) -> BudgetResult<DebtTotals> {
        let open = self.list(kind, false)?;
        Ok(DebtTotals {
            open_count: open.len(),
            principal: open.iter().map(|r| r.amount).sum(),
            repaid: open.iter().map(DebtRecord::repaid).sum(),
            outstanding: open.iter().map(DebtRecord::outstanding).sum(),
        })
    }

    pub fn update(&self, kind: DebtKind, id: DebtId, input: UpdateDebtInput) -> BudgetResult<DebtRecord> {
        let before = self
            .get(kind, id)?
            .ok_or_else(|| BudgetError::debt_not_found(id.to_string()))?;
        let mut record = before.clone();

        if let Some(counterparty) = input.counterparty {
            record.counterparty = counterparty.trim().to_string();
        }
        if let Some(amount) = input.amount {
            if amount.is_zero() {
                return Err(BudgetError::Validation("Amount must be greater than zero".into()));
            }
            record.amount = amount.abs();
        }
        if let Some(issue_date) = input.issue_date {
            if let Some(first) = record.entries.iter().map(|e| e.date).min() {
                if first < issue_date {
                    return Err(BudgetError::Validation(format!(
                        "Issue date {} is after the first ledger entry on {}",
                        issue_date, first
                    )));
                }
            }
            record.issue_date = issue_date;
        }
        if let Some(due_date) = input.due_date {
            record.due_date = due_date;
        }
        if let Some(comment) = input.comment {
            record.comment = normalize_comment(comment);
        }

        record
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;
        record.refresh_closed();

        self.persist(kind, record.clone())?;

        self.storage.log_update(
            Self::entity_type(kind),
            record.id.to_string(),
            Some(record.counterparty.clone()),
            &before,
            &record,
        )?;

        Ok(record)
    }

    pub fn delete(&self, kind: DebtKind, id: DebtId) -> BudgetResult<DebtRecord> {
        let repo = self.repo(kind);
        let record = repo
            .delete(id)?
            .ok_or_else(|| BudgetError::debt_not_found(id.to_string()))?;
        self.storage.save(repo.key())?;

        self.storage.log_delete(
            Self::entity_type(kind),
            id.to_string(),
            Some(record.counterparty.clone()),
            &record,
        )?;

        Ok(record)
    }

    /// Append a repayment or increase to the record's sub-ledger
    pub fn add_entry(
        &self,
        kind: DebtKind,
        id: DebtId,
        entry_kind: DebtEntryKind,
        amount: Money,
        date: Option<NaiveDate>,
        comment: Option<String>,
    ) -> BudgetResult<DebtRecord> {
        if !amount.is_positive() {
            return Err(BudgetError::Validation(
                "Entry amount must be greater than zero".into(),
            ));
        }

        let before = self
            .get(kind, id)?
            .ok_or_else(|| BudgetError::debt_not_found(id.to_string()))?;

        let date = date.unwrap_or_else(|| Local::now().date_naive());
        if date < before.issue_date {
            return Err(BudgetError::Validation(format!(
                "Entry date {} is before issue date {}",
                date, before.issue_date
            )));
        }

        let outstanding = before.outstanding();
        if entry_kind == DebtEntryKind::Repayment && amount > outstanding {
            return Err(BudgetError::Overpayment {
                counterparty: before.counterparty.clone(),
                requested: amount.to_string(),
                outstanding: outstanding.to_string(),
            });
        }

        let mut entry = DebtEntry::new(entry_kind, amount, date);
        entry.comment = normalize_comment(comment);

        let mut record = before.clone();
        record.entries.push(entry);
        record.entries.sort_by_key(|e| e.date);
        record.refresh_closed();

        self.persist(kind, record.clone())?;
        self.storage.log_update(
            Self::entity_type(kind),
            record.id.to_string(),
            Some(record.counterparty.clone()),
            &before,
            &record,
        )?;

        if record.closed && !before.closed {
            info!(id = %record.id, "debt settled");
        }
        debug!(id = %record.id, outstanding = %record.outstanding(), "ledger entry added");

        Ok(record)
    }

    /// Remove an entry from the sub-ledger
    pub fn remove_entry(&self, kind: DebtKind, id: DebtId, entry_id: DebtEntryId) -> BudgetResult<DebtRecord> {
        let before = self
            .get(kind, id)?
            .ok_or_else(|| BudgetError::debt_not_found(id.to_string()))?;

        let mut record = before.clone();
        let position = record
            .entries
            .iter()
            .position(|e| e.id == entry_id)
            .ok_or_else(|| BudgetError::NotFound {
                entity_type: "Ledger entry",
                identifier: entry_id.to_string(),
            })?;
        record.entries.remove(position);

        // Dropping an increase can leave earlier repayments larger than the debt
        record
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;
        record.refresh_closed();

        self.persist(kind, record.clone())?;
        self.storage.log_update(
            Self::entity_type(kind),
            record.id.to_string(),
            Some(record.counterparty.clone()),
            &before,
            &record,
        )?;

        Ok(record)
    }

    /// Find a ledger entry on a record by full or short ID
    pub fn find_entry(&self, record: &DebtRecord, identifier: &str) -> BudgetResult<DebtEntryId> {
        let mut matches = record.entries.iter().filter(|e| e.id.matches(identifier));
        match (matches.next(), matches.next()) {
            (Some(entry), None) => Ok(entry.id),
            (Some(_), Some(_)) => Err(BudgetError::Validation(format!(
                "Identifier '{}' matches more than one entry; use a longer prefix",
                identifier
            ))),
            (None, _) => Err(BudgetError::NotFound {
                entity_type: "Ledger entry",
                identifier: identifier.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BudgetPaths;
    use crate::storage::StoreKey;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn loan_input(cents: i64) -> CreateDebtInput {
        CreateDebtInput {
            counterparty: "  Bob ".into(),
            amount: Money::from_cents(cents),
            issue_date: Some(d(2025, 1, 10)),
            due_date: Some(d(2025, 3, 1)),
            comment: None,
        }
    }

    #[test]
    fn test_create_routes_by_kind() {
        let (_temp_dir, storage) = create_test_storage();
        let service = DebtService::new(&storage);

        let observer = storage.subscribe();
        let loan = service.create(DebtKind::Loan, loan_input(10000)).unwrap();
        service.create(DebtKind::Borrowed, loan_input(500)).unwrap();

        assert_eq!(loan.counterparty, "Bob");
        assert_eq!(storage.loans.count().unwrap(), 1);
        assert_eq!(storage.borrowed.count().unwrap(), 1);
        assert_eq!(observer.changed_keys(), vec![StoreKey::Loans, StoreKey::Borrowed]);
    }

    #[test]
    fn test_create_validation() {
        let (_temp_dir, storage) = create_test_storage();
        let service = DebtService::new(&storage);

        assert!(service.create(DebtKind::Loan, loan_input(0)).unwrap_err().is_validation());

        let mut input = loan_input(100);
        input.due_date = Some(d(2025, 1, 1));
        assert!(service.create(DebtKind::Loan, input).unwrap_err().is_validation());
    }

    #[test]
    fn test_repayments_close_and_increase_reopens() {
        let (_temp_dir, storage) = create_test_storage();
        let service = DebtService::new(&storage);
        let loan = service.create(DebtKind::Loan, loan_input(10000)).unwrap();

        let partial = service
            .add_entry(DebtKind::Loan, loan.id, DebtEntryKind::Repayment, Money::from_cents(4000), Some(d(2025, 2, 1)), None)
            .unwrap();
        assert_eq!(partial.outstanding().cents(), 6000);
        assert!(!partial.closed);

        let settled = service
            .add_entry(DebtKind::Loan, loan.id, DebtEntryKind::Repayment, Money::from_cents(6000), Some(d(2025, 2, 2)), None)
            .unwrap();
        assert!(settled.closed);
        assert!(service.list(DebtKind::Loan, false).unwrap().is_empty());
        assert_eq!(service.list(DebtKind::Loan, true).unwrap().len(), 1);

        let reopened = service
            .add_entry(DebtKind::Loan, loan.id, DebtEntryKind::Increase, Money::from_cents(100), Some(d(2025, 2, 3)), None)
            .unwrap();
        assert!(!reopened.closed);
        assert_eq!(reopened.outstanding().cents(), 100);
    }

    #[test]
    fn test_overpayment_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = DebtService::new(&storage);
        let debt = service.create(DebtKind::Borrowed, loan_input(1000)).unwrap();

        let err = service
            .add_entry(DebtKind::Borrowed, debt.id, DebtEntryKind::Repayment, Money::from_cents(1001), Some(d(2025, 2, 1)), None)
            .unwrap_err();
        assert!(matches!(err, BudgetError::Overpayment { .. }));
        assert!(service.get(DebtKind::Borrowed, debt.id).unwrap().unwrap().entries.is_empty());
    }

    #[test]
    fn test_entry_before_issue_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = DebtService::new(&storage);
        let loan = service.create(DebtKind::Loan, loan_input(1000)).unwrap();

        let err = service
            .add_entry(DebtKind::Loan, loan.id, DebtEntryKind::Increase, Money::from_cents(10), Some(d(2025, 1, 9)), None)
            .unwrap_err();
        assert!(err.is_validation());

        let err = service
            .add_entry(DebtKind::Loan, loan.id, DebtEntryKind::Increase, Money::from_cents(-10), Some(d(2025, 1, 11)), None)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_remove_entry_recomputes_closed() {
        let (_temp_dir, storage) = create_test_storage();
        let service = DebtService::new(&storage);
        let loan = service.create(DebtKind::Loan, loan_input(1000)).unwrap();

        let settled = service
            .add_entry(DebtKind::Loan, loan.id, DebtEntryKind::Repayment, Money::from_cents(1000), Some(d(2025, 2, 1)), None)
            .unwrap();
        let entry_id = service
            .find_entry(&settled, &settled.entries[0].id.to_string())
            .unwrap();

        let reopened = service.remove_entry(DebtKind::Loan, loan.id, entry_id).unwrap();
        assert!(!reopened.closed);
        assert_eq!(reopened.outstanding().cents(), 1000);
    }

    #[test]
    fn test_remove_increase_cannot_leave_overpaid() {
        let (_temp_dir, storage) = create_test_storage();
        let service = DebtService::new(&storage);
        let loan = service.create(DebtKind::Loan, loan_input(1000)).unwrap();

        let grown = service
            .add_entry(DebtKind::Loan, loan.id, DebtEntryKind::Increase, Money::from_cents(500), Some(d(2025, 2, 1)), None)
            .unwrap();
        let increase_id = grown.entries[0].id;
        service
            .add_entry(DebtKind::Loan, loan.id, DebtEntryKind::Repayment, Money::from_cents(1500), Some(d(2025, 2, 2)), None)
            .unwrap();

        assert!(service
            .remove_entry(DebtKind::Loan, loan.id, increase_id)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_overdue_and_totals() {
        let (_temp_dir, storage) = create_test_storage();
        let service = DebtService::new(&storage);
        let first = service.create(DebtKind::Loan, loan_input(1000)).unwrap();
        let mut later = loan_input(2500);
        later.due_date = None;
        service.create(DebtKind::Loan, later).unwrap();

        service
            .add_entry(DebtKind::Loan, first.id, DebtEntryKind::Repayment, Money::from_cents(400), Some(d(2025, 2, 1)), None)
            .unwrap();

        let overdue = service.overdue(DebtKind::Loan, d(2025, 3, 2)).unwrap();
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].id, first.id);
        assert!(service.overdue(DebtKind::Loan, d(2025, 3, 1)).unwrap().is_empty());

        let totals = service.totals(DebtKind::Loan).unwrap();
        assert_eq!(totals.open_count, 2);
        assert_eq!(totals.principal.cents(), 3500);
        assert_eq!(totals.repaid.cents(), 400);
        assert_eq!(totals.outstanding.cents(), 3100);
    }

    #[test]
    fn test_update_due_date_and_delete() {
        let (_temp_dir, storage) = create_test_storage();
        let service = DebtService::new(&storage);
        let loan = service.create(DebtKind::Loan, loan_input(1000)).unwrap();

        let updated = service
            .update(
                DebtKind::Loan,
                loan.id,
                UpdateDebtInput {
                    due_date: Some(None),
                    comment: Some(Some("rent share".into())),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(updated.due_date.is_none());
        assert_eq!(updated.comment.as_deref(), Some("rent share"));

        service.delete(DebtKind::Loan, loan.id).unwrap();
        assert!(service.find(DebtKind::Loan, &loan.id.to_string()).unwrap_err().is_not_found());
    }
}
