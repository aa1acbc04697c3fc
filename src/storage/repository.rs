//! Generic collection repository
//!
//! Holds one collection in memory, keyed by id. `load` pulls the whole list
//! out of the preference store and `save` writes the whole list back.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::sync::RwLock;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::BudgetError;
use crate::models::{BudgetPlan, DebtRecord, Expense, Income, Task};

use super::preferences::{PreferenceStore, StoreKey};

/// A record that can live in a [`Repository`]
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Id: Copy + Eq + Hash + Display;

    fn id(&self) -> Self::Id;

    /// Whether user input (full or short id) refers to this record
    fn matches_id(&self, input: &str) -> bool;

    /// Order used when listing and when writing the collection
    fn list_order(a: &Self, b: &Self) -> Ordering;
}

impl Record for Expense {
    type Id = crate::models::ExpenseId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn matches_id(&self, input: &str) -> bool {
        self.id.matches(input)
    }

    fn list_order(a: &Self, b: &Self) -> Ordering {
        b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at))
    }
}

impl Record for Income {
    type Id = crate::models::IncomeId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn matches_id(&self, input: &str) -> bool {
        self.id.matches(input)
    }

    fn list_order(a: &Self, b: &Self) -> Ordering {
        b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at))
    }
}

impl Record for DebtRecord {
    type Id = crate::models::DebtId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn matches_id(&self, input: &str) -> bool {
        self.id.matches(input)
    }

    fn list_order(a: &Self, b: &Self) -> Ordering {
        b.issue_date
            .cmp(&a.issue_date)
            .then(b.created_at.cmp(&a.created_at))
    }
}

impl Record for Task {
    type Id = crate::models::TaskId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn matches_id(&self, input: &str) -> bool {
        self.id.matches(input)
    }

    fn list_order(a: &Self, b: &Self) -> Ordering {
        a.start.cmp(&b.start).then(a.created_at.cmp(&b.created_at))
    }
}

impl Record for BudgetPlan {
    type Id = crate::models::PlanId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn matches_id(&self, input: &str) -> bool {
        self.id.matches(input)
    }

    fn list_order(a: &Self, b: &Self) -> Ordering {
        a.start.cmp(&b.start).then(a.name.cmp(&b.name))
    }
}

/// Repository for one collection stored under a single key
pub struct Repository<T: Record> {
    key: StoreKey,
    data: RwLock<HashMap<T::Id, T>>,
}

impl<T: Record> Repository<T> {
    pub fn new(key: StoreKey) -> Self {
        Self {
            key,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn key(&self) -> StoreKey {
        self.key
    }

    /// Replace in-memory state with the collection from the store
    pub fn load(&self, store: &PreferenceStore) -> Result<(), BudgetError> {
        let records: Vec<T> = store.get(self.key.as_str())?.unwrap_or_default();

        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for record in records {
            data.insert(record.id(), record);
        }

        Ok(())
    }

    /// Write the whole collection back to the store
    pub fn save(&self, store: &PreferenceStore) -> Result<(), BudgetError> {
        let records = self.get_all()?;
        store.put(self.key.as_str(), &records)
    }

    pub fn get(&self, id: T::Id) -> Result<Option<T>, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Find a record by full or short id
    ///
    /// Ambiguous short ids are reported as a validation error.
    pub fn find(&self, input: &str) -> Result<Option<T>, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut matches = data.values().filter(|r| r.matches_id(input));
        let first = matches.next().cloned();
        if matches.next().is_some() {
            return Err(BudgetError::Validation(format!(
                "Identifier '{}' matches more than one record; use a longer prefix",
                input
            )));
        }

        Ok(first)
    }

    /// All records in list order
    pub fn get_all(&self) -> Result<Vec<T>, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut records: Vec<_> = data.values().cloned().collect();
        records.sort_by(T::list_order);
        Ok(records)
    }

    /// Records satisfying a predicate, in list order
    pub fn filter<F>(&self, predicate: F) -> Result<Vec<T>, BudgetError>
    where
        F: Fn(&T) -> bool,
    {
        let mut records = self.get_all()?;
        records.retain(|r| predicate(r));
        Ok(records)
    }

    /// Insert or update a record
    pub fn upsert(&self, record: T) -> Result<(), BudgetError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(record.id(), record);
        Ok(())
    }

    /// Delete a record, returning it if it existed
    pub fn delete(&self, id: T::Id) -> Result<Option<T>, BudgetError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(&id))
    }

    pub fn count(&self) -> Result<usize, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PreferenceStore, Repository<Expense>) {
        let temp_dir = TempDir::new().unwrap();
        let store = PreferenceStore::open(temp_dir.path().join("preferences.json")).unwrap();
        let repo = Repository::new(StoreKey::Expenses);
        (temp_dir, store, repo)
    }

    fn expense(day: u32, cents: i64) -> Expense {
        Expense::new(
            "Food",
            Money::from_cents(cents),
            NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
        )
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, store, repo) = setup();
        repo.load(&store).unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, store, repo) = setup();
        let e = expense(15, 5000);
        let id = e.id;
        repo.upsert(e).unwrap();
        repo.save(&store).unwrap();

        let store2 = PreferenceStore::open(temp_dir.path().join("preferences.json")).unwrap();
        let repo2: Repository<Expense> = Repository::new(StoreKey::Expenses);
        repo2.load(&store2).unwrap();

        assert_eq!(repo2.count().unwrap(), 1);
        assert_eq!(repo2.get(id).unwrap().unwrap().amount.cents(), -5000);
    }

    #[test]
    fn test_get_all_newest_first() {
        let (_temp_dir, _store, repo) = setup();
        repo.upsert(expense(10, 100)).unwrap();
        repo.upsert(expense(20, 200)).unwrap();
        repo.upsert(expense(15, 300)).unwrap();

        let days: Vec<u32> = repo
            .get_all()
            .unwrap()
            .iter()
            .map(|e| chrono::Datelike::day(&e.date))
            .collect();
        assert_eq!(days, vec![20, 15, 10]);
    }

    #[test]
    fn test_find_by_short_id_and_delete() {
        let (_temp_dir, _store, repo) = setup();
        let e = expense(1, 100);
        let short = e.id.to_string();
        repo.upsert(e.clone()).unwrap();

        assert_eq!(repo.find(&short).unwrap().unwrap().id, e.id);
        assert!(repo.find("exp-zzzzzzzz").unwrap().is_none());

        assert!(repo.delete(e.id).unwrap().is_some());
        assert!(repo.delete(e.id).unwrap().is_none());
    }

    #[test]
    fn test_filter() {
        let (_temp_dir, _store, repo) = setup();
        repo.upsert(expense(1, 100)).unwrap();
        repo.upsert(expense(2, 5000)).unwrap();

        let big = repo.filter(|e| e.amount.cents() < -1000).unwrap();
        assert_eq!(big.len(), 1);
    }
}
