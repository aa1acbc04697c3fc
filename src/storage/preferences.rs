//! Key-value preference store
//!
//! Every collection lives under a fixed key in a single JSON object file.
//! Writing any key rewrites the whole file atomically.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::BudgetError;

use super::file_io::{read_json, write_json_atomic};

/// Fixed keys under which collections are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Expenses,
    Incomes,
    Loans,
    Borrowed,
    Tasks,
    Plans,
    Categories,
}

impl StoreKey {
    pub const ALL: [StoreKey; 7] = [
        Self::Expenses,
        Self::Incomes,
        Self::Loans,
        Self::Borrowed,
        Self::Tasks,
        Self::Plans,
        Self::Categories,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expenses => "expenses",
            Self::Incomes => "incomes",
            Self::Loans => "loans",
            Self::Borrowed => "borrowed",
            Self::Tasks => "tasks",
            Self::Plans => "plans",
            Self::Categories => "categories",
        }
    }
}

impl std::fmt::Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// JSON-backed key-value store
pub struct PreferenceStore {
    path: PathBuf,
    values: RwLock<Map<String, Value>>,
}

impl PreferenceStore {
    /// Open the store, starting empty if the file does not exist yet
    pub fn open(path: PathBuf) -> Result<Self, BudgetError> {
        let values: Map<String, Value> = read_json(&path)?;
        debug!(path = %path.display(), keys = values.len(), "opened preference store");
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file from disk, discarding in-memory state
    pub fn reload(&self) -> Result<(), BudgetError> {
        let fresh: Map<String, Value> = read_json(&self.path)?;
        let mut values = self
            .values
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *values = fresh;
        Ok(())
    }

    /// Deserialize the value stored at `key`
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, BudgetError> {
        let values = self
            .values
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        match values.get(key) {
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| BudgetError::Storage(format!("Failed to parse key '{}': {}", key, e))),
            None => Ok(None),
        }
    }

    /// Serialize `value` under `key` and persist the whole store
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), BudgetError> {
        let json = serde_json::to_value(value)?;
        let mut values = self
            .values
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        values.insert(key.to_string(), json);
        write_json_atomic(&self.path, &*values)?;
        debug!(key, "persisted preference key");
        Ok(())
    }

    /// Remove `key` and persist; returns whether it existed
    pub fn remove(&self, key: &str) -> Result<bool, BudgetError> {
        let mut values = self
            .values
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let existed = values.remove(key).is_some();
        if existed {
            write_json_atomic(&self.path, &*values)?;
        }
        Ok(existed)
    }

    pub fn contains(&self, key: &str) -> Result<bool, BudgetError> {
        let values = self
            .values
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(values.contains_key(key))
    }

    /// All stored keys, sorted
    pub fn keys(&self) -> Result<Vec<String>, BudgetError> {
        let values = self
            .values
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(values.keys().cloned().collect())
    }
}
