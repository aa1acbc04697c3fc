//! Category model
//!
//! Categories are plain labels. Transactions refer to them by name only, so
//! renaming or deleting a category never rewrites history unless asked to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length of a category name
pub const MAX_CATEGORY_NAME_LEN: usize = 40;

/// Lookup key for a category name: trimmed and lowercased
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Whether two category names refer to the same category, ignoring case
pub fn same_name(a: &str, b: &str) -> bool {
    name_key(a) == name_key(b)
}

/// Which ledger a category belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Expense,
    Income,
}

impl CategoryKind {
    /// Categories seeded on first run
    pub fn standard_names(&self) -> &'static [&'static str] {
        match self {
            Self::Expense => &[
                "Food",
                "Transport",
                "Housing",
                "Utilities",
                "Health",
                "Entertainment",
                "Clothing",
                "Education",
                "Gifts",
                "Other",
            ],
            Self::Income => &["Salary", "Freelance", "Investments", "Gifts", "Other"],
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense => write!(f, "expense"),
            Self::Income => write!(f, "income"),
        }
    }
}

impl FromStr for CategoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" | "expenses" => Ok(Self::Expense),
            "income" | "incomes" => Ok(Self::Income),
            other => Err(format!("Unknown category kind: {}", other)),
        }
    }
}

/// A user-defined or standard category label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub kind: CategoryKind,

    /// Standard categories cannot be renamed or deleted
    #[serde(default)]
    pub standard: bool,
}

impl Category {
    pub fn new(name: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            name: name.into(),
            kind,
            standard: false,
        }
    }

    pub fn standard(name: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            standard: true,
            ..Self::new(name, kind)
        }
    }

    /// Case-insensitive name comparison
    pub fn is_named(&self, name: &str) -> bool {
        same_name(&self.name, name)
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        let len = trimmed.chars().count();
        if len > MAX_CATEGORY_NAME_LEN {
            return Err(CategoryValidationError::NameTooLong(len));
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => write!(
                f,
                "Category name too long ({} chars, max {})",
                len, MAX_CATEGORY_NAME_LEN
            ),
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_named_ignores_case() {
        let cat = Category::new("Groceries", CategoryKind::Expense);
        assert!(cat.is_named("groceries"));
        assert!(cat.is_named(" GROCERIES "));
        assert!(!cat.is_named("Grocery"));
    }

    #[test]
    fn test_is_named_ignores_case_beyond_ascii() {
        let cat = Category::new("Їжа", CategoryKind::Expense);
        assert!(cat.is_named("їжа"));
        assert!(cat.is_named("ЇЖА"));
        assert!(same_name("Straße", " STRAßE"));
        assert_eq!(name_key(" Ärzte "), "ärzte");
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            Category::new("  ", CategoryKind::Income).validate(),
            Err(CategoryValidationError::EmptyName)
        );
        let long = "x".repeat(MAX_CATEGORY_NAME_LEN + 1);
        assert!(matches!(
            Category::new(long, CategoryKind::Expense).validate(),
            Err(CategoryValidationError::NameTooLong(_))
        ));
        assert!(Category::new("Pets", CategoryKind::Expense).validate().is_ok());
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("Expense".parse::<CategoryKind>().unwrap(), CategoryKind::Expense);
        assert_eq!("incomes".parse::<CategoryKind>().unwrap(), CategoryKind::Income);
        assert!("loan".parse::<CategoryKind>().is_err());
    }

    #[test]
    fn test_standard_names_include_other() {
        assert!(CategoryKind::Expense.standard_names().contains(&"Other"));
        assert!(CategoryKind::Income.standard_names().contains(&"Salary"));
    }
}
