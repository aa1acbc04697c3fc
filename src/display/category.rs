//! Category display formatting

use crate::models::{Category, CategoryKind};

/// Format the categories of one kind, marking standard ones
pub fn format_category_list(kind: CategoryKind, categories: &[Category]) -> String {
    if categories.is_empty() {
        return format!("No {} categories found.\n", kind);
    }

    let mut output = format!("{} categories:\n", capitalized(kind));
    for (i, category) in categories.iter().enumerate() {
        let is_last = i == categories.len() - 1;
        let prefix = if is_last { "└── " } else { "├── " };
        let marker = if category.standard { "" } else { " (custom)" };
        output.push_str(&format!("  {}{}{}\n", prefix, category.name, marker));
    }

    output
}

fn capitalized(kind: CategoryKind) -> &'static str {
    match kind {
        CategoryKind::Expense => "Expense",
        CategoryKind::Income => "Income",
    }
}
