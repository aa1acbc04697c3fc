//! Category CLI commands

use clap::Subcommand;

use crate::display::format_category_list;
use crate::error::BudgetResult;
use crate::models::CategoryKind;
use crate::services::CategoryService;
use crate::storage::Storage;

#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// List categories
    List {
        /// expense or income (default: both)
        #[arg(short, long)]
        kind: Option<CategoryKind>,
    },

    /// Add a custom category
    Add {
        name: String,
        #[arg(short, long, default_value = "expense")]
        kind: CategoryKind,
    },

    /// Rename a custom category and every record using it
    Rename {
        old: String,
        new: String,
        #[arg(short, long, default_value = "expense")]
        kind: CategoryKind,
    },

    /// Delete a custom category; existing records keep their label
    Delete {
        name: String,
        #[arg(short, long, default_value = "expense")]
        kind: CategoryKind,
    },
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> BudgetResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List { kind } => {
            let kinds = match kind {
                Some(kind) => vec![kind],
                None => vec![CategoryKind::Expense, CategoryKind::Income],
            };
            for (i, kind) in kinds.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                print!("{}", format_category_list(*kind, &service.list(*kind)?));
            }
        }

        CategoryCommands::Add { name, kind } => {
            let category = service.add(kind, &name)?;
            println!("Added {} category: {}", kind, category.name);
        }

        CategoryCommands::Rename { old, new, kind } => {
            let rewritten = service.rename(kind, &old, &new)?;
            println!(
                "Renamed {} category '{}' to '{}' ({} record(s) updated)",
                kind,
                old.trim(),
                new.trim(),
                rewritten
            );
        }

        CategoryCommands::Delete { name, kind } => {
            let deleted = service.delete(kind, &name)?;
            println!("Deleted {} category: {}", kind, deleted.name);
        }
    }

    Ok(())
}
