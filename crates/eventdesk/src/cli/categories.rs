//! Category CLI commands, shared by committees and event categories.

use clap::{Parser, Subcommand};
use uuid::Uuid;

/// Category management commands.
#[derive(Debug, Parser)]
pub struct CategoriesCommand {
    #[command(subcommand)]
    pub action: CategoriesAction,
}

/// Available category actions.
#[derive(Debug, Subcommand)]
pub enum CategoriesAction {
    /// List categories with their counts.
    List {
        /// Case-insensitive match on the name.
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Create a category.
    Create {
        /// Category name.
        name: String,
    },
    /// Rename a category.
    Rename {
        /// Category ID.
        id: Uuid,
        /// New name.
        name: String,
    },
    /// Delete a category and the links pointing at it.
    Delete {
        /// Category ID.
        id: Uuid,
        /// Confirm a deletion that drops event or participant links.
        #[arg(long)]
        yes: bool,
    },
}
