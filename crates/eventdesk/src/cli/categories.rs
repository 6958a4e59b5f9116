//! Category CLI commands.

use clap::{Parser, Subcommand};

/// Category commands.
#[derive(Debug, Parser)]
pub struct CategoriesCommand {
    #[command(subcommand)]
    pub action: CategoriesAction,
}

/// Available category actions.
#[derive(Debug, Subcommand)]
pub enum CategoriesAction {
    /// List all categories.
    List,
    /// Get category by ID.
    Get {
        /// Category ID.
        id: String,
    },
}
