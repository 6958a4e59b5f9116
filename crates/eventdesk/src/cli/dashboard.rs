//! Dashboard CLI arguments.

use clap::Args;

/// Dashboard statistics, or a filtered page of events when any filter
/// flag is given.
#[derive(Debug, Clone, Default, Args)]
pub struct DashboardArgs {
    /// Search title, description and organizer name.
    #[arg(long)]
    pub search: Option<String>,
    /// Only events in this category.
    #[arg(long)]
    pub category: Option<String>,
    /// Page to show (1-based).
    #[arg(long)]
    pub page: Option<usize>,
}

impl DashboardArgs {
    /// Returns true if the events browser was requested.
    pub fn is_browse(&self) -> bool {
        self.search.is_some() || self.category.is_some() || self.page.is_some()
    }
}
