//! Event CLI commands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Event management commands.
#[derive(Debug, Parser)]
pub struct EventsCommand {
    #[command(subcommand)]
    pub action: EventsAction,
}

/// Paging flags shared by listing actions.
#[derive(Debug, Clone, Default, Args)]
pub struct PageArgs {
    /// Maximum number of events.
    #[arg(long)]
    pub limit: Option<u32>,
    /// Number of events to skip.
    #[arg(long)]
    pub skip: Option<u32>,
    /// Sort order, e.g. `-fields.date`.
    #[arg(long, allow_hyphen_values = true)]
    pub order: Option<String>,
}

/// Fields for a new event.
#[derive(Debug, Args)]
pub struct CreateEventArgs {
    /// Event title.
    #[arg(long)]
    pub title: String,
    /// URL slug (derived from the title when omitted).
    #[arg(long)]
    pub slug: Option<String>,
    /// ISO-8601 date-time.
    #[arg(long)]
    pub date: String,
    /// Description (at least 10 characters).
    #[arg(long)]
    pub description: String,
    /// Organizer ID.
    #[arg(long)]
    pub organizer: String,
    /// Category ID (repeatable).
    #[arg(long = "category")]
    pub categories: Vec<String>,
    /// Speaker ID (repeatable).
    #[arg(long = "speaker")]
    pub speakers: Vec<String>,
    /// Banner image to upload.
    #[arg(long)]
    pub banner: Option<PathBuf>,
    /// Publish right away.
    #[arg(long)]
    pub publish: bool,
}

/// Fields to change on an event.
#[derive(Debug, Args)]
pub struct UpdateEventArgs {
    /// Event ID.
    pub id: String,
    /// New title.
    #[arg(long)]
    pub title: Option<String>,
    /// New slug.
    #[arg(long)]
    pub slug: Option<String>,
    /// New date.
    #[arg(long)]
    pub date: Option<String>,
    /// New description.
    #[arg(long)]
    pub description: Option<String>,
    /// New organizer ID.
    #[arg(long)]
    pub organizer: Option<String>,
    /// Replacement category IDs (repeatable).
    #[arg(long = "category")]
    pub categories: Option<Vec<String>>,
    /// Replacement speaker IDs (repeatable).
    #[arg(long = "speaker")]
    pub speakers: Option<Vec<String>>,
    /// New banner image to upload.
    #[arg(long)]
    pub banner: Option<PathBuf>,
}

/// Available event actions.
#[derive(Debug, Subcommand)]
pub enum EventsAction {
    /// List events.
    List {
        /// Only published events.
        #[arg(long, conflicts_with = "drafts")]
        published: bool,
        /// Only draft events.
        #[arg(long)]
        drafts: bool,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Get event by ID.
    Get {
        /// Event ID.
        id: String,
    },
    /// Get event by slug.
    Slug {
        /// Event slug.
        slug: String,
    },
    /// Full-text search.
    Search {
        /// Search term.
        term: String,
        #[command(flatten)]
        page: PageArgs,
    },
    /// List events in a category.
    ByCategory {
        /// Category ID.
        category_id: String,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Create an event.
    Create(CreateEventArgs),
    /// Update an event.
    Update(UpdateEventArgs),
    /// Delete an event.
    Delete {
        /// Event ID.
        id: String,
    },
    /// Publish an event.
    Publish {
        /// Event ID.
        id: String,
    },
    /// Unpublish an event.
    Unpublish {
        /// Event ID.
        id: String,
    },
}
