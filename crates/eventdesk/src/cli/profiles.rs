//! Speaker and organizer CLI commands.

use clap::{Parser, Subcommand};

/// Speaker management commands.
#[derive(Debug, Parser)]
pub struct SpeakersCommand {
    #[command(subcommand)]
    pub action: SpeakersAction,
}

/// Available speaker actions.
#[derive(Debug, Subcommand)]
pub enum SpeakersAction {
    /// List all speakers.
    List,
    /// Get speaker by ID.
    Get {
        /// Speaker ID.
        id: String,
    },
    /// Create a speaker.
    Create {
        /// Speaker name.
        #[arg(long)]
        name: String,
        /// Short biography.
        #[arg(long)]
        bio: Option<String>,
        /// Avatar URL.
        #[arg(long)]
        avatar: Option<String>,
    },
    /// Replace a speaker's fields.
    Update {
        /// Speaker ID.
        id: String,
        /// Speaker name.
        #[arg(long)]
        name: String,
        /// Short biography.
        #[arg(long)]
        bio: Option<String>,
        /// Avatar URL.
        #[arg(long)]
        avatar: Option<String>,
    },
    /// Delete a speaker.
    Delete {
        /// Speaker ID.
        id: String,
    },
}

/// Organizer management commands.
#[derive(Debug, Parser)]
pub struct OrganizersCommand {
    #[command(subcommand)]
    pub action: OrganizersAction,
}

/// Available organizer actions.
#[derive(Debug, Subcommand)]
pub enum OrganizersAction {
    /// List all organizers.
    List,
    /// Get organizer by ID.
    Get {
        /// Organizer ID.
        id: String,
    },
    /// Create an organizer.
    Create {
        /// Organizer name.
        #[arg(long)]
        name: String,
        /// Contact email.
        #[arg(long)]
        email: String,
        /// Avatar URL.
        #[arg(long)]
        avatar: Option<String>,
    },
    /// Replace an organizer's fields.
    Update {
        /// Organizer ID.
        id: String,
        /// Organizer name.
        #[arg(long)]
        name: String,
        /// Contact email.
        #[arg(long)]
        email: String,
        /// Avatar URL.
        #[arg(long)]
        avatar: Option<String>,
    },
    /// Delete an organizer.
    Delete {
        /// Organizer ID.
        id: String,
    },
}
