//! CLI command definitions.

pub mod categories;
pub mod dashboard;
pub mod events;
pub mod profiles;

use clap::{Parser, Subcommand, ValueEnum};

/// Admin console for events, speakers, organizers and categories.
#[derive(Debug, Parser)]
#[command(name = "eventdesk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Read through the preview API so drafts are visible.
    #[arg(long, global = true, env = "EVENTDESK_PREVIEW")]
    pub preview: bool,

    /// Use the bundled demo data instead of the CMS.
    #[arg(long, global = true, env = "EVENTDESK_STATIC_DATA")]
    pub static_data: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Event management.
    Events(events::EventsCommand),
    /// Category lookup.
    Categories(categories::CategoriesCommand),
    /// Speaker management.
    Speakers(profiles::SpeakersCommand),
    /// Organizer management.
    Organizers(profiles::OrganizersCommand),
    /// Dashboard statistics and event browsing.
    Dashboard(dashboard::DashboardArgs),
    /// Print the URL slug derived from a title.
    Slugify {
        /// Event title.
        title: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "eventdesk",
            "events",
            "list",
            "--published",
            "--format",
            "json",
            "--static-data",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.static_data);
        assert!(matches!(
            cli.command,
            Commands::Events(events::EventsCommand {
                action: events::EventsAction::List {
                    published: true,
                    ..
                }
            })
        ));
    }

    #[test]
    fn test_event_create_collects_repeated_flags() {
        let cli = Cli::try_parse_from([
            "eventdesk",
            "events",
            "create",
            "--title",
            "Rust Meetup",
            "--date",
            "2025-11-20T18:00:00Z",
            "--description",
            "An evening of Rust talks.",
            "--organizer",
            "1",
            "--category",
            "4",
            "--category",
            "1",
        ])
        .unwrap();

        let Commands::Events(events::EventsCommand {
            action: events::EventsAction::Create(args),
        }) = cli.command
        else {
            panic!("expected events create");
        };
        assert_eq!(args.categories, ["4", "1"]);
        assert_eq!(args.slug, None);
    }
}
