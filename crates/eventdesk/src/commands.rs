//! Command dispatch.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use eventdesk_core::content::{
    filter_events, page_window, paginate, AssetUpload, EventFilter, EventPatch, OrganizerDraft,
    SpeakerDraft, EVENTS_PER_PAGE,
};
use eventdesk_core::form::{slugify, EventForm};

use crate::cli::categories::CategoriesAction;
use crate::cli::dashboard::DashboardArgs;
use crate::cli::events::{CreateEventArgs, EventsAction, PageArgs, UpdateEventArgs};
use crate::cli::profiles::{OrganizersAction, SpeakersAction};
use crate::cli::{Commands, OutputFormat};
use crate::error::ServiceError;
use crate::output::{format_output, pretty};
use crate::services::{ListEvents, Services};

/// Events loaded when browsing from the dashboard.
const BROWSE_LIMIT: u32 = 1000;

/// Output settings taken from the global flags.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub format: OutputFormat,
    pub quiet: bool,
}

impl Output {
    fn show<T: Serialize>(&self, value: &T, pretty: impl FnOnce(&T) -> String) {
        match self.format {
            OutputFormat::Json => println!("{}", format_output(value, self.format)),
            OutputFormat::Pretty => println!("{}", pretty(value)),
        }
    }

    fn note(&self, message: impl std::fmt::Display) {
        if !self.quiet {
            println!("{message}");
        }
    }
}

/// Runs one command against the services.
pub async fn run(command: Commands, services: &Services, out: Output) -> Result<()> {
    match command {
        Commands::Events(events_cmd) => run_events(events_cmd.action, services, out).await,
        Commands::Categories(categories_cmd) => match categories_cmd.action {
            CategoriesAction::List => {
                let categories = services.categories.list().await?;
                out.show(&categories, |c| pretty::format_categories(c));
                Ok(())
            }
            CategoriesAction::Get { id } => {
                let category = services.categories.get(&id).await?;
                out.show(&category, pretty::format_category);
                Ok(())
            }
        },
        Commands::Speakers(speakers_cmd) => run_speakers(speakers_cmd.action, services, out).await,
        Commands::Organizers(organizers_cmd) => {
            run_organizers(organizers_cmd.action, services, out).await
        }
        Commands::Dashboard(args) => run_dashboard(args, services, out).await,
        Commands::Slugify { title } => {
            let slug = slugify(&title);
            out.show(&slug, |s| s.clone());
            Ok(())
        }
    }
}

async fn run_events(action: EventsAction, services: &Services, out: Output) -> Result<()> {
    let events = &services.events;
    match action {
        EventsAction::List {
            published,
            drafts,
            page,
        } => {
            let mut options = list_options(page);
            if published || drafts {
                options = options.published(published);
            }
            let listing = events.list(options).await?;
            out.show(&listing, pretty::format_events);
        }
        EventsAction::Get { id } => {
            let event = events.get(&id).await?;
            out.show(&event, pretty::format_event);
        }
        EventsAction::Slug { slug } => {
            let event = events.by_slug(&slug).await?;
            out.show(&event, pretty::format_event);
        }
        EventsAction::Search { term, page } => {
            let listing = events.search(&term, list_options(page)).await?;
            out.show(&listing, pretty::format_events);
        }
        EventsAction::ByCategory { category_id, page } => {
            let listing = events.by_category(&category_id, list_options(page)).await?;
            out.show(&listing, pretty::format_events);
        }
        EventsAction::Create(args) => {
            let form = event_form(args).await?;
            let draft = form.validate().map_err(ServiceError::InvalidEvent)?;
            let event = events.create(draft).await?;
            out.show(&event, |e| format!("Created:\n{}", pretty::format_event(e)));
        }
        EventsAction::Update(args) => {
            let id = args.id.clone();
            let patch = event_patch(args).await?;
            let event = events.update(&id, patch).await?;
            out.show(&event, |e| format!("Updated:\n{}", pretty::format_event(e)));
        }
        EventsAction::Delete { id } => {
            events.delete(&id).await?;
            out.note(format!("Deleted event {id}"));
        }
        EventsAction::Publish { id } => {
            let event = events.publish(&id).await?;
            out.show(&event, |e| format!("Published:\n{}", pretty::format_event(e)));
        }
        EventsAction::Unpublish { id } => {
            let event = events.unpublish(&id).await?;
            out.show(&event, |e| format!("Unpublished:\n{}", pretty::format_event(e)));
        }
    }
    Ok(())
}

async fn run_speakers(action: SpeakersAction, services: &Services, out: Output) -> Result<()> {
    let speakers = &services.speakers;
    match action {
        SpeakersAction::List => {
            let list = speakers.list().await?;
            out.show(&list, |s| pretty::format_speakers(s));
        }
        SpeakersAction::Get { id } => {
            let speaker = speakers.get(&id).await?;
            out.show(&speaker, pretty::format_speaker);
        }
        SpeakersAction::Create { name, bio, avatar } => {
            let draft = SpeakerDraft { name, bio, avatar };
            let speaker = speakers.create(draft).await?;
            out.show(&speaker, |s| format!("Created:\n{}", pretty::format_speaker(s)));
        }
        SpeakersAction::Update {
            id,
            name,
            bio,
            avatar,
        } => {
            let draft = SpeakerDraft { name, bio, avatar };
            let speaker = speakers.update(&id, draft).await?;
            out.show(&speaker, |s| format!("Updated:\n{}", pretty::format_speaker(s)));
        }
        SpeakersAction::Delete { id } => {
            speakers.delete(&id).await?;
            out.note(format!("Deleted speaker {id}"));
        }
    }
    Ok(())
}

async fn run_organizers(action: OrganizersAction, services: &Services, out: Output) -> Result<()> {
    let organizers = &services.organizers;
    match action {
        OrganizersAction::List => {
            let list = organizers.list().await?;
            out.show(&list, |o| pretty::format_organizers(o));
        }
        OrganizersAction::Get { id } => {
            let organizer = organizers.get(&id).await?;
            out.show(&organizer, pretty::format_organizer);
        }
        OrganizersAction::Create {
            name,
            email,
            avatar,
        } => {
            let draft = OrganizerDraft {
                name,
                email,
                avatar,
            };
            let organizer = organizers.create(draft).await?;
            out.show(&organizer, |o| {
                format!("Created:\n{}", pretty::format_organizer(o))
            });
        }
        OrganizersAction::Update {
            id,
            name,
            email,
            avatar,
        } => {
            let draft = OrganizerDraft {
                name,
                email,
                avatar,
            };
            let organizer = organizers.update(&id, draft).await?;
            out.show(&organizer, |o| {
                format!("Updated:\n{}", pretty::format_organizer(o))
            });
        }
        OrganizersAction::Delete { id } => {
            organizers.delete(&id).await?;
            out.note(format!("Deleted organizer {id}"));
        }
    }
    Ok(())
}

async fn run_dashboard(args: DashboardArgs, services: &Services, out: Output) -> Result<()> {
    if !args.is_browse() {
        let dashboard = services.dashboard.load().await?;
        out.show(&dashboard, pretty::format_dashboard);
        return Ok(());
    }

    let listing = services
        .events
        .list(ListEvents::new().with_limit(BROWSE_LIMIT))
        .await?;
    let filter = EventFilter {
        search: args.search,
        category_id: args.category,
    };
    let matching = filter_events(&listing.items, &filter);
    let page = paginate(&matching, args.page.unwrap_or(1), EVENTS_PER_PAGE);
    let window = page_window(page.page, page.total_pages);
    out.show(&page, |p| pretty::format_event_page(p, &window));
    Ok(())
}

fn list_options(page: PageArgs) -> ListEvents {
    ListEvents {
        published: None,
        limit: page.limit,
        skip: page.skip,
        order: page.order,
    }
}

/// Fills an event form from the create flags. The slug follows the title
/// unless given explicitly.
async fn event_form(args: CreateEventArgs) -> Result<EventForm> {
    let mut form = EventForm::new();
    form.set_title(args.title);
    if let Some(slug) = args.slug {
        form.set_slug(slug);
    }
    form.set_date(args.date);
    form.set_description(args.description);
    form.set_organizer(args.organizer);
    for id in &args.categories {
        if !form.selected_categories().contains(id) {
            form.toggle_category(id);
        }
    }
    for id in &args.speakers {
        if !form.selected_speakers().contains(id) {
            form.toggle_speaker(id);
        }
    }
    form.set_published(args.publish);
    if let Some(path) = &args.banner {
        form.set_banner(read_banner(path).await?);
    }
    Ok(form)
}

async fn event_patch(args: UpdateEventArgs) -> Result<EventPatch> {
    let banner_upload = match &args.banner {
        Some(path) => Some(read_banner(path).await?),
        None => None,
    };

    Ok(EventPatch {
        title: args.title,
        slug: args.slug,
        date: args.date,
        description: args.description,
        is_published: None,
        organizer: args.organizer,
        categories: args.categories,
        speakers: args.speakers,
        banner_upload,
    })
}

async fn read_banner(path: &Path) -> Result<AssetUpload> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read banner {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("banner")
        .to_string();

    Ok(AssetUpload::new(file_name, image_content_type(path), bytes))
}

/// Guesses an image MIME type from the file extension.
fn image_content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
