//! Demo content for seeding and read fallbacks.
//!
//! These functions are pure and deterministic, so they can be used in unit
//! tests, the in-memory provider, and as the demo fallback for failed reads.

use chrono::{DateTime, Utc};

use super::types::{Category, Event, Organizer, Relation, Speaker};

const CATEGORIES: [(&str, &str, &str, &str); 8] = [
    ("1", "Technology", "technology", "#3B82F6"),
    ("2", "Web Development", "web-development", "#10B981"),
    ("3", "Design", "design", "#F59E0B"),
    ("4", "Programming", "programming", "#EF4444"),
    ("5", "Artificial Intelligence", "artificial-intelligence", "#8B5CF6"),
    ("6", "Backend", "backend", "#06B6D4"),
    ("7", "CSS", "css", "#84CC16"),
    ("8", "CMS", "cms", "#F97316"),
];

const ORGANIZERS: [(&str, &str, &str); 12] = [
    ("1", "Tech Events Inc", "contact@techevents.com"),
    ("2", "AI Research Lab", "info@airesearch.org"),
    ("3", "Design Guild", "hello@designguild.com"),
    ("4", "Next Meetup Org", "team@nextmeetup.org"),
    ("5", "TS Devs", "ts@devbootcamps.com"),
    ("6", "Design2Dev", "hello@design2dev.com"),
    ("7", "WebConf Org", "info@webconf.com"),
    ("8", "Backend Academy", "contact@backend.io"),
    ("9", "CSS Masters", "info@cssmasters.dev"),
    ("10", "API Engineers Guild", "graphql@apiguild.org"),
    ("11", "Speedy Sites", "support@speedysites.dev"),
    ("12", "Contentful Experts", "team@contentfulworkshop.dev"),
];

const SPEAKERS: [(&str, &str, &str); 14] = [
    ("1", "John Doe", "React core team member"),
    ("2", "Jane Smith", "Frontend architect"),
    ("3", "Dr. Alice Johnson", "AI researcher and professor"),
    ("4", "Bob Wilson", "ML engineer at Tech Corp"),
    ("5", "Sarah Kim", "Design system specialist"),
    ("6", "Remy Sharp", "JavaScript expert"),
    ("7", "Dan Vanderkam", "Author of Effective TypeScript"),
    ("8", "Emily Zhang", "Design systems lead"),
    ("9", "Matt Biilmann", "CEO of Netlify"),
    ("10", "TJ Holowaychuk", "Open-source contributor"),
    ("11", "Una Kravets", "Google Dev Advocate"),
    ("12", "Lee Byron", "Co-creator of GraphQL"),
    ("13", "Addy Osmani", "Google performance engineer"),
    ("14", "Kashyap Patel", "Content modeling expert"),
];

struct DemoEvent {
    id: &'static str,
    title: &'static str,
    slug: &'static str,
    date: &'static str,
    description: &'static str,
    banner: &'static str,
    published: bool,
    organizer: &'static str,
    categories: &'static [&'static str],
    speakers: &'static [&'static str],
    created_at: &'static str,
}

const EVENTS: [DemoEvent; 12] = [
    DemoEvent {
        id: "1",
        title: "React Conference 2025",
        slug: "react-conference-2025",
        date: "2025-08-15T09:00:00Z",
        description: "Join us for the biggest React conference of the year!",
        banner: "https://images.unsplash.com/photo-1540575467063-178a50c2df87?w=800&h=400&fit=crop",
        published: true,
        organizer: "1",
        categories: &["1", "2"],
        speakers: &["1", "2"],
        created_at: "2025-01-01T00:00:00Z",
    },
    DemoEvent {
        id: "2",
        title: "AI & Machine Learning Summit",
        slug: "ai-ml-summit-2025",
        date: "2025-09-20T10:00:00Z",
        description: "Explore the future of AI and machine learning.",
        banner: "https://images.unsplash.com/photo-1485827404703-89b55fcc595e?w=800&h=400&fit=crop",
        published: true,
        organizer: "2",
        categories: &["1", "5"],
        speakers: &["3", "4"],
        created_at: "2025-01-02T00:00:00Z",
    },
    DemoEvent {
        id: "3",
        title: "Design Systems Workshop",
        slug: "design-systems-workshop",
        date: "2025-07-30T14:00:00Z",
        description: "Learn how to build scalable design systems.",
        banner: "https://images.unsplash.com/photo-1558655146-d09347e92766?w=800&h=400&fit=crop",
        published: false,
        organizer: "3",
        categories: &["3"],
        speakers: &["5"],
        created_at: "2025-01-03T00:00:00Z",
    },
    DemoEvent {
        id: "4",
        title: "Next.js Global Meetup",
        slug: "nextjs-global-meetup",
        date: "2025-10-01T10:00:00Z",
        description: "The ultimate meetup for Next.js developers.",
        banner: "https://images.unsplash.com/photo-1498050108023-c5249f4df085?w=800&h=400&fit=crop",
        published: true,
        organizer: "4",
        categories: &["2"],
        speakers: &["6"],
        created_at: "2025-01-04T00:00:00Z",
    },
    DemoEvent {
        id: "5",
        title: "TypeScript Mastery Bootcamp",
        slug: "typescript-mastery-bootcamp",
        date: "2025-11-15T12:00:00Z",
        description: "Deep dive into advanced TypeScript concepts.",
        banner: "https://images.unsplash.com/photo-1555066931-4365d14bab8c?w=800&h=400&fit=crop",
        published: true,
        organizer: "5",
        categories: &["4"],
        speakers: &["7"],
        created_at: "2025-01-05T00:00:00Z",
    },
    DemoEvent {
        id: "6",
        title: "Figma to Code Conference",
        slug: "figma-to-code-conference",
        date: "2025-12-05T11:00:00Z",
        description: "Bridge design and development workflows.",
        banner: "https://images.unsplash.com/photo-1603575448364-9333f3f9d598?w=800&h=400&fit=crop",
        published: false,
        organizer: "6",
        categories: &["3", "2"],
        speakers: &["8"],
        created_at: "2025-01-06T00:00:00Z",
    },
    DemoEvent {
        id: "7",
        title: "The JAMstack Future",
        slug: "jamstack-future",
        date: "2025-08-25T13:00:00Z",
        description: "Discuss modern architecture with JAMstack experts.",
        banner: "https://images.unsplash.com/photo-1518770660439-4636190af475?w=800&h=400&fit=crop",
        published: true,
        organizer: "7",
        categories: &["2"],
        speakers: &["9"],
        created_at: "2025-01-07T00:00:00Z",
    },
    DemoEvent {
        id: "8",
        title: "Node.js Backend Intensive",
        slug: "nodejs-backend-intensive",
        date: "2025-09-10T10:00:00Z",
        description: "Master building scalable APIs with Node.js.",
        banner: "https://images.unsplash.com/photo-1504805572947-34fad45aed93?w=800&h=400&fit=crop",
        published: false,
        organizer: "8",
        categories: &["4", "6"],
        speakers: &["10"],
        created_at: "2025-01-08T00:00:00Z",
    },
    DemoEvent {
        id: "9",
        title: "Modern CSS Summit",
        slug: "modern-css-summit",
        date: "2025-11-01T16:00:00Z",
        description: "CSS tricks, layout systems, and modern workflows.",
        banner: "https://images.unsplash.com/photo-1517433456452-f9633a875f6f?w=800&h=400&fit=crop",
        published: true,
        organizer: "9",
        categories: &["7"],
        speakers: &["11"],
        created_at: "2025-01-09T00:00:00Z",
    },
    DemoEvent {
        id: "10",
        title: "GraphQL Developer Day",
        slug: "graphql-developer-day",
        date: "2025-10-10T15:00:00Z",
        description: "Hands-on GraphQL and API design best practices.",
        banner: "https://images.unsplash.com/photo-1498050108023-c5249f4df085?w=800&h=400&fit=crop",
        published: true,
        organizer: "10",
        categories: &["1", "6"],
        speakers: &["12"],
        created_at: "2025-01-10T00:00:00Z",
    },
    DemoEvent {
        id: "11",
        title: "Frontend Performance Camp",
        slug: "frontend-performance-camp",
        date: "2025-09-01T09:30:00Z",
        description: "Best practices for optimizing frontend performance.",
        banner: "https://images.unsplash.com/photo-1573497491208-6b1acb260507?w=800&h=400&fit=crop",
        published: true,
        organizer: "11",
        categories: &["2"],
        speakers: &["13"],
        created_at: "2025-01-11T00:00:00Z",
    },
    DemoEvent {
        id: "12",
        title: "Content Modeling Workshop",
        slug: "content-modeling-workshop",
        date: "2025-08-18T14:00:00Z",
        description: "Learn the art of structuring content for scalability.",
        banner: "https://images.unsplash.com/photo-1503676260728-1c00da094a0b?w=800&h=400&fit=crop",
        published: true,
        organizer: "12",
        categories: &["8"],
        speakers: &["14"],
        created_at: "2025-01-12T00:00:00Z",
    },
];

/// Demo categories, sorted by id.
pub fn demo_categories() -> Vec<Category> {
    CATEGORIES
        .iter()
        .map(|(id, title, slug, color)| Category::new(*id, *title, *slug).with_color(*color))
        .collect()
}

/// Demo organizers, sorted by id.
pub fn demo_organizers() -> Vec<Organizer> {
    ORGANIZERS
        .iter()
        .map(|(id, name, email)| Organizer::new(*id, *name).with_email(*email))
        .collect()
}

/// Demo speakers, sorted by id.
pub fn demo_speakers() -> Vec<Speaker> {
    SPEAKERS
        .iter()
        .map(|(id, name, bio)| Speaker::new(*id, *name).with_bio(*bio))
        .collect()
}

/// Demo events with every relation resolved against the demo lists.
pub fn demo_events() -> Vec<Event> {
    let categories = demo_categories();
    let organizers = demo_organizers();
    let speakers = demo_speakers();

    EVENTS
        .iter()
        .map(|demo| {
            let timestamp = parse_timestamp(demo.created_at);
            Event {
                id: demo.id.to_string(),
                title: demo.title.to_string(),
                slug: demo.slug.to_string(),
                date: demo.date.to_string(),
                description: demo.description.to_string(),
                banner: Some(demo.banner.to_string()),
                is_published: demo.published,
                organizer: resolve(&organizers, demo.organizer, |o| &o.id),
                categories: demo
                    .categories
                    .iter()
                    .map(|id| resolve(&categories, id, |c| &c.id))
                    .collect(),
                speakers: demo
                    .speakers
                    .iter()
                    .map(|id| resolve(&speakers, id, |s| &s.id))
                    .collect(),
                created_at: timestamp,
                updated_at: timestamp,
            }
        })
        .collect()
}

fn resolve<T: Clone>(records: &[T], id: &str, id_of: impl Fn(&T) -> &String) -> Relation<T> {
    records
        .iter()
        .find(|record| id_of(record) == id)
        .cloned()
        .map(Relation::Resolved)
        .unwrap_or_else(|| Relation::Unresolved(id.to_string()))
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
