use serde_json::Value;

use crate::content::{Category, Event, Linked, Organizer, Relation, Speaker};
use crate::form::slugify;

use super::fields::{
    array, boolean, entry_id, fields_of, media_url, optional_string, string, timestamp,
};

/// Normalizes a raw event entry.
///
/// Accepts the CMS shape (`sys` + `fields`), the flat shape produced by
/// serializing an [`Event`], and anything in between. Missing or malformed
/// fields fall back to defaults. A missing slug is derived from the title.
pub fn normalize_event(raw: &Value) -> Event {
    let fields = fields_of(raw);
    let title = string(fields, "title");
    let slug = optional_string(fields, "slug").unwrap_or_else(|| slugify(&title));

    Event {
        id: entry_id(raw),
        slug,
        date: string(fields, "date"),
        description: string(fields, "description"),
        banner: media_url(fields.get("banner")),
        is_published: boolean(fields, "isPublished"),
        organizer: fields
            .get("organizer")
            .and_then(|value| relation(value, normalize_organizer))
            .unwrap_or_default(),
        categories: relations(array(fields, "categories"), normalize_category),
        speakers: relations(array(fields, "speakers"), normalize_speaker),
        created_at: timestamp(raw, "createdAt"),
        updated_at: timestamp(raw, "updatedAt"),
        title,
    }
}

/// Normalizes a raw category entry.
pub fn normalize_category(raw: &Value) -> Category {
    let fields = fields_of(raw);
    let title = string(fields, "title");
    let slug = optional_string(fields, "slug").unwrap_or_else(|| slugify(&title));

    Category {
        id: entry_id(raw),
        title,
        slug,
        color: optional_string(fields, "color"),
    }
}

/// Normalizes a raw speaker entry.
pub fn normalize_speaker(raw: &Value) -> Speaker {
    let fields = fields_of(raw);

    Speaker {
        id: entry_id(raw),
        name: string(fields, "name"),
        bio: optional_string(fields, "bio"),
        avatar: media_url(fields.get("image").or_else(|| fields.get("avatar"))),
    }
}

/// Normalizes a raw organizer (`author`) entry.
pub fn normalize_organizer(raw: &Value) -> Organizer {
    let fields = fields_of(raw);

    Organizer {
        id: entry_id(raw),
        name: string(fields, "name"),
        email: optional_string(fields, "email"),
        avatar: media_url(fields.get("image").or_else(|| fields.get("avatar"))),
    }
}

/// Interprets one relation value.
///
/// A bare string is an id. An object with human-readable fields is resolved;
/// an object with only an id (`sys.id` or `id`) is unresolved. Anything else,
/// including objects without any id, is dropped.
fn relation<T: Linked>(value: &Value, normalize: fn(&Value) -> T) -> Option<Relation<T>> {
    match value {
        Value::String(id) => Some(Relation::Unresolved(id.clone())),
        Value::Object(_) if is_resolved(value) => Some(Relation::Resolved(normalize(value))),
        Value::Object(_) => {
            let id = entry_id(value);
            (!id.is_empty()).then_some(Relation::Unresolved(id))
        }
        _ => None,
    }
}

fn relations<T: Linked>(values: &[Value], normalize: fn(&Value) -> T) -> Vec<Relation<T>> {
    values
        .iter()
        .filter_map(|value| relation(value, normalize))
        .collect()
}

fn is_resolved(value: &Value) -> bool {
    value.get("fields").is_some_and(Value::is_object)
        || ["name", "title"]
            .iter()
            .any(|key| value.get(*key).is_some_and(Value::is_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::demo_events;
    use serde_json::json;

    fn renormalize(event: &Event) -> Event {
        normalize_event(&serde_json::to_value(event).unwrap())
    }

    #[test]
    fn test_bare_string_organizer() {
        let event = normalize_event(&json!({
            "sys": {"id": "e-1"},
            "fields": {"title": "Rust Meetup", "organizer": "org-1"}
        }));

        assert_eq!(event.organizer, Relation::Unresolved("org-1".to_string()));
        let organizer = event.organizer_record();
        assert_eq!(organizer.id, "org-1");
        assert_eq!(organizer.name, "");
    }

    #[test]
    fn test_three_relation_shapes() {
        let event = normalize_event(&json!({
            "sys": {"id": "e-1"},
            "fields": {
                "title": "Rust Meetup",
                "categories": [
                    "1",
                    {"sys": {"type": "Link", "linkType": "Entry", "id": "2"}},
                    {"sys": {"id": "3"}, "fields": {"title": "Design", "slug": "design"}},
                    {"id": "4", "title": "Programming"}
                ]
            }
        }));

        assert_eq!(
            event.categories,
            vec![
                Relation::Unresolved("1".to_string()),
                Relation::Unresolved("2".to_string()),
                Relation::Resolved(Category::new("3", "Design", "design")),
                Relation::Resolved(Category::new("4", "Programming", "programming")),
            ]
        );
    }

    #[test]
    fn test_resolved_organizer_wins() {
        let event = normalize_event(&json!({
            "fields": {
                "organizer": {
                    "sys": {"id": "org-1"},
                    "fields": {"name": "Tech Events Inc", "email": "contact@techevents.com"}
                }
            }
        }));

        assert_eq!(event.organizer_name(), "Tech Events Inc");
        assert_eq!(
            event.organizer_record().email.as_deref(),
            Some("contact@techevents.com")
        );
    }

    #[test]
    fn test_missing_fields_degrade_to_defaults() {
        let event = normalize_event(&json!({"sys": {"id": "e-9"}}));

        assert_eq!(event.id, "e-9");
        assert_eq!(event.title, "");
        assert_eq!(event.slug, "");
        assert!(!event.is_published);
        assert!(event.categories.is_empty());
        assert_eq!(event.organizer, Relation::Unresolved(String::new()));
        assert_eq!(event.organizer_name(), Organizer::UNKNOWN);
        assert_eq!(event.banner, None);
    }

    #[test]
    fn test_malformed_payloads_never_panic() {
        for raw in [
            json!(null),
            json!(42),
            json!("event"),
            json!([]),
            json!({"fields": null}),
            json!({"fields": {"categories": {"not": "a list"}, "organizer": 7}}),
            json!({"fields": {"speakers": [null, 1, {}, {"foo": "bar"}]}}),
        ] {
            let event = normalize_event(&raw);
            assert!(event.speakers.is_empty());
        }
    }

    #[test]
    fn test_slug_derived_when_missing() {
        let event = normalize_event(&json!({"fields": {"title": "My Awesome Event!! 2025"}}));
        assert_eq!(event.slug, "my-awesome-event-2025");

        let explicit = normalize_event(&json!({"fields": {"title": "X", "slug": "keep-me"}}));
        assert_eq!(explicit.slug, "keep-me");
    }

    #[test]
    fn test_banner_asset_url() {
        let event = normalize_event(&json!({
            "fields": {
                "banner": {"fields": {"file": {"url": "//images.ctfassets.net/space/banner.png"}}}
            }
        }));

        assert_eq!(
            event.banner.as_deref(),
            Some("https://images.ctfassets.net/space/banner.png")
        );
    }

    #[test]
    fn test_event_normalization_is_idempotent() {
        let raw = json!({
            "sys": {"id": "e-1", "createdAt": "2025-01-05T10:00:00.000Z"},
            "fields": {
                "title": "TypeScript Mastery Bootcamp",
                "date": "2025-11-15T12:00:00Z",
                "isPublished": true,
                "organizer": {"sys": {"id": "5"}, "fields": {"name": "TS Devs"}},
                "categories": ["4", {"sys": {"id": "2"}, "fields": {"title": "Web", "color": "#10B981"}}],
                "speakers": [{"sys": {"id": "7"}}, {"id": "8", "name": "Emily Zhang", "bio": ""}],
                "banner": {"fields": {"file": {"url": "//img/x.png"}}}
            }
        });

        let once = normalize_event(&raw);
        assert_eq!(renormalize(&once), once);
    }

    #[test]
    fn test_demo_events_are_fixed_points() {
        for event in demo_events() {
            assert_eq!(renormalize(&event), event);
        }
    }

    #[test]
    fn test_unresolved_organizer_is_fixed_point() {
        let once = normalize_event(&json!({"fields": {"title": "Solo"}}));
        assert_eq!(renormalize(&once), once);
    }

    #[test]
    fn test_profile_normalizers() {
        let speaker = normalize_speaker(&json!({
            "sys": {"id": "s-1"},
            "fields": {"name": "John Doe", "bio": "React core team member"}
        }));
        assert_eq!(speaker, Speaker::new("s-1", "John Doe").with_bio("React core team member"));

        let organizer = normalize_organizer(&json!({
            "sys": {"id": "o-1"},
            "fields": {"name": "Design Guild", "image": "//img/guild.png"}
        }));
        assert_eq!(organizer.avatar.as_deref(), Some("https://img/guild.png"));
        assert_eq!(
            normalize_organizer(&serde_json::to_value(&organizer).unwrap()),
            organizer
        );

        let category = normalize_category(&json!({"id": "3", "title": "Design"}));
        assert_eq!(category.slug, "design");
    }
}
