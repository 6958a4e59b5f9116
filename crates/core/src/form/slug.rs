/// Derives a URL slug from a title.
///
/// Lowercases, drops characters outside `[a-z0-9]`, whitespace and `-`,
/// turns whitespace/hyphen runs into a single hyphen and trims hyphens from
/// both ends. `slugify(slugify(t)) == slugify(t)` for every input.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else if c == '-' || c.is_whitespace() {
            pending_hyphen = true;
        }
    }

    slug
}

/// Toggles `id` in a multi-select: removes it if present, appends otherwise.
pub fn toggle(selection: &[String], id: &str) -> Vec<String> {
    if selection.iter().any(|s| s == id) {
        selection.iter().filter(|s| *s != id).cloned().collect()
    } else {
        let mut next = selection.to_vec();
        next.push(id.to_string());
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_title() {
        assert_eq!(slugify("My Awesome Event!! 2025"), "my-awesome-event-2025");
        assert_eq!(slugify("AI & Machine Learning Summit"), "ai-machine-learning-summit");
        assert_eq!(slugify("Next.js Global Meetup"), "nextjs-global-meetup");
    }

    #[test]
    fn test_slugify_trims_and_collapses_hyphens() {
        assert_eq!(slugify("  --Hello -- World--  "), "hello-world");
        assert_eq!(slugify("a\t\nb"), "a-b");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_slugify_drops_non_ascii() {
        assert_eq!(slugify("Café Ünïcode"), "caf-ncode");
    }

    #[test]
    fn test_slugify_output_charset() {
        let inputs = [
            "My Awesome Event!! 2025",
            " -x- ",
            "UPPER_snake_Case",
            "日本語 title",
            "a -- b",
        ];

        for input in inputs {
            let slug = slugify(input);
            assert!(slug
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-'));
            assert!(!slug.starts_with('-'));
            assert!(!slug.ends_with('-'));
            assert!(!slug.contains("--"));
        }
    }

    #[test]
    fn test_slugify_is_idempotent() {
        for input in ["My Awesome Event!! 2025", "--a--b--", "Design Systems Workshop"] {
            let once = slugify(input);
            assert_eq!(slugify(&once), once);
        }
    }

    #[test]
    fn test_toggle_round_trip() {
        let once = toggle(&[], "5");
        assert_eq!(once, vec!["5"]);
        assert!(toggle(&once, "5").is_empty());
    }

    #[test]
    fn test_toggle_keeps_order() {
        let selection = vec!["1".to_string(), "2".to_string(), "3".to_string()];

        assert_eq!(toggle(&selection, "2"), vec!["1", "3"]);
        assert_eq!(toggle(&selection, "4"), vec!["1", "2", "3", "4"]);
    }
}
