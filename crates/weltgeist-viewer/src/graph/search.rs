use weltgeist_core::Event;

/// Case-insensitive substring match over title, description and tags.
/// A blank query matches nothing.
pub fn search<'a>(events: &'a [Event], query: &str) -> Vec<&'a Event> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    events.iter().filter(|ev| matches(ev, &needle)).collect()
}

fn matches(ev: &Event, needle: &str) -> bool {
    ev.title.to_lowercase().contains(needle)
        || ev.description.to_lowercase().contains(needle)
        || ev.tags.iter().any(|t| t.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use weltgeist_core::seed;

    fn titles(hits: &[&Event]) -> Vec<String> {
        hits.iter().map(|e| e.title.clone()).collect()
    }

    #[test]
    fn blank_query_finds_nothing() {
        let events = seed::events();
        assert!(search(&events, "").is_empty());
        assert!(search(&events, "   ").is_empty());
    }

    #[test]
    fn matches_title_case_insensitively() {
        let events = seed::events();
        let hits = titles(&search(&events, "  REVOLUTION "));
        assert!(hits.contains(&"French Revolution".to_string()));
        assert!(hits.contains(&"Industrial Revolution".to_string()));
    }

    #[test]
    fn matches_tags_and_description_in_store_order() {
        let events = seed::events();
        // "genetics" only appears as a tag
        assert_eq!(
            titles(&search(&events, "genetics")),
            vec!["Discovery of DNA Structure", "Human Genome Project Completed"]
        );
        // "Konrad Zuse" only appears in a description
        assert_eq!(
            titles(&search(&events, "zuse")),
            vec!["First Programmable Computer"]
        );
    }
}
