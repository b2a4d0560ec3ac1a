//! Built-in sample timeline loaded on startup.

use crate::{Category, Event, Polarity, Relationship, RelationshipId, RelationshipKind};

use crate::HierarchyLevel::{Biology, Dna, Geist, Weltgeist, Zeitgeist};

pub fn categories() -> Vec<Category> {
    vec![
        Category::new("weltgeist", "Weltgeist", "#6B7280", Weltgeist, 0)
            .with_description("Storehouse of human experience")
            .with_children(&["politics", "economics", "language"]),
        Category::new("politics", "Politics", "#EF4444", Weltgeist, 1)
            .with_description("Rules of authority that regulate and elicit social organization")
            .with_parent("weltgeist"),
        Category::new("economics", "Economics", "#F59E0B", Weltgeist, 2)
            .with_description("Rules of exchange that regulate and elicit social interaction")
            .with_parent("weltgeist"),
        Category::new("language", "Language", "#10B981", Weltgeist, 3)
            .with_description("Vocal and symbolic transmission of experience")
            .with_parent("weltgeist"),
        Category::new("zeitgeist", "Zeitgeist", "#6B7280", Zeitgeist, 0)
            .with_description("Ontogenic enculturation")
            .with_parent("weltgeist")
            .with_children(&["technology", "religion", "science"]),
        Category::new("technology", "Technology", "#3B82F6", Zeitgeist, 1)
            .with_description("Production")
            .with_parent("zeitgeist"),
        Category::new("religion", "Religion", "#8B5CF6", Zeitgeist, 2)
            .with_description("Faith")
            .with_parent("zeitgeist"),
        Category::new("science", "Science", "#EC4899", Zeitgeist, 3)
            .with_description("Knowledge")
            .with_parent("zeitgeist"),
        Category::new("geist", "Geist", "#6B7280", Geist, 0)
            .with_description("Logic")
            .with_parent("zeitgeist"),
        Category::new("biology", "Biology", "#065F46", Biology, 0)
            .with_description("Regulation of physiology")
            .with_parent("geist"),
        Category::new("dna", "DNA", "#1F2937", Dna, 0)
            .with_description("Genetic foundation")
            .with_parent("biology"),
    ]
}

pub fn events() -> Vec<Event> {
    vec![
        Event::new("event-politics-1", "French Revolution", "1789-07-14", "politics", Weltgeist)
            .with_description("A period of radical social and political upheaval in France that transformed society and government.")
            .with_tags(&["revolution", "democracy", "france"])
            .with_impact(90),
        Event::new("event-politics-2", "US Constitution Ratified", "1788-06-21", "politics", Weltgeist)
            .with_description("The United States Constitution is ratified, establishing the federal government and fundamental laws.")
            .with_tags(&["constitution", "democracy", "usa"])
            .with_impact(85),
        Event::new("event-economics-1", "Industrial Revolution", "1760-01-01", "economics", Weltgeist)
            .with_description("The transition to new manufacturing processes in Europe and the United States.")
            .with_tags(&["industry", "manufacturing", "capitalism"])
            .with_impact(95),
        Event::new("event-economics-2", "Great Depression", "1929-10-29", "economics", Weltgeist)
            .with_description("A severe worldwide economic depression that began in the US.")
            .with_tags(&["depression", "crash", "economy"])
            .with_impact(85),
        Event::new("event-language-1", "Gutenberg Printing Press", "1440-01-01", "language", Weltgeist)
            .with_description("The introduction of the movable-type printing press in Europe.")
            .with_tags(&["printing", "communication", "literature"])
            .with_impact(90),
        Event::new("event-language-2", "Internet Becomes Public", "1991-08-06", "language", Weltgeist)
            .with_description("The World Wide Web is made available to the public, revolutionizing communication.")
            .with_tags(&["internet", "communication", "technology"])
            .with_impact(95),
        Event::new("event-technology-1", "Steam Engine Invention", "1776-01-01", "technology", Zeitgeist)
            .with_description("James Watt improves the Newcomen steam engine, revolutionizing industry.")
            .with_tags(&["steam", "engine", "industry"])
            .with_impact(85),
        Event::new("event-technology-2", "First Programmable Computer", "1941-05-12", "technology", Zeitgeist)
            .with_description("The Z3, the first working programmable, fully automatic computer, is created by Konrad Zuse.")
            .with_tags(&["computer", "programming", "digital"])
            .with_impact(90),
        Event::new("event-religion-1", "Protestant Reformation", "1517-10-31", "religion", Zeitgeist)
            .with_description("A religious reform movement that divided Western Christianity.")
            .with_tags(&["christianity", "protestant", "reformation"])
            .with_impact(85),
        Event::new("event-religion-2", "Secularization Movement", "1850-01-01", "religion", Zeitgeist)
            .with_description("The transition from religious to secular society in many Western nations.")
            .with_tags(&["secular", "religion", "society"])
            .with_impact(75),
        Event::new("event-science-1", "Newton's Principia Published", "1687-07-05", "science", Zeitgeist)
            .with_description("Isaac Newton publishes his laws of motion and universal gravitation.")
            .with_tags(&["physics", "gravity", "mechanics"])
            .with_impact(90),
        Event::new("event-science-2", "Darwin's Origin of Species", "1859-11-24", "science", Zeitgeist)
            .with_description("Charles Darwin publishes his theory of evolution by natural selection.")
            .with_tags(&["evolution", "biology", "natural selection"])
            .with_impact(95),
        Event::new("event-geist-1", "Descartes' Cogito Ergo Sum", "1637-01-01", "geist", Geist)
            .with_description("René Descartes formulates his philosophical proposition \"I think, therefore I am\".")
            .with_tags(&["philosophy", "consciousness", "existence"])
            .with_impact(80),
        Event::new("event-biology-1", "Discovery of DNA Structure", "1953-04-25", "biology", Biology)
            .with_description("Watson and Crick discover the double helix structure of DNA.")
            .with_tags(&["dna", "genetics", "molecular biology"])
            .with_impact(95),
        Event::new("event-dna-1", "Human Genome Project Completed", "2003-04-14", "dna", Dna)
            .with_description("Scientists complete the mapping of the human genome.")
            .with_tags(&["genome", "genetics", "mapping"])
            .with_impact(90),
    ]
}

pub fn relationships() -> Vec<Relationship> {
    vec![
        rel(
            "edge-1",
            "event-politics-1",
            "event-politics-2",
            RelationshipKind::Influential,
            70,
            Polarity::Positive,
            "Revolutionary ideals influenced democratic movements",
        ),
        rel(
            "edge-2",
            "event-economics-1",
            "event-technology-1",
            RelationshipKind::Causal,
            90,
            Polarity::Positive,
            "Steam power enabled industrial scale manufacturing",
        ),
        rel(
            "edge-3",
            "event-science-2",
            "event-geist-1",
            RelationshipKind::Reference,
            50,
            Polarity::Neutral,
            "Evolution theory challenged philosophical views of human origins",
        ),
    ]
}

fn rel(
    id: &str,
    source: &str,
    target: &str,
    kind: RelationshipKind,
    strength: u8,
    polarity: Polarity,
    description: &str,
) -> Relationship {
    Relationship {
        id: RelationshipId::from(id),
        source: source.into(),
        target: target.into(),
        kind,
        strength,
        polarity,
        description: Some(description.to_string()),
    }
}
