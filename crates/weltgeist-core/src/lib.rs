//! Domain model shared by the timeline store and its presentation layer.

mod date;
mod error;
pub mod seed;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use date::EventDate;
pub use error::{CoreError, CoreResult, EntityKind};

macro_rules! string_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id!(EventId);
string_id!(CategoryId);
string_id!(RelationshipId);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyLevel {
    Weltgeist,
    Zeitgeist,
    Geist,
    Biology,
    Dna,
}

impl HierarchyLevel {
    /// Top to bottom.
    pub const ALL: [HierarchyLevel; 5] = [
        Self::Weltgeist,
        Self::Zeitgeist,
        Self::Geist,
        Self::Biology,
        Self::Dna,
    ];

    pub fn index(self) -> usize {
        match self {
            Self::Weltgeist => 0,
            Self::Zeitgeist => 1,
            Self::Geist => 2,
            Self::Biology => 3,
            Self::Dna => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weltgeist => "weltgeist",
            Self::Zeitgeist => "zeitgeist",
            Self::Geist => "geist",
            Self::Biology => "biology",
            Self::Dna => "dna",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(input.trim()))
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Self::Weltgeist => "Weltgeist",
            Self::Zeitgeist => "Zeitgeist",
            Self::Geist => "Geist",
            Self::Biology => "Biology",
            Self::Dna => "DNA",
        }
    }

    // legend heading
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Weltgeist => "Weltgeist (Storehouse of Human Experience)",
            Self::Zeitgeist => "Zeitgeist (Ontogenic Enculturation)",
            Self::Geist => "Geist (Logic)",
            Self::Biology => "Biology (Regulation of Physiology)",
            Self::Dna => "DNA (Genetic Foundation)",
        }
    }
}

impl fmt::Display for HierarchyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub date: EventDate,
    pub category: CategoryId,
    #[serde(default)]
    pub secondary_categories: Vec<CategoryId>,
    pub level: HierarchyLevel,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub impact: Option<u8>,
    #[serde(default)]
    pub connections: Vec<EventId>,
}

impl Event {
    pub fn new(
        id: &str,
        title: &str,
        date: &str,
        category: &str,
        level: HierarchyLevel,
    ) -> Self {
        Self {
            id: EventId::from(id),
            title: title.to_string(),
            description: String::new(),
            date: EventDate::from(date),
            category: CategoryId::from(category),
            secondary_categories: Vec::new(),
            level,
            tags: Vec::new(),
            impact: None,
            connections: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_impact(mut self, impact: u8) -> Self {
        self.impact = Some(impact);
        self
    }

    pub fn validate(&self) -> CoreResult<()> {
        if let Some(impact) = self.impact {
            error::check_percent("impact", impact)?;
        }
        Ok(())
    }

    pub fn apply_patch(&mut self, patch: EventPatch) {
        let EventPatch {
            title,
            description,
            date,
            category,
            secondary_categories,
            level,
            tags,
            impact,
            connections,
        } = patch;
        if let Some(v) = title {
            self.title = v;
        }
        if let Some(v) = description {
            self.description = v;
        }
        if let Some(v) = date {
            self.date = v;
        }
        if let Some(v) = category {
            self.category = v;
        }
        if let Some(v) = secondary_categories {
            self.secondary_categories = v;
        }
        if let Some(v) = level {
            self.level = v;
        }
        if let Some(v) = tags {
            self.tags = v;
        }
        if let Some(v) = impact {
            self.impact = v;
        }
        if let Some(v) = connections {
            self.connections = v;
        }
    }
}

/// Partial event update; `None` leaves the field untouched.
///
/// `impact: Some(None)` clears the impact score.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<EventDate>,
    pub category: Option<CategoryId>,
    pub secondary_categories: Option<Vec<CategoryId>>,
    pub level: Option<HierarchyLevel>,
    pub tags: Option<Vec<String>>,
    pub impact: Option<Option<u8>>,
    pub connections: Option<Vec<EventId>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub color: String,
    pub description: String,
    pub level: HierarchyLevel,
    pub position: u32,
    #[serde(default)]
    pub parent: Option<CategoryId>,
    #[serde(default)]
    pub children: Vec<CategoryId>,
}

impl Category {
    pub fn new(id: &str, name: &str, color: &str, level: HierarchyLevel, position: u32) -> Self {
        Self {
            id: CategoryId::from(id),
            name: name.to_string(),
            color: color.to_string(),
            description: String::new(),
            level,
            position,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: &str) -> Self {
        self.parent = Some(CategoryId::from(parent));
        self
    }

    pub fn with_children(mut self, children: &[&str]) -> Self {
        self.children = children.iter().map(|c| CategoryId::from(*c)).collect();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn apply_patch(&mut self, patch: CategoryPatch) {
        let CategoryPatch {
            name,
            color,
            description,
            level,
            position,
            parent,
            children,
        } = patch;
        if let Some(v) = name {
            self.name = v;
        }
        if let Some(v) = color {
            self.color = v;
        }
        if let Some(v) = description {
            self.description = v;
        }
        if let Some(v) = level {
            self.level = v;
        }
        if let Some(v) = position {
            self.position = v;
        }
        if let Some(v) = parent {
            self.parent = v;
        }
        if let Some(v) = children {
            self.children = v;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
    pub level: Option<HierarchyLevel>,
    pub position: Option<u32>,
    pub parent: Option<Option<CategoryId>>,
    pub children: Option<Vec<CategoryId>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    Causal,
    #[default]
    Correlative,
    Influential,
    Reference,
}

impl RelationshipKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Causal => "causal",
            Self::Correlative => "correlative",
            Self::Influential => "influential",
            Self::Reference => "reference",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Causal => "#EF4444",
            Self::Correlative => "#3B82F6",
            Self::Influential => "#10B981",
            Self::Reference => "#6B7280",
        }
    }

    pub fn dashed(self) -> bool {
        matches!(self, Self::Reference)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Polarity {
    pub fn opacity(self) -> f32 {
        match self {
            Self::Positive => 1.0,
            Self::Negative => 0.7,
            Self::Neutral => 0.8,
        }
    }
}

pub const DEFAULT_STRENGTH: u8 = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Relationship {
    pub id: RelationshipId,
    pub source: EventId,
    pub target: EventId,
    pub kind: RelationshipKind,
    pub strength: u8,
    pub polarity: Polarity,
    #[serde(default)]
    pub description: Option<String>,
}

impl Relationship {
    pub fn touches(&self, id: &EventId) -> bool {
        &self.source == id || &self.target == id
    }

    pub fn stroke_width(&self) -> f32 {
        1.0 + f32::from(self.strength) / 25.0
    }

    pub fn validate(&self) -> CoreResult<()> {
        error::check_percent("strength", self.strength)?;
        Ok(())
    }

    pub fn apply_patch(&mut self, patch: RelationshipPatch) {
        if let Some(v) = patch.kind {
            self.kind = v;
        }
        if let Some(v) = patch.strength {
            self.strength = v;
        }
        if let Some(v) = patch.polarity {
            self.polarity = v;
        }
        if let Some(v) = patch.description {
            self.description = v;
        }
    }
}

/// Fields for a new relationship; unset fields take the documented defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RelationshipDraft {
    pub id: Option<RelationshipId>,
    pub kind: Option<RelationshipKind>,
    pub strength: Option<u8>,
    pub polarity: Option<Polarity>,
    pub description: Option<String>,
}

impl RelationshipDraft {
    pub fn into_relationship(
        self,
        id: RelationshipId,
        source: EventId,
        target: EventId,
    ) -> Relationship {
        Relationship {
            id,
            source,
            target,
            kind: self.kind.unwrap_or_default(),
            strength: self.strength.unwrap_or(DEFAULT_STRENGTH),
            polarity: self.polarity.unwrap_or_default(),
            description: self.description,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RelationshipPatch {
    pub kind: Option<RelationshipKind>,
    pub strength: Option<u8>,
    pub polarity: Option<Polarity>,
    pub description: Option<Option<String>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Date on X, level band plus category offset on Y.
    #[default]
    Chronological,
    /// One lane per category, events packed left to right in date order.
    Lanes,
}

impl LayoutMode {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "chronological" => Some(Self::Chronological),
            "lanes" => Some(Self::Lanes),
            _ => None,
        }
    }
}

/// User intents emitted by the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum Intent {
    MoveNode { id: EventId, position: Position },
    ConnectNodes { source: EventId, target: EventId },
    ToggleCategory { id: CategoryId },
    ToggleLevel { level: HierarchyLevel },
    SetLevelCategories { level: HierarchyLevel, visible: bool },
    SelectAllCategories,
    SelectNoCategories,
    SearchSubmitted { query: String },
    SetTimeRange { start: String, end: String },
    SetLayoutMode { mode: LayoutMode },
    ResetLayout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_patch_preserves_unset_fields() {
        let mut ev = Event::new(
            "event-politics-1",
            "French Revolution",
            "1789-07-14",
            "politics",
            HierarchyLevel::Weltgeist,
        )
        .with_tags(&["revolution"])
        .with_impact(90);

        ev.apply_patch(EventPatch {
            title: Some("Révolution française".to_string()),
            impact: Some(None),
            ..Default::default()
        });

        assert_eq!(ev.title, "Révolution française");
        assert_eq!(ev.impact, None);
        assert_eq!(ev.tags, vec!["revolution".to_string()]);
        assert_eq!(ev.date.as_str(), "1789-07-14");
    }

    #[test]
    fn draft_defaults() {
        let rel = RelationshipDraft::default().into_relationship(
            RelationshipId::from("edge-1"),
            EventId::from("a"),
            EventId::from("b"),
        );
        assert_eq!(rel.kind, RelationshipKind::Correlative);
        assert_eq!(rel.strength, 50);
        assert_eq!(rel.polarity, Polarity::Neutral);
        assert_eq!(rel.stroke_width(), 3.0);
    }

    #[test]
    fn levels_are_ordered_top_to_bottom() {
        let idx: Vec<usize> = HierarchyLevel::ALL.iter().map(|l| l.index()).collect();
        assert_eq!(idx, vec![0, 1, 2, 3, 4]);
        assert_eq!(HierarchyLevel::parse("DNA"), Some(HierarchyLevel::Dna));
        assert_eq!(HierarchyLevel::parse("soul"), None);
    }

    #[test]
    fn intent_wire_shape_is_tagged() {
        let intent = Intent::ToggleLevel {
            level: HierarchyLevel::Geist,
        };
        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["type"], "ToggleLevel");
        assert_eq!(json["data"]["level"], "geist");

        let back: Intent = serde_json::from_str(r#"{"type":"ResetLayout"}"#).unwrap();
        assert_eq!(back, Intent::ResetLayout);
    }
}
