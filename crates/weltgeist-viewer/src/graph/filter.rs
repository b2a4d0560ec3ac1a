use std::collections::{BTreeSet, HashSet};

use weltgeist_core::{CategoryId, Event, EventId, HierarchyLevel, Relationship};

use crate::graph::hierarchy::CategoryTree;

/// Legend filter state: which categories and levels are shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Visibility {
    pub categories: BTreeSet<CategoryId>,
    pub levels: BTreeSet<HierarchyLevel>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisibleSet<'a> {
    pub events: Vec<&'a Event>,
    pub relationships: Vec<&'a Relationship>,
}

impl VisibleSet<'_> {
    pub fn event_ids(&self) -> HashSet<&EventId> {
        self.events.iter().map(|e| &e.id).collect()
    }
}

impl Visibility {
    /// Every category and every level; the state after load.
    ///
    /// Category ids that events reference but the tree lacks are included, so
    /// dangling events stay reachable.
    pub fn all(tree: &CategoryTree, events: &[Event]) -> Self {
        Self {
            categories: every_category(tree, events),
            levels: HierarchyLevel::ALL.into_iter().collect(),
        }
    }

    pub fn event_visible(&self, ev: &Event) -> bool {
        passes_filter(ev, &self.categories, &self.levels)
    }

    /// Returns whether the category is visible afterwards.
    pub fn toggle_category(&mut self, id: &CategoryId) -> bool {
        if self.categories.remove(id) {
            false
        } else {
            self.categories.insert(id.clone());
            true
        }
    }

    pub fn toggle_level(&mut self, level: HierarchyLevel) -> bool {
        if self.levels.remove(&level) {
            false
        } else {
            self.levels.insert(level);
            true
        }
    }

    /// Shows or hides every category on `level` at once.
    pub fn set_level_categories(&mut self, level: HierarchyLevel, visible: bool, tree: &CategoryTree) {
        let ids = tree.at_level(level).map(|c| c.id.clone());
        if visible {
            self.categories.extend(ids);
        } else {
            for id in ids {
                self.categories.remove(&id);
            }
        }
    }

    pub fn select_all(&mut self, tree: &CategoryTree, events: &[Event]) {
        self.categories = every_category(tree, events);
    }

    pub fn select_none(&mut self) {
        self.categories.clear();
    }

    pub fn compute<'a>(
        &self,
        events: &'a [Event],
        relationships: &'a [Relationship],
    ) -> VisibleSet<'a> {
        compute_visible(events, relationships, &self.categories, &self.levels)
    }
}

fn every_category(tree: &CategoryTree, events: &[Event]) -> BTreeSet<CategoryId> {
    tree.iter()
        .map(|c| &c.id)
        .chain(events.iter().map(|e| &e.category))
        .cloned()
        .collect()
}

pub fn passes_filter(
    ev: &Event,
    categories: &BTreeSet<CategoryId>,
    levels: &BTreeSet<HierarchyLevel>,
) -> bool {
    categories.contains(&ev.category) && levels.contains(&ev.level)
}

pub fn edge_visible(rel: &Relationship, vis: &HashSet<&EventId>) -> bool {
    vis.contains(&rel.source) && vis.contains(&rel.target)
}

/// Visible subset of the store. Pure; input order is preserved.
pub fn compute_visible<'a>(
    events: &'a [Event],
    relationships: &'a [Relationship],
    categories: &BTreeSet<CategoryId>,
    levels: &BTreeSet<HierarchyLevel>,
) -> VisibleSet<'a> {
    let events: Vec<&Event> = events
        .iter()
        .filter(|ev| passes_filter(ev, categories, levels))
        .collect();
    let ids: HashSet<&EventId> = events.iter().map(|e| &e.id).collect();
    let relationships = relationships
        .iter()
        .filter(|rel| edge_visible(rel, &ids))
        .collect();
    VisibleSet {
        events,
        relationships,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weltgeist_core::{seed, HierarchyLevel::*, Polarity, RelationshipId, RelationshipKind};

    fn politics_pair() -> (Vec<Event>, Vec<Relationship>) {
        let events = vec![
            Event::new("politics-1", "French Revolution", "1789-07-14", "politics", Weltgeist),
            Event::new("politics-2", "US Constitution", "1788-06-21", "politics", Weltgeist),
        ];
        let rels = vec![Relationship {
            id: RelationshipId::from("edge-1"),
            source: "politics-1".into(),
            target: "politics-2".into(),
            kind: RelationshipKind::Influential,
            strength: 70,
            polarity: Polarity::Positive,
            description: None,
        }];
        (events, rels)
    }

    fn set<T: Ord>(items: impl IntoIterator<Item = T>) -> BTreeSet<T> {
        items.into_iter().collect()
    }

    #[test]
    fn level_filter_hides_events_and_their_edges() {
        let (events, rels) = politics_pair();
        let cats = set([CategoryId::from("politics")]);

        let shown = compute_visible(&events, &rels, &cats, &set([Weltgeist]));
        assert_eq!(shown.events.len(), 2);
        assert_eq!(shown.relationships.len(), 1);

        let hidden = compute_visible(&events, &rels, &cats, &set([Zeitgeist]));
        assert!(hidden.events.is_empty());
        assert!(hidden.relationships.is_empty());
    }

    #[test]
    fn edge_needs_both_endpoints() {
        let (mut events, rels) = politics_pair();
        events[1].category = CategoryId::from("economics");
        let shown = compute_visible(
            &events,
            &rels,
            &set([CategoryId::from("politics")]),
            &set([Weltgeist]),
        );
        assert_eq!(shown.events.len(), 1);
        assert!(shown.relationships.is_empty());
    }

    #[test]
    fn deterministic_and_edges_subset_of_visible() {
        let events = seed::events();
        let rels = seed::relationships();
        let tree = CategoryTree::build(seed::categories()).unwrap();
        let mut vis = Visibility::all(&tree, &[]);
        vis.toggle_level(Geist);
        vis.toggle_category(&"economics".into());

        let a = vis.compute(&events, &rels);
        let b = vis.compute(&events, &rels);
        assert_eq!(a, b);

        let ids = a.event_ids();
        for rel in &a.relationships {
            assert!(ids.contains(&rel.source) && ids.contains(&rel.target));
        }
        // edge-1 survives; edge-2 loses economics, edge-3 loses the geist event
        let kept: Vec<&str> = a.relationships.iter().map(|r| r.id.0.as_str()).collect();
        assert_eq!(kept, vec!["edge-1"]);
    }

    #[test]
    fn toggles_touch_only_their_target() {
        let tree = CategoryTree::build(seed::categories()).unwrap();
        let mut vis = Visibility::all(&tree, &[]);
        let before = vis.clone();

        assert!(!vis.toggle_category(&"science".into()));
        assert_eq!(vis.categories.len(), before.categories.len() - 1);
        assert_eq!(vis.levels, before.levels);

        assert!(!vis.toggle_level(Dna));
        assert!(vis.toggle_level(Dna));
        assert!(vis.toggle_category(&"science".into()));
        assert_eq!(vis, before);
    }

    #[test]
    fn level_wide_toggle_is_atomic() {
        let tree = CategoryTree::build(seed::categories()).unwrap();
        let mut vis = Visibility::all(&tree, &[]);

        vis.set_level_categories(Zeitgeist, false, &tree);
        for id in ["zeitgeist", "technology", "religion", "science"] {
            assert!(!vis.categories.contains(&CategoryId::from(id)), "{id}");
        }
        assert!(vis.categories.contains(&CategoryId::from("politics")));
        assert!(vis.categories.contains(&CategoryId::from("geist")));

        vis.set_level_categories(Zeitgeist, true, &tree);
        assert_eq!(vis, Visibility::all(&tree, &[]));
    }

    #[test]
    fn select_all_and_none() {
        let tree = CategoryTree::build(seed::categories()).unwrap();
        let mut vis = Visibility::all(&tree, &[]);
        vis.select_none();
        assert!(vis.categories.is_empty());
        assert!(vis.compute(&seed::events(), &[]).events.is_empty());
        vis.select_all(&tree, &[]);
        assert_eq!(vis.categories.len(), tree.len());
    }

    #[test]
    fn select_all_keeps_dangling_categories_reachable() {
        let tree = CategoryTree::build(seed::categories()).unwrap();
        let mut events = seed::events();
        events.push(Event::new("orphan", "Orphan", "1500", "alchemy", Geist));

        let mut vis = Visibility::all(&tree, &events);
        assert!(vis.categories.contains(&CategoryId::from("alchemy")));
        assert_eq!(vis.compute(&events, &[]).events.len(), events.len());

        vis.select_none();
        vis.select_all(&tree, &events);
        assert_eq!(vis.categories.len(), tree.len() + 1);
        assert_eq!(vis.compute(&events, &[]).events.len(), events.len());
    }
}
