use std::sync::Arc;

use tracing::debug;
use weltgeist_core::{
    seed, Category, CategoryId, CategoryPatch, CoreError, CoreResult, EntityKind, Event, EventId,
    EventPatch, Polarity, Relationship, RelationshipDraft, RelationshipId, RelationshipPatch,
};

use crate::graph::hierarchy::CategoryTree;

pub const FALLBACK_COLOR: &str = "#6B7280";

/// Canonical events, relationships and categories.
///
/// Each collection is an immutable snapshot behind an `Arc`. A successful
/// mutation swaps in a freshly built snapshot; a rejected one leaves every
/// snapshot untouched, so `Arc::ptr_eq` tells observers whether anything changed.
#[derive(Debug, Clone, Default)]
pub struct TimelineModel {
    events: Arc<Vec<Event>>,
    relationships: Arc<Vec<Relationship>>,
    categories: Arc<CategoryTree>,
}

/// Name and color for a category id, with a fallback for dangling references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDisplay {
    pub name: String,
    pub color: String,
    pub known: bool,
}

impl TimelineModel {
    pub fn events(&self) -> &Arc<Vec<Event>> {
        &self.events
    }

    pub fn relationships(&self) -> &Arc<Vec<Relationship>> {
        &self.relationships
    }

    pub fn categories(&self) -> &Arc<CategoryTree> {
        &self.categories
    }

    /// Replaces all collections after validating them together.
    pub fn load(
        &mut self,
        categories: Vec<Category>,
        events: Vec<Event>,
        relationships: Vec<Relationship>,
    ) -> CoreResult<()> {
        let tree = CategoryTree::build(categories)?;

        let mut staged = TimelineModel {
            categories: Arc::new(tree),
            ..Default::default()
        };
        let mut event_list = Vec::with_capacity(events.len());
        for ev in events {
            ev.validate()?;
            if event_list.iter().any(|e: &Event| e.id == ev.id) {
                return Err(CoreError::duplicate(EntityKind::Event, &ev.id));
            }
            event_list.push(ev);
        }
        staged.events = Arc::new(event_list);

        let mut rel_list: Vec<Relationship> = Vec::with_capacity(relationships.len());
        for rel in relationships {
            rel.validate()?;
            staged.require_event(&rel.source)?;
            staged.require_event(&rel.target)?;
            if rel_list.iter().any(|r| r.id == rel.id) {
                return Err(CoreError::duplicate(EntityKind::Relationship, &rel.id));
            }
            rel_list.push(rel);
        }
        staged.relationships = Arc::new(rel_list);

        debug!(
            events = staged.events.len(),
            relationships = staged.relationships.len(),
            categories = staged.categories.len(),
            "timeline loaded"
        );
        *self = staged;
        Ok(())
    }

    pub fn load_seed(&mut self) -> CoreResult<()> {
        self.load(seed::categories(), seed::events(), seed::relationships())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    // ----- Lookups -----
    pub fn event(&self, id: &EventId) -> Option<&Event> {
        self.events.iter().find(|e| &e.id == id)
    }

    pub fn relationship(&self, id: &RelationshipId) -> Option<&Relationship> {
        self.relationships.iter().find(|r| &r.id == id)
    }

    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.get(id)
    }

    pub fn relationships_for_event<'a>(
        &'a self,
        id: &'a EventId,
    ) -> impl Iterator<Item = &'a Relationship> + 'a {
        self.relationships.iter().filter(move |r| r.touches(id))
    }

    pub fn category_display(&self, id: &CategoryId) -> CategoryDisplay {
        match self.categories.get(id) {
            Some(cat) => CategoryDisplay {
                name: cat.name.clone(),
                color: cat.color.clone(),
                known: true,
            },
            None => CategoryDisplay {
                name: id.0.clone(),
                color: FALLBACK_COLOR.to_string(),
                known: false,
            },
        }
    }

    fn require_event(&self, id: &EventId) -> CoreResult<()> {
        if self.event(id).is_none() {
            return Err(CoreError::not_found(EntityKind::Event, id));
        }
        Ok(())
    }

    // ----- Events -----
    pub fn add_event(&mut self, event: Event) -> CoreResult<()> {
        if self.event(&event.id).is_some() {
            return Err(CoreError::duplicate(EntityKind::Event, &event.id));
        }
        event.validate()?;
        debug!(event = %event.id, "event added");
        let mut next = Vec::with_capacity(self.events.len() + 1);
        next.extend(self.events.iter().cloned());
        next.push(event);
        self.events = Arc::new(next);
        Ok(())
    }

    pub fn update_event(&mut self, id: &EventId, patch: EventPatch) -> CoreResult<()> {
        let Some(idx) = self.events.iter().position(|e| &e.id == id) else {
            return Err(CoreError::not_found(EntityKind::Event, id));
        };
        let mut next = self.events.as_ref().clone();
        next[idx].apply_patch(patch);
        next[idx].validate()?;
        debug!(event = %id, "event updated");
        self.events = Arc::new(next);
        Ok(())
    }

    /// Removes the event and every relationship touching it.
    pub fn remove_event(&mut self, id: &EventId) -> CoreResult<Vec<Relationship>> {
        if self.event(id).is_none() {
            return Err(CoreError::not_found(EntityKind::Event, id));
        }
        let next: Vec<Event> = self.events.iter().filter(|e| &e.id != id).cloned().collect();
        let (removed, kept): (Vec<Relationship>, Vec<Relationship>) = self
            .relationships
            .iter()
            .cloned()
            .partition(|r| r.touches(id));

        debug!(event = %id, cascaded = removed.len(), "event removed");
        self.events = Arc::new(next);
        if !removed.is_empty() {
            self.relationships = Arc::new(kept);
        }
        Ok(removed)
    }

    // ----- Relationships -----
    pub fn add_relationship(
        &mut self,
        source: &EventId,
        target: &EventId,
        draft: RelationshipDraft,
    ) -> CoreResult<RelationshipId> {
        self.require_event(source)?;
        self.require_event(target)?;

        let id = match &draft.id {
            Some(id) if self.relationship(id).is_some() => {
                return Err(CoreError::duplicate(EntityKind::Relationship, id));
            }
            Some(id) => id.clone(),
            None => self.next_relationship_id(),
        };
        let rel = draft.into_relationship(id.clone(), source.clone(), target.clone());
        rel.validate()?;

        debug!(relationship = %id, %source, %target, kind = rel.kind.as_str(), "relationship added");
        let mut next = self.relationships.as_ref().clone();
        next.push(rel);
        self.relationships = Arc::new(next);
        Ok(id)
    }

    pub fn update_relationship(
        &mut self,
        id: &RelationshipId,
        patch: RelationshipPatch,
    ) -> CoreResult<()> {
        let Some(idx) = self.relationships.iter().position(|r| &r.id == id) else {
            return Err(CoreError::not_found(EntityKind::Relationship, id));
        };
        let mut next = self.relationships.as_ref().clone();
        next[idx].apply_patch(patch);
        next[idx].validate()?;
        debug!(relationship = %id, "relationship updated");
        self.relationships = Arc::new(next);
        Ok(())
    }

    pub fn remove_relationship(&mut self, id: &RelationshipId) -> CoreResult<Relationship> {
        let Some(idx) = self.relationships.iter().position(|r| &r.id == id) else {
            return Err(CoreError::not_found(EntityKind::Relationship, id));
        };
        let mut next = self.relationships.as_ref().clone();
        let removed = next.remove(idx);
        debug!(relationship = %id, "relationship removed");
        self.relationships = Arc::new(next);
        Ok(removed)
    }

    fn next_relationship_id(&self) -> RelationshipId {
        let mut n = self.relationships.len() + 1;
        loop {
            let id = RelationshipId(format!("edge-{n}"));
            if self.relationship(&id).is_none() {
                return id;
            }
            n += 1;
        }
    }

    // ----- Categories -----
    pub fn add_category(&mut self, category: Category) -> CoreResult<()> {
        let id = category.id.clone();
        let next = self.categories.with_added(category)?;
        debug!(category = %id, "category added");
        self.categories = Arc::new(next);
        Ok(())
    }

    pub fn update_category(&mut self, id: &CategoryId, patch: CategoryPatch) -> CoreResult<()> {
        let next = self.categories.with_updated(id, patch)?;
        debug!(category = %id, "category updated");
        self.categories = Arc::new(next);
        Ok(())
    }

    /// Events keep pointing at the removed id; see [`Self::category_display`].
    pub fn remove_category(&mut self, id: &CategoryId) -> CoreResult<Category> {
        let (next, removed) = self.categories.with_removed(id)?;
        let orphaned = self.events.iter().filter(|e| &e.category == id).count();
        debug!(category = %id, orphaned, "category removed");
        self.categories = Arc::new(next);
        Ok(removed)
    }
}

pub fn relationship_summary(rel: &Relationship) -> String {
    let polarity = match rel.polarity {
        Polarity::Positive => "strengthening",
        Polarity::Negative => "weakening",
        Polarity::Neutral => "neutral",
    };
    format!("{} ({}, strength {})", rel.kind.as_str(), polarity, rel.strength)
}
