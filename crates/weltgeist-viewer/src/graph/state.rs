use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;
use weltgeist_core::{
    Category, CategoryId, CategoryPatch, CoreError, CoreResult, EntityKind, Event, EventId,
    EventPatch, HierarchyLevel, Intent, LayoutMode, Position, Relationship, RelationshipDraft,
    RelationshipId, RelationshipKind, RelationshipPatch,
};

use crate::graph::filter::Visibility;
use crate::graph::layout::{chronological_layout, lane_layout, LayoutConfig, LayoutResult};
use crate::graph::model::TimelineModel;
use crate::graph::search::search;
use crate::graph::timeline::TimeWindow;
use crate::util::config::ViewerConfig;

#[derive(Debug, Default)]
pub struct LayoutState {
    pub mode: LayoutMode,
    pub computed: LayoutResult,
    /// Dragged positions; cleared by a reset or a mode switch.
    pub overrides: HashMap<EventId, Position>,
    pub dirty: bool,
}

#[derive(Debug)]
pub struct CfgState {
    pub layout: LayoutConfig,
    pub search_limit: usize,
}

impl Default for CfgState {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            search_limit: 50,
        }
    }
}

#[derive(Debug, Default)]
pub struct UiState {
    pub search_query: String,
    pub search_hits: Vec<EventId>,
    pub selected: Option<EventId>,
    pub expanded_levels: BTreeSet<HierarchyLevel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub id: EventId,
    pub title: String,
    pub date: String,
    pub category: CategoryId,
    pub category_name: String,
    pub color: String,
    pub level: HierarchyLevel,
    pub impact: Option<u8>,
    pub tags: Vec<String>,
    pub position: Position,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeView {
    pub id: RelationshipId,
    pub source: EventId,
    pub target: EventId,
    pub kind: RelationshipKind,
    pub color: &'static str,
    pub width: f32,
    pub dashed: bool,
    pub opacity: f32,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub id: CategoryId,
    pub name: String,
    pub color: String,
    pub depth: usize,
    pub visible: bool,
}

/// One collapsible legend block per hierarchy level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendSection {
    pub level: HierarchyLevel,
    pub title: &'static str,
    pub visible: bool,
    pub expanded: bool,
    pub entries: Vec<LegendEntry>,
}

/// What the presentation layer draws.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
    /// Visible events the layout could not place.
    pub rejected: Vec<EventId>,
}

impl Frame {
    pub fn node(&self, id: &EventId) -> Option<&NodeView> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn edge(&self, id: &RelationshipId) -> Option<&EdgeView> {
        self.edges.iter().find(|e| &e.id == id)
    }
}

pub struct TimelineState {
    pub model: TimelineModel,
    pub visibility: Visibility,
    pub layout: LayoutState,
    pub cfg: CfgState,
    pub ui: UiState,

    pub needs_redraw: AtomicBool,
}

impl Default for TimelineState {
    fn default() -> Self {
        let model = TimelineModel::default();
        let visibility = Visibility::all(model.categories(), model.events());
        Self {
            model,
            visibility,
            layout: LayoutState {
                dirty: true,
                ..Default::default()
            },
            cfg: CfgState::default(),
            ui: UiState {
                expanded_levels: HierarchyLevel::ALL.into_iter().collect(),
                ..Default::default()
            },
            needs_redraw: AtomicBool::new(true),
        }
    }
}

impl TimelineState {
    pub fn apply_viewer_config(&mut self, cfg: &ViewerConfig) -> CoreResult<()> {
        let layout = cfg.layout_config()?;
        self.cfg.layout = layout;
        self.cfg.search_limit = cfg.search_limit;
        if self.layout.mode != cfg.layout_mode {
            self.layout.mode = cfg.layout_mode;
            self.layout.overrides.clear();
        }
        self.recompute_search_hits();
        self.mark_layout_dirty();
        Ok(())
    }

    pub fn load_seed(&mut self) -> CoreResult<()> {
        self.model.load_seed()?;
        self.after_load();
        Ok(())
    }

    pub fn load(
        &mut self,
        categories: Vec<Category>,
        events: Vec<Event>,
        relationships: Vec<Relationship>,
    ) -> CoreResult<()> {
        self.model.load(categories, events, relationships)?;
        self.after_load();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.model.clear();
        self.after_load();
    }

    fn after_load(&mut self) {
        self.visibility = Visibility::all(self.model.categories(), self.model.events());
        self.layout.overrides.clear();
        self.ui.selected = None;
        self.recompute_search_hits();
        self.mark_layout_dirty();
    }

    fn mark_layout_dirty(&mut self) {
        self.layout.dirty = true;
        self.needs_redraw.store(true, Ordering::Relaxed);
    }

    /// Returns and resets the redraw flag.
    pub fn take_redraw(&self) -> bool {
        self.needs_redraw.swap(false, Ordering::Relaxed)
    }

    // ----- Intents -----
    pub fn apply(&mut self, intent: Intent) -> CoreResult<()> {
        match intent {
            Intent::MoveNode { id, position } => self.move_node(&id, position),
            Intent::ConnectNodes { source, target } => {
                self.connect_nodes(&source, &target).map(|_| ())
            }
            Intent::ToggleCategory { id } => {
                self.toggle_category(&id);
                Ok(())
            }
            Intent::ToggleLevel { level } => {
                self.toggle_level(level);
                Ok(())
            }
            Intent::SetLevelCategories { level, visible } => {
                self.set_level_categories(level, visible);
                Ok(())
            }
            Intent::SelectAllCategories => {
                self.select_all_categories();
                Ok(())
            }
            Intent::SelectNoCategories => {
                self.select_no_categories();
                Ok(())
            }
            Intent::SearchSubmitted { query } => {
                self.search_submitted(&query);
                Ok(())
            }
            Intent::SetTimeRange { start, end } => self.set_time_range(&start, &end),
            Intent::SetLayoutMode { mode } => {
                self.set_layout_mode(mode);
                Ok(())
            }
            Intent::ResetLayout => {
                self.reset_layout();
                Ok(())
            }
        }
    }

    pub fn move_node(&mut self, id: &EventId, position: Position) -> CoreResult<()> {
        if self.model.event(id).is_none() {
            return Err(CoreError::not_found(EntityKind::Event, id));
        }
        self.layout.overrides.insert(id.clone(), position);
        self.needs_redraw.store(true, Ordering::Relaxed);
        Ok(())
    }

    /// Links two events with a default relationship.
    pub fn connect_nodes(
        &mut self,
        source: &EventId,
        target: &EventId,
    ) -> CoreResult<RelationshipId> {
        let id = self
            .model
            .add_relationship(source, target, RelationshipDraft::default())?;
        self.needs_redraw.store(true, Ordering::Relaxed);
        Ok(id)
    }

    pub fn toggle_category(&mut self, id: &CategoryId) -> bool {
        let visible = self.visibility.toggle_category(id);
        debug!(category = %id, visible, "category toggled");
        self.mark_layout_dirty();
        visible
    }

    pub fn toggle_level(&mut self, level: HierarchyLevel) -> bool {
        let visible = self.visibility.toggle_level(level);
        debug!(%level, visible, "level toggled");
        self.mark_layout_dirty();
        visible
    }

    pub fn set_level_categories(&mut self, level: HierarchyLevel, visible: bool) {
        self.visibility
            .set_level_categories(level, visible, self.model.categories());
        self.mark_layout_dirty();
    }

    pub fn select_all_categories(&mut self) {
        self.visibility
            .select_all(self.model.categories(), self.model.events());
        self.mark_layout_dirty();
    }

    pub fn select_no_categories(&mut self) {
        self.visibility.select_none();
        self.mark_layout_dirty();
    }

    /// Legend section folding; returns whether the level is expanded afterwards.
    pub fn toggle_level_expanded(&mut self, level: HierarchyLevel) -> bool {
        let expanded = if self.ui.expanded_levels.remove(&level) {
            false
        } else {
            self.ui.expanded_levels.insert(level);
            true
        };
        self.needs_redraw.store(true, Ordering::Relaxed);
        expanded
    }

    pub fn select(&mut self, id: Option<EventId>) -> CoreResult<()> {
        if let Some(id) = &id {
            if self.model.event(id).is_none() {
                return Err(CoreError::not_found(EntityKind::Event, id));
            }
        }
        self.ui.selected = id;
        self.needs_redraw.store(true, Ordering::Relaxed);
        Ok(())
    }

    pub fn search_submitted(&mut self, query: &str) {
        self.ui.search_query = query.to_string();
        self.recompute_search_hits();
        debug!(query, hits = self.ui.search_hits.len(), "search submitted");
        self.needs_redraw.store(true, Ordering::Relaxed);
    }

    pub fn recompute_search_hits(&mut self) {
        self.ui.search_hits = search(self.model.events(), &self.ui.search_query)
            .into_iter()
            .take(self.cfg.search_limit)
            .map(|ev| ev.id.clone())
            .collect();
    }

    /// Rejected ranges leave the current window in place.
    pub fn set_time_range(&mut self, start: &str, end: &str) -> CoreResult<()> {
        let window = TimeWindow::parse(start, end)?;
        debug!(start = %window.start, end = %window.end, "time range set");
        self.cfg.layout.window = window;
        self.mark_layout_dirty();
        Ok(())
    }

    pub fn set_layout_mode(&mut self, mode: LayoutMode) {
        self.layout.mode = mode;
        self.layout.overrides.clear();
        self.mark_layout_dirty();
    }

    pub fn reset_layout(&mut self) {
        self.layout.overrides.clear();
        self.mark_layout_dirty();
    }

    // ----- Store passthroughs -----
    /// An event introducing an unknown category id makes that id visible.
    pub fn add_event(&mut self, event: Event) -> CoreResult<()> {
        let category = event.category.clone();
        let new_dangling = !self.model.categories().contains(&category)
            && !self.model.events().iter().any(|e| e.category == category);
        self.model.add_event(event)?;
        if new_dangling {
            self.visibility.categories.insert(category);
        }
        self.after_event_change();
        Ok(())
    }

    pub fn update_event(&mut self, id: &EventId, patch: EventPatch) -> CoreResult<()> {
        self.model.update_event(id, patch)?;
        self.after_event_change();
        Ok(())
    }

    pub fn remove_event(&mut self, id: &EventId) -> CoreResult<Vec<Relationship>> {
        let removed = self.model.remove_event(id)?;
        self.layout.overrides.remove(id);
        if self.ui.selected.as_ref() == Some(id) {
            self.ui.selected = None;
        }
        self.after_event_change();
        Ok(removed)
    }

    fn after_event_change(&mut self) {
        self.recompute_search_hits();
        self.mark_layout_dirty();
    }

    pub fn add_relationship(
        &mut self,
        source: &EventId,
        target: &EventId,
        draft: RelationshipDraft,
    ) -> CoreResult<RelationshipId> {
        let id = self.model.add_relationship(source, target, draft)?;
        self.needs_redraw.store(true, Ordering::Relaxed);
        Ok(id)
    }

    pub fn update_relationship(
        &mut self,
        id: &RelationshipId,
        patch: RelationshipPatch,
    ) -> CoreResult<()> {
        self.model.update_relationship(id, patch)?;
        self.needs_redraw.store(true, Ordering::Relaxed);
        Ok(())
    }

    pub fn remove_relationship(&mut self, id: &RelationshipId) -> CoreResult<Relationship> {
        let removed = self.model.remove_relationship(id)?;
        self.needs_redraw.store(true, Ordering::Relaxed);
        Ok(removed)
    }

    /// New categories start visible.
    pub fn add_category(&mut self, category: Category) -> CoreResult<()> {
        let id = category.id.clone();
        self.model.add_category(category)?;
        self.visibility.categories.insert(id);
        self.mark_layout_dirty();
        Ok(())
    }

    pub fn update_category(&mut self, id: &CategoryId, patch: CategoryPatch) -> CoreResult<()> {
        self.model.update_category(id, patch)?;
        self.mark_layout_dirty();
        Ok(())
    }

    /// The id stays in the visible set so orphaned events keep rendering.
    pub fn remove_category(&mut self, id: &CategoryId) -> CoreResult<Category> {
        let removed = self.model.remove_category(id)?;
        self.mark_layout_dirty();
        Ok(removed)
    }

    // ----- Derivation -----
    pub fn legend(&self) -> Vec<LegendSection> {
        let tree = self.model.categories();
        let entry = |cat: &Category, depth: usize| LegendEntry {
            id: cat.id.clone(),
            name: cat.name.clone(),
            color: cat.color.clone(),
            depth,
            visible: self.visibility.categories.contains(&cat.id),
        };

        HierarchyLevel::ALL
            .into_iter()
            .map(|level| {
                let mut entries = Vec::new();
                for root in tree.roots_at(level) {
                    entries.push(entry(root, 0));
                    for child in tree.children_of(&root.id) {
                        if child.level == level {
                            entries.push(entry(child, 1));
                        }
                    }
                }
                LegendSection {
                    level,
                    title: level.display_name(),
                    visible: self.visibility.levels.contains(&level),
                    expanded: self.ui.expanded_levels.contains(&level),
                    entries,
                }
            })
            .collect()
    }

    fn relayout(&mut self) {
        let visible = self
            .visibility
            .compute(self.model.events(), self.model.relationships());
        let tree = self.model.categories();
        let events = visible.events.iter().copied();
        self.layout.computed = match self.layout.mode {
            LayoutMode::Chronological => chronological_layout(events, tree, &self.cfg.layout),
            LayoutMode::Lanes => lane_layout(events, tree, &self.cfg.layout),
        };
        self.layout.dirty = false;
        debug!(
            mode = ?self.layout.mode,
            placed = self.layout.computed.positions.len(),
            rejected = self.layout.computed.rejected.len(),
            "layout recomputed"
        );
    }

    pub fn position_of(&self, id: &EventId) -> Option<Position> {
        self.layout
            .overrides
            .get(id)
            .copied()
            .or_else(|| self.layout.computed.position(id))
    }

    /// Recomputes the layout when stale and builds the current frame.
    pub fn refresh(&mut self) -> Frame {
        if self.layout.dirty {
            self.relayout();
        }

        let visible = self
            .visibility
            .compute(self.model.events(), self.model.relationships());

        let mut frame = Frame::default();
        for ev in &visible.events {
            let Some(position) = self.position_of(&ev.id) else {
                continue;
            };
            let display = self.model.category_display(&ev.category);
            frame.nodes.push(NodeView {
                id: ev.id.clone(),
                title: ev.title.clone(),
                date: ev.date.label(),
                category: ev.category.clone(),
                category_name: display.name,
                color: display.color,
                level: ev.level,
                impact: ev.impact,
                tags: ev.tags.clone(),
                position,
                selected: self.ui.selected.as_ref() == Some(&ev.id),
            });
        }

        for rel in &visible.relationships {
            if self.position_of(&rel.source).is_none() || self.position_of(&rel.target).is_none() {
                continue;
            }
            frame.edges.push(EdgeView {
                id: rel.id.clone(),
                source: rel.source.clone(),
                target: rel.target.clone(),
                kind: rel.kind,
                color: rel.kind.color(),
                width: rel.stroke_width(),
                dashed: rel.kind.dashed(),
                opacity: rel.polarity.opacity(),
                description: rel.description.clone(),
            });
        }

        frame.rejected = self
            .layout
            .computed
            .rejected
            .iter()
            .map(|(id, _)| id.clone())
            .collect();
        frame
    }
}
