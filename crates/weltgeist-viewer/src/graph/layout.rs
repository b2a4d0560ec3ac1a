use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::warn;
use weltgeist_core::{CategoryId, CoreError, Event, EventId, HierarchyLevel, Position};

use crate::graph::hierarchy::CategoryTree;
use crate::graph::timeline::TimeWindow;

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    // chronological
    pub level_origin: f32,
    pub level_spacing: f32,
    pub lane_spacing: f32,
    pub tie_spacing: f32,
    pub x_origin: f32,
    pub timeline_width: f32,
    pub window: TimeWindow,

    // lanes
    pub horizontal_spacing: f32,
    pub vertical_spacing: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            level_origin: 100.0,
            level_spacing: 200.0,
            lane_spacing: 50.0,
            tie_spacing: 20.0,
            x_origin: 100.0,
            timeline_width: 3000.0,
            window: TimeWindow::default(),
            horizontal_spacing: 250.0,
            vertical_spacing: 100.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutResult {
    pub positions: HashMap<EventId, Position>,
    /// Events left out of the layout, with the reason.
    pub rejected: Vec<(EventId, CoreError)>,
}

impl LayoutResult {
    pub fn position(&self, id: &EventId) -> Option<Position> {
        self.positions.get(id).copied()
    }
}

pub fn level_band(level: HierarchyLevel, cfg: &LayoutConfig) -> f32 {
    cfg.level_origin + level.index() as f32 * cfg.level_spacing
}

pub fn date_x(date: NaiveDate, cfg: &LayoutConfig) -> f32 {
    cfg.x_origin + cfg.window.fraction(date) * cfg.timeline_width
}

/// X from the date inside the time window, Y from the level band plus the
/// category's sibling offset.
///
/// Events of one category that land on the same x (same date, or clamped to
/// the same window edge) are stacked in input order. A stack stays inside the
/// category's lane: once `tie_spacing` would reach the next sibling, the step
/// shrinks to `lane_spacing / stack size`.
pub fn chronological_layout<'a, I>(events: I, tree: &CategoryTree, cfg: &LayoutConfig) -> LayoutResult
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut out = LayoutResult::default();
    let placed: Vec<(&Event, f32)> = dated(events, &mut out.rejected)
        .into_iter()
        .map(|(ev, date)| (ev, date_x(date, cfg)))
        .collect();

    let mut stacks: HashMap<(u32, &CategoryId), usize> = HashMap::new();
    for &(ev, x) in &placed {
        *stacks.entry((x.to_bits(), &ev.category)).or_insert(0) += 1;
    }

    let mut slots: HashMap<(u32, &CategoryId), usize> = HashMap::new();
    for (ev, x) in placed {
        let key = (x.to_bits(), &ev.category);
        let size = stacks.get(&key).copied().unwrap_or(1);
        let slot = slots.entry(key).or_insert(0);

        let offset = tree
            .get(&ev.category)
            .map(|c| c.position as f32 * cfg.lane_spacing)
            .unwrap_or(0.0);
        let y = level_band(ev.level, cfg) + offset + *slot as f32 * tie_step(size, cfg);
        *slot += 1;

        out.positions.insert(ev.id.clone(), Position::new(x, y));
    }
    out
}

fn tie_step(stack: usize, cfg: &LayoutConfig) -> f32 {
    if stack < 2 || (stack - 1) as f32 * cfg.tie_spacing < cfg.lane_spacing {
        cfg.tie_spacing
    } else {
        cfg.lane_spacing / stack as f32
    }
}

/// One lane per category, events packed left to right in date order.
///
/// Known categories take their list index as lane; dangling categories get
/// lanes after them in order of first appearance.
pub fn lane_layout<'a, I>(events: I, tree: &CategoryTree, cfg: &LayoutConfig) -> LayoutResult
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut out = LayoutResult::default();
    let mut sorted = dated(events, &mut out.rejected);
    sorted.sort_by_key(|(_, date)| *date);

    let mut extra_lanes: HashMap<&CategoryId, usize> = HashMap::new();
    let mut slots: HashMap<&CategoryId, usize> = HashMap::new();
    for (ev, _) in sorted {
        let lane = match tree.lane_index(&ev.category) {
            Some(lane) => lane,
            None => {
                let next = tree.len() + extra_lanes.len();
                *extra_lanes.entry(&ev.category).or_insert(next)
            }
        };
        let slot = slots.entry(&ev.category).or_insert(0);
        out.positions.insert(
            ev.id.clone(),
            Position::new(
                *slot as f32 * cfg.horizontal_spacing,
                lane as f32 * cfg.vertical_spacing,
            ),
        );
        *slot += 1;
    }
    out
}

fn dated<'a, I>(events: I, rejected: &mut Vec<(EventId, CoreError)>) -> Vec<(&'a Event, NaiveDate)>
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut out = Vec::new();
    for ev in events {
        match ev.date.parse() {
            Ok(date) => out.push((ev, date)),
            Err(err) => {
                warn!(event = %ev.id, date = %ev.date, "event left out of layout: {err}");
                rejected.push((ev.id.clone(), err));
            }
        }
    }
    out
}
