pub mod filter;
pub mod hierarchy;
pub mod layout;
pub mod model;
pub mod search;
pub mod state;
pub mod timeline;

pub use filter::{compute_visible, Visibility, VisibleSet};
pub use hierarchy::CategoryTree;
pub use layout::{chronological_layout, lane_layout, LayoutConfig, LayoutResult};
pub use model::{relationship_summary, CategoryDisplay, TimelineModel};
pub use search::search;
pub use state::{EdgeView, Frame, LegendSection, NodeView, TimelineState};
pub use timeline::TimeWindow;
