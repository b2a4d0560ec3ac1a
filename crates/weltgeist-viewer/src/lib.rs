//! Timeline store, visibility filter and layout engines behind the Weltgeist viewer.

pub mod graph;
pub mod util;
