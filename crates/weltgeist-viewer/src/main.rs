mod cli;

use anyhow::{Context, Result};
use weltgeist_viewer::graph::{Frame, TimelineState};
use weltgeist_viewer::util::config;

fn init_tracing() {
    let _ = tracing_subscriber::fmt::try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = cli::parse_args()?;
    let cfg = config::load_or_default();

    let mut st = TimelineState::default();
    if let Err(err) = st.apply_viewer_config(&cfg) {
        tracing::warn!("viewer config rejected, using defaults: {err}");
    }
    if cfg.seed_sample_data {
        st.load_seed().context("failed to load sample timeline")?;
    }

    for intent in args.intents() {
        let desc = format!("{intent:?}");
        st.apply(intent)
            .with_context(|| format!("failed to apply {desc}"))?;
    }

    let frame = st.refresh();
    tracing::info!(
        mode = ?st.layout.mode,
        events = st.model.events().len(),
        relationships = st.model.relationships().len(),
        nodes = frame.nodes.len(),
        edges = frame.edges.len(),
        rejected = frame.rejected.len(),
        "frame ready"
    );

    if args.json {
        let out = serde_json::to_string_pretty(&frame).context("failed to encode frame")?;
        println!("{out}");
    } else {
        print_text(&frame, &st);
    }
    Ok(())
}

fn print_text(frame: &Frame, st: &TimelineState) {
    for section in st.legend() {
        let mark = if section.visible { "x" } else { " " };
        println!("[{mark}] {}", section.title);
        if !section.expanded {
            continue;
        }
        for entry in &section.entries {
            let mark = if entry.visible { "x" } else { " " };
            let indent = 4 + entry.depth * 2;
            println!("{:indent$}[{mark}] {} {}", "", entry.name, entry.color);
        }
    }
    println!();

    for node in &frame.nodes {
        println!(
            "{:<24} {:>10}  {:<12} {:<10} ({:>7.1}, {:>7.1})  {}",
            node.id.0,
            node.date,
            node.category_name,
            node.level.short_name(),
            node.position.x,
            node.position.y,
            node.title
        );
    }
    for edge in &frame.edges {
        let summary = st
            .model
            .relationship(&edge.id)
            .map(weltgeist_viewer::graph::relationship_summary)
            .unwrap_or_default();
        println!("{} -> {}  {}", edge.source, edge.target, summary);
    }
    for id in &frame.rejected {
        println!("unplaced: {id}");
    }
    if !st.ui.search_query.trim().is_empty() {
        println!(
            "search {:?}: {} hit(s)",
            st.ui.search_query,
            st.ui.search_hits.len()
        );
        for id in &st.ui.search_hits {
            if let Some(ev) = st.model.event(id) {
                println!("  {}  {}", ev.date.label(), ev.title);
            }
        }
    }
}
