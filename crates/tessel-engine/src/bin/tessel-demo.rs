//! Tessel demo runner
//!
//! Loads an HTML file, runs one tick and prints every node's rectangle.
//!
//! Usage: `tessel-demo <page.html> [config.json]`

use anyhow::Context;
use tessel_engine::{Config, Page};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let html_path = args.next().context("usage: tessel-demo <page.html> [config.json]")?;

    let mut config = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            Config::from_json(&json).with_context(|| format!("parsing {path}"))?
        }
        None => Config::default(),
    };
    if config.base_path == "." {
        if let Some(dir) = std::path::Path::new(&html_path).parent().and_then(|d| d.to_str()) {
            if !dir.is_empty() {
                config.base_path = dir.to_string();
            }
        }
    }

    let html = std::fs::read_to_string(&html_path).with_context(|| format!("reading {html_path}"))?;

    let mut page = Page::new(config);
    let report = page.load_html(&html)?;
    let stats = page.tick();
    tracing::info!(
        stylesheets = report.stylesheets,
        scripts = report.scripts.executed,
        commands = stats.commands,
        "first frame"
    );

    let tree = page.tree();
    for id in tree.descendants(tree.root()) {
        let Some(node) = tree.get(id) else { continue };
        let depth = tree.ancestors(id).count();
        println!(
            "{:indent$}{} {} ({}, {}) {}x{}",
            "",
            id,
            node.tag.name(),
            page.layout_x(id),
            page.layout_y(id),
            page.layout_width(id),
            page.layout_height(id),
            indent = depth * 2
        );
    }
    Ok(())
}
