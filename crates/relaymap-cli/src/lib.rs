//! CLI logic for the Relaymap layout tool.
//!
//! This module contains the core CLI logic: reading graph documents, applying
//! configuration and command-line overrides, and writing layout documents.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command, GenerateArgs, LayoutArgs};

use std::fs;

use log::info;

use relaymap::{
    LayoutBuilder, RelaymapError,
    config::{AppConfig, LayoutConfig},
    topology,
};

/// Run the Relaymap CLI application
///
/// # Errors
///
/// Returns `RelaymapError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed graph documents
/// - Graphs or layout settings rejected by the engine
pub fn run(args: &Args) -> Result<(), RelaymapError> {
    match &args.command {
        Command::Layout(layout_args) => run_layout(layout_args),
        Command::Generate(generate_args) => run_generate(generate_args),
    }
}

fn run_layout(args: &LayoutArgs) -> Result<(), RelaymapError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing graph"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let app_config = AppConfig::new(
        apply_overrides(app_config.layout().clone(), args),
        app_config.style().clone(),
    );

    let source = fs::read_to_string(&args.input)?;

    let builder = LayoutBuilder::new(app_config);
    let graph = builder.parse_graph(&source)?;
    let layout = builder.compute(&graph)?;
    let json = builder.render_json(&layout)?;

    fs::write(&args.output, json)?;

    info!(output_file = args.output; "Layout exported successfully");

    Ok(())
}

fn apply_overrides(mut layout: LayoutConfig, args: &LayoutArgs) -> LayoutConfig {
    if let Some(seed) = args.seed {
        layout = layout.with_seed(seed);
    }
    if let Some(ticks) = args.ticks {
        layout = layout.with_tick_count(ticks);
    }
    layout
}

fn run_generate(args: &GenerateArgs) -> Result<(), RelaymapError> {
    info!(
        limit = args.limit,
        seed = args.seed,
        output_path = args.output;
        "Generating synthetic topology"
    );

    let graph = topology::synthetic(args.limit, args.seed);
    let json = serde_json::to_string_pretty(&graph)?;
    fs::write(&args.output, json)?;

    info!(
        output_file = args.output,
        node_count = graph.nodes.len();
        "Graph exported successfully"
    );

    Ok(())
}
