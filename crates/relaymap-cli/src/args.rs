//! Command-line argument definitions for the Relaymap CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. A subcommand selects between laying out an existing graph
//! document and generating a synthetic one.

use clap::{Parser, Subcommand};

/// Command-line arguments for the Relaymap layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute a layout for a JSON graph document
    Layout(LayoutArgs),
    /// Write a synthetic relay topology as a JSON graph document
    Generate(GenerateArgs),
}

#[derive(clap::Args, Debug)]
pub struct LayoutArgs {
    /// Path to the input graph file
    #[arg(help = "Path to the input graph (JSON)")]
    pub input: String,

    /// Path to the output layout file
    #[arg(short, long, default_value = "layout.json")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Overrides the configured placement seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Overrides the configured number of simulation ticks
    #[arg(long)]
    pub ticks: Option<usize>,
}

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// Approximate number of relays to generate
    #[arg(long, default_value_t = 60)]
    pub limit: usize,

    /// Seed for the topology generator
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Path to the output graph file
    #[arg(short, long, default_value = "graph.json")]
    pub output: String,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_args_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_layout_overrides() {
        let args = Args::parse_from([
            "relaymap", "layout", "in.json", "-o", "out.json", "--seed", "9", "--ticks", "40",
        ]);
        let Command::Layout(layout) = args.command else {
            panic!("expected layout subcommand");
        };
        assert_eq!(layout.input, "in.json");
        assert_eq!(layout.output, "out.json");
        assert_eq!(layout.seed, Some(9));
        assert_eq!(layout.ticks, Some(40));
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_parse_generate_defaults() {
        let args = Args::parse_from(["relaymap", "generate", "--log-level", "debug"]);
        let Command::Generate(generate) = args.command else {
            panic!("expected generate subcommand");
        };
        assert_eq!(generate.limit, 60);
        assert_eq!(generate.seed, 0);
        assert_eq!(generate.output, "graph.json");
        assert_eq!(args.log_level, "debug");
    }
}
